//! WebSocket notification tests: seat updates reach connected clients.

#![allow(clippy::panic, clippy::indexing_slicing)]

mod common;

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio_tungstenite::connect_async;

use cinema_gateway::ledger::SeatLedger;

use common::{TestServer, seeded_ledger, spawn_server};

async fn wait_for_subscribers(server: &TestServer, expected: usize) {
    for _ in 0..100 {
        if server.state.hub.subscriber_count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {expected} subscribers");
}

#[tokio::test]
async fn successful_booking_is_pushed_to_every_subscriber() {
    let (ledger, showing) = seeded_ledger().await;
    let Ok(seats) = ledger.list_seats(showing.id).await else {
        panic!("seat listing failed");
    };
    let seat = seats[0].id.get();
    let server = spawn_server(ledger, 10).await;

    let Ok((mut first, _)) = connect_async(server.ws_url()).await else {
        panic!("first websocket connect failed");
    };
    let Ok((mut second, _)) = connect_async(server.ws_url()).await else {
        panic!("second websocket connect failed");
    };
    wait_for_subscribers(&server, 2).await;

    let Ok(resp) = reqwest::Client::new()
        .post(server.url("/api/v1/bookings"))
        .json(&json!({"user_name": "ann", "showing_id": showing.id.get(), "seat_ids": [seat]}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(resp.status(), StatusCode::OK);

    for socket in [&mut first, &mut second] {
        let Ok(Some(Ok(msg))) = tokio::time::timeout(Duration::from_secs(2), socket.next()).await
        else {
            panic!("no seat update received");
        };
        let Ok(text) = msg.to_text() else {
            panic!("expected a text frame");
        };
        let Ok(event) = serde_json::from_str::<Value>(text) else {
            panic!("event is not JSON");
        };
        assert_eq!(event, json!({"type": "seat_update", "showing_id": showing.id.get()}));
    }
}

#[tokio::test]
async fn failed_booking_is_not_announced() {
    let (ledger, showing) = seeded_ledger().await;
    let server = spawn_server(ledger, 10).await;

    let Ok((mut socket, _)) = connect_async(server.ws_url()).await else {
        panic!("websocket connect failed");
    };
    wait_for_subscribers(&server, 1).await;

    let Ok(resp) = reqwest::Client::new()
        .post(server.url("/api/v1/bookings"))
        .json(&json!({"user_name": "ann", "showing_id": showing.id.get(), "seat_ids": [999_999]}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let next = tokio::time::timeout(Duration::from_millis(200), socket.next()).await;
    assert!(next.is_err(), "no event expected after a failed booking");
}

#[tokio::test]
async fn closed_connection_is_unsubscribed() {
    let (ledger, _) = seeded_ledger().await;
    let server = spawn_server(ledger, 10).await;

    let Ok((mut socket, _)) = connect_async(server.ws_url()).await else {
        panic!("websocket connect failed");
    };
    wait_for_subscribers(&server, 1).await;

    let Ok(()) = socket.close(None).await else {
        panic!("close failed");
    };
    wait_for_subscribers(&server, 0).await;
}

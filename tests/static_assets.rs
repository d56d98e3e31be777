//! Static file tests: posters under `/static` and the frontend page at `/`.

#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use reqwest::StatusCode;

use cinema_gateway::ledger::InMemorySeatLedger;

use common::spawn_server;

#[tokio::test]
async fn poster_directory_is_created_and_served() {
    let server = spawn_server(Arc::new(InMemorySeatLedger::new()), 10).await;
    let posters = server.assets.path().join("static").join("posters");
    assert!(posters.is_dir(), "posters directory missing");

    let Ok(()) = tokio::fs::write(posters.join("m.jpg"), b"not really a jpeg").await else {
        panic!("failed to write poster");
    };

    let Ok(resp) = reqwest::get(server.url("/static/posters/m.jpg")).await else {
        panic!("request failed");
    };
    assert_eq!(resp.status(), StatusCode::OK);
    let Ok(bytes) = resp.bytes().await else {
        panic!("body unreadable");
    };
    assert_eq!(bytes.as_ref(), b"not really a jpeg");

    let Ok(resp) = reqwest::get(server.url("/static/posters/missing.jpg")).await else {
        panic!("request failed");
    };
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn index_page_is_served_at_root() {
    let server = spawn_server(Arc::new(InMemorySeatLedger::new()), 10).await;
    let page = "<html><body>seats</body></html>";
    let Ok(()) = tokio::fs::write(server.assets.path().join("index.html"), page).await else {
        panic!("failed to write index");
    };

    let Ok(resp) = reqwest::get(server.url("/")).await else {
        panic!("request failed");
    };
    assert_eq!(resp.status(), StatusCode::OK);
    let Ok(body) = resp.text().await else {
        panic!("body unreadable");
    };
    assert_eq!(body, page);
}

//! Shared harness: a real server on an ephemeral port.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;

use cinema_gateway::admission::{AdmissionConfig, AdmissionController};
use cinema_gateway::app_state::AppState;
use cinema_gateway::domain::{NewShowing, SeatLayout, Showing};
use cinema_gateway::ledger::{InMemorySeatLedger, SeatLedger};
use cinema_gateway::server::{self, StaticAssets};

#[derive(Debug)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub assets: tempfile::TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

pub async fn spawn_server(ledger: Arc<dyn SeatLedger>, burst: usize) -> TestServer {
    let admission = Arc::new(AdmissionController::new(AdmissionConfig {
        burst,
        ..AdmissionConfig::default()
    }));
    let state = AppState::new(ledger, admission);

    let Ok(assets) = tempfile::tempdir() else {
        panic!("failed to create asset directory");
    };
    let static_assets = StaticAssets {
        dir: assets.path().join("static"),
        index: assets.path().join("index.html"),
    };
    let Ok(()) = static_assets.prepare().await else {
        panic!("failed to prepare static assets");
    };
    let app = server::build_app(state.clone(), &static_assets);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no local address");
    };
    tokio::spawn(server::serve(listener, app, std::future::pending()));

    TestServer {
        addr,
        state,
        assets,
    }
}

pub async fn seeded_ledger() -> (Arc<InMemorySeatLedger>, Showing) {
    let ledger = Arc::new(InMemorySeatLedger::new());
    let Ok(showing) = ledger
        .create_showing(
            NewShowing {
                title: "Stalker".to_string(),
                duration_minutes: 161,
                showtime: "20:00".to_string(),
                poster: String::new(),
            },
            SeatLayout::STANDARD,
        )
        .await
    else {
        panic!("seeding failed");
    };
    (ledger, showing)
}

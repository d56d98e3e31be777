//! HTTP application assembly and the serve loop.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::ws::handler::ws_handler;

/// Files served beside the API: the asset directory and the frontend page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAssets {
    /// Served under `/static`. Poster uploads live in `posters/`.
    pub dir: PathBuf,
    /// Served at `/`.
    pub index: PathBuf,
}

impl StaticAssets {
    /// Takes the asset locations from the gateway configuration.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            dir: config.static_dir.clone(),
            index: config.index_file.clone(),
        }
    }

    /// Creates the `posters/` directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from creating the directory.
    pub async fn prepare(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.dir.join("posters")).await
    }
}

/// Builds the full application: REST routes, `/ws`, static files, tracing
/// and CORS.
///
/// With the `swagger-ui` feature the interactive docs are served at
/// `/swagger-ui` and the raw document at `/api-docs/openapi.json`.
pub fn build_app(state: AppState, assets: &StaticAssets) -> Router {
    let router = Router::new()
        .merge(api::build_router(&state))
        .route("/ws", get(ws_handler))
        .nest_service("/static", ServeDir::new(&assets.dir))
        .route_service("/", ServeFile::new(&assets.index));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `app` on `listener` until `shutdown` resolves.
///
/// Peer addresses are attached to every request so admission can key on
/// them.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}

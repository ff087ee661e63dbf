pub mod auth;
pub mod handlers;


use axum::http::{header::CONTENT_TYPE, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tokio::signal::unix::{signal, SignalKind};
use tower_http::cors::CorsLayer;
use tracing::info;

use anyhow::{Context, Result};

use crate::backup::BackupChannel;
use crate::config::{GithubConfig, ServerConfig};
use crate::db::Database;
use crate::record::Recorder;
use crate::sheets::SheetService;

/// Everything the handlers need, constructed once at startup and injected
/// through axum's state. No module-level globals.
pub struct AppState<D, S, B> {
    pub recorder: Arc<Recorder<D, S, B>>,
    pub database: Arc<D>,
    pub github: GithubConfig,
    pub http: reqwest::Client,
}

impl<D, S, B> Clone for AppState<D, S, B> {
    fn clone(&self) -> Self {
        AppState {
            recorder: self.recorder.clone(),
            database: self.database.clone(),
            github: self.github.clone(),
            http: self.http.clone(),
        }
    }
}

pub fn build_router<D, S, B>(state: AppState<D, S, B>) -> Router
where
    D: Database,
    S: SheetService,
    B: BackupChannel,
{
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api", post(handlers::submit::<D, S, B>))
        .route("/api/platform", get(handlers::platforms::<D, S, B>))
        .route(
            "/api/platform/:platform/question",
            get(handlers::platform_questions::<D, S, B>),
        )
        .route("/authenticate", get(auth::authenticate::<D, S, B>))
        .layer(cors)
        .with_state(state)
}

pub async fn serve<D, S, B>(state: AppState<D, S, B>, config: &ServerConfig) -> Result<()>
where
    D: Database,
    S: SheetService,
    B: BackupChannel,
{
    let app = build_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;

    info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}

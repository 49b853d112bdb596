use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tracing::{error, info, warn};

use crate::error::HandlerError;
use crate::handler::{self, MoveParams};
use crate::providers::Provider;

/// Path the Azure Functions deployment exposed; existing service hooks point here.
pub const FUNCTION_PATH: &str = "/api/MoveWorkItemsWhenPullRequestComplete";

#[derive(Clone)]
struct AppState {
    provider: Arc<dyn Provider>,
}

pub fn router(provider: Arc<dyn Provider>) -> Router {
    Router::new()
        .route("/", post(move_work_items))
        .route(FUNCTION_PATH, post(move_work_items))
        .route("/health", get(health))
        .with_state(AppState { provider })
}

async fn move_work_items(
    State(state): State<AppState>,
    Query(params): Query<MoveParams>,
    body: Bytes,
) -> Response {
    match handler::handle(state.provider.as_ref(), &params, &body).await {
        Ok(summary) => (StatusCode::OK, summary.to_string()).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn health() -> &'static str {
    "ok"
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            HandlerError::InvalidRequest(reason) => {
                warn!(reason = %reason, "rejected webhook");
                StatusCode::BAD_REQUEST
            }
            HandlerError::Upstream(e) => {
                error!(error = %format!("{e:#}"), "webhook processing failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

pub async fn serve(
    provider: Arc<dyn Provider>,
    bind: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address: {bind}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind webhook server on {addr}"))?;

    info!(address = %addr, path = FUNCTION_PATH, "Starting webhook server");

    axum::serve(listener, router(provider))
        .with_graceful_shutdown(shutdown)
        .await
        .context("webhook server error")?;

    info!("Webhook server stopped");
    Ok(())
}

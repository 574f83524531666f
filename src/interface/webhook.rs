//! 브랜치 동기화를 HTTP GET으로 트리거하는 웹훅 서버(axum).

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::application::usecases::sync_branch::SyncRequest;
use crate::domain::error::SyncError;
use crate::interface::composition::AppComposition;

#[derive(Debug, Default, Deserialize)]
struct SyncQuery {
    branch: Option<String>,
    slug: Option<String>,
    repo: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    code: &'static str,
    message: String,
}

pub fn router(app: Arc<AppComposition>) -> Router {
    Router::new()
        .route("/", get(sync_from_query))
        .route("/webhook/{branch}/{slug}/{repo}", get(sync_from_path))
        .with_state(app)
}

/// `bind` 주소에서 웹훅 요청을 받는다. Ctrl-C로 종료한다.
pub async fn serve(app: Arc<AppComposition>, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind webhook server on {bind}"))?;
    info!(addr = %listener.local_addr()?, "webhook server listening");

    axum::serve(listener, router(app))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("webhook server failed")
}

async fn sync_from_query(
    State(app): State<Arc<AppComposition>>,
    Query(query): Query<SyncQuery>,
) -> Response {
    let request = SyncRequest {
        branch: query.branch,
        slug: query.slug,
        repo: query.repo,
    };
    run_sync(&app, request).await
}

async fn sync_from_path(
    State(app): State<Arc<AppComposition>>,
    Path((branch, slug, repo)): Path<(String, String, String)>,
) -> Response {
    run_sync(&app, SyncRequest::new(branch, slug, repo)).await
}

async fn run_sync(app: &AppComposition, request: SyncRequest) -> Response {
    match app.sync_usecase().execute(&request).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            let (status, code) = map_error(&err);
            if status.is_server_error() {
                error!(error = %format!("{err:#}"), "webhook sync failed");
            } else {
                warn!(error = %err, "webhook request rejected");
            }
            (
                status,
                Json(ErrorEnvelope {
                    code,
                    message: format!("{err:#}"),
                }),
            )
                .into_response()
        }
    }
}

fn map_error(err: &anyhow::Error) -> (StatusCode, &'static str) {
    match err.downcast_ref::<SyncError>() {
        Some(SyncError::InvalidArgument(_)) => (StatusCode::BAD_REQUEST, "invalid_argument"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

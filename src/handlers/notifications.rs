use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::errors::Result;
use crate::models::{MarkReadRequest, MarkReadResponse, Notification, NotificationQuery};
use crate::AppState;

use super::parse_json;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read", post(mark_read))
}

/// GET /notifications?contact=... - polled by the client, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(state.store.list_notifications(params.contact()).await?))
}

/// POST /notifications/read - `{"ids": [...]}`
///
/// Reports how many ids were supplied, not how many rows changed. An empty
/// body is treated like `{}`.
pub async fn mark_read(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<MarkReadResponse>> {
    let body = body?;
    let payload: MarkReadRequest = if body.iter().all(u8::is_ascii_whitespace) {
        MarkReadRequest::default()
    } else {
        parse_json(&body)?
    };

    state.store.mark_notifications_read(&payload.ids).await?;

    if !payload.ids.is_empty() {
        info!("✅ Marked {} notification(s) as read", payload.ids.len());
    }
    Ok(Json(MarkReadResponse {
        updated: payload.ids.len(),
    }))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::ApiState;
use crate::models::notifications::NewNotification;
use crate::services::ServiceError;

pub(super) async fn list(State(state): State<ApiState>) -> Result<impl IntoResponse, ServiceError> {
    let notifications = state.session.notifications().await?;
    let unread = notifications.iter().filter(|n| !n.read).count();

    Ok(Json(json!({
        "unread_count": unread,
        "notifications": notifications,
    })))
}

pub(super) async fn notify(
    State(state): State<ApiState>,
    Json(notification): Json<NewNotification>,
) -> Result<impl IntoResponse, ServiceError> {
    let notification = state.session.notify(notification).await?;

    Ok((StatusCode::CREATED, Json(notification)))
}

pub(super) async fn mark_read(
    State(state): State<ApiState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.session.mark_read(id).await?;

    Ok(Json(json!({ "id": id, "updated": updated })))
}

pub(super) async fn clear(State(state): State<ApiState>) -> Result<StatusCode, ServiceError> {
    state.session.clear_notifications().await?;

    Ok(StatusCode::NO_CONTENT)
}

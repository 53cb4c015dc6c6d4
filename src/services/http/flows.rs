use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use super::{settle, ApiState, WaitParams};
use crate::models::transactions::{FlowKind, TransferOrder};
use crate::services::ServiceError;

pub(super) async fn get_flow(
    State(state): State<ApiState>,
    Path(kind): Path<FlowKind>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.flow(kind).await?))
}

pub(super) async fn prepare(
    State(state): State<ApiState>,
    Path(kind): Path<FlowKind>,
    Json(order): Json<TransferOrder>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.prepare_flow(kind, order).await?))
}

pub(super) async fn edit(
    State(state): State<ApiState>,
    Path(kind): Path<FlowKind>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.edit_flow(kind).await?))
}

/// Starts the simulated transaction. Answers 202 with the processing flow,
/// or the receipt once settled when `wait` is set.
pub(super) async fn confirm(
    State(state): State<ApiState>,
    Path(kind): Path<FlowKind>,
    Query(params): Query<WaitParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.session.confirm_flow(kind).await?;
    let flow = state.session.flow(kind).await?;

    settle(task, params.wait, flow).await
}

pub(super) async fn restart(
    State(state): State<ApiState>,
    Path(kind): Path<FlowKind>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.restart_flow(kind).await?))
}

pub(super) async fn history(State(state): State<ApiState>) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.history().await?))
}

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::{settle, ApiState, SearchParams, WaitParams};
use crate::models::contacts::NewBeneficiary;
use crate::models::transactions::FlowKind;
use crate::services::ServiceError;

pub(super) async fn search(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.contacts(params.q).await?))
}

pub(super) async fn add(
    State(state): State<ApiState>,
    Query(params): Query<WaitParams>,
    Json(contact): Json<NewBeneficiary>,
) -> Result<impl IntoResponse, ServiceError> {
    let name = contact.name.clone();
    let task = state.session.add_contact(contact).await?;

    settle(task, params.wait, json!({ "status": "PENDING", "name": name })).await
}

pub(super) async fn send_money(
    State(state): State<ApiState>,
    Path(contact_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    open(state, contact_id, FlowKind::Transfer).await
}

pub(super) async fn donate(
    State(state): State<ApiState>,
    Path(contact_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    open(state, contact_id, FlowKind::Donation).await
}

async fn open(
    state: ApiState,
    contact_id: String,
    kind: FlowKind,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let handoff = state.session.open_contact(contact_id, kind).await?;
    let snapshot = state.session.snapshot().await?;

    Ok(Json(json!({
        "handoff": handoff,
        "active_view": snapshot.active_view,
    })))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::{settle, ApiState, SearchParams, WaitParams};
use crate::models::accounts::{NewAccount, NewBroadcast};
use crate::models::transactions::Money;
use crate::services::ServiceError;

#[derive(Debug, Deserialize)]
pub(super) struct InjectionRequest {
    amount: Money,
}

pub(super) async fn search_accounts(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.accounts(params.q).await?))
}

pub(super) async fn create_account(
    State(state): State<ApiState>,
    Query(params): Query<WaitParams>,
    Json(account): Json<NewAccount>,
) -> Result<impl IntoResponse, ServiceError> {
    let name = account.name.clone();
    let task = state.session.create_account(account).await?;

    settle(task, params.wait, json!({ "status": "PENDING", "name": name })).await
}

pub(super) async fn delete_account(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.delete_account(id).await?))
}

pub(super) async fn list_broadcasts(State(state): State<ApiState>) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.broadcasts().await?))
}

pub(super) async fn broadcast(
    State(state): State<ApiState>,
    Query(params): Query<WaitParams>,
    Json(broadcast): Json<NewBroadcast>,
) -> Result<impl IntoResponse, ServiceError> {
    let title = broadcast.title.clone();
    let task = state.session.broadcast(broadcast).await?;

    settle(task, params.wait, json!({ "status": "SENDING", "title": title })).await
}

pub(super) async fn clear_broadcasts(State(state): State<ApiState>) -> Result<StatusCode, ServiceError> {
    state.session.clear_broadcasts().await?;

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn liquidity(State(state): State<ApiState>) -> Result<impl IntoResponse, ServiceError> {
    let liquidity = state.session.liquidity().await?;

    Ok(Json(json!({ "liquidity": liquidity })))
}

pub(super) async fn inject_funds(
    State(state): State<ApiState>,
    Query(params): Query<WaitParams>,
    Json(req): Json<InjectionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.session.inject_funds(req.amount).await?;

    settle(task, params.wait, json!({ "status": "INJECTING", "amount": req.amount })).await
}

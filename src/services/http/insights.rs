use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use super::ApiState;
use crate::services::ServiceError;

#[derive(Debug, Deserialize)]
pub(super) struct AdvisorRequest {
    question: String,
}

pub(super) async fn get_insights(State(state): State<ApiState>) -> Result<impl IntoResponse, ServiceError> {
    let query = state.session.insight_query().await?;

    Ok(Json(state.insights.insights(query).await?))
}

pub(super) async fn ask_advisor(
    State(state): State<ApiState>,
    Json(req): Json<AdvisorRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let balance = state.session.snapshot().await?.identity.balance;
    let reply = state.insights.advise(balance, req.question).await?;

    Ok(Json(json!({ "reply": reply })))
}

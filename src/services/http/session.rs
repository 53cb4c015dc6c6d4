use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use super::ApiState;
use crate::models::navigation::View;
use crate::models::users::{IdentityUpdate, ADMIN_EMAIL};
use crate::services::ServiceError;

/// Password the login form demands for the administrator address. The core
/// session never sees it.
const ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct NavigationRequest {
    view: View,
}

pub(super) async fn login(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    if req.email == ADMIN_EMAIL && req.password != ADMIN_PASSWORD {
        log::warn!("Rejected administrator login with a wrong password.");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid credentials",
                "details": "Wrong password for the administrator account."
            })),
        ));
    }

    let identity = state.session.login(req.email).await?;
    let snapshot = state.session.snapshot().await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "identity": identity,
            "active_view": snapshot.active_view,
            "menu": View::menu(identity.role),
        })),
    ))
}

pub(super) async fn logout(State(state): State<ApiState>) -> Result<StatusCode, ServiceError> {
    state.session.logout().await?;

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn get_session(State(state): State<ApiState>) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.snapshot().await?))
}

pub(super) async fn update_identity(
    State(state): State<ApiState>,
    Json(update): Json<IdentityUpdate>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.session.update_identity(update).await?))
}

pub(super) async fn get_navigation(State(state): State<ApiState>) -> Result<impl IntoResponse, ServiceError> {
    let snapshot = state.session.snapshot().await?;

    Ok(Json(json!({
        "active_view": snapshot.active_view,
        "admin_area": snapshot.active_view.is_admin(),
        "handoff": snapshot.handoff,
        "menu": View::menu(snapshot.identity.role),
    })))
}

pub(super) async fn set_navigation(
    State(state): State<ApiState>,
    Json(req): Json<NavigationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let snapshot = state.session.set_active_view(req.view).await?;

    Ok(Json(json!({
        "active_view": snapshot.active_view,
        "handoff": snapshot.handoff,
    })))
}

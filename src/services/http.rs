use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use super::insights::InsightClient;
use super::session::SessionClient;
use super::tasks::{PendingTask, TaskState};
use super::ServiceError;
use crate::state::{ActionError, ValidationError};

mod admin;
mod contacts;
mod flows;
mod insights;
mod notifications;
mod session;

#[derive(Clone)]
struct ApiState {
    session: SessionClient,
    insights: InsightClient,
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// `?wait=true` makes simulated operations answer once they settle instead
/// of returning 202 straight away.
#[derive(Debug, Default, Deserialize)]
struct WaitParams {
    #[serde(default)]
    wait: bool,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ServiceError::Action(ActionError::NotAuthenticated) => {
                (StatusCode::UNAUTHORIZED, "Not authenticated")
            }
            ServiceError::Action(ActionError::SessionChanged) => {
                (StatusCode::CONFLICT, "Session changed")
            }
            ServiceError::Action(ActionError::Validation(
                ValidationError::UnknownContact(_) | ValidationError::UnknownAccount(_),
            )) => (StatusCode::NOT_FOUND, "Not found"),
            ServiceError::Action(ActionError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Validation error")
            }
            ServiceError::Communication(_, _) => {
                log::error!("Request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            Json(json!({
                "error": error,
                "details": self.to_string()
            })),
        )
            .into_response()
    }
}

/// Answers for a deferred operation: the settled value when the caller asked
/// to wait or the task already finished, otherwise 202 with `pending`.
async fn settle<T: Serialize>(
    mut task: PendingTask<T>,
    wait: bool,
    pending: impl Serialize,
) -> Result<Response, ServiceError> {
    if !wait {
        match task.state() {
            TaskState::Pending => return Ok((StatusCode::ACCEPTED, Json(pending)).into_response()),
            TaskState::Succeeded(value) => return Ok((StatusCode::OK, Json(value)).into_response()),
            TaskState::Failed(_) => {}
        }
    }

    let value = task.wait().await?;
    Ok((StatusCode::OK, Json(value)).into_response())
}

fn router(api_state: ApiState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/session", get(session::get_session))
        .route("/session/login", post(session::login))
        .route("/session/logout", post(session::logout))
        .route("/session/identity", patch(session::update_identity))
        .route(
            "/navigation",
            get(session::get_navigation).put(session::set_navigation),
        )
        .route(
            "/notifications",
            get(notifications::list)
                .post(notifications::notify)
                .delete(notifications::clear),
        )
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route("/flows/{kind}", get(flows::get_flow))
        .route("/flows/{kind}/prepare", post(flows::prepare))
        .route("/flows/{kind}/edit", post(flows::edit))
        .route("/flows/{kind}/confirm", post(flows::confirm))
        .route("/flows/{kind}/restart", post(flows::restart))
        .route("/transactions", get(flows::history))
        .route("/contacts", get(contacts::search).post(contacts::add))
        .route("/contacts/{id}/transfer", post(contacts::send_money))
        .route("/contacts/{id}/donation", post(contacts::donate))
        .route("/insights", get(insights::get_insights))
        .route("/advisor", post(insights::ask_advisor))
        .route(
            "/admin/accounts",
            get(admin::search_accounts).post(admin::create_account),
        )
        .route("/admin/accounts/{id}", delete(admin::delete_account))
        .route(
            "/admin/broadcasts",
            get(admin::list_broadcasts)
                .post(admin::broadcast)
                .delete(admin::clear_broadcasts),
        )
        .route(
            "/admin/liquidity",
            get(admin::liquidity).post(admin::inject_funds),
        )
        .with_state(api_state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_http_server(
    listen: &str,
    session: SessionClient,
    insights: InsightClient,
) -> Result<(), anyhow::Error> {
    let app = router(ApiState { session, insights });

    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::repositories::insights::InsightRepository;
use crate::settings::Settings;
use crate::state::{ActionError, AppState};

pub mod http;
pub mod insights;
pub mod session;
pub mod tasks;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
    #[error(transparent)]
    Action(#[from] ActionError),
}

#[async_trait]
pub trait RequestHandler<T>: Send + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&mut self, request: T);
}

/// Drains a request channel, handing requests to the handler one at a time.
/// Handlers that need concurrency spawn their own tasks.
#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Send,
{
    async fn run(&mut self, mut handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            handler.handle_request(request).await;
        }
    }
}

pub async fn start_services(settings: Settings) -> Result<(), anyhow::Error> {
    let (session_tx, mut session_rx) = mpsc::channel(512);
    let (insight_tx, mut insight_rx) = mpsc::channel(512);

    let mut session_service = session::SessionService::new();
    let mut insight_service = insights::InsightService::new();

    log::info!("Starting session service.");
    let delays = session::Delays {
        transfer: Duration::from_millis(settings.simulation.transfer_delay_ms),
        donation: Duration::from_millis(settings.simulation.donation_delay_ms),
        account: Duration::from_millis(settings.simulation.account_delay_ms),
        contact: Duration::from_millis(settings.simulation.contact_delay_ms),
        broadcast: Duration::from_millis(settings.simulation.broadcast_delay_ms),
        injection: Duration::from_millis(settings.simulation.injection_delay_ms),
    };
    let session_loop_tx = session_tx.downgrade();
    tokio::spawn(async move {
        let handler = session::SessionRequestHandler::new(AppState::new(), session_loop_tx, delays);

        session_service.run(handler, &mut session_rx).await;
    });

    log::info!("Starting insight service.");
    let insight_settings = settings.insights;
    tokio::spawn(async move {
        let repository = InsightRepository::new(
            insight_settings.api_key,
            insight_settings.url,
            insight_settings.model,
            Duration::from_secs(insight_settings.timeout_secs),
        );
        let handler = insights::InsightRequestHandler::new(repository);

        insight_service.run(handler, &mut insight_rx).await;
    });

    log::info!("Starting HTTP server.");
    http::start_http_server(
        &settings.server.listen,
        session::SessionClient::new(session_tx),
        insights::InsightClient::new(insight_tx),
    )
    .await
}

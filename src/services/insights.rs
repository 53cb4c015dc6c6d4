use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::{RequestHandler, Service, ServiceError};
use crate::models::insights::{Insight, InsightQuery};
use crate::models::transactions::Money;
use crate::repositories::insights::InsightRepository;

pub enum InsightRequest {
    GetInsights {
        query: InsightQuery,
        response: oneshot::Sender<Vec<Insight>>,
    },
    AskAdvisor {
        balance: Money,
        question: String,
        response: oneshot::Sender<String>,
    },
}

pub struct InsightRequestHandler {
    repository: Arc<InsightRepository>,
}

impl InsightRequestHandler {
    pub fn new(repository: InsightRepository) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}

#[async_trait]
impl RequestHandler<InsightRequest> for InsightRequestHandler {
    // Remote calls can take seconds, so each request gets its own task.
    async fn handle_request(&mut self, request: InsightRequest) {
        let repository = self.repository.clone();

        match request {
            InsightRequest::GetInsights { query, response } => {
                tokio::spawn(async move {
                    let insights = repository.insights(&query).await;
                    let _ = response.send(insights);
                });
            }
            InsightRequest::AskAdvisor {
                balance,
                question,
                response,
            } => {
                tokio::spawn(async move {
                    let reply = repository.advise(balance, &question).await;
                    let _ = response.send(reply);
                });
            }
        }
    }
}

pub struct InsightService;

impl InsightService {
    pub fn new() -> Self {
        InsightService {}
    }
}

#[async_trait]
impl Service<InsightRequest, InsightRequestHandler> for InsightService {}

#[derive(Clone)]
pub struct InsightClient {
    channel: mpsc::Sender<InsightRequest>,
}

impl InsightClient {
    pub fn new(channel: mpsc::Sender<InsightRequest>) -> Self {
        Self { channel }
    }

    pub async fn insights(&self, query: InsightQuery) -> Result<Vec<Insight>, ServiceError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.channel
            .send(InsightRequest::GetInsights {
                query,
                response: response_tx,
            })
            .await
            .map_err(|e| ServiceError::Communication("Insights".to_string(), e.to_string()))?;

        response_rx
            .await
            .map_err(|e| ServiceError::Communication("Insights".to_string(), e.to_string()))
    }

    pub async fn advise(&self, balance: Money, question: String) -> Result<String, ServiceError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.channel
            .send(InsightRequest::AskAdvisor {
                balance,
                question,
                response: response_tx,
            })
            .await
            .map_err(|e| ServiceError::Communication("Insights".to_string(), e.to_string()))?;

        response_rx
            .await
            .map_err(|e| ServiceError::Communication("Insights".to_string(), e.to_string()))
    }
}

/// Spawns an insight service with no API key, so every answer is the fallback.
#[cfg(test)]
pub fn spawn_for_tests() -> InsightClient {
    let (insight_tx, mut insight_rx) = mpsc::channel(8);
    let handler = InsightRequestHandler::new(InsightRepository::new(
        None,
        "http://127.0.0.1:1".to_string(),
        "gemini-3-flash-preview".to_string(),
        std::time::Duration::from_secs(5),
    ));
    let mut service = InsightService::new();
    tokio::spawn(async move {
        service.run(handler, &mut insight_rx).await;
    });

    InsightClient::new(insight_tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::insights::{fallback_insights, ADVISOR_FALLBACK};
    use crate::models::transactions::demo_history;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn serves_fallback_content_without_a_key() {
        let client = spawn_for_tests();
        let query = InsightQuery {
            balance: Money::from_cents(1_245_075),
            history: demo_history(),
        };

        assert_eq!(client.insights(query).await.unwrap(), fallback_insights());
        assert_eq!(
            client
                .advise(Money::from_cents(100), "Should I invest?".to_string())
                .await
                .unwrap(),
            ADVISOR_FALLBACK
        );
    }

    #[tokio::test]
    async fn stopped_service_is_a_communication_error() {
        let (insight_tx, insight_rx) = mpsc::channel(1);
        drop(insight_rx);
        let client = InsightClient::new(insight_tx);

        assert_matches!(
            client.advise(Money::ZERO, "Hi".to_string()).await,
            Err(ServiceError::Communication(_, _))
        );
    }
}

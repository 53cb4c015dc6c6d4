use std::time::Duration;

use crate::models::insights::{fallback_insights, Insight, InsightQuery, ADVISOR_FALLBACK};
use crate::models::transactions::Money;

mod gemini;

pub use gemini::GeminiApi;

/// Front for the generative-text collaborator. Callers always get content
/// back: any failure, including a missing API key, yields the static
/// fallback.
pub struct InsightRepository {
    gemini_api: Option<GeminiApi>,
}

impl InsightRepository {
    /// `timeout` bounds every remote call so a stalled endpoint still ends
    /// on the fallback.
    pub fn new(api_key: Option<String>, url: String, model: String, timeout: Duration) -> Self {
        let Some(key) = api_key.filter(|key| !key.trim().is_empty()) else {
            log::warn!("No insights API key configured, serving fallback insights.");
            return InsightRepository { gemini_api: None };
        };

        match GeminiApi::new(key, url, model, timeout) {
            Ok(api) => InsightRepository {
                gemini_api: Some(api),
            },
            Err(e) => {
                log::error!("Could not build the insights client, serving fallback insights: {}", e);
                InsightRepository { gemini_api: None }
            }
        }
    }

    pub async fn insights(&self, query: &InsightQuery) -> Vec<Insight> {
        let Some(api) = &self.gemini_api else {
            return fallback_insights();
        };

        match api.insights(query).await {
            Ok(insights) => insights,
            Err(e) => {
                log::warn!("Could not fetch insights, using fallback: {}", e);
                fallback_insights()
            }
        }
    }

    pub async fn advise(&self, balance: Money, question: &str) -> String {
        let Some(api) = &self.gemini_api else {
            return ADVISOR_FALLBACK.to_string();
        };

        match api.advise(&balance.to_string(), question).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => ADVISOR_FALLBACK.to_string(),
            Err(e) => {
                log::warn!("Advisor request failed: {}", e);
                ADVISOR_FALLBACK.to_string()
            }
        }
    }
}

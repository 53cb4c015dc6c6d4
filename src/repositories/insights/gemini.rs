use std::time::Duration;

use anyhow::anyhow;
use serde_json::json;

use crate::models::insights::{Insight, InsightQuery};

pub struct GeminiApi {
    api_key: String,
    url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiApi {
    pub fn new(
        api_key: String,
        url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            url,
            model,
            client,
        })
    }

    pub async fn insights(&self, query: &InsightQuery) -> Result<Vec<Insight>, anyhow::Error> {
        let history = serde_json::to_string(&query.history)?;
        let payload = json!({
            "contents": [{
                "parts": [{
                    "text": format!(
                        "Generate 3 financial and donation insights for a user with a balance of ${} \
                         and a history of donations: {}. Return the response as JSON only.",
                        query.balance, history
                    )
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "title": { "type": "STRING" },
                            "description": { "type": "STRING" },
                            "impactScore": { "type": "NUMBER" }
                        },
                        "required": ["title", "description", "impactScore"]
                    }
                }
            }
        });

        let text = self.generate(&payload).await?;
        let insights: Vec<Insight> = serde_json::from_str(&text)?;

        Ok(insights)
    }

    pub async fn advise(&self, balance: &str, question: &str) -> Result<String, anyhow::Error> {
        let payload = json!({
            "contents": [{
                "parts": [{
                    "text": format!(
                        "You are the NexGen Bank financial assistant. The user's current balance is ${}. \
                         Answer concisely, in a modern and encouraging tone. The user asks: {}",
                        balance, question
                    )
                }]
            }]
        });

        self.generate(&payload).await
    }

    async fn generate(&self, payload: &serde_json::Value) -> Result<String, anyhow::Error> {
        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        candidate_text(&response)
    }
}

/// Pulls the generated text out of a `generateContent` response body.
pub fn candidate_text(body: &str) -> Result<String, anyhow::Error> {
    let response_json: serde_json::Value = serde_json::from_str(body)?;

    response_json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Gemini: Bad response format."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_candidate_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"[]"}],"role":"model"}}]}"#;
        assert_eq!(candidate_text(body).unwrap(), "[]");
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(candidate_text(r#"{"error":{"code":403}}"#).is_err());
        assert!(candidate_text("not json").is_err());
    }

    #[test]
    fn insight_records_require_every_field() {
        let complete = r#"[{"title":"A","description":"B","impactScore":64}]"#;
        let insights: Vec<Insight> = serde_json::from_str(complete).unwrap();
        assert_eq!(insights[0].impact_score, 64.0);

        let missing = r#"[{"title":"A","description":"B"}]"#;
        assert!(serde_json::from_str::<Vec<Insight>>(missing).is_err());
    }
}

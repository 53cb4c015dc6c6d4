use serde::{Deserialize, Serialize};

use super::transactions::{Money, Transaction};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub impact_score: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct InsightQuery {
    pub balance: Money,
    pub history: Vec<Transaction>,
}

pub const ADVISOR_FALLBACK: &str =
    "I can't answer right now. Please check your connection and try again.";

pub fn fallback_insights() -> Vec<Insight> {
    let insight = |title: &str, description: &str, impact_score: f64| Insight {
        title: title.to_string(),
        description: description.to_string(),
        impact_score,
    };

    vec![
        insight(
            "Smart Saving",
            "You could increase your donation budget by 5% next month based on your current spending.",
            85.0,
        ),
        insight(
            "Direct Impact",
            "Your gifts to individuals have directly supported local education efforts this quarter.",
            92.0,
        ),
        insight(
            "Balance Health",
            "Maintain a reserve of $2000 for emergency liquidity while continuing your impact.",
            78.0,
        ),
    ]
}

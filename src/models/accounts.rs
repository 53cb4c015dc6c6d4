use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::notifications::Category;
use super::transactions::Money;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    UnderReview,
    Suspended,
}

/// A customer record as seen from the admin console.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ManagedAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub balance: Money,
    pub status: AccountStatus,
    pub joined: NaiveDate,
}

impl ManagedAccount {
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.email.to_lowercase().contains(&query)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub balance: Money,
}

#[derive(Clone, Debug, Serialize)]
pub struct Broadcast {
    pub id: String,
    pub sent_at: DateTime<Utc>,
    pub recipient: String,
    pub title: String,
    pub category: Category,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewBroadcast {
    /// `None` addresses every user.
    #[serde(default)]
    pub recipient_id: Option<String>,
    pub category: Category,
    pub title: String,
    pub message: String,
}

pub fn demo_accounts() -> Vec<ManagedAccount> {
    let account = |id: &str, name: &str, email: &str, balance: i64, status: AccountStatus, (y, m, d): (i32, u32, u32)| ManagedAccount {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        balance: Money::from_cents(balance * 100),
        status,
        joined: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
    };

    vec![
        account("u1", "Jean Dupont", "jean@dupont.com", 12_450, AccountStatus::Active, (2023, 1, 12)),
        account("u2", "Marie Curie", "marie@curie.org", 89_200, AccountStatus::Active, (2023, 3, 5)),
        account("u3", "Luc Martin", "luc@martin.fr", 1_200, AccountStatus::Active, (2023, 5, 20)),
        account("u4", "Sarah Wilson", "sarah@wilson.com", 450, AccountStatus::UnderReview, (2023, 10, 15)),
        account("u5", "Robert Fox", "robert@fox.io", 0, AccountStatus::Suspended, (2023, 8, 22)),
    ]
}

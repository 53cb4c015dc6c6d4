use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Info,
    Success,
    Warning,
    Security,
}

/// Whether a record was raised by the system (admin broadcasts, account
/// events) or by the user's own actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Origin {
    System,
    #[default]
    User,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub category: Category,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub origin: Origin,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewNotification {
    pub category: Category,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub origin: Origin,
}

impl NewNotification {
    pub fn new(category: Category, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category,
            title: title.into(),
            message: message.into(),
            origin: Origin::User,
        }
    }

    pub fn system(category: Category, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin: Origin::System,
            ..Self::new(category, title, message)
        }
    }
}

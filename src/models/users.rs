use serde::{Deserialize, Serialize};

use super::transactions::Money;

pub const ADMIN_EMAIL: &str = "admin@nexgen.com";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub balance: Money,
    pub avatar: String,
    pub account_number: String,
    pub role: Role,
}

impl Identity {
    /// Builds the session identity for a submitted login address. Only the
    /// exact admin address is granted the admin role.
    pub fn for_login(email: &str) -> Self {
        let role = if email == ADMIN_EMAIL {
            Role::Admin
        } else {
            Role::User
        };
        let name = match role {
            Role::Admin => "System Admin",
            Role::User => "Jean Dupont",
        };

        Identity {
            id: "u1".to_string(),
            name: name.to_string(),
            email: email.to_string(),
            balance: Money::from_cents(1_245_075),
            avatar: String::new(),
            account_number: "FR76 3000 1234 5678 9012 345".to_string(),
            role,
        }
    }
}

/// Shallow patch applied by the profile and balance-affecting views.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IdentityUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub account_number: Option<String>,
    pub balance: Option<Money>,
}

impl IdentityUpdate {
    pub fn apply(self, identity: &mut Identity) {
        if let Some(name) = self.name {
            identity.name = name;
        }
        if let Some(email) = self.email {
            identity.email = email;
        }
        if let Some(avatar) = self.avatar {
            identity.avatar = avatar;
        }
        if let Some(account_number) = self.account_number {
            identity.account_number = account_number;
        }
        if let Some(balance) = self.balance {
            identity.balance = balance;
        }
    }
}

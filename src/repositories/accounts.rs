use chrono::Utc;
use uuid::Uuid;

use crate::models::accounts::{
    demo_accounts, AccountStatus, Broadcast, ManagedAccount, NewAccount, NewBroadcast,
};
use crate::models::transactions::Money;

pub const ALL_USERS: &str = "All users";
pub const UNKNOWN_RECIPIENT: &str = "Unknown";
pub const INITIAL_LIQUIDITY: Money = Money::from_cents(245_090_000);

/// Admin console data: the customer directory, the log of sent broadcasts
/// and the bank's global liquidity.
pub struct AccountRepository {
    accounts: Vec<ManagedAccount>,
    broadcasts: Vec<Broadcast>,
    liquidity: Money,
}

impl AccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: demo_accounts(),
            broadcasts: Vec::new(),
            liquidity: INITIAL_LIQUIDITY,
        }
    }

    pub fn liquidity(&self) -> Money {
        self.liquidity
    }

    /// Adds `amount` to the treasury. `None` on overflow, leaving it as is.
    pub fn inject(&mut self, amount: Money) -> Option<Money> {
        self.liquidity = self.liquidity.checked_add(amount)?;

        Some(self.liquidity)
    }

    pub fn search(&self, query: &str) -> Vec<ManagedAccount> {
        self.accounts
            .iter()
            .filter(|a| a.matches(query))
            .cloned()
            .collect()
    }

    pub fn insert(&mut self, account: NewAccount) -> ManagedAccount {
        let account = ManagedAccount {
            id: format!("u{}", Uuid::new_v4().simple()),
            name: account.name,
            email: account.email,
            balance: account.balance,
            status: AccountStatus::Active,
            joined: Utc::now().date_naive(),
        };
        self.accounts.insert(0, account.clone());

        account
    }

    pub fn delete(&mut self, id: &str) -> Option<ManagedAccount> {
        let position = self.accounts.iter().position(|a| a.id == id)?;

        Some(self.accounts.remove(position))
    }

    pub fn record_broadcast(&mut self, broadcast: &NewBroadcast) -> Broadcast {
        let recipient = match &broadcast.recipient_id {
            None => ALL_USERS.to_string(),
            Some(id) => self
                .accounts
                .iter()
                .find(|a| &a.id == id)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| UNKNOWN_RECIPIENT.to_string()),
        };

        let entry = Broadcast {
            id: Uuid::new_v4().hyphenated().to_string(),
            sent_at: Utc::now(),
            recipient,
            title: broadcast.title.clone(),
            category: broadcast.category,
        };
        self.broadcasts.insert(0, entry.clone());

        entry
    }

    pub fn broadcasts(&self) -> &[Broadcast] {
        &self.broadcasts
    }

    pub fn clear_broadcasts(&mut self) {
        self.broadcasts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::Category;
    use crate::models::transactions::Money;

    fn broadcast(recipient_id: Option<&str>) -> NewBroadcast {
        NewBroadcast {
            recipient_id: recipient_id.map(str::to_string),
            category: Category::Warning,
            title: "Maintenance".to_string(),
            message: "Tonight".to_string(),
        }
    }

    #[test]
    fn injections_accumulate() {
        let mut repository = AccountRepository::new();
        assert_eq!(repository.liquidity().to_string(), "2450900.00");

        assert_eq!(
            repository.inject(Money::from_cents(10_050)),
            Some(Money::from_cents(245_100_050))
        );
        assert_eq!(repository.inject(Money::from_cents(i64::MAX)), None);
        assert_eq!(repository.liquidity(), Money::from_cents(245_100_050));
    }

    #[test]
    fn insert_and_delete() {
        let mut accounts = AccountRepository::new();
        let created = accounts.insert(NewAccount {
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            balance: Money::from_cents(500),
        });
        assert_eq!(created.status, AccountStatus::Active);
        assert_eq!(accounts.search("")[0], created);
        assert_eq!(accounts.search("").len(), 6);

        assert_eq!(accounts.delete(&created.id), Some(created));
        assert!(accounts.delete("missing").is_none());
        assert_eq!(accounts.search("").len(), 5);
    }

    #[test]
    fn broadcast_recipient_labels() {
        let mut accounts = AccountRepository::new();

        assert_eq!(accounts.record_broadcast(&broadcast(None)).recipient, ALL_USERS);
        assert_eq!(accounts.record_broadcast(&broadcast(Some("u2"))).recipient, "Marie Curie");
        assert_eq!(
            accounts.record_broadcast(&broadcast(Some("u404"))).recipient,
            UNKNOWN_RECIPIENT
        );
        assert_eq!(accounts.broadcasts().len(), 3);
        assert_eq!(accounts.broadcasts()[0].recipient, UNKNOWN_RECIPIENT);

        accounts.clear_broadcasts();
        assert!(accounts.broadcasts().is_empty());
    }
}

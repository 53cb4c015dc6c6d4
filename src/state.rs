use serde::Serialize;

use crate::models::accounts::{Broadcast, ManagedAccount, NewAccount, NewBroadcast};
use crate::models::contacts::{Beneficiary, NewBeneficiary};
use crate::models::insights::InsightQuery;
use crate::models::navigation::{Handoff, View};
use crate::models::notifications::{Category, NewNotification, Notification};
use crate::models::transactions::{
    FlowKind, FlowState, Money, Receipt, Recipient, Transaction, TransferOrder,
};
use crate::models::users::{Identity, IdentityUpdate};
use crate::repositories::{
    accounts::AccountRepository, contacts::ContactRepository, navigation::NavigationRepository,
    notifications::NotificationRepository, session::SessionRepository,
    transactions::TransactionRepository,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}.")]
    MissingField(&'static str),
    #[error("Amount must be greater than zero.")]
    NonPositiveAmount,
    #[error("Amount {0} is out of range.")]
    AmountOutOfRange(Money),
    #[error("Amount {amount} exceeds the available balance of {balance}.")]
    InsufficientFunds { amount: Money, balance: Money },
    #[error("A {0} is already processing.")]
    AlreadyProcessing(FlowKind),
    #[error("There is no {0} waiting for confirmation.")]
    NothingToConfirm(FlowKind),
    #[error("Unknown contact: {0}.")]
    UnknownContact(String),
    #[error("Unknown account: {0}.")]
    UnknownAccount(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No authenticated session.")]
    NotAuthenticated,
    #[error("The session that started this operation has ended.")]
    SessionChanged,
}

/// A flow's step indicator plus the recipient the form should start from.
#[derive(Clone, Debug, Serialize)]
pub struct FlowView {
    pub kind: FlowKind,
    #[serde(flatten)]
    pub state: FlowState,
    pub prefill: Option<Recipient>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub identity: Identity,
    pub active_view: View,
    pub handoff: Option<Handoff>,
    pub unread_count: usize,
}

/// Root session/view container. Every view action goes through here so the
/// cross-store rules (landing view on login, hand-off scope, atomic
/// transaction completion) live in one place.
pub struct AppState {
    session: SessionRepository,
    navigation: NavigationRepository,
    notifications: NotificationRepository,
    transactions: TransactionRepository,
    contacts: ContactRepository,
    accounts: AccountRepository,
}

impl AppState {
    pub fn new() -> Self {
        let mut notifications = NotificationRepository::new();
        notifications.append(NewNotification::system(
            Category::Security,
            "Secure connection",
            "AES-256 encryption enabled for your session.",
        ));

        Self {
            session: SessionRepository::new(),
            navigation: NavigationRepository::new(),
            notifications,
            transactions: TransactionRepository::new(),
            contacts: ContactRepository::new(),
            accounts: AccountRepository::new(),
        }
    }

    pub fn require_session(&self) -> Result<(), ActionError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(ActionError::NotAuthenticated)
        }
    }

    pub fn session_generation(&self) -> u64 {
        self.session.generation()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            authenticated: self.session.is_authenticated(),
            identity: self.session.identity().clone(),
            active_view: self.navigation.active_view(),
            handoff: self.navigation.handoff().cloned(),
            unread_count: self.notifications.unread_count(),
        }
    }

    pub fn login(&mut self, email: &str) -> Identity {
        let identity = self.session.login(email).clone();
        self.transactions.reset_flows();
        self.navigation.set_active_view(View::landing(identity.role));

        identity
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.navigation.set_active_view(View::default());
    }

    pub fn update_identity(&mut self, update: IdentityUpdate) -> Result<Identity, ActionError> {
        self.require_session()?;

        Ok(self.session.update_identity(update).clone())
    }

    pub fn set_active_view(&mut self, view: View) {
        self.navigation.set_active_view(view);
    }

    /// The contacts view's "send money" and "donate" actions. Donations only
    /// carry the name.
    pub fn open_contact(&mut self, contact_id: &str, kind: FlowKind) -> Result<Handoff, ActionError> {
        self.require_session()?;
        let contact = self
            .contacts
            .get(contact_id)
            .ok_or_else(|| ValidationError::UnknownContact(contact_id.to_string()))?;

        let (handoff, destination) = match kind {
            FlowKind::Transfer => (
                Handoff {
                    name: contact.name.clone(),
                    account: Some(contact.account_number.clone()),
                },
                View::Transfers,
            ),
            FlowKind::Donation => (
                Handoff {
                    name: contact.name.clone(),
                    account: None,
                },
                View::Donations,
            ),
        };
        self.navigation.hand_off(handoff.clone(), destination);

        Ok(handoff)
    }

    pub fn recipient_prefill(&self) -> Option<Recipient> {
        self.navigation.handoff().map(|h| Recipient {
            name: h.name.clone(),
            account: h.account.clone(),
        })
    }

    pub fn notify(&mut self, notification: NewNotification) -> Notification {
        self.notifications.append(notification).clone()
    }

    pub fn mark_read(&mut self, id: u64) -> bool {
        self.notifications.mark_read(id)
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear_all();
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .display_order()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }

    pub fn flow(&self, kind: FlowKind) -> FlowState {
        self.transactions.flow(kind)
    }

    pub fn flow_view(&self, kind: FlowKind) -> FlowView {
        FlowView {
            kind,
            state: self.flow(kind),
            prefill: self.recipient_prefill(),
        }
    }

    pub fn prepare_flow(&mut self, kind: FlowKind, order: TransferOrder) -> Result<FlowState, ActionError> {
        self.require_session()?;
        self.transactions.prepare(kind, order)?;

        Ok(self.flow(kind))
    }

    pub fn edit_flow(&mut self, kind: FlowKind) -> Result<FlowState, ActionError> {
        self.transactions.edit(kind)?;

        Ok(self.flow(kind))
    }

    /// Validates the prepared order against the live balance and marks the
    /// flow as processing. On error nothing is modified.
    pub fn begin_flow(&mut self, kind: FlowKind) -> Result<TransferOrder, ActionError> {
        self.require_session()?;
        let balance = self.session.identity().balance;

        Ok(self.transactions.begin(kind, balance)?)
    }

    /// Deferred half of a confirmed flow. Debits the balance, appends the
    /// success notification and closes the flow in one step, or fails the
    /// flow if the balance no longer covers the amount. `generation` is the
    /// session generation seen by `begin_flow`; after a new login the order
    /// is dropped without touching the new identity.
    pub fn complete_flow(
        &mut self,
        kind: FlowKind,
        order: &TransferOrder,
        generation: u64,
    ) -> Result<Receipt, ActionError> {
        if generation != self.session.generation() {
            log::warn!(
                "{} of {} to {} dropped: the session changed before it completed",
                kind,
                order.amount,
                order.recipient.name
            );
            return Err(ActionError::SessionChanged);
        }

        let balance = self.session.identity().balance;
        let remaining = balance
            .checked_sub(order.amount)
            .filter(|remaining| *remaining >= Money::ZERO);

        let Some(remaining) = remaining else {
            self.transactions.abort(kind, order);
            self.notifications.append(NewNotification::new(
                Category::Warning,
                kind.failure_title(),
                format!("${} to {}: insufficient funds", order.amount, order.recipient.name),
            ));
            log::warn!("{} of {} to {} failed: insufficient funds", kind, order.amount, order.recipient.name);

            return Err(ValidationError::InsufficientFunds {
                amount: order.amount,
                balance,
            }
            .into());
        };

        self.session.set_balance(remaining);
        self.notifications.append(NewNotification::new(
            Category::Success,
            kind.success_title(),
            format!("${} to {}", order.amount, order.recipient.name),
        ));
        let transaction = self.transactions.settle(kind, order);
        log::info!("{} of {} to {} completed", kind, order.amount, order.recipient.name);

        Ok(Receipt {
            transaction,
            balance: remaining,
        })
    }

    pub fn restart_flow(&mut self, kind: FlowKind) -> Result<FlowState, ActionError> {
        self.transactions.restart(kind)?;

        Ok(self.flow(kind))
    }

    pub fn history(&self) -> Vec<Transaction> {
        self.transactions.history().to_vec()
    }

    pub fn insight_query(&self) -> InsightQuery {
        InsightQuery {
            balance: self.session.identity().balance,
            history: self.history(),
        }
    }

    pub fn balance(&self) -> Money {
        self.session.identity().balance
    }

    pub fn contacts(&self, query: &str) -> Vec<Beneficiary> {
        self.contacts.search(query)
    }

    pub fn validate_contact(contact: &NewBeneficiary) -> Result<(), ValidationError> {
        require("name", &contact.name)?;
        require("email", &contact.email)?;
        require("account_number", &contact.account_number)
    }

    pub fn add_contact(&mut self, contact: NewBeneficiary) -> Result<Beneficiary, ActionError> {
        self.require_session()?;
        Self::validate_contact(&contact)?;

        Ok(self.contacts.insert(contact))
    }

    pub fn accounts(&self, query: &str) -> Vec<ManagedAccount> {
        self.accounts.search(query)
    }

    pub fn validate_account(account: &NewAccount) -> Result<(), ValidationError> {
        require("name", &account.name)?;
        require("email", &account.email)
    }

    pub fn create_account(&mut self, account: NewAccount) -> Result<ManagedAccount, ActionError> {
        self.require_session()?;
        Self::validate_account(&account)?;
        let account = self.accounts.insert(account);
        self.notifications.append(NewNotification::system(
            Category::Info,
            "System",
            format!("New account created: {}", account.name),
        ));

        Ok(account)
    }

    pub fn delete_account(&mut self, id: &str) -> Result<ManagedAccount, ActionError> {
        self.require_session()?;
        let account = self
            .accounts
            .delete(id)
            .ok_or_else(|| ValidationError::UnknownAccount(id.to_string()))?;
        self.notifications.append(NewNotification::system(
            Category::Info,
            "System",
            "User account deleted.",
        ));

        Ok(account)
    }

    pub fn validate_broadcast(broadcast: &NewBroadcast) -> Result<(), ValidationError> {
        require("title", &broadcast.title)?;
        require("message", &broadcast.message)
    }

    pub fn broadcast(&mut self, broadcast: NewBroadcast) -> Result<Broadcast, ActionError> {
        self.require_session()?;
        Self::validate_broadcast(&broadcast)?;

        let entry = self.accounts.record_broadcast(&broadcast);
        self.notifications.append(NewNotification::system(
            broadcast.category,
            broadcast.title,
            broadcast.message,
        ));

        Ok(entry)
    }

    pub fn broadcasts(&self) -> Vec<Broadcast> {
        self.accounts.broadcasts().to_vec()
    }

    pub fn clear_broadcasts(&mut self) {
        self.accounts.clear_broadcasts();
    }

    pub fn liquidity(&self) -> Money {
        self.accounts.liquidity()
    }

    pub fn validate_injection(amount: Money) -> Result<(), ValidationError> {
        if amount.is_positive() {
            Ok(())
        } else {
            Err(ValidationError::NonPositiveAmount)
        }
    }

    /// Treasury injection from the admin finance console.
    pub fn inject_funds(&mut self, amount: Money) -> Result<Money, ActionError> {
        self.require_session()?;
        Self::validate_injection(amount)?;
        let liquidity = self
            .accounts
            .inject(amount)
            .ok_or(ValidationError::AmountOutOfRange(amount))?;
        log::info!("Injected {} into global liquidity, now {}", amount, liquidity);

        Ok(liquidity)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::models::transactions::{
    demo_history, FlowKind, FlowState, FlowStep, Money, Transaction, TransactionStatus,
    TransferOrder,
};
use crate::state::ValidationError;

/// Transaction history plus the step indicator of each money-moving view.
pub struct TransactionRepository {
    history: Vec<Transaction>,
    flows: HashMap<FlowKind, FlowState>,
}

impl TransactionRepository {
    pub fn new() -> Self {
        Self {
            history: demo_history(),
            flows: HashMap::new(),
        }
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    pub fn flow(&self, kind: FlowKind) -> FlowState {
        self.flows.get(&kind).cloned().unwrap_or_default()
    }

    fn flow_mut(&mut self, kind: FlowKind) -> &mut FlowState {
        self.flows.entry(kind).or_default()
    }

    /// Stores the form input. Transfers move on to their review screen.
    pub fn prepare(&mut self, kind: FlowKind, order: TransferOrder) -> Result<(), ValidationError> {
        if order.recipient.name.trim().is_empty() {
            return Err(ValidationError::MissingField("recipient"));
        }
        if !order.amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount);
        }

        let flow = self.flow_mut(kind);
        if flow.processing {
            return Err(ValidationError::AlreadyProcessing(kind));
        }
        flow.draft = Some(order);
        flow.step = if kind.has_review() {
            FlowStep::Review
        } else {
            FlowStep::Details
        };

        Ok(())
    }

    pub fn edit(&mut self, kind: FlowKind) -> Result<(), ValidationError> {
        let flow = self.flow_mut(kind);
        if flow.processing {
            return Err(ValidationError::AlreadyProcessing(kind));
        }
        if flow.step == FlowStep::Review {
            flow.step = FlowStep::Details;
        }

        Ok(())
    }

    /// Checks `0 < amount <= balance` and marks the flow as processing.
    /// Nothing changes when the check fails.
    pub fn begin(&mut self, kind: FlowKind, balance: Money) -> Result<TransferOrder, ValidationError> {
        let flow = self.flow_mut(kind);
        if flow.processing {
            return Err(ValidationError::AlreadyProcessing(kind));
        }

        let order = match (&flow.draft, flow.step) {
            (Some(order), step) if step != FlowStep::Completed => order.clone(),
            _ => return Err(ValidationError::NothingToConfirm(kind)),
        };
        if !order.amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount);
        }
        if order.amount > balance {
            return Err(ValidationError::InsufficientFunds {
                amount: order.amount,
                balance,
            });
        }

        flow.processing = true;
        Ok(order)
    }

    /// Marks a processing flow as done and records it in the history.
    pub fn settle(&mut self, kind: FlowKind, order: &TransferOrder) -> Transaction {
        let flow = self.flow_mut(kind);
        flow.processing = false;
        flow.step = FlowStep::Completed;
        flow.draft = None;

        self.record(kind, order, TransactionStatus::Completed)
    }

    /// Releases a processing flow that could not complete. The step stays
    /// where it was before confirmation.
    pub fn abort(&mut self, kind: FlowKind, order: &TransferOrder) -> Transaction {
        self.flow_mut(kind).processing = false;

        self.record(kind, order, TransactionStatus::Failed)
    }

    /// Drops every flow's draft and step. History is kept.
    pub fn reset_flows(&mut self) {
        self.flows.clear();
    }

    pub fn restart(&mut self, kind: FlowKind) -> Result<(), ValidationError> {
        let flow = self.flow_mut(kind);
        if flow.processing {
            return Err(ValidationError::AlreadyProcessing(kind));
        }
        *flow = FlowState::default();

        Ok(())
    }

    fn record(&mut self, kind: FlowKind, order: &TransferOrder, status: TransactionStatus) -> Transaction {
        let transaction = Transaction {
            id: Uuid::new_v4().hyphenated().to_string(),
            kind: kind.transaction_kind(),
            amount: order.amount,
            recipient_name: order.recipient.name.clone(),
            date: Utc::now().date_naive(),
            category: kind.history_category().to_string(),
            status,
        };
        self.history.insert(0, transaction.clone());

        transaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transactions::Recipient;
    use assert_matches::assert_matches;

    fn order(cents: i64) -> TransferOrder {
        TransferOrder {
            recipient: Recipient {
                name: "Jean Martin".to_string(),
                account: None,
            },
            amount: Money::from_cents(cents),
            note: None,
            instant: false,
        }
    }

    #[test]
    fn transfer_goes_through_review() {
        let mut repository = TransactionRepository::new();
        repository.prepare(FlowKind::Transfer, order(4_000)).unwrap();
        assert_eq!(repository.flow(FlowKind::Transfer).step, FlowStep::Review);

        repository.edit(FlowKind::Transfer).unwrap();
        assert_eq!(repository.flow(FlowKind::Transfer).step, FlowStep::Details);
        assert!(repository.flow(FlowKind::Transfer).draft.is_some());

        repository.prepare(FlowKind::Donation, order(100)).unwrap();
        assert_eq!(repository.flow(FlowKind::Donation).step, FlowStep::Details);
    }

    #[test]
    fn prepare_checks_presence() {
        let mut repository = TransactionRepository::new();
        let mut nameless = order(100);
        nameless.recipient.name = "  ".to_string();

        assert_matches!(
            repository.prepare(FlowKind::Transfer, nameless),
            Err(ValidationError::MissingField("recipient"))
        );
        assert_matches!(
            repository.prepare(FlowKind::Transfer, order(0)),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(repository.flow(FlowKind::Transfer), FlowState::default());
    }

    #[test]
    fn begin_guards_balance_and_resubmission() {
        let mut repository = TransactionRepository::new();
        assert_matches!(
            repository.begin(FlowKind::Transfer, Money::from_cents(100)),
            Err(ValidationError::NothingToConfirm(FlowKind::Transfer))
        );

        repository.prepare(FlowKind::Transfer, order(7_500)).unwrap();
        assert_matches!(
            repository.begin(FlowKind::Transfer, Money::from_cents(5_000)),
            Err(ValidationError::InsufficientFunds { .. })
        );
        assert!(!repository.flow(FlowKind::Transfer).processing);

        repository.begin(FlowKind::Transfer, Money::from_cents(7_500)).unwrap();
        assert!(repository.flow(FlowKind::Transfer).processing);
        assert_matches!(
            repository.begin(FlowKind::Transfer, Money::from_cents(7_500)),
            Err(ValidationError::AlreadyProcessing(FlowKind::Transfer))
        );
        assert_matches!(
            repository.restart(FlowKind::Transfer),
            Err(ValidationError::AlreadyProcessing(FlowKind::Transfer))
        );
    }

    #[test]
    fn settle_and_abort_record_history() {
        let mut repository = TransactionRepository::new();
        let seeded = repository.history().len();
        repository.prepare(FlowKind::Transfer, order(4_000)).unwrap();
        let draft = repository.begin(FlowKind::Transfer, Money::from_cents(10_000)).unwrap();

        let failed = repository.abort(FlowKind::Transfer, &draft);
        assert_eq!(failed.status, TransactionStatus::Failed);
        assert_eq!(repository.flow(FlowKind::Transfer).step, FlowStep::Review);

        repository.begin(FlowKind::Transfer, Money::from_cents(10_000)).unwrap();
        let done = repository.settle(FlowKind::Transfer, &draft);
        assert_eq!(done.status, TransactionStatus::Completed);
        assert_eq!(repository.history()[0].id, done.id);
        assert_eq!(repository.history().len(), seeded + 2);

        let flow = repository.flow(FlowKind::Transfer);
        assert_eq!(flow.step, FlowStep::Completed);
        assert!(flow.draft.is_none());

        repository.restart(FlowKind::Transfer).unwrap();
        assert_eq!(repository.flow(FlowKind::Transfer), FlowState::default());
    }
}

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::tasks::{PendingTask, TaskSender};
use super::{RequestHandler, Service, ServiceError};
use crate::models::accounts::{Broadcast, ManagedAccount, NewAccount, NewBroadcast};
use crate::models::contacts::{Beneficiary, NewBeneficiary};
use crate::models::insights::InsightQuery;
use crate::models::navigation::{Handoff, View};
use crate::models::notifications::{NewNotification, Notification};
use crate::models::transactions::{
    FlowKind, FlowState, Money, Receipt, Transaction, TransferOrder,
};
use crate::models::users::{Identity, IdentityUpdate};
use crate::state::{AppState, FlowView, SessionSnapshot};

type Responder<T> = oneshot::Sender<Result<T, ServiceError>>;

pub enum SessionRequest {
    Snapshot {
        response: oneshot::Sender<SessionSnapshot>,
    },
    Login {
        email: String,
        response: oneshot::Sender<Identity>,
    },
    Logout {
        response: oneshot::Sender<()>,
    },
    UpdateIdentity {
        update: IdentityUpdate,
        response: Responder<Identity>,
    },
    SetActiveView {
        view: View,
        response: oneshot::Sender<SessionSnapshot>,
    },
    OpenContact {
        contact_id: String,
        kind: FlowKind,
        response: Responder<Handoff>,
    },
    Notifications {
        response: oneshot::Sender<Vec<Notification>>,
    },
    Notify {
        notification: NewNotification,
        response: oneshot::Sender<Notification>,
    },
    MarkRead {
        id: u64,
        response: oneshot::Sender<bool>,
    },
    ClearNotifications {
        response: oneshot::Sender<()>,
    },
    Flow {
        kind: FlowKind,
        response: oneshot::Sender<FlowView>,
    },
    PrepareFlow {
        kind: FlowKind,
        order: TransferOrder,
        response: Responder<FlowState>,
    },
    EditFlow {
        kind: FlowKind,
        response: Responder<FlowState>,
    },
    ConfirmFlow {
        kind: FlowKind,
        response: Responder<PendingTask<Receipt>>,
    },
    CompleteFlow {
        kind: FlowKind,
        order: TransferOrder,
        generation: u64,
        response: TaskSender<Receipt>,
    },
    RestartFlow {
        kind: FlowKind,
        response: Responder<FlowState>,
    },
    History {
        response: oneshot::Sender<Vec<Transaction>>,
    },
    InsightQuery {
        response: oneshot::Sender<InsightQuery>,
    },
    Contacts {
        query: String,
        response: oneshot::Sender<Vec<Beneficiary>>,
    },
    AddContact {
        contact: NewBeneficiary,
        response: Responder<PendingTask<Beneficiary>>,
    },
    CommitContact {
        contact: NewBeneficiary,
        response: TaskSender<Beneficiary>,
    },
    Accounts {
        query: String,
        response: oneshot::Sender<Vec<ManagedAccount>>,
    },
    CreateAccount {
        account: NewAccount,
        response: Responder<PendingTask<ManagedAccount>>,
    },
    CommitAccount {
        account: NewAccount,
        response: TaskSender<ManagedAccount>,
    },
    DeleteAccount {
        id: String,
        response: Responder<ManagedAccount>,
    },
    Broadcast {
        broadcast: NewBroadcast,
        response: Responder<PendingTask<Broadcast>>,
    },
    CommitBroadcast {
        broadcast: NewBroadcast,
        response: TaskSender<Broadcast>,
    },
    Broadcasts {
        response: oneshot::Sender<Vec<Broadcast>>,
    },
    ClearBroadcasts {
        response: oneshot::Sender<()>,
    },
    Liquidity {
        response: oneshot::Sender<Money>,
    },
    InjectFunds {
        amount: Money,
        response: Responder<PendingTask<Money>>,
    },
    CommitInjection {
        amount: Money,
        response: TaskSender<Money>,
    },
}

/// Artificial latency of the simulated operations.
#[derive(Clone, Copy, Debug)]
pub struct Delays {
    pub transfer: Duration,
    pub donation: Duration,
    pub account: Duration,
    pub contact: Duration,
    pub broadcast: Duration,
    pub injection: Duration,
}

impl Delays {
    fn for_flow(&self, kind: FlowKind) -> Duration {
        match kind {
            FlowKind::Transfer => self.transfer,
            FlowKind::Donation => self.donation,
        }
    }
}

pub struct SessionRequestHandler {
    state: AppState,
    session_channel: mpsc::WeakSender<SessionRequest>,
    delays: Delays,
}

impl SessionRequestHandler {
    pub fn new(
        state: AppState,
        session_channel: mpsc::WeakSender<SessionRequest>,
        delays: Delays,
    ) -> Self {
        SessionRequestHandler {
            state,
            session_channel,
            delays,
        }
    }

    /// Posts `request` back onto the session channel once `delay` has
    /// elapsed. The scheduled task keeps the channel open until it fires.
    fn defer(&self, delay: Duration, request: SessionRequest) -> Result<(), ServiceError> {
        let channel = self.session_channel.upgrade().ok_or_else(|| {
            ServiceError::Communication("Session".to_string(), "channel closed".to_string())
        })?;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if channel.send(request).await.is_err() {
                log::error!("Session service stopped before a deferred request could resume.");
            }
        });

        Ok(())
    }

    fn confirm_flow(&mut self, kind: FlowKind) -> Result<PendingTask<Receipt>, ServiceError> {
        let order = self.state.begin_flow(kind)?;
        let (sender, task) = PendingTask::channel();
        self.defer(
            self.delays.for_flow(kind),
            SessionRequest::CompleteFlow {
                kind,
                order,
                generation: self.state.session_generation(),
                response: sender,
            },
        )?;

        Ok(task)
    }

    fn add_contact(&self, contact: NewBeneficiary) -> Result<PendingTask<Beneficiary>, ServiceError> {
        self.state.require_session()?;
        AppState::validate_contact(&contact).map_err(|e| ServiceError::Action(e.into()))?;

        let (sender, task) = PendingTask::channel();
        self.defer(
            self.delays.contact,
            SessionRequest::CommitContact {
                contact,
                response: sender,
            },
        )?;

        Ok(task)
    }

    fn create_account(&self, account: NewAccount) -> Result<PendingTask<ManagedAccount>, ServiceError> {
        self.state.require_session()?;
        AppState::validate_account(&account).map_err(|e| ServiceError::Action(e.into()))?;

        let (sender, task) = PendingTask::channel();
        self.defer(
            self.delays.account,
            SessionRequest::CommitAccount {
                account,
                response: sender,
            },
        )?;

        Ok(task)
    }

    fn broadcast(&self, broadcast: NewBroadcast) -> Result<PendingTask<Broadcast>, ServiceError> {
        self.state.require_session()?;
        AppState::validate_broadcast(&broadcast).map_err(|e| ServiceError::Action(e.into()))?;

        let (sender, task) = PendingTask::channel();
        self.defer(
            self.delays.broadcast,
            SessionRequest::CommitBroadcast {
                broadcast,
                response: sender,
            },
        )?;

        Ok(task)
    }

    fn inject_funds(&self, amount: Money) -> Result<PendingTask<Money>, ServiceError> {
        self.state.require_session()?;
        AppState::validate_injection(amount).map_err(|e| ServiceError::Action(e.into()))?;

        let (sender, task) = PendingTask::channel();
        self.defer(
            self.delays.injection,
            SessionRequest::CommitInjection {
                amount,
                response: sender,
            },
        )?;

        Ok(task)
    }
}

#[async_trait]
impl RequestHandler<SessionRequest> for SessionRequestHandler {
    async fn handle_request(&mut self, request: SessionRequest) {
        match request {
            SessionRequest::Snapshot { response } => {
                let _ = response.send(self.state.snapshot());
            }
            SessionRequest::Login { email, response } => {
                let identity = self.state.login(&email);
                log::info!("Session opened for {} ({:?}).", identity.email, identity.role);
                let _ = response.send(identity);
            }
            SessionRequest::Logout { response } => {
                self.state.logout();
                log::info!("Session closed.");
                let _ = response.send(());
            }
            SessionRequest::UpdateIdentity { update, response } => {
                let result = self.state.update_identity(update).map_err(ServiceError::from);
                let _ = response.send(result);
            }
            SessionRequest::SetActiveView { view, response } => {
                self.state.set_active_view(view);
                let _ = response.send(self.state.snapshot());
            }
            SessionRequest::OpenContact {
                contact_id,
                kind,
                response,
            } => {
                let result = self
                    .state
                    .open_contact(&contact_id, kind)
                    .map_err(ServiceError::from);
                let _ = response.send(result);
            }
            SessionRequest::Notifications { response } => {
                let _ = response.send(self.state.notifications());
            }
            SessionRequest::Notify {
                notification,
                response,
            } => {
                let _ = response.send(self.state.notify(notification));
            }
            SessionRequest::MarkRead { id, response } => {
                let _ = response.send(self.state.mark_read(id));
            }
            SessionRequest::ClearNotifications { response } => {
                self.state.clear_notifications();
                let _ = response.send(());
            }
            SessionRequest::Flow { kind, response } => {
                let _ = response.send(self.state.flow_view(kind));
            }
            SessionRequest::PrepareFlow {
                kind,
                order,
                response,
            } => {
                let result = self.state.prepare_flow(kind, order).map_err(ServiceError::from);
                let _ = response.send(result);
            }
            SessionRequest::EditFlow { kind, response } => {
                let result = self.state.edit_flow(kind).map_err(ServiceError::from);
                let _ = response.send(result);
            }
            SessionRequest::ConfirmFlow { kind, response } => {
                let _ = response.send(self.confirm_flow(kind));
            }
            SessionRequest::CompleteFlow {
                kind,
                order,
                generation,
                response,
            } => {
                let result = self
                    .state
                    .complete_flow(kind, &order, generation)
                    .map_err(ServiceError::from);
                let _ = response.send(result);
            }
            SessionRequest::RestartFlow { kind, response } => {
                let result = self.state.restart_flow(kind).map_err(ServiceError::from);
                let _ = response.send(result);
            }
            SessionRequest::History { response } => {
                let _ = response.send(self.state.history());
            }
            SessionRequest::InsightQuery { response } => {
                let _ = response.send(self.state.insight_query());
            }
            SessionRequest::Contacts { query, response } => {
                let _ = response.send(self.state.contacts(&query));
            }
            SessionRequest::AddContact { contact, response } => {
                let _ = response.send(self.add_contact(contact));
            }
            SessionRequest::CommitContact { contact, response } => {
                let result = self.state.add_contact(contact).map_err(ServiceError::from);
                let _ = response.send(result);
            }
            SessionRequest::Accounts { query, response } => {
                let _ = response.send(self.state.accounts(&query));
            }
            SessionRequest::CreateAccount { account, response } => {
                let _ = response.send(self.create_account(account));
            }
            SessionRequest::CommitAccount { account, response } => {
                let result = self.state.create_account(account).map_err(ServiceError::from);
                let _ = response.send(result);
            }
            SessionRequest::DeleteAccount { id, response } => {
                let result = self.state.delete_account(&id).map_err(ServiceError::from);
                let _ = response.send(result);
            }
            SessionRequest::Broadcast {
                broadcast,
                response,
            } => {
                let _ = response.send(self.broadcast(broadcast));
            }
            SessionRequest::CommitBroadcast {
                broadcast,
                response,
            } => {
                let result = self.state.broadcast(broadcast).map_err(ServiceError::from);
                let _ = response.send(result);
            }
            SessionRequest::Broadcasts { response } => {
                let _ = response.send(self.state.broadcasts());
            }
            SessionRequest::ClearBroadcasts { response } => {
                self.state.clear_broadcasts();
                let _ = response.send(());
            }
            SessionRequest::Liquidity { response } => {
                let _ = response.send(self.state.liquidity());
            }
            SessionRequest::InjectFunds { amount, response } => {
                let _ = response.send(self.inject_funds(amount));
            }
            SessionRequest::CommitInjection { amount, response } => {
                let result = self.state.inject_funds(amount).map_err(ServiceError::from);
                let _ = response.send(result);
            }
        }
    }
}

pub struct SessionService;

impl SessionService {
    pub fn new() -> Self {
        SessionService {}
    }
}

#[async_trait]
impl Service<SessionRequest, SessionRequestHandler> for SessionService {}

/// Request/response front for the session service.
#[derive(Clone)]
pub struct SessionClient {
    channel: mpsc::Sender<SessionRequest>,
}

impl SessionClient {
    pub fn new(channel: mpsc::Sender<SessionRequest>) -> Self {
        Self { channel }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> SessionRequest,
    ) -> Result<R, ServiceError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.channel
            .send(build(response_tx))
            .await
            .map_err(|e| ServiceError::Communication("Session".to_string(), e.to_string()))?;

        response_rx
            .await
            .map_err(|e| ServiceError::Communication("Session".to_string(), e.to_string()))
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, ServiceError> {
        self.request(|response| SessionRequest::Snapshot { response }).await
    }

    pub async fn login(&self, email: String) -> Result<Identity, ServiceError> {
        self.request(|response| SessionRequest::Login { email, response })
            .await
    }

    pub async fn logout(&self) -> Result<(), ServiceError> {
        self.request(|response| SessionRequest::Logout { response }).await
    }

    pub async fn update_identity(&self, update: IdentityUpdate) -> Result<Identity, ServiceError> {
        self.request(|response| SessionRequest::UpdateIdentity { update, response })
            .await?
    }

    pub async fn set_active_view(&self, view: View) -> Result<SessionSnapshot, ServiceError> {
        self.request(|response| SessionRequest::SetActiveView { view, response })
            .await
    }

    pub async fn open_contact(&self, contact_id: String, kind: FlowKind) -> Result<Handoff, ServiceError> {
        self.request(|response| SessionRequest::OpenContact {
            contact_id,
            kind,
            response,
        })
        .await?
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, ServiceError> {
        self.request(|response| SessionRequest::Notifications { response })
            .await
    }

    pub async fn notify(&self, notification: NewNotification) -> Result<Notification, ServiceError> {
        self.request(|response| SessionRequest::Notify {
            notification,
            response,
        })
        .await
    }

    pub async fn mark_read(&self, id: u64) -> Result<bool, ServiceError> {
        self.request(|response| SessionRequest::MarkRead { id, response })
            .await
    }

    pub async fn clear_notifications(&self) -> Result<(), ServiceError> {
        self.request(|response| SessionRequest::ClearNotifications { response })
            .await
    }

    pub async fn flow(&self, kind: FlowKind) -> Result<FlowView, ServiceError> {
        self.request(|response| SessionRequest::Flow { kind, response })
            .await
    }

    pub async fn prepare_flow(&self, kind: FlowKind, order: TransferOrder) -> Result<FlowState, ServiceError> {
        self.request(|response| SessionRequest::PrepareFlow {
            kind,
            order,
            response,
        })
        .await?
    }

    pub async fn edit_flow(&self, kind: FlowKind) -> Result<FlowState, ServiceError> {
        self.request(|response| SessionRequest::EditFlow { kind, response })
            .await?
    }

    pub async fn confirm_flow(&self, kind: FlowKind) -> Result<PendingTask<Receipt>, ServiceError> {
        self.request(|response| SessionRequest::ConfirmFlow { kind, response })
            .await?
    }

    pub async fn restart_flow(&self, kind: FlowKind) -> Result<FlowState, ServiceError> {
        self.request(|response| SessionRequest::RestartFlow { kind, response })
            .await?
    }

    pub async fn history(&self) -> Result<Vec<Transaction>, ServiceError> {
        self.request(|response| SessionRequest::History { response })
            .await
    }

    pub async fn insight_query(&self) -> Result<InsightQuery, ServiceError> {
        self.request(|response| SessionRequest::InsightQuery { response })
            .await
    }

    pub async fn contacts(&self, query: String) -> Result<Vec<Beneficiary>, ServiceError> {
        self.request(|response| SessionRequest::Contacts { query, response })
            .await
    }

    pub async fn add_contact(&self, contact: NewBeneficiary) -> Result<PendingTask<Beneficiary>, ServiceError> {
        self.request(|response| SessionRequest::AddContact { contact, response })
            .await?
    }

    pub async fn accounts(&self, query: String) -> Result<Vec<ManagedAccount>, ServiceError> {
        self.request(|response| SessionRequest::Accounts { query, response })
            .await
    }

    pub async fn create_account(&self, account: NewAccount) -> Result<PendingTask<ManagedAccount>, ServiceError> {
        self.request(|response| SessionRequest::CreateAccount { account, response })
            .await?
    }

    pub async fn delete_account(&self, id: String) -> Result<ManagedAccount, ServiceError> {
        self.request(|response| SessionRequest::DeleteAccount { id, response })
            .await?
    }

    pub async fn broadcast(&self, broadcast: NewBroadcast) -> Result<PendingTask<Broadcast>, ServiceError> {
        self.request(|response| SessionRequest::Broadcast {
            broadcast,
            response,
        })
        .await?
    }

    pub async fn broadcasts(&self) -> Result<Vec<Broadcast>, ServiceError> {
        self.request(|response| SessionRequest::Broadcasts { response })
            .await
    }

    pub async fn clear_broadcasts(&self) -> Result<(), ServiceError> {
        self.request(|response| SessionRequest::ClearBroadcasts { response })
            .await
    }

    pub async fn liquidity(&self) -> Result<Money, ServiceError> {
        self.request(|response| SessionRequest::Liquidity { response })
            .await
    }

    pub async fn inject_funds(&self, amount: Money) -> Result<PendingTask<Money>, ServiceError> {
        self.request(|response| SessionRequest::InjectFunds { amount, response })
            .await?
    }
}

/// Spawns a session service for tests and returns its client.
#[cfg(test)]
pub fn spawn_for_tests(delays: Delays) -> SessionClient {
    let (session_tx, mut session_rx) = mpsc::channel(64);
    let handler = SessionRequestHandler::new(AppState::new(), session_tx.downgrade(), delays);
    let mut service = SessionService::new();

    tokio::spawn(async move {
        service.run(handler, &mut session_rx).await;
    });

    SessionClient::new(session_tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contacts::ContactCategory;
    use crate::models::notifications::Category;
    use crate::models::transactions::{FlowStep, Recipient};
    use crate::models::users::ADMIN_EMAIL;
    use crate::services::tasks::TaskState;
    use crate::state::{ActionError, ValidationError};
    use assert_matches::assert_matches;

    fn delays(ms: u64) -> Delays {
        let delay = Duration::from_millis(ms);
        Delays {
            transfer: delay,
            donation: delay,
            account: delay,
            contact: delay,
            broadcast: delay,
            injection: delay,
        }
    }

    fn order(cents: i64) -> TransferOrder {
        TransferOrder {
            recipient: Recipient {
                name: "Jean Martin".to_string(),
                account: None,
            },
            amount: Money::from_cents(cents),
            note: None,
            instant: true,
        }
    }

    async fn with_balance(client: &SessionClient, cents: i64) {
        client.login("client@nexgen.com".to_string()).await.unwrap();
        client
            .update_identity(IdentityUpdate {
                balance: Some(Money::from_cents(cents)),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn confirmed_transfer_resolves_after_its_delay() {
        let client = spawn_for_tests(delays(200));
        with_balance(&client, 10_000).await;

        client.prepare_flow(FlowKind::Transfer, order(4_000)).await.unwrap();
        let mut task = client.confirm_flow(FlowKind::Transfer).await.unwrap();
        assert_matches!(task.state(), TaskState::Pending);

        // unrelated requests keep being served while the transfer is in flight
        let feed = client.notifications().await.unwrap();
        assert_eq!(feed.len(), 1);
        assert!(client.flow(FlowKind::Transfer).await.unwrap().state.processing);
        assert_matches!(
            client.confirm_flow(FlowKind::Transfer).await,
            Err(ServiceError::Action(ActionError::Validation(
                ValidationError::AlreadyProcessing(FlowKind::Transfer)
            )))
        );

        let receipt = task.wait().await.unwrap();
        assert_eq!(receipt.balance, Money::from_cents(6_000));

        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.identity.balance, Money::from_cents(6_000));
        assert_eq!(snapshot.unread_count, 2);
        let flow = client.flow(FlowKind::Transfer).await.unwrap();
        assert_eq!(flow.state.step, FlowStep::Completed);
        assert!(!flow.state.processing);

        let latest = &client.notifications().await.unwrap()[0];
        assert_eq!(latest.category, Category::Success);
        assert!(latest.message.contains("40") && latest.message.contains("Jean Martin"));
    }

    #[tokio::test]
    async fn over_limit_confirmation_is_rejected_up_front() {
        let client = spawn_for_tests(delays(0));
        with_balance(&client, 5_000).await;

        client.prepare_flow(FlowKind::Transfer, order(7_500)).await.unwrap();
        assert_matches!(
            client.confirm_flow(FlowKind::Transfer).await,
            Err(ServiceError::Action(ActionError::Validation(
                ValidationError::InsufficientFunds { .. }
            )))
        );

        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.identity.balance, Money::from_cents(5_000));
        assert_eq!(snapshot.unread_count, 1);
        assert_eq!(
            client.flow(FlowKind::Transfer).await.unwrap().state.step,
            FlowStep::Review
        );
    }

    #[tokio::test]
    async fn contact_and_account_creation_are_deferred() {
        let client = spawn_for_tests(delays(10));
        client.login("admin@nexgen.com".to_string()).await.unwrap();

        let contact = client
            .add_contact(NewBeneficiary {
                name: "Ada".to_string(),
                email: "ada@example.org".to_string(),
                account_number: "FR76 0000".to_string(),
                category: ContactCategory::Friends,
            })
            .await
            .unwrap()
            .wait()
            .await
            .unwrap();
        assert_eq!(client.contacts("ada".to_string()).await.unwrap()[0], contact);

        assert_matches!(
            client
                .create_account(NewAccount {
                    name: "Grace".to_string(),
                    email: String::new(),
                    balance: Money::ZERO,
                })
                .await,
            Err(ServiceError::Action(ActionError::Validation(
                ValidationError::MissingField("email")
            )))
        );

        let account = client
            .create_account(NewAccount {
                name: "Grace".to_string(),
                email: "grace@example.org".to_string(),
                balance: Money::from_cents(100),
            })
            .await
            .unwrap()
            .wait()
            .await
            .unwrap();
        assert_eq!(client.accounts(String::new()).await.unwrap()[0], account);
        assert!(client.notifications().await.unwrap()[0]
            .message
            .contains("Grace"));
    }

    #[tokio::test]
    async fn transfer_in_flight_is_dropped_by_a_new_login() {
        let client = spawn_for_tests(delays(100));
        with_balance(&client, 10_000).await;

        client.prepare_flow(FlowKind::Transfer, order(4_000)).await.unwrap();
        let task = client.confirm_flow(FlowKind::Transfer).await.unwrap();
        client.logout().await.unwrap();
        let admin = client.login(ADMIN_EMAIL.to_string()).await.unwrap();

        assert_matches!(
            task.wait().await,
            Err(ServiceError::Action(ActionError::SessionChanged))
        );
        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.identity.balance, admin.balance);
        assert_eq!(snapshot.unread_count, 1);
        assert_eq!(
            client.flow(FlowKind::Transfer).await.unwrap().state,
            FlowState::default()
        );
    }

    #[tokio::test]
    async fn broadcasts_and_injections_are_deferred() {
        let client = spawn_for_tests(delays(100));
        client.login(ADMIN_EMAIL.to_string()).await.unwrap();
        let before = client.liquidity().await.unwrap();

        assert_matches!(
            client.inject_funds(Money::ZERO).await,
            Err(ServiceError::Action(ActionError::Validation(
                ValidationError::NonPositiveAmount
            )))
        );

        let mut injection = client.inject_funds(Money::from_cents(10_000)).await.unwrap();
        let mut sent = client
            .broadcast(NewBroadcast {
                recipient_id: None,
                category: Category::Info,
                title: "Maintenance".to_string(),
                message: "Sunday 2am".to_string(),
            })
            .await
            .unwrap();
        assert_matches!(injection.state(), TaskState::Pending);
        assert_matches!(sent.state(), TaskState::Pending);
        assert_eq!(client.liquidity().await.unwrap(), before);
        assert!(client.broadcasts().await.unwrap().is_empty());

        let after = injection.wait().await.unwrap();
        assert_eq!(after.checked_sub(before), Some(Money::from_cents(10_000)));
        let entry = sent.wait().await.unwrap();
        assert_eq!(entry.recipient, "All users");
        assert_eq!(client.broadcasts().await.unwrap().len(), 1);
        assert_eq!(client.notifications().await.unwrap()[0].title, "Maintenance");
    }

    #[tokio::test]
    async fn hand_off_survives_only_inside_its_scope() {
        let client = spawn_for_tests(delays(0));
        client.login("client@nexgen.com".to_string()).await.unwrap();

        client
            .open_contact("b4".to_string(), FlowKind::Transfer)
            .await
            .unwrap();
        let prefill = client.flow(FlowKind::Transfer).await.unwrap().prefill;
        assert_eq!(prefill.map(|r| r.name), Some("Luc Martin".to_string()));

        let snapshot = client.set_active_view(View::Profile).await.unwrap();
        assert!(snapshot.handoff.is_none());
    }
}

use std::fmt;

use tokio::sync::oneshot::{self, error::TryRecvError};

use super::ServiceError;

pub type TaskSender<T> = oneshot::Sender<Result<T, ServiceError>>;

#[derive(Debug)]
pub enum TaskState<'a, T> {
    Pending,
    Succeeded(&'a T),
    Failed(&'a ServiceError),
}

/// Handle on a simulated operation whose result arrives after its artificial
/// latency.
pub struct PendingTask<T> {
    slot: Slot<T>,
}

enum Slot<T> {
    Waiting(oneshot::Receiver<Result<T, ServiceError>>),
    Done(Result<T, ServiceError>),
}

impl<T> PendingTask<T> {
    pub fn channel() -> (TaskSender<T>, Self) {
        let (sender, receiver) = oneshot::channel();

        (
            sender,
            Self {
                slot: Slot::Waiting(receiver),
            },
        )
    }

    pub fn state(&mut self) -> TaskState<'_, T> {
        if let Slot::Waiting(receiver) = &mut self.slot {
            let outcome = match receiver.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty) => return TaskState::Pending,
                Err(TryRecvError::Closed) => Err(dropped()),
            };
            self.slot = Slot::Done(outcome);
        }

        match &self.slot {
            Slot::Waiting(_) => TaskState::Pending,
            Slot::Done(Ok(value)) => TaskState::Succeeded(value),
            Slot::Done(Err(e)) => TaskState::Failed(e),
        }
    }

    pub async fn wait(self) -> Result<T, ServiceError> {
        match self.slot {
            Slot::Done(outcome) => outcome,
            Slot::Waiting(receiver) => receiver.await.map_err(|_| dropped())?,
        }
    }
}

impl<T> fmt::Debug for PendingTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.slot {
            Slot::Waiting(_) => "Waiting",
            Slot::Done(Ok(_)) => "Succeeded",
            Slot::Done(Err(_)) => "Failed",
        };

        f.debug_struct("PendingTask").field("state", &state).finish()
    }
}

fn dropped() -> ServiceError {
    ServiceError::Communication(
        "Task".to_string(),
        "continuation dropped before completing".to_string(),
    )
}

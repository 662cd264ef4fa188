//! Transaction scope coalescing stack and association mutations.

use crate::app::instance::InstanceId;
use crate::app::launch::LaunchRequest;
use crate::app::screens::PresentationUnit;

/// One deferred mutation, replayed at commit.
#[derive(Debug, Clone)]
pub(crate) enum QueuedMutation {
    /// A launch whose resolution waits for commit, so it sees the stack
    /// as shaped by the mutations queued before it.
    Launch(LaunchRequest),

    /// Replace the units of a specific instance.
    AssignUnits {
        target: InstanceId,
        units: Vec<PresentationUnit>,
        animated: bool,
    },

    /// Replace the units of the most recent instance with the name;
    /// the name resolves when the commit replays.
    AssignUnitsByName {
        name: String,
        units: Vec<PresentationUnit>,
        animated: bool,
    },
}

/// An open transaction. Mutations queue here untouched until commit;
/// replay happens in queue order, so the last update per instance wins
/// and earlier ones are never externally observable.
#[derive(Default)]
pub(crate) struct Transaction {
    queue: Vec<QueuedMutation>,
}

impl Transaction {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn queue(&mut self, mutation: QueuedMutation) {
        self.queue.push(mutation);
    }

    pub(crate) fn into_queue(self) -> Vec<QueuedMutation> {
        self.queue
    }
}

//! Pure launch-mode resolution.

use crate::app::instance::InstanceId;
use crate::app::launch::{LaunchMode, LaunchRequest};
use crate::app::stack::AppStack;

/// Stack mutation computed from one launch request.
///
/// Plans are computed against a stack state and applied under the same
/// lock, so `AppStack::apply` never fails on one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationPlan {
    /// Append a new instance at the tail.
    Push,

    /// Move an existing instance to the tail, preserving its identity
    /// and presentation units.
    Promote { id: InstanceId },

    /// Remove the listed instances, then append a new one.
    ClearAndPush { remove: Vec<InstanceId> },
}

/// Compute the stack mutation for `request` against `stack`.
///
/// "Most recent" always means closest to the tail. `LaunchMode` is a
/// closed enum, so every request resolves; unrecognized mode values are
/// rejected earlier, when parsed (`LaunchMode::from_str`).
pub fn resolve(request: &LaunchRequest, stack: &AppStack) -> MutationPlan {
    match request.launch_mode {
        LaunchMode::Push => MutationPlan::Push,

        LaunchMode::Singleton => match stack.find_by_name(&request.name) {
            Some(existing) => MutationPlan::Promote { id: existing.id() },
            None => MutationPlan::Push,
        },

        LaunchMode::SingleTop => match stack.current() {
            Some(current) if current.name() == request.name => {
                MutationPlan::Promote { id: current.id() }
            }
            _ => MutationPlan::Push,
        },

        LaunchMode::ClearTop => {
            if !request.app_clear_top {
                return MutationPlan::Push;
            }
            let remove: Vec<InstanceId> = stack
                .find_all_by_name(&request.name)
                .iter()
                .map(|app| app.id())
                .collect();
            MutationPlan::ClearAndPush { remove }
        }
    }
}

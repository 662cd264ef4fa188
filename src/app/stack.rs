//! Ordered container of resident application instances.

use std::sync::Arc;

use log::{debug, info};

use crate::app::instance::{AppLifecycle, InstanceId, MicroApplication};
use crate::app::launch::LaunchRequest;
use crate::app::resolver::MutationPlan;
use crate::config;

/// Outcome of one applied mutation.
pub(crate) struct AppliedMutation {
    /// The instance now at the tail.
    pub current: Arc<MicroApplication>,
    /// Instances removed by a clear-top plan, already marked destroyed.
    pub removed: Vec<InstanceId>,
}

/// The application stack. The tail is the current, visible application;
/// the sequence only shrinks through clear-top removal, so it is never
/// observed empty once a first launch succeeded.
#[derive(Default)]
pub struct AppStack {
    entries: Vec<Arc<MicroApplication>>,
}

impl AppStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reverse scan from the tail; first instance whose name matches.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<MicroApplication>> {
        self.entries
            .iter()
            .rev()
            .find(|app| app.name() == name)
            .cloned()
    }

    /// Every instance with the name, tail-to-head order.
    pub fn find_all_by_name(&self, name: &str) -> Vec<Arc<MicroApplication>> {
        self.entries
            .iter()
            .rev()
            .filter(|app| app.name() == name)
            .cloned()
            .collect()
    }

    /// The tail instance, or none while nothing has launched yet.
    pub fn current(&self) -> Option<Arc<MicroApplication>> {
        self.entries.last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn contains(&self, id: InstanceId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: InstanceId) -> Option<usize> {
        self.entries.iter().position(|app| app.id() == id)
    }

    /// Execute a resolved plan as one atomic step from the caller's
    /// perspective. Plans come from `resolver::resolve` against this same
    /// stack state, so lookups here cannot miss.
    pub(crate) fn apply(&mut self, request: &LaunchRequest, plan: MutationPlan) -> AppliedMutation {
        let applied = match plan {
            MutationPlan::Push => {
                let app = self.push_new(request);
                info!("launched application '{}' ({})", app.name(), request.launch_mode);
                AppliedMutation { current: app, removed: Vec::new() }
            }
            MutationPlan::Promote { id } => {
                let app = self.promote(id);
                info!("promoted application '{}' to the stack tail", app.name());
                AppliedMutation { current: app, removed: Vec::new() }
            }
            MutationPlan::ClearAndPush { remove } => {
                let mut removed = Vec::new();
                for id in remove {
                    if let Some(index) = self.index_of(id) {
                        let app = self.entries.remove(index);
                        app.set_lifecycle(AppLifecycle::Destroyed);
                        removed.push(app.id());
                    }
                }
                let app = self.push_new(request);
                info!(
                    "launched application '{}' clearing {} prior instance(s)",
                    app.name(),
                    removed.len()
                );
                AppliedMutation { current: app, removed }
            }
        };

        if config::context_config().trace_stack {
            let names: Vec<&str> = self.entries.iter().map(|app| app.name()).collect();
            debug!("application stack (head to tail): {names:?}");
        }

        applied
    }

    fn push_new(&mut self, request: &LaunchRequest) -> Arc<MicroApplication> {
        if let Some(previous) = self.entries.last() {
            previous.set_lifecycle(AppLifecycle::Background);
        }
        let app = Arc::new(MicroApplication::from_request(request));
        self.entries.push(Arc::clone(&app));
        app
    }

    fn promote(&mut self, id: InstanceId) -> Arc<MicroApplication> {
        let index = self
            .index_of(id)
            .expect("promoted instance must be on the stack");
        let app = self.entries.remove(index);
        if let Some(previous) = self.entries.last() {
            previous.set_lifecycle(AppLifecycle::Background);
        }
        app.set_lifecycle(AppLifecycle::Active);
        self.entries.push(Arc::clone(&app));
        app
    }
}

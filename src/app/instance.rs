use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::app::launch::{LaunchMode, LaunchRequest, Params};

/// Stable identity of one application instance on the stack.
///
/// Identities are never reused; a promoted instance keeps its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub uuid::Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of an application instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycle {
    /// Instance is the stack tail, visible to the user.
    Active,

    /// Instance is resident below the tail, state preserved.
    Background,

    /// Instance was removed from the stack.
    Destroyed,
}

/// One micro-application resident on the stack.
///
/// Instances are created and destroyed exclusively by the stack manager;
/// everyone else holds `Arc` references, which may outlive the stack
/// entry (a destroyed instance reports `AppLifecycle::Destroyed`).
pub struct MicroApplication {
    id: InstanceId,
    name: String,
    params: Params,
    launch_mode: LaunchMode,
    source_id: Option<String>,
    lifecycle: RwLock<AppLifecycle>,
}

impl MicroApplication {
    pub(crate) fn from_request(request: &LaunchRequest) -> Self {
        Self {
            id: InstanceId::new(),
            name: request.name.clone(),
            params: request.params.clone(),
            launch_mode: request.launch_mode,
            source_id: request.source_id.clone(),
            lifecycle: RwLock::new(AppLifecycle::Active),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Application name; may repeat across instances on the stack.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The opaque parameter bag the instance was launched with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn launch_mode(&self) -> LaunchMode {
        self.launch_mode
    }

    /// Identity of the launcher, when one was given.
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    pub fn lifecycle(&self) -> AppLifecycle {
        *self.lifecycle.read().unwrap()
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle() == AppLifecycle::Active
    }

    // Lifecycle transitions are driven by stack mutations only.
    pub(crate) fn set_lifecycle(&self, state: AppLifecycle) {
        *self.lifecycle.write().unwrap() = state;
    }
}

impl fmt::Debug for MicroApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicroApplication")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("launch_mode", &self.launch_mode)
            .field("lifecycle", &self.lifecycle())
            .finish_non_exhaustive()
    }
}

impl PartialEq for MicroApplication {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MicroApplication {}

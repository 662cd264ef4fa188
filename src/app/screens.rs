use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::app::instance::InstanceId;

/// Opaque handle for one unit of visible content.
///
/// The owning application instance creates units; this layer only records
/// which instance they belong to and never renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresentationUnit(uuid::Uuid);

impl PresentationUnit {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    pub fn raw(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for PresentationUnit {
    fn default() -> Self {
        Self::new()
    }
}

/// Records which presentation units each resident instance owns, in
/// order. Associations of destroyed instances are dropped by the context
/// when the stack reports removals.
#[derive(Default)]
pub(crate) struct ScreenTable {
    units: HashMap<InstanceId, Vec<PresentationUnit>>,
}

impl ScreenTable {
    /// Units currently associated, empty if none.
    pub(crate) fn get(&self, id: InstanceId) -> Vec<PresentationUnit> {
        self.units.get(&id).cloned().unwrap_or_default()
    }

    /// Replace the association atomically; the previous list is
    /// discarded, not merged.
    pub(crate) fn set(&mut self, id: InstanceId, units: Vec<PresentationUnit>) {
        self.units.insert(id, units);
    }

    pub(crate) fn remove(&mut self, id: InstanceId) {
        self.units.remove(&id);
    }
}

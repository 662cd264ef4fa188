//! Seam to the rendering collaborator.

use std::sync::Arc;

use crate::app::instance::MicroApplication;
use crate::app::screens::PresentationUnit;

/// Snapshot handed to the presenter after each externally-observable
/// change: one per applied launch, one per committed transaction.
///
/// Updates are self-contained; implementations render from the snapshot
/// and have no reason to query the context back.
#[derive(Clone)]
pub struct DisplayUpdate {
    /// The instance now at the stack tail, if any launch succeeded yet.
    pub current: Option<Arc<MicroApplication>>,
    /// Units associated with the current instance, in order.
    pub units: Vec<PresentationUnit>,
    /// Animation hint from the triggering request or association update.
    pub animated: bool,
}

/// Implemented by whatever owns the display surface.
///
/// The core never renders; it pushes snapshots here, and a returned error
/// is logged, not propagated. A collaborator failure is not a failure of
/// the orchestration core.
pub trait ScreenPresenter: Send + Sync {
    fn present(&self, update: &DisplayUpdate) -> anyhow::Result<()>;
}

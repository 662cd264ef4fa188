//! In-process micro-application orchestration.
//!
//! A [`Context`] manages a stack of concurrently-resident application
//! instances inside one host process: launch-mode resolution (push /
//! singleton / singleTop / clearTop), a chain of pluggable launch
//! handlers, a named service registry, display transactions that batch
//! mutations into one observable update, and the instance→screen
//! association table. Rendering itself lives behind the
//! [`ScreenPresenter`] seam; this crate never draws anything.

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod presenter;

pub use app::instance::{AppLifecycle, InstanceId, MicroApplication};
pub use app::launch::{LaunchMode, LaunchRequest, Params};
pub use app::resolver::MutationPlan;
pub use app::screens::PresentationUnit;
pub use app::stack::AppStack;
pub use config::{ContextConfig, context_config, reload_context_config};
pub use context::Context;
pub use context::handlers::StartApplicationHandler;
pub use context::services::ServiceRef;
pub use error::ContextError;
pub use presenter::{DisplayUpdate, ScreenPresenter};

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

// Process-wide Context instance. Nothing is created before first access.
static CONTEXT: Lazy<RwLock<Option<Arc<Context>>>> = Lazy::new(|| RwLock::new(None));

/// Get the process-wide [`Context`], creating it on first access.
pub fn context() -> Arc<Context> {
    if let Some(ctx) = CONTEXT.read().unwrap().as_ref() {
        return Arc::clone(ctx);
    }
    let mut slot = CONTEXT.write().unwrap();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(Context::new())))
}

/// Drop the process-wide [`Context`] so the next access starts fresh.
///
/// Intended for test isolation. Live `Arc` handles keep the old instance
/// alive; they simply stop being the process-wide one.
pub fn reset_context() {
    CONTEXT.write().unwrap().take();
}

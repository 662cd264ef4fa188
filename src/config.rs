//! Process-wide runtime configuration.

use std::sync::Arc;

use arc_swap::ArcSwap;
use once_cell::sync::OnceCell;

/// Defaults consulted when building launch requests, plus diagnostics
/// switches. Replaced atomically as a whole; readers always see a
/// consistent record.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Whether launches present with animation unless the request says
    /// otherwise.
    pub default_animated: bool,
    /// Dump the stack contents at debug level after every applied
    /// mutation.
    pub trace_stack: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            default_animated: true,
            trace_stack: false,
        }
    }
}

// Global ContextConfig instance (ArcSwap for lock-free atomic updates)
static CONTEXT_CONFIG: OnceCell<ArcSwap<ContextConfig>> = OnceCell::new();

fn config_cell() -> &'static ArcSwap<ContextConfig> {
    CONTEXT_CONFIG.get_or_init(|| ArcSwap::from_pointee(ContextConfig::default()))
}

/// Get a clone of the current ContextConfig Arc.
pub fn context_config() -> Arc<ContextConfig> {
    config_cell().load_full()
}

/// Replace the process-wide ContextConfig (e.g. when settings change).
pub fn reload_context_config(config: ContextConfig) {
    config_cell().store(Arc::new(config));
}

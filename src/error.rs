//! Public failure taxonomy.

use thiserror::Error;

/// Errors reported by context operations.
///
/// Nothing here is fatal to the process; every failure is recoverable by
/// retrying with corrected input. The core performs no retries itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// No handler accepted the request and no launch plan was possible.
    #[error("no application or handler can satisfy '{name}'")]
    AppNotFound {
        /// The requested application name.
        name: String,
    },

    /// A mode string did not name a known launch mode.
    #[error("unrecognized launch mode: {0}")]
    InvalidLaunchMode(String),

    /// A service with the same name is already registered.
    #[error("service already registered: {name}")]
    ServiceNameConflict {
        /// The conflicting registry key.
        name: String,
    },

    /// A transaction was opened while another is still uncommitted.
    #[error("an application transaction is already open")]
    TransactionAlreadyOpen,
}

//! Chain-of-responsibility launch interception.

use std::sync::{Arc, RwLock};

use log::debug;

use crate::app::launch::LaunchRequest;

/// Capability pair for intercepting application launches.
///
/// `can_handle` is a pure predicate consulted by dry runs and must not
/// perform side effects; `handle` may, and returns true when the request
/// is fully handled, in which case the default stack launch never runs.
pub trait StartApplicationHandler: Send + Sync {
    fn can_handle(&self, request: &LaunchRequest) -> bool;
    fn handle(&self, request: &LaunchRequest) -> bool;
}

/// Registered handlers, insertion order = priority order.
#[derive(Default)]
pub(crate) struct HandlerChain {
    handlers: RwLock<Vec<Arc<dyn StartApplicationHandler>>>,
}

impl HandlerChain {
    pub(crate) fn register(&self, handler: Arc<dyn StartApplicationHandler>) -> bool {
        let mut handlers = self.handlers.write().unwrap();
        handlers.push(handler);
        debug!("registered start-application handler ({} in chain)", handlers.len());
        true
    }

    /// Removes the first matching reference. An absent handler is a
    /// no-op reported as success.
    pub(crate) fn unregister(&self, handler: &Arc<dyn StartApplicationHandler>) -> bool {
        let mut handlers = self.handlers.write().unwrap();
        if let Some(index) = handlers.iter().position(|h| Arc::ptr_eq(h, handler)) {
            handlers.remove(index);
            debug!("unregistered start-application handler ({} in chain)", handlers.len());
        }
        true
    }

    /// First handler whose `handle` returns true wins and stops the
    /// chain. The lock is not held across handler calls so a handler may
    /// mutate the chain from inside `handle`.
    pub(crate) fn dispatch(&self, request: &LaunchRequest) -> bool {
        let handlers = self.handlers.read().unwrap().clone();
        handlers.iter().any(|h| h.handle(request))
    }

    /// Dry run over the pure predicates only.
    pub(crate) fn can_any_handle(&self, request: &LaunchRequest) -> bool {
        let handlers = self.handlers.read().unwrap().clone();
        handlers.iter().any(|h| h.can_handle(request))
    }
}

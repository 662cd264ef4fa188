//! Named service registry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::debug;

use crate::error::ContextError;

/// Shared reference to a registered service instance.
pub type ServiceRef = Arc<dyn Any + Send + Sync>;

/// Pure name→reference lookup. The registry owns the mapping, never the
/// service lifetime, and infers nothing from the instance's shape.
#[derive(Default)]
pub(crate) struct ServiceRegistry {
    entries: RwLock<HashMap<String, ServiceRef>>,
}

impl ServiceRegistry {
    /// Register under a unique name. Duplicates are rejected, never
    /// overwritten; callers must unregister first.
    pub(crate) fn register(&self, name: &str, service: ServiceRef) -> Result<(), ContextError> {
        let mut entries = self.entries.write().unwrap();
        if entries.contains_key(name) {
            return Err(ContextError::ServiceNameConflict { name: name.to_string() });
        }
        debug!("registered service: {name}");
        entries.insert(name.to_string(), service);
        Ok(())
    }

    /// Remove the mapping if present, no-op otherwise.
    pub(crate) fn unregister(&self, name: &str) {
        if self.entries.write().unwrap().remove(name).is_some() {
            debug!("unregistered service: {name}");
        }
    }

    pub(crate) fn find(&self, name: &str) -> Option<ServiceRef> {
        self.entries.read().unwrap().get(name).cloned()
    }

    /// Convenience downcast; the caller asserts the concrete type.
    pub(crate) fn find_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.find(name).and_then(|service| service.downcast::<T>().ok())
    }
}

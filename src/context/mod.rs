//! The orchestration facade.
//!
//! One `Context` ties the stack manager, launch resolution, handler
//! chain, service registry, transactions, and screen associations behind
//! a single API. Every stack or association mutation (and read) goes
//! through one state lock, the single logical execution context, so no
//! two mutations ever interleave, and reads during an open transaction
//! observe committed state only.

pub mod handlers;
pub mod services;
pub mod transaction;

use std::sync::{Arc, Mutex, RwLock};

use log::{debug, info, warn};

use crate::app::instance::MicroApplication;
use crate::app::launch::{LaunchMode, LaunchRequest, Params};
use crate::app::resolver;
use crate::app::screens::{PresentationUnit, ScreenTable};
use crate::app::stack::AppStack;
use crate::config;
use crate::error::ContextError;
use crate::presenter::{DisplayUpdate, ScreenPresenter};
use handlers::{HandlerChain, StartApplicationHandler};
use services::{ServiceRef, ServiceRegistry};
use transaction::{QueuedMutation, Transaction};

/// Mutable core guarded by the state lock.
#[derive(Default)]
struct CoreState {
    stack: AppStack,
    screens: ScreenTable,
    transaction: Option<Transaction>,
}

/// In-process micro-application orchestration: application stack, launch
/// interception, named services, display transactions, and screen
/// associations.
///
/// Obtain the process-wide instance through [`crate::context`], or build
/// standalone instances (e.g. in tests) with [`Context::new`].
pub struct Context {
    core: Mutex<CoreState>,
    services: ServiceRegistry,
    handlers: HandlerChain,
    presenter: RwLock<Option<Arc<dyn ScreenPresenter>>>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            core: Mutex::new(CoreState::default()),
            services: ServiceRegistry::default(),
            handlers: HandlerChain::default(),
            presenter: RwLock::new(None),
        }
    }

    // --- launching ---

    /// Start an application, or hand the request to the first accepting
    /// launch handler. While a transaction is open the stack mutation is
    /// queued until commit.
    pub fn start_application(&self, request: LaunchRequest) -> Result<(), ContextError> {
        self.launch(request, false)
    }

    /// Convenience variant taking the launch mode as an untyped string,
    /// e.g. from a routing table. Unknown modes are rejected with
    /// [`ContextError::InvalidLaunchMode`].
    pub fn start_application_named(
        &self,
        name: &str,
        params: Params,
        launch_mode: &str,
    ) -> Result<(), ContextError> {
        let mode: LaunchMode = launch_mode.parse()?;
        self.launch(
            LaunchRequest::new(name).with_params(params).with_launch_mode(mode),
            false,
        )
    }

    /// Synchronous logon launch: never deferred. Applies immediately even
    /// while a transaction is open, with its own display update.
    pub fn start_logon_application_for_sync(
        &self,
        request: LaunchRequest,
    ) -> Result<(), ContextError> {
        self.launch(request, true)
    }

    fn launch(&self, request: LaunchRequest, bypass_transaction: bool) -> Result<(), ContextError> {
        // Interception runs at call time even when the stack mutation
        // would be queued; a fully handled request queues nothing.
        if self.handlers.dispatch(&request) {
            info!("launch of '{}' taken by a registered handler", request.name);
            return Ok(());
        }

        // No handler accepted, and the resolver has no plan for a blank
        // name.
        if request.name.trim().is_empty() {
            return Err(ContextError::AppNotFound { name: request.name });
        }

        let mut core = self.core.lock().unwrap();
        if let Some(tx) = core.transaction.as_mut() {
            if !bypass_transaction {
                tx.queue(QueuedMutation::Launch(request));
                return Ok(());
            }
            warn!(
                "synchronous launch of '{}' while a transaction is open",
                request.name
            );
        }

        let animated = request.animated;
        Self::apply_launch(&mut core, &request);
        let update = Self::snapshot(&core, animated);
        drop(core);
        self.notify_presenter(update);
        Ok(())
    }

    fn apply_launch(core: &mut CoreState, request: &LaunchRequest) {
        let plan = resolver::resolve(request, &core.stack);
        let applied = core.stack.apply(request, plan);
        for id in applied.removed {
            core.screens.remove(id);
        }
    }

    /// Dry run: would this request be satisfied, without invoking any
    /// handler's side effects or mutating the stack.
    pub fn can_handle_start_application(&self, name: &str, params: &Params) -> bool {
        let probe = LaunchRequest::new(name).with_params(params.clone());
        if self.handlers.can_any_handle(&probe) {
            return true;
        }
        // The default resolver satisfies any non-blank name.
        !name.trim().is_empty()
    }

    // --- stack queries ---

    /// Reverse scan of the stack; the most recently launched instance
    /// with the name.
    pub fn find_application_by_name(&self, name: &str) -> Option<Arc<MicroApplication>> {
        self.core.lock().unwrap().stack.find_by_name(name)
    }

    /// Every resident instance with the name, tail-to-head order.
    pub fn find_applications_by_name(&self, name: &str) -> Vec<Arc<MicroApplication>> {
        self.core.lock().unwrap().stack.find_all_by_name(name)
    }

    /// The instance currently visible to the user, if any.
    pub fn current_application(&self) -> Option<Arc<MicroApplication>> {
        self.core.lock().unwrap().stack.current()
    }

    // --- services ---

    /// Register a service under a unique name. Duplicates are rejected,
    /// never overwritten.
    pub fn register_service(&self, name: &str, service: ServiceRef) -> Result<(), ContextError> {
        self.services.register(name, service)
    }

    /// Remove a service mapping if present, no-op otherwise.
    pub fn unregister_service(&self, name: &str) {
        self.services.unregister(name)
    }

    pub fn find_service_by_name(&self, name: &str) -> Option<ServiceRef> {
        self.services.find(name)
    }

    /// Typed lookup; `None` when the name is absent or the type does not
    /// match.
    pub fn find_service_as<T: std::any::Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.services.find_as::<T>(name)
    }

    // --- launch handlers ---

    pub fn register_start_application_handler(
        &self,
        handler: Arc<dyn StartApplicationHandler>,
    ) -> bool {
        self.handlers.register(handler)
    }

    /// Removing a handler that was never registered is a successful
    /// no-op.
    pub fn unregister_start_application_handler(
        &self,
        handler: &Arc<dyn StartApplicationHandler>,
    ) -> bool {
        self.handlers.unregister(handler)
    }

    // --- transactions ---

    /// Open a transaction. Returns false, leaving state untouched, when
    /// one is already open; nesting is rejected, not queued.
    pub fn begin_app_transaction(&self) -> bool {
        match self.try_begin_app_transaction() {
            Ok(()) => true,
            Err(err) => {
                warn!("{err}");
                false
            }
        }
    }

    /// Result-flavored [`Self::begin_app_transaction`].
    pub fn try_begin_app_transaction(&self) -> Result<(), ContextError> {
        let mut core = self.core.lock().unwrap();
        if core.transaction.is_some() {
            return Err(ContextError::TransactionAlreadyOpen);
        }
        core.transaction = Some(Transaction::new());
        Ok(())
    }

    /// Replay queued mutations in order and surface one display update.
    /// Without an open transaction this is a no-op.
    pub fn commit_app_transaction(&self) {
        let mut core = self.core.lock().unwrap();
        let Some(tx) = core.transaction.take() else {
            return;
        };

        let mut animated = config::context_config().default_animated;
        let queued = tx.into_queue();
        let count = queued.len();
        for mutation in queued {
            match mutation {
                QueuedMutation::Launch(request) => {
                    animated = request.animated;
                    Self::apply_launch(&mut core, &request);
                }
                QueuedMutation::AssignUnits { target, units, animated: hint } => {
                    if core.stack.contains(target) {
                        core.screens.set(target, units);
                        animated = hint;
                    }
                }
                QueuedMutation::AssignUnitsByName { name, units, animated: hint } => {
                    if let Some(app) = core.stack.find_by_name(&name) {
                        core.screens.set(app.id(), units);
                        animated = hint;
                    }
                }
            }
        }

        info!("committed application transaction ({count} mutation(s))");
        let update = Self::snapshot(&core, animated);
        drop(core);
        self.notify_presenter(update);
    }

    // --- screen associations ---

    /// Units associated with the given instance, empty if none.
    pub fn presentation_units_of(&self, app: &MicroApplication) -> Vec<PresentationUnit> {
        self.core.lock().unwrap().screens.get(app.id())
    }

    /// Units of the most recent instance with the name; `None` when no
    /// such instance is resident.
    pub fn presentation_units_of_application(&self, name: &str) -> Option<Vec<PresentationUnit>> {
        let core = self.core.lock().unwrap();
        let app = core.stack.find_by_name(name)?;
        Some(core.screens.get(app.id()))
    }

    /// Replace the units of the given instance. Subject to transaction
    /// queueing; `animated` is a presentation hint only.
    pub fn set_presentation_units(
        &self,
        app: &MicroApplication,
        units: Vec<PresentationUnit>,
        animated: bool,
    ) {
        let mut core = self.core.lock().unwrap();
        if let Some(tx) = core.transaction.as_mut() {
            tx.queue(QueuedMutation::AssignUnits { target: app.id(), units, animated });
            return;
        }
        if !core.stack.contains(app.id()) {
            debug!("ignored unit update for non-resident instance {}", app.id());
            return;
        }
        core.screens.set(app.id(), units);
        let update = Self::snapshot(&core, animated);
        drop(core);
        self.notify_presenter(update);
    }

    /// Replace the units of the most recent instance with the name,
    /// resolved by reverse scan — at commit time when a transaction is
    /// open.
    pub fn set_presentation_units_for_application(
        &self,
        name: &str,
        units: Vec<PresentationUnit>,
        animated: bool,
    ) {
        let mut core = self.core.lock().unwrap();
        if let Some(tx) = core.transaction.as_mut() {
            tx.queue(QueuedMutation::AssignUnitsByName {
                name: name.to_string(),
                units,
                animated,
            });
            return;
        }
        match core.stack.find_by_name(name) {
            Some(app) => {
                core.screens.set(app.id(), units);
                let update = Self::snapshot(&core, animated);
                drop(core);
                self.notify_presenter(update);
            }
            None => debug!("no resident application named '{name}' to associate units with"),
        }
    }

    // --- presenter ---

    /// Attach the rendering collaborator that receives display updates.
    pub fn set_presenter(&self, presenter: Arc<dyn ScreenPresenter>) {
        *self.presenter.write().unwrap() = Some(presenter);
    }

    fn snapshot(core: &CoreState, animated: bool) -> DisplayUpdate {
        let current = core.stack.current();
        let units = current
            .as_ref()
            .map(|app| core.screens.get(app.id()))
            .unwrap_or_default();
        DisplayUpdate { current, units, animated }
    }

    fn notify_presenter(&self, update: DisplayUpdate) {
        let presenter = self.presenter.read().unwrap().clone();
        if let Some(presenter) = presenter {
            if let Err(err) = presenter.present(&update) {
                warn!("presenter rejected display update: {err:#}");
            }
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

//! End-to-end coverage of interception, services, transactions, and the
//! presenter seam.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use micro_context::{
    Context, ContextError, DisplayUpdate, LaunchRequest, Params, PresentationUnit,
    ScreenPresenter, StartApplicationHandler,
};

/// Handler accepting a single application name, counting its launches.
struct NamedHandler {
    accepts: &'static str,
    handled: AtomicUsize,
}

impl NamedHandler {
    fn new(accepts: &'static str) -> Arc<Self> {
        Arc::new(Self { accepts, handled: AtomicUsize::new(0) })
    }

    fn handled(&self) -> usize {
        self.handled.load(Ordering::SeqCst)
    }
}

impl StartApplicationHandler for NamedHandler {
    fn can_handle(&self, request: &LaunchRequest) -> bool {
        request.name == self.accepts
    }

    fn handle(&self, request: &LaunchRequest) -> bool {
        if request.name != self.accepts {
            return false;
        }
        self.handled.fetch_add(1, Ordering::SeqCst);
        true
    }
}

/// Presenter recording every display update it receives.
#[derive(Default)]
struct RecordingPresenter {
    updates: Mutex<Vec<(Option<String>, Vec<PresentationUnit>, bool)>>,
}

impl RecordingPresenter {
    fn updates(&self) -> Vec<(Option<String>, Vec<PresentationUnit>, bool)> {
        self.updates.lock().unwrap().clone()
    }
}

impl ScreenPresenter for RecordingPresenter {
    fn present(&self, update: &DisplayUpdate) -> anyhow::Result<()> {
        self.updates.lock().unwrap().push((
            update.current.as_ref().map(|app| app.name().to_string()),
            update.units.clone(),
            update.animated,
        ));
        Ok(())
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn handlers_intercept_before_the_stack_launch() {
    init_logs();
    let ctx = Context::new();
    let login = NamedHandler::new("Login");
    assert!(ctx.register_start_application_handler(login.clone()));

    ctx.start_application(LaunchRequest::new("Login")).unwrap();
    assert_eq!(login.handled(), 1);
    // The handler took it: no stack instance was ever created.
    assert!(ctx.find_application_by_name("Login").is_none());
    assert!(ctx.current_application().is_none());

    // The dry run reports true and still mutates nothing.
    assert!(ctx.can_handle_start_application("Login", &Params::new()));
    assert_eq!(login.handled(), 1);
    assert!(ctx.current_application().is_none());

    // Other names fall through to the default launch.
    ctx.start_application(LaunchRequest::new("Home")).unwrap();
    assert_eq!(ctx.current_application().unwrap().name(), "Home");
}

#[test]
fn unregistered_handlers_stop_intercepting() {
    let ctx = Context::new();
    let login = NamedHandler::new("Login");
    ctx.register_start_application_handler(login.clone());

    let handle: Arc<dyn StartApplicationHandler> = login.clone();
    assert!(ctx.unregister_start_application_handler(&handle));
    // Unregistering again stays a successful no-op.
    assert!(ctx.unregister_start_application_handler(&handle));

    ctx.start_application(LaunchRequest::new("Login")).unwrap();
    assert_eq!(login.handled(), 0);
    assert_eq!(ctx.current_application().unwrap().name(), "Login");
}

#[test]
fn can_handle_is_false_only_for_unsatisfiable_requests() {
    let ctx = Context::new();
    // The default resolver satisfies any non-blank name.
    assert!(ctx.can_handle_start_application("Anything", &Params::new()));
    assert!(!ctx.can_handle_start_application("  ", &Params::new()));
}

#[test]
fn duplicate_service_registration_keeps_the_first() {
    let ctx = Context::new();
    ctx.register_service("ledger", Arc::new(String::from("alpha")))
        .unwrap();

    let err = ctx
        .register_service("ledger", Arc::new(String::from("beta")))
        .unwrap_err();
    assert_eq!(err, ContextError::ServiceNameConflict { name: "ledger".into() });
    assert_eq!(*ctx.find_service_as::<String>("ledger").unwrap(), "alpha");

    // Unregister, then the name is free again.
    ctx.unregister_service("ledger");
    assert!(ctx.find_service_by_name("ledger").is_none());
    ctx.register_service("ledger", Arc::new(String::from("beta")))
        .unwrap();
    assert_eq!(*ctx.find_service_as::<String>("ledger").unwrap(), "beta");
}

#[test]
fn nested_begin_is_rejected_without_side_effects() {
    let ctx = Context::new();
    assert!(ctx.begin_app_transaction());
    assert!(!ctx.begin_app_transaction());
    assert_eq!(
        ctx.try_begin_app_transaction().unwrap_err(),
        ContextError::TransactionAlreadyOpen
    );

    // The original transaction is still intact and commits normally.
    ctx.start_application(LaunchRequest::new("Home")).unwrap();
    ctx.commit_app_transaction();
    assert_eq!(ctx.current_application().unwrap().name(), "Home");

    // Committing again with nothing open is a no-op.
    ctx.commit_app_transaction();
    assert_eq!(ctx.current_application().unwrap().name(), "Home");
}

#[test]
fn last_unit_update_per_instance_wins_in_a_transaction() {
    init_logs();
    let ctx = Context::new();
    let presenter = Arc::new(RecordingPresenter::default());
    ctx.set_presenter(presenter.clone());

    ctx.start_application(LaunchRequest::new("App1")).unwrap();
    assert_eq!(presenter.updates().len(), 1);

    let u1 = vec![PresentationUnit::new()];
    let u2 = vec![PresentationUnit::new()];

    assert!(ctx.begin_app_transaction());
    ctx.set_presentation_units_for_application("App1", u1.clone(), true);
    ctx.set_presentation_units_for_application("App1", u2.clone(), false);

    // Nothing observable until commit: reads see pre-commit state and
    // the presenter heard nothing new.
    assert_eq!(
        ctx.presentation_units_of_application("App1").unwrap(),
        Vec::new()
    );
    assert_eq!(presenter.updates().len(), 1);

    ctx.commit_app_transaction();
    assert_eq!(ctx.presentation_units_of_application("App1").unwrap(), u2);

    // Exactly one more update, carrying the final units and the animated
    // hint of the last queued mutation; u1 was never observable.
    let updates = presenter.updates();
    assert_eq!(updates.len(), 2);
    let (current, units, animated) = updates.last().unwrap().clone();
    assert_eq!(current.as_deref(), Some("App1"));
    assert_eq!(units, u2);
    assert!(!animated);
    assert!(!updates.iter().any(|(_, units, _)| units == &u1));
}

#[test]
fn queued_launches_resolve_at_commit() {
    let ctx = Context::new();
    ctx.start_application(LaunchRequest::new("Home")).unwrap();

    assert!(ctx.begin_app_transaction());
    ctx.start_application(LaunchRequest::new("Checkout")).unwrap();
    let units = vec![PresentationUnit::new()];
    ctx.set_presentation_units_for_application("Checkout", units.clone(), true);

    // Pre-commit reads: the queued launch is not resident yet.
    assert_eq!(ctx.current_application().unwrap().name(), "Home");
    assert!(ctx.find_application_by_name("Checkout").is_none());

    ctx.commit_app_transaction();
    // The by-name association resolved against the just-launched app.
    assert_eq!(ctx.current_application().unwrap().name(), "Checkout");
    assert_eq!(ctx.presentation_units_of_application("Checkout").unwrap(), units);
}

#[test]
fn logon_launches_bypass_an_open_transaction() {
    let ctx = Context::new();
    ctx.start_application(LaunchRequest::new("Home")).unwrap();

    assert!(ctx.begin_app_transaction());
    ctx.start_application(LaunchRequest::new("Deferred")).unwrap();
    ctx.start_logon_application_for_sync(LaunchRequest::new("Logon"))
        .unwrap();

    // The logon launch is already resident; the deferred one is not.
    assert_eq!(ctx.current_application().unwrap().name(), "Logon");
    assert!(ctx.find_application_by_name("Deferred").is_none());

    ctx.commit_app_transaction();
    assert_eq!(ctx.current_application().unwrap().name(), "Deferred");
    assert!(ctx.find_application_by_name("Logon").is_some());
}

#[test]
fn presenter_sees_one_update_per_observable_change() {
    let ctx = Context::new();
    let presenter = Arc::new(RecordingPresenter::default());
    ctx.set_presenter(presenter.clone());

    ctx.start_application(LaunchRequest::new("A").with_animated(false))
        .unwrap();
    ctx.start_application(LaunchRequest::new("B")).unwrap();
    assert_eq!(presenter.updates().len(), 2);
    assert!(!presenter.updates()[0].2);

    let app = ctx.current_application().unwrap();
    ctx.set_presentation_units(&app, vec![PresentationUnit::new()], true);
    assert_eq!(presenter.updates().len(), 3);

    ctx.begin_app_transaction();
    ctx.start_application(LaunchRequest::new("C")).unwrap();
    ctx.start_application(LaunchRequest::new("D")).unwrap();
    assert_eq!(presenter.updates().len(), 3);
    ctx.commit_app_transaction();

    let updates = presenter.updates();
    assert_eq!(updates.len(), 4);
    assert_eq!(updates.last().unwrap().0.as_deref(), Some("D"));
}

#[test]
fn unit_updates_for_departed_instances_are_dropped() {
    let ctx = Context::new();
    ctx.start_application(LaunchRequest::new("Doomed")).unwrap();
    let doomed = ctx.current_application().unwrap();

    ctx.begin_app_transaction();
    ctx.set_presentation_units(&doomed, vec![PresentationUnit::new()], false);
    // The clear-top launch queued after it removes the target.
    ctx.start_application(
        LaunchRequest::new("Doomed").with_launch_mode(micro_context::LaunchMode::ClearTop),
    )
    .unwrap();
    ctx.commit_app_transaction();

    assert!(ctx.presentation_units_of(&doomed).is_empty());
    let survivor = ctx.current_application().unwrap();
    assert!(!Arc::ptr_eq(&survivor, &doomed));
}

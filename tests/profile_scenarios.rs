//! End-to-end profile screen sessions against scripted services.

mod common;

use std::sync::Arc;

use common::{deps, next, next_matching, profile, profile_with_email, settle, ScriptedService};
use stateful_screen::config::SessionConfig;
use stateful_screen::profile::{
    ErrorMessageViewModel, ProfileRoute, ProfileState, ProfileViewEvents, RecordingRouter,
    ServiceError,
};
use stateful_screen::session::{ProfileSession, SessionPhase};

fn session(service: Arc<ScriptedService>) -> (ProfileSession, ProfileViewEvents, Arc<RecordingRouter>) {
    let router = Arc::new(RecordingRouter::new());
    let view = ProfileViewEvents::new();
    let session = ProfileSession::build(
        deps(service, Arc::clone(&router)),
        &view,
        &SessionConfig::default(),
    );
    (session, view, router)
}

#[tokio::test]
async fn initial_fetch_failure_shows_error() {
    let service = ScriptedService::new([Err(ServiceError::BadNetwork)]);
    let (mut session, _view, _router) = session(service.clone());
    let mut states = session.state().subscribe();
    let mut errors = session.output().error_message.subscribe();
    let mut indicator = session.output().initial_loading_indicator_visible.subscribe();

    session.activate().expect("activate");

    assert_eq!(next(&mut states).await, ProfileState::Loading);
    assert_eq!(
        next(&mut states).await,
        ProfileState::Failed(ServiceError::BadNetwork)
    );
    assert_eq!(next(&mut errors).await, None);
    assert_eq!(
        next(&mut errors).await,
        Some(ErrorMessageViewModel::from_error(&ServiceError::BadNetwork))
    );
    assert!(next(&mut indicator).await);
    assert!(!next(&mut indicator).await);
    settle().await;
    assert!(indicator.drain().is_empty());
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn retry_after_failure_loads_profile() {
    let service = ScriptedService::new([Err(ServiceError::BadNetwork), Ok(profile())]);
    let (mut session, view, _router) = session(service.clone());
    let mut states = session.state().subscribe();
    let mut view_models = session.output().view_model.subscribe();
    let mut content = session.output().content_visible.subscribe();

    session.activate().expect("activate");
    next_matching(&mut states, ProfileState::is_failed).await;

    view.retry_button_tap.emit(());
    assert_eq!(next(&mut states).await, ProfileState::Loading);
    assert_eq!(next(&mut states).await, ProfileState::Loaded(profile()));
    assert_eq!(service.calls(), 2);

    let vm = next(&mut view_models).await;
    assert_eq!(vm.login.text, "iDmitriy");
    assert_eq!(vm.email.title, "Добавить e-mail");
    assert_eq!(vm.email.text, None);

    assert!(!next(&mut content).await);
    assert!(next(&mut content).await);

    // A reload never hides content again.
    view.pull_to_refresh.emit(());
    next_matching(&mut states, ProfileState::is_loaded).await;
    settle().await;
    assert!(content.drain().is_empty());
    assert!(session.output().content_visible.get());
}

#[tokio::test]
async fn pull_to_refresh_keeps_content_and_hides_spinner_once() {
    let service = ScriptedService::new([Ok(profile()), Ok(profile())]);
    let (mut session, view, _router) = session(service.clone());
    let mut states = session.state().subscribe();
    let mut indicator = session.output().initial_loading_indicator_visible.subscribe();
    let mut hide_refresh = session.output().hide_refresh_control.subscribe();

    session.activate().expect("activate");
    next_matching(&mut states, ProfileState::is_loaded).await;

    view.pull_to_refresh.emit(());
    assert_eq!(next(&mut states).await, ProfileState::Loading);
    assert_eq!(next(&mut states).await, ProfileState::Loaded(profile()));

    next(&mut hide_refresh).await;
    settle().await;
    assert!(hide_refresh.drain().is_empty());
    assert!(session.output().content_visible.get());
    assert_eq!(indicator.drain(), vec![true, false]);
    assert_eq!(service.calls(), 2);
}

#[tokio::test]
async fn email_tap_routes_to_addition_without_email() {
    let service = ScriptedService::new([Ok(profile())]);
    let (mut session, view, router) = session(service);
    let mut states = session.state().subscribe();
    let mut routes = router.events().subscribe();

    session.activate().expect("activate");
    next_matching(&mut states, ProfileState::is_loaded).await;

    view.email_update_tap.emit(());
    assert_eq!(next(&mut routes).await, ProfileRoute::EmailAddition);
    view.my_orders_tap.emit(());
    assert_eq!(next(&mut routes).await, ProfileRoute::OrdersList);
    assert_eq!(
        router.routes(),
        vec![ProfileRoute::EmailAddition, ProfileRoute::OrdersList]
    );
}

#[tokio::test]
async fn email_tap_routes_to_change_with_email() {
    let service = ScriptedService::new([Ok(profile_with_email("d@example.com"))]);
    let (mut session, view, router) = session(service);
    let mut states = session.state().subscribe();
    let mut routes = router.events().subscribe();

    session.activate().expect("activate");
    next_matching(&mut states, ProfileState::is_loaded).await;

    view.email_update_tap.emit(());
    assert_eq!(next(&mut routes).await, ProfileRoute::EmailChange);
}

#[tokio::test]
async fn pull_to_refresh_while_failed_is_ignored() {
    let service = ScriptedService::new([Err(ServiceError::BadNetwork)]);
    let (mut session, view, router) = session(service.clone());
    let mut states = session.state().subscribe();

    session.activate().expect("activate");
    next_matching(&mut states, ProfileState::is_failed).await;
    let revision = session.state().revision();

    view.pull_to_refresh.emit(());
    view.email_update_tap.emit(());
    view.my_orders_tap.emit(());
    settle().await;

    assert!(states.drain().is_empty());
    assert_eq!(session.state().revision(), revision);
    assert_eq!(
        session.state().read(),
        ProfileState::Failed(ServiceError::BadNetwork)
    );
    assert_eq!(service.calls(), 1);
    assert!(router.routes().is_empty());
}

#[tokio::test]
async fn teardown_cancels_in_flight_fetch() {
    let (service, gate) = ScriptedService::gated([Ok(profile())]);
    let (mut session, _view, _router) = session(service.clone());
    let mut states = session.state().subscribe();

    session.activate().expect("activate");
    assert_eq!(next(&mut states).await, ProfileState::Loading);
    settle().await;
    assert_eq!(service.calls(), 1);

    session.teardown();
    gate.add_permits(1);
    assert_eq!(session.phase(), SessionPhase::TornDown);

    let rest = tokio::time::timeout(common::RECV_TIMEOUT, states.recv())
        .await
        .expect("state stream should close");
    assert_eq!(rest, None);
}

#[tokio::test]
async fn sessions_do_not_share_state() {
    let (mut first, first_view, _) = session(ScriptedService::new([Ok(profile())]));
    let (mut second, _second_view, _) = session(ScriptedService::new([Err(ServiceError::BadNetwork)]));
    assert_ne!(first.id(), second.id());

    let mut first_states = first.state().subscribe();
    let mut second_states = second.state().subscribe();
    first.activate().expect("activate first");
    second.activate().expect("activate second");

    next_matching(&mut first_states, ProfileState::is_loaded).await;
    next_matching(&mut second_states, ProfileState::is_failed).await;

    first_view.pull_to_refresh.emit(());
    assert_eq!(next(&mut first_states).await, ProfileState::Loading);
    settle().await;
    assert!(second_states.drain().is_empty());
}

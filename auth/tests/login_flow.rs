//! Login view running inside a `Store`, wired to mock providers.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Tests assert by unwrapping

use proptest::prelude::*;
use session_gate_auth::mocks::{GatewayCall, MockIdentityGateway, RecordingNavigator};
use session_gate_auth::prelude::*;
use session_gate_auth::views::login;
use session_gate_core::effect::Effect;
use session_gate_core::reducer::Reducer;
use session_gate_runtime::Store;
use std::time::Duration;

const LANDING_URL: &str = "https://app.example.com/chat";

type Env = ViewEnvironment<MockIdentityGateway, RecordingNavigator>;
type LoginStore =
    Store<FormState, LoginAction, Env, LoginReducer<MockIdentityGateway, RecordingNavigator>>;

fn setup(gateway: MockIdentityGateway) -> (LoginStore, MockIdentityGateway, RecordingNavigator) {
    let navigator = RecordingNavigator::new();
    let env = ViewEnvironment::new(
        gateway.clone(),
        navigator.clone(),
        AuthConfig::new(LANDING_URL),
    );
    let store = Store::new(FormState::default(), LoginReducer::new(), env);
    (store, gateway, navigator)
}

async fn fill(store: &LoginStore, email: &str, password: &str) {
    store.send(LoginAction::EmailChanged(email.to_string())).await.unwrap();
    store.send(LoginAction::PasswordChanged(password.to_string())).await.unwrap();
}

async fn eventually<F: Fn() -> bool>(condition: F) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn successful_sign_in_calls_gateway_once_and_navigates_once() {
    session_gate_testing::init_test_tracing();
    let (store, gateway, navigator) = setup(MockIdentityGateway::succeeding(Identity::new("u1")));

    fill(&store, "a@b.com", "secret").await;
    let mut handle = store.send(LoginAction::Submit).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::SignInWithCredentials {
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
        }]
    );
    assert_eq!(
        navigator.navigations(),
        vec![Navigation::External(LANDING_URL.to_string())]
    );
    assert_eq!(store.state(|s| s.phase).await, AttemptPhase::Succeeded);
}

#[tokio::test]
async fn second_submit_while_pending_does_not_call_gateway() {
    let (store, gateway, navigator) = setup(MockIdentityGateway::default());
    gateway.hold();

    fill(&store, "a@b.com", "secret").await;
    let mut first = store.send(LoginAction::Submit).await.unwrap();
    eventually(|| gateway.call_count() == 1).await;

    let second = store.send(LoginAction::Submit).await.unwrap();
    let federated = store.send(LoginAction::SubmitFederated).await.unwrap();
    assert_eq!(second.pending(), 0);
    assert_eq!(federated.pending(), 0);
    assert!(store.state(FormState::pending).await);

    gateway.release();
    first.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    assert_eq!(gateway.call_count(), 1);
    assert_eq!(navigator.count(), 1);
}

#[tokio::test]
async fn rejected_credentials_leave_a_message_and_reenable_the_form() {
    let (store, gateway, navigator) =
        setup(MockIdentityGateway::failing(AuthError::InvalidCredentials));

    fill(&store, "a@b.com", "wrong").await;
    let mut handle = store.send(LoginAction::Submit).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    let state = store.state(Clone::clone).await;
    assert_eq!(state.phase, AttemptPhase::Failed);
    assert!(!state.pending());
    assert!(state.error.as_deref().is_some_and(|message| !message.is_empty()));
    assert_eq!(navigator.count(), 0);

    // The user may retry
    gateway.set_outcome(Ok(Identity::new("u1")));
    let mut retry = store.send(LoginAction::Submit).await.unwrap();
    retry.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    assert_eq!(gateway.call_count(), 2);
    assert_eq!(store.state(|s| s.phase).await, AttemptPhase::Succeeded);
}

#[tokio::test]
async fn federated_sign_in_uses_the_federated_operation() {
    let (store, gateway, navigator) = setup(MockIdentityGateway::default());

    let mut handle = store.send(LoginAction::SubmitFederated).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    assert_eq!(gateway.calls(), vec![GatewayCall::SignInWithFederatedProvider]);
    assert_eq!(
        navigator.navigations(),
        vec![Navigation::External(LANDING_URL.to_string())]
    );
}

#[tokio::test]
async fn provider_notification_drives_session_and_view() {
    let channel = CurrentUserChannel::new();
    let context = SessionContext::attach(&channel);
    let gateway = MockIdentityGateway::default().publishing_to(channel.clone());
    let (store, _, navigator) = setup(gateway);
    let follower = follow_session(store.clone(), context.watch(), LoginAction::from_session);

    fill(&store, "a@b.com", "secret").await;
    let mut handle = store.send(LoginAction::Submit).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    eventually(|| context.is_authenticated()).await;
    let authenticated = async {
        for _ in 0..100 {
            if store.state(|s| s.session_authenticated).await {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    };
    assert!(authenticated.await);

    // The attempt's own landing redirect is the only navigation
    assert_eq!(
        navigator.navigations(),
        vec![Navigation::External(LANDING_URL.to_string())]
    );

    let rendered = login::render(
        &store.state(Clone::clone).await,
        &context.current(),
        &AuthConfig::new(LANDING_URL),
    );
    assert_eq!(
        rendered,
        Rendered::Redirect {
            to: "/home".to_string()
        }
    );

    drop(context);
    tokio::time::timeout(Duration::from_secs(1), follower).await.unwrap().unwrap();
}

#[tokio::test]
async fn already_signed_in_user_is_sent_home_without_submitting() {
    let channel = CurrentUserChannel::with_current(Some(Identity::new("returning")));
    let context = SessionContext::attach(&channel);
    let (store, gateway, navigator) = setup(MockIdentityGateway::default());
    let _follower = follow_session(store.clone(), context.watch(), LoginAction::from_session);

    eventually(|| navigator.count() == 1).await;
    assert_eq!(navigator.navigations(), vec![Navigation::Replace("/home".to_string())]);

    fill(&store, "a@b.com", "secret").await;
    let handle = store.send(LoginAction::Submit).await.unwrap();
    assert_eq!(handle.pending(), 0);
    assert_eq!(gateway.call_count(), 0);

    let form = store.state(Clone::clone).await;
    assert!(login::render(&form, &context.current(), &AuthConfig::default()).is_redirect());
}

// ═══════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════

fn arb_phase() -> impl Strategy<Value = AttemptPhase> {
    prop_oneof![
        Just(AttemptPhase::Idle),
        Just(AttemptPhase::Pending),
        Just(AttemptPhase::Succeeded),
        Just(AttemptPhase::Failed),
    ]
}

fn arb_form() -> impl Strategy<Value = FormState> {
    (
        ".{0,24}",
        ".{0,24}",
        arb_phase(),
        proptest::option::of(".{1,40}"),
        any::<bool>(),
    )
        .prop_map(|(email, password, phase, error, session_authenticated)| {
            let mut form = FormState::default();
            form.fields.insert(Field::Email, email);
            form.fields.insert(Field::Password, password);
            form.phase = phase;
            form.error = error;
            form.session_authenticated = session_authenticated;
            form
        })
}

fn env() -> Env {
    ViewEnvironment::new(
        MockIdentityGateway::default(),
        RecordingNavigator::new(),
        AuthConfig::new(LANDING_URL),
    )
}

proptest! {
    /// While an attempt is pending, no submit does anything.
    #[test]
    fn pending_view_ignores_every_submit(
        form in arb_form(),
        federated in any::<bool>(),
    ) {
        let mut form = form;
        form.phase = AttemptPhase::Pending;
        let before = form.clone();

        let action = if federated { LoginAction::SubmitFederated } else { LoginAction::Submit };
        let effects = LoginReducer::<MockIdentityGateway, RecordingNavigator>::new()
            .reduce(&mut form, action, &env());

        prop_assert_eq!(form, before);
        prop_assert!(effects.iter().all(Effect::is_none));
    }

    /// A signed-in session renders a redirect whatever the form holds.
    #[test]
    fn signed_in_session_always_redirects(
        form in arb_form(),
        uid in "[a-z0-9]{1,12}",
    ) {
        let session = Session::from_notification(Some(Identity::new(uid)));
        let rendered = login::render(&form, &session, &AuthConfig::default());

        prop_assert_eq!(rendered, Rendered::Redirect { to: "/home".to_string() });
    }
}

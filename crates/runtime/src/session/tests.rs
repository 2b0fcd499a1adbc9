use std::time::Duration;

use serde_json::{Value, json};

use super::*;
use crate::transport::fake::{FakeTransport, FakeTransportController};

fn user(id: &str) -> Value {
	json!({
		"id": id,
		"email": format!("{id}@acme.com"),
		"firstName": null,
		"lastName": null,
		"role": "admin",
		"avatarUrl": null
	})
}

fn start(policy: SupersedePolicy) -> (SessionStore, FakeTransportController) {
	let (transport, controller) = FakeTransport::new();
	let store = SessionStore::with_options(QueryClient::new(transport), SessionOptions::default().with_policy(policy));
	(store, controller)
}

/// Answers the construction-time identity check with `me`.
async fn settle(store: &SessionStore, controller: &mut FakeTransportController, me: Value) -> SessionState {
	let pending = controller.next_request().await;
	assert_eq!(pending.query(), IDENTITY_QUERY);
	pending.respond_data(json!({ "me": me }));
	store.resolved().await
}

fn spawn_refetch(store: &SessionStore) -> tokio::task::JoinHandle<SessionState> {
	let store = store.clone();
	tokio::spawn(async move { store.refetch(&CancellationToken::new()).await })
}

fn spawn_login(store: &SessionStore, email: &str) -> tokio::task::JoinHandle<Result<Identity>> {
	let store = store.clone();
	let credentials = LoginInput::new(email, "password123");
	tokio::spawn(async move { store.login(credentials, &CancellationToken::new()).await })
}

async fn wait_for_state(store: &SessionStore, expected: SessionState) {
	let mut rx = store.subscribe();
	tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|state| *state == expected))
		.await
		.expect("state should be reached")
		.expect("store should be alive");
}

#[tokio::test]
async fn identity_is_unknown_until_check_resolves() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);

	let state = store.state();
	assert_eq!(state, SessionState::Resolving);
	assert!(!state.is_known());
	assert!(!state.is_anonymous());
	assert!(store.identity().is_none());

	let state = settle(&store, &mut controller, user("u1")).await;
	assert_eq!(state.identity().map(|i| i.id.as_str()), Some("u1"));
}

#[tokio::test]
async fn failed_identity_check_collapses_to_anonymous() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	controller.next_request().await.respond_errors(&["authentication required"]);
	assert_eq!(store.resolved().await, SessionState::Anonymous);

	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	controller.next_request().await.fail(Error::Transport("connection refused".into()));
	assert_eq!(store.resolved().await, SessionState::Anonymous);

	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	assert_eq!(settle(&store, &mut controller, Value::Null).await, SessionState::Anonymous);
}

#[tokio::test]
async fn login_replaces_identity_with_returned_user() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	settle(&store, &mut controller, user("u1")).await;

	let login = spawn_login(&store, "u2@acme.com");
	let pending = controller.next_request().await;
	assert_eq!(pending.query(), LOGIN_MUTATION);
	assert_eq!(pending.variable("input"), Some(&json!({ "email": "u2@acme.com", "password": "password123" })));
	assert_eq!(store.state(), SessionState::Resolving);

	pending.respond_data(json!({ "login": { "user": user("u2"), "token": "opaque" } }));

	let identity = login.await.unwrap().unwrap();
	assert_eq!(identity.id, "u2");
	assert_eq!(store.identity(), Some(identity));
}

#[tokio::test]
async fn failed_login_keeps_prior_state_and_reports_reason() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	settle(&store, &mut controller, Value::Null).await;

	let login = spawn_login(&store, "admin@acme.com");
	controller.next_request().await.respond_errors(&["invalid email or password"]);

	let err = login.await.unwrap().unwrap_err();
	assert!(matches!(&err, Error::Auth(msg) if msg == "invalid email or password"), "unexpected error: {err:?}");
	assert_eq!(store.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn failed_login_keeps_signed_in_identity() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	settle(&store, &mut controller, user("u1")).await;

	let login = spawn_login(&store, "other@acme.com");
	controller.next_request().await.fail(Error::Transport("connection reset".into()));

	assert!(matches!(login.await.unwrap(), Err(Error::Auth(_))));
	assert_eq!(store.identity().map(|i| i.id), Some("u1".to_string()));
}

#[tokio::test]
async fn logout_clears_session_even_when_remote_call_fails() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	settle(&store, &mut controller, user("u1")).await;

	let logout = tokio::spawn({
		let store = store.clone();
		async move { store.logout(&CancellationToken::new()).await }
	});
	let pending = controller.next_request().await;
	assert_eq!(pending.query(), LOGOUT_MUTATION);
	pending.fail(Error::Transport("connection refused".into()));
	logout.await.unwrap();

	assert_eq!(store.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn logout_clears_session_after_remote_success() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	settle(&store, &mut controller, user("u1")).await;

	let logout = tokio::spawn({
		let store = store.clone();
		async move { store.logout(&CancellationToken::new()).await }
	});
	controller.next_request().await.respond_data(json!({ "logout": true }));
	logout.await.unwrap();

	assert_eq!(store.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn later_refetch_wins_when_answers_arrive_out_of_order() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	settle(&store, &mut controller, Value::Null).await;

	let first = spawn_refetch(&store);
	let first_pending = controller.next_request().await;
	let second = spawn_refetch(&store);
	let second_pending = controller.next_request().await;

	second_pending.respond_data(json!({ "me": user("second") }));
	let after_second = second.await.unwrap();
	assert_eq!(after_second.identity().map(|i| i.id.as_str()), Some("second"));

	first_pending.respond_data(json!({ "me": user("first") }));
	first.await.unwrap();

	assert_eq!(store.identity().map(|i| i.id), Some("second".to_string()));
}

#[tokio::test]
async fn last_resolved_policy_applies_results_in_arrival_order() {
	let (store, mut controller) = start(SupersedePolicy::LastResolved);
	settle(&store, &mut controller, Value::Null).await;

	let first = spawn_refetch(&store);
	let first_pending = controller.next_request().await;
	let second = spawn_refetch(&store);
	let second_pending = controller.next_request().await;

	second_pending.respond_data(json!({ "me": user("second") }));
	second.await.unwrap();
	first_pending.respond_data(json!({ "me": user("first") }));
	first.await.unwrap();

	assert_eq!(store.identity().map(|i| i.id), Some("first".to_string()));
}

#[tokio::test]
async fn login_supersedes_pending_initial_check() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	let initial = controller.next_request().await;

	let login = spawn_login(&store, "u2@acme.com");
	controller
		.next_request()
		.await
		.respond_data(json!({ "login": { "user": user("u2"), "token": null } }));
	login.await.unwrap().unwrap();

	initial.respond_data(json!({ "me": null }));
	tokio::task::yield_now().await;

	assert_eq!(store.identity().map(|i| i.id), Some("u2".to_string()));
}

#[tokio::test]
async fn failed_login_during_initial_check_rechecks_identity() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	let initial = controller.next_request().await;

	let login = spawn_login(&store, "u2@acme.com");
	controller.next_request().await.respond_errors(&["invalid email or password"]);
	assert!(login.await.unwrap().is_err());

	let recheck = controller.next_request().await;
	assert_eq!(recheck.query(), IDENTITY_QUERY);
	recheck.respond_data(json!({ "me": user("u1") }));
	initial.respond_data(json!({ "me": null }));

	wait_for_state(&store, SessionState::Authenticated(serde_json::from_value(user("u1")).unwrap())).await;
}

#[tokio::test]
async fn every_subscriber_sees_the_same_transition() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	let mut first = store.subscribe();
	let mut second = store.clone().subscribe();

	controller.next_request().await.respond_data(json!({ "me": user("u1") }));

	let a = first.wait_for(SessionState::is_known).await.unwrap().clone();
	let b = second.wait_for(SessionState::is_known).await.unwrap().clone();
	assert_eq!(a, b);
	assert_eq!(store.clone().state(), a);
}

#[tokio::test]
async fn cancelled_refetch_restores_prior_state() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	settle(&store, &mut controller, user("u1")).await;

	let cancel = CancellationToken::new();
	let refetch = tokio::spawn({
		let store = store.clone();
		let cancel = cancel.clone();
		async move { store.refetch(&cancel).await }
	});
	let mut pending = controller.next_request().await;
	assert_eq!(store.state(), SessionState::Resolving);

	cancel.cancel();
	let state = refetch.await.unwrap();
	pending.abandoned().await;

	assert_eq!(state.identity().map(|i| i.id.as_str()), Some("u1"));
}

#[tokio::test]
async fn shutdown_cancels_background_identity_check() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	let mut pending = controller.next_request().await;

	store.shutdown();
	pending.abandoned().await;

	assert!(store.is_shut_down());
	wait_for_state(&store, SessionState::Unresolved).await;
	assert!(controller.try_next_request().is_none());
}

fn spawn_logout(store: &SessionStore) -> tokio::task::JoinHandle<()> {
	let store = store.clone();
	tokio::spawn(async move { store.logout(&CancellationToken::new()).await })
}

async fn cancelled_refetch_during_logout(policy: SupersedePolicy) {
	let (store, mut controller) = start(policy);
	settle(&store, &mut controller, user("u1")).await;

	let logout = spawn_logout(&store);
	let logout_pending = controller.next_request().await;
	assert_eq!(logout_pending.query(), LOGOUT_MUTATION);
	assert_eq!(store.state(), SessionState::Anonymous);

	let cancel = CancellationToken::new();
	let refetch = tokio::spawn({
		let store = store.clone();
		let cancel = cancel.clone();
		async move { store.refetch(&cancel).await }
	});
	let mut refetch_pending = controller.next_request().await;
	cancel.cancel();
	assert_eq!(refetch.await.unwrap(), SessionState::Anonymous);
	refetch_pending.abandoned().await;

	logout_pending.respond_data(json!({ "logout": true }));
	logout.await.unwrap();

	assert_eq!(store.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn cancelled_refetch_cannot_undo_logout() {
	cancelled_refetch_during_logout(SupersedePolicy::LatestIssued).await;
}

#[tokio::test]
async fn cancelled_refetch_cannot_undo_logout_last_resolved() {
	cancelled_refetch_during_logout(SupersedePolicy::LastResolved).await;
}

async fn failed_login_during_logout(policy: SupersedePolicy) {
	let (store, mut controller) = start(policy);
	settle(&store, &mut controller, user("u1")).await;

	let logout = spawn_logout(&store);
	let logout_pending = controller.next_request().await;

	let login = spawn_login(&store, "u1@acme.com");
	controller.next_request().await.respond_errors(&["invalid email or password"]);
	assert!(matches!(login.await.unwrap(), Err(Error::Auth(_))));
	assert_eq!(store.state(), SessionState::Anonymous);

	logout_pending.respond_data(json!({ "logout": true }));
	logout.await.unwrap();

	assert_eq!(store.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn failed_login_cannot_undo_logout() {
	failed_login_during_logout(SupersedePolicy::LatestIssued).await;
}

#[tokio::test]
async fn failed_login_cannot_undo_logout_last_resolved() {
	failed_login_during_logout(SupersedePolicy::LastResolved).await;
}

async fn refetch_issued_before_logout(policy: SupersedePolicy) {
	let (store, mut controller) = start(policy);
	settle(&store, &mut controller, user("u1")).await;

	let refetch = spawn_refetch(&store);
	let refetch_pending = controller.next_request().await;

	let logout = spawn_logout(&store);
	controller.next_request().await.respond_data(json!({ "logout": true }));
	logout.await.unwrap();

	refetch_pending.respond_data(json!({ "me": user("u1") }));
	assert_eq!(refetch.await.unwrap(), SessionState::Anonymous);
	assert_eq!(store.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn identity_check_issued_before_logout_is_discarded() {
	refetch_issued_before_logout(SupersedePolicy::LatestIssued).await;
}

#[tokio::test]
async fn identity_check_issued_before_logout_is_discarded_last_resolved() {
	refetch_issued_before_logout(SupersedePolicy::LastResolved).await;
}

#[tokio::test]
async fn login_after_logout_signs_back_in() {
	let (store, mut controller) = start(SupersedePolicy::LatestIssued);
	settle(&store, &mut controller, user("u1")).await;

	let logout = spawn_logout(&store);
	let logout_pending = controller.next_request().await;

	let login = spawn_login(&store, "u2@acme.com");
	controller
		.next_request()
		.await
		.respond_data(json!({ "login": { "user": user("u2"), "token": null } }));
	login.await.unwrap().unwrap();

	logout_pending.respond_data(json!({ "logout": true }));
	logout.await.unwrap();

	assert_eq!(store.identity().map(|i| i.id), Some("u2".to_string()));
}

#[tokio::test]
async fn store_without_startup_check_sends_nothing_until_asked() {
	let (transport, mut controller) = FakeTransport::new();
	let store = SessionStore::with_options(QueryClient::new(transport), SessionOptions::default().without_startup_check());
	tokio::task::yield_now().await;

	assert_eq!(store.state(), SessionState::Unresolved);
	assert!(controller.try_next_request().is_none());

	let login = spawn_login(&store, "u1@acme.com");
	let pending = controller.next_request().await;
	assert_eq!(pending.query(), LOGIN_MUTATION);
	pending.respond_errors(&["invalid email or password"]);

	assert!(login.await.unwrap().is_err());
	assert_eq!(store.state(), SessionState::Unresolved);
	assert!(controller.try_next_request().is_none());
}

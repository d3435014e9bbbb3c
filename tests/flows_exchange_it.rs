// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use oauth2_relay::{
	_preludet::*,
	error::UpstreamError,
	flows::{CallbackRequest, GITHUB_V3_ACCEPT},
	registry::CodeRegistry,
};

fn token_request_body(code: &str) -> serde_json::Value {
	json!({
		"client_id": TEST_CLIENT_ID,
		"client_secret": TEST_CLIENT_SECRET,
		"code": code,
		"redirect_uri": TEST_REDIRECT_URI,
	})
}

#[tokio::test]
async fn exchange_returns_profile_and_token() {
	let server = MockServer::start_async().await;
	let (relay, registry) = build_test_relay(mock_descriptor(&server.base_url()));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/login/oauth/access_token")
				.header("accept", "application/json")
				.json_body(token_request_body("abc123"));
			then.status(200).json_body(json!({
				"access_token": "tok_xyz",
				"token_type": "bearer",
				"scope": "user",
			}));
		})
		.await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/user")
				.header("authorization", "token tok_xyz")
				.header("accept", GITHUB_V3_ACCEPT)
				.header("user-agent", "oauth2-relay");
			then.status(200).json_body(json!({ "login": "octocat", "id": 1 }));
		})
		.await;
	let outcome = relay
		.exchange_code(CallbackRequest::with_code("abc123"))
		.await
		.expect("Exchange should succeed against the mock provider.");

	token_mock.assert_async().await;
	user_mock.assert_async().await;

	assert_eq!(outcome.user, json!({ "login": "octocat", "id": 1 }));
	assert_eq!(outcome.access_token.expose(), "tok_xyz");
	assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn provider_error_aborts_before_profile_fetch() {
	let server = MockServer::start_async().await;
	let (relay, _) = build_test_relay(mock_descriptor(&server.base_url()));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(200).json_body(json!({
				"error": "bad_verification_code",
				"error_description": "The code passed is incorrect or expired.",
				"error_uri": "https://docs.github.com/apps/troubleshooting",
			}));
		})
		.await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200).json_body(json!({ "login": "octocat" }));
		})
		.await;
	let err = relay
		.exchange_code(CallbackRequest::with_code("stale"))
		.await
		.expect_err("Provider-reported errors should fail the exchange.");

	assert!(matches!(err, Error::Upstream(UpstreamError::ProviderRejected { .. })));
	assert_eq!(err.to_string(), "The code passed is incorrect or expired.");

	token_mock.assert_calls_async(1).await;
	user_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn token_endpoint_status_failure_is_upstream_error() {
	let server = MockServer::start_async().await;
	let (relay, _) = build_test_relay(mock_descriptor(&server.base_url()));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(502).body("bad gateway");
		})
		.await;
	let err = relay
		.exchange_code(CallbackRequest::with_code("abc123"))
		.await
		.expect_err("A 502 from the token endpoint should fail the exchange.");

	token_mock.assert_async().await;

	match err {
		Error::Upstream(UpstreamError::TokenEndpoint { status, body }) => {
			assert_eq!(status, 502);
			assert_eq!(body, "bad gateway");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn profile_failure_withholds_access_token() {
	let server = MockServer::start_async().await;
	let (relay, _) = build_test_relay(mock_descriptor(&server.base_url()));

	server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(200).json_body(json!({ "access_token": "tok_secret" }));
		})
		.await;

	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(401).json_body(json!({ "message": "Bad credentials" }));
		})
		.await;
	let err = relay
		.exchange_code(CallbackRequest::with_code("abc123"))
		.await
		.expect_err("A failed profile fetch should fail the exchange.");

	user_mock.assert_async().await;

	assert!(matches!(err, Error::Upstream(UpstreamError::ProfileEndpoint { status: 401, .. })));
	assert!(!format!("{err} {err:?}").contains("tok_secret"));
}

#[tokio::test]
async fn profile_network_failure_is_upstream_error() {
	let server = MockServer::start_async().await;
	let descriptor = mock_descriptor(&server.base_url());
	let descriptor = oauth2_relay::provider::ProviderDescriptor::builder("split")
		.authorization_endpoint(descriptor.endpoints.authorization.clone())
		.token_endpoint(descriptor.endpoints.token.clone())
		.user_endpoint(Url::parse("http://127.0.0.1:9/user").expect("Fixture URL should parse."))
		.build()
		.expect("Split descriptor should build.");
	let (relay, _) = build_test_relay(descriptor);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(200).json_body(json!({ "access_token": "tok_xyz" }));
		})
		.await;

	let err = relay
		.exchange_code(CallbackRequest::with_code("abc123"))
		.await
		.expect_err("An unreachable user endpoint should fail the exchange.");

	assert!(matches!(err, Error::Upstream(UpstreamError::Transport(_))));
}

#[tokio::test]
async fn failed_exchange_still_burns_the_code() {
	let server = MockServer::start_async().await;
	let (relay, _) = build_test_relay(mock_descriptor(&server.base_url()));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(500).body("boom");
		})
		.await;

	relay
		.exchange_code(CallbackRequest::with_code("abc123"))
		.await
		.expect_err("The first attempt should fail upstream.");

	let err = relay
		.exchange_code(CallbackRequest::with_code("abc123"))
		.await
		.expect_err("The retry should be rejected as a replay.");

	assert!(matches!(err, Error::CodeReused));

	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn successful_exchange_cannot_be_replayed() {
	let server = MockServer::start_async().await;
	let (relay, _) = build_test_relay(mock_descriptor(&server.base_url()));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(200).json_body(json!({ "access_token": "tok_xyz" }));
		})
		.await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200).json_body(json!({ "login": "octocat", "id": 1 }));
		})
		.await;

	relay
		.exchange_code(CallbackRequest::with_code("abc123"))
		.await
		.expect("The first exchange should succeed.");

	for _ in 0..3 {
		let err = relay
			.exchange_code(CallbackRequest::with_code("abc123"))
			.await
			.expect_err("Every later exchange should be rejected.");

		assert!(matches!(err, Error::CodeReused));
	}

	token_mock.assert_calls_async(1).await;
	user_mock.assert_calls_async(1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callbacks_exchange_once() {
	let server = MockServer::start_async().await;
	let (relay, _) = build_test_relay(mock_descriptor(&server.base_url()));
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(200)
				.delay(std::time::Duration::from_millis(50))
				.json_body(json!({ "access_token": "tok_xyz" }));
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200).json_body(json!({ "login": "octocat", "id": 1 }));
		})
		.await;

	let tasks = (0..8)
		.map(|_| {
			let relay = relay.clone();

			tokio::spawn(async move { relay.exchange_code(CallbackRequest::with_code("abc123")).await })
		})
		.collect::<Vec<_>>();
	let mut successes = 0;
	let mut replays = 0;

	for task in tasks {
		match task.await.expect("Exchange task should not panic.") {
			Ok(_) => successes += 1,
			Err(Error::CodeReused) => replays += 1,
			Err(other) => panic!("Unexpected error: {other:?}."),
		}
	}

	assert_eq!(successes, 1);
	assert_eq!(replays, 7);

	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn verified_state_round_trips_once() {
	let server = MockServer::start_async().await;
	let (relay, _, states) = build_verifying_test_relay(mock_descriptor(&server.base_url()));

	server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(200).json_body(json!({ "access_token": "tok_xyz" }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200).json_body(json!({ "login": "octocat", "id": 1 }));
		})
		.await;

	let redirect = relay.start_authorization();
	let outcome = relay
		.exchange_code(CallbackRequest::with_code("abc123").and_state(redirect.state.clone()))
		.await
		.expect("A callback carrying the issued state should succeed.");

	assert_eq!(outcome.access_token.expose(), "tok_xyz");
	assert!(states.is_empty());

	let err = relay
		.exchange_code(CallbackRequest::with_code("def456").and_state(redirect.state))
		.await
		.expect_err("A consumed state should not be accepted twice.");

	assert!(matches!(err, Error::InvalidState));
}

#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
// self
use twitter_adapter::{
	_preludet::*,
	auth::{AppMeta, AppName, ServiceName},
	provider::{AuthorizationVariant, Oauth1Endpoints},
	store::SecretKey,
};

/// httpmock serves TLS and plain HTTP on one port; endpoints must be HTTPS.
fn https_url(server: &MockServer, path: &str) -> Url {
	let mut url = Url::parse(&server.url(path)).expect("Mock server URL should parse.");

	url.set_scheme("https").expect("Mock server URL should accept the https scheme.");

	url
}

fn build_endpoints(server: &MockServer) -> Oauth1Endpoints {
	Oauth1Endpoints::builder()
		.request_token_endpoint(https_url(server, "/oauth/request_token"))
		.authorize_endpoint(https_url(server, "/oauth/authorize"))
		.authenticate_endpoint(https_url(server, "/oauth/authenticate"))
		.access_token_endpoint(https_url(server, "/oauth/access_token"))
		.variant(AuthorizationVariant::Authorize)
		.build()
		.expect("Mock endpoints should validate.")
}

fn twitter() -> ServiceName {
	ServiceName::new(TEST_SERVICE_NAME).expect("Service fixture should be valid.")
}

#[tokio::test]
async fn setup_authorize_and_exchange_persist_secrets() {
	let server = MockServer::start_async().await;
	let (service, store, _) = build_reqwest_test_service(build_endpoints(&server));
	let status = service
		.setup_app(AppMeta::default().with_consumer("K", "S"))
		.await
		.expect("Provisioning should succeed.");

	assert_eq!(status, 0);

	let request_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token").header_exists("authorization");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("oauth_token=abc123&oauth_token_secret=xyz&oauth_callback_confirmed=true");
		})
		.await;
	let url = service
		.get_oauth1_url(&AppName::default())
		.await
		.expect("Authorization URL should be produced.");

	request_mock.assert_async().await;

	let parsed = Url::parse(&url).expect("Authorization URL should parse.");
	let pairs: HashMap<_, _> = parsed.query_pairs().into_owned().collect();

	assert_eq!(parsed.path(), "/oauth/authorize");
	assert_eq!(pairs.get("oauth_token").map(String::as_str), Some("abc123"));

	let parked = store.records(&twitter());
	let request_record = parked
		.iter()
		.find(|record| record.key == SecretKey::request("abc123"))
		.expect("Request-token secret should be parked in the store.");

	assert_eq!(request_record.key.as_str(), "request_abc123_token");
	assert_eq!(
		request_record.data,
		serde_json::json!({
			"app_name": "default",
			"request_token": "abc123",
			"request_secret": "xyz",
		})
	);

	let access_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token").header_exists("authorization");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("oauth_token=at-1&oauth_token_secret=as-1&user_id=42&screen_name=ingest");
		})
		.await;
	let access = service
		.oauth1_get_access_token("abc123", "verifier1")
		.await
		.expect("Verifier exchange should succeed.");

	access_mock.assert_async().await;

	assert_eq!(access.app_name, AppName::default());
	assert_eq!(access.pair(), ("at-1", "as-1"));
	assert_eq!(access.user_id.as_deref(), Some("42"));
	assert_eq!(access.screen_name.as_deref(), Some("ingest"));

	let records = store.records(&twitter());
	let access_record = records
		.iter()
		.find(|record| record.key.as_str() == "access_at-1_key")
		.expect("Access-token secret should be stored.");

	assert_eq!(access_record.data["app_name"], "default");
	assert_eq!(access_record.data["access_token"], "at-1");
	assert_eq!(access_record.data["access_secret"], "as-1");
}

#[tokio::test]
async fn unknown_request_token_is_credential_missing() {
	let server = MockServer::start_async().await;
	let (service, store, _) = build_reqwest_test_service(build_endpoints(&server));

	service
		.setup_app(AppMeta::default().with_consumer("K", "S"))
		.await
		.expect("Provisioning should succeed.");

	let err = service
		.oauth1_get_access_token("forged", "verifier1")
		.await
		.expect_err("Unknown request tokens must fail.");

	assert!(matches!(
		err,
		Error::CredentialMissing { ref key, .. } if key == "request_forged_token"
	));
	assert!(store.records(&twitter()).iter().all(|record| !record.key.as_str().starts_with("access_")));
}

#[tokio::test]
async fn rejected_verifier_surfaces_provider_rejection() {
	let server = MockServer::start_async().await;
	let (service, store, _) = build_reqwest_test_service(build_endpoints(&server));

	service
		.setup_app(AppMeta::default().with_consumer("K", "S"))
		.await
		.expect("Provisioning should succeed.");
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token");
			then.status(200)
				.body("oauth_token=tok-1&oauth_token_secret=sec-1&oauth_callback_confirmed=true");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(401).body("Error processing your OAuth request: Invalid oauth_verifier parameter");
		})
		.await;
	service.get_oauth1_url(&AppName::default()).await.expect("Authorization URL should be produced.");

	let err = service
		.oauth1_get_access_token("tok-1", "wrong-verifier")
		.await
		.expect_err("A refused verifier must fail.");

	match err {
		Error::Rejected { status, reason } => {
			assert_eq!(status, Some(401));
			assert!(reason.contains("Invalid oauth_verifier parameter"));
		},
		other => panic!("Expected a provider rejection, got {other:?}."),
	}

	// The parked secret stays in place after a failed exchange.
	assert!(
		store.records(&twitter()).iter().any(|record| record.key == SecretKey::request("tok-1"))
	);
}

#[tokio::test]
async fn missing_app_credential_blocks_authorization() {
	let server = MockServer::start_async().await;
	let (service, store, _) = build_reqwest_test_service(build_endpoints(&server));
	let err = service
		.get_oauth1_url(&AppName::default())
		.await
		.expect_err("Authorization without app credentials must fail.");

	assert!(matches!(err, Error::CredentialMissing { ref key, .. } if key == "app_default_key"));
	assert!(store.is_empty());
}

#[tokio::test]
async fn provider_outage_is_transient() {
	let server = MockServer::start_async().await;
	let (service, store, _) = build_reqwest_test_service(build_endpoints(&server));

	service
		.setup_app(AppMeta::default().with_consumer("K", "S"))
		.await
		.expect("Provisioning should succeed.");
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token");
			then.status(503).header("retry-after", "7").body("over capacity");
		})
		.await;

	let err = service
		.get_oauth1_url(&AppName::default())
		.await
		.expect_err("A 503 must fail the first leg.");

	assert!(matches!(
		err,
		Error::Transient(twitter_adapter::error::TransientError::Endpoint {
			status: Some(503),
			retry_after: Some(d),
			..
		}) if d == Duration::seconds(7)
	));
	assert_eq!(store.records(&twitter()).len(), 1, "Only the app credential should be stored.");
}

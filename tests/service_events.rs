#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use serde_json::json;
// self
use twitter_adapter::{
	_preludet::*,
	auth::AppName,
	provider::Oauth1Endpoints,
	service::{EventDelivery, MetaEventOutcome},
};

fn build_service() -> (ReqwestTestService, Arc<twitter_adapter::store::MemorySecretStore>) {
	let endpoints = Oauth1Endpoints::twitter().expect("Twitter endpoints should validate.");
	let (service, store, _) = build_reqwest_test_service(endpoints);

	(service, store)
}

#[tokio::test]
async fn malformed_events_are_discarded_without_side_effects() {
	let (service, store) = build_service();

	for event in [json!({ "origin_url": 42 }), json!({ "title": "no origin" }), json!([])] {
		assert_eq!(service.handle_meta_event(&event), MetaEventOutcome::Discarded);
	}

	assert!(store.is_empty());
	assert!(service.credentials().cached(&AppName::default()).is_none());
	assert!(service.directory().cached(service.flow().service_name()).is_none());
}

#[tokio::test]
async fn well_formed_events_are_accepted_idempotently() {
	let (service, _) = build_service();
	let event = json!({ "origin_url": "https://twitter.com/jack/status/20", "kind": "create" });
	let first = service.handle_meta_event(&event);
	let redelivered = service.handle_meta_event(&event);

	assert_eq!(
		first,
		MetaEventOutcome::Accepted { origin_url: "https://twitter.com/jack/status/20".into() }
	);
	assert_eq!(first, redelivered);
}

#[tokio::test]
async fn service_subscribes_to_meta_create_and_merge() {
	let (service, _) = build_service();
	let subscriptions = service.subscriptions();

	assert_eq!(subscriptions.len(), 1);
	assert_eq!(subscriptions[0].producer, "meta");
	assert_eq!(subscriptions[0].events, ["create", "merge"]);
	assert_eq!(subscriptions[0].delivery, EventDelivery::Pool);
}

#[tokio::test]
async fn content_operations_are_unsupported() {
	let (service, _) = build_service();
	let meta = json!({ "origin_url": "https://twitter.com/jack/status/20" });

	assert!(matches!(
		service.fetch(&meta).await,
		Err(Error::Unsupported { operation: "fetch" })
	));
	assert!(matches!(
		service.download_media(&meta).await,
		Err(Error::Unsupported { operation: "download_media" })
	));
}

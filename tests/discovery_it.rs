#![cfg(all(feature = "reqwest", feature = "test"))]

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// self
use twitter_adapter::{
	_preludet::*,
	auth::ServiceName,
	discovery::{RegistryError, RegistryFuture, ServiceDirectory, ServiceLocation, ServiceRegistry},
	provider::Oauth1Endpoints,
};

/// Registry that suspends mid-lookup and answers each call with a different location.
#[derive(Default)]
struct DriftingRegistry {
	calls: AtomicUsize,
}
impl ServiceRegistry for DriftingRegistry {
	fn service_path<'a>(&'a self, name: &'a ServiceName) -> RegistryFuture<'a, ServiceLocation> {
		Box::pin(async move {
			let call = self.calls.fetch_add(1, Ordering::SeqCst);

			tokio::task::yield_now().await;

			Ok(ServiceLocation::new(format!("/{name}/{call}"), format!("/storage/{name}/{call}")))
		})
	}
}

struct FailingRegistry;
impl ServiceRegistry for FailingRegistry {
	fn service_path<'a>(&'a self, _: &'a ServiceName) -> RegistryFuture<'a, ServiceLocation> {
		Box::pin(async { Err(RegistryError::Backend { message: "control plane down".into() }) })
	}
}

fn twitter() -> ServiceName {
	ServiceName::new(TEST_SERVICE_NAME).expect("Service fixture should be valid.")
}

#[tokio::test]
async fn concurrent_first_callers_converge_on_one_location() {
	let registry = Arc::new(DriftingRegistry::default());
	let directory = ServiceDirectory::new(registry.clone());
	let name = twitter();
	let (a, b, c, d) = tokio::join!(
		directory.resolve(&name),
		directory.resolve(&name),
		directory.resolve(&name),
		directory.resolve(&name),
	);
	let resolved = [a, b, c, d]
		.into_iter()
		.map(|result| result.expect("Every concurrent resolve should succeed."))
		.collect::<Vec<_>>();

	assert!(resolved.windows(2).all(|pair| pair[0] == pair[1]));
	assert_eq!(directory.cached(&name).as_ref(), Some(&resolved[0]));

	let lookups = registry.calls.load(Ordering::SeqCst);

	assert!((1..=4).contains(&lookups));

	let later = directory.resolve(&name).await.expect("Cached resolve should succeed.");

	assert_eq!(later, resolved[0]);
	assert_eq!(registry.calls.load(Ordering::SeqCst), lookups, "Cache hits must not call out.");
}

#[tokio::test]
async fn control_plane_failures_propagate_uncached() {
	let directory = ServiceDirectory::new(Arc::new(FailingRegistry));
	let err = directory.resolve(&twitter()).await.expect_err("Registry failures must propagate.");

	assert!(matches!(err, Error::Registry(RegistryError::Backend { .. })));
	assert!(directory.cached(&twitter()).is_none());
}

#[tokio::test]
async fn service_facade_resolves_its_own_path_once() {
	let endpoints = Oauth1Endpoints::twitter().expect("Twitter endpoints should validate.");
	let (service, _, registry) = build_reqwest_test_service(endpoints);
	let first = service.service_path().await.expect("Service path should resolve.");
	let second = service.service_path().await.expect("Service path should resolve.");

	assert_eq!(first, ServiceLocation::new("/services/twitter", "/storage/twitter"));
	assert_eq!(first, second);
	assert_eq!(registry.lookups(), 1);
}

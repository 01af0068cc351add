//! Service discovery against the control plane, memoized for the life of the process.
//!
//! [`ServiceDirectory`] resolves an adapter's registered location once and keeps it
//! forever. The cache is filled check-then-set without a lock held across the lookup, so
//! concurrent first callers may each hit the registry; the first value written wins and
//! every caller returns that value. Nothing is cached when a lookup fails, and there is
//! no invalidation.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// self
use crate::{
	_prelude::*,
	auth::ServiceName,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Boxed future returned by [`ServiceRegistry`] lookups.
pub type RegistryFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, RegistryError>> + 'a + Send>>;

/// Control-plane capability answering `get_service_path({name})`.
pub trait ServiceRegistry
where
	Self: Send + Sync,
{
	/// Looks up the registered location of `name`.
	fn service_path<'a>(&'a self, name: &'a ServiceName) -> RegistryFuture<'a, ServiceLocation>;
}

/// Network paths registered for an adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLocation {
	/// Path the adapter serves content under.
	pub service_path: String,
	/// Path of the adapter's storage area.
	pub storage_path: String,
}
impl ServiceLocation {
	/// Creates a location from its two paths.
	pub fn new(service_path: impl Into<String>, storage_path: impl Into<String>) -> Self {
		Self { service_path: service_path.into(), storage_path: storage_path.into() }
	}
}

/// Control-plane failures. Propagated to callers as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum RegistryError {
	/// The registry has no entry for the service.
	#[error("Service `{name}` is not registered.")]
	Unknown {
		/// Requested service name.
		name: String,
	},
	/// Registry backend failure.
	#[error("Registry failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Per-instance memo of resolved service locations.
pub struct ServiceDirectory {
	registry: Arc<dyn ServiceRegistry>,
	cache: RwLock<HashMap<ServiceName, ServiceLocation>>,
}
impl ServiceDirectory {
	/// Creates an empty directory backed by `registry`.
	pub fn new(registry: Arc<dyn ServiceRegistry>) -> Self {
		Self { registry, cache: Default::default() }
	}

	/// Returns the cached location without touching the registry.
	pub fn cached(&self, name: &ServiceName) -> Option<ServiceLocation> {
		self.cache.read().get(name).cloned()
	}

	/// Resolves `name`, consulting the registry only on a cache miss.
	pub async fn resolve(&self, name: &ServiceName) -> Result<ServiceLocation> {
		const KIND: FlowKind = FlowKind::ServiceDiscovery;

		if let Some(location) = self.cached(name) {
			return Ok(location);
		}

		let span = FlowSpan::new(KIND, "resolve_service_path");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let fetched = match span.instrument(self.registry.service_path(name)).await {
			Ok(location) => location,
			Err(e) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				return Err(e.into());
			},
		};

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		let mut cache = self.cache.write();

		Ok(cache.entry(name.clone()).or_insert(fetched).clone())
	}
}
impl Debug for ServiceDirectory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServiceDirectory").field("cached", &self.cache.read().len()).finish()
	}
}

/// Registry answering from a fixed table; counts lookups so callers can observe caching.
#[derive(Clone, Debug, Default)]
pub struct StaticServiceRegistry {
	entries: Arc<RwLock<HashMap<ServiceName, ServiceLocation>>>,
	lookups: Arc<AtomicUsize>,
}
impl StaticServiceRegistry {
	/// Adds (or replaces) an entry and returns the registry.
	pub fn with_location(self, name: ServiceName, location: ServiceLocation) -> Self {
		self.insert(name, location);

		self
	}

	/// Adds (or replaces) an entry.
	pub fn insert(&self, name: ServiceName, location: ServiceLocation) {
		self.entries.write().insert(name, location);
	}

	/// Number of lookups served so far, successful or not.
	pub fn lookups(&self) -> usize {
		self.lookups.load(Ordering::Relaxed)
	}
}
impl ServiceRegistry for StaticServiceRegistry {
	fn service_path<'a>(&'a self, name: &'a ServiceName) -> RegistryFuture<'a, ServiceLocation> {
		Box::pin(async move {
			self.lookups.fetch_add(1, Ordering::Relaxed);

			self.entries
				.read()
				.get(name)
				.cloned()
				.ok_or_else(|| RegistryError::Unknown { name: name.to_string() })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn twitter() -> ServiceName {
		ServiceName::new("twitter").expect("Service fixture should be valid.")
	}

	#[tokio::test]
	async fn second_resolve_is_served_from_cache() {
		let registry = StaticServiceRegistry::default()
			.with_location(twitter(), ServiceLocation::new("/svc/twitter", "/data/twitter"));
		let directory = ServiceDirectory::new(Arc::new(registry.clone()));

		assert!(directory.cached(&twitter()).is_none());

		let first = directory.resolve(&twitter()).await.expect("First resolve should succeed.");
		let second = directory.resolve(&twitter()).await.expect("Second resolve should succeed.");

		assert_eq!(first, second);
		assert_eq!(first.service_path, "/svc/twitter");
		assert_eq!(registry.lookups(), 1);
	}

	#[tokio::test]
	async fn failures_propagate_and_are_not_cached() {
		let registry = StaticServiceRegistry::default();
		let directory = ServiceDirectory::new(Arc::new(registry.clone()));
		let err = directory
			.resolve(&twitter())
			.await
			.expect_err("Unregistered services should fail to resolve.");

		assert!(matches!(err, Error::Registry(RegistryError::Unknown { .. })));

		registry.insert(twitter(), ServiceLocation::new("/late", "/late-storage"));

		let location =
			directory.resolve(&twitter()).await.expect("Resolve should retry after a failure.");

		assert_eq!(location.storage_path, "/late-storage");
		assert_eq!(registry.lookups(), 2);
	}

	#[tokio::test]
	async fn first_cached_value_wins_over_later_lookups() {
		let registry = StaticServiceRegistry::default()
			.with_location(twitter(), ServiceLocation::new("/first", "/first-storage"));
		let directory = ServiceDirectory::new(Arc::new(registry.clone()));
		let first = directory.resolve(&twitter()).await.expect("Resolve should succeed.");

		registry.insert(twitter(), ServiceLocation::new("/moved", "/moved-storage"));

		let again = directory.resolve(&twitter()).await.expect("Resolve should succeed.");

		assert_eq!(first, again);
		assert_eq!(registry.lookups(), 1);
	}
}

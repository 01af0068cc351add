//! Thread-safe in-memory [`SecretStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::ServiceName,
	store::{SecretKey, SecretLocator, SecretRecord, SecretStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<SecretLocator, SecretRecord>>>;

/// Thread-safe storage backend that keeps records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemorySecretStore(StoreMap);
impl MemorySecretStore {
	/// Returns every record stored under `name`, sorted by key.
	pub fn records(&self, name: &ServiceName) -> Vec<SecretRecord> {
		let mut records: Vec<_> =
			self.0.read().values().filter(|record| &record.name == name).cloned().collect();

		records.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));

		records
	}

	/// Number of records across all namespaces.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing has been stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn put_now(map: StoreMap, record: SecretRecord) -> Result<(), StoreError> {
		map.write().insert(record.locator(), record);

		Ok(())
	}

	fn get_now(map: StoreMap, name: ServiceName, key: SecretKey) -> Option<SecretRecord> {
		let locator = SecretLocator { name, key };

		map.read().get(&locator).cloned()
	}
}
impl SecretStore for MemorySecretStore {
	fn put(&self, record: SecretRecord) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::put_now(map, record) })
	}

	fn get<'a>(
		&'a self,
		name: &'a ServiceName,
		key: &'a SecretKey,
	) -> StoreFuture<'a, Option<SecretRecord>> {
		let map = self.0.clone();
		let name = name.to_owned();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::get_now(map, name, key)) })
	}
}

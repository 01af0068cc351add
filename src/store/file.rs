//! Simple file-backed [`SecretStore`] for single-node deployments.

// std
use std::{
	fs::{self, File},
	io::{self, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::ServiceName,
	store::{SecretKey, SecretLocator, SecretRecord, SecretStore, StoreError, StoreFuture},
};

/// Secret store persisted as one pretty-printed JSON array of records.
///
/// Every `put` rewrites the whole file through a sibling `.tmp` file and a rename, so a
/// crash leaves either the previous or the new snapshot on disk.
#[derive(Clone, Debug)]
pub struct FileSecretStore {
	path: PathBuf,
	records: Arc<RwLock<HashMap<SecretLocator, SecretRecord>>>,
}
impl FileSecretStore {
	/// Opens the store at `path`, creating parent directories and loading any snapshot.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		create_parent(&path)?;

		let records = if path.exists() { read_snapshot(&path)? } else { HashMap::new() };

		Ok(Self { path, records: Arc::new(RwLock::new(records)) })
	}

	/// Location of the snapshot file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn write_snapshot(
		&self,
		records: &HashMap<SecretLocator, SecretRecord>,
	) -> Result<(), StoreError> {
		let mut ordered = records.values().collect::<Vec<_>>();

		ordered.sort_by(|a, b| (&*a.name, a.key.as_str()).cmp(&(&*b.name, b.key.as_str())));

		let bytes = serde_json::to_vec_pretty(&ordered).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize secret snapshot: {e}"),
		})?;
		let staging = self.path.with_extension("tmp");
		let mut file = File::create(&staging).map_err(backend("create", &staging))?;

		file.write_all(&bytes).map_err(backend("write", &staging))?;
		file.sync_all().map_err(backend("sync", &staging))?;
		drop(file);

		fs::rename(&staging, &self.path).map_err(backend("replace", &self.path))
	}
}
impl SecretStore for FileSecretStore {
	fn put(&self, record: SecretRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut records = self.records.write();
			let locator = record.locator();
			let previous = records.insert(locator.clone(), record);

			if let Err(e) = self.write_snapshot(&records) {
				// Keep memory in step with the file.
				match previous {
					Some(previous) => records.insert(locator, previous),
					None => records.remove(&locator),
				};

				return Err(e);
			}

			Ok(())
		})
	}

	fn get<'a>(
		&'a self,
		name: &'a ServiceName,
		key: &'a SecretKey,
	) -> StoreFuture<'a, Option<SecretRecord>> {
		Box::pin(async move {
			Ok(self.records.read().get(&SecretLocator::new(name, key)).cloned())
		})
	}
}

fn read_snapshot(path: &Path) -> Result<HashMap<SecretLocator, SecretRecord>, StoreError> {
	let bytes = fs::read(path).map_err(backend("read", path))?;

	if bytes.is_empty() {
		return Ok(HashMap::new());
	}

	let records = serde_json::from_slice::<Vec<SecretRecord>>(&bytes).map_err(|e| {
		StoreError::Serialization { message: format!("Failed to parse {}: {e}", path.display()) }
	})?;

	Ok(records.into_iter().map(|record| (record.locator(), record)).collect())
}

fn create_parent(path: &Path) -> Result<(), StoreError> {
	match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		Some(parent) => fs::create_dir_all(parent).map_err(backend("create directory", parent)),
		None => Ok(()),
	}
}

fn backend(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> StoreError {
	let path = path.display().to_string();

	move |e| StoreError::Backend { message: format!("Failed to {action} {path}: {e}") }
}

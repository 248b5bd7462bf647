//! Storage backends the persistence gateway loads from and saves to.

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};

use super::types::Node;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	/// The backend cannot be reached at all (no window, storage disabled).
	#[error("storage unavailable: {0}")]
	Unavailable(String),
	#[error("failed to serialize nodes: {0}")]
	Serialize(#[source] serde_json::Error),
	#[error("failed to parse stored nodes: {0}")]
	Deserialize(#[source] serde_json::Error),
	/// The backend rejected the operation.
	#[error("storage backend error: {0}")]
	Backend(String),
}

/// Where the node forest lives between sessions.
///
/// Futures are `!Send`: everything runs on the UI thread. Saving the same
/// list twice must leave the backend unchanged.
pub trait NodeStorage {
	fn load(&self) -> LocalBoxFuture<'static, Result<Vec<Node>, StorageError>>;
	fn save(&self, nodes: Vec<Node>) -> LocalBoxFuture<'static, Result<(), StorageError>>;
}

impl<S: NodeStorage + ?Sized> NodeStorage for Rc<S> {
	fn load(&self) -> LocalBoxFuture<'static, Result<Vec<Node>, StorageError>> {
		(**self).load()
	}

	fn save(&self, nodes: Vec<Node>) -> LocalBoxFuture<'static, Result<(), StorageError>> {
		(**self).save(nodes)
	}
}

#[derive(Debug, Default)]
struct MemoryInner {
	stored: Vec<Node>,
	saves: Vec<Vec<Node>>,
	fail_load: bool,
	fail_saves: bool,
}

/// In-process storage. Clones share the same contents. Records every save so
/// callers can inspect what was sent.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
	inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_nodes(nodes: Vec<Node>) -> Self {
		let storage = Self::new();
		storage.inner.borrow_mut().stored = nodes;
		storage
	}

	pub fn stored(&self) -> Vec<Node> {
		self.inner.borrow().stored.clone()
	}

	/// Every list passed to `save`, oldest first, including failed attempts.
	pub fn saves(&self) -> Vec<Vec<Node>> {
		self.inner.borrow().saves.clone()
	}

	pub fn save_count(&self) -> usize {
		self.inner.borrow().saves.len()
	}

	pub fn fail_load(&self, fail: bool) {
		self.inner.borrow_mut().fail_load = fail;
	}

	pub fn fail_saves(&self, fail: bool) {
		self.inner.borrow_mut().fail_saves = fail;
	}
}

impl NodeStorage for MemoryStorage {
	fn load(&self) -> LocalBoxFuture<'static, Result<Vec<Node>, StorageError>> {
		let inner = self.inner.borrow();
		let result = if inner.fail_load {
			Err(StorageError::Backend("load rejected".to_string()))
		} else {
			Ok(inner.stored.clone())
		};
		future::ready(result).boxed_local()
	}

	fn save(&self, nodes: Vec<Node>) -> LocalBoxFuture<'static, Result<(), StorageError>> {
		let mut inner = self.inner.borrow_mut();
		inner.saves.push(nodes.clone());
		let result = if inner.fail_saves {
			Err(StorageError::Backend("save rejected".to_string()))
		} else {
			inner.stored = nodes;
			Ok(())
		};
		future::ready(result).boxed_local()
	}
}

/// Browser `localStorage`, one JSON array per session key.
#[derive(Clone, Debug)]
pub struct BrowserStorage {
	key: String,
}

impl BrowserStorage {
	pub fn new(session_id: &str) -> Self {
		Self {
			key: format!("concept-canvas:{session_id}"),
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	fn storage() -> Result<web_sys::Storage, StorageError> {
		let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
		window
			.local_storage()
			.map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
			.ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
	}

	/// Whether `localStorage` can be reached in this environment.
	pub fn is_available() -> bool {
		Self::storage().is_ok()
	}

	fn read(&self) -> Result<Vec<Node>, StorageError> {
		let raw = Self::storage()?
			.get_item(&self.key)
			.map_err(|e| StorageError::Backend(format!("{e:?}")))?;
		match raw {
			Some(json) if !json.trim().is_empty() => {
				serde_json::from_str(&json).map_err(StorageError::Deserialize)
			}
			_ => Ok(Vec::new()),
		}
	}

	fn write(&self, nodes: &[Node]) -> Result<(), StorageError> {
		let json = serde_json::to_string(nodes).map_err(StorageError::Serialize)?;
		Self::storage()?
			.set_item(&self.key, &json)
			.map_err(|e| StorageError::Backend(format!("{e:?}")))
	}
}

impl NodeStorage for BrowserStorage {
	fn load(&self) -> LocalBoxFuture<'static, Result<Vec<Node>, StorageError>> {
		future::ready(self.read()).boxed_local()
	}

	fn save(&self, nodes: Vec<Node>) -> LocalBoxFuture<'static, Result<(), StorageError>> {
		future::ready(self.write(&nodes)).boxed_local()
	}
}

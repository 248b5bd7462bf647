//! Debounced saving and one-shot loading of the node forest.
//!
//! Mutations restart a single debounce deadline; a save fires only once the
//! deadline passes with no further mutation. Fired saves go through a
//! queue-of-one so at most one is in flight: a snapshot fired during a slow
//! save is parked, and a newer one replaces it. Failures are logged and
//! dropped. The in-memory forest is never rolled back.
//!
//! Nothing is saved until the host reports a successful initial load with
//! [`PersistenceGateway::mark_loaded`], so a failed load cannot be followed by
//! a save that overwrites the stored forest.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use log::{debug, error, info};

use super::storage::NodeStorage;
use super::store::NodeStore;
use super::types::Node;

/// Single restartable deadline. Times are milliseconds on any monotonic
/// clock the caller likes (`Date.now()` in the browser, a counter in tests).
#[derive(Clone, Debug, PartialEq)]
pub struct Debouncer {
	delay_ms: f64,
	deadline: Option<f64>,
}

impl Debouncer {
	pub fn new(delay_ms: f64) -> Self {
		Self {
			delay_ms,
			deadline: None,
		}
	}

	pub fn delay_ms(&self) -> f64 {
		self.delay_ms
	}

	/// Restart the quiet period. Replaces any earlier deadline.
	pub fn touch(&mut self, now: f64) -> f64 {
		let deadline = now + self.delay_ms;
		self.deadline = Some(deadline);
		deadline
	}

	pub fn deadline(&self) -> Option<f64> {
		self.deadline
	}

	pub fn is_pending(&self) -> bool {
		self.deadline.is_some()
	}

	/// Consume the deadline if it has passed.
	pub fn fire_if_due(&mut self, now: f64) -> bool {
		match self.deadline {
			Some(deadline) if now >= deadline => {
				self.deadline = None;
				true
			}
			_ => false,
		}
	}

	pub fn cancel(&mut self) {
		self.deadline = None;
	}
}

/// Serializes outgoing saves: one in flight, at most one parked.
#[derive(Clone, Debug, Default)]
pub struct SaveQueue {
	in_flight: bool,
	parked: Option<Vec<Node>>,
}

impl SaveQueue {
	/// Offer a snapshot. Returns it back if it should be sent right away;
	/// otherwise it is parked, replacing any older parked snapshot.
	pub fn submit(&mut self, snapshot: Vec<Node>) -> Option<Vec<Node>> {
		if self.in_flight {
			self.parked = Some(snapshot);
			None
		} else {
			self.in_flight = true;
			Some(snapshot)
		}
	}

	/// Mark the in-flight save finished. Returns the parked snapshot, which
	/// is now in flight, if there was one.
	pub fn complete(&mut self) -> Option<Vec<Node>> {
		let next = self.parked.take();
		self.in_flight = next.is_some();
		next
	}

	pub fn is_in_flight(&self) -> bool {
		self.in_flight
	}
}

/// Connects the node store to a [`NodeStorage`] backend.
pub struct PersistenceGateway<S> {
	storage: Rc<S>,
	debouncer: Debouncer,
	queue: Rc<RefCell<SaveQueue>>,
	loaded: bool,
}

impl<S: NodeStorage + 'static> PersistenceGateway<S> {
	pub fn new(storage: S, delay_ms: f64) -> Self {
		Self {
			storage: Rc::new(storage),
			debouncer: Debouncer::new(delay_ms),
			queue: Rc::new(RefCell::new(SaveQueue::default())),
			loaded: false,
		}
	}

	pub fn storage(&self) -> &S {
		&self.storage
	}

	pub fn debouncer(&self) -> &Debouncer {
		&self.debouncer
	}

	pub fn is_saving(&self) -> bool {
		self.queue.borrow().is_in_flight()
	}

	/// Open the gate for saves once the initial load has succeeded.
	pub fn mark_loaded(&mut self) {
		self.loaded = true;
	}

	pub fn is_loaded(&self) -> bool {
		self.loaded
	}

	/// Record a store mutation at `now`. Returns the new deadline; the host
	/// should clear its old timer and arm one for this time. `None` before
	/// the initial load succeeded, when no save may be scheduled.
	pub fn note_mutation(&mut self, now: f64) -> Option<f64> {
		if !self.loaded {
			return None;
		}
		Some(self.debouncer.touch(now))
	}

	/// Cancel a pending (not yet fired) save. In-flight saves are unaffected.
	pub fn cancel_pending(&mut self) {
		self.debouncer.cancel();
	}

	/// Called when the host timer elapses. If the deadline has passed and the
	/// store is not empty, returns the save work to spawn. `None` when there
	/// is nothing to do right now, including when the snapshot was parked
	/// behind an in-flight save (the running save will pick it up).
	pub fn flush_due(&mut self, now: f64, store: &NodeStore) -> Option<LocalBoxFuture<'static, ()>> {
		if !self.loaded || !self.debouncer.fire_if_due(now) {
			return None;
		}
		if store.is_empty() {
			debug!("concept-canvas: skipping save of an empty forest");
			return None;
		}
		let first = self.queue.borrow_mut().submit(store.snapshot());
		let Some(first) = first else {
			debug!("concept-canvas: save in flight, parked newer snapshot");
			return None;
		};
		Some(drain(self.storage.clone(), self.queue.clone(), first).boxed_local())
	}

	/// One-shot fetch of the stored forest. `None` on failure, after logging;
	/// the caller leaves its store empty in that case.
	pub fn load(&self) -> impl Future<Output = Option<Vec<Node>>> + use<S> {
		let pending = self.storage.load();
		async move {
			match pending.await {
				Ok(nodes) => {
					info!("concept-canvas: loaded {} nodes", nodes.len());
					Some(nodes)
				}
				Err(e) => {
					error!("concept-canvas: failed to load nodes: {}", e);
					None
				}
			}
		}
	}
}

async fn drain<S: NodeStorage>(storage: Rc<S>, queue: Rc<RefCell<SaveQueue>>, mut batch: Vec<Node>) {
	loop {
		let count = batch.len();
		match storage.save(batch).await {
			Ok(()) => info!("concept-canvas: saved {} nodes", count),
			Err(e) => error!("concept-canvas: failed to save {} nodes: {}", count, e),
		}
		let next = queue.borrow_mut().complete();
		match next {
			Some(parked) => batch = parked,
			None => break,
		}
	}
}

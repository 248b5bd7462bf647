//! Subtree closure for deletes.

use std::collections::HashSet;

use log::warn;

use super::store::NodeStore;
use super::types::NodeId;

/// Every id in `requested` that exists, plus all of their descendants.
///
/// Rescans the whole store until a pass adds nothing. Passes are capped at
/// the node count, so a corrupted parent cycle cannot spin forever.
pub fn descendant_closure(store: &NodeStore, requested: &HashSet<NodeId>) -> HashSet<NodeId> {
	let mut closure: HashSet<NodeId> = requested.iter().filter(|id| store.contains(id)).cloned().collect();
	if closure.is_empty() {
		return closure;
	}

	let mut passes = 0;
	loop {
		let added: Vec<NodeId> = store
			.iter()
			.filter(|n| !closure.contains(&n.id))
			.filter(|n| n.parent_id.as_ref().is_some_and(|p| closure.contains(p)))
			.map(|n| n.id.clone())
			.collect();
		if added.is_empty() {
			break;
		}
		closure.extend(added);
		passes += 1;
		if passes > store.len() {
			warn!("concept-canvas: delete closure exceeded {} passes, parent links look cyclic", store.len());
			break;
		}
	}
	closure
}

/// Remove `requested` and every descendant from `store` in one mutation.
/// Returns the ids actually removed.
pub fn cascade_delete(store: &mut NodeStore, requested: &HashSet<NodeId>) -> HashSet<NodeId> {
	let closure = descendant_closure(store, requested);
	store.remove_many(&closure);
	closure
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_editor::types::{Node, NodeKind, Point};

	fn forest() -> NodeStore {
		let mut store = NodeStore::new();
		let raw = [
			("p1", NodeKind::Project, None),
			("o1", NodeKind::Objective, Some("p1")),
			("o2", NodeKind::Objective, Some("p1")),
			("c1", NodeKind::Concept, Some("o1")),
			("c2", NodeKind::Concept, Some("o2")),
			("p2", NodeKind::Project, None),
			("o3", NodeKind::Objective, Some("p2")),
		];
		for (id, kind, parent) in raw {
			store.insert(Node {
				id: id.into(),
				parent_id: parent.map(NodeId::from),
				..Node::new(kind, id, None, Point::ZERO)
			});
		}
		store
	}

	fn set(ids: &[&str]) -> HashSet<NodeId> {
		ids.iter().map(|&s| NodeId::from(s)).collect()
	}

	#[test]
	fn removes_exactly_the_subtrees() {
		let mut store = forest();
		let removed = cascade_delete(&mut store, &set(&["o1", "p2"]));
		assert_eq!(removed, set(&["o1", "c1", "p2", "o3"]));
		let left: HashSet<NodeId> = store.ids().into_iter().collect();
		assert_eq!(left, set(&["p1", "o2", "c2"]));
		assert!(store.anomalies().is_empty());
	}

	#[test]
	fn idempotent_and_ignores_unknown_ids() {
		let mut store = forest();
		cascade_delete(&mut store, &set(&["p1"]));
		let after_first = store.ids();
		let removed = cascade_delete(&mut store, &set(&["p1", "nope"]));
		assert!(removed.is_empty());
		assert_eq!(store.ids(), after_first);
	}

	#[test]
	fn terminates_on_cycles() {
		let mut store = NodeStore::new();
		for (id, parent) in [("a", "c"), ("b", "a"), ("c", "b"), ("d", "x")] {
			store.insert(Node {
				id: id.into(),
				parent_id: Some(parent.into()),
				..Node::new(NodeKind::Objective, id, None, Point::ZERO)
			});
		}
		let removed = cascade_delete(&mut store, &set(&["b"]));
		assert_eq!(removed, set(&["a", "b", "c"]));
		assert_eq!(store.ids(), vec![NodeId::from("d")]);
	}
}

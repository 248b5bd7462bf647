//! Selected node ids and marquee hit testing.

use std::collections::HashSet;

use super::store::NodeStore;
use super::types::{NodeId, Rect};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	ids: HashSet<NodeId>,
}

impl Selection {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, id: &NodeId) -> bool {
		self.ids.contains(id)
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	pub fn ids(&self) -> &HashSet<NodeId> {
		&self.ids
	}

	/// The selected id when exactly one node is selected.
	pub fn single(&self) -> Option<&NodeId> {
		if self.ids.len() == 1 {
			self.ids.iter().next()
		} else {
			None
		}
	}

	/// Click selection. Additive (shift) flips membership of `id`; otherwise
	/// the selection becomes exactly `{id}`. Returns whether anything changed.
	pub fn toggle_select(&mut self, id: &NodeId, additive: bool) -> bool {
		if additive {
			if !self.ids.remove(id) {
				self.ids.insert(id.clone());
			}
			return true;
		}
		if self.single() == Some(id) {
			return false;
		}
		self.ids.clear();
		self.ids.insert(id.clone());
		true
	}

	pub fn clear(&mut self) -> bool {
		let changed = !self.ids.is_empty();
		self.ids.clear();
		changed
	}

	/// Add every node strictly inside `rect` (world-space). Never removes:
	/// a non-additive marquee clears the selection when it starts, not here.
	pub fn box_select(&mut self, rect: &Rect, store: &NodeStore) -> usize {
		let before = self.ids.len();
		self.ids.extend(
			store
				.iter()
				.filter(|n| rect.contains_strict(n.position))
				.map(|n| n.id.clone()),
		);
		self.ids.len() - before
	}

	/// Drop ids that no longer exist, e.g. after a delete.
	pub fn forget<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>) {
		for id in ids {
			self.ids.remove(id);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_editor::types::{Node, NodeKind, Point};

	fn store_at(points: &[(f64, f64)]) -> (NodeStore, Vec<NodeId>) {
		let mut store = NodeStore::new();
		let mut ids = Vec::new();
		for &(x, y) in points {
			let node = Node::new(NodeKind::Project, "n", None, Point::new(x, y));
			ids.push(node.id.clone());
			store.insert(node);
		}
		(store, ids)
	}

	#[test]
	fn plain_click_replaces_and_shift_click_toggles() {
		let (a, b) = (NodeId::from("a"), NodeId::from("b"));
		let mut sel = Selection::new();
		assert!(sel.toggle_select(&a, false));
		assert!(!sel.toggle_select(&a, false));
		assert!(sel.toggle_select(&b, true));
		assert_eq!(sel.len(), 2);
		assert!(sel.toggle_select(&a, true));
		assert_eq!(sel.single(), Some(&b));
		sel.toggle_select(&a, true);
		assert!(sel.toggle_select(&a, false));
		assert_eq!(sel.single(), Some(&a));
	}

	#[test]
	fn marquee_uses_open_interval() {
		let (store, ids) = store_at(&[(0.0, 0.0), (5.0, 5.0), (20.0, 20.0), (10.0, 3.0)]);
		let mut sel = Selection::new();
		let rect = Rect::from_corners(Point::new(-1.0, -1.0), Point::new(10.0, 10.0));
		assert_eq!(sel.box_select(&rect, &store), 2);
		assert!(sel.contains(&ids[0]));
		assert!(sel.contains(&ids[1]));
		assert!(!sel.contains(&ids[2]));
		assert!(!sel.contains(&ids[3]));
	}

	#[test]
	fn marquee_unions_with_existing_selection() {
		let (store, ids) = store_at(&[(0.0, 0.0), (50.0, 50.0)]);
		let mut sel = Selection::new();
		sel.toggle_select(&ids[1], false);
		let rect = Rect::from_corners(Point::new(-1.0, -1.0), Point::new(1.0, 1.0));
		sel.box_select(&rect, &store);
		assert_eq!(sel.len(), 2);
	}
}

//! Insertion-ordered node storage with parent/child queries.

use std::collections::{HashMap, HashSet};

use super::types::{Node, NodeId, NodeKind, Point};

/// Data-integrity problems found in a loaded forest. Never produced by the
/// editor's own operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Anomaly {
	/// `parent_id` points at a node that does not exist.
	DanglingParent { id: NodeId, parent_id: NodeId },
	/// Parent exists but is not the immediately senior tier.
	TierMismatch { id: NodeId, kind: NodeKind, parent_kind: Option<NodeKind> },
	/// Following parent links from `id` never reaches a root.
	ParentCycle { id: NodeId },
	/// A second record reused an id; the later one was dropped.
	DuplicateId { id: NodeId },
}

/// Flat node map keyed by id that remembers insertion order.
#[derive(Clone, Debug, Default)]
pub struct NodeStore {
	nodes: Vec<Node>,
	index: HashMap<NodeId, usize>,
}

impl NodeStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace the whole forest. Records with an id that was already seen are
	/// dropped and reported; nothing else is filtered or truncated.
	pub fn replace_all(&mut self, nodes: Vec<Node>) -> Vec<Anomaly> {
		self.nodes.clear();
		self.index.clear();
		let mut anomalies = Vec::new();
		for node in nodes {
			let id = node.id.clone();
			if !self.insert(node) {
				anomalies.push(Anomaly::DuplicateId { id });
			}
		}
		anomalies
	}

	/// Append a node. Returns `false` (and leaves the store untouched) when
	/// the id is already present.
	pub fn insert(&mut self, node: Node) -> bool {
		if self.index.contains_key(&node.id) {
			return false;
		}
		self.index.insert(node.id.clone(), self.nodes.len());
		self.nodes.push(node);
		true
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn contains(&self, id: &NodeId) -> bool {
		self.index.contains_key(id)
	}

	pub fn get(&self, id: &NodeId) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
		self.index.get(id).map(|&i| &mut self.nodes[i])
	}

	/// Nodes in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter()
	}

	pub fn ids(&self) -> Vec<NodeId> {
		self.nodes.iter().map(|n| n.id.clone()).collect()
	}

	pub fn roots(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter().filter(|n| n.is_root())
	}

	pub fn children_of<'a>(&'a self, parent: &'a NodeId) -> impl Iterator<Item = &'a Node> + 'a {
		self.nodes
			.iter()
			.filter(move |n| n.parent_id.as_ref() == Some(parent))
	}

	pub fn child_count(&self, parent: &NodeId) -> usize {
		self.children_of(parent).count()
	}

	pub fn root_count(&self) -> usize {
		self.roots().count()
	}

	pub fn set_position(&mut self, id: &NodeId, position: Point) -> bool {
		match self.get_mut(id) {
			Some(node) => {
				node.position = position;
				true
			}
			None => false,
		}
	}

	/// Remove every node in `ids` in one pass, preserving the order of the
	/// survivors. Returns the removed nodes.
	pub fn remove_many(&mut self, ids: &HashSet<NodeId>) -> Vec<Node> {
		if ids.is_empty() {
			return Vec::new();
		}
		let (removed, kept): (Vec<Node>, Vec<Node>) =
			std::mem::take(&mut self.nodes).into_iter().partition(|n| ids.contains(&n.id));
		self.nodes = kept;
		self.reindex();
		removed
	}

	/// Owned copy of the forest in insertion order, for persistence.
	pub fn snapshot(&self) -> Vec<Node> {
		self.nodes.clone()
	}

	fn reindex(&mut self) {
		self.index = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
	}

	/// Check tier and parent-link invariants without modifying anything.
	pub fn anomalies(&self) -> Vec<Anomaly> {
		let mut found = Vec::new();
		for node in &self.nodes {
			match &node.parent_id {
				Some(parent_id) => match self.get(parent_id) {
					Some(parent) if Some(parent.kind) != node.kind.parent_kind() => {
						found.push(Anomaly::TierMismatch {
							id: node.id.clone(),
							kind: node.kind,
							parent_kind: Some(parent.kind),
						});
					}
					Some(_) => {}
					None => found.push(Anomaly::DanglingParent {
						id: node.id.clone(),
						parent_id: parent_id.clone(),
					}),
				},
				None if node.kind != NodeKind::Project => found.push(Anomaly::TierMismatch {
					id: node.id.clone(),
					kind: node.kind,
					parent_kind: None,
				}),
				None => {}
			}
			if self.on_parent_cycle(&node.id) {
				found.push(Anomaly::ParentCycle { id: node.id.clone() });
			}
		}
		found
	}

	fn on_parent_cycle(&self, start: &NodeId) -> bool {
		let mut current = self.get(start).and_then(|n| n.parent_id.as_ref());
		// A well-formed chain is at most `len` links long.
		for _ in 0..self.nodes.len() {
			match current {
				Some(id) if id == start => return true,
				Some(id) => current = self.get(id).and_then(|n| n.parent_id.as_ref()),
				None => return false,
			}
		}
		current.is_some()
	}
}

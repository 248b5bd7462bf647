//! Tier population caps.
//!
//! Caps only gate creation from UI actions. A forest loaded from storage may
//! already exceed them and is left as-is. Counts are taken fresh on every
//! call since siblings may have been deleted since the last check.

use super::config::EditorConfig;
use super::store::NodeStore;
use super::types::{NodeId, NodeKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityPolicy {
	pub max_projects: usize,
	pub max_objectives_per_project: usize,
	pub max_concepts_per_objective: usize,
}

impl Default for CapacityPolicy {
	fn default() -> Self {
		Self::from_config(&EditorConfig::default())
	}
}

impl CapacityPolicy {
	pub fn from_config(config: &EditorConfig) -> Self {
		Self {
			max_projects: config.max_projects,
			max_objectives_per_project: config.max_objectives_per_project,
			max_concepts_per_objective: config.max_concepts_per_objective,
		}
	}

	/// Maximum number of direct children a node of `kind` may receive.
	pub fn child_cap(&self, kind: NodeKind) -> usize {
		match kind {
			NodeKind::Project => self.max_objectives_per_project,
			NodeKind::Objective => self.max_concepts_per_objective,
			NodeKind::Concept => 0,
		}
	}

	pub fn can_add_root(&self, store: &NodeStore) -> bool {
		store.root_count() < self.max_projects
	}

	/// Whether one more child may be created under `parent`. Unknown parents
	/// and concept nodes never accept children.
	pub fn can_add_child(&self, store: &NodeStore, parent: &NodeId) -> bool {
		let Some(node) = store.get(parent) else {
			return false;
		};
		node.kind.child_kind().is_some() && store.child_count(parent) < self.child_cap(node.kind)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_editor::types::{Node, Point};

	#[test]
	fn child_caps_follow_parent_tier() {
		let policy = CapacityPolicy {
			max_projects: 1,
			max_objectives_per_project: 2,
			max_concepts_per_objective: 1,
		};
		let mut store = NodeStore::new();
		let project = Node::new(NodeKind::Project, "p", None, Point::ZERO);
		let pid = project.id.clone();
		store.insert(project);
		assert!(!policy.can_add_root(&store));

		assert!(policy.can_add_child(&store, &pid));
		let objective = Node::new(NodeKind::Objective, "o", Some(pid.clone()), Point::ZERO);
		let oid = objective.id.clone();
		store.insert(objective);
		store.insert(Node::new(NodeKind::Objective, "o2", Some(pid.clone()), Point::ZERO));
		assert!(!policy.can_add_child(&store, &pid));

		assert!(policy.can_add_child(&store, &oid));
		let concept = Node::new(NodeKind::Concept, "c", Some(oid.clone()), Point::ZERO);
		let cid = concept.id.clone();
		store.insert(concept);
		assert!(!policy.can_add_child(&store, &oid));
		assert!(!policy.can_add_child(&store, &cid));
		assert!(!policy.can_add_child(&store, &"missing".into()));
	}
}

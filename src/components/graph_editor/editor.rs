//! Headless editor state: everything the canvas component drives, with no
//! dependency on the browser.
//!
//! Every operation reports what it touched as [`Changes`] so the host can
//! re-render positions without re-rendering content, and knows when to
//! schedule a save.

use std::collections::HashSet;
use std::ops::BitOr;

use log::{debug, warn};

use super::capacity::CapacityPolicy;
use super::cascade::cascade_delete;
use super::config::EditorConfig;
use super::ingest::DropPayload;
use super::interaction::{InteractionController, Mode, PointerPress, PointerTarget};
use super::layout::RadialLayout;
use super::selection::Selection;
use super::store::NodeStore;
use super::types::{Node, NodeId, NodeKind, Point, Rect};
use super::viewport::Viewport;

/// What an operation changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Changes {
	/// Node positions moved.
	pub geometry: bool,
	/// Nodes were added, removed, or relabelled.
	pub content: bool,
	/// The selected set changed.
	pub selection: bool,
	/// Pan or zoom changed.
	pub viewport: bool,
	/// The marquee rectangle appeared, moved, or went away.
	pub overlay: bool,
}

impl Changes {
	pub const NONE: Changes = Changes {
		geometry: false,
		content: false,
		selection: false,
		viewport: false,
		overlay: false,
	};

	/// Whether the node store itself was mutated, i.e. a save is owed.
	pub fn store_changed(&self) -> bool {
		self.geometry || self.content
	}

	pub fn is_empty(&self) -> bool {
		*self == Changes::NONE
	}

	fn content() -> Self {
		Changes {
			content: true,
			..Changes::NONE
		}
	}
}

impl BitOr for Changes {
	type Output = Changes;

	fn bitor(self, rhs: Changes) -> Changes {
		Changes {
			geometry: self.geometry || rhs.geometry,
			content: self.content || rhs.content,
			selection: self.selection || rhs.selection,
			viewport: self.viewport || rhs.viewport,
			overlay: self.overlay || rhs.overlay,
		}
	}
}

/// Keys the editor reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorKey {
	Delete,
	Backspace,
	Escape,
	Other,
}

impl EditorKey {
	/// Map a DOM `KeyboardEvent.key` value.
	pub fn from_dom(key: &str) -> Self {
		match key {
			"Delete" => EditorKey::Delete,
			"Backspace" => EditorKey::Backspace,
			"Escape" => EditorKey::Escape,
			_ => EditorKey::Other,
		}
	}
}

/// The editing session: node forest, view, selection, and gesture state.
pub struct EditorState {
	pub store: NodeStore,
	pub viewport: Viewport,
	pub selection: Selection,
	pub interaction: InteractionController,
	capacity: CapacityPolicy,
	layout: RadialLayout,
	config: EditorConfig,
}

impl Default for EditorState {
	fn default() -> Self {
		Self::new(EditorConfig::default())
	}
}

impl EditorState {
	pub fn new(config: EditorConfig) -> Self {
		Self {
			store: NodeStore::new(),
			viewport: Viewport::new(config.min_scale, config.max_scale, config.scale_step),
			selection: Selection::new(),
			interaction: InteractionController::new(),
			capacity: CapacityPolicy::from_config(&config),
			layout: RadialLayout::from_config(&config),
			config,
		}
	}

	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	pub fn capacity(&self) -> &CapacityPolicy {
		&self.capacity
	}

	pub fn marquee(&self) -> Option<Rect> {
		self.interaction.marquee()
	}

	// --- Loading ---

	/// Replace the forest with loaded records. An empty load seeds one
	/// default project at the view center. Integrity problems are logged,
	/// never repaired, and caps are not applied.
	pub fn hydrate(&mut self, nodes: Vec<Node>) -> Changes {
		self.interaction.cancel();
		self.selection.clear();
		let mut anomalies = self.store.replace_all(nodes);
		anomalies.extend(self.store.anomalies());
		for anomaly in &anomalies {
			warn!("concept-canvas: integrity anomaly in loaded data: {:?}", anomaly);
		}
		if self.store.is_empty() {
			debug!("concept-canvas: nothing stored, seeding a default project");
			self.add_project();
		}
		Changes::content() | Changes {
			selection: true,
			overlay: true,
			..Changes::NONE
		}
	}

	// --- Creation ---

	/// Add a root project at its radial slot. `None` when at the cap.
	pub fn add_project(&mut self) -> Option<NodeId> {
		if !self.capacity.can_add_root(&self.store) {
			return None;
		}
		let position = self
			.layout
			.place_root(self.store.root_count(), self.viewport.center_world());
		let node = Node::new(NodeKind::Project, NodeKind::Project.default_label(), None, position);
		Some(self.insert(node))
	}

	/// Add a child of the next tier under `parent`. `None` when the parent is
	/// unknown, is a concept, or is at its cap.
	pub fn add_child(&mut self, parent: &NodeId) -> Option<NodeId> {
		if !self.capacity.can_add_child(&self.store, parent) {
			return None;
		}
		let parent_node = self.store.get(parent)?;
		let kind = parent_node.kind.child_kind()?;
		let siblings: Vec<Point> = self.store.children_of(parent).map(|n| n.position).collect();
		let position = self
			.layout
			.place_next_child(parent_node.position, kind, &siblings);
		let node = Node::new(kind, kind.default_label(), Some(parent.clone()), position);
		Some(self.insert(node))
	}

	/// Turn a drop from outside the editor into a new project placed exactly
	/// at the drop point. Unrecognised payloads are ignored.
	pub fn drop_payload(&mut self, raw: &str, screen: Point) -> Option<NodeId> {
		let DropPayload::Recommendation { title, description } = DropPayload::parse(raw)?;
		if !self.capacity.can_add_root(&self.store) {
			return None;
		}
		let position = self.viewport.to_world(screen);
		let node = Node::new(NodeKind::Project, title, None, position).with_description(description);
		Some(self.insert(node))
	}

	fn insert(&mut self, node: Node) -> NodeId {
		let id = node.id.clone();
		debug!("concept-canvas: created {:?} {}", node.kind, id);
		self.store.insert(node);
		id
	}

	// --- Editing ---

	pub fn set_label(&mut self, id: &NodeId, label: &str) -> Changes {
		match self.store.get_mut(id) {
			Some(node) if node.label != label => {
				node.label = label.to_string();
				Changes::content()
			}
			_ => Changes::NONE,
		}
	}

	/// Set or clear (`""`) the description.
	pub fn set_description(&mut self, id: &NodeId, description: &str) -> Changes {
		let value = (!description.is_empty()).then(|| description.to_string());
		match self.store.get_mut(id) {
			Some(node) if node.description != value => {
				node.description = value;
				Changes::content()
			}
			_ => Changes::NONE,
		}
	}

	// --- Deletion ---

	/// Remove the given nodes and their descendants.
	pub fn delete(&mut self, ids: &HashSet<NodeId>) -> Changes {
		let removed = cascade_delete(&mut self.store, ids);
		if removed.is_empty() {
			return Changes::NONE;
		}
		debug!("concept-canvas: deleted {} nodes", removed.len());
		self.selection.forget(&removed);
		Changes::content() | Changes {
			selection: true,
			..Changes::NONE
		}
	}

	pub fn delete_selected(&mut self) -> Changes {
		let ids = self.selection.ids().clone();
		self.delete(&ids)
	}

	// --- Input ---

	pub fn set_mode(&mut self, mode: Mode) {
		self.interaction.mode = mode;
	}

	pub fn mode(&self) -> Mode {
		self.interaction.mode
	}

	/// Container moved or was resized; call before handling each gesture.
	pub fn set_container(&mut self, origin: Point, width: f64, height: f64) {
		self.viewport.set_origin(origin);
		self.viewport.resize(width, height);
	}

	pub fn pointer_down(&mut self, press: PointerPress, target: PointerTarget) -> Changes {
		self.interaction
			.press(press, target, &self.viewport, &self.store, &mut self.selection)
	}

	pub fn pointer_move(&mut self, point: Point) -> Changes {
		self.interaction
			.motion(point, &mut self.viewport, &mut self.store)
	}

	pub fn pointer_up(&mut self) -> Changes {
		self.interaction.release(&mut self.selection, &self.store)
	}

	pub fn cancel_gesture(&mut self) -> Changes {
		self.interaction.cancel()
	}

	/// Keyboard shortcuts. `editing_text` is true while focus is in a text
	/// field, where Delete/Backspace belong to the field.
	pub fn key_down(&mut self, key: EditorKey, editing_text: bool) -> Changes {
		if editing_text {
			return Changes::NONE;
		}
		match key {
			EditorKey::Delete | EditorKey::Backspace if self.interaction.is_idle() => self.delete_selected(),
			EditorKey::Escape if self.interaction.is_idle() => Changes {
				selection: self.selection.clear(),
				..Changes::NONE
			},
			_ => Changes::NONE,
		}
	}

	// --- View ---

	pub fn zoom_in(&mut self) -> Changes {
		self.apply_view(Viewport::zoom_in)
	}

	pub fn zoom_out(&mut self) -> Changes {
		self.apply_view(Viewport::zoom_out)
	}

	pub fn reset_view(&mut self) -> Changes {
		self.apply_view(Viewport::reset)
	}

	fn apply_view(&mut self, f: impl FnOnce(&mut Viewport)) -> Changes {
		let before = (self.viewport.pan, self.viewport.scale);
		f(&mut self.viewport);
		Changes {
			viewport: before != (self.viewport.pan, self.viewport.scale),
			..Changes::NONE
		}
	}
}

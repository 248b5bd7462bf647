//! Pointer gesture state machine: select, pan, drag, marquee.
//!
//! Each non-idle state carries the anchors recorded at press time. They exist
//! only while the gesture is live and are dropped on release, so nothing
//! about a finished gesture leaks into the next one.

use super::editor::Changes;
use super::selection::Selection;
use super::store::NodeStore;
use super::types::{NodeId, Point, Rect};
use super::viewport::Viewport;

/// What a primary press on empty canvas does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
	#[default]
	Select,
	Pan,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	Primary,
	Middle,
	Secondary,
}

impl PointerButton {
	/// Map a DOM `MouseEvent.button` code.
	pub fn from_dom(button: i16) -> Self {
		match button {
			1 => PointerButton::Middle,
			2 => PointerButton::Secondary,
			_ => PointerButton::Primary,
		}
	}
}

/// What the pointer went down on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerTarget {
	Canvas,
	Node(NodeId),
}

/// A pointer press in screen-space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPress {
	pub point: Point,
	pub button: PointerButton,
	pub shift: bool,
}

impl PointerPress {
	pub fn primary(point: Point) -> Self {
		Self {
			point,
			button: PointerButton::Primary,
			shift: false,
		}
	}

	pub fn with_shift(mut self) -> Self {
		self.shift = true;
		self
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
	#[default]
	Idle,
	Panning {
		/// Screen-space press point.
		anchor: Point,
		pan_at_press: Point,
	},
	DraggingNodes {
		/// Screen-space press point.
		anchor: Point,
		/// World positions of every selected node at press time.
		origins: Vec<(NodeId, Point)>,
	},
	MarqueeSelecting {
		/// World-space corners.
		anchor: Point,
		current: Point,
	},
}

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	pub mode: Mode,
	state: Interaction,
}

impl InteractionController {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> &Interaction {
		&self.state
	}

	pub fn is_idle(&self) -> bool {
		matches!(self.state, Interaction::Idle)
	}

	/// Live marquee rectangle in world-space, if one is being dragged.
	pub fn marquee(&self) -> Option<Rect> {
		match self.state {
			Interaction::MarqueeSelecting { anchor, current } => Some(Rect::from_corners(anchor, current)),
			_ => None,
		}
	}

	/// Start a gesture. Presses that arrive mid-gesture are ignored.
	pub fn press(
		&mut self,
		press: PointerPress,
		target: PointerTarget,
		viewport: &Viewport,
		store: &NodeStore,
		selection: &mut Selection,
	) -> Changes {
		if !self.is_idle() {
			return Changes::NONE;
		}
		let mut changes = Changes::NONE;

		if press.button == PointerButton::Middle {
			self.start_pan(press.point, viewport);
			return changes;
		}
		if press.button == PointerButton::Secondary {
			return changes;
		}

		match target {
			PointerTarget::Node(id) if store.contains(&id) => {
				// Grabbing part of an existing selection drags the whole group.
				let keep_group = !press.shift && selection.contains(&id);
				if !keep_group {
					changes.selection = selection.toggle_select(&id, press.shift);
				}
				let origins = store
					.iter()
					.filter(|n| selection.contains(&n.id))
					.map(|n| (n.id.clone(), n.position))
					.collect();
				self.state = Interaction::DraggingNodes {
					anchor: press.point,
					origins,
				};
			}
			PointerTarget::Node(_) => {}
			PointerTarget::Canvas if self.mode == Mode::Pan => self.start_pan(press.point, viewport),
			PointerTarget::Canvas => {
				if !press.shift {
					changes.selection = selection.clear();
				}
				let anchor = viewport.to_world(press.point);
				self.state = Interaction::MarqueeSelecting { anchor, current: anchor };
				changes.overlay = true;
			}
		}
		changes
	}

	fn start_pan(&mut self, point: Point, viewport: &Viewport) {
		self.state = Interaction::Panning {
			anchor: point,
			pan_at_press: viewport.pan,
		};
	}

	/// Track the pointer while a gesture is live.
	pub fn motion(&mut self, point: Point, viewport: &mut Viewport, store: &mut NodeStore) -> Changes {
		let mut changes = Changes::NONE;
		match &mut self.state {
			Interaction::Idle => {}
			Interaction::Panning { anchor, pan_at_press } => {
				// Pan is a screen-space offset, so no division by scale.
				viewport.pan = *pan_at_press + (point - *anchor);
				changes.viewport = true;
			}
			Interaction::DraggingNodes { anchor, origins } => {
				let delta = (point - *anchor) / viewport.scale;
				for (id, origin) in origins.iter() {
					// A node deleted mid-drag is simply skipped.
					changes.geometry |= store.set_position(id, *origin + delta);
				}
			}
			Interaction::MarqueeSelecting { current, .. } => {
				*current = viewport.to_world(point);
				changes.overlay = true;
			}
		}
		changes
	}

	/// Finish the current gesture and return to idle.
	pub fn release(&mut self, selection: &mut Selection, store: &NodeStore) -> Changes {
		let mut changes = Changes::NONE;
		if let Some(rect) = self.marquee() {
			changes.selection = selection.box_select(&rect, store) > 0;
			changes.overlay = true;
		}
		self.state = Interaction::Idle;
		changes
	}

	/// Abandon the current gesture without applying a marquee.
	pub fn cancel(&mut self) -> Changes {
		let changes = Changes {
			overlay: self.marquee().is_some(),
			..Changes::NONE
		};
		self.state = Interaction::Idle;
		changes
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_editor::types::{Node, NodeKind};

	struct Rig {
		controller: InteractionController,
		viewport: Viewport,
		store: NodeStore,
		selection: Selection,
		ids: Vec<NodeId>,
	}

	impl Rig {
		fn new(points: &[(f64, f64)]) -> Self {
			let mut store = NodeStore::new();
			let mut ids = Vec::new();
			for &(x, y) in points {
				let node = Node::new(NodeKind::Project, "n", None, Point::new(x, y));
				ids.push(node.id.clone());
				store.insert(node);
			}
			Self {
				controller: InteractionController::new(),
				viewport: Viewport::default(),
				store,
				selection: Selection::new(),
				ids,
			}
		}

		fn press(&mut self, press: PointerPress, target: PointerTarget) -> Changes {
			self.controller
				.press(press, target, &self.viewport, &self.store, &mut self.selection)
		}

		fn motion(&mut self, x: f64, y: f64) -> Changes {
			self.controller
				.motion(Point::new(x, y), &mut self.viewport, &mut self.store)
		}

		fn release(&mut self) -> Changes {
			self.controller.release(&mut self.selection, &self.store)
		}

		fn position(&self, i: usize) -> Point {
			self.store.get(&self.ids[i]).map(|n| n.position).unwrap_or_default()
		}
	}

	#[test]
	fn pan_mode_moves_viewport_in_screen_pixels() {
		let mut rig = Rig::new(&[]);
		rig.viewport.set_scale(2.0);
		rig.viewport.pan = Point::new(10.0, 10.0);
		rig.controller.mode = Mode::Pan;
		rig.press(PointerPress::primary(Point::new(100.0, 100.0)), PointerTarget::Canvas);
		assert!(matches!(rig.controller.state(), Interaction::Panning { .. }));
		assert!(rig.motion(130.0, 80.0).viewport);
		assert_eq!(rig.viewport.pan, Point::new(40.0, -10.0));
		rig.release();
		assert!(rig.controller.is_idle());
	}

	#[test]
	fn middle_button_pans_even_in_select_mode() {
		let mut rig = Rig::new(&[(0.0, 0.0)]);
		let press = PointerPress {
			point: Point::new(5.0, 5.0),
			button: PointerButton::Middle,
			shift: false,
		};
		rig.press(press, PointerTarget::Node(rig.ids[0].clone()));
		assert!(matches!(rig.controller.state(), Interaction::Panning { .. }));
		assert!(rig.selection.is_empty());
	}

	#[test]
	fn drag_moves_selection_by_world_delta() {
		let mut rig = Rig::new(&[(0.0, 0.0), (50.0, 10.0), (300.0, 300.0)]);
		rig.viewport.set_scale(0.5);
		rig.selection.toggle_select(&rig.ids[0], false);
		rig.selection.toggle_select(&rig.ids[1], true);

		let target = PointerTarget::Node(rig.ids[1].clone());
		rig.press(PointerPress::primary(Point::new(200.0, 200.0)), target);
		assert_eq!(rig.selection.len(), 2, "grabbing a selected node keeps the group");
		rig.motion(210.0, 195.0);
		let changes = rig.motion(220.0, 190.0);
		assert!(changes.geometry && changes.store_changed());
		rig.release();

		assert_eq!(rig.position(0), Point::new(40.0, -20.0));
		assert_eq!(rig.position(1), Point::new(90.0, -10.0));
		assert_eq!(rig.position(2), Point::new(300.0, 300.0));
	}

	#[test]
	fn pressing_an_unselected_node_selects_only_it() {
		let mut rig = Rig::new(&[(0.0, 0.0), (50.0, 10.0)]);
		rig.selection.toggle_select(&rig.ids[0], false);
		let changes = rig.press(
			PointerPress::primary(Point::ZERO),
			PointerTarget::Node(rig.ids[1].clone()),
		);
		assert!(changes.selection);
		assert_eq!(rig.selection.single(), Some(&rig.ids[1]));
		rig.motion(5.0, 0.0);
		rig.release();
		assert_eq!(rig.position(0), Point::ZERO);
		assert_eq!(rig.position(1), Point::new(55.0, 10.0));
	}

	#[test]
	fn marquee_selects_strictly_inside_nodes() {
		let mut rig = Rig::new(&[(0.0, 0.0), (5.0, 5.0), (20.0, 20.0)]);
		rig.selection.toggle_select(&rig.ids[2], false);
		rig.press(PointerPress::primary(Point::new(-1.0, -1.0)), PointerTarget::Canvas);
		assert!(rig.selection.is_empty(), "plain marquee clears first");
		rig.motion(4.0, 4.0);
		rig.motion(10.0, 10.0);
		assert_eq!(
			rig.controller.marquee(),
			Some(Rect::from_corners(Point::new(-1.0, -1.0), Point::new(10.0, 10.0)))
		);
		let changes = rig.release();
		assert!(changes.selection);
		assert!(rig.controller.marquee().is_none());
		assert_eq!(rig.selection.len(), 2);
		assert!(rig.selection.contains(&rig.ids[0]));
		assert!(rig.selection.contains(&rig.ids[1]));
	}

	#[test]
	fn shift_marquee_keeps_prior_selection() {
		let mut rig = Rig::new(&[(0.0, 0.0), (100.0, 100.0)]);
		rig.selection.toggle_select(&rig.ids[1], false);
		rig.press(
			PointerPress::primary(Point::new(-5.0, -5.0)).with_shift(),
			PointerTarget::Canvas,
		);
		rig.motion(5.0, 5.0);
		rig.release();
		assert_eq!(rig.selection.len(), 2);
	}

	#[test]
	fn marquee_corners_are_world_space() {
		let mut rig = Rig::new(&[(30.0, 30.0)]);
		rig.viewport.set_origin(Point::new(100.0, 100.0));
		rig.viewport.pan = Point::new(-40.0, -40.0);
		rig.viewport.set_scale(2.0);
		// World (30, 30) is on screen at (100 - 40 + 60, ...) = (120, 120).
		rig.press(PointerPress::primary(Point::new(110.0, 110.0)), PointerTarget::Canvas);
		rig.motion(130.0, 130.0);
		rig.release();
		assert!(rig.selection.contains(&rig.ids[0]));
	}

	#[test]
	fn cancel_discards_marquee() {
		let mut rig = Rig::new(&[(0.0, 0.0)]);
		rig.press(PointerPress::primary(Point::new(-5.0, -5.0)), PointerTarget::Canvas);
		rig.motion(5.0, 5.0);
		assert!(rig.controller.cancel().overlay);
		assert!(rig.selection.is_empty());
		assert!(rig.controller.is_idle());
	}
}

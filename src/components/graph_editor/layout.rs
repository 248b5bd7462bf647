//! Placement of newly created nodes.
//!
//! This is a fixed heuristic, not a solver: roots go on a circle around the
//! view center, children fan out to the right of their parent with a
//! perpendicular offset that alternates sides and widens per sibling.
//! Overlap with unrelated branches is not checked.

use std::f64::consts::PI;

use super::config::{ChildLayout, EditorConfig};
use super::types::{NodeKind, Point};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialLayout {
	pub main_radius: f64,
	pub max_projects: usize,
	pub objective: ChildLayout,
	pub concept: ChildLayout,
}

impl Default for RadialLayout {
	fn default() -> Self {
		Self::from_config(&EditorConfig::default())
	}
}

impl RadialLayout {
	pub fn from_config(config: &EditorConfig) -> Self {
		Self {
			main_radius: config.main_radius,
			max_projects: config.max_projects,
			objective: config.objective_layout,
			concept: config.concept_layout,
		}
	}

	/// Position for a new root given how many roots already exist.
	///
	/// The first root sits on `center`. Later ones are spaced evenly on a
	/// circle starting straight up; the spacing depends only on the cap, so
	/// earlier roots never need to move.
	pub fn place_root(&self, existing_roots: usize, center: Point) -> Point {
		if existing_roots == 0 {
			return center;
		}
		let slots = self.max_projects.max(3) as f64;
		let index = (existing_roots - 1) as f64;
		let angle = -PI / 2.0 + index * (2.0 * PI / slots);
		center + Point::new(angle.cos(), angle.sin()) * self.main_radius
	}

	/// Position for the `sibling_index`-th child (zero based) of a parent.
	pub fn place_child(&self, parent: Point, child_kind: NodeKind, sibling_index: usize) -> Point {
		let fan = match child_kind {
			NodeKind::Concept => self.concept,
			_ => self.objective,
		};
		let magnitude = sibling_index as f64 * fan.spread_base + fan.base_offset;
		let sign = if sibling_index % 2 == 0 { 1.0 } else { -1.0 };
		parent + Point::new(fan.distance, sign * magnitude)
	}

	/// Position for a new child given where its siblings already sit: the
	/// lowest slot no sibling occupies. Deleting a sibling frees its slot.
	pub fn place_next_child(&self, parent: Point, child_kind: NodeKind, siblings: &[Point]) -> Point {
		let taken = |slot: Point| {
			siblings
				.iter()
				.any(|s| (s.x - slot.x).abs() < 1e-6 && (s.y - slot.y).abs() < 1e-6)
		};
		// n siblings can fill at most n of the first n + 1 slots.
		(0..=siblings.len())
			.map(|i| self.place_child(parent, child_kind, i))
			.find(|&slot| !taken(slot))
			.unwrap_or_else(|| self.place_child(parent, child_kind, siblings.len()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: Point, b: Point) -> bool {
		(a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
	}

	#[test]
	fn roots_start_centered_then_circle_from_the_top() {
		let layout = RadialLayout::default();
		let center = Point::new(500.0, 400.0);
		assert_eq!(layout.place_root(0, center), center);
		assert!(close(layout.place_root(1, center), Point::new(500.0, 0.0)));

		// 3 slots: 120 degrees apart.
		let third = layout.place_root(2, center);
		let angle = -PI / 2.0 + 2.0 * PI / 3.0;
		assert!(close(third, center + Point::new(angle.cos(), angle.sin()) * 400.0));
	}

	#[test]
	fn objective_children_alternate_sides() {
		let layout = RadialLayout::default();
		let parent = Point::new(100.0, 100.0);
		assert_eq!(layout.place_child(parent, NodeKind::Objective, 0), Point::new(420.0, 140.0));
		assert_eq!(layout.place_child(parent, NodeKind::Objective, 1), Point::new(420.0, 0.0));
		assert_eq!(layout.place_child(parent, NodeKind::Objective, 2), Point::new(420.0, 260.0));
	}

	#[test]
	fn siblings_never_coincide_and_spread_grows() {
		let layout = RadialLayout::default();
		for kind in [NodeKind::Objective, NodeKind::Concept] {
			let parent = Point::new(-40.0, 12.0);
			let offsets: Vec<f64> = (0..8)
				.map(|i| (layout.place_child(parent, kind, i).y - parent.y).abs())
				.collect();
			assert!(offsets.windows(2).all(|w| w[1] > w[0]), "{kind:?}: {offsets:?}");
		}
		let objective = layout.place_child(Point::ZERO, NodeKind::Objective, 3);
		let concept = layout.place_child(Point::ZERO, NodeKind::Concept, 3);
		assert!(concept.y.abs() > objective.y.abs());
		assert_eq!(concept.x, 300.0);
	}

	#[test]
	fn next_child_reuses_a_freed_slot() {
		let layout = RadialLayout::default();
		let parent = Point::new(100.0, 100.0);
		let slot = |i| layout.place_child(parent, NodeKind::Objective, i);

		assert_eq!(layout.place_next_child(parent, NodeKind::Objective, &[]), slot(0));
		assert_eq!(layout.place_next_child(parent, NodeKind::Objective, &[slot(0), slot(1)]), slot(2));
		assert_eq!(layout.place_next_child(parent, NodeKind::Objective, &[slot(1)]), slot(0));
		// A sibling dragged away no longer holds its slot.
		let moved = Point::new(-500.0, -500.0);
		assert_eq!(layout.place_next_child(parent, NodeKind::Objective, &[moved, slot(0)]), slot(1));
	}
}

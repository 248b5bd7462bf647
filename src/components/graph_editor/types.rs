//! Node records, tiers, and the world-space geometry they live in.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point in either screen or world space. Which one is up to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Point {
	type Output = Point;

	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

impl Div<f64> for Point {
	type Output = Point;

	fn div(self, rhs: f64) -> Point {
		Point::new(self.x / rhs, self.y / rhs)
	}
}

/// Axis-aligned rectangle, always stored with `min <= max` on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub min: Point,
	pub max: Point,
}

impl Rect {
	/// Build a rectangle from any two opposite corners.
	pub fn from_corners(a: Point, b: Point) -> Self {
		Self {
			min: Point::new(a.x.min(b.x), a.y.min(b.y)),
			max: Point::new(a.x.max(b.x), a.y.max(b.y)),
		}
	}

	/// Open-interval containment: points on an edge are outside.
	pub fn contains_strict(&self, p: Point) -> bool {
		p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
	}

	pub fn width(&self) -> f64 {
		self.max.x - self.min.x
	}

	pub fn height(&self) -> f64 {
		self.max.y - self.min.y
	}
}

/// Opaque node identifier. Fresh ids are v4 UUIDs; ids read back from
/// storage are kept as whatever string they were saved with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
	pub fn generate() -> Self {
		Self(uuid::Uuid::new_v4().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

impl From<String> for NodeId {
	fn from(s: String) -> Self {
		Self(s)
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// The three fixed hierarchy tiers.
///
/// Records saved by older builds use `"post"` for the leaf tier; it is folded
/// into [`NodeKind::Concept`] while deserializing and never written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Project,
	Objective,
	#[serde(alias = "post")]
	Concept,
}

impl NodeKind {
	/// Tier a child of this node must have, if children are allowed at all.
	pub fn child_kind(self) -> Option<NodeKind> {
		match self {
			NodeKind::Project => Some(NodeKind::Objective),
			NodeKind::Objective => Some(NodeKind::Concept),
			NodeKind::Concept => None,
		}
	}

	/// Tier the parent of this node must have. `None` for roots.
	pub fn parent_kind(self) -> Option<NodeKind> {
		match self {
			NodeKind::Project => None,
			NodeKind::Objective => Some(NodeKind::Project),
			NodeKind::Concept => Some(NodeKind::Objective),
		}
	}

	/// Wire name, as written in `type`.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::Project => "project",
			NodeKind::Objective => "objective",
			NodeKind::Concept => "concept",
		}
	}

	pub fn default_label(self) -> &'static str {
		match self {
			NodeKind::Project => "New Project",
			NodeKind::Objective => "New Objective",
			NodeKind::Concept => "New Concept",
		}
	}
}

/// How often a concept is suggested to be published.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
	High,
	Medium,
	Low,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionGuidelines {
	#[serde(default)]
	pub structure: String,
	#[serde(default)]
	pub key_elements: Vec<String>,
	#[serde(default)]
	pub dos: Vec<String>,
	#[serde(default)]
	pub donts: Vec<String>,
}

/// Enrichment payload carried by concept nodes. The editor never reads it;
/// it is kept verbatim so display panels elsewhere can.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDetails {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub suggested_format: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub suggested_frequency: Option<Frequency>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub strategic_rationale: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub creative_hooks: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub execution_guidelines: Option<ExecutionGuidelines>,
}

impl ConceptDetails {
	pub fn is_empty(&self) -> bool {
		*self == ConceptDetails::default()
	}
}

/// A node in the project / objective / concept forest.
///
/// Only model fields are (de)serialized. Anything else a stored record
/// carries, such as cached icons or colors, is dropped on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
	pub id: NodeId,
	#[serde(rename = "type")]
	pub kind: NodeKind,
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<NodeId>,
	pub position: Point,
	#[serde(flatten)]
	pub details: ConceptDetails,
}

impl Node {
	/// Create a node with a fresh id.
	pub fn new(kind: NodeKind, label: impl Into<String>, parent_id: Option<NodeId>, position: Point) -> Self {
		Self {
			id: NodeId::generate(),
			kind,
			label: label.into(),
			description: None,
			parent_id,
			position,
			details: ConceptDetails::default(),
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn is_root(&self) -> bool {
		self.parent_id.is_none()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rect_normalizes_corners_and_excludes_edges() {
		let r = Rect::from_corners(Point::new(10.0, 10.0), Point::new(-1.0, -1.0));
		assert_eq!(r.min, Point::new(-1.0, -1.0));
		assert_eq!(r.max, Point::new(10.0, 10.0));
		assert!(r.contains_strict(Point::new(0.0, 0.0)));
		assert!(!r.contains_strict(Point::new(10.0, 5.0)));
		assert!(!r.contains_strict(Point::new(5.0, -1.0)));
	}

	#[test]
	fn post_kind_is_read_as_concept() {
		let json = r#"{"id":"p1","type":"post","label":"Reel","parentId":"o1","position":{"x":1,"y":2}}"#;
		let node: Node = serde_json::from_str(json).unwrap();
		assert_eq!(node.kind, NodeKind::Concept);

		let out = serde_json::to_value(&node).unwrap();
		assert_eq!(out["type"], "concept");
		assert_eq!(out["type"], NodeKind::Concept.as_str());
	}

	#[test]
	fn presentational_fields_are_dropped() {
		let json = r##"{
			"id": "n1",
			"type": "project",
			"label": "Launch",
			"position": {"x": 0, "y": 0},
			"color": "#ff0000",
			"icon": "rocket"
		}"##;
		let node: Node = serde_json::from_str(json).unwrap();
		let out = serde_json::to_value(&node).unwrap();
		assert!(out.get("color").is_none());
		assert!(out.get("icon").is_none());
		assert!(out.get("parentId").is_none());
	}

	#[test]
	fn concept_enrichment_survives_verbatim() {
		let json = r#"{
			"id": "c1",
			"type": "concept",
			"label": "Behind the scenes",
			"parentId": "o1",
			"position": {"x": 10.5, "y": -3},
			"tags": ["bts", "team"],
			"suggestedFormat": "carousel",
			"suggestedFrequency": "medium",
			"strategicRationale": "Humanize the brand",
			"creativeHooks": ["Day in the life"],
			"executionGuidelines": {
				"structure": "Hook, story, CTA",
				"keyElements": ["faces"],
				"dos": ["be candid"],
				"donts": ["over-produce"]
			}
		}"#;
		let node: Node = serde_json::from_str(json).unwrap();
		assert_eq!(node.details.suggested_frequency, Some(Frequency::Medium));
		assert_eq!(
			node.details.execution_guidelines.as_ref().map(|g| g.donts.clone()),
			Some(vec!["over-produce".to_string()])
		);

		let back: Node = serde_json::from_str(&serde_json::to_string(&node).unwrap()).unwrap();
		assert_eq!(back, node);
	}

	#[test]
	fn generated_ids_are_distinct() {
		let a = NodeId::generate();
		let b = NodeId::generate();
		assert_ne!(a, b);
	}
}

//! Tunable editor limits, layout constants, and persistence settings.
//!
//! Everything has a default. A host page can override any subset by
//! embedding JSON in a `<script id="editor-config">` element (see
//! [`crate::load_editor_config`]).

use serde::{Deserialize, Deserializer};

/// Radial offsets used when placing a new child next to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildLayout {
	/// Distance along +x from the parent, in world units.
	pub distance: f64,
	/// Extra perpendicular spread added per existing sibling.
	pub spread_base: f64,
	/// Perpendicular offset of the first child.
	pub base_offset: f64,
}

impl ChildLayout {
	pub const fn objective() -> Self {
		Self {
			distance: 320.0,
			spread_base: 60.0,
			base_offset: 40.0,
		}
	}

	pub const fn concept() -> Self {
		Self {
			distance: 300.0,
			spread_base: 90.0,
			base_offset: 40.0,
		}
	}
}

/// A partial `ChildLayout` as written in config JSON. Missing fields keep
/// the value of the tier's own preset.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChildLayoutOverride {
	distance: Option<f64>,
	spread_base: Option<f64>,
	base_offset: Option<f64>,
}

impl ChildLayoutOverride {
	fn over(self, preset: ChildLayout) -> ChildLayout {
		ChildLayout {
			distance: self.distance.unwrap_or(preset.distance),
			spread_base: self.spread_base.unwrap_or(preset.spread_base),
			base_offset: self.base_offset.unwrap_or(preset.base_offset),
		}
	}
}

fn objective_layout<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ChildLayout, D::Error> {
	ChildLayoutOverride::deserialize(deserializer).map(|o| o.over(ChildLayout::objective()))
}

fn concept_layout<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ChildLayout, D::Error> {
	ChildLayoutOverride::deserialize(deserializer).map(|o| o.over(ChildLayout::concept()))
}

/// Complete editor configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
	pub max_projects: usize,
	pub max_objectives_per_project: usize,
	pub max_concepts_per_objective: usize,
	/// Quiet period before a pending save fires.
	pub save_debounce_ms: f64,
	/// Radius of the circle later projects are placed on.
	pub main_radius: f64,
	#[serde(deserialize_with = "objective_layout")]
	pub objective_layout: ChildLayout,
	#[serde(deserialize_with = "concept_layout")]
	pub concept_layout: ChildLayout,
	pub min_scale: f64,
	pub max_scale: f64,
	pub scale_step: f64,
	/// Storage key suffix identifying the client session.
	pub session_id: String,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			max_projects: 3,
			max_objectives_per_project: 5,
			max_concepts_per_objective: 6,
			save_debounce_ms: 2000.0,
			main_radius: 400.0,
			objective_layout: ChildLayout::objective(),
			concept_layout: ChildLayout::concept(),
			min_scale: 0.5,
			max_scale: 2.0,
			scale_step: 0.1,
			session_id: "default".to_string(),
		}
	}
}

impl EditorConfig {
	/// Parse a (possibly partial) JSON override.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_override_keeps_other_defaults() {
		let config = EditorConfig::from_json(r#"{"maxProjects": 7, "conceptLayout": {"distance": 250}}"#).unwrap();
		assert_eq!(config.max_projects, 7);
		assert_eq!(config.max_objectives_per_project, 5);
		assert_eq!(config.concept_layout.distance, 250.0);
		// Fields left out keep the concept preset, not the objective one.
		assert_eq!(config.concept_layout.spread_base, 90.0);
		assert_eq!(config.concept_layout.base_offset, 40.0);
		assert_eq!(config.objective_layout, ChildLayout::objective());
		assert_eq!(config.save_debounce_ms, 2000.0);
	}

	#[test]
	fn malformed_override_is_an_error() {
		assert!(EditorConfig::from_json(r#"{"maxProjects": "many"}"#).is_err());
	}

	#[test]
	fn partial_layout_overrides_keep_tier_presets() {
		let config = EditorConfig::from_json(r#"{"objectiveLayout": {"spreadBase": 70}, "conceptLayout": {}}"#).unwrap();
		assert_eq!(config.objective_layout.spread_base, 70.0);
		assert_eq!(config.objective_layout.distance, 320.0);
		assert_eq!(config.concept_layout, ChildLayout::concept());
	}
}

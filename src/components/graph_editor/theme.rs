//! Colors for the editor canvas.
//!
//! These are derived at render time and never stored on nodes.

use super::types::NodeKind;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// One fill color per tier.
#[derive(Clone, Debug)]
pub struct TierPalette {
	pub project: Color,
	pub objective: Color,
	pub concept: Color,
}

impl TierPalette {
	pub fn get(&self, kind: NodeKind) -> Color {
		match kind {
			NodeKind::Project => self.project,
			NodeKind::Objective => self.objective,
			NodeKind::Concept => self.concept,
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	pub edge: Color,
	pub text: Color,
	/// Outline of selected nodes.
	pub selection: Color,
	pub marquee_fill: Color,
	pub marquee_stroke: Color,
	pub tiers: TierPalette,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(22, 27, 34),
			edge: Color::rgba(140, 160, 180, 0.5),
			text: Color::rgb(230, 236, 242),
			selection: Color::rgb(255, 196, 87),
			marquee_fill: Color::rgba(94, 129, 172, 0.15),
			marquee_stroke: Color::rgba(129, 161, 193, 0.8),
			tiers: TierPalette {
				project: Color::rgb(94, 129, 172),   // Steel blue
				objective: Color::rgb(100, 148, 160), // Teal gray
				concept: Color::rgb(130, 120, 150),   // Wisteria
			},
		}
	}
}

impl Theme {
	/// Fill for a node, brightened while it is selected.
	pub fn node_fill(&self, kind: NodeKind, selected: bool) -> String {
		let base = self.tiers.get(kind);
		if selected { base.lighten(0.2) } else { base }.to_css()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(0, 0, 0, 0.5).to_css(), "rgba(0, 0, 0, 0.5)");
		assert_eq!(Color::rgb(0, 0, 0).lighten(1.0), Color::rgb(255, 255, 255));
	}

	#[test]
	fn selected_nodes_are_brighter() {
		let theme = Theme::default();
		assert_ne!(
			theme.node_fill(NodeKind::Concept, true),
			theme.node_fill(NodeKind::Concept, false)
		);
	}
}

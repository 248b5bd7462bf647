//! Screen ↔ world transform for the pannable, zoomable canvas.
//!
//! # Coordinate Spaces
//!
//! - **Screen-space**: client pixels, as delivered by pointer events.
//! - **World-space**: where node positions live, independent of pan/zoom.
//!
//! `origin` is the canvas container's top-left corner in screen-space. It is
//! refreshed from the live layout whenever an interaction starts, because the
//! container may have moved since the last one.

use super::types::Point;

/// Pan offset, zoom factor, and container placement.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	/// Screen-space pan offset in pixels.
	pub pan: Point,
	/// Zoom factor, kept within `min_scale..=max_scale`.
	pub scale: f64,
	/// Container top-left corner in screen-space.
	pub origin: Point,
	/// Container size in pixels.
	pub width: f64,
	pub height: f64,
	min_scale: f64,
	max_scale: f64,
	step: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(0.5, 2.0, 0.1)
	}
}

impl Viewport {
	pub fn new(min_scale: f64, max_scale: f64, step: f64) -> Self {
		Self {
			pan: Point::ZERO,
			scale: 1.0,
			origin: Point::ZERO,
			width: 0.0,
			height: 0.0,
			min_scale,
			max_scale,
			step,
		}
	}

	pub fn to_world(&self, screen: Point) -> Point {
		(screen - self.origin - self.pan) / self.scale
	}

	pub fn to_screen(&self, world: Point) -> Point {
		world * self.scale + self.pan + self.origin
	}

	/// World-space point under the middle of the container.
	pub fn center_world(&self) -> Point {
		self.to_world(self.origin + Point::new(self.width / 2.0, self.height / 2.0))
	}

	pub fn set_origin(&mut self, origin: Point) {
		self.origin = origin;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Set the zoom factor, clamped and snapped to a whole number of zoom
	/// steps so repeated steps do not accumulate float drift.
	pub fn set_scale(&mut self, scale: f64) {
		let snapped = if self.step > 0.0 {
			let steps = (scale / self.step).round() * self.step;
			(steps * 1e9).round() / 1e9
		} else {
			scale
		};
		self.scale = snapped.clamp(self.min_scale, self.max_scale);
	}

	pub fn zoom_in(&mut self) {
		self.set_scale(self.scale + self.step);
	}

	pub fn zoom_out(&mut self) {
		self.set_scale(self.scale - self.step);
	}

	pub fn reset(&mut self) {
		self.pan = Point::ZERO;
		self.scale = 1.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: Point, b: Point) -> bool {
		(a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
	}

	#[test]
	fn screen_world_round_trip() {
		let mut vp = Viewport::default();
		vp.set_origin(Point::new(37.0, 112.5));
		for &(px, py, s) in &[(0.0, 0.0, 1.0), (-250.0, 80.0, 0.5), (13.3, -7.7, 1.7), (900.0, 900.0, 2.0)] {
			vp.pan = Point::new(px, py);
			vp.set_scale(s);
			for &p in &[Point::ZERO, Point::new(400.0, 300.0), Point::new(-12.25, 1e4)] {
				assert!(close(vp.to_screen(vp.to_world(p)), p), "screen {p:?} at pan {px},{py} scale {s}");
				assert!(close(vp.to_world(vp.to_screen(p)), p), "world {p:?} at pan {px},{py} scale {s}");
			}
		}
	}

	#[test]
	fn zoom_is_clamped_and_snapped() {
		let mut vp = Viewport::default();
		for _ in 0..30 {
			vp.zoom_in();
		}
		assert_eq!(vp.scale, 2.0);
		for _ in 0..30 {
			vp.zoom_out();
		}
		assert_eq!(vp.scale, 0.5);
		for _ in 0..3 {
			vp.zoom_in();
		}
		assert_eq!(vp.scale, 0.8);
	}

	#[test]
	fn zoom_snaps_to_the_configured_step() {
		let mut vp = Viewport::new(0.5, 2.0, 0.05);
		for _ in 0..3 {
			vp.zoom_in();
		}
		assert!((vp.scale - 1.15).abs() < 1e-9, "{}", vp.scale);
		vp.zoom_out();
		assert!((vp.scale - 1.1).abs() < 1e-9, "{}", vp.scale);

		vp.set_scale(1.26);
		assert!((vp.scale - 1.25).abs() < 1e-9, "{}", vp.scale);
	}

	#[test]
	fn center_accounts_for_pan_and_scale() {
		let mut vp = Viewport::default();
		vp.resize(800.0, 600.0);
		vp.set_origin(Point::new(100.0, 50.0));
		assert!(close(vp.center_world(), Point::new(400.0, 300.0)));

		vp.pan = Point::new(200.0, 100.0);
		vp.set_scale(2.0);
		assert!(close(vp.center_world(), Point::new(100.0, 100.0)));
	}
}

//! Pointer and touch tracking for parallax.
//!
//! Input handlers and the render loop share two single-slot registers: the
//! latest pointer offset and the current half-viewport size. Writers overwrite,
//! the loop reads once per frame, and the most recent write wins. Updates that
//! land between two frame reads are simply superseded; the consumer is a
//! smoothing filter, so no ordering is needed.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use super::config::Normalization;

/// Shared "most recent value" slot.
#[derive(Clone, Debug, Default)]
pub struct PointerRegister(Rc<Cell<Vec2>>);

impl PointerRegister {
	/// Latest value written.
	pub fn read(&self) -> Vec2 {
		self.0.get()
	}

	/// Replaces the stored value.
	pub fn write(&self, value: Vec2) {
		self.0.set(value);
	}
}

/// A touch point in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
	/// Horizontal page coordinate in CSS pixels.
	pub page_x: f64,
	/// Vertical page coordinate in CSS pixels.
	pub page_y: f64,
}

/// Converts raw pointer positions into a parallax signal.
#[derive(Clone, Debug)]
pub struct InputTracker {
	pointer: PointerRegister,
	half_viewport: Rc<Cell<Vec2>>,
	normalization: Normalization,
}

impl InputTracker {
	/// Tracker for a `width` x `height` viewport.
	pub fn new(normalization: Normalization, width: f32, height: f32) -> Self {
		let tracker = Self {
			pointer: PointerRegister::default(),
			half_viewport: Rc::new(Cell::new(Vec2::ONE)),
			normalization,
		};
		tracker.resize(width, height);
		tracker
	}

	/// Handle for the render loop to read from.
	pub fn register(&self) -> PointerRegister {
		self.pointer.clone()
	}

	/// Normalization mode in use.
	pub fn normalization(&self) -> Normalization {
		self.normalization
	}

	/// Records a new viewport size. Degenerate sizes are ignored.
	pub fn resize(&self, width: f32, height: f32) {
		if width > 0.0 && height > 0.0 {
			self.half_viewport.set(Vec2::new(width, height) / 2.0);
		}
	}

	/// Offset of `(x, y)` from the viewport center in the configured mode.
	pub fn offset(&self, x: f64, y: f64) -> Vec2 {
		let half = self.half_viewport.get();
		let raw = Vec2::new(x as f32, y as f32) - half;
		match self.normalization {
			Normalization::Normalized => raw / half,
			Normalization::Pixels => raw,
		}
	}

	/// Records a mouse position in client coordinates.
	pub fn on_pointer_move(&self, client_x: f64, client_y: f64) {
		self.pointer.write(self.offset(client_x, client_y));
	}

	/// Tracks a single-finger drag. Returns `true` when the event was used,
	/// in which case the host should suppress default scrolling and zooming.
	/// Multi-touch gestures are left alone.
	pub fn on_touch_move(&self, touches: &[TouchPoint]) -> bool {
		match touches {
			[touch] => {
				self.pointer.write(self.offset(touch.page_x, touch.page_y));
				true
			}
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalized_mode_maps_edges_to_unit_range() {
		let input = InputTracker::new(Normalization::Normalized, 800.0, 600.0);
		let pointer = input.register();

		input.on_pointer_move(400.0, 300.0);
		assert_eq!(pointer.read(), Vec2::ZERO);

		input.on_pointer_move(800.0, 0.0);
		assert_eq!(pointer.read(), Vec2::new(1.0, -1.0));

		input.on_pointer_move(0.0, 450.0);
		assert_eq!(pointer.read(), Vec2::new(-1.0, 0.5));
	}

	#[test]
	fn pixel_mode_keeps_raw_offsets() {
		let input = InputTracker::new(Normalization::Pixels, 800.0, 600.0);
		input.on_pointer_move(500.0, 100.0);
		assert_eq!(input.register().read(), Vec2::new(100.0, -200.0));
	}

	#[test]
	fn last_write_wins() {
		let input = InputTracker::new(Normalization::Normalized, 200.0, 200.0);
		let pointer = input.register();
		input.on_pointer_move(0.0, 0.0);
		input.on_pointer_move(200.0, 200.0);
		assert_eq!(pointer.read(), Vec2::ONE);
	}

	#[test]
	fn single_touch_is_tracked() {
		let input = InputTracker::new(Normalization::Normalized, 400.0, 400.0);
		let used = input.on_touch_move(&[TouchPoint {
			page_x: 300.0,
			page_y: 100.0,
		}]);
		assert!(used);
		assert_eq!(input.register().read(), Vec2::new(0.5, -0.5));
	}

	#[test]
	fn multi_touch_is_ignored() {
		let input = InputTracker::new(Normalization::Normalized, 400.0, 400.0);
		input.on_pointer_move(400.0, 400.0);
		let touches = [
			TouchPoint {
				page_x: 0.0,
				page_y: 0.0,
			},
			TouchPoint {
				page_x: 10.0,
				page_y: 10.0,
			},
		];
		assert!(!input.on_touch_move(&touches));
		assert!(!input.on_touch_move(&[]));
		assert_eq!(input.register().read(), Vec2::ONE);
	}

	#[test]
	fn resize_changes_the_center() {
		let input = InputTracker::new(Normalization::Normalized, 400.0, 400.0);
		input.resize(1000.0, 400.0);
		input.on_pointer_move(500.0, 200.0);
		assert_eq!(input.register().read(), Vec2::ZERO);
		input.resize(0.0, 0.0);
		input.on_pointer_move(1000.0, 200.0);
		assert_eq!(input.register().read(), Vec2::new(1.0, 0.0));
	}
}

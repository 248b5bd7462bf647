//! Window-level pointer listeners that keep a gesture tracking the pointer
//! after it leaves the canvas.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{PointerEvent, Window};

/// `pointermove`/`pointerup` handlers registered on `window` for one gesture.
///
/// `detach` only unregisters; the closures stay alive so a handler can detach
/// its own set while it is running. Dropping the value detaches as well.
pub struct WindowListeners {
	window: Window,
	on_move: Closure<dyn FnMut(PointerEvent)>,
	on_up: Closure<dyn FnMut(PointerEvent)>,
	attached: bool,
}

impl WindowListeners {
	pub fn attach(
		on_move: impl FnMut(PointerEvent) + 'static,
		on_up: impl FnMut(PointerEvent) + 'static,
	) -> Option<Self> {
		let window = web_sys::window()?;
		let on_move = Closure::<dyn FnMut(PointerEvent)>::new(on_move);
		let on_up = Closure::<dyn FnMut(PointerEvent)>::new(on_up);
		let mut listeners = Self {
			window,
			on_move,
			on_up,
			attached: false,
		};
		let moved = listeners
			.window
			.add_event_listener_with_callback("pointermove", listeners.on_move.as_ref().unchecked_ref());
		let upped = listeners
			.window
			.add_event_listener_with_callback("pointerup", listeners.on_up.as_ref().unchecked_ref());
		listeners.attached = true;
		if moved.is_err() || upped.is_err() {
			listeners.detach();
			return None;
		}
		Some(listeners)
	}

	pub fn detach(&mut self) {
		if !self.attached {
			return;
		}
		let _ = self
			.window
			.remove_event_listener_with_callback("pointermove", self.on_move.as_ref().unchecked_ref());
		let _ = self
			.window
			.remove_event_listener_with_callback("pointerup", self.on_up.as_ref().unchecked_ref());
		self.attached = false;
	}
}

impl Drop for WindowListeners {
	fn drop(&mut self) {
		self.detach();
	}
}

//! Display-refresh scheduling.
//!
//! [`FrameLoop`] re-arms `requestAnimationFrame` after every tick and runs a
//! [`FrameTask`] until stopped. [`FrameThrottle`] coalesces bursts of events
//! into at most one pending frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Work performed once per display refresh.
pub trait FrameTask {
	/// `now` is the frame timestamp in milliseconds.
	fn frame(&mut self, now: f64);
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A perpetual `requestAnimationFrame` loop. Dropping it stops the loop.
pub struct FrameLoop {
	running: Rc<Cell<bool>>,
	pending: Rc<Cell<Option<i32>>>,
	_callback: FrameCallback,
}

impl FrameLoop {
	pub fn start<T: FrameTask + 'static>(task: Rc<RefCell<T>>) -> Result<Self, JsValue> {
		let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
		let running = Rc::new(Cell::new(true));
		let pending = Rc::new(Cell::new(None));
		let callback: FrameCallback = Rc::new(RefCell::new(None));

		let (running_cb, pending_cb, callback_inner) =
			(running.clone(), pending.clone(), callback.clone());
		*callback.borrow_mut() = Some(Closure::new(move |now: f64| {
			pending_cb.set(None);
			if !running_cb.get() {
				return;
			}
			task.borrow_mut().frame(now);
			if let Some(ref cb) = *callback_inner.borrow() {
				if let Some(win) = web_sys::window() {
					pending_cb.set(
						win.request_animation_frame(cb.as_ref().unchecked_ref())
							.ok(),
					);
				}
			}
		}));
		if let Some(ref cb) = *callback.borrow() {
			pending.set(Some(
				window.request_animation_frame(cb.as_ref().unchecked_ref())?,
			));
		}

		Ok(Self {
			running,
			pending,
			_callback: callback,
		})
	}

	/// Cancels the queued frame; the task is not run again.
	pub fn stop(&self) {
		self.running.set(false);
		if let (Some(id), Some(win)) = (self.pending.take(), web_sys::window()) {
			let _ = win.cancel_animation_frame(id);
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}

/// Guards against queuing more than one recompute per frame.
#[derive(Debug, Default)]
pub struct FrameThrottle {
	pending: Cell<bool>,
}

impl FrameThrottle {
	/// Returns `true` when the caller should schedule a frame.
	pub fn request(&self) -> bool {
		!self.pending.replace(true)
	}

	/// Marks the scheduled frame as done.
	pub fn complete(&self) {
		self.pending.set(false);
	}
}

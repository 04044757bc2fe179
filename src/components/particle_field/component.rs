//! Leptos component owning the full-viewport particle canvas.
//!
//! The component creates the canvas, sizes it to the window, and starts a
//! [`FrameLoop`] over a [`ParticleField`]. A window `resize` listener resizes the
//! canvas and recreates the particles. Theme toggles queue the opacity flash.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::field::ParticleField;
use crate::config::ParticleConfig;
use crate::frame::FrameLoop;
use crate::page::StartupError;
use crate::theme::ThemeState;

fn viewport(window: &Window) -> (f64, f64) {
	let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(read(window.inner_width()), read(window.inner_height()))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Renders the decorative particle field behind the page content.
///
/// The canvas always matches the window size. A missing 2d context is fatal:
/// it is logged and thrown into the JS console.
#[component]
pub fn ParticleCanvas(theme: Rc<ThemeState>, config: ParticleConfig) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let frame_loop: Rc<RefCell<Option<FrameLoop>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if frame_loop.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = viewport(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			let err = StartupError::NoContext;
			error!("portfolio-fx: {}", err);
			wasm_bindgen::throw_str(&format!("portfolio-fx: {err}"));
		};

		let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
		let field = Rc::new(RefCell::new(ParticleField::new(
			config.clone(),
			(w, h),
			ctx,
			theme.clone(),
			SmallRng::seed_from_u64(seed),
		)));

		let field_flash = field.clone();
		theme.subscribe(move |_| field_flash.borrow_mut().request_flash());

		let (field_resize, canvas_resize) = (field.clone(), canvas.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = viewport(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			field_resize.borrow_mut().resize(nw, nh);
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		match FrameLoop::start(field) {
			Ok(running) => *frame_loop.borrow_mut() = Some(running),
			Err(err) => error!("portfolio-fx: could not start particle loop: {:?}", err),
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			id="particles"
			class="particles"
			aria-hidden="true"
			style="position: fixed; inset: 0; pointer-events: none; z-index: 0;"
		/>
	}
}

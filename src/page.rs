//! Binds the effects to the host page's elements and events.
//!
//! Required hooks are looked up first and abort startup when missing; optional
//! ones (and every responder element set) quietly degrade to nothing.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use js_sys::Array;
use leptos::prelude::{request_animation_frame, set_timeout};
use log::{debug, info};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::{
	Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
	IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, ScrollBehavior,
	ScrollToOptions, Window,
};

use crate::animation::{AnimationSpec, Animator};
use crate::config::{FxConfig, RevealConfig};
use crate::frame::{FrameLoop, FrameTask, FrameThrottle};
use crate::interactions::{self, CursorState, Hover, Rect};
use crate::intro;
use crate::reveal::{RevealCategory, RevealSample, RevealTracker};
use crate::scroll::{self, ScrollLayer, ScrollSample};
use crate::theme::{Theme, ThemeState};

/// Conditions that stop the effects from starting at all.
#[derive(Debug, Error)]
pub enum StartupError {
	#[error("no browser window")]
	NoWindow,
	#[error("window has no document")]
	NoDocument,
	#[error("required element `{0}` is missing from the page")]
	MissingHook(&'static str),
	#[error("drawing surface has no 2d context")]
	NoContext,
	#[error("browser call failed: {0}")]
	Js(String),
}

impl From<JsValue> for StartupError {
	fn from(value: JsValue) -> Self {
		Self::Js(format!("{value:?}"))
	}
}

/// Named elements the effects attach to.
pub struct PageHooks {
	pub window: Window,
	pub document: Document,
	pub root: Element,
	pub theme_toggle: HtmlElement,
	pub cursor: HtmlElement,
	pub cursor_follower: HtmlElement,
	pub nav: Option<HtmlElement>,
	pub loader: Option<Element>,
	pub progress_bar: Option<Element>,
	pub hero_content: Option<HtmlElement>,
}

fn required<T: JsCast>(document: &Document, selector: &'static str) -> Result<T, StartupError> {
	optional(document, selector).ok_or(StartupError::MissingHook(selector))
}

fn optional<T: JsCast>(document: &Document, selector: &'static str) -> Option<T> {
	let found = document
		.query_selector(selector)
		.ok()
		.flatten()
		.and_then(|el| el.dyn_into::<T>().ok());
	if found.is_none() {
		debug!("portfolio-fx: no `{selector}` on this page");
	}
	found
}

fn query_all(document: &Document, selector: &str) -> Vec<Element> {
	let Ok(list) = document.query_selector_all(selector) else {
		return Vec::new();
	};
	(0..list.length())
		.filter_map(|i| list.item(i))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect()
}

impl PageHooks {
	pub fn locate() -> Result<Self, StartupError> {
		let window = web_sys::window().ok_or(StartupError::NoWindow)?;
		let document = window.document().ok_or(StartupError::NoDocument)?;
		let root = document
			.document_element()
			.ok_or(StartupError::NoDocument)?;
		Ok(Self {
			theme_toggle: required(&document, ".theme-toggle")?,
			cursor: required(&document, ".cursor")?,
			cursor_follower: required(&document, ".cursor-follower")?,
			nav: optional(&document, ".nav"),
			loader: optional(&document, ".loader"),
			progress_bar: optional(&document, ".progress-bar"),
			hero_content: optional(&document, ".hero-content"),
			window,
			document,
			root,
		})
	}

	fn scroll_sample(&self) -> ScrollSample {
		ScrollSample {
			offset: self.window.scroll_y().unwrap_or(0.0),
			viewport_height: self
				.window
				.inner_height()
				.ok()
				.and_then(|v| v.as_f64())
				.unwrap_or(0.0),
			scroll_height: self.root.scroll_height() as f64,
			client_height: self.root.client_height() as f64,
		}
	}
}

type Listener = Closure<dyn FnMut(Event)>;

fn listen(
	target: &EventTarget,
	event: &str,
	handler: impl FnMut(Event) + 'static,
) -> Result<Listener, StartupError> {
	let cb = Closure::<dyn FnMut(Event)>::new(handler);
	target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
	Ok(cb)
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
	let _ = el.style().set_property(property, value);
}

fn apply_theme(root: &Element, theme: Theme) {
	let _ = root.set_attribute("data-theme", theme.as_str());
}

struct RevealObserver {
	_observer: IntersectionObserver,
	_callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

/// Keeps every listener, observer and loop alive for the page's lifetime.
#[derive(Default)]
pub struct PageRuntime {
	listeners: Vec<Listener>,
	_reveal: Option<RevealObserver>,
	_cursor_loop: Option<FrameLoop>,
}

type SharedAnimator = Rc<dyn Animator<Element>>;

/// Locates the page hooks and attaches every effect except the particle canvas.
pub fn wire(
	theme: Rc<ThemeState>,
	animator: SharedAnimator,
	config: &FxConfig,
) -> Result<PageRuntime, StartupError> {
	let hooks = Rc::new(PageHooks::locate()?);
	let layer = Rc::new(ScrollLayer::new(config.scroll.clone()));
	let mut runtime = PageRuntime::default();

	wire_theme(&hooks, &theme, &animator, &layer, &mut runtime)?;
	wire_scroll(&hooks, &theme, &animator, &layer, &mut runtime)?;
	runtime._cursor_loop = Some(wire_cursor(&hooks, &mut runtime)?);
	runtime._reveal = wire_reveal(&hooks.document, &animator, &config.reveal)?;
	wire_responders(&hooks.document, &animator, config.magnetic_strength, &mut runtime)?;
	wire_anchors(&hooks, config.anchor_offset, &mut runtime)?;
	play_intro(&hooks, &animator, config.loader_ms);

	info!(
		"portfolio-fx: wired {} listeners, theme `{}`",
		runtime.listeners.len(),
		theme.get().as_str()
	);
	Ok(runtime)
}

fn wire_theme(
	hooks: &Rc<PageHooks>,
	theme: &Rc<ThemeState>,
	animator: &SharedAnimator,
	layer: &Rc<ScrollLayer>,
	runtime: &mut PageRuntime,
) -> Result<(), StartupError> {
	let update_nav = {
		let (hooks, layer) = (hooks.clone(), layer.clone());
		move |theme: Theme| {
			if let Some(ref nav) = hooks.nav {
				let offset = hooks.window.scroll_y().unwrap_or(0.0);
				set_style(nav, "background", &layer.nav_background(theme, offset).to_css());
			}
		}
	};

	apply_theme(&hooks.root, theme.get());
	update_nav(theme.get());

	let root = hooks.root.clone();
	theme.subscribe(move |t| apply_theme(&root, t));
	theme.subscribe(update_nav);
	let (toggle, spin_animator): (Element, _) = (hooks.theme_toggle.clone().into(), animator.clone());
	theme.subscribe(move |_| spin_animator.animate(interactions::toggle_spin(toggle.clone())));

	let theme = theme.clone();
	runtime.listeners.push(listen(&hooks.theme_toggle, "click", move |_| {
		theme.toggle();
	})?);
	Ok(())
}

fn wire_scroll(
	hooks: &Rc<PageHooks>,
	theme: &Rc<ThemeState>,
	animator: &SharedAnimator,
	layer: &Rc<ScrollLayer>,
	runtime: &mut PageRuntime,
) -> Result<(), StartupError> {
	let recompute = {
		let (hooks, theme, animator, layer) =
			(hooks.clone(), theme.clone(), animator.clone(), layer.clone());
		Rc::new(move || {
			let frame = layer.compute(&hooks.scroll_sample(), theme.get());
			if let Some(ref nav) = hooks.nav {
				set_style(nav, "background", &frame.nav_background.to_css());
			}
			if let (Some(hero), Some(style)) = (&hooks.hero_content, frame.hero) {
				set_style(hero, "transform", &style.transform());
				set_style(hero, "opacity", &style.opacity.to_string());
			}
			if let Some(ref bar) = hooks.progress_bar {
				animator.animate(scroll::progress_animation(bar.clone(), frame.progress));
			}
		})
	};

	let throttle = Rc::new(FrameThrottle::default());
	let on_scroll = move |_: Event| {
		if throttle.request() {
			let (throttle, recompute) = (throttle.clone(), recompute.clone());
			request_animation_frame(move || {
				recompute();
				throttle.complete();
			});
		}
	};

	runtime
		.listeners
		.push(listen(&hooks.window, "scroll", on_scroll.clone())?);
	runtime
		.listeners
		.push(listen(&hooks.window, "resize", on_scroll)?);
	Ok(())
}

/// Mirrors the pointer onto both cursor elements every frame.
struct CursorMirror {
	state: Rc<RefCell<CursorState>>,
	targets: [HtmlElement; 2],
}

impl FrameTask for CursorMirror {
	fn frame(&mut self, _now: f64) {
		let transform = self.state.borrow().transform();
		for el in &self.targets {
			set_style(el, "transform", &transform);
		}
	}
}

fn wire_cursor(hooks: &Rc<PageHooks>, runtime: &mut PageRuntime) -> Result<FrameLoop, StartupError> {
	let state = Rc::new(RefCell::new(CursorState::default()));

	let pointer = state.clone();
	runtime.listeners.push(listen(&hooks.document, "mousemove", move |ev| {
		if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
			pointer
				.borrow_mut()
				.point(ev.client_x() as f64, ev.client_y() as f64);
		}
	})?);

	for el in query_all(&hooks.document, "a, button") {
		for (event, active) in [("mouseenter", true), ("mouseleave", false)] {
			let (state, follower) = (state.clone(), hooks.cursor_follower.clone());
			runtime.listeners.push(listen(&el, event, move |_| {
				if state.borrow_mut().set_active(active) {
					let classes = follower.class_list();
					let _ = if active {
						classes.add_1("active")
					} else {
						classes.remove_1("active")
					};
				}
			})?);
		}
	}

	let mirror = CursorMirror {
		state,
		targets: [hooks.cursor_follower.clone(), hooks.cursor.clone()],
	};
	Ok(FrameLoop::start(Rc::new(RefCell::new(mirror)))?)
}

fn wire_reveal(
	document: &Document,
	animator: &SharedAnimator,
	config: &RevealConfig,
) -> Result<Option<RevealObserver>, StartupError> {
	let mut tracker = RevealTracker::new(config.clone());
	let mut regions = Vec::new();
	for el in query_all(document, RevealCategory::SELECTOR) {
		let data_index = el.get_attribute("data-index");
		let classes = el.class_list();
		if let Some(category) =
			RevealCategory::classify(|c| classes.contains(c), data_index.as_deref())
		{
			tracker.track(el.clone(), category);
			regions.push(el);
		}
	}
	if regions.is_empty() {
		debug!("portfolio-fx: no reveal regions");
		return Ok(None);
	}

	let tracker = RefCell::new(tracker);
	let animator = animator.clone();
	let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
		move |entries: Array, observer: IntersectionObserver| {
			for entry in entries.iter() {
				let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
					continue;
				};
				let target = entry.target();
				let sample = RevealSample {
					is_intersecting: entry.is_intersecting(),
					ratio: entry.intersection_ratio(),
				};
				if tracker.borrow_mut().reveal(&target, sample, &*animator) {
					observer.unobserve(&target);
				}
			}
		},
	);

	let options = IntersectionObserverInit::new();
	options.set_threshold(&JsValue::from_f64(config.threshold));
	options.set_root_margin(&format!("0px 0px -{}px 0px", config.bottom_margin));
	let observer =
		IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
	for el in &regions {
		observer.observe(el);
	}
	debug!("portfolio-fx: observing {} reveal regions", regions.len());

	Ok(Some(RevealObserver {
		_observer: observer,
		_callback: callback,
	}))
}

type HoverPlan = fn(Element, Hover) -> Vec<AnimationSpec<Element>>;

fn wire_hover(
	el: &Element,
	plan: HoverPlan,
	animator: &SharedAnimator,
	runtime: &mut PageRuntime,
) -> Result<(), StartupError> {
	for (event, hover) in [("mouseenter", Hover::Enter), ("mouseleave", Hover::Leave)] {
		let (target, animator) = (el.clone(), animator.clone());
		runtime.listeners.push(listen(el, event, move |_| {
			animator.animate_all(plan(target.clone(), hover));
		})?);
	}
	Ok(())
}

fn wire_responders(
	document: &Document,
	animator: &SharedAnimator,
	magnetic_strength: f64,
	runtime: &mut PageRuntime,
) -> Result<(), StartupError> {
	for link in query_all(document, ".project a") {
		wire_hover(&link, interactions::project_link, animator, runtime)?;

		let (target, animator) = (link.clone(), animator.clone());
		runtime.listeners.push(listen(&link, "mousemove", move |ev| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let bounds = target.get_bounding_client_rect();
			let rect = Rect {
				left: bounds.left(),
				top: bounds.top(),
				width: bounds.width(),
				height: bounds.height(),
			};
			let pointer = (ev.client_x() as f64, ev.client_y() as f64);
			animator.animate(interactions::magnetic_pull(
				target.clone(),
				&rect,
				pointer,
				magnetic_strength,
			));
		})?);
	}
	for link in query_all(document, ".contact-link") {
		wire_hover(&link, interactions::contact_link, animator, runtime)?;
	}
	for card in query_all(document, ".about-card") {
		wire_hover(&card, interactions::about_card, animator, runtime)?;
	}
	Ok(())
}

fn wire_anchors(
	hooks: &Rc<PageHooks>,
	anchor_offset: f64,
	runtime: &mut PageRuntime,
) -> Result<(), StartupError> {
	for anchor in query_all(&hooks.document, "a[href^=\"#\"]") {
		let (link, hooks) = (anchor.clone(), hooks.clone());
		runtime.listeners.push(listen(&anchor, "click", move |ev| {
			ev.prevent_default();
			let Some(href) = link.get_attribute("href") else {
				return;
			};
			// A bare "#" is not a valid selector; the query just fails.
			let Some(target) = hooks
				.document
				.query_selector(&href)
				.ok()
				.flatten()
				.and_then(|el| el.dyn_into::<HtmlElement>().ok())
			else {
				return;
			};
			let options = ScrollToOptions::new();
			options.set_top(interactions::anchor_scroll_top(
				target.offset_top() as f64,
				anchor_offset,
			));
			options.set_behavior(ScrollBehavior::Instant);
			hooks.window.scroll_to_with_scroll_to_options(&options);
		})?);
	}
	Ok(())
}

fn play_intro(hooks: &Rc<PageHooks>, animator: &SharedAnimator, loader_ms: u32) {
	animator.animate_all(intro::loader());

	let (loader, animator) = (hooks.loader.clone(), animator.clone());
	set_timeout(
		move || {
			if let Some(loader) = loader {
				let _ = loader.class_list().add_1(intro::LOADER_HIDDEN_CLASS);
			}
			animator.animate_all(intro::timeline());
		},
		Duration::from_millis(loader_ms as u64),
	);
}

//! portfolio-fx: visual effects for a single-page portfolio, compiled to WASM.
//!
//! Provides an animated particle background, a persisted dark/light theme,
//! scroll-linked styling, reveal-on-scroll entrances, a custom cursor and a set
//! of hover micro-interactions. Everything attaches to an existing page by
//! class name; [`start`] wires it all once the document is loaded.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{Level, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlScriptElement, Window};

pub mod animation;
pub mod components;
pub mod config;
pub mod frame;
pub mod interactions;
pub mod intro;
pub mod page;
pub mod reveal;
pub mod scroll;
pub mod theme;

pub use components::particle_field::ParticleCanvas;
pub use config::FxConfig;
pub use page::StartupError;
pub use theme::{Theme, ThemeState};

use animation::{AnimeJs, Animator};
use config::Banner;

thread_local! {
	static RUNTIME: RefCell<Option<page::PageRuntime>> = RefCell::new(None);
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("portfolio-fx: logging initialized");
}

/// Load overrides from a script element with id="fx-config".
/// Falls back to the built-in defaults when absent or malformed.
fn load_config() -> FxConfig {
	let Some(json_text) = config_text() else {
		return FxConfig::default();
	};
	match FxConfig::from_json(&json_text) {
		Ok(config) => {
			info!("portfolio-fx: loaded page config");
			config
		}
		Err(e) => {
			warn!("portfolio-fx: failed to parse fx-config, using defaults: {}", e);
			FxConfig::default()
		}
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("fx-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

fn print_banner(banner: &Banner) {
	let styled = |text: &str, css: &str| {
		web_sys::console::log_2(
			&JsValue::from_str(&format!("%c{text}")),
			&JsValue::from_str(css),
		);
	};
	styled(
		&banner.title,
		"font-size: 24px; font-weight: 600; color: #f5f5f5; background: #0a0a0a; padding: 10px 20px;",
	);
	if let Some(ref subtitle) = banner.subtitle {
		styled(subtitle, "font-size: 14px; color: #888;");
	}
	for line in &banner.lines {
		styled(line, "font-size: 12px; color: #f5f5f5;");
	}
}

/// Wires every effect into the current document and mounts the particle canvas.
///
/// Fails without side effects on the page when a required hook
/// (`.theme-toggle`, `.cursor`, `.cursor-follower`) is missing.
pub fn start() -> Result<(), StartupError> {
	let config = load_config();
	let theme = Rc::new(ThemeState::load(
		theme::preference_store(),
		config.theme_storage_key.clone(),
	));
	let animator: Rc<dyn Animator<Element>> = Rc::new(AnimeJs::default());

	let runtime = page::wire(theme.clone(), animator, &config)?;
	RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));

	let particles = config.particles.clone();
	mount_to_body(move || {
		view! { <ParticleCanvas theme=theme config=particles /> }
	});

	if let Some(ref banner) = config.banner {
		print_banner(banner);
	}
	Ok(())
}

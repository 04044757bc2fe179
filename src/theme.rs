//! Light/dark theme preference.
//!
//! [`ThemeState`] is the single owner of the current [`Theme`]. It is created
//! once at startup from persisted storage, read by anything that picks colors,
//! and written only through [`ThemeState::toggle`]. Dependents register a
//! callback with [`ThemeState::subscribe`] and are invoked synchronously, in
//! registration order, after every toggle.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};
use web_sys::Storage;

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

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Nav bar opacity below the scroll threshold.
const NAV_ALPHA_TOP: f64 = 0.8;
/// Nav bar opacity once the page is scrolled past the threshold.
const NAV_ALPHA_SCROLLED: f64 = 0.95;

/// The two-valued page theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
	#[default]
	Dark,
	Light,
}

impl Theme {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Dark => "dark",
			Self::Light => "light",
		}
	}

	/// Resolve a persisted value. Anything other than `"light"` is dark,
	/// including an absent or empty value.
	pub fn from_stored(value: Option<&str>) -> Self {
		match value {
			Some("light") => Self::Light,
			_ => Self::Dark,
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			Self::Dark => Self::Light,
			Self::Light => Self::Dark,
		}
	}

	/// Foreground ink for particles and their links.
	pub fn ink(self) -> Color {
		match self {
			Self::Dark => Color::rgb(255, 255, 255),
			Self::Light => Color::rgb(0, 0, 0),
		}
	}

	/// Translucent nav bar background, more opaque once scrolled.
	pub fn nav_background(self, scrolled: bool) -> Color {
		let alpha = if scrolled {
			NAV_ALPHA_SCROLLED
		} else {
			NAV_ALPHA_TOP
		};
		match self {
			Self::Dark => Color::rgba(10, 10, 10, alpha),
			Self::Light => Color::rgba(255, 255, 255, alpha),
		}
	}
}

/// String-keyed preference storage.
pub trait PreferenceStore {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&self, key: &str, value: &str);
}

/// Browser `localStorage`.
pub struct LocalStore(Storage);

impl LocalStore {
	/// Returns `None` when storage is disabled (e.g. some private browsing modes).
	pub fn open() -> Option<Self> {
		let storage = web_sys::window()?.local_storage().ok().flatten()?;
		Some(Self(storage))
	}
}

impl PreferenceStore for LocalStore {
	fn get(&self, key: &str) -> Option<String> {
		self.0.get_item(key).ok().flatten()
	}

	fn set(&self, key: &str, value: &str) {
		if self.0.set_item(key, value).is_err() {
			warn!("portfolio-fx: could not persist `{key}`");
		}
	}
}

/// In-memory store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Rc<RefCell<HashMap<String, String>>>);

impl MemoryStore {
	pub fn with(key: &str, value: &str) -> Self {
		let store = Self::default();
		store.set(key, value);
		store
	}
}

impl PreferenceStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.0.borrow().get(key).cloned()
	}

	fn set(&self, key: &str, value: &str) {
		self.0.borrow_mut().insert(key.to_string(), value.to_string());
	}
}

/// Picks `localStorage` when available, otherwise a session-only memory store.
pub fn preference_store() -> Box<dyn PreferenceStore> {
	match LocalStore::open() {
		Some(store) => Box::new(store),
		None => {
			warn!("portfolio-fx: localStorage unavailable, theme will not persist");
			Box::new(MemoryStore::default())
		}
	}
}

/// Owned theme cell with synchronous change notification.
pub struct ThemeState {
	current: Cell<Theme>,
	key: String,
	store: Box<dyn PreferenceStore>,
	dependents: RefCell<Vec<Box<dyn Fn(Theme)>>>,
}

impl ThemeState {
	pub fn load(store: Box<dyn PreferenceStore>, key: impl Into<String>) -> Self {
		let key = key.into();
		let stored = store.get(&key);
		let current = Theme::from_stored(stored.as_deref());
		debug!(
			"portfolio-fx: theme `{}` (stored: {:?})",
			current.as_str(),
			stored
		);
		Self {
			current: Cell::new(current),
			key,
			store,
			dependents: RefCell::new(Vec::new()),
		}
	}

	pub fn get(&self) -> Theme {
		self.current.get()
	}

	/// Register a callback run after every toggle with the new theme.
	pub fn subscribe(&self, dependent: impl Fn(Theme) + 'static) {
		self.dependents.borrow_mut().push(Box::new(dependent));
	}

	/// Flip the theme, persist it, then notify dependents in order.
	pub fn toggle(&self) -> Theme {
		let next = self.current.get().toggled();
		self.current.set(next);
		self.store.set(&self.key, next.as_str());
		for dependent in self.dependents.borrow().iter() {
			dependent(next);
		}
		next
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unset_preference_resolves_to_dark() {
		let state = ThemeState::load(Box::new(MemoryStore::default()), "theme");
		assert_eq!(state.get(), Theme::Dark);
		assert_eq!(
			state.get().nav_background(false).to_css(),
			"rgba(10, 10, 10, 0.8)"
		);
	}

	#[test]
	fn unknown_stored_values_are_dark() {
		for value in ["", "Light", "sepia", "true"] {
			let state = ThemeState::load(Box::new(MemoryStore::with("theme", value)), "theme");
			assert_eq!(state.get(), Theme::Dark, "stored {value:?}");
		}
		let state = ThemeState::load(Box::new(MemoryStore::with("theme", "light")), "theme");
		assert_eq!(state.get(), Theme::Light);
	}

	#[test]
	fn toggle_from_garbage_persists_a_valid_value() {
		let store = MemoryStore::with("theme", "sepia");
		let state = ThemeState::load(Box::new(store.clone()), "theme");
		assert_eq!(state.toggle(), Theme::Light);
		assert_eq!(store.get("theme").as_deref(), Some("light"));
	}

	#[test]
	fn toggling_twice_restores_value_and_colors() {
		let store = MemoryStore::with("theme", "dark");
		let state = ThemeState::load(Box::new(store.clone()), "theme");
		let ink = state.get().ink();
		let nav = state.get().nav_background(true);

		state.toggle();
		assert_eq!(store.get("theme").as_deref(), Some("light"));
		assert_ne!(state.get().ink(), ink);

		state.toggle();
		assert_eq!(state.get(), Theme::Dark);
		assert_eq!(store.get("theme").as_deref(), Some("dark"));
		assert_eq!(state.get().ink(), ink);
		assert_eq!(state.get().nav_background(true), nav);
	}

	#[test]
	fn dependents_run_in_registration_order() {
		let state = ThemeState::load(Box::new(MemoryStore::default()), "theme");
		let seen = Rc::new(RefCell::new(Vec::new()));
		for tag in ["nav", "flash", "spin"] {
			let seen = seen.clone();
			state.subscribe(move |theme| seen.borrow_mut().push((tag, theme)));
		}

		state.toggle();
		assert_eq!(
			*seen.borrow(),
			vec![
				("nav", Theme::Light),
				("flash", Theme::Light),
				("spin", Theme::Light)
			]
		);
	}

	#[test]
	fn colors_render_as_css() {
		assert_eq!(Theme::Light.ink().to_css(), "#000000");
		assert_eq!(
			Theme::Dark.ink().with_alpha(0.5).to_css(),
			"rgba(255, 255, 255, 0.5)"
		);
		assert_eq!(
			Theme::Light.nav_background(true).to_css(),
			"rgba(255, 255, 255, 0.95)"
		);
	}
}

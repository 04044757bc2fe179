//! Styles derived purely from the scroll offset.

use crate::animation::{AnimationSpec, Easing, Property, Target, Tween};
use crate::config::ScrollConfig;
use crate::theme::{Color, Theme};

/// Scroll geometry read from the document at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollSample {
	/// `window.pageYOffset`.
	pub offset: f64,
	/// `window.innerHeight`.
	pub viewport_height: f64,
	/// `documentElement.scrollHeight`.
	pub scroll_height: f64,
	/// `documentElement.clientHeight`.
	pub client_height: f64,
}

impl ScrollSample {
	/// Fraction of the scrollable distance covered, in [0, 1].
	/// A page that cannot scroll reports 0.
	pub fn progress(&self) -> f64 {
		let total = self.scroll_height - self.client_height;
		if total > 0.0 {
			(self.offset / total).clamp(0.0, 1.0)
		} else {
			0.0
		}
	}
}

/// Hero parallax style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroStyle {
	pub translate_y: f64,
	pub opacity: f64,
}

impl HeroStyle {
	pub fn transform(&self) -> String {
		format!("translateY({}px)", self.translate_y)
	}
}

/// Everything the scroll layer writes for one sample.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollFrame {
	pub nav_background: Color,
	/// `None` once the hero has scrolled out; the last style is left in place.
	pub hero: Option<HeroStyle>,
	/// Target `scaleX` for the progress bar.
	pub progress: f64,
}

/// Derives nav, hero and progress styles from a [`ScrollSample`].
#[derive(Clone, Debug, Default)]
pub struct ScrollLayer {
	config: ScrollConfig,
}

impl ScrollLayer {
	pub fn new(config: ScrollConfig) -> Self {
		Self { config }
	}

	pub fn nav_background(&self, theme: Theme, offset: f64) -> Color {
		theme.nav_background(offset > self.config.nav_threshold)
	}

	pub fn hero(&self, sample: &ScrollSample) -> Option<HeroStyle> {
		(sample.offset < sample.viewport_height).then(|| HeroStyle {
			translate_y: sample.offset * self.config.parallax_rate,
			opacity: 1.0 - (sample.offset / sample.viewport_height) * self.config.parallax_fade,
		})
	}

	pub fn compute(&self, sample: &ScrollSample, theme: Theme) -> ScrollFrame {
		ScrollFrame {
			nav_background: self.nav_background(theme, sample.offset),
			hero: self.hero(sample),
			progress: sample.progress(),
		}
	}
}

/// Eases the progress bar toward its new scale.
pub fn progress_animation<E>(bar: E, progress: f64) -> AnimationSpec<E> {
	AnimationSpec::new(Target::Node(bar), 100.0)
		.tween(Property::ScaleX, Tween::to(progress))
		.easing(Easing::Linear)
}

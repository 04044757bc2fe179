//! Tunables for every effect, optionally overridden by page-supplied JSON.
//!
//! The defaults reproduce the page's built-in behavior. A page can override any
//! subset by embedding `<script id="fx-config" type="application/json">`.

use serde::Deserialize;

/// Particle field sizing and drawing constants.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
	/// Surface area (px²) per particle; count = floor(w·h / this).
	pub area_per_particle: f64,
	/// Particles closer than this are linked.
	pub link_distance: f64,
	/// Link alpha at zero distance, fading linearly to 0 at `link_distance`.
	pub link_alpha: f64,
	pub link_width: f64,
	/// Velocity components are drawn from `[-max_speed, max_speed)`.
	pub max_speed: f64,
	pub radius: (f64, f64),
	pub opacity: (f64, f64),
}

impl Default for ParticleConfig {
	fn default() -> Self {
		Self {
			area_per_particle: 15000.0,
			link_distance: 100.0,
			link_alpha: 0.1,
			link_width: 0.5,
			max_speed: 0.25,
			radius: (0.5, 2.5),
			opacity: (0.2, 0.7),
		}
	}
}

/// Scroll-derived styling constants.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
	/// Offset past which the nav switches to its opaque background.
	pub nav_threshold: f64,
	/// Hero translation per scrolled pixel.
	pub parallax_rate: f64,
	/// Opacity lost by the hero over one viewport height.
	pub parallax_fade: f64,
}

impl Default for ScrollConfig {
	fn default() -> Self {
		Self {
			nav_threshold: 100.0,
			parallax_rate: 0.5,
			parallax_fade: 0.8,
		}
	}
}

/// Reveal-on-scroll constants.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevealConfig {
	/// Visible fraction of a region required to trigger.
	pub threshold: f64,
	/// Pixels the viewport's bottom edge is pulled up by.
	pub bottom_margin: f64,
	/// Delay per project ordinal, in ms.
	pub project_stagger_ms: f64,
}

impl Default for RevealConfig {
	fn default() -> Self {
		Self {
			threshold: 0.15,
			bottom_margin: 100.0,
			project_stagger_ms: 100.0,
		}
	}
}

/// Styled console greeting printed once at startup.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Banner {
	pub title: String,
	pub subtitle: Option<String>,
	pub lines: Vec<String>,
}

/// Complete effect configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FxConfig {
	/// localStorage key holding `"dark"` or `"light"`.
	pub theme_storage_key: String,
	pub particles: ParticleConfig,
	pub scroll: ScrollConfig,
	pub reveal: RevealConfig,
	/// Fraction of the pointer's offset from center applied by magnetic links.
	pub magnetic_strength: f64,
	/// Gap left above an anchor target after in-page navigation.
	pub anchor_offset: f64,
	/// How long the loading overlay stays up, in ms.
	pub loader_ms: u32,
	pub banner: Option<Banner>,
}

impl Default for FxConfig {
	fn default() -> Self {
		Self {
			theme_storage_key: "theme".to_string(),
			particles: ParticleConfig::default(),
			scroll: ScrollConfig::default(),
			reveal: RevealConfig::default(),
			magnetic_strength: 0.1,
			anchor_offset: 100.0,
			loader_ms: 2500,
			banner: None,
		}
	}
}

impl FxConfig {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_yields_defaults() {
		assert_eq!(FxConfig::from_json("{}").unwrap(), FxConfig::default());
	}

	#[test]
	fn partial_override_keeps_other_defaults() {
		let config = FxConfig::from_json(
			r#"{
				"theme_storage_key": "site-theme",
				"particles": { "link_distance": 80 },
				"banner": { "title": "Hello" }
			}"#,
		)
		.unwrap();

		assert_eq!(config.theme_storage_key, "site-theme");
		assert_eq!(config.particles.link_distance, 80.0);
		assert_eq!(config.particles.area_per_particle, 15000.0);
		assert_eq!(config.scroll, ScrollConfig::default());
		let banner = config.banner.unwrap();
		assert_eq!(banner.title, "Hello");
		assert!(banner.lines.is_empty());
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(FxConfig::from_json("{ particles: }").is_err());
		assert!(FxConfig::from_json(r#"{ "loader_ms": "soon" }"#).is_err());
	}
}

//! One-shot entrance animations for page regions scrolled into view.
//!
//! Each tracked region is a two-state machine, `Pending → Triggered`. The first
//! visibility sample that qualifies fires the region's entrance plan; every
//! later sample is ignored, so scrolling back and forth never replays it.

use log::{debug, warn};

use crate::animation::{AnimationSpec, Animator, Delay, Property, Target, Tween};
use crate::config::RevealConfig;

/// Browsers may report a ratio a hair under the threshold they fired for.
const RATIO_SLACK: f64 = 0.001;

/// The kind of region, which decides its entrance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealCategory {
	SectionHeader,
	/// A project card with its ordinal on the page.
	Project {
		index: u32,
	},
	AboutContent,
	ContactContent,
}

impl RevealCategory {
	/// Selector matching every region the page tracks.
	pub const SELECTOR: &'static str = ".section-header, .project, .about-content, .contact-content";

	/// Classifies a region from its classes and `data-index` attribute.
	pub fn classify(has_class: impl Fn(&str) -> bool, data_index: Option<&str>) -> Option<Self> {
		if has_class("section-header") {
			Some(Self::SectionHeader)
		} else if has_class("project") {
			let index = match data_index.map(|v| v.trim().parse::<u32>()) {
				Some(Ok(index)) => index,
				other => {
					warn!(
						"portfolio-fx: project card has bad data-index ({:?}), using 0",
						other
					);
					0
				}
			};
			Some(Self::Project { index })
		} else if has_class("about-content") {
			Some(Self::AboutContent)
		} else if has_class("contact-content") {
			Some(Self::ContactContent)
		} else {
			None
		}
	}
}

/// Per-region reveal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
	Pending,
	Triggered,
}

/// One intersection report for a region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealSample {
	pub is_intersecting: bool,
	/// Visible fraction of the region within the (margin-shrunk) viewport.
	pub ratio: f64,
}

struct Region<K> {
	key: K,
	category: RevealCategory,
	state: RevealState,
}

/// Tracks a fixed set of regions and fires each one at most once.
pub struct RevealTracker<K> {
	regions: Vec<Region<K>>,
	config: RevealConfig,
}

impl<K: PartialEq> RevealTracker<K> {
	pub fn new(config: RevealConfig) -> Self {
		Self {
			regions: Vec::new(),
			config,
		}
	}

	pub fn track(&mut self, key: K, category: RevealCategory) {
		self.regions.push(Region {
			key,
			category,
			state: RevealState::Pending,
		});
	}

	pub fn state(&self, key: &K) -> Option<RevealState> {
		self.regions.iter().find(|r| r.key == *key).map(|r| r.state)
	}

	pub fn pending(&self) -> usize {
		self.regions
			.iter()
			.filter(|r| r.state == RevealState::Pending)
			.count()
	}

	fn qualifies(&self, sample: RevealSample) -> bool {
		sample.is_intersecting && sample.ratio + RATIO_SLACK >= self.config.threshold
	}

	/// Feeds a sample; returns the category exactly once, on the transition.
	pub fn observe(&mut self, key: &K, sample: RevealSample) -> Option<RevealCategory> {
		if !self.qualifies(sample) {
			return None;
		}
		let region = self
			.regions
			.iter_mut()
			.find(|r| r.key == *key && r.state == RevealState::Pending)?;
		region.state = RevealState::Triggered;
		debug!("portfolio-fx: reveal {:?}", region.category);
		Some(region.category)
	}

	/// Feeds a sample and runs the entrance on the transition. Returns `true`
	/// when the region fired and should no longer be observed.
	pub fn reveal<A: Animator<K> + ?Sized>(
		&mut self,
		key: &K,
		sample: RevealSample,
		animator: &A,
	) -> bool
	where
		K: Clone,
	{
		let Some(category) = self.observe(key, sample) else {
			return false;
		};
		animator.animate_all(entrance(category, key.clone(), &self.config));
		true
	}
}

fn fade_rise<E>(target: Target<E>, rise: f64) -> AnimationSpec<E> {
	AnimationSpec::new(target, 1000.0)
		.tween(Property::Opacity, Tween::from_to(0.0, 1.0))
		.tween(Property::TranslateY, Tween::from_to(rise, 0.0))
}

/// The entrance plan for a region of the given category.
pub fn entrance<E>(category: RevealCategory, region: E, config: &RevealConfig) -> Vec<AnimationSpec<E>> {
	match category {
		RevealCategory::SectionHeader => vec![fade_rise(Target::Node(region), 50.0)],
		RevealCategory::Project { index } => vec![
			fade_rise(Target::Node(region), 50.0)
				.delay(Delay::Fixed(index as f64 * config.project_stagger_ms)),
		],
		RevealCategory::AboutContent => vec![
			fade_rise(Target::Selector(".about-lead"), 50.0),
			fade_rise(Target::Selector(".about-card"), 60.0)
				.tween(Property::Scale, Tween::from_to(0.95, 1.0))
				.delay(Delay::Stagger {
					step: 150.0,
					start: 400.0,
				}),
		],
		RevealCategory::ContactContent => vec![
			fade_rise(Target::Node(region), 50.0),
			AnimationSpec::new(Target::Selector(".contact-link"), 800.0)
				.tween(Property::Opacity, Tween::from_to(0.0, 1.0))
				.tween(Property::TranslateX, Tween::from_to(-50.0, 0.0))
				.delay(Delay::Stagger {
					step: 150.0,
					start: 300.0,
				}),
		],
	}
}

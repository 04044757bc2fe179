//! Loading overlay and the page's opening sequence.

use crate::animation::{AnimationSpec, Delay, Easing, Property, Target, Tween};

/// Class added to the loader once it has played.
pub const LOADER_HIDDEN_CLASS: &str = "hidden";

/// Loader letters rise in, hold, then leave upward.
pub fn loader<E>() -> Vec<AnimationSpec<E>> {
	vec![
		AnimationSpec::new(Target::Selector(".loader-text span"), 800.0)
			.tween(Property::TranslateY, Tween::from_to(40.0, 0.0))
			.tween(Property::Opacity, Tween::from_to(0.0, 1.0))
			.delay(Delay::Stagger {
				step: 100.0,
				start: 0.0,
			}),
		AnimationSpec::new(Target::Selector(".loader-text span"), 600.0)
			.tween(Property::TranslateY, Tween::from_to(0.0, -40.0))
			.tween(Property::Opacity, Tween::from_to(1.0, 0.0))
			.delay(Delay::Stagger {
				step: 100.0,
				start: 1500.0,
			})
			.easing(Easing::InExpo),
	]
}

fn fade_in<E>(selector: &'static str, duration_ms: f64) -> AnimationSpec<E> {
	AnimationSpec::new(Target::Selector(selector), duration_ms)
		.tween(Property::Opacity, Tween::from_to(0.0, 1.0))
}

/// Nav, toggle and hero entrance, played once the loader is gone.
pub fn timeline<E>() -> Vec<AnimationSpec<E>> {
	vec![
		fade_in(".nav", 800.0)
			.tween(Property::TranslateY, Tween::from_to(-20.0, 0.0))
			.delay(Delay::Fixed(200.0)),
		fade_in(".nav-link", 600.0)
			.tween(Property::TranslateY, Tween::from_to(-10.0, 0.0))
			.delay(Delay::Stagger {
				step: 100.0,
				start: 600.0,
			}),
		fade_in(".theme-toggle", 600.0)
			.tween(Property::Scale, Tween::from_to(0.8, 1.0))
			.delay(Delay::Fixed(900.0)),
		fade_in(".hero-label", 1000.0)
			.tween(Property::TranslateY, Tween::from_to(30.0, 0.0))
			.delay(Delay::Fixed(400.0)),
		AnimationSpec::new(Target::Selector(".hero-title .line span"), 1200.0)
			.tween(Property::TranslateY, Tween::from_to("100%", 0.0))
			.delay(Delay::Stagger {
				step: 150.0,
				start: 600.0,
			}),
		fade_in(".hero-points", 1000.0)
			.tween(Property::TranslateY, Tween::from_to(30.0, 0.0))
			.delay(Delay::Fixed(1200.0)),
		fade_in(".hero-points li", 800.0)
			.tween(Property::TranslateX, Tween::from_to(-20.0, 0.0))
			.delay(Delay::Stagger {
				step: 100.0,
				start: 1400.0,
			}),
		fade_in(".hero-scroll-text", 1000.0)
			.tween(Property::TranslateY, Tween::from_to(20.0, 0.0))
			.delay(Delay::Fixed(1800.0)),
		AnimationSpec::new(Target::Selector(".hero-bg"), 4000.0)
			.tween(Property::Scale, Tween::from_to(1.0, 1.2))
			.tween(Property::Opacity, Tween::from_to(0.3, 0.5))
			.easing(Easing::InOutSine)
			.ping_pong(),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn loader_exit_starts_after_entrance() {
		let plan = loader::<()>();
		assert_eq!(plan[0].easing, Easing::OutExpo);
		assert_eq!(plan[1].easing, Easing::InExpo);
		assert_eq!(
			plan[1].delay,
			Delay::Stagger {
				step: 100.0,
				start: 1500.0
			}
		);
	}

	#[test]
	fn only_the_hero_background_loops() {
		let plan = timeline::<()>();
		let looping: Vec<_> = plan.iter().filter(|s| s.ping_pong).collect();
		assert_eq!(looping.len(), 1);
		assert_eq!(looping[0].target, Target::Selector(".hero-bg"));
		assert_eq!(looping[0].duration_ms, 4000.0);
	}

	#[test]
	fn hero_title_slides_from_below_its_line() {
		let plan = timeline::<()>();
		let title = plan
			.iter()
			.find(|s| s.target == Target::Selector(".hero-title .line span"))
			.unwrap();
		assert_eq!(
			title.get(Property::TranslateY),
			Some(&Tween::from_to("100%", 0.0))
		);
	}
}

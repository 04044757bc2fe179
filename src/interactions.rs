//! Pointer-driven micro-interactions.
//!
//! Every responder here is stateless: a pointer event maps to a fixed set of
//! short animations. The one piece of state is [`CursorState`], mirrored onto
//! the cursor elements once per frame.

use crate::animation::{AnimationSpec, Delay, Property, Target, Tween};

/// Axis-aligned box in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn center(&self) -> (f64, f64) {
		(self.left + self.width / 2.0, self.top + self.height / 2.0)
	}
}

/// Pointer entered or left an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hover {
	Enter,
	Leave,
}

impl Hover {
	/// `(from, to)` for a tween that runs forward on enter and back on leave.
	fn span(self, rest: f64, active: f64) -> Tween {
		match self {
			Self::Enter => Tween::from_to(rest, active),
			Self::Leave => Tween::from_to(active, rest),
		}
	}
}

/// Project link: arrow nudge, tag pop and number highlight.
pub fn project_link<E: Clone>(link: E, hover: Hover) -> Vec<AnimationSpec<E>> {
	let mut tags = AnimationSpec::new(Target::All(link.clone(), ".project-tags span"), 300.0)
		.tween(Property::Scale, hover.span(1.0, 1.05));
	if hover == Hover::Enter {
		tags = tags.delay(Delay::Stagger {
			step: 50.0,
			start: 0.0,
		});
	}
	let mut plan = vec![
		AnimationSpec::new(Target::First(link.clone(), ".project-arrow"), 400.0)
			.tween(Property::TranslateX, hover.span(0.0, 10.0)),
		tags,
		AnimationSpec::new(Target::First(link.clone(), ".project-number"), 400.0)
			.tween(Property::Scale, hover.span(1.0, 1.2))
			.tween(Property::Opacity, hover.span(0.5, 1.0)),
	];
	if hover == Hover::Leave {
		plan.push(magnetic_release(link));
	}
	plan
}

/// Offset toward the pointer, as `strength` of its distance from the center.
pub fn magnetic_offset(rect: &Rect, pointer: (f64, f64), strength: f64) -> (f64, f64) {
	let (cx, cy) = rect.center();
	((pointer.0 - cx) * strength, (pointer.1 - cy) * strength)
}

/// Pulls an element toward the pointer while it moves over it.
pub fn magnetic_pull<E>(el: E, rect: &Rect, pointer: (f64, f64), strength: f64) -> AnimationSpec<E> {
	let (dx, dy) = magnetic_offset(rect, pointer, strength);
	AnimationSpec::new(Target::Node(el), 400.0)
		.tween(Property::TranslateX, Tween::to(dx))
		.tween(Property::TranslateY, Tween::to(dy))
}

/// Eases a magnetic element back to rest.
pub fn magnetic_release<E>(el: E) -> AnimationSpec<E> {
	AnimationSpec::new(Target::Node(el), 600.0)
		.tween(Property::TranslateX, Tween::to(0.0))
		.tween(Property::TranslateY, Tween::to(0.0))
}

/// Contact link: arrow nudge and letter-spacing breathe.
pub fn contact_link<E: Clone>(link: E, hover: Hover) -> Vec<AnimationSpec<E>> {
	let spacing = match hover {
		Hover::Enter => Tween::from_to("-0.02em", "0.02em"),
		Hover::Leave => Tween::from_to("0.02em", "-0.02em"),
	};
	vec![
		AnimationSpec::new(Target::First(link.clone(), ".link-arrow"), 400.0)
			.tween(Property::TranslateX, hover.span(0.0, 10.0)),
		AnimationSpec::new(Target::First(link, ".link-text"), 400.0)
			.tween(Property::LetterSpacing, spacing),
	]
}

/// About card: lift the card and shift its list items.
pub fn about_card<E: Clone>(card: E, hover: Hover) -> Vec<AnimationSpec<E>> {
	let lift = match hover {
		Hover::Enter => -8.0,
		Hover::Leave => 0.0,
	};
	let mut items = AnimationSpec::new(Target::All(card.clone(), "li"), 300.0)
		.tween(Property::TranslateX, hover.span(0.0, 5.0));
	if hover == Hover::Enter {
		items = items.delay(Delay::Stagger {
			step: 50.0,
			start: 0.0,
		});
	}
	vec![
		AnimationSpec::new(Target::Node(card), 400.0).tween(Property::TranslateY, Tween::to(lift)),
		items,
	]
}

/// One full turn of the theme toggle, relative to wherever it is.
pub fn toggle_spin<E>(toggle: E) -> AnimationSpec<E> {
	AnimationSpec::new(Target::Node(toggle), 600.0).tween(Property::Rotate, Tween::to("+=360"))
}

/// Scroll position that leaves `offset` px above an anchor target.
pub fn anchor_scroll_top(target_offset_top: f64, offset: f64) -> f64 {
	target_offset_top - offset
}

/// Pointer position and link-hover flag for the custom cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorState {
	pub x: f64,
	pub y: f64,
	pub active: bool,
}

impl CursorState {
	pub fn point(&mut self, x: f64, y: f64) {
		self.x = x;
		self.y = y;
	}

	/// Sets the hover flag; returns `true` if it changed.
	pub fn set_active(&mut self, active: bool) -> bool {
		let changed = self.active != active;
		self.active = active;
		changed
	}

	pub fn transform(&self) -> String {
		format!("translate({}px, {}px)", self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::animation::Value;

	#[test]
	fn magnetic_pull_is_ten_percent_of_offset() {
		let rect = Rect {
			left: 100.0,
			top: 50.0,
			width: 200.0,
			height: 40.0,
		};
		assert_eq!(rect.center(), (200.0, 70.0));
		let (dx, dy) = magnetic_offset(&rect, (250.0, 60.0), 0.1);
		assert!((dx - 5.0).abs() < 1e-12 && (dy + 1.0).abs() < 1e-12);
		assert_eq!(magnetic_offset(&rect, (200.0, 70.0), 0.1), (0.0, 0.0));

		let spec = magnetic_pull("link", &rect, (300.0, 70.0), 0.1);
		assert_eq!(spec.duration_ms, 400.0);
		assert_eq!(spec.get(Property::TranslateX), Some(&Tween::To(Value::Num(10.0))));
	}

	#[test]
	fn project_leave_reverses_and_releases() {
		let enter = project_link("a", Hover::Enter);
		let leave = project_link("a", Hover::Leave);
		assert_eq!(enter.len(), 3);
		assert_eq!(leave.len(), 4);

		assert_eq!(
			enter[0].get(Property::TranslateX),
			Some(&Tween::from_to(0.0, 10.0))
		);
		assert_eq!(
			leave[0].get(Property::TranslateX),
			Some(&Tween::from_to(10.0, 0.0))
		);
		assert!(matches!(enter[1].delay, Delay::Stagger { step, .. } if step == 50.0));
		assert_eq!(leave[1].delay, Delay::None);
		assert_eq!(leave[3], magnetic_release("a"));
		assert_eq!(leave[3].duration_ms, 600.0);
	}

	#[test]
	fn contact_link_breathes_letter_spacing() {
		let plan = contact_link("c", Hover::Enter);
		assert_eq!(plan[1].target, Target::First("c", ".link-text"));
		assert_eq!(
			plan[1].get(Property::LetterSpacing),
			Some(&Tween::from_to("-0.02em", "0.02em"))
		);
	}

	#[test]
	fn about_card_lifts_and_settles() {
		let enter = about_card("card", Hover::Enter);
		let leave = about_card("card", Hover::Leave);
		assert_eq!(enter[0].get(Property::TranslateY), Some(&Tween::to(-8.0)));
		assert_eq!(leave[0].get(Property::TranslateY), Some(&Tween::to(0.0)));
		assert_eq!(leave[1].get(Property::TranslateX), Some(&Tween::from_to(5.0, 0.0)));
	}

	#[test]
	fn toggle_spin_is_relative() {
		let spec = toggle_spin("toggle");
		assert_eq!(spec.get(Property::Rotate), Some(&Tween::To(Value::Css("+=360"))));
	}

	#[test]
	fn anchor_leaves_room_for_the_nav() {
		assert_eq!(anchor_scroll_top(1200.0, 100.0), 1100.0);
	}

	#[test]
	fn cursor_mirrors_pointer_and_tracks_hover() {
		let mut cursor = CursorState::default();
		cursor.point(12.5, 300.0);
		assert_eq!(cursor.transform(), "translate(12.5px, 300px)");

		assert!(cursor.set_active(true));
		assert!(!cursor.set_active(true));
		assert!(cursor.set_active(false));
		assert_eq!(cursor.x, 12.5);
	}
}

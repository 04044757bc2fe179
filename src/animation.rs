//! Declarative tween requests and the bridge to the page's animation library.
//!
//! Effects describe what should move as an [`AnimationSpec`] and hand it to an
//! [`Animator`]. Specs are generic over the element handle `E` so plans can be
//! built and inspected without a DOM; in the browser `E` is [`web_sys::Element`]
//! and [`AnimeJs`] forwards each one to the global `anime()` function.

use std::cell::Cell;
use std::f64::consts::PI;

use js_sys::{Array, Object, Reflect};
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::Element;

/// What a tween applies to.
#[derive(Clone, Debug, PartialEq)]
pub enum Target<E> {
	/// Every element matching a document-wide selector.
	Selector(&'static str),
	/// One specific element.
	Node(E),
	/// The first descendant of `E` matching the selector.
	First(E, &'static str),
	/// All descendants of `E` matching the selector.
	All(E, &'static str),
}

/// Animatable style properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Property {
	Opacity,
	TranslateX,
	TranslateY,
	Scale,
	ScaleX,
	Rotate,
	LetterSpacing,
}

impl Property {
	pub fn name(self) -> &'static str {
		match self {
			Self::Opacity => "opacity",
			Self::TranslateX => "translateX",
			Self::TranslateY => "translateY",
			Self::Scale => "scale",
			Self::ScaleX => "scaleX",
			Self::Rotate => "rotate",
			Self::LetterSpacing => "letterSpacing",
		}
	}
}

/// A numeric value or a CSS literal such as `"100%"` or `"+=360"`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Num(f64),
	Css(&'static str),
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Self::Num(v)
	}
}

impl From<&'static str> for Value {
	fn from(v: &'static str) -> Self {
		Self::Css(v)
	}
}

impl Value {
	fn to_js(&self) -> JsValue {
		match self {
			Self::Num(n) => JsValue::from_f64(*n),
			Self::Css(s) => JsValue::from_str(s),
		}
	}
}

/// How a property moves.
#[derive(Clone, Debug, PartialEq)]
pub enum Tween {
	/// From the current value to the given one.
	To(Value),
	/// Explicit start and end.
	FromTo(Value, Value),
}

impl Tween {
	pub fn to(v: impl Into<Value>) -> Self {
		Self::To(v.into())
	}

	pub fn from_to(from: impl Into<Value>, to: impl Into<Value>) -> Self {
		Self::FromTo(from.into(), to.into())
	}
}

/// Start delay, optionally staggered across the matched elements.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Delay {
	#[default]
	None,
	Fixed(f64),
	/// `start + step * i` for the i-th matched element.
	Stagger { step: f64, start: f64 },
}

/// Easing curves, named as the animation library names them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
	Linear,
	#[default]
	OutExpo,
	InExpo,
	InOutQuad,
	InOutSine,
}

impl Easing {
	pub fn name(self) -> &'static str {
		match self {
			Self::Linear => "linear",
			Self::OutExpo => "easeOutExpo",
			Self::InExpo => "easeInExpo",
			Self::InOutQuad => "easeInOutQuad",
			Self::InOutSine => "easeInOutSine",
		}
	}

	/// Eased progress for `t` in [0, 1].
	pub fn apply(self, t: f64) -> f64 {
		let t = t.clamp(0.0, 1.0);
		match self {
			Self::Linear => t,
			Self::OutExpo => {
				if t >= 1.0 {
					1.0
				} else {
					1.0 - 2f64.powf(-10.0 * t)
				}
			}
			Self::InExpo => {
				if t <= 0.0 {
					0.0
				} else {
					2f64.powf(10.0 * t - 10.0)
				}
			}
			Self::InOutQuad => {
				if t < 0.5 {
					2.0 * t * t
				} else {
					1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
				}
			}
			Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
		}
	}
}

/// One fire-and-forget animation request.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSpec<E> {
	pub target: Target<E>,
	pub tweens: Vec<(Property, Tween)>,
	pub duration_ms: f64,
	pub delay: Delay,
	pub easing: Easing,
	/// Repeat forever, reversing direction on every pass.
	pub ping_pong: bool,
}

impl<E> AnimationSpec<E> {
	pub fn new(target: Target<E>, duration_ms: f64) -> Self {
		Self {
			target,
			tweens: Vec::new(),
			duration_ms,
			delay: Delay::None,
			easing: Easing::default(),
			ping_pong: false,
		}
	}

	pub fn tween(mut self, property: Property, tween: Tween) -> Self {
		self.tweens.push((property, tween));
		self
	}

	pub fn delay(mut self, delay: Delay) -> Self {
		self.delay = delay;
		self
	}

	pub fn easing(mut self, easing: Easing) -> Self {
		self.easing = easing;
		self
	}

	pub fn ping_pong(mut self) -> Self {
		self.ping_pong = true;
		self
	}

	/// Looks up the tween for a property.
	pub fn get(&self, property: Property) -> Option<&Tween> {
		self.tweens
			.iter()
			.find(|(p, _)| *p == property)
			.map(|(_, t)| t)
	}
}

/// Anything that can run an [`AnimationSpec`].
pub trait Animator<E> {
	fn animate(&self, spec: AnimationSpec<E>);

	fn animate_all(&self, specs: Vec<AnimationSpec<E>>) {
		for spec in specs {
			self.animate(spec);
		}
	}
}

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(catch, js_name = anime)]
	fn anime(params: &Object) -> Result<JsValue, JsValue>;

	#[wasm_bindgen(catch, js_namespace = anime, js_name = stagger)]
	fn anime_stagger(step: f64, options: &Object) -> Result<JsValue, JsValue>;
}

/// Forwards specs to the global `anime` function loaded by the host page.
#[derive(Default)]
pub struct AnimeJs {
	failed: Cell<bool>,
}

impl AnimeJs {
	fn resolve_target(target: &Target<Element>) -> Option<JsValue> {
		match target {
			Target::Selector(selector) => Some(JsValue::from_str(selector)),
			Target::Node(el) => Some(el.clone().into()),
			Target::First(el, selector) => el
				.query_selector(selector)
				.ok()
				.flatten()
				.map(JsValue::from),
			Target::All(el, selector) => el.query_selector_all(selector).ok().map(JsValue::from),
		}
	}

	fn delay_value(delay: Delay) -> Result<Option<JsValue>, JsValue> {
		match delay {
			Delay::None => Ok(None),
			Delay::Fixed(ms) => Ok(Some(JsValue::from_f64(ms))),
			Delay::Stagger { step, start } => {
				let options = Object::new();
				Reflect::set(&options, &"start".into(), &JsValue::from_f64(start))?;
				anime_stagger(step, &options).map(Some)
			}
		}
	}

	fn params(spec: &AnimationSpec<Element>, targets: JsValue) -> Result<Object, JsValue> {
		let params = Object::new();
		Reflect::set(&params, &"targets".into(), &targets)?;
		for (property, tween) in &spec.tweens {
			let value = match tween {
				Tween::To(v) => v.to_js(),
				Tween::FromTo(from, to) => Array::of2(&from.to_js(), &to.to_js()).into(),
			};
			Reflect::set(&params, &property.name().into(), &value)?;
		}
		Reflect::set(
			&params,
			&"duration".into(),
			&JsValue::from_f64(spec.duration_ms),
		)?;
		if let Some(delay) = Self::delay_value(spec.delay)? {
			Reflect::set(&params, &"delay".into(), &delay)?;
		}
		Reflect::set(&params, &"easing".into(), &spec.easing.name().into())?;
		if spec.ping_pong {
			Reflect::set(&params, &"loop".into(), &JsValue::TRUE)?;
			Reflect::set(&params, &"direction".into(), &"alternate".into())?;
		}
		Ok(params)
	}
}

impl Animator<Element> for AnimeJs {
	fn animate(&self, spec: AnimationSpec<Element>) {
		if self.failed.get() {
			return;
		}
		// A missing optional element simply has nothing to animate.
		let Some(targets) = Self::resolve_target(&spec.target) else {
			return;
		};
		let result = Self::params(&spec, targets).and_then(|params| anime(&params));
		if let Err(err) = result {
			warn!(
				"portfolio-fx: animation library unavailable, disabling animations: {:?}",
				err
			);
			self.failed.set(true);
		}
	}
}

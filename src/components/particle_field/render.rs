//! Canvas drawing for the particle field.
//!
//! Particles are drawn first, then links on top, all tinted with the theme's
//! ink. The theme is read for every draw call rather than once per frame.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::particles::ParticleSystem;
use crate::theme::ThemeState;

/// The handful of 2D primitives the field needs.
pub trait Painter {
	fn clear(&self, width: f64, height: f64);
	fn fill_disc(&self, x: f64, y: f64, radius: f64, fill: &str);
	fn stroke_line(&self, from: (f64, f64), to: (f64, f64), width: f64, stroke: &str);
}

impl Painter for CanvasRenderingContext2d {
	fn clear(&self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_disc(&self, x: f64, y: f64, radius: f64, fill: &str) {
		self.set_fill_style_str(fill);
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
		self.fill();
	}

	fn stroke_line(&self, from: (f64, f64), to: (f64, f64), width: f64, stroke: &str) {
		self.set_stroke_style_str(stroke);
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}
}

/// Draws particles and links. `opacity_override` replaces every particle's own
/// opacity while the theme-change flash is playing.
pub fn render(
	particles: &ParticleSystem,
	painter: &impl Painter,
	theme: &ThemeState,
	opacity_override: Option<f64>,
) {
	for p in particles.particles() {
		let alpha = opacity_override.unwrap_or(p.opacity());
		let fill = theme.get().ink().with_alpha(alpha).to_css();
		painter.fill_disc(p.x, p.y, p.radius(), &fill);
	}

	let width = particles.config().link_width;
	for link in particles.links() {
		let stroke = theme.get().ink().with_alpha(link.alpha).to_css();
		painter.stroke_line(link.from, link.to, width, &stroke);
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use std::cell::RefCell;

	use super::Painter;

	#[derive(Clone, Debug, PartialEq)]
	pub enum Op {
		Clear(f64, f64),
		Disc { x: f64, y: f64, radius: f64, fill: String },
		Line { from: (f64, f64), to: (f64, f64), width: f64, stroke: String },
	}

	/// Records draw calls instead of painting.
	#[derive(Default)]
	pub struct RecordingPainter {
		pub ops: RefCell<Vec<Op>>,
	}

	impl RecordingPainter {
		pub fn take(&self) -> Vec<Op> {
			self.ops.take()
		}
	}

	impl Painter for RecordingPainter {
		fn clear(&self, width: f64, height: f64) {
			self.ops.borrow_mut().push(Op::Clear(width, height));
		}

		fn fill_disc(&self, x: f64, y: f64, radius: f64, fill: &str) {
			self.ops.borrow_mut().push(Op::Disc {
				x,
				y,
				radius,
				fill: fill.to_string(),
			});
		}

		fn stroke_line(&self, from: (f64, f64), to: (f64, f64), width: f64, stroke: &str) {
			self.ops.borrow_mut().push(Op::Line {
				from,
				to,
				width,
				stroke: stroke.to_string(),
			});
		}
	}
}

#[cfg(test)]
mod tests {
	use super::testing::{Op, RecordingPainter};
	use super::*;
	use crate::components::particle_field::particles::Particle;
	use crate::config::ParticleConfig;
	use crate::theme::MemoryStore;

	fn pair() -> ParticleSystem {
		ParticleSystem::from_particles(
			ParticleConfig::default(),
			300.0,
			300.0,
			vec![
				Particle::new(10.0, 10.0, 0.0, 0.0, 2.0, 0.4),
				Particle::new(10.0, 60.0, 0.0, 0.0, 1.0, 0.6),
			],
		)
	}

	#[test]
	fn dark_theme_draws_white_discs_then_links() {
		let theme = ThemeState::load(Box::new(MemoryStore::default()), "theme");
		let painter = RecordingPainter::default();
		render(&pair(), &painter, &theme, None);

		assert_eq!(
			painter.take(),
			vec![
				Op::Disc {
					x: 10.0,
					y: 10.0,
					radius: 2.0,
					fill: "rgba(255, 255, 255, 0.4)".into()
				},
				Op::Disc {
					x: 10.0,
					y: 60.0,
					radius: 1.0,
					fill: "rgba(255, 255, 255, 0.6)".into()
				},
				Op::Line {
					from: (10.0, 10.0),
					to: (10.0, 60.0),
					width: 0.5,
					stroke: "rgba(255, 255, 255, 0.05)".into()
				},
			]
		);
	}

	#[test]
	fn light_theme_and_flash_override() {
		let theme = ThemeState::load(Box::new(MemoryStore::with("theme", "light")), "theme");
		let painter = RecordingPainter::default();
		render(&pair(), &painter, &theme, Some(0.2));

		let fills: Vec<_> = painter
			.take()
			.into_iter()
			.filter_map(|op| match op {
				Op::Disc { fill, .. } => Some(fill),
				_ => None,
			})
			.collect();
		assert_eq!(fills, vec!["rgba(0, 0, 0, 0.2)", "rgba(0, 0, 0, 0.2)"]);
	}
}

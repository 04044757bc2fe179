//! Per-frame driver tying the particle system to a painter and the theme.

use std::rc::Rc;

use log::debug;
use rand::rngs::SmallRng;

use super::particles::ParticleSystem;
use super::render::{self, Painter};
use crate::config::ParticleConfig;
use crate::frame::FrameTask;
use crate::theme::ThemeState;

/// Owns the particle collection for one drawing surface.
pub struct ParticleField<P> {
	system: ParticleSystem,
	painter: P,
	theme: Rc<ThemeState>,
	rng: SmallRng,
}

impl<P: Painter> ParticleField<P> {
	pub fn new(
		config: ParticleConfig,
		(width, height): (f64, f64),
		painter: P,
		theme: Rc<ThemeState>,
		mut rng: SmallRng,
	) -> Self {
		let system = ParticleSystem::new(config, width, height, &mut rng);
		debug!(
			"portfolio-fx: {} particles for {}x{}",
			system.particles().len(),
			width,
			height
		);
		Self {
			system,
			painter,
			theme,
			rng,
		}
	}

	/// Recreates the whole collection for the new surface size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.system.reinitialize(width, height, &mut self.rng);
		debug!(
			"portfolio-fx: resized to {}x{}, {} particles",
			width,
			height,
			self.system.particles().len()
		);
	}

	pub fn request_flash(&mut self) {
		self.system.request_flash();
	}

	pub fn system(&self) -> &ParticleSystem {
		&self.system
	}
}

impl<P: Painter> FrameTask for ParticleField<P> {
	fn frame(&mut self, now: f64) {
		let (width, height) = self.system.size();
		self.painter.clear(width, height);
		self.system.step();
		let flash = self.system.flash_opacity(now);
		render::render(&self.system, &self.painter, &self.theme, flash);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::render::testing::{Op, RecordingPainter};
	use crate::theme::MemoryStore;
	use rand::SeedableRng;

	fn field(width: f64, height: f64) -> ParticleField<RecordingPainter> {
		let theme = Rc::new(ThemeState::load(Box::new(MemoryStore::default()), "theme"));
		ParticleField::new(
			ParticleConfig::default(),
			(width, height),
			RecordingPainter::default(),
			theme,
			SmallRng::seed_from_u64(9),
		)
	}

	#[test]
	fn frame_clears_then_draws_every_particle() {
		let mut field = field(1500.0, 1000.0);
		field.frame(16.0);

		let ops = field.painter.take();
		assert_eq!(ops[0], Op::Clear(1500.0, 1000.0));
		let discs = ops
			.iter()
			.filter(|op| matches!(op, Op::Disc { .. }))
			.count();
		assert_eq!(discs, 100);
		assert!(
			ops[1..=100]
				.iter()
				.all(|op| matches!(op, Op::Disc { .. }))
		);
	}

	#[test]
	fn resize_recounts_and_keeps_particles_inside() {
		let mut field = field(1500.0, 1000.0);
		field.resize(600.0, 500.0);
		assert_eq!(field.system().particles().len(), 20);

		for t in 0..200 {
			field.frame(t as f64 * 16.0);
		}
		assert!(
			field
				.system()
				.particles()
				.iter()
				.all(|p| p.x >= 0.0 && p.x < 600.0 && p.y >= 0.0 && p.y < 500.0)
		);
		assert_eq!(field.painter.take()[0], Op::Clear(600.0, 500.0));
	}

	#[test]
	fn theme_is_read_fresh_each_frame() {
		let theme = Rc::new(ThemeState::load(Box::new(MemoryStore::default()), "theme"));
		let mut field = ParticleField::new(
			ParticleConfig::default(),
			(300.0, 300.0),
			RecordingPainter::default(),
			theme.clone(),
			SmallRng::seed_from_u64(1),
		);
		let first_fill = |ops: Vec<Op>| {
			ops.into_iter().find_map(|op| match op {
				Op::Disc { fill, .. } => Some(fill),
				_ => None,
			})
		};

		field.frame(0.0);
		assert!(first_fill(field.painter.take()).unwrap().starts_with("rgba(255, 255, 255"));

		theme.toggle();
		field.frame(16.0);
		assert!(first_fill(field.painter.take()).unwrap().starts_with("rgba(0, 0, 0"));
	}
}

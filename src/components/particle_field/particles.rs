//! Drifting background particles and their proximity links.

use rand::Rng;

use crate::animation::Easing;
use crate::config::ParticleConfig;

/// Opacity keyframes played across the whole field after a theme change.
const FLASH_KEYFRAMES: [f64; 3] = [0.5, 0.2, 0.5];
const FLASH_MS: f64 = 1000.0;

/// A single drifting point. Velocity, radius and opacity never change.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	speed_x: f64,
	speed_y: f64,
	radius: f64,
	opacity: f64,
}

impl Particle {
	pub fn new(x: f64, y: f64, speed_x: f64, speed_y: f64, radius: f64, opacity: f64) -> Self {
		Self {
			x,
			y,
			speed_x,
			speed_y,
			radius,
			opacity,
		}
	}

	fn random(config: &ParticleConfig, width: f64, height: f64, rng: &mut impl Rng) -> Self {
		let span = |(lo, hi): (f64, f64), r: f64| lo + r * (hi - lo);
		let x = rng.random::<f64>() * width;
		let y = rng.random::<f64>() * height;
		let radius = span(config.radius, rng.random());
		let speed = (-config.max_speed, config.max_speed);
		let speed_x = span(speed, rng.random());
		let speed_y = span(speed, rng.random());
		let opacity = span(config.opacity, rng.random());
		Self::new(x, y, speed_x, speed_y, radius, opacity)
	}

	pub fn velocity(&self) -> (f64, f64) {
		(self.speed_x, self.speed_y)
	}

	pub fn radius(&self) -> f64 {
		self.radius
	}

	pub fn opacity(&self) -> f64 {
		self.opacity
	}
}

/// A connector between two nearby particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub alpha: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Flash {
	Idle,
	Pending,
	Running { started: f64 },
}

/// Number of particles for a surface: one per `area` px², rounded down.
pub fn particle_count(width: f64, height: f64, area: f64) -> usize {
	let count = (width * height / area).floor();
	if count.is_finite() && count > 0.0 {
		count as usize
	} else {
		0
	}
}

/// Link opacity for two particles `distance` apart, or `None` if too far.
pub fn link_alpha(distance: f64, config: &ParticleConfig) -> Option<f64> {
	(distance < config.link_distance)
		.then(|| config.link_alpha * (1.0 - distance / config.link_distance))
}

/// Wraps one coordinate into `[0, extent)`, per axis. Overshooting the far
/// edge lands on 0; undershooting 0 lands just inside the far edge.
fn wrap_axis(pos: f64, extent: f64) -> f64 {
	if extent <= 0.0 {
		0.0
	} else if pos >= extent {
		0.0
	} else if pos < 0.0 {
		// Largest f64 strictly below a positive extent.
		f64::from_bits(extent.to_bits() - 1)
	} else {
		pos
	}
}

/// Evaluates evenly spaced keyframes at `progress` in [0, 1], easing each segment.
fn keyframe_value(keys: &[f64], progress: f64, easing: Easing) -> f64 {
	let segments = keys.len().saturating_sub(1);
	if segments == 0 {
		return keys.first().copied().unwrap_or(0.0);
	}
	let scaled = progress.clamp(0.0, 1.0) * segments as f64;
	let idx = (scaled.floor() as usize).min(segments - 1);
	let local = scaled - idx as f64;
	keys[idx] + (keys[idx + 1] - keys[idx]) * easing.apply(local)
}

/// The full particle collection for one surface size.
pub struct ParticleSystem {
	particles: Vec<Particle>,
	width: f64,
	height: f64,
	config: ParticleConfig,
	flash: Flash,
}

impl ParticleSystem {
	pub fn new(config: ParticleConfig, width: f64, height: f64, rng: &mut impl Rng) -> Self {
		let mut system = Self::from_particles(config, width, height, Vec::new());
		system.reinitialize(width, height, rng);
		system
	}

	pub fn from_particles(
		config: ParticleConfig,
		width: f64,
		height: f64,
		particles: Vec<Particle>,
	) -> Self {
		Self {
			particles,
			width,
			height,
			config,
			flash: Flash::Idle,
		}
	}

	/// Discards every particle and samples a fresh batch for the new bounds.
	pub fn reinitialize(&mut self, width: f64, height: f64, rng: &mut impl Rng) {
		let count = particle_count(width, height, self.config.area_per_particle);
		self.width = width;
		self.height = height;
		self.particles = (0..count)
			.map(|_| Particle::random(&self.config, width, height, rng))
			.collect();
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn config(&self) -> &ParticleConfig {
		&self.config
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Advances every particle by its velocity and wraps it back on-surface.
	pub fn step(&mut self) {
		let (width, height) = (self.width, self.height);
		for p in &mut self.particles {
			p.x = wrap_axis(p.x + p.speed_x, width);
			p.y = wrap_axis(p.y + p.speed_y, height);
		}
	}

	/// Every pair closer than the link distance. Quadratic in particle count.
	pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
		self.particles.iter().enumerate().flat_map(move |(i, a)| {
			self.particles[i + 1..].iter().filter_map(move |b| {
				let (dx, dy) = (a.x - b.x, a.y - b.y);
				let distance = (dx * dx + dy * dy).sqrt();
				link_alpha(distance, &self.config).map(|alpha| Link {
					from: (a.x, a.y),
					to: (b.x, b.y),
					alpha,
				})
			})
		})
	}

	/// Queues the theme-change flash; it starts on the next frame.
	pub fn request_flash(&mut self) {
		if !self.particles.is_empty() {
			self.flash = Flash::Pending;
		}
	}

	/// Opacity every particle should draw with at `now`, while a flash runs.
	pub fn flash_opacity(&mut self, now: f64) -> Option<f64> {
		let started = match self.flash {
			Flash::Idle => return None,
			Flash::Pending => {
				self.flash = Flash::Running { started: now };
				now
			}
			Flash::Running { started } => started,
		};
		let elapsed = now - started;
		if elapsed >= FLASH_MS {
			self.flash = Flash::Idle;
			return None;
		}
		Some(keyframe_value(
			&FLASH_KEYFRAMES,
			elapsed / FLASH_MS,
			Easing::InOutQuad,
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	fn system(width: f64, height: f64, seed: u64) -> ParticleSystem {
		let mut rng = SmallRng::seed_from_u64(seed);
		ParticleSystem::new(ParticleConfig::default(), width, height, &mut rng)
	}

	fn in_bounds(ps: &ParticleSystem) -> bool {
		let (w, h) = ps.size();
		ps.particles()
			.iter()
			.all(|p| (0.0..w).contains(&p.x) && (0.0..h).contains(&p.y))
	}

	#[test]
	fn count_follows_area() {
		assert_eq!(particle_count(1500.0, 1000.0, 15000.0), 100);
		assert_eq!(particle_count(1920.0, 1080.0, 15000.0), 138);
		assert_eq!(particle_count(100.0, 149.0, 15000.0), 0);
		assert_eq!(particle_count(0.0, 1000.0, 15000.0), 0);
		assert_eq!(system(1500.0, 1000.0, 1).particles().len(), 100);
	}

	#[test]
	fn sampled_attributes_stay_in_their_ranges() {
		let ps = system(1280.0, 720.0, 42);
		assert!(in_bounds(&ps));
		for p in ps.particles() {
			let (vx, vy) = p.velocity();
			assert!((-0.25..0.25).contains(&vx) && (-0.25..0.25).contains(&vy));
			assert!((0.5..2.5).contains(&p.radius()));
			assert!((0.2..0.7).contains(&p.opacity()));
		}
	}

	#[test]
	fn positions_stay_on_surface_over_many_steps() {
		let mut ps = system(640.0, 480.0, 7);
		for _ in 0..5000 {
			ps.step();
			assert!(in_bounds(&ps));
		}
	}

	#[test]
	fn step_keeps_velocity_and_radius() {
		let mut ps = system(800.0, 600.0, 3);
		let before: Vec<_> = ps
			.particles()
			.iter()
			.map(|p| (p.velocity(), p.radius(), p.opacity()))
			.collect();
		for _ in 0..100 {
			ps.step();
		}
		let after: Vec<_> = ps
			.particles()
			.iter()
			.map(|p| (p.velocity(), p.radius(), p.opacity()))
			.collect();
		assert_eq!(before, after);
	}

	#[test]
	fn wrap_is_per_axis() {
		let mut ps = ParticleSystem::from_particles(
			ParticleConfig::default(),
			100.0,
			50.0,
			vec![
				Particle::new(99.9, 25.0, 0.2, 0.0, 1.0, 0.5),
				Particle::new(0.1, 0.1, -0.2, 0.0, 1.0, 0.5),
				Particle::new(99.9, 49.9, 0.2, 0.2, 1.0, 0.5),
				Particle::new(50.0, 49.5, 0.0, 0.5, 1.0, 0.5),
			],
		);
		ps.step();
		let p = ps.particles();
		assert_eq!((p[0].x, p[0].y), (0.0, 25.0));
		assert!(p[1].x < 100.0 && p[1].x > 99.999);
		assert!((p[1].y - 0.1).abs() < 1e-12);
		assert_eq!((p[2].x, p[2].y), (0.0, 0.0));
		assert_eq!((p[3].x, p[3].y), (50.0, 0.0));
	}

	#[test]
	fn landing_exactly_on_the_far_edge_wraps() {
		assert_eq!(wrap_axis(100.0, 100.0), 0.0);
		assert_eq!(wrap_axis(0.0, 100.0), 0.0);
		assert!(wrap_axis(-0.0001, 100.0) < 100.0);
		assert_eq!(wrap_axis(12.0, 0.0), 0.0);
	}

	#[test]
	fn resize_resamples_for_new_bounds() {
		let mut rng = SmallRng::seed_from_u64(11);
		let mut ps = ParticleSystem::new(ParticleConfig::default(), 1920.0, 1080.0, &mut rng);
		assert_eq!(ps.particles().len(), 138);

		ps.reinitialize(400.0, 300.0, &mut rng);
		assert_eq!(ps.particles().len(), 8);
		assert_eq!(ps.size(), (400.0, 300.0));
		assert!(in_bounds(&ps));

		ps.reinitialize(0.0, 0.0, &mut rng);
		assert!(ps.particles().is_empty());
	}

	#[test]
	fn link_alpha_boundary() {
		let config = ParticleConfig::default();
		let near = link_alpha(99.999, &config).unwrap();
		assert!(near > 0.0 && near < 1e-5);
		assert_eq!(link_alpha(100.0, &config), None);
		assert_eq!(link_alpha(100.001, &config), None);
		assert_eq!(link_alpha(0.0, &config), Some(0.1));
		assert!((link_alpha(50.0, &config).unwrap() - 0.05).abs() < 1e-12);
	}

	#[test]
	fn links_cover_each_close_pair_once() {
		let ps = ParticleSystem::from_particles(
			ParticleConfig::default(),
			500.0,
			500.0,
			vec![
				Particle::new(0.0, 0.0, 0.0, 0.0, 1.0, 0.5),
				Particle::new(60.0, 80.0, 0.0, 0.0, 1.0, 0.5),
				Particle::new(100.0, 0.0, 0.0, 0.0, 1.0, 0.5),
				Particle::new(400.0, 400.0, 0.0, 0.0, 1.0, 0.5),
			],
		);
		let links: Vec<_> = ps.links().collect();
		// (0,1) is exactly 100 apart and (0,2) too; only (1,2) qualifies.
		assert_eq!(links.len(), 1);
		assert_eq!(links[0].from, (60.0, 80.0));
		assert_eq!(links[0].to, (100.0, 0.0));
		let d = (40.0f64 * 40.0 + 80.0 * 80.0).sqrt();
		assert!((links[0].alpha - 0.1 * (1.0 - d / 100.0)).abs() < 1e-12);
	}

	#[test]
	fn flash_runs_once_then_releases() {
		let mut ps = system(1500.0, 1000.0, 5);
		assert_eq!(ps.flash_opacity(0.0), None);

		ps.request_flash();
		assert_eq!(ps.flash_opacity(1000.0), Some(0.5));
		assert!((ps.flash_opacity(1500.0).unwrap() - 0.2).abs() < 1e-12);
		let late = ps.flash_opacity(1990.0).unwrap();
		assert!(late > 0.49 && late <= 0.5);
		assert_eq!(ps.flash_opacity(2000.0), None);
		assert_eq!(ps.flash_opacity(2100.0), None);
	}

	#[test]
	fn flash_is_skipped_for_an_empty_field() {
		let mut ps = system(10.0, 10.0, 5);
		ps.request_flash();
		assert_eq!(ps.flash_opacity(0.0), None);
	}
}

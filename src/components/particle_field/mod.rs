//! Decorative particle field drawn behind the page.
//!
//! A batch of slowly drifting points, sized to the viewport area, with faint
//! lines joining every pair closer than the link distance. The simulation is
//! platform-free ([`ParticleSystem`]); drawing goes through [`Painter`] so a
//! frame can be recorded in tests; [`ParticleCanvas`] mounts it on a canvas.
//!
//! # Example
//!
//! ```ignore
//! let theme = Rc::new(ThemeState::load(preference_store(), "theme"));
//! view! { <ParticleCanvas theme=theme config=ParticleConfig::default() /> }
//! ```

mod component;
mod field;
mod particles;
mod render;

pub use component::ParticleCanvas;
pub use field::ParticleField;
pub use particles::{Link, Particle, ParticleSystem, link_alpha, particle_count};
pub use render::{Painter, render};

//! Drifting glyph sprites with reflecting bounds.

use std::ops::Range;

use glam::Vec3;
use rand::Rng;

use super::error::Result;
use super::glyphs::CharacterGenerator;
use super::texture::{GlyphRasterizer, GlyphTexture, GlyphTextureFactory};

/// A single floating glyph sprite.
#[derive(Debug)]
pub struct Particle {
	/// World-space position inside the bounding cube.
	pub position: Vec3,
	/// Units per frame on each axis.
	pub velocity: Vec3,
	/// Sprite spin in radians per frame.
	pub angular_velocity: f32,
	/// Accumulated sprite rotation in radians.
	pub rotation: f32,
	glyph: GlyphTexture,
}

impl Particle {
	/// Texture drawn for this particle.
	pub fn glyph(&self) -> &GlyphTexture {
		&self.glyph
	}

	/// Advances one frame, reflecting off the faces of the `extent` cube.
	///
	/// The bound is checked after moving, so a particle can overshoot by at
	/// most one velocity step before it turns around.
	pub fn step(&mut self, extent: f32) {
		self.position += self.velocity;
		for axis in 0..3 {
			if self.position[axis].abs() > extent {
				self.velocity[axis] = -self.velocity[axis];
			}
		}
		self.rotation += self.angular_velocity;
	}
}

/// Fixed-size set of glyph sprites drifting inside a cube.
#[derive(Debug)]
pub struct ParticleField {
	/// Every particle, in creation order.
	pub particles: Vec<Particle>,
	extent: f32,
	/// Sprite edge length in world units.
	sprite_scale: f32,
}

impl ParticleField {
	/// Allocates `count` particles with random placement, drift and spin, each
	/// owning a freshly rendered glyph.
	#[allow(clippy::too_many_arguments)]
	pub fn initialize<R: Rng + ?Sized>(
		count: usize,
		extent: f32,
		speed: Range<f32>,
		rotation_speed: Range<f32>,
		sprite_scale: f32,
		factory: &GlyphTextureFactory,
		rasterizer: &dyn GlyphRasterizer,
		rng: &mut R,
	) -> Result<Self> {
		let characters = CharacterGenerator::default();
		let mut particles = Vec::with_capacity(count);

		for _ in 0..count {
			let glyph = factory.render(rasterizer, characters.produce(rng))?;
			particles.push(Particle {
				position: random_vec3(rng, -extent..extent),
				velocity: random_vec3(rng, speed.clone()),
				angular_velocity: sample(rng, &rotation_speed),
				rotation: 0.0,
				glyph,
			});
		}

		Ok(Self {
			particles,
			extent,
			sprite_scale,
		})
	}

	/// Half the side of the bounding cube.
	pub fn extent(&self) -> f32 {
		self.extent
	}

	/// Sprite size in world units.
	pub fn sprite_scale(&self) -> f32 {
		self.sprite_scale
	}

	/// Advances every particle by one frame.
	pub fn step(&mut self) {
		for p in &mut self.particles {
			p.step(self.extent);
		}
	}
}

/// Uniform sample that tolerates empty ranges by returning the start.
pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, range: &Range<f32>) -> f32 {
	if range.start < range.end {
		rng.gen_range(range.clone())
	} else {
		range.start
	}
}

/// Vector with each component drawn independently from `range`.
pub(crate) fn random_vec3<R: Rng + ?Sized>(rng: &mut R, range: Range<f32>) -> Vec3 {
	Vec3::new(
		sample(rng, &range),
		sample(rng, &range),
		sample(rng, &range),
	)
}

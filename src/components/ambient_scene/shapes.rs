//! Stationary wireframe solids spinning in place.

use std::ops::Range;
use std::rc::Rc;

use glam::Vec3;
use rand::Rng;

use super::geometry::{GeometryKind, GeometryLibrary, Wireframe};
use super::particles::random_vec3;

/// One wireframe solid. Its position is fixed at creation.
#[derive(Clone, Debug)]
pub struct Shape {
	position: Vec3,
	/// Radians per frame around x, y and z.
	pub rotation_rate: Vec3,
	/// Current Euler angles (XYZ order).
	pub rotation: Vec3,
	kind: GeometryKind,
	mesh: Rc<Wireframe>,
}

impl Shape {
	/// Fixed world-space position.
	pub fn position(&self) -> Vec3 {
		self.position
	}

	/// Which solid this is.
	pub fn kind(&self) -> GeometryKind {
		self.kind
	}

	/// Shared mesh for `kind`.
	pub fn mesh(&self) -> &Wireframe {
		&self.mesh
	}
}

/// Fixed-size set of spinning solids.
#[derive(Debug, Default)]
pub struct ShapeField {
	/// Every shape, in creation order.
	pub shapes: Vec<Shape>,
}

impl ShapeField {
	/// Places `count` shapes uniformly in the `extent` cube, each with a
	/// random geometry from `variants` and random per-axis spin rates.
	/// An empty variant list yields an empty field.
	pub fn initialize<R: Rng + ?Sized>(
		count: usize,
		extent: f32,
		variants: &[GeometryKind],
		rotation_speed: Range<f32>,
		rng: &mut R,
	) -> Self {
		if variants.is_empty() {
			return Self::default();
		}
		let mut library = GeometryLibrary::new(variants);
		let shapes = (0..count)
			.map(|_| {
				let kind = variants[rng.gen_range(0..variants.len())];
				Shape {
					position: random_vec3(rng, -extent..extent),
					rotation_rate: random_vec3(rng, rotation_speed.clone()),
					rotation: Vec3::ZERO,
					kind,
					mesh: library.get(kind),
				}
			})
			.collect();
		Self { shapes }
	}

	/// Spins every shape by its own rates. Positions never change.
	pub fn step(&mut self) {
		for s in &mut self.shapes {
			s.rotation += s.rotation_rate;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	const VARIANTS: [GeometryKind; 3] = [
		GeometryKind::TorusKnot,
		GeometryKind::Icosahedron,
		GeometryKind::Tube,
	];

	fn field(count: usize) -> ShapeField {
		ShapeField::initialize(
			count,
			1000.0,
			&VARIANTS,
			-0.005..0.005,
			&mut StdRng::seed_from_u64(21),
		)
	}

	#[test]
	fn initialize_places_shapes_in_the_cube() {
		let field = field(50);
		assert_eq!(field.shapes.len(), 50);
		for s in &field.shapes {
			assert!(s.position().abs().max_element() <= 1000.0);
			assert!(s.rotation_rate.abs().max_element() <= 0.005);
			assert!(VARIANTS.contains(&s.kind()));
			assert_eq!(s.rotation, Vec3::ZERO);
		}
	}

	#[test]
	fn step_rotates_but_never_moves() {
		let mut field = field(25);
		let positions: Vec<Vec3> = field.shapes.iter().map(Shape::position).collect();
		for _ in 0..1000 {
			field.step();
		}
		for (s, start) in field.shapes.iter().zip(positions) {
			assert_eq!(s.position(), start);
			let expected = s.rotation_rate * 1000.0;
			assert!((s.rotation - expected).abs().max_element() < 1e-3);
		}
	}

	#[test]
	fn shapes_of_one_kind_share_a_mesh() {
		let field = field(40);
		let knots: Vec<&Shape> = field
			.shapes
			.iter()
			.filter(|s| s.kind() == GeometryKind::TorusKnot)
			.collect();
		assert!(knots.len() > 1);
		assert!(Rc::ptr_eq(&knots[0].mesh, &knots[1].mesh));
	}

	#[test]
	fn no_variants_means_no_shapes() {
		let field = ShapeField::initialize(
			10,
			1000.0,
			&[],
			-0.005..0.005,
			&mut StdRng::seed_from_u64(1),
		);
		assert!(field.shapes.is_empty());
	}
}

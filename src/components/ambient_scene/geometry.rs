//! Wireframe meshes for the rotating solids.
//!
//! Each [`GeometryKind`] is built once into a [`Wireframe`] (vertices plus a
//! deduplicated edge list) and shared by every shape that uses it.

use std::collections::BTreeSet;
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec3;
use serde::Deserialize;

/// Available solid shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
	/// (2, 3) torus knot tube.
	TorusKnot,
	/// Regular icosahedron.
	Icosahedron,
	/// Tube swept along a three-point spline.
	Tube,
	/// Regular octahedron.
	Octahedron,
	/// Regular tetrahedron.
	Tetrahedron,
}

const POLY_RADIUS: f32 = 50.0;

const KNOT_RADIUS: f32 = 50.0;
const KNOT_TUBE: f32 = 10.0;
const KNOT_P: f32 = 2.0;
const KNOT_Q: f32 = 3.0;
const KNOT_TUBULAR_SEGMENTS: usize = 64;
const KNOT_RADIAL_SEGMENTS: usize = 8;

const TUBE_RADIUS: f32 = 10.0;
const TUBE_SEGMENTS: usize = 32;
const TUBE_RADIAL_SEGMENTS: usize = 6;
const TUBE_PATH: [Vec3; 3] = [
	Vec3::new(-100.0, -100.0, -100.0),
	Vec3::new(0.0, 100.0, 0.0),
	Vec3::new(100.0, -100.0, 100.0),
];

/// Line-segment mesh in model space.
#[derive(Clone, Debug, Default)]
pub struct Wireframe {
	/// Model-space vertex positions.
	pub vertices: Vec<Vec3>,
	/// Vertex index pairs, each undirected edge listed once.
	pub edges: Vec<[u32; 2]>,
}

impl Wireframe {
	/// Builds a wireframe from triangle faces, merging shared edges.
	fn from_faces(vertices: Vec<Vec3>, faces: &[[u32; 3]]) -> Self {
		let mut unique = BTreeSet::new();
		for &[a, b, c] in faces {
			for (x, y) in [(a, b), (b, c), (c, a)] {
				unique.insert([x.min(y), x.max(y)]);
			}
		}
		Self {
			vertices,
			edges: unique.into_iter().collect(),
		}
	}

	/// Builds a tube wireframe from cross-section rings of equal length.
	/// Rings are closed loops; consecutive rings are joined at matching
	/// positions, and the last ring joins the first when `closed`.
	fn from_rings(rings: &[Vec<Vec3>], closed: bool) -> Self {
		let radial = rings.first().map_or(0, Vec::len);
		let mut vertices = Vec::with_capacity(rings.len() * radial);
		let mut edges = Vec::new();
		let index = |ring: usize, j: usize| (ring * radial + j) as u32;

		for (r, ring) in rings.iter().enumerate() {
			vertices.extend_from_slice(ring);
			for j in 0..radial {
				edges.push([index(r, j), index(r, (j + 1) % radial)]);
			}
			let next = if r + 1 < rings.len() {
				Some(r + 1)
			} else if closed && rings.len() > 2 {
				Some(0)
			} else {
				None
			};
			if let Some(n) = next {
				for j in 0..radial {
					edges.push([index(r, j), index(n, j)]);
				}
			}
		}
		Self { vertices, edges }
	}
}

impl GeometryKind {
	/// Builds the wireframe for this shape.
	pub fn build(self) -> Wireframe {
		match self {
			GeometryKind::TorusKnot => torus_knot(),
			GeometryKind::Icosahedron => icosahedron(POLY_RADIUS),
			GeometryKind::Tube => tube(),
			GeometryKind::Octahedron => octahedron(POLY_RADIUS),
			GeometryKind::Tetrahedron => tetrahedron(POLY_RADIUS),
		}
	}
}

/// Builds each requested kind once, shared by reference count.
#[derive(Debug, Default)]
pub struct GeometryLibrary {
	entries: Vec<(GeometryKind, Rc<Wireframe>)>,
}

impl GeometryLibrary {
	/// Builds every kind in `kinds` up front.
	pub fn new(kinds: &[GeometryKind]) -> Self {
		let mut library = Self::default();
		for &kind in kinds {
			library.get(kind);
		}
		library
	}

	/// Returns the shared wireframe for `kind`, building it on first use.
	pub fn get(&mut self, kind: GeometryKind) -> Rc<Wireframe> {
		if let Some((_, mesh)) = self.entries.iter().find(|(k, _)| *k == kind) {
			return mesh.clone();
		}
		let mesh = Rc::new(kind.build());
		self.entries.push((kind, mesh.clone()));
		mesh
	}
}

fn scaled(points: &[[f32; 3]], radius: f32) -> Vec<Vec3> {
	points
		.iter()
		.map(|&p| Vec3::from_array(p).normalize() * radius)
		.collect()
}

fn tetrahedron(radius: f32) -> Wireframe {
	let vertices = scaled(
		&[
			[1.0, 1.0, 1.0],
			[-1.0, -1.0, 1.0],
			[-1.0, 1.0, -1.0],
			[1.0, -1.0, -1.0],
		],
		radius,
	);
	Wireframe::from_faces(vertices, &[[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]])
}

fn octahedron(radius: f32) -> Wireframe {
	let vertices = scaled(
		&[
			[1.0, 0.0, 0.0],
			[-1.0, 0.0, 0.0],
			[0.0, 1.0, 0.0],
			[0.0, -1.0, 0.0],
			[0.0, 0.0, 1.0],
			[0.0, 0.0, -1.0],
		],
		radius,
	);
	Wireframe::from_faces(
		vertices,
		&[
			[0, 2, 4],
			[0, 4, 3],
			[0, 3, 5],
			[0, 5, 2],
			[1, 2, 5],
			[1, 5, 3],
			[1, 3, 4],
			[1, 4, 2],
		],
	)
}

fn icosahedron(radius: f32) -> Wireframe {
	let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
	let vertices = scaled(
		&[
			[-1.0, t, 0.0],
			[1.0, t, 0.0],
			[-1.0, -t, 0.0],
			[1.0, -t, 0.0],
			[0.0, -1.0, t],
			[0.0, 1.0, t],
			[0.0, -1.0, -t],
			[0.0, 1.0, -t],
			[t, 0.0, -1.0],
			[t, 0.0, 1.0],
			[-t, 0.0, -1.0],
			[-t, 0.0, 1.0],
		],
		radius,
	);
	Wireframe::from_faces(
		vertices,
		&[
			[0, 11, 5],
			[0, 5, 1],
			[0, 1, 7],
			[0, 7, 10],
			[0, 10, 11],
			[1, 5, 9],
			[5, 11, 4],
			[11, 10, 2],
			[10, 7, 6],
			[7, 1, 8],
			[3, 9, 4],
			[3, 4, 2],
			[3, 2, 6],
			[3, 6, 8],
			[3, 8, 9],
			[4, 9, 5],
			[2, 4, 11],
			[6, 2, 10],
			[8, 6, 7],
			[9, 8, 1],
		],
	)
}

/// Point on the knot's center line at parameter `u`.
fn knot_point(u: f32) -> Vec3 {
	let qu = KNOT_Q / KNOT_P * u;
	let cs = qu.cos();
	Vec3::new(
		KNOT_RADIUS * (2.0 + cs) * 0.5 * u.cos(),
		KNOT_RADIUS * (2.0 + cs) * 0.5 * u.sin(),
		KNOT_RADIUS * qu.sin() * 0.5,
	)
}

/// Circle of `segments` points around `center` in the plane spanned by `n` and `b`.
fn ring(center: Vec3, n: Vec3, b: Vec3, radius: f32, segments: usize) -> Vec<Vec3> {
	(0..segments)
		.map(|j| {
			let v = j as f32 / segments as f32 * TAU;
			center + n * (-radius * v.cos()) + b * (radius * v.sin())
		})
		.collect()
}

fn torus_knot() -> Wireframe {
	let rings: Vec<Vec<Vec3>> = (0..KNOT_TUBULAR_SEGMENTS)
		.map(|i| {
			let u = i as f32 / KNOT_TUBULAR_SEGMENTS as f32 * KNOT_P * TAU;
			let p1 = knot_point(u);
			let p2 = knot_point(u + 0.01);
			let t = p2 - p1;
			let b = t.cross(p2 + p1).normalize();
			let n = b.cross(t).normalize();
			ring(p1, n, b, KNOT_TUBE, KNOT_RADIAL_SEGMENTS)
		})
		.collect();
	Wireframe::from_rings(&rings, true)
}

/// Centripetal Catmull-Rom spline through `points`, with mirrored end
/// tangents. `t` runs from 0 at the first point to 1 at the last.
fn catmull_rom(points: &[Vec3], t: f32) -> Vec3 {
	let segments = points.len() - 1;
	let scaled = t.clamp(0.0, 1.0) * segments as f32;
	let i = (scaled.floor() as usize).min(segments - 1);
	let local = scaled - i as f32;

	let p1 = points[i];
	let p2 = points[i + 1];
	let p0 = if i > 0 { points[i - 1] } else { p1 * 2.0 - p2 };
	let p3 = if i + 2 < points.len() {
		points[i + 2]
	} else {
		p2 * 2.0 - p1
	};

	let mut dt0 = p0.distance_squared(p1).powf(0.25);
	let mut dt1 = p1.distance_squared(p2).powf(0.25);
	let mut dt2 = p2.distance_squared(p3).powf(0.25);
	if dt1 < 1e-4 {
		dt1 = 1.0;
	}
	if dt0 < 1e-4 {
		dt0 = dt1;
	}
	if dt2 < 1e-4 {
		dt2 = dt1;
	}

	let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
	let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

	let c2 = p1 * -3.0 + p2 * 3.0 - t1 * 2.0 - t2;
	let c3 = p1 * 2.0 - p2 * 2.0 + t1 + t2;
	p1 + t1 * local + c2 * (local * local) + c3 * (local * local * local)
}

fn tube() -> Wireframe {
	let samples: Vec<Vec3> = (0..=TUBE_SEGMENTS)
		.map(|i| catmull_rom(&TUBE_PATH, i as f32 / TUBE_SEGMENTS as f32))
		.collect();

	// Rotation-minimizing frames: carry the normal along the path.
	let tangent = |i: usize| {
		let a = samples[i.saturating_sub(1)];
		let b = samples[(i + 1).min(TUBE_SEGMENTS)];
		(b - a).normalize()
	};
	let first = tangent(0);
	let seed = if first.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
	let mut normal = first.cross(seed).normalize();

	let rings: Vec<Vec<Vec3>> = samples
		.iter()
		.enumerate()
		.map(|(i, &center)| {
			let t = tangent(i);
			let binormal = t.cross(normal).normalize();
			normal = binormal.cross(t).normalize();
			ring(center, normal, binormal, TUBE_RADIUS, TUBE_RADIAL_SEGMENTS)
		})
		.collect();
	Wireframe::from_rings(&rings, false)
}

#[cfg(test)]
mod tests {
	use super::*;

	const ALL: [GeometryKind; 5] = [
		GeometryKind::TorusKnot,
		GeometryKind::Icosahedron,
		GeometryKind::Tube,
		GeometryKind::Octahedron,
		GeometryKind::Tetrahedron,
	];

	#[test]
	fn edges_reference_valid_vertices() {
		for kind in ALL {
			let mesh = kind.build();
			assert!(!mesh.edges.is_empty(), "{kind:?}");
			for &[a, b] in &mesh.edges {
				assert_ne!(a, b, "{kind:?} has a degenerate edge");
				assert!((a as usize) < mesh.vertices.len());
				assert!((b as usize) < mesh.vertices.len());
			}
			assert!(mesh.vertices.iter().all(|v| v.is_finite()), "{kind:?}");
		}
	}

	#[test]
	fn polyhedra_have_expected_counts() {
		let cases = [
			(GeometryKind::Tetrahedron, 4, 6),
			(GeometryKind::Octahedron, 6, 12),
			(GeometryKind::Icosahedron, 12, 30),
		];
		for (kind, vertices, edges) in cases {
			let mesh = kind.build();
			assert_eq!(mesh.vertices.len(), vertices, "{kind:?}");
			assert_eq!(mesh.edges.len(), edges, "{kind:?}");
			for v in &mesh.vertices {
				assert!((v.length() - POLY_RADIUS).abs() < 1e-3);
			}
		}
	}

	#[test]
	fn tubes_are_ring_grids() {
		let knot = GeometryKind::TorusKnot.build();
		assert_eq!(
			knot.vertices.len(),
			KNOT_TUBULAR_SEGMENTS * KNOT_RADIAL_SEGMENTS
		);
		// Closed: each ring has its circumference plus links to the next ring.
		assert_eq!(knot.edges.len(), 2 * knot.vertices.len());

		let tube = GeometryKind::Tube.build();
		assert_eq!(
			tube.vertices.len(),
			(TUBE_SEGMENTS + 1) * TUBE_RADIAL_SEGMENTS
		);
	}

	#[test]
	fn spline_passes_through_control_points() {
		assert!(catmull_rom(&TUBE_PATH, 0.0).distance(TUBE_PATH[0]) < 1e-3);
		assert!(catmull_rom(&TUBE_PATH, 0.5).distance(TUBE_PATH[1]) < 1e-3);
		assert!(catmull_rom(&TUBE_PATH, 1.0).distance(TUBE_PATH[2]) < 1e-3);
	}

	#[test]
	fn library_shares_meshes() {
		let mut library = GeometryLibrary::new(&[GeometryKind::Icosahedron]);
		let a = library.get(GeometryKind::Icosahedron);
		let b = library.get(GeometryKind::Icosahedron);
		assert!(Rc::ptr_eq(&a, &b));
	}
}

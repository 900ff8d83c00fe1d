//! Camera, lights and pointer-driven parallax.
//!
//! The composer owns everything about *how* the scene is viewed. Each frame it
//! nudges either the scene group's orientation or the camera position toward
//! a pointer-derived target with exponential smoothing:
//!
//! `value += (target - value) * smoothing`
//!
//! which eases out as the gap closes and never overshoots for smoothing in
//! (0, 1].

use glam::{EulerRot, Mat4, Vec2, Vec3, Vec4};

use super::config::{CameraSettings, ParallaxMode};
use super::theme::{FogStyle, LightStyle, Theme};

/// A point projected to the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	/// Canvas pixel coordinates, origin top-left.
	pub x: f64,
	/// Canvas pixel y, origin top-left.
	pub y: f64,
	/// Distance in front of the camera, world units.
	pub depth: f64,
	/// Screen pixels per world unit at this depth.
	pub scale: f64,
}

/// Perspective camera looking at the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
	/// World-space eye position.
	pub position: Vec3,
	/// Vertical field of view in radians.
	pub fov: f32,
	/// Viewport width over height.
	pub aspect: f32,
	/// Near clip distance.
	pub near: f32,
	/// Far clip distance.
	pub far: f32,
	/// Canvas size in pixels.
	pub viewport: Vec2,
	view_projection: Mat4,
}

impl Camera {
	/// Camera at `settings.distance` on +z, sized to `viewport`.
	pub fn new(settings: &CameraSettings, viewport: Vec2) -> Self {
		let mut camera = Self {
			position: Vec3::new(0.0, 0.0, settings.distance),
			fov: settings.fov_degrees.to_radians(),
			aspect: 1.0,
			near: settings.near,
			far: settings.far,
			viewport: Vec2::ONE,
			view_projection: Mat4::IDENTITY,
		};
		camera.set_viewport(viewport.x, viewport.y);
		camera
	}

	/// World to view transform.
	pub fn view_matrix(&self) -> Mat4 {
		Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
	}

	/// OpenGL-style perspective projection.
	pub fn projection_matrix(&self) -> Mat4 {
		Mat4::perspective_rh_gl(self.fov, self.aspect, self.near, self.far)
	}

	/// Cached projection times view.
	pub fn view_projection(&self) -> Mat4 {
		self.view_projection
	}

	/// Recomputes the cached view-projection after the position or aspect
	/// changed.
	pub fn update_matrices(&mut self) {
		self.view_projection = self.projection_matrix() * self.view_matrix();
	}

	/// Sets the canvas size. Degenerate sizes are ignored.
	pub fn set_viewport(&mut self, width: f32, height: f32) {
		if !(width > 0.0 && height > 0.0) {
			return;
		}
		self.viewport = Vec2::new(width, height);
		self.aspect = width / height;
		self.update_matrices();
	}

	/// Projects a world-space point, or `None` if it lies outside the
	/// near/far range.
	pub fn project(&self, world: Vec3) -> Option<Projected> {
		let clip = self.view_projection * Vec4::new(world.x, world.y, world.z, 1.0);
		// For a perspective matrix w is the distance in front of the camera.
		let depth = clip.w;
		if depth < self.near || depth > self.far {
			return None;
		}
		let ndc = clip.truncate() / depth;
		let (w, h) = (self.viewport.x as f64, self.viewport.y as f64);
		let focal = h / 2.0 / (self.fov as f64 / 2.0).tan();
		Some(Projected {
			x: (ndc.x as f64 * 0.5 + 0.5) * w,
			y: (0.5 - ndc.y as f64 * 0.5) * h,
			depth: depth as f64,
			scale: focal / depth as f64,
		})
	}
}

/// Optional container rotating every particle and shape together.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneGroup {
	/// x = pitch, y = yaw, radians.
	pub rotation: Vec2,
}

impl SceneGroup {
	/// Rotation matrix for the current orientation.
	pub fn matrix(&self) -> Mat4 {
		Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
	}
}

/// Scene lighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lights {
	/// Uniform light on every surface.
	pub ambient: LightStyle,
	/// Light arriving from `direction`.
	pub directional: LightStyle,
	/// Unit vector pointing toward the directional light.
	pub direction: Vec3,
}

/// Owns the view: camera, lights, fog and the optional group.
#[derive(Clone, Debug)]
pub struct SceneComposer {
	/// Perspective camera looking at the origin.
	pub camera: Camera,
	/// Ambient and directional light.
	pub lights: Lights,
	/// Distance fog.
	pub fog: FogStyle,
	/// Present only in container parallax mode.
	pub group: Option<SceneGroup>,
	parallax: ParallaxMode,
}

impl SceneComposer {
	/// Builds the view for a viewport in CSS pixels.
	pub fn new(camera: &CameraSettings, theme: &Theme, parallax: ParallaxMode, viewport: Vec2) -> Self {
		let group = match parallax {
			ParallaxMode::Container { .. } => Some(SceneGroup::default()),
			ParallaxMode::Camera { .. } => None,
		};
		Self {
			camera: Camera::new(camera, viewport),
			lights: Lights {
				ambient: theme.ambient_light,
				directional: theme.directional_light,
				direction: Vec3::ONE.normalize(),
			},
			fog: theme.fog,
			group,
			parallax,
		}
	}

	/// Parallax mode chosen at setup.
	pub fn parallax(&self) -> ParallaxMode {
		self.parallax
	}

	/// Model matrix applied to everything inside the group.
	pub fn group_matrix(&self) -> Mat4 {
		self.group.map_or(Mat4::IDENTITY, |g| g.matrix())
	}

	/// Advances orientation or camera drift by one frame for the given
	/// pointer reading.
	pub fn step(&mut self, pointer: Vec2) {
		match (self.parallax, self.group.as_mut()) {
			(
				ParallaxMode::Container {
					spin,
					pointer_scale,
					smoothing,
				},
				Some(group),
			) => {
				group.rotation += spin;
				// Horizontal pointer motion turns the group about y, vertical about x.
				let target = Vec2::new(pointer.y, pointer.x) * pointer_scale;
				group.rotation += (target - group.rotation) * smoothing;
			}
			(
				ParallaxMode::Camera {
					pointer_scale,
					smoothing,
				},
				_,
			) => {
				let target = Vec2::new(pointer.x, -pointer.y) * pointer_scale;
				let current = self.camera.position.truncate();
				let next = current + (target - current) * smoothing;
				self.camera.position.x = next.x;
				self.camera.position.y = next.y;
				self.camera.update_matrices();
			}
			(ParallaxMode::Container { .. }, None) => {}
		}
	}

	/// Updates aspect ratio and projection for a new canvas size.
	pub fn resize(&mut self, width: f32, height: f32) {
		self.camera.set_viewport(width, height);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ambient_scene::config::{DeviceProfile, SceneConfig};

	fn composer(parallax: ParallaxMode) -> SceneComposer {
		let config = SceneConfig::for_profile(DeviceProfile::Full);
		SceneComposer::new(&config.camera, &config.theme, parallax, Vec2::new(1600.0, 900.0))
	}

	fn still_container() -> ParallaxMode {
		ParallaxMode::Container {
			spin: Vec2::ZERO,
			pointer_scale: 0.05,
			smoothing: 0.05,
		}
	}

	#[test]
	fn smoothing_closes_five_percent_of_the_gap() {
		let mut composer = composer(still_container());
		composer.step(Vec2::new(1.0, 0.0));
		let rotation = composer.group.unwrap().rotation;
		assert!((rotation.y - 0.0025).abs() < 1e-7, "got {}", rotation.y);
		assert_eq!(rotation.x, 0.0);
	}

	#[test]
	fn smoothing_converges_without_overshoot() {
		let mut composer = composer(still_container());
		let mut last = 0.0;
		for _ in 0..500 {
			composer.step(Vec2::new(0.0, -1.0));
			let x = composer.group.unwrap().rotation.x;
			assert!(x <= last && x >= -0.05);
			last = x;
		}
		assert!((last + 0.05).abs() < 1e-4);
	}

	#[test]
	fn container_spins_without_input() {
		let mut composer = composer(ParallaxMode::Container {
			spin: Vec2::new(0.002, 0.0025),
			pointer_scale: 0.05,
			smoothing: 0.05,
		});
		composer.step(Vec2::ZERO);
		let r = composer.group.unwrap().rotation;
		// Spin is applied, then pulled 5% back toward the resting target.
		assert!((r.x - 0.002 * 0.95).abs() < 1e-7);
		assert!((r.y - 0.0025 * 0.95).abs() < 1e-7);
	}

	#[test]
	fn camera_mode_drifts_camera_and_keeps_looking_at_origin() {
		let mut composer = composer(ParallaxMode::Camera {
			pointer_scale: 200.0,
			smoothing: 0.05,
		});
		assert!(composer.group.is_none());
		composer.step(Vec2::new(1.0, 1.0));
		assert!((composer.camera.position.x - 10.0).abs() < 1e-4);
		assert!((composer.camera.position.y + 10.0).abs() < 1e-4);
		assert_eq!(composer.camera.position.z, 1000.0);

		let center = composer.camera.project(Vec3::ZERO).unwrap();
		assert!((center.x - 800.0).abs() < 1e-3);
		assert!((center.y - 450.0).abs() < 1e-3);
	}

	#[test]
	fn origin_projects_to_screen_center() {
		let composer = composer(still_container());
		let p = composer.camera.project(Vec3::ZERO).unwrap();
		assert!((p.x - 800.0).abs() < 1e-3);
		assert!((p.y - 450.0).abs() < 1e-3);
		assert!((p.depth - 1000.0).abs() < 1e-2);
	}

	#[test]
	fn projection_orients_axes_like_the_screen() {
		let composer = composer(still_container());
		let right = composer.camera.project(Vec3::new(100.0, 0.0, 0.0)).unwrap();
		let up = composer.camera.project(Vec3::new(0.0, 100.0, 0.0)).unwrap();
		assert!(right.x > 800.0);
		assert!(up.y < 450.0);
		// Nearer points appear larger.
		let near = composer.camera.project(Vec3::new(0.0, 0.0, 500.0)).unwrap();
		assert!(near.scale > right.scale);
	}

	#[test]
	fn points_behind_the_camera_are_culled() {
		let composer = composer(still_container());
		assert!(composer.camera.project(Vec3::new(0.0, 0.0, 1500.0)).is_none());
		assert!(composer.camera.project(Vec3::new(0.0, 0.0, -4500.0)).is_none());
	}

	#[test]
	fn resize_is_idempotent() {
		let mut composer = composer(still_container());
		composer.resize(1280.0, 720.0);
		let first = composer.camera.clone();
		composer.resize(1280.0, 720.0);
		assert_eq!(composer.camera, first);
		assert!((composer.camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
	}

	#[test]
	fn zero_height_resize_is_ignored() {
		let mut composer = composer(still_container());
		let before = composer.camera.clone();
		composer.resize(1280.0, 0.0);
		assert_eq!(composer.camera, before);
	}
}

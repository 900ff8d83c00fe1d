//! Device profiles and the immutable scene configuration.
//!
//! Device-class branching happens exactly once: a [`DeviceProfile`] is
//! detected from the user agent, optionally adjusted by page overrides, and
//! resolved into a [`SceneConfig`] that every component receives at
//! initialization. Nothing is re-evaluated per frame.
//!
//! # Overrides
//!
//! A page may embed a JSON object in `<script id="scene-config">`:
//!
//! ```json
//! { "profile": "constrained", "seed": 7, "normalization": "pixels",
//!   "parallax": "camera", "particles": 300, "shapes": 20, "theme": "mono",
//!   "geometry": ["octahedron", "tube"] }
//! ```
//!
//! Every field is optional.

use std::ops::Range;

use glam::Vec2;
use serde::Deserialize;

use super::error::{Result, SceneError};
use super::geometry::GeometryKind;
use super::theme::Theme;

/// Coarse client capability class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceProfile {
	/// Phones and other small, slow devices.
	Constrained,
	/// Desktop-class clients.
	#[default]
	Full,
}

impl DeviceProfile {
	/// Classifies a user agent string. Anything mentioning a mobile platform
	/// is constrained.
	pub fn detect(user_agent: &str) -> Self {
		let ua = user_agent.to_ascii_lowercase();
		if ["mobi", "android", "iphone"].iter().any(|needle| ua.contains(needle)) {
			DeviceProfile::Constrained
		} else {
			DeviceProfile::Full
		}
	}

	/// Parses a profile name from configuration.
	pub fn from_name(name: &str) -> Result<Self> {
		match name.to_ascii_lowercase().as_str() {
			"constrained" | "mobile" => Ok(DeviceProfile::Constrained),
			"full" | "desktop" => Ok(DeviceProfile::Full),
			other => Err(SceneError::Configuration(format!(
				"unknown device profile {other:?}"
			))),
		}
	}
}

/// How pointer offsets from the viewport center are scaled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
	/// Divide by half the viewport dimension, yielding roughly [-1, 1].
	#[default]
	Normalized,
	/// Raw pixel offset; the parallax scale must compensate.
	Pixels,
}

/// What the pointer moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParallaxMode {
	/// Everything lives in one group that spins slowly and tilts toward the
	/// pointer.
	Container {
		/// Constant per-frame spin (x = pitch, y = yaw), radians.
		spin: Vec2,
		/// Pointer to target-orientation factor.
		pointer_scale: f32,
		/// Fraction of the remaining gap closed each frame.
		smoothing: f32,
	},
	/// No group; the camera drifts toward a pointer-derived offset while
	/// looking at the origin.
	Camera {
		/// Pointer to camera-offset factor, world units.
		pointer_scale: f32,
		/// Fraction of the remaining gap closed each frame.
		smoothing: f32,
	},
}

impl ParallaxMode {
	/// The override name for this mode.
	pub fn kind(&self) -> ParallaxKind {
		match self {
			ParallaxMode::Container { .. } => ParallaxKind::Container,
			ParallaxMode::Camera { .. } => ParallaxKind::Camera,
		}
	}
}

/// Particle field sizing.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSettings {
	/// Number of glyph sprites.
	pub count: usize,
	/// Half the side of the bounding cube.
	pub extent: f32,
	/// Per-axis velocity range, units per frame.
	pub speed: Range<f32>,
	/// Sprite spin range, radians per frame.
	pub rotation_speed: Range<f32>,
	/// Side of each glyph texture in pixels.
	pub texture_size: u32,
	/// Glow blur radius in pixels.
	pub glow_blur: f64,
	/// Sprite size in world units.
	pub sprite_scale: f32,
}

/// Shape field sizing.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSettings {
	/// Number of solids.
	pub count: usize,
	/// Half the side of the bounding cube.
	pub extent: f32,
	/// Kinds drawn from uniformly; empty means no solids.
	pub variants: Vec<GeometryKind>,
	/// Per-axis rotation range, radians per frame.
	pub rotation_speed: Range<f32>,
}

/// Camera placement and projection.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraSettings {
	/// Vertical field of view in degrees.
	pub fov_degrees: f32,
	/// Near clip distance.
	pub near: f32,
	/// Far clip distance.
	pub far: f32,
	/// Distance from the origin along +z.
	pub distance: f32,
}

/// Everything a scene needs, resolved once from the device profile.
#[derive(Clone, Debug)]
pub struct SceneConfig {
	/// Device class the budgets were chosen for.
	pub profile: DeviceProfile,
	/// Fixed RNG seed; `None` lets the host pick one.
	pub seed: Option<u64>,
	/// How pointer offsets are scaled.
	pub normalization: Normalization,
	/// What the pointer moves, with constants matching `normalization`.
	pub parallax: ParallaxMode,
	/// Glyph sprite field.
	pub particles: ParticleSettings,
	/// Wireframe solids.
	pub shapes: ShapeSettings,
	/// Camera placement and projection.
	pub camera: CameraSettings,
	/// Colors, lights and fog.
	pub theme: Theme,
}

impl SceneConfig {
	/// Settings for a device profile.
	pub fn for_profile(profile: DeviceProfile) -> Self {
		let constrained = profile == DeviceProfile::Constrained;
		Self {
			profile,
			seed: None,
			normalization: Normalization::Normalized,
			parallax: ParallaxKind::Container.resolve(Normalization::Normalized),
			particles: ParticleSettings {
				count: if constrained { 500 } else { 1000 },
				extent: 1000.0,
				speed: -0.25..0.25,
				rotation_speed: -0.005..0.005,
				texture_size: if constrained { 128 } else { 256 },
				glow_blur: if constrained { 20.0 } else { 25.0 },
				sprite_scale: 50.0,
			},
			shapes: ShapeSettings {
				count: if constrained { 25 } else { 50 },
				extent: 1000.0,
				variants: vec![
					GeometryKind::TorusKnot,
					GeometryKind::Icosahedron,
					GeometryKind::Tube,
				],
				rotation_speed: -0.005..0.005,
			},
			camera: CameraSettings {
				fov_degrees: 75.0,
				near: 1.0,
				far: 5000.0,
				distance: if constrained { 800.0 } else { 1000.0 },
			},
			theme: Theme::default(),
		}
	}

	/// Detects the profile from a user agent and applies optional overrides.
	///
	/// Invalid overrides are reported alongside a usable configuration so the
	/// host can log them and carry on.
	pub fn resolve(user_agent: &str, overrides: Option<&SceneOverrides>) -> (Self, Vec<SceneError>) {
		let mut errors = Vec::new();
		let detected = DeviceProfile::detect(user_agent);
		let profile = match overrides.and_then(|o| o.profile.as_deref()) {
			Some(name) => DeviceProfile::from_name(name).unwrap_or_else(|err| {
				errors.push(err);
				DeviceProfile::Full
			}),
			None => detected,
		};

		let mut config = Self::for_profile(profile);
		if let Some(o) = overrides {
			config.apply(o, &mut errors);
		}
		(config, errors)
	}

	/// Applies every override field except `profile`. Each field is checked on
	/// its own; a rejected field keeps its profile value and is reported.
	fn apply(&mut self, overrides: &SceneOverrides, errors: &mut Vec<SceneError>) {
		self.seed = overrides.seed.or(self.seed);
		if let Some(count) = overrides.particles {
			self.particles.count = count;
		}
		if let Some(count) = overrides.shapes {
			self.shapes.count = count;
		}
		match overrides.geometry.as_deref() {
			Some([]) => errors.push(SceneError::Configuration(
				"geometry list is empty; keeping the default solids".into(),
			)),
			Some(kinds) => self.shapes.variants = kinds.to_vec(),
			None => {}
		}
		if let Some(normalization) = overrides.normalization {
			self.normalization = normalization;
		}
		// Parallax constants always follow the normalization in use.
		let kind = overrides.parallax.unwrap_or(self.parallax.kind());
		self.parallax = kind.resolve(self.normalization);

		if let Some(distance) = overrides.camera_distance {
			if distance > self.camera.near && distance < self.camera.far {
				self.camera.distance = distance;
			} else {
				errors.push(SceneError::Configuration(format!(
					"camera distance {distance} outside ({}, {})",
					self.camera.near, self.camera.far
				)));
			}
		}
		if let Some(name) = overrides.theme.as_deref() {
			match Theme::by_name(name) {
				Some(theme) => self.theme = theme,
				None => errors.push(SceneError::Configuration(format!("unknown theme {name:?}"))),
			}
		}
	}
}

impl Default for SceneConfig {
	fn default() -> Self {
		Self::for_profile(DeviceProfile::Full)
	}
}

/// Parallax mode names accepted in overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParallaxKind {
	/// Tilt a group holding the whole scene.
	Container,
	/// Drift the camera.
	Camera,
}

impl ParallaxKind {
	/// Picks the constants that suit the pointer normalization in use.
	fn resolve(self, normalization: Normalization) -> ParallaxMode {
		match (self, normalization) {
			(ParallaxKind::Container, Normalization::Normalized) => ParallaxMode::Container {
				spin: Vec2::new(0.002, 0.0025),
				pointer_scale: 0.05,
				smoothing: 0.05,
			},
			// Raw pixels are hundreds of times larger than normalized offsets.
			(ParallaxKind::Container, Normalization::Pixels) => ParallaxMode::Container {
				spin: Vec2::new(0.0005, 0.0005),
				pointer_scale: 0.0001,
				smoothing: 0.05,
			},
			(ParallaxKind::Camera, Normalization::Normalized) => ParallaxMode::Camera {
				pointer_scale: 200.0,
				smoothing: 0.05,
			},
			(ParallaxKind::Camera, Normalization::Pixels) => ParallaxMode::Camera {
				pointer_scale: 0.5,
				smoothing: 0.1,
			},
		}
	}
}

/// Optional page-supplied adjustments, read from JSON.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SceneOverrides {
	/// `"constrained"`/`"mobile"` or `"full"`/`"desktop"`.
	pub profile: Option<String>,
	/// Fixed RNG seed.
	pub seed: Option<u64>,
	/// Pointer normalization mode.
	pub normalization: Option<Normalization>,
	/// Parallax mode; its constants follow the normalization.
	pub parallax: Option<ParallaxKind>,
	/// Glyph sprite count.
	pub particles: Option<usize>,
	/// Solid count.
	pub shapes: Option<usize>,
	/// Solid kinds to draw from, e.g. `["icosahedron", "torus_knot"]`.
	pub geometry: Option<Vec<GeometryKind>>,
	/// Camera distance; must lie strictly between near and far.
	pub camera_distance: Option<f32>,
	/// Theme name, `"neon"` or `"mono"`.
	pub theme: Option<String>,
}

impl SceneOverrides {
	/// Parses overrides from JSON text.
	pub fn from_json(text: &str) -> Result<Self> {
		serde_json::from_str(text)
			.map_err(|e| SceneError::Configuration(format!("malformed scene overrides: {e}")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
	const ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36";
	const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";

	#[test]
	fn detects_mobile_user_agents() {
		assert_eq!(DeviceProfile::detect(IPHONE), DeviceProfile::Constrained);
		assert_eq!(DeviceProfile::detect(ANDROID), DeviceProfile::Constrained);
		assert_eq!(DeviceProfile::detect(DESKTOP), DeviceProfile::Full);
		assert_eq!(DeviceProfile::detect(""), DeviceProfile::Full);
	}

	#[test]
	fn profiles_differ_in_budget() {
		let small = SceneConfig::for_profile(DeviceProfile::Constrained);
		let full = SceneConfig::for_profile(DeviceProfile::Full);
		assert_eq!(small.particles.count, 500);
		assert_eq!(full.particles.count, 1000);
		assert_eq!(small.shapes.count, 25);
		assert_eq!(full.shapes.count, 50);
		assert_eq!(small.particles.texture_size, 128);
		assert_eq!(full.particles.texture_size, 256);
		assert!(small.camera.distance < full.camera.distance);
		assert!(small.particles.glow_blur < full.particles.glow_blur);
	}

	#[test]
	fn unknown_profile_falls_back_to_full() {
		let overrides = SceneOverrides {
			profile: Some("tablet".into()),
			..Default::default()
		};
		let (config, errors) = SceneConfig::resolve(IPHONE, Some(&overrides));
		assert_eq!(config.profile, DeviceProfile::Full);
		assert_eq!(errors.len(), 1);
		assert!(matches!(errors[0], SceneError::Configuration(_)));
	}

	#[test]
	fn overrides_parse_and_apply() {
		let overrides = SceneOverrides::from_json(
			r#"{"profile":"constrained","seed":7,"normalization":"pixels","parallax":"camera","particles":12}"#,
		)
		.unwrap();
		let (config, errors) = SceneConfig::resolve(DESKTOP, Some(&overrides));
		assert!(errors.is_empty());
		assert_eq!(config.profile, DeviceProfile::Constrained);
		assert_eq!(config.seed, Some(7));
		assert_eq!(config.particles.count, 12);
		assert_eq!(config.normalization, Normalization::Pixels);
		assert!(matches!(config.parallax, ParallaxMode::Camera { .. }));
	}

	#[test]
	fn malformed_overrides_are_configuration_errors() {
		let err = SceneOverrides::from_json("{ not json").unwrap_err();
		assert!(matches!(err, SceneError::Configuration(_)));
	}

	#[test]
	fn bad_override_values_are_reported() {
		let overrides = SceneOverrides {
			camera_distance: Some(-5.0),
			..Default::default()
		};
		let (config, errors) = SceneConfig::resolve(DESKTOP, Some(&overrides));
		assert_eq!(errors.len(), 1);
		assert_eq!(config.camera.distance, 1000.0);
	}

	#[test]
	fn one_bad_field_does_not_block_the_rest() {
		let overrides = SceneOverrides::from_json(
			r#"{"camera_distance":-5,"theme":"bogus","particles":7,"shapes":3}"#,
		)
		.unwrap();
		let (config, errors) = SceneConfig::resolve(DESKTOP, Some(&overrides));
		assert_eq!(errors.len(), 2);
		assert!(errors.iter().all(|e| matches!(e, SceneError::Configuration(_))));
		assert_eq!(config.particles.count, 7);
		assert_eq!(config.shapes.count, 3);

		let overrides =
			SceneOverrides::from_json(r#"{"camera_distance":-5,"theme":"mono"}"#).unwrap();
		let (config, errors) = SceneConfig::resolve(DESKTOP, Some(&overrides));
		assert_eq!(errors.len(), 1);
		assert_eq!(config.theme.name, "mono");
		assert_eq!(config.camera.distance, 1000.0);
	}

	#[test]
	fn pixel_normalization_alone_switches_parallax_constants() {
		let overrides = SceneOverrides::from_json(r#"{"normalization":"pixels"}"#).unwrap();
		let (config, errors) = SceneConfig::resolve(DESKTOP, Some(&overrides));
		assert!(errors.is_empty());
		assert_eq!(config.normalization, Normalization::Pixels);
		assert_eq!(
			config.parallax,
			ParallaxKind::Container.resolve(Normalization::Pixels)
		);

		let overrides =
			SceneOverrides::from_json(r#"{"normalization":"pixels","parallax":"camera"}"#).unwrap();
		let (config, _) = SceneConfig::resolve(DESKTOP, Some(&overrides));
		assert_eq!(
			config.parallax,
			ParallaxKind::Camera.resolve(Normalization::Pixels)
		);
	}

	#[test]
	fn pixel_parallax_stays_gentle_at_the_viewport_edge() {
		use crate::components::ambient_scene::composer::SceneComposer;

		let overrides = SceneOverrides::from_json(r#"{"normalization":"pixels"}"#).unwrap();
		let (config, _) = SceneConfig::resolve(DESKTOP, Some(&overrides));
		let mut composer = SceneComposer::new(
			&config.camera,
			&config.theme,
			config.parallax,
			Vec2::new(1600.0, 1200.0),
		);
		for _ in 0..200 {
			composer.step(Vec2::new(800.0, 0.0));
		}
		let yaw = composer.group.unwrap().rotation.y;
		assert!(yaw.abs() < 1.0, "yaw {yaw} rad");
	}

	#[test]
	fn empty_geometry_list_is_reported() {
		let overrides = SceneOverrides::from_json(r#"{"geometry":[]}"#).unwrap();
		let (config, errors) = SceneConfig::resolve(DESKTOP, Some(&overrides));
		assert_eq!(errors.len(), 1);
		assert!(matches!(errors[0], SceneError::Configuration(_)));
		assert_eq!(config.shapes.variants, SceneConfig::default().shapes.variants);
	}

	#[test]
	fn geometry_override_replaces_variants() {
		let overrides =
			SceneOverrides::from_json(r#"{"geometry":["octahedron","torus_knot"]}"#).unwrap();
		let (config, errors) = SceneConfig::resolve(DESKTOP, Some(&overrides));
		assert!(errors.is_empty());
		assert_eq!(
			config.shapes.variants,
			vec![GeometryKind::Octahedron, GeometryKind::TorusKnot]
		);
	}
}

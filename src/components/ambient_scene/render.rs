//! Canvas rendering for the ambient scene.
//!
//! Projection happens in software through the composer's camera; the 2D
//! context only ever sees screen-space lines and images. Drawing uses two
//! passes:
//! 1. Wireframe solids, normal blending, faded by fog
//! 2. Glyph sprites, additive blending, rotated in screen space

use glam::{EulerRot, Mat4, Vec3};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::composer::{Camera, Lights, Projected};
use super::error::{Result, SceneError, describe_js};
use super::particles::ParticleField;
use super::render_loop::{SceneRenderer, SceneState};
use super::shapes::ShapeField;
use super::theme::{FogStyle, Theme};

/// Sprites smaller than this many pixels are skipped.
const MIN_SPRITE_PX: f64 = 0.5;

fn render_err(e: JsValue) -> SceneError {
	SceneError::Render(describe_js(&e))
}

/// Backing-store pixels per CSS pixel, from the canvas width and the
/// camera viewport width. Falls back to 1 for degenerate sizes.
fn backing_ratio(backing_width: u32, viewport_width: f32) -> f64 {
	if backing_width == 0 || !(viewport_width > 0.0) {
		return 1.0;
	}
	backing_width as f64 / viewport_width as f64
}

/// Draws [`SceneState`]s onto a 2D canvas context.
pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	/// Reused per-shape buffer of projected vertices.
	scratch: Vec<Option<Projected>>,
}

impl CanvasRenderer {
	/// Renderer drawing into `ctx` with `theme` colors.
	pub fn new(ctx: CanvasRenderingContext2d, theme: Theme) -> Self {
		Self {
			ctx,
			theme,
			scratch: Vec::new(),
		}
	}

	/// Pixel ratio for this frame; drawing happens in CSS pixels.
	fn pixel_ratio(&self, camera: &Camera) -> f64 {
		let backing = self.ctx.canvas().map_or(0, |c| c.width());
		backing_ratio(backing, camera.viewport.x)
	}

	/// Resets context state a failed frame may have left behind, then clears.
	fn clear(&self, camera: &Camera, ratio: f64) -> Result<()> {
		let (w, h) = (camera.viewport.x as f64, camera.viewport.y as f64);
		self.ctx
			.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
			.map_err(render_err)?;
		self.ctx.set_global_alpha(1.0);
		self.ctx
			.set_global_composite_operation("source-over")
			.map_err(render_err)?;
		self.ctx.clear_rect(0.0, 0.0, w, h);
		if self.theme.clear_color.a > 0.0 {
			self.ctx.set_fill_style_str(&self.theme.clear_color.to_css());
			self.ctx.fill_rect(0.0, 0.0, w, h);
		}
		Ok(())
	}

	fn draw_shapes(
		&mut self,
		shapes: &ShapeField,
		group: Mat4,
		camera: &Camera,
		lights: &Lights,
		fog: &FogStyle,
	) {
		let ctx = &self.ctx;
		let material = &self.theme.wireframe;
		ctx.set_line_width(material.line_width);

		for shape in &shapes.shapes {
			let r = shape.rotation;
			let model = group
				* Mat4::from_translation(shape.position())
				* Mat4::from_euler(EulerRot::XYZ, r.x, r.y, r.z);

			let world_center = model.transform_point3(Vec3::ZERO);
			let Some(center) = camera.project(world_center) else {
				continue;
			};
			let visibility = fog.visibility(center.depth);
			if visibility < 0.01 {
				continue;
			}

			let mesh = shape.mesh();
			self.scratch.clear();
			self.scratch.extend(
				mesh.vertices
					.iter()
					.map(|&v| camera.project(model.transform_point3(v))),
			);

			// Solids on the lit side of the origin catch more of the directional light.
			let facing = 0.5 + 0.5 * lights.direction.dot(world_center.normalize_or_zero()) as f64;
			let color = material
				.lit(&lights.ambient, &lights.directional, facing)
				.lerp(fog.color, 1.0 - visibility)
				.with_alpha(material.opacity);
			ctx.set_stroke_style_str(&color.to_css());

			ctx.begin_path();
			for &[a, b] in &mesh.edges {
				if let (Some(p), Some(q)) = (self.scratch[a as usize], self.scratch[b as usize]) {
					ctx.move_to(p.x, p.y);
					ctx.line_to(q.x, q.y);
				}
			}
			ctx.stroke();
		}
	}

	fn draw_particles(
		&self,
		particles: &ParticleField,
		group: Mat4,
		camera: &Camera,
		fog: &FogStyle,
		ratio: f64,
	) -> Result<()> {
		let ctx = &self.ctx;
		let (w, h) = (camera.viewport.x as f64, camera.viewport.y as f64);
		ctx.set_global_composite_operation("lighter")
			.map_err(render_err)?;

		for p in &particles.particles {
			let Some(at) = camera.project(group.transform_point3(p.position)) else {
				continue;
			};
			let side = particles.sprite_scale() as f64 * at.scale;
			let half = side / 2.0;
			if side < MIN_SPRITE_PX
				|| at.x + half < 0.0
				|| at.x - half > w
				|| at.y + half < 0.0
				|| at.y - half > h
			{
				continue;
			}
			let Some(image) = p
				.glyph()
				.surface()
				.as_any()
				.downcast_ref::<HtmlCanvasElement>()
			else {
				continue;
			};

			ctx.set_global_alpha(fog.visibility(at.depth));
			// Screen y points down, so a counter-clockwise spin is a negative angle.
			let (sin, cos) = (-p.rotation as f64).sin_cos();
			ctx.set_transform(
				cos * ratio,
				sin * ratio,
				-sin * ratio,
				cos * ratio,
				at.x * ratio,
				at.y * ratio,
			)
			.map_err(render_err)?;
			ctx.draw_image_with_html_canvas_element_and_dw_and_dh(image, -half, -half, side, side)
				.map_err(render_err)?;
		}

		ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
			.map_err(render_err)?;
		ctx.set_global_alpha(1.0);
		ctx.set_global_composite_operation("source-over")
			.map_err(render_err)
	}
}

impl SceneRenderer for CanvasRenderer {
	fn render(&mut self, scene: &SceneState) -> Result<()> {
		let composer = &scene.composer;
		let group = composer.group_matrix();

		let ratio = self.pixel_ratio(&composer.camera);

		self.clear(&composer.camera, ratio)?;
		self.draw_shapes(
			&scene.shapes,
			group,
			&composer.camera,
			&composer.lights,
			&composer.fog,
		);
		self.draw_particles(
			&scene.particles,
			group,
			&composer.camera,
			&composer.fog,
			ratio,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backing_ratio_tracks_device_pixels() {
		assert_eq!(backing_ratio(1600, 800.0), 2.0);
		assert_eq!(backing_ratio(800, 800.0), 1.0);
		assert_eq!(backing_ratio(1200, 800.0), 1.5);
	}

	#[test]
	fn backing_ratio_ignores_degenerate_sizes() {
		assert_eq!(backing_ratio(0, 800.0), 1.0);
		assert_eq!(backing_ratio(1600, 0.0), 1.0);
		assert_eq!(backing_ratio(1600, f32::NAN), 1.0);
	}
}

//! Glyph texture synthesis.
//!
//! A [`GlyphTextureFactory`] turns one character into an immutable square
//! raster: the character centered, filled flat or with a radial gradient, and
//! surrounded by a soft glow. The factory only describes *what* to draw (a
//! [`GlyphRecipe`]); a [`GlyphRasterizer`] does the drawing. In the browser
//! that is [`CanvasRasterizer`], which paints onto an off-screen canvas.
//!
//! Textures are produced once per particle at scene setup and never redrawn.

use std::any::Any;
use std::fmt;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::error::{Result, SceneError, describe_js};
use super::theme::{Color, GlyphFill, GlyphStyle};

/// Plain-data description of one glyph texture.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRecipe {
	/// Character to draw.
	pub character: char,
	/// Side of the square raster in pixels.
	pub size: u32,
	/// CSS font shorthand, e.g. `153.6px 'Urbanist', sans-serif`.
	pub font: String,
	/// Interior paint.
	pub fill: GlyphFill,
	/// Glow color.
	pub glow_color: Color,
	/// Glow blur radius in pixels.
	pub glow_blur: f64,
}

impl GlyphRecipe {
	/// Center of the raster, where the glyph is anchored.
	pub fn center(&self) -> f64 {
		self.size as f64 / 2.0
	}

	/// Inner and outer radii of the radial fill.
	pub fn gradient_radii(&self) -> (f64, f64) {
		let side = self.size as f64;
		(side * 0.1, side * 0.5)
	}
}

/// A finished raster that the renderer can draw.
pub trait RasterSurface: fmt::Debug {
	/// Width and height in pixels.
	fn dimensions(&self) -> (u32, u32);

	/// Access to the concrete surface for renderers that know its type.
	fn as_any(&self) -> &dyn Any;
}

impl RasterSurface for HtmlCanvasElement {
	fn dimensions(&self) -> (u32, u32) {
		(self.width(), self.height())
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// Executes glyph recipes.
pub trait GlyphRasterizer {
	/// Draws `recipe` onto a new surface.
	fn rasterize(&self, recipe: &GlyphRecipe) -> Result<Box<dyn RasterSurface>>;
}

/// Immutable rasterized glyph.
#[derive(Debug)]
pub struct GlyphTexture {
	character: char,
	size: u32,
	surface: Box<dyn RasterSurface>,
}

impl GlyphTexture {
	/// Character drawn on this texture.
	pub fn character(&self) -> char {
		self.character
	}

	/// Side length in pixels; the texture is always square.
	pub fn size(&self) -> u32 {
		self.size
	}

	/// Rasterized pixels.
	pub fn surface(&self) -> &dyn RasterSurface {
		self.surface.as_ref()
	}
}

/// Produces glyph textures of one size and style.
#[derive(Clone, Debug)]
pub struct GlyphTextureFactory {
	size: u32,
	style: GlyphStyle,
	glow_blur: f64,
}

impl GlyphTextureFactory {
	/// Factory for `size`-pixel textures in `style`.
	pub fn new(size: u32, style: GlyphStyle, glow_blur: f64) -> Self {
		Self {
			size,
			style,
			glow_blur,
		}
	}

	/// Texture side in pixels.
	pub fn size(&self) -> u32 {
		self.size
	}

	/// Describes the texture for `character` without drawing anything.
	pub fn recipe(&self, character: char) -> GlyphRecipe {
		GlyphRecipe {
			character,
			size: self.size,
			font: format!(
				"{}px {}",
				self.size as f64 * self.style.font_scale,
				self.style.font_family
			),
			fill: self.style.fill.clone(),
			glow_color: self.style.glow_color,
			glow_blur: self.glow_blur,
		}
	}

	/// Rasterizes `character`. The result is guaranteed to be exactly
	/// `size × size`; any other surface is rejected.
	pub fn render(
		&self,
		rasterizer: &dyn GlyphRasterizer,
		character: char,
	) -> Result<GlyphTexture> {
		if self.size == 0 {
			return Err(SceneError::Texture {
				character,
				reason: "texture size must be positive".into(),
			});
		}
		let surface = rasterizer.rasterize(&self.recipe(character))?;
		let (w, h) = surface.dimensions();
		if (w, h) != (self.size, self.size) {
			return Err(SceneError::Texture {
				character,
				reason: format!("rasterizer produced {w}x{h}, expected {0}x{0}", self.size),
			});
		}
		Ok(GlyphTexture {
			character,
			size: self.size,
			surface,
		})
	}
}

/// Draws glyph recipes onto fresh off-screen canvases.
pub struct CanvasRasterizer {
	document: Document,
}

impl CanvasRasterizer {
	/// Rasterizer creating canvases in `document`.
	pub fn new(document: Document) -> Self {
		Self { document }
	}

	fn canvas(&self, size: u32) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d)> {
		let canvas: HtmlCanvasElement = self
			.document
			.create_element("canvas")
			.map_err(|e| SceneError::RenderSurfaceUnavailable(describe_js(&e)))?
			.dyn_into()
			.map_err(|_| SceneError::RenderSurfaceUnavailable("not a canvas element".into()))?;
		canvas.set_width(size);
		canvas.set_height(size);
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|e| SceneError::RenderSurfaceUnavailable(describe_js(&e)))?
			.ok_or_else(|| SceneError::RenderSurfaceUnavailable("no 2d context".into()))?
			.dyn_into()
			.map_err(|_| SceneError::RenderSurfaceUnavailable("unexpected context type".into()))?;
		Ok((canvas, ctx))
	}
}

impl GlyphRasterizer for CanvasRasterizer {
	fn rasterize(&self, recipe: &GlyphRecipe) -> Result<Box<dyn RasterSurface>> {
		let texture_err = |e: wasm_bindgen::JsValue| SceneError::Texture {
			character: recipe.character,
			reason: describe_js(&e),
		};
		let (canvas, ctx) = self.canvas(recipe.size)?;
		let side = recipe.size as f64;
		let center = recipe.center();

		ctx.clear_rect(0.0, 0.0, side, side);
		ctx.set_font(&recipe.font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");

		match &recipe.fill {
			GlyphFill::Flat(color) => ctx.set_fill_style_str(&color.to_css()),
			GlyphFill::Radial { inner, outer } => {
				let (r0, r1) = recipe.gradient_radii();
				let gradient = ctx
					.create_radial_gradient(center, center, r0, center, center, r1)
					.map_err(texture_err)?;
				gradient
					.add_color_stop(0.0, &inner.to_css())
					.map_err(texture_err)?;
				gradient
					.add_color_stop(1.0, &outer.to_css())
					.map_err(texture_err)?;
				ctx.set_fill_style_canvas_gradient(&gradient);
			}
		}

		ctx.set_shadow_color(&recipe.glow_color.to_css());
		ctx.set_shadow_blur(recipe.glow_blur);
		ctx.fill_text(&recipe.character.to_string(), center, center)
			.map_err(texture_err)?;

		Ok(Box::new(canvas))
	}
}

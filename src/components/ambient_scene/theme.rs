//! Visual theming for the ambient scene.
//!
//! Colors for glyph fills and glows, light sources, fog and the wireframe
//! material. All values are fixed per theme; nothing here changes per frame.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in [0, 1].
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Opaque color from a `0xRRGGBB` literal.
	pub const fn hex(value: u32) -> Self {
		Self::rgb(
			((value >> 16) & 0xff) as u8,
			((value >> 8) & 0xff) as u8,
			(value & 0xff) as u8,
		)
	}

	/// Same color with opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Multiply each channel by `factor`, saturating at 255.
	pub fn scale(self, factor: f64) -> Self {
		let f = factor.max(0.0);
		Self {
			r: (self.r as f64 * f).min(255.0) as u8,
			g: (self.g as f64 * f).min(255.0) as u8,
			b: (self.b as f64 * f).min(255.0) as u8,
			a: self.a,
		}
	}

	/// Channel-wise product, as when a light tints a surface color.
	pub fn modulate(self, other: Color) -> Self {
		Self {
			r: ((self.r as u16 * other.r as u16) / 255) as u8,
			g: ((self.g as u16 * other.g as u16) / 255) as u8,
			b: ((self.b as u16 * other.b as u16) / 255) as u8,
			a: self.a,
		}
	}

	/// Channel-wise saturating sum, as when lights accumulate.
	pub fn add(self, other: Color) -> Self {
		Self {
			r: self.r.saturating_add(other.r),
			g: self.g.saturating_add(other.g),
			b: self.b.saturating_add(other.b),
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// CSS color string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// How a glyph's interior is painted.
#[derive(Clone, Debug, PartialEq)]
pub enum GlyphFill {
	/// Single solid color.
	Flat(Color),
	/// Radial gradient from the texture center, `inner` at 0.1 of the side
	/// and `outer` at 0.5 of the side.
	Radial {
		/// Color at the inner radius.
		inner: Color,
		/// Color at the outer radius.
		outer: Color,
	},
}

/// Glyph texture style.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphStyle {
	/// Interior paint.
	pub fill: GlyphFill,
	/// Color of the soft outer glow
	pub glow_color: Color,
	/// CSS font family list
	pub font_family: &'static str,
	/// Font size as a fraction of the texture side
	pub font_scale: f64,
}

/// A colored light with an intensity multiplier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightStyle {
	/// Light color.
	pub color: Color,
	/// Brightness multiplier.
	pub intensity: f64,
}

impl LightStyle {
	/// Light color with intensity folded in.
	pub fn radiance(&self) -> Color {
		self.color.scale(self.intensity)
	}
}

/// Exponential-squared fog, fading distant objects towards `color`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogStyle {
	/// Color distant objects fade into.
	pub color: Color,
	/// FogExp2 density.
	pub density: f64,
}

impl FogStyle {
	/// Remaining visibility (1.0 = unfogged) at view distance `depth`.
	pub fn visibility(&self, depth: f64) -> f64 {
		let d = self.density * depth;
		(-(d * d)).exp().clamp(0.0, 1.0)
	}
}

/// Wireframe material for the rotating solids.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WireframeStyle {
	/// Base surface color
	pub color: Color,
	/// Self-illumination color
	pub emissive: Color,
	/// Multiplier on `emissive`.
	pub emissive_intensity: f64,
	/// Line opacity in [0, 1].
	pub opacity: f64,
	/// Stroke width in screen pixels
	pub line_width: f64,
}

impl WireframeStyle {
	/// Lit line color under an ambient term plus a directional term weighted
	/// by `facing` (0 = turned away, 1 = facing the light).
	pub fn lit(&self, ambient: &LightStyle, directional: &LightStyle, facing: f64) -> Color {
		let light = ambient
			.radiance()
			.add(directional.radiance().scale(facing.clamp(0.0, 1.0)));
		self.color
			.modulate(light)
			.add(self.emissive.scale(self.emissive_intensity))
			.with_alpha(self.opacity)
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Lookup name for overrides.
	pub name: &'static str,
	/// Canvas clear color; transparent lets the page background show through.
	pub clear_color: Color,
	/// Glyph texture style.
	pub glyph: GlyphStyle,
	/// Uniform fill light.
	pub ambient_light: LightStyle,
	/// Light from the (1, 1, 1) direction.
	pub directional_light: LightStyle,
	/// Distance fog.
	pub fog: FogStyle,
	/// Material for the wireframe solids.
	pub wireframe: WireframeStyle,
}

impl Theme {
	/// Neon glyphs on a dark page (default)
	pub fn neon() -> Self {
		Self {
			name: "neon",
			clear_color: Color::rgba(0, 0, 0, 0.0),
			glyph: GlyphStyle {
				fill: GlyphFill::Radial {
					inner: Color::hex(0x00FFAA),
					outer: Color::hex(0xFFAA00),
				},
				glow_color: Color::hex(0xAA00FF),
				font_family: "'Urbanist', sans-serif",
				font_scale: 0.6,
			},
			ambient_light: LightStyle {
				color: Color::hex(0x00FFD1),
				intensity: 2.0,
			},
			directional_light: LightStyle {
				color: Color::hex(0xFF00FF),
				intensity: 1.0,
			},
			fog: FogStyle {
				color: Color::rgb(0, 0, 0),
				density: 0.0005,
			},
			wireframe: WireframeStyle {
				color: Color::hex(0xFFFFFF),
				emissive: Color::hex(0xFF00FF),
				emissive_intensity: 0.5,
				opacity: 0.4,
				line_width: 1.0,
			},
		}
	}

	/// Flat white glyphs with a cyan glow
	pub fn mono() -> Self {
		Self {
			name: "mono",
			glyph: GlyphStyle {
				fill: GlyphFill::Flat(Color::hex(0xFFFFFF)),
				glow_color: Color::hex(0x00FFD1),
				font_family: "sans-serif",
				font_scale: 0.6,
			},
			..Self::neon()
		}
	}

	/// Looks a theme up by name.
	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"neon" => Some(Self::neon()),
			"mono" => Some(Self::mono()),
			_ => None,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::neon()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_splits_channels() {
		assert_eq!(Color::hex(0x00FFAA), Color::rgb(0, 255, 170));
		assert_eq!(Color::hex(0xAA00FF).to_css(), "#aa00ff");
	}

	#[test]
	fn fog_fades_with_distance() {
		let fog = Theme::neon().fog;
		assert_eq!(fog.visibility(0.0), 1.0);
		let near = fog.visibility(500.0);
		let far = fog.visibility(3000.0);
		assert!(near > far);
		assert!(far > 0.0);
	}

	#[test]
	fn wireframe_lighting() {
		let theme = Theme::neon();
		let away = theme
			.wireframe
			.lit(&theme.ambient_light, &theme.directional_light, 0.0);
		let facing = theme
			.wireframe
			.lit(&theme.ambient_light, &theme.directional_light, 1.0);
		assert!((away.a - 0.4).abs() < 1e-9);
		// Cyan ambient alone leaves red to the magenta emissive.
		assert_eq!(away.r, 127);
		assert!(facing.r > away.r);
	}
}

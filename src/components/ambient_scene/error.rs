//! Error taxonomy for scene setup and the render loop.

use thiserror::Error;

/// Errors raised while building or driving the ambient scene.
#[derive(Debug, Error)]
pub enum SceneError {
	/// Unsupported device profile or malformed page overrides.
	/// Hosts fall back to the full profile and default settings.
	#[error("invalid scene configuration: {0}")]
	Configuration(String),

	/// No canvas, document or 2D context to draw into. The loop is not started.
	#[error("render surface unavailable: {0}")]
	RenderSurfaceUnavailable(String),

	/// A glyph raster could not be produced or came back with the wrong size.
	#[error("glyph texture for {character:?}: {reason}")]
	Texture {
		/// Character whose texture failed.
		character: char,
		/// What went wrong.
		reason: String,
	},

	/// A single frame failed to draw.
	#[error("frame render failed: {0}")]
	Render(String),

	/// The per-frame callback could not be requested from the host.
	#[error("frame scheduling failed: {0}")]
	Scheduler(String),
}

/// Shorthand for results carrying a [`SceneError`].
pub type Result<T> = std::result::Result<T, SceneError>;

/// Formats a JS exception value for inclusion in an error message.
pub(crate) fn describe_js(value: &wasm_bindgen::JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn texture_error_names_the_character_and_reason() {
		let err = SceneError::Texture {
			character: '한',
			reason: "rasterizer produced 4x8, expected 8x8".into(),
		};
		assert_eq!(
			err.to_string(),
			"glyph texture for '한': rasterizer produced 4x8, expected 8x8"
		);
	}
}

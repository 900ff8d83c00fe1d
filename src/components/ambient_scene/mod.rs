//! Ambient 3D glyph-particle background.
//!
//! Draws a slowly drifting field of glowing Hangul and Cyrillic glyphs mixed
//! with rotating wireframe solids, viewed through a perspective camera and
//! gently tilted by pointer movement. The scene is purely decorative:
//! - Budgets (particle and solid counts, texture resolution) are chosen once
//!   per device profile
//! - Motion is deterministic for a given seed
//! - Frame failures are logged and the loop keeps going
//!
//! # Example
//!
//! ```ignore
//! use glyph_drift::{AmbientBackground, SceneConfig};
//!
//! let (config, _errors) = SceneConfig::resolve(&user_agent, None);
//! view! { <AmbientBackground config=config /> }
//! ```

mod component;
/// Camera, lights and parallax.
pub mod composer;
/// Device profiles and scene configuration.
pub mod config;
mod error;
/// Wireframe meshes for the solids.
pub mod geometry;
/// Random glyph selection.
pub mod glyphs;
/// Pointer and touch tracking.
pub mod input;
/// Drifting glyph sprites.
pub mod particles;
mod render;
/// Frame stepping and host seams.
pub mod render_loop;
/// Spinning wireframe solids.
pub mod shapes;
/// Glyph texture synthesis.
pub mod texture;
/// Colors, lights and fog.
pub mod theme;

pub use component::AmbientBackground;
pub use config::{DeviceProfile, SceneConfig, SceneOverrides};
pub use error::{Result, SceneError};
pub use render_loop::{FrameScheduler, SceneHandle, SceneRenderer, SceneState};
pub use theme::Theme;

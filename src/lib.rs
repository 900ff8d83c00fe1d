//! glyph-drift: ambient 3D glyph-particle background for web pages.
//!
//! This crate provides a WASM-based canvas component that renders drifting
//! Hangul and Cyrillic glyphs and rotating wireframe solids behind page
//! content, with pointer-driven parallax.

use std::time::Duration;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

/// UI components.
pub mod components;

pub use components::ambient_scene::{
	AmbientBackground, DeviceProfile, SceneConfig, SceneError, SceneOverrides, Theme,
};

/// How long the loading overlay stays up after the app mounts.
const PRELOADER_DELAY: Duration = Duration::from_millis(1500);

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("glyph-drift: logging initialized");
}

/// Load scene overrides from a script element with id="scene-config".
fn load_scene_overrides(window: &Window) -> Option<SceneOverrides> {
	let document = window.document()?;
	let element = document.get_element_by_id("scene-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match SceneOverrides::from_json(&json_text) {
		Ok(overrides) => Some(overrides),
		Err(e) => {
			warn!("glyph-drift: {}", e);
			None
		}
	}
}

/// Resolve the scene configuration from the browser's user agent and any
/// page overrides. Falls back to the full profile outside a browser.
fn load_scene_config() -> SceneConfig {
	let Some(window) = web_sys::window() else {
		return SceneConfig::default();
	};
	let user_agent = window.navigator().user_agent().unwrap_or_default();
	let overrides = load_scene_overrides(&window);

	let (config, errors) = SceneConfig::resolve(&user_agent, overrides.as_ref());
	for e in errors {
		warn!("glyph-drift: {}", e);
	}
	info!(
		"glyph-drift: {:?} profile, {} glyphs, {} solids",
		config.profile, config.particles.count, config.shapes.count
	);
	config
}

/// Main application component.
/// Mounts the ambient background and a short-lived loading overlay.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_scene_config();
	let (loading, set_loading) = signal(true);
	set_timeout(move || set_loading.set(false), PRELOADER_DELAY);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="glyph-drift" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<AmbientBackground config=config />
		<Show when=move || loading.get()>
			<div class="preloader">
				<div class="preloader-spinner"></div>
			</div>
		</Show>
	}
}

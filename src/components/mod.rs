/// Leptos components.
pub mod ambient_scene;

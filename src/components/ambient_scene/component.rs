//! Leptos component hosting the ambient scene on a full-viewport canvas.
//!
//! On mount the component sizes the canvas to the window, builds the scene,
//! wires document-level pointer and touch listeners plus a window resize
//! listener, and starts the render loop on `requestAnimationFrame`. If the
//! canvas cannot provide a 2D context the loop is never started and the page
//! simply has no animated background.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use leptos::prelude::*;
use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent,
	Window,
};

use super::config::SceneConfig;
use super::error::{Result, SceneError, describe_js};
use super::input::TouchPoint;
use super::render::CanvasRenderer;
use super::render_loop::{FrameScheduler, SceneHandle};
use super::texture::CanvasRasterizer;

/// Runs the frame callback from `requestAnimationFrame`, re-requesting after
/// each frame so that one refresh runs exactly one frame.
struct AnimationFrameScheduler {
	window: Window,
}

impl FrameScheduler for AnimationFrameScheduler {
	fn run_every_refresh(&self, mut frame: Box<dyn FnMut()>) -> Result<()> {
		let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
		let (callback_inner, window) = (callback.clone(), self.window.clone());
		*callback.borrow_mut() = Some(Closure::new(move || {
			frame();
			if let Some(ref cb) = *callback_inner.borrow() {
				if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
					warn!("glyph-drift: animation stopped: {}", describe_js(&e));
				}
			}
		}));

		match *callback.borrow() {
			Some(ref cb) => self
				.window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.map(|_| ())
				.map_err(|e| SceneError::Scheduler(describe_js(&e))),
			None => Err(SceneError::Scheduler("frame callback missing".into())),
		}
	}
}

/// Browser event listeners kept alive for the page's lifetime.
struct Listeners {
	_resize: Closure<dyn FnMut()>,
	_pointer: Closure<dyn FnMut(MouseEvent)>,
	_touch: Closure<dyn FnMut(TouchEvent)>,
}

fn window_size(window: &Window) -> Vec2 {
	let read = |v: std::result::Result<JsValue, JsValue>| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
	};
	Vec2::new(read(window.inner_width()), read(window.inner_height()))
}

/// Sizes the canvas backing store in device pixels and returns the viewport
/// in CSS pixels, which is what the camera and input work in.
fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> Vec2 {
	let size = window_size(window);
	let ratio = window.device_pixel_ratio().max(1.0) as f32;
	canvas.set_width((size.x * ratio).round() as u32);
	canvas.set_height((size.y * ratio).round() as u32);
	size
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.map_err(|e| SceneError::RenderSurfaceUnavailable(describe_js(&e)))?
		.ok_or_else(|| SceneError::RenderSurfaceUnavailable("canvas has no 2d context".into()))?
		.dyn_into()
		.map_err(|_| SceneError::RenderSurfaceUnavailable("unexpected context type".into()))
}

fn touch_points(ev: &TouchEvent) -> Vec<TouchPoint> {
	let list = ev.touches();
	(0..list.length())
		.filter_map(|i| list.get(i))
		.map(|t| TouchPoint {
			page_x: t.page_x() as f64,
			page_y: t.page_y() as f64,
		})
		.collect()
}

/// Builds the scene on `canvas`, attaches listeners and starts the loop.
fn mount_scene(canvas: &HtmlCanvasElement, config: &SceneConfig) -> Result<Listeners> {
	let window = web_sys::window()
		.ok_or_else(|| SceneError::RenderSurfaceUnavailable("no window".into()))?;
	let document = window
		.document()
		.ok_or_else(|| SceneError::RenderSurfaceUnavailable("no document".into()))?;

	let size = fit_canvas(&window, canvas);
	let ctx = context_2d(canvas)?;

	let seed = config
		.seed
		.unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64);
	let handle = Rc::new(SceneHandle::initialize(
		config,
		&CanvasRasterizer::new(document.clone()),
		&mut StdRng::seed_from_u64(seed),
		size,
	)?);

	let (handle_resize, canvas_resize, window_resize) =
		(handle.clone(), canvas.clone(), window.clone());
	let resize = Closure::<dyn FnMut()>::new(move || {
		let size = fit_canvas(&window_resize, &canvas_resize);
		handle_resize.resize(size.x, size.y);
	});
	window
		.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
		.map_err(|e| SceneError::RenderSurfaceUnavailable(describe_js(&e)))?;

	let handle_pointer = handle.clone();
	let pointer = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
		handle_pointer.on_pointer_move(ev.client_x() as f64, ev.client_y() as f64);
	});
	document
		.add_event_listener_with_callback("mousemove", pointer.as_ref().unchecked_ref())
		.map_err(|e| SceneError::RenderSurfaceUnavailable(describe_js(&e)))?;

	let handle_touch = handle.clone();
	let touch = Closure::<dyn FnMut(TouchEvent)>::new(move |ev: TouchEvent| {
		if handle_touch.on_touch_move(&touch_points(&ev)) {
			ev.prevent_default();
		}
	});
	// Non-passive so a tracked drag can suppress scrolling.
	let options = AddEventListenerOptions::new();
	options.set_passive(false);
	document
		.add_event_listener_with_callback_and_add_event_listener_options(
			"touchmove",
			touch.as_ref().unchecked_ref(),
			&options,
		)
		.map_err(|e| SceneError::RenderSurfaceUnavailable(describe_js(&e)))?;

	handle.start(
		Box::new(CanvasRenderer::new(ctx, config.theme.clone())),
		&AnimationFrameScheduler { window },
	)?;

	Ok(Listeners {
		_resize: resize,
		_pointer: pointer,
		_touch: touch,
	})
}

/// Renders the animated glyph background behind page content.
///
/// The canvas is fixed to the viewport, sits below other content and ignores
/// pointer events; input is tracked at the document level instead so the
/// parallax follows the pointer over any element.
#[component]
pub fn AmbientBackground(config: SceneConfig) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let listeners: Rc<RefCell<Option<Listeners>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if listeners.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		match mount_scene(&canvas, &config) {
			Ok(l) => *listeners.borrow_mut() = Some(l),
			Err(e) => warn!("glyph-drift: background disabled: {}", e),
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="ambient-background"
			style="position: fixed; inset: 0; width: 100vw; height: 100vh; display: block; z-index: -1; pointer-events: none;"
		/>
	}
}

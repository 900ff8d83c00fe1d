//! Scene state and the per-frame update/render cycle.
//!
//! All mutable scene data lives in one [`SceneState`], created by
//! [`SceneHandle::initialize`] and shared between the render loop and host
//! callbacks through `Rc<RefCell<_>>`. The host supplies a
//! [`FrameScheduler`] (in the browser, `requestAnimationFrame`) that invokes
//! the loop once per display refresh; every invocation runs exactly one
//! update+render pass.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use log::{debug, info, warn};
use rand::Rng;

use super::composer::SceneComposer;
use super::config::SceneConfig;
use super::error::Result;
use super::input::{InputTracker, PointerRegister, TouchPoint};
use super::particles::ParticleField;
use super::shapes::ShapeField;
use super::texture::{GlyphRasterizer, GlyphTextureFactory};

/// Everything that changes while the animation runs.
#[derive(Debug)]
pub struct SceneState {
	/// Glyph sprites.
	pub particles: ParticleField,
	/// Wireframe solids.
	pub shapes: ShapeField,
	/// Camera, lights and parallax state.
	pub composer: SceneComposer,
}

impl SceneState {
	/// Allocates every particle and shape for `config` in one batch.
	pub fn initialize<R: Rng + ?Sized>(
		config: &SceneConfig,
		rasterizer: &dyn GlyphRasterizer,
		rng: &mut R,
		viewport: Vec2,
	) -> Result<Self> {
		let p = &config.particles;
		let factory = GlyphTextureFactory::new(p.texture_size, config.theme.glyph.clone(), p.glow_blur);
		let particles = ParticleField::initialize(
			p.count,
			p.extent,
			p.speed.clone(),
			p.rotation_speed.clone(),
			p.sprite_scale,
			&factory,
			rasterizer,
			rng,
		)?;

		let s = &config.shapes;
		let shapes = ShapeField::initialize(s.count, s.extent, &s.variants, s.rotation_speed.clone(), rng);

		let composer = SceneComposer::new(&config.camera, &config.theme, config.parallax, viewport);

		Ok(Self {
			particles,
			shapes,
			composer,
		})
	}

	/// Advances the simulation one frame. Order matters only for the
	/// composer, which must see this frame's pointer reading.
	pub fn step(&mut self, pointer: Vec2) {
		self.particles.step();
		self.shapes.step();
		self.composer.step(pointer);
	}
}

/// Draws a scene to some output surface.
pub trait SceneRenderer {
	/// Draws one frame of `scene`.
	fn render(&mut self, scene: &SceneState) -> Result<()>;
}

/// Host primitive that runs a callback once per display refresh, forever.
///
/// Implementations must call `frame` at most once per refresh and must not
/// batch several calls into one.
pub trait FrameScheduler {
	/// Arranges for `frame` to run on every refresh from now on.
	fn run_every_refresh(&self, frame: Box<dyn FnMut()>) -> Result<()>;
}

/// One update+render pass per invocation.
pub struct RenderLoop {
	scene: Rc<RefCell<SceneState>>,
	pointer: PointerRegister,
	renderer: Box<dyn SceneRenderer>,
	frames: u64,
	failed_frames: u64,
}

impl RenderLoop {
	/// Loop over `scene`, reading input from `pointer`.
	pub fn new(
		scene: Rc<RefCell<SceneState>>,
		pointer: PointerRegister,
		renderer: Box<dyn SceneRenderer>,
	) -> Self {
		Self {
			scene,
			pointer,
			renderer,
			frames: 0,
			failed_frames: 0,
		}
	}

	/// Frames completed so far, including ones whose render failed.
	pub fn frames(&self) -> u64 {
		self.frames
	}

	/// Frames whose render returned an error.
	pub fn failed_frames(&self) -> u64 {
		self.failed_frames
	}

	/// Runs one frame: read input, step particles, shapes and view, render.
	/// A failed render is logged and the next frame proceeds normally.
	pub fn frame(&mut self) {
		let pointer = self.pointer.read();
		let Ok(mut scene) = self.scene.try_borrow_mut() else {
			debug!("glyph-drift: scene busy, skipping frame {}", self.frames);
			return;
		};
		scene.step(pointer);
		if let Err(e) = self.renderer.render(&scene) {
			self.failed_frames += 1;
			// Repeated failures are usually the same failure.
			if self.failed_frames == 1 || self.failed_frames % 600 == 0 {
				warn!(
					"glyph-drift: {} ({} failed of {} frames)",
					e,
					self.failed_frames,
					self.frames + 1
				);
			}
		}
		self.frames += 1;
	}
}

/// Host-facing handle to a running or ready-to-run scene.
pub struct SceneHandle {
	scene: Rc<RefCell<SceneState>>,
	input: InputTracker,
	started: Cell<bool>,
}

impl SceneHandle {
	/// Builds the scene for `config` and a canvas of `viewport` pixels.
	pub fn initialize<R: Rng + ?Sized>(
		config: &SceneConfig,
		rasterizer: &dyn GlyphRasterizer,
		rng: &mut R,
		viewport: Vec2,
	) -> Result<Self> {
		let scene = SceneState::initialize(config, rasterizer, rng, viewport)?;
		info!(
			"glyph-drift: scene ready ({:?}: {} particles, {} shapes)",
			config.profile,
			scene.particles.particles.len(),
			scene.shapes.shapes.len()
		);
		Ok(Self {
			scene: Rc::new(RefCell::new(scene)),
			input: InputTracker::new(config.normalization, viewport.x, viewport.y),
			started: Cell::new(false),
		})
	}

	/// Shared scene state, for hosts that need to inspect it.
	pub fn scene(&self) -> Rc<RefCell<SceneState>> {
		self.scene.clone()
	}

	/// Input tracker feeding the loop.
	pub fn input(&self) -> &InputTracker {
		&self.input
	}

	/// Must be called whenever the canvas size changes.
	pub fn resize(&self, width: f32, height: f32) {
		self.input.resize(width, height);
		if let Ok(mut scene) = self.scene.try_borrow_mut() {
			scene.composer.resize(width, height);
		}
	}

	/// Records a mouse position in client coordinates.
	pub fn on_pointer_move(&self, x: f64, y: f64) {
		self.input.on_pointer_move(x, y);
	}

	/// Returns `true` if the touch was consumed and default handling should
	/// be suppressed.
	pub fn on_touch_move(&self, touches: &[TouchPoint]) -> bool {
		self.input.on_touch_move(touches)
	}

	/// Starts the render loop. A second call is ignored.
	pub fn start(&self, renderer: Box<dyn SceneRenderer>, scheduler: &dyn FrameScheduler) -> Result<()> {
		if self.started.get() {
			warn!("glyph-drift: render loop already started");
			return Ok(());
		}
		let mut render_loop = RenderLoop::new(self.scene.clone(), self.input.register(), renderer);
		scheduler.run_every_refresh(Box::new(move || render_loop.frame()))?;
		self.started.set(true);
		info!("glyph-drift: render loop started");
		Ok(())
	}
}

//! Animation controller: owns the surface, the particles and the frame bookkeeping.

use std::num::NonZeroUsize;
use std::sync::Arc;

use floaty_core::{Attribute, ConfigError, MAX_DIMENSION, Tuning, math::clamp};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::color::{Rgba, hsla};
use crate::frame::{Clock, FrameGate, SystemClock};
use crate::particle::Particle;
use crate::surface::{CompositeOp, Surface};

/// Drives a collection of floating particles on a pixel surface.
///
/// The host calls [`attach`](Self::attach) once, then calls
/// [`step`](Self::step) whenever [`take_frame_request`](Self::take_frame_request)
/// reports a pending frame. Configuration changes always rebuild the
/// whole particle collection.
#[derive(Debug)]
pub struct AnimationController<C: Clock = SystemClock> {
    /// Drawing surface, present while attached.
    surface: Option<Surface>,
    /// Particles owned by this controller only.
    particles: Vec<Particle>,
    /// Configured surface width in pixels.
    width: u32,
    /// Configured surface height in pixels.
    height: u32,
    /// Requested particle count.
    num: usize,
    tuning: Tuning,
    particle_color: Rgba,
    /// Timestamp of the previous frame in milliseconds.
    last_ms: f64,
    /// Normalized time since the previous frame.
    dt: f64,
    /// Sum of all `dt` since the last reset.
    elapsed: f64,
    /// Frames rendered since the last reset.
    tick: u64,
    /// Whether the host should deliver another frame.
    frame_requested: bool,
    gate: Arc<FrameGate>,
    clock: C,
    rng: StdRng,
}

impl Default for AnimationController<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationController<SystemClock> {
    /// Create a detached controller on the system clock.
    pub fn new() -> Self {
        Self::with_rng(SystemClock::default(), StdRng::from_os_rng())
    }
}

impl<C: Clock> AnimationController<C> {
    /// Create a detached controller with a custom clock and a deterministic seed.
    pub fn with_clock(clock: C, seed: u64) -> Self {
        Self::with_rng(clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(clock: C, rng: StdRng) -> Self {
        let last_ms = clock.now_ms();
        Self {
            surface: None,
            particles: Vec::new(),
            width: 0,
            height: 0,
            num: 1,
            tuning: Tuning::default(),
            particle_color: Rgba::WHITE,
            last_ms,
            dt: 1.0,
            elapsed: 0.0,
            tick: 0,
            frame_requested: false,
            gate: Arc::new(FrameGate::new()),
            clock,
            rng,
        }
    }

    /// Replace the tuning constants. Takes effect for particles created by the next reset.
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_particle_color(mut self, color: Rgba) -> Self {
        self.particle_color = color;
        self
    }

    /// Create the surface, reset and render the first frame.
    pub fn attach(&mut self) {
        if self.surface.is_some() {
            return;
        }
        debug!(width = self.width, height = self.height, "attaching particle surface");
        self.surface = Some(Surface::new(self.width, self.height));
        self.reset();
        self.step();
    }

    /// Stop requesting frames and drop the surface.
    pub fn detach(&mut self) {
        debug!("detaching particle surface");
        self.surface = None;
        self.frame_requested = false;
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Consume the pending frame request, if any.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Rebuild the surface and the whole particle collection from the current configuration.
    ///
    /// No-op while detached.
    pub fn reset(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.resize(self.width, self.height);

        self.last_ms = self.clock.now_ms();
        self.dt = 1.0;
        self.elapsed = 0.0;
        self.tick = 0;

        let (width, height) = (f64::from(self.width), f64::from(self.height));
        let tuning = self.tuning;
        let rng = &mut self.rng;
        self.particles = (0..self.num)
            .map(|_| Particle::new(&mut *rng, width, height, &tuning))
            .collect();

        info!(
            width = self.width,
            height = self.height,
            particles = self.particles.len(),
            "particles reset"
        );
    }

    /// Render one frame. Returns `false` when the frame was skipped.
    pub fn step(&mut self) -> bool {
        let gate = Arc::clone(&self.gate);
        let Some(_ticket) = gate.try_enter() else {
            return false;
        };
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        self.frame_requested = true;

        let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
        let fade = hsla(0.0, 0.0, 1.0, self.tuning.fade_alpha);
        surface.fill_rect(0.0, 0.0, w, h, fade, CompositeOp::DestinationIn);

        for p in &mut self.particles {
            p.advance(self.dt, &mut self.rng, &self.tuning);
            p.render(surface, self.particle_color);
        }

        let now = self.clock.now_ms();
        self.dt = clamp(
            (now - self.last_ms) / self.tuning.frame_period_ms,
            self.tuning.min_dt,
            self.tuning.max_dt,
        );
        self.last_ms = now;
        self.elapsed += self.dt;
        self.tick += 1;
        true
    }

    /// Pointer click on the element.
    pub fn click(&mut self) {
        self.reset();
    }

    /// Set the surface width, capped at [`MAX_DIMENSION`].
    pub fn set_width(&mut self, width: u32) {
        self.width = width.min(MAX_DIMENSION);
        self.reset();
    }

    /// Set the surface height, capped at [`MAX_DIMENSION`].
    pub fn set_height(&mut self, height: u32) {
        self.height = height.min(MAX_DIMENSION);
        self.reset();
    }

    /// Set both dimensions with a single reset.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.min(MAX_DIMENSION);
        self.height = height.min(MAX_DIMENSION);
        self.reset();
    }

    /// Set the particle count. Callers are expected to pass a positive count.
    pub fn set_num(&mut self, num: usize) {
        info!("new particle count: {num}");
        self.num = num;
        self.reset();
    }

    /// Apply a typed attribute change.
    pub fn apply(&mut self, attribute: Attribute) {
        match attribute {
            Attribute::Width(w) => self.set_width(w),
            Attribute::Height(h) => self.set_height(h),
            Attribute::Num(n) => self.set_num(NonZeroUsize::get(n)),
        }
    }

    /// Apply a string attribute change. Malformed values leave the controller untouched.
    pub fn attribute_changed(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match Attribute::parse(name, value) {
            Ok(attribute) => {
                self.apply(attribute);
                Ok(())
            }
            Err(e) => {
                warn!("ignoring attribute {name}={value:?}: {e}");
                Err(e)
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Shared handle to the re-entry gate.
    pub fn frame_gate(&self) -> Arc<FrameGate> {
        Arc::clone(&self.gate)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num(&self) -> usize {
        self.num
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}

//! Drives one effect instance from attach to detach.
//!
//! Event handlers only queue input through [`EffectInstance::queue_resize`]
//! and [`EffectInstance::queue_pointer`]. Everything else happens inside
//! [`EffectInstance::tick`], in a fixed order per frame: resize, pointer,
//! physics, draw.

use crate::config::{ConfigChange, EffectConfig};
use crate::disposal::Disposer;
use crate::effects::{Effect, EffectKind, EffectStrategy};
use crate::error::FxError;
use crate::frame::{AcquireRetry, FailureBudget, FrameClock, FrameLoop, FrameScheduler};
use crate::pointer::{PointerNormalizer, PointerPhase, PointerSample};
use crate::render_state::RenderState;
use crate::resize::{HostMetrics, ResizeAdapter, ResizeObservation};
use crate::surface::{Surface, SurfaceProvider};
use glam::Vec2;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceStatus {
    /// Constructed, not attached yet.
    Detached,
    /// Attached; no surface yet, acquisition will be retried.
    Waiting,
    Running,
    /// Gave up on the surface. The effect shows nothing.
    Unavailable,
    Disposed,
}

impl InstanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceStatus::Detached => "detached",
            InstanceStatus::Waiting => "waiting",
            InstanceStatus::Running => "running",
            InstanceStatus::Unavailable => "unavailable",
            InstanceStatus::Disposed => "disposed",
        }
    }

    fn is_live(self) -> bool {
        matches!(self, InstanceStatus::Waiting | InstanceStatus::Running)
    }
}

pub struct EffectInstance<P: SurfaceProvider, S: FrameScheduler> {
    config: EffectConfig,
    provider: P,
    surface: Option<P::Surface>,
    frames: FrameLoop<S>,
    clock: FrameClock,
    resize: ResizeAdapter,
    pointer: PointerNormalizer,
    effect: EffectStrategy,
    state: RenderState,
    failures: FailureBudget,
    retry: AcquireRetry,
    disposer: Disposer,
    metrics: Option<HostMetrics>,
    pending_resize: Option<HostMetrics>,
    pending_pointer: SmallVec<[PointerSample; 8]>,
    status: InstanceStatus,
}

impl<P: SurfaceProvider, S: FrameScheduler> EffectInstance<P, S> {
    pub fn new(config: EffectConfig, provider: P, scheduler: S) -> Self {
        let config = config.sanitized();
        let mut resize = ResizeAdapter::default();
        resize.set_grid(config.grid_pitch());
        Self {
            effect: EffectStrategy::from_config(&config),
            config,
            provider,
            surface: None,
            frames: FrameLoop::new(scheduler),
            clock: FrameClock::new(),
            resize,
            pointer: PointerNormalizer::default(),
            state: RenderState::default(),
            failures: FailureBudget::default(),
            retry: AcquireRetry::default(),
            disposer: Disposer::new(),
            metrics: None,
            pending_resize: None,
            pending_pointer: SmallVec::new(),
            status: InstanceStatus::Detached,
        }
    }

    pub fn kind(&self) -> EffectKind {
        EffectKind::of(&self.config)
    }

    pub fn status(&self) -> InstanceStatus {
        self.status
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn effect(&self) -> &EffectStrategy {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut EffectStrategy {
        &mut self.effect
    }

    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    pub fn surface(&self) -> Option<&P::Surface> {
        self.surface.as_ref()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn frame_loop(&self) -> &FrameLoop<S> {
        &self.frames
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.frames.scheduler_mut()
    }

    /// Listener and observer teardowns registered by the platform layer.
    pub fn disposer_mut(&mut self) -> &mut Disposer {
        &mut self.disposer
    }

    pub fn disposer(&self) -> &Disposer {
        &self.disposer
    }

    /// Measures the host, tries to acquire a surface and schedules the first frame.
    /// A zero-sized host leaves the instance waiting for a later layout.
    pub fn attach(&mut self, metrics: HostMetrics) {
        if self.status != InstanceStatus::Detached {
            log::debug!("[lifecycle] attach ignored while {}", self.status.as_str());
            return;
        }
        self.status = InstanceStatus::Waiting;
        self.metrics = Some(metrics);
        if let Some(obs) = self.resize.observe(metrics) {
            self.seed_pointer(&obs);
            if obs.has_extent() {
                self.acquire(&obs);
            }
        }
        if self.status.is_live() {
            self.frames.schedule();
        }
        log::info!(
            "[lifecycle] {} attached ({})",
            self.kind().as_str(),
            self.status.as_str()
        );
    }

    /// The most recent geometry wins; it is applied at the start of the next frame.
    pub fn queue_resize(&mut self, metrics: HostMetrics) {
        if self.status == InstanceStatus::Disposed {
            return;
        }
        self.pending_resize = Some(metrics);
    }

    /// Consecutive moves collapse into the latest one.
    pub fn queue_pointer(&mut self, sample: PointerSample) {
        if self.status == InstanceStatus::Disposed {
            return;
        }
        if sample.phase == PointerPhase::Move {
            if let Some(last) = self.pending_pointer.last_mut() {
                if last.phase == PointerPhase::Move {
                    *last = sample;
                    return;
                }
            }
        }
        self.pending_pointer.push(sample);
    }

    /// Runs one frame. Returns true when another frame was scheduled.
    pub fn tick(&mut self, now_sec: f64) -> bool {
        if !self.frames.begin_frame() || !self.status.is_live() {
            return false;
        }
        let dt = self.clock.tick(now_sec);

        if let Some(metrics) = self.pending_resize.take() {
            self.apply_resize(metrics);
        }
        if self.surface.is_none() && self.status == InstanceStatus::Waiting {
            self.retry_acquire(now_sec);
        }
        if !self.status.is_live() {
            return false;
        }

        let dpr = self.resize.last().map(|o| o.size.dpr).unwrap_or(1.0);
        let ready = self.surface.is_some();
        for sample in self.pending_pointer.drain(..) {
            let event = self.pointer.apply(&sample, dpr);
            if ready {
                self.effect.pointer(&event);
            }
        }

        self.pointer.step(dt);
        self.state.dt = dt;
        self.state.elapsed = self.clock.elapsed() as f32;
        self.state.pointer = self.pointer.state();
        self.state.pointer_smoothed = self.pointer.smoothed();
        self.state.pointer_presence = self.pointer.presence();
        if ready {
            self.effect.step(dt, &mut self.state);
        }

        self.draw();

        if self.status.is_live() {
            self.frames.schedule();
            true
        } else {
            false
        }
    }

    /// Applies a new configuration, hot-patching or rebuilding as needed.
    pub fn on_config_change(&mut self, next: EffectConfig) -> ConfigChange {
        if self.status == InstanceStatus::Disposed {
            return ConfigChange::Unchanged;
        }
        let next = next.sanitized();
        let change = self.config.classify(&next);
        match change {
            ConfigChange::Unchanged => {}
            ConfigChange::HotPatch => {
                self.effect.hot_patch(&next);
                self.config = next;
            }
            ConfigChange::Reinit => self.reinit(next),
        }
        log::info!("[config] {} {}", self.kind().as_str(), change.as_str());
        change
    }

    /// Cancels the loop, removes listeners and releases the surface. Safe to
    /// call repeatedly and before the first frame.
    pub fn detach(&mut self) {
        if self.status == InstanceStatus::Disposed {
            return;
        }
        self.frames.cancel();
        self.disposer.dispose();
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
        self.effect.dispose();
        self.pending_pointer.clear();
        self.pending_resize = None;
        self.metrics = None;
        self.state = RenderState::default();
        self.status = InstanceStatus::Disposed;
        log::info!("[lifecycle] {} detached", self.kind().as_str());
    }

    fn seed_pointer(&mut self, obs: &ResizeObservation) {
        if obs.first {
            self.pointer
                .seed(Vec2::new(obs.size.css_width, obs.size.css_height) * 0.5);
        }
    }

    fn acquire(&mut self, obs: &ResizeObservation) {
        match self.provider.acquire(obs, self.config.backend()) {
            Ok(surface) => {
                self.surface = Some(surface);
                self.effect.init(obs);
                self.failures.success();
                self.status = InstanceStatus::Running;
                log::info!(
                    "[surface] {} acquired {}x{} @{:.2}",
                    self.kind().as_str(),
                    obs.size.width,
                    obs.size.height,
                    obs.size.dpr
                );
            }
            Err(e) if e.is_unavailable() && !self.retry.exhausted() => {
                log::debug!("[surface] deferred: {}", e);
            }
            Err(e) => self.give_up(&e),
        }
    }

    fn retry_acquire(&mut self, now_sec: f64) {
        if !self.retry.is_armed() {
            if self.retry.exhausted() {
                self.give_up(&FxError::unavailable("acquisition retries exhausted"));
            } else {
                self.retry.arm(now_sec);
            }
            return;
        }
        if self.retry.due(now_sec) {
            if let Some(obs) = self.resize.last().copied() {
                self.acquire(&obs);
            }
        }
    }

    fn apply_resize(&mut self, metrics: HostMetrics) {
        self.metrics = Some(metrics);
        let Some(obs) = self.resize.observe(metrics) else {
            return;
        };
        self.seed_pointer(&obs);
        match self.surface.as_mut() {
            Some(surface) => {
                surface.resize(obs.size);
                self.effect.init(&obs);
            }
            None => {
                if self.status == InstanceStatus::Waiting
                    && obs.has_extent()
                    && self.retry.take_now()
                {
                    self.acquire(&obs);
                }
            }
        }
    }

    fn draw(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.state.size = surface.size();
        match surface.draw(&self.state) {
            Ok(()) => self.failures.success(),
            Err(e) if e.is_unavailable() => self.give_up(&e),
            Err(e) => {
                if self.failures.consecutive() == 0 {
                    log::warn!("[surface] draw failed: {}", e);
                }
                if self.failures.failure() {
                    let reason = format!(
                        "{} consecutive draw failures, last: {}",
                        self.failures.consecutive(),
                        e
                    );
                    self.give_up(&FxError::backend(reason));
                }
            }
        }
    }

    fn give_up(&mut self, err: &FxError) {
        self.status = InstanceStatus::Unavailable;
        self.frames.pause();
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
        log::error!("[surface] {} unavailable: {}", self.kind().as_str(), err);
    }

    fn reinit(&mut self, next: EffectConfig) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
        self.effect.dispose();
        self.effect = EffectStrategy::from_config(&next);
        self.resize.set_grid(next.grid_pitch());
        self.resize.reset();
        self.config = next;
        self.state.clear();
        self.failures = FailureBudget::default();
        self.retry = AcquireRetry::default();
        if self.status == InstanceStatus::Detached {
            return;
        }
        self.status = InstanceStatus::Waiting;
        if let Some(metrics) = self.metrics {
            if let Some(obs) = self.resize.observe(metrics) {
                if obs.has_extent() {
                    self.acquire(&obs);
                }
            }
        }
        if self.status.is_live() {
            self.frames.schedule();
        }
    }
}

impl<P: SurfaceProvider, S: FrameScheduler> Drop for EffectInstance<P, S> {
    fn drop(&mut self) {
        self.detach();
    }
}

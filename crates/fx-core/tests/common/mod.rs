// In-memory surface, provider and scheduler used by the lifecycle tests.
#![allow(dead_code)]

use fx_core::{
    Backend, FrameScheduler, FrameToken, FxError, HostMetrics, HostRect, RenderState,
    ResizeObservation, Scene, Surface, SurfaceProvider, SurfaceSize,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub acquired: u32,
    pub attempts: u32,
    pub released: u32,
    pub resizes: u32,
    pub draws: u32,
    /// Size the surface had during each draw.
    pub drawn_sizes: Vec<(u32, u32)>,
    pub last_scene: Option<Scene>,
    pub last_backend: Option<Backend>,
    /// Draws fail with a backend error while set.
    pub fail_draws: bool,
    /// Context creation fails even for a sized host.
    pub no_context: bool,
}

pub type SharedLog = Rc<RefCell<SurfaceLog>>;

pub struct FakeSurface {
    size: SurfaceSize,
    released: bool,
    log: SharedLog,
}

impl Surface for FakeSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        if self.released {
            return;
        }
        self.size = size;
        self.log.borrow_mut().resizes += 1;
    }

    fn draw(&mut self, state: &RenderState) -> Result<(), FxError> {
        if self.released {
            return Ok(());
        }
        let mut log = self.log.borrow_mut();
        if log.fail_draws {
            return Err(FxError::backend("lost context"));
        }
        log.draws += 1;
        log.drawn_sizes.push((state.size.width, state.size.height));
        log.last_scene = Some(state.scene.clone());
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.log.borrow_mut().released += 1;
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

#[derive(Default)]
pub struct FakeProvider {
    pub log: SharedLog,
}

impl SurfaceProvider for FakeProvider {
    type Surface = FakeSurface;

    fn acquire(
        &mut self,
        observation: &ResizeObservation,
        backend: Backend,
    ) -> Result<FakeSurface, FxError> {
        let mut log = self.log.borrow_mut();
        log.attempts += 1;
        log.last_backend = Some(backend);
        if !observation.has_extent() {
            return Err(FxError::unavailable("host has zero extent"));
        }
        if log.no_context {
            return Err(FxError::unavailable("context creation failed"));
        }
        log.acquired += 1;
        Ok(FakeSurface {
            size: observation.size,
            released: false,
            log: self.log.clone(),
        })
    }
}

#[derive(Debug, Default)]
pub struct FrameLog {
    pub requested: u32,
    pub cancelled: u32,
    pub shutdowns: u32,
    pub pending: Option<i64>,
}

pub type SharedFrames = Rc<RefCell<FrameLog>>;

#[derive(Default)]
pub struct FakeScheduler {
    pub log: SharedFrames,
    next: i64,
}

impl FrameScheduler for FakeScheduler {
    fn request_frame(&mut self) -> Option<FrameToken> {
        self.next += 1;
        let mut log = self.log.borrow_mut();
        log.requested += 1;
        log.pending = Some(self.next);
        Some(FrameToken(self.next))
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut log = self.log.borrow_mut();
        if log.pending == Some(token.0) {
            log.pending = None;
        }
        log.cancelled += 1;
    }

    fn shutdown(&mut self) {
        self.log.borrow_mut().shutdowns += 1;
    }
}

pub fn metrics(width: f32, height: f32) -> HostMetrics {
    HostMetrics::new(HostRect::sized(width, height), 1.0)
}

use crate::core::{EffectInstance, FrameScheduler, FrameToken, FxError};
use crate::render::WebSurfaceProvider;
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type WebInstance = EffectInstance<WebSurfaceProvider, RafScheduler>;

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` driver. The slot keeps the frame callback alive
/// until [`FrameScheduler::shutdown`] drops it.
#[derive(Default)]
pub struct RafScheduler {
    slot: FrameSlot,
}

impl RafScheduler {
    /// Installs the callback that ticks `instance`. Timestamps are seconds
    /// since installation.
    pub fn install(&self, instance: Weak<RefCell<WebInstance>>) {
        let epoch = Instant::now();
        *self.slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let Some(instance) = instance.upgrade() else {
                return;
            };
            let now = epoch.elapsed().as_secs_f64();
            match instance.try_borrow_mut() {
                Ok(mut fx) => {
                    fx.tick(now);
                }
                Err(_) => log::warn!("[loop] frame skipped, instance busy"),
            };
        }) as Box<dyn FnMut()>));
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameToken> {
        let window = web::window()?;
        let slot = self.slot.borrow();
        let callback = slot.as_ref()?;
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => Some(FrameToken(id as i64)),
            Err(e) => {
                log::error!("[loop] {}", FxError::backend(format!("{:?}", e)));
                None
            }
        }
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(token.0 as i32);
        }
    }

    fn shutdown(&mut self) {
        self.slot.borrow_mut().take();
    }
}

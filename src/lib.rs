#![cfg(target_arch = "wasm32")]
//! Browser front-end: mounts an effect inside a host element and drives it
//! with `requestAnimationFrame`.
use crate::core::{EffectConfig, EffectInstance};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod input;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("fx-web loaded");
    Ok(())
}

fn config_from_js(config_json: &str) -> Result<EffectConfig, JsValue> {
    EffectConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// One mounted effect. The canvas, listeners and frame loop live until
/// [`FxEffect::detach`] or until the JS object is freed.
#[wasm_bindgen]
pub struct FxEffect {
    inner: Rc<RefCell<frame::WebInstance>>,
}

#[wasm_bindgen]
impl FxEffect {
    #[wasm_bindgen(constructor)]
    pub fn new(host: web::HtmlElement, config_json: &str) -> Result<FxEffect, JsValue> {
        let config = config_from_js(config_json)?;
        let inner = Rc::new(RefCell::new(EffectInstance::new(
            config,
            render::WebSurfaceProvider::new(host.clone()),
            frame::RafScheduler::default(),
        )));
        inner
            .borrow_mut()
            .scheduler_mut()
            .install(Rc::downgrade(&inner));
        events::wire(&inner, &host);
        inner.borrow_mut().attach(dom::host_metrics(&host));
        Ok(FxEffect { inner })
    }

    /// Applies a new configuration and reports what it took: `unchanged`,
    /// `hot-patch` or `reinit`.
    pub fn update(&self, config_json: &str) -> Result<String, JsValue> {
        let config = config_from_js(config_json)?;
        let mut fx = self
            .inner
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("effect is busy"))?;
        Ok(fx.on_config_change(config).as_str().to_string())
    }

    pub fn detach(&self) {
        match self.inner.try_borrow_mut() {
            Ok(mut fx) => fx.detach(),
            Err(_) => log::warn!("[lifecycle] detach while busy ignored"),
        }
    }

    pub fn status(&self) -> String {
        self.inner
            .try_borrow()
            .map(|fx| fx.status().as_str().to_string())
            .unwrap_or_else(|_| "busy".to_string())
    }
}

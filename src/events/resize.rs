use super::with_instance;
use crate::core::ResourceKind;
use crate::dom;
use crate::frame::WebInstance;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Observes the host box. Browsers without `ResizeObserver` fall back to the
/// window `resize` event, which misses layout-only changes.
pub fn wire_resize(instance: &Rc<RefCell<WebInstance>>, host: &web::HtmlElement) {
    let weak = Rc::downgrade(instance);
    let host_measure = host.clone();
    let on_resize = move || {
        let metrics = dom::host_metrics(&host_measure);
        with_instance(&weak, |fx| fx.queue_resize(metrics));
    };

    let observer_cb = Closure::wrap(Box::new({
        let on_resize = on_resize.clone();
        move |_entries: js_sys::Array, _observer: web::ResizeObserver| on_resize()
    }) as Box<dyn FnMut(_, _)>);
    match web::ResizeObserver::new(observer_cb.as_ref().unchecked_ref()) {
        Ok(observer) => {
            observer.observe(host);
            instance
                .borrow_mut()
                .disposer_mut()
                .register(ResourceKind::Observer, "resize-observer", move || {
                    observer.disconnect();
                    drop(observer_cb);
                });
        }
        Err(e) => {
            log::warn!("[events] ResizeObserver unavailable ({:?}), using window resize", e);
            wire_window_resize(instance, on_resize);
        }
    }
}

fn wire_window_resize(instance: &Rc<RefCell<WebInstance>>, on_resize: impl Fn() + 'static) {
    let Some(window) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move || on_resize()) as Box<dyn FnMut()>);
    if let Err(e) =
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
    {
        log::warn!("[events] resize listener not added: {:?}", e);
        return;
    }
    instance
        .borrow_mut()
        .disposer_mut()
        .register(ResourceKind::Listener, "window-resize", move || {
            _ = window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            drop(closure);
        });
}

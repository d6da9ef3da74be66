use super::with_instance;
use crate::constants::{POINTER_EVENTS, TOUCH_EVENTS};
use crate::core::{PointerPhase, PointerSample, ResourceKind};
use crate::dom;
use crate::frame::WebInstance;
use crate::input;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::{Closure, WasmClosure};
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_pointer_listeners(instance: &Rc<RefCell<WebInstance>>, host: &web::HtmlElement) {
    for name in POINTER_EVENTS {
        let Some(phase) = input::phase_for(name) else {
            continue;
        };
        let weak = Rc::downgrade(instance);
        let host_rect = host.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let Some(sample) = input::pointer_sample(&ev, phase, dom::host_rect(&host_rect))
            else {
                return;
            };
            with_instance(&weak, |fx| fx.queue_pointer(sample));
        }) as Box<dyn FnMut(_)>);
        listen(instance, host, name, closure);
    }
}

pub fn wire_touch_listeners(instance: &Rc<RefCell<WebInstance>>, host: &web::HtmlElement) {
    for name in TOUCH_EVENTS {
        let Some(phase) = input::phase_for(name) else {
            continue;
        };
        let weak = Rc::downgrade(instance);
        let host_rect = host.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
            let Some(sample) = input::touch_sample(&ev, phase, dom::host_rect(&host_rect)) else {
                return;
            };
            with_instance(&weak, |fx| {
                fx.queue_pointer(sample);
                // a lifted finger no longer hovers
                if phase == PointerPhase::Up {
                    fx.queue_pointer(PointerSample {
                        phase: PointerPhase::Leave,
                        ..sample
                    });
                }
            });
        }) as Box<dyn FnMut(_)>);
        listen(instance, host, name, closure);
    }
}

fn listen<E: 'static>(
    instance: &Rc<RefCell<WebInstance>>,
    host: &web::HtmlElement,
    name: &'static str,
    closure: Closure<dyn FnMut(E)>,
) where
    dyn FnMut(E): WasmClosure,
{
    if let Err(e) = host.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
        log::warn!("[events] {} listener not added: {:?}", name, e);
        return;
    }
    let target = host.clone();
    instance
        .borrow_mut()
        .disposer_mut()
        .register(ResourceKind::Listener, name, move || {
            _ = target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            drop(closure);
        });
}

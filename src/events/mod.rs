//! DOM listeners for one instance. Handlers only queue input on the
//! instance; every registration hands its teardown to the instance's
//! disposer so `detach` removes it.

use crate::frame::WebInstance;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use web_sys as web;

mod pointer;
mod resize;

pub fn wire(instance: &Rc<RefCell<WebInstance>>, host: &web::HtmlElement) {
    pointer::wire_pointer_listeners(instance, host);
    pointer::wire_touch_listeners(instance, host);
    resize::wire_resize(instance, host);
}

/// Runs `f` on the instance unless it is gone or mid-frame.
fn with_instance(instance: &Weak<RefCell<WebInstance>>, f: impl FnOnce(&mut WebInstance)) {
    let Some(instance) = instance.upgrade() else {
        return;
    };
    match instance.try_borrow_mut() {
        Ok(mut fx) => f(&mut fx),
        Err(_) => log::debug!("[events] instance busy, event dropped"),
    };
}

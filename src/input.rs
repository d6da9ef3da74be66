use crate::constants::MS_PER_SEC;
use crate::core::{HostRect, PointerKind, PointerPhase, PointerSample};
use glam::Vec2;
use web_sys as web;

#[inline]
pub fn pointer_kind(pointer_type: &str) -> PointerKind {
    match pointer_type {
        "touch" => PointerKind::Touch,
        "pen" => PointerKind::Pen,
        _ => PointerKind::Mouse,
    }
}

/// Phase for a DOM event name; `None` for events we do not listen to.
#[inline]
pub fn phase_for(event_name: &str) -> Option<PointerPhase> {
    match event_name {
        "pointerdown" | "touchstart" => Some(PointerPhase::Down),
        "pointermove" | "touchmove" => Some(PointerPhase::Move),
        "pointerup" | "touchend" => Some(PointerPhase::Up),
        "pointerleave" | "touchcancel" => Some(PointerPhase::Leave),
        _ => None,
    }
}

#[inline]
fn sample(
    kind: PointerKind,
    phase: PointerPhase,
    x: i32,
    y: i32,
    rect: HostRect,
    time_ms: f64,
) -> PointerSample {
    PointerSample {
        kind,
        phase,
        client: Vec2::new(x as f32, y as f32),
        rect,
        time: time_ms / MS_PER_SEC,
    }
}

/// Touch-type pointer events yield `None`; the touch listeners report those.
pub fn pointer_sample(
    ev: &web::PointerEvent,
    phase: PointerPhase,
    rect: HostRect,
) -> Option<PointerSample> {
    let kind = pointer_kind(&ev.pointer_type());
    if kind == PointerKind::Touch {
        return None;
    }
    Some(sample(
        kind,
        phase,
        ev.client_x(),
        ev.client_y(),
        rect,
        ev.time_stamp(),
    ))
}

/// Uses the first changed touch.
pub fn touch_sample(
    ev: &web::TouchEvent,
    phase: PointerPhase,
    rect: HostRect,
) -> Option<PointerSample> {
    let touch = ev.changed_touches().get(0)?;
    Some(sample(
        PointerKind::Touch,
        phase,
        touch.client_x(),
        touch.client_y(),
        rect,
        ev.time_stamp(),
    ))
}

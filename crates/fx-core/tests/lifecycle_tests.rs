// Lifecycle tests against an in-memory surface and frame scheduler.

mod common;

use common::{metrics, FakeProvider, FakeScheduler};
use fx_core::config::{DotGridConfig, EffectConfig, PlasmaConfig};
use fx_core::effects::EffectStrategy;
use fx_core::{
    Backend, ConfigChange, EffectInstance, HostMetrics, HostRect, InstanceStatus, PointerKind,
    PointerPhase, PointerSample, PointerState, ResourceKind, Scene,
};
use glam::Vec2;

type Instance = EffectInstance<FakeProvider, FakeScheduler>;

fn instance(config: EffectConfig) -> (Instance, common::SharedLog, common::SharedFrames) {
    let provider = FakeProvider::default();
    let scheduler = FakeScheduler::default();
    let log = provider.log.clone();
    let frames = scheduler.log.clone();
    (EffectInstance::new(config, provider, scheduler), log, frames)
}

fn dot_grid() -> EffectConfig {
    EffectConfig::DotGrid(DotGridConfig::default())
}

fn sample(phase: PointerPhase, x: f32, y: f32, time: f64) -> PointerSample {
    PointerSample {
        kind: PointerKind::Mouse,
        phase,
        client: Vec2::new(x, y),
        rect: HostRect::sized(400.0, 400.0),
        time,
    }
}

#[test]
fn attach_acquires_and_draws() {
    let (mut fx, log, frames) = instance(EffectConfig::Plasma(PlasmaConfig::default()));
    fx.attach(metrics(200.0, 100.0));
    assert_eq!(fx.status(), InstanceStatus::Running);
    assert_eq!(log.borrow().acquired, 1);
    assert_eq!(log.borrow().last_backend, Some(Backend::Gpu));
    assert_eq!(frames.borrow().requested, 1);

    assert!(fx.tick(0.0));
    assert_eq!(log.borrow().draws, 1);
    assert!(matches!(log.borrow().last_scene, Some(Scene::Shader { .. })));
    // first tick has no previous timestamp
    assert_eq!(fx.render_state().dt, 0.0);
}

#[test]
fn zero_sized_host_waits_for_layout() {
    let (mut fx, log, _frames) = instance(dot_grid());
    fx.attach(metrics(0.0, 0.0));
    assert_eq!(fx.status(), InstanceStatus::Waiting);
    assert_eq!(log.borrow().acquired, 0);

    assert!(fx.tick(0.0));
    fx.queue_resize(metrics(300.0, 300.0));
    assert!(fx.tick(0.016));
    assert_eq!(fx.status(), InstanceStatus::Running);
    assert_eq!(log.borrow().acquired, 1);
    assert_eq!(log.borrow().drawn_sizes.last(), Some(&(300, 300)));
}

#[test]
fn unavailable_after_retries_run_out() {
    let (mut fx, log, frames) = instance(dot_grid());
    log.borrow_mut().no_context = true;
    fx.attach(metrics(100.0, 100.0));
    assert_eq!(fx.status(), InstanceStatus::Waiting);

    let mut now = 0.0;
    let mut ticks = 0;
    while fx.tick(now) {
        now += 0.05;
        ticks += 1;
        assert!(ticks < 500, "retry loop never ended");
    }
    assert_eq!(fx.status(), InstanceStatus::Unavailable);
    // the attach attempt plus every retry
    assert_eq!(log.borrow().attempts, 1 + fx_core::constants::ACQUIRE_RETRY_ATTEMPTS);
    assert!(!fx.frame_loop().is_pending());
    assert_eq!(frames.borrow().shutdowns, 0);
}

#[test]
fn detach_is_idempotent_and_leaves_nothing_behind() {
    let (mut fx, log, frames) = instance(dot_grid());
    fx.attach(metrics(400.0, 400.0));
    for label in ["pointerdown", "pointermove", "pointerup"] {
        fx.disposer_mut().register(ResourceKind::Listener, label, || {});
    }
    fx.disposer_mut().register(ResourceKind::Observer, "resize", || {});
    assert_eq!(fx.disposer().total_active(), 4);

    // no frame has run yet
    fx.detach();
    fx.detach();
    assert_eq!(fx.status(), InstanceStatus::Disposed);
    assert_eq!(fx.disposer().total_active(), 0);
    assert_eq!(fx.disposer().active(ResourceKind::Listener), 0);
    assert_eq!(log.borrow().released, 1);
    assert_eq!(frames.borrow().shutdowns, 1);
    assert_eq!(frames.borrow().pending, None);

    // late callbacks racing the teardown are ignored
    assert!(!fx.tick(1.0));
    fx.queue_pointer(sample(PointerPhase::Down, 10.0, 10.0, 1.0));
    fx.queue_resize(metrics(10.0, 10.0));
    assert_eq!(fx.on_config_change(dot_grid()), ConfigChange::Unchanged);
    assert_eq!(log.borrow().draws, 0);
}

#[test]
fn detach_without_attach_is_safe() {
    let (mut fx, log, frames) = instance(dot_grid());
    fx.detach();
    drop(fx);
    assert_eq!(log.borrow().released, 0);
    assert_eq!(frames.borrow().shutdowns, 1);
}

#[test]
fn identical_resize_does_not_reallocate() {
    let (mut fx, log, _frames) = instance(dot_grid());
    fx.attach(metrics(400.0, 400.0));
    assert!(fx.tick(0.0));
    let (counts, ptr) = match fx.effect() {
        EffectStrategy::DotGrid(g) => (g.grid().counts(), g.grid().elements().as_ptr()),
        other => panic!("unexpected effect {:?}", other),
    };
    assert_eq!((counts.cols, counts.rows), (9, 9));

    fx.queue_resize(metrics(400.0, 400.0));
    assert!(fx.tick(0.016));
    assert_eq!(log.borrow().resizes, 0);
    match fx.effect() {
        EffectStrategy::DotGrid(g) => assert_eq!(g.grid().elements().as_ptr(), ptr),
        other => panic!("unexpected effect {:?}", other),
    }

    fx.queue_resize(metrics(500.0, 400.0));
    assert!(fx.tick(0.032));
    assert_eq!(log.borrow().resizes, 1);
    match fx.effect() {
        EffectStrategy::DotGrid(g) => assert_eq!(g.grid().counts().cols, 11),
        other => panic!("unexpected effect {:?}", other),
    }
}

#[test]
fn resize_lands_before_the_draw_of_the_same_frame() {
    let (mut fx, log, _frames) = instance(dot_grid());
    fx.attach(metrics(400.0, 400.0));
    assert!(fx.tick(0.0));
    fx.queue_resize(HostMetrics::new(HostRect::sized(300.0, 200.0), 3.0));
    assert!(fx.tick(0.016));
    // device pixel ratio is capped at 2
    assert_eq!(log.borrow().drawn_sizes.last(), Some(&(600, 400)));
}

#[test]
fn repeated_draw_failures_stop_the_loop() {
    let (mut fx, log, _frames) = instance(dot_grid());
    fx.attach(metrics(400.0, 400.0));
    assert!(fx.tick(0.0));
    log.borrow_mut().fail_draws = true;
    let limit = fx_core::constants::MAX_CONSECUTIVE_DRAW_FAILURES;
    for i in 1..limit {
        assert!(fx.tick(i as f64 * 0.016), "stopped early at failure {}", i);
    }
    assert!(!fx.tick(1.0));
    assert_eq!(fx.status(), InstanceStatus::Unavailable);
    assert_eq!(log.borrow().released, 1);
}

#[test]
fn a_good_frame_resets_the_failure_count() {
    let (mut fx, log, _frames) = instance(dot_grid());
    fx.attach(metrics(400.0, 400.0));
    let limit = fx_core::constants::MAX_CONSECUTIVE_DRAW_FAILURES;
    let mut now = 0.0;
    for _ in 0..3 {
        log.borrow_mut().fail_draws = true;
        for _ in 1..limit {
            assert!(fx.tick(now));
            now += 0.016;
        }
        log.borrow_mut().fail_draws = false;
        assert!(fx.tick(now));
        now += 0.016;
    }
    assert_eq!(fx.status(), InstanceStatus::Running);
}

#[test]
fn config_changes_hot_patch_or_reinit() {
    let (mut fx, log, _frames) = instance(dot_grid());
    fx.attach(metrics(400.0, 400.0));
    assert!(fx.tick(0.0));

    assert_eq!(fx.on_config_change(dot_grid()), ConfigChange::Unchanged);

    let recolored = EffectConfig::DotGrid(DotGridConfig {
        active_color: fx_core::Rgba::rgb(1.0, 0.0, 0.0),
        ..DotGridConfig::default()
    });
    assert_eq!(fx.on_config_change(recolored), ConfigChange::HotPatch);
    assert_eq!(log.borrow().acquired, 1);
    assert_eq!(log.borrow().released, 0);

    let wider = EffectConfig::DotGrid(DotGridConfig {
        gap: 16.0,
        ..DotGridConfig::default()
    });
    assert_eq!(fx.on_config_change(wider), ConfigChange::Reinit);
    assert_eq!(log.borrow().released, 1);
    assert_eq!(log.borrow().acquired, 2);
    assert_eq!(fx.status(), InstanceStatus::Running);
    match fx.effect() {
        // (400 + 16) / (16 + 16) = 13
        EffectStrategy::DotGrid(g) => assert_eq!(g.grid().counts().cols, 13),
        other => panic!("unexpected effect {:?}", other),
    }

    assert_eq!(
        fx.on_config_change(EffectConfig::Plasma(PlasmaConfig::default())),
        ConfigChange::Reinit
    );
    assert_eq!(log.borrow().last_backend, Some(Backend::Gpu));
    assert!(fx.tick(0.016));
    assert!(matches!(log.borrow().last_scene, Some(Scene::Shader { .. })));
}

#[test]
fn first_layout_seeds_pointer_at_centre() {
    let (mut fx, _log, _frames) = instance(dot_grid());
    fx.attach(metrics(400.0, 200.0));
    assert!(fx.tick(0.0));
    assert_eq!(fx.render_state().pointer_smoothed, Vec2::new(200.0, 100.0));
    assert_eq!(fx.render_state().pointer, PointerState::Inactive);
}

#[test]
fn pointer_leave_reports_inactive() {
    let (mut fx, _log, _frames) = instance(dot_grid());
    fx.attach(metrics(400.0, 400.0));
    assert!(fx.tick(0.0));

    fx.queue_pointer(sample(PointerPhase::Move, 50.0, 60.0, 0.01));
    assert!(fx.tick(0.016));
    let point = fx.render_state().pointer.point().copied().expect("active pointer");
    assert_eq!(point.local, Vec2::new(50.0, 60.0));

    fx.queue_pointer(sample(PointerPhase::Leave, 0.0, 0.0, 0.02));
    assert!(fx.tick(0.032));
    assert_eq!(fx.render_state().pointer, PointerState::Inactive);
}

#[test]
fn click_shock_moves_dots_through_the_loop() {
    let (mut fx, _log, _frames) = instance(dot_grid());
    fx.attach(metrics(400.0, 400.0));
    assert!(fx.tick(0.0));
    fx.queue_pointer(sample(PointerPhase::Down, 200.0, 200.0, 0.01));
    assert!(fx.tick(0.1));
    match fx.effect() {
        EffectStrategy::DotGrid(g) => assert!(g.grid().active() > 0),
        other => panic!("unexpected effect {:?}", other),
    }
}

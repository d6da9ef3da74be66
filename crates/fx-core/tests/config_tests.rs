// JSON configuration parsing, sanitizing and change classification.

use fx_core::config::{
    DotGridConfig, ElasticSliderConfig, GridDistortionConfig, PlasmaConfig, StaggeredMenuConfig,
};
use fx_core::constants::{MAX_GRID_CELLS, MIN_GRID_CELL};
use fx_core::{
    Backend, ConfigChange, EffectConfig, FxError, HostMetrics, HostRect, ResizeAdapter, Rgba,
};

#[test]
fn partial_json_fills_in_defaults() {
    let config = EffectConfig::from_json(r#"{ "kind": "dot-grid", "gap": 20 }"#).unwrap();
    match config {
        EffectConfig::DotGrid(c) => {
            assert_eq!(c.gap, 20.0);
            assert_eq!(c.dot_size, DotGridConfig::default().dot_size);
            assert_eq!(c.shock_radius, 250.0);
        }
        other => panic!("wrong kind {:?}", other),
    }

    let empty = EffectConfig::from_json(r#"{ "kind": "staggered-menu" }"#).unwrap();
    assert_eq!(
        empty,
        EffectConfig::StaggeredMenu(StaggeredMenuConfig::default())
    );
}

#[test]
fn fields_are_camel_case_and_colours_are_hex() {
    let json = r##"{
        "kind": "plasma",
        "color": "#0f0",
        "mouseInteractive": false,
        "followTau": 0.3
    }"##;
    match EffectConfig::from_json(json).unwrap() {
        EffectConfig::Plasma(c) => {
            assert_eq!(c.color, Rgba::rgb(0.0, 1.0, 0.0));
            assert!(!c.mouse_interactive);
            assert_eq!(c.follow_tau, 0.3);
        }
        other => panic!("wrong kind {:?}", other),
    }

    let json = r##"{ "kind": "staggered-menu", "prelayerColors": ["#000", "#ffffff", "#ff000080"] }"##;
    match EffectConfig::from_json(json).unwrap() {
        EffectConfig::StaggeredMenu(c) => {
            assert_eq!(c.prelayer_colors.len(), 3);
            assert!((c.prelayer_colors[2].a - 128.0 / 255.0).abs() < 1e-6);
        }
        other => panic!("wrong kind {:?}", other),
    }
}

#[test]
fn malformed_json_is_a_config_error() {
    for json in [
        r#"{ "kind": "plasma", "color": "orange" }"#,
        r#"{ "kind": "lava-lamp" }"#,
        r#"{ "gap": 3 }"#,
        r#"{ "kind": "dot-grid", "gap": "wide" }"#,
        "not json",
    ] {
        match EffectConfig::from_json(json) {
            Err(FxError::Config(_)) => {}
            other => panic!("{} parsed as {:?}", json, other),
        }
    }
}

#[test]
fn degenerate_values_are_clamped() {
    let json = r#"{ "kind": "grid-distortion", "grid": 0, "relaxation": 1.5, "mouse": -1 }"#;
    match EffectConfig::from_json(json).unwrap() {
        EffectConfig::GridDistortion(c) => {
            assert_eq!(c.grid, 1);
            assert_eq!(c.relaxation, 0.9);
            assert_eq!(c.mouse, 0.1);
        }
        other => panic!("wrong kind {:?}", other),
    }

    let json = r#"{ "kind": "elastic-slider", "min": 10, "max": 5, "defaultValue": 99, "friction": 0 }"#;
    match EffectConfig::from_json(json).unwrap() {
        EffectConfig::ElasticSlider(c) => {
            assert_eq!(c.max, 11.0);
            assert_eq!(c.default_value, 11.0);
            assert_eq!(c.friction, ElasticSliderConfig::default().friction);
        }
        other => panic!("wrong kind {:?}", other),
    }

    let json = r#"{ "kind": "dot-grid", "dotSize": -4, "gap": -2, "pushDuration": 0 }"#;
    match EffectConfig::from_json(json).unwrap() {
        EffectConfig::DotGrid(c) => {
            assert_eq!(c.dot_size, 16.0);
            assert_eq!(c.gap, 0.0);
            assert_eq!(c.push_duration, 0.3);
        }
        other => panic!("wrong kind {:?}", other),
    }

    let menu = EffectConfig::StaggeredMenu(StaggeredMenuConfig {
        item_count: 500,
        panel_width: 3.0,
        ..StaggeredMenuConfig::default()
    })
    .sanitized();
    match menu {
        EffectConfig::StaggeredMenu(c) => {
            assert_eq!(c.item_count, 32);
            assert_eq!(c.panel_width, 1.0);
        }
        other => panic!("wrong kind {:?}", other),
    }
}

#[test]
fn backend_and_grid_follow_the_kind() {
    let plasma = EffectConfig::Plasma(PlasmaConfig::default());
    assert_eq!(plasma.backend(), Backend::Gpu);
    assert!(plasma.grid_pitch().is_none());

    let dots = EffectConfig::DotGrid(DotGridConfig::default());
    assert_eq!(dots.backend(), Backend::Canvas2d);
    let pitch = dots.grid_pitch().expect("dot grid lattice");
    assert_eq!((pitch.cell, pitch.gap), (16.0, 32.0));

    let field = EffectConfig::GridDistortion(GridDistortionConfig::default());
    assert_eq!(field.backend(), Backend::Canvas2d);
    assert!(field.grid_pitch().is_none());
}

#[test]
fn classify_separates_cosmetic_from_structural_changes() {
    let dots = EffectConfig::DotGrid(DotGridConfig::default());
    assert_eq!(dots.classify(&dots.clone()), ConfigChange::Unchanged);

    let faster = EffectConfig::DotGrid(DotGridConfig {
        return_duration: 0.5,
        ..DotGridConfig::default()
    });
    assert_eq!(dots.classify(&faster), ConfigChange::HotPatch);

    let bigger = EffectConfig::DotGrid(DotGridConfig {
        dot_size: 20.0,
        ..DotGridConfig::default()
    });
    assert_eq!(dots.classify(&bigger), ConfigChange::Reinit);

    let field = EffectConfig::GridDistortion(GridDistortionConfig::default());
    let stronger = EffectConfig::GridDistortion(GridDistortionConfig {
        strength: 0.5,
        ..GridDistortionConfig::default()
    });
    let finer = EffectConfig::GridDistortion(GridDistortionConfig {
        grid: 30,
        ..GridDistortionConfig::default()
    });
    assert_eq!(field.classify(&stronger), ConfigChange::HotPatch);
    assert_eq!(field.classify(&finer), ConfigChange::Reinit);

    let menu = EffectConfig::StaggeredMenu(StaggeredMenuConfig::default());
    let recolored = EffectConfig::StaggeredMenu(StaggeredMenuConfig {
        panel_color: Rgba::rgb(0.1, 0.1, 0.1),
        ..StaggeredMenuConfig::default()
    });
    let longer = EffectConfig::StaggeredMenu(StaggeredMenuConfig {
        item_count: 7,
        ..StaggeredMenuConfig::default()
    });
    let flipped = EffectConfig::StaggeredMenu(StaggeredMenuConfig {
        position_right: false,
        ..StaggeredMenuConfig::default()
    });
    assert_eq!(menu.classify(&recolored), ConfigChange::HotPatch);
    assert_eq!(menu.classify(&longer), ConfigChange::Reinit);
    assert_eq!(menu.classify(&flipped), ConfigChange::Reinit);

    // switching effects always rebuilds
    assert_eq!(dots.classify(&field), ConfigChange::Reinit);
    assert_eq!(
        EffectConfig::Plasma(PlasmaConfig::default())
            .classify(&EffectConfig::ElasticSlider(ElasticSliderConfig::default())),
        ConfigChange::Reinit
    );
}

#[test]
fn change_names_match_the_update_report() {
    assert_eq!(ConfigChange::Unchanged.as_str(), "unchanged");
    assert_eq!(ConfigChange::HotPatch.as_str(), "hot-patch");
    assert_eq!(ConfigChange::Reinit.as_str(), "reinit");
}

#[test]
fn tiny_dot_pitch_is_clamped_and_lattice_bounded() {
    let config = EffectConfig::DotGrid(DotGridConfig {
        dot_size: 0.001,
        gap: 0.0,
        ..DotGridConfig::default()
    })
    .sanitized();
    let pitch = config.grid_pitch().expect("dot grid lattice");
    assert_eq!(pitch.cell, MIN_GRID_CELL);

    let mut adapter = ResizeAdapter::default();
    adapter.set_grid(Some(pitch));
    let obs = adapter
        .observe(HostMetrics::new(HostRect::sized(1920.0, 1080.0), 1.0))
        .expect("first observation");
    let counts = obs.grid.expect("grid counts");
    assert!(counts.len() <= MAX_GRID_CELLS);
    assert!(counts.cols > 0 && counts.rows > 0);
}

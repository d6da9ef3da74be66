use super::{Effect, EffectKind};
use crate::config::{EffectConfig, StaggeredMenuConfig};
use crate::easing::Easing;
use crate::pointer::{PointerEvent, PointerPhase};
use crate::render_state::{LayerView, RenderState, Scene};
use crate::resize::ResizeObservation;
use crate::timeline::{
    Choreographer, Choreography, MenuState, PhasePlan, Prop, PropertyStore, TargetId,
};

const PANEL: TargetId = TargetId(64);
const ITEM_BASE: u32 = 128;

const LAYER_DURATION: f32 = 0.5;
const LAYER_STAGGER: f32 = 0.07;
const PANEL_GAP: f32 = 0.08;
const PANEL_DURATION: f32 = 0.65;
const ITEM_DURATION: f32 = 1.0;
const ITEM_STAGGER: f32 = 0.1;
const ITEM_REST_Y: f32 = 140.0;
const ITEM_REST_ROTATE: f32 = 10.0;
const CLOSE_DURATION: f32 = 0.32;
const ITEM_CLOSE_DURATION: f32 = 0.2;

/// Phase layout of the menu transition: coloured pre-layers sweep in one
/// after another, the panel follows, then the items rise in with a stagger.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuChoreography {
    pub prelayers: u32,
    pub items: u32,
    pub from_right: bool,
}

impl MenuChoreography {
    fn from_config(c: &StaggeredMenuConfig) -> Self {
        Self {
            prelayers: c.prelayer_colors.len() as u32,
            items: c.item_count,
            from_right: c.position_right,
        }
    }

    fn offscreen(&self) -> f32 {
        if self.from_right {
            100.0
        } else {
            -100.0
        }
    }

    fn layers(&self) -> impl Iterator<Item = TargetId> {
        (0..self.prelayers).map(TargetId)
    }

    fn sliding(&self) -> impl Iterator<Item = TargetId> {
        self.layers().chain(std::iter::once(PANEL))
    }

    fn item_targets(&self) -> impl Iterator<Item = TargetId> {
        (0..self.items).map(|i| TargetId(ITEM_BASE + i))
    }

    fn panel_start(&self) -> f32 {
        LAYER_STAGGER * self.prelayers.saturating_sub(1) as f32 + PANEL_GAP
    }
}

impl Choreography for MenuChoreography {
    fn opening(&self) -> Vec<PhasePlan> {
        let panel_at = self.panel_start();
        vec![
            PhasePlan::new(self.layers(), LAYER_DURATION)
                .to(Prop::TranslateX, 0.0)
                .ease(Easing::Power4Out)
                .stagger(LAYER_STAGGER),
            PhasePlan::new([PANEL], PANEL_DURATION)
                .to(Prop::TranslateX, 0.0)
                .ease(Easing::Power4Out)
                .at(panel_at),
            PhasePlan::new(self.item_targets(), ITEM_DURATION)
                .to(Prop::TranslateY, 0.0)
                .to(Prop::Rotate, 0.0)
                .to(Prop::Opacity, 1.0)
                .ease(Easing::Power4Out)
                .stagger(ITEM_STAGGER)
                .at(panel_at + PANEL_DURATION * 0.15),
        ]
    }

    fn closing(&self) -> Vec<PhasePlan> {
        vec![
            PhasePlan::new(self.item_targets(), ITEM_CLOSE_DURATION)
                .to(Prop::TranslateY, ITEM_REST_Y)
                .to(Prop::Rotate, ITEM_REST_ROTATE)
                .to(Prop::Opacity, 0.0)
                .ease(Easing::Power3In),
            PhasePlan::new(self.sliding(), CLOSE_DURATION)
                .to(Prop::TranslateX, self.offscreen())
                .ease(Easing::Power3In),
        ]
    }

    fn rest(&self, store: &mut PropertyStore) {
        for t in self.sliding() {
            store.set(t, Prop::TranslateX, self.offscreen());
        }
        for t in self.item_targets() {
            store.set(t, Prop::TranslateY, ITEM_REST_Y);
            store.set(t, Prop::Rotate, ITEM_REST_ROTATE);
            store.set(t, Prop::Opacity, 0.0);
        }
    }
}

/// Off-canvas menu driven by the timeline engine instead of the physics loop.
#[derive(Debug)]
pub struct StaggeredMenu {
    config: StaggeredMenuConfig,
    menu: Choreographer<MenuChoreography>,
    width: f32,
    height: f32,
}

impl StaggeredMenu {
    pub fn new(config: StaggeredMenuConfig) -> Self {
        Self {
            menu: Choreographer::new(MenuChoreography::from_config(&config)),
            config,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn state(&self) -> MenuState {
        self.menu.state()
    }

    pub fn choreographer(&self) -> &Choreographer<MenuChoreography> {
        &self.menu
    }

    pub fn toggle(&mut self) {
        self.menu.trigger();
    }

    pub fn set_open(&mut self, open: bool) {
        self.menu.set_open(open);
    }

    fn write_scene(&self, state: &mut RenderState) {
        let store = self.menu.store();
        let panel_w = self.width * self.config.panel_width;
        let panel_x = if self.config.position_right {
            self.width - panel_w
        } else {
            0.0
        };
        let slide = |t: TargetId| store.get(t, Prop::TranslateX) / 100.0 * panel_w;

        let mut layers = match &mut state.scene {
            Scene::Layers { layers, .. } => std::mem::take(layers),
            _ => Vec::new(),
        };
        layers.clear();
        for (i, color) in self.config.prelayer_colors.iter().enumerate() {
            layers.push(LayerView {
                translate_x: slide(TargetId(i as u32)),
                translate_y: 0.0,
                opacity: 1.0,
                color: Some(*color),
                x: panel_x,
                y: 0.0,
                width: panel_w,
                height: self.height,
            });
        }
        let panel_shift = slide(PANEL);
        layers.push(LayerView {
            translate_x: panel_shift,
            translate_y: 0.0,
            opacity: 1.0,
            color: Some(self.config.panel_color),
            x: panel_x,
            y: 0.0,
            width: panel_w,
            height: self.height,
        });

        let count = self.config.item_count.max(1) as f32;
        let row = (self.height * 0.7 / count).min(64.0);
        let item_h = row * 0.7;
        for i in 0..self.config.item_count {
            let t = TargetId(ITEM_BASE + i);
            layers.push(LayerView {
                translate_x: panel_shift,
                translate_y: store.get(t, Prop::TranslateY) / 100.0 * item_h,
                opacity: store.get(t, Prop::Opacity).clamp(0.0, 1.0),
                color: Some(self.config.item_color),
                x: panel_x + panel_w * 0.1,
                y: self.height * 0.15 + row * i as f32,
                width: panel_w * 0.8,
                height: item_h,
            });
        }

        let openness = if panel_w > 0.0 {
            (1.0 - panel_shift.abs() / panel_w).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let backdrop = self.config.backdrop;
        state.scene = Scene::Layers {
            backdrop: backdrop.with_alpha(backdrop.a * openness),
            layers,
        };
    }
}

impl Effect for StaggeredMenu {
    fn kind(&self) -> EffectKind {
        EffectKind::StaggeredMenu
    }

    fn init(&mut self, observation: &ResizeObservation) {
        self.width = observation.size.css_width;
        self.height = observation.size.css_height;
    }

    fn pointer(&mut self, event: &PointerEvent) {
        if event.phase == PointerPhase::Down && event.state.is_active() {
            self.menu.trigger();
        }
    }

    fn step(&mut self, dt: f32, state: &mut RenderState) {
        self.menu.step(dt);
        self.write_scene(state);
    }

    fn hot_patch(&mut self, config: &EffectConfig) {
        if let EffectConfig::StaggeredMenu(c) = config {
            self.menu.set_choreography(MenuChoreography::from_config(c));
            self.config = c.clone();
        }
    }

    fn dispose(&mut self) {
        self.menu = Choreographer::new(MenuChoreography::from_config(&self.config));
    }
}

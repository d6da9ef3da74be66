//! Choreographed timelines for discrete open/close transitions.
//!
//! A [`Timeline`] is built fresh for every trigger from the *current* value
//! of each animated property, so a reversal mid-flight continues from where
//! the previous timeline left off. The [`Choreographer`] owns at most one
//! timeline at a time and replaces it atomically on re-trigger.

use crate::easing::Easing;
use fnv::FnvHashMap;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prop {
    /// Percent of the target's own width.
    TranslateX,
    /// Percent of the target's own height.
    TranslateY,
    Opacity,
    Scale,
    /// Degrees.
    Rotate,
}

impl Prop {
    pub fn identity(self) -> f32 {
        match self {
            Prop::Opacity | Prop::Scale => 1.0,
            Prop::TranslateX | Prop::TranslateY | Prop::Rotate => 0.0,
        }
    }
}

pub type AnimKey = (TargetId, Prop);

/// Current value of every animated property.
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    values: FnvHashMap<AnimKey, f32>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unset properties read as their identity value.
    pub fn get(&self, target: TargetId, prop: Prop) -> f32 {
        self.values
            .get(&(target, prop))
            .copied()
            .unwrap_or_else(|| prop.identity())
    }

    pub fn set(&mut self, target: TargetId, prop: Prop, value: f32) {
        if value.is_finite() {
            self.values.insert((target, prop), value);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One phase: move `values` on every target, starting `offset` seconds after
/// the timeline starts, each subsequent target delayed by `stagger`.
#[derive(Clone, Debug, PartialEq)]
pub struct PhasePlan {
    pub targets: SmallVec<[TargetId; 8]>,
    pub values: SmallVec<[(Prop, f32); 4]>,
    pub duration: f32,
    pub offset: f32,
    pub easing: Easing,
    pub stagger: f32,
}

impl PhasePlan {
    pub fn new(targets: impl IntoIterator<Item = TargetId>, duration: f32) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            values: SmallVec::new(),
            duration,
            offset: 0.0,
            easing: Easing::Linear,
            stagger: 0.0,
        }
    }

    pub fn to(mut self, prop: Prop, value: f32) -> Self {
        self.values.push((prop, value));
        self
    }

    pub fn at(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn stagger(mut self, stagger: f32) -> Self {
        self.stagger = stagger;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Track {
    key: AnimKey,
    from: f32,
    to: f32,
    start: f32,
    duration: f32,
    easing: Easing,
}

impl Track {
    fn end(&self) -> f32 {
        self.start + self.duration
    }

    fn sample(&self, time: f32) -> f32 {
        if self.duration <= 0.0 {
            return if time >= self.start { self.to } else { self.from };
        }
        let t = (time - self.start) / self.duration;
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Timeline {
    tracks: Vec<Track>,
    time: f32,
    duration: f32,
}

impl Timeline {
    /// Captures each animated property's current value from `store`.
    ///
    /// When two phases animate the same property, the later phase starts from
    /// the earlier phase's end value.
    pub fn build(phases: &[PhasePlan], store: &PropertyStore) -> Self {
        let mut tracks: Vec<Track> = Vec::new();
        let mut ends: FnvHashMap<AnimKey, f32> = FnvHashMap::default();
        for phase in phases {
            let duration = if phase.duration.is_finite() {
                phase.duration.max(0.0)
            } else {
                0.0
            };
            let offset = if phase.offset.is_finite() {
                phase.offset.max(0.0)
            } else {
                0.0
            };
            let stagger = if phase.stagger.is_finite() {
                phase.stagger.max(0.0)
            } else {
                0.0
            };
            for (i, target) in phase.targets.iter().enumerate() {
                for &(prop, to) in &phase.values {
                    let key = (*target, prop);
                    let from = ends
                        .get(&key)
                        .copied()
                        .unwrap_or_else(|| store.get(*target, prop));
                    ends.insert(key, to);
                    tracks.push(Track {
                        key,
                        from,
                        to,
                        start: offset + stagger * i as f32,
                        duration,
                        easing: phase.easing,
                    });
                }
            }
        }
        let duration = tracks.iter().map(Track::end).fold(0.0, f32::max);
        Self {
            tracks,
            time: 0.0,
            duration,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_finished(&self) -> bool {
        self.time >= self.duration
    }

    /// Writes every started track's value into `store`. Returns true once
    /// every track has completed.
    pub fn advance(&mut self, dt: f32, store: &mut PropertyStore) -> bool {
        if dt.is_finite() && dt > 0.0 {
            self.time = (self.time + dt).min(self.duration);
        }
        // Tracks are in build order, so for a key shared by two phases the
        // later one wins once it has started.
        for track in &self.tracks {
            if self.time < track.start {
                continue;
            }
            store.set(track.key.0, track.key.1, track.sample(self.time));
        }
        self.is_finished()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Builds the phases for each direction of a transition.
pub trait Choreography {
    fn opening(&self) -> Vec<PhasePlan>;
    fn closing(&self) -> Vec<PhasePlan>;
    /// Values every property holds while closed.
    fn rest(&self, store: &mut PropertyStore);
}

#[derive(Debug)]
pub struct Choreographer<C: Choreography> {
    choreography: C,
    state: MenuState,
    active: Option<Timeline>,
    store: PropertyStore,
    builds: u32,
}

impl<C: Choreography> Choreographer<C> {
    pub fn new(choreography: C) -> Self {
        let mut store = PropertyStore::new();
        choreography.rest(&mut store);
        Self {
            choreography,
            state: MenuState::Closed,
            active: None,
            store,
            builds: 0,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    pub fn choreography(&self) -> &C {
        &self.choreography
    }

    /// Replaces the choreography; the next trigger uses it.
    pub fn set_choreography(&mut self, choreography: C) {
        self.choreography = choreography;
    }

    pub fn active(&self) -> Option<&Timeline> {
        self.active.as_ref()
    }

    /// Number of timelines built so far.
    pub fn builds(&self) -> u32 {
        self.builds
    }

    pub fn is_open_or_opening(&self) -> bool {
        matches!(self.state, MenuState::Open | MenuState::Opening)
    }

    /// Toggle: open when closed or closing, close when open or opening.
    pub fn trigger(&mut self) {
        let open = !self.is_open_or_opening();
        self.start(open);
    }

    /// Requests a direction; a request matching the current direction is ignored.
    pub fn set_open(&mut self, open: bool) {
        if open != self.is_open_or_opening() {
            self.start(open);
        }
    }

    fn start(&mut self, open: bool) {
        // dropping the in-flight timeline leaves the store at its last written values
        self.active = None;
        let phases = if open {
            self.choreography.opening()
        } else {
            self.choreography.closing()
        };
        self.active = Some(Timeline::build(&phases, &self.store));
        self.builds += 1;
        self.state = if open {
            MenuState::Opening
        } else {
            MenuState::Closing
        };
        log::debug!("[timeline] {:?}", self.state);
    }

    pub fn step(&mut self, dt: f32) {
        let Some(timeline) = self.active.as_mut() else {
            return;
        };
        if timeline.advance(dt, &mut self.store) {
            self.active = None;
            self.state = match self.state {
                MenuState::Opening => MenuState::Open,
                MenuState::Closing => MenuState::Closed,
                settled => settled,
            };
        }
    }
}

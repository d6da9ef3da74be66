//! Easing curves for discrete transitions.
//!
//! Every curve maps `t` in \[0, 1\] to progress with `ease(0) == 0` and
//! `ease(1) == 1`; inputs outside the range are clamped first.

use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Easing {
    #[default]
    Linear,
    Power2Out,
    Power3Out,
    Power4Out,
    Power3In,
    Power2InOut,
    /// Overshoots past 1 before settling.
    BackOut,
    /// Oscillating settle; `period` is a fraction of the duration.
    ElasticOut { amplitude: f32, period: f32 },
}

impl Easing {
    /// The springy return used by impulse animations.
    pub const SPRINGY: Easing = Easing::ElasticOut {
        amplitude: 1.0,
        period: 0.75,
    };

    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 {
            return 0.0;
        }
        if t == 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power3Out => 1.0 - (1.0 - t).powi(4),
            Easing::Power4Out => 1.0 - (1.0 - t).powi(5),
            Easing::Power3In => t.powi(4),
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Easing::ElasticOut { amplitude, period } => {
                let period = if period > 0.0 { period } else { 0.3 };
                let amplitude = amplitude.max(1.0);
                let shift = period / TAU * (1.0 / amplitude).asin();
                amplitude * 2f32.powf(-10.0 * t) * ((t - shift) * TAU / period).sin() + 1.0
            }
        }
    }

    /// True for curves that leave \[0, 1\] on the way.
    pub fn overshoots(self) -> bool {
        matches!(self, Easing::BackOut | Easing::ElasticOut { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::Power2Out,
        Easing::Power3Out,
        Easing::Power4Out,
        Easing::Power3In,
        Easing::Power2InOut,
        Easing::BackOut,
        Easing::SPRINGY,
    ];

    #[test]
    fn endpoints_are_exact() {
        for e in ALL {
            assert_eq!(e.apply(0.0), 0.0, "{e:?}");
            assert_eq!(e.apply(1.0), 1.0, "{e:?}");
            assert_eq!(e.apply(-3.0), 0.0, "{e:?}");
            assert_eq!(e.apply(7.0), 1.0, "{e:?}");
        }
    }

    #[test]
    fn non_overshooting_curves_stay_in_range() {
        for e in ALL.iter().copied().filter(|e| !e.overshoots()) {
            for i in 0..=100 {
                let v = e.apply(i as f32 / 100.0);
                assert!((0.0..=1.0).contains(&v), "{e:?} at {i}: {v}");
            }
        }
    }

    #[test]
    fn elastic_out_overshoots_then_settles() {
        let peak = (1..100)
            .map(|i| Easing::SPRINGY.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
        assert!((Easing::SPRINGY.apply(0.99) - 1.0).abs() < 0.01);
    }
}

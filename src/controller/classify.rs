//! Gesture outcome classification
//!
//! Pure function over a terminal gesture sample. Velocity override first,
//! displacement rule second; a fast flick wins even at small displacement.

use crate::model::{GestureSample, Outcome, Viewport};

/// Horizontal displacement threshold as a fraction of viewport width.
const SWIPE_THRESHOLD_RATIO: f32 = 0.25;
/// Upward displacement (negative dy) that commits a Like, in units.
const LIKE_THRESHOLD: f32 = -80.0;
/// Flick velocity that overrides the displacement rule, in units/second.
const VELOCITY_THRESHOLD: f32 = 800.0;

/// Thresholds resolved against the current viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub swipe: f32,
    pub like: f32,
    pub velocity: f32,
}

impl Thresholds {
    pub fn for_viewport(viewport: &Viewport) -> Self {
        Self {
            swipe: viewport.width * SWIPE_THRESHOLD_RATIO,
            like: LIKE_THRESHOLD,
            velocity: VELOCITY_THRESHOLD,
        }
    }
}

/// Classify a terminated gesture into a discrete outcome.
///
/// Non-finite samples are an input anomaly and classify as Cancel.
pub fn classify(sample: &GestureSample, thresholds: &Thresholds) -> Outcome {
    if !sample.is_finite() {
        tracing::warn!(?sample, "Non-finite gesture sample, treating as Cancel");
        return Outcome::Cancel;
    }

    // Velocity override: takes precedence over displacement entirely.
    if sample.vx.abs() > thresholds.velocity || sample.vy.abs() > thresholds.velocity {
        if sample.vy < -thresholds.velocity {
            return Outcome::Like;
        } else if sample.vx > thresholds.velocity {
            return Outcome::Advance;
        } else if sample.vx < -thresholds.velocity {
            return Outcome::Retreat;
        }
        // Fast downward flick: no outcome maps to it, fall through.
    }

    if sample.dy.abs() > sample.dx.abs() {
        if sample.dy < thresholds.like {
            Outcome::Like
        } else {
            Outcome::Cancel
        }
    } else if sample.dx > thresholds.swipe {
        Outcome::Advance
    } else if sample.dx < -thresholds.swipe {
        Outcome::Retreat
    } else {
        Outcome::Cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    fn thresholds() -> Thresholds {
        Thresholds::for_viewport(&Viewport { width: 400.0, height: 800.0 })
    }

    fn sample(dx: f32, dy: f32, vx: f32, vy: f32) -> GestureSample {
        GestureSample { dx, dy, vx, vy }
    }

    #[test]
    fn displacement_table() {
        let t = thresholds();
        // width 400: swipe threshold 100
        assert_eq!(classify(&sample(0.0, -90.0, 0.0, 0.0), &t), Outcome::Like);
        assert_eq!(classify(&sample(120.0, 0.0, 0.0, 0.0), &t), Outcome::Advance);
        assert_eq!(classify(&sample(-120.0, 0.0, 0.0, 0.0), &t), Outcome::Retreat);
        assert_eq!(classify(&sample(40.0, 10.0, 0.0, 0.0), &t), Outcome::Cancel);
        // Vertical dominance with a sub-threshold upward drag cancels.
        assert_eq!(classify(&sample(10.0, -70.0, 0.0, 0.0), &t), Outcome::Cancel);
        // Downward drags never like.
        assert_eq!(classify(&sample(0.0, 200.0, 0.0, 0.0), &t), Outcome::Cancel);
    }

    #[test]
    fn velocity_override_beats_displacement() {
        let t = thresholds();
        // Small leftward displacement, fast rightward flick: Advance wins.
        assert_eq!(classify(&sample(-30.0, 0.0, 900.0, 0.0), &t), Outcome::Advance);
        // Large rightward displacement, fast upward flick: Like wins.
        assert_eq!(classify(&sample(300.0, 0.0, 0.0, -900.0), &t), Outcome::Like);
        assert_eq!(classify(&sample(0.0, 0.0, -900.0, 0.0), &t), Outcome::Retreat);
    }

    #[test]
    fn upward_flick_outranks_horizontal_flick() {
        let t = thresholds();
        assert_eq!(classify(&sample(0.0, 0.0, 1000.0, -1000.0), &t), Outcome::Like);
    }

    #[test]
    fn velocity_override_property_over_random_samples() {
        let t = thresholds();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..2000 {
            let s = sample(
                rng.gen_range(-500.0..500.0),
                rng.gen_range(-500.0..500.0),
                rng.gen_range(-2000.0..2000.0),
                rng.gen_range(-2000.0..2000.0),
            );
            if s.vx.abs() <= t.velocity && s.vy.abs() <= t.velocity {
                continue;
            }
            let got = classify(&s, &t);
            let expected = if s.vy < -t.velocity {
                Outcome::Like
            } else if s.vx > t.velocity {
                Outcome::Advance
            } else if s.vx < -t.velocity {
                Outcome::Retreat
            } else {
                // Fast downward flick falls through to the displacement rule.
                classify(&sample(s.dx, s.dy, 0.0, 0.0), &t)
            };
            assert_eq!(got, expected, "sample {s:?}");
        }
    }

    #[test]
    fn non_finite_sample_is_cancel() {
        let t = thresholds();
        assert_eq!(classify(&sample(f32::NAN, 0.0, 0.0, 0.0), &t), Outcome::Cancel);
        assert_eq!(classify(&sample(0.0, 0.0, f32::INFINITY, 0.0), &t), Outcome::Cancel);
        assert_eq!(classify(&sample(0.0, f32::NAN, 2000.0, 0.0), &t), Outcome::Cancel);
    }

    #[test]
    fn thresholds_scale_with_viewport_width() {
        let narrow = Thresholds::for_viewport(&Viewport { width: 200.0, height: 800.0 });
        assert_eq!(narrow.swipe, 50.0);
        assert_eq!(classify(&sample(60.0, 0.0, 0.0, 0.0), &narrow), Outcome::Advance);
        let wide = Thresholds::for_viewport(&Viewport { width: 1000.0, height: 800.0 });
        assert_eq!(classify(&sample(60.0, 0.0, 0.0, 0.0), &wide), Outcome::Cancel);
    }
}

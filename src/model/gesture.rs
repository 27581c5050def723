//! Gesture sampling: raw pointer stream to a rolling (dx, dy, vx, vy)

use std::time::Instant;

use super::types::GestureSample;

/// Tracks exactly one in-flight gesture, press to release.
///
/// On every pointer move the sample is recomputed from the event itself:
/// displacement is cumulative since the press, velocity is the instantaneous
/// rate between the last two events. No history is averaged or smoothed.
#[derive(Clone, Debug)]
pub struct GestureSampler {
    active: bool,
    origin_x: f32,
    origin_y: f32,
    last_x: f32,
    last_y: f32,
    last_at: Instant,
    sample: GestureSample,
}

impl GestureSampler {
    pub fn new() -> Self {
        Self {
            active: false,
            origin_x: 0.0,
            origin_y: 0.0,
            last_x: 0.0,
            last_y: 0.0,
            last_at: Instant::now(),
            sample: GestureSample::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start tracking a new gesture at `(x, y)` in device-independent units.
    pub fn begin(&mut self, x: f32, y: f32, now: Instant) {
        self.active = true;
        self.origin_x = x;
        self.origin_y = y;
        self.last_x = x;
        self.last_y = y;
        self.last_at = now;
        self.sample = GestureSample::default();
    }

    /// Fold a pointer-move into the rolling sample and return it.
    /// Ignored when no gesture is active.
    pub fn update(&mut self, x: f32, y: f32, now: Instant) -> Option<GestureSample> {
        if !self.active {
            return None;
        }
        let dt = now.saturating_duration_since(self.last_at).as_secs_f32();
        if dt > 0.0 {
            self.sample.vx = (x - self.last_x) / dt;
            self.sample.vy = (y - self.last_y) / dt;
        }
        // Same-instant events keep the previous velocity.
        self.sample.dx = x - self.origin_x;
        self.sample.dy = y - self.origin_y;
        self.last_x = x;
        self.last_y = y;
        self.last_at = now;
        Some(self.sample)
    }

    /// Terminate the gesture, handing back the final sample. The sampler
    /// keeps nothing once the gesture is released.
    pub fn finish(&mut self) -> GestureSample {
        self.active = false;
        std::mem::take(&mut self.sample)
    }
}

impl Default for GestureSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn displacement_is_cumulative_since_press() {
        let t0 = Instant::now();
        let mut sampler = GestureSampler::new();
        sampler.begin(100.0, 200.0, t0);
        sampler.update(110.0, 195.0, t0 + Duration::from_millis(10));
        let s = sampler.update(130.0, 180.0, t0 + Duration::from_millis(20)).unwrap();
        assert_eq!(s.dx, 30.0);
        assert_eq!(s.dy, -20.0);
    }

    #[test]
    fn velocity_is_instantaneous_between_last_two_events() {
        let t0 = Instant::now();
        let mut sampler = GestureSampler::new();
        sampler.begin(0.0, 0.0, t0);
        // 40 units in 10 ms on the second step only.
        sampler.update(0.0, 0.0, t0 + Duration::from_millis(100));
        let s = sampler.update(40.0, 0.0, t0 + Duration::from_millis(110)).unwrap();
        assert!((s.vx - 4000.0).abs() < 1.0);
        assert_eq!(s.vy, 0.0);
    }

    #[test]
    fn same_instant_event_keeps_previous_velocity() {
        let t0 = Instant::now();
        let mut sampler = GestureSampler::new();
        sampler.begin(0.0, 0.0, t0);
        sampler.update(10.0, 0.0, t0 + Duration::from_millis(10));
        let before = sampler.update(20.0, 0.0, t0 + Duration::from_millis(20)).unwrap();
        let same = sampler.update(25.0, 0.0, t0 + Duration::from_millis(20)).unwrap();
        assert_eq!(same.vx, before.vx);
        assert_eq!(same.dx, 25.0);
    }

    #[test]
    fn finish_discards_the_sample() {
        let t0 = Instant::now();
        let mut sampler = GestureSampler::new();
        sampler.begin(0.0, 0.0, t0);
        sampler.update(50.0, 0.0, t0 + Duration::from_millis(10));
        let final_sample = sampler.finish();
        assert_eq!(final_sample.dx, 50.0);
        assert!(!sampler.is_active());
        assert!(sampler.update(60.0, 0.0, t0 + Duration::from_millis(20)).is_none());
    }
}

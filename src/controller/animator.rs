//! Card transition animator
//!
//! Drives the active card's translate/rotate/scale and the next card's
//! preview scale/opacity as one cancellable motion at a time. Non-Cancel
//! outcomes run a timed exit that resolves a completion exactly once; Cancel
//! and the boundary bounce settle back to rest with a spring and resolve
//! nothing. Run ids let the stack controller discard stale completions.

use std::time::{Duration, Instant};

use crate::model::{CardTransform, GestureSample, Outcome, PreviewTransform, Viewport};

pub const EXIT_DURATION: Duration = Duration::from_millis(300);
const BOUNCE_PUSH_DURATION: Duration = Duration::from_millis(150);
const BOUNCE_PUSH_X: f32 = -50.0;

const SPRING_TENSION: f32 = 100.0;
const SPRING_FRICTION: f32 = 8.0;
/// Spring integration substep; keeps explicit integration stable when the
/// frame loop stalls.
const SPRING_STEP: f32 = 1.0 / 240.0;

/// Active-card scale feedback kicks in past this drag magnitude.
const SCALE_FEEDBACK_THRESHOLD: f32 = 100.0;
const ROTATION_FACTOR: f32 = 20.0;
const ROTATION_CLAMP: f32 = 15.0;

/// Emitted exactly once when a committed exit finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub run: u64,
    pub outcome: Outcome,
}

#[derive(Clone, Copy, Debug, Default)]
struct SpringVelocity {
    tx: f32,
    ty: f32,
    rotation: f32,
    scale: f32,
    preview_scale: f32,
    preview_opacity: f32,
}

#[derive(Clone, Debug)]
enum Motion {
    Rest,
    /// Transforms are driven directly by the gesture sampler.
    Dragging,
    /// Committed exit trajectory; resolves its completion at the end.
    Exit {
        run: u64,
        outcome: Outcome,
        from: CardTransform,
        to: CardTransform,
        start: Instant,
        resolved: bool,
    },
    /// First leg of the boundary reject: a short push left.
    BouncePush { from: CardTransform, start: Instant },
    /// Spring of every component back to rest. Interruptible.
    Settle { velocity: SpringVelocity, last: Instant },
}

pub struct Animator {
    card: CardTransform,
    preview: PreviewTransform,
    motion: Motion,
    next_run: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self {
            card: CardTransform::REST,
            preview: PreviewTransform::REST,
            motion: Motion::Rest,
            next_run: 0,
        }
    }

    pub fn card(&self) -> CardTransform {
        self.card
    }

    pub fn preview(&self) -> PreviewTransform {
        self.preview
    }

    /// True while a committed exit has not yet resolved its completion.
    pub fn exit_in_flight(&self) -> bool {
        matches!(self.motion, Motion::Exit { resolved: false, .. })
    }

    pub fn is_at_rest(&self) -> bool {
        matches!(self.motion, Motion::Rest)
    }

    /// Claim the transforms for a new gesture. Refused while a committed
    /// exit is still unresolved; otherwise all transform state snaps back to
    /// rest first, interrupting any settle in progress.
    pub fn begin_gesture(&mut self) -> bool {
        if self.exit_in_flight() {
            return false;
        }
        self.reset();
        self.motion = Motion::Dragging;
        true
    }

    /// Passive drag feedback from the live sample: rotation proportional to
    /// dx, scale nudge past the soft threshold, preview interpolated by
    /// progress = |dx| / viewport width.
    pub fn apply_drag(&mut self, sample: &GestureSample, viewport: &Viewport) {
        if !matches!(self.motion, Motion::Dragging) {
            return;
        }
        self.card.translate_x = sample.dx;
        self.card.translate_y = sample.dy;
        self.card.rotation = (sample.dx / viewport.width * ROTATION_FACTOR)
            .clamp(-ROTATION_CLAMP, ROTATION_CLAMP);
        self.card.scale = if sample.dx.abs() > SCALE_FEEDBACK_THRESHOLD {
            0.95
        } else if sample.dy < -SCALE_FEEDBACK_THRESHOLD {
            1.05
        } else {
            1.0
        };
        let progress = (sample.dx.abs() / viewport.width).clamp(0.0, 1.0);
        self.preview.scale = 0.9 + progress * 0.1;
        self.preview.opacity = 0.8 + progress * 0.2;
    }

    /// Start the timed exit for a committed outcome, returning the run id
    /// its completion will carry. Cancel has no exit trajectory.
    pub fn start_exit(&mut self, outcome: Outcome, viewport: &Viewport, now: Instant) -> Option<u64> {
        let from = self.card;
        let to = match outcome {
            Outcome::Like => CardTransform {
                translate_x: from.translate_x,
                translate_y: -viewport.height,
                rotation: 0.0,
                scale: 0.8,
            },
            Outcome::Advance => CardTransform {
                translate_x: viewport.width * 1.5,
                translate_y: from.translate_y,
                rotation: 30.0,
                scale: 0.8,
            },
            Outcome::Retreat => CardTransform {
                translate_x: -viewport.width * 1.5,
                translate_y: from.translate_y,
                rotation: -30.0,
                scale: 0.8,
            },
            Outcome::Cancel => {
                tracing::error!("Cancel has no exit trajectory");
                self.start_settle(now);
                return None;
            }
        };
        self.next_run += 1;
        let run = self.next_run;
        self.motion = Motion::Exit { run, outcome, from, to, start: now, resolved: false };
        Some(run)
    }

    /// Boundary reject: short push left, then spring home. Never resolves a
    /// completion.
    pub fn start_bounce(&mut self, now: Instant) {
        self.motion = Motion::BouncePush { from: self.card, start: now };
    }

    /// Spring every transform back to rest (the Cancel path).
    pub fn start_settle(&mut self, now: Instant) {
        self.motion = Motion::Settle { velocity: SpringVelocity::default(), last: now };
    }

    /// Snap all transform state to rest and drop any pending motion.
    pub fn reset(&mut self) {
        self.card = CardTransform::REST;
        self.preview = PreviewTransform::REST;
        self.motion = Motion::Rest;
    }

    /// Step the active motion to `now`. Returns the completion of a finished
    /// exit exactly once; every later call returns `None` until a new exit
    /// starts.
    pub fn advance(&mut self, now: Instant) -> Option<Completion> {
        match &mut self.motion {
            Motion::Rest | Motion::Dragging => None,
            Motion::Exit { run, outcome, from, to, start, resolved } => {
                if *resolved {
                    return None;
                }
                let t = progress(*start, now, EXIT_DURATION);
                self.card = lerp_transform(from, to, ease_in_out(t));
                if t >= 1.0 {
                    *resolved = true;
                    Some(Completion { run: *run, outcome: *outcome })
                } else {
                    None
                }
            }
            Motion::BouncePush { from, start } => {
                let t = progress(*start, now, BOUNCE_PUSH_DURATION);
                self.card.translate_x =
                    from.translate_x + (BOUNCE_PUSH_X - from.translate_x) * ease_in_out(t);
                if t >= 1.0 {
                    self.start_settle(now);
                }
                None
            }
            Motion::Settle { velocity, last } => {
                let mut remaining = now.saturating_duration_since(*last).as_secs_f32();
                *last = now;
                while remaining > 0.0 {
                    let dt = remaining.min(SPRING_STEP);
                    remaining -= dt;
                    step_spring(&mut self.card.translate_x, &mut velocity.tx, 0.0, dt);
                    step_spring(&mut self.card.translate_y, &mut velocity.ty, 0.0, dt);
                    step_spring(&mut self.card.rotation, &mut velocity.rotation, 0.0, dt);
                    step_spring(&mut self.card.scale, &mut velocity.scale, 1.0, dt);
                    step_spring(
                        &mut self.preview.scale,
                        &mut velocity.preview_scale,
                        PreviewTransform::REST.scale,
                        dt,
                    );
                    step_spring(
                        &mut self.preview.opacity,
                        &mut velocity.preview_opacity,
                        PreviewTransform::REST.opacity,
                        dt,
                    );
                }
                if settled(&self.card, &self.preview, velocity) {
                    self.reset();
                }
                None
            }
        }
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

fn progress(start: Instant, now: Instant, duration: Duration) -> f32 {
    let elapsed = now.saturating_duration_since(start).as_secs_f32();
    (elapsed / duration.as_secs_f32()).clamp(0.0, 1.0)
}

fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_transform(from: &CardTransform, to: &CardTransform, t: f32) -> CardTransform {
    CardTransform {
        translate_x: lerp(from.translate_x, to.translate_x, t),
        translate_y: lerp(from.translate_y, to.translate_y, t),
        rotation: lerp(from.rotation, to.rotation, t),
        scale: lerp(from.scale, to.scale, t),
    }
}

fn step_spring(pos: &mut f32, vel: &mut f32, target: f32, dt: f32) {
    let acc = SPRING_TENSION * (target - *pos) - SPRING_FRICTION * *vel;
    *vel += acc * dt;
    *pos += *vel * dt;
}

fn settled(card: &CardTransform, preview: &PreviewTransform, vel: &SpringVelocity) -> bool {
    card.translate_x.abs() < 0.5
        && card.translate_y.abs() < 0.5
        && card.rotation.abs() < 0.1
        && (card.scale - 1.0).abs() < 0.005
        && (preview.scale - PreviewTransform::REST.scale).abs() < 0.005
        && (preview.opacity - PreviewTransform::REST.opacity).abs() < 0.005
        && vel.tx.abs() < 1.0
        && vel.ty.abs() < 1.0
        && vel.rotation.abs() < 0.5
        && vel.scale.abs() < 0.05
}

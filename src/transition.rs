// Cross-fade state machine. Whenever new background content is committed the
// frame on screen at that instant is captured and blended toward the freshly
// rendered pipeline output over a fixed duration with a cubic ease-out.
// Retriggering mid-flight just restarts the clock and swaps in whatever was
// visible at that moment — last trigger wins, nothing is queued or cancelled.

use crate::error::Error;
use crate::types::{mix, RenderTarget};

/// Fixed cross-fade duration, seconds. Wall-clock driven; the only
/// time-boxed behavior in the core.
pub const TRANSITION_SECS: f32 = 0.4;

enum State {
    Idle,
    Transitioning { start: f32 },
}

pub struct TransitionController {
    state: State,
    /// The frame being faded *from*.
    previous: RenderTarget,
    /// Whatever was last presented; becomes `previous` on the next trigger.
    snapshot: RenderTarget,
}

impl TransitionController {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        Ok(Self {
            state: State::Idle,
            previous: RenderTarget::new(width, height)?,
            snapshot: RenderTarget::new(width, height)?,
        })
    }

    /// Replace both owned frames at a new size. Any in-flight fade is
    /// abandoned: there is no meaningful previous frame at the new size.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), Error> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Transitioning { .. })
    }

    /// Start (or restart) a fade at `now`: the last-presented frame becomes
    /// the blend source. Starting overwrites — re-triggering needs no
    /// cancellation step.
    pub fn begin(&mut self, now: f32) {
        std::mem::swap(&mut self.previous, &mut self.snapshot);
        self.state = State::Transitioning { start: now };
    }

    /// Eased blend weight at `now`: 0 = all previous frame, 1 = all current.
    pub fn blend_weight(&self, now: f32) -> f32 {
        match self.state {
            State::Idle => 1.0,
            State::Transitioning { start } => {
                let ratio = ((now - start) / TRANSITION_SECS).clamp(0.0, 1.0);
                let inv = 1.0 - ratio;
                1.0 - inv * inv * inv // cubic ease-out
            }
        }
    }

    /// Produce the presented frame for this tick into `out` and cache it as
    /// the next trigger's blend source. Flips back to Idle once the fade
    /// completes.
    pub fn compose(&mut self, now: f32, current: &RenderTarget, out: &mut RenderTarget) {
        match self.state {
            State::Idle => out.copy_from(current),
            State::Transitioning { start } => {
                let weight = self.blend_weight(now);
                for (o, (p, c)) in out
                    .texels
                    .iter_mut()
                    .zip(self.previous.texels.iter().zip(current.texels.iter()))
                {
                    for ch in 0..4 {
                        o[ch] = mix(p[ch], c[ch], weight);
                    }
                }
                if now - start >= TRANSITION_SECS {
                    self.state = State::Idle;
                }
            }
        }
        self.snapshot.copy_from(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(wh: usize, v: f32) -> RenderTarget {
        let mut t = RenderTarget::new(wh, wh).unwrap();
        t.fill([v, v, v, 1.0]);
        t
    }

    #[test]
    fn idle_forwards_the_current_frame() {
        let mut tc = TransitionController::new(4, 4).unwrap();
        let cur = flat(4, 0.6);
        let mut out = RenderTarget::new(4, 4).unwrap();
        tc.compose(0.0, &cur, &mut out);
        assert!(!tc.is_active());
        assert_eq!(out.texels[0], [0.6, 0.6, 0.6, 1.0]);
    }

    #[test]
    fn blend_weight_is_monotone_and_completes() {
        let mut tc = TransitionController::new(4, 4).unwrap();
        // Establish a visible frame, then trigger.
        let old = flat(4, 0.0);
        let mut out = RenderTarget::new(4, 4).unwrap();
        tc.compose(0.0, &old, &mut out);
        tc.begin(0.0);

        let cur = flat(4, 1.0);
        let mut last_w = -1.0f32;
        let mut t = 0.0f32;
        while t < TRANSITION_SECS {
            let w = tc.blend_weight(t);
            assert!(w >= last_w, "blend weight decreased at t={t}");
            last_w = w;
            tc.compose(t, &cur, &mut out);
            assert!((out.texels[0][0] - w).abs() < 1e-5);
            t += 0.05;
        }
        // At/after the deadline: ratio clamps to 1 and the machine idles.
        tc.compose(TRANSITION_SECS, &cur, &mut out);
        assert!(!tc.is_active());
        assert_eq!(out.texels[0][0], 1.0);
    }

    #[test]
    fn no_jump_at_trigger_instant() {
        let mut tc = TransitionController::new(4, 4).unwrap();
        let old = flat(4, 0.8);
        let mut out = RenderTarget::new(4, 4).unwrap();
        tc.compose(0.0, &old, &mut out);
        tc.begin(0.0);
        // At the trigger instant the blend weight is 0: the presented frame
        // is exactly the captured previous frame.
        let cur = flat(4, 0.1);
        tc.compose(0.0, &cur, &mut out);
        assert!((out.texels[0][0] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn retrigger_restarts_from_the_frame_visible_at_that_instant() {
        let mut tc = TransitionController::new(4, 4).unwrap();
        let first = flat(4, 0.0);
        let mut out = RenderTarget::new(4, 4).unwrap();
        tc.compose(0.0, &first, &mut out);

        // Trigger at t=0 toward a bright frame; retrigger at t=0.1.
        tc.begin(0.0);
        let second = flat(4, 1.0);
        tc.compose(0.1, &second, &mut out);
        let visible_at_retrigger = out.texels[0][0];
        assert!(visible_at_retrigger > 0.0 && visible_at_retrigger < 1.0);

        tc.begin(0.1);
        assert!(tc.is_active());
        // Elapsed time is measured from the new trigger...
        assert_eq!(tc.blend_weight(0.1), 0.0);
        // ...and the blend source is the frame visible at t=0.1, not t=0.
        let third = flat(4, 0.5);
        tc.compose(0.1, &third, &mut out);
        assert!((out.texels[0][0] - visible_at_retrigger).abs() < 1e-5);

        // Only one transition exists; it finishes on its own schedule.
        tc.compose(0.1 + TRANSITION_SECS, &third, &mut out);
        assert!(!tc.is_active());
        assert_eq!(out.texels[0][0], 0.5);
    }
}

// End-to-end pipeline behavior: resize atomicity, transition protocol under
// re-triggering, failure handling, and the pass-through degenerate chain.

use liquid_glass::config::GlassConfig;
use liquid_glass::content::{ContentGenerator, FillRule, IconSource, Placement};
use liquid_glass::error::Error;
use liquid_glass::pipeline::LiquidGlass;
use liquid_glass::targets::quarter;
use liquid_glass::transition::TRANSITION_SECS;
use liquid_glass::types::{Color, RenderTarget};

/// Paints the whole background with the vector icon's fill color (or the
/// backdrop when there is no icon). Lets tests drive background changes with
/// exact, predictable colors.
struct SolidGenerator;

impl ContentGenerator for SolidGenerator {
    fn generate(
        &self,
        icon: &IconSource,
        _placement: Placement,
        backdrop: Color,
        width: usize,
        height: usize,
    ) -> Result<RenderTarget, Error> {
        let mut bg = RenderTarget::new(width, height)?;
        let fill = match icon {
            IconSource::Path { color, .. } => *color,
            _ => backdrop,
        };
        bg.fill(fill);
        Ok(bg)
    }
}

/// Always refuses; models a malformed icon / failed decode.
struct FailingGenerator;

impl ContentGenerator for FailingGenerator {
    fn generate(
        &self,
        icon: &IconSource,
        _placement: Placement,
        backdrop: Color,
        width: usize,
        height: usize,
    ) -> Result<RenderTarget, Error> {
        // Succeed exactly once so the pipeline can be constructed.
        if matches!(icon, IconSource::None) {
            let mut bg = RenderTarget::new(width, height)?;
            bg.fill(backdrop);
            return Ok(bg);
        }
        Err(Error::ContentGeneration("malformed icon data".into()))
    }
}

fn solid_icon(color: Color) -> IconSource {
    IconSource::Path { data: String::new(), fill_rule: FillRule::NonZero, color }
}

fn bare_glass(width: usize, height: usize) -> LiquidGlass {
    // Every effect disabled; SolidGenerator for deterministic backgrounds.
    let cfg = GlassConfig { width, height, ..GlassConfig::default() };
    LiquidGlass::with_generator(cfg, Box::new(SolidGenerator)).unwrap()
}

#[test]
fn disabled_chain_output_is_bit_identical_to_the_composite() {
    let mut glass = bare_glass(48, 36);
    glass.tick_at(0.0);
    let t = glass.targets();
    assert_eq!(t.output.texels, t.composite.texels);
}

#[test]
fn resize_sequences_resize_every_target_exactly() {
    let mut glass = bare_glass(64, 64);
    for (w, h) in [(128, 96), (7, 300), (1, 1), (640, 480)] {
        glass.resize(w, h).unwrap();
        assert_eq!(glass.size(), (w, h));
        let t = glass.targets();
        for full in [&t.composite, &t.fx_a, &t.fx_b, &t.output] {
            assert_eq!((full.width, full.height), (w, h));
        }
        for q in [&t.normal, &t.blur_tmp, &t.blur_out] {
            assert_eq!((q.width, q.height), (quarter(w), quarter(h)));
        }
        assert_eq!((glass.background().width, glass.background().height), (w, h));
        // The replaced set renders immediately.
        let frame = glass.tick_at(0.0);
        assert_eq!((frame.width, frame.height), (w, h));
    }
}

#[test]
fn icon_swap_starts_a_transition_that_finishes_on_schedule() {
    let mut glass = bare_glass(32, 24);
    let before = glass.tick_at(0.0).texels.clone();

    glass.set_icon_at(0.0, solid_icon([0.9, 0.1, 0.1, 1.0]), Placement::default()).unwrap();
    assert!(glass.is_transitioning());

    // At the trigger instant, the presented frame is still the old one.
    let at_trigger = glass.tick_at(0.0).texels.clone();
    assert_eq!(at_trigger, before);

    // Mid-flight: somewhere strictly between old and new.
    let mid = glass.tick_at(TRANSITION_SECS * 0.5).texels.clone();
    assert_ne!(mid, before);
    assert!(glass.is_transitioning());

    // At the deadline the fade completes and the machine idles.
    let done = glass.tick_at(TRANSITION_SECS).texels.clone();
    assert!(!glass.is_transitioning());
    assert_ne!(done, mid);
    // Steady state from here on.
    let later = glass.tick_at(TRANSITION_SECS + 1.0).texels.clone();
    assert_eq!(done, later);
}

#[test]
fn double_swap_within_the_duration_restarts_from_the_visible_frame() {
    let mut glass = bare_glass(32, 24);
    glass.tick_at(0.0);

    // First replacement at t=0, second at t=0.1 — inside the 0.4 s fade.
    glass.set_icon_at(0.0, solid_icon([0.9, 0.1, 0.1, 1.0]), Placement::default()).unwrap();
    let visible_at_retrigger = glass.tick_at(0.1).texels.clone();

    glass.set_icon_at(0.1, solid_icon([0.1, 0.9, 0.1, 1.0]), Placement::default()).unwrap();
    assert!(glass.is_transitioning());

    // Elapsed time restarted: at the retrigger instant the output is exactly
    // the frame that was on screen then — not the t=0 frame, and no jump.
    let restarted = glass.tick_at(0.1).texels.clone();
    assert_eq!(restarted, visible_at_retrigger);

    // Only one transition exists; it completes relative to the retrigger.
    glass.tick_at(0.1 + TRANSITION_SECS * 0.9);
    assert!(glass.is_transitioning());
    glass.tick_at(0.1 + TRANSITION_SECS);
    assert!(!glass.is_transitioning());
}

#[test]
fn failed_generation_keeps_the_last_good_background() {
    let cfg = GlassConfig { width: 32, height: 32, ..GlassConfig::default() };
    let mut glass = LiquidGlass::with_generator(cfg, Box::new(FailingGenerator)).unwrap();
    let before = glass.tick_at(0.0).texels.clone();

    let err = glass.set_icon_at(0.1, solid_icon([1.0, 0.0, 0.0, 1.0]), Placement::default());
    assert!(matches!(err, Err(Error::ContentGeneration(_))));
    // No transition started, and the pipeline keeps rendering the old
    // background rather than corrupting state.
    assert!(!glass.is_transitioning());
    let after = glass.tick_at(0.2).texels.clone();
    assert_eq!(after, before);
}

#[test]
fn stationary_pointer_renders_a_steady_frame() {
    // With no pointer motion and no time-varying effect enabled, the whole
    // pipeline is a fixed point: consecutive frames are identical.
    let mut glass = bare_glass(40, 30);
    let first = glass.tick_at(0.0).texels.clone();
    for i in 1..20 {
        let frame = glass.tick_at(i as f32 * 0.016).texels.clone();
        assert_eq!(frame, first);
    }
}

#[test]
fn dispose_consumes_the_pipeline() {
    let glass = bare_glass(16, 16);
    glass.dispose(); // a second call would not compile — teardown is single-shot
}

// Construction-time configuration plus the one runtime-mergeable piece
// (wave parameters). No validation anywhere: out-of-range numbers give
// visually degenerate output, never a crash.

use crate::content::{IconSource, Placement};
use crate::types::Color;

/// Parameters driving the wave simulation. Externally settable at any time;
/// a change takes effect on the next tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    /// Per-substep exponential decay applied to velocity AND height.
    pub damping: f32,
    /// Propagation speed; enters the update squared.
    pub speed: f32,
    /// Pointer interaction radius in v-axis units (aspect-corrected).
    pub radius: f32,
    /// Energy injected per unit of pointer travel.
    pub intensity: f32,
    /// Pointer smoothing factor: 0 = frozen, 1 = instantaneous tracking.
    pub momentum: f32,
    /// Simulation sub-steps per tick.
    pub steps: u32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            damping: 0.8,
            speed: 1.0,
            radius: 0.025,
            intensity: 20.0,
            momentum: 0.4,
            steps: 1,
        }
    }
}

/// A partial wave-parameter update: every field optional, merged onto the
/// live config with `apply_to`. This is the explicit apply-patch operation —
/// no field-by-field reflection.
#[derive(Clone, Copy, Debug, Default)]
pub struct WavePatch {
    pub damping: Option<f32>,
    pub speed: Option<f32>,
    pub radius: Option<f32>,
    pub intensity: Option<f32>,
    pub momentum: Option<f32>,
    pub steps: Option<u32>,
}

impl WavePatch {
    pub fn apply_to(&self, params: &mut WaveParams) {
        if let Some(v) = self.damping {
            params.damping = v;
        }
        if let Some(v) = self.speed {
            params.speed = v;
        }
        if let Some(v) = self.radius {
            params.radius = v;
        }
        if let Some(v) = self.intensity {
            params.intensity = v;
        }
        if let Some(v) = self.momentum {
            params.momentum = v;
        }
        if let Some(v) = self.steps {
            params.steps = v;
        }
    }
}

/* ---------- per-effect parameter blocks ----------
   `Option<P>` in GlassConfig encodes the three states from the contract:
   None = disabled, Some(P::default()) = defaults, and a partial override is
   plain struct-update syntax: `Some(HalftoneParams { angle: 0.6, ..Default::default() })`. */

#[derive(Clone, Copy, Debug)]
pub struct HalftoneParams {
    /// Base dot color, blended toward the local background hue.
    pub tint: Color,
    /// Grid period in output pixels, relative to a 1080p-tall frame.
    pub scale: f32,
    /// Grid rotation in radians.
    pub angle: f32,
    /// How strongly dots overlay the source image.
    pub opacity: f32,
}

impl Default for HalftoneParams {
    fn default() -> Self {
        Self {
            tint: [0.95, 0.9, 0.82, 1.0],
            scale: 9.0,
            angle: 0.35,
            opacity: 0.55,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ChromaParams {
    /// Channel-split magnitude in uv units.
    pub amount: f32,
}

impl Default for ChromaParams {
    fn default() -> Self {
        Self { amount: 0.004 }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ScanlineParams {
    /// Cell size in output pixels, relative to a 1080p-tall frame.
    pub cell: f32,
    /// Overall strength of the CRT look (sub-bands, edge darkening).
    pub intensity: f32,
}

impl Default for ScanlineParams {
    fn default() -> Self {
        Self { cell: 7.0, intensity: 0.8 }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct VignetteParams {
    /// 0 = invisible, 1 = black past the outer radius.
    pub intensity: f32,
}

impl Default for VignetteParams {
    fn default() -> Self {
        Self { intensity: 0.65 }
    }
}

/// Everything the pipeline needs at construction.
pub struct GlassConfig {
    /// Output size in logical pixels; multiplied by `pixel_density`.
    pub width: usize,
    pub height: usize,
    /// Output pixel-density scale (e.g. 2.0 on a hidpi surface).
    pub pixel_density: f32,
    /// Initial icon and its placement over the backdrop.
    pub icon: IconSource,
    pub placement: Placement,
    /// Backdrop color behind the icon, linear RGBA.
    pub backdrop: Color,
    pub wave: WaveParams,
    /// The five optional post effects, in their fixed chain order.
    pub halftone_a: Option<HalftoneParams>,
    pub halftone_b: Option<HalftoneParams>,
    pub chroma: Option<ChromaParams>,
    pub scanline: Option<ScanlineParams>,
    pub vignette: Option<VignetteParams>,
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            pixel_density: 1.0,
            icon: IconSource::None,
            placement: Placement::default(),
            backdrop: [0.07, 0.09, 0.13, 1.0],
            wave: WaveParams::default(),
            halftone_a: None,
            halftone_b: None,
            chroma: None,
            scanline: None,
            vignette: None,
        }
    }
}

// The stylistic post-effect chain: two tinted halftone layers, chromatic
// aberration, retro scanlines, vignette — in that fixed order, each one
// independently toggleable. Enabled stages are resolved once at construction
// into an ordered list; running the chain ping-pongs between two buffers,
// and disabled stages simply never appear (no pass, no buffer change).

use crate::config::{ChromaParams, GlassConfig, HalftoneParams, ScanlineParams, VignetteParams};
use crate::types::{boost_saturation, luminance, mix, mix3, smoothstep, Color, RenderTarget};

/// Alpha below this counts as fully transparent and passes through untouched.
const ALPHA_EPS: f32 = 1e-3;

/// Effect pixel parameters are tuned against a 1080-tall frame and scaled by
/// the actual output height, so the look is consistent at any resolution.
const REFERENCE_HEIGHT: f32 = 1080.0;

/// Which halftone layer a stage belongs to; only layer B's tint is
/// runtime-settable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalftoneLayer {
    A,
    B,
}

pub enum EffectStage {
    Halftone { layer: HalftoneLayer, params: HalftoneParams },
    Chroma(ChromaParams),
    Scanline(ScanlineParams),
    Vignette(VignetteParams),
}

/// Which buffer holds the chain's final image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainOutput {
    /// No enabled stage ran; the composite pass's output is final as-is.
    Composite,
    FxA,
    FxB,
}

pub struct EffectChain {
    stages: Vec<EffectStage>,
}

impl EffectChain {
    /// Resolve the enabled subset once, in the fixed relative order.
    pub fn from_config(cfg: &GlassConfig) -> Self {
        let mut stages = Vec::new();
        if let Some(p) = cfg.halftone_a {
            stages.push(EffectStage::Halftone { layer: HalftoneLayer::A, params: p });
        }
        if let Some(p) = cfg.halftone_b {
            stages.push(EffectStage::Halftone { layer: HalftoneLayer::B, params: p });
        }
        if let Some(p) = cfg.chroma {
            stages.push(EffectStage::Chroma(p));
        }
        if let Some(p) = cfg.scanline {
            stages.push(EffectStage::Scanline(p));
        }
        if let Some(p) = cfg.vignette {
            stages.push(EffectStage::Vignette(p));
        }
        Self { stages }
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Update the second halftone layer's tint. A no-op when that layer is
    /// disabled; never triggers a transition.
    pub fn set_tint(&mut self, tint: Color) {
        for stage in &mut self.stages {
            if let EffectStage::Halftone { layer: HalftoneLayer::B, params } = stage {
                params.tint = tint;
            }
        }
    }

    /// Run every enabled stage, ping-ponging between `fx_a` and `fx_b` with
    /// `composite` as the initial source. Returns where the final image ended
    /// up; with no stages enabled this is the untouched composite output.
    pub fn run(
        &self,
        composite: &RenderTarget,
        background: &RenderTarget,
        fx_a: &mut RenderTarget,
        fx_b: &mut RenderTarget,
        time: f32,
    ) -> ChainOutput {
        let mut src = ChainOutput::Composite;
        for stage in &self.stages {
            let dst = if src == ChainOutput::FxA { ChainOutput::FxB } else { ChainOutput::FxA };
            match (src, dst) {
                (ChainOutput::Composite, ChainOutput::FxA) => {
                    apply(stage, composite, background, fx_a, time)
                }
                (ChainOutput::FxA, ChainOutput::FxB) => apply(stage, fx_a, background, fx_b, time),
                (ChainOutput::FxB, ChainOutput::FxA) => apply(stage, fx_b, background, fx_a, time),
                _ => unreachable!("ping-pong never writes the buffer it reads"),
            }
            src = dst;
        }
        src
    }
}

fn apply(
    stage: &EffectStage,
    src: &RenderTarget,
    background: &RenderTarget,
    dst: &mut RenderTarget,
    time: f32,
) {
    match stage {
        EffectStage::Halftone { params, .. } => halftone(src, background, dst, params),
        EffectStage::Chroma(p) => chroma(src, dst, p, time),
        EffectStage::Scanline(p) => scanline(src, background, dst, p, time),
        EffectStage::Vignette(p) => vignette(src, dst, p),
    }
}

/* ---------------------------- halftone ---------------------------- */

/// Luminance → rotated dot grid. Dot color blends the configured tint with a
/// saturation-boosted local background sample once brightness crosses a low
/// threshold, so dots pick up nearby artwork color.
fn halftone(src: &RenderTarget, background: &RenderTarget, dst: &mut RenderTarget, p: &HalftoneParams) {
    let w = src.width;
    let h = src.height;
    let cell = (p.scale * h as f32 / REFERENCE_HEIGHT).max(1.0);
    let (sin_a, cos_a) = p.angle.sin_cos();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let s = src.texels[i];
            if s[3] <= ALPHA_EPS {
                dst.texels[i] = s; // fully transparent stays transparent
                continue;
            }
            let lum = luminance(s).clamp(0.0, 1.0);

            // Rotated, scaled periodic grid in pixel space.
            let xf = x as f32;
            let yf = y as f32;
            let xr = cos_a * xf - sin_a * yf;
            let yr = sin_a * xf + cos_a * yf;
            let gx = (xr / cell).fract() - 0.5;
            let gy = (yr / cell).fract() - 0.5;
            // f32::fract keeps the sign; shift negatives into the cell.
            let gx = if gx < -0.5 { gx + 1.0 } else { gx };
            let gy = if gy < -0.5 { gy + 1.0 } else { gy };
            let d = (gx * gx + gy * gy).sqrt() * 2.0;

            // Dot radius grows with brightness; soft edge via reversed-edge
            // smoothstep (1 inside the dot, 0 outside).
            let radius = lum.sqrt() * 0.85;
            let mask = smoothstep(radius, radius - 0.3, d);

            let (u, v) = src.uv_at(x, y);
            let local = boost_saturation(background.sample(u, v), 1.7);
            let adapt = smoothstep(0.08, 0.35, lum);
            let tint = mix3([p.tint[0], p.tint[1], p.tint[2]], local, adapt);

            let k = mask * p.opacity;
            dst.texels[i] = [
                mix(s[0], tint[0], k),
                mix(s[1], tint[1], k),
                mix(s[2], tint[2], k),
                s[3],
            ];
        }
    }
}

/* ----------------------- chromatic aberration ----------------------- */

/// Angular speed of the split direction, radians per second.
const CHROMA_ROT_SPEED: f32 = 0.9;

/// Red and blue sampled at opposite offsets along a direction that rotates
/// continuously over time; alpha becomes the max of the three samples.
fn chroma(src: &RenderTarget, dst: &mut RenderTarget, p: &ChromaParams, time: f32) {
    let w = src.width;
    let h = src.height;
    let ang = time * CHROMA_ROT_SPEED;
    let dx = ang.cos() * p.amount;
    let dy = ang.sin() * p.amount;

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let (u, v) = src.uv_at(x, y);
            let r = src.sample(u + dx, v + dy);
            let g = src.texels[i];
            let b = src.sample(u - dx, v - dy);
            dst.texels[i] = [r[0], g[1], b[2], r[3].max(g[3]).max(b[3])];
        }
    }
}

/* ---------------------------- retro scanline ---------------------------- */

/// Staggered-cell CRT look: brick-pattern cells, per-cell 3×3 glow, RGB
/// sub-bands, darkened cell edges, 8-level quantization, slow flicker, and a
/// color-adaptive retint from the local background.
fn scanline(src: &RenderTarget, background: &RenderTarget, dst: &mut RenderTarget, p: &ScanlineParams, time: f32) {
    let w = src.width;
    let h = src.height;
    let cell = (p.cell * h as f32 / REFERENCE_HEIGHT).max(2.0);
    let k = p.intensity.clamp(0.0, 1.0);

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let s = src.texels[i];
            if s[3] <= ALPHA_EPS {
                dst.texels[i] = s; // out-of-bounds / transparent passes through
                continue;
            }

            let xf = x as f32;
            // Slow positional flicker: the row drifts a fraction of a pixel.
            let col = (xf / cell).floor();
            let flicker = (time * 0.6 + col * 0.13).sin() * 0.35;
            let yf = y as f32 + flicker;

            // Odd columns shift down half a cell: the brick pattern.
            let stagger = if (col as i64).rem_euclid(2) == 1 { cell * 0.5 } else { 0.0 };
            let ys = yf + stagger;
            let row = (ys / cell).floor();

            // Cell-center sample plus a 3×3 box blur over neighboring cell
            // centers (each neighbor staggered by its own column parity).
            let center = cell_center_sample(src, col, row, cell, 0, 0);
            let mut glow = [0.0f32; 3];
            for dr in -1i32..=1 {
                for dc in -1i32..=1 {
                    let c = cell_center_sample(src, col, row, cell, dc, dr);
                    for ch in 0..3 {
                        glow[ch] += c[ch];
                    }
                }
            }
            for ch in 0..3 {
                glow[ch] /= 9.0;
            }
            let base = mix3([center[0], center[1], center[2]], glow, 0.5);

            // Three vertical sub-bands per cell with soft falloff: R left,
            // G middle, B right, like CRT sub-pixels.
            let fx = (xf / cell) - col;
            let fy = ys / cell - row;
            let mut rgb = [0.0f32; 3];
            for ch in 0..3 {
                let band_center = (ch as f32 + 0.5) / 3.0;
                let band = (1.0 - (fx - band_center).abs() * 3.0).max(0.0);
                let band_w = mix(1.0, 0.2 + 0.8 * band, k);
                // Darken toward the top/bottom cell edges.
                let edge = smoothstep(0.0, 0.18, fy) * smoothstep(1.0, 0.82, fy);
                let edge_w = mix(1.0, 0.3 + 0.7 * edge, k);
                rgb[ch] = base[ch] * band_w * edge_w;
            }

            // Quantize to 8 brightness levels.
            for c in &mut rgb {
                *c = (c.clamp(0.0, 1.0) * 7.0).round() / 7.0;
            }

            // Color-adaptive retint, same idea as the composite highlight.
            let (u, v) = src.uv_at(x, y);
            let local = boost_saturation(background.sample(u, v), 1.5);
            let adapt = smoothstep(0.08, 0.4, luminance(center)) * 0.6;
            for ch in 0..3 {
                rgb[ch] *= mix(1.0, local[ch], adapt);
            }

            dst.texels[i] = [rgb[0], rgb[1], rgb[2], s[3]];
        }
    }
}

/// Source sample at the screen-space center of cell (col+dc, row+dr),
/// honoring each column's own stagger.
fn cell_center_sample(
    src: &RenderTarget,
    col: f32,
    row: f32,
    cell: f32,
    dc: i32,
    dr: i32,
) -> [f32; 4] {
    let ncol = col + dc as f32;
    let nrow = row + dr as f32;
    let stagger = if (ncol as i64).rem_euclid(2) == 1 { cell * 0.5 } else { 0.0 };
    let cx = (ncol + 0.5) * cell;
    let cy = (nrow + 0.5) * cell - stagger;
    src.fetch(cx as i32, cy as i32)
}

/* ------------------------------ vignette ------------------------------ */

const VIGNETTE_ROT: f32 = 0.35;
const VIGNETTE_SKEW: f32 = 0.25;
const VIGNETTE_AXES: (f32, f32) = (1.15, 0.95);
const VIGNETTE_INNER: f32 = 0.55;
const VIGNETTE_OUTER: f32 = 0.95;

/// Elliptical radial falloff from a rotated, skewed frame: untouched inside
/// the inner radius, multiplicatively darkened toward the outer radius,
/// fully dark (scaled by intensity) beyond it.
fn vignette(src: &RenderTarget, dst: &mut RenderTarget, p: &VignetteParams) {
    let w = src.width;
    let h = src.height;
    let (sin_a, cos_a) = VIGNETTE_ROT.sin_cos();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let s = src.texels[i];
            let (u, v) = src.uv_at(x, y);
            let px = u - 0.5;
            let py = v - 0.5;
            let mut xr = cos_a * px - sin_a * py;
            let yr = sin_a * px + cos_a * py;
            xr += yr * VIGNETTE_SKEW;
            let r = ((xr * VIGNETTE_AXES.0).powi(2) + (yr * VIGNETTE_AXES.1).powi(2)).sqrt() * 2.0;
            let fall = smoothstep(VIGNETTE_INNER, VIGNETTE_OUTER, r);
            let dark = 1.0 - p.intensity * fall;
            dst.texels[i] = [s[0] * dark, s[1] * dark, s[2] * dark, s[3]];
        }
    }
}

// Core pixel-buffer types shared by every pass.
// All intermediate color math happens in linear light, f32 per channel;
// sRGB conversion only happens at the edges (icon decode, final present).

use crate::error::Error;

/// One RGBA texel in linear light, straight (not premultiplied) alpha.
pub type Texel = [f32; 4];

/// An RGB(A) color constant, same layout as a texel.
pub type Color = [f32; 4];

/// Soft cap on target size so a bad resize surfaces as an error instead of
/// an abort inside the allocator (64M texels ≈ 1 GiB of f32 RGBA).
const MAX_TEXELS: usize = 64 * 1024 * 1024;

/// An off-screen image buffer one pass writes and a later pass reads.
/// Row 0 is the top row; the v texture coordinate runs bottom-to-top.
#[derive(Clone, Debug)]
pub struct RenderTarget {
    pub width: usize,
    pub height: usize,
    pub texels: Vec<Texel>, // length = width * height
}

impl RenderTarget {
    /// Allocate a zero-filled target. Zero or absurd dimensions are a
    /// resource-allocation failure, not a panic.
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::TargetAlloc(format!(
                "render target {width}x{height}: empty dimension"
            )));
        }
        if width.saturating_mul(height) > MAX_TEXELS {
            return Err(Error::TargetAlloc(format!(
                "render target {width}x{height}: exceeds texel limit"
            )));
        }
        Ok(Self { width, height, texels: vec![[0.0; 4]; width * height] })
    }

    #[inline]
    pub fn fill(&mut self, c: Texel) {
        for t in &mut self.texels {
            *t = c;
        }
    }

    /// Overwrite this target with another of identical size.
    pub fn copy_from(&mut self, other: &RenderTarget) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        self.texels.copy_from_slice(&other.texels);
    }

    /// Fetch a texel with edge clamping (no wraparound anywhere in this core).
    #[inline]
    pub fn fetch(&self, x: i32, y: i32) -> Texel {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        self.texels[y * self.width + x]
    }

    /// Bilinear sample at normalized (u, v); u left-to-right, v bottom-to-top.
    /// Coordinates outside [0,1] clamp to the edge texel.
    pub fn sample(&self, u: f32, v: f32) -> Texel {
        // Map v to raster rows (row 0 = top).
        let fx = u * self.width as f32 - 0.5;
        let fy = (1.0 - v) * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i32, y0 as i32);

        let c00 = self.fetch(x0, y0);
        let c10 = self.fetch(x0 + 1, y0);
        let c01 = self.fetch(x0, y0 + 1);
        let c11 = self.fetch(x0 + 1, y0 + 1);

        let mut out = [0.0; 4];
        for ch in 0..4 {
            let top = c00[ch] + (c10[ch] - c00[ch]) * tx;
            let bot = c01[ch] + (c11[ch] - c01[ch]) * tx;
            out[ch] = top + (bot - top) * ty;
        }
        out
    }

    /// Normalized texture coordinate of the texel center at (x, y).
    #[inline]
    pub fn uv_at(&self, x: usize, y: usize) -> (f32, f32) {
        (
            (x as f32 + 0.5) / self.width as f32,
            1.0 - (y as f32 + 0.5) / self.height as f32,
        )
    }
}

/// The simulated surface: height in channel 0, velocity in channel 1.
/// Kept at quarter resolution; f32 precision is required for stability.
#[derive(Clone)]
pub struct FieldBuffer {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<[f32; 2]>,
}

impl FieldBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::TargetAlloc(format!(
                "field buffer {width}x{height}: empty dimension"
            )));
        }
        Ok(Self { width, height, cells: vec![[0.0; 2]; width * height] })
    }

    /// Bilinear height sample at normalized (u, v), edge clamped.
    pub fn sample_height(&self, u: f32, v: f32) -> f32 {
        let fx = u * self.width as f32 - 0.5;
        let fy = (1.0 - v) * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i32, y0 as i32);

        let h = |x: i32, y: i32| -> f32 {
            let x = x.clamp(0, self.width as i32 - 1) as usize;
            let y = y.clamp(0, self.height as i32 - 1) as usize;
            self.cells[y * self.width + x][0]
        };
        let top = h(x0, y0) + (h(x0 + 1, y0) - h(x0, y0)) * tx;
        let bot = h(x0, y0 + 1) + (h(x0 + 1, y0 + 1) - h(x0, y0 + 1)) * tx;
        top + (bot - top) * ty
    }
}

/* ---------- small shading helpers shared by the passes ---------- */

/// Rec. 709 luma of a linear RGB triplet.
#[inline]
pub fn luminance(c: Texel) -> f32 {
    0.2126 * c[0] + 0.7152 * c[1] + 0.0722 * c[2]
}

#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn mix3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [mix(a[0], b[0], t), mix(a[1], b[1], t), mix(a[2], b[2], t)]
}

/// Hermite step, edge0 < edge1 ⇒ 0..1 ramp.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Push a color away from its own luma; `amount` > 1 boosts saturation.
/// Used by the color-adaptive tint paths (composite specular, halftone,
/// scanline) so dots and highlights pick up the underlying artwork's hue.
#[inline]
pub fn boost_saturation(c: Texel, amount: f32) -> [f32; 3] {
    let l = luminance(c);
    [
        (l + (c[0] - l) * amount).max(0.0),
        (l + (c[1] - l) * amount).max(0.0),
        (l + (c[2] - l) * amount).max(0.0),
    ]
}

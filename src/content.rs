// Background content generation: backdrop color + composed icon artwork.
// The pipeline treats this as an opaque, synchronous collaborator — it hands
// over an icon description, a placement, a backdrop color and the pixel
// dimensions, and gets back one RGBA image (or an error, in which case the
// last-good background keeps rendering).

use crate::error::Error;
use crate::gamma::GammaLut;
use crate::types::{Color, RenderTarget};
use image::RgbaImage;

/// How the icon-path interior is filled, for vector icons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

/// What to draw over the backdrop.
#[derive(Clone)]
pub enum IconSource {
    /// A preloaded opaque bitmap, decoded by the `image` crate.
    Bitmap(RgbaImage),
    /// A vector path description for a rasterizing backend.
    Path { data: String, fill_rule: FillRule, color: Color },
    /// Backdrop only.
    None,
}

/// Where the icon lands: scale relative to the shorter output edge and a
/// normalized center (x left-to-right, y bottom-to-top).
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    pub scale: f32,
    pub center: (f32, f32),
}

impl Default for Placement {
    fn default() -> Self {
        Self { scale: 0.5, center: (0.5, 0.5) }
    }
}

pub trait ContentGenerator {
    /// Produce the full background image at exactly `width`×`height`.
    /// Synchronous: the pipeline blocks presentation until this returns.
    fn generate(
        &self,
        icon: &IconSource,
        placement: Placement,
        backdrop: Color,
        width: usize,
        height: usize,
    ) -> Result<RenderTarget, Error>;
}

/// The bundled generator: fills the backdrop and alpha-composites a
/// bilinearly resampled bitmap icon. Vector paths need a real rasterizer
/// backend and are rejected here.
pub struct BitmapCompositor {
    lut: GammaLut,
}

impl BitmapCompositor {
    pub fn new() -> Self {
        Self { lut: GammaLut::new() }
    }
}

impl Default for BitmapCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentGenerator for BitmapCompositor {
    fn generate(
        &self,
        icon: &IconSource,
        placement: Placement,
        backdrop: Color,
        width: usize,
        height: usize,
    ) -> Result<RenderTarget, Error> {
        let mut bg = RenderTarget::new(width, height)?;
        bg.fill(backdrop);

        let img = match icon {
            IconSource::None => return Ok(bg),
            IconSource::Path { .. } => {
                return Err(Error::ContentGeneration(
                    "vector icons require a rasterizer backend".into(),
                ));
            }
            IconSource::Bitmap(img) => img,
        };
        if img.width() == 0 || img.height() == 0 {
            return Err(Error::ContentGeneration("icon bitmap is empty".into()));
        }

        // Destination rect: `scale` is relative to the shorter output edge,
        // aspect of the bitmap preserved; center given bottom-to-top.
        let short = width.min(height) as f32;
        let target = short * placement.scale;
        let (iw, ih) = (img.width() as f32, img.height() as f32);
        let fit = target / iw.max(ih);
        let dw = iw * fit;
        let dh = ih * fit;
        let cx = placement.center.0 * width as f32;
        let cy = (1.0 - placement.center.1) * height as f32;
        let x0 = cx - dw * 0.5;
        let y0 = cy - dh * 0.5;

        let px0 = x0.floor().max(0.0) as usize;
        let py0 = y0.floor().max(0.0) as usize;
        let px1 = ((x0 + dw).ceil() as usize).min(width);
        let py1 = ((y0 + dh).ceil() as usize).min(height);

        for y in py0..py1 {
            for x in px0..px1 {
                // Source position in icon pixels, bilinearly sampled.
                let sx = (x as f32 + 0.5 - x0) / fit - 0.5;
                let sy = (y as f32 + 0.5 - y0) / fit - 0.5;
                let c = sample_icon(img, &self.lut, sx, sy);
                if c[3] <= 0.0 {
                    continue;
                }
                let dst = &mut bg.texels[y * width + x];
                let a = c[3];
                for ch in 0..3 {
                    dst[ch] = c[ch] * a + dst[ch] * (1.0 - a);
                }
                dst[3] = a + dst[3] * (1.0 - a);
            }
        }
        Ok(bg)
    }
}

/// Bilinear fetch from the icon bitmap in linear light; outside the bitmap
/// counts as fully transparent.
fn sample_icon(img: &RgbaImage, lut: &GammaLut, x: f32, y: f32) -> [f32; 4] {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let tx = x - x0 as f32;
    let ty = y - y0 as f32;

    let texel = |xi: i32, yi: i32| -> [f32; 4] {
        if xi < 0 || yi < 0 || xi >= w || yi >= h {
            return [0.0; 4];
        }
        lut.decode_rgba8(img.get_pixel(xi as u32, yi as u32).0)
    };

    let c00 = texel(x0, y0);
    let c10 = texel(x0 + 1, y0);
    let c01 = texel(x0, y0 + 1);
    let c11 = texel(x0 + 1, y0 + 1);
    let mut out = [0.0f32; 4];
    for ch in 0..4 {
        let top = c00[ch] + (c10[ch] - c00[ch]) * tx;
        let bot = c01[ch] + (c11[ch] - c01[ch]) * tx;
        out[ch] = top + (bot - top) * ty;
    }
    out
}

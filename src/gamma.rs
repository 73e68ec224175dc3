// sRGB ↔ linear conversion tables for the two edges of the pipeline:
// decoding icon bitmaps into linear render targets, and packing the final
// frame into the 0x00RRGGBB buffer the window wants. Table lookups instead
// of powf keep the per-frame encode cheap.

use crate::types::{RenderTarget, Texel};

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1)
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255), quantized to 4096 steps
    linear_to_srgb: [u8; 4096],
}

impl GammaLut {
    pub fn new() -> Self {
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut l2s = [0u8; 4096];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = i as f32 / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    /// Decode one sRGB RGBA8 pixel into a linear texel (alpha stays linear).
    #[inline]
    pub fn decode_rgba8(&self, px: [u8; 4]) -> Texel {
        [
            self.srgb_to_linear[px[0] as usize],
            self.srgb_to_linear[px[1] as usize],
            self.srgb_to_linear[px[2] as usize],
            px[3] as f32 / 255.0,
        ]
    }

    #[inline]
    fn encode_channel(&self, l: f32) -> u32 {
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx] as u32
    }

    /// Pack a linear render target into the window's 0x00RRGGBB layout.
    /// `out` is resized to match; alpha is dropped (the window is opaque).
    pub fn encode_target(&self, target: &RenderTarget, out: &mut Vec<u32>) {
        out.clear();
        out.reserve(target.texels.len());
        for t in &target.texels {
            let r = self.encode_channel(t[0]);
            let g = self.encode_channel(t[1]);
            let b = self.encode_channel(t[2]);
            out.push((r << 16) | (g << 8) | b);
        }
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RenderTarget;

    #[test]
    fn decode_encode_round_trips_exactly_on_u8() {
        let lut = GammaLut::new();
        for v in [0u8, 1, 17, 128, 200, 254, 255] {
            let lin = lut.decode_rgba8([v, v, v, 255]);
            assert_eq!(lut.encode_channel(lin[0]), v as u32);
        }
    }

    #[test]
    fn encode_target_packs_row_major_rgb() {
        let lut = GammaLut::new();
        let mut t = RenderTarget::new(2, 1).unwrap();
        t.texels[0] = [1.0, 0.0, 0.0, 1.0];
        t.texels[1] = [0.0, 0.0, 1.0, 1.0];
        let mut out = Vec::new();
        lut.encode_target(&t, &mut out);
        assert_eq!(out, vec![0x00FF0000, 0x000000FF]);
    }
}

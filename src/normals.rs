// Height field → surface normals, then a separable Gaussian blur that
// softens high-frequency simulation noise before lighting. Pure functions,
// no feedback: each pass writes a target the next pass reads.

use crate::types::{FieldBuffer, RenderTarget};

/// Finite-difference scale; larger = steeper apparent relief.
const NORMAL_STRENGTH: f32 = 2.6;

/// Side taps per direction for the blur (plus the center tap).
const BLUR_TAPS: usize = 11;
const BLUR_SIGMA: f32 = 4.0;

/// Derive a unit surface normal per texel from height finite differences.
/// The normal's xyz land in the target's rgb channels as raw signed floats
/// (z always positive); alpha is set to 1.
pub fn derive_normals(field: &FieldBuffer, out: &mut RenderTarget) {
    debug_assert_eq!(field.width, out.width);
    debug_assert_eq!(field.height, out.height);
    let w = field.width;
    let h = field.height;
    let wi = w as i32;
    let hi = h as i32;

    let height_at = |x: i32, y: i32| -> f32 {
        let x = x.clamp(0, wi - 1) as usize;
        let y = y.clamp(0, hi - 1) as usize;
        field.cells[y * w + x][0]
    };

    for y in 0..h {
        for x in 0..w {
            let xi = x as i32;
            let yi = y as i32;
            // One-texel offsets in 4 directions, edge clamped. Row index
            // grows downward, so the +v (up) direction is y-1.
            let dx = (height_at(xi + 1, yi) - height_at(xi - 1, yi)) * NORMAL_STRENGTH;
            let dy = (height_at(xi, yi - 1) - height_at(xi, yi + 1)) * NORMAL_STRENGTH;
            let inv_len = 1.0 / (dx * dx + dy * dy + 1.0).sqrt();
            out.texels[y * w + x] = [-dx * inv_len, -dy * inv_len, inv_len, 1.0];
        }
    }
}

/// Gaussian weights for offsets 1..=BLUR_TAPS (the center tap weighs 1.0).
fn blur_weights() -> [f32; BLUR_TAPS] {
    let mut w = [0.0f32; BLUR_TAPS];
    for (i, slot) in w.iter_mut().enumerate() {
        let d = (i + 1) as f32;
        *slot = (-d * d / (2.0 * BLUR_SIGMA * BLUR_SIGMA)).exp();
    }
    w
}

/// One direction of the separable blur: center tap plus BLUR_TAPS weighted
/// taps on each side, edge clamped, normalized by the sum of weights used.
fn blur_pass(src: &RenderTarget, dst: &mut RenderTarget, dir: (i32, i32)) {
    debug_assert_eq!(src.width, dst.width);
    debug_assert_eq!(src.height, dst.height);
    let weights = blur_weights();
    let w = src.width;
    let h = src.height;

    for y in 0..h {
        for x in 0..w {
            let center = src.texels[y * w + x];
            let mut acc = center;
            let mut total = 1.0f32;
            for (k, wt) in weights.iter().enumerate() {
                let o = (k + 1) as i32;
                let a = src.fetch(x as i32 + dir.0 * o, y as i32 + dir.1 * o);
                let b = src.fetch(x as i32 - dir.0 * o, y as i32 - dir.1 * o);
                for ch in 0..4 {
                    acc[ch] += (a[ch] + b[ch]) * wt;
                }
                total += 2.0 * wt;
            }
            let mut out = [0.0f32; 4];
            for ch in 0..4 {
                out[ch] = acc[ch] / total;
            }
            dst.texels[y * w + x] = out;
        }
    }
}

/// Horizontal pass into `tmp`, vertical pass into `dst`.
pub fn blur_normals(src: &RenderTarget, tmp: &mut RenderTarget, dst: &mut RenderTarget) {
    blur_pass(src, tmp, (1, 0));
    blur_pass(tmp, dst, (0, 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldBuffer;

    #[test]
    fn flat_field_gives_straight_up_normals() {
        let field = FieldBuffer::new(8, 8).unwrap();
        let mut out = RenderTarget::new(8, 8).unwrap();
        derive_normals(&field, &mut out);
        for t in &out.texels {
            assert!(t[0].abs() < 1e-6);
            assert!(t[1].abs() < 1e-6);
            assert!((t[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn normals_are_unit_length() {
        let mut field = FieldBuffer::new(16, 16).unwrap();
        for (i, c) in field.cells.iter_mut().enumerate() {
            c[0] = ((i % 16) as f32 * 0.37).sin() * 0.5;
        }
        let mut out = RenderTarget::new(16, 16).unwrap();
        derive_normals(&field, &mut out);
        for t in &out.texels {
            let len = (t[0] * t[0] + t[1] * t[1] + t[2] * t[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-4);
            assert!(t[2] > 0.0); // z fixed positive
        }
    }

    #[test]
    fn tilt_direction_matches_slope() {
        // Height increasing to the right ⇒ normal leans left (negative x).
        let mut field = FieldBuffer::new(8, 8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                field.cells[y * 8 + x][0] = x as f32 * 0.1;
            }
        }
        let mut out = RenderTarget::new(8, 8).unwrap();
        derive_normals(&field, &mut out);
        // Interior texel, away from the clamped edges.
        assert!(out.texels[4 * 8 + 4][0] < 0.0);
    }

    #[test]
    fn blur_preserves_a_constant_image() {
        let mut src = RenderTarget::new(12, 9).unwrap();
        src.fill([0.3, 0.6, 0.9, 1.0]);
        let mut tmp = RenderTarget::new(12, 9).unwrap();
        let mut dst = RenderTarget::new(12, 9).unwrap();
        blur_normals(&src, &mut tmp, &mut dst);
        for t in &dst.texels {
            assert!((t[0] - 0.3).abs() < 1e-5);
            assert!((t[1] - 0.6).abs() < 1e-5);
            assert!((t[2] - 0.9).abs() < 1e-5);
        }
    }

    #[test]
    fn blur_reduces_peak_amplitude() {
        let mut src = RenderTarget::new(31, 31).unwrap();
        src.texels[15 * 31 + 15] = [1.0, 1.0, 1.0, 1.0];
        let mut tmp = RenderTarget::new(31, 31).unwrap();
        let mut dst = RenderTarget::new(31, 31).unwrap();
        blur_normals(&src, &mut tmp, &mut dst);
        assert!(dst.texels[15 * 31 + 15][0] < 0.1);
        // Energy spread to a neighbor.
        assert!(dst.texels[15 * 31 + 14][0] > 0.0);
    }
}

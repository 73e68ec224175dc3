// Composite pass: refraction + lighting + shadow + bloom over the background
// image, driven by the blurred normal map. Output is the authoritative lit
// frame before any stylistic effect runs.

use crate::types::{boost_saturation, luminance, mix, RenderTarget};

/// Screen-space refraction offset per unit of normal tilt, in uv units.
const REFRACTION: f32 = 0.06;
/// Per-channel offset multipliers: a chromatic micro-shift to fake dispersion.
const DISPERSION: [f32; 3] = [1.0, 1.015, 1.03];

/// Fixed light direction (normalized in `composite`), view is straight on.
const LIGHT: [f32; 3] = [0.35, 0.5, 0.8];
const SHININESS: f32 = 48.0;
const SPECULAR_STRENGTH: f32 = 1.1;
/// How much the specular highlight adopts the local background hue.
const SPECULAR_ADAPT: f32 = 0.65;

/// Resting (flat-field) brightness of the shadow term.
const SHADE_REST: f32 = 0.93;
const SHADE_STRENGTH: f32 = 1.2;

const BLOOM: f32 = 0.12;

/// `normals` is the blurred quarter-resolution normal map, sampled bilinearly
/// at output resolution; `background` and `out` are full resolution.
pub fn composite(normals: &RenderTarget, background: &RenderTarget, out: &mut RenderTarget) {
    debug_assert_eq!(background.width, out.width);
    debug_assert_eq!(background.height, out.height);

    let llen = (LIGHT[0] * LIGHT[0] + LIGHT[1] * LIGHT[1] + LIGHT[2] * LIGHT[2]).sqrt();
    let light = [LIGHT[0] / llen, LIGHT[1] / llen, LIGHT[2] / llen];
    // Shadow term of a perfectly flat normal (0,0,1); deviations from this
    // dot product modulate brightness around the resting value.
    let flat_dot = light[2];

    let w = out.width;
    let h = out.height;
    for y in 0..h {
        for x in 0..w {
            let (u, v) = out.uv_at(x, y);

            // Renormalize after bilinear interpolation of the blurred map.
            let n = normals.sample(u, v);
            let nlen = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt().max(1e-6);
            let nx = n[0] / nlen;
            let ny = n[1] / nlen;
            let nz = n[2] / nlen;

            // Refraction: the normal's tilt becomes a sampling offset, with a
            // slightly different magnitude per channel.
            let mut rgb = [0.0f32; 3];
            for ch in 0..3 {
                let s = REFRACTION * DISPERSION[ch];
                rgb[ch] = background.sample(u + nx * s, v + ny * s)[ch];
            }
            let base = background.sample(u + nx * REFRACTION, v + ny * REFRACTION);
            let alpha = base[3];

            // Phong-style specular from the fixed light, view = (0,0,1):
            // reflect the light about the normal and take its z component.
            let ndotl = nx * light[0] + ny * light[1] + nz * light[2];
            let refl_z = 2.0 * ndotl * nz - light[2];
            let spec = refl_z.max(0.0).powf(SHININESS) * SPECULAR_STRENGTH;

            // Color-adaptive specular: tint the highlight with a saturation-
            // boosted sample of the background near the refracted position,
            // so highlights pick up the artwork's hue instead of pure white.
            let local = boost_saturation(base, 1.6);
            let tint = [
                mix(1.0, local[0], SPECULAR_ADAPT),
                mix(1.0, local[1], SPECULAR_ADAPT),
                mix(1.0, local[2], SPECULAR_ADAPT),
            ];

            // Shadow: remapped so the resting flat state sits near 0.93.
            let shade = (SHADE_REST + (ndotl - flat_dot) * SHADE_STRENGTH).clamp(0.0, 1.25);

            // Additive bloom proportional to local luminance, brightening
            // icon edges without washing out the backdrop.
            let lum = luminance(base);

            let mut outc = [0.0f32; 4];
            for ch in 0..3 {
                let lit = rgb[ch] * shade + spec * tint[ch] + base[ch] * lum * BLOOM;
                outc[ch] = lit.max(0.0);
            }
            outc[3] = alpha;
            out.texels[y * w + x] = outc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RenderTarget;

    fn flat_normals(w: usize, h: usize) -> RenderTarget {
        let mut n = RenderTarget::new(w, h).unwrap();
        n.fill([0.0, 0.0, 1.0, 1.0]);
        n
    }

    #[test]
    fn flat_field_is_an_undistorted_dimmed_background() {
        let normals = flat_normals(4, 4);
        let mut bg = RenderTarget::new(16, 16).unwrap();
        bg.fill([0.5, 0.5, 0.5, 1.0]);
        let mut out = RenderTarget::new(16, 16).unwrap();
        composite(&normals, &bg, &mut out);

        // With no tilt: no refraction displacement, shadow at its resting
        // 0.93, a tiny uniform specular and bloom on top.
        let t = out.texels[8 * 16 + 8];
        let expected_floor = 0.5 * 0.93;
        assert!(t[0] >= expected_floor - 1e-4);
        // Never wildly above the lit background either.
        assert!(t[0] < 0.75);
        // Uniform input ⇒ uniform output.
        for other in &out.texels {
            for ch in 0..3 {
                assert!((other[ch] - t[ch]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn alpha_follows_the_background() {
        let normals = flat_normals(2, 2);
        let mut bg = RenderTarget::new(8, 8).unwrap();
        bg.fill([0.2, 0.3, 0.4, 0.0]); // fully transparent backdrop
        let mut out = RenderTarget::new(8, 8).unwrap();
        composite(&normals, &bg, &mut out);
        for t in &out.texels {
            assert_eq!(t[3], 0.0);
        }
    }

    #[test]
    fn tilted_normals_displace_the_sample() {
        // Background: left half red, right half blue. A strong rightward
        // tilt should pull the right half's color leftward across the seam.
        let mut bg = RenderTarget::new(32, 32).unwrap();
        for y in 0..32 {
            for x in 0..32 {
                bg.texels[y * 32 + x] =
                    if x < 16 { [1.0, 0.0, 0.0, 1.0] } else { [0.0, 0.0, 1.0, 1.0] };
            }
        }
        let mut normals = RenderTarget::new(8, 8).unwrap();
        normals.fill([0.9, 0.0, 0.435, 1.0]); // heavy +x tilt, unit-ish
        let mut out = RenderTarget::new(32, 32).unwrap();
        composite(&normals, &bg, &mut out);

        // A pixel just left of the seam now samples into the blue half.
        let t = out.texels[16 * 32 + 15];
        assert!(t[2] > t[0]);
    }
}

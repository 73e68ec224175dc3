// Wave simulation: a 2-channel (height, velocity) feedback field advanced by
// a discrete wave equation, with energy injected along the pointer's recent
// path. Double-buffered: each sub-step reads the previous sub-step's output
// and writes the other buffer, then ownership swaps by index — never by copy.

use crate::config::WaveParams;
use crate::error::Error;
use crate::pointer::Point;
use crate::types::FieldBuffer;

/// Below this segment length the pointer counts as stationary and no energy
/// is injected that sub-step.
const MIN_SEGMENT: f32 = 1e-5;

pub struct WaveSim {
    fields: [FieldBuffer; 2],
    /// Index of the buffer holding the most recently written state.
    front: usize,
}

impl WaveSim {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        Ok(Self {
            fields: [FieldBuffer::new(width, height)?, FieldBuffer::new(width, height)?],
            front: 0,
        })
    }

    /// Drop both buffers and start over at a new size (zeroed field).
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), Error> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// The buffer holding the current simulation state.
    pub fn current(&self) -> &FieldBuffer {
        &self.fields[self.front]
    }

    /// Advance the simulation by `params.steps` sub-steps within one tick.
    /// `segment` is the (previous, current) smoothed pointer position;
    /// `aspect` is output width/height, used to keep the interaction radius
    /// circular on screen regardless of output aspect.
    pub fn advance(&mut self, params: &WaveParams, segment: (Point, Point), aspect: f32) {
        for _ in 0..params.steps.max(1) {
            self.substep(params, segment, aspect);
        }
    }

    fn substep(&mut self, params: &WaveParams, segment: (Point, Point), aspect: f32) {
        let back = 1 - self.front;
        // Split the pair so we can read one buffer while writing the other.
        let (a, b) = self.fields.split_at_mut(1);
        let (read, write) = if self.front == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        };

        let w = read.width;
        let h = read.height;
        let wi = w as i32;
        let hi = h as i32;
        let speed2 = params.speed * params.speed;
        let damp = params.damping;

        // Pointer segment in aspect-corrected uv space (x scaled by aspect so
        // distances are isotropic in screen space).
        let ((px0, py0), (px1, py1)) = segment;
        let ax = px0 * aspect;
        let ay = py0;
        let bx = px1 * aspect;
        let by = py1;
        let sx = bx - ax;
        let sy = by - ay;
        let seg_len = (sx * sx + sy * sy).sqrt();
        let inject = seg_len >= MIN_SEGMENT && params.radius > 0.0;
        let seg_len2 = sx * sx + sy * sy;

        for y in 0..h {
            for x in 0..w {
                let idx = y * w + x;
                let [h0, v0] = read.cells[idx];

                // Weighted 4-neighbor average of height. Offsets clamp at the
                // domain edge; the weight is the distance (in texels) the
                // offset actually covered, so it shrinks to zero at the edge.
                let xi = x as i32;
                let yi = y as i32;
                let mut sum = 0.0f32;
                let mut wsum = 0.0f32;
                for (dx, dy) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
                    let nx = (xi + dx).clamp(0, wi - 1);
                    let ny = (yi + dy).clamp(0, hi - 1);
                    let weight = ((nx - xi).abs() + (ny - yi).abs()) as f32;
                    sum += weight * read.cells[(ny as usize) * w + nx as usize][0];
                    wsum += weight;
                }
                let lap = if wsum > 0.0 { sum / wsum } else { h0 };

                // Discrete wave equation with intentional double damping:
                // velocity decays (momentum), then height decays (amplitude).
                let mut vel = v0 + speed2 * (lap - h0);
                vel *= damp;
                let mut height = (h0 + vel) * damp;

                if inject {
                    // Closest point on the pointer segment to this texel, in
                    // the same aspect-corrected space.
                    let cu = (x as f32 + 0.5) / w as f32 * aspect;
                    let cv = 1.0 - (y as f32 + 0.5) / h as f32;
                    let t = (((cu - ax) * sx + (cv - ay) * sy) / seg_len2).clamp(0.0, 1.0);
                    let dx = cu - (ax + t * sx);
                    let dy = cv - (ay + t * sy);
                    let dist = (dx * dx + dy * dy).sqrt();
                    if dist < params.radius {
                        // Cosine bump: full strength on the path, zero at the
                        // radius; scaled by travel distance so a fast pointer
                        // leaves a continuous, stronger wake.
                        let falloff =
                            0.5 + 0.5 * (std::f32::consts::PI * dist / params.radius).cos();
                        height += falloff * seg_len * params.intensity;
                    }
                }

                write.cells[idx] = [height, vel];
            }
        }

        // Ownership swap: the buffer we just wrote is now current.
        self.front = back;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_abs(sim: &WaveSim) -> f32 {
        sim.current()
            .cells
            .iter()
            .fold(0.0f32, |m, c| m.max(c[0].abs()).max(c[1].abs()))
    }

    #[test]
    fn stationary_pointer_leaves_zero_field_zero() {
        // The exact scenario from the contract: default-ish params, pointer
        // pinned at the center for 100 ticks, field starts all-zero.
        let params = WaveParams {
            damping: 0.8,
            speed: 1.0,
            radius: 0.025,
            intensity: 20.0,
            momentum: 0.4,
            steps: 1,
        };
        let mut sim = WaveSim::new(64, 36).unwrap();
        let seg = ((0.5, 0.5), (0.5, 0.5));
        for _ in 0..100 {
            sim.advance(&params, seg, 16.0 / 9.0);
        }
        assert_eq!(max_abs(&sim), 0.0);
    }

    #[test]
    fn negligible_segment_injects_nothing_for_any_params() {
        for (damping, intensity) in [(0.0, 0.0), (0.5, 100.0), (0.99, 1e6), (1.5, -40.0)] {
            let params = WaveParams {
                damping,
                intensity,
                ..WaveParams::default()
            };
            let mut sim = WaveSim::new(16, 16).unwrap();
            // Segment shorter than the stationary threshold.
            let seg = ((0.3, 0.3), (0.3 + 1e-7, 0.3));
            sim.advance(&params, seg, 1.0);
            assert!(max_abs(&sim) <= 1e-12);
        }
    }

    #[test]
    fn moving_pointer_disturbs_the_field() {
        let params = WaveParams::default();
        let mut sim = WaveSim::new(32, 32).unwrap();
        sim.advance(&params, ((0.4, 0.5), (0.6, 0.5)), 1.0);
        assert!(max_abs(&sim) > 0.0);
    }

    #[test]
    fn disturbance_decays_once_pointer_stops() {
        let params = WaveParams::default();
        let mut sim = WaveSim::new(32, 32).unwrap();
        sim.advance(&params, ((0.4, 0.5), (0.6, 0.5)), 1.0);
        let peak = max_abs(&sim);
        let still = ((0.6, 0.5), (0.6, 0.5));
        for _ in 0..200 {
            sim.advance(&params, still, 1.0);
        }
        assert!(max_abs(&sim) < peak * 0.01);
    }

    #[test]
    fn substeps_swap_ownership_not_data() {
        let params = WaveParams { steps: 3, ..WaveParams::default() };
        let mut sim = WaveSim::new(8, 8).unwrap();
        // Odd number of substeps flips the front index each tick.
        let before = sim.front;
        sim.advance(&params, ((0.2, 0.2), (0.8, 0.8)), 1.0);
        assert_ne!(before, sim.front);
    }

    #[test]
    fn one_by_one_field_does_not_blow_up() {
        // Degenerate minimum-size field: the Laplacian has no valid
        // neighbors, so the height must simply decay.
        let params = WaveParams::default();
        let mut sim = WaveSim::new(1, 1).unwrap();
        sim.fields[0].cells[0] = [1.0, 0.0];
        sim.advance(&params, ((0.0, 0.0), (0.0, 0.0)), 1.0);
        let [h, v] = sim.current().cells[0];
        assert!(h.is_finite() && v.is_finite());
        assert!(h.abs() <= 1.0);
    }
}

// Resource manager for every intermediate render target. On resize the
// complete replacement set is built first and only then swapped in, so no
// tick can ever observe a half-replaced set; the old buffers drop with the
// old value. Quarter-resolution buffers serve the simulation-adjacent stages.

use crate::error::Error;
use crate::types::RenderTarget;

/// Simulation-adjacent stages run at 1/4 output resolution per dimension.
const SIM_DIVISOR: usize = 4;

/// Floor(dim / 4), clamped to at least one texel.
pub fn quarter(dim: usize) -> usize {
    (dim / SIM_DIVISOR).max(1)
}

pub struct Targets {
    pub width: usize,
    pub height: usize,
    pub sim_width: usize,
    pub sim_height: usize,
    /// Quarter resolution: normal map and the two blur-direction buffers.
    pub normal: RenderTarget,
    pub blur_tmp: RenderTarget,
    pub blur_out: RenderTarget,
    /// Full resolution: lit composite, the fx ping-pong pair, final output.
    pub composite: RenderTarget,
    pub fx_a: RenderTarget,
    pub fx_b: RenderTarget,
    pub output: RenderTarget,
}

impl Targets {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        let sw = quarter(width);
        let sh = quarter(height);
        Ok(Self {
            width,
            height,
            sim_width: sw,
            sim_height: sh,
            normal: RenderTarget::new(sw, sh)?,
            blur_tmp: RenderTarget::new(sw, sh)?,
            blur_out: RenderTarget::new(sw, sh)?,
            composite: RenderTarget::new(width, height)?,
            fx_a: RenderTarget::new(width, height)?,
            fx_b: RenderTarget::new(width, height)?,
            output: RenderTarget::new(width, height)?,
        })
    }

    /// Atomic replacement: allocate everything at the new size, then swap.
    /// On failure the existing set stays untouched and usable.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), Error> {
        *self = Self::new(width, height)?;
        Ok(())
    }
}

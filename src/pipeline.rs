// The render-pass orchestration engine. One `tick` runs the whole fixed
// topology synchronously: pointer smoothing → wave feedback → normal
// derivation → blur → composite → effect chain → transition, presenting the
// final target and caching it for the next cross-fade. Pointer and resize
// events arrive between ticks and only mutate state; nothing renders outside
// `tick_at`.

use std::time::Instant;

use crate::composite::composite;
use crate::config::{GlassConfig, WaveParams, WavePatch};
use crate::content::{BitmapCompositor, ContentGenerator, IconSource, Placement};
use crate::effects::{ChainOutput, EffectChain};
use crate::error::Error;
use crate::normals::{blur_normals, derive_normals};
use crate::pointer::PointerSmoother;
use crate::targets::{quarter, Targets};
use crate::transition::TransitionController;
use crate::types::{Color, RenderTarget};
use crate::wave::WaveSim;

pub struct LiquidGlass {
    wave_params: WaveParams,
    backdrop: Color,
    icon: IconSource,
    placement: Placement,
    pixel_density: f32,
    generator: Box<dyn ContentGenerator>,

    /// Immutable between regenerations; exclusively owned here.
    background: RenderTarget,
    pointer: PointerSmoother,
    sim: WaveSim,
    targets: Targets,
    chain: EffectChain,
    transition: TransitionController,

    epoch: Instant,
}

impl LiquidGlass {
    /// Build the whole pipeline with the bundled content generator.
    pub fn new(config: GlassConfig) -> Result<Self, Error> {
        Self::with_generator(config, Box::new(BitmapCompositor::new()))
    }

    pub fn with_generator(
        config: GlassConfig,
        generator: Box<dyn ContentGenerator>,
    ) -> Result<Self, Error> {
        let (w, h) = scaled_dims(config.width, config.height, config.pixel_density);
        let background =
            generator.generate(&config.icon, config.placement, config.backdrop, w, h)?;
        let targets = Targets::new(w, h)?;
        let sim = WaveSim::new(quarter(w), quarter(h))?;
        let transition = TransitionController::new(w, h)?;
        let chain = EffectChain::from_config(&config);

        Ok(Self {
            wave_params: config.wave,
            backdrop: config.backdrop,
            icon: config.icon,
            placement: config.placement,
            pixel_density: config.pixel_density,
            generator,
            background,
            pointer: PointerSmoother::new((0.5, 0.5)),
            sim,
            targets,
            chain,
            transition,
            epoch: Instant::now(),
        })
    }

    /// Output size in physical pixels.
    pub fn size(&self) -> (usize, usize) {
        (self.targets.width, self.targets.height)
    }

    pub fn background(&self) -> &RenderTarget {
        &self.background
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_active()
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    /* ---------------- asynchronous inputs (between ticks) ---------------- */

    /// Raw pointer sample, normalized (x left-to-right, y bottom-to-top).
    /// Only records state; never renders.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.set_raw(x, y);
    }

    /// Merge a partial wave-parameter update; effective from the next tick.
    pub fn apply_wave_patch(&mut self, patch: &WavePatch) {
        patch.apply_to(&mut self.wave_params);
    }

    /// Retint the second halftone layer. No transition is triggered.
    pub fn set_tint(&mut self, tint: Color) {
        self.chain.set_tint(tint);
    }

    /// Swap the icon (and placement): regenerates the background and starts
    /// a cross-fade from the frame currently on screen. On generator failure
    /// the last-good background keeps rendering and the error is returned.
    pub fn set_icon(&mut self, icon: IconSource, placement: Placement) -> Result<(), Error> {
        let now = self.now();
        self.set_icon_at(now, icon, placement)
    }

    pub fn set_icon_at(
        &mut self,
        now: f32,
        icon: IconSource,
        placement: Placement,
    ) -> Result<(), Error> {
        let (w, h) = self.size();
        let fresh = self.generator.generate(&icon, placement, self.backdrop, w, h)?;
        self.background = fresh;
        self.icon = icon;
        self.placement = placement;
        self.transition.begin(now);
        Ok(())
    }

    /// Apply a new output size atomically before the next tick: every render
    /// target, the simulation field, the transition buffers and the
    /// background are replaced together. Nothing renders mid-replacement.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), Error> {
        let (w, h) = scaled_dims(width, height, self.pixel_density);
        if (w, h) == self.size() {
            return Ok(());
        }
        // Regenerate the background first: it is the most likely failure,
        // and bailing here leaves the old, consistent set in place.
        let background =
            self.generator.generate(&self.icon, self.placement, self.backdrop, w, h)?;
        self.targets.resize(w, h)?;
        self.sim.resize(quarter(w), quarter(h))?;
        self.transition.resize(w, h)?;
        self.background = background;
        Ok(())
    }

    /* --------------------------- the tick loop --------------------------- */

    /// One full pass sequence, wall-clock driven.
    pub fn tick(&mut self) -> &RenderTarget {
        let now = self.now();
        self.tick_at(now)
    }

    /// One full pass sequence at an explicit time (seconds since the epoch);
    /// runs every stage synchronously to completion and returns the
    /// presented frame.
    pub fn tick_at(&mut self, now: f32) -> &RenderTarget {
        let segment = self.pointer.advance(self.wave_params.momentum);
        let aspect = self.targets.width as f32 / self.targets.height as f32;
        self.sim.advance(&self.wave_params, segment, aspect);

        derive_normals(self.sim.current(), &mut self.targets.normal);
        blur_normals(
            &self.targets.normal,
            &mut self.targets.blur_tmp,
            &mut self.targets.blur_out,
        );
        composite(&self.targets.blur_out, &self.background, &mut self.targets.composite);

        let slot = self.chain.run(
            &self.targets.composite,
            &self.background,
            &mut self.targets.fx_a,
            &mut self.targets.fx_b,
            now,
        );
        let frame = match slot {
            ChainOutput::Composite => &self.targets.composite,
            ChainOutput::FxA => &self.targets.fx_a,
            ChainOutput::FxB => &self.targets.fx_b,
        };

        self.transition.compose(now, frame, &mut self.targets.output);
        &self.targets.output
    }

    /// Tear everything down. Consuming `self` makes a second dispose a
    /// compile error, and no tick can run once disposal begins; all owned
    /// buffers are released before this returns.
    pub fn dispose(self) {
        drop(self);
    }

    fn now(&self) -> f32 {
        self.epoch.elapsed().as_secs_f32()
    }
}

fn scaled_dims(width: usize, height: usize, density: f32) -> (usize, usize) {
    let scale = |d: usize| ((d as f32 * density).round() as usize).max(1);
    (scale(width), scale(height))
}

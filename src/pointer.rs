// Pointer input smoothing.
// Raw samples arrive whenever the platform delivers them; the simulation only
// ever sees the critically-damped smoothed position, advanced once per tick.

/// Normalized pointer coordinate: x in [0,1] left-to-right,
/// y in [0,1] bottom-to-top.
pub type Point = (f32, f32);

pub struct PointerSmoother {
    raw: Point,
    smoothed: Point,
    prev_smoothed: Point,
}

impl PointerSmoother {
    pub fn new(start: Point) -> Self {
        Self { raw: start, smoothed: start, prev_smoothed: start }
    }

    /// Record a raw sample. Not tied to the frame clock; just stores state.
    pub fn set_raw(&mut self, x: f32, y: f32) {
        self.raw = (x, y);
    }

    /// Advance one tick: lerp toward the raw position by `momentum`
    /// (0 = frozen, 1 = instantaneous). Returns (previous, current) smoothed
    /// positions — the segment the simulator injects energy along.
    pub fn advance(&mut self, momentum: f32) -> (Point, Point) {
        self.prev_smoothed = self.smoothed;
        self.smoothed.0 += (self.raw.0 - self.smoothed.0) * momentum;
        self.smoothed.1 += (self.raw.1 - self.smoothed.1) * momentum;
        (self.prev_smoothed, self.smoothed)
    }

    pub fn smoothed(&self) -> Point {
        self.smoothed
    }
}

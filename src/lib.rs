// Liquid glass: a pointer-reactive height-field simulation lit and refracted
// over a background image, with an optional chain of stylistic post effects
// and cross-fades whenever the background content changes. Everything is
// software-rendered into owned f32 buffers; the demo binary presents through
// a minifb window.

pub mod composite;
pub mod config;
pub mod content;
pub mod draw;
pub mod effects;
pub mod error;
pub mod gamma;
pub mod normals;
pub mod pipeline;
pub mod pointer;
pub mod targets;
pub mod transition;
pub mod types;
pub mod wave;

pub use config::{GlassConfig, WaveParams, WavePatch};
pub use content::{ContentGenerator, FillRule, IconSource, Placement};
pub use error::Error;
pub use pipeline::LiquidGlass;

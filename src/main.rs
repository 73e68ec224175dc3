// Demo: liquid glass over a procedurally drawn icon.
// • Move the mouse: ripples deform and refract the backdrop.
// • 1 / 2 / 3: swap the icon (cross-fades to the new background).
// • T: cycle the second halftone layer's tint (no transition).
// • Up / Down: raise / lower ripple intensity (partial wave patch).
// • Drag the window border to resize; ESC quits.

use liquid_glass::config::{
    ChromaParams, GlassConfig, HalftoneParams, ScanlineParams, VignetteParams,
};
use liquid_glass::content::{IconSource, Placement};
use liquid_glass::draw::Drawer;
use liquid_glass::error::Error;
use liquid_glass::gamma::GammaLut;
use liquid_glass::pipeline::LiquidGlass;
use liquid_glass::types::Color;
use liquid_glass::WavePatch;

use image::{Rgba, RgbaImage};
use minifb::Key;
use std::time::{Duration, Instant};

const WIDTH: usize = 960;
const HEIGHT: usize = 540;

/// Tints the T key cycles through.
const TINTS: [Color; 3] = [
    [0.95, 0.9, 0.82, 1.0],
    [0.98, 0.45, 0.35, 1.0],
    [0.4, 0.75, 0.98, 1.0],
];

fn main() -> Result<(), Error> {
    let mut drawer = Drawer::new("Liquid Glass", WIDTH, HEIGHT)?;

    let icons = [icon_disc(), icon_ring(), icon_diamond()];
    let config = GlassConfig {
        width: WIDTH,
        height: HEIGHT,
        icon: IconSource::Bitmap(icons[0].clone()),
        placement: Placement::default(),
        backdrop: [0.07, 0.09, 0.13, 1.0],
        halftone_a: Some(HalftoneParams { scale: 14.0, angle: 0.35, ..Default::default() }),
        halftone_b: Some(HalftoneParams {
            scale: 9.0,
            angle: 1.1,
            opacity: 0.35,
            ..Default::default()
        }),
        chroma: Some(ChromaParams::default()),
        scanline: Some(ScanlineParams { intensity: 0.45, ..Default::default() }),
        vignette: Some(VignetteParams::default()),
        ..GlassConfig::default()
    };
    let mut glass = LiquidGlass::new(config)?;

    let lut = GammaLut::new();
    let mut packed: Vec<u32> = Vec::new();
    let mut tint_index = 0usize;
    let mut intensity = 20.0f32;

    let mut last_fps_time = Instant::now();
    let mut frames_this_second = 0u32;

    while drawer.is_open() && !drawer.esc_pressed() {
        // Apply a pending resize atomically before this tick renders.
        let (ww, wh) = drawer.size();
        if (ww, wh) != glass.size() && ww > 0 && wh > 0 {
            glass.resize(ww, wh)?;
        }

        if let Some((x, y)) = drawer.pointer() {
            glass.pointer_moved(x, y);
        }

        for (key, idx) in [(Key::Key1, 0), (Key::Key2, 1), (Key::Key3, 2)] {
            if drawer.pressed_once(key) {
                // A failed generation keeps the last-good background.
                if let Err(e) = glass
                    .set_icon(IconSource::Bitmap(icons[idx].clone()), Placement::default())
                {
                    println!("icon swap failed: {e}");
                }
            }
        }
        if drawer.pressed_once(Key::T) {
            tint_index = (tint_index + 1) % TINTS.len();
            glass.set_tint(TINTS[tint_index]);
        }
        if drawer.pressed_once(Key::Up) {
            intensity *= 1.5;
            glass.apply_wave_patch(&WavePatch { intensity: Some(intensity), ..Default::default() });
        }
        if drawer.pressed_once(Key::Down) {
            intensity /= 1.5;
            glass.apply_wave_patch(&WavePatch { intensity: Some(intensity), ..Default::default() });
        }

        let frame = glass.tick();
        let (fw, fh) = (frame.width, frame.height);
        lut.encode_target(frame, &mut packed);
        drawer.present(&packed, fw, fh)?;

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            println!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    glass.dispose();
    Ok(())
}

/* ---------- procedural icon bitmaps (stand-ins for a real catalog) ---------- */

const ICON_SIZE: u32 = 256;

fn icon_canvas() -> RgbaImage {
    RgbaImage::from_pixel(ICON_SIZE, ICON_SIZE, Rgba([0, 0, 0, 0]))
}

/// Soft-edged filled disc.
fn icon_disc() -> RgbaImage {
    let mut img = icon_canvas();
    shade(&mut img, |d| smooth_edge(0.8, d), [250, 214, 120]);
    img
}

/// Ring: the disc minus a smaller disc.
fn icon_ring() -> RgbaImage {
    let mut img = icon_canvas();
    shade(&mut img, |d| smooth_edge(0.85, d) * (1.0 - smooth_edge(0.5, d)), [120, 205, 250]);
    img
}

/// Diamond via the L1 norm.
fn icon_diamond() -> RgbaImage {
    let mut img = icon_canvas();
    let half = ICON_SIZE as f32 * 0.5;
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let dx = (x as f32 + 0.5 - half).abs() / half;
            let dy = (y as f32 + 0.5 - half).abs() / half;
            let a = smooth_edge(0.82, dx + dy);
            if a > 0.0 {
                img.put_pixel(x, y, Rgba([235, 120, 190, (a * 255.0) as u8]));
            }
        }
    }
    img
}

/// 1 inside `edge`, fading to 0 just past it.
fn smooth_edge(edge: f32, d: f32) -> f32 {
    ((edge - d) / 0.06 + 1.0).clamp(0.0, 1.0)
}

fn shade(img: &mut RgbaImage, alpha: impl Fn(f32) -> f32, rgb: [u8; 3]) {
    let half = ICON_SIZE as f32 * 0.5;
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let d = (dx * dx + dy * dy).sqrt();
            let a = alpha(d);
            if a > 0.0 {
                img.put_pixel(x, y, Rgba([rgb[0], rgb[1], rgb[2], (a * 255.0) as u8]));
            }
        }
    }
}

// Window glue for the demo binary: a resizable minifb window that shows the
// packed frame and reports pointer position and hotkeys. The core pipeline
// never touches this — input is polled here and fed in explicitly, so there
// are no ambient listeners to unhook on teardown.

use crate::error::Error;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,
}

impl Drawer {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let opts = WindowOptions { resize: true, ..WindowOptions::default() };
        let window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the packed 0x00RRGGBB pixels for this frame to the screen.
    pub fn present(&mut self, pixels: &[u32], width: usize, height: usize) -> Result<(), Error> {
        self.window
            .update_with_buffer(pixels, width, height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Current window client size; changes when the user drags the border.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position normalized to [0,1], y flipped to run bottom-to-top
    /// (the convention every pipeline coordinate uses).
    pub fn pointer(&self) -> Option<(f32, f32)> {
        let (w, h) = self.window.get_size();
        self.window.get_mouse_pos(MouseMode::Clamp).map(|(x, y)| {
            (
                (x / w.max(1) as f32).clamp(0.0, 1.0),
                (1.0 - y / h.max(1) as f32).clamp(0.0, 1.0),
            )
        })
    }

    /// One-shot key press (no repeat); used for the demo hotkeys.
    pub fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }
}

// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),        // Creating the window failed
    WindowUpdate(String),      // Pushing the frame to the window failed
    ContentGeneration(String), // Building the background image failed
    TargetAlloc(String),       // Allocating a render target failed
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::ContentGeneration(s) => write!(f, "Content generation error: {s}"),
            Error::TargetAlloc(s) => write!(f, "Render target error: {s}"),
        }
    }
}

impl std::error::Error for Error {}

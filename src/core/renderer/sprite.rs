// src/core/renderer/sprite.rs
use std::path::Path;

use crate::error::LoadError;

/// A decoded sprite in tightly packed RGBA8, top row first.
#[derive(Debug, Clone)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl SpriteImage {
    /// Decode `path` with whatever formats the `image` crate was built with.
    pub fn load(path: &Path) -> std::result::Result<Self, LoadError> {
        let rgba = image::open(path)
            .map_err(|source| LoadError {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();

        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

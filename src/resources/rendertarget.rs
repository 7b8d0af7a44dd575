//! Render target resource for fixed-resolution rendering.
//!
//! Provides a framebuffer texture at the game's internal resolution, which
//! is then scaled to fit the actual window size with letterboxing. Uses
//! point filtering so the upscale stays sharp.
//!
//! # Note
//! This is a NonSend resource because `RenderTexture2D` contains GPU
//! resources that must be accessed from the main thread.

use raylib::ffi::{self, TextureFilter};
use raylib::prelude::*;

pub struct RenderTarget {
    /// The underlying raylib render texture.
    pub texture: RenderTexture2D,
    /// Game's internal render width in pixels.
    pub game_width: u32,
    /// Game's internal render height in pixels.
    pub game_height: u32,
}

impl RenderTarget {
    /// Create a new render target at the specified game resolution.
    pub fn new(
        rl: &mut RaylibHandle,
        th: &RaylibThread,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = rl
            .load_render_texture(th, width, height)
            .map_err(|e| format!("Failed to create render texture: {}", e))?;

        unsafe {
            ffi::SetTextureFilter(
                texture.texture,
                TextureFilter::TEXTURE_FILTER_POINT as i32,
            );
        }

        Ok(Self {
            texture,
            game_width: width,
            game_height: height,
        })
    }

    /// Get the source rectangle for drawing this texture.
    ///
    /// Returns a rectangle with negative height to flip the Y axis,
    /// compensating for OpenGL's inverted texture coordinates.
    pub fn source_rect(&self) -> Rectangle {
        Rectangle {
            x: 0.0,
            y: 0.0,
            width: self.game_width as f32,
            height: -(self.game_height as f32),
        }
    }
}

use std::path::Path;

use crate::error::Result;
use winit::{event::WindowEvent, event_loop::ActiveEventLoop, window::WindowId};

pub trait Renderer {
    /// Create a `width` x `height` window titled `title`, its GL context,
    /// the shader program and the quad.
    /// Fails with `AlreadyInitialized` if anything is still held.
    fn initialize(
        &mut self,
        event_loop: &ActiveEventLoop,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<()>;

    /// Handle window events (currently just close).
    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: &WindowEvent);

    /// Decode `path` and make it the current sprite, releasing the previous one.
    /// A decode failure leaves the current sprite untouched.
    fn load_sprite(&mut self, path: &Path) -> Result<()>;

    /// Clear to the background color. No-op before `initialize`.
    fn clear(&mut self);

    /// Draw the quad with the current sprite and present the frame.
    fn render(&mut self) -> Result<()>;

    /// Release every held resource. Safe to call repeatedly.
    fn shutdown(&mut self);

    fn is_initialized(&self) -> bool;

    /// Dimensions of the loaded sprite texture, if any.
    fn sprite_size(&self) -> Option<(u32, u32)>;
}

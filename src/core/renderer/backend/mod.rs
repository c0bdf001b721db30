// src/core/renderer/backend/mod.rs
#[cfg(feature = "opengl")]
pub mod opengl;

// Re-export the selected backend under a common name:
#[cfg(feature = "opengl")]
pub use opengl::OpenGlRenderer as SelectedRenderer;

#[cfg(not(feature = "opengl"))]
compile_error!("no renderer backend selected; enable the `opengl` feature");

use super::api::Renderer;

/// Builds the renderer for the backend enabled at compile time.
pub fn create_renderer() -> Box<dyn Renderer> {
    Box::new(SelectedRenderer::default())
}

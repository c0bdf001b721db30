// src/core/renderer/backend/opengl/mod.rs
#[cfg(debug_assertions)]
mod debug;
mod renderer;
mod shaders;

pub use renderer::OpenGlRenderer;

// src/app.rs

use crate::config::AppConfig;
use crate::core::renderer::api::Renderer;
use crate::core::renderer::backend::create_renderer;
use crate::error::{AppError, Result};
use log::info;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};

pub struct App {
    config: AppConfig,
    renderer: Box<dyn Renderer>,
    // First fatal error; ends the loop and becomes the run's result
    failure: Option<AppError>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_initialized() || self.failure.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        self.renderer.window_event(event_loop, id, &event);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if event_loop.exiting() || !self.renderer.is_initialized() {
            return;
        }
        self.renderer.clear();
        if let Err(e) = self.renderer.render() {
            self.fail(event_loop, e);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.renderer.shutdown();
    }
}

impl App {
    pub fn new(config: AppConfig, renderer: Box<dyn Renderer>) -> Self {
        Self {
            config,
            renderer,
            failure: None,
        }
    }

    /// Opens the window, loads the configured sprite and renders until the
    /// window is closed. Returns the first fatal error, if any.
    pub fn run(config: AppConfig) -> Result<()> {
        let mut app = App::new(config, create_renderer());

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut app)?;
        app.renderer.shutdown();

        match app.failure {
            Some(e) => Err(e),
            None => {
                info!("Window closed");
                Ok(())
            }
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let config = &self.config;
        self.renderer
            .initialize(event_loop, &config.title, config.width, config.height)?;
        self.renderer.load_sprite(&config.sprite_path)?;

        if let Some((width, height)) = self.renderer.sprite_size() {
            info!("Rendering {width}x{height} sprite until the window is closed");
        }
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: AppError) {
        self.renderer.shutdown();
        self.failure = Some(e);
        event_loop.exit();
    }
}

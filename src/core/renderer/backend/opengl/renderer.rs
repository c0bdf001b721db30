// src/core/renderer/backend/opengl/renderer.rs
use std::num::NonZeroU32;
use std::path::Path;

use glow::HasContext;
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{debug, info, warn};
use raw_window_handle::HasWindowHandle;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use super::shaders;
use crate::core::renderer::api::Renderer;
use crate::core::renderer::quad::{
    self, POSITION_LOCATION, STRIDE, TEX_COORD_LOCATION, TEX_COORD_OFFSET,
};
use crate::core::renderer::sprite::SpriteImage;
use crate::error::{AppError, GlResultExt, Result};

const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

/// The loaded sprite's GPU texture and the size it was created with.
struct SpriteTexture {
    texture: glow::Texture,
    width: u32,
    height: u32,
}

/// OpenGL 3.3 core renderer for a single window and a single sprite.
/// Every handle is optional so teardown can skip what was never created.
#[derive(Default)]
pub struct OpenGlRenderer {
    window: Option<Window>,
    surface: Option<Surface<WindowSurface>>,
    context: Option<PossiblyCurrentContext>,
    gl: Option<glow::Context>,

    program: Option<glow::Program>,
    vertex_array: Option<glow::VertexArray>,
    vertex_buffer: Option<glow::Buffer>,

    // At most one; replaced by each successful load_sprite
    sprite: Option<SpriteTexture>,
}

impl OpenGlRenderer {
    /// Number of backend handles currently held. Zero after `shutdown`.
    pub fn live_handles(&self) -> usize {
        [
            self.window.is_some(),
            self.surface.is_some(),
            self.context.is_some(),
            self.gl.is_some(),
            self.program.is_some(),
            self.vertex_array.is_some(),
            self.vertex_buffer.is_some(),
            self.sprite.is_some(),
        ]
        .into_iter()
        .filter(|held| *held)
        .count()
    }

    /// Creates the window, GL context and window surface, and loads GL.
    fn create_context(
        &mut self,
        event_loop: &ActiveEventLoop,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let size = PhysicalSize::new(width, height);
        let mut attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(size)
            .with_resizable(false);
        if let Some(monitor) = event_loop.primary_monitor() {
            attributes =
                attributes.with_position(centered_origin(monitor.position(), monitor.size(), size));
        }

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes.clone()))
            .build(event_loop, template, pick_config)
            .map_err(AppError::Display)?;

        // Some platforms only create the window once a config is known
        let window = match window {
            Some(window) => window,
            None => glutin_winit::finalize_window(event_loop, attributes, &gl_config)?,
        };

        let raw_window_handle = window.window_handle()?.as_raw();
        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .with_debug(cfg!(debug_assertions))
            .build(Some(raw_window_handle));

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes)? };
        let surface_attributes = window.build_surface_attributes(Default::default())?;
        let surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes)? };
        let context = not_current.make_current(&surface)?;

        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            warn!("vsync unavailable: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        };
        info!(
            "✅ Window {}x{} with OpenGL {}.{} context ready",
            width,
            height,
            gl.version().major,
            gl.version().minor
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.context = Some(context);
        self.gl = Some(gl);
        Ok(())
    }

    /// Uploads the static quad and records its vertex layout.
    fn create_quad(&mut self) -> Result<()> {
        let gl = self.gl.as_ref().ok_or(AppError::NotInitialized)?;
        unsafe {
            let vertex_array = gl.create_vertex_array().into_app_error("create vertex array")?;
            self.vertex_array = Some(vertex_array);
            let vertex_buffer = gl.create_buffer().into_app_error("create vertex buffer")?;
            self.vertex_buffer = Some(vertex_buffer);

            gl.bind_vertex_array(Some(vertex_array));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, quad::quad_bytes(), glow::STATIC_DRAW);

            gl.vertex_attrib_pointer_f32(POSITION_LOCATION, 2, glow::FLOAT, false, STRIDE as i32, 0);
            gl.enable_vertex_attrib_array(POSITION_LOCATION);
            gl.vertex_attrib_pointer_f32(
                TEX_COORD_LOCATION,
                2,
                glow::FLOAT,
                false,
                STRIDE as i32,
                TEX_COORD_OFFSET as i32,
            );
            gl.enable_vertex_attrib_array(TEX_COORD_LOCATION);

            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);
        }
        info!("✅ Quad uploaded");
        Ok(())
    }

    /// Rejects images the driver cannot hold in a single texture.
    fn check_texture_size(gl: &glow::Context, image: &SpriteImage) -> Result<()> {
        let max = unsafe { gl.get_parameter_i32(glow::MAX_TEXTURE_SIZE) };
        let max = u32::try_from(max)
            .ok()
            .filter(|max| *max > 0)
            .unwrap_or(i32::MAX as u32);
        if image.width > max || image.height > max {
            return Err(AppError::SpriteTooLarge {
                width: image.width,
                height: image.height,
                max,
            });
        }
        Ok(())
    }

    /// Creates a texture holding `image`.
    fn upload_texture(gl: &glow::Context, image: &SpriteImage) -> Result<SpriteTexture> {
        unsafe {
            let texture = gl.create_texture().into_app_error("create texture")?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                image.width as i32,
                image.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(image.pixels.as_slice()),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(SpriteTexture {
                texture,
                width: image.width,
                height: image.height,
            })
        }
    }
}

impl Renderer for OpenGlRenderer {
    fn initialize(
        &mut self,
        event_loop: &ActiveEventLoop,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<()> {
        if self.live_handles() > 0 {
            return Err(AppError::AlreadyInitialized);
        }

        self.create_context(event_loop, title, width, height)?;

        #[cfg(debug_assertions)]
        if let Some(gl) = self.gl.as_mut() {
            super::debug::install(gl);
        }

        let gl = self.gl.as_ref().ok_or(AppError::NotInitialized)?;
        self.program = Some(shaders::link_sprite_program(gl)?);
        info!("✅ Sprite shaders linked");

        self.create_quad()
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: &WindowEvent) {
        if self.window.as_ref().map(Window::id) != Some(id) {
            return;
        }
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
        }
    }

    fn load_sprite(&mut self, path: &Path) -> Result<()> {
        // Decode first: a bad file must not touch the current texture
        let image = SpriteImage::load(path)?;

        if !self.is_initialized() {
            return Err(AppError::NotInitialized);
        }
        let gl = self.gl.as_ref().ok_or(AppError::NotInitialized)?;

        Self::check_texture_size(gl, &image)?;

        // Release the old texture before creating its replacement
        if let Some(previous) = self.sprite.take() {
            unsafe { gl.delete_texture(previous.texture) };
            debug!("previous sprite texture released");
        }
        self.sprite = Some(Self::upload_texture(gl, &image)?);

        let (width, height) = image.size();
        info!("✅ Sprite {} loaded ({width}x{height})", path.display());
        Ok(())
    }

    fn clear(&mut self) {
        if let Some(gl) = &self.gl {
            unsafe {
                let [r, g, b, a] = CLEAR_COLOR;
                gl.clear_color(r, g, b, a);
                gl.clear(glow::COLOR_BUFFER_BIT);
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        let (Some(gl), Some(surface), Some(context), Some(program), Some(vertex_array)) = (
            &self.gl,
            &self.surface,
            &self.context,
            self.program,
            self.vertex_array,
        ) else {
            return Err(AppError::NotInitialized);
        };

        unsafe {
            gl.use_program(Some(program));
            gl.bind_vertex_array(Some(vertex_array));
            gl.active_texture(glow::TEXTURE0);
            // Without a sprite this samples texture 0
            gl.bind_texture(glow::TEXTURE_2D, self.sprite.as_ref().map(|s| s.texture));
            gl.draw_arrays(glow::TRIANGLE_FAN, 0, 4);
        }

        surface.swap_buffers(context)?;
        Ok(())
    }

    /// Releases GL objects, then the context, surface and window.
    /// Safe to call multiple times, called automatically in Drop.
    fn shutdown(&mut self) {
        let held = self.live_handles();
        if held == 0 {
            return;
        }
        debug!("releasing {held} renderer handles");

        if let Some(gl) = &self.gl {
            unsafe {
                if let Some(sprite) = self.sprite.take() {
                    gl.delete_texture(sprite.texture);
                    debug!("sprite texture released");
                }
                if let Some(buffer) = self.vertex_buffer.take() {
                    gl.delete_buffer(buffer);
                    debug!("vertex buffer released");
                }
                if let Some(vertex_array) = self.vertex_array.take() {
                    gl.delete_vertex_array(vertex_array);
                    debug!("vertex array released");
                }
                if let Some(program) = self.program.take() {
                    gl.delete_program(program);
                    debug!("shader program released");
                }
            }
        }

        // GL objects only exist alongside a GL context
        self.sprite = None;
        self.vertex_buffer = None;
        self.vertex_array = None;
        self.program = None;

        self.gl = None;
        self.context = None;
        self.surface = None;
        self.window = None;
        info!("Renderer shut down");
    }

    fn is_initialized(&self) -> bool {
        self.gl.is_some()
            && self.context.is_some()
            && self.program.is_some()
            && self.vertex_array.is_some()
            && self.vertex_buffer.is_some()
    }

    fn sprite_size(&self) -> Option<(u32, u32)> {
        self.sprite.as_ref().map(|s| (s.width, s.height))
    }
}

impl Drop for OpenGlRenderer {
    fn drop(&mut self) {
        // Must not panic.
        self.shutdown();
    }
}

/// Prefers the config with the most samples, as the glutin examples do.
/// The display builder has already failed if nothing matched the template,
/// so the iterator is assumed non-empty.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, config| {
            if config.num_samples() > best.num_samples() {
                config
            } else {
                best
            }
        })
        .expect("at least one GL config matches the 8-bit alpha template")
}

/// Top-left corner that centers a window of `window` size on a monitor.
fn centered_origin(
    monitor_origin: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    let offset = |monitor: u32, window: u32| (i64::from(monitor) - i64::from(window)) / 2;
    let x = i64::from(monitor_origin.x) + offset(monitor_size.width, window.width);
    let y = i64::from(monitor_origin.y) + offset(monitor_size.height, window.height);
    PhysicalPosition::new(
        x.clamp(i32::MIN.into(), i32::MAX.into()) as i32,
        y.clamp(i32::MIN.into(), i32::MAX.into()) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn render_before_initialize_is_an_error() {
        let mut renderer = OpenGlRenderer::default();
        assert!(matches!(renderer.render(), Err(AppError::NotInitialized)));
    }

    #[test]
    fn clear_before_initialize_is_a_no_op() {
        let mut renderer = OpenGlRenderer::default();
        renderer.clear();
        assert!(!renderer.is_initialized());
        assert_eq!(renderer.live_handles(), 0);
    }

    #[test]
    fn shutdown_twice_is_safe() {
        let mut renderer = OpenGlRenderer::default();
        renderer.shutdown();
        renderer.shutdown();
        assert_eq!(renderer.live_handles(), 0);
        assert!(!renderer.is_initialized());
    }

    #[test]
    fn missing_sprite_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        let mut renderer = OpenGlRenderer::default();

        let err = renderer.load_sprite(&path).unwrap_err();
        match err {
            AppError::Load(load) => assert_eq!(load.path, path),
            other => panic!("expected load error, got {other}"),
        }
        assert_eq!(renderer.sprite_size(), None);
    }

    #[test]
    fn valid_sprite_needs_an_initialized_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4])).save(&path).unwrap();
        let mut renderer = OpenGlRenderer::default();

        assert!(matches!(
            renderer.load_sprite(&path),
            Err(AppError::NotInitialized)
        ));
        assert_eq!(renderer.sprite_size(), None);
        assert_eq!(renderer.live_handles(), 0);
    }

    #[test]
    fn window_is_centered_on_monitor() {
        let origin = centered_origin(
            PhysicalPosition::new(0, 0),
            PhysicalSize::new(1920, 1080),
            PhysicalSize::new(800, 600),
        );
        assert_eq!(origin, PhysicalPosition::new(560, 240));
    }

    #[test]
    fn centering_respects_secondary_monitor_offset() {
        let origin = centered_origin(
            PhysicalPosition::new(-1280, 100),
            PhysicalSize::new(1280, 1024),
            PhysicalSize::new(800, 600),
        );
        assert_eq!(origin, PhysicalPosition::new(-1040, 312));
    }

    #[test]
    fn oversized_window_hangs_off_the_top_left() {
        let origin = centered_origin(
            PhysicalPosition::new(0, 0),
            PhysicalSize::new(640, 480),
            PhysicalSize::new(800, 600),
        );
        assert_eq!(origin, PhysicalPosition::new(-80, -60));
    }

    // ── with a live GL context ────────────────────────────────────────────

    #[cfg(all(unix, not(target_os = "macos")))]
    mod with_display {
        use super::*;
        use std::path::PathBuf;
        use winit::application::ApplicationHandler;
        use winit::event_loop::EventLoop;
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        use winit::platform::x11::EventLoopBuilderExtX11;

        fn write_sprite(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
            let path = dir.join(name);
            RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]))
                .save(&path)
                .unwrap();
            path
        }

        /// Runs `exercise` once, on the first resume, then leaves the loop.
        struct OnResume<F: FnMut(&ActiveEventLoop)> {
            exercise: F,
            ran: bool,
        }

        impl<F: FnMut(&ActiveEventLoop)> ApplicationHandler for OnResume<F> {
            fn resumed(&mut self, event_loop: &ActiveEventLoop) {
                if !self.ran {
                    self.ran = true;
                    (self.exercise)(event_loop);
                }
                event_loop.exit();
            }

            fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
        }

        fn run_on_resume(exercise: impl FnMut(&ActiveEventLoop)) {
            let mut builder = EventLoop::builder();
            EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
            EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
            let event_loop = builder.build().unwrap();

            let mut handler = OnResume { exercise, ran: false };
            event_loop.run_app(&mut handler).unwrap();
            assert!(handler.ran, "event loop never resumed");
        }

        #[test]
        #[ignore = "needs a display and OpenGL 3.3"]
        fn full_lifecycle_releases_everything() {
            let dir = tempfile::tempdir().unwrap();
            let small = write_sprite(dir.path(), "small.png", 3, 2);
            let large = write_sprite(dir.path(), "large.png", 5, 4);
            let missing = dir.path().join("missing.png");

            run_on_resume(|event_loop| {
                let mut renderer = OpenGlRenderer::default();
                renderer.initialize(event_loop, "lifecycle", 64, 48).unwrap();
                assert!(renderer.is_initialized());
                assert!(matches!(
                    renderer.initialize(event_loop, "again", 64, 48),
                    Err(AppError::AlreadyInitialized)
                ));

                // Drawing without a sprite is allowed
                renderer.clear();
                renderer.render().unwrap();

                renderer.load_sprite(&small).unwrap();
                assert_eq!(renderer.sprite_size(), Some((3, 2)));

                assert!(matches!(
                    renderer.load_sprite(&missing),
                    Err(AppError::Load(_))
                ));
                assert_eq!(renderer.sprite_size(), Some((3, 2)));

                // Replacement keeps a single texture
                let before = renderer.live_handles();
                renderer.load_sprite(&large).unwrap();
                assert_eq!(renderer.sprite_size(), Some((5, 4)));
                assert_eq!(renderer.live_handles(), before);

                renderer.clear();
                renderer.render().unwrap();

                renderer.shutdown();
                assert_eq!(renderer.live_handles(), 0);
                assert!(!renderer.is_initialized());
                assert_eq!(renderer.sprite_size(), None);

                renderer.shutdown();
                assert_eq!(renderer.live_handles(), 0);
            });
        }
    }
}

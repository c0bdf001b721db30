use std::{error::Error as StdError, fmt, path::PathBuf};

use image::ImageError;
use raw_window_handle::HandleError;
use winit::error::{EventLoopError, OsError};

#[derive(Debug)]
pub enum AppError {
    Winit(EventLoopError),         // winit's EventLoopError
    Os(OsError),                   // window creation
    Display(Box<dyn StdError>),    // GL display / config discovery
    Handle(HandleError),           // raw window handle unavailable
    #[cfg(feature = "opengl")]
    Gl(glutin::error::Error),      // context / surface / swap
    GlCall(String, &'static str),  // GL object creation + context
    Shader(&'static str, String),  // stage + info log
    Link(String),                  // program info log
    Load(LoadError),               // sprite decode failure
    SpriteTooLarge { width: u32, height: u32, max: u32 },
    NotInitialized,
    AlreadyInitialized,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Winit(e) => write!(f, "winit: {e}"),
            Self::Os(e) => write!(f, "window creation failed: {e}"),
            Self::Display(e) => write!(f, "GL display setup failed: {e}"),
            Self::Handle(e) => write!(f, "window handle unavailable: {e}"),
            #[cfg(feature = "opengl")]
            Self::Gl(e) => write!(f, "OpenGL: {e}"),
            Self::GlCall(message, ctx) => write!(f, "OpenGL error: {message} (context: {ctx})"),
            Self::Shader(stage, log) => write!(f, "{stage} shader failed to compile: {log}"),
            Self::Link(log) => write!(f, "shader program failed to link: {log}"),
            Self::Load(e) => write!(f, "{e}"),
            Self::SpriteTooLarge { width, height, max } => write!(
                f,
                "sprite is {width}x{height}, larger than the maximum texture size {max}"
            ),
            Self::NotInitialized => write!(f, "renderer is not initialized"),
            Self::AlreadyInitialized => write!(f, "renderer is already initialized"),
        }
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Winit(e) => Some(e),
            Self::Os(e) => Some(e),
            Self::Display(e) => Some(e.as_ref()),
            Self::Handle(e) => Some(e),
            #[cfg(feature = "opengl")]
            Self::Gl(e) => Some(e),
            Self::Load(e) => Some(e),
            _ => None,
        }
    }
}

/// `?` conversions
impl From<EventLoopError> for AppError {
    fn from(e: EventLoopError) -> Self {
        Self::Winit(e)
    }
}
impl From<OsError> for AppError {
    fn from(e: OsError) -> Self {
        Self::Os(e)
    }
}
impl From<HandleError> for AppError {
    fn from(e: HandleError) -> Self {
        Self::Handle(e)
    }
}
#[cfg(feature = "opengl")]
impl From<glutin::error::Error> for AppError {
    fn from(e: glutin::error::Error) -> Self {
        Self::Gl(e)
    }
}
impl From<LoadError> for AppError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// A sprite file could not be read or decoded.
#[derive(Debug)]
pub struct LoadError {
    pub path: PathBuf,
    pub source: ImageError,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to load sprite {}: {}", self.path.display(), self.source)
    }
}

impl StdError for LoadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.source)
    }
}

/// glow reports object-creation failures as plain strings.
pub trait GlResultExt<T> {
    fn into_app_error(self, context: &'static str) -> Result<T>;
}

impl<T> GlResultExt<T> for std::result::Result<T, String> {
    fn into_app_error(self, context: &'static str) -> Result<T> {
        self.map_err(|message| AppError::GlCall(message, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_file_error() -> LoadError {
        let path = PathBuf::from("does/not/exist.png");
        let source = image::open(&path).expect_err("file must not exist");
        LoadError { path, source }
    }

    #[test]
    fn load_error_names_the_path() {
        let err = missing_file_error();
        let text = err.to_string();
        assert!(text.starts_with("Failed to load sprite does/not/exist.png: "));
    }

    #[test]
    fn load_error_keeps_decoder_as_source() {
        let err = AppError::from(missing_file_error());
        let load = err.source().expect("load error is chained");
        assert!(load.source().is_some());
        assert!(matches!(err, AppError::Load(_)));
    }

    #[test]
    fn gl_string_errors_carry_context() {
        let failed: std::result::Result<u32, String> = Err("out of memory".into());
        let err = failed.into_app_error("create texture").unwrap_err();
        assert_eq!(
            err.to_string(),
            "OpenGL error: out of memory (context: create texture)"
        );
    }

    #[test]
    fn too_large_reports_limits() {
        let err = AppError::SpriteTooLarge { width: 9000, height: 10, max: 8192 };
        assert_eq!(
            err.to_string(),
            "sprite is 9000x10, larger than the maximum texture size 8192"
        );
    }
}

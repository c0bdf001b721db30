// src/core/renderer/backend/opengl/debug.rs
//
// Driver debug output, only compiled in debug builds.

use glow::HasContext;
use log::{debug, error, info, warn};

/// Routes `KHR_debug` messages to the logger when the driver supports them.
pub fn install(gl: &mut glow::Context) {
    let version = gl.version();
    let supported = (version.major, version.minor) >= (4, 3)
        || gl.supported_extensions().contains("GL_KHR_debug");
    if !supported {
        info!("GL debug output unavailable");
        return;
    }

    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(|_source, ty, id, severity, message| {
            match severity {
                glow::DEBUG_SEVERITY_HIGH => error!("[GL {ty:#x}/{id}] {message}"),
                glow::DEBUG_SEVERITY_MEDIUM => warn!("[GL {ty:#x}/{id}] {message}"),
                _ => debug!("[GL {ty:#x}/{id}] {message}"),
            }
        });
    }
    info!("✅ GL debug output enabled");
}

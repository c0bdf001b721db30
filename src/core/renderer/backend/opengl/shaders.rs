// src/core/renderer/backend/opengl/shaders.rs
use glow::HasContext;
use smallvec::SmallVec;

use crate::error::{AppError, GlResultExt, Result};

pub const VERTEX_SHADER_SRC: &str = include_str!("shaders/sprite.vert");
pub const FRAGMENT_SHADER_SRC: &str = include_str!("shaders/sprite.frag");

/// Sampler uniform in the fragment shader, bound to texture unit 0.
pub const SAMPLER_UNIFORM: &str = "uTexture";

const STAGES: [(u32, &str, &str); 2] = [
    (glow::VERTEX_SHADER, "vertex", VERTEX_SHADER_SRC),
    (glow::FRAGMENT_SHADER, "fragment", FRAGMENT_SHADER_SRC),
];

/// Compiles and links the sprite program. The intermediate shader objects are
/// always deleted; the program is deleted too if linking fails.
pub fn link_sprite_program(gl: &glow::Context) -> Result<glow::Program> {
    unsafe {
        let program = gl.create_program().into_app_error("create program")?;

        let mut shaders: SmallVec<[glow::Shader; 2]> = SmallVec::new();
        let mut outcome = Ok(());
        for (stage, label, source) in STAGES {
            match compile_shader(gl, stage, label, source) {
                Ok(shader) => {
                    gl.attach_shader(program, shader);
                    shaders.push(shader);
                }
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }

        if outcome.is_ok() {
            gl.link_program(program);
            if !gl.get_program_link_status(program) {
                outcome = Err(AppError::Link(gl.get_program_info_log(program)));
            }
        }

        for shader in shaders.drain(..) {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        match outcome {
            Ok(()) => {
                gl.use_program(Some(program));
                if let Some(sampler) = gl.get_uniform_location(program, SAMPLER_UNIFORM) {
                    gl.uniform_1_i32(Some(&sampler), 0);
                }
                gl.use_program(None);
                Ok(program)
            }
            Err(e) => {
                gl.delete_program(program);
                Err(e)
            }
        }
    }
}

fn compile_shader(
    gl: &glow::Context,
    stage: u32,
    label: &'static str,
    source: &str,
) -> Result<glow::Shader> {
    unsafe {
        let shader = gl.create_shader(stage).into_app_error("create shader")?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if gl.get_shader_compile_status(shader) {
            Ok(shader)
        } else {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            Err(AppError::Shader(label, log))
        }
    }
}

//! Thin OpenGL layer shared by the shader wrapper, the strip and the frame loop.
//!
//! - `GraphicsApi` is the narrow set of GL entry points the renderer touches,
//!   with associated handle types so a headless implementation can stand in
//!   for the driver in tests.
//! - `context` implements the trait on top of `glow` for a glutin context that
//!   is current on the render thread.
//! - `debug` turns `KHR_debug` callback arguments into readable labels.

mod context;
pub mod debug;
#[cfg(test)]
pub(crate) mod mock;

use std::fmt;
use std::panic::Location;

pub use context::GlContext;

use crate::error::{RenderError, Result};

/// Shader compilation unit kinds understood by [`crate::ShaderProgram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Geometry,
    Fragment,
}

impl ShaderStage {
    /// GL enum passed to `glCreateShader`.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Geometry => f.write_str("geometry"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// GL entry points used by the renderer.
///
/// All calls implicitly target the single context that is current on the
/// calling thread. Handle creation reports driver refusals as plain strings;
/// callers wrap them into [`RenderError`].
pub trait GraphicsApi {
    type Program: Copy + fmt::Debug;
    type Shader: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type VertexArray: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn create_program(&self) -> Result<Self::Program, String>;
    fn delete_program(&self, program: Self::Program);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn delete_shader(&self, shader: Self::Shader);
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);

    /// Returns `None` when `name` is not an active uniform of `program`.
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32);

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Uploads `data` into the bound `GL_ARRAY_BUFFER` with `GL_STATIC_DRAW`.
    fn array_buffer_data_static(&self, data: &[u8]);
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Describes tightly packed float attributes sourced from the bound buffer.
    fn vertex_attrib_pointer_f32(&self, index: u32, components: i32);
    fn draw_triangle_strip(&self, first: i32, count: i32);

    fn bind_default_framebuffer(&self);
    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_color_buffer(&self);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);

    /// Pops one value from the GL error queue (`GL_NO_ERROR` when empty).
    fn get_error(&self) -> u32;
}

/// Symbolic name for a `glGetError` code.
pub fn error_name(code: u32) -> &'static str {
    match code {
        glow::NO_ERROR => "GL_NO_ERROR",
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => "GL_UNKNOWN_ERROR",
    }
}

/// Fails if the GL error flag is set, tagging the error with the caller's location.
///
/// Only active in debug builds. The flag may have been raised by any earlier
/// call, not necessarily the one right before the check.
#[track_caller]
pub fn check_gl_error<G: GraphicsApi + ?Sized>(gl: &G) -> Result<()> {
    if !cfg!(debug_assertions) {
        return Ok(());
    }
    match gl.get_error() {
        glow::NO_ERROR => Ok(()),
        code => Err(RenderError::Gl {
            code,
            name: error_name(code),
            location: Location::caller(),
        }),
    }
}

use std::panic::Location;

use crate::gl::ShaderStage;

/// Failures raised while bringing up or driving the GL test window.
///
/// Every variant is fatal for the render loop; the binary prints the chain and
/// exits with a non-zero status.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Windowing system, GL display, context or surface could not be created.
    #[error("initialisation failed: {0}")]
    Init(String),
    /// A shader stage was rejected by the driver's compiler.
    #[error("error compiling {stage} stage of shader program '{program}':\n{log}\nsource:\n{shader_source}")]
    ShaderCompile {
        program: String,
        stage: ShaderStage,
        log: String,
        shader_source: String,
    },
    /// Attached stages failed to link into a program.
    #[error("error linking shader program '{program}':\n{log}")]
    ShaderLink { program: String, log: String },
    /// The uniform is not active in the program or was never registered.
    #[error("shader program '{program}' has no such uniform: {name}")]
    UniformLookup { program: String, name: String },
    /// The GL error flag was set when checked at `location`.
    ///
    /// The flag is sticky, so the failing call may precede the check site.
    #[error("{location}: {name} (0x{code:04x})")]
    Gl {
        code: u32,
        name: &'static str,
        location: &'static Location<'static>,
    },
    /// Buffer swap or swap-interval change was refused by the platform.
    #[error("presentation failed: {0}")]
    Present(String),
    /// The winit event loop terminated abnormally.
    #[error("event loop error: {0}")]
    EventLoop(String),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;

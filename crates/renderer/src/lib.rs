//! Renderer crate for the VRR test window.
//!
//! A single white vertical strip sweeps horizontally across a black window so
//! that tearing, judder and pacing problems on variable-refresh displays are
//! easy to spot. The overall flow is:
//!
//! ```text
//!   CLI / vrrtest
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ App (winit) ──▶ Session::new (glutin + glow)
//!                        │
//!                        └─▶ about_to_wait ─▶ FrameTiming ─▶ Strip::draw ─▶ swap
//! ```
//!
//! GL calls go through the narrow [`GraphicsApi`] trait so the shader wrapper
//! and strip can be exercised without a display. `Session` owns the window,
//! surface and context; `Renderer` is the thin entry point that drives the
//! event loop and surfaces the first fatal error.

mod controls;
mod error;
pub mod gl;
mod runtime;
mod shader;
mod strip;
mod types;
mod window;

use tracing::info;
use winit::event_loop::{ControlFlow, EventLoop};

pub use controls::{KeyAction, LoopSettings, SettingChange, SPEED_STEP};
pub use error::{RenderError, Result};
pub use gl::{GlContext, GraphicsApi, ShaderStage};
pub use runtime::{frame_interval, FpsCounter, FrameClock, FrameLimiter, Oscillator};
pub use shader::ShaderProgram;
pub use strip::{Strip, STRIP_HALF_WIDTH, STRIP_VERTICES};
pub use types::{RendererConfig, WINDOW_TITLE};

use window::App;

/// Entry point that owns the configuration and runs the window loop.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the window and renders until it is closed or a GL error occurs.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()
            .map_err(|err| RenderError::Init(format!("failed to create event loop: {err}")))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        info!(
            width = self.config.window_size.0,
            height = self.config.window_size.1,
            vsync = self.config.settings.vsync,
            speed = self.config.settings.speed,
            fps_limit = self.config.settings.fps_limit,
            "starting renderer"
        );
        let mut app = App::new(self.config);
        event_loop
            .run_app(&mut app)
            .map_err(|err| RenderError::EventLoop(err.to_string()))?;
        app.finish()
    }
}

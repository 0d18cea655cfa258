use crate::controls::LoopSettings;

/// Title of the test window.
pub const WINDOW_TITLE: &str = "vrr-test";

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags: window size in logical pixels, whether
/// to ask the driver for a debug context, and the initial values of the
/// settings that can later be changed from the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Window size in logical pixels.
    pub window_size: (u32, u32),
    pub title: String,
    /// Request a `KHR_debug` context and route its messages into tracing.
    pub debug_context: bool,
    /// Starting vsync, sweep speed and fps limit.
    pub settings: LoopSettings,
}

impl RendererConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_size.0 as f32 / self.window_size.1.max(1) as f32
    }
}

impl Default for RendererConfig {
    /// 1600x900 window, debug context in debug builds only.
    fn default() -> Self {
        Self {
            window_size: (1600, 900),
            title: WINDOW_TITLE.to_string(),
            debug_context: cfg!(debug_assertions),
            settings: LoopSettings::default(),
        }
    }
}

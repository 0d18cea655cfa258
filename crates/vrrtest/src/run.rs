use anyhow::{Context, Result};
use renderer::{LoopSettings, Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let config = build_config(&args);
    tracing::info!(
        size = %args.size,
        fps_limit = config.settings.fps_limit,
        speed = config.settings.speed,
        vsync = config.settings.vsync,
        debug_context = config.debug_context,
        "launching vrr test window"
    );
    Renderer::new(config)
        .run()
        .context("vrr test window terminated with an error")
}

pub fn initialise_tracing() {
    let default_filter = "warn,vrrtest=info,renderer=info,winit=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> RendererConfig {
    RendererConfig {
        window_size: (args.size.width, args.size.height),
        settings: LoopSettings {
            vsync: args.vsync,
            speed: args.speed,
            fps_limit: args.fps,
        },
        ..RendererConfig::default()
    }
}

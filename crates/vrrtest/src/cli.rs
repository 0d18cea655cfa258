use std::fmt;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "vrrtest",
    author,
    version,
    about = "Sweeping-strip test window for variable refresh rate displays",
    after_help = "Keys: ESC/Q quit, V toggle vsync, W/S speed up/down, E/D fps limit ±10, R/F fps limit ±1"
)]
pub struct Args {
    /// Initial window size in logical pixels (e.g. `1280x720`).
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        env = "VRRTEST_SIZE",
        value_parser = parse_size,
        default_value = "1600x900"
    )]
    pub size: WindowSize,

    /// Initial frame cap (0 or negative = uncapped).
    #[arg(
        long,
        value_name = "FPS",
        env = "VRRTEST_FPS",
        default_value_t = 60,
        allow_negative_numbers = true
    )]
    pub fps: i32,

    /// Initial sweep frequency in cycles per second.
    #[arg(
        long,
        value_name = "HZ",
        env = "VRRTEST_SPEED",
        value_parser = parse_speed,
        default_value = "0.5"
    )]
    pub speed: f64,

    /// Start with vsync enabled (swap interval 1).
    #[arg(long, env = "VRRTEST_VSYNC")]
    pub vsync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

pub fn parse() -> Args {
    Args::parse()
}

pub fn parse_size(value: &str) -> Result<WindowSize, String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| format!("expected WxH format, e.g. 1600x900, got '{trimmed}'"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in size '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in size '{trimmed}'"))?;

    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".to_string());
    }
    Ok(WindowSize { width, height })
}

pub fn parse_speed(value: &str) -> Result<f64, String> {
    let speed: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid speed '{}'", value.trim()))?;
    if !speed.is_finite() || speed <= 0.0 {
        return Err(format!("speed must be a positive number of Hz, got {speed}"));
    }
    Ok(speed)
}

//! Frame timing state for the test loop.
//!
//! Everything here is plain data driven by explicit `Instant`/`Duration`
//! arguments so the pacing rules can be checked without a window.

use std::f64::consts::TAU;
use std::time::{Duration, Instant};

/// Phase accumulator that sweeps the strip as `sin(phase)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Oscillator {
    phase: f64,
}

impl Oscillator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Advances by `elapsed` at `speed` cycles per second and returns the new offset.
    pub fn advance(&mut self, speed: f64, elapsed: Duration) -> f32 {
        self.phase += TAU * speed * elapsed.as_secs_f64();
        self.phase.sin() as f32
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self { phase: 0.0 }
    }
}

/// Measures the time between consecutive samples.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self { last: now }
    }

    pub fn tick(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed
    }
}

/// Averages frame times over roughly one-second windows.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for one frame of `frame_time`; yields the rate once a window closes.
    ///
    /// The frame that closes a window is counted towards the next one.
    pub fn record(&mut self, frame_time: Duration) -> Option<f64> {
        self.elapsed += frame_time.as_secs_f64();
        let report = if self.elapsed > 1.0 {
            let fps = f64::from(self.frames) / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
            Some(fps)
        } else {
            None
        };
        self.frames += 1;
        report
    }
}

/// Interval between frames for `fps_limit`, or `None` when uncapped (limit ≤ 0).
pub fn frame_interval(fps_limit: i32) -> Option<Duration> {
    if fps_limit > 0 {
        Some(Duration::from_micros(1_000_000 / fps_limit as u64))
    } else {
        None
    }
}

/// Schedules frames on a fixed cadence anchored to the previous deadline.
///
/// Deadlines advance from the last scheduled time rather than from when the
/// frame actually finished, so a late frame is followed by shorter waits.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    last_frame: Instant,
}

impl FrameLimiter {
    pub fn new(now: Instant) -> Self {
        Self { last_frame: now }
    }

    pub fn last_frame(&self) -> Instant {
        self.last_frame
    }

    /// Deadline for the next frame, or `None` when pacing is disabled.
    pub fn next_deadline(&self, fps_limit: i32) -> Option<Instant> {
        frame_interval(fps_limit).map(|interval| self.last_frame + interval)
    }

    /// Blocks until `deadline` (if any) and makes it the new anchor.
    pub fn wait(&mut self, deadline: Option<Instant>) {
        match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if !remaining.is_zero() {
                    std::thread::sleep(remaining);
                }
                self.last_frame = deadline;
            }
            None => self.last_frame = Instant::now(),
        }
    }
}

//! Deterministic frame loop for headless runs.

use anyhow::{bail, Result};

/// Configuration for deterministic headless frame execution.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Logical milliseconds between frames.
    pub tick_ms: u64,
    /// Upper bound on frames a single step may request.
    pub max_frames_per_step: u32,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            max_frames_per_step: 10_000,
        }
    }
}

/// Frame context passed to headless frame callbacks.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessContext {
    pub frame_index: u32,
    pub elapsed_ms: u64,
}

/// Deterministic headless runtime loop.
pub struct HeadlessRuntime;

impl HeadlessRuntime {
    /// Run `frames` frames, one `tick_ms` apart.
    pub fn run<F>(cfg: HeadlessRunConfig, frames: u32, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&HeadlessContext),
    {
        if cfg.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }
        if frames > cfg.max_frames_per_step {
            bail!(
                "step requests {frames} frames, limit is {}",
                cfg.max_frames_per_step
            );
        }

        for frame in 0..frames {
            on_frame(&HeadlessContext {
                frame_index: frame,
                elapsed_ms: cfg.tick_ms.saturating_mul(u64::from(frame) + 1),
            });
        }
        Ok(())
    }
}

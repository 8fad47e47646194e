//! Scenario definition for headless site runs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Sequence of headless steps.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("invalid scenario JSON")
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw)
    }
}

/// One user action, clock advance or assertion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Advance the clock by `ms`, ticking every frame on the way
    Wait { ms: u64 },
    Tick { frames: u32 },
    /// Native document scroll
    Scroll { y: f32 },
    Resize { width: f32, height: f32 },
    Navigate { path: String },
    /// Pick a scheme in the color editor
    ApplyTheme { id: String },
    ToggleEditor,
    /// Rebuild the site over the same storage
    Reload,
    CarouselNext,
    CarouselPrev,
    AssertExists { id: String },
    AssertTextContains { id: String, value: String },
}

//! JSON report written at the end of a headless run.
//!
//! ```json
//! {
//!   "status": "failed",
//!   "failure": { "step_index": 2, "assertion": "assert_exists", "message": "..." },
//!   "site": { "route": "/workshop", "scheme": "color-scheme-white-blue" },
//!   "elapsed": { "frames": 4, "ms": 64 }
//! }
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// The step that stopped the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    pub step_index: usize,
    /// Step kind, e.g. `assert_exists`
    pub assertion: String,
    pub message: String,
}

/// Page state when the run ended
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteState {
    pub route: String,
    pub scheme: Option<String>,
}

/// Logical time consumed by the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elapsed {
    pub frames: u64,
    pub ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub failure: Option<StepFailure>,
    pub site: SiteState,
    pub elapsed: Elapsed,
}

impl HeadlessReport {
    pub fn passed(site: SiteState, elapsed: Elapsed) -> Self {
        Self {
            status: ReportStatus::Passed,
            failure: None,
            site,
            elapsed,
        }
    }

    pub fn failed(failure: StepFailure, site: SiteState, elapsed: Elapsed) -> Self {
        Self {
            status: ReportStatus::Failed,
            failure: Some(failure),
            site,
            elapsed,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == ReportStatus::Failed
    }

    /// Save under the working directory. Absolute paths and `..` are refused
    /// so a scenario cannot write outside it.
    pub fn save(&self, path: &Path) -> Result<()> {
        let escapes = path.has_root()
            || path
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            bail!("report path {} must stay inside the working directory", path.display());
        }

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        self.print(&mut file)
    }

    /// Pretty JSON followed by a newline
    pub fn print(&self, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workshop_failure() -> HeadlessReport {
        HeadlessReport::failed(
            StepFailure {
                step_index: 2,
                assertion: "assert_exists".into(),
                message: "carousel: element not found".into(),
            },
            SiteState {
                route: "/workshop".into(),
                scheme: Some("color-scheme-white-blue".into()),
            },
            Elapsed { frames: 4, ms: 64 },
        )
    }

    #[test]
    fn test_refuses_paths_outside_working_dir() {
        let report = workshop_failure();
        assert!(report.save(Path::new("/tmp/report.json")).is_err());
        assert!(report.save(Path::new("reports/../../report.json")).is_err());
    }

    #[test]
    fn test_json_layout() {
        let mut out = Vec::new();
        workshop_failure().print(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["failure"]["step_index"], 2);
        assert_eq!(value["site"]["route"], "/workshop");
        assert_eq!(value["site"]["scheme"], "color-scheme-white-blue");
        assert_eq!(value["elapsed"]["ms"], 64);

        let parsed: HeadlessReport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, workshop_failure());
    }
}

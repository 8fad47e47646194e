//! Scenario runner driving a [`Site`] on a manual clock.

use crate::config::SiteConfig;
use crate::headless_assert::{
    evaluate_assert_exists, evaluate_assert_text_contains, AssertionResult,
};
use crate::headless_report::{Elapsed, HeadlessReport, SiteState, StepFailure};
use crate::headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use crate::site::{open_storage, SharedStore, Site};
use anyhow::{Context, Result};
use counterspell_core::{FrameScheduler, ManualClock};
use std::sync::Arc;

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON against a freshly booted site.
pub fn run_scenario(input: &str, config: &SiteConfig) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(
        &scenario,
        config,
        HeadlessRunConfig::default(),
        open_storage(config),
    )
}

/// Mutable run state shared by the step handlers
struct Run {
    config: SiteConfig,
    runtime: HeadlessRunConfig,
    clock: ManualClock,
    scheduler: FrameScheduler,
    storage: SharedStore,
    site: Site,
    elapsed_frames: u64,
    elapsed_ms: u64,
}

impl Run {
    fn boot(config: &SiteConfig, runtime: HeadlessRunConfig, storage: SharedStore) -> Result<Self> {
        let clock = ManualClock::new();
        let scheduler = FrameScheduler::new(Arc::new(clock.clone()));
        let mut site = Site::new(config.clone(), Arc::clone(&storage), scheduler.clone());
        site.boot().context("site failed to boot")?;
        Ok(Self {
            config: config.clone(),
            runtime,
            clock,
            scheduler,
            storage,
            site,
            elapsed_frames: 0,
            elapsed_ms: 0,
        })
    }

    fn reload(&mut self) -> Result<()> {
        // Unmount the old page before the new one registers its listeners
        let fresh = Site::new(
            self.config.clone(),
            Arc::clone(&self.storage),
            self.scheduler.clone(),
        );
        drop(std::mem::replace(&mut self.site, fresh));
        self.site.boot().context("site failed to boot after reload")?;
        Ok(())
    }

    fn frames(&mut self, frames: u32, mut advance_ms: impl FnMut() -> u64) -> Result<()> {
        let clock = &self.clock;
        let site = &self.site;
        let elapsed_frames = &mut self.elapsed_frames;
        let elapsed_ms = &mut self.elapsed_ms;
        let mut clock_error = None;

        HeadlessRuntime::run(self.runtime, frames, |_| {
            let step_ms = advance_ms();
            if let Err(err) = clock.advance(step_ms as f64) {
                clock_error.get_or_insert(err);
                return;
            }
            site.tick();
            *elapsed_frames = elapsed_frames.saturating_add(1);
            *elapsed_ms = elapsed_ms.saturating_add(step_ms);
        })?;

        match clock_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn failed(&self, assertion: &str, step_index: usize, message: String) -> RunOutcome {
        let failure = StepFailure {
            step_index,
            assertion: assertion.to_string(),
            message,
        };
        RunOutcome::Failed {
            report: HeadlessReport::failed(failure, self.site_state(), self.elapsed()),
        }
    }

    fn passed(&self) -> RunOutcome {
        RunOutcome::Passed {
            report: HeadlessReport::passed(self.site_state(), self.elapsed()),
        }
    }

    fn site_state(&self) -> SiteState {
        SiteState {
            route: self.site.route().path(),
            scheme: self.site.active_scheme(),
        }
    }

    fn elapsed(&self) -> Elapsed {
        Elapsed {
            frames: self.elapsed_frames,
            ms: self.elapsed_ms,
        }
    }
}

fn wait_frames(ms: u64, tick_ms: u64) -> u32 {
    let frames = ms.div_ceil(tick_ms.max(1));
    u32::try_from(frames).unwrap_or(u32::MAX)
}

/// Execute a pre-loaded scenario over `storage`.
pub fn run_loaded_scenario(
    scenario: &HeadlessScenario,
    config: &SiteConfig,
    runtime_cfg: HeadlessRunConfig,
    storage: SharedStore,
) -> Result<RunOutcome> {
    let mut run = Run::boot(config, runtime_cfg, storage)?;
    tracing::info!(
        scenario = scenario.name.as_deref().unwrap_or("unnamed"),
        steps = scenario.steps.len(),
        "running scenario"
    );

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!(step_index, ?step, "step");
        match step {
            ScenarioStep::Wait { ms } => {
                let tick_ms = runtime_cfg.tick_ms;
                let mut remaining_ms = *ms;
                run.frames(wait_frames(*ms, tick_ms), || {
                    let step_ms = remaining_ms.min(tick_ms);
                    remaining_ms -= step_ms;
                    step_ms
                })?;
            }
            ScenarioStep::Tick { frames } => {
                run.frames(*frames, || runtime_cfg.tick_ms)?;
            }
            ScenarioStep::Scroll { y } => run.site.scroll_to(*y),
            ScenarioStep::Resize { width, height } => run.site.resize(*width, *height),
            ScenarioStep::Navigate { path } => run.site.navigate(path)?,
            ScenarioStep::ApplyTheme { id } => {
                if !run.site.apply_theme(id) {
                    tracing::warn!(id = %id, "theme was not applied");
                }
            }
            ScenarioStep::ToggleEditor => {
                run.site.toggle_editor();
            }
            ScenarioStep::Reload => run.reload()?,
            ScenarioStep::CarouselNext | ScenarioStep::CarouselPrev => {
                let moved = if matches!(step, ScenarioStep::CarouselNext) {
                    run.site.carousel_next()
                } else {
                    run.site.carousel_prev()
                };
                if !moved {
                    let message = format!("carousel is not mounted on {}", run.site.route());
                    return Ok(run.failed("carousel", step_index, message));
                }
            }
            ScenarioStep::AssertExists { id } => {
                let snapshot = run.site.snapshot();
                if let AssertionResult::Failed { message, .. } =
                    evaluate_assert_exists(id, &snapshot)
                {
                    return Ok(run.failed("assert_exists", step_index, message));
                }
            }
            ScenarioStep::AssertTextContains { id, value } => {
                let snapshot = run.site.snapshot();
                if let AssertionResult::Failed { message, .. } =
                    evaluate_assert_text_contains(id, value, &snapshot)
                {
                    return Ok(run.failed("assert_text_contains", step_index, message));
                }
            }
        }
    }

    Ok(run.passed())
}

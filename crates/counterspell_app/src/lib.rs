//! Counterspell Taiwan site
//!
//! Composition root for the promotional site: routes, page content, the
//! navigation bar, and [`Site`], which wires the scroll synchronizer,
//! parallax section, carousel and theme store together over an event
//! dispatcher, a frame scheduler and a key-value store.
//!
//! The `headless_*` modules drive a [`Site`] from a JSON scenario on a
//! manual clock and produce a machine-readable report:
//!
//! ```rust
//! use counterspell_app::{run_scenario, SiteConfig};
//!
//! let outcome = run_scenario(
//!     r#"{"steps": [
//!         {"type": "navigate", "path": "/LatestNews"},
//!         {"type": "assert_exists", "id": "news-empty"}
//!     ]}"#,
//!     &SiteConfig::default(),
//! )
//! .unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod config;
pub mod content;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;
pub mod nav;
pub mod routes;
pub mod site;

pub use config::SiteConfig;
pub use headless_assert::{DiagnosticsElement, DiagnosticsSnapshot};
pub use headless_report::{Elapsed, HeadlessReport, ReportStatus, SiteState, StepFailure};
pub use headless_runner::{run_loaded_scenario, run_scenario, RunOutcome};
pub use headless_runtime::HeadlessRunConfig;
pub use headless_scenario::{HeadlessScenario, ScenarioStep};
pub use nav::{NavBar, NavLink};
pub use routes::Route;
pub use site::{open_storage, SharedStore, Site};

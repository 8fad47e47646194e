//! Counterspell Theme System
//!
//! Color schemes are named sets of CSS custom properties applied to the
//! document root.
//!
//! # Overview
//!
//! - **Variables**: the seven properties every scheme defines ([`ThemeVariable`])
//! - **Catalog**: built-in schemes ([`BuiltinScheme`], [`ThemeCatalog`])
//! - **Sink**: the document root as a small capability ([`ThemeSink`]);
//!   [`StyleRoot`] is an in-memory root for tests and headless runs
//! - **Store**: apply, persist and restore the active scheme ([`ThemeStore`])
//! - **Editor**: state of the scheme picker panel ([`ColorEditor`])
//!
//! # Quick Start
//!
//! ```rust
//! use counterspell_core::MemoryStore;
//! use counterspell_theme::{StyleRoot, ThemeCatalog, ThemeSink, ThemeStore};
//!
//! let catalog = ThemeCatalog::builtin();
//! let mut root = StyleRoot::with_catalog(&catalog);
//! let store = ThemeStore::new(MemoryStore::new(), catalog);
//!
//! store.restore_theme(&mut root);
//! assert!(root.has_class("color-scheme-black-green"));
//!
//! store.apply_theme("color-scheme-white-blue", &mut root);
//! assert_eq!(
//!     root.computed_variable("--background-color").as_deref(),
//!     Some("#ffffff")
//! );
//! ```

pub mod catalog;
pub mod definition;
pub mod editor;
pub mod error;
pub mod sink;
pub mod store;
pub mod stylesheet;
pub mod variables;

pub use catalog::{BuiltinScheme, ThemeCatalog, DEFAULT_SCHEME, SCHEME_CLASS_PREFIX};
pub use definition::{PersistedScheme, PersistedSchemes, ThemeDefinition, CUSTOM_SCHEME_LABEL};
pub use editor::{ColorEditor, EDITOR_MIN_VIEWPORT_WIDTH};
pub use error::{Result, ThemeError};
pub use sink::{StyleRoot, ThemeSink};
pub use store::{ThemeStore, DEFAULT_STORAGE_KEY};
pub use stylesheet::catalog_stylesheet;
pub use variables::{ThemeVariable, ThemeVariables};

#[cfg(feature = "web")]
pub use sink::DomThemeSink;

//! Scheme picker panel state

use crate::catalog::{DEFAULT_SCHEME, SCHEME_CLASS_PREFIX};
use crate::sink::ThemeSink;
use crate::store::ThemeStore;
use counterspell_core::KeyValueStore;

/// Viewports narrower than this never show the editor
pub const EDITOR_MIN_VIEWPORT_WIDTH: f32 = 500.0;

/// Open/closed state and current selection of the color editor
#[derive(Clone, Debug)]
pub struct ColorEditor {
    open: bool,
    current: String,
}

impl Default for ColorEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorEditor {
    pub fn new() -> Self {
        Self {
            open: false,
            current: DEFAULT_SCHEME.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the editor is rendered at all for this viewport width
    pub fn is_visible(viewport_width: f32) -> bool {
        viewport_width >= EDITOR_MIN_VIEWPORT_WIDTH
    }

    /// Scheme shown as selected
    pub fn current_scheme(&self) -> &str {
        &self.current
    }

    /// Open the panel, syncing the selection from the root's scheme class
    pub fn open(&mut self, sink: &dyn ThemeSink) {
        self.current = sink
            .classes()
            .into_iter()
            .find(|class| class.starts_with(SCHEME_CLASS_PREFIX))
            .unwrap_or_else(|| DEFAULT_SCHEME.to_string());
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self, sink: &dyn ThemeSink) {
        if self.open {
            self.close();
        } else {
            self.open(sink);
        }
    }

    /// Picker entries: `(id, label)` per catalog scheme
    pub fn options<S: KeyValueStore>(store: &ThemeStore<S>) -> Vec<(String, String)> {
        store
            .catalog()
            .iter()
            .map(|scheme| (scheme.id.clone(), scheme.translation.clone()))
            .collect()
    }

    /// Apply `id` through the store and close the panel.
    ///
    /// Returns whether the scheme changed; the selection only moves if it did.
    pub fn select<S: KeyValueStore>(
        &mut self,
        id: &str,
        store: &ThemeStore<S>,
        sink: &mut dyn ThemeSink,
    ) -> bool {
        let applied = store.apply_theme(id, sink);
        if applied {
            self.current = id.to_string();
        }
        self.close();
        applied
    }
}

//! Theme persistence
//!
//! Every applied scheme is snapshotted from the live root and written under
//! a single storage key as a JSON object keyed by scheme id. The active id is
//! recorded explicitly next to it (`<key>.active`); stores written without
//! that record fall back to the last inserted entry.

use crate::catalog::{ThemeCatalog, DEFAULT_SCHEME, SCHEME_CLASS_PREFIX};
use crate::definition::{PersistedSchemes, ThemeDefinition, CUSTOM_SCHEME_LABEL};
use crate::error::{Result, ThemeError};
use crate::sink::ThemeSink;
use crate::variables::{ThemeVariable, ThemeVariables};
use counterspell_core::KeyValueStore;

/// Storage key holding the persisted schemes
pub const DEFAULT_STORAGE_KEY: &str = "customSchemes";

/// Applies, persists and restores color schemes
pub struct ThemeStore<S> {
    storage: S,
    catalog: ThemeCatalog,
    storage_key: String,
    default_scheme: String,
}

impl<S: KeyValueStore> ThemeStore<S> {
    pub fn new(storage: S, catalog: ThemeCatalog) -> Self {
        Self {
            storage,
            catalog,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_scheme: DEFAULT_SCHEME.to_string(),
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Scheme used when nothing usable is stored. Ignored unless the catalog
    /// has it.
    pub fn with_default_scheme(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if self.catalog.contains(&id) {
            self.default_scheme = id;
        } else {
            tracing::warn!(id = %id, "default scheme not in catalog, keeping {}", self.default_scheme);
        }
        self
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Key holding the explicit active scheme id
    pub fn active_key(&self) -> String {
        format!("{}.active", self.storage_key)
    }

    pub fn default_scheme(&self) -> &str {
        &self.default_scheme
    }

    /// Read the persisted schemes. Unreadable or corrupt data reads as empty.
    pub fn load(&self) -> PersistedSchemes {
        let raw = match self.storage.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PersistedSchemes::new(),
            Err(err) => {
                tracing::warn!(key = %self.storage_key, %err, "theme storage unreadable");
                return PersistedSchemes::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(schemes) => schemes,
            Err(err) => {
                tracing::warn!(key = %self.storage_key, %err, "failed to parse stored schemes");
                PersistedSchemes::new()
            }
        }
    }

    /// Explicitly recorded active id, if any
    pub fn active_id(&self) -> Option<String> {
        match self.storage.get(&self.active_key()) {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(err) => {
                tracing::warn!(%err, "active scheme id unreadable");
                None
            }
        }
    }

    /// Switch to scheme `id` and persist the resulting snapshot.
    ///
    /// Unknown ids are a no-op. Persistence failures are logged; the root
    /// keeps the new scheme either way. Returns whether the scheme changed.
    pub fn apply_theme(&self, id: &str, sink: &mut dyn ThemeSink) -> bool {
        match self.try_apply_theme(id, sink) {
            Ok(()) => true,
            Err(ThemeError::UnknownTheme(id)) => {
                tracing::debug!(id = %id, "ignoring unknown scheme");
                false
            }
            Err(err) => {
                tracing::error!(id = %id, %err, "failed to persist scheme");
                true
            }
        }
    }

    /// [`apply_theme`](Self::apply_theme) with errors surfaced.
    ///
    /// [`ThemeError::UnknownTheme`] leaves the root untouched; any other
    /// error means the root was updated but nothing was persisted.
    pub fn try_apply_theme(&self, id: &str, sink: &mut dyn ThemeSink) -> Result<()> {
        let mut schemes = self.load();
        let stored = if self.catalog.contains(id) {
            None
        } else {
            let scheme = schemes
                .get(id)
                .ok_or_else(|| ThemeError::UnknownTheme(id.to_string()))?;
            Some(ThemeDefinition::from_persisted(id, scheme)?)
        };

        for class in sink.classes() {
            if class.starts_with(SCHEME_CLASS_PREFIX)
                || self.catalog.contains(&class)
                || schemes.contains_key(&class)
            {
                sink.remove_class(&class);
            }
        }
        sink.add_class(id);
        clear_inline_variables(sink);
        if let Some(definition) = &stored {
            write_inline_variables(sink, &definition.variables);
        }

        let snapshot = snapshot_variables(sink);
        let (name, translation) = match (self.catalog.get(id), &stored) {
            (Some(builtin), _) => (builtin.name.clone(), builtin.translation.clone()),
            (None, Some(custom)) => (custom.name.clone(), custom.translation.clone()),
            (None, None) => (CUSTOM_SCHEME_LABEL.to_string(), CUSTOM_SCHEME_LABEL.to_string()),
        };
        let definition = ThemeDefinition::new(id, name, translation, snapshot);
        definition.validate()?;

        schemes.shift_remove(id);
        schemes.insert(id.to_string(), definition.to_persisted());
        self.save(&schemes, id)?;
        tracing::debug!(id, stored = schemes.len(), "scheme applied");
        Ok(())
    }

    /// Reapply the persisted active scheme, or the default one.
    ///
    /// Never fails: unusable stored data is logged and the default applies.
    /// Returns the id now active.
    pub fn restore_theme(&self, sink: &mut dyn ThemeSink) -> String {
        let schemes = self.load();
        let explicit = self.active_id().filter(|id| schemes.contains_key(id));
        let chosen = explicit.or_else(|| schemes.keys().last().cloned());

        if let Some(id) = chosen {
            if let Some(scheme) = schemes.get(&id) {
                match ThemeDefinition::from_persisted(&id, scheme) {
                    Ok(definition) => {
                        apply_inline(sink, &definition);
                        tracing::debug!(id = %id, "restored stored scheme");
                        return id;
                    }
                    Err(err) => tracing::warn!(id = %id, %err, "stored scheme unusable"),
                }
            }
        }

        match self.catalog.get(&self.default_scheme) {
            Some(definition) => apply_inline(sink, definition),
            None => sink.set_class(&self.default_scheme),
        }
        tracing::debug!(id = %self.default_scheme, "applied default scheme");
        self.default_scheme.clone()
    }

    /// Write the schemes and the active id; a failed second write rolls the
    /// first one back so the two keys never disagree.
    fn save(&self, schemes: &PersistedSchemes, active: &str) -> Result<()> {
        let payload = serde_json::to_string(schemes)?;
        let previous = self.storage.get(&self.storage_key)?;
        self.storage.set(&self.storage_key, &payload)?;

        if let Err(err) = self.storage.set(&self.active_key(), active) {
            let rollback = match &previous {
                Some(raw) => self.storage.set(&self.storage_key, raw),
                None => self.storage.remove(&self.storage_key),
            };
            if let Err(rollback_err) = rollback {
                tracing::error!(%rollback_err, "failed to roll back schemes");
            }
            return Err(err.into());
        }
        Ok(())
    }
}

/// Root class set to the scheme and every variable written inline
fn apply_inline(sink: &mut dyn ThemeSink, definition: &ThemeDefinition) {
    sink.set_class(&definition.id);
    clear_inline_variables(sink);
    write_inline_variables(sink, &definition.variables);
}

fn clear_inline_variables(sink: &mut dyn ThemeSink) {
    for var in ThemeVariable::ALL {
        sink.remove_variable(var.css_name());
    }
}

fn write_inline_variables(sink: &mut dyn ThemeSink, variables: &ThemeVariables) {
    for (var, value) in variables.iter() {
        sink.set_variable(var.css_name(), &var.to_css_value(value));
    }
}

/// Variables as the root currently resolves them
fn snapshot_variables(sink: &dyn ThemeSink) -> ThemeVariables {
    let mut vars = ThemeVariables::new();
    for var in ThemeVariable::ALL {
        if let Some(value) = sink.computed_variable(var.css_name()) {
            vars.set(var, &var.from_css_value(&value));
        }
    }
    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StyleRoot;
    use counterspell_core::{MemoryStore, StorageError};

    fn fixture() -> (MemoryStore, ThemeStore<MemoryStore>, StyleRoot) {
        let storage = MemoryStore::new();
        let catalog = ThemeCatalog::builtin();
        let root = StyleRoot::with_catalog(&catalog);
        (storage.clone(), ThemeStore::new(storage, catalog), root)
    }

    #[test]
    fn test_unknown_theme_is_a_no_op() {
        let (storage, store, mut root) = fixture();
        store.apply_theme("color-scheme-white-blue", &mut root);
        let before = storage.snapshot();

        assert!(!store.apply_theme("color-scheme-nope", &mut root));
        assert!(root.has_class("color-scheme-white-blue"));
        assert_eq!(storage.snapshot(), before);
    }

    #[test]
    fn test_apply_clears_previous_class_and_inline_overrides() {
        let (_, store, mut root) = fixture();
        root.add_class("color-scheme-dark-purple");
        root.add_class("page");
        root.set_variable("--text-color", "#abcdef");

        store.apply_theme("color-scheme-white-blue", &mut root);
        assert_eq!(root.class_name(), "page color-scheme-white-blue");
        assert!(root.inline_variables().is_empty());
        assert_eq!(
            root.computed_variable("--text-color").as_deref(),
            Some("#1a1a1a")
        );
    }

    #[test]
    fn test_snapshot_stores_bare_outline_color() {
        let (_, store, mut root) = fixture();
        store.apply_theme("color-scheme-black-green", &mut root);

        let schemes = store.load();
        let entry = &schemes["color-scheme-black-green"];
        assert_eq!(entry.variables["--button-focus-outline"], "#69f0ae");
        assert_eq!(entry.class_name, "color-scheme-black-green");
        assert_eq!(entry.translation, "黑綠配色");
    }

    #[test]
    fn test_reapplying_moves_entry_to_end() {
        let (_, store, mut root) = fixture();
        store.apply_theme("color-scheme-white-blue", &mut root);
        store.apply_theme("color-scheme-dark-purple", &mut root);
        store.apply_theme("color-scheme-white-blue", &mut root);

        let ids: Vec<String> = store.load().keys().cloned().collect();
        assert_eq!(ids, vec!["color-scheme-dark-purple", "color-scheme-white-blue"]);
        assert_eq!(store.active_id().as_deref(), Some("color-scheme-white-blue"));
    }

    #[test]
    fn test_incomplete_snapshot_is_not_persisted() {
        let storage = MemoryStore::new();
        let catalog = ThemeCatalog::builtin();
        // No class rules: the root resolves nothing
        let mut root = StyleRoot::new();
        let store = ThemeStore::new(storage.clone(), catalog);

        let result = store.try_apply_theme("color-scheme-white-blue", &mut root);
        assert!(matches!(result, Err(ThemeError::MissingVariables { .. })));
        assert!(storage.is_empty());
        assert!(root.has_class("color-scheme-white-blue"));
    }

    #[test]
    fn test_custom_stored_scheme_can_be_applied() {
        let (storage, store, mut root) = fixture();
        let raw = r##"{"color-scheme-mine":{"name":"Mine","className":"color-scheme-mine","translation":"我的","variables":{"--text-color":"#010101","--background-color":"#020202","--link-color":"#030303","--link-hover-color":"#040404","--button-background":"#050505","--button-hover-color":"#060606","--button-focus-outline":"#070707"}}}"##;
        storage.set(DEFAULT_STORAGE_KEY, raw).unwrap();

        assert!(store.apply_theme("color-scheme-mine", &mut root));
        assert_eq!(
            root.computed_variable("--button-focus-outline").as_deref(),
            Some("4px auto #070707")
        );
        assert_eq!(store.load()["color-scheme-mine"].name, "Mine");
    }

    #[test]
    fn test_switch_removes_stored_custom_class() {
        let (storage, store, mut root) = fixture();
        let raw = r##"{"B":{"name":"B","className":"B","translation":"B","variables":{"--text-color":"#010101","--background-color":"#020202","--link-color":"#030303","--link-hover-color":"#040404","--button-background":"#050505","--button-hover-color":"#060606","--button-focus-outline":"#070707"}}}"##;
        storage.set(DEFAULT_STORAGE_KEY, raw).unwrap();
        assert_eq!(store.restore_theme(&mut root), "B");
        root.add_class("page");

        assert!(store.apply_theme("color-scheme-white-blue", &mut root));
        assert_eq!(root.class_name(), "page color-scheme-white-blue");
    }

    /// Memory store that refuses writes to one key
    struct RejectingStore {
        inner: MemoryStore,
        rejected: &'static str,
    }

    impl KeyValueStore for RejectingStore {
        fn get(&self, key: &str) -> counterspell_core::storage::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> counterspell_core::storage::Result<()> {
            if key == self.rejected {
                return Err(StorageError::WriteRejected(key.to_string()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> counterspell_core::storage::Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_failed_active_write_rolls_back_schemes() {
        let memory = MemoryStore::new();
        let catalog = ThemeCatalog::builtin();
        let mut root = StyleRoot::with_catalog(&catalog);
        let store = ThemeStore::new(
            RejectingStore {
                inner: memory.clone(),
                rejected: "customSchemes.active",
            },
            catalog,
        );

        let result = store.try_apply_theme("color-scheme-white-blue", &mut root);
        assert!(matches!(result, Err(ThemeError::Storage(_))));
        assert!(memory.is_empty());
        // The root still shows the selection
        assert!(root.has_class("color-scheme-white-blue"));
    }

    #[test]
    fn test_default_scheme_must_exist_in_catalog() {
        let (_, store, _) = fixture();
        let store = store.with_default_scheme("color-scheme-missing");
        assert_eq!(store.default_scheme(), DEFAULT_SCHEME);
    }
}

//! Document-root style capability
//!
//! Theme logic only ever touches the root element through [`ThemeSink`]:
//! its class list, its inline custom properties, and the computed value of a
//! custom property. [`StyleRoot`] implements it in memory with the same
//! cascade the browser applies to custom properties on a single element.

use crate::catalog::ThemeCatalog;
use indexmap::IndexMap;

/// Mutable view of the document root's theming state
pub trait ThemeSink {
    /// Classes currently on the root, in order
    fn classes(&self) -> Vec<String>;

    fn add_class(&mut self, class: &str);

    fn remove_class(&mut self, class: &str);

    /// Replace the whole class attribute with a single class
    fn set_class(&mut self, class: &str);

    /// Set an inline custom property
    fn set_variable(&mut self, name: &str, value: &str);

    fn remove_variable(&mut self, name: &str);

    /// Value the root resolves for a custom property, if any
    fn computed_variable(&self, name: &str) -> Option<String>;

    fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }
}

/// In-memory document root.
///
/// Class rules play the role of the global stylesheet. An inline property
/// wins over class rules; otherwise the last matching rule in rule order
/// wins, as in a stylesheet of equal-specificity selectors.
#[derive(Clone, Debug, Default)]
pub struct StyleRoot {
    classes: Vec<String>,
    inline: IndexMap<String, String>,
    rules: IndexMap<String, IndexMap<String, String>>,
}

impl StyleRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root with a class rule for every catalog scheme
    pub fn with_catalog(catalog: &ThemeCatalog) -> Self {
        let mut root = Self::new();
        for scheme in catalog.iter() {
            let declarations = scheme
                .variables
                .iter()
                .map(|(var, value)| (var.css_name().to_string(), var.to_css_value(value)))
                .collect();
            root.rules.insert(scheme.id.clone(), declarations);
        }
        root
    }

    /// Add or replace the rule for `.class`
    pub fn add_rule(&mut self, class: impl Into<String>, declarations: IndexMap<String, String>) {
        self.rules.insert(class.into(), declarations);
    }

    /// Inline custom properties currently set
    pub fn inline_variables(&self) -> &IndexMap<String, String> {
        &self.inline
    }

    /// The class attribute as the document would serialize it
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }
}

impl ThemeSink for StyleRoot {
    fn classes(&self) -> Vec<String> {
        self.classes.clone()
    }

    fn add_class(&mut self, class: &str) {
        if !class.is_empty() && !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    fn set_class(&mut self, class: &str) {
        self.classes.clear();
        self.add_class(class);
    }

    fn set_variable(&mut self, name: &str, value: &str) {
        self.inline.insert(name.to_string(), value.to_string());
    }

    fn remove_variable(&mut self, name: &str) {
        self.inline.shift_remove(name);
    }

    fn computed_variable(&self, name: &str) -> Option<String> {
        if let Some(value) = self.inline.get(name) {
            return Some(value.clone());
        }
        self.rules
            .iter()
            .rev()
            .filter(|(class, _)| self.has_class(class))
            .find_map(|(_, declarations)| declarations.get(name).cloned())
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// The live `document.documentElement`
#[cfg(feature = "web")]
pub struct DomThemeSink {
    window: web_sys::Window,
    root: web_sys::HtmlElement,
}

#[cfg(feature = "web")]
impl DomThemeSink {
    /// Bind to the current document's root element
    pub fn new() -> Option<Self> {
        use wasm_bindgen::JsCast;

        let window = web_sys::window()?;
        let root = window
            .document()?
            .document_element()?
            .dyn_into::<web_sys::HtmlElement>()
            .ok()?;
        Some(Self { window, root })
    }
}

#[cfg(feature = "web")]
impl ThemeSink for DomThemeSink {
    fn classes(&self) -> Vec<String> {
        self.root
            .class_name()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    fn add_class(&mut self, class: &str) {
        if let Err(err) = self.root.class_list().add_1(class) {
            tracing::warn!(class, ?err, "failed to add root class");
        }
    }

    fn remove_class(&mut self, class: &str) {
        if let Err(err) = self.root.class_list().remove_1(class) {
            tracing::warn!(class, ?err, "failed to remove root class");
        }
    }

    fn set_class(&mut self, class: &str) {
        self.root.set_class_name(class);
    }

    fn set_variable(&mut self, name: &str, value: &str) {
        if let Err(err) = self.root.style().set_property(name, value) {
            tracing::warn!(name, ?err, "failed to set root variable");
        }
    }

    fn remove_variable(&mut self, name: &str) {
        if let Err(err) = self.root.style().remove_property(name) {
            tracing::warn!(name, ?err, "failed to remove root variable");
        }
    }

    fn computed_variable(&self, name: &str) -> Option<String> {
        let style = self.window.get_computed_style(&self.root).ok()??;
        let value = style.get_property_value(name).ok()?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_overrides_class_rule() {
        let mut root = StyleRoot::with_catalog(&ThemeCatalog::builtin());
        root.add_class("color-scheme-white-blue");
        assert_eq!(
            root.computed_variable("--background-color").as_deref(),
            Some("#ffffff")
        );

        root.set_variable("--background-color", "#fafafa");
        assert_eq!(
            root.computed_variable("--background-color").as_deref(),
            Some("#fafafa")
        );

        root.remove_variable("--background-color");
        assert_eq!(
            root.computed_variable("--background-color").as_deref(),
            Some("#ffffff")
        );
    }

    #[test]
    fn test_no_class_means_no_value() {
        let root = StyleRoot::with_catalog(&ThemeCatalog::builtin());
        assert_eq!(root.computed_variable("--text-color"), None);
    }

    #[test]
    fn test_set_class_replaces_everything() {
        let mut root = StyleRoot::new();
        root.add_class("a");
        root.add_class("b");
        root.add_class("a");
        assert_eq!(root.class_name(), "a b");

        root.set_class("c");
        assert_eq!(root.classes(), vec!["c".to_string()]);
    }
}

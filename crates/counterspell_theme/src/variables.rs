//! Theme variables
//!
//! Every scheme defines the same seven CSS custom properties. The focus
//! outline is a composite value: it is stored as a bare color and written to
//! the document as an outline shorthand.

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;

/// Width and style prepended to the focus outline color
pub const FOCUS_OUTLINE_PREFIX: &str = "4px auto ";

/// Required theme variable keys
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ThemeVariable {
    TextColor,
    BackgroundColor,
    LinkColor,
    LinkHoverColor,
    ButtonBackground,
    ButtonHoverColor,
    ButtonFocusOutline,
}

impl ThemeVariable {
    /// All variables, in declaration order
    pub const ALL: [ThemeVariable; 7] = [
        ThemeVariable::TextColor,
        ThemeVariable::BackgroundColor,
        ThemeVariable::LinkColor,
        ThemeVariable::LinkHoverColor,
        ThemeVariable::ButtonBackground,
        ThemeVariable::ButtonHoverColor,
        ThemeVariable::ButtonFocusOutline,
    ];

    /// CSS custom property name
    pub fn css_name(self) -> &'static str {
        match self {
            Self::TextColor => "--text-color",
            Self::BackgroundColor => "--background-color",
            Self::LinkColor => "--link-color",
            Self::LinkHoverColor => "--link-hover-color",
            Self::ButtonBackground => "--button-background",
            Self::ButtonHoverColor => "--button-hover-color",
            Self::ButtonFocusOutline => "--button-focus-outline",
        }
    }

    pub fn from_css_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|var| var.css_name() == name)
    }

    /// Value as written to the document
    pub fn to_css_value(self, stored: &str) -> String {
        match self {
            Self::ButtonFocusOutline => format!("{FOCUS_OUTLINE_PREFIX}{stored}"),
            _ => stored.to_string(),
        }
    }

    /// Value as stored, recovered from what the document reports.
    ///
    /// The outline shorthand is stripped, so wrapping is idempotent across
    /// apply/snapshot/restore cycles.
    pub fn from_css_value(self, computed: &str) -> String {
        let computed = computed.trim();
        match self {
            Self::ButtonFocusOutline => {
                let mut value = computed;
                while let Some(rest) = value.strip_prefix(FOCUS_OUTLINE_PREFIX) {
                    value = rest.trim_start();
                }
                value.to_string()
            }
            _ => computed.to_string(),
        }
    }
}

impl fmt::Display for ThemeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// A (possibly partial) set of stored variable values
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeVariables {
    values: BTreeMap<ThemeVariable, String>,
}

impl ThemeVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(variable, value)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (ThemeVariable, &'a str)>) -> Self {
        let mut vars = Self::new();
        for (var, value) in pairs {
            vars.set(var, value);
        }
        vars
    }

    pub fn get(&self, var: ThemeVariable) -> Option<&str> {
        self.values.get(&var).map(String::as_str)
    }

    /// Set a stored (unwrapped) value. Empty values count as missing.
    pub fn set(&mut self, var: ThemeVariable, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.values.remove(&var);
        } else {
            self.values.insert(var, value.to_string());
        }
    }

    /// Required variables that have no value
    pub fn missing(&self) -> Vec<ThemeVariable> {
        ThemeVariable::ALL
            .into_iter()
            .filter(|var| !self.values.contains_key(var))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.values.len() == ThemeVariable::ALL.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThemeVariable, &str)> {
        self.values.iter().map(|(var, value)| (*var, value.as_str()))
    }

    /// Stored values keyed by CSS name, in declaration order
    pub fn to_css_map(&self) -> IndexMap<String, String> {
        self.iter()
            .map(|(var, value)| (var.css_name().to_string(), value.to_string()))
            .collect()
    }

    /// Parse a CSS-name keyed map. Unknown names are ignored and shorthand
    /// outline values are unwrapped.
    pub fn from_css_map(map: &IndexMap<String, String>) -> Self {
        let mut vars = Self::new();
        for (name, value) in map {
            match ThemeVariable::from_css_name(name) {
                Some(var) => vars.set(var, &var.from_css_value(value)),
                None => tracing::debug!(name = %name, "ignoring unknown theme variable"),
            }
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_names_round_trip() {
        for var in ThemeVariable::ALL {
            assert_eq!(ThemeVariable::from_css_name(var.css_name()), Some(var));
        }
        assert_eq!(ThemeVariable::from_css_name("--unknown"), None);
    }

    #[test]
    fn test_focus_outline_is_wrapped_once() {
        let var = ThemeVariable::ButtonFocusOutline;
        let written = var.to_css_value("#69f0ae");
        assert_eq!(written, "4px auto #69f0ae");
        assert_eq!(var.from_css_value(&written), "#69f0ae");
        assert_eq!(var.from_css_value("4px auto 4px auto #69f0ae"), "#69f0ae");
        assert_eq!(var.from_css_value(" #69f0ae "), "#69f0ae");
    }

    #[test]
    fn test_plain_variables_are_untouched() {
        assert_eq!(ThemeVariable::LinkColor.to_css_value("#00ff7f"), "#00ff7f");
        assert_eq!(ThemeVariable::LinkColor.from_css_value(" #00ff7f"), "#00ff7f");
    }

    #[test]
    fn test_missing_reports_unset_variables() {
        let mut vars = ThemeVariables::new();
        vars.set(ThemeVariable::TextColor, "#fff");
        vars.set(ThemeVariable::BackgroundColor, "  ");

        let missing = vars.missing();
        assert_eq!(missing.len(), 6);
        assert!(missing.contains(&ThemeVariable::BackgroundColor));
        assert!(!vars.is_complete());
    }

    #[test]
    fn test_css_map_skips_unknown_names() {
        let mut map = IndexMap::new();
        map.insert("--text-color".to_string(), "#111".to_string());
        map.insert("--shadow".to_string(), "none".to_string());
        map.insert(
            "--button-focus-outline".to_string(),
            "4px auto #222".to_string(),
        );

        let vars = ThemeVariables::from_css_map(&map);
        assert_eq!(vars.get(ThemeVariable::TextColor), Some("#111"));
        assert_eq!(vars.get(ThemeVariable::ButtonFocusOutline), Some("#222"));
        assert_eq!(vars.iter().count(), 2);
    }
}

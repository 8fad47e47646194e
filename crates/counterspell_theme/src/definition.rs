//! Theme definitions and their persisted form

use crate::error::{Result, ThemeError};
use crate::variables::ThemeVariables;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label used for schemes that are not in the built-in catalog
pub const CUSTOM_SCHEME_LABEL: &str = "自定義模式";

/// A named, complete set of theme variables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeDefinition {
    /// Stable identifier, also the document-root class name
    pub id: String,
    /// Display name
    pub name: String,
    /// Localized label shown in the scheme picker
    pub translation: String,
    pub variables: ThemeVariables,
}

impl ThemeDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        translation: impl Into<String>,
        variables: ThemeVariables,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            translation: translation.into(),
            variables,
        }
    }

    /// Check the definition may be applied or persisted
    pub fn validate(&self) -> Result<()> {
        if !is_valid_identifier(&self.id) {
            return Err(ThemeError::InvalidIdentifier(self.id.clone()));
        }
        let missing = self.variables.missing();
        if !missing.is_empty() {
            return Err(ThemeError::MissingVariables {
                id: self.id.clone(),
                missing: missing.into_iter().map(|var| var.css_name()).collect(),
            });
        }
        Ok(())
    }

    /// Persisted wire form
    pub fn to_persisted(&self) -> PersistedScheme {
        PersistedScheme {
            name: self.name.clone(),
            class_name: self.id.clone(),
            translation: self.translation.clone(),
            variables: self.variables.to_css_map(),
        }
    }

    /// Rebuild from a stored entry, rejecting incomplete ones
    pub fn from_persisted(id: &str, scheme: &PersistedScheme) -> Result<Self> {
        let definition = Self::new(
            id,
            scheme.name.clone(),
            scheme.translation.clone(),
            ThemeVariables::from_css_map(&scheme.variables),
        );
        definition.validate()?;
        Ok(definition)
    }
}

/// Identifiers are used verbatim as class names
fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(char::is_whitespace)
}

/// One stored scheme entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedScheme {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "className", default)]
    pub class_name: String,
    #[serde(default)]
    pub translation: String,
    /// Values keyed by CSS custom property name
    #[serde(default)]
    pub variables: IndexMap<String, String>,
}

/// Stored schemes keyed by identifier, in insertion order
pub type PersistedSchemes = IndexMap<String, PersistedScheme>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::ThemeVariable;

    fn complete_vars() -> ThemeVariables {
        ThemeVariables::from_pairs(ThemeVariable::ALL.into_iter().map(|var| (var, "#123456")))
    }

    #[test]
    fn test_incomplete_definition_is_rejected() {
        let mut vars = complete_vars();
        vars.set(ThemeVariable::LinkHoverColor, "");
        let definition = ThemeDefinition::new("color-scheme-x", "X", "X", vars);

        match definition.validate() {
            Err(ThemeError::MissingVariables { id, missing }) => {
                assert_eq!(id, "color-scheme-x");
                assert_eq!(missing, vec!["--link-hover-color"]);
            }
            other => panic!("expected MissingVariables, got {other:?}"),
        }
    }

    #[test]
    fn test_identifier_must_be_a_class_name() {
        let definition = ThemeDefinition::new("two words", "X", "X", complete_vars());
        assert!(matches!(
            definition.validate(),
            Err(ThemeError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_wire_format_uses_class_name_key() {
        let definition = ThemeDefinition::new("color-scheme-x", "X", "叉", complete_vars());
        let json = serde_json::to_value(definition.to_persisted()).unwrap();

        assert_eq!(json["className"], "color-scheme-x");
        assert_eq!(json["translation"], "叉");
        assert_eq!(json["variables"]["--button-focus-outline"], "#123456");
        assert!(json.get("class_name").is_none());
    }

    #[test]
    fn test_from_persisted_accepts_wrapped_outline() {
        let raw = r##"{
            "name": "Mine",
            "className": "color-scheme-mine",
            "translation": "我的",
            "variables": {
                "--text-color": "#000",
                "--background-color": "#fff",
                "--link-color": "#00f",
                "--link-hover-color": "#00a",
                "--button-background": "#0a0",
                "--button-hover-color": "#080",
                "--button-focus-outline": "4px auto #f0f"
            }
        }"##;
        let scheme: PersistedScheme = serde_json::from_str(raw).unwrap();
        let definition = ThemeDefinition::from_persisted("color-scheme-mine", &scheme).unwrap();
        assert_eq!(
            definition.variables.get(ThemeVariable::ButtonFocusOutline),
            Some("#f0f")
        );
    }
}

//! Built-in color schemes

use crate::definition::ThemeDefinition;
use crate::variables::{ThemeVariable, ThemeVariables};
use std::fmt::{Display, Formatter};

/// Class prefix shared by every scheme
pub const SCHEME_CLASS_PREFIX: &str = "color-scheme-";

/// Scheme applied when nothing usable is stored
pub const DEFAULT_SCHEME: &str = "color-scheme-black-green";

/// Built-in scheme catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinScheme {
    /// Green on black; the site default.
    BlackGreen,
    WhiteBlue,
    DarkPurple,
    /// Maximum-contrast yellow on black.
    HighContrast,
}

impl BuiltinScheme {
    /// Stable identifier, also the root class name.
    pub fn id(self) -> &'static str {
        match self {
            Self::BlackGreen => "color-scheme-black-green",
            Self::WhiteBlue => "color-scheme-white-blue",
            Self::DarkPurple => "color-scheme-dark-purple",
            Self::HighContrast => "color-scheme-high-contrast",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::BlackGreen => "Black Green",
            Self::WhiteBlue => "White Blue",
            Self::DarkPurple => "Dark Purple",
            Self::HighContrast => "High Contrast",
        }
    }

    /// Label shown in the scheme picker.
    pub fn translation(self) -> &'static str {
        match self {
            Self::BlackGreen => "黑綠配色",
            Self::WhiteBlue => "白藍配色",
            Self::DarkPurple => "深紫配色",
            Self::HighContrast => "高對比配色",
        }
    }

    /// Full scheme list.
    pub fn all() -> &'static [BuiltinScheme] {
        const SCHEMES: [BuiltinScheme; 4] = [
            BuiltinScheme::BlackGreen,
            BuiltinScheme::WhiteBlue,
            BuiltinScheme::DarkPurple,
            BuiltinScheme::HighContrast,
        ];
        &SCHEMES
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|scheme| scheme.id() == id)
    }

    /// Variable values, in [`ThemeVariable::ALL`] order.
    fn palette(self) -> [&'static str; 7] {
        match self {
            Self::BlackGreen => [
                "#e0e0e0", "#000000", "#00ff7f", "#7fffbf", "#00c853", "#00e676", "#69f0ae",
            ],
            Self::WhiteBlue => [
                "#1a1a1a", "#ffffff", "#0066cc", "#004c99", "#007bff", "#0056b3", "#80bdff",
            ],
            Self::DarkPurple => [
                "#ede7f6", "#1a1025", "#b388ff", "#d1c4e9", "#7c4dff", "#651fff", "#b388ff",
            ],
            Self::HighContrast => [
                "#ffffff", "#000000", "#ffff00", "#ffd600", "#ffff00", "#ffffff", "#00ffff",
            ],
        }
    }

    pub fn definition(self) -> ThemeDefinition {
        let variables =
            ThemeVariables::from_pairs(ThemeVariable::ALL.into_iter().zip(self.palette()));
        ThemeDefinition::new(self.id(), self.display_name(), self.translation(), variables)
    }
}

impl Display for BuiltinScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Immutable, ordered set of scheme definitions
#[derive(Clone, Debug)]
pub struct ThemeCatalog {
    schemes: Vec<ThemeDefinition>,
}

impl ThemeCatalog {
    /// Every [`BuiltinScheme`]
    pub fn builtin() -> Self {
        Self {
            schemes: BuiltinScheme::all()
                .iter()
                .map(|scheme| scheme.definition())
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ThemeDefinition> {
        self.schemes.iter().find(|scheme| scheme.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemeDefinition> {
        self.schemes.iter()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

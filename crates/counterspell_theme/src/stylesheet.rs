//! Global scheme stylesheet

use crate::catalog::ThemeCatalog;
use std::fmt::Write;

/// One `.class { --var: value; }` rule per catalog scheme
pub fn catalog_stylesheet(catalog: &ThemeCatalog) -> String {
    let mut css = String::new();
    for scheme in catalog.iter() {
        let _ = writeln!(css, ".{} {{", scheme.id);
        for (var, value) in scheme.variables.iter() {
            let _ = writeln!(css, "  {}: {};", var.css_name(), var.to_css_value(value));
        }
        css.push_str("}\n");
    }
    css
}

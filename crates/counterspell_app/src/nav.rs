//! Navigation bar

use crate::routes::Route;
use counterspell_layout::Viewport;
use counterspell_theme::ColorEditor;

/// Text link to a page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

/// Fixed top navigation: page links plus the color editor toggle
#[derive(Clone, Debug)]
pub struct NavBar {
    links: Vec<NavLink>,
}

impl Default for NavBar {
    fn default() -> Self {
        Self::new()
    }
}

impl NavBar {
    pub fn new() -> Self {
        Self {
            links: vec![
                NavLink {
                    label: "首頁",
                    route: Route::Home,
                },
                NavLink {
                    label: "最新消息",
                    route: Route::LatestNews,
                },
                NavLink {
                    label: "工作坊",
                    route: Route::Workshop,
                },
            ],
        }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// Link for the current page, if it has one
    pub fn active_link(&self, current: &Route) -> Option<&NavLink> {
        self.links.iter().find(|link| &link.route == current)
    }

    /// The color editor toggle is hidden with the editor on narrow screens
    pub fn shows_editor_toggle(&self, viewport: &Viewport) -> bool {
        ColorEditor::is_visible(viewport.width)
    }

    /// Labels joined for display
    pub fn text(&self) -> String {
        self.links
            .iter()
            .map(|link| link.label)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_and_active_page() {
        let nav = NavBar::new();
        assert_eq!(nav.text(), "首頁 最新消息 工作坊");
        assert_eq!(nav.active_link(&Route::Workshop).map(|l| l.label), Some("工作坊"));
        assert!(nav.active_link(&Route::NewsDetail { id: "1".into() }).is_none());
    }

    #[test]
    fn test_editor_toggle_hidden_on_phones() {
        let nav = NavBar::new();
        assert!(!nav.shows_editor_toggle(&Viewport::new(390.0, 844.0)));
        assert!(nav.shows_editor_toggle(&Viewport::new(1280.0, 800.0)));
    }
}

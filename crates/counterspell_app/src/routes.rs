//! Client-side routes

use std::fmt;

/// Route patterns, in match order
pub const ROUTE_PATTERNS: [&str; 4] = ["/", "/workshop", "/LatestNews", "/news/:id"];

/// A page of the site
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Workshop,
    LatestNews,
    /// Single news item; the id is not used to fetch anything
    NewsDetail { id: String },
}

impl Route {
    /// Match a path. Static segments compare case-insensitively and a
    /// trailing slash is ignored.
    pub fn match_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] => Some(Self::Home),
            [page] if page.eq_ignore_ascii_case("workshop") => Some(Self::Workshop),
            [page] if page.eq_ignore_ascii_case("latestnews") => Some(Self::LatestNews),
            [news, id] if news.eq_ignore_ascii_case("news") && !id.is_empty() => {
                Some(Self::NewsDetail { id: id.to_string() })
            }
            _ => None,
        }
    }

    /// Match a path, falling back to the home page
    pub fn resolve(path: &str) -> Self {
        Self::match_path(path).unwrap_or_else(|| {
            tracing::debug!(path, "unknown route, showing home");
            Self::Home
        })
    }

    /// Canonical path
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Workshop => "/workshop".to_string(),
            Self::LatestNews => "/LatestNews".to_string(),
            Self::NewsDetail { id } => format!("/news/{id}"),
        }
    }

    /// Route pattern this route was matched by
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Home => ROUTE_PATTERNS[0],
            Self::Workshop => ROUTE_PATTERNS[1],
            Self::LatestNews => ROUTE_PATTERNS[2],
            Self::NewsDetail { .. } => ROUTE_PATTERNS[3],
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_routes() {
        assert_eq!(Route::resolve("/"), Route::Home);
        assert_eq!(Route::resolve(""), Route::Home);
        assert_eq!(Route::resolve("/workshop"), Route::Workshop);
        assert_eq!(Route::resolve("/LatestNews/"), Route::LatestNews);
        assert_eq!(Route::resolve("/latestnews"), Route::LatestNews);
        assert_eq!(
            Route::resolve("/news/42?ref=nav"),
            Route::NewsDetail { id: "42".into() }
        );
    }

    #[test]
    fn test_unknown_routes_fall_back_home() {
        assert_eq!(Route::match_path("/news"), None);
        assert_eq!(Route::match_path("/news/1/2"), None);
        assert_eq!(Route::resolve("/nope"), Route::Home);
    }

    #[test]
    fn test_paths_resolve_to_themselves() {
        for route in [
            Route::Home,
            Route::Workshop,
            Route::LatestNews,
            Route::NewsDetail { id: "abc".into() },
        ] {
            assert_eq!(Route::resolve(&route.path()), route);
        }
    }
}

//! Logo image with placeholder fallback

/// What a [`Logo`] renders
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogoView {
    Image { src: String, alt: String },
    /// Neutral block in the button background color
    Placeholder,
}

/// Round logo badge
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Logo {
    src: Option<String>,
    alt: String,
    failed: bool,
}

impl Logo {
    pub fn new(src: impl Into<String>) -> Self {
        let src = src.into();
        Self {
            src: (!src.is_empty()).then_some(src),
            alt: "Logo".to_string(),
            failed: false,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    /// The image failed to load; the placeholder is shown from now on
    pub fn mark_failed(&mut self) {
        if !self.failed {
            tracing::warn!(src = ?self.src, "logo image failed, using placeholder");
        }
        self.failed = true;
    }

    pub fn view(&self) -> LogoView {
        match &self.src {
            Some(src) if !self.failed => LogoView::Image {
                src: src.clone(),
                alt: self.alt.clone(),
            },
            _ => LogoView::Placeholder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_image_falls_back() {
        let mut logo = Logo::new("/images/logo.png");
        assert!(matches!(logo.view(), LogoView::Image { .. }));
        logo.mark_failed();
        assert_eq!(logo.view(), LogoView::Placeholder);
    }

    #[test]
    fn test_missing_source_is_placeholder() {
        assert_eq!(Logo::new("").view(), LogoView::Placeholder);
    }
}

//! Site composition root
//!
//! [`Site`] owns the window-level plumbing (event dispatcher, frame
//! scheduler, viewport, document root) and mounts page components for the
//! current route. Leaving the home page drops its components, which removes
//! their listeners and frame tasks.

use crate::config::SiteConfig;
use crate::content::{
    faq_cards, latest_news, reward_cards, HomeLayout, RewardCard, WorkshopBackground,
    EMPTY_NEWS_MESSAGE, HACKATHON, WORKSHOP, WORKSHOP_SUBTITLE, WORKSHOP_TITLE,
};
use crate::headless_assert::DiagnosticsSnapshot;
use crate::nav::NavBar;
use crate::routes::Route;
use anyhow::Result;
use counterspell_core::{
    Event, EventDispatcher, FrameScheduler, JsonFileStore, KeyValueStore, MemoryStore,
};
use counterspell_layout::{
    card_background, Carousel, HorizontalScroll, Logo, LogoView, ParallaxFrame, ScrollIndicator,
    SmoothScroll, Viewport,
};
use counterspell_theme::{
    ColorEditor, StyleRoot, ThemeCatalog, ThemeSink, ThemeStore, ThemeVariable,
    SCHEME_CLASS_PREFIX,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Key-value store shared between site instances (e.g. across reloads)
pub type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// Height of the "scroll" label beside the indicator line
const INDICATOR_LABEL_HEIGHT: f32 = 96.0;

const LOGO_SRC: &str = "/assets/counterspell-logo.png";

/// Open the configured store. A file store that cannot be opened degrades
/// to memory.
pub fn open_storage(config: &SiteConfig) -> SharedStore {
    let Some(path) = &config.storage.path else {
        return Arc::new(MemoryStore::new());
    };
    match JsonFileStore::open(path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "falling back to in-memory storage");
            Arc::new(MemoryStore::new())
        }
    }
}

fn lock(viewport: &Mutex<Viewport>) -> MutexGuard<'_, Viewport> {
    viewport.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Components alive while the home page is shown
struct HomePage {
    layout: HomeLayout,
    scroll: SmoothScroll,
    parallax: HorizontalScroll,
    indicator: ScrollIndicator,
    carousel: Carousel,
    logo: Logo,
}

/// The whole site for one browser tab
pub struct Site {
    config: SiteConfig,
    dispatcher: EventDispatcher,
    scheduler: FrameScheduler,
    viewport: Arc<Mutex<Viewport>>,
    root: StyleRoot,
    themes: ThemeStore<SharedStore>,
    editor: ColorEditor,
    nav: NavBar,
    rewards: Vec<RewardCard>,
    route: Route,
    native_scroll: f32,
    home: Option<HomePage>,
}

impl Site {
    /// Assemble the site. Nothing is mounted until [`Site::boot`].
    pub fn new(config: SiteConfig, storage: SharedStore, scheduler: FrameScheduler) -> Self {
        let catalog = ThemeCatalog::builtin();
        let root = StyleRoot::with_catalog(&catalog);
        let themes = ThemeStore::new(storage, catalog)
            .with_storage_key(config.theme.storage_key.clone())
            .with_default_scheme(config.theme.default_scheme.clone());
        let viewport = Arc::new(Mutex::new(config.viewport.viewport()));

        Self {
            config,
            dispatcher: EventDispatcher::new(),
            scheduler,
            viewport,
            root,
            themes,
            editor: ColorEditor::new(),
            nav: NavBar::new(),
            rewards: reward_cards(),
            route: Route::Home,
            native_scroll: 0.0,
            home: None,
        }
    }

    /// Restore the persisted theme and mount the home page.
    ///
    /// Returns the active scheme id.
    pub fn boot(&mut self) -> Result<String> {
        let scheme = self.themes.restore_theme(&mut self.root);
        self.route = Route::Home;
        self.mount_home()?;
        tracing::info!(scheme = %scheme, "site booted");
        Ok(scheme)
    }

    /// Switch pages. Unknown paths show the home page.
    pub fn navigate(&mut self, path: &str) -> Result<()> {
        let route = Route::resolve(path);
        if route == self.route && (route != Route::Home || self.home.is_some()) {
            return Ok(());
        }
        tracing::debug!(from = %self.route, to = %route, "navigate");

        self.home = None;
        self.native_scroll = 0.0;
        self.route = route;
        if self.route == Route::Home {
            self.mount_home()?;
        }
        Ok(())
    }

    fn mount_home(&mut self) -> Result<()> {
        let viewport = self.viewport();
        let layout = HomeLayout::measure(&viewport);

        let measured = Arc::clone(&self.viewport);
        let scroll = SmoothScroll::mount(
            &self.dispatcher,
            &self.scheduler,
            self.config.scroll.spring(),
            move || HomeLayout::measure(&lock(&measured)).content_height,
        )?;
        let probed = Arc::clone(&self.viewport);
        let parallax = HorizontalScroll::mount(
            &scroll.reader(),
            &self.dispatcher,
            layout.scrollbox,
            self.config.parallax.parallax(),
            move || *lock(&probed),
        );
        let indicator = ScrollIndicator::mount(&self.scheduler, INDICATOR_LABEL_HEIGHT);
        let carousel = Carousel::new(self.rewards.len())?;

        self.home = Some(HomePage {
            layout,
            scroll,
            parallax,
            indicator,
            carousel,
            logo: Logo::new(LOGO_SRC).with_alt("Counterspell Taiwan"),
        });
        Ok(())
    }

    /// Native document scroll to `offset_y`, clamped to the page's range
    pub fn scroll_to(&mut self, offset_y: f32) {
        let max = match &self.home {
            Some(home) => home.layout.max_scroll(&self.viewport()),
            None => f32::MAX,
        };
        let offset_y = if offset_y.is_finite() {
            offset_y.clamp(0.0, max)
        } else {
            0.0
        };
        self.native_scroll = offset_y;
        self.dispatcher.dispatch(&mut Event::scroll(offset_y));
    }

    /// Window resize
    pub fn resize(&mut self, width: f32, height: f32) {
        {
            let mut viewport = lock(&self.viewport);
            viewport.width = width;
            viewport.height = height;
        }
        self.dispatcher.dispatch(&mut Event::resize(width, height));

        let viewport = self.viewport();
        if let Some(home) = &mut self.home {
            home.layout = HomeLayout::measure(&viewport);
            home.parallax.set_metrics(home.layout.scrollbox);
        }
        if !ColorEditor::is_visible(width) {
            self.editor.close();
        }
    }

    /// Advance one display refresh
    pub fn tick(&self) -> usize {
        self.scheduler.tick()
    }

    /// Select a color scheme from the editor
    pub fn apply_theme(&mut self, id: &str) -> bool {
        self.editor.select(id, &self.themes, &mut self.root)
    }

    /// Open or close the color editor. Returns whether it is open.
    pub fn toggle_editor(&mut self) -> bool {
        if self.nav.shows_editor_toggle(&self.viewport()) {
            self.editor.toggle(&self.root);
        }
        self.editor.is_open()
    }

    pub fn carousel_next(&mut self) -> bool {
        match &mut self.home {
            Some(home) => {
                home.carousel.next();
                true
            }
            None => false,
        }
    }

    pub fn carousel_prev(&mut self) -> bool {
        match &mut self.home {
            Some(home) => {
                home.carousel.prev();
                true
            }
            None => false,
        }
    }

    /// The logo image failed to load
    pub fn report_logo_error(&mut self) {
        if let Some(home) = &mut self.home {
            home.logo.mark_failed();
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn viewport(&self) -> Viewport {
        *lock(&self.viewport)
    }

    pub fn root(&self) -> &StyleRoot {
        &self.root
    }

    pub fn themes(&self) -> &ThemeStore<SharedStore> {
        &self.themes
    }

    pub fn editor(&self) -> &ColorEditor {
        &self.editor
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn native_scroll(&self) -> f32 {
        self.native_scroll
    }

    /// Smoothed offset, while the home page is mounted
    pub fn smoothed_offset(&self) -> Option<f32> {
        self.home.as_ref().map(|home| home.scroll.smoothed_offset())
    }

    pub fn parallax_frame(&self) -> Option<ParallaxFrame> {
        self.home.as_ref().map(|home| home.parallax.frame())
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.home.as_ref().map(|home| &home.carousel)
    }

    /// Active scheme class on the document root
    pub fn active_scheme(&self) -> Option<String> {
        self.root
            .classes()
            .into_iter()
            .find(|class| class.starts_with(SCHEME_CLASS_PREFIX))
    }

    /// Observable state keyed by element id
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let mut snapshot = DiagnosticsSnapshot::default();
        let viewport = self.viewport();

        snapshot.insert("route", self.route.path());
        snapshot.insert("nav", self.nav.text());
        if let Some(scheme) = self.active_scheme() {
            snapshot.insert("theme", scheme);
        }
        let variables: Vec<String> = ThemeVariable::ALL
            .into_iter()
            .filter_map(|var| {
                let value = self.root.computed_variable(var.css_name())?;
                Some(format!("{}: {}", var.css_name(), value))
            })
            .collect();
        snapshot.insert("theme-variables", variables.join("; "));
        if ColorEditor::is_visible(viewport.width) {
            let state = if self.editor.is_open() { "open" } else { "closed" };
            snapshot.insert(
                "color-editor",
                format!("{state} {}", self.editor.current_scheme()),
            );
        }

        match &self.route {
            Route::Home => {
                if let Some(home) = &self.home {
                    self.snapshot_home(home, &mut snapshot);
                }
            }
            Route::Workshop => {
                snapshot.insert(
                    "workshop-title",
                    format!("{WORKSHOP_TITLE} {WORKSHOP_SUBTITLE}"),
                );
                snapshot.insert(
                    "workshop-info",
                    format!("活動時間: {} 地點: {}", WORKSHOP.time, WORKSHOP.location),
                );
                snapshot.insert(
                    "workshop-background",
                    WorkshopBackground::for_viewport(&viewport).asset(),
                );
            }
            Route::LatestNews => {
                snapshot.insert("latest-news", "Latest News");
                let news = latest_news();
                if news.is_empty() {
                    snapshot.insert("news-empty", EMPTY_NEWS_MESSAGE);
                }
                for item in news {
                    snapshot.insert(format!("news-{}", item.id), format!("{} {}", item.date, item.title));
                }
            }
            Route::NewsDetail { id } => {
                snapshot.insert(
                    "news-detail",
                    format!("Displaying details for news item with ID: {id}"),
                );
            }
        }
        snapshot
    }

    fn snapshot_home(&self, home: &HomePage, snapshot: &mut DiagnosticsSnapshot) {
        snapshot.insert(
            "smooth-scroll",
            format!(
                "raw={:.1} smoothed={:.1}",
                home.scroll.raw_offset(),
                home.scroll.smoothed_offset()
            ),
        );
        snapshot.insert("spacer", format!("{:.0}", home.scroll.spacer_height()));

        let frame = home.parallax.frame();
        let mode = if home.parallax.is_touch() { "native" } else { "pinned" };
        snapshot.insert(
            "horizontal-scroll",
            format!(
                "{mode} progress={:.3} cards={:.1} decorations={:.1}",
                frame.progress, frame.card_translate_x, frame.decoration_translate_x
            ),
        );

        snapshot.insert(
            "carousel",
            format!("current={}", home.carousel.current_index()),
        );
        for (index, card) in self.rewards.iter().enumerate() {
            snapshot.insert(
                format!("carousel-card-{}", card.id),
                format!(
                    "{} {} ${} x{} {}",
                    home.carousel.position_of(index),
                    card.award_name,
                    card.amount,
                    card.people_count,
                    card_background(index)
                ),
            );
        }

        snapshot.insert("scroll-indicator", home.indicator.phase().as_str());
        snapshot.insert(
            "event-time",
            format!("活動時間：{} 活動地點：{}", HACKATHON.time, HACKATHON.location),
        );
        for (index, faq) in faq_cards().iter().enumerate() {
            snapshot.insert(format!("faq-{index}"), format!("{} {}", faq.question, faq.answer));
        }
        let logo = match home.logo.view() {
            LogoView::Image { src, .. } => src,
            LogoView::Placeholder => "placeholder".to_string(),
        };
        snapshot.insert("logo", logo);
    }
}

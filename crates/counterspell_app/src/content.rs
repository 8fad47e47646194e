//! Static page content and the home page's section layout

use counterspell_layout::{ScrollboxMetrics, Viewport};
use serde::Serialize;

/// Prize tier shown in the rewards carousel
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RewardCard {
    pub id: u32,
    /// Prize in NTD
    pub amount: &'static str,
    pub award_name: &'static str,
    pub people_count: u32,
}

pub fn reward_cards() -> Vec<RewardCard> {
    [
        (1, "10000", "金牌", 1),
        (2, "6000", "銀牌", 2),
        (3, "3000", "銅牌", 3),
        (4, "2000", "GenAI特別獎", 3),
        (5, "2000", "佳作", 6),
    ]
    .into_iter()
    .map(|(id, amount, award_name, people_count)| RewardCard {
        id,
        amount,
        award_name,
        people_count,
    })
    .collect()
}

/// Question and answer pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FaqCard {
    pub question: &'static str,
    pub answer: &'static str,
}

pub fn faq_cards() -> [FaqCard; 3] {
    [
        FaqCard {
            question: "報名資格是什麼？",
            answer: "全國各級高中（職）學生、專科一年級至三年級學生，以及非學校型態實驗教育學生均可參加。",
        },
        FaqCard {
            question: "活動是否免費？",
            answer: "是的，參加活動完全免費，並提供豐富的獎品。",
        },
        FaqCard {
            question: "需攜帶哪些物品？",
            answer: "參賽者需攜帶筆記型電腦、充電器、個人衛生用品及其他個人需求物品。具體列表將在活動前公布。",
        },
    ]
}

/// Event time and place
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventInfo {
    pub time: &'static str,
    pub location: &'static str,
}

pub const HACKATHON: EventInfo = EventInfo {
    time: "2024/11/30 - 2024/12/01",
    location: "台北市",
};

pub const WORKSHOP: EventInfo = EventInfo {
    time: "待定",
    location: "台北市",
};

pub const WORKSHOP_TITLE: &str = "Counterspell Taiwan";
pub const WORKSHOP_SUBTITLE: &str = "遊戲入門開發工作坊";

/// Entry of the latest news list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub id: u32,
    pub date: String,
    pub title: String,
    pub image: Option<String>,
}

/// Shown when there is no news
pub const EMPTY_NEWS_MESSAGE: &str = "暫無最新消息，快去喝杯咖啡再回來看看吧！";

/// Published news, newest first
pub fn latest_news() -> Vec<NewsItem> {
    Vec::new()
}

/// Workshop background artwork
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkshopBackground {
    Horizontal,
    Vertical,
}

impl WorkshopBackground {
    pub fn for_viewport(viewport: &Viewport) -> Self {
        if viewport.is_portrait() {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    pub fn asset(self) -> &'static str {
        match self {
            Self::Horizontal => "workshop-background-horizontal.png",
            Self::Vertical => "workshop-background-vertical.png",
        }
    }
}

/// Home page sections, top to bottom
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeSection {
    Hero,
    EventIntroTransition,
    CounterspellIntroduction,
    OrganizerIntroduction,
    Rewards,
    EventInformationTransition,
    EventInformation,
    UfoTransition,
    EventTime,
    TeamQualification,
    Mission,
    HorizontalScroll,
    ContactInfo,
}

impl HomeSection {
    pub const ALL: [HomeSection; 13] = [
        HomeSection::Hero,
        HomeSection::EventIntroTransition,
        HomeSection::CounterspellIntroduction,
        HomeSection::OrganizerIntroduction,
        HomeSection::Rewards,
        HomeSection::EventInformationTransition,
        HomeSection::EventInformation,
        HomeSection::UfoTransition,
        HomeSection::EventTime,
        HomeSection::TeamQualification,
        HomeSection::Mission,
        HomeSection::HorizontalScroll,
        HomeSection::ContactInfo,
    ];

    /// Height in viewport heights; the horizontal scroll section is sized
    /// by its scrollbox instead
    fn viewport_heights(self) -> f32 {
        match self {
            Self::Rewards => 0.9,
            Self::EventInformation => 1.2,
            Self::EventTime => 0.8,
            Self::ContactInfo => 0.6,
            Self::HorizontalScroll => 0.0,
            _ => 1.0,
        }
    }
}

/// Panels in the horizontal card row
pub const HORIZONTAL_PANELS: f32 = 3.0;

/// Horizontal scroll section height when laid out natively (touch devices)
pub const HORIZONTAL_NATIVE_HEIGHT: f32 = 720.0;

/// Measured home page geometry for one viewport
#[derive(Clone, Debug, PartialEq)]
pub struct HomeLayout {
    pub content_height: f32,
    pub scrollbox: ScrollboxMetrics,
}

impl HomeLayout {
    pub fn measure(viewport: &Viewport) -> Self {
        let container_width = viewport.width * HORIZONTAL_PANELS;
        let scrollbox_height = if viewport.is_touch() {
            HORIZONTAL_NATIVE_HEIGHT
        } else {
            container_width
        };

        let mut top = 0.0;
        let mut scrollbox_top = 0.0;
        for section in HomeSection::ALL {
            if section == HomeSection::HorizontalScroll {
                scrollbox_top = top;
                top += scrollbox_height;
            } else {
                top += section.viewport_heights() * viewport.height;
            }
        }

        Self {
            content_height: top,
            scrollbox: ScrollboxMetrics {
                document_top: scrollbox_top,
                container_width,
                natural_height: HORIZONTAL_NATIVE_HEIGHT,
            },
        }
    }

    /// Largest native scroll offset
    pub fn max_scroll(&self, viewport: &Viewport) -> f32 {
        (self.content_height - viewport.height).max(0.0)
    }
}

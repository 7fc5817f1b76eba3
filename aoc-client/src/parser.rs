//! HTML response classification
//!
//! Every assumption about the site's wording and markup lives in this module.

use crate::client::Outcome;
use crate::duration::WaitDuration;
use crate::error::ClientError;
use regex::Regex;
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::sync::OnceLock;

const CORRECT_MARKER: &str = "That's the right answer";
const WRONG_MARKER: &str = "That's not the right answer";
const TOO_RECENT_MARKER: &str = "You gave an answer too recently";

const ONE_STAR_CLASS: &str = "calendar-complete";
const TWO_STAR_CLASS: &str = "calendar-verycomplete";
const DAY_CLASS_PREFIX: &str = "calendar-day";

/// Stars collected in one event year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearStars {
    pub year: u16,
    pub stars: u32,
}

/// Completion level of a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum StarLevel {
    Zero = 0,
    One = 1,
    Two = 2,
}

/// Completion level of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayStars {
    pub day: u8,
    pub level: StarLevel,
}

/// Parser for AOC HTML responses with cached regex patterns and selectors
#[derive(Clone, Debug, Default)]
pub(crate) struct ResponseParser {
    user_id_regex: OnceLock<Regex>,
    leading_brackets_regex: OnceLock<Regex>,
    event_year_regex: OnceLock<Regex>,
    event_stars_regex: OnceLock<Regex>,
    main_selector: OnceLock<Selector>,
    event_selector: OnceLock<Selector>,
    calendar_day_selector: OnceLock<Selector>,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn user_id_regex(&self) -> &Regex {
        self.user_id_regex
            .get_or_init(|| Regex::new(r"\(anonymous user #(\d+)\)").unwrap())
    }

    fn leading_brackets_regex(&self) -> &Regex {
        self.leading_brackets_regex
            .get_or_init(|| Regex::new(r"^(?:\s*\[[^\]]*\])+\s*").unwrap())
    }

    fn event_year_regex(&self) -> &Regex {
        self.event_year_regex
            .get_or_init(|| Regex::new(r"\[(\d{4})\]").unwrap())
    }

    fn event_stars_regex(&self) -> &Regex {
        self.event_stars_regex
            .get_or_init(|| Regex::new(r"(\d+)\s*\*").unwrap())
    }

    fn main_selector(&self) -> &Selector {
        self.main_selector
            .get_or_init(|| Selector::parse("main").unwrap())
    }

    fn event_selector(&self) -> &Selector {
        self.event_selector
            .get_or_init(|| Selector::parse(".eventlist-event").unwrap())
    }

    fn calendar_day_selector(&self) -> &Selector {
        self.calendar_day_selector
            .get_or_init(|| Selector::parse(r#"[class*="calendar-day"]"#).unwrap())
    }

    /// Extract user ID from settings page HTML
    pub fn extract_user_id(&self, html: &str) -> Option<u64> {
        let captures = self.user_id_regex().captures(html)?;
        captures.get(1)?.as_str().parse::<u64>().ok()
    }

    /// Text of the `<main>` element, trimmed and without leading `[...]` groups
    pub fn extract_main_text(&self, html: &str) -> Result<String, ClientError> {
        let document = Html::parse_document(html);
        let main_element = document
            .select(self.main_selector())
            .next()
            .ok_or(ClientError::HtmlParse)?;

        let text = main_element.text().collect::<String>();
        let stripped = self.leading_brackets_regex().replace(text.trim(), "");
        Ok(stripped.trim().to_string())
    }

    /// Classify the reply to an answer submission
    pub fn classify_submission(
        &self,
        status: StatusCode,
        html: &str,
    ) -> Result<Outcome, ClientError> {
        if status != StatusCode::OK {
            return Err(ClientError::InvalidSession);
        }

        let text = self.extract_main_text(html)?;

        if text.contains(CORRECT_MARKER) {
            return Ok(Outcome::Success);
        }

        if text.contains(WRONG_MARKER) {
            return Ok(Outcome::Wrong(text));
        }

        if text.contains(TOO_RECENT_MARKER)
            && let Some(wait) = WaitDuration::parse(&text)
        {
            return Err(ClientError::RateLimited { wait });
        }

        Err(ClientError::SolveError(text))
    }

    /// Parse the events page into per-year star counts
    ///
    /// Anonymous visitors get the same list without counts, which parse as zero.
    pub fn parse_events(&self, html: &str) -> Vec<YearStars> {
        let document = Html::parse_document(html);
        document
            .select(self.event_selector())
            .filter_map(|entry| {
                let text = entry.text().collect::<String>();
                let year = self
                    .event_year_regex()
                    .captures(&text)?
                    .get(1)?
                    .as_str()
                    .parse::<u16>()
                    .ok()?;
                let stars = self
                    .event_stars_regex()
                    .captures(&text)
                    .and_then(|c| c.get(1)?.as_str().parse::<u32>().ok())
                    .unwrap_or(0);
                Some(YearStars { year, stars })
            })
            .collect()
    }

    /// Parse a year's calendar page into per-day star levels, ordered by day
    pub fn parse_calendar(&self, html: &str) -> Vec<DayStars> {
        let document = Html::parse_document(html);
        let mut days: BTreeMap<u8, StarLevel> = BTreeMap::new();

        for element in document.select(self.calendar_day_selector()) {
            let Some(day) = calendar_day(element) else {
                continue;
            };
            let level = star_level(element);
            days.entry(day)
                .and_modify(|existing| *existing = (*existing).max(level))
                .or_insert(level);
        }

        days.into_iter()
            .map(|(day, level)| DayStars { day, level })
            .collect()
    }
}

fn calendar_day(element: ElementRef<'_>) -> Option<u8> {
    element
        .value()
        .classes()
        .filter_map(|class| class.strip_prefix(DAY_CLASS_PREFIX))
        .find_map(|digits| digits.parse::<u8>().ok())
}

fn star_level(element: ElementRef<'_>) -> StarLevel {
    let mut level = StarLevel::Zero;
    for class in element.value().classes() {
        match class {
            TWO_STAR_CLASS => return StarLevel::Two,
            ONE_STAR_CLASS => level = StarLevel::One,
            _ => {}
        }
    }
    level
}

//! Wait-time parsing for rate-limit messages
//!
//! The submission endpoint states its cooldown in prose ("Please wait one
//! minute") or in shorthand ("You have 4m 23s left to wait"). Both shapes are
//! recognised here and normalised into a [`WaitDuration`].

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

static SPELLED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(one|two|three|four|five|six|seven|eight|nine|ten)\s+(second|minute|hour|day)s?\b",
    )
    .unwrap()
});

// Group 3 catches a unit letter glued to more letters (`10ms`, `5min`); those are not tokens.
static SHORTHAND_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)([dhms])([[:alpha:]])?").unwrap());

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// A wait period broken down into calendar-ish units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WaitDuration {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl WaitDuration {
    /// Extract a wait time from free text
    ///
    /// A spelled-out quantity ("one" to "ten") followed by a unit word wins
    /// whenever it is present, and contributes exactly one unit. Otherwise
    /// every shorthand token such as `1h` or `30m` is summed. Returns `None`
    /// when neither form appears.
    ///
    /// # Example
    ///
    /// ```
    /// use aoc_client::WaitDuration;
    ///
    /// let wait = WaitDuration::parse("You have 1h 5m left to wait.").unwrap();
    /// assert_eq!(wait.as_millis(), 3_900_000);
    /// assert!(WaitDuration::parse("garbage").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_spelled(text).or_else(|| Self::parse_shorthand(text))
    }

    fn parse_spelled(text: &str) -> Option<Self> {
        let captures = SPELLED_REGEX.captures(text)?;
        let amount = spelled_number(captures.get(1)?.as_str())?;
        let mut wait = Self::default();
        wait.add_unit(unit_letter(captures.get(2)?.as_str())?, amount);
        Some(wait)
    }

    fn parse_shorthand(text: &str) -> Option<Self> {
        let mut wait = Self::default();
        let mut found = false;

        for captures in SHORTHAND_REGEX.captures_iter(text) {
            if captures.get(3).is_some() {
                continue;
            }
            let Ok(amount) = captures[1].parse::<u64>() else {
                continue;
            };
            let Some(unit) = captures[2].chars().next() else {
                continue;
            };
            wait.add_unit(unit, amount);
            found = true;
        }

        found.then_some(wait)
    }

    fn add_unit(&mut self, unit: char, amount: u64) {
        let slot = match unit {
            'd' => &mut self.days,
            'h' => &mut self.hours,
            'm' => &mut self.minutes,
            _ => &mut self.seconds,
        };
        *slot = slot.saturating_add(amount);
    }

    /// Total length in whole seconds
    pub fn total_seconds(&self) -> u64 {
        self.days
            .saturating_mul(SECS_PER_DAY)
            .saturating_add(self.hours.saturating_mul(SECS_PER_HOUR))
            .saturating_add(self.minutes.saturating_mul(SECS_PER_MINUTE))
            .saturating_add(self.seconds)
    }

    /// Total length in milliseconds
    pub fn as_millis(&self) -> u128 {
        u128::from(self.total_seconds()) * 1000
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.total_seconds())
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl From<Duration> for WaitDuration {
    fn from(duration: Duration) -> Self {
        let secs = duration.as_secs();
        Self {
            days: secs / SECS_PER_DAY,
            hours: secs % SECS_PER_DAY / SECS_PER_HOUR,
            minutes: secs % SECS_PER_HOUR / SECS_PER_MINUTE,
            seconds: secs % SECS_PER_MINUTE,
        }
    }
}

impl fmt::Display for WaitDuration {
    /// Renders non-zero units only, e.g. `1h 5m`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            (self.days, 'd'),
            (self.hours, 'h'),
            (self.minutes, 'm'),
            (self.seconds, 's'),
        ];

        let mut first = true;
        for (value, unit) in parts.into_iter().filter(|(value, _)| *value > 0) {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", value, unit)?;
            first = false;
        }

        if first {
            f.write_str("0s")?;
        }
        Ok(())
    }
}

/// Render a remaining cooldown, always showing minutes and seconds
///
/// Larger units appear only when non-zero and sub-second precision is
/// truncated, so `59.9s` renders as `0m 59s`.
pub fn countdown(remaining: Duration) -> String {
    let wait = WaitDuration::from(remaining);
    let mut out = String::new();
    if wait.days > 0 {
        out.push_str(&format!("{}d ", wait.days));
    }
    if wait.days > 0 || wait.hours > 0 {
        out.push_str(&format!("{}h ", wait.hours));
    }
    out.push_str(&format!("{}m {}s", wait.minutes, wait.seconds));
    out
}

fn spelled_number(word: &str) -> Option<u64> {
    let value = match word.to_ascii_lowercase().as_str() {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        _ => return None,
    };
    Some(value)
}

fn unit_letter(word: &str) -> Option<char> {
    match word.to_ascii_lowercase().as_str() {
        "second" => Some('s'),
        "minute" => Some('m'),
        "hour" => Some('h'),
        "day" => Some('d'),
        _ => None,
    }
}

//! Day arithmetic and date formatting over epoch seconds.
//!
//! Nothing here reads process-wide state except `TimeZoneSetting::Local`,
//! which asks the operating system for its current offset. Everything else
//! is driven by the `DateConfig` passed in.

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};
use chrono_tz::Tz;

pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-dd";
pub const EMPTY_DATE_TEXT: &str = "-";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimeZoneSetting {
    Utc,
    Local,
    /// Seconds east of UTC.
    Fixed(i32),
    Named(Tz),
}

impl TimeZoneSetting {
    pub fn offset_at(&self, time: i64) -> i64 {
        let Some(instant) = DateTime::<Utc>::from_timestamp(time, 0) else {
            return 0;
        };
        let naive = instant.naive_utc();
        let seconds = match self {
            TimeZoneSetting::Utc => 0,
            TimeZoneSetting::Local => Local.offset_from_utc_datetime(&naive).local_minus_utc(),
            TimeZoneSetting::Fixed(seconds) => *seconds,
            TimeZoneSetting::Named(tz) => {
                tz.offset_from_utc_datetime(&naive).fix().local_minus_utc()
            }
        };
        i64::from(seconds)
    }

    pub fn current_offset(&self) -> i64 {
        self.offset_at(now())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DateConfig {
    pub pattern: String,
    pub time_zone: TimeZoneSetting,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_PATTERN.to_string(),
            time_zone: TimeZoneSetting::Utc,
        }
    }
}

impl DateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(mut self, value: impl Into<String>) -> Self {
        self.pattern = value.into();
        self
    }

    pub fn time_zone(mut self, value: TimeZoneSetting) -> Self {
        self.time_zone = value;
        self
    }

    /// Uses an IANA zone such as `Europe/Warsaw`. Unknown identifiers fall
    /// back to UTC.
    pub fn with_time_zone_name(mut self, identifier: &str) -> Self {
        self.time_zone = match identifier.parse::<Tz>() {
            Ok(tz) => TimeZoneSetting::Named(tz),
            Err(_) => {
                tracing::warn!(identifier, "unknown time zone, falling back to UTC");
                TimeZoneSetting::Utc
            }
        };
        self
    }

    pub fn utc_offset_seconds(&self) -> i64 {
        self.time_zone.current_offset()
    }
}

/// How a date field decides where a calendar day starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum DateMode {
    #[default]
    Utc,
    Local,
}

impl DateMode {
    /// Offset used for a single conversion. Always zero in UTC mode.
    pub fn offset(self, config: &DateConfig) -> i64 {
        match self {
            DateMode::Utc => 0,
            DateMode::Local => config.utc_offset_seconds(),
        }
    }

    /// `None` when the day start does not fit in an `i64`.
    pub fn day_start(self, time: i64, offset: i64) -> Option<i64> {
        match self {
            DateMode::Utc => day_utc(time),
            DateMode::Local => day_with_offset(time, offset),
        }
    }
}

pub fn now() -> i64 {
    Utc::now().timestamp()
}

pub fn now_with_utc_offset(config: &DateConfig) -> i64 {
    let time = now();
    time + config.time_zone.offset_at(time)
}

pub fn now_with_negative_utc_offset(config: &DateConfig) -> i64 {
    let time = now();
    time - config.time_zone.offset_at(time)
}

pub fn utc_offset_seconds(config: &DateConfig) -> i64 {
    config.utc_offset_seconds()
}

pub fn utc_offset_hours(config: &DateConfig) -> i64 {
    config.utc_offset_seconds() / SECONDS_PER_HOUR
}

pub fn day_utc(time: i64) -> Option<i64> {
    time.div_euclid(SECONDS_PER_DAY).checked_mul(SECONDS_PER_DAY)
}

/// Start of the day containing `time` in a zone `offset` seconds east of
/// UTC, expressed as a UTC instant. `None` on overflow.
pub fn day_with_offset(time: i64, offset: i64) -> Option<i64> {
    day_utc(time.checked_add(offset)?)?.checked_sub(offset)
}

pub fn day_local(time: i64, config: &DateConfig) -> Option<i64> {
    day_with_offset(time, config.utc_offset_seconds())
}

pub fn format_date(time: Option<i64>, config: &DateConfig) -> String {
    match time {
        Some(time) => format_with_offset(time, config.time_zone.offset_at(time), &config.pattern),
        None => EMPTY_DATE_TEXT.to_string(),
    }
}

pub fn format_date_utc(time: Option<i64>, config: &DateConfig) -> String {
    match time {
        Some(time) => format_with_offset(time, 0, &config.pattern),
        None => EMPTY_DATE_TEXT.to_string(),
    }
}

pub fn format_with_offset(time: i64, offset: i64, pattern: &str) -> String {
    let offset = i32::try_from(offset)
        .ok()
        .and_then(FixedOffset::east_opt)
        .unwrap_or(Utc.fix());
    match DateTime::<Utc>::from_timestamp(time, 0) {
        Some(instant) => instant
            .with_timezone(&offset)
            .format(&strftime_pattern(pattern))
            .to_string(),
        None => {
            tracing::warn!(time, "timestamp out of range for formatting");
            EMPTY_DATE_TEXT.to_string()
        }
    }
}

/// Translates a `yyyy-MM-dd` style pattern into a chrono format string.
///
/// Supported tokens: `yyyy yy MM M dd d HH H mm ss`. Text inside single
/// quotes is literal, `''` is a single quote, every other character is
/// copied as is.
pub fn strftime_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                out.push('\'');
                continue;
            }
            for quoted in chars.by_ref() {
                if quoted == '\'' {
                    break;
                }
                push_literal(&mut out, quoted);
            }
            continue;
        }

        if !ch.is_ascii_alphabetic() {
            push_literal(&mut out, ch);
            continue;
        }

        let mut run = 1;
        while chars.peek() == Some(&ch) {
            chars.next();
            run += 1;
        }

        let token = match (ch, run) {
            ('y', 2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('M', 1) => Some("%-m"),
            ('M', _) => Some("%m"),
            ('d', 1) => Some("%-d"),
            ('d', _) => Some("%d"),
            ('H', 1) => Some("%-H"),
            ('H', _) => Some("%H"),
            ('m', 1) => Some("%-M"),
            ('m', _) => Some("%M"),
            ('s', 1) => Some("%-S"),
            ('s', _) => Some("%S"),
            _ => None,
        };
        match token {
            Some(token) => out.push_str(token),
            None => {
                for _ in 0..run {
                    out.push(ch);
                }
            }
        }
    }
    out
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

//! Minimal iCal (RFC 5545) reader
//!
//! Only `SUMMARY`, `DTSTART` and `DTEND` inside `VEVENT` blocks are read.
//! There is no recurrence expansion and no timezone lookup: a trailing `Z`
//! or a `TZID` parameter is ignored and the wall-clock digits are used as-is.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use thiserror::Error;

use super::CalendarEvent;
use crate::error::{ImportError, ImportResult};
use crate::{fractional_hour, within_display_window};

/// Title used when a block carries no SUMMARY line
pub const UNTITLED_EVENT: &str = "Untitled Event";

static FOLDED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]").expect("folded line pattern"));
static VEVENT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)BEGIN:VEVENT(.*?)END:VEVENT").expect("vevent pattern"));
static SUMMARY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SUMMARY:(.+)").expect("summary pattern"));
static DTSTART_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)DTSTART[^:]*:([0-9]{8}T?[0-9]{0,6}Z?)").expect("dtstart pattern")
});
static DTEND_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)DTEND[^:]*:([0-9]{8}T?[0-9]{0,6}Z?)").expect("dtend pattern")
});

/// Why a DTSTART/DTEND value could not be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp '{0}' has fewer than 8 date digits")]
    TooShort(String),

    #[error("no such date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("no such time {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
}

/// Parse raw iCal text into admitted events, in source order.
///
/// Blocks with a missing or undecodable DTSTART/DTEND, or whose hours fall
/// outside the 8:00-18:00 window, are dropped without error.
pub fn parse(raw: &str) -> Vec<CalendarEvent> {
    let unfolded = FOLDED_LINE.replace_all(raw, "");

    VEVENT_BLOCK
        .captures_iter(&unfolded)
        .enumerate()
        .filter_map(|(index, caps)| {
            let block = caps.get(1).map_or("", |m| m.as_str());
            parse_block(index, block)
        })
        .collect()
}

/// Parse and require at least one admitted event.
pub fn import(raw: &str) -> ImportResult<Vec<CalendarEvent>> {
    let events = parse(raw);
    if events.is_empty() {
        log::warn!("Calendar import admitted no events");
        return Err(ImportError::NoEvents);
    }
    log::info!("Imported {} calendar events", events.len());
    Ok(events)
}

fn parse_block(index: usize, block: &str) -> Option<CalendarEvent> {
    let title = SUMMARY_LINE
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| unescape_text(m.as_str().trim()))
        .unwrap_or_else(|| UNTITLED_EVENT.to_string());

    let Some(raw_start) = first_capture(&DTSTART_LINE, block) else {
        log::debug!("VEVENT #{index} '{title}' dropped: no DTSTART");
        return None;
    };
    let Some(raw_end) = first_capture(&DTEND_LINE, block) else {
        log::debug!("VEVENT #{index} '{title}' dropped: no DTEND");
        return None;
    };

    let (start, end) = match (parse_timestamp(raw_start), parse_timestamp(raw_end)) {
        (Ok(start), Ok(end)) => (start, end),
        (Err(e), _) | (_, Err(e)) => {
            log::debug!("VEVENT #{index} '{title}' dropped: {e}");
            return None;
        }
    };

    // Only the wall-clock hours matter; the end date is not compared.
    let start_hour = fractional_hour(start.hour(), start.minute());
    let end_hour = fractional_hour(end.hour(), end.minute());
    if !within_display_window(start_hour, end_hour) {
        log::debug!(
            "VEVENT #{index} '{title}' dropped: {start_hour:.2}-{end_hour:.2} outside display window"
        );
        return None;
    }

    Some(CalendarEvent {
        day: start.weekday().num_days_from_sunday(),
        start: start_hour,
        end: end_hour,
        title,
    })
}

fn first_capture<'a>(re: &Regex, block: &'a str) -> Option<&'a str> {
    re.captures(block).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Decode `YYYYMMDD[THH[MM[SS]]][Z]` into a local wall-clock date and time.
///
/// Missing time digits default to zero; a date-only value is midnight.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let has_time = raw.contains(['T', 't']);
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 8 {
        return Err(TimestampError::TooShort(raw.to_string()));
    }

    let year = digit_field(&digits, 0, 4) as i32;
    let month = digit_field(&digits, 4, 6);
    let day = digit_field(&digits, 6, 8);
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(TimestampError::InvalidDate { year, month, day })?;

    let (hour, minute, second) = if has_time {
        (
            digit_field(&digits, 8, 10),
            digit_field(&digits, 10, 12),
            digit_field(&digits, 12, 14),
        )
    } else {
        (0, 0, 0)
    };
    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or(TimestampError::InvalidTime {
        hour,
        minute,
        second,
    })?;

    Ok(date.and_time(time))
}

/// Positional slice of an all-digit string; absent digits read as 0
fn digit_field(digits: &str, from: usize, to: usize) -> u32 {
    let len = digits.len();
    digits[from.min(len)..to.min(len)].parse().unwrap_or(0)
}

/// Undo RFC 5545 TEXT escaping; line breaks collapse to spaces for brick labels
fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push(' '),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

//! Deterministic extraction used when the model attempt fails.
//!
//! Date and time recognition is regex-driven and intentionally best-effort:
//! the first whitespace token becomes the provisional summary, fuzzy
//! date/time extraction fills in the rest, and the text after the first
//! bare "in"/"at" becomes the location.

use crate::error::{extraction_error, AssistantResult};
use crate::event::EventDetails;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISO_DATE_RE: Regex =
        Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("Failed to compile ISO_DATE_RE regex");
    static ref DAY_WORD_RE: Regex = Regex::new(r"(?i)\b(today|tomorrow|yesterday)\b")
        .expect("Failed to compile DAY_WORD_RE regex");
    static ref WEEKDAY_RE: Regex = Regex::new(
        r"(?i)\b(?:(next)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b"
    )
    .expect("Failed to compile WEEKDAY_RE regex");
    static ref MONTH_DAY_RE: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b"
    )
    .expect("Failed to compile MONTH_DAY_RE regex");
    static ref DAY_MONTH_RE: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\b"
    )
    .expect("Failed to compile DAY_MONTH_RE regex");
    static ref CLOCK_RE: Regex = Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*(am|pm)?\b")
        .expect("Failed to compile CLOCK_RE regex");
    static ref HOUR_AMPM_RE: Regex =
        Regex::new(r"(?i)\b(\d{1,2})\s*(am|pm)\b").expect("Failed to compile HOUR_AMPM_RE regex");
    static ref NOON_RE: Regex =
        Regex::new(r"(?i)\bnoon\b").expect("Failed to compile NOON_RE regex");
    static ref MIDNIGHT_RE: Regex =
        Regex::new(r"(?i)\bmidnight\b").expect("Failed to compile MIDNIGHT_RE regex");
}

/// Best-effort date and time pulled out of free text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMoment {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Heuristic extraction relative to `today`. Never fails: fields that
/// cannot be derived stay null.
pub fn extract(text: &str, today: NaiveDate) -> EventDetails {
    let mut details = EventDetails {
        summary: text.split_whitespace().next().map(str::to_string),
        ..Default::default()
    };

    // A failed fuzzy parse leaves date, time and location all null
    let Ok(moment) = parse_fuzzy(text, today) else {
        return details;
    };

    details.date = Some(moment.date.format("%Y-%m-%d").to_string());
    // Midnight is the "no time component" marker, matching the default a
    // date-only parse produces
    if moment.time != NaiveTime::MIN {
        details.time = Some(moment.time.format("%H:%M").to_string());
    }
    details.location = find_location(text);
    details
}

/// Fuzzy date/time extraction. A missing date defaults to `today`, a
/// missing time to midnight; fails when the text holds neither.
pub fn parse_fuzzy(text: &str, today: NaiveDate) -> AssistantResult<FuzzyMoment> {
    let date = find_date(text, today);
    let time = find_time(text);
    if date.is_none() && time.is_none() {
        return Err(extraction_error("No discernible date or time in input"));
    }
    Ok(FuzzyMoment {
        date: date.unwrap_or(today),
        time: time.unwrap_or(NaiveTime::MIN),
    })
}

fn find_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = ISO_DATE_RE.captures(text) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DAY_WORD_RE.captures(text) {
        let offset = match caps[1].to_lowercase().as_str() {
            "today" => 0,
            "tomorrow" => 1,
            _ => -1,
        };
        return Some(today + Duration::days(offset));
    }

    if let Some(caps) = WEEKDAY_RE.captures(text) {
        let target = weekday_from_name(&caps[2])?;
        let current = today.weekday().num_days_from_monday() as i64;
        let wanted = target.num_days_from_monday() as i64;
        let mut ahead = (wanted - current).rem_euclid(7);
        // "next <weekday>" means the occurrence in the following week
        if caps.get(1).is_some() {
            ahead = if ahead == 0 { 7 } else { ahead + 7 };
        }
        return Some(today + Duration::days(ahead));
    }

    if let Some(caps) = MONTH_DAY_RE.captures(text) {
        let month = month_from_abbr(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(today.year(), month, day);
    }

    if let Some(caps) = DAY_MONTH_RE.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_abbr(&caps[2])?;
        return NaiveDate::from_ymd_opt(today.year(), month, day);
    }

    None
}

fn find_time(text: &str) -> Option<NaiveTime> {
    if let Some(caps) = CLOCK_RE.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        let hour = match caps.get(3) {
            Some(meridiem) => to_24_hour(hour, &meridiem.as_str().to_lowercase()),
            None => hour,
        };
        if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
            return Some(time);
        }
    }

    if let Some(caps) = HOUR_AMPM_RE.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let hour = to_24_hour(hour, &caps[2].to_lowercase());
        if let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) {
            return Some(time);
        }
    }

    if NOON_RE.is_match(text) {
        return NaiveTime::from_hms_opt(12, 0, 0);
    }
    if MIDNIGHT_RE.is_match(text) {
        return NaiveTime::from_hms_opt(0, 0, 0);
    }

    None
}

/// Everything after the first bare "in"/"at"; prepositions that introduce
/// a time or date expression are skipped
fn find_location(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if (lower == "in" || lower == "at") && i + 1 < words.len() {
            if is_time_or_date_token(words[i + 1]) {
                continue;
            }
            return Some(words[i + 1..].join(" "));
        }
    }
    None
}

fn is_time_or_date_token(word: &str) -> bool {
    CLOCK_RE.is_match(word)
        || HOUR_AMPM_RE.is_match(word)
        || NOON_RE.is_match(word)
        || MIDNIGHT_RE.is_match(word)
        || DAY_WORD_RE.is_match(word)
        || WEEKDAY_RE.is_match(word)
        || ISO_DATE_RE.is_match(word)
}

fn to_24_hour(hour: u32, meridiem: &str) -> u32 {
    match (hour, meridiem) {
        (12, "am") => 0,
        (h, "am") => h,
        (12, "pm") => 12,
        (h, "pm") => h + 12,
        (h, _) => h,
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn month_from_abbr(abbr: &str) -> Option<u32> {
    match abbr.to_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

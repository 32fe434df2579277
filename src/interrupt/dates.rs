//! Date forms used by date interrupts
//!
//! The transcript shows dates as `DD.MM.YYYY`; calendar input arrives as
//! `YYYY-MM-DD`. All functions here are pure.

use chrono::{Days, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

const DISPLAY_FORMAT: &str = "%d.%m.%Y";
const CALENDAR_FORMAT: &str = "%Y-%m-%d";

static DISPLAY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("valid display date regex"));
static CALENDAR_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid calendar date regex"));

/// Whether `text` has the `DD.MM.YYYY` shape (the calendar validity is not checked)
pub fn is_display_date(text: &str) -> bool {
    DISPLAY_DATE.is_match(text)
}

/// Whether `text` has the `YYYY-MM-DD` shape
pub fn is_calendar_date(text: &str) -> bool {
    CALENDAR_DATE.is_match(text)
}

/// Parse a `DD.MM.YYYY` value; `None` for other shapes or impossible dates
pub fn parse_display(text: &str) -> Option<NaiveDate> {
    if !is_display_date(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, DISPLAY_FORMAT).ok()
}

/// Parse a `YYYY-MM-DD` value
pub fn parse_calendar(text: &str) -> Option<NaiveDate> {
    if !is_calendar_date(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, CALENDAR_FORMAT).ok()
}

pub fn format_display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

pub fn format_calendar(date: NaiveDate) -> String {
    date.format(CALENDAR_FORMAT).to_string()
}

/// `YYYY-MM-DD` -> `DD.MM.YYYY`
pub fn calendar_to_display(text: &str) -> Option<String> {
    parse_calendar(text).map(format_display)
}

/// The following calendar day; `None` only at the end of the representable range
pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}

//! Date formatting for the TIME token.
//!
//! Format strings use the single-letter codes familiar from PHP's `date()`
//! (`Y-m-d H:i`), so existing templates keep working. A backslash makes the
//! next character literal; unknown letters are copied through.

use chrono::{DateTime, Datelike, NaiveDate, Timelike};
use chrono_tz::Tz;
use std::fmt::Write;

pub fn format_date(format: &str, time: &DateTime<Tz>) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(literal) = chars.next() {
                out.push(literal);
            }
            continue;
        }
        write_code(&mut out, c, time);
    }

    out
}

fn write_code(out: &mut String, code: char, t: &DateTime<Tz>) {
    // Writing into a String cannot fail
    let _ = match code {
        // Day
        'd' => write!(out, "{:02}", t.day()),
        'D' => write!(out, "{}", t.format("%a")),
        'j' => write!(out, "{}", t.day()),
        'l' => write!(out, "{}", t.format("%A")),
        'N' => write!(out, "{}", t.weekday().number_from_monday()),
        'w' => write!(out, "{}", t.weekday().num_days_from_sunday()),
        'z' => write!(out, "{}", t.ordinal0()),
        // Week
        'W' => write!(out, "{:02}", t.iso_week().week()),
        // Month
        'F' => write!(out, "{}", t.format("%B")),
        'm' => write!(out, "{:02}", t.month()),
        'M' => write!(out, "{}", t.format("%b")),
        'n' => write!(out, "{}", t.month()),
        't' => write!(out, "{}", days_in_month(t.year(), t.month())),
        // Year
        'L' => write!(out, "{}", u8::from(NaiveDate::from_ymd_opt(t.year(), 2, 29).is_some())),
        'Y' => write!(out, "{}", t.year()),
        'y' => write!(out, "{:02}", t.year().rem_euclid(100)),
        // Time
        'a' => write!(out, "{}", if t.hour() < 12 { "am" } else { "pm" }),
        'A' => write!(out, "{}", if t.hour() < 12 { "AM" } else { "PM" }),
        'g' => write!(out, "{}", t.hour12().1),
        'G' => write!(out, "{}", t.hour()),
        'h' => write!(out, "{:02}", t.hour12().1),
        'H' => write!(out, "{:02}", t.hour()),
        'i' => write!(out, "{:02}", t.minute()),
        's' => write!(out, "{:02}", t.second()),
        'u' => write!(out, "{:06}", t.nanosecond() % 1_000_000_000 / 1_000),
        'v' => write!(out, "{:03}", t.nanosecond() % 1_000_000_000 / 1_000_000),
        // Time zone
        'e' => write!(out, "{}", t.timezone().name()),
        'T' => write!(out, "{}", t.format("%Z")),
        'P' => write!(out, "{}", t.format("%:z")),
        'O' => write!(out, "{}", t.format("%z")),
        // Full date/time
        'c' => write!(out, "{}", t.format("%Y-%m-%dT%H:%M:%S%:z")),
        'r' => write!(out, "{}", t.to_rfc2822()),
        'U' => write!(out, "{}", t.timestamp()),
        other => write!(out, "{}", other),
    };
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

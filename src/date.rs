//! HTTP-date parsing and formatting (RFC 7231 §7.1.1.1), plus the lenient
//!
//! The teacher's `headers/date.rs` delegates to `chrono`'s own format
//! strings for both directions. That's too permissive for the lenient,
//! token-order-independent parse that legacy obs-date traffic needs,
//! so parsing is hand-rolled here; `chrono::{DateTime, Utc}` is kept as
//! the calendar representation the rest of the crate hands around.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{HttpWireError, Result};

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn is_delimiter(b: u8) -> bool {
    matches!(b,
        0x09 | 0x20
        | 0x21..=0x2F
        | 0x3B..=0x40
        | 0x5B..=0x60
        | 0x7B..=0x7E
    )
}

fn tokenize(s: &str) -> Vec<&str> {
    s.split(|c: char| is_delimiter(c as u8))
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Default)]
struct ParsedFields {
    time: Option<(u32, u32, u32)>,
    day: Option<u32>,
    month: Option<u32>,
    year: Option<i32>,
}

fn classify_time(tok: &str) -> Option<(u32, u32, u32)> {
    if !(5..=8).contains(&tok.len()) {
        return None;
    }
    let parts: Vec<&str> = tok.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    if !parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    let h: u32 = parts[0].parse().ok()?;
    let m: u32 = parts[1].parse().ok()?;
    let s: u32 = parts[2].parse().ok()?;
    Some((h, m, s))
}

fn classify_day(tok: &str) -> Option<u32> {
    if (1..=2).contains(&tok.len()) && tok.bytes().all(|b| b.is_ascii_digit()) {
        tok.parse().ok()
    } else {
        None
    }
}

fn classify_month(tok: &str) -> Option<u32> {
    if tok.len() != 3 {
        return None;
    }
    let lower = tok.to_ascii_lowercase();
    MONTHS.iter().position(|m| *m == lower).map(|i| (i + 1) as u32)
}

fn classify_year(tok: &str) -> Option<i32> {
    if !tok.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match tok.len() {
        2 => {
            let v: i32 = tok.parse().ok()?;
            Some(if v < 70 { 2000 + v } else { 1900 + v })
        }
        4 => {
            let v: i32 = tok.parse().ok()?;
            if v >= 1601 {
                Some(v)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Parses an HTTP-date, tolerating token reordering and the legacy
/// two-digit-year / obs-date shapes. Returns the result truncated to
/// whole seconds.
pub fn parse_http_date(input: &str) -> Result<DateTime<Utc>> {
    if input.len() > 64 {
        return Err(HttpWireError::malformed_date(format!(
            "input length {} exceeds 64 characters",
            input.len()
        )));
    }

    let mut fields = ParsedFields::default();
    for tok in tokenize(input) {
        if fields.time.is_none() {
            if let Some(t) = classify_time(tok) {
                fields.time = Some(t);
                continue;
            }
        }
        if fields.month.is_none() {
            if let Some(m) = classify_month(tok) {
                fields.month = Some(m);
                continue;
            }
        }
        // Day-of-month and a 2-digit year overlap in shape (both are 1-2
        // ASCII digits); the first such token fills day, a later one
        // falls through to year.
        if fields.day.is_none() {
            if let Some(d) = classify_day(tok) {
                fields.day = Some(d);
                continue;
            }
        }
        if fields.year.is_none() {
            if let Some(y) = classify_year(tok) {
                fields.year = Some(y);
                continue;
            }
        }
    }

    let (hour, min, sec) = fields
        .time
        .ok_or_else(|| HttpWireError::malformed_date("missing time field"))?;
    let day = fields
        .day
        .ok_or_else(|| HttpWireError::malformed_date("missing day-of-month field"))?;
    let month = fields
        .month
        .ok_or_else(|| HttpWireError::malformed_date("missing month field"))?;
    let year = fields
        .year
        .ok_or_else(|| HttpWireError::malformed_date("missing year field"))?;

    if !(1..=31).contains(&day) || hour > 23 || min > 59 || sec > 59 {
        return Err(HttpWireError::malformed_date("field out of valid range"));
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| HttpWireError::malformed_date("invalid calendar date"))?;
    let time = NaiveTime::from_hms_opt(hour, min, sec)
        .ok_or_else(|| HttpWireError::malformed_date("invalid time of day"))?;
    let naive = NaiveDateTime::new(date, time);
    Ok(Utc.from_utc_datetime(&naive))
}

/// Formats as the RFC 7231 §7.1.1.1 preferred IMF-fixdate, always exactly
/// 29 bytes.
pub fn format_http_date(dt: &DateTime<Utc>) -> String {
    let weekday = WEEKDAY_NAMES[dt.format("%u").to_string().parse::<usize>().unwrap() - 1];
    let month = MONTH_NAMES[(dt.format("%m").to_string().parse::<usize>().unwrap()) - 1];
    let formatted = format!(
        "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
        weekday,
        dt.format("%d").to_string().parse::<u32>().unwrap(),
        month,
        dt.format("%Y").to_string().parse::<i32>().unwrap(),
        dt.format("%H").to_string().parse::<u32>().unwrap(),
        dt.format("%M").to_string().parse::<u32>().unwrap(),
        dt.format("%S").to_string().parse::<u32>().unwrap(),
    );
    debug_assert_eq!(formatted.len(), 29);
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn round_trips_preferred_form() {
        let dt = Utc.with_ymd_and_hms(2016, 11, 27, 19, 37, 15).unwrap();
        let formatted = format_http_date(&dt);
        assert_eq!(formatted.len(), 29);
        assert_eq!(formatted, "Sun, 27 Nov 2016 19:37:15 GMT");
        assert_eq!(parse_http_date(&formatted).unwrap(), dt);
    }

    #[test]
    fn parses_lenient_token_order() {
        let expected = Utc.with_ymd_and_hms(2016, 11, 27, 19, 37, 15).unwrap();
        assert_eq!(
            parse_http_date("Sun, 27 Nov 2016 19:37:15 GMT").unwrap(),
            expected
        );
        assert_eq!(
            parse_http_date("27 Nov 2016 19:37:15 Sun").unwrap(),
            expected
        );
    }

    #[test]
    fn rejects_overlong_input() {
        let input = "x".repeat(65);
        assert!(parse_http_date(&input).is_err());
    }

    #[test]
    fn maps_two_digit_years() {
        let recent = parse_http_date("Sat, 01 Jan 00 00:00:00 GMT").unwrap();
        assert_eq!(recent.format("%Y").to_string(), "2000");
        let legacy = parse_http_date("Sat, 01 Jan 94 00:00:00 GMT").unwrap();
        assert_eq!(legacy.format("%Y").to_string(), "1994");
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(parse_http_date("Sun, Nov 2016 19:37:15 GMT").is_err());
        assert!(parse_http_date("garbage").is_err());
    }

    #[test]
    fn rejects_invalid_field_ranges() {
        assert!(parse_http_date("Sun, 32 Nov 2016 19:37:15 GMT").is_err());
        assert!(parse_http_date("Sun, 27 Nov 2016 24:37:15 GMT").is_err());
    }
}

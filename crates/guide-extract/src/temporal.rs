//! Date expression recognizer.
//!
//! Resolves "tonight", "this weekend", "friday", "next week", "10/31",
//! "oct 31st" and friends against a caller-supplied `now`. Everything it
//! cannot resolve is left alone: a question without a usable date simply
//! has no date window.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use guide_core::DateWindow;

/// Evenings run from 17:00 to 03:00 the next morning.
const EVENING_START_HOUR: u32 = 17;
const EVENING_HOURS: i64 = 10;

static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?$").unwrap());
static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap());
static DAY_OF_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?$").unwrap());
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").unwrap());

/// Result of scanning a token stream for dates.
#[derive(Debug, Clone, Default)]
pub struct TemporalMatch {
    /// Hull of every recognized expression.
    pub window: Option<DateWindow>,
    /// Per-token flag: the token was part of a date expression.
    pub consumed: Vec<bool>,
}

/// Scan tokens for date expressions relative to `now`.
pub fn recognize(tokens: &[String], now: NaiveDateTime) -> TemporalMatch {
    let today = now.date();
    let mut consumed = vec![false; tokens.len()];
    let mut windows: Vec<DateWindow> = Vec::new();

    let prev = |i: usize| if i > 0 { tokens[i - 1].as_str() } else { "" };
    let next = |i: usize| tokens.get(i + 1).map(String::as_str).unwrap_or("");

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let mut span = 1;
        let mut modifier = false;

        let window = match token {
            "today" => whole_day(today),
            "tonight" | "tonite" => evening(today),
            "tomorrow" | "tmrw" | "tomorow" => {
                let day = today + Duration::days(1);
                if matches!(next(i), "night" | "evening") {
                    span = 2;
                    evening(day)
                } else {
                    whole_day(day)
                }
            }
            "weekend" | "weekends" => {
                modifier = matches!(prev(i), "this" | "next");
                weekend(today, if prev(i) == "next" { 1 } else { 0 })
            }
            "week" => match prev(i) {
                "this" => {
                    modifier = true;
                    DateWindow::days(today, next_monday(today) - Duration::days(1))
                }
                "next" => {
                    modifier = true;
                    let monday = next_monday(today);
                    DateWindow::days(monday, monday + Duration::days(6))
                }
                _ => None,
            },
            "month" => match prev(i) {
                "this" => {
                    modifier = true;
                    first_of_next_month(today).and_then(|first| {
                        DateWindow::days(today, first - Duration::days(1))
                    })
                }
                "next" => {
                    modifier = true;
                    first_of_next_month(today).and_then(|first| {
                        let after = first_of_next_month(first)?;
                        DateWindow::days(first, after - Duration::days(1))
                    })
                }
                _ => None,
            },
            _ => {
                if let Some(weekday) = weekday_index(token) {
                    let strictly_after = prev(i) == "next";
                    modifier = matches!(prev(i), "this" | "next");
                    let day = upcoming_weekday(today, weekday, strictly_after);
                    if matches!(next(i), "night" | "evening") {
                        span = 2;
                        evening(day)
                    } else {
                        whole_day(day)
                    }
                } else if let Some(month) = month_index(token) {
                    match month_day(tokens, i, month, today) {
                        Some((date, used)) => {
                            span = used;
                            whole_day(date)
                        }
                        None => None,
                    }
                } else {
                    numeric_date(token, today).and_then(whole_day)
                }
            }
        };

        if let Some(window) = window {
            windows.push(window);
            for flag in consumed.iter_mut().skip(i).take(span) {
                *flag = true;
            }
            if modifier {
                consumed[i - 1] = true;
            }
        }
        i += span;
    }

    let window = windows.into_iter().reduce(|acc, w| acc.hull(&w));
    TemporalMatch { window, consumed }
}

fn whole_day(day: NaiveDate) -> Option<DateWindow> {
    DateWindow::days(day, day)
}

fn evening(day: NaiveDate) -> Option<DateWindow> {
    let from = day.and_hms_opt(EVENING_START_HOUR, 0, 0)?;
    DateWindow::new(from, from + Duration::hours(EVENING_HOURS))
}

/// Saturday and Sunday of the current week (`weeks_ahead = 0`); on a
/// weekend day that is the weekend in progress.
fn weekend(today: NaiveDate, weeks_ahead: i64) -> Option<DateWindow> {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let saturday = today + Duration::days(5 - weekday + 7 * weeks_ahead);
    DateWindow::days(saturday, saturday + Duration::days(1))
}

fn next_monday(today: NaiveDate) -> NaiveDate {
    let weekday = today.weekday().num_days_from_monday() as i64;
    today + Duration::days(7 - weekday)
}

fn first_of_next_month(day: NaiveDate) -> Option<NaiveDate> {
    if day.month() == 12 {
        NaiveDate::from_ymd_opt(day.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(day.year(), day.month() + 1, 1)
    }
}

/// Next date falling on `weekday` (Monday = 0), today included unless
/// `strictly_after`.
fn upcoming_weekday(today: NaiveDate, weekday: u32, strictly_after: bool) -> NaiveDate {
    let current = today.weekday().num_days_from_monday();
    let mut ahead = (weekday + 7 - current) % 7;
    if ahead == 0 && strictly_after {
        ahead = 7;
    }
    today + Duration::days(ahead as i64)
}

fn weekday_index(token: &str) -> Option<u32> {
    let index = match token {
        "monday" | "mon" => 0,
        "tuesday" | "tues" | "tue" => 1,
        "wednesday" | "weds" | "wed" => 2,
        "thursday" | "thurs" | "thu" => 3,
        "friday" | "fri" => 4,
        "saturday" => 5,
        "sunday" => 6,
        _ => return None,
    };
    Some(index)
}

fn month_index(token: &str) -> Option<u32> {
    let index = match token {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(index)
}

/// "oct 31", "october 31st", "october 31 2026". Returns the date and the
/// number of tokens used. A month name without a day is not a date.
fn month_day(
    tokens: &[String],
    i: usize,
    month: u32,
    today: NaiveDate,
) -> Option<(NaiveDate, usize)> {
    let day_token = tokens.get(i + 1)?;
    let day: u32 = DAY_OF_MONTH.captures(day_token)?.get(1)?.as_str().parse().ok()?;

    let year = tokens
        .get(i + 2)
        .and_then(|t| YEAR.captures(t))
        .and_then(|c| c.get(1)?.as_str().parse::<i32>().ok());
    match year {
        Some(year) => NaiveDate::from_ymd_opt(year, month, day).map(|d| (d, 3)),
        None => resolve_yearless(month, day, today).map(|d| (d, 2)),
    }
}

fn numeric_date(token: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = ISO_DATE.captures(token) {
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let day = caps.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    let caps = SLASH_DATE.captures(token)?;
    let month = caps.get(1)?.as_str().parse().ok()?;
    let day = caps.get(2)?.as_str().parse().ok()?;
    match caps.get(3) {
        Some(y) => {
            let mut year: i32 = y.as_str().parse().ok()?;
            if y.as_str().len() == 2 {
                year += 2000;
            }
            NaiveDate::from_ymd_opt(year, month, day)
        }
        None => resolve_yearless(month, day, today),
    }
}

/// This year's date, or next year's when this year's already passed.
fn resolve_yearless(month: u32, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
    match this_year {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Friday 2026-10-16, 14:30.
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn window_of(text: &str) -> Option<DateWindow> {
        recognize(&tokens(text), now()).window
    }

    #[test]
    fn test_today_tomorrow_tonight() {
        assert_eq!(window_of("whats on today"), DateWindow::days(date(10, 16), date(10, 16)));
        assert_eq!(window_of("tomorrow"), DateWindow::days(date(10, 17), date(10, 17)));

        let tonight = window_of("shows tonight").unwrap();
        assert_eq!(tonight.from, date(10, 16).and_hms_opt(17, 0, 0).unwrap());
        assert_eq!(tonight.to, date(10, 17).and_hms_opt(3, 0, 0).unwrap());

        let m = recognize(&tokens("tomorrow night jazz"), now());
        assert_eq!(m.window.unwrap().from, date(10, 17).and_hms_opt(17, 0, 0).unwrap());
        assert_eq!(m.consumed, vec![true, true, false]);
    }

    #[test]
    fn test_weekend() {
        let m = recognize(&tokens("concerts this weekend downtown"), now());
        assert_eq!(m.window, DateWindow::days(date(10, 17), date(10, 18)));
        assert_eq!(m.consumed, vec![false, true, true, false]);

        assert_eq!(window_of("next weekend"), DateWindow::days(date(10, 24), date(10, 25)));
    }

    #[test]
    fn test_weekend_on_sunday_is_current() {
        let sunday = date(10, 18).and_hms_opt(10, 0, 0).unwrap();
        let m = recognize(&tokens("weekend"), sunday);
        assert_eq!(m.window, DateWindow::days(date(10, 17), date(10, 18)));
    }

    #[test]
    fn test_weeks_and_months() {
        assert_eq!(window_of("this week"), DateWindow::days(date(10, 16), date(10, 18)));
        assert_eq!(window_of("next week"), DateWindow::days(date(10, 19), date(10, 25)));
        assert_eq!(window_of("this month"), DateWindow::days(date(10, 16), date(10, 31)));
        assert_eq!(window_of("next month"), DateWindow::days(date(11, 1), date(11, 30)));
        // A bare "week" is not a date.
        assert!(window_of("best week ever").is_none());
    }

    #[test]
    fn test_weekdays() {
        // Today is Friday.
        assert_eq!(window_of("friday"), DateWindow::days(date(10, 16), date(10, 16)));
        assert_eq!(window_of("next friday"), DateWindow::days(date(10, 23), date(10, 23)));
        assert_eq!(window_of("tuesday"), DateWindow::days(date(10, 20), date(10, 20)));
        let sat_night = window_of("saturday night").unwrap();
        assert_eq!(sat_night.from, date(10, 17).and_hms_opt(17, 0, 0).unwrap());
    }

    #[test]
    fn test_explicit_dates() {
        assert_eq!(window_of("10/31"), DateWindow::days(date(10, 31), date(10, 31)));
        assert_eq!(window_of("on 10/31/26"), DateWindow::days(date(10, 31), date(10, 31)));
        assert_eq!(window_of("2026-11-02"), DateWindow::days(date(11, 2), date(11, 2)));
        assert_eq!(window_of("october 31st"), DateWindow::days(date(10, 31), date(10, 31)));
        assert_eq!(window_of("oct 31 2026"), DateWindow::days(date(10, 31), date(10, 31)));
    }

    #[test]
    fn test_past_yearless_date_rolls_forward() {
        let w = window_of("3/14").unwrap();
        assert_eq!(w.from.date(), NaiveDate::from_ymd_opt(2027, 3, 14).unwrap());
    }

    #[test]
    fn test_invalid_dates_dropped() {
        assert!(window_of("2/30").is_none());
        assert!(window_of("13/01/2026").is_none());
        assert!(window_of("may i ask something").is_none());
        assert!(window_of("no dates here").is_none());
    }

    #[test]
    fn test_multiple_expressions_hull() {
        let w = window_of("friday or sunday").unwrap();
        assert_eq!(w.from.date(), date(10, 16));
        assert_eq!(w.to.date(), date(10, 19));
    }
}

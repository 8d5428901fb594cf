// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, RecurrenceRule, parse_rule, preview_occurrences, validate_rule};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

fn expand(rule: &str, tz: Tz, dtstart: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
    let parsed: RecurrenceRule = parse_rule(rule).unwrap();
    parsed.occurrences(dtstart, tz).take(count).collect()
}

#[test]
fn test_every_monday_between_bounds() {
    let rule: RecurrenceRule = parse_rule("FREQ=WEEKLY;BYDAY=MO").unwrap();
    let found = rule.occurrences_between(
        utc(2025, 1, 6, 9, 0),
        Tz::UTC,
        utc(2025, 1, 1, 0, 0),
        utc(2025, 3, 1, 0, 0),
        100,
    );

    let expected: Vec<DateTime<Utc>> = [6, 13, 20, 27]
        .iter()
        .map(|d| utc(2025, 1, *d, 9, 0))
        .chain([3, 10, 17, 24].iter().map(|d| utc(2025, 2, *d, 9, 0)))
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_between_honors_limit() {
    let rule: RecurrenceRule = parse_rule("FREQ=DAILY").unwrap();
    let found = rule.occurrences_between(
        utc(2025, 1, 1, 8, 0),
        Tz::UTC,
        utc(2025, 1, 1, 0, 0),
        utc(2026, 1, 1, 0, 0),
        10,
    );
    assert_eq!(found.len(), 10);
    assert_eq!(found[9], utc(2025, 1, 10, 8, 0));
}

#[test]
fn test_weekly_skips_days_before_dtstart() {
    // 2025-01-08 is a Wednesday; the Monday of that week is not yielded.
    let found = expand("FREQ=WEEKLY;BYDAY=MO", Tz::UTC, utc(2025, 1, 8, 9, 0), 2);
    assert_eq!(found, vec![utc(2025, 1, 13, 9, 0), utc(2025, 1, 20, 9, 0)]);
}

#[test]
fn test_weekly_interval_two() {
    let found = expand("FREQ=WEEKLY;INTERVAL=2", Tz::UTC, utc(2025, 1, 6, 9, 0), 3);
    assert_eq!(
        found,
        vec![
            utc(2025, 1, 6, 9, 0),
            utc(2025, 1, 20, 9, 0),
            utc(2025, 2, 3, 9, 0)
        ]
    );
}

#[test]
fn test_first_monday_of_month() {
    let found = expand("FREQ=MONTHLY;BYDAY=1MO", Tz::UTC, utc(2025, 1, 6, 9, 0), 4);
    assert_eq!(
        found,
        vec![
            utc(2025, 1, 6, 9, 0),
            utc(2025, 2, 3, 9, 0),
            utc(2025, 3, 3, 9, 0),
            utc(2025, 4, 7, 9, 0)
        ]
    );
}

#[test]
fn test_last_friday_of_month() {
    let found = expand("FREQ=MONTHLY;BYDAY=-1FR", Tz::UTC, utc(2025, 1, 1, 10, 0), 3);
    assert_eq!(
        found,
        vec![
            utc(2025, 1, 31, 10, 0),
            utc(2025, 2, 28, 10, 0),
            utc(2025, 3, 28, 10, 0)
        ]
    );
}

#[test]
fn test_month_day_31_skips_short_months() {
    let found = expand("FREQ=MONTHLY;BYMONTHDAY=31", Tz::UTC, utc(2025, 1, 31, 7, 0), 3);
    assert_eq!(
        found,
        vec![
            utc(2025, 1, 31, 7, 0),
            utc(2025, 3, 31, 7, 0),
            utc(2025, 5, 31, 7, 0)
        ]
    );
}

#[test]
fn test_negative_month_day_is_last_day() {
    let found = expand("FREQ=MONTHLY;BYMONTHDAY=-1", Tz::UTC, utc(2025, 1, 1, 7, 0), 3);
    assert_eq!(
        found,
        vec![
            utc(2025, 1, 31, 7, 0),
            utc(2025, 2, 28, 7, 0),
            utc(2025, 3, 31, 7, 0)
        ]
    );
}

#[test]
fn test_set_pos_selects_last_weekday() {
    let found = expand(
        "FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1",
        Tz::UTC,
        utc(2025, 1, 1, 12, 0),
        3,
    );
    assert_eq!(
        found,
        vec![
            utc(2025, 1, 31, 12, 0),
            utc(2025, 2, 28, 12, 0),
            utc(2025, 3, 31, 12, 0)
        ]
    );
}

#[test]
fn test_yearly_leap_day_waits_for_leap_years() {
    let found = expand("FREQ=YEARLY", Tz::UTC, utc(2024, 2, 29, 6, 0), 2);
    assert_eq!(found, vec![utc(2024, 2, 29, 6, 0), utc(2028, 2, 29, 6, 0)]);
}

#[test]
fn test_count_is_counted_from_dtstart() {
    let rule: RecurrenceRule = parse_rule("FREQ=DAILY;COUNT=3").unwrap();
    let all: Vec<DateTime<Utc>> = rule.occurrences(utc(2025, 1, 1, 9, 0), Tz::UTC).collect();
    assert_eq!(all.len(), 3);

    let late = rule.occurrences_between(
        utc(2025, 1, 1, 9, 0),
        Tz::UTC,
        utc(2025, 1, 2, 12, 0),
        utc(2025, 2, 1, 0, 0),
        100,
    );
    assert_eq!(late, vec![utc(2025, 1, 3, 9, 0)]);
}

#[test]
fn test_until_is_inclusive() {
    let found = expand(
        "FREQ=DAILY;UNTIL=20250105T000000Z",
        Tz::UTC,
        utc(2025, 1, 1, 0, 0),
        100,
    );
    assert_eq!(found.len(), 5);
    assert_eq!(found.last().copied(), Some(utc(2025, 1, 5, 0, 0)));
}

#[test]
fn test_date_until_covers_whole_day() {
    let found = expand("FREQ=DAILY;UNTIL=20250103", Tz::UTC, utc(2025, 1, 1, 18, 0), 100);
    assert_eq!(found.len(), 3);
}

#[test]
fn test_wall_clock_time_is_kept_across_dst() {
    // 09:00 EST on the 8th, 09:00 EDT on the 9th.
    let found = expand(
        "FREQ=DAILY",
        chrono_tz::America::New_York,
        utc(2025, 3, 8, 14, 0),
        2,
    );
    assert_eq!(found, vec![utc(2025, 3, 8, 14, 0), utc(2025, 3, 9, 13, 0)]);
}

#[test]
fn test_dst_gap_moves_forward_one_hour() {
    // 02:30 does not exist in New York on 2025-03-09; it becomes 03:30 EDT.
    let found = expand(
        "FREQ=DAILY",
        chrono_tz::America::New_York,
        utc(2025, 3, 8, 7, 30),
        2,
    );
    assert_eq!(found, vec![utc(2025, 3, 8, 7, 30), utc(2025, 3, 9, 7, 30)]);
}

#[test]
fn test_never_matching_rule_terminates() {
    let found = preview_occurrences(
        "FREQ=MONTHLY;BYMONTH=2;BYMONTHDAY=31",
        "UTC",
        utc(2025, 1, 1, 0, 0),
        5,
    );
    assert!(found.is_empty());
}

#[test]
fn test_preview_returns_empty_for_bad_input() {
    assert!(preview_occurrences("FREQ=SOMETIMES", "UTC", utc(2025, 1, 1, 0, 0), 5).is_empty());
    assert!(
        preview_occurrences("FREQ=DAILY", "Mars/Olympus", utc(2025, 1, 1, 0, 0), 5).is_empty()
    );
}

#[test]
fn test_preview_takes_requested_count() {
    let found = preview_occurrences("FREQ=WEEKLY;BYDAY=MO,TH", "UTC", utc(2025, 1, 6, 9, 0), 4);
    assert_eq!(
        found,
        vec![
            utc(2025, 1, 6, 9, 0),
            utc(2025, 1, 9, 9, 0),
            utc(2025, 1, 13, 9, 0),
            utc(2025, 1, 16, 9, 0)
        ]
    );
}

#[test]
fn test_prefix_and_case_are_accepted() {
    let rule: RecurrenceRule = parse_rule("rrule:freq=weekly;byday=mo;").unwrap();
    assert_eq!(rule.by_day.len(), 1);
}

#[test]
fn test_embedded_dtstart_line() {
    let rule: RecurrenceRule =
        parse_rule("DTSTART:20250106T090000Z\nRRULE:FREQ=WEEKLY").unwrap();
    assert_eq!(rule.embedded_start(Tz::UTC), Some(utc(2025, 1, 6, 9, 0)));

    let zoned: RecurrenceRule =
        parse_rule("DTSTART;TZID=America/New_York:20250106T090000\nRRULE:FREQ=DAILY").unwrap();
    assert_eq!(zoned.embedded_start(Tz::UTC), Some(utc(2025, 1, 6, 14, 0)));
}

#[test]
fn test_rejects_malformed_and_unsupported_rules() {
    let rejected = [
        "",
        "INTERVAL=2",
        "FREQ=HOURLY",
        "FREQ=WEEKLY;BYHOUR=9",
        "FREQ=WEEKLY;X-NAME=1",
        "FREQ=DAILY;COUNT=2;UNTIL=20250101",
        "FREQ=WEEKLY;BYDAY=1MO",
        "FREQ=WEEKLY;BYMONTHDAY=3",
        "FREQ=DAILY;INTERVAL=0",
        "FREQ=DAILY;FREQ=WEEKLY",
        "FREQ=MONTHLY;BYMONTHDAY=32",
        "FREQ=DAILY;BYSETPOS=1",
        "FREQ=DAILY;UNTIL=tomorrow",
    ];
    for rule in rejected {
        assert!(
            matches!(parse_rule(rule), Err(DomainError::InvalidRule { .. })),
            "expected '{rule}' to be rejected"
        );
    }
}

#[test]
fn test_validate_rule_reports_reason() {
    let ok = validate_rule("FREQ=MONTHLY;BYDAY=1MO");
    assert!(ok.valid);
    assert!(ok.error.is_none());

    let bad = validate_rule("FREQ=WEEKLY;BYWEEKNO=3");
    assert!(!bad.valid);
    assert!(bad.error.unwrap().contains("BYWEEKNO"));
}

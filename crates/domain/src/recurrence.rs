// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurrence rule parsing and expansion.
//!
//! Rules use the RFC 5545 `RRULE` grammar, restricted to the parts the
//! operations calendar needs:
//!
//! - `FREQ` (DAILY, WEEKLY, MONTHLY, YEARLY), `INTERVAL`, `COUNT`, `UNTIL`
//! - `BYDAY` (ordinals allowed for MONTHLY and YEARLY), `BYMONTHDAY`,
//!   `BYMONTH`, `BYSETPOS`, `WKST`
//!
//! A rule may be preceded by a `DTSTART` line and may carry an `RRULE:`
//! prefix. Everything else is rejected rather than silently ignored.
//!
//! ## Invariants
//!
//! - Expansion happens in the declared timezone at the wall-clock time of
//!   the start instant, then converts to UTC
//! - Instants are yielded in ascending order and never precede the start
//! - `COUNT` counts from the start, independent of any query window
//! - Local times inside a DST gap move forward one hour; ambiguous local
//!   times resolve to the earlier instant
//! - Expansion scans a bounded number of periods, so a rule that never
//!   matches terminates

use crate::error::DomainError;
use chrono::{
    DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::str::FromStr;

/// Upper bound on the number of periods a single expansion walks.
const MAX_PERIODS: u64 = 100_000;

/// How often the rule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            "SECONDLY" | "MINUTELY" | "HOURLY" => {
                Err(format!("FREQ={s} is not supported for field work"))
            }
            _ => Err(format!("unknown FREQ value '{s}'")),
        }
    }
}

/// One `BYDAY` entry: a weekday with an optional signed ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekdaySpec {
    /// `Some(1)` is the first, `Some(-1)` the last; `None` is every such day.
    pub ordinal: Option<i32>,
    pub weekday: Weekday,
}

/// Upper bound of a rule given by `UNTIL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Until {
    /// An absolute UTC instant (`...Z` form).
    Instant(DateTime<Utc>),
    /// Wall-clock bound in the expansion timezone (floating or date form).
    Floating(NaiveDateTime),
}

/// A `DTSTART` line carried inside the rule text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum EmbeddedStart {
    Instant(DateTime<Utc>),
    Floating(NaiveDateTime),
    Zoned(NaiveDateTime, String),
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    pub count: Option<u32>,
    pub until: Option<Until>,
    pub by_day: Vec<WeekdaySpec>,
    pub by_month_day: Vec<i32>,
    pub by_month: Vec<u32>,
    pub by_set_pos: Vec<i32>,
    pub week_start: Weekday,
    embedded_start: Option<EmbeddedStart>,
}

/// Result of validating rule text without expanding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FromStr for RecurrenceRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule(s)
    }
}

/// Parses rule text into a [`RecurrenceRule`].
///
/// # Errors
///
/// Returns `DomainError::InvalidRule` naming the offending part if the text
/// is empty, malformed, contradictory, or uses an unsupported part.
pub fn parse_rule(text: &str) -> Result<RecurrenceRule, DomainError> {
    let mut body: Option<&str> = None;
    let mut embedded_start: Option<EmbeddedStart> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let upper = line.to_ascii_uppercase();
        if upper.starts_with("DTSTART") {
            if embedded_start.is_some() {
                return Err(DomainError::invalid_rule(text, "more than one DTSTART line"));
            }
            embedded_start = Some(parse_dtstart_line(text, line)?);
        } else if body.is_some() {
            return Err(DomainError::invalid_rule(text, "more than one RRULE line"));
        } else if upper.starts_with("RRULE:") {
            body = Some(&line["RRULE:".len()..]);
        } else {
            body = Some(line);
        }
    }

    let Some(body) = body else {
        return Err(DomainError::invalid_rule(text, "rule is empty"));
    };

    let mut frequency: Option<Frequency> = None;
    let mut interval: Option<u32> = None;
    let mut count: Option<u32> = None;
    let mut until: Option<Until> = None;
    let mut by_day: Option<Vec<WeekdaySpec>> = None;
    let mut by_month_day: Option<Vec<i32>> = None;
    let mut by_month: Option<Vec<u32>> = None;
    let mut by_set_pos: Option<Vec<i32>> = None;
    let mut week_start: Option<Weekday> = None;

    for part in body.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = part.split_once('=') else {
            return Err(DomainError::invalid_rule(
                text,
                format!("part '{part}' is not KEY=VALUE"),
            ));
        };
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim().to_ascii_uppercase();
        let err = |reason: String| DomainError::invalid_rule(text, reason);

        match key.as_str() {
            "FREQ" => set_once(&mut frequency, &key, value.parse().map_err(err)?, text)?,
            "INTERVAL" => {
                let n = parse_positive(&key, &value).map_err(err)?;
                set_once(&mut interval, &key, n, text)?;
            }
            "COUNT" => {
                let n = parse_positive(&key, &value).map_err(err)?;
                set_once(&mut count, &key, n, text)?;
            }
            "UNTIL" => set_once(&mut until, &key, parse_until(&value).map_err(err)?, text)?,
            "BYDAY" => {
                let specs = parse_list(&value, parse_weekday_spec).map_err(err)?;
                set_once(&mut by_day, &key, specs, text)?;
            }
            "BYMONTHDAY" => {
                let days = parse_list(&value, |v| parse_signed(v, 31, "BYMONTHDAY"))
                    .map_err(err)?;
                set_once(&mut by_month_day, &key, days, text)?;
            }
            "BYMONTH" => {
                let months = parse_list(&value, parse_month).map_err(err)?;
                set_once(&mut by_month, &key, months, text)?;
            }
            "BYSETPOS" => {
                let positions =
                    parse_list(&value, |v| parse_signed(v, 366, "BYSETPOS")).map_err(err)?;
                set_once(&mut by_set_pos, &key, positions, text)?;
            }
            "WKST" => {
                let day = parse_weekday(&value).map_err(err)?;
                set_once(&mut week_start, &key, day, text)?;
            }
            "BYSECOND" | "BYMINUTE" | "BYHOUR" | "BYYEARDAY" | "BYWEEKNO" => {
                return Err(DomainError::invalid_rule(
                    text,
                    format!("{key} is not supported"),
                ));
            }
            _ => {
                return Err(DomainError::invalid_rule(
                    text,
                    format!("unknown rule part '{key}'"),
                ));
            }
        }
    }

    let Some(frequency) = frequency else {
        return Err(DomainError::invalid_rule(text, "FREQ is required"));
    };

    let rule = RecurrenceRule {
        frequency,
        interval: interval.unwrap_or(1),
        count,
        until,
        by_day: by_day.unwrap_or_default(),
        by_month_day: by_month_day.unwrap_or_default(),
        by_month: by_month.unwrap_or_default(),
        by_set_pos: by_set_pos.unwrap_or_default(),
        week_start: week_start.unwrap_or(Weekday::Mon),
        embedded_start,
    };
    rule.check_consistency(text)?;
    Ok(rule)
}

/// Checks rule text without expanding it.
#[must_use]
pub fn validate_rule(text: &str) -> RuleValidation {
    match parse_rule(text) {
        Ok(_) => RuleValidation {
            valid: true,
            error: None,
        },
        Err(e) => RuleValidation {
            valid: false,
            error: Some(e.to_string()),
        },
    }
}

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Lists the first `count` instants of a rule without touching any store.
///
/// Returns an empty list if the rule or timezone cannot be parsed.
#[must_use]
pub fn preview_occurrences(
    rule: &str,
    timezone: &str,
    dtstart: DateTime<Utc>,
    count: usize,
) -> Vec<DateTime<Utc>> {
    let (Ok(parsed), Ok(tz)) = (parse_rule(rule), parse_timezone(timezone)) else {
        return Vec::new();
    };
    parsed.occurrences(dtstart, tz).take(count).collect()
}

impl RecurrenceRule {
    /// The start instant written into the rule text, if any.
    ///
    /// Floating values are read in `tz`.
    #[must_use]
    pub fn embedded_start(&self, tz: Tz) -> Option<DateTime<Utc>> {
        match self.embedded_start.as_ref()? {
            EmbeddedStart::Instant(instant) => Some(*instant),
            EmbeddedStart::Floating(local) => resolve_local(tz, *local),
            EmbeddedStart::Zoned(local, name) => {
                let zone = parse_timezone(name).ok()?;
                resolve_local(zone, *local)
            }
        }
    }

    /// Lazily expands the rule from `dtstart` in `tz`.
    #[must_use]
    pub fn occurrences(&self, dtstart: DateTime<Utc>, tz: Tz) -> Occurrences<'_> {
        Occurrences {
            rule: self,
            tz,
            anchor_local: dtstart.with_timezone(&tz).naive_local(),
            period: 0,
            pending: VecDeque::new(),
            emitted: 0,
            finished: false,
        }
    }

    /// Instants within `[start, end]` inclusive, at most `limit` of them.
    #[must_use]
    pub fn occurrences_between(
        &self,
        dtstart: DateTime<Utc>,
        tz: Tz,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Vec<DateTime<Utc>> {
        if end < start {
            return Vec::new();
        }
        self.occurrences(dtstart, tz)
            .skip_while(|t| *t < start)
            .take_while(|t| *t <= end)
            .take(limit)
            .collect()
    }

    fn check_consistency(&self, text: &str) -> Result<(), DomainError> {
        if self.count.is_some() && self.until.is_some() {
            return Err(DomainError::invalid_rule(
                text,
                "COUNT and UNTIL cannot both be set",
            ));
        }

        let ordinals_allowed = matches!(self.frequency, Frequency::Monthly | Frequency::Yearly);
        for spec in &self.by_day {
            match spec.ordinal {
                Some(_) if !ordinals_allowed => {
                    return Err(DomainError::invalid_rule(
                        text,
                        "BYDAY ordinals require FREQ=MONTHLY or FREQ=YEARLY",
                    ));
                }
                Some(n) if self.frequency == Frequency::Monthly && n.abs() > 5 => {
                    return Err(DomainError::invalid_rule(
                        text,
                        format!("BYDAY ordinal {n} is out of range for a month"),
                    ));
                }
                _ => {}
            }
        }

        if self.frequency == Frequency::Weekly && !self.by_month_day.is_empty() {
            return Err(DomainError::invalid_rule(
                text,
                "BYMONTHDAY cannot be used with FREQ=WEEKLY",
            ));
        }

        if !self.by_set_pos.is_empty()
            && self.by_day.is_empty()
            && self.by_month_day.is_empty()
            && self.by_month.is_empty()
        {
            return Err(DomainError::invalid_rule(
                text,
                "BYSETPOS requires another BY part",
            ));
        }

        Ok(())
    }

    /// Candidate dates for the `k`th period after the anchor.
    ///
    /// Returns `None` once date arithmetic leaves the representable range.
    fn period_dates(&self, anchor: NaiveDate, k: u64) -> Option<Vec<NaiveDate>> {
        let step = k.checked_mul(u64::from(self.interval))?;

        let mut dates: Vec<NaiveDate> = match self.frequency {
            Frequency::Daily => {
                let date = anchor.checked_add_days(Days::new(step))?;
                if self.matches_day_filters(date) {
                    vec![date]
                } else {
                    Vec::new()
                }
            }
            Frequency::Weekly => {
                let week = start_of_week(anchor, self.week_start)
                    .checked_add_days(Days::new(step.checked_mul(7)?))?;
                (0..7)
                    .filter_map(|offset| week.checked_add_days(Days::new(offset)))
                    .filter(|d| self.matches_weekly(*d, anchor.weekday()))
                    .collect()
            }
            Frequency::Monthly => {
                let months = Months::new(u32::try_from(step).ok()?);
                let first = anchor.with_day(1)?.checked_add_months(months)?;
                if self.month_allowed(first.month()) {
                    self.month_candidates(first.year(), first.month(), anchor.day())
                } else {
                    Vec::new()
                }
            }
            Frequency::Yearly => {
                let year = anchor.year().checked_add(i32::try_from(step).ok()?)?;
                NaiveDate::from_ymd_opt(year, 1, 1)?;
                self.year_candidates(year, anchor)
            }
        };

        dates.sort_unstable();
        dates.dedup();
        Some(self.apply_set_pos(dates))
    }

    fn month_allowed(&self, month: u32) -> bool {
        self.by_month.is_empty() || self.by_month.contains(&month)
    }

    fn matches_day_filters(&self, date: NaiveDate) -> bool {
        if !self.month_allowed(date.month()) {
            return false;
        }
        if !self.by_month_day.is_empty() {
            let last = last_day_of_month(date.year(), date.month());
            let hit = self
                .by_month_day
                .iter()
                .any(|md| resolve_month_day(date.year(), date.month(), last, *md) == Some(date));
            if !hit {
                return false;
            }
        }
        self.by_day.is_empty() || self.by_day.iter().any(|s| s.weekday == date.weekday())
    }

    fn matches_weekly(&self, date: NaiveDate, anchor_weekday: Weekday) -> bool {
        let weekday_hit = if self.by_day.is_empty() {
            date.weekday() == anchor_weekday
        } else {
            self.by_day.iter().any(|s| s.weekday == date.weekday())
        };
        weekday_hit && self.month_allowed(date.month())
    }

    fn month_candidates(&self, year: i32, month: u32, anchor_day: u32) -> Vec<NaiveDate> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };
        let last_day = last_day_of_month(year, month);
        let Some(last) = NaiveDate::from_ymd_opt(year, month, last_day) else {
            return Vec::new();
        };

        let month_days: Vec<NaiveDate> = self
            .by_month_day
            .iter()
            .filter_map(|md| resolve_month_day(year, month, last_day, *md))
            .collect();
        let weekdays: Vec<NaiveDate> = self
            .by_day
            .iter()
            .flat_map(|spec| weekdays_in_range(first, last, *spec))
            .collect();

        match (self.by_month_day.is_empty(), self.by_day.is_empty()) {
            (true, true) => NaiveDate::from_ymd_opt(year, month, anchor_day)
                .into_iter()
                .collect(),
            (false, true) => month_days,
            (true, false) => weekdays,
            (false, false) => month_days
                .into_iter()
                .filter(|d| weekdays.contains(d))
                .collect(),
        }
    }

    fn year_candidates(&self, year: i32, anchor: NaiveDate) -> Vec<NaiveDate> {
        if !self.by_month.is_empty() {
            return self
                .by_month
                .iter()
                .flat_map(|m| self.month_candidates(year, *m, anchor.day()))
                .collect();
        }
        if !self.by_month_day.is_empty() {
            return (1..=12)
                .flat_map(|m| self.month_candidates(year, m, anchor.day()))
                .collect();
        }
        if !self.by_day.is_empty() {
            let (Some(first), Some(last)) = (
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year, 12, 31),
            ) else {
                return Vec::new();
            };
            return self
                .by_day
                .iter()
                .flat_map(|spec| weekdays_in_range(first, last, *spec))
                .collect();
        }
        NaiveDate::from_ymd_opt(year, anchor.month(), anchor.day())
            .into_iter()
            .collect()
    }

    fn apply_set_pos(&self, dates: Vec<NaiveDate>) -> Vec<NaiveDate> {
        if self.by_set_pos.is_empty() {
            return dates;
        }
        let len = dates.len();
        let mut selected: Vec<NaiveDate> = self
            .by_set_pos
            .iter()
            .filter_map(|pos| {
                let magnitude = usize::try_from(pos.unsigned_abs()).ok()?;
                let index = if *pos > 0 {
                    magnitude - 1
                } else {
                    len.checked_sub(magnitude)?
                };
                dates.get(index).copied()
            })
            .collect();
        selected.sort_unstable();
        selected.dedup();
        selected
    }

    fn is_past_until(&self, instant: DateTime<Utc>, tz: Tz) -> bool {
        match self.until {
            None => false,
            Some(Until::Instant(bound)) => instant > bound,
            Some(Until::Floating(bound)) => instant.with_timezone(&tz).naive_local() > bound,
        }
    }
}

/// Lazy, ascending expansion of a [`RecurrenceRule`].
#[derive(Debug)]
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    tz: Tz,
    anchor_local: NaiveDateTime,
    period: u64,
    pending: VecDeque<DateTime<Utc>>,
    emitted: u32,
    finished: bool,
}

impl Iterator for Occurrences<'_> {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            if let Some(instant) = self.pending.pop_front() {
                if self.rule.count.is_some_and(|count| self.emitted >= count)
                    || self.rule.is_past_until(instant, self.tz)
                {
                    self.finished = true;
                    return None;
                }
                self.emitted += 1;
                return Some(instant);
            }

            if self.period >= MAX_PERIODS {
                self.finished = true;
                return None;
            }

            let Some(dates) = self
                .rule
                .period_dates(self.anchor_local.date(), self.period)
            else {
                self.finished = true;
                return None;
            };
            self.period += 1;

            let time_of_day: NaiveTime = self.anchor_local.time();
            for date in dates {
                let local = date.and_time(time_of_day);
                if local < self.anchor_local {
                    continue;
                }
                if let Some(instant) = resolve_local(self.tz, local) {
                    self.pending.push_back(instant);
                }
            }
        }
        None
    }
}

/// Maps a wall-clock time in `tz` to UTC.
///
/// Ambiguous times take the earlier instant; times in a DST gap move
/// forward one hour.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = local.checked_add_signed(TimeDelta::hours(1))?;
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}

fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = (date.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7;
    date.checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(date)
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
        .unwrap_or(28)
}

fn resolve_month_day(year: i32, month: u32, last_day: u32, month_day: i32) -> Option<NaiveDate> {
    let day = if month_day > 0 {
        u32::try_from(month_day).ok()?
    } else {
        let back = month_day.unsigned_abs();
        (last_day + 1).checked_sub(back)?
    };
    if day == 0 || day > last_day {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Dates in `[first, last]` matching a weekday spec.
fn weekdays_in_range(first: NaiveDate, last: NaiveDate, spec: WeekdaySpec) -> Vec<NaiveDate> {
    let matching: Vec<NaiveDate> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .filter(|d| d.weekday() == spec.weekday)
        .collect();

    match spec.ordinal {
        None => matching,
        Some(n) => {
            let Ok(magnitude) = usize::try_from(n.unsigned_abs()) else {
                return Vec::new();
            };
            let index = if n > 0 {
                Some(magnitude - 1)
            } else {
                matching.len().checked_sub(magnitude)
            };
            index
                .and_then(|i| matching.get(i).copied())
                .into_iter()
                .collect()
        }
    }
}

fn set_once<T>(slot: &mut Option<T>, key: &str, value: T, text: &str) -> Result<(), DomainError> {
    if slot.is_some() {
        return Err(DomainError::invalid_rule(
            text,
            format!("{key} appears more than once"),
        ));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_list<T>(value: &str, parse: impl Fn(&str) -> Result<T, String>) -> Result<Vec<T>, String> {
    let items: Vec<T> = value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse)
        .collect::<Result<_, _>>()?;
    if items.is_empty() {
        return Err(String::from("empty value list"));
    }
    Ok(items)
}

fn parse_positive(key: &str, value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("{key} must be a positive integer, got '{value}'")),
    }
}

fn parse_signed(value: &str, max: i32, key: &str) -> Result<i32, String> {
    match value.parse::<i32>() {
        Ok(n) if n != 0 && n.abs() <= max => Ok(n),
        _ => Err(format!("{key} value '{value}' must be in ±1..={max}")),
    }
}

fn parse_month(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Ok(m),
        _ => Err(format!("BYMONTH value '{value}' must be in 1..=12")),
    }
}

fn parse_weekday(value: &str) -> Result<Weekday, String> {
    match value {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        _ => Err(format!("unknown weekday '{value}'")),
    }
}

fn parse_weekday_spec(value: &str) -> Result<WeekdaySpec, String> {
    if value.len() < 2 || !value.is_char_boundary(value.len() - 2) {
        return Err(format!("invalid BYDAY value '{value}'"));
    }
    let (ordinal_text, day_text) = value.split_at(value.len() - 2);
    let weekday = parse_weekday(day_text)?;
    let ordinal = if ordinal_text.is_empty() {
        None
    } else {
        Some(parse_signed(ordinal_text.trim_start_matches('+'), 53, "BYDAY ordinal")?)
    };
    Ok(WeekdaySpec { ordinal, weekday })
}

fn parse_until(value: &str) -> Result<Until, String> {
    if let Some(utc_text) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc_text, "%Y%m%dT%H%M%S")
            .map_err(|e| format!("UNTIL '{value}': {e}"))?;
        return Ok(Until::Instant(naive.and_utc()));
    }
    if value.contains('T') {
        let naive = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
            .map_err(|e| format!("UNTIL '{value}': {e}"))?;
        return Ok(Until::Floating(naive));
    }
    let date =
        NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|e| format!("UNTIL '{value}': {e}"))?;
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    Ok(Until::Floating(date.and_time(end_of_day)))
}

fn parse_dtstart_line(text: &str, line: &str) -> Result<EmbeddedStart, DomainError> {
    let Some((head, value)) = line.split_once(':') else {
        return Err(DomainError::invalid_rule(text, "DTSTART line has no value"));
    };
    let value = value.trim().to_ascii_uppercase();
    let tzid: Option<String> = head
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("TZID"))
        .map(|(_, zone)| zone.trim().to_string());

    let parsed = parse_until(&value).map_err(|reason| {
        DomainError::invalid_rule(text, reason.replacen("UNTIL", "DTSTART", 1))
    })?;

    let start = match (parsed, tzid) {
        (Until::Instant(instant), _) => EmbeddedStart::Instant(instant),
        (Until::Floating(local), Some(zone)) => {
            parse_timezone(&zone)?;
            EmbeddedStart::Zoned(date_form_midnight(&value, local), zone)
        }
        (Until::Floating(local), None) => {
            EmbeddedStart::Floating(date_form_midnight(&value, local))
        }
    };
    Ok(start)
}

/// A date-only `DTSTART` starts at midnight, not at the end of the day the
/// shared `UNTIL` parser assumes.
fn date_form_midnight(value: &str, parsed: NaiveDateTime) -> NaiveDateTime {
    if value.contains('T') {
        parsed
    } else {
        parsed.date().and_time(NaiveTime::MIN)
    }
}

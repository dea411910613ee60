// Human-readable formatting of status readings
use super::sample::parse_naive_datetime;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::fmt;
use thiserror::Error;

/// Separator placed between a number and its unit (U+202F, narrow no-break space).
pub const UNIT_SEPARATOR: char = '\u{202F}';

const DATETIME_SHORT: &str = "%-m/%-d/%Y, %-I:%M %p";

/// Format a byte count with decimal KB/MB/GB scaling.
pub fn human_bytes(bytes: u64) -> String {
    const KB: u64 = 1_000;
    const MB: u64 = 1_000_000;
    const GB: u64 = 1_000_000_000;

    if bytes > GB {
        format!("{:.2}{UNIT_SEPARATOR}GB", bytes as f64 / GB as f64)
    } else if bytes > MB {
        format!("{:.2}{UNIT_SEPARATOR}MB", bytes as f64 / MB as f64)
    } else if bytes > KB {
        format!("{:.2}{UNIT_SEPARATOR}KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes}{UNIT_SEPARATOR}B")
    }
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.1}{UNIT_SEPARATOR}°C")
}

/// Short locale date-time, e.g. `3/5/2024, 2:07 PM`.
pub fn format_datetime_short<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    timestamp.with_timezone(tz).format(DATETIME_SHORT).to_string()
}

/// Localize an ISO-8601 date-time attribute value to local time.
///
/// Values without an offset, including bare dates, are read as local time.
/// Returns `None` when the value does not parse, so the caller can leave the
/// original text in place.
pub fn localize_datetime(value: &str) -> Option<String> {
    let local = parse_local_datetime(value)?;
    Some(local.format(DATETIME_SHORT).to_string())
}

fn parse_local_datetime(value: &str) -> Option<DateTime<Local>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Local));
    }

    let naive = parse_naive_datetime(value).or_else(|| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })?;
    Local.from_local_datetime(&naive).earliest()
}

/// At most three fraction digits, trailing zeros dropped, thousands grouped.
fn format_number(value: f64) -> String {
    let rounded = format!("{value:.3}");
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DurationUnit {
    fn short_label(self, value: f64) -> &'static str {
        let singular = value == 1.0;
        match self {
            DurationUnit::Years if singular => "yr",
            DurationUnit::Years => "yrs",
            DurationUnit::Months if singular => "mth",
            DurationUnit::Months => "mths",
            DurationUnit::Weeks if singular => "wk",
            DurationUnit::Weeks => "wks",
            DurationUnit::Days if singular => "day",
            DurationUnit::Days => "days",
            DurationUnit::Hours => "hr",
            DurationUnit::Minutes => "min",
            DurationUnit::Seconds => "sec",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DurationParseError {
    #[error("duration must start with 'P'")]
    MissingDesignator,
    #[error("duration has no components")]
    Empty,
    #[error("unexpected designator '{0}'")]
    UnexpectedDesignator(char),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// An ISO-8601 duration split into the components it was written with.
#[derive(Debug, Clone, PartialEq)]
pub struct IsoDuration {
    pub parts: Vec<(DurationUnit, f64)>,
}

impl IsoDuration {
    pub fn parse(input: &str) -> Result<Self, DurationParseError> {
        let rest = input
            .strip_prefix('P')
            .ok_or(DurationParseError::MissingDesignator)?;
        let (date, time) = match rest.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (rest, None),
        };

        let mut parts = Vec::new();
        parse_section(
            date,
            &[
                ('Y', DurationUnit::Years),
                ('M', DurationUnit::Months),
                ('W', DurationUnit::Weeks),
                ('D', DurationUnit::Days),
            ],
            &mut parts,
        )?;
        if let Some(time) = time {
            if time.is_empty() {
                return Err(DurationParseError::Empty);
            }
            parse_section(
                time,
                &[
                    ('H', DurationUnit::Hours),
                    ('M', DurationUnit::Minutes),
                    ('S', DurationUnit::Seconds),
                ],
                &mut parts,
            )?;
        }

        if parts.is_empty() {
            return Err(DurationParseError::Empty);
        }
        Ok(Self { parts })
    }

    /// Short human form, e.g. `1 day, 2 hr, 30 min`.
    pub fn to_human(&self) -> String {
        self.parts
            .iter()
            .map(|(unit, value)| {
                format!("{} {}", format_number(*value), unit.short_label(*value))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn parse_section(
    section: &str,
    units: &[(char, DurationUnit)],
    parts: &mut Vec<(DurationUnit, f64)>,
) -> Result<(), DurationParseError> {
    // Designators must appear in the order listed in `units`.
    let mut next_unit = 0;
    let mut start = 0;

    for (i, c) in section.char_indices() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            continue;
        }

        let offset = units[next_unit..]
            .iter()
            .position(|(designator, _)| *designator == c)
            .ok_or(DurationParseError::UnexpectedDesignator(c))?;
        let unit = units[next_unit + offset].1;
        next_unit += offset + 1;

        let raw = &section[start..i];
        let value = raw
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| DurationParseError::InvalidNumber(raw.to_string()))?;
        parts.push((unit, value));
        start = i + c.len_utf8();
    }

    if start != section.len() {
        return Err(DurationParseError::InvalidNumber(section[start..].to_string()));
    }
    Ok(())
}

/// Human form of an uptime string, falling back to the raw value.
pub fn format_uptime(uptime: &str) -> String {
    match IsoDuration::parse(uptime) {
        Ok(duration) => duration.to_human(),
        Err(e) => {
            tracing::warn!("Could not parse uptime {:?}: {}", uptime, e);
            uptime.to_string()
        }
    }
}

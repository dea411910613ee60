// Chart and detail view models
use super::format::{format_datetime_short, format_temperature, format_uptime, human_bytes};
use super::sample::Sample;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    Line,
    MultiLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    /// Aligned with the owning chart's labels; `None` is a gap.
    pub values: Vec<Option<f64>>,
}

impl SeriesData {
    pub fn new(id: &str, name: &str, values: Vec<Option<f64>>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            values,
        }
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: ChartKind,
    pub labels: Vec<DateTime<Utc>>,
    pub series: Vec<SeriesData>,
}

impl ChartData {
    pub fn new(
        id: &str,
        title: &str,
        unit: Option<&str>,
        kind: ChartKind,
        labels: Vec<DateTime<Utc>>,
        series: Vec<SeriesData>,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.map(str::to_string),
            kind,
            labels,
            series,
        }
    }
}

/// Formatted readings of the most recent sample.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusDetails {
    pub temperature: String,
    pub uptime: String,
    pub timestamp: String,
    pub rxtx: String,
}

impl StatusDetails {
    pub fn from_sample<Tz>(sample: &Sample, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            temperature: format_temperature(sample.temperature),
            uptime: format_uptime(&sample.uptime),
            timestamp: format_datetime_short(&sample.timestamp, tz),
            rxtx: format!(
                "{} / {}",
                human_bytes(sample.rx_bytes),
                human_bytes(sample.tx_bytes)
            ),
        }
    }
}

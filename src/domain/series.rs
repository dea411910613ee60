// Rolling status series buffers
use super::rate::rate_from_counters;
use super::sample::Sample;
use super::telemetry::{ChartData, ChartKind, SeriesData};
use chrono::{DateTime, Duration, Utc};

pub const TEMPERATURE_CHART_ID: &str = "temp-chart";
pub const RXTX_CHART_ID: &str = "rxtx-chart";

/// Index-aligned buffers backing the temperature and throughput charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSeries {
    timestamps: Vec<DateTime<Utc>>,
    temperature: Vec<f64>,
    rx_counters: Vec<u64>,
    tx_counters: Vec<u64>,
    rx_rate: Vec<Option<u64>>,
    tx_rate: Vec<Option<u64>>,
}

impl StatusSeries {
    pub fn from_samples(samples: &[Sample]) -> Self {
        let mut series = Self::default();
        series.append(samples);
        series
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    pub fn rx_rate(&self) -> &[Option<u64>] {
        &self.rx_rate
    }

    pub fn tx_rate(&self) -> &[Option<u64>] {
        &self.tx_rate
    }

    /// Append samples and recompute the rate buffers from the full counter
    /// history.
    pub fn append(&mut self, samples: &[Sample]) {
        for s in samples {
            self.timestamps.push(s.timestamp);
            self.temperature.push(s.temperature);
            self.rx_counters.push(s.rx_bytes);
            self.tx_counters.push(s.tx_bytes);
        }
        self.rx_rate = aligned_rates(&self.rx_counters);
        self.tx_rate = aligned_rates(&self.tx_counters);
    }

    /// Drop every entry that is not within `window` before `now`.
    ///
    /// Returns the number of entries dropped. The first rate entry of what
    /// remains has no predecessor in the window and becomes a gap.
    pub fn trim(&mut self, now: DateTime<Utc>, window: Duration) -> usize {
        // Timestamps are ordered, so the in-window entries form a suffix.
        let idx = self
            .timestamps
            .partition_point(|ts| now.signed_duration_since(*ts) >= window);

        self.timestamps.drain(..idx);
        self.temperature.drain(..idx);
        self.rx_counters.drain(..idx);
        self.tx_counters.drain(..idx);
        self.rx_rate.drain(..idx);
        self.tx_rate.drain(..idx);

        if let Some(first) = self.rx_rate.first_mut() {
            *first = None;
        }
        if let Some(first) = self.tx_rate.first_mut() {
            *first = None;
        }
        idx
    }

    pub fn temperature_chart(&self) -> ChartData {
        ChartData::new(
            TEMPERATURE_CHART_ID,
            "Temperature",
            Some("°C"),
            ChartKind::Line,
            self.timestamps.clone(),
            vec![SeriesData::new(
                "temperature",
                "Temperature",
                self.temperature.iter().copied().map(Some).collect(),
            )],
        )
    }

    pub fn rxtx_chart(&self) -> ChartData {
        ChartData::new(
            RXTX_CHART_ID,
            "Throughput",
            Some("Bytes"),
            ChartKind::MultiLine,
            self.timestamps.clone(),
            vec![
                SeriesData::new("rx", "Received", to_values(&self.rx_rate)),
                SeriesData::new("tx", "Transmitted", to_values(&self.tx_rate)),
            ],
        )
    }
}

fn aligned_rates(counters: &[u64]) -> Vec<Option<u64>> {
    if counters.is_empty() {
        return Vec::new();
    }
    std::iter::once(None)
        .chain(rate_from_counters(counters).into_iter().map(Some))
        .collect()
}

fn to_values(rates: &[Option<u64>]) -> Vec<Option<f64>> {
    rates.iter().map(|r| r.map(|v| v as f64)).collect()
}

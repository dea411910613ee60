// StatusView that renders charts and details as log events
use crate::application::status_view::StatusView;
use crate::domain::format::{human_bytes, UNIT_SEPARATOR};
use crate::domain::telemetry::{ChartData, StatusDetails};

#[derive(Debug, Default)]
pub struct TracingView;

impl TracingView {
    pub fn new() -> Self {
        Self
    }
}

impl StatusView for TracingView {
    fn draw_chart(&mut self, chart: &ChartData) {
        tracing::info!(
            chart = %chart.id,
            points = chart.labels.len(),
            "{}",
            chart_summary(chart)
        );
    }

    fn show_details(&mut self, details: &StatusDetails) {
        tracing::info!(
            temperature = %details.temperature,
            uptime = %details.uptime,
            timestamp = %details.timestamp,
            rxtx = %details.rxtx,
            "Probe status"
        );
    }
}

/// One-line summary with the latest value of each series.
pub fn chart_summary(chart: &ChartData) -> String {
    let latest = chart
        .series
        .iter()
        .map(|s| {
            let value = s
                .latest()
                .map(|v| format_value(v, chart.unit.as_deref()))
                .unwrap_or_else(|| "-".to_string());
            format!("{}={}", s.name, value)
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("{}: {}", chart.title, latest)
}

fn format_value(value: f64, unit: Option<&str>) -> String {
    match unit {
        Some("Bytes") => human_bytes(value.max(0.0).round() as u64),
        Some(unit) => format!("{value:.1}{UNIT_SEPARATOR}{unit}"),
        None => format!("{value:.1}"),
    }
}

// Drawing surface for status charts and details
use crate::domain::telemetry::{ChartData, StatusDetails};

pub trait StatusView: Send {
    /// Replace the chart identified by `chart.id` with new contents.
    fn draw_chart(&mut self, chart: &ChartData);

    fn show_details(&mut self, details: &StatusDetails);
}

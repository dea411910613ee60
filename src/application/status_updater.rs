// Status chart updater - history load plus live feed dispatch
use crate::application::status_source::ProbeStatusSource;
use crate::application::status_view::StatusView;
use crate::domain::sample::Sample;
use crate::domain::series::StatusSeries;
use crate::domain::telemetry::StatusDetails;
use crate::error::StatusError;
use chrono::{DateTime, Duration, Local, Utc};
use futures::StreamExt;
use std::sync::Arc;

/// Keeps the temperature and throughput charts of one probe up to date.
pub struct StatusChartUpdater<V: StatusView> {
    source: Arc<dyn ProbeStatusSource>,
    probe_id: String,
    window: Duration,
    series: StatusSeries,
    view: V,
}

impl<V: StatusView> StatusChartUpdater<V> {
    /// Fetch history and draw the initial charts.
    ///
    /// A failed history fetch is returned as is; nothing is drawn.
    pub async fn setup(
        source: Arc<dyn ProbeStatusSource>,
        probe_id: impl Into<String>,
        view: V,
        window: Duration,
    ) -> Result<Self, StatusError> {
        let probe_id = probe_id.into();
        let history = source.fetch_history(&probe_id).await?;

        tracing::debug!(
            "Loaded {} historical samples for probe {}",
            history.len(),
            probe_id
        );

        let mut updater = Self {
            source,
            probe_id,
            window,
            series: StatusSeries::from_samples(&history),
            view,
        };

        updater.show_latest(&history);
        updater.redraw();
        Ok(updater)
    }

    pub fn probe_id(&self) -> &str {
        &self.probe_id
    }

    pub fn series(&self) -> &StatusSeries {
        &self.series
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Apply one pushed batch as of `now`.
    pub fn on_live_update(&mut self, batch: &[Sample], now: DateTime<Utc>) {
        tracing::debug!(
            "Received status update for probe {}: {} samples",
            self.probe_id,
            batch.len()
        );

        self.show_latest(batch);
        self.series.append(batch);

        let dropped = self.series.trim(now, self.window);
        if dropped > 0 {
            tracing::debug!("Dropped {} samples outside the window", dropped);
        }

        self.redraw();
    }

    /// Consume the live feed until it closes.
    ///
    /// A transport or decode error stops the loop and is returned.
    pub async fn run(&mut self) -> Result<(), StatusError> {
        let mut feed = self.source.subscribe(&self.probe_id).await?;
        tracing::info!("Subscribed to status feed for probe {}", self.probe_id);

        while let Some(message) = feed.next().await {
            match message {
                Ok(batch) => self.on_live_update(&batch, Utc::now()),
                Err(e) => {
                    tracing::error!("Status feed for probe {} failed: {}", self.probe_id, e);
                    return Err(e);
                }
            }
        }

        tracing::info!("Status feed for probe {} closed", self.probe_id);
        Ok(())
    }

    fn show_latest(&mut self, samples: &[Sample]) {
        if let Some(latest) = samples.last() {
            self.view
                .show_details(&StatusDetails::from_sample(latest, &Local));
        }
    }

    fn redraw(&mut self) {
        self.view.draw_chart(&self.series.temperature_chart());
        self.view.draw_chart(&self.series.rxtx_chart());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::status_source::SampleStream;
    use crate::domain::series::{RXTX_CHART_ID, TEMPERATURE_CHART_ID};
    use crate::domain::telemetry::ChartData;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;
    use tokio_stream::wrappers::ReceiverStream;

    type FeedItem = Result<Vec<Sample>, StatusError>;

    struct FakeSource {
        history: Option<Vec<Sample>>,
        feed: Mutex<Option<mpsc::Receiver<FeedItem>>>,
    }

    impl FakeSource {
        fn new(history: Vec<Sample>) -> (Arc<Self>, mpsc::Sender<FeedItem>) {
            let (tx, rx) = mpsc::channel(16);
            let source = Arc::new(Self {
                history: Some(history),
                feed: Mutex::new(Some(rx)),
            });
            (source, tx)
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                history: None,
                feed: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl ProbeStatusSource for FakeSource {
        async fn fetch_history(&self, _probe_id: &str) -> Result<Vec<Sample>, StatusError> {
            self.history
                .clone()
                .ok_or_else(|| StatusError::InvalidUrl("unreachable".to_string()))
        }

        async fn subscribe(&self, _probe_id: &str) -> Result<SampleStream, StatusError> {
            let rx = self
                .feed
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| StatusError::InvalidUrl("already subscribed".to_string()))?;
            Ok(ReceiverStream::new(rx).boxed())
        }
    }

    #[derive(Default)]
    struct RecordingView {
        charts: Vec<ChartData>,
        details: Vec<StatusDetails>,
    }

    impl RecordingView {
        fn last_chart(&self, id: &str) -> &ChartData {
            self.charts.iter().rev().find(|c| c.id == id).unwrap()
        }
    }

    impl StatusView for RecordingView {
        fn draw_chart(&mut self, chart: &ChartData) {
            self.charts.push(chart.clone());
        }

        fn show_details(&mut self, details: &StatusDetails) {
            self.details.push(details.clone());
        }
    }

    fn sample(timestamp: DateTime<Utc>, temperature: f64, rx: u64, tx: u64) -> Sample {
        Sample::new(timestamp, temperature, "PT2H".to_string(), rx, tx)
    }

    #[tokio::test]
    async fn test_setup_draws_history() {
        let now = Utc::now();
        let (source, _tx) = FakeSource::new(vec![
            sample(now - Duration::minutes(2), 40.0, 100, 10),
            sample(now - Duration::minutes(1), 41.0, 300, 20),
        ]);

        let updater =
            StatusChartUpdater::setup(source, "7", RecordingView::default(), Duration::hours(24))
                .await
                .unwrap();

        let view = updater.view();
        assert_eq!(view.charts.len(), 2);
        assert_eq!(
            view.last_chart(TEMPERATURE_CHART_ID).series[0].values,
            vec![Some(40.0), Some(41.0)]
        );
        assert_eq!(
            view.last_chart(RXTX_CHART_ID).series[0].values,
            vec![None, Some(200.0)]
        );
        assert_eq!(view.details.len(), 1);
        assert_eq!(view.details[0].temperature, "41.0\u{202F}°C");
        assert_eq!(view.details[0].uptime, "2 hr");
    }

    #[tokio::test]
    async fn test_setup_fails_without_history() {
        let result = StatusChartUpdater::setup(
            FakeSource::unreachable(),
            "7",
            RecordingView::default(),
            Duration::hours(24),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_setup_with_empty_history() {
        let (source, _tx) = FakeSource::new(Vec::new());
        let updater =
            StatusChartUpdater::setup(source, "7", RecordingView::default(), Duration::hours(24))
                .await
                .unwrap();

        assert!(updater.series().is_empty());
        assert!(updater.view().details.is_empty());
        assert_eq!(updater.view().charts.len(), 2);
    }

    #[tokio::test]
    async fn test_live_update_appends_and_trims() {
        let now = Utc::now();
        let (source, _tx) = FakeSource::new(vec![
            sample(now - Duration::hours(30), 20.0, 100, 100),
            sample(now - Duration::hours(2), 21.0, 200, 200),
        ]);
        let mut updater =
            StatusChartUpdater::setup(source, "7", RecordingView::default(), Duration::hours(24))
                .await
                .unwrap();

        updater.on_live_update(
            &[
                sample(now - Duration::minutes(1), 22.0, 500, 250),
                sample(now, 23.5, 50, 300),
            ],
            now,
        );

        let series = updater.series();
        assert_eq!(series.len(), 3);
        assert_eq!(series.temperature(), &[21.0, 22.0, 23.5]);
        assert_eq!(series.rx_rate(), &[None, Some(300), Some(50)]);
        assert_eq!(series.tx_rate(), &[None, Some(50), Some(50)]);

        let view = updater.view();
        assert_eq!(view.charts.len(), 4);
        assert_eq!(view.last_chart(RXTX_CHART_ID).labels.len(), 3);
        assert_eq!(view.details.last().unwrap().temperature, "23.5\u{202F}°C");
        assert_eq!(view.details.last().unwrap().rxtx, "50\u{202F}B / 300\u{202F}B");
    }

    #[tokio::test]
    async fn test_empty_batch_redraws_without_details() {
        let now = Utc::now();
        let (source, _tx) = FakeSource::new(vec![sample(now, 20.0, 1, 1)]);
        let mut updater =
            StatusChartUpdater::setup(source, "7", RecordingView::default(), Duration::hours(24))
                .await
                .unwrap();

        updater.on_live_update(&[], now);

        assert_eq!(updater.view().details.len(), 1);
        assert_eq!(updater.view().charts.len(), 4);
    }

    #[tokio::test]
    async fn test_run_consumes_feed_in_order() {
        let now = Utc::now();
        let (source, tx) = FakeSource::new(Vec::new());
        let mut updater =
            StatusChartUpdater::setup(source, "7", RecordingView::default(), Duration::hours(24))
                .await
                .unwrap();

        tx.send(Ok(vec![sample(now - Duration::minutes(2), 30.0, 10, 10)]))
            .await
            .unwrap();
        tx.send(Ok(vec![sample(now - Duration::minutes(1), 31.0, 25, 15)]))
            .await
            .unwrap();
        drop(tx);

        updater.run().await.unwrap();

        assert_eq!(updater.series().temperature(), &[30.0, 31.0]);
        assert_eq!(updater.series().rx_rate(), &[None, Some(15)]);
    }

    #[tokio::test]
    async fn test_run_stops_on_bad_message() {
        let now = Utc::now();
        let (source, tx) = FakeSource::new(Vec::new());
        let mut updater =
            StatusChartUpdater::setup(source, "7", RecordingView::default(), Duration::hours(24))
                .await
                .unwrap();

        let bad = serde_json::from_str::<Vec<Sample>>("{").unwrap_err();
        tx.send(Err(StatusError::Decode(bad))).await.unwrap();
        tx.send(Ok(vec![sample(now, 30.0, 10, 10)])).await.unwrap();

        let result = updater.run().await;
        assert!(matches!(result, Err(StatusError::Decode(_))));
        assert!(updater.series().is_empty());
    }
}

// Source trait for probe status data
use crate::domain::sample::Sample;
use crate::error::StatusError;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Live feed of sample batches, in the order they were pushed.
pub type SampleStream = BoxStream<'static, Result<Vec<Sample>, StatusError>>;

#[async_trait]
pub trait ProbeStatusSource: Send + Sync {
    /// Historical samples for a probe, oldest first
    async fn fetch_history(&self, probe_id: &str) -> Result<Vec<Sample>, StatusError>;

    /// Open the push channel for a probe
    async fn subscribe(&self, probe_id: &str) -> Result<SampleStream, StatusError>;
}

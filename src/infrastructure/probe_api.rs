// HTTP + WebSocket client for the probe status endpoints
use crate::application::status_source::{ProbeStatusSource, SampleStream};
use crate::domain::sample::{parse_batch, Sample};
use crate::error::StatusError;
use async_trait::async_trait;
use futures::stream::Stream;
use futures::StreamExt;
use reqwest::Url;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};

const FEED_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct ProbeApi {
    base_url: Url,
    client: reqwest::Client,
}

impl ProbeApi {
    pub fn new(base_url: &str) -> Result<Self, StatusError> {
        // A trailing slash makes `join` append instead of replacing the last segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let url = Url::parse(&normalized)
            .map_err(|e| StatusError::InvalidUrl(format!("{base_url}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(StatusError::InvalidUrl(format!(
                "{base_url}: expected an http or https url"
            )));
        }

        Ok(Self {
            base_url: url,
            client: reqwest::Client::new(),
        })
    }

    pub fn history_url(&self, probe_id: &str) -> Result<Url, StatusError> {
        self.endpoint(probe_id, "hist")
    }

    pub fn feed_url(&self, probe_id: &str) -> Result<Url, StatusError> {
        let mut url = self.endpoint(probe_id, "ws")?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| StatusError::InvalidUrl(format!("{url}: cannot switch to {scheme}")))?;
        Ok(url)
    }

    fn endpoint(&self, probe_id: &str, leaf: &str) -> Result<Url, StatusError> {
        let path = format!("probes/{}/status/{}", urlencoding::encode(probe_id), leaf);
        self.base_url
            .join(&path)
            .map_err(|e| StatusError::InvalidUrl(format!("{path}: {e}")))
    }
}

#[async_trait]
impl ProbeStatusSource for ProbeApi {
    async fn fetch_history(&self, probe_id: &str) -> Result<Vec<Sample>, StatusError> {
        let url = self.history_url(probe_id)?;

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| StatusError::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StatusError::HttpStatus {
                url: url.to_string(),
                status,
                body,
            });
        }

        let body = response.text().await.map_err(|source| StatusError::Request {
            url: url.to_string(),
            source,
        })?;
        let samples = parse_batch(&body)?;

        tracing::debug!("Probe status hist response: {} samples", samples.len());
        Ok(samples)
    }

    async fn subscribe(&self, probe_id: &str) -> Result<SampleStream, StatusError> {
        let url = self.feed_url(probe_id)?;
        let (socket, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
        tracing::info!("Connected to status feed {}", url);

        let (tx, mut rx) = mpsc::channel(FEED_BUFFER);
        tokio::spawn(forward_feed(socket, tx));

        let feed = async_stream::stream! {
            while let Some(batch) = rx.recv().await {
                yield batch;
            }
        };
        Ok(feed.boxed())
    }
}

/// Decode websocket frames into sample batches until the socket closes,
/// an error is forwarded, or the consumer goes away.
async fn forward_feed<S>(mut socket: S, tx: mpsc::Sender<Result<Vec<Sample>, StatusError>>)
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = socket.next().await {
        let batch = match frame {
            Ok(Message::Text(text)) => parse_batch(&text).map_err(StatusError::from),
            Ok(Message::Binary(data)) => {
                serde_json::from_slice::<Vec<Sample>>(&data).map_err(StatusError::from)
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => Err(StatusError::from(e)),
        };

        let failed = batch.is_err();
        if tx.send(batch).await.is_err() || failed {
            break;
        }
    }
    tracing::debug!("Status feed reader finished");
}

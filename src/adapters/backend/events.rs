//! Backend notification stream
//!
//! The backend publishes job notifications as newline-delimited JSON on a
//! long-lived `GET` response, one envelope per line:
//!
//! ```text
//! {"event":"status","data":{"message":"Fetching projects"}}
//! {"event":"progress","data":{"percent":42}}
//! ```

use super::traits::NotificationSource;
use crate::config::BackendConfig;
use crate::core::status::Notification;
use crate::domain::{BackendError, GeodocError, NotificationParseError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Parse one line of the stream
pub fn parse_line(line: &str) -> std::result::Result<Notification, NotificationParseError> {
    let envelope: Envelope = serde_json::from_str(line)
        .map_err(|e| NotificationParseError::Malformed(e.to_string()))?;
    Notification::parse(&envelope.event, &envelope.data)
}

/// Subscribes to the backend's notification stream
pub struct EventStream {
    client: Client,
    url: String,
}

impl EventStream {
    /// Create a stream subscriber
    ///
    /// The client carries a connect timeout only; the response body stays
    /// open for the whole job.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new().connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            GeodocError::Configuration(format!("Failed to build event stream client: {e}"))
        })?;

        Ok(Self {
            client,
            url: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                config.events_path
            ),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NotificationSource for EventStream {
    async fn subscribe(
        &self,
        tx: mpsc::Sender<Notification>,
    ) -> std::result::Result<(), BackendError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/x-ndjson")
            .send()
            .await
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::from_status(status.as_u16(), message));
        }

        tracing::debug!(url = %self.url, "Subscribed to notification stream");

        let mut body = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| BackendError::StreamFailed(e.to_string()))?;
            buffer.extend_from_slice(&chunk);

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                if !forward(&line, &tx).await {
                    tracing::debug!("Notification receiver dropped, closing stream");
                    return Ok(());
                }
            }
        }

        // Trailing line without a newline
        if !buffer.is_empty() {
            forward(&buffer, &tx).await;
        }

        tracing::debug!("Notification stream ended");
        Ok(())
    }
}

/// Parse and send one raw line; false once the receiver is gone
async fn forward(raw: &[u8], tx: &mpsc::Sender<Notification>) -> bool {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();
    if line.is_empty() {
        return true;
    }

    match parse_line(line) {
        Ok(notification) => tx.send(notification).await.is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, line = %line, "Dropping malformed notification");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_line() {
        let notification =
            parse_line(r#"{"event":"status","data":{"message":"Fetching projects"}}"#).unwrap();
        assert_eq!(notification, Notification::status("Fetching projects"));
    }

    #[test]
    fn test_parse_progress_line() {
        let notification = parse_line(r#"{"event":"progress","data":{"percent":42}}"#).unwrap();
        assert_eq!(notification, Notification::progress(42.0));
    }

    #[test]
    fn test_parse_malformed_line() {
        assert!(matches!(
            parse_line("not json"),
            Err(NotificationParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_unknown_event() {
        assert!(matches!(
            parse_line(r#"{"event":"heartbeat","data":{}}"#),
            Err(NotificationParseError::UnknownEvent(_))
        ));
    }

    #[test]
    fn test_stream_url() {
        let config = BackendConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..BackendConfig::default()
        };
        let stream = EventStream::new(&config).unwrap();
        assert_eq!(stream.url(), "http://localhost:5000/events");
    }

    #[tokio::test]
    async fn test_forward_skips_blank_and_malformed() {
        let (tx, mut rx) = mpsc::channel(4);
        assert!(forward(b"   \n", &tx).await);
        assert!(forward(b"{oops}\n", &tx).await);
        assert!(forward(br#"{"event":"progress","data":7}"#, &tx).await);
        drop(tx);

        assert_eq!(rx.recv().await, Some(Notification::progress(7.0)));
        assert_eq!(rx.recv().await, None);
    }
}

//! Chat delivery: posts a rendered notification to the incoming webhook.

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};
use webhook_core::{DestinationKind, RenderedNotification, to_wire};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to encode {destination} payload: {source}")]
    Encode {
        destination: DestinationKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("{destination} webhook rejected the message: {source}")]
    Http {
        destination: DestinationKind,
        #[source]
        source: reqwest::Error,
    },
}

/// Encodes `rendered` for `destination` and posts it to `uri`.
pub async fn deliver(
    http: &Client,
    destination: DestinationKind,
    uri: &str,
    rendered: &RenderedNotification,
) -> Result<(), NotifyError> {
    let body = to_wire(rendered, destination).map_err(|source| NotifyError::Encode {
        destination,
        source,
    })?;
    debug!(%destination, thread = %rendered.thread_key, "sending chat notification");

    let http_err = |source: reqwest::Error| NotifyError::Http {
        destination,
        source,
    };
    http.post(uri)
        .json(&body)
        .send()
        .await
        .map_err(http_err)?
        .error_for_status()
        .map_err(http_err)?;

    info!(%destination, thread = %rendered.thread_key, "chat notification delivered");
    Ok(())
}

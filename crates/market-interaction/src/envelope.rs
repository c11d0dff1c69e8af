//! The `{ success, data, message }` wrapper every backend response uses.

use market_core::{MarketError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Turns a raw response into the payload or a classified error.
///
/// - body is not an envelope: `Transport`, whatever the HTTP status
/// - `success: false`: `Api` carrying the server's message
/// - `success: true`: `data` decoded as `T` (a missing `data` decodes as `null`)
///
/// A non-2xx status with a readable envelope is handled as the envelope says.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    let envelope: Envelope = serde_json::from_slice(body).map_err(|e| {
        MarketError::transport(format!("HTTP {}: unreadable response body ({})", status, e))
    })?;

    if !envelope.success {
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed (HTTP {})", status));
        return Err(MarketError::api(message));
    }

    serde_json::from_value(envelope.data.unwrap_or(Value::Null))
        .map_err(|e| MarketError::transport(format!("unexpected response data: {}", e)))
}

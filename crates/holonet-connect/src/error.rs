//! Error types for the holonet-connect crate

use holonet_core_interface::{GatewayError, ResourceKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: u32 },

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode {kind} payload: {source}")]
    Decode {
        kind: ResourceKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<ConnectError> for GatewayError {
    fn from(err: ConnectError) -> Self {
        match err {
            ConnectError::NotFound { kind, id } => GatewayError::NotFound { kind, id },
            ConnectError::Status { status, url } => GatewayError::Status { status, url },
            ConnectError::Decode { kind, source } => GatewayError::Decode {
                kind,
                reason: source.to_string(),
            },
            ConnectError::Transport(e) => GatewayError::Network(e.to_string()),
            other => GatewayError::Other(other.to_string()),
        }
    }
}

use thiserror::Error;

use crate::order::TradeMethod;

/// Errors surfaced by the channel registry and the provider adapters.
///
/// Every variant is terminal for the operation that produced it. Nothing in this crate retries or suppresses them.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Unknown payment channel: '{0}'")]
    UnknownChannel(String),
    #[error("The callback did not carry a trade number")]
    UnknownTradeNo,
    #[error("The {channel} channel does not support {operation}")]
    UnsupportedOperation { channel: String, operation: String },
    #[error("The {channel} channel does not support the '{method}' trade method")]
    UnsupportedTradeMethod { channel: String, method: TradeMethod },
    #[error(transparent)]
    ProviderCall(#[from] ProviderError),
    #[error("The payment provider rejected the request: {0}")]
    ProviderResponse(String),
    #[error("Invalid callback URL: {0}")]
    InvalidCallbackUrl(String),
    #[error("Invalid order amount: {0}")]
    InvalidAmount(String),
}

impl ChannelError {
    pub fn unsupported_operation(channel: &str, operation: &str) -> Self {
        Self::UnsupportedOperation { channel: channel.to_string(), operation: operation.to_string() }
    }

    pub fn unsupported_method(channel: &str, method: TradeMethod) -> Self {
        Self::UnsupportedTradeMethod { channel: channel.to_string(), method }
    }
}

impl From<pgw_common::MinorUnitsConversionError> for ChannelError {
    fn from(e: pgw_common::MinorUnitsConversionError) -> Self {
        Self::InvalidAmount(e.to_string())
    }
}

/// The error type reported by provider collaborators (the SDK-level clients that sign, send and verify requests).
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Could not reach the payment provider. {0}")]
    Transport(String),
    #[error("Payment provider call failed. Error {code}. {message}")]
    Api { code: String, message: String },
    #[error("Could not verify the provider notification. {0}")]
    Verification(String),
    #[error("Could not decode the provider response. {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use pgw_channels::{ChannelError, ProviderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    ChannelError(#[from] ChannelError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ChannelError(e) => match e {
                ChannelError::UnknownChannel(_) => StatusCode::NOT_FOUND,
                ChannelError::UnknownTradeNo => StatusCode::BAD_REQUEST,
                ChannelError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
                ChannelError::UnsupportedOperation { .. } => StatusCode::NOT_IMPLEMENTED,
                ChannelError::UnsupportedTradeMethod { .. } => StatusCode::NOT_IMPLEMENTED,
                ChannelError::ProviderCall(ProviderError::Verification(_)) => StatusCode::BAD_REQUEST,
                ChannelError::ProviderCall(_) => StatusCode::BAD_GATEWAY,
                ChannelError::ProviderResponse(_) => StatusCode::BAD_GATEWAY,
                ChannelError::InvalidCallbackUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

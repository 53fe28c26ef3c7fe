use std::fmt;

use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorCode {
    Unauthorized,
    Forbidden,
    HttpTimeout,
    InvalidResponse,
    InvalidRequest,
    NotFound,
    Unavailable,
    Unknown,
}

impl GatewayErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            GatewayErrorCode::Unauthorized => "UNAUTHORIZED",
            GatewayErrorCode::Forbidden => "FORBIDDEN",
            GatewayErrorCode::HttpTimeout => "HTTP_TIMEOUT",
            GatewayErrorCode::InvalidResponse => "INVALID_RESPONSE",
            GatewayErrorCode::InvalidRequest => "INVALID_REQUEST",
            GatewayErrorCode::NotFound => "NOT_FOUND",
            GatewayErrorCode::Unavailable => "GATEWAY_UNAVAILABLE",
            GatewayErrorCode::Unknown => "UNKNOWN_GATEWAY_ERROR",
        }
    }
}

impl fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("faculty identity is not available")]
    IdentityUnavailable,

    #[error("{message}")]
    Gateway {
        code: GatewayErrorCode,
        message: String,
        correlation_id: Option<String>,
    },

    #[error("class roster unavailable: {message}")]
    RosterUnavailable { message: String },

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn identity_unavailable() -> Self {
        warn!(target: "app::session", "no faculty identity resolvable");
        AppError::IdentityUnavailable
    }

    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation { message }
    }

    pub fn gateway_with_correlation(
        code: GatewayErrorCode,
        message: impl Into<String>,
        correlation_id: Option<&str>,
    ) -> Self {
        let message = message.into();
        match correlation_id {
            Some(id) => {
                warn!(target: "app::gateway", code = %code, correlation_id = %id, %message);
            }
            None => {
                warn!(target: "app::gateway", code = %code, %message);
            }
        }

        AppError::Gateway {
            code,
            message,
            correlation_id: correlation_id.map(|value| value.to_string()),
        }
    }

    pub fn roster_unavailable(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::roster", %message, "roster unavailable");
        AppError::RosterUnavailable { message }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }

    pub fn gateway_code(&self) -> Option<GatewayErrorCode> {
        match self {
            AppError::Gateway { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn gateway_correlation_id(&self) -> Option<&str> {
        match self {
            AppError::Gateway { correlation_id, .. } => correlation_id.as_deref(),
            _ => None,
        }
    }
}

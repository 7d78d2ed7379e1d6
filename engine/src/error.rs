//! Error handling for the Crop Risk Advisory engine
//!
//! Distinguishes recoverable provider failures, client-input problems,
//! and internal faults so callers can react to each class.

use serde::Serialize;
use shared::WeatherParameter;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Provider errors, recovered inside the merge step
    #[error("Weather source '{provider}' unavailable: {reason}")]
    SourceUnavailable { provider: String, reason: String },

    // Client-input errors
    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Stage '{stage}' is missing parameter '{parameter}'")]
    MissingParameter {
        stage: String,
        parameter: WeatherParameter,
    },

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid request document: {0}")]
    InvalidDocument(String),

    // Internal errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// True for errors the caller can fix by correcting the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::MissingInput(_)
                | AppError::MissingParameter { .. }
                | AppError::Validation { .. }
                | AppError::InvalidDocument(_)
        )
    }

    /// Build the serializable error document surfaced to callers
    pub fn to_response(&self) -> ErrorResponse {
        let detail = match self {
            AppError::SourceUnavailable { provider, .. } => ErrorDetail {
                code: "SOURCE_UNAVAILABLE".to_string(),
                message: format!("Weather source '{}' is unavailable", provider),
                field: None,
            },
            AppError::MissingInput(field) => ErrorDetail {
                code: "MISSING_REQUIRED_INPUT".to_string(),
                message: format!("Missing required input: {}", field),
                field: Some(field.clone()),
            },
            AppError::MissingParameter { stage, parameter } => ErrorDetail {
                code: "MISSING_REQUIRED_INPUT".to_string(),
                message: format!(
                    "Stage '{}' is missing parameter '{}' in its ideal or forecasted record",
                    stage, parameter
                ),
                field: Some(parameter.key().to_string()),
            },
            AppError::Validation { field, message } => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: message.clone(),
                field: Some(field.clone()),
            },
            AppError::InvalidDocument(msg) => ErrorDetail {
                code: "INVALID_DOCUMENT".to_string(),
                message: msg.clone(),
                field: None,
            },
            AppError::Configuration(msg) => ErrorDetail {
                code: "CONFIGURATION_ERROR".to_string(),
                message: format!("Configuration error: {}", msg),
                field: None,
            },
            AppError::Computation(msg) => ErrorDetail {
                code: "COMPUTATION_ERROR".to_string(),
                message: msg.clone(),
                field: None,
            },
            AppError::Internal(_) => ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message: "An internal error occurred".to_string(),
                field: None,
            },
        };

        if self.is_client_error() {
            tracing::warn!("Error: {:?}", self);
        } else {
            tracing::error!("Error: {:?}", self);
        }

        ErrorResponse { error: detail }
    }
}

/// Result type alias for services
pub type AppResult<T> = Result<T, AppError>;

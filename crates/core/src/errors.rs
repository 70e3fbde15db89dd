use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("input text is {len} characters, limit is {max}")]
    InputTooLong { len: usize, max: usize },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("engine dependencies missing: {}", .0.join(", "))]
    DependencyMissing(Vec<String>),
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

/// Stable error codes exposed to callers of the recommend boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    EngineDependencyMissing,
    CatalogUnavailable,
    InvalidInput,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EngineDependencyMissing => "ENGINE_DEPENDENCY_MISSING",
            Self::CatalogUnavailable => "CATALOG_UNAVAILABLE",
            Self::InvalidInput => "INVALID_INPUT",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Serialize, Deserialize)]
#[error("{}: {message}", .code.as_str())]
pub struct InterfaceError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self.code {
            ErrorCode::EngineDependencyMissing => {
                "The recommendation engine is not fully configured."
            }
            ErrorCode::CatalogUnavailable => {
                "The product catalog is unavailable right now. Please retry shortly."
            }
            ErrorCode::InvalidInput => {
                "The request could not be processed. Check inputs and try again."
            }
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => Self {
                code: ErrorCode::InvalidInput,
                message: error.to_string(),
                details: domain_details(&error),
            },
            ApplicationError::DependencyMissing(missing) => Self {
                code: ErrorCode::EngineDependencyMissing,
                message: "required engine components are not registered".to_owned(),
                details: json!({ "missing": missing }),
            },
            ApplicationError::CatalogUnavailable(reason) => Self {
                code: ErrorCode::CatalogUnavailable,
                message: "no product catalog was supplied and no default is configured"
                    .to_owned(),
                details: json!({ "reason": reason }),
            },
        }
    }
}

fn domain_details(error: &DomainError) -> Value {
    match error {
        DomainError::InputTooLong { len, max } => json!({ "length": len, "limit": max }),
        DomainError::InvariantViolation(_) => Value::Null,
    }
}

/// Failure envelope; `success` is always `false` so callers can branch on it alone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: InterfaceError,
}

impl From<InterfaceError> for ErrorResponse {
    fn from(error: InterfaceError) -> Self {
        Self { success: false, error }
    }
}

impl From<ApplicationError> for ErrorResponse {
    fn from(error: ApplicationError) -> Self {
        InterfaceError::from(error).into()
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Message reported for failures whose detail must not reach the caller.
pub const INTERNAL_FAILURE: &str = "Internal Failure";

#[derive(Error, Debug)]
pub enum ApsError {
    MalformedIdentifier(String),
    UnsupportedKind(String),
    MissingRequiredField(String),
    InvalidRequest(String),
    RemoteTransient(String),
    RemoteNotFound(String),
    RemoteAccessDenied(String),
    RemoteConflict(String),
    RemoteQuotaExceeded(String),
    RemoteValidation(String),
    RemoteUnhandled(String),
    Config(String),
    Io(#[from] std::io::Error),
    Serialization(String),
}

impl Display for ApsError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ApsError::MalformedIdentifier(s) => write!(f, "Malformed identifier: {}", s),
            ApsError::UnsupportedKind(s) => write!(f, "Unsupported resource kind: {}", s),
            ApsError::MissingRequiredField(s) => write!(f, "Missing required field: {}", s),
            ApsError::InvalidRequest(s) => write!(f, "Invalid request: {}", s),
            ApsError::RemoteTransient(s)
            | ApsError::RemoteNotFound(s)
            | ApsError::RemoteAccessDenied(s)
            | ApsError::RemoteConflict(s)
            | ApsError::RemoteQuotaExceeded(s)
            | ApsError::RemoteValidation(s) => write!(f, "{}", s),
            ApsError::RemoteUnhandled(s) => write!(f, "Unhandled remote error: {}", s),
            ApsError::Config(s) => write!(f, "Configuration error: {}", s),
            ApsError::Io(e) => write!(f, "I/O error: {}", e),
            ApsError::Serialization(s) => write!(f, "Serialization error: {}", s),
        }
    }
}

impl ApsError {
    /// Outcome code reported to the caller for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            // Identifiers that cannot be resolved point at nothing we manage.
            ApsError::MalformedIdentifier(_)
            | ApsError::UnsupportedKind(_)
            | ApsError::MissingRequiredField(_)
            | ApsError::RemoteNotFound(_) => ErrorCode::NotFound,
            ApsError::InvalidRequest(_) | ApsError::RemoteValidation(_) => {
                ErrorCode::InvalidRequest
            }
            ApsError::RemoteTransient(_) => ErrorCode::Throttling,
            ApsError::RemoteAccessDenied(_) => ErrorCode::AccessDenied,
            ApsError::RemoteConflict(_) => ErrorCode::ResourceConflict,
            ApsError::RemoteQuotaExceeded(_) => ErrorCode::ServiceLimitExceeded,
            ApsError::RemoteUnhandled(_)
            | ApsError::Config(_)
            | ApsError::Io(_)
            | ApsError::Serialization(_) => ErrorCode::GeneralServiceException,
        }
    }

    /// Caller-facing message. Unhandled and internal errors are collapsed to
    /// a generic message so provider detail never leaks.
    pub fn public_message(&self) -> String {
        match self.error_code() {
            ErrorCode::GeneralServiceException => INTERNAL_FAILURE.to_string(),
            _ => self.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApsError::RemoteNotFound(_))
    }
}

/// Outcome taxonomy understood by the calling environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidRequest,
    NotFound,
    AccessDenied,
    Throttling,
    ResourceConflict,
    ServiceLimitExceeded,
    GeneralServiceException,
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            ErrorCode::InvalidRequest => "InvalidRequest",
            ErrorCode::NotFound => "NotFound",
            ErrorCode::AccessDenied => "AccessDenied",
            ErrorCode::Throttling => "Throttling",
            ErrorCode::ResourceConflict => "ResourceConflict",
            ErrorCode::ServiceLimitExceeded => "ServiceLimitExceeded",
            ErrorCode::GeneralServiceException => "GeneralServiceException",
        };
        f.write_str(name)
    }
}

impl From<serde_yaml_ng::Error> for ApsError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        ApsError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ApsError {
    fn from(err: serde_json::Error) -> Self {
        ApsError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApsError>;

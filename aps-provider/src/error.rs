//! Errors returned by the remote API and their translation into the
//! provider's error taxonomy.

use thiserror::Error;
use tracing::warn;

use aps_core::error::ApsError;

pub const BAD_REQUEST: &str = "BadRequestException";
pub const INVALID_PARAMETER: &str = "InvalidParameter";
pub const INVALID_REQUEST: &str = "InvalidRequest";
pub const VALIDATION: &str = "ValidationException";
pub const TOO_MANY_REQUESTS: &str = "TooManyRequestsException";
pub const THROTTLING: &str = "ThrottlingException";
pub const NOT_FOUND: &str = "NotFoundException";
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";
pub const ACCESS_DENIED: &str = "AccessDeniedException";
pub const CONFLICT: &str = "ConflictException";
pub const SERVICE_QUOTA_EXCEEDED: &str = "ServiceQuotaExceededException";
pub const INTERNAL_SERVER: &str = "InternalServerException";

/// Error returned by a remote API call, carrying the provider's error code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ServiceError {
    pub code: String,
    pub message: String,
}

impl ServiceError {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(RESOURCE_NOT_FOUND, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == RESOURCE_NOT_FOUND || self.code == NOT_FOUND
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

type Classifier = fn(String) -> ApsError;

fn classify(code: &str) -> Option<Classifier> {
    let classifier: Classifier = match code {
        BAD_REQUEST | INVALID_PARAMETER | INVALID_REQUEST | VALIDATION => {
            ApsError::RemoteValidation
        }
        TOO_MANY_REQUESTS | THROTTLING => ApsError::RemoteTransient,
        NOT_FOUND | RESOURCE_NOT_FOUND => ApsError::RemoteNotFound,
        ACCESS_DENIED => ApsError::RemoteAccessDenied,
        CONFLICT => ApsError::RemoteConflict,
        SERVICE_QUOTA_EXCEEDED => ApsError::RemoteQuotaExceeded,
        _ => return None,
    };
    Some(classifier)
}

/// Shape the caller-facing message for a mapped error code.
fn caller_message(err: &ServiceError) -> String {
    let message = match err.code.as_str() {
        INVALID_PARAMETER => err
            .to_string()
            .trim_start_matches("InvalidParameter: ")
            .replace('\n', "")
            .replace(".- ", ". "),
        // Throttling responses carry no message of their own.
        TOO_MANY_REQUESTS => "API rate limit exceeded".to_string(),
        _ => err.message.clone(),
    };
    format!("{}: {}", err.code, message)
}

impl From<ServiceError> for ApsError {
    fn from(err: ServiceError) -> Self {
        match classify(&err.code) {
            Some(variant) => variant(caller_message(&err)),
            None => {
                warn!("unhandled remote error: {}", err);
                ApsError::RemoteUnhandled(err.to_string())
            }
        }
    }
}

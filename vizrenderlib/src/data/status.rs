//! Response status, reasons and table warnings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why a response is not plainly OK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonType {
    AccessDenied,
    UserNotAuthenticated,
    UnsupportedQueryOperation,
    InvalidQuery,
    InvalidRequest,
    InternalError,
    NotSupported,
    DataTruncated,
    NotModified,
    Timeout,
    IllegalFormattingPatterns,
    UnknownDataSourceId,
    Other,
}

impl ReasonType {
    /// Lower-snake-case name used in the `reason` field
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonType::AccessDenied => "access_denied",
            ReasonType::UserNotAuthenticated => "user_not_authenticated",
            ReasonType::UnsupportedQueryOperation => "unsupported_query_operation",
            ReasonType::InvalidQuery => "invalid_query",
            ReasonType::InvalidRequest => "invalid_request",
            ReasonType::InternalError => "internal_error",
            ReasonType::NotSupported => "not_supported",
            ReasonType::DataTruncated => "data_truncated",
            ReasonType::NotModified => "not_modified",
            ReasonType::Timeout => "timeout",
            ReasonType::IllegalFormattingPatterns => "illegal_formatting_patterns",
            ReasonType::UnknownDataSourceId => "unknown_data_source_id",
            ReasonType::Other => "other",
        }
    }

    /// Fixed human-readable message used in the `message` field
    pub fn message(&self) -> &'static str {
        match self {
            ReasonType::AccessDenied => "Access denied",
            ReasonType::UserNotAuthenticated => "User not signed in",
            ReasonType::UnsupportedQueryOperation => "Unsupported query operation",
            ReasonType::InvalidQuery => "Invalid query",
            ReasonType::InvalidRequest => "Invalid request",
            ReasonType::InternalError => "Internal error",
            ReasonType::NotSupported => "Operation not supported",
            ReasonType::DataTruncated => "Retrieved data was truncated",
            ReasonType::NotModified => "Data not modified",
            ReasonType::Timeout => "Request timed out",
            ReasonType::IllegalFormattingPatterns => "Illegal formatting patterns",
            ReasonType::UnknownDataSourceId => "Unknown data source ID",
            ReasonType::Other => "Could not complete request",
        }
    }
}

impl fmt::Display for ReasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "access_denied" => Ok(ReasonType::AccessDenied),
            "user_not_authenticated" => Ok(ReasonType::UserNotAuthenticated),
            "unsupported_query_operation" => Ok(ReasonType::UnsupportedQueryOperation),
            "invalid_query" => Ok(ReasonType::InvalidQuery),
            "invalid_request" => Ok(ReasonType::InvalidRequest),
            "internal_error" => Ok(ReasonType::InternalError),
            "not_supported" => Ok(ReasonType::NotSupported),
            "data_truncated" => Ok(ReasonType::DataTruncated),
            "not_modified" => Ok(ReasonType::NotModified),
            "timeout" => Ok(ReasonType::Timeout),
            "illegal_formatting_patterns" => Ok(ReasonType::IllegalFormattingPatterns),
            "unknown_data_source_id" => Ok(ReasonType::UnknownDataSourceId),
            "other" => Ok(ReasonType::Other),
            _ => Err(format!("Unknown reason type: {}", s)),
        }
    }
}

/// Outcome of the request that produced (or failed to produce) a table.
///
/// A reason and detail message only exist for non-OK statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseStatus {
    #[default]
    Ok,
    Warning {
        reason: ReasonType,
        message: Option<String>,
    },
    Error {
        reason: ReasonType,
        message: Option<String>,
    },
}

impl ResponseStatus {
    pub fn ok() -> Self {
        ResponseStatus::Ok
    }

    pub fn warning(reason: ReasonType, message: Option<String>) -> Self {
        ResponseStatus::Warning { reason, message }
    }

    pub fn error(reason: ReasonType, message: Option<String>) -> Self {
        ResponseStatus::Error { reason, message }
    }

    /// Wire name used in the `status` field
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Ok => "ok",
            ResponseStatus::Warning { .. } => "warning",
            ResponseStatus::Error { .. } => "error",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResponseStatus::Ok)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponseStatus::Error { .. })
    }

    /// The reason, for non-OK statuses
    pub fn reason(&self) -> Option<ReasonType> {
        match self {
            ResponseStatus::Ok => None,
            ResponseStatus::Warning { reason, .. } | ResponseStatus::Error { reason, .. } => {
                Some(*reason)
            }
        }
    }

    /// The detail message, for non-OK statuses that carry one
    pub fn message(&self) -> Option<&str> {
        match self {
            ResponseStatus::Ok => None,
            ResponseStatus::Warning { message, .. } | ResponseStatus::Error { message, .. } => {
                message.as_deref()
            }
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal problem recorded on a table by the layer that built it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub reason: ReasonType,
    pub message: String,
}

impl Warning {
    pub fn new(reason: ReasonType, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

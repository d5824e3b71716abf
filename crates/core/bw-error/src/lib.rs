//! Error types and classification for bucketwatch.
//!
//! This crate provides:
//! - [`BwError`] - Top-level error enum for the scan/report pipeline
//! - Domain-specific errors ([`StorageError`], [`NotifyError`])
//! - [`ErrorCategory`] for retry decisions on backend calls

use thiserror::Error;

/// Top-level error type for bucketwatch.
#[derive(Error, Debug)]
pub enum BwError {
    /// Storage listing errors (bucket access, pagination)
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Notification channel errors (publish)
    #[error("Notify error: {0}")]
    Notify(#[from] NotifyError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised while listing a bucket.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The bucket does not exist
    #[error("No such bucket: {0}")]
    NoSuchBucket(String),

    /// Credentials lack permission to list the bucket
    #[error("Access denied listing bucket {bucket}: {message}")]
    AccessDenied { bucket: String, message: String },

    /// Any other listing failure (network, throttling, server errors)
    ///
    /// `transient` is decided by the backend from the response status and
    /// error code, never from the rendered message.
    #[error("Listing bucket {bucket} at prefix '{prefix}' failed: {message}")]
    ListFailed {
        bucket: String,
        prefix: String,
        message: String,
        transient: bool,
    },
}

/// Errors raised by the notification channel.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The publish call was rejected or could not be delivered
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    /// The message could not be built (empty subject, bad encoding)
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

/// Error classification for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient error - retry with exponential backoff
    ///
    /// Examples: network timeout, S3 SlowDown, 5xx responses
    Transient,

    /// Permanent error - never retry
    ///
    /// Examples: bucket not found, access denied, invalid configuration
    Permanent,
}

/// Classifies an error to determine retry behavior.
pub fn classify_error(error: &BwError) -> ErrorCategory {
    match error {
        BwError::Storage(e) => classify_storage_error(e),
        BwError::Notify(e) => classify_notify_error(e),
        BwError::Config(_) => ErrorCategory::Permanent,
        BwError::Other(e) => classify_message(&e.to_string()),
    }
}

fn classify_storage_error(error: &StorageError) -> ErrorCategory {
    match error {
        StorageError::NoSuchBucket(_) => ErrorCategory::Permanent,
        StorageError::AccessDenied { .. } => ErrorCategory::Permanent,
        StorageError::ListFailed { transient: true, .. } => ErrorCategory::Transient,
        StorageError::ListFailed { transient: false, .. } => ErrorCategory::Permanent,
    }
}

fn classify_notify_error(error: &NotifyError) -> ErrorCategory {
    match error {
        NotifyError::PublishFailed(message) => classify_message(message),
        NotifyError::InvalidMessage(_) => ErrorCategory::Permanent,
    }
}

const TRANSIENT_MARKERS: &[&str] = &[
    "slowdown",
    "throttl",
    "timeout",
    "timed out",
    "service unavailable",
    "internalerror",
    "connection",
    "dispatch failure",
];

const PERMANENT_MARKERS: &[&str] = &[
    "nosuchbucket",
    "no such bucket",
    "accessdenied",
    "access denied",
    "invalidparameter",
    "notfound",
    "authorizationerror",
];

/// Classify a raw backend error message.
///
/// Transient markers (throttling, timeouts, 5xx and 429 status codes) are
/// checked first, then permanent ones (missing resources, permission
/// failures, other 4xx status codes). Status codes only match as whole
/// tokens, so request ids containing digits are ignored. Unknown messages are
/// treated as transient.
pub fn classify_message(message: &str) -> ErrorCategory {
    let lower = message.to_lowercase();
    let statuses: Vec<u16> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| token.len() == 3)
        .filter_map(|token| token.parse().ok())
        .filter(|status| (400..600).contains(status))
        .collect();

    if TRANSIENT_MARKERS.iter().any(|marker| lower.contains(marker))
        || statuses.iter().any(|&status| status == 429 || status >= 500)
    {
        return ErrorCategory::Transient;
    }

    if PERMANENT_MARKERS.iter().any(|marker| lower.contains(marker)) || !statuses.is_empty() {
        return ErrorCategory::Permanent;
    }

    ErrorCategory::Transient
}

/// Classify a backend response from its error code and HTTP status.
///
/// Throttling codes, 429 and 5xx are transient; any other error response
/// is permanent.
pub fn classify_response(code: Option<&str>, status: Option<u16>) -> ErrorCategory {
    const TRANSIENT_CODES: &[&str] = &[
        "SlowDown",
        "Throttling",
        "ThrottlingException",
        "RequestTimeout",
        "InternalError",
        "ServiceUnavailable",
    ];

    if code.is_some_and(|code| TRANSIENT_CODES.contains(&code))
        || status.is_some_and(|status| status == 429 || status >= 500)
    {
        ErrorCategory::Transient
    } else {
        ErrorCategory::Permanent
    }
}

/// Result type alias using BwError.
pub type Result<T> = std::result::Result<T, BwError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_classification() {
        let error = BwError::Storage(StorageError::NoSuchBucket("missing".to_string()));
        assert_eq!(classify_error(&error), ErrorCategory::Permanent);

        let error = BwError::Storage(StorageError::AccessDenied {
            bucket: "locked".to_string(),
            message: "AccessDenied".to_string(),
        });
        assert_eq!(classify_error(&error), ErrorCategory::Permanent);

        let error = BwError::Storage(StorageError::ListFailed {
            bucket: "busy".to_string(),
            prefix: String::new(),
            message: "SlowDown: reduce request rate".to_string(),
            transient: true,
        });
        assert_eq!(classify_error(&error), ErrorCategory::Transient);

        // The flag wins over whatever the rendered message contains
        let error = BwError::Storage(StorageError::ListFailed {
            bucket: "busy".to_string(),
            prefix: String::new(),
            message: "503 Service Unavailable (request id: 7A404B12C9)".to_string(),
            transient: true,
        });
        assert_eq!(classify_error(&error), ErrorCategory::Transient);

        let error = BwError::Storage(StorageError::ListFailed {
            bucket: "odd".to_string(),
            prefix: String::new(),
            message: "invalid continuation token".to_string(),
            transient: false,
        });
        assert_eq!(classify_error(&error), ErrorCategory::Permanent);
    }

    #[test]
    fn test_notify_error_classification() {
        let error = BwError::Notify(NotifyError::InvalidMessage("empty subject".to_string()));
        assert_eq!(classify_error(&error), ErrorCategory::Permanent);

        let error = BwError::Notify(NotifyError::PublishFailed(
            "AuthorizationError: not allowed to publish".to_string(),
        ));
        assert_eq!(classify_error(&error), ErrorCategory::Permanent);

        let error = BwError::Notify(NotifyError::PublishFailed("connection reset".to_string()));
        assert_eq!(classify_error(&error), ErrorCategory::Transient);
    }

    #[test]
    fn test_classify_message() {
        assert_eq!(
            classify_message("503 Service Unavailable"),
            ErrorCategory::Transient
        );
        assert_eq!(classify_message("request timeout"), ErrorCategory::Transient);
        assert_eq!(
            classify_message("NoSuchBucket: The specified bucket does not exist"),
            ErrorCategory::Permanent
        );
        assert_eq!(classify_message("403 Forbidden"), ErrorCategory::Permanent);
    }

    #[test]
    fn test_classify_message_ignores_digits_in_request_ids() {
        assert_eq!(
            classify_message("service error: 503 Service Unavailable (request id: 7A400B12C9)"),
            ErrorCategory::Transient
        );
        assert_eq!(
            classify_message("unhandled error (request id: 4035AB)"),
            ErrorCategory::Transient
        );
        assert_eq!(
            classify_message("status 404, request id: 503F00"),
            ErrorCategory::Permanent
        );
    }

    #[test]
    fn test_classify_message_checks_transient_first() {
        assert_eq!(
            classify_message("AccessDenied then throttled: SlowDown"),
            ErrorCategory::Transient
        );
        assert_eq!(classify_message("429 Too Many Requests"), ErrorCategory::Transient);
    }

    #[test]
    fn test_classify_response() {
        assert_eq!(classify_response(Some("SlowDown"), Some(503)), ErrorCategory::Transient);
        assert_eq!(classify_response(None, Some(500)), ErrorCategory::Transient);
        assert_eq!(classify_response(None, Some(429)), ErrorCategory::Transient);
        assert_eq!(classify_response(Some("RequestTimeout"), Some(400)), ErrorCategory::Transient);
        assert_eq!(classify_response(Some("NoSuchKey"), Some(404)), ErrorCategory::Permanent);
        assert_eq!(classify_response(None, Some(400)), ErrorCategory::Permanent);
        assert_eq!(classify_response(None, None), ErrorCategory::Permanent);
    }

    #[test]
    fn test_list_failed_display() {
        let error = StorageError::ListFailed {
            bucket: "media".to_string(),
            prefix: "a/".to_string(),
            message: "timeout".to_string(),
            transient: true,
        };
        assert_eq!(
            error.to_string(),
            "Listing bucket media at prefix 'a/' failed: timeout"
        );
    }

    #[test]
    fn test_error_display() {
        let error = BwError::Storage(StorageError::NoSuchBucket("ghost".to_string()));
        assert_eq!(error.to_string(), "Storage error: No such bucket: ghost");
    }
}

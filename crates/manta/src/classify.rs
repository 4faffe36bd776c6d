//! Gateway error classification
//!
//! Every gateway failure passes through here before it reaches a caller.
//! The store never says "directory not empty" in a structured way, so a
//! failed delete is read as that signal unless the failure clearly has
//! another cause. Gateways that can tell return
//! [`GatewayError::DirectoryNotEmpty`] and skip the guesswork.

use mb_core::{Error, GatewayError, GatewayResult};

/// Map a gateway failure on `path` into the domain taxonomy
pub fn classify(err: GatewayError, path: &str) -> Error {
    match err {
        GatewayError::Forbidden(msg) => Error::NotAuthorized(format!("{path}: {msg}")),
        GatewayError::NotFound(_) => Error::NotFound(path.to_string()),
        other => Error::TransportFailure(format!("{path}: {other}")),
    }
}

/// Whether a failed delete means the directory still has entries.
///
/// Heuristic: any I/O or HTTP status failure counts, except the statuses
/// that already name a different cause (403, 404). Signing failures never do.
pub fn is_directory_not_empty(err: &GatewayError) -> bool {
    match err {
        GatewayError::DirectoryNotEmpty(_) => true,
        GatewayError::Io(_) | GatewayError::Status { .. } => true,
        GatewayError::Forbidden(_) | GatewayError::NotFound(_) | GatewayError::Signing(_) => false,
    }
}

/// Interpret the result of the subscription probe.
///
/// Forbidden means the account is not subscribed; it is an answer, not a failure.
pub fn subscription_outcome<T>(result: GatewayResult<T>, path: &str) -> mb_core::Result<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(GatewayError::Forbidden(msg)) => {
            tracing::debug!(path, reason = %msg, "Subscription probe forbidden");
            Ok(false)
        }
        Err(err) => Err(classify(err, path)),
    }
}

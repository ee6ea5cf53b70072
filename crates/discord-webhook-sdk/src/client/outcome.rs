//! Tagged result of a single API operation.

use std::fmt;

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;

/// What a completed operation produced.
///
/// Transport faults are reported separately through [`ApiError`](crate::error::ApiError);
/// an `ApiOutcome` always means the client either got an HTTP response or
/// decided not to send a request at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome<T> {
    /// The service accepted the request.
    Success(T),

    /// The service answered with a non-success status code.
    Failure(u16),

    /// The operation could not be attempted; no request was sent.
    Precondition(Precondition),
}

/// Reason an operation was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// The operation targets the active webhook but none is set.
    NoActiveWebhook,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveWebhook => write!(
                f,
                "no active webhook; call set_active_webhook or create_webhook first"
            ),
        }
    }
}

impl ApiOutcome<u16> {
    /// Classify a raw status: any 2xx is a success carrying the status itself.
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            Self::Success(status)
        } else {
            Self::Failure(status)
        }
    }
}

impl<T> ApiOutcome<T> {
    /// Returns `true` for [`ApiOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Consume the outcome, keeping only a success payload.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the success payload, if any.
    pub fn as_success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Status code of a remote rejection, if that is what happened.
    pub fn failure_status(&self) -> Option<u16> {
        match self {
            Self::Failure(status) => Some(*status),
            _ => None,
        }
    }

    /// Map the success payload, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            Self::Success(value) => ApiOutcome::Success(f(value)),
            Self::Failure(status) => ApiOutcome::Failure(status),
            Self::Precondition(reason) => ApiOutcome::Precondition(reason),
        }
    }
}

//! Error types used by handlers during dispatch.
//!
//! This module defines [`HandlerError`], the failure a handler reports back
//! to the bus. The bus never propagates it to the publisher: a failed handler
//! is logged and dispatch continues with the next subscription in priority
//! order.

use thiserror::Error;

/// # Errors produced by handler invocations.
///
/// Returned by a handler to signal that processing an envelope failed.
/// Failures are isolated per handler: the bus logs them with the event type,
/// tag and priority of the failing subscription, and keeps dispatching.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler rejected the payload without processing it.
    #[error("payload rejected: {reason}")]
    Rejected {
        /// Why the payload was rejected.
        reason: String,
    },

    /// Handler started processing and failed.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl HandlerError {
    /// Creates a [`HandlerError::Rejected`] from any message.
    pub fn rejected(reason: impl Into<String>) -> Self {
        HandlerError::Rejected {
            reason: reason.into(),
        }
    }

    /// Creates a [`HandlerError::Fail`] from any message.
    pub fn fail(error: impl Into<String>) -> Self {
        HandlerError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use typebus::HandlerError;
    ///
    /// let err = HandlerError::fail("boom");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Rejected { .. } => "handler_rejected",
            HandlerError::Fail { .. } => "handler_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Rejected { reason } => format!("rejected: {reason}"),
            HandlerError::Fail { error } => format!("error: {error}"),
        }
    }
}

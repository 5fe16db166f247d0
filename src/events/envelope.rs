//! # Envelope wrapping a published payload.
//!
//! [`Envelope`] carries exactly one payload value through a single dispatch
//! pass, together with the cooperative cancellation flag handlers use to stop
//! further propagation of that publish call.
//!
//! ## Rules
//! - One envelope per `publish` call; it never outlives the dispatch loop.
//! - `cancel()` is monotonic: the flag goes false→true and is never reset.
//! - Cancellation is envelope-scoped: it stops the remaining handlers of the
//!   current publish call only. Other in-flight publishes and the registry
//!   are unaffected.
//!
//! ## Example
//! ```rust
//! use typebus::Envelope;
//!
//! let env = Envelope::new(42u32);
//! assert_eq!(*env.payload(), 42);
//! assert!(!env.is_cancelled());
//!
//! env.cancel();
//! assert!(env.is_cancelled());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Wrapper around a published payload with a cooperative cancellation flag.
///
/// Handlers receive `&Envelope<T>`; the bus checks [`Envelope::is_cancelled`]
/// before each handler invocation and stops dispatch once the flag is set.
pub struct Envelope<T> {
    payload: T,
    cancelled: AtomicBool,
}

impl<T> Envelope<T> {
    /// Wraps a payload in a fresh, non-cancelled envelope.
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            cancelled: AtomicBool::new(false),
        }
    }

    /// Returns the wrapped payload.
    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Requests that no further handlers run for this publish call.
    ///
    /// Takes effect before the *next* handler invocation; the current handler
    /// always runs to completion.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`Envelope::cancel`] has been called.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Consumes the envelope and returns the payload.
    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T: fmt::Debug> fmt::Debug for Envelope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("payload", &self.payload)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_not_cancelled() {
        let env = Envelope::new("payload");
        assert!(!env.is_cancelled());
        assert_eq!(*env.payload(), "payload");
    }

    #[test]
    fn test_cancel_is_monotonic() {
        let env = Envelope::new(1u8);
        env.cancel();
        assert!(env.is_cancelled());
        env.cancel();
        assert!(env.is_cancelled(), "second cancel must not reset the flag");
    }

    #[test]
    fn test_into_payload_returns_value() {
        let env = Envelope::new(vec![1, 2, 3]);
        assert_eq!(env.into_payload(), vec![1, 2, 3]);
    }
}

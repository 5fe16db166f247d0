//! # Subscription records and handler types.
//!
//! A [`Subscription`] is the immutable, type-erased record the registry keeps
//! per registered handler. It binds the handler to one payload type, a
//! dispatch priority, and a diagnostic tag.
//!
//! ## Identity
//! Handlers are deduplicated per event type by *reference identity*: the
//! data-pointer address of the caller's [`Handler`] `Arc`. Clones of the same
//! `Arc` are one handler; independently allocated closures are distinct, even
//! when their bodies are identical.
//!
//! ## Ordering
//! Every subscription takes a process-global insertion sequence number.
//! Registry lists are kept sorted by `(priority descending, sequence
//! ascending)`, so handlers with equal priority dispatch in subscribe order.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::error::HandlerError;
use crate::events::Envelope;

/// Global insertion sequence for subscription ordering.
static SUBSCRIPTION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Outcome of a single handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

/// Callback invoked with every envelope published for its payload type.
///
/// Handlers are shared via `Arc` so the bus can keep them alive after the
/// caller's scope ends, and so a duplicate registration of the same handler
/// for the same type can be detected by pointer identity.
pub type Handler<T> = Arc<dyn Fn(&Envelope<T>) -> HandlerResult + Send + Sync>;

/// Immutable record binding one handler to one payload type.
pub(crate) struct Subscription {
    type_id: TypeId,
    type_name: &'static str,
    priority: i32,
    tag: Arc<str>,
    seq: u64,
    handler_id: usize,
    invoke: Box<dyn Fn(&dyn Any) -> HandlerResult + Send + Sync>,
}

impl Subscription {
    /// Erases a typed handler into a registry-storable record.
    pub(crate) fn new<T: 'static>(priority: i32, tag: &str, handler: Handler<T>) -> Self {
        let handler_id = Arc::as_ptr(&handler) as *const () as usize;
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            priority,
            tag: Arc::from(tag),
            seq: SUBSCRIPTION_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            handler_id,
            invoke: Box::new(move |envelope: &dyn Any| {
                // The registry keys entries by `TypeId`, so dispatch can only
                // hand this closure envelopes of its own payload type.
                match envelope.downcast_ref::<Envelope<T>>() {
                    Some(envelope) => handler(envelope),
                    None => Ok(()),
                }
            }),
        }
    }

    /// Runs the handler against an envelope of the subscribed payload type.
    #[inline]
    pub(crate) fn invoke(&self, envelope: &dyn Any) -> HandlerResult {
        (self.invoke)(envelope)
    }

    /// `TypeId` of the payload type this subscription is keyed on.
    #[inline]
    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the payload type, for log lines.
    #[inline]
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Dispatch priority; higher runs earlier.
    #[inline]
    pub(crate) fn priority(&self) -> i32 {
        self.priority
    }

    /// Diagnostic tag supplied at subscribe time.
    #[inline]
    pub(crate) fn tag(&self) -> &str {
        &self.tag
    }

    /// Insertion sequence number; breaks priority ties in subscribe order.
    #[inline]
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    /// Reference identity of the handler `Arc` this subscription wraps.
    #[inline]
    pub(crate) fn handler_id(&self) -> usize {
        self.handler_id
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.type_name)
            .field("priority", &self.priority)
            .field("tag", &self.tag)
            .field("seq", &self.seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_of_one_arc_share_identity() {
        let handler: Handler<u32> = Arc::new(|_env: &Envelope<u32>| Ok(()));
        let a = Subscription::new::<u32>(0, "", handler.clone());
        let b = Subscription::new::<u32>(5, "other", handler);
        assert_eq!(a.handler_id(), b.handler_id());
    }

    #[test]
    fn test_distinct_arcs_have_distinct_identity() {
        let a = Subscription::new::<u32>(0, "", Arc::new(|_env: &Envelope<u32>| Ok(())));
        let b = Subscription::new::<u32>(0, "", Arc::new(|_env: &Envelope<u32>| Ok(())));
        assert_ne!(
            a.handler_id(),
            b.handler_id(),
            "separately allocated handlers must not collide"
        );
    }

    #[test]
    fn test_sequence_increases_per_subscription() {
        let first = Subscription::new::<u8>(0, "", Arc::new(|_env: &Envelope<u8>| Ok(())));
        let second = Subscription::new::<u8>(0, "", Arc::new(|_env: &Envelope<u8>| Ok(())));
        assert!(first.seq() < second.seq());
    }

    #[test]
    fn test_invoke_sees_typed_payload() {
        let seen = Arc::new(std::sync::atomic::AtomicU64::new(0));
        let sink = seen.clone();
        let sub = Subscription::new::<u64>(
            0,
            "probe",
            Arc::new(move |env: &Envelope<u64>| {
                sink.store(*env.payload(), AtomicOrdering::SeqCst);
                Ok(())
            }),
        );

        let envelope = Envelope::new(7u64);
        sub.invoke(&envelope).unwrap();
        assert_eq!(seen.load(AtomicOrdering::SeqCst), 7);
    }
}

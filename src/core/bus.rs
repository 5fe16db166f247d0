//! # The event bus: registration and synchronous dispatch.
//!
//! [`EventBus`] owns the mapping from payload type to its ordered list of
//! subscriptions, performs subscribe/unsubscribe mutations under per-type
//! exclusive access, and executes handlers in priority order with
//! cooperative cancellation.
//!
//! ## Dispatch flow
//! ```text
//! publish(payload)
//!     │  wrap in Envelope
//!     ▼
//! capture snapshot Arc for TypeId (map guard dropped immediately)
//!     │
//!     ▼
//! for subscription in snapshot:          (priority desc, stable)
//!     envelope.is_cancelled()? ──► stop, return count
//!     invoked += 1
//!     subscription.invoke(&envelope)
//!         ├─ Ok(())  ──► continue
//!         ├─ Err(e)  ──► log error, continue
//!         └─ panic   ──► caught, log error, continue
//! ```
//!
//! ## Rules
//! - **Exact-type matching**: the dispatch key is the payload's concrete
//!   `TypeId`; no supertype or trait-based matching exists.
//! - **Synchronous**: handlers run sequentially on the publishing thread.
//!   Nothing is queued, deferred, or moved to another execution context.
//! - **Fail-open**: a failing or panicking handler is logged and skipped;
//!   `publish` never raises and always returns the invoked count.
//! - **Relaxed visibility**: a publish in flight iterates the snapshot it
//!   captured at the start of the call. A mutation committing concurrently
//!   becomes visible to the *next* publish, never to the in-progress one.

use std::any::TypeId;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{error, warn};

use crate::core::registry::Registry;
use crate::events::Envelope;
use crate::subscribers::{Handle, Handler, Subscription};

/// Synchronous, type-keyed publish/subscribe bus.
///
/// Cloning is cheap and shares the underlying registry, so a bus can be
/// handed to any number of threads; `subscribe`, `unsubscribe`, and
/// `publish` may all be called concurrently.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use typebus::{Envelope, EventBus, Handler};
///
/// struct Tick(u64);
///
/// let bus = EventBus::new("clock");
/// let log: Handler<Tick> = Arc::new(|env: &Envelope<Tick>| {
///     println!("tick {}", env.payload().0);
///     Ok(())
/// });
///
/// let handle = bus.subscribe(log);
/// assert_eq!(bus.publish(Tick(1)), 1);
///
/// handle.unsubscribe();
/// assert_eq!(bus.publish(Tick(2)), 0);
/// ```
#[derive(Clone)]
pub struct EventBus {
    name: Arc<str>,
    registry: Arc<Registry>,
}

impl EventBus {
    /// Creates an empty bus. The name only shows up in log lines.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            registry: Arc::new(Registry::default()),
        }
    }

    /// Registers a handler for payloads of type `T` with priority `0` and an
    /// empty tag. See [`EventBus::subscribe_with`].
    pub fn subscribe<T: 'static>(&self, handler: Handler<T>) -> Handle {
        self.subscribe_with(0, "", handler)
    }

    /// Registers a handler for payloads of type `T`.
    ///
    /// Handlers run in `priority` order, higher first; handlers with equal
    /// priority run in subscribe order. `tag` is a free-text label used only
    /// in diagnostics.
    ///
    /// Registering a clone of an already-subscribed handler `Arc` for the
    /// same type is rejected: a warning is logged and the returned [`Handle`]
    /// unsubscribes nothing (reporting "no effect"). The same handler `Arc`
    /// may be registered for any number of *different* payload types.
    pub fn subscribe_with<T: 'static>(
        &self,
        priority: i32,
        tag: &str,
        handler: Handler<T>,
    ) -> Handle {
        let subscription = Arc::new(Subscription::new::<T>(priority, tag, handler));
        if !self.registry.insert(subscription.clone()) {
            warn!(
                bus = %self.name,
                event = subscription.type_name(),
                tag = %subscription.tag(),
                "duplicate handler for event type ignored"
            );
        }
        Handle::new(
            self.name.clone(),
            Arc::downgrade(&self.registry),
            subscription,
        )
    }

    /// Publishes a payload: wraps it in a fresh [`Envelope`] and dispatches.
    ///
    /// Returns the number of handlers invoked; see [`EventBus::dispatch`].
    pub fn publish<T: 'static>(&self, payload: T) -> usize {
        self.dispatch(&Envelope::new(payload))
    }

    /// Dispatches an envelope to every handler subscribed to `T`, in
    /// priority order, on the calling thread.
    ///
    /// Before each handler the envelope's cancellation flag is checked; once
    /// set, the remaining handlers are skipped. A handler that returns an
    /// error or panics is logged and does not stop dispatch.
    ///
    /// Returns the number of handlers actually entered before cancellation
    /// or snapshot exhaustion — failed handlers count, skipped ones do not.
    /// With no subscriptions for `T` this returns `0` with no side effects.
    pub fn dispatch<T: 'static>(&self, envelope: &Envelope<T>) -> usize {
        let Some(snapshot) = self.registry.snapshot(TypeId::of::<T>()) else {
            return 0;
        };

        let mut invoked = 0;
        for subscription in snapshot.iter() {
            if envelope.is_cancelled() {
                break;
            }
            invoked += 1;
            match panic::catch_unwind(AssertUnwindSafe(|| subscription.invoke(envelope))) {
                Ok(Ok(())) => {}
                Ok(Err(failure)) => {
                    error!(
                        bus = %self.name,
                        event = subscription.type_name(),
                        tag = %subscription.tag(),
                        priority = subscription.priority(),
                        error = %failure,
                        "handler failed during dispatch"
                    );
                }
                Err(panic_payload) => {
                    error!(
                        bus = %self.name,
                        event = subscription.type_name(),
                        tag = %subscription.tag(),
                        priority = subscription.priority(),
                        error = %panic_message(&*panic_payload),
                        "handler panicked during dispatch"
                    );
                }
            }
        }
        invoked
    }

    /// Number of handlers currently subscribed for payloads of type `T`.
    pub fn handler_count<T: 'static>(&self) -> usize {
        self.registry.handler_count(TypeId::of::<T>())
    }

    /// Number of payload types with at least one subscription.
    pub fn type_count(&self) -> usize {
        self.registry.type_count()
    }

    /// Returns `true` when no subscriptions exist on this bus.
    pub fn is_empty(&self) -> bool {
        self.registry.type_count() == 0
    }

    /// Name used to identify this bus in log lines.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for EventBus {
    /// An anonymous bus named `"bus"`.
    fn default() -> Self {
        Self::new("bus")
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("name", &self.name)
            .field("types", &self.registry.type_count())
            .finish()
    }
}

/// Extracts a printable message from a caught panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

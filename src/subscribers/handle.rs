//! # Removal handles.
//!
//! [`Handle`] is the capability returned from subscribe: its only operation
//! is [`Handle::unsubscribe`], which removes the exact subscription the
//! handle was created for.
//!
//! ## Rules
//! - Removal is by subscription instance identity, never by re-looking up
//!   handler equality.
//! - Unsubscribe is idempotent: the second call removes nothing, logs a
//!   warning, and returns `false`.
//! - A handle from a rejected duplicate subscribe behaves the same way: its
//!   subscription was never inserted, so unsubscribing reports "no effect".

use std::fmt;
use std::sync::{Arc, Weak};

use tracing::warn;

use crate::core::Registry;
use crate::subscribers::Subscription;

/// Caller-held capability to remove one subscription from its bus.
#[must_use = "dropping a Handle keeps the subscription registered; call unsubscribe() to remove it"]
pub struct Handle {
    bus: Arc<str>,
    registry: Weak<Registry>,
    subscription: Arc<Subscription>,
}

impl Handle {
    pub(crate) fn new(
        bus: Arc<str>,
        registry: Weak<Registry>,
        subscription: Arc<Subscription>,
    ) -> Self {
        Self {
            bus,
            registry,
            subscription,
        }
    }

    /// Removes the subscription this handle was created for.
    ///
    /// Returns `true` if the subscription was removed, `false` if there was
    /// nothing to remove: already unsubscribed, rejected as a duplicate at
    /// subscribe time, or the bus no longer exists. The `false` case is
    /// logged as a warning and is never an error.
    pub fn unsubscribe(&self) -> bool {
        let removed = self
            .registry
            .upgrade()
            .is_some_and(|registry| registry.remove(&self.subscription));
        if !removed {
            warn!(
                bus = %self.bus,
                event = self.subscription.type_name(),
                tag = %self.subscription.tag(),
                "unsubscribe had no effect"
            );
        }
        removed
    }

    /// Name of the payload type the subscription is keyed on.
    pub fn event_type(&self) -> &'static str {
        self.subscription.type_name()
    }

    /// Dispatch priority of the underlying subscription.
    pub fn priority(&self) -> i32 {
        self.subscription.priority()
    }

    /// Diagnostic tag of the underlying subscription.
    pub fn tag(&self) -> &str {
        self.subscription.tag()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("bus", &self.bus)
            .field("subscription", &self.subscription)
            .finish()
    }
}

//! # Subscriptions and removal handles.
//!
//! This module holds the registration side of the bus data model:
//! - [`Handler`], [`HandlerResult`] — the callback shape handlers implement;
//! - `Subscription` — the immutable, type-erased record kept per handler;
//! - [`Handle`] — the capability to remove exactly one subscription.
//!
//! Registration and removal go through `core::bus`; dispatch reads the
//! records through the per-type snapshots kept by `core::registry`.

mod handle;
mod subscription;

pub use handle::Handle;
pub use subscription::{Handler, HandlerResult};

pub(crate) use subscription::Subscription;

//! # typebus
//!
//! **Typebus** is a synchronous, type-keyed publish/subscribe event bus.
//!
//! Callers register handlers keyed by a concrete payload type and publish
//! payload instances; the bus dispatches each publish synchronously, on the
//! publishing thread, to every matching handler in priority order. It is
//! designed as an in-process building block: no queues, no worker threads,
//! no wire format.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  subscribe::<T>(handler) ──┐                  Handle ── unsubscribe()
//!                            ▼                                  │
//! ┌──────────────────────────────────────────────────────────┐  │
//! │  EventBus                                                │◄─┘
//! │  Registry: TypeId ──► entry                              │
//! │                        ├─ list      (mutable, prio desc) │
//! │                        └─ snapshot  (immutable Arc<[_]>) │
//! └───────────────┬──────────────────────────────────────────┘
//!                 │ publish(payload)
//!                 ▼
//!      wrap payload in Envelope, capture snapshot Arc
//!      (no lock held while iterating)
//!                 │
//!                 ▼
//!   for subscription in snapshot:
//!       envelope cancelled? ──► stop, return count
//!       subscription.invoke(&envelope)
//!           ├─ Ok        ──► continue
//!           ├─ Err       ──► log error, continue
//!           └─ panic     ──► caught, log error, continue
//! ```
//!
//! ### Guarantees
//! - **Exact-type matching**: dispatch is keyed by the payload's concrete
//!   `TypeId`; there is no supertype or trait-based matching.
//! - **Priority order, stable**: higher priority runs earlier; equal
//!   priorities run in subscribe order.
//! - **Synchronous**: handlers run sequentially on the publishing thread;
//!   nothing is queued or deferred.
//! - **Fail-open**: a failing or panicking handler is logged and skipped;
//!   dispatch continues and `publish` never raises.
//! - **Lock-free dispatch reads**: each publish iterates an immutable
//!   snapshot captured at the start of the call, so concurrent subscribe or
//!   unsubscribe never corrupts or blocks an in-flight iteration. A mutation
//!   that commits mid-publish becomes visible to the next publish.
//!
//! ## Features
//! | Area            | Description                                        | Key types / functions           |
//! |-----------------|----------------------------------------------------|---------------------------------|
//! | **Bus**         | Subscribe, publish, introspect.                    | [`EventBus`]                    |
//! | **Handlers**    | Closure handlers with priorities and tags.         | [`Handler`], [`HandlerResult`]  |
//! | **Envelopes**   | Per-publish payload wrapper with cancellation.     | [`Envelope`]                    |
//! | **Removal**     | Capability-style, idempotent unsubscribe.          | [`Handle`]                      |
//! | **Errors**      | Typed handler failures, logged not propagated.     | [`HandlerError`]                |
//! | **Default bus** | Process-wide `"main"` instance.                    | [`main_bus`]                    |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use typebus::{Envelope, EventBus, Handler};
//!
//! struct Deploy {
//!     service: &'static str,
//! }
//!
//! let bus = EventBus::new("docs");
//!
//! let audit: Handler<Deploy> = Arc::new(|env: &Envelope<Deploy>| {
//!     println!("deploying {}", env.payload().service);
//!     Ok(())
//! });
//! let handle = bus.subscribe_with(10, "audit", audit);
//!
//! assert_eq!(bus.publish(Deploy { service: "api" }), 1);
//!
//! handle.unsubscribe();
//! assert_eq!(bus.publish(Deploy { service: "api" }), 0);
//! ```

mod core;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use core::{EventBus, main_bus};
pub use error::HandlerError;
pub use events::Envelope;
pub use subscribers::{Handle, Handler, HandlerResult};

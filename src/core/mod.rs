//! Bus core: registry and dispatch.
//!
//! This module contains the engine of the crate. The public API from here is
//! [`EventBus`] and [`main_bus`]; the registry is internal.
//!
//! Internal modules:
//! - [`registry`]: per-type subscription lists and copy-on-write snapshots;
//! - [`bus`]: the subscribe/unsubscribe/publish surface and dispatch loop;
//! - [`global`]: the process-wide `"main"` bus.

mod bus;
mod global;
mod registry;

pub use bus::EventBus;
pub use global::main_bus;

pub(crate) use registry::Registry;

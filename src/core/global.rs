//! Process-wide default bus.
//!
//! A single bus named `"main"` that exists for the lifetime of the process
//! and starts empty. It is an ordinary [`EventBus`]: nothing routes through
//! it implicitly, and code that wants isolation (tests in particular) should
//! construct its own instance instead.

use std::sync::OnceLock;

use crate::core::EventBus;

static MAIN: OnceLock<EventBus> = OnceLock::new();

/// Returns the process-wide default bus, named `"main"`.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use typebus::{main_bus, Envelope, Handler};
///
/// struct Ping;
///
/// let handler: Handler<Ping> = Arc::new(|_env: &Envelope<Ping>| Ok(()));
/// let handle = main_bus().subscribe(handler);
///
/// assert_eq!(main_bus().publish(Ping), 1);
/// handle.unsubscribe();
/// ```
pub fn main_bus() -> &'static EventBus {
    MAIN.get_or_init(|| EventBus::new("main"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Envelope;
    use crate::subscribers::Handler;
    use std::sync::Arc;

    // Payload type private to this test so parallel tests cannot interfere.
    struct GlobalProbe;

    #[test]
    fn test_main_bus_is_one_named_instance() {
        assert!(std::ptr::eq(main_bus(), main_bus()));
        assert_eq!(main_bus().name(), "main");
    }

    #[test]
    fn test_main_bus_behaves_like_any_bus() {
        let handler: Handler<GlobalProbe> = Arc::new(|_env: &Envelope<GlobalProbe>| Ok(()));
        let handle = main_bus().subscribe(handler);

        assert_eq!(main_bus().publish(GlobalProbe), 1);
        assert!(handle.unsubscribe());
        assert_eq!(main_bus().publish(GlobalProbe), 0);
    }
}

//! Priority ordering, cooperative cancellation, and failure isolation.
//!
//! Three handlers watch the same payload type:
//! - `guard` (priority 100) cancels the envelope for unhealthy samples,
//! - `alert` (priority 50) fails on slow samples,
//! - `archive` (priority 0) records whatever still reaches it.
//!
//! Run with: `cargo run --example priorities`

use std::sync::Arc;

use typebus::{Envelope, EventBus, Handler, HandlerError};

#[derive(Debug)]
struct HealthSample {
    latency_ms: u32,
}

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let bus = EventBus::new("health");

    let guard: Handler<HealthSample> = Arc::new(|env: &Envelope<HealthSample>| {
        if env.payload().latency_ms > 500 {
            println!("[guard] circuit open, dropping sample");
            env.cancel();
        }
        Ok(())
    });
    let alert: Handler<HealthSample> = Arc::new(|env: &Envelope<HealthSample>| {
        if env.payload().latency_ms > 200 {
            return Err(HandlerError::fail("pager endpoint unreachable"));
        }
        println!("[alert] latency ok");
        Ok(())
    });
    let archive: Handler<HealthSample> = Arc::new(|env: &Envelope<HealthSample>| {
        println!("[archive] stored sample {:?}", env.payload());
        Ok(())
    });

    let _guard = bus.subscribe_with(100, "guard", guard);
    let _alert = bus.subscribe_with(50, "alert", alert);
    let _archive = bus.subscribe_with(0, "archive", archive);

    for latency_ms in [50, 300, 900] {
        let delivered = bus.publish(HealthSample { latency_ms });
        println!("sample {latency_ms}ms reached {delivered} handlers\n");
    }
}

//! Basic subscribe/publish/unsubscribe round trip.
//!
//! Run with: `cargo run --example basic`

use std::sync::Arc;

use typebus::{Envelope, EventBus, Handler};

#[derive(Debug)]
struct OrderPlaced {
    order_id: u64,
    amount_cents: u64,
}

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let bus = EventBus::new("shop");

    let ledger: Handler<OrderPlaced> = Arc::new(|env: &Envelope<OrderPlaced>| {
        let order = env.payload();
        println!(
            "[ledger] recording order {} ({} cents)",
            order.order_id, order.amount_cents
        );
        Ok(())
    });
    let mail: Handler<OrderPlaced> = Arc::new(|env: &Envelope<OrderPlaced>| {
        println!("[mail] confirmation for order {}", env.payload().order_id);
        Ok(())
    });

    let ledger_handle = bus.subscribe_with(10, "ledger", ledger);
    let _mail_handle = bus.subscribe_with(0, "mail", mail);

    let delivered = bus.publish(OrderPlaced {
        order_id: 1,
        amount_cents: 4200,
    });
    println!("order 1 delivered to {delivered} handlers");

    ledger_handle.unsubscribe();

    let delivered = bus.publish(OrderPlaced {
        order_id: 2,
        amount_cents: 100,
    });
    println!("order 2 delivered to {delivered} handlers");
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use the_switchboard::config::{init_tracing, ConfigDelta, ConfigStore, UpdateOutcome};
use the_switchboard::events::{EventEmitter, EventRelay, EventSpec, ERROR_EVENT, UPDATE_EVENT};
use the_switchboard::traits::{Adaptor, Driver, Emitter, Payload};

/// Adaptor for a simulated serial board; the connector stands in for the port.
struct SerialAdaptor {
    relay: EventRelay,
    connector: Option<Arc<EventEmitter>>,
}

impl Adaptor for SerialAdaptor {
    fn relay(&self) -> &EventRelay {
        &self.relay
    }

    fn connector(&self) -> Option<Arc<dyn Emitter>> {
        self.connector.clone().map(|c| c as Arc<dyn Emitter>)
    }
}

/// Driver for a single LED, connected through the adaptor.
struct LedDriver {
    relay: EventRelay,
    connection: Option<Arc<dyn Emitter>>,
}

impl Driver for LedDriver {
    fn relay(&self) -> &EventRelay {
        &self.relay
    }

    fn connection(&self) -> Option<Arc<dyn Emitter>> {
        self.connection.clone()
    }
}

fn render_args(args: &[Payload]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 2 {
        eprintln!("Usage: {} [config.yaml|config.json|config.toml]", args[0]);
        eprintln!("Example: {} configs/demo.yaml", args[0]);
        std::process::exit(1);
    }

    let store = Arc::new(match args.get(1) {
        Some(path) => ConfigStore::from_path(path)?,
        None => ConfigStore::new(),
    });

    if let Err(e) = init_tracing(&store.logging_settings()?) {
        eprintln!("⚠️  Continuing without tracing output: {}", e);
    }

    println!("🔌 Switchboard Relay Demo");
    println!("═════════════════════════");
    println!("Config: {}", args.get(1).map(String::as_str).unwrap_or("<defaults>"));
    println!("Test mode: {}", store.test_mode());
    println!();

    let mut changes = store.watch();
    store.subscribe(Arc::new(|delta: &ConfigDelta| {
        let keys: Vec<&str> = delta.keys().map(String::as_str).collect();
        println!("  🛎️  subscriber saw: {}", keys.join(", "));
        Ok(())
    }));

    // Wiring: serial port -> adaptor -> LED driver
    let port = Arc::new(EventEmitter::new("serial-port"));
    let adaptor = SerialAdaptor {
        relay: EventRelay::new(Arc::new(EventEmitter::new("serial-adaptor"))),
        connector: Some(port.clone()),
    };
    let _data = adaptor.define_adaptor_event("data".into())?;
    let _close = adaptor.define_adaptor_event(
        EventSpec::new("close").rename("disconnect").send_update(true),
    )?;

    let led = LedDriver {
        relay: EventRelay::new(Arc::new(EventEmitter::new("led"))),
        connection: Some(adaptor.relay().emitter().clone()),
    };
    let brightness = led.define_driver_event(
        EventSpec::new("data").rename("brightness").send_update(true),
    )?;

    led.relay().emitter().on(
        "brightness",
        Arc::new(|args: &[Payload]| println!("  💡 brightness({})", render_args(args))),
    );
    led.relay().emitter().on(
        UPDATE_EVENT,
        Arc::new(|args: &[Payload]| println!("  🔁 update({})", render_args(args))),
    );
    adaptor.relay().emitter().on(
        "disconnect",
        Arc::new(|args: &[Payload]| println!("  🔌 disconnect({})", render_args(args))),
    );
    adaptor.relay().emitter().on(
        ERROR_EVENT,
        Arc::new(|args: &[Payload]| println!("  ❌ error({})", render_args(args))),
    );

    println!("📡 Relaying port data to the LED:");
    for level in [0, 128, 255] {
        port.emit("data", &[json!(level)]);
    }

    println!("\n📨 Completion reporting:");
    let on_written = |err: Option<&Payload>, data: &[Payload]| match err {
        Some(err) => println!("  ↩️  callback: failed with {}", err),
        None => println!("  ↩️  callback: ok ({})", render_args(data)),
    };
    adaptor
        .relay()
        .respond("written", Some(&on_written), None, &[json!("0x01")]);
    adaptor
        .relay()
        .respond("written", Some(&on_written), Some(&json!("EIO")), &[]);

    println!("\n✂️  Cancelling the LED relay:");
    brightness.cancel();
    port.emit("data", &[json!(64)]);
    println!("  (no brightness event expected)");
    port.emit("close", &[json!("port closed")]);

    println!("\n⚙️  Updating config:");
    let mut delta = ConfigDelta::new();
    delta.insert("testMode".to_string(), json!(true));
    delta.insert("update".to_string(), json!("ignored"));
    match store.update(delta)? {
        UpdateOutcome::Applied { keys, notified } => {
            println!("  applied {:?}, {} subscribers notified", keys, notified)
        }
        UpdateOutcome::Ignored => println!("  nothing to apply"),
    }

    match tokio::time::timeout(Duration::from_millis(100), changes.recv()).await {
        Ok(Ok(change)) => println!("  📬 watcher received {} keys", change.len()),
        Ok(Err(e)) => println!("  📭 watcher closed: {}", e),
        Err(_) => println!("  📭 watcher received nothing"),
    }

    println!("\nTest mode: {}", store.test_mode());
    println!("Subscribers removed at shutdown: {}", store.shutdown());

    Ok(())
}

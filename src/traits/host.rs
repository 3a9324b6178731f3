use std::sync::Arc;

use crate::errors::RelayError;
use crate::events::{EventRelay, EventSpec, RelayHandle};
use crate::observability::messages::{relay::MissingRelaySource, StructuredLog};
use crate::traits::Emitter;

/// A component talking to a class of hardware device through a connector.
///
/// Implementors hold an [`EventRelay`] for their own events and expose the
/// connector once it is attached; `define_adaptor_event` comes for free.
pub trait Adaptor {
    fn relay(&self) -> &EventRelay;

    /// The object doing the actual hardware communication, if attached.
    fn connector(&self) -> Option<Arc<dyn Emitter>>;

    /// Relay an event from the connector onto this adaptor.
    ///
    /// Fails with [`RelayError::MissingConnector`] when no connector is attached.
    fn define_adaptor_event(&self, spec: EventSpec) -> Result<RelayHandle, RelayError> {
        let Some(source) = self.connector() else {
            MissingRelaySource {
                role: "connector",
                event_name: &spec.event_name,
            }
            .log();
            return Err(RelayError::MissingConnector {
                event_name: spec.event_name,
            });
        };
        Ok(self.relay().proxy(source, spec))
    }
}

/// A component representing a single device on top of an adaptor's connection.
pub trait Driver {
    fn relay(&self) -> &EventRelay;

    /// The connection this driver talks through, if attached.
    fn connection(&self) -> Option<Arc<dyn Emitter>>;

    /// Relay an event from the connection onto this driver.
    ///
    /// Fails with [`RelayError::MissingConnection`] when no connection is attached.
    fn define_driver_event(&self, spec: EventSpec) -> Result<RelayHandle, RelayError> {
        let Some(source) = self.connection() else {
            MissingRelaySource {
                role: "connection",
                event_name: &spec.event_name,
            }
            .log();
            return Err(RelayError::MissingConnection {
                event_name: spec.event_name,
            });
        };
        Ok(self.relay().proxy(source, spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventEmitter, UPDATE_EVENT};
    use crate::traits::Payload;
    use serde_json::json;
    use std::sync::Mutex;

    struct TestAdaptor {
        relay: EventRelay,
        connector: Option<Arc<EventEmitter>>,
    }

    impl Adaptor for TestAdaptor {
        fn relay(&self) -> &EventRelay {
            &self.relay
        }

        fn connector(&self) -> Option<Arc<dyn Emitter>> {
            self.connector.clone().map(|c| c as Arc<dyn Emitter>)
        }
    }

    struct TestDriver {
        relay: EventRelay,
        connection: Option<Arc<dyn Emitter>>,
    }

    impl Driver for TestDriver {
        fn relay(&self) -> &EventRelay {
            &self.relay
        }

        fn connection(&self) -> Option<Arc<dyn Emitter>> {
            self.connection.clone()
        }
    }

    fn record(emitter: &Arc<dyn Emitter>, event: &str) -> Arc<Mutex<Vec<Vec<Payload>>>> {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        emitter.on(
            event,
            Arc::new(move |args: &[Payload]| sink.lock().unwrap().push(args.to_vec())),
        );
        calls
    }

    #[test]
    fn test_adaptor_event_from_plain_name() {
        let connector = Arc::new(EventEmitter::new("connector"));
        let adaptor = TestAdaptor {
            relay: EventRelay::new(Arc::new(EventEmitter::new("adaptor"))),
            connector: Some(connector.clone()),
        };
        let seen = record(adaptor.relay().emitter(), "data");

        let handle = adaptor.define_adaptor_event("data".into()).unwrap();
        connector.emit("data", &[json!("ping")]);

        assert_eq!(*seen.lock().unwrap(), vec![vec![json!("ping")]]);
        assert_eq!(handle.source().listener_count("data"), 1);
    }

    #[test]
    fn test_adaptor_event_with_full_spec() {
        let connector = Arc::new(EventEmitter::new("connector"));
        let adaptor = TestAdaptor {
            relay: EventRelay::new(Arc::new(EventEmitter::new("adaptor"))),
            connector: Some(connector.clone()),
        };
        let updates = record(adaptor.relay().emitter(), UPDATE_EVENT);

        let _handle = adaptor
            .define_adaptor_event(EventSpec::new("raw").rename("analog").send_update(true))
            .unwrap();
        connector.emit("raw", &[json!(512)]);

        assert_eq!(*updates.lock().unwrap(), vec![vec![json!("analog"), json!(512)]]);
    }

    #[test]
    fn test_adaptor_without_connector_fails() {
        let adaptor = TestAdaptor {
            relay: EventRelay::new(Arc::new(EventEmitter::new("adaptor"))),
            connector: None,
        };

        let err = adaptor.define_adaptor_event("data".into()).unwrap_err();
        assert_eq!(
            err,
            RelayError::MissingConnector {
                event_name: "data".to_string()
            }
        );
        assert_eq!(err.role(), "connector");
    }

    #[test]
    fn test_hosts_usable_as_trait_objects() {
        let connector = Arc::new(EventEmitter::new("connector"));
        let adaptor: Box<dyn Adaptor> = Box::new(TestAdaptor {
            relay: EventRelay::new(Arc::new(EventEmitter::new("adaptor"))),
            connector: Some(connector.clone()),
        });
        let driver: Box<dyn Driver> = Box::new(TestDriver {
            relay: EventRelay::new(Arc::new(EventEmitter::new("driver"))),
            connection: Some(adaptor.relay().emitter().clone()),
        });
        let seen = record(driver.relay().emitter(), "level");

        let _adaptor_handle = adaptor.define_adaptor_event("data".into()).unwrap();
        let _driver_handle = driver
            .define_driver_event(EventSpec::new("data").rename("level"))
            .unwrap();
        connector.emit("data", &[json!(9)]);

        assert_eq!(*seen.lock().unwrap(), vec![vec![json!(9)]]);
    }

    #[test]
    fn test_driver_event_and_cancel() {
        let connection: Arc<dyn Emitter> = Arc::new(EventEmitter::new("connection"));
        let driver = TestDriver {
            relay: EventRelay::new(Arc::new(EventEmitter::new("driver"))),
            connection: Some(connection.clone()),
        };
        let seen = record(driver.relay().emitter(), "pressed");

        let handle = driver
            .define_driver_event(EventSpec::new("push").rename("pressed"))
            .unwrap();
        connection.emit("push", &[]);
        assert!(handle.cancel());
        connection.emit("push", &[]);

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_driver_without_connection_fails() {
        let driver = TestDriver {
            relay: EventRelay::new(Arc::new(EventEmitter::new("driver"))),
            connection: None,
        };

        let err = driver.define_driver_event("push".into()).unwrap_err();
        assert!(matches!(err, RelayError::MissingConnection { .. }));
        assert!(err.to_string().contains("no connection"));
    }
}

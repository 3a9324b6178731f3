pub mod emitter;
pub mod host;

pub use emitter::{Emitter, Listener, ListenerId, Payload};
pub use host::{Adaptor, Driver};

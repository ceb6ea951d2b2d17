//! Notification delivery adapters.
//!
//! Real push delivery is out of scope for this service; the tracing emitter
//! writes each notification as a structured log event that downstream log
//! shippers can route to a delivery channel.

mod tracing_emitter;

pub use tracing_emitter::TracingNotificationEmitter;

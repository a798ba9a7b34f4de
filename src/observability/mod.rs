//! Observability for specbind
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Begin/complete scopes
//!
//! Observability is read-only: it never changes the outcome of a run.
//!
//! ```ignore
//! use specbind::observability::{log_event_with_fields, Event, ObservationScope};
//!
//! log_event_with_fields(Event::BindingSkipped, &[("definition", "Pet")]);
//!
//! let scope = ObservationScope::new("BIND");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{enabled, Logger, Severity};
pub use scope::ObservationScope;

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::BindingSkipped, &[("definition", "Missing")]);
    }
}

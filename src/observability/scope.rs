//! Begin/complete logging around one unit of work
//!
//! - `{name}_BEGIN` on creation
//! - `{name}_COMPLETE` with `elapsed_ms` on `complete()`
//! - `{name}_FAILED` with the reason on `fail()`
//! - `{name}_INCOMPLETE` if dropped without either

use std::time::Instant;

use super::logger::Logger;

/// A scope that logs start and outcome of a unit of work
///
/// ```ignore
/// let scope = ObservationScope::with_fields("RESOLVE", &[("definitions", "12")]);
/// match resolve() {
///     Ok(_) => scope.complete(),
///     Err(e) => scope.fail(&e.to_string()),
/// }
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    started: Instant,
    finished: bool,
    fields: Vec<(&'a str, String)>,
}

impl<'a> ObservationScope<'a> {
    /// Create a new scope. Logs `{name}_BEGIN`.
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a new scope whose fields are repeated on every line it logs
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);

        Self {
            name,
            started: Instant::now(),
            finished: false,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        }
    }

    /// Milliseconds since the scope began
    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    /// Mark the scope as completed. Logs `{name}_COMPLETE` at INFO.
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as completed with additional fields
    pub fn complete_with_fields(mut self, extra_fields: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.elapsed_ms().to_string();

        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.extend(extra_fields.iter().copied());
        all_fields.push(("elapsed_ms", &elapsed));

        Logger::info(&format!("{}_COMPLETE", self.name), &all_fields);
    }

    /// Mark the scope as failed. Logs `{name}_FAILED` at ERROR.
    pub fn fail(mut self, reason: &str) {
        self.finished = true;

        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.push(("reason", reason));

        Logger::error(&format!("{}_FAILED", self.name), &all_fields);
    }

    /// Check if the scope has completed or failed
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.finished {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_starts_unfinished() {
        let scope = ObservationScope::new("TEST");
        assert!(!scope.is_finished());
        scope.complete();
    }

    #[test]
    fn test_scope_with_fields() {
        let scope = ObservationScope::with_fields("TEST", &[("definitions", "3")]);
        scope.complete_with_fields(&[("resolved", "2")]);
    }

    #[test]
    fn test_scope_fail() {
        let scope = ObservationScope::new("TEST");
        scope.fail("Missing schema definition for `Owner`");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("TEST");
        drop(scope);
    }

    #[test]
    fn test_elapsed_grows() {
        let scope = ObservationScope::new("TEST");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(scope.elapsed_ms() >= 5);
        scope.complete();
    }
}

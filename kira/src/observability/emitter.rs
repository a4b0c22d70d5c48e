//! Validation event emitters.

use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, Level};

use crate::contract::Rejection;

/// Summary of one `Form::validate` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    /// Overall result.
    pub valid: bool,
    /// Number of leaf fields in the contract.
    pub fields: usize,
    /// Number of rejections recorded.
    pub rejections: usize,
    /// Whether a CSRF token was checked.
    pub csrf_checked: bool,
    /// Wall time in milliseconds.
    pub duration_ms: f64,
}

impl ValidationSummary {
    /// Flattens the summary into string attributes for log pipelines.
    #[must_use]
    pub fn to_attributes(&self) -> HashMap<String, String> {
        HashMap::from([
            ("validation.valid".to_string(), self.valid.to_string()),
            ("validation.fields".to_string(), self.fields.to_string()),
            ("validation.rejections".to_string(), self.rejections.to_string()),
            ("validation.csrf_checked".to_string(), self.csrf_checked.to_string()),
            ("validation.duration_ms".to_string(), self.duration_ms.to_string()),
        ])
    }
}

/// Simple timing helper.
#[derive(Debug)]
pub struct ValidationTimer {
    start: Instant,
}

impl ValidationTimer {
    /// Starts timing.
    #[must_use]
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Receives validation events from a form.
pub trait ValidationEmitter: Send + Sync {
    /// Called once per rejected field or list element.
    fn on_field_rejected(&self, rejection: &Rejection);

    /// Called at the end of every validation run.
    fn on_form_validated(&self, summary: &ValidationSummary);
}

/// Discards every event.
///
/// Used as the default when no emitter is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpValidationEmitter;

impl ValidationEmitter for NoOpValidationEmitter {
    fn on_field_rejected(&self, _rejection: &Rejection) {}
    fn on_form_validated(&self, _summary: &ValidationSummary) {}
}

/// Logs events through `tracing`.
#[derive(Debug, Clone)]
pub struct LoggingValidationEmitter {
    level: Level,
}

impl Default for LoggingValidationEmitter {
    fn default() -> Self {
        Self { level: Level::DEBUG }
    }
}

impl LoggingValidationEmitter {
    /// Creates an emitter logging at `level` (`INFO` or `DEBUG`).
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates an info-level emitter.
    #[must_use]
    pub fn info() -> Self {
        Self::new(Level::INFO)
    }
}

impl ValidationEmitter for LoggingValidationEmitter {
    fn on_field_rejected(&self, rejection: &Rejection) {
        if self.level == Level::INFO {
            info!(field = %rejection.path, validator = %rejection.validator, message = %rejection.message, "field rejected");
        } else {
            debug!(field = %rejection.path, validator = %rejection.validator, message = %rejection.message, "field rejected");
        }
    }

    fn on_form_validated(&self, summary: &ValidationSummary) {
        if self.level == Level::INFO {
            info!(
                valid = summary.valid,
                fields = summary.fields,
                rejections = summary.rejections,
                duration_ms = summary.duration_ms,
                "form validated"
            );
        } else {
            debug!(
                valid = summary.valid,
                fields = summary.fields,
                rejections = summary.rejections,
                duration_ms = summary.duration_ms,
                "form validated"
            );
        }
    }
}

/// An event seen by a [`CollectingValidationEmitter`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationEvent {
    /// See [`ValidationEmitter::on_field_rejected`].
    FieldRejected(Rejection),
    /// See [`ValidationEmitter::on_form_validated`].
    FormValidated(ValidationSummary),
}

/// Keeps every event in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingValidationEmitter {
    events: parking_lot::RwLock<Vec<ValidationEvent>>,
}

impl CollectingValidationEmitter {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    #[must_use]
    pub fn events(&self) -> Vec<ValidationEvent> {
        self.events.read().clone()
    }

    /// Rejections only.
    #[must_use]
    pub fn rejections(&self) -> Vec<Rejection> {
        self.events
            .read()
            .iter()
            .filter_map(|event| match event {
                ValidationEvent::FieldRejected(rejection) => Some(rejection.clone()),
                ValidationEvent::FormValidated(_) => None,
            })
            .collect()
    }

    /// The most recent summary.
    #[must_use]
    pub fn last_summary(&self) -> Option<ValidationSummary> {
        self.events.read().iter().rev().find_map(|event| match event {
            ValidationEvent::FormValidated(summary) => Some(summary.clone()),
            ValidationEvent::FieldRejected(_) => None,
        })
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Drops every event.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl ValidationEmitter for CollectingValidationEmitter {
    fn on_field_rejected(&self, rejection: &Rejection) {
        self.events.write().push(ValidationEvent::FieldRejected(rejection.clone()));
    }

    fn on_form_validated(&self, summary: &ValidationSummary) {
        self.events.write().push(ValidationEvent::FormValidated(summary.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::FieldPath;

    fn rejection() -> Rejection {
        Rejection {
            path: FieldPath::root().key("tags").index(1),
            validator: "length".into(),
            message: "too long".into(),
        }
    }

    fn summary(valid: bool) -> ValidationSummary {
        ValidationSummary {
            valid,
            fields: 3,
            rejections: usize::from(!valid),
            csrf_checked: false,
            duration_ms: 0.5,
        }
    }

    #[test]
    fn test_noop_and_logging_emitters() {
        for emitter in [
            Box::new(NoOpValidationEmitter) as Box<dyn ValidationEmitter>,
            Box::new(LoggingValidationEmitter::default()),
            Box::new(LoggingValidationEmitter::info()),
        ] {
            emitter.on_field_rejected(&rejection());
            emitter.on_form_validated(&summary(false));
        }
    }

    #[test]
    fn test_collecting_emitter() {
        let emitter = CollectingValidationEmitter::new();
        assert!(emitter.is_empty());
        emitter.on_field_rejected(&rejection());
        emitter.on_form_validated(&summary(false));
        emitter.on_form_validated(&summary(true));

        assert_eq!(emitter.len(), 3);
        assert_eq!(emitter.rejections(), vec![rejection()]);
        assert_eq!(emitter.last_summary(), Some(summary(true)));

        emitter.clear();
        assert!(emitter.is_empty());
        assert_eq!(emitter.last_summary(), None);
    }

    #[test]
    fn test_summary_attributes() {
        let attrs = summary(false).to_attributes();
        assert_eq!(attrs.get("validation.valid"), Some(&"false".to_string()));
        assert_eq!(attrs.get("validation.rejections"), Some(&"1".to_string()));
        assert_eq!(attrs.get("validation.duration_ms"), Some(&"0.5".to_string()));
    }

    #[test]
    fn test_timer() {
        let timer = ValidationTimer::start();
        assert!(timer.elapsed_ms() >= 0.0);
    }
}

//! Test assertions for validated forms.

use serde_json::Value;

use crate::form::Form;
use crate::utils::{flatten_messages, has_messages};

/// Asserts that the last validation passed.
pub fn assert_form_valid(form: &Form) {
    assert_eq!(
        form.is_valid(),
        Some(true),
        "Expected a valid form, errors: {}",
        form.errors()
    );
}

/// Asserts that the last validation failed.
pub fn assert_form_invalid(form: &Form) {
    assert_eq!(
        form.is_valid(),
        Some(false),
        "Expected an invalid form, values: {}",
        form.values()
    );
}

/// Asserts that some message at `path` contains `fragment`.
pub fn assert_field_error(form: &Form, path: &str, fragment: &str) {
    let messages = form.errors_at(path).map(flatten_messages).unwrap_or_default();
    assert!(
        messages.iter().any(|m| m.contains(fragment)),
        "Expected an error containing '{fragment}' at '{path}', got {messages:?}"
    );
}

/// Asserts that no message is recorded at `path`.
pub fn assert_field_clean(form: &Form, path: &str) {
    let errors = form.errors_at(path);
    assert!(
        !errors.is_some_and(has_messages),
        "Expected no errors at '{path}', got {errors:?}"
    );
}

/// Asserts the validated value at `path`.
pub fn assert_field_value(form: &Form, path: &str, expected: &Value) {
    let actual = form.value_at(path);
    assert_eq!(
        actual,
        Some(expected),
        "Expected value {expected} at '{path}', got {actual:?}"
    );
}

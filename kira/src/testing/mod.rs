//! Testing utilities for contracts and forms.
//!
//! This module provides:
//! - Sample contracts and a form builder
//! - Assertions over validated forms
//! - Recording translator and external check doubles

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_field_clean, assert_field_error, assert_field_value, assert_form_invalid,
    assert_form_valid,
};
pub use fixtures::{signup_contract, signup_input, FormFixture};
pub use mocks::{RecordingExternal, RecordingTranslator};

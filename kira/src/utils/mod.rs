//! Supporting helpers for the validation engine.
//!
//! This module provides:
//! - Field paths into nested trees
//! - Tree merging and emptiness rules
//! - Scalar type casts, format filters and date parsing
//! - String cleanup for the normalizer

mod arrays;
pub mod dates;
pub mod filters;
mod paths;
pub mod strings;
pub mod typecast;

pub use arrays::{flatten_messages, has_messages, is_collection, is_loosely_empty, merge, MergeMode};
pub use dates::DateFormat;
pub use filters::FilterSpec;
pub use paths::{FieldPath, PathSegment};
pub use typecast::CastType;

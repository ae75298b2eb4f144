//! Riffle Core - Record and value types for the riffle dataset pipeline.
//!
//! This crate provides the foundational types for riffle:
//!
//! - `Value`: Scalar values (Null, Boolean, Int64, Float64, String, DateTime)
//!   with total ordering, hashing, and the best-effort arithmetic the
//!   pipeline's aggregators rely on
//! - `Record`: One row of structured data, an insertion-ordered mapping from
//!   field name to scalar value
//!
//! # Example
//!
//! ```rust
//! use riffle_core::{Record, Value};
//!
//! let record = Record::from_pairs([("id", Value::Int64(1)), ("name", "Alice".into())]);
//!
//! assert_eq!(record.field("id"), &Value::Int64(1));
//! // Absent fields read as Null
//! assert_eq!(record.field("age"), &Value::Null);
//! ```

#![no_std]

extern crate alloc;

mod record;
mod value;

pub use record::Record;
pub use value::Value;

//! Riffle Flow - Lazy filter/aggregate/sort pipeline over riffle datasets.
//!
//! This crate provides the pipeline nodes and their traversal protocol:
//!
//! - `dataset`: The `Dataset` trait (lazy traversal + scalar aggregators +
//!   composition) and `Frame`, the primary in-memory dataset
//! - `predicate`: Record predicates for filtering
//! - `select`: The streaming filter node
//! - `memo`: The materializing cache node and its `Collector` seam
//! - `aggregate`: Group-by summarization built on the cache
//! - `sort`: Stable multi-key ordering built on the cache
//!
//! A chain is built by composition calls that each return a new node owning
//! the previous one; traversal pulls records through the chain lazily, up to
//! the first materializing node.
//!
//! # Example
//!
//! ```rust
//! use riffle_core::{Record, Value};
//! use riffle_flow::{Dataset, Frame};
//!
//! let frame = Frame::from_records([
//!     Record::from_pairs([("fruit", "apple"), ("grade", "a")]),
//!     Record::from_pairs([("fruit", "pear"), ("grade", "b")]),
//!     Record::from_pairs([("fruit", "apple"), ("grade", "b")]),
//! ]);
//!
//! let apples = frame.with_rows("fruit", "apple").aggregate(&["fruit"], None);
//! assert_eq!(apples.first().unwrap().field("_count"), &Value::Int64(2));
//! ```

#![no_std]

extern crate alloc;

pub mod aggregate;
pub mod dataset;
pub mod memo;
pub mod predicate;
pub mod select;
pub mod sort;

pub use aggregate::{Aggregate, GroupBy, GroupKey};
pub use dataset::{Dataset, Frame, Records};
pub use memo::{Cache, Collector, Memo, Passthrough};
pub use predicate::{EvalType, FieldPredicate, Predicate};
pub use select::Select;
pub use sort::{Sort, SortBy};

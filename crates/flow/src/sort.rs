//! Multi-key sort node.

use crate::dataset::Records;
use crate::memo::{Collector, Memo};
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use riffle_core::Record;

/// A node that materializes its upstream and serves it totally ordered.
pub type Sort<S> = Memo<S, SortBy>;

/// Collector that sorts the materialized rows by a list of key fields.
///
/// Records compare key by key in the given order; the first key where they
/// differ decides. The sort is stable, so tied records keep their original
/// relative order, and an empty key list leaves the sequence as-is. With
/// `reverse` set, every key comparison is inverted.
#[derive(Clone, Debug)]
pub struct SortBy {
    keys: Vec<String>,
    reverse: bool,
}

impl SortBy {
    /// Creates a sorting collector over the given key fields.
    pub fn new(keys: &[&str], reverse: bool) -> Self {
        Self {
            keys: keys.iter().map(|&key| String::from(key)).collect(),
            reverse,
        }
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for key in &self.keys {
            let cmp = a.field(key).cmp(b.field(key));
            if cmp != Ordering::Equal {
                return if self.reverse { cmp.reverse() } else { cmp };
            }
        }
        Ordering::Equal
    }
}

impl Collector for SortBy {
    fn collect(&self, upstream: Records<'_>) -> Vec<Rc<Record>> {
        let mut rows: Vec<Rc<Record>> = upstream.collect();
        rows.sort_by(|a, b| self.compare(a, b));
        rows
    }
}

//! Dataset trait and the primary frame.
//!
//! A `Dataset` produces a lazy sequence of records. Derived nodes (filter,
//! cache, aggregate, sort) wrap exactly one upstream dataset each and expose
//! the same traversal contract, so chains compose freely. Traversal is what
//! pulls data through a chain: nothing is evaluated until a consumer asks for
//! records.

use crate::aggregate::{Aggregate, GroupBy};
use crate::memo::{Cache, Memo, Passthrough};
use crate::predicate::{FieldPredicate, Predicate};
use crate::select::Select;
use crate::sort::{Sort, SortBy};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashSet;
use riffle_core::{Record, Value};

/// A fresh pull iterator over a dataset's records.
///
/// Every call to [`Dataset::scan`] yields a new one; a traversal ends when the
/// iterator is exhausted or dropped.
pub type Records<'a> = Box<dyn Iterator<Item = Rc<Record>> + 'a>;

/// A producer of a lazy sequence of records.
///
/// The scalar aggregators (`sum`, `min`, `average`, ...) each perform exactly
/// one full traversal and return `Value::Null` when no usable values are
/// seen; arithmetic over non-numeric fields propagates NaN instead of
/// failing. The composition methods consume `self` and return a new node
/// that exclusively owns its upstream.
pub trait Dataset {
    /// Returns a fresh iterator over the records of this dataset.
    ///
    /// Each call is an independent traversal. For a primary dataset the
    /// iterator reflects the backing sequence at iteration time; for a
    /// materializing node the first call drains the upstream exactly once.
    fn scan(&self) -> Records<'_>;

    //
    // Value aggregators
    //

    /// Sum of the field's values over all records, seeded from null.
    ///
    /// Returns `Null` for an empty dataset. Null values coerce to the
    /// additive identity, so an all-null column sums to `Int64(0)`; any
    /// non-integer value switches the accumulation to `Float64`, and a
    /// string poisons it with NaN (see [`Value::add`]).
    fn sum(&self, field: &str) -> Value {
        let mut result: Option<Value> = None;
        for record in self.scan() {
            let acc = result.take().unwrap_or(Value::Null);
            result = Some(acc.add(record.field(field)));
        }
        result.unwrap_or(Value::Null)
    }

    /// Minimum non-null value of the field, or `Null` if none.
    fn min(&self, field: &str) -> Value {
        let mut result = Value::Null;
        for record in self.scan() {
            let value = record.field(field);
            if !value.is_null() && (result.is_null() || *value < result) {
                result = value.clone();
            }
        }
        result
    }

    /// Maximum non-null value of the field, or `Null` if none.
    fn max(&self, field: &str) -> Value {
        let mut result = Value::Null;
        for record in self.scan() {
            let value = record.field(field);
            if !value.is_null() && (result.is_null() || *value > result) {
                result = value.clone();
            }
        }
        result
    }

    /// Incremental accumulation of the field's non-null values, or `Null`
    /// if none.
    ///
    /// The k-th non-null value updates the accumulator as
    /// `avg <- avg + value/k`. This is not the arithmetic mean in general:
    /// for the column [10, 20, 30] it yields 30, not 20. NaN from a
    /// non-numeric value propagates through the remaining updates.
    fn average(&self, field: &str) -> Value {
        let mut avg: Option<f64> = None;
        let mut count: usize = 0;
        for record in self.scan() {
            let value = record.field(field);
            if !value.is_null() {
                count += 1;
                avg = Some(avg.unwrap_or(0.0) + value.as_number() / count as f64);
            }
        }
        match avg {
            Some(mean) => Value::Float64(mean),
            None => Value::Null,
        }
    }

    /// Distinct values of the field, in order of first occurrence.
    fn values(&self, field: &str) -> Vec<Value> {
        let mut seen: HashSet<Value> = HashSet::new();
        let mut out = Vec::new();
        for record in self.scan() {
            let value = record.field(field);
            if seen.insert(value.clone()) {
                out.push(value.clone());
            }
        }
        out
    }

    /// Tests whether any record's field loosely equals the given value.
    fn contains(&self, field: &str, value: &Value) -> bool {
        self.scan()
            .any(|record| record.field(field).loose_eq(value))
    }

    //
    // Record accessors
    //

    /// Gets a record by position.
    ///
    /// `-1` means the last record. Any other out-of-range position returns
    /// `None`. Positive positions pull only as far as needed.
    fn get(&self, n: isize) -> Option<Rc<Record>> {
        let mut last = None;
        for (i, record) in self.scan().enumerate() {
            if n == i as isize {
                return Some(record);
            }
            last = Some(record);
        }
        if n == -1 {
            last
        } else {
            None
        }
    }

    /// Returns the first record, if any.
    fn first(&self) -> Option<Rc<Record>> {
        self.get(0)
    }

    /// Returns the last record, if any.
    fn last(&self) -> Option<Rc<Record>> {
        self.get(-1)
    }

    /// Number of records, via a full traversal.
    ///
    /// Not cached: every call re-counts unless this node is itself
    /// materializing.
    fn length(&self) -> usize {
        self.scan().count()
    }

    /// Drains the dataset into a concrete sequence of records.
    fn records(&self) -> Vec<Rc<Record>> {
        self.scan().collect()
    }

    //
    // Composition
    //

    /// Wraps this dataset in a streaming filter.
    fn filter<P>(self, predicate: P) -> Select<Self, P>
    where
        Self: Sized,
        P: Predicate,
    {
        Select::new(self, predicate)
    }

    /// Keeps only records whose field loosely equals the value.
    fn with_rows(
        self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Select<Self, FieldPredicate>
    where
        Self: Sized,
    {
        Select::new(self, FieldPredicate::eq(field, value))
    }

    /// Keeps only records whose field does not loosely equal the value.
    fn without_rows(
        self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Select<Self, FieldPredicate>
    where
        Self: Sized,
    {
        Select::new(self, FieldPredicate::ne(field, value))
    }

    /// Groups records by the key fields and summarizes each group.
    ///
    /// Output records carry the key fields plus `_count` and, when a
    /// dependent field is given, `_avg`/`_min`/`_max` of that field, in
    /// first-insertion group order.
    fn aggregate(self, keys: &[&str], dependent: Option<&str>) -> Aggregate<Self>
    where
        Self: Sized,
    {
        Memo::new(self, GroupBy::new(keys, dependent))
    }

    /// Materializes the upstream and serves a stable, totally ordered
    /// sequence. `reverse` inverts the comparison of every key.
    fn sort(self, keys: &[&str], reverse: bool) -> Sort<Self>
    where
        Self: Sized,
    {
        Memo::new(self, SortBy::new(keys, reverse))
    }

    /// Takes a static snapshot of the chain at this point.
    fn cache(self) -> Cache<Self>
    where
        Self: Sized,
    {
        Memo::new(self, Passthrough)
    }
}

/// A primary dataset wrapping a concrete in-memory sequence.
///
/// This is the entry point of every chain: the data-acquisition layer decodes
/// records (for example from a paginated JSON API), pushes them into a frame,
/// and wires the frame into filters and aggregates.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    rows: Vec<Rc<Record>>,
}

impl Frame {
    /// Creates an empty frame.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Creates a frame from owned records.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            rows: records.into_iter().map(Rc::new).collect(),
        }
    }

    /// Creates a frame from shared records.
    pub fn from_rows(rows: Vec<Rc<Record>>) -> Self {
        Self { rows }
    }

    /// Appends a record.
    pub fn push(&mut self, record: Record) {
        self.rows.push(Rc::new(record));
    }

    /// Returns the number of records without traversing.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the frame holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Dataset for Frame {
    fn scan(&self) -> Records<'_> {
        Box::new(self.rows.iter().cloned())
    }
}

impl FromIterator<Record> for Frame {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

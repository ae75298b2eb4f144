//! Group-aggregate node.
//!
//! Groups records by a tuple of key fields and computes per-group statistics
//! in a single upstream pass: a count, and optionally the running
//! average/min/max of one dependent field.

use crate::dataset::Records;
use crate::memo::{Collector, Memo};
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use riffle_core::{Record, Value};

/// A node that summarizes its upstream into one record per distinct group.
pub type Aggregate<S> = Memo<S, GroupBy>;

/// Group identity: the ordered tuple of key-field values for a record.
///
/// Structural and order-sensitive, so the same key list over equal values
/// always produces the same identity; used directly as a map key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey(Vec<Value>);

impl GroupKey {
    fn for_record(keys: &[String], record: &Record) -> Self {
        Self(keys.iter().map(|key| record.field(key).clone()).collect())
    }
}

/// Per-group running statistics.
struct Accumulator {
    count: usize,
    stats: Option<DependentStats>,
}

struct DependentStats {
    avg: Value,
    min: Value,
    max: Value,
}

impl Accumulator {
    /// Starts a group from its first record's dependent value, if any.
    ///
    /// The raw value seeds all three statistics, so a singleton group echoes
    /// it unchanged (including its type).
    fn seed(dependent: Option<&Value>) -> Self {
        Self {
            count: 1,
            stats: dependent.map(|value| DependentStats {
                avg: value.clone(),
                min: value.clone(),
                max: value.clone(),
            }),
        }
    }

    /// Merges another record into the group.
    ///
    /// The average is re-derived incrementally: with k records merged so far,
    /// `avg <- (avg*k + v) / (k+1)`. Non-numeric dependent values turn it
    /// into NaN, which then propagates through every later update. A null
    /// dependent still counts toward the average (as zero) but never
    /// displaces min or max.
    fn merge(&mut self, dependent: Option<&Value>) {
        if let (Some(stats), Some(value)) = (self.stats.as_mut(), dependent) {
            let k = self.count as f64;
            stats.avg = Value::Float64((stats.avg.as_number() * k + value.as_number()) / (k + 1.0));
            if !value.is_null() {
                if stats.min.is_null() || *value < stats.min {
                    stats.min = value.clone();
                }
                if stats.max.is_null() || *value > stats.max {
                    stats.max = value.clone();
                }
            }
        }
        self.count += 1;
    }

    /// Emits the group's summary record: decoded key fields first, then the
    /// statistics.
    fn into_record(self, keys: &[String], group: GroupKey) -> Record {
        let mut record = Record::new();
        for (name, value) in keys.iter().zip(group.0) {
            record.set(name.clone(), value);
        }
        record.set("_count", self.count as i64);
        if let Some(stats) = self.stats {
            record.set("_avg", stats.avg);
            record.set("_min", stats.min);
            record.set("_max", stats.max);
        }
        record
    }
}

/// Collector that groups records by key fields.
#[derive(Clone, Debug)]
pub struct GroupBy {
    keys: Vec<String>,
    dependent: Option<String>,
}

impl GroupBy {
    /// Creates a grouping collector over the given key fields.
    pub fn new(keys: &[&str], dependent: Option<&str>) -> Self {
        Self {
            keys: keys.iter().map(|&key| String::from(key)).collect(),
            dependent: dependent.map(String::from),
        }
    }
}

impl Collector for GroupBy {
    fn collect(&self, upstream: Records<'_>) -> Vec<Rc<Record>> {
        // Map from group identity to its slot; slots keep insertion order,
        // which fixes the output order.
        let mut slots: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<(GroupKey, Accumulator)> = Vec::new();

        for record in upstream {
            let dependent = self
                .dependent
                .as_deref()
                .map(|field| record.field(field));
            let key = GroupKey::for_record(&self.keys, &record);
            match slots.get(&key) {
                Some(&slot) => groups[slot].1.merge(dependent),
                None => {
                    slots.insert(key.clone(), groups.len());
                    groups.push((key, Accumulator::seed(dependent)));
                }
            }
        }

        groups
            .into_iter()
            .map(|(key, accumulator)| Rc::new(accumulator.into_record(&self.keys, key)))
            .collect()
    }
}

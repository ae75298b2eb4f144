//! Record structure for riffle datasets.
//!
//! This module defines the `Record` struct which represents a single row of
//! structured data: an insertion-ordered mapping from field name to scalar
//! value. Field sets need not be uniform across the records of a dataset.

use crate::value::Value;
use alloc::string::String;
use alloc::vec::Vec;

/// One row of structured data: a field-name to scalar-value mapping.
///
/// Fields keep insertion order, which matters for derived records (aggregate
/// output lists the grouping keys before the summary fields). Lookup by name
/// is a linear scan; records are expected to stay small.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Creates a record from name/value pairs.
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        let mut record = Self::new();
        for (name, value) in pairs {
            record.set(name, value);
        }
        record
    }

    /// Sets a field, replacing any existing value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        for slot in &mut self.fields {
            if slot.0 == name {
                slot.1 = value;
                return;
            }
        }
        self.fields.push((name, value));
    }

    /// Gets a field value by name, or None if the field is absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Gets a field value by name; an absent field reads as `Null`.
    ///
    /// This is the lookup the pipeline uses everywhere: records with
    /// non-uniform field sets participate in arithmetic, comparison, and
    /// grouping as if the missing fields were null.
    pub fn field(&self, name: &str) -> &Value {
        self.get(name).unwrap_or(&Value::Null)
    }

    /// Returns true if the record has a field with the given name.
    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over the fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

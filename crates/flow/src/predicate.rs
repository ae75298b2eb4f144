//! Predicate definitions for dataset filtering.

use alloc::string::String;
use riffle_core::{Record, Value};

/// Evaluation type for field predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvalType {
    Eq,
    Ne,
}

/// A predicate that can be evaluated against records.
pub trait Predicate {
    /// Evaluates the predicate against a record.
    fn eval(&self, record: &Record) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&Record) -> bool,
{
    fn eval(&self, record: &Record) -> bool {
        self(record)
    }
}

/// A field predicate compares a named field to a literal value.
///
/// Comparison uses loose equality, so `with_rows("n", 2i64)` also matches
/// records where `n` is `Float64(2.0)`.
#[derive(Clone, Debug)]
pub struct FieldPredicate {
    pub field: String,
    pub eval_type: EvalType,
    pub value: Value,
}

impl FieldPredicate {
    pub fn new(field: impl Into<String>, eval_type: EvalType, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            eval_type,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, EvalType::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, EvalType::Ne, value)
    }
}

impl Predicate for FieldPredicate {
    fn eval(&self, record: &Record) -> bool {
        let matches = record.field(&self.field).loose_eq(&self.value);
        match self.eval_type {
            EvalType::Eq => matches,
            EvalType::Ne => !matches,
        }
    }
}

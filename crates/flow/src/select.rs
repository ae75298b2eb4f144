//! Streaming filter node.

use crate::dataset::{Dataset, Records};
use crate::predicate::Predicate;
use alloc::boxed::Box;

/// A streaming filter: yields only upstream records that pass the predicate.
///
/// Never materializes. Every traversal re-runs the predicate against a fresh
/// upstream iterator, and pulls only as many upstream records as the consumer
/// asks for, so `first()` through a filter does not drain the chain.
pub struct Select<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> Select<S, P> {
    /// Creates a new filter node owning its upstream.
    pub fn new(source: S, predicate: P) -> Self {
        Self { source, predicate }
    }
}

impl<S: Dataset, P: Predicate> Dataset for Select<S, P> {
    fn scan(&self) -> Records<'_> {
        let predicate = &self.predicate;
        Box::new(
            self.source
                .scan()
                .filter(move |record| predicate.eval(record)),
        )
    }
}

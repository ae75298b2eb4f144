//! Materializing cache node.
//!
//! `Memo` forces a single full evaluation of an upstream chain and serves a
//! stable, reusable sequence afterward. It is the common base for every
//! operator that must see the whole dataset before producing output: the
//! plain cache drains the upstream unchanged, while aggregation and sorting
//! plug in their own [`Collector`].

use crate::dataset::{Dataset, Records};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell};
use riffle_core::Record;

/// Turns one full upstream traversal into a materialized sequence.
pub trait Collector {
    /// Drains the upstream iterator once and produces the rows to serve.
    fn collect(&self, upstream: Records<'_>) -> Vec<Rc<Record>>;
}

/// The default collector: materializes the upstream unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Collector for Passthrough {
    fn collect(&self, upstream: Records<'_>) -> Vec<Rc<Record>> {
        upstream.collect()
    }
}

/// One-shot materialization state.
///
/// Terminal once `Materialized`; there is no transition back. `Collecting`
/// is the gate that catches a reentrant first traversal.
enum MemoState<S> {
    Unmaterialized(S),
    Collecting,
    Materialized(Vec<Rc<Record>>),
}

/// A materializing node: caches the collector's output on first traversal.
///
/// The first `scan` takes the upstream out of the state cell, runs the
/// collector over one full upstream traversal, stores the result, and drops
/// the upstream. Every later `scan` iterates the stored rows, so re-traversal
/// yields the identical sequence every time and the upstream is pulled
/// exactly once over the node's lifetime.
pub struct Memo<S, C> {
    state: RefCell<MemoState<S>>,
    collector: C,
}

/// A generic materializing wrapper with no transform.
pub type Cache<S> = Memo<S, Passthrough>;

impl<S, C> Memo<S, C> {
    /// Creates an unmaterialized node owning its upstream.
    pub fn new(source: S, collector: C) -> Self {
        Self {
            state: RefCell::new(MemoState::Unmaterialized(source)),
            collector,
        }
    }

    /// Returns true once the first traversal has completed.
    pub fn is_materialized(&self) -> bool {
        matches!(&*self.state.borrow(), MemoState::Materialized(_))
    }
}

impl<S: Dataset, C: Collector> Memo<S, C> {
    fn materialize(&self) {
        if self.is_materialized() {
            return;
        }
        match self.state.replace(MemoState::Collecting) {
            MemoState::Unmaterialized(source) => {
                let rows = self.collector.collect(source.scan());
                // source is dropped here: the upstream reference is released
                *self.state.borrow_mut() = MemoState::Materialized(rows);
            }
            MemoState::Collecting => {
                panic!("cache node traversed reentrantly while materializing")
            }
            MemoState::Materialized(rows) => {
                *self.state.borrow_mut() = MemoState::Materialized(rows);
            }
        }
    }
}

impl<S: Dataset, C: Collector> Dataset for Memo<S, C> {
    fn scan(&self) -> Records<'_> {
        self.materialize();
        Box::new(MemoIter {
            state: self.state.borrow(),
            index: 0,
        })
    }
}

/// Iterates the materialized rows while holding a shared borrow of the state.
struct MemoIter<'a, S> {
    state: Ref<'a, MemoState<S>>,
    index: usize,
}

impl<S> Iterator for MemoIter<'_, S> {
    type Item = Rc<Record>;

    fn next(&mut self) -> Option<Rc<Record>> {
        let MemoState::Materialized(rows) = &*self.state else {
            return None;
        };
        let item = rows.get(self.index).cloned();
        if item.is_some() {
            self.index += 1;
        }
        item
    }
}

//! Integration tests for pipeline chains.
//!
//! These exercise whole chains end to end: base frame, streaming filters,
//! caching, grouping, and sorting, including the laziness and
//! exactly-once-materialization guarantees.

use riffle_core::{Record, Value};
use riffle_flow::{Dataset, Frame, Records};
use std::cell::Cell;
use std::rc::Rc;

/// Helper to create sales rows.
fn create_sales_rows() -> Vec<Record> {
    let rows = [
        ("east", "nut", 10i64),
        ("west", "bolt", 25i64),
        ("east", "bolt", 5i64),
        ("east", "nut", 30i64),
        ("west", "nut", 15i64),
        ("east", "washer", 40i64),
    ];
    rows.iter()
        .map(|&(region, item, amount)| {
            Record::from_pairs([
                ("region", Value::from(region)),
                ("item", Value::from(item)),
                ("amount", Value::from(amount)),
            ])
        })
        .collect()
}

/// A dataset wrapper that counts traversals and record pulls of its source.
struct Instrumented {
    frame: Frame,
    scans: Rc<Cell<usize>>,
    pulls: Rc<Cell<usize>>,
}

impl Instrumented {
    fn new(records: Vec<Record>) -> (Self, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let scans = Rc::new(Cell::new(0));
        let pulls = Rc::new(Cell::new(0));
        (
            Self {
                frame: Frame::from_records(records),
                scans: scans.clone(),
                pulls: pulls.clone(),
            },
            scans,
            pulls,
        )
    }
}

impl Dataset for Instrumented {
    fn scan(&self) -> Records<'_> {
        self.scans.set(self.scans.get() + 1);
        let pulls = self.pulls.clone();
        Box::new(self.frame.scan().inspect(move |_| {
            pulls.set(pulls.get() + 1);
        }))
    }
}

// =============================================================================
// Filter chains
// =============================================================================

#[test]
fn test_filter_chain_counts_and_order() {
    let east = Frame::from_records(create_sales_rows()).with_rows("region", "east");
    assert_eq!(east.length(), 4);

    let items: Vec<Value> = east.scan().map(|r| r.field("item").clone()).collect();
    assert_eq!(
        items,
        vec![
            Value::String("nut".into()),
            Value::String("bolt".into()),
            Value::String("nut".into()),
            Value::String("washer".into()),
        ]
    );
}

#[test]
fn test_filter_is_lazy() {
    let (source, scans, pulls) = Instrumented::new(create_sales_rows());
    let west = source.with_rows("region", "west");

    // Fetching the first match pulls only up to that record
    let first = west.first().unwrap();
    assert_eq!(first.field("item"), &Value::String("bolt".into()));
    assert_eq!(scans.get(), 1);
    assert_eq!(pulls.get(), 2);
}

#[test]
fn test_filter_re_traverses_uncached_source() {
    let (source, scans, _) = Instrumented::new(create_sales_rows());
    let east = source.with_rows("region", "east");

    // Filters never materialize: every aggregator call is a fresh traversal
    assert_eq!(east.length(), 4);
    assert_eq!(east.sum("amount"), Value::Int64(85));
    assert_eq!(scans.get(), 2);
}

#[test]
fn test_closure_filter_over_amounts() {
    let big = Frame::from_records(create_sales_rows())
        .filter(|r: &Record| r.field("amount").as_number() >= 25.0);
    assert_eq!(big.length(), 3);
    assert_eq!(big.min("amount"), Value::Int64(25));
}

// =============================================================================
// Cache behavior
// =============================================================================

#[test]
fn test_cache_pulls_upstream_exactly_once() {
    let (source, scans, pulls) = Instrumented::new(create_sales_rows());
    let cached = source.with_rows("region", "east").cache();

    assert_eq!(cached.length(), 4);
    assert_eq!(cached.sum("amount"), Value::Int64(85));
    assert_eq!(cached.values("item").len(), 3);

    // One traversal, six pulls, no matter how many downstream reads
    assert_eq!(scans.get(), 1);
    assert_eq!(pulls.get(), 6);
}

#[test]
fn test_cache_retraversals_identical() {
    let cached = Frame::from_records(create_sales_rows()).cache();
    let first: Vec<Rc<Record>> = cached.records();
    let second: Vec<Rc<Record>> = cached.records();
    assert_eq!(first, second);
    for (a, b) in first.iter().zip(&second) {
        assert!(Rc::ptr_eq(a, b));
    }
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn test_aggregate_worked_example() {
    // rows [{a:1,b:10},{a:2,b:20},{a:1,b:30}], aggregate(['a'], 'b')
    let frame = Frame::from_records(vec![
        Record::from_pairs([("a", Value::Int64(1)), ("b", Value::Int64(10))]),
        Record::from_pairs([("a", Value::Int64(2)), ("b", Value::Int64(20))]),
        Record::from_pairs([("a", Value::Int64(1)), ("b", Value::Int64(30))]),
    ]);
    let agg = frame.aggregate(&["a"], Some("b"));
    assert_eq!(agg.length(), 2);

    let g1 = agg.get(0).unwrap();
    assert_eq!(g1.field("a"), &Value::Int64(1));
    assert_eq!(g1.field("_count"), &Value::Int64(2));
    assert_eq!(g1.field("_avg"), &Value::Float64(20.0));
    assert_eq!(g1.field("_min"), &Value::Int64(10));
    assert_eq!(g1.field("_max"), &Value::Int64(30));

    let g2 = agg.get(1).unwrap();
    assert_eq!(g2.field("a"), &Value::Int64(2));
    assert_eq!(g2.field("_count"), &Value::Int64(1));
    assert_eq!(g2.field("_avg"), &Value::Int64(20));
    assert_eq!(g2.field("_min"), &Value::Int64(20));
    assert_eq!(g2.field("_max"), &Value::Int64(20));
}

#[test]
fn test_aggregate_counts_sum_to_input_size() {
    let frame = Frame::from_records(create_sales_rows());
    let agg = frame.aggregate(&["region", "item"], None);
    assert_eq!(agg.length(), 5);
    assert_eq!(agg.sum("_count"), Value::Int64(6));
}

#[test]
fn test_aggregate_over_filtered_chain() {
    let agg = Frame::from_records(create_sales_rows())
        .without_rows("item", "washer")
        .aggregate(&["region"], Some("amount"));

    let east = agg.first().unwrap();
    assert_eq!(east.field("region"), &Value::String("east".into()));
    assert_eq!(east.field("_count"), &Value::Int64(3));
    assert_eq!(east.field("_avg"), &Value::Float64(15.0));
    assert_eq!(east.field("_min"), &Value::Int64(5));
    assert_eq!(east.field("_max"), &Value::Int64(30));
}

#[test]
fn test_aggregate_output_is_queryable() {
    // Aggregate output records behave like any other dataset rows
    let agg = Frame::from_records(create_sales_rows()).aggregate(&["item"], Some("amount"));
    assert!(agg.contains("item", &Value::String("washer".into())));
    assert_eq!(agg.max("_max"), Value::Int64(40));
    assert_eq!(agg.values("item").len(), 3);
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn test_sort_multi_key_over_chain() {
    let sorted = Frame::from_records(create_sales_rows()).sort(&["region", "amount"], false);
    let amounts: Vec<i64> = sorted
        .scan()
        .map(|r| r.field("amount").as_i64().unwrap())
        .collect();
    assert_eq!(amounts, vec![5, 10, 30, 40, 15, 25]);
}

#[test]
fn test_sort_reverse_over_chain() {
    let sorted = Frame::from_records(create_sales_rows()).sort(&["amount"], true);
    let amounts: Vec<i64> = sorted
        .scan()
        .map(|r| r.field("amount").as_i64().unwrap())
        .collect();
    assert_eq!(amounts, vec![40, 30, 25, 15, 10, 5]);
}

#[test]
fn test_sort_then_aggregate_pipeline() {
    // Sort first so groups appear in key order instead of first-insertion order
    let agg = Frame::from_records(create_sales_rows())
        .sort(&["item"], false)
        .aggregate(&["item"], None);
    let items: Vec<Value> = agg.scan().map(|r| r.field("item").clone()).collect();
    assert_eq!(
        items,
        vec![
            Value::String("bolt".into()),
            Value::String("nut".into()),
            Value::String("washer".into()),
        ]
    );
}

// =============================================================================
// Whole-chain scenarios
// =============================================================================

#[test]
fn test_report_style_chain() {
    // The presentation layer's usage pattern: one cached snapshot feeding
    // several scalar reads
    let snapshot = Frame::from_records(create_sales_rows())
        .with_rows("region", "east")
        .cache();

    assert_eq!(snapshot.length(), 4);
    // 10/1 + 5/2 + 30/3 + 40/4
    assert_eq!(snapshot.average("amount"), Value::Float64(32.5));
    assert_eq!(
        snapshot.values("item"),
        vec![
            Value::String("nut".into()),
            Value::String("bolt".into()),
            Value::String("washer".into()),
        ]
    );
    assert_eq!(snapshot.last().unwrap().field("amount"), &Value::Int64(40));
}

#[test]
fn test_empty_dataset_edge_cases() {
    let empty = Frame::new();
    assert_eq!(empty.sum("x"), Value::Null);
    assert_eq!(empty.min("x"), Value::Null);
    assert_eq!(empty.max("x"), Value::Null);
    assert_eq!(empty.average("x"), Value::Null);
    assert_eq!(empty.values("x"), Vec::<Value>::new());
    assert!(empty.get(-1).is_none());
    assert!(empty.first().is_none());
    assert_eq!(empty.length(), 0);

    let empty_agg = Frame::new().aggregate(&["x"], Some("y"));
    assert_eq!(empty_agg.length(), 0);
    let empty_sorted = Frame::new().sort(&["x"], false);
    assert_eq!(empty_sorted.length(), 0);
}

#[test]
fn test_non_numeric_arithmetic_propagates_nan() {
    let frame = Frame::from_records(vec![
        Record::from_pairs([("v", Value::Int64(1))]),
        Record::from_pairs([("v", Value::String("oops".into()))]),
        Record::from_pairs([("v", Value::Int64(3))]),
    ]);
    match frame.sum("v") {
        Value::Float64(f) => assert!(f.is_nan()),
        other => panic!("expected NaN sum, got {:?}", other),
    }
    match frame.average("v") {
        Value::Float64(f) => assert!(f.is_nan()),
        other => panic!("expected NaN average, got {:?}", other),
    }
}

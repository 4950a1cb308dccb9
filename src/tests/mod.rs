use chrono::NaiveDate;
use serde::Deserialize;

use crate::catalog::{Catalog, ColumnStatisticsBuilder, TableBuilder, DEFAULT_SCHEMA};
use crate::datatypes::DataType;
use crate::error::SelectivityError;
use crate::operators::{JoinType, OperatorBuilder};
use crate::range::SerializedRange;
use crate::selectivity::overlap::{OverlapJoinSelectivity, DEFAULT_OVERLAP_SELECTIVITY};
use crate::selectivity::registry::SelectivityRegistry;
use crate::statistics::catalog::CatalogStatisticsProvider;
use crate::testing::{int_histogram, SelectivityTester, RANGE_COLUMN};
use crate::value::ScalarValue;

#[derive(Debug, Deserialize)]
struct OverlapTestCase {
    name: String,
    left: Option<Vec<(i32, i32)>>,
    right: Option<Vec<(i32, i32)>>,
    selectivity: f64,
}

#[test]
fn test_overlap_scenarios() {
    let test_cases: Vec<OverlapTestCase> =
        serde_yaml::from_str(include_str!("overlap.yaml")).expect("Failed to parse test cases");
    assert!(!test_cases.is_empty(), "No test cases");

    let mut failures = vec![];
    for test_case in test_cases {
        let tester = SelectivityTester::new();
        tester.add_int_table("L", test_case.left.as_deref());
        tester.add_int_table("R", test_case.right.as_deref());

        match tester.estimate("L", "R") {
            Ok(actual) if actual == test_case.selectivity => {}
            Ok(actual) => {
                failures.push(format!("{}: expected {} but got {}", test_case.name, test_case.selectivity, actual))
            }
            Err(err) => failures.push(format!("{}: unexpected error {}", test_case.name, err)),
        }
    }

    assert!(failures.is_empty(), "Failed test cases:\n{}", failures.join("\n"));
}

#[test]
fn test_absent_left_statistics_ignore_right_histogram() {
    let tester = SelectivityTester::new();
    tester.add_int_table("L", None);
    // A corrupted histogram is never read.
    tester.add_table(
        "R",
        DataType::Int32,
        Some(ColumnStatisticsBuilder::new().bounds_histogram(vec![SerializedRange::empty()]).build()),
    );

    tester.expect_selectivity("L", "R", DEFAULT_OVERLAP_SELECTIVITY);
}

#[test]
fn test_untrusted_statistics_with_leaky_operator() {
    let mut tester = SelectivityTester::new();
    let untrusted = ColumnStatisticsBuilder::new().trusted(false).bounds_histogram(int_histogram(&[(1, 5)])).build();
    tester.add_table("L", DataType::Int32, Some(untrusted));
    tester.add_int_table("R", Some(&[(1, 5)]));

    tester.expect_selectivity("L", "R", DEFAULT_OVERLAP_SELECTIVITY);
    tester.expect_selectivity("R", "L", DEFAULT_OVERLAP_SELECTIVITY);

    tester.set_operator(OperatorBuilder::new("&&").leakproof(true).build().unwrap());
    tester.expect_selectivity("L", "R", 1.0);
}

#[test]
fn test_statistics_without_histogram() {
    let tester = SelectivityTester::new();
    tester.add_table("L", DataType::Int32, Some(ColumnStatisticsBuilder::new().build()));
    tester.add_int_table("R", Some(&[(1, 5)]));

    tester.expect_selectivity("L", "R", DEFAULT_OVERLAP_SELECTIVITY);
}

#[test]
fn test_histogram_with_empty_range_is_rejected() {
    let tester = SelectivityTester::new();
    let corrupted = vec![SerializedRange::new(1, 5), SerializedRange::empty()];
    tester.add_table("L", DataType::Int32, Some(ColumnStatisticsBuilder::new().bounds_histogram(corrupted).build()));
    tester.add_int_table("R", Some(&[(1, 5)]));

    let err = tester.estimate("L", "R").expect_err("Corrupted histogram must be rejected");
    assert_eq!(format!("{}", err), "Internal error: bounds histogram contains an empty range");
}

#[test]
fn test_non_range_columns_are_rejected() {
    let tester = SelectivityTester::new();
    tester.add_int_table("L", Some(&[(1, 5)]));
    tester.add_table("R", DataType::Int64, None);

    let err = tester.estimate("L", "R").expect_err("Different element types must be rejected");
    assert!(matches!(err, SelectivityError::Argument(_)), "unexpected error: {}", err);

    let estimator = tester.estimator();
    let left = tester.column("L");
    let catalog = tester.catalog();
    let table = TableBuilder::new("P").add_column("p", DataType::Int32).build().unwrap();
    catalog.add_table(DEFAULT_SCHEMA, table).unwrap();
    let plain = catalog.get_table("P").unwrap().get_column("p").unwrap();

    let err = estimator.estimate(tester.operator(), &left, &plain, JoinType::Inner).expect_err("Not a range");
    assert_eq!(format!("{}", err), "Argument error: Column p is not of a range type: Int32");
}

#[test]
fn test_date_ranges() {
    let date = |d: u32| ScalarValue::Date(NaiveDate::from_ymd_opt(2024, 1, d).unwrap());
    let left = vec![
        SerializedRange::bounded(date(1), true, date(10), true),
        SerializedRange::bounded(date(5), true, date(20), true),
    ];
    let right = vec![
        SerializedRange::bounded(date(3), true, date(8), true),
        SerializedRange::bounded(date(4), true, date(25), true),
    ];

    let tester = SelectivityTester::new();
    tester.add_table("L", DataType::Date, Some(ColumnStatisticsBuilder::new().bounds_histogram(left).build()));
    tester.add_table("R", DataType::Date, Some(ColumnStatisticsBuilder::new().bounds_histogram(right).build()));

    // max lower = 3rd (right): the left lower bound 1st is outside.
    // min upper = 20th (left): the right upper bound 25th is outside.
    tester.expect_selectivity("L", "R", 0.5);
}

#[test]
fn test_unbounded_string_ranges() {
    let s = |v: &str| Some(ScalarValue::from(v));
    let left = vec![SerializedRange::unbounded(None, s("m")), SerializedRange::unbounded(s("c"), None)];
    let right = vec![SerializedRange::new("b", "d"), SerializedRange::new("e", "k")];

    let tester = SelectivityTester::new();
    tester.add_table("L", DataType::String, Some(ColumnStatisticsBuilder::new().bounds_histogram(left).build()));
    tester.add_table("R", DataType::String, Some(ColumnStatisticsBuilder::new().bounds_histogram(right).build()));

    // max lower = "b" (right): the left -inf lower bound is outside.
    // min upper = "k" (right): the left upper bounds "m" and +inf are outside.
    tester.expect_selectivity("L", "R", 0.25);
}

#[test]
fn test_estimates_are_bit_identical() {
    let tester = SelectivityTester::new();
    tester.add_int_table("L", Some(&[(1, 10), (5, 15), (8, 20)]));
    tester.add_int_table("R", Some(&[(6, 12), (7, 30)]));

    let first = tester.estimate("L", "R").unwrap();
    let second = tester.estimate("L", "R").unwrap();
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn test_results_are_probabilities() {
    let histograms: Vec<&[(i32, i32)]> = vec![
        &[(1, 2)],
        &[(1, 2), (3, 4)],
        &[(100, 200), (300, 400)],
        &[(-50, 10), (0, 50), (5, 500)],
        &[(7, 8), (7, 9), (7, 10), (8, 12)],
    ];

    let tester = SelectivityTester::new();
    for (i, bounds) in histograms.iter().enumerate() {
        tester.add_int_table(&format!("T{}", i), Some(*bounds));
    }

    for i in 0..histograms.len() {
        for j in 0..histograms.len() {
            let selectivity = tester.estimate(&format!("T{}", i), &format!("T{}", j)).unwrap();
            assert!((0.0..=1.0).contains(&selectivity), "T{} && T{}: {}", i, j, selectivity);
            if i == j {
                assert_eq!(selectivity, 1.0, "T{} && T{}", i, j);
            }
        }
    }
}

#[test]
fn test_configured_fallback_selectivity() {
    let tester = SelectivityTester::new();
    tester.add_int_table("L", None);
    tester.add_int_table("R", Some(&[(1, 5)]));

    let estimator = OverlapJoinSelectivity::builder(CatalogStatisticsProvider::new(tester.catalog()))
        .fallback_selectivity(0.01)
        .build();
    let selectivity = estimator
        .estimate(tester.operator(), &tester.column("L"), &tester.column("R"), JoinType::Inner)
        .unwrap();

    assert_eq!(selectivity, 0.01);
}

#[test]
#[should_panic(expected = "fallback selectivity must be within [0.0, 1.0] range")]
fn test_reject_invalid_fallback_selectivity() {
    let tester = SelectivityTester::new();
    let _ = OverlapJoinSelectivity::builder(CatalogStatisticsProvider::new(tester.catalog())).fallback_selectivity(1.5);
}

#[test]
fn test_registry_dispatch() {
    let tester = SelectivityTester::new();
    tester.add_int_table("L", Some(&[(1, 5), (2, 6), (3, 7)]));
    tester.add_int_table("R", Some(&[(1, 5), (2, 6), (3, 7)]));

    let registry = SelectivityRegistry::with_defaults(CatalogStatisticsProvider::new(tester.catalog()));
    let (left, right) = (tester.column("L"), tester.column("R"));

    let selectivity = registry.join_selectivity(tester.operator(), &left, &right, JoinType::Inner).unwrap();
    assert_eq!(selectivity, 1.0, "rangeoverlapsjoinsel");

    let selectivity = registry.restriction_selectivity(tester.operator(), &left).unwrap();
    assert_eq!(selectivity, 0.005, "areasel");
}

#[test]
fn test_statistics_updates_are_visible_to_new_estimates() {
    let tester = SelectivityTester::new();
    tester.add_int_table("L", Some(&[(1, 2), (3, 4)]));
    tester.add_int_table("R", Some(&[(100, 200), (300, 400)]));

    tester.expect_selectivity("L", "R", 0.0);

    let stats = ColumnStatisticsBuilder::new().bounds_histogram(int_histogram(&[(100, 200), (300, 400)])).build();
    tester.catalog().set_column_statistics(DEFAULT_SCHEMA, "L", RANGE_COLUMN, stats).unwrap();

    tester.expect_selectivity("L", "R", 1.0);
}

#[test]
fn test_histogram_with_unsorted_upper_bounds_is_rejected() {
    let tester = SelectivityTester::new();
    tester.add_int_table("L", Some(&[(1, 5), (2, 10)]));
    tester.add_int_table("R", Some(&[(1, 12), (2, 10)]));

    let err = tester.estimate("L", "R").expect_err("Unsorted upper bounds must be rejected");
    assert_eq!(format!("{}", err), "Internal error: bounds histogram is not sorted by upper bound: 12) precedes 10)");
}

#[test]
fn test_histogram_with_range_without_points_is_rejected() {
    let tester = SelectivityTester::new();
    tester.add_int_table("L", Some(&[(7, 8), (8, 8)]));
    tester.add_int_table("R", Some(&[(1, 5)]));

    let err = tester.estimate("L", "R").expect_err("[8,8) must be rejected");
    assert_eq!(format!("{}", err), "Internal error: bounds histogram contains an empty range");
}

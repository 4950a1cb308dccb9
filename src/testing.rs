use std::sync::{Arc, Once};

use crate::catalog::mutable::MutableCatalog;
use crate::catalog::{Catalog, ColumnRef, ColumnStatistics, ColumnStatisticsBuilder, TableBuilder, DEFAULT_SCHEMA};
use crate::datatypes::DataType;
use crate::error::SelectivityError;
use crate::operators::{JoinType, Operator, OperatorBuilder};
use crate::range::SerializedRange;
use crate::selectivity::overlap::OverlapJoinSelectivity;
use crate::statistics::catalog::CatalogStatisticsProvider;

static INIT_LOG: Once = Once::new();

/// The name of the range column of every table created by [SelectivityTester].
pub const RANGE_COLUMN: &str = "r";

/// Provides a test setup for the [overlap join selectivity estimator].
///
/// [overlap join selectivity estimator]: crate::selectivity::overlap::OverlapJoinSelectivity
pub struct SelectivityTester {
    catalog: Arc<MutableCatalog>,
    operator: Operator,
}

impl SelectivityTester {
    pub fn new() -> Self {
        INIT_LOG.call_once(pretty_env_logger::init);

        SelectivityTester {
            catalog: Arc::new(MutableCatalog::new()),
            operator: OperatorBuilder::new("&&")
                .restriction_estimator("areasel")
                .join_estimator("rangeoverlapsjoinsel")
                .build()
                .expect("Failed to create an operator"),
        }
    }

    /// Replaces the operator used by this tester.
    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
    }

    /// Adds a table with a single range column of the given element type. The column has the given statistics.
    pub fn add_table(&self, table: &str, element_type: DataType, statistics: Option<ColumnStatistics>) {
        let mut builder = TableBuilder::new(table).add_column(RANGE_COLUMN, DataType::range(element_type));
        if let Some(statistics) = statistics {
            builder = builder.add_column_statistics(RANGE_COLUMN, statistics);
        }
        let table = builder.build().expect("Failed to build a table");
        self.catalog.add_table(DEFAULT_SCHEMA, table).expect("Failed to add a table");
    }

    /// Adds a table with an `Int32` range column whose histogram consists of the given `[lower, upper)` ranges.
    /// If `bounds` is `None` the column has no statistics.
    pub fn add_int_table(&self, table: &str, bounds: Option<&[(i32, i32)]>) {
        let statistics = bounds.map(|b| ColumnStatisticsBuilder::new().bounds_histogram(int_histogram(b)).build());
        self.add_table(table, DataType::Int32, statistics);
    }

    /// Returns the range column of the given table.
    pub fn column(&self, table: &str) -> ColumnRef {
        let table = self.catalog.get_table(table).unwrap_or_else(|| panic!("No table {}", table));
        table.get_column(RANGE_COLUMN).expect("No range column")
    }

    /// The operator used by this tester.
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// The catalog used by this tester.
    pub fn catalog(&self) -> Arc<MutableCatalog> {
        self.catalog.clone()
    }

    /// Creates an estimator that reads statistics from the catalog of this tester.
    pub fn estimator(&self) -> OverlapJoinSelectivity<CatalogStatisticsProvider> {
        OverlapJoinSelectivity::new(CatalogStatisticsProvider::new(self.catalog.clone()))
    }

    /// Estimates selectivity of `left.r && right.r` inner join.
    pub fn estimate(&self, left: &str, right: &str) -> Result<f64, SelectivityError> {
        let estimator = self.estimator();
        estimator.estimate(&self.operator, &self.column(left), &self.column(right), JoinType::Inner)
    }

    /// Expects the estimate of `left.r && right.r` to be equal to `expected`.
    pub fn expect_selectivity(&self, left: &str, right: &str, expected: f64) {
        let actual = self.estimate(left, right).expect("Failed to estimate selectivity");
        assert_eq!(actual, expected, "selectivity of {} && {}", left, right);
    }
}

/// Creates a stored histogram from the given `[lower, upper)` ranges.
pub fn int_histogram(bounds: &[(i32, i32)]) -> Vec<SerializedRange> {
    bounds.iter().map(|(l, u)| SerializedRange::new(*l, *u)).collect()
}

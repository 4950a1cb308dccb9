//! Statistics stored in a database catalog.

use std::any::Any;

use crate::catalog::{CatalogRef, ColumnRef, ColumnStatisticsRef};
use crate::operators::Operator;
use crate::statistics::StatisticsProvider;

/// A [StatisticsProvider](super::StatisticsProvider) that reads column statistics from a [database catalog].
///
/// Statistics can be used with an operator if the operator is leakproof or if the statistics are trusted.
///
/// [database catalog]: crate::catalog::Catalog
#[derive(Debug)]
pub struct CatalogStatisticsProvider {
    catalog: CatalogRef,
}

impl CatalogStatisticsProvider {
    pub fn new(catalog: CatalogRef) -> Self {
        CatalogStatisticsProvider { catalog }
    }

    /// The catalog this provider reads statistics from.
    pub fn catalog(&self) -> &CatalogRef {
        &self.catalog
    }
}

impl StatisticsProvider for CatalogStatisticsProvider {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn get_stats(&self, column: &ColumnRef) -> Option<ColumnStatisticsRef> {
        // Columns derived from expressions have no statistics.
        let table = column.table()?;
        let table = self.catalog.get_table(table)?;
        table.statistics().and_then(|s| s.column(column.name()))
    }

    fn is_secure(&self, stats: &ColumnStatisticsRef, operator: &Operator) -> bool {
        if operator.is_leakproof() || stats.is_trusted() {
            true
        } else {
            log::debug!("Not using statistics because operator {} is not leakproof", operator);
            false
        }
    }
}

//! Access to column statistics.

use std::any::Any;
use std::sync::Arc;

use crate::catalog::{ColumnRef, ColumnStatisticsRef};
use crate::operators::Operator;

pub mod catalog;
pub mod histogram;

/// Provides statistics of columns to selectivity estimators.
pub trait StatisticsProvider {
    /// Returns this provider as [`Any`](std::any::Any) in order it can be downcast to its implementation.
    fn as_any(&self) -> &dyn Any;

    /// Returns statistics of the given column or `None` if there are no statistics for that column.
    fn get_stats(&self, column: &ColumnRef) -> Option<ColumnStatisticsRef>;

    /// Checks whether the given statistics can be used to estimate selectivity of an expression
    /// with the given operator.
    fn is_secure(&self, stats: &ColumnStatisticsRef, operator: &Operator) -> bool;
}

/// [StatisticsProvider](self::StatisticsProvider) that provides no statistics.
#[derive(Debug)]
pub struct NoStatisticsProvider;

impl StatisticsProvider for NoStatisticsProvider {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn get_stats(&self, _column: &ColumnRef) -> Option<ColumnStatisticsRef> {
        None
    }

    fn is_secure(&self, _stats: &ColumnStatisticsRef, _operator: &Operator) -> bool {
        false
    }
}

impl<T> StatisticsProvider for Arc<T>
where
    T: StatisticsProvider + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self.as_ref().as_any()
    }

    fn get_stats(&self, column: &ColumnRef) -> Option<ColumnStatisticsRef> {
        self.as_ref().get_stats(column)
    }

    fn is_secure(&self, stats: &ColumnStatisticsRef, operator: &Operator) -> bool {
        self.as_ref().is_secure(stats, operator)
    }
}

//! Selectivity estimators.
//!
//! A restriction estimator computes the fraction of rows of a relation that satisfy `column <op> constant`.
//! A join estimator computes the fraction of row pairs of two relations that satisfy `left <op> right`.

use crate::catalog::ColumnRef;
use crate::error::SelectivityError;
use crate::operators::{JoinType, Operator};

pub mod constant;
pub mod overlap;
pub mod registry;

/// Selectivity of an expression whose operator has no estimator.
pub const DEFAULT_SELECTIVITY: f64 = 0.5;

/// Estimates selectivity of `column <op> constant` expressions.
pub trait RestrictionSelectivity {
    /// Returns selectivity of an expression with the given operator applied to the given column.
    fn restriction_selectivity(&self, operator: &Operator, column: &ColumnRef) -> Result<f64, SelectivityError>;
}

/// Estimates selectivity of `left <op> right` join conditions.
pub trait JoinSelectivity {
    /// Returns selectivity of a join condition with the given operator applied to the given columns.
    fn join_selectivity(
        &self,
        operator: &Operator,
        left: &ColumnRef,
        right: &ColumnRef,
        join_type: JoinType,
    ) -> Result<f64, SelectivityError>;
}

/// Forces the given probability into `[0.0, 1.0]` range. `NaN` becomes `0.0`.
pub fn clamp_probability(p: f64) -> f64 {
    p.max(0.0).min(1.0)
}

//! Fixed selectivity of geometric operators.
//!
//! Without knowing how keys are distributed in an index these operators have no good estimate.
//! The values are small so the optimizer prefers an index on a geometric column whenever one is available.

use crate::catalog::ColumnRef;
use crate::error::SelectivityError;
use crate::operators::{JoinType, Operator};
use crate::selectivity::{JoinSelectivity, RestrictionSelectivity};

/// Selectivity of operators that depend on area, such as "overlaps".
pub const AREA_SELECTIVITY: f64 = 0.005;
/// Selectivity of "strictly left of/right of/above/below".
pub const POSITION_SELECTIVITY: f64 = 0.1;
/// Selectivity of "contains/contained by". Tighter than "overlaps".
pub const CONTAINMENT_SELECTIVITY: f64 = 0.001;

/// `areasel`.
pub fn area_sel(_operator: &Operator, _column: &ColumnRef) -> f64 {
    AREA_SELECTIVITY
}

/// `areajoinsel`.
pub fn area_join_sel(_operator: &Operator, _left: &ColumnRef, _right: &ColumnRef, _join_type: JoinType) -> f64 {
    AREA_SELECTIVITY
}

/// `positionsel`.
pub fn position_sel(_operator: &Operator, _column: &ColumnRef) -> f64 {
    POSITION_SELECTIVITY
}

/// `positionjoinsel`.
pub fn position_join_sel(_operator: &Operator, _left: &ColumnRef, _right: &ColumnRef, _join_type: JoinType) -> f64 {
    POSITION_SELECTIVITY
}

/// `contsel`.
pub fn cont_sel(_operator: &Operator, _column: &ColumnRef) -> f64 {
    CONTAINMENT_SELECTIVITY
}

/// `contjoinsel`.
pub fn cont_join_sel(_operator: &Operator, _left: &ColumnRef, _right: &ColumnRef, _join_type: JoinType) -> f64 {
    CONTAINMENT_SELECTIVITY
}

/// An estimator that always returns the same selectivity for both restrictions and joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantSelectivity {
    Area,
    Position,
    Containment,
}

impl RestrictionSelectivity for ConstantSelectivity {
    fn restriction_selectivity(&self, operator: &Operator, column: &ColumnRef) -> Result<f64, SelectivityError> {
        let selectivity = match self {
            ConstantSelectivity::Area => area_sel(operator, column),
            ConstantSelectivity::Position => position_sel(operator, column),
            ConstantSelectivity::Containment => cont_sel(operator, column),
        };
        Ok(selectivity)
    }
}

impl JoinSelectivity for ConstantSelectivity {
    fn join_selectivity(
        &self,
        operator: &Operator,
        left: &ColumnRef,
        right: &ColumnRef,
        join_type: JoinType,
    ) -> Result<f64, SelectivityError> {
        let selectivity = match self {
            ConstantSelectivity::Area => area_join_sel(operator, left, right, join_type),
            ConstantSelectivity::Position => position_join_sel(operator, left, right, join_type),
            ConstantSelectivity::Containment => cont_join_sel(operator, left, right, join_type),
        };
        Ok(selectivity)
    }
}

//! Join selectivity of the range "overlaps" operator estimated from bounds histograms.
//!
//! The estimate looks only at the extreme bounds of the two histograms: it is the share of
//! histogram bounds that fall inside the window between the greatest first lower bound and
//! the smallest last upper bound. It is not a sound overlap probability. It is kept this crude
//! because its magnitude steers the optimizer towards index-assisted joins.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use ordered_float::OrderedFloat;

use crate::catalog::{ColumnRef, ColumnStatisticsRef};
use crate::datatypes::DataType;
use crate::error::SelectivityError;
use crate::operators::{JoinType, Operator};
use crate::range::{RangeBound, RangeElement, SerializedRange};
use crate::selectivity::{clamp_probability, JoinSelectivity};
use crate::statistics::histogram::BoundsHistogram;
use crate::statistics::StatisticsProvider;

/// Selectivity returned when the histograms can not be used.
pub const DEFAULT_OVERLAP_SELECTIVITY: f64 = 0.005;

/// Computes the raw (not clamped) overlap selectivity of two bounds histograms.
/// Returns `None` if either histogram is empty.
///
/// When both histograms start (end) at the same bound, the bound of the `left` histogram is
/// used and the `right` histogram is scanned.
pub fn estimate_overlap<T>(left: &BoundsHistogram<T>, right: &BoundsHistogram<T>) -> Option<f64>
where
    T: RangeElement,
{
    let left_lower = left.first_lower()?;
    let left_upper = left.last_upper()?;
    let right_lower = right.first_lower()?;
    let right_upper = right.last_upper()?;

    let mut outside = 0;

    outside += if left_lower.cmp_value(right_lower) != Ordering::Less {
        count_lower_before(right, left_lower)
    } else {
        count_lower_before(left, right_lower)
    };

    outside += if left_upper.cmp_value(right_upper) != Ordering::Greater {
        count_upper_after(right, left_upper)
    } else {
        count_upper_after(left, right_upper)
    };

    let total = left.len() + right.len();
    log::debug!(
        "Overlap estimate: {} of {} bounds lie outside (left: {}, right: {})",
        outside,
        total,
        left.len(),
        right.len()
    );

    Some((total as f64 - outside as f64) / total as f64)
}

fn count_lower_before<T>(histogram: &BoundsHistogram<T>, max_lower: &RangeBound<T>) -> usize
where
    T: RangeElement,
{
    histogram
        .lower_bounds()
        .iter()
        .filter(|b| b.cmp_value(max_lower) == Ordering::Less)
        .count()
}

fn count_upper_after<T>(histogram: &BoundsHistogram<T>, min_upper: &RangeBound<T>) -> usize
where
    T: RangeElement,
{
    histogram
        .upper_bounds()
        .iter()
        .filter(|b| b.cmp_value(min_upper) == Ordering::Greater)
        .count()
}

/// Estimates join selectivity of the range "overlaps" operator from bounds histograms
/// of the joined columns.
///
/// If statistics of either column are missing, can not be used with the operator or contain
/// no bounds histogram (or an empty one), the estimator returns the fallback selectivity
/// ([DEFAULT_OVERLAP_SELECTIVITY] unless [configured otherwise](OverlapJoinSelectivityBuilder::fallback_selectivity)).
#[derive(Debug)]
pub struct OverlapJoinSelectivity<P> {
    provider: P,
    fallback_selectivity: f64,
}

impl<P> OverlapJoinSelectivity<P>
where
    P: StatisticsProvider,
{
    /// Creates an estimator that reads statistics from the given provider.
    pub fn new(provider: P) -> Self {
        OverlapJoinSelectivityBuilder::new(provider).build()
    }

    /// Creates a builder of an estimator that reads statistics from the given provider.
    pub fn builder(provider: P) -> OverlapJoinSelectivityBuilder<P> {
        OverlapJoinSelectivityBuilder::new(provider)
    }

    /// The selectivity returned when histograms can not be used.
    pub fn fallback_selectivity(&self) -> f64 {
        self.fallback_selectivity
    }

    /// Returns selectivity of `left && right` join condition.
    ///
    /// # Errors
    ///
    /// Returns an argument error if the columns are not ranges of the same element type.
    /// Returns an internal error if a stored bounds histogram is corrupted.
    pub fn estimate(
        &self,
        operator: &Operator,
        left: &ColumnRef,
        right: &ColumnRef,
        join_type: JoinType,
    ) -> Result<f64, SelectivityError> {
        let element_type = range_element_type(left, right)?;

        log::debug!(
            "Estimating {} join selectivity: {}.{} {} {}.{}",
            join_type,
            left.table().map(|t| t.as_str()).unwrap_or(""),
            left.name(),
            operator,
            right.table().map(|t| t.as_str()).unwrap_or(""),
            right.name(),
        );

        let left_stats = match self.get_histogram_stats(operator, left) {
            Some(stats) => stats,
            None => return Ok(self.fallback_selectivity),
        };
        let right_stats = match self.get_histogram_stats(operator, right) {
            Some(stats) => stats,
            None => return Ok(self.fallback_selectivity),
        };

        // Both are present. See get_histogram_stats.
        let left_hist = left_stats.bounds_histogram().unwrap_or(&[]);
        let right_hist = right_stats.bounds_histogram().unwrap_or(&[]);

        match element_type {
            DataType::Int32 => self.estimate_typed::<i32>(left_hist, right_hist),
            DataType::Int64 => self.estimate_typed::<i64>(left_hist, right_hist),
            DataType::Float64 => self.estimate_typed::<OrderedFloat<f64>>(left_hist, right_hist),
            DataType::Date => self.estimate_typed::<NaiveDate>(left_hist, right_hist),
            DataType::Timestamp => self.estimate_typed::<NaiveDateTime>(left_hist, right_hist),
            DataType::String => self.estimate_typed::<String>(left_hist, right_hist),
            DataType::Range(_) => {
                Err(SelectivityError::Unsupported(format!("Ranges of type {} are not supported", element_type)))
            }
        }
    }

    /// Returns statistics of the given column if they have a non-empty bounds histogram
    /// that can be used with the given operator.
    fn get_histogram_stats(&self, operator: &Operator, column: &ColumnRef) -> Option<ColumnStatisticsRef> {
        let stats = match self.provider.get_stats(column) {
            Some(stats) => stats,
            None => {
                log::debug!("No statistics for column {}", column.name());
                return None;
            }
        };

        // Can't use the histogram with insecure range support functions
        if !self.provider.is_secure(&stats, operator) {
            return None;
        }

        match stats.bounds_histogram().map(|h| h.len()) {
            Some(0) => {
                log::debug!("Bounds histogram of column {} is empty", column.name());
                None
            }
            Some(_) => Some(stats),
            None => {
                log::debug!("No bounds histogram for column {}", column.name());
                None
            }
        }
    }

    fn estimate_typed<T>(&self, left: &[SerializedRange], right: &[SerializedRange]) -> Result<f64, SelectivityError>
    where
        T: RangeElement,
    {
        let left = BoundsHistogram::<T>::load(left)?;
        let right = BoundsHistogram::<T>::load(right)?;

        match estimate_overlap(&left, &right) {
            Some(selectivity) => Ok(clamp_probability(selectivity)),
            None => Ok(self.fallback_selectivity),
        }
    }
}

impl<P> JoinSelectivity for OverlapJoinSelectivity<P>
where
    P: StatisticsProvider,
{
    fn join_selectivity(
        &self,
        operator: &Operator,
        left: &ColumnRef,
        right: &ColumnRef,
        join_type: JoinType,
    ) -> Result<f64, SelectivityError> {
        self.estimate(operator, left, right, join_type)
    }
}

/// A builder to create instances of [OverlapJoinSelectivity].
#[derive(Debug)]
pub struct OverlapJoinSelectivityBuilder<P> {
    provider: P,
    fallback_selectivity: f64,
}

impl<P> OverlapJoinSelectivityBuilder<P>
where
    P: StatisticsProvider,
{
    /// Creates a builder with the default fallback selectivity.
    pub fn new(provider: P) -> Self {
        OverlapJoinSelectivityBuilder {
            provider,
            fallback_selectivity: DEFAULT_OVERLAP_SELECTIVITY,
        }
    }

    /// Sets the selectivity returned when histograms can not be used.
    ///
    /// # Panics
    ///
    /// This method panics if the given selectivity lies outside of `[0.0, 1.0]` bounds.
    pub fn fallback_selectivity(mut self, selectivity: f64) -> Self {
        assert!(
            (0f64..=1f64).contains(&selectivity),
            "fallback selectivity must be within [0.0, 1.0] range but got: {}",
            selectivity
        );
        self.fallback_selectivity = selectivity;
        self
    }

    /// Creates an instance of [OverlapJoinSelectivity].
    pub fn build(self) -> OverlapJoinSelectivity<P> {
        OverlapJoinSelectivity {
            provider: self.provider,
            fallback_selectivity: self.fallback_selectivity,
        }
    }
}

fn range_element_type<'a>(left: &'a ColumnRef, right: &ColumnRef) -> Result<&'a DataType, SelectivityError> {
    let left_element = range_element(left)?;
    let right_element = range_element(right)?;

    if left_element != right_element {
        return Err(SelectivityError::argument(format!(
            "Columns {} and {} have different range types: {} and {}",
            left.name(),
            right.name(),
            left.data_type(),
            right.data_type()
        )));
    }

    Ok(left_element)
}

fn range_element(column: &ColumnRef) -> Result<&DataType, SelectivityError> {
    column.data_type().range_element().ok_or_else(|| {
        SelectivityError::argument(format!("Column {} is not of a range type: {}", column.name(), column.data_type()))
    })
}

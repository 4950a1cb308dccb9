//! Bounds histograms.

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};

use itertools::Itertools;

use crate::error::{InternalError, SelectivityError};
use crate::range::{RangeBound, RangeElement, SerializedRange};

/// A histogram of the bounds of the values of a range column.
///
/// Lower bounds and upper bounds are each stored in ascending order,
/// so the last upper bound is the greatest one.
#[derive(Debug, Clone)]
pub struct BoundsHistogram<T> {
    lower: Vec<RangeBound<T>>,
    upper: Vec<RangeBound<T>>,
}

impl<T> BoundsHistogram<T>
where
    T: RangeElement,
{
    /// Deserializes a bounds histogram from the given ranges.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the stored ranges can not form a bounds histogram:
    /// one of them is empty, one of them can not be deserialized into bounds of type `T`,
    /// a lower bound of a range is greater than its upper bound
    /// or either lower bounds or upper bounds are not sorted in ascending order.
    pub fn load(ranges: &[SerializedRange]) -> Result<Self, SelectivityError> {
        let mut lower = Vec::with_capacity(ranges.len());
        let mut upper = Vec::with_capacity(ranges.len());

        for (i, range) in ranges.iter().enumerate() {
            let r = range.deserialize::<T>().map_err(|e| {
                SelectivityError::Internal(InternalError::with_cause(
                    format!("bounds histogram entry {} is invalid", i),
                    e,
                ))
            })?;
            if r.empty {
                return Err(SelectivityError::internal("bounds histogram contains an empty range"));
            }
            if r.lower.cmp_value(&r.upper) == Ordering::Greater {
                return Err(SelectivityError::internal(format!(
                    "bounds histogram contains a range with lower bound greater than upper bound: {}",
                    range
                )));
            }
            lower.push(r.lower);
            upper.push(r.upper);
        }

        check_ascending(&lower, "lower")?;
        check_ascending(&upper, "upper")?;

        Ok(BoundsHistogram { lower, upper })
    }

    /// Creates a histogram from the given pairs of (lower, upper) bounds.
    /// The pairs are not validated.
    pub fn from_bounds(bounds: Vec<(RangeBound<T>, RangeBound<T>)>) -> Self {
        let (lower, upper) = bounds.into_iter().unzip();
        BoundsHistogram { lower, upper }
    }

    /// The number of ranges in this histogram.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Whether this histogram has no entries.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Lower bounds in ascending order.
    pub fn lower_bounds(&self) -> &[RangeBound<T>] {
        &self.lower
    }

    /// Upper bounds in ascending order.
    pub fn upper_bounds(&self) -> &[RangeBound<T>] {
        &self.upper
    }

    /// The smallest lower bound. `None` if the histogram is empty.
    pub fn first_lower(&self) -> Option<&RangeBound<T>> {
        self.lower.first()
    }

    /// The greatest upper bound. `None` if the histogram is empty.
    pub fn last_upper(&self) -> Option<&RangeBound<T>> {
        self.upper.last()
    }
}

fn check_ascending<T>(bounds: &[RangeBound<T>], name: &str) -> Result<(), SelectivityError>
where
    T: RangeElement,
{
    match bounds.iter().tuple_windows().find(|(l, r)| l.cmp_value(r) == Ordering::Greater) {
        Some((prev, next)) => Err(SelectivityError::internal(format!(
            "bounds histogram is not sorted by {} bound: {} precedes {}",
            name, prev, next
        ))),
        None => Ok(()),
    }
}

impl<T> Display for BoundsHistogram<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let entries = self.lower.iter().zip(self.upper.iter()).map(|(l, u)| format!("{},{}", l, u)).join(" ");
        write!(f, "[{}]", entries)
    }
}

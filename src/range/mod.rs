//! Range values: bounds, element types and the stored form of a range.

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};

use chrono::{NaiveDate, NaiveDateTime};
use ordered_float::OrderedFloat;

use crate::datatypes::DataType;
use crate::error::SelectivityError;
use crate::value::ScalarValue;

/// A type that can be used as the element type of a range.
///
/// The ordering of range bounds is the ordering of `Self`. It is chosen once per
/// estimation from the element type of a range column, so bounds are compared without
/// any runtime type checks.
pub trait RangeElement: Ord + Clone + Debug {
    /// The data type of range elements.
    fn data_type() -> DataType;

    /// Extracts an element from the given scalar value.
    /// Returns `None` if the value is of another type.
    fn from_scalar(value: &ScalarValue) -> Option<Self>;
}

macro_rules! range_element {
    ($ty:ty, $variant:ident) => {
        impl RangeElement for $ty {
            fn data_type() -> DataType {
                DataType::$variant
            }

            fn from_scalar(value: &ScalarValue) -> Option<Self> {
                match value {
                    ScalarValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

range_element!(i32, Int32);
range_element!(i64, Int64);
range_element!(OrderedFloat<f64>, Float64);
range_element!(NaiveDate, Date);
range_element!(NaiveDateTime, Timestamp);
range_element!(String, String);

/// One edge of a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBound<T> {
    /// `None` if the bound is infinite.
    value: Option<T>,
    inclusive: bool,
    lower: bool,
}

impl<T> RangeBound<T>
where
    T: RangeElement,
{
    /// Creates a finite lower bound.
    pub fn lower(value: T, inclusive: bool) -> Self {
        RangeBound {
            value: Some(value),
            inclusive,
            lower: true,
        }
    }

    /// Creates a finite upper bound.
    pub fn upper(value: T, inclusive: bool) -> Self {
        RangeBound {
            value: Some(value),
            inclusive,
            lower: false,
        }
    }

    /// Creates an unbounded edge. Infinite bounds are never inclusive.
    pub fn infinite(lower: bool) -> Self {
        RangeBound {
            value: None,
            inclusive: false,
            lower,
        }
    }

    /// The value of this bound. `None` if the bound is infinite.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Whether the value itself belongs to the range.
    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    /// Whether this is an unbounded edge.
    pub fn is_infinite(&self) -> bool {
        self.value.is_none()
    }

    /// Whether this is the lower edge of a range.
    pub fn is_lower(&self) -> bool {
        self.lower
    }

    /// Compares the positions of two bounds on the axis of element values.
    /// An infinite lower bound precedes every value and an infinite upper bound follows every value.
    /// Inclusivity is ignored.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (&self.value, &other.value) {
            (Some(l), Some(r)) => l.cmp(r),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> i8 {
        match (&self.value, self.lower) {
            (Some(_), _) => 0,
            (None, true) => -1,
            (None, false) => 1,
        }
    }
}

impl<T> Display for RangeBound<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.value, self.lower, self.inclusive) {
            (None, true, _) => write!(f, "(-inf"),
            (None, false, _) => write!(f, "+inf)"),
            (Some(v), true, true) => write!(f, "[{:?}", v),
            (Some(v), true, false) => write!(f, "({:?}", v),
            (Some(v), false, true) => write!(f, "{:?}]", v),
            (Some(v), false, false) => write!(f, "{:?})", v),
        }
    }
}

/// The range is empty.
pub const RANGE_EMPTY: u8 = 0x01;
/// The lower bound is inclusive.
pub const RANGE_LB_INC: u8 = 0x02;
/// The upper bound is inclusive.
pub const RANGE_UB_INC: u8 = 0x04;
/// The lower bound is -infinity.
pub const RANGE_LB_INF: u8 = 0x08;
/// The upper bound is +infinity.
pub const RANGE_UB_INF: u8 = 0x10;

/// The stored form of a range value as it appears in column statistics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerializedRange {
    flags: u8,
    lower: Option<ScalarValue>,
    upper: Option<ScalarValue>,
}

impl SerializedRange {
    /// Creates a range from its raw parts.
    pub fn from_parts(flags: u8, lower: Option<ScalarValue>, upper: Option<ScalarValue>) -> Self {
        SerializedRange { flags, lower, upper }
    }

    /// Creates an empty range.
    pub fn empty() -> Self {
        SerializedRange::from_parts(RANGE_EMPTY, None, None)
    }

    /// Creates a `[lower, upper)` range.
    pub fn new(lower: impl Into<ScalarValue>, upper: impl Into<ScalarValue>) -> Self {
        SerializedRange::bounded(lower, true, upper, false)
    }

    /// Creates a range with both bounds finite.
    pub fn bounded(
        lower: impl Into<ScalarValue>,
        lower_inclusive: bool,
        upper: impl Into<ScalarValue>,
        upper_inclusive: bool,
    ) -> Self {
        let mut flags = 0;
        if lower_inclusive {
            flags |= RANGE_LB_INC;
        }
        if upper_inclusive {
            flags |= RANGE_UB_INC;
        }
        SerializedRange::from_parts(flags, Some(lower.into()), Some(upper.into()))
    }

    /// Creates a range with the given bounds. `None` denotes an infinite bound.
    pub fn unbounded(lower: Option<ScalarValue>, upper: Option<ScalarValue>) -> Self {
        let mut flags = 0;
        if lower.is_some() {
            flags |= RANGE_LB_INC;
        } else {
            flags |= RANGE_LB_INF;
        }
        if upper.is_none() {
            flags |= RANGE_UB_INF;
        }
        SerializedRange::from_parts(flags, lower, upper)
    }

    /// The flags of this range.
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Whether this range is empty.
    pub fn is_empty(&self) -> bool {
        self.flags & RANGE_EMPTY != 0
    }

    /// Splits this range into its bounds. A range whose bounds are equal is empty unless both bounds are inclusive.
    ///
    /// Returns an internal error if a finite bound is missing or its value is not of the type `T`.
    pub fn deserialize<T>(&self) -> Result<DeserializedRange<T>, SelectivityError>
    where
        T: RangeElement,
    {
        if self.is_empty() {
            return Ok(DeserializedRange {
                lower: RangeBound::infinite(true),
                upper: RangeBound::infinite(false),
                empty: true,
            });
        }

        let lower = self.deserialize_bound(true)?;
        let upper = self.deserialize_bound(false)?;
        // [x,x), (x,x) and (x,x] contain no points.
        let empty = lower.cmp_value(&upper) == Ordering::Equal && !(lower.is_inclusive() && upper.is_inclusive());

        Ok(DeserializedRange { lower, upper, empty })
    }

    fn deserialize_bound<T>(&self, lower: bool) -> Result<RangeBound<T>, SelectivityError>
    where
        T: RangeElement,
    {
        let (inf_flag, inc_flag, value, name) = if lower {
            (RANGE_LB_INF, RANGE_LB_INC, &self.lower, "lower")
        } else {
            (RANGE_UB_INF, RANGE_UB_INC, &self.upper, "upper")
        };

        if self.flags & inf_flag != 0 {
            return Ok(RangeBound::infinite(lower));
        }

        let value = match value {
            Some(value) => value,
            None => return Err(SelectivityError::internal(format!("range {} has no {} bound value", self, name))),
        };
        let value = match T::from_scalar(value) {
            Some(value) => value,
            None => {
                return Err(SelectivityError::internal(format!(
                    "range {} has a {} bound of type {} but expected {}",
                    self,
                    name,
                    value.data_type(),
                    T::data_type()
                )))
            }
        };

        let inclusive = self.flags & inc_flag != 0;
        if lower {
            Ok(RangeBound::lower(value, inclusive))
        } else {
            Ok(RangeBound::upper(value, inclusive))
        }
    }
}

impl Display for SerializedRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "empty");
        }
        let lower_inc = if self.flags & RANGE_LB_INC != 0 { "[" } else { "(" };
        let upper_inc = if self.flags & RANGE_UB_INC != 0 { "]" } else { ")" };
        write!(f, "{}", lower_inc)?;
        if let (Some(v), false) = (&self.lower, self.flags & RANGE_LB_INF != 0) {
            write!(f, "{}", v)?;
        }
        write!(f, ",")?;
        if let (Some(v), false) = (&self.upper, self.flags & RANGE_UB_INF != 0) {
            write!(f, "{}", v)?;
        }
        write!(f, "{}", upper_inc)
    }
}

/// The result of [SerializedRange::deserialize].
#[derive(Debug, Clone)]
pub struct DeserializedRange<T> {
    pub lower: RangeBound<T>,
    pub upper: RangeBound<T>,
    pub empty: bool,
}

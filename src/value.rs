use crate::datatypes::DataType;
use chrono::{NaiveDate, NaiveDateTime};
use ordered_float::OrderedFloat;
use std::fmt::{Display, Formatter};

/// Values stored in range bounds.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ScalarValue {
    Int32(i32),
    Int64(i64),
    Float64(OrderedFloat<f64>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    String(String),
}

impl ScalarValue {
    /// Returns the type of this scalar value.
    pub fn data_type(&self) -> DataType {
        match self {
            ScalarValue::Int32(_) => DataType::Int32,
            ScalarValue::Int64(_) => DataType::Int64,
            ScalarValue::Float64(_) => DataType::Float64,
            ScalarValue::Date(_) => DataType::Date,
            ScalarValue::Timestamp(_) => DataType::Timestamp,
            ScalarValue::String(_) => DataType::String,
        }
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int32(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(OrderedFloat(value))
    }
}

impl From<NaiveDate> for ScalarValue {
    fn from(value: NaiveDate) -> Self {
        ScalarValue::Date(value)
    }
}

impl From<NaiveDateTime> for ScalarValue {
    fn from(value: NaiveDateTime) -> Self {
        ScalarValue::Timestamp(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl Display for ScalarValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Int32(value) => write!(f, "{}", value),
            ScalarValue::Int64(value) => write!(f, "{}", value),
            ScalarValue::Float64(value) => write!(f, "{}", value),
            ScalarValue::Date(value) => write!(f, "{}", value),
            ScalarValue::Timestamp(value) => write!(f, "{}", value),
            ScalarValue::String(value) => write!(f, "{}", value),
        }
    }
}

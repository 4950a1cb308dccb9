use std::fmt::{Display, Formatter};

/// Data types of column definitions and of range elements.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum DataType {
    Int32,
    Int64,
    Float64,
    Date,
    Timestamp,
    String,
    /// A range whose bounds are values of the given element type.
    Range(Box<DataType>),
}

impl DataType {
    /// Creates a range type with the given element type.
    pub fn range(element: DataType) -> Self {
        DataType::Range(Box::new(element))
    }

    /// Returns the element type if this is a range type.
    pub fn range_element(&self) -> Option<&DataType> {
        match self {
            DataType::Range(element) => Some(element.as_ref()),
            _ => None,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Int32 => write!(f, "Int32"),
            DataType::Int64 => write!(f, "Int64"),
            DataType::Float64 => write!(f, "Float64"),
            DataType::Date => write!(f, "Date"),
            DataType::Timestamp => write!(f, "Timestamp"),
            DataType::String => write!(f, "String"),
            DataType::Range(element) => write!(f, "Range({})", element),
        }
    }
}

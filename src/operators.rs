//! Operators whose selectivity can be estimated.

use std::fmt::{Display, Formatter};

use crate::error::SelectivityError;

/// Describes a binary operator and the estimators registered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    name: String,
    leakproof: bool,
    restriction_estimator: Option<String>,
    join_estimator: Option<String>,
}

impl Operator {
    /// The name of this operator (eg. `&&`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the function that implements this operator reveals nothing about its arguments
    /// other than its result. Statistics of any column can be used with a leakproof operator.
    pub fn is_leakproof(&self) -> bool {
        self.leakproof
    }

    /// The name of the estimator used when this operator appears in a filter.
    pub fn restriction_estimator(&self) -> Option<&str> {
        self.restriction_estimator.as_deref()
    }

    /// The name of the estimator used when this operator appears in a join condition.
    pub fn join_estimator(&self) -> Option<&str> {
        self.join_estimator.as_deref()
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A builder to create instances of an [Operator].
#[derive(Debug, Clone)]
pub struct OperatorBuilder {
    name: String,
    leakproof: bool,
    restriction_estimator: Option<String>,
    join_estimator: Option<String>,
}

impl OperatorBuilder {
    /// Creates a builder for an operator with the given name.
    pub fn new(name: &str) -> Self {
        OperatorBuilder {
            name: name.to_string(),
            leakproof: false,
            restriction_estimator: None,
            join_estimator: None,
        }
    }

    /// Specifies whether the function that implements the operator is leakproof.
    pub fn leakproof(mut self, leakproof: bool) -> Self {
        self.leakproof = leakproof;
        self
    }

    /// Sets the name of the restriction estimator.
    pub fn restriction_estimator(mut self, name: &str) -> Self {
        self.restriction_estimator = Some(name.to_string());
        self
    }

    /// Sets the name of the join estimator.
    pub fn join_estimator(mut self, name: &str) -> Self {
        self.join_estimator = Some(name.to_string());
        self
    }

    /// Creates an instance of an [Operator].
    pub fn build(self) -> Result<Operator, SelectivityError> {
        if self.name.is_empty() {
            return Err(SelectivityError::argument("Operator name must not be empty"));
        }

        Ok(Operator {
            name: self.name,
            leakproof: self.leakproof,
            restriction_estimator: self.restriction_estimator,
            join_estimator: self.join_estimator,
        })
    }
}

/// Type of a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Semi,
    Anti,
}

impl Display for JoinType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "Inner"),
            JoinType::Left => write!(f, "Left"),
            JoinType::Right => write!(f, "Right"),
            JoinType::Full => write!(f, "Full"),
            JoinType::Semi => write!(f, "Semi"),
            JoinType::Anti => write!(f, "Anti"),
        }
    }
}

//! Lookup of selectivity estimators by name.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use itertools::Itertools;

use crate::catalog::ColumnRef;
use crate::error::SelectivityError;
use crate::operators::{JoinType, Operator};
use crate::selectivity::constant::ConstantSelectivity;
use crate::selectivity::overlap::OverlapJoinSelectivity;
use crate::selectivity::{clamp_probability, JoinSelectivity, RestrictionSelectivity, DEFAULT_SELECTIVITY};
use crate::statistics::StatisticsProvider;

/// Registers selectivity estimators under names that operators refer to
/// (see [Operator::restriction_estimator] and [Operator::join_estimator]).
pub struct SelectivityRegistry {
    restriction: HashMap<String, Box<dyn RestrictionSelectivity>>,
    join: HashMap<String, Box<dyn JoinSelectivity>>,
}

impl SelectivityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        SelectivityRegistry {
            restriction: HashMap::new(),
            join: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in estimators:
    ///
    /// - `areasel`, `areajoinsel`
    /// - `positionsel`, `positionjoinsel`
    /// - `contsel`, `contjoinsel`
    /// - `rangeoverlapsjoinsel` that reads bounds histograms from the given statistics provider.
    pub fn with_defaults<P>(provider: P) -> Self
    where
        P: StatisticsProvider + 'static,
    {
        let mut registry = SelectivityRegistry::new();
        let constants = [
            ("areasel", "areajoinsel", ConstantSelectivity::Area),
            ("positionsel", "positionjoinsel", ConstantSelectivity::Position),
            ("contsel", "contjoinsel", ConstantSelectivity::Containment),
        ];
        for (restriction, join, estimator) in constants {
            registry.restriction.insert(restriction.into(), Box::new(estimator));
            registry.join.insert(join.into(), Box::new(estimator));
        }
        registry.join.insert("rangeoverlapsjoinsel".into(), Box::new(OverlapJoinSelectivity::new(provider)));
        registry
    }

    /// Registers a restriction estimator. Returns an error if an estimator with the same name already exists.
    pub fn register_restriction<T>(&mut self, name: &str, estimator: T) -> Result<(), SelectivityError>
    where
        T: RestrictionSelectivity + 'static,
    {
        match self.restriction.entry(name.to_string()) {
            Entry::Occupied(_) => {
                Err(SelectivityError::argument(format!("Restriction estimator already exists: {}", name)))
            }
            Entry::Vacant(v) => {
                v.insert(Box::new(estimator));
                Ok(())
            }
        }
    }

    /// Registers a join estimator. Returns an error if an estimator with the same name already exists.
    pub fn register_join<T>(&mut self, name: &str, estimator: T) -> Result<(), SelectivityError>
    where
        T: JoinSelectivity + 'static,
    {
        match self.join.entry(name.to_string()) {
            Entry::Occupied(_) => Err(SelectivityError::argument(format!("Join estimator already exists: {}", name))),
            Entry::Vacant(v) => {
                v.insert(Box::new(estimator));
                Ok(())
            }
        }
    }

    /// Estimates selectivity of a filter with the given operator using the operator's restriction estimator.
    /// If the operator has no restriction estimator returns [DEFAULT_SELECTIVITY].
    pub fn restriction_selectivity(&self, operator: &Operator, column: &ColumnRef) -> Result<f64, SelectivityError> {
        let name = match operator.restriction_estimator() {
            Some(name) => name,
            None => return Ok(DEFAULT_SELECTIVITY),
        };
        match self.restriction.get(name) {
            Some(estimator) => {
                let selectivity = estimator.restriction_selectivity(operator, column)?;
                Ok(clamp_probability(selectivity))
            }
            None => Err(SelectivityError::argument(format!(
                "Unknown restriction estimator {} of operator {}",
                name, operator
            ))),
        }
    }

    /// Estimates selectivity of a join condition with the given operator using the operator's join estimator.
    /// If the operator has no join estimator returns [DEFAULT_SELECTIVITY].
    pub fn join_selectivity(
        &self,
        operator: &Operator,
        left: &ColumnRef,
        right: &ColumnRef,
        join_type: JoinType,
    ) -> Result<f64, SelectivityError> {
        let name = match operator.join_estimator() {
            Some(name) => name,
            None => return Ok(DEFAULT_SELECTIVITY),
        };
        match self.join.get(name) {
            Some(estimator) => {
                let selectivity = estimator.join_selectivity(operator, left, right, join_type)?;
                Ok(clamp_probability(selectivity))
            }
            None => Err(SelectivityError::argument(format!(
                "Unknown join estimator {} of operator {}",
                name, operator
            ))),
        }
    }
}

impl Default for SelectivityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SelectivityRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectivityRegistry")
            .field("restriction", &self.restriction.keys().sorted().collect::<Vec<_>>())
            .field("join", &self.join.keys().sorted().collect::<Vec<_>>())
            .finish()
    }
}

//! Database catalog.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::datatypes::DataType;
use crate::error::SelectivityError;
use crate::range::SerializedRange;

pub mod mutable;

pub type CatalogRef = Arc<dyn Catalog>;
pub type SchemaRef = Arc<dyn Schema>;
pub type TableRef = Arc<Table>;
pub type ColumnRef = Arc<Column>;
pub type ColumnStatisticsRef = triomphe::Arc<ColumnStatistics>;

/// Provides access to database objects and their statistics.
pub trait Catalog: Debug + Sync + Send {
    /// Returns this catalog as [`Any`](std::any::Any) in order it can be downcast to its implementation.
    fn as_any(&self) -> &dyn Any;

    /// Returns an iterator over schemas available in the catalog.
    fn get_schemas(&self) -> Vec<SchemaRef>;

    /// Returns a schema with the given name.
    fn get_schema_by_name(&self, name: &str) -> Option<SchemaRef>;

    /// Returns a table with the given name registered in the default schema.
    fn get_table(&self, name: &str) -> Option<TableRef>;
}

/// The name of default schema.
pub const DEFAULT_SCHEMA: &str = "default";

/// Represents a database schema.
pub trait Schema: Debug + Sync + Send {
    /// Returns this schema as [`Any`](std::any::Any) in order it can be downcast to its implementation.
    fn as_any(&self) -> &dyn Any;

    /// Returns an iterator over tables registered in this schema.
    fn get_tables(&self) -> Vec<TableRef>;

    /// Returns a table with the given name.
    fn get_table_by_name(&self, name: &str) -> Option<TableRef>;
}

/// Represents a database table.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<ColumnRef>,
    statistics: Option<TableStatistics>,
}

impl Table {
    /// The name of this table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The columns of this table.
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    /// Returns a column with the given name.
    pub fn get_column(&self, name: &str) -> Option<ColumnRef> {
        self.columns.iter().find(|c| c.name == name).cloned()
    }

    /// Returns statistics available for this table.
    pub fn statistics(&self) -> Option<&TableStatistics> {
        self.statistics.as_ref()
    }
}

/// Statistics for a database table.
#[derive(Debug, Clone, Default)]
pub struct TableStatistics {
    row_count: Option<usize>,
    columns: HashMap<String, ColumnStatisticsRef>,
}

impl TableStatistics {
    /// Creates a new table statistics object.
    pub fn new(row_count: usize) -> Self {
        TableStatistics {
            row_count: Some(row_count),
            columns: HashMap::new(),
        }
    }

    /// The total number of rows in a table.
    pub fn row_count(&self) -> Option<usize> {
        self.row_count
    }

    /// Returns statistics collected for the given column.
    pub fn column(&self, name: &str) -> Option<ColumnStatisticsRef> {
        self.columns.get(name).cloned()
    }
}

/// Statistics for a column of a range type.
#[derive(Debug, Clone)]
pub struct ColumnStatistics {
    trusted: bool,
    bounds_histogram: Option<Vec<SerializedRange>>,
}

impl ColumnStatistics {
    /// Whether the values these statistics were collected from are visible to the current user.
    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    /// The stored bounds histogram. `None` if the histogram has not been collected.
    pub fn bounds_histogram(&self) -> Option<&[SerializedRange]> {
        self.bounds_histogram.as_deref()
    }
}

/// A builder to create instances of [ColumnStatistics].
#[derive(Debug, Clone)]
pub struct ColumnStatisticsBuilder {
    trusted: bool,
    bounds_histogram: Option<Vec<SerializedRange>>,
}

impl ColumnStatisticsBuilder {
    /// Creates a builder for trusted statistics without a bounds histogram.
    pub fn new() -> Self {
        ColumnStatisticsBuilder {
            trusted: true,
            bounds_histogram: None,
        }
    }

    /// Marks these statistics as trusted or untrusted.
    pub fn trusted(mut self, trusted: bool) -> Self {
        self.trusted = trusted;
        self
    }

    /// Sets the bounds histogram.
    pub fn bounds_histogram(mut self, histogram: Vec<SerializedRange>) -> Self {
        self.bounds_histogram = Some(histogram);
        self
    }

    /// Creates an instance of [ColumnStatistics].
    pub fn build(self) -> ColumnStatistics {
        ColumnStatistics {
            trusted: self.trusted,
            bounds_histogram: self.bounds_histogram,
        }
    }
}

impl Default for ColumnStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A builder to create instances of a [table].
///
/// [table]: crate::catalog::Table
#[derive(Debug, Clone)]
pub struct TableBuilder {
    name: String,
    columns: Vec<ColumnRef>,
    row_count: Option<usize>,
    column_statistics: Vec<(String, ColumnStatistics)>,
}

impl TableBuilder {
    /// Creates a builder for a table the given name.
    pub fn new(name: &str) -> Self {
        TableBuilder {
            name: name.to_string(),
            columns: Vec::new(),
            row_count: None,
            column_statistics: Vec::new(),
        }
    }

    /// Creates a builder from the given table.
    pub fn from_table(table: &Table) -> Self {
        let mut table_builder = TableBuilder::new(table.name.as_str());
        table_builder.columns = table.columns.clone();

        if let Some(statistics) = table.statistics.as_ref() {
            table_builder.row_count = statistics.row_count;
            table_builder.column_statistics = statistics
                .columns
                .iter()
                .map(|(name, stats)| (name.clone(), ColumnStatistics::clone(stats)))
                .collect();
        }
        table_builder
    }

    /// Adds a column with the given name and data type to this table.
    pub fn add_column(mut self, name: &str, data_type: DataType) -> TableBuilder {
        let column = Column::new(name.to_string(), Some(self.name.clone()), data_type);
        self.columns.push(Arc::new(column));
        self
    }

    /// Sets row count statistics for this table.
    pub fn add_row_count(mut self, row_count: usize) -> TableBuilder {
        self.row_count = Some(row_count);
        self
    }

    /// Sets statistics of the given column. Replaces statistics set earlier.
    pub fn add_column_statistics(mut self, column: &str, statistics: ColumnStatistics) -> TableBuilder {
        self.column_statistics.retain(|(name, _)| name != column);
        self.column_statistics.push((column.to_string(), statistics));
        self
    }

    /// Creates an instance of a [table] with previously specified properties.
    ///
    /// [table]: crate::catalog::Table
    pub fn build(self) -> Result<Table, SelectivityError> {
        if self.columns.is_empty() {
            return Err(SelectivityError::argument("No columns has been specified"));
        }

        let mut names = HashSet::new();
        for col in self.columns.iter() {
            let col_name = col.name();
            if !names.insert(col_name) {
                let message = format!("Column already exists. Column: {} table: {}", col_name, self.name);
                return Err(SelectivityError::argument(message));
            }
        }

        let mut columns = HashMap::new();
        for (name, stats) in self.column_statistics {
            if !names.contains(name.as_str()) {
                let message = format!("Statistics for unknown column. Column: {} table: {}", name, self.name);
                return Err(SelectivityError::argument(message));
            }
            columns.insert(name, triomphe::Arc::new(stats));
        }

        let statistics = if self.row_count.is_some() || !columns.is_empty() {
            Some(TableStatistics {
                row_count: self.row_count,
                columns,
            })
        } else {
            None
        };

        Ok(Table {
            name: self.name,
            columns: self.columns,
            statistics,
        })
    }
}

/// A column of a database table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    table: Option<String>,
    data_type: DataType,
}

impl Column {
    pub(crate) fn new(column_name: String, table_name: Option<String>, data_type: DataType) -> Self {
        Column {
            name: column_name,
            table: table_name,
            data_type,
        }
    }

    /// The name of this column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the table this column belongs to.
    /// If table is not specified then this column is derived from some expression.
    pub fn table(&self) -> Option<&String> {
        self.table.as_ref()
    }

    /// The data type of this column.
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }
}

pub(crate) fn __ensure_type_is_sync_send<T>()
where
    T: Sync + Send,
{
}

#[allow(dead_code)]
fn __type_system_guarantees() {
    __ensure_type_is_sync_send::<Table>();
    __ensure_type_is_sync_send::<ColumnStatistics>();
    __ensure_type_is_sync_send::<ColumnStatisticsRef>();
}

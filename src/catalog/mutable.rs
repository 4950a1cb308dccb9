//! Mutable implementation of a database catalog.

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::catalog::{
    Catalog, ColumnStatistics, Schema, SchemaRef, Table, TableBuilder, TableRef, __ensure_type_is_sync_send,
    DEFAULT_SCHEMA,
};
use crate::error::SelectivityError;

/// A [database catalog] that stores database objects and their statistics in memory
/// and provides operation to add/remove database objects.
///
/// # Error handling
///
/// Errors returned by methods of the `MutableCatalog` are recoverable.
///
/// [database catalog]: crate::catalog::Catalog
#[derive(Debug)]
pub struct MutableCatalog {
    schemas: RwLock<HashMap<ObjectId, SchemaRef>>,
}

impl MutableCatalog {
    /// Creates a instance of [MutableCatalog].
    pub fn new() -> Self {
        MutableCatalog {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Adds the given table to the specified schema.
    /// If such schema does not exists creates one.
    /// If the table already exists this method returns an error.
    pub fn add_table(&self, schema: &str, table: Table) -> Result<(), SelectivityError> {
        let mut schemas = self.schemas.write().unwrap();
        match schemas.entry(ObjectId::from(schema)) {
            Entry::Occupied(o) => {
                let schema = MutableSchema::from_ref(o.get())?;
                schema.add_table(table)
            }
            Entry::Vacant(v) => {
                let schema_ref = Arc::new(MutableSchema::new());
                v.insert(schema_ref.clone());
                schema_ref.add_table(table)
            }
        }
    }

    /// Remove a database table with name `table` from the specified schema.
    /// If the schema or the table do not exist this method returns an error.
    pub fn remove_table(&self, schema: &str, table: &str) -> Result<(), SelectivityError> {
        let schemas = self.schemas.read().unwrap();
        match schemas.get(&ObjectId::from(schema)) {
            Some(schema) => MutableSchema::from_ref(schema)?.remove_table(table),
            None => Err(SelectivityError::argument(format!("Schema does not exist. Schema: {}", schema))),
        }
    }

    /// Replaces statistics of the given column of a table from the specified schema.
    /// Statistics already handed out to callers remain unchanged.
    pub fn set_column_statistics(
        &self,
        schema: &str,
        table: &str,
        column: &str,
        statistics: ColumnStatistics,
    ) -> Result<(), SelectivityError> {
        let schemas = self.schemas.read().unwrap();
        match schemas.get(&ObjectId::from(schema)) {
            Some(schema) => MutableSchema::from_ref(schema)?.set_column_statistics(table, column, statistics),
            None => Err(SelectivityError::argument(format!("Schema does not exist. Schema: {}", schema))),
        }
    }
}

impl Default for MutableCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for MutableCatalog {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn get_schemas(&self) -> Vec<SchemaRef> {
        let schemas = self.schemas.read().unwrap();
        schemas.values().cloned().collect()
    }

    fn get_schema_by_name(&self, name: &str) -> Option<SchemaRef> {
        let schemas = self.schemas.read().unwrap();
        schemas.get(&ObjectId::from(name)).cloned()
    }

    fn get_table(&self, name: &str) -> Option<TableRef> {
        let schemas = self.schemas.read().unwrap();
        schemas.get(&ObjectId::from(DEFAULT_SCHEMA)).and_then(|s| s.get_table_by_name(name))
    }
}

/// A [database schema](Schema) that stores object in memory and provides operation to add/remove database objects.
///
/// # Error handling
///
/// Errors returned by methods of the `MutableSchema` are recoverable.
#[derive(Debug)]
pub struct MutableSchema {
    tables: RwLock<HashMap<ObjectId, TableRef>>,
}

impl MutableSchema {
    fn new() -> Self {
        MutableSchema {
            tables: RwLock::new(HashMap::new()),
        }
    }

    fn from_ref(schema: &SchemaRef) -> Result<&MutableSchema, SelectivityError> {
        schema
            .as_any()
            .downcast_ref::<MutableSchema>()
            .ok_or_else(|| SelectivityError::internal(format!("Unable to downcast to MutableSchema: {:?}", schema)))
    }

    /// Adds the given table to this schema. if a table with the same name already exists this method
    /// return an error.
    pub fn add_table(&self, table: Table) -> Result<(), SelectivityError> {
        let mut tables = self.tables.write().unwrap();
        let table_id = ObjectId::from(table.name());
        match tables.entry(table_id) {
            Entry::Occupied(_) => {
                Err(SelectivityError::argument(format!("Add table: Table already exists. Table: {}", table.name())))
            }
            Entry::Vacant(v) => {
                v.insert(Arc::new(table));
                Ok(())
            }
        }
    }

    /// Remove a table with the give name. If the table does not exist this method returns an error.
    pub fn remove_table(&self, name: &str) -> Result<(), SelectivityError> {
        let mut tables = self.tables.write().unwrap();
        if tables.remove(&ObjectId::from(name)).is_some() {
            Ok(())
        } else {
            Err(SelectivityError::argument(format!("Remove table: Table does not exist. Table: {}", name)))
        }
    }

    /// Replaces statistics of the given column. The table is replaced with a copy so
    /// readers holding the previous version observe a consistent snapshot.
    pub fn set_column_statistics(
        &self,
        table: &str,
        column: &str,
        statistics: ColumnStatistics,
    ) -> Result<(), SelectivityError> {
        let mut tables = self.tables.write().unwrap();
        match tables.get_mut(&ObjectId::from(table)) {
            Some(table_ref) => {
                let table = TableBuilder::from_table(table_ref).add_column_statistics(column, statistics).build()?;
                *table_ref = Arc::new(table);
                Ok(())
            }
            None => Err(SelectivityError::argument(format!("Set statistics: Table does not exist. Table: {}", table))),
        }
    }
}

impl Schema for MutableSchema {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn get_tables(&self) -> Vec<TableRef> {
        let tables = self.tables.read().unwrap();
        tables.values().cloned().collect()
    }

    fn get_table_by_name(&self, name: &str) -> Option<TableRef> {
        let tables = self.tables.read().unwrap();
        tables.get(&ObjectId::from(name)).cloned()
    }
}

#[derive(Debug, Eq, PartialEq, Hash)]
struct ObjectId {
    id: CaseInsensitiveString,
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        ObjectId {
            id: CaseInsensitiveString(String::from(id)),
        }
    }
}

#[derive(Debug)]
struct CaseInsensitiveString(String);

impl PartialEq for CaseInsensitiveString {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for CaseInsensitiveString {}

impl Hash for CaseInsensitiveString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.0.as_bytes() {
            c.to_ascii_lowercase().hash(state)
        }
    }
}

#[allow(dead_code)]
fn __type_system_guarantees() {
    __ensure_type_is_sync_send::<MutableCatalog>();
    __ensure_type_is_sync_send::<MutableSchema>();
}

//! Registry of entities installed on a [`Store`](crate::Store).
//!
//! Every entity module submits an [`EntityInfo`] through [`inventory`] at link
//! time, so a store can discover and create all tables without a hand-kept
//! list. Once a table exists its schema is recorded in the [`SchemaRegistry`],
//! which the transport layer uses to answer "which resources exist".

use std::collections::HashMap;
use std::sync::RwLock;

use sea_orm::DatabaseBackend;

use crate::schema::EntitySchema;

/// Link-time description of one entity.
pub struct EntityInfo {
    /// The `module_path!()` of the entity, used for prefix matching.
    pub module_path: &'static str,
    pub schema: &'static EntitySchema,
    /// Generates the `CREATE TABLE IF NOT EXISTS` statement for a backend.
    pub create_table_fn: fn(DatabaseBackend) -> String,
}

inventory::collect!(EntityInfo);

/// All submitted entities whose module path starts with `prefix`, ordered by
/// resource name. An empty prefix matches everything.
pub fn discover(prefix: &str) -> Vec<&'static EntityInfo> {
    let prefix = normalize_prefix(prefix);
    let mut found: Vec<&'static EntityInfo> = inventory::iter::<EntityInfo>
        .into_iter()
        .filter(|info| info.module_path.starts_with(prefix.as_str()))
        .collect();
    found.sort_by_key(|info| info.schema.name);
    found
}

/// Trims a trailing `::*` or `::` and turns a crate name with hyphens into
/// its module form.
fn normalize_prefix(prefix: &str) -> String {
    let p = prefix.trim_end_matches('*').trim_end_matches("::");
    match p.split_once("::") {
        Some((krate, rest)) => format!("{}::{}", krate.replace('-', "_"), rest),
        None => p.replace('-', "_"),
    }
}

/// Schemas of the tables that exist in a store.
///
/// Thread-safe via interior `RwLock`; shared between the store and every
/// handle cloned from it.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    tables: RwLock<HashMap<&'static str, &'static EntitySchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Record an installed schema. Replaces any entry with the same name.
    pub fn register(&self, schema: &'static EntitySchema) {
        self.tables.write().unwrap().insert(schema.name, schema);
    }

    pub fn get(&self, name: &str) -> Option<&'static EntitySchema> {
        self.tables.read().unwrap().get(name).copied()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.tables.read().unwrap().contains_key(name)
    }

    /// All installed schemas, ordered by name.
    pub fn all(&self) -> Vec<&'static EntitySchema> {
        let mut all: Vec<_> = self.tables.read().unwrap().values().copied().collect();
        all.sort_by_key(|schema| schema.name);
        all
    }
}

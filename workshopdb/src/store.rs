use std::sync::Arc;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr,
    Schema,
};

use crate::registry::{self, SchemaRegistry};
use crate::repository::{Repository, Resource};
use crate::schema::EntitySchema;

/// Handle to the relational store.
///
/// Cheap to clone; every clone shares the same connection pool and
/// [`SchemaRegistry`]. Repositories are handed out per entity with
/// [`Store::repo`], so callers receive an explicit handle instead of reaching
/// for a global client.
#[derive(Clone)]
pub struct Store {
    inner: DatabaseConnection,
    registry: Arc<SchemaRegistry>,
}

impl Store {
    /// Wrap an existing connection. Tables are not created; call
    /// [`Store::install_registered_entities`] or [`Store::schema`].
    pub fn from_connection(inner: DatabaseConnection) -> Self {
        Self {
            inner,
            registry: Arc::new(SchemaRegistry::new()),
        }
    }

    /// Get a reference to the underlying SeaORM connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.inner
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Repository handle for one entity.
    pub fn repo<R: Resource>(&self) -> Repository<R> {
        Repository::new(self.inner.clone())
    }

    /// Start building the schema by hand.
    ///
    /// ```ignore
    /// store.schema()
    ///     .register::<task::Entity>()
    ///     .register::<contact::Entity>()
    ///     .install()
    ///     .await?;
    /// ```
    pub fn schema(&self) -> SchemaBuilder<'_> {
        SchemaBuilder {
            store: self,
            entries: Vec::new(),
        }
    }

    /// Build a [`SchemaBuilder`] holding every submitted entity whose module
    /// path starts with `prefix`.
    pub fn get_schema_registry(&self, prefix: &str) -> SchemaBuilder<'_> {
        let mut builder = self.schema();
        let backend = self.inner.get_database_backend();
        for info in registry::discover(prefix) {
            builder.entries.push(EntityEntry {
                create_sql: (info.create_table_fn)(backend),
                schema: info.schema,
            });
        }
        builder
    }

    /// Create the tables of all entities defined in this crate.
    pub async fn install_registered_entities(&self) -> Result<(), DbErr> {
        self.get_schema_registry(env!("CARGO_CRATE_NAME"))
            .install()
            .await
    }
}

/// Generate `CREATE TABLE IF NOT EXISTS` for an entity from its SeaORM
/// definition, rendered in the dialect of `backend`. On SQLite,
/// auto-increment primary keys come out as `AUTOINCREMENT`, so ids are never
/// reused.
pub fn create_table_sql<R: Resource>(backend: DatabaseBackend) -> String {
    let schema = Schema::new(backend);
    let statement = schema
        .create_table_from_entity(R::Entity::default())
        .if_not_exists()
        .to_owned();
    backend.build(&statement).sql
}

/// Collects entity registrations, then creates all tables in
/// [`install()`](SchemaBuilder::install).
pub struct SchemaBuilder<'a> {
    store: &'a Store,
    entries: Vec<EntityEntry>,
}

struct EntityEntry {
    create_sql: String,
    schema: &'static EntitySchema,
}

impl SchemaBuilder<'_> {
    pub fn register<R: Resource>(mut self) -> Self {
        let backend = self.store.inner.get_database_backend();
        self.entries.push(EntityEntry {
            create_sql: create_table_sql::<R>(backend),
            schema: R::schema(),
        });
        self
    }

    pub async fn install(self) -> Result<(), DbErr> {
        for entry in self.entries {
            self.store.inner.execute_unprepared(&entry.create_sql).await?;
            log::debug!("installed table {}", entry.schema.table);
            self.store.registry.register(entry.schema);
        }
        Ok(())
    }
}

/// Builder for [`Store`].
pub struct StoreBuilder {
    database_url: String,
    max_connections: Option<u32>,
    install_schema: bool,
}

impl StoreBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            database_url: url.to_string(),
            max_connections: None,
            install_schema: true,
        }
    }

    pub fn with_max_connections(mut self, n: u32) -> Self {
        self.max_connections = Some(n);
        self
    }

    /// Skip creating the entity tables on build.
    pub fn without_schema(mut self) -> Self {
        self.install_schema = false;
        self
    }

    pub async fn build(self) -> Result<Store, DbErr> {
        let mut opts = ConnectOptions::new(&self.database_url);
        // Every pooled connection to `sqlite::memory:` is a separate database.
        let in_memory = self.database_url.contains(":memory:");
        if let Some(n) = self.max_connections.or(in_memory.then_some(1)) {
            opts.max_connections(n);
        }
        opts.sqlx_logging_level(log::LevelFilter::Debug);

        let inner = Database::connect(opts).await?;
        log::info!("connected to {}", self.database_url);

        let store = Store::from_connection(inner);
        if self.install_schema {
            store.install_registered_entities().await?;
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::task;

    #[test]
    fn test_create_table_sql_renders_for_backend() {
        let sql = create_table_sql::<task::Entity>(DatabaseBackend::Sqlite);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"tasks\""), "{sql}");
        assert!(sql.contains("\"created_at\""), "{sql}");
        assert!(sql.contains("AUTOINCREMENT"), "{sql}");
    }

    #[tokio::test]
    async fn test_build_installs_every_table() {
        let store = StoreBuilder::new("sqlite::memory:").build().await.unwrap();
        let names: Vec<_> = store.registry().all().iter().map(|s| s.table).collect();
        assert_eq!(names, ["contacts", "products", "tasks"]);
        let sql = create_table_sql::<task::Entity>(store.connection().get_database_backend());
        store.connection().execute_unprepared(&sql).await.unwrap();
    }
}

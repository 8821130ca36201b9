//! # WorkshopDB
//!
//! Storage and view logic for a small CRUD workbench with three independent
//! entities: tasks, contacts and products.
//!
//! Every entity is reached through the same [`CrudRepository`] contract
//! (`find`, `get`, `insert`, `save`, `delete`, `count`) backed by SeaORM over
//! SQLite. Filtering beyond field equality, sorting by derived keys and form
//! validation run in memory on loaded records.
//!
//! ## Quick start
//!
//! ```ignore
//! use workshopdb::{CrudRepository, FindOptions, StoreBuilder, entity::task};
//!
//! let store = StoreBuilder::new("sqlite:./mydb.sqlite?mode=rwc").build().await?;
//! workshopdb::seed::seed_products(&store.repo::<workshopdb::entity::product::Entity>()).await?;
//!
//! let tasks = store.repo::<task::Entity>();
//! tasks.insert(task::Draft { title: "Ship report".into(), ..Default::default() }).await?;
//! let all = tasks.find(FindOptions::all()).await?;
//! ```
//!
//! ## Key types
//!
//! - [`Store`] / [`StoreBuilder`]: connection handle and table installation
//! - [`CrudRepository`] / [`Repository`]: the generic persistence contract
//! - [`Resource`]: ties a SeaORM entity to its schema and draft type
//! - [`pages`]: headless controllers for the task, contact and product views

pub mod entity;
pub mod pages;
pub mod query;
pub mod registry;
pub mod repository;
pub mod schema;
pub mod seed;
pub mod store;
pub mod validation;

pub use registry::{EntityInfo, SchemaRegistry};
pub use repository::{
    CrudRepository, Direction, Filter, FindOptions, RepoError, Repository, Resource,
};
pub use schema::{EntitySchema, FieldDef, FieldKind, FieldValue, SchemaError};
pub use store::{SchemaBuilder, Store, StoreBuilder};

// Re-export sea-orm for users of the library
pub use sea_orm;

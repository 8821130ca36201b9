//! The generic CRUD contract shared by every entity.
//!
//! [`CrudRepository`] is the whole persistence surface: `find`, `get`,
//! `insert`, `save`, `delete` and `count`, identical for tasks, contacts and
//! products. [`Repository`] implements it on top of SeaORM.
//!
//! Callers keep no cached copies: every mutation is awaited and followed by a
//! full `find` reload (read-after-write, no caching).

use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, IdenStatic, IntoActiveModel, Iterable, ModelTrait,
    Order, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::schema::{EntitySchema, FieldValue, SchemaError};

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),

    #[error("{entity} record with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Describes one entity to the generic repository.
///
/// Implemented on each SeaORM `Entity` in [`crate::entity`].
pub trait Resource: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, ActiveModel = Self::ActiveModel>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Serialize
        + Clone
        + Send
        + Sync
        + 'static;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + Sync
        + 'static;
    /// Partial record accepted by insert and save.
    type Draft: DeserializeOwned + Serialize + Default + Clone + Send + Sync + 'static;

    fn schema() -> &'static EntitySchema;

    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    fn id_of(model: &Self::Model) -> i32;

    /// Active model for a fresh insert: id left to the store, server-set
    /// fields stamped with `now`.
    fn new_active(draft: Self::Draft, now: DateTime<Utc>) -> Self::ActiveModel;

    /// Active model replacing every mutable field of `current`; server-set
    /// fields keep their stored values.
    fn replace_active(current: Self::Model, draft: Self::Draft) -> Self::ActiveModel;

    fn to_draft(model: &Self::Model) -> Self::Draft;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(format!("unknown sort direction `{other}`")),
        }
    }
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        }
    }
}

/// Conjunction of `field = value` terms. Field names are wire names or
/// column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    terms: Vec<(String, FieldValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.terms.push((field.into(), value.into()));
        self
    }

    pub fn push(&mut self, field: impl Into<String>, value: FieldValue) {
        self.terms.push((field.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[(String, FieldValue)] {
        &self.terms
    }
}

/// Options for [`CrudRepository::find`]. No pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub filter: Filter,
    pub order_by: Vec<(String, Direction)>,
}

impl FindOptions {
    /// Everything, in store order.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filter = self.filter.eq(field, value);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }
}

impl From<Filter> for FindOptions {
    fn from(filter: Filter) -> Self {
        Self {
            filter,
            order_by: Vec::new(),
        }
    }
}

/// The persistence contract, identical for every entity.
#[async_trait::async_trait]
pub trait CrudRepository<R: Resource>: Send + Sync {
    /// All records matching the filter, in the requested order. Without an
    /// order the store order (ascending id) is used.
    async fn find(&self, options: FindOptions) -> Result<Vec<R::Model>, RepoError>;

    async fn get(&self, id: i32) -> Result<R::Model, RepoError>;

    /// Insert a new record; the store assigns the id.
    async fn insert(&self, draft: R::Draft) -> Result<R::Model, RepoError>;

    /// Replace every mutable field of the record with `id`. Fails with
    /// [`RepoError::NotFound`] when no such record exists; there is no upsert.
    async fn save(&self, id: i32, draft: R::Draft) -> Result<R::Model, RepoError>;

    async fn delete(&self, id: i32) -> Result<(), RepoError>;

    async fn count(&self, filter: Filter) -> Result<u64, RepoError>;
}

/// SeaORM-backed [`CrudRepository`].
pub struct Repository<R> {
    db: DatabaseConnection,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Repository<R> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _resource: PhantomData,
        }
    }

    fn column(name: &str) -> Result<<R::Entity as EntityTrait>::Column, SchemaError> {
        let schema = R::schema();
        let field = schema.require_field(name)?;
        <R::Entity as EntityTrait>::Column::iter()
            .find(|c| IdenStatic::as_str(c) == field.column)
            .ok_or_else(|| SchemaError::UnknownField {
                entity: schema.name,
                field: name.to_string(),
            })
    }

    fn condition(filter: &Filter) -> Result<Condition, SchemaError> {
        let schema = R::schema();
        let mut condition = Condition::all();
        for (name, value) in filter.terms() {
            let field = schema.require_field(name)?;
            let value = field.check(value.clone())?;
            let column = Self::column(name)?;
            condition = condition.add(column.eq(sea_orm::Value::from(value)));
        }
        Ok(condition)
    }

    fn not_found(id: i32) -> RepoError {
        log::warn!("{} record {id} not found", R::schema().name);
        RepoError::NotFound {
            entity: R::schema().name,
            id,
        }
    }
}

#[async_trait::async_trait]
impl<R: Resource> CrudRepository<R> for Repository<R> {
    async fn find(&self, options: FindOptions) -> Result<Vec<R::Model>, RepoError> {
        let mut query = R::Entity::find().filter(Self::condition(&options.filter)?);
        for (name, direction) in &options.order_by {
            query = query.order_by(Self::column(name)?, Order::from(*direction));
        }
        // Equal sort keys fall back to id so reloads keep a stable order.
        let tiebreak = options
            .order_by
            .first()
            .map(|(_, direction)| *direction)
            .unwrap_or_default();
        query = query.order_by(R::id_column(), Order::from(tiebreak));

        let rows = query.all(&self.db).await?;
        log::debug!("find {} -> {} rows", R::schema().name, rows.len());
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<R::Model, RepoError> {
        R::Entity::find()
            .filter(R::id_column().eq(id))
            .one(&self.db)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn insert(&self, draft: R::Draft) -> Result<R::Model, RepoError> {
        let model = R::new_active(draft, Utc::now()).insert(&self.db).await?;
        log::debug!("inserted {} {}", R::schema().name, R::id_of(&model));
        Ok(model)
    }

    async fn save(&self, id: i32, draft: R::Draft) -> Result<R::Model, RepoError> {
        let current = self.get(id).await?;
        match R::replace_active(current, draft).update(&self.db).await {
            Ok(model) => {
                log::debug!("saved {} {id}", R::schema().name);
                Ok(model)
            }
            // Deleted between the lookup and the update.
            Err(DbErr::RecordNotUpdated) => Err(Self::not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let result = R::Entity::delete_many()
            .filter(R::id_column().eq(id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }
        log::debug!("deleted {} {id}", R::schema().name);
        Ok(())
    }

    async fn count(&self, filter: Filter) -> Result<u64, RepoError> {
        let count = R::Entity::find()
            .filter(Self::condition(&filter)?)
            .count(&self.db)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_str() {
        assert_eq!("asc".parse::<Direction>(), Ok(Direction::Asc));
        assert_eq!("DESC".parse::<Direction>(), Ok(Direction::Desc));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_find_options_builder() {
        let options = FindOptions::all()
            .where_eq("completed", false)
            .order_by("createdAt", Direction::Desc);
        assert_eq!(
            options.filter.terms(),
            &[("completed".to_string(), FieldValue::Boolean(false))]
        );
        assert_eq!(options.order_by, vec![("createdAt".to_string(), Direction::Desc)]);
        assert!(FindOptions::all().filter.is_empty());
    }
}

//! The three record types of the workshop app.
//!
//! Each module holds a SeaORM entity, the `Draft` accepted by insert and save,
//! the static [`EntitySchema`](crate::schema::EntitySchema) and its
//! [`Resource`](crate::repository::Resource) impl. Entities have no relations
//! to each other.

pub mod contact;
pub mod product;
pub mod task;

pub use task::Priority;

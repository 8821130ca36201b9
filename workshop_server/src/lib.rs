//! HTTP front end of the workshop store.
//!
//! [`api::router`] exposes every entity of a [`workshopdb::Store`] under
//! `/api`; [`config::Config`] holds the command line and environment settings
//! of the `workshop-server` binary.

pub mod api;
pub mod config;

pub use api::{ApiError, router};
pub use config::Config;

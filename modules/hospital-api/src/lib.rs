//! Hospital dashboard API module.
//!
//! Layered the usual way: `api/rest` owns the HTTP surface (DTOs, handlers,
//! routes, auth middleware), `domain` owns models, errors and the service,
//! and `infra/storage` owns the SeaORM entities and migrations.

pub mod api;
pub mod domain;
pub mod infra;

//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user and linktree repository ports backed
//! by PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - Repository implementations only translate between Diesel rows and domain
//!   types.
//! - Row structs (`models.rs`) and the schema (`schema.rs`) stay private to
//!   this module.
//! - Every database error is mapped to the port's persistence error.
//!
//! ```ignore
//! use linktree::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! run_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! ```

mod diesel_basic_error_mapping;
mod diesel_linktree_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_linktree_repository::DieselLinktreeRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel and pool failures map onto each
//!   port's error enum.
//!
//! # Example
//!
//! ```ignore
//! use complaints::outbound::persistence::{
//!     DieselUserRepository, PoolConfig, RetryPolicy, connect_with_retry,
//! };
//!
//! let pool = connect_with_retry(PoolConfig::new(url), RetryPolicy::default()).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_assignment_repository;
mod diesel_basic_error_mapping;
mod diesel_complaint_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_assignment_repository::DieselAssignmentRepository;
pub use diesel_complaint_repository::DieselComplaintRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError, RetryPolicy, connect_with_retry, retry_with_backoff};

//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local repositories, the default without a database
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **security**: Argon2id password hashing
//! - **session**: server-side session storage
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
pub mod session;

//! In-memory repository adapters.
//!
//! These back the application when no database is configured and in tests.
//! State lives for the life of the process and is shared between clones.

mod assignments;
mod complaints;
mod users;

pub use assignments::InMemoryAssignmentRepository;
pub use complaints::InMemoryComplaintRepository;
pub use users::InMemoryUserRepository;

use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

/// Describe a poisoned lock for the `Query` variant of a port error.
fn poisoned<T>(_: PoisonError<T>) -> String {
    "in-memory store lock poisoned".to_owned()
}

type ReadResult<'a, T> = Result<RwLockReadGuard<'a, T>, String>;
type WriteResult<'a, T> = Result<RwLockWriteGuard<'a, T>, String>;

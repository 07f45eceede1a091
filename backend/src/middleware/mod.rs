//! Request middleware.
//!
//! Purpose: cross-cutting request concerns that sit outside the handlers:
//! trace identifiers with completion logging, and per-client throttling.

pub mod rate_limit;
pub mod trace;

pub use rate_limit::{RateLimit, RateLimitPolicy};
pub use trace::Trace;

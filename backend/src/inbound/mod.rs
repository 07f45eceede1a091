//! Inbound adapters translating browser requests into domain service calls.
//!
//! Framework details stay at this edge; the domain never sees actix types.

pub mod http;

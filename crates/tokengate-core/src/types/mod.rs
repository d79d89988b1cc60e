//! Shared value types.

pub mod ttl;

pub use ttl::{TokenTtl, TtlUnit};

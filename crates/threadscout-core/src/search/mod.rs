//! Evidence gathering across providers
//!
//! Provides:
//! - Concurrent fan-out with per-provider timeouts
//! - Results merged in configured provider order

mod fan_out;

pub use fan_out::{FanOut, DEFAULT_PROVIDER_TIMEOUT};

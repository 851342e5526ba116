//! Shared utilities for solsend.

pub mod display;
pub mod logging;

pub use display::{format_age, short_address};
pub use logging::{init_logging, LogFormat};

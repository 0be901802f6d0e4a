//! Utility functions module
//!
//! Contains helpers for clock formatting, lenient number parsing and
//! duration parsing.

pub mod units;

// Re-export commonly used functions
pub use units::{
    coerce_count, coerce_number, format_clock, format_delta, format_duration, parse_duration,
    parse_leading_number,
};

//! HTTP protocol layer.
//!
//! Content-type mapping, conditional requests, byte ranges and response
//! builders, independent of the file resolution logic that drives them.

pub mod cond;
pub mod mime;
pub mod range;
pub mod response;

pub use range::{evaluate_range, RangeOutcome};

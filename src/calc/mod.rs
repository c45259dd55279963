//! Pure funding, reward and status arithmetic.
//!
//! Nothing in here touches the database, the network or the clock; every
//! function is deterministic in its inputs so handlers and the worker can
//! recompute freely.

pub mod funding;
pub mod rewards;
pub mod status;

pub use funding::*;
pub use rewards::*;
pub use status::*;

/// Collapse negative, NaN and infinite inputs to zero.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

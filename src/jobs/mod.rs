pub mod funding_sync;

pub use funding_sync::{run_funding_sync, FundingSyncReport};

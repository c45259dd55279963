// Export all route modules
pub mod artists;
pub mod patents;
pub mod projects;
pub mod staking;

// Re-export all route handlers for easy importing
pub use artists::*;
pub use patents::*;
pub use projects::*;
pub use staking::*;

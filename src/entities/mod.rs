pub mod artists;
pub mod patents;
pub mod projects;
pub mod staking_pools;

pub use artists::Entity as Artists;
pub use patents::Entity as Patents;
pub use projects::Entity as Projects;
pub use staking_pools::Entity as StakingPools;

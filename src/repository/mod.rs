//! Table access for artists, projects, staking pools and patents.
//!
//! Lists come back newest first. Counter columns are bumped with a single
//! `SET col = col + ?` statement so concurrent writers never lose an update.

pub mod artists;
pub mod patents;
pub mod projects;
pub mod staking_pools;

pub use artists::{ArtistsRepository, NewArtist};
pub use patents::{NewPatent, PatentFilter, PatentsRepository};
pub use projects::{NewProject, ProjectChanges, ProjectFilter, ProjectsRepository};
pub use staking_pools::{NewStakingPool, StakingPoolsRepository};

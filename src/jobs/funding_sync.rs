//! Advances published projects to funded once recorded plus on-chain funding
//! reaches their target.

use sea_orm::DatabaseConnection;

use crate::calc::ProjectStatus;
use crate::clients::ChainClient;
use crate::error::AppError;
use crate::funding;
use crate::repository::ProjectsRepository;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FundingSyncReport {
    pub checked: usize,
    /// Projects moved from published to funded in this run
    pub advanced: Vec<i32>,
}

pub async fn run_funding_sync(
    db: &DatabaseConnection,
    chain: Option<&ChainClient>,
) -> Result<FundingSyncReport, AppError> {
    let projects = ProjectsRepository::list_published(db).await?;
    let mut report = FundingSyncReport::default();

    for project in projects {
        report.checked += 1;
        let (snapshot, onchain_available) = funding::project_funding(chain, &project).await;
        tracing::debug!(
            "Project {} at {:.1}% (on-chain read: {})",
            project.id,
            snapshot.percentage,
            onchain_available
        );

        if !snapshot.is_fully_funded() {
            continue;
        }

        match ProjectsRepository::advance_status(db, project.id, ProjectStatus::Published, ProjectStatus::Funded).await {
            Ok(Some(_)) => report.advanced.push(project.id),
            // Another writer moved or deleted it first
            Ok(None) => tracing::warn!("Skipping project {}: no longer published", project.id),
            Err(AppError::NotFound(_)) => tracing::warn!("Skipping project {}: deleted", project.id),
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Funding sync checked {} projects, advanced {}",
        report.checked,
        report.advanced.len()
    );
    Ok(report)
}

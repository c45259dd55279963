use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, NotSet, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::ArtistsRepository;
use crate::calc::{self, ProjectStatus, StatusCounts};
use crate::entities::projects;
use crate::entities::Projects;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct NewProject {
    pub artist_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub risk_level: String,
    pub funding_target: f64,
    pub milestones_total: i32,
    pub images: Vec<String>,
    pub funding_contract: Option<String>,
}

/// Editable fields; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub funding_target: Option<f64>,
    pub images: Option<Vec<String>>,
    pub milestones_completed: Option<i32>,
    pub funding_contract: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectFilter {
    pub artist_id: Option<i32>,
    pub status: Option<ProjectStatus>,
}

impl ProjectFilter {
    fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(artist_id) = self.artist_id {
            cond = cond.add(projects::Column::ArtistId.eq(artist_id));
        }
        if let Some(status) = self.status {
            cond = cond.add(status_condition(status));
        }
        cond
    }
}

/// Rows whose stored status reads as `status`. Draft also covers missing and
/// unrecognised literals, the same way `ProjectStatus::from_stored` does.
fn status_condition(status: ProjectStatus) -> Condition {
    match status {
        ProjectStatus::Draft => {
            let others: Vec<&str> = ProjectStatus::ALL
                .into_iter()
                .filter(|s| *s != ProjectStatus::Draft)
                .map(|s| s.as_str())
                .collect();
            Condition::any()
                .add(projects::Column::Status.is_null())
                .add(projects::Column::Status.is_not_in(others))
        }
        other => Condition::all().add(projects::Column::Status.eq(other.as_str())),
    }
}

pub struct ProjectsRepository;

impl ProjectsRepository {
    pub async fn create(db: &DatabaseConnection, new: NewProject) -> Result<projects::Model, AppError> {
        ArtistsRepository::get(db, new.artist_id).await?;

        let now = Utc::now();
        let project = projects::ActiveModel {
            id: NotSet,
            artist_id: Set(new.artist_id),
            title: Set(new.title),
            description: Set(new.description),
            category: Set(new.category),
            risk_level: Set(new.risk_level),
            funding_target: Set(new.funding_target),
            current_funding: Set(0.0),
            milestones_total: Set(new.milestones_total),
            milestones_completed: Set(0),
            images: Set(serde_json::to_string(&new.images)?),
            status: Set(Some(ProjectStatus::Draft.as_str().to_string())),
            funding_contract: Set(new.funding_contract),
            staking_pool_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let project = project.insert(db).await?;
        tracing::info!("Created project {} for artist {}", project.id, project.artist_id);
        Ok(project)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<projects::Model>, AppError> {
        Ok(Projects::find_by_id(id).one(db).await?)
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> Result<projects::Model, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("project {}", id)))
    }

    pub async fn list(db: &DatabaseConnection, filter: ProjectFilter) -> Result<Vec<projects::Model>, AppError> {
        Ok(Projects::find()
            .filter(filter.condition())
            .order_by_desc(projects::Column::CreatedAt)
            .order_by_desc(projects::Column::Id)
            .all(db)
            .await?)
    }

    /// Status tallies over every project matching `artist_id`, ignoring status filters.
    pub async fn status_counts(db: &DatabaseConnection, artist_id: Option<i32>) -> Result<StatusCounts, AppError> {
        let filter = ProjectFilter { artist_id, status: None };
        let statuses: Vec<Option<String>> = Projects::find()
            .select_only()
            .column(projects::Column::Status)
            .filter(filter.condition())
            .into_tuple()
            .all(db)
            .await?;

        Ok(StatusCounts::tally(statuses.iter().map(|s| s.as_deref())))
    }

    /// Apply edits. A status change must be a legal transition from the stored status.
    pub async fn update(db: &DatabaseConnection, id: i32, changes: ProjectChanges) -> Result<projects::Model, AppError> {
        let txn = db.begin().await?;
        let current = Self::get(&txn, id).await?;
        let from = current.status();
        let artist_id = current.artist_id;

        if let Some(to) = changes.status {
            let to = calc::transition(from, to)?;
            if to != from && !Self::swap_status(&txn, id, artist_id, from, to).await? {
                return Err(AppError::InvalidTransition(format!(
                    "project {} is no longer {}",
                    id, from
                )));
            }
        }

        let mut active = current.into_active_model();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(target) = changes.funding_target {
            active.funding_target = Set(target);
        }
        if let Some(images) = changes.images {
            active.images = Set(serde_json::to_string(&images)?);
        }
        if let Some(done) = changes.milestones_completed {
            active.milestones_completed = Set(done);
        }
        if let Some(contract) = changes.funding_contract {
            active.funding_contract = Set(Some(contract));
        }
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        let updated = Self::get(&txn, id).await?;
        txn.commit().await?;

        Ok(updated)
    }

    /// Move a project from `from` to `to` only if it still reads as `from`.
    /// Returns `None` when another writer changed the status first.
    pub async fn advance_status(
        db: &DatabaseConnection,
        id: i32,
        from: ProjectStatus,
        to: ProjectStatus,
    ) -> Result<Option<projects::Model>, AppError> {
        calc::transition(from, to)?;
        let txn = db.begin().await?;
        let current = Self::get(&txn, id).await?;

        if from == to || !Self::swap_status(&txn, id, current.artist_id, from, to).await? {
            return Ok(None);
        }

        let updated = Self::get(&txn, id).await?;
        txn.commit().await?;
        tracing::info!("Project {} moved from {} to {}", id, from, to);
        Ok(Some(updated))
    }

    /// Conditional status write: `UPDATE ... WHERE id = ? AND status reads as from`.
    /// Credits the artist when the project becomes completed.
    async fn swap_status<C: ConnectionTrait>(
        db: &C,
        id: i32,
        artist_id: i32,
        from: ProjectStatus,
        to: ProjectStatus,
    ) -> Result<bool, AppError> {
        let result = Projects::update_many()
            .col_expr(projects::Column::Status, Expr::value(to.as_str()))
            .col_expr(projects::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(projects::Column::Id.eq(id))
            .filter(status_condition(from))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Ok(false);
        }

        if to == ProjectStatus::Completed {
            ArtistsRepository::increment_completed(db, artist_id).await?;
        }
        Ok(true)
    }

    pub async fn set_status(db: &DatabaseConnection, id: i32, to: ProjectStatus) -> Result<projects::Model, AppError> {
        let updated = Self::update(
            db,
            id,
            ProjectChanges {
                status: Some(to),
                ..Default::default()
            },
        )
        .await?;
        tracing::info!("Project {} is now {}", id, updated.status());
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
        let result = Projects::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("project {}", id)));
        }
        tracing::info!("Deleted project {}", id);
        Ok(())
    }

    /// Add a contribution to the recorded funding and to the artist's raised total.
    pub async fn record_contribution(db: &DatabaseConnection, id: i32, amount: f64) -> Result<projects::Model, AppError> {
        let txn = db.begin().await?;

        let result = Projects::update_many()
            .col_expr(
                projects::Column::CurrentFunding,
                Expr::col(projects::Column::CurrentFunding).add(amount),
            )
            .col_expr(projects::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(projects::Column::Id.eq(id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("project {}", id)));
        }

        let project = Self::get(&txn, id).await?;
        ArtistsRepository::add_raised(&txn, project.artist_id, amount).await?;
        txn.commit().await?;

        Ok(project)
    }

    pub async fn link_staking_pool<C: ConnectionTrait>(db: &C, id: i32, pool_id: i32) -> Result<(), AppError> {
        Projects::update_many()
            .col_expr(projects::Column::StakingPoolId, Expr::value(pool_id))
            .col_expr(projects::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(projects::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }

    pub async fn list_published(db: &DatabaseConnection) -> Result<Vec<projects::Model>, AppError> {
        Ok(Projects::find()
            .filter(status_condition(ProjectStatus::Published))
            .order_by_asc(projects::Column::Id)
            .all(db)
            .await?)
    }
}

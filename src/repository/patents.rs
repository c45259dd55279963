use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, NotSet, QueryFilter, QueryOrder, Set,
};

use super::{ArtistsRepository, ProjectsRepository};
use crate::calc::PatentStatus;
use crate::clients::IpRegistration;
use crate::entities::patents;
use crate::entities::Patents;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct NewPatent {
    pub artist_id: i32,
    pub project_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub patent_number: String,
    pub filing_date: NaiveDate,
    pub status: PatentStatus,
    pub metadata_uri: Option<String>,
    pub registration: Option<IpRegistration>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatentFilter {
    pub artist_id: Option<i32>,
    pub project_id: Option<i32>,
    pub status: Option<PatentStatus>,
}

pub struct PatentsRepository;

impl PatentsRepository {
    /// Check that the owning artist (and project, when given) exist.
    pub async fn ensure_owners<C: ConnectionTrait>(
        db: &C,
        artist_id: i32,
        project_id: Option<i32>,
    ) -> Result<(), AppError> {
        ArtistsRepository::get(db, artist_id).await?;
        if let Some(project_id) = project_id {
            let project = ProjectsRepository::get(db, project_id).await?;
            if project.artist_id != artist_id {
                return Err(AppError::InvalidRequest(format!(
                    "project {} does not belong to artist {}",
                    project_id, artist_id
                )));
            }
        }
        Ok(())
    }

    pub async fn create(db: &DatabaseConnection, new: NewPatent) -> Result<patents::Model, AppError> {
        Self::ensure_owners(db, new.artist_id, new.project_id).await?;

        let now = Utc::now();
        let (ip_asset_id, ip_asset_contract, ip_chain_id) = match new.registration {
            Some(reg) => (Some(reg.ip_id), Some(reg.contract_address), Some(reg.chain_id)),
            None => (None, None, None),
        };

        let patent = patents::ActiveModel {
            id: NotSet,
            artist_id: Set(new.artist_id),
            project_id: Set(new.project_id),
            title: Set(new.title),
            description: Set(new.description),
            patent_number: Set(new.patent_number),
            filing_date: Set(new.filing_date),
            status: Set(new.status.as_str().to_string()),
            metadata_uri: Set(new.metadata_uri),
            ip_asset_id: Set(ip_asset_id),
            ip_asset_contract: Set(ip_asset_contract),
            ip_chain_id: Set(ip_chain_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let patent = patent.insert(db).await?;
        tracing::info!("Recorded patent {} ({})", patent.id, patent.patent_number);
        Ok(patent)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<patents::Model, AppError> {
        Patents::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("patent {}", id)))
    }

    pub async fn list(db: &DatabaseConnection, filter: PatentFilter) -> Result<Vec<patents::Model>, AppError> {
        let mut cond = Condition::all();
        if let Some(artist_id) = filter.artist_id {
            cond = cond.add(patents::Column::ArtistId.eq(artist_id));
        }
        if let Some(project_id) = filter.project_id {
            cond = cond.add(patents::Column::ProjectId.eq(project_id));
        }
        if let Some(status) = filter.status {
            cond = cond.add(patents::Column::Status.eq(status.as_str()));
        }

        Ok(Patents::find()
            .filter(cond)
            .order_by_desc(patents::Column::CreatedAt)
            .order_by_desc(patents::Column::Id)
            .all(db)
            .await?)
    }

    /// `description: Some(None)` clears the description.
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        title: Option<String>,
        description: Option<Option<String>>,
        status: Option<PatentStatus>,
    ) -> Result<patents::Model, AppError> {
        let mut active = Self::get(db, id).await?.into_active_model();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        if let Some(status) = status {
            active.status = Set(status.as_str().to_string());
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
        let result = Patents::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("patent {}", id)));
        }
        Ok(())
    }
}

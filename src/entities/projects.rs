use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::calc::ProjectStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub artist_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub risk_level: String, // low / medium / high
    pub funding_target: f64,
    pub current_funding: f64,
    pub milestones_total: i32,
    pub milestones_completed: i32,
    #[sea_orm(column_type = "Text")]
    pub images: String, // JSON array of URLs
    pub status: Option<String>,
    pub funding_contract: Option<String>,
    pub staking_pool_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn status(&self) -> ProjectStatus {
        ProjectStatus::from_stored(self.status.as_deref())
    }

    pub fn image_urls(&self) -> Vec<String> {
        serde_json::from_str(&self.images).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::artists::Entity",
        from = "Column::ArtistId",
        to = "super::artists::Column::Id",
        on_delete = "Cascade"
    )]
    Artist,
    #[sea_orm(has_many = "super::staking_pools::Entity")]
    StakingPools,
    #[sea_orm(has_many = "super::patents::Entity")]
    Patents,
}

impl Related<super::artists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl Related<super::staking_pools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StakingPools.def()
    }
}

impl Related<super::patents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

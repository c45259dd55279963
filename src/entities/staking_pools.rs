use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "staking_pools")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub project_id: i32,
    #[sea_orm(unique)]
    pub contract_address: String,
    pub token_address: Option<String>,
    pub apy: f64,
    #[sea_orm(column_type = "Text")]
    pub lockup_periods: String, // JSON array of day counts
    pub pool_size: f64,
    pub total_staked: f64,
    pub stakers_count: i32,
    pub deployment_tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn lockup_days(&self) -> Vec<u32> {
        serde_json::from_str(&self.lockup_periods).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub name: String,
    pub genre: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub wallet_address: Option<String>,
    pub avatar_url: Option<String>,
    pub verified: bool,
    // Aggregate counters
    pub followers: i32,
    pub total_raised: f64,
    pub completed_projects: i32,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::projects::Entity")]
    Projects,
    #[sea_orm(has_many = "super::patents::Entity")]
    Patents,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::patents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::artists;
use crate::entities::Artists;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct NewArtist {
    pub name: String,
    pub genre: String,
    pub bio: String,
    pub wallet_address: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct ArtistsRepository;

impl ArtistsRepository {
    pub async fn create(db: &DatabaseConnection, new: NewArtist) -> Result<artists::Model, AppError> {
        let now = Utc::now();
        let artist = artists::ActiveModel {
            id: NotSet,
            name: Set(new.name),
            genre: Set(new.genre),
            bio: Set(new.bio),
            wallet_address: Set(new.wallet_address),
            avatar_url: Set(new.avatar_url),
            verified: Set(false),
            followers: Set(0),
            total_raised: Set(0.0),
            completed_projects: Set(0),
            rating: Set(0.0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(artist.insert(db).await?)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<artists::Model>, AppError> {
        Ok(Artists::find_by_id(id).one(db).await?)
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> Result<artists::Model, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("artist {}", id)))
    }

    pub async fn list(db: &DatabaseConnection, verified: Option<bool>) -> Result<Vec<artists::Model>, AppError> {
        let mut query = Artists::find();
        if let Some(verified) = verified {
            query = query.filter(artists::Column::Verified.eq(verified));
        }
        Ok(query
            .order_by_desc(artists::Column::CreatedAt)
            .order_by_desc(artists::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn add_raised<C: ConnectionTrait>(db: &C, id: i32, amount: f64) -> Result<(), AppError> {
        Artists::update_many()
            .col_expr(
                artists::Column::TotalRaised,
                Expr::col(artists::Column::TotalRaised).add(amount),
            )
            .col_expr(artists::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(artists::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }

    pub async fn increment_completed<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), AppError> {
        Artists::update_many()
            .col_expr(
                artists::Column::CompletedProjects,
                Expr::col(artists::Column::CompletedProjects).add(1),
            )
            .col_expr(artists::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(artists::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }
}

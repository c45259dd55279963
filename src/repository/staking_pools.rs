use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::ProjectsRepository;
use crate::entities::staking_pools;
use crate::entities::StakingPools;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct NewStakingPool {
    pub project_id: i32,
    pub contract_address: String,
    pub token_address: Option<String>,
    pub apy: f64,
    pub lockup_periods: Vec<u32>,
    pub pool_size: f64,
    pub deployment_tx_hash: Option<String>,
}

pub struct StakingPoolsRepository;

impl StakingPoolsRepository {
    /// Insert the pool and point its project at it.
    pub async fn create(db: &DatabaseConnection, new: NewStakingPool) -> Result<staking_pools::Model, AppError> {
        let txn = db.begin().await?;
        ProjectsRepository::get(&txn, new.project_id).await?;

        let now = Utc::now();
        let pool = staking_pools::ActiveModel {
            id: NotSet,
            project_id: Set(new.project_id),
            contract_address: Set(new.contract_address),
            token_address: Set(new.token_address),
            apy: Set(new.apy),
            lockup_periods: Set(serde_json::to_string(&new.lockup_periods)?),
            pool_size: Set(new.pool_size),
            total_staked: Set(0.0),
            stakers_count: Set(0),
            deployment_tx_hash: Set(new.deployment_tx_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let pool = pool.insert(&txn).await?;
        ProjectsRepository::link_staking_pool(&txn, pool.project_id, pool.id).await?;
        txn.commit().await?;

        tracing::info!("Created staking pool {} at {}", pool.id, pool.contract_address);
        Ok(pool)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<staking_pools::Model>, AppError> {
        Ok(StakingPools::find_by_id(id).one(db).await?)
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> Result<staking_pools::Model, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("staking pool {}", id)))
    }

    pub async fn list(db: &DatabaseConnection, project_id: Option<i32>) -> Result<Vec<staking_pools::Model>, AppError> {
        let mut query = StakingPools::find();
        if let Some(project_id) = project_id {
            query = query.filter(staking_pools::Column::ProjectId.eq(project_id));
        }
        Ok(query
            .order_by_desc(staking_pools::Column::CreatedAt)
            .order_by_desc(staking_pools::Column::Id)
            .all(db)
            .await?)
    }

    /// Add a stake to the pool totals and return the updated pool.
    /// The stake is refused when it would push `total_staked` past `pool_size`.
    pub async fn record_stake(db: &DatabaseConnection, id: i32, amount: f64) -> Result<staking_pools::Model, AppError> {
        let txn = db.begin().await?;

        let result = StakingPools::update_many()
            .col_expr(
                staking_pools::Column::TotalStaked,
                Expr::col(staking_pools::Column::TotalStaked).add(amount),
            )
            .col_expr(
                staking_pools::Column::StakersCount,
                Expr::col(staking_pools::Column::StakersCount).add(1),
            )
            .col_expr(staking_pools::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(staking_pools::Column::Id.eq(id))
            .filter(
                Expr::expr(Expr::col(staking_pools::Column::TotalStaked).add(amount))
                    .lte(Expr::col(staking_pools::Column::PoolSize)),
            )
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            let pool = Self::get(&txn, id).await?;
            return Err(AppError::UnprocessableEntity(format!(
                "stake of {} exceeds the remaining capacity {} of pool {}",
                amount,
                remaining_capacity(&pool),
                id
            )));
        }

        let pool = Self::get(&txn, id).await?;
        txn.commit().await?;
        Ok(pool)
    }
}

pub fn remaining_capacity(pool: &staking_pools::Model) -> f64 {
    (pool.pool_size - pool.total_staked).max(0.0)
}

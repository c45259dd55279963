use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::calc::{self, RewardEstimate, ROYALTY_TIERS};
use crate::clients::TransactionReceipt;
use crate::entities::staking_pools;
use crate::error::AppError;
use crate::repository::staking_pools as staking_pools_repo;
use crate::repository::{NewStakingPool, StakingPoolsRepository};
use crate::validation;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePoolRequest {
    pub project_id: i32,
    /// Deployed pool contract; may be omitted when the deployment receipt provides it
    #[serde(default)]
    pub contract_address: Option<String>,
    /// Token accepted by the pool
    #[serde(default)]
    pub token_address: Option<String>,
    /// Advertised annual percentage yield
    pub apy: f64,
    /// Allowed lockup lengths in days
    pub lockup_periods: Vec<u32>,
    /// Maximum amount the pool accepts
    pub pool_size: f64,
    /// Deployment transaction; when a chain RPC is configured the server waits for its receipt
    #[serde(default)]
    pub deployment_tx_hash: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PoolResponse {
    pub id: i32,
    pub project_id: i32,
    pub contract_address: String,
    pub token_address: Option<String>,
    pub apy: f64,
    pub lockup_periods: Vec<u32>,
    pub pool_size: f64,
    pub total_staked: f64,
    pub stakers_count: i32,
    /// Share of the pool already staked, clamped for display
    pub utilization: f64,
    pub deployment_tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<staking_pools::Model> for PoolResponse {
    fn from(model: staking_pools::Model) -> Self {
        let lockup_periods = model.lockup_days();
        Self {
            utilization: calc::display_percentage(calc::funding_percentage(model.total_staked, model.pool_size)),
            id: model.id,
            project_id: model.project_id,
            contract_address: model.contract_address,
            token_address: model.token_address,
            apy: model.apy,
            lockup_periods,
            pool_size: model.pool_size,
            total_staked: model.total_staked,
            stakers_count: model.stakers_count,
            deployment_tx_hash: model.deployment_tx_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StakeRequest {
    pub staker_address: String,
    pub amount: f64,
    /// Must be one of the pool's lockup periods
    pub lockup_days: u32,
    /// Stake transaction; when a chain RPC is configured the server waits for its receipt
    #[serde(default)]
    pub tx_hash: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StakeResponse {
    pub pool: PoolResponse,
    pub estimate: RewardEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<TransactionReceipt>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PoolListQuery {
    #[serde(default)]
    #[param(required = false)]
    pub project_id: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EstimateQuery {
    /// Amount to stake
    pub principal: f64,
    /// Annual percentage yield, e.g. 12 for 12%
    pub apy: f64,
    /// Lockup length in days
    pub lockup_days: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TierResponse {
    pub name: String,
    pub min_stake: f64,
    /// Percent of yearly revenue shared with the staker
    pub royalty_share: f64,
}

/// List staking pools, newest first
#[utoipa::path(
    get,
    path = "/staking/pools",
    params(PoolListQuery),
    responses(
        (status = 200, description = "Staking pools", body = Vec<PoolResponse>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_pools(
    State(state): State<AppState>,
    Query(query): Query<PoolListQuery>,
) -> Result<Json<Vec<PoolResponse>>, AppError> {
    let pools = StakingPoolsRepository::list(&state.db, query.project_id).await?;
    Ok(Json(pools.into_iter().map(PoolResponse::from).collect()))
}

/// Record a deployed staking pool for a project
#[utoipa::path(
    post,
    path = "/staking/pools",
    request_body = CreatePoolRequest,
    responses(
        (status = 201, description = "Pool recorded", body = PoolResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 404, description = "Project not found"),
        (status = 422, description = "Deployment transaction failed"),
        (status = 502, description = "Chain RPC error")
    )
)]
#[tracing::instrument(skip(state, request), fields(project_id = request.project_id))]
pub async fn create_pool(
    State(state): State<AppState>,
    Json(request): Json<CreatePoolRequest>,
) -> Result<(StatusCode, Json<PoolResponse>), AppError> {
    let apy = validation::require_non_negative("apy", request.apy)?;
    let pool_size = validation::require_positive("pool_size", request.pool_size)?;
    let lockup_periods = normalize_lockups(request.lockup_periods)?;
    let token_address = validation::optional_address("token_address", request.token_address.as_deref())?;
    let mut contract_address =
        validation::optional_address("contract_address", request.contract_address.as_deref())?;
    let deployment_tx_hash = request
        .deployment_tx_hash
        .as_deref()
        .map(|h| validation::require_tx_hash("deployment_tx_hash", h))
        .transpose()?;

    if let (Some(tx_hash), Some(chain)) = (deployment_tx_hash.as_deref(), state.chain.as_ref()) {
        let receipt = chain.wait_for_receipt(tx_hash).await?;
        if !receipt.succeeded() {
            return Err(AppError::UnprocessableEntity(format!("deployment {} reverted", tx_hash)));
        }
        if contract_address.is_none() {
            contract_address = receipt.contract_address;
        }
    }

    let contract_address = contract_address.ok_or_else(|| {
        AppError::InvalidRequest("contract_address is required when it cannot be read from a deployment receipt".to_string())
    })?;

    let pool = StakingPoolsRepository::create(
        &state.db,
        NewStakingPool {
            project_id: request.project_id,
            contract_address,
            token_address,
            apy,
            lockup_periods,
            pool_size,
            deployment_tx_hash,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(pool.into())))
}

/// Fetch one staking pool
#[utoipa::path(
    get,
    path = "/staking/pools/{id}",
    params(("id" = i32, Path, description = "Pool id")),
    responses(
        (status = 200, description = "Staking pool", body = PoolResponse),
        (status = 404, description = "No such pool")
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PoolResponse>, AppError> {
    let pool = StakingPoolsRepository::get(&state.db, id).await?;
    Ok(Json(pool.into()))
}

/// Record a stake against a pool
#[utoipa::path(
    post,
    path = "/staking/pools/{id}/stakes",
    params(("id" = i32, Path, description = "Pool id")),
    request_body = StakeRequest,
    responses(
        (status = 200, description = "Stake recorded", body = StakeResponse),
        (status = 400, description = "Malformed stake"),
        (status = 404, description = "No such pool"),
        (status = 422, description = "Stake exceeds the pool's remaining capacity or its transaction failed"),
        (status = 502, description = "Chain RPC error")
    )
)]
#[tracing::instrument(skip(state, request), fields(amount = request.amount, lockup_days = request.lockup_days))]
pub async fn stake(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<StakeRequest>,
) -> Result<Json<StakeResponse>, AppError> {
    validation::require_address("staker_address", &request.staker_address)?;
    let amount = validation::require_positive("amount", request.amount)?;
    let tx_hash = request
        .tx_hash
        .as_deref()
        .map(|h| validation::require_tx_hash("tx_hash", h))
        .transpose()?;

    let pool = StakingPoolsRepository::get(&state.db, id).await?;
    let allowed = pool.lockup_days();
    if !allowed.contains(&request.lockup_days) {
        return Err(AppError::InvalidRequest(format!(
            "lockup of {} days is not offered by pool {} (allowed: {:?})",
            request.lockup_days, id, allowed
        )));
    }

    let remaining = staking_pools_repo::remaining_capacity(&pool);
    if amount > remaining {
        return Err(AppError::UnprocessableEntity(format!(
            "stake of {} exceeds the remaining capacity {} of pool {}",
            amount, remaining, id
        )));
    }

    let receipt = match (tx_hash.as_deref(), state.chain.as_ref()) {
        (Some(tx_hash), Some(chain)) => {
            let receipt = chain.wait_for_receipt(tx_hash).await?;
            if !receipt.succeeded() {
                return Err(AppError::UnprocessableEntity(format!("stake transaction {} reverted", tx_hash)));
            }
            Some(receipt)
        }
        _ => None,
    };

    let pool = StakingPoolsRepository::record_stake(&state.db, id, amount).await?;
    let estimate = calc::estimate(amount, pool.apy, request.lockup_days);
    tracing::info!("Pool {} staked {} for {} days", id, amount, request.lockup_days);

    Ok(Json(StakeResponse {
        pool: pool.into(),
        estimate,
        receipt,
    }))
}

/// Estimate staking reward and royalty share
#[utoipa::path(
    get,
    path = "/staking/estimate",
    params(EstimateQuery),
    responses(
        (status = 200, description = "Reward estimate", body = RewardEstimate),
        (status = 400, description = "Negative or non-finite input")
    )
)]
pub async fn estimate_rewards(Query(query): Query<EstimateQuery>) -> Result<Json<RewardEstimate>, AppError> {
    let principal = validation::require_non_negative("principal", query.principal)?;
    let apy = validation::require_non_negative("apy", query.apy)?;
    Ok(Json(calc::estimate(principal, apy, query.lockup_days)))
}

/// Royalty tiers by minimum stake
#[utoipa::path(
    get,
    path = "/staking/tiers",
    responses(
        (status = 200, description = "Royalty tiers, lowest first", body = Vec<TierResponse>)
    )
)]
pub async fn list_tiers() -> Json<Vec<TierResponse>> {
    Json(
        ROYALTY_TIERS
            .iter()
            .map(|tier| TierResponse {
                name: tier.name.to_string(),
                min_stake: tier.min_stake,
                royalty_share: tier.royalty_share,
            })
            .collect(),
    )
}

fn normalize_lockups(mut periods: Vec<u32>) -> Result<Vec<u32>, AppError> {
    if periods.is_empty() || periods.iter().any(|d| *d == 0) {
        return Err(AppError::InvalidRequest(
            "lockup_periods must list at least one positive day count".to_string(),
        ));
    }
    periods.sort_unstable();
    periods.dedup();
    Ok(periods)
}

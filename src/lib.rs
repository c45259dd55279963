use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::SmartIpKeyExtractor,
    GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod calc;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod funding;
pub mod jobs;
pub mod repository;
pub mod routes;
pub mod validation;

use clients::{ChainClient, IpRegistryClient, PinningClient};
use config::AppConfig;

/// Shared handler state. External clients are `None` when not configured.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub chain: Option<ChainClient>,
    pub pinning: Option<PinningClient>,
    pub ip_registry: Option<IpRegistryClient>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let chain = config
            .chain_rpc_url
            .as_ref()
            .map(|url| ChainClient::new(url.clone(), config.receipt_timeout));
        let pinning = config
            .pinning_api_url
            .as_ref()
            .map(|url| PinningClient::new(url.clone(), config.pinning_jwt.clone(), config.ipfs_gateway_url.clone()));
        let ip_registry = config
            .ip_registry_url
            .as_ref()
            .map(|url| IpRegistryClient::new(url.clone(), config.ip_registry_api_key.clone()));

        if chain.is_none() {
            tracing::info!("CHAIN_RPC_URL not set; on-chain balances read as zero and receipts are not verified");
        }
        if pinning.is_none() || ip_registry.is_none() {
            tracing::info!("Pinning or IP registry not configured; IP asset registration disabled");
        }

        Self {
            db,
            config: Arc::new(config),
            chain,
            pinning,
            ip_registry,
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String),
        (status = 503, description = "Database unreachable", body = String)
    )
)]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "Service is healthy"),
        Err(e) => {
            tracing::error!("Database ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Database unreachable")
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "STAKEMARKET API",
        version = "0.1.0",
        description = "Stake on artist projects and patents registered as IP assets"
    ),
    paths(
        health_check,
        routes::artists::list_artists,
        routes::artists::create_artist,
        routes::artists::get_artist,
        routes::projects::list_projects,
        routes::projects::create_project,
        routes::projects::get_project,
        routes::projects::update_project,
        routes::projects::delete_project,
        routes::projects::change_project_status,
        routes::projects::project_status_counts,
        routes::projects::project_funding,
        routes::projects::record_contribution,
        routes::staking::list_pools,
        routes::staking::create_pool,
        routes::staking::get_pool,
        routes::staking::stake,
        routes::staking::estimate_rewards,
        routes::staking::list_tiers,
        routes::patents::list_patents,
        routes::patents::create_patent,
        routes::patents::get_patent,
        routes::patents::update_patent,
        routes::patents::delete_patent
    ),
    components(schemas(
        routes::artists::CreateArtistRequest,
        routes::artists::ArtistResponse,
        routes::projects::RiskLevel,
        routes::projects::CreateProjectRequest,
        routes::projects::UpdateProjectRequest,
        routes::projects::StatusChangeRequest,
        routes::projects::ContributionRequest,
        routes::projects::ProjectResponse,
        routes::projects::FundingResponse,
        routes::staking::CreatePoolRequest,
        routes::staking::PoolResponse,
        routes::staking::StakeRequest,
        routes::staking::StakeResponse,
        routes::staking::TierResponse,
        routes::patents::CreatePatentRequest,
        routes::patents::UpdatePatentRequest,
        routes::patents::PatentResponse,
        calc::ProjectStatus,
        calc::PatentStatus,
        calc::StatusCounts,
        calc::FundingSnapshot,
        calc::RewardEstimate,
        clients::TransactionReceipt,
        clients::LicenseTerms,
        clients::IpRegistration
    ))
)]
pub struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let rate_limit = state.config.rate_limit_per_minute;

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/artists", get(routes::list_artists).post(routes::create_artist))
        .route("/artists/{id}", get(routes::get_artist))
        .route("/projects", get(routes::list_projects).post(routes::create_project))
        .route("/projects/status-counts", get(routes::project_status_counts))
        .route(
            "/projects/{id}",
            get(routes::get_project)
                .patch(routes::update_project)
                .delete(routes::delete_project),
        )
        .route("/projects/{id}/status", post(routes::change_project_status))
        .route("/projects/{id}/funding", get(routes::project_funding))
        .route("/projects/{id}/contributions", post(routes::record_contribution))
        .route("/staking/pools", get(routes::list_pools).post(routes::create_pool))
        .route("/staking/pools/{id}", get(routes::get_pool))
        .route("/staking/pools/{id}/stakes", post(routes::stake))
        .route("/staking/estimate", get(routes::estimate_rewards))
        .route("/staking/tiers", get(routes::list_tiers))
        .route("/patents", get(routes::list_patents).post(routes::create_patent))
        .route(
            "/patents/{id}",
            get(routes::get_patent)
                .patch(routes::update_patent)
                .delete(routes::delete_patent),
        )
        .with_state(state);

    // Rate limit the API only, never the docs
    let api_routes = match rate_limit.and_then(|per_minute| {
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .period(Duration::from_millis(u64::from((60_000 / per_minute).max(1))))
            .burst_size(per_minute)
            .finish()
    }) {
        Some(governor_conf) => {
            tracing::info!("Rate limiting API to {:?} requests per minute", rate_limit);
            api_routes.layer(GovernorLayer {
                config: Arc::new(governor_conf),
            })
        }
        None => api_routes,
    };

    let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(api_routes)
        .merge(docs_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

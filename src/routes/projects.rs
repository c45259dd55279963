use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::calc::{self, FundingSnapshot, ProjectStatus, StatusCounts};
use crate::entities::projects;
use crate::error::AppError;
use crate::funding;
use crate::repository::{NewProject, ProjectChanges, ProjectFilter, ProjectsRepository};
use crate::validation;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    /// Owning artist
    pub artist_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    /// Defaults to medium
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    /// Amount to raise; must be positive
    pub funding_target: f64,
    #[serde(default)]
    pub milestones_total: i32,
    #[serde(default)]
    pub images: Vec<String>,
    /// Contract whose balance counts toward funding
    #[serde(default)]
    pub funding_contract: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub funding_target: Option<f64>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub milestones_completed: Option<i32>,
    #[serde(default)]
    pub funding_contract: Option<String>,
    /// New status; must be the current status or the next one
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusChangeRequest {
    /// draft, published, funded or completed
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ContributionRequest {
    /// Amount added to the recorded funding; must be positive
    pub amount: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub id: i32,
    pub artist_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub risk_level: String,
    pub funding_target: f64,
    pub current_funding: f64,
    /// Recorded funding against the target, clamped for display
    pub funding_percentage: f64,
    pub milestones_total: i32,
    pub milestones_completed: i32,
    pub images: Vec<String>,
    pub status: ProjectStatus,
    pub funding_contract: Option<String>,
    pub staking_pool_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<projects::Model> for ProjectResponse {
    fn from(model: projects::Model) -> Self {
        let status = model.status();
        let images = model.image_urls();
        Self {
            funding_percentage: calc::display_percentage(calc::funding_percentage(
                model.current_funding,
                model.funding_target,
            )),
            id: model.id,
            artist_id: model.artist_id,
            title: model.title,
            description: model.description,
            category: model.category,
            risk_level: model.risk_level,
            funding_target: model.funding_target,
            current_funding: model.current_funding,
            milestones_total: model.milestones_total,
            milestones_completed: model.milestones_completed,
            images,
            status,
            funding_contract: model.funding_contract,
            staking_pool_id: model.staking_pool_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FundingResponse {
    pub project_id: i32,
    pub funding_contract: Option<String>,
    /// False when the on-chain balance could not be read and counted as zero
    pub onchain_available: bool,
    #[serde(flatten)]
    pub snapshot: FundingSnapshot,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectListQuery {
    #[serde(default)]
    #[param(required = false)]
    pub artist_id: Option<i32>,
    /// draft, published, funded or completed
    #[serde(default)]
    #[param(required = false)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusCountsQuery {
    #[serde(default)]
    #[param(required = false)]
    pub artist_id: Option<i32>,
}

pub(crate) fn parse_status(raw: &str) -> Result<ProjectStatus, AppError> {
    ProjectStatus::parse(raw).ok_or_else(|| AppError::InvalidRequest(format!("unknown project status '{}'", raw)))
}

/// List projects, newest first
#[utoipa::path(
    get,
    path = "/projects",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "Projects", body = Vec<ProjectResponse>),
        (status = 400, description = "Unknown status filter")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let filter = ProjectFilter {
        artist_id: query.artist_id,
        status: query.status.as_deref().map(parse_status).transpose()?,
    };
    let projects = ProjectsRepository::list(&state.db, filter).await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

/// Create a draft project for an artist
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created as draft", body = ProjectResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 404, description = "Artist not found")
    )
)]
#[tracing::instrument(skip(state, request), fields(artist_id = request.artist_id))]
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    if request.milestones_total < 0 {
        return Err(AppError::InvalidRequest("milestones_total must not be negative".to_string()));
    }
    let new = NewProject {
        artist_id: request.artist_id,
        title: validation::require_text("title", &request.title)?,
        description: request.description.trim().to_string(),
        category: validation::require_text("category", &request.category)?,
        risk_level: request.risk_level.unwrap_or(RiskLevel::Medium).as_str().to_string(),
        funding_target: validation::require_positive("funding_target", request.funding_target)?,
        milestones_total: request.milestones_total,
        images: clean_images(request.images),
        funding_contract: validation::optional_address("funding_contract", request.funding_contract.as_deref())?,
    };

    let project = ProjectsRepository::create(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Fetch one project
#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = i32, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 404, description = "No such project")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = ProjectsRepository::get(&state.db, id).await?;
    Ok(Json(project.into()))
}

/// Edit a project
#[utoipa::path(
    patch,
    path = "/projects/{id}",
    params(("id" = i32, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated project", body = ProjectResponse),
        (status = 400, description = "Malformed fields"),
        (status = 404, description = "No such project"),
        (status = 409, description = "Illegal status transition")
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let changes = ProjectChanges {
        title: request
            .title
            .as_deref()
            .map(|t| validation::require_text("title", t))
            .transpose()?,
        description: request.description.map(|d| d.trim().to_string()),
        funding_target: request
            .funding_target
            .map(|t| validation::require_positive("funding_target", t))
            .transpose()?,
        images: request.images.map(clean_images),
        milestones_completed: match request.milestones_completed {
            Some(n) if n < 0 => {
                return Err(AppError::InvalidRequest("milestones_completed must not be negative".to_string()))
            }
            other => other,
        },
        funding_contract: request
            .funding_contract
            .as_deref()
            .map(|c| validation::require_address("funding_contract", c))
            .transpose()?,
        status: request.status.as_deref().map(parse_status).transpose()?,
    };

    let project = ProjectsRepository::update(&state.db, id, changes).await?;
    Ok(Json(project.into()))
}

/// Move a project to its next status
#[utoipa::path(
    post,
    path = "/projects/{id}/status",
    params(("id" = i32, Path, description = "Project id")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = ProjectResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "No such project"),
        (status = 409, description = "Illegal status transition")
    )
)]
#[tracing::instrument(skip(state, request), fields(status = %request.status))]
pub async fn change_project_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let to = parse_status(&request.status)?;
    let project = ProjectsRepository::set_status(&state.db, id, to).await?;
    Ok(Json(project.into()))
}

/// Delete a project along with its staking pools
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = i32, Path, description = "Project id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such project")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    ProjectsRepository::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Project counts per status, for tab badges
#[utoipa::path(
    get,
    path = "/projects/status-counts",
    params(StatusCountsQuery),
    responses(
        (status = 200, description = "Counts per status plus total", body = StatusCounts)
    )
)]
pub async fn project_status_counts(
    State(state): State<AppState>,
    Query(query): Query<StatusCountsQuery>,
) -> Result<Json<StatusCounts>, AppError> {
    let counts = ProjectsRepository::status_counts(&state.db, query.artist_id).await?;
    Ok(Json(counts))
}

/// Recorded plus on-chain funding for a project
#[utoipa::path(
    get,
    path = "/projects/{id}/funding",
    params(("id" = i32, Path, description = "Project id")),
    responses(
        (status = 200, description = "Aggregated funding", body = FundingResponse),
        (status = 404, description = "No such project")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn project_funding(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FundingResponse>, AppError> {
    let project = ProjectsRepository::get(&state.db, id).await?;
    let (snapshot, onchain_available) = funding::project_funding(state.chain.as_ref(), &project).await;

    Ok(Json(FundingResponse {
        project_id: project.id,
        funding_contract: project.funding_contract,
        onchain_available,
        snapshot,
    }))
}

/// Record an off-chain contribution
#[utoipa::path(
    post,
    path = "/projects/{id}/contributions",
    params(("id" = i32, Path, description = "Project id")),
    request_body = ContributionRequest,
    responses(
        (status = 200, description = "Updated project", body = ProjectResponse),
        (status = 400, description = "Non-positive amount"),
        (status = 404, description = "No such project")
    )
)]
#[tracing::instrument(skip(state, request), fields(amount = request.amount))]
pub async fn record_contribution(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ContributionRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let amount = validation::require_positive("amount", request.amount)?;
    let project = ProjectsRepository::record_contribution(&state.db, id, amount).await?;
    tracing::info!("Project {} received {}", id, amount);
    Ok(Json(project.into()))
}

fn clean_images(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::calc::PatentStatus;
use crate::clients::{IpRegistration, IpRegistrationRequest, LicenseTerms};
use crate::entities::patents;
use crate::error::AppError;
use crate::repository::{NewPatent, PatentFilter, PatentsRepository};
use crate::validation;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePatentRequest {
    pub artist_id: i32,
    /// Project the patent protects, if any
    #[serde(default)]
    pub project_id: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub patent_number: String,
    /// ISO date, e.g. 2024-03-01
    pub filing_date: NaiveDate,
    /// Pending, Granted or Expired; defaults to Pending
    #[serde(default)]
    pub status: Option<String>,
    /// Pin metadata and register the patent as an on-chain IP asset before saving
    #[serde(default)]
    pub register_ip_asset: bool,
    #[serde(default)]
    pub license_terms: Option<LicenseTerms>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePatentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PatentResponse {
    pub id: i32,
    pub artist_id: i32,
    pub project_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub patent_number: String,
    pub filing_date: NaiveDate,
    pub status: String,
    pub metadata_uri: Option<String>,
    pub ip_asset_id: Option<String>,
    pub ip_asset_contract: Option<String>,
    pub ip_chain_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<patents::Model> for PatentResponse {
    fn from(model: patents::Model) -> Self {
        Self {
            id: model.id,
            artist_id: model.artist_id,
            project_id: model.project_id,
            title: model.title,
            description: model.description,
            patent_number: model.patent_number,
            filing_date: model.filing_date,
            status: model.status,
            metadata_uri: model.metadata_uri,
            ip_asset_id: model.ip_asset_id,
            ip_asset_contract: model.ip_asset_contract,
            ip_chain_id: model.ip_chain_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatentListQuery {
    #[serde(default)]
    #[param(required = false)]
    pub artist_id: Option<i32>,
    #[serde(default)]
    #[param(required = false)]
    pub project_id: Option<i32>,
    /// Pending, Granted or Expired
    #[serde(default)]
    #[param(required = false)]
    pub status: Option<String>,
}

fn parse_patent_status(raw: &str) -> Result<PatentStatus, AppError> {
    PatentStatus::parse(raw).ok_or_else(|| AppError::InvalidRequest(format!("unknown patent status '{}'", raw)))
}

/// List patents, newest first
#[utoipa::path(
    get,
    path = "/patents",
    params(PatentListQuery),
    responses(
        (status = 200, description = "Patents", body = Vec<PatentResponse>),
        (status = 400, description = "Unknown status filter")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_patents(
    State(state): State<AppState>,
    Query(query): Query<PatentListQuery>,
) -> Result<Json<Vec<PatentResponse>>, AppError> {
    let filter = PatentFilter {
        artist_id: query.artist_id,
        project_id: query.project_id,
        status: query.status.as_deref().map(parse_patent_status).transpose()?,
    };
    let patents = PatentsRepository::list(&state.db, filter).await?;
    Ok(Json(patents.into_iter().map(PatentResponse::from).collect()))
}

/// Register a patent, optionally as an on-chain IP asset
///
/// With `register_ip_asset` the metadata is pinned, the IP asset registered and only
/// then the row inserted. A failure after pinning leaves the pinned document in place.
#[utoipa::path(
    post,
    path = "/patents",
    request_body = CreatePatentRequest,
    responses(
        (status = 201, description = "Patent recorded", body = PatentResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 404, description = "Artist or project not found"),
        (status = 502, description = "Pinning or registry service error"),
        (status = 503, description = "IP registration is not configured")
    )
)]
#[tracing::instrument(skip(state, request), fields(patent_number = %request.patent_number))]
pub async fn create_patent(
    State(state): State<AppState>,
    Json(request): Json<CreatePatentRequest>,
) -> Result<(StatusCode, Json<PatentResponse>), AppError> {
    let title = validation::require_text("title", &request.title)?;
    let patent_number = validation::require_text("patent_number", &request.patent_number)?;
    let description = request
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let status = request
        .status
        .as_deref()
        .map(parse_patent_status)
        .transpose()?
        .unwrap_or(PatentStatus::Pending);

    // Owners are checked before anything is pinned or registered
    PatentsRepository::ensure_owners(&state.db, request.artist_id, request.project_id).await?;

    let (metadata_uri, registration) = if request.register_ip_asset {
        let metadata = json!({
            "title": title,
            "description": description,
            "patentNumber": patent_number,
            "filingDate": request.filing_date.to_string(),
            "status": status.as_str(),
            "artistId": request.artist_id,
            "projectId": request.project_id,
        });
        let (uri, registration) =
            register_ip_asset(&state, &patent_number, metadata, request.license_terms.unwrap_or_default()).await?;
        (Some(uri), Some(registration))
    } else {
        (None, None)
    };

    let patent = PatentsRepository::create(
        &state.db,
        NewPatent {
            artist_id: request.artist_id,
            project_id: request.project_id,
            title,
            description,
            patent_number,
            filing_date: request.filing_date,
            status,
            metadata_uri,
            registration,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(patent.into())))
}

async fn register_ip_asset(
    state: &AppState,
    patent_number: &str,
    metadata: serde_json::Value,
    license_terms: LicenseTerms,
) -> Result<(String, IpRegistration), AppError> {
    let pinning = state
        .pinning
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("content pinning is not configured".to_string()))?;
    let registry = state
        .ip_registry
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("IP registry is not configured".to_string()))?;

    let cid = pinning.pin_json(&format!("patent-{}", patent_number), &metadata).await?;
    let metadata_uri = pinning.gateway_url(&cid);

    let registration = registry
        .register(&IpRegistrationRequest {
            metadata_uri: metadata_uri.clone(),
            metadata,
            license_terms,
        })
        .await
        .map_err(|e| {
            tracing::error!("IP registration failed after pinning {}: {}", cid, e);
            e
        })?;

    Ok((metadata_uri, registration))
}

/// Fetch one patent
#[utoipa::path(
    get,
    path = "/patents/{id}",
    params(("id" = i32, Path, description = "Patent id")),
    responses(
        (status = 200, description = "Patent", body = PatentResponse),
        (status = 404, description = "No such patent")
    )
)]
pub async fn get_patent(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PatentResponse>, AppError> {
    let patent = PatentsRepository::get(&state.db, id).await?;
    Ok(Json(patent.into()))
}

/// Edit a patent's title, description or status
#[utoipa::path(
    patch,
    path = "/patents/{id}",
    params(("id" = i32, Path, description = "Patent id")),
    request_body = UpdatePatentRequest,
    responses(
        (status = 200, description = "Updated patent", body = PatentResponse),
        (status = 400, description = "Malformed fields"),
        (status = 404, description = "No such patent")
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_patent(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePatentRequest>,
) -> Result<Json<PatentResponse>, AppError> {
    let title = request
        .title
        .as_deref()
        .map(|t| validation::require_text("title", t))
        .transpose()?;
    let status = request.status.as_deref().map(parse_patent_status).transpose()?;
    // Blank clears the description, as on create
    let description = request
        .description
        .map(|d| Some(d.trim().to_string()).filter(|d| !d.is_empty()));

    let patent = PatentsRepository::update(&state.db, id, title, description, status).await?;
    Ok(Json(patent.into()))
}

/// Delete a patent record
#[utoipa::path(
    delete,
    path = "/patents/{id}",
    params(("id" = i32, Path, description = "Patent id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such patent")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_patent(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    PatentsRepository::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

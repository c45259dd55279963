use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::artists;
use crate::error::AppError;
use crate::repository::{ArtistsRepository, NewArtist};
use crate::validation;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateArtistRequest {
    /// Display name
    pub name: String,
    /// Primary genre, e.g. "electronic"
    pub genre: String,
    #[serde(default)]
    pub bio: String,
    /// Wallet that receives funding and royalties
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArtistResponse {
    pub id: i32,
    pub name: String,
    pub genre: String,
    pub bio: String,
    pub wallet_address: Option<String>,
    pub avatar_url: Option<String>,
    pub verified: bool,
    pub followers: i32,
    pub total_raised: f64,
    pub completed_projects: i32,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<artists::Model> for ArtistResponse {
    fn from(model: artists::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            genre: model.genre,
            bio: model.bio,
            wallet_address: model.wallet_address,
            avatar_url: model.avatar_url,
            verified: model.verified,
            followers: model.followers,
            total_raised: model.total_raised,
            completed_projects: model.completed_projects,
            rating: model.rating,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArtistListQuery {
    /// Only return verified (or unverified) artists
    #[serde(default)]
    #[param(required = false)]
    pub verified: Option<bool>,
}

/// List artists, newest first
#[utoipa::path(
    get,
    path = "/artists",
    params(ArtistListQuery),
    responses(
        (status = 200, description = "Artists", body = Vec<ArtistResponse>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_artists(
    State(state): State<AppState>,
    Query(query): Query<ArtistListQuery>,
) -> Result<Json<Vec<ArtistResponse>>, AppError> {
    let artists = ArtistsRepository::list(&state.db, query.verified).await?;
    Ok(Json(artists.into_iter().map(ArtistResponse::from).collect()))
}

/// Register a new artist
#[utoipa::path(
    post,
    path = "/artists",
    request_body = CreateArtistRequest,
    responses(
        (status = 201, description = "Artist created", body = ArtistResponse),
        (status = 400, description = "Missing or malformed fields")
    )
)]
#[tracing::instrument(skip(state, request), fields(name = %request.name))]
pub async fn create_artist(
    State(state): State<AppState>,
    Json(request): Json<CreateArtistRequest>,
) -> Result<(StatusCode, Json<ArtistResponse>), AppError> {
    let new = NewArtist {
        name: validation::require_text("name", &request.name)?,
        genre: validation::require_text("genre", &request.genre)?,
        bio: request.bio.trim().to_string(),
        wallet_address: validation::optional_address("wallet_address", request.wallet_address.as_deref())?,
        avatar_url: request.avatar_url.filter(|u| !u.trim().is_empty()),
    };

    let artist = ArtistsRepository::create(&state.db, new).await?;
    tracing::info!("Registered artist {}", artist.id);
    Ok((StatusCode::CREATED, Json(artist.into())))
}

/// Fetch one artist
#[utoipa::path(
    get,
    path = "/artists/{id}",
    params(("id" = i32, Path, description = "Artist id")),
    responses(
        (status = 200, description = "Artist", body = ArtistResponse),
        (status = 404, description = "No such artist")
    )
)]
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistResponse>, AppError> {
    let artist = ArtistsRepository::get(&state.db, id).await?;
    Ok(Json(artist.into()))
}

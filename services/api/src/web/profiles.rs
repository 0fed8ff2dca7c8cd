//! services/api/src/web/profiles.rs
//!
//! Handlers for the user's profile. The row itself is created at signup.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use capture_core::{domain::Profile, ports::ProfilePatch};

use crate::web::port_err;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name,
            avatar_url: profile.avatar_url,
            company_name: profile.company_name,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// A partial profile update; omitted fields are left unchanged.
#[derive(Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub company_name: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Fetch the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "The profile", body = ProfileResponse),
        (status = 404, description = "No profile for this user")
    )
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = state.db.get_profile(user_id).await.map_err(port_err)?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// Update the authenticated user's profile.
#[utoipa::path(
    put,
    path = "/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "The updated profile", body = ProfileResponse),
        (status = 404, description = "No profile for this user")
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let patch = ProfilePatch {
        full_name: req.full_name,
        avatar_url: req.avatar_url,
        company_name: req.company_name,
    };
    let profile = state
        .db
        .update_profile(user_id, patch)
        .await
        .map_err(port_err)?;
    Ok(Json(ProfileResponse::from(profile)))
}

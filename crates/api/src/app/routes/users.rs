//! Handlers for the user resource.
//!
//! Create, update and delete answer with a plain-text confirmation; get and
//! list answer with JSON. Update and delete report success whether or not a
//! row matched the id.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Extension, Path,
    },
    Json,
};
use tracing::{debug, info};

use userbase_core::{User, UserId, UserProfile};

use crate::app::dto;
use crate::app::errors::{ApiError, INVALID_JSON, INVALID_USER_ID};
use crate::app::services::AppServices;

pub const USER_CREATED: &str = "User created Successfully.";
pub const USER_UPDATED: &str = "User updated Successfully.";
pub const USER_DELETED: &str = "User deleted Successfully.";

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<&'static str, ApiError> {
    let profile = decode_body(body)?;

    let id = services
        .users
        .insert(&profile)
        .await
        .map_err(|e| ApiError::store("Database insert failed", e))?;

    info!(user_id = %id, first_name = %profile.first_name, "user created");
    Ok(USER_CREATED)
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(raw_id)?;

    match services.users.find_by_id(id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(ApiError::RecordAbsent),
        Err(e) => Err(ApiError::store("Database error", e)),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    raw_id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<&'static str, ApiError> {
    let id = parse_id(raw_id)?;
    let profile = decode_body(body)?;

    let matched = services
        .users
        .replace_by_id(id, &profile)
        .await
        .map_err(|e| ApiError::store("Database update failed", e))?;

    if matched == 0 {
        debug!(user_id = %id, "update matched no rows");
    } else {
        info!(user_id = %id, "user updated");
    }
    Ok(USER_UPDATED)
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<&'static str, ApiError> {
    let id = parse_id(raw_id)?;

    let removed = services
        .users
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::store("Database delete failed", e))?;

    if removed == 0 {
        debug!(user_id = %id, "delete matched no rows");
    } else {
        info!(user_id = %id, "user deleted");
    }
    Ok(USER_DELETED)
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = services
        .users
        .find_all()
        .await
        .map_err(|e| ApiError::store("Database error", e))?;
    Ok(Json(users))
}

/// Path segments that fail to extract (e.g. invalid UTF-8 after
/// percent-decoding) are malformed ids like any other.
fn parse_id(raw_id: Result<Path<String>, PathRejection>) -> Result<UserId, ApiError> {
    let Path(raw) = raw_id.map_err(|e| {
        debug!(error = %e, "rejecting id segment");
        ApiError::RequestMalformed(INVALID_USER_ID)
    })?;
    Ok(raw.parse()?)
}

/// An unreadable body (including one over the size limit) is malformed JSON.
fn decode_body(body: Result<Bytes, BytesRejection>) -> Result<UserProfile, ApiError> {
    let body = body.map_err(|e| {
        debug!(error = %e, "rejecting request body");
        ApiError::RequestMalformed(INVALID_JSON)
    })?;
    dto::decode_user(&body)
}

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::rest::ApiResponse;
use crate::auth::Actor;
use crate::engine::stats;
use crate::error::AppError;
use crate::models::user::{User, UserRole, UserStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/register", post(register_user))
        .route("/users/search", get(search_user))
        .route("/users/stats", get(get_user_stats))
        .route("/users/:id/status", patch(change_user_status))
}

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: UserStatus,
}

#[derive(Debug, Serialize)]
pub struct DirectoryEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().chars().count() < 3 {
        return Err(AppError::BadRequest(
            "name must be at least 3 characters long".to_string(),
        ));
    }
    if !payload.email.contains('@') {
        return Err(AppError::BadRequest("invalid email address".to_string()));
    }
    if state.users.find_by_email(&payload.email).is_some() {
        return Err(AppError::BadRequest(
            "an account with this email already exists".to_string(),
        ));
    }

    let user = User {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        email: payload.email,
        phone: payload.phone,
        address: payload.address,
        role: payload.role,
        status: UserStatus::Active,
        created_at: Utc::now(),
    };
    state.users.insert(user.clone());

    info!(user_id = %user.id, role = ?user.role, "user registered");
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("User created successfully", user),
    ))
}

async fn search_user(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Admin, UserRole::Sender])?;

    let user = state
        .users
        .find_by_email(&query.email)
        .ok_or_else(|| AppError::NotFound("no user found with this email".to_string()))?;

    Ok(ApiResponse::ok(
        "User found",
        DirectoryEntry {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
    ))
}

async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    actor: Actor,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Admin])?;

    Ok(ApiResponse::ok(
        "User stats retrieved successfully",
        stats::user_stats(&state),
    ))
}

async fn change_user_status(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusChangeRequest>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Admin])?;
    let user = state.users.set_status(id, payload.status)?;

    info!(user_id = %user.id, status = ?user.status, "user status changed");
    Ok(ApiResponse::ok("User status updated successfully", user))
}

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::ApiResponse;
use crate::auth::Actor;
use crate::engine::queries::{self, ParcelQuery};
use crate::engine::{lifecycle, stats};
use crate::error::AppError;
use crate::models::parcel::{
    CreateParcelPayload, EditParcelPayload, ParcelStatus, StatusUpdatePayload,
};
use crate::models::user::UserRole;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/parcels", post(create_parcel).get(list_all_parcels))
        .route("/parcels/my", get(list_my_parcels))
        .route("/parcels/incoming", get(list_incoming_parcels))
        .route("/parcels/delivered", get(list_delivered_parcels))
        .route("/parcels/stats", get(get_parcel_stats))
        .route("/parcels/track/:tracking_id", get(track_parcel))
        .route(
            "/parcels/:id",
            get(get_single_parcel).patch(edit_parcel).delete(delete_parcel),
        )
        .route("/parcels/:id/status", patch(update_parcel_status))
        .route("/parcels/:id/cancel", patch(cancel_parcel))
        .route("/parcels/:id/confirm-delivery", patch(confirm_delivery))
        .route("/parcels/:id/block", patch(block_parcel))
        .route("/parcels/:id/unblock", patch(unblock_parcel))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub status: Option<ParcelStatus>,
}

impl ListQuery {
    fn to_query(&self, default_limit: usize) -> ParcelQuery {
        ParcelQuery {
            status: self.status,
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(default_limit),
            ..ParcelQuery::default()
        }
    }
}

async fn create_parcel(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(payload): Json<CreateParcelPayload>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Sender])?;
    let parcel = lifecycle::create_parcel(&state, actor.id, payload)?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Parcel created successfully", parcel),
    ))
}

async fn list_all_parcels(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Admin])?;
    let page = queries::list_parcels(&state, &query.to_query(50));

    Ok(ApiResponse::paginated(
        "All parcels retrieved successfully",
        page,
    ))
}

async fn list_my_parcels(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Sender])?;
    let mut filter = query.to_query(10);
    filter.sender = Some(actor.id);
    let page = queries::list_parcels(&state, &filter);

    Ok(ApiResponse::paginated(
        "Sender's parcels retrieved successfully",
        page,
    ))
}

async fn list_incoming_parcels(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Receiver])?;
    let mut filter = query.to_query(10);
    filter.receiver = Some(actor.id);
    let page = queries::list_parcels(&state, &filter);

    Ok(ApiResponse::paginated(
        "Receiver's incoming parcels retrieved successfully",
        page,
    ))
}

async fn list_delivered_parcels(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Receiver])?;
    let mut filter = query.to_query(50);
    filter.receiver = Some(actor.id);
    filter.status = Some(ParcelStatus::Delivered);
    let page = queries::list_parcels(&state, &filter);

    Ok(ApiResponse::paginated(
        "Delivered parcels retrieved successfully",
        page,
    ))
}

async fn get_parcel_stats(
    State(state): State<Arc<AppState>>,
    actor: Actor,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Admin])?;

    Ok(ApiResponse::ok(
        "Parcel statistics retrieved successfully",
        stats::parcel_stats(&state),
    ))
}

async fn track_parcel(
    State(state): State<Arc<AppState>>,
    Path(tracking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = lifecycle::public_parcel(&state, &tracking_id)?;

    Ok(ApiResponse::ok("Parcel details retrieved successfully", view))
}

async fn get_single_parcel(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let parcel = lifecycle::get_parcel(&state, &actor, id)?;

    Ok(ApiResponse::ok("Parcel details retrieved successfully", parcel))
}

async fn edit_parcel(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditParcelPayload>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Sender])?;
    let parcel = lifecycle::edit_parcel(&state, actor.id, id, payload)?;

    Ok(ApiResponse::ok("Parcel updated successfully", parcel))
}

async fn delete_parcel(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Admin, UserRole::Sender])?;
    let parcel = lifecycle::delete_parcel(&state, &actor, id)?;

    Ok(ApiResponse::ok("Parcel deleted successfully", parcel))
}

async fn update_parcel_status(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdatePayload>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Admin])?;
    let parcel = lifecycle::update_status(&state, actor.id, id, payload)?;

    Ok(ApiResponse::ok("Parcel status updated successfully", parcel))
}

async fn cancel_parcel(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Sender])?;
    let parcel = lifecycle::cancel_parcel(&state, actor.id, id)?;

    Ok(ApiResponse::ok("Parcel cancelled successfully", parcel))
}

async fn confirm_delivery(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Receiver])?;
    let parcel = lifecycle::confirm_delivery(&state, actor.id, id)?;

    Ok(ApiResponse::ok("Delivery confirmed successfully", parcel))
}

async fn block_parcel(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Admin])?;
    let parcel = lifecycle::set_blocked(&state, actor.id, id, true, None)?;

    Ok(ApiResponse::ok("Parcel blocked successfully", parcel))
}

async fn unblock_parcel(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    actor.require(&[UserRole::Admin])?;
    let parcel = lifecycle::set_blocked(&state, actor.id, id, false, None)?;

    Ok(ApiResponse::ok("Parcel unblocked successfully", parcel))
}

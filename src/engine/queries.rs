use serde::Serialize;
use uuid::Uuid;

use crate::models::parcel::{Parcel, ParcelStatus};
use crate::state::AppState;

pub const MAX_PAGE_SIZE: usize = 100;

/// Pages are 1-based.
#[derive(Debug, Clone, Default)]
pub struct ParcelQuery {
    pub sender: Option<Uuid>,
    pub receiver: Option<Uuid>,
    pub status: Option<ParcelStatus>,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
}

pub fn list_parcels(state: &AppState, query: &ParcelQuery) -> Page<Parcel> {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);

    let mut matches = state.parcels.collect(|parcel| {
        query.sender.is_none_or(|id| parcel.sender == id)
            && query.receiver.is_none_or(|id| parcel.receiver.user_id == id)
            && query.status.is_none_or(|status| parcel.current_status == status)
    });
    matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

    let total = matches.len();
    let data = matches
        .into_iter()
        .skip(page.saturating_sub(1).saturating_mul(limit))
        .take(limit)
        .collect();

    Page {
        data,
        page,
        limit,
        total,
    }
}

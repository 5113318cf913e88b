use chrono::{Duration, Utc};
use serde::Serialize;

use crate::models::parcel::ParcelStatus;
use crate::models::user::UserStatus;
use crate::state::AppState;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ParcelStats {
    pub total_parcels: u64,
    pub delivered_count: u64,
    pub in_transit_count: u64,
    pub approved_count: u64,
    pub returned_count: u64,
    pub cancelled_count: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserStats {
    pub total_users: u64,
    pub blocked_users: u64,
    pub new_users_last_30_days: u64,
}

pub fn parcel_stats(state: &AppState) -> ParcelStats {
    let mut stats = ParcelStats::default();

    state.parcels.for_each(|parcel| {
        stats.total_parcels += 1;
        match parcel.current_status {
            ParcelStatus::Delivered => stats.delivered_count += 1,
            ParcelStatus::InTransit => stats.in_transit_count += 1,
            ParcelStatus::Approved => stats.approved_count += 1,
            ParcelStatus::Returned => stats.returned_count += 1,
            ParcelStatus::Cancelled => stats.cancelled_count += 1,
            _ => {}
        }
    });

    stats
}

pub fn user_stats(state: &AppState) -> UserStats {
    let cutoff = Utc::now() - Duration::days(30);
    let mut stats = UserStats::default();

    state.users.for_each(|user| {
        stats.total_users += 1;
        if user.status == UserStatus::Blocked {
            stats.blocked_users += 1;
        }
        if user.created_at >= cutoff {
            stats.new_users_last_30_days += 1;
        }
    });

    stats
}

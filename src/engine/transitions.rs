use crate::models::parcel::ParcelStatus;

// Closed adjacency table; any pair not listed here is illegal. The reserved
// states `Picked` and `Held` have no outgoing edges in the base rule set.
pub fn allowed_targets(from: ParcelStatus) -> &'static [ParcelStatus] {
    match from {
        ParcelStatus::Requested => &[
            ParcelStatus::Approved,
            ParcelStatus::Cancelled,
            ParcelStatus::Held,
        ],
        ParcelStatus::Approved => &[
            ParcelStatus::Dispatched,
            ParcelStatus::Cancelled,
            ParcelStatus::Held,
        ],
        ParcelStatus::Dispatched => &[ParcelStatus::InTransit, ParcelStatus::Delivered],
        ParcelStatus::InTransit => &[ParcelStatus::Delivered],
        ParcelStatus::Picked | ParcelStatus::Held => &[],
        ParcelStatus::Delivered | ParcelStatus::Cancelled | ParcelStatus::Returned => &[],
    }
}

pub fn is_legal(from: ParcelStatus, to: ParcelStatus) -> bool {
    allowed_targets(from).contains(&to)
}

use tracing::info;
use uuid::Uuid;

use crate::auth::Actor;
use crate::engine::{tracking, transitions};
use crate::error::AppError;
use crate::models::parcel::{
    CreateParcelPayload, EditParcelPayload, Parcel, ParcelStatus, PublicParcelView,
    StatusUpdatePayload,
};
use crate::models::user::{User, UserRole};
use crate::state::AppState;

fn resolve_receiver(state: &AppState, email: &str, sender_id: Uuid) -> Result<User, AppError> {
    let user = state
        .users
        .find_by_email(email)
        .ok_or_else(|| AppError::NotFound(format!("no receiver account found for {email}")))?;

    if user.role != UserRole::Receiver {
        return Err(AppError::InvalidRole(
            "parcels can only be addressed to an account with the Receiver role".to_string(),
        ));
    }
    if user.id == sender_id {
        return Err(AppError::SelfAddressed);
    }

    Ok(user)
}

fn check_weight(weight: f64) -> Result<(), AppError> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(AppError::BadRequest(
            "weight must be a positive number".to_string(),
        ));
    }
    Ok(())
}

pub fn create_parcel(
    state: &AppState,
    sender_id: Uuid,
    payload: CreateParcelPayload,
) -> Result<Parcel, AppError> {
    check_weight(payload.weight)?;
    let receiver = resolve_receiver(state, &payload.receiver.email, sender_id)?;

    let parcel = Parcel::book(
        sender_id,
        tracking::generate_tracking_id(),
        &payload,
        receiver.id,
    );
    state.parcels.insert(parcel.clone());

    state.metrics.parcels_created_total.inc();
    info!(
        parcel_id = %parcel.id,
        tracking_id = %parcel.tracking_id,
        sender = %sender_id,
        "parcel created"
    );

    Ok(parcel)
}

// A plain edit appends no audit entry; only status changes and block
// toggles are logged.
pub fn edit_parcel(
    state: &AppState,
    sender_id: Uuid,
    parcel_id: Uuid,
    payload: EditParcelPayload,
) -> Result<Parcel, AppError> {
    let updated = state.parcels.update(parcel_id, |parcel| {
        if parcel.sender != sender_id {
            return Err(AppError::Forbidden(
                "only the sender of this parcel may edit it".to_string(),
            ));
        }
        if !parcel.is_editable() {
            return Err(AppError::InvalidState(
                "only parcels in Requested or Cancelled status can be edited".to_string(),
            ));
        }

        if let Some(weight) = payload.weight {
            check_weight(weight)?;
            parcel.weight = weight;
        }
        if let Some(parcel_type) = payload.parcel_type {
            parcel.parcel_type = parcel_type;
        }
        if let Some(delivery_address) = payload.delivery_address {
            parcel.delivery_address = delivery_address;
        }

        if let Some(receiver) = payload.receiver {
            if let Some(email) = receiver.email {
                if email != parcel.receiver.email {
                    let account = resolve_receiver(state, &email, parcel.sender)?;
                    parcel.receiver.user_id = account.id;
                    parcel.receiver.email = email;
                }
            }
            if let Some(name) = receiver.name {
                parcel.receiver.name = name;
            }
            if let Some(phone) = receiver.phone {
                parcel.receiver.phone = phone;
            }
            if let Some(address) = receiver.address {
                parcel.receiver.address = address;
            }
        }

        Ok(())
    })?;

    info!(parcel_id = %updated.id, actor_id = %sender_id, "parcel edited");
    Ok(updated)
}

pub fn cancel_parcel(
    state: &AppState,
    sender_id: Uuid,
    parcel_id: Uuid,
) -> Result<Parcel, AppError> {
    let updated = state.parcels.update(parcel_id, |parcel| {
        if parcel.sender != sender_id {
            return Err(AppError::Forbidden(
                "only the sender of this parcel may cancel it".to_string(),
            ));
        }
        if !matches!(
            parcel.current_status,
            ParcelStatus::Requested | ParcelStatus::Approved
        ) {
            return Err(AppError::InvalidState(
                "parcel can no longer be cancelled once it has been dispatched".to_string(),
            ));
        }

        parcel.transition_to(
            ParcelStatus::Cancelled,
            sender_id,
            None,
            Some("parcel was cancelled by sender".to_string()),
        );
        Ok(())
    })?;

    record_transition_metric(state, ParcelStatus::Cancelled);
    info!(parcel_id = %updated.id, actor_id = %sender_id, "parcel cancelled by sender");
    Ok(updated)
}

// Runs inside the entry lock, so racing updates serialize and the loser
// revalidates against the fresh status.
pub fn update_status(
    state: &AppState,
    admin_id: Uuid,
    parcel_id: Uuid,
    payload: StatusUpdatePayload,
) -> Result<Parcel, AppError> {
    let new_status = payload.status;

    let updated = state.parcels.update(parcel_id, |parcel| {
        if parcel.is_cancelled() || parcel.is_delivered() {
            return Err(AppError::InvalidState(
                "cannot update a cancelled or delivered parcel".to_string(),
            ));
        }
        if !transitions::is_legal(parcel.current_status, new_status) {
            return Err(AppError::IllegalTransition {
                from: parcel.current_status,
                to: new_status,
            });
        }

        parcel.transition_to(new_status, admin_id, payload.location, payload.note);
        Ok(())
    })?;

    record_transition_metric(state, new_status);
    info!(
        parcel_id = %updated.id,
        actor_id = %admin_id,
        status = ?new_status,
        "parcel status updated"
    );
    Ok(updated)
}

pub fn confirm_delivery(
    state: &AppState,
    receiver_id: Uuid,
    parcel_id: Uuid,
) -> Result<Parcel, AppError> {
    let updated = state.parcels.update(parcel_id, |parcel| {
        if parcel.receiver.user_id != receiver_id {
            return Err(AppError::Forbidden(
                "only the addressed receiver may confirm this delivery".to_string(),
            ));
        }
        if parcel.current_status != ParcelStatus::InTransit {
            return Err(AppError::InvalidState(
                "parcel must be In Transit before delivery can be confirmed".to_string(),
            ));
        }

        parcel.transition_to(
            ParcelStatus::Delivered,
            receiver_id,
            None,
            Some("delivery confirmed by receiver".to_string()),
        );
        Ok(())
    })?;

    record_transition_metric(state, ParcelStatus::Delivered);
    info!(parcel_id = %updated.id, actor_id = %receiver_id, "delivery confirmed");
    Ok(updated)
}

// Requesting the block state the parcel is already in is a hard error,
// not a silent success.
pub fn set_blocked(
    state: &AppState,
    admin_id: Uuid,
    parcel_id: Uuid,
    blocked: bool,
    note: Option<String>,
) -> Result<Parcel, AppError> {
    let updated = state.parcels.update(parcel_id, |parcel| {
        if parcel.is_blocked == blocked {
            let already = if blocked { "blocked" } else { "unblocked" };
            return Err(AppError::NoOp(format!("parcel is already {already}")));
        }

        let note = note.unwrap_or_else(|| {
            if blocked {
                "parcel was blocked by admin".to_string()
            } else {
                "parcel was unblocked by admin".to_string()
            }
        });
        parcel.record_block(blocked, admin_id, Some(note));
        Ok(())
    })?;

    let action = if blocked { "block" } else { "unblock" };
    state
        .metrics
        .block_toggles_total
        .with_label_values(&[action])
        .inc();
    info!(parcel_id = %updated.id, actor_id = %admin_id, blocked, "parcel block flag updated");
    Ok(updated)
}

pub fn delete_parcel(state: &AppState, actor: &Actor, parcel_id: Uuid) -> Result<Parcel, AppError> {
    let removed = state.parcels.remove_where(parcel_id, |parcel| {
        if !actor.is_admin() && parcel.sender != actor.id {
            return Err(AppError::Forbidden(
                "only the sender or an admin may delete this parcel".to_string(),
            ));
        }
        if !parcel.is_editable() {
            return Err(AppError::InvalidState(
                "only parcels in Requested or Cancelled status can be deleted".to_string(),
            ));
        }
        Ok(())
    })?;

    state.metrics.parcels_deleted_total.inc();
    info!(parcel_id = %removed.id, actor_id = %actor.id, "parcel deleted");
    Ok(removed)
}

pub fn get_parcel(state: &AppState, actor: &Actor, parcel_id: Uuid) -> Result<Parcel, AppError> {
    let parcel = state
        .parcels
        .get(parcel_id)
        .ok_or_else(|| AppError::NotFound(format!("parcel {parcel_id} not found")))?;

    let allowed = match actor.role {
        UserRole::Admin => true,
        UserRole::Sender => parcel.sender == actor.id,
        UserRole::Receiver => parcel.receiver.user_id == actor.id,
    };
    if !allowed {
        return Err(AppError::Forbidden(
            "you are not authorized to view this parcel".to_string(),
        ));
    }

    Ok(parcel)
}

pub fn public_parcel(state: &AppState, tracking_id: &str) -> Result<PublicParcelView, AppError> {
    let parcel = state
        .parcels
        .find_by_tracking_id(tracking_id)
        .ok_or_else(|| AppError::NotFound(format!("no parcel found for {tracking_id}")))?;

    Ok(PublicParcelView::from_parcel(&parcel))
}

fn record_transition_metric(state: &AppState, status: ParcelStatus) {
    let label = format!("{status:?}");
    state
        .metrics
        .status_transitions_total
        .with_label_values(&[label.as_str()])
        .inc();
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParcelStatus {
    Requested,
    Approved,
    Dispatched,
    Picked,
    #[serde(rename = "In Transit")]
    InTransit,
    Held,
    Delivered,
    Cancelled,
    Returned,
}

/// Block toggles never change `current_status`, so they carry their own
/// variant instead of reusing the status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AuditEvent {
    Lifecycle { status: ParcelStatus },
    Block { blocked: bool },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(flatten)]
    pub event: AuditEvent,
    pub timestamp: DateTime<Utc>,
    pub updated_by: Uuid,
    pub location: Option<String>,
    pub note: Option<String>,
}

/// Only `user_id` is resolved against the user directory; the free-text
/// fields are sender-supplied and may diverge from the directory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parcel {
    pub id: Uuid,
    pub tracking_id: String,
    pub parcel_type: String,
    pub weight: f64,
    pub delivery_address: String,
    pub sender: Uuid,
    pub receiver: ReceiverInfo,
    pub current_status: ParcelStatus,
    pub is_blocked: bool,
    pub status_logs: Vec<AuditEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl Parcel {
    pub fn book(
        sender: Uuid,
        tracking_id: String,
        payload: &CreateParcelPayload,
        receiver_user_id: Uuid,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            tracking_id,
            parcel_type: payload.parcel_type.clone(),
            weight: payload.weight,
            delivery_address: payload.delivery_address.clone(),
            sender,
            receiver: ReceiverInfo {
                name: payload.receiver.name.clone(),
                email: payload.receiver.email.clone(),
                phone: payload.receiver.phone.clone(),
                address: payload.receiver.address.clone(),
                user_id: receiver_user_id,
            },
            current_status: ParcelStatus::Requested,
            is_blocked: false,
            status_logs: vec![AuditEntry {
                event: AuditEvent::Lifecycle {
                    status: ParcelStatus::Requested,
                },
                timestamp: now,
                updated_by: sender,
                location: None,
                note: Some("parcel delivery request created by sender".to_string()),
            }],
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.current_status == ParcelStatus::Cancelled
    }

    pub fn is_delivered(&self) -> bool {
        self.current_status == ParcelStatus::Delivered
    }

    pub fn is_editable(&self) -> bool {
        matches!(
            self.current_status,
            ParcelStatus::Requested | ParcelStatus::Cancelled
        )
    }

    pub fn transition_to(
        &mut self,
        status: ParcelStatus,
        updated_by: Uuid,
        location: Option<String>,
        note: Option<String>,
    ) {
        self.current_status = status;
        self.status_logs.push(AuditEntry {
            event: AuditEvent::Lifecycle { status },
            timestamp: Utc::now(),
            updated_by,
            location,
            note,
        });
    }

    pub fn record_block(&mut self, blocked: bool, updated_by: Uuid, note: Option<String>) {
        self.is_blocked = blocked;
        self.status_logs.push(AuditEntry {
            event: AuditEvent::Block { blocked },
            timestamp: Utc::now(),
            updated_by,
            location: None,
            note,
        });
    }

    #[cfg(test)]
    pub fn last_logged_status(&self) -> Option<ParcelStatus> {
        self.status_logs.iter().rev().find_map(|entry| match entry.event {
            AuditEvent::Lifecycle { status } => Some(status),
            AuditEvent::Block { .. } => None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiverPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateParcelPayload {
    pub parcel_type: String,
    pub weight: f64,
    pub delivery_address: String,
    pub receiver: ReceiverPayload,
}

/// Omitted fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditParcelPayload {
    pub parcel_type: Option<String>,
    pub weight: Option<f64>,
    pub delivery_address: Option<String>,
    pub receiver: Option<EditReceiverPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditReceiverPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdatePayload {
    pub status: ParcelStatus,
    pub location: Option<String>,
    pub note: Option<String>,
}

/// Anonymous tracking omits actor ids, receiver contact details and block
/// events.
#[derive(Debug, Clone, Serialize)]
pub struct PublicParcelView {
    pub tracking_id: String,
    pub parcel_type: String,
    pub current_status: ParcelStatus,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub timeline: Vec<PublicTimelineEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicTimelineEntry {
    pub status: ParcelStatus,
    pub timestamp: DateTime<Utc>,
    pub location: Option<String>,
    pub note: Option<String>,
}

impl PublicParcelView {
    pub fn from_parcel(parcel: &Parcel) -> Self {
        let timeline = parcel
            .status_logs
            .iter()
            .filter_map(|entry| match entry.event {
                AuditEvent::Lifecycle { status } => Some(PublicTimelineEntry {
                    status,
                    timestamp: entry.timestamp,
                    location: entry.location.clone(),
                    note: entry.note.clone(),
                }),
                AuditEvent::Block { .. } => None,
            })
            .collect();

        Self {
            tracking_id: parcel.tracking_id.clone(),
            parcel_type: parcel.parcel_type.clone(),
            current_status: parcel.current_status,
            is_blocked: parcel.is_blocked,
            created_at: parcel.created_at,
            timeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{
        AuditEvent, CreateParcelPayload, Parcel, ParcelStatus, PublicParcelView, ReceiverPayload,
    };

    fn payload() -> CreateParcelPayload {
        CreateParcelPayload {
            parcel_type: "documents".to_string(),
            weight: 1.5,
            delivery_address: "12 Harbour Lane".to_string(),
            receiver: ReceiverPayload {
                name: "Rina".to_string(),
                email: "rina@example.com".to_string(),
                phone: "555-0101".to_string(),
                address: "12 Harbour Lane".to_string(),
            },
        }
    }

    #[test]
    fn booked_parcel_starts_requested_with_one_log_entry() {
        let sender = Uuid::new_v4();
        let receiver = Uuid::new_v4();
        let parcel = Parcel::book(sender, "TRK-20250101-ABC123".to_string(), &payload(), receiver);

        assert_eq!(parcel.current_status, ParcelStatus::Requested);
        assert_eq!(parcel.status_logs.len(), 1);
        assert_eq!(
            parcel.status_logs[0].event,
            AuditEvent::Lifecycle {
                status: ParcelStatus::Requested
            }
        );
        assert_eq!(parcel.status_logs[0].updated_by, sender);
        assert_eq!(parcel.receiver.user_id, receiver);
        assert!(!parcel.is_blocked);
        assert_eq!(parcel.version, 0);
    }

    #[test]
    fn derived_flags_follow_current_status() {
        let mut parcel = Parcel::book(
            Uuid::new_v4(),
            "TRK-20250101-ABC123".to_string(),
            &payload(),
            Uuid::new_v4(),
        );
        assert!(!parcel.is_cancelled());
        assert!(!parcel.is_delivered());

        parcel.transition_to(ParcelStatus::Cancelled, Uuid::new_v4(), None, None);
        assert!(parcel.is_cancelled());
        assert!(!parcel.is_delivered());
    }

    #[test]
    fn block_entries_do_not_shadow_the_lifecycle_status() {
        let admin = Uuid::new_v4();
        let mut parcel = Parcel::book(
            Uuid::new_v4(),
            "TRK-20250101-ABC123".to_string(),
            &payload(),
            Uuid::new_v4(),
        );
        parcel.transition_to(ParcelStatus::Approved, admin, None, None);
        parcel.record_block(true, admin, None);

        assert_eq!(parcel.current_status, ParcelStatus::Approved);
        assert_eq!(parcel.last_logged_status(), Some(ParcelStatus::Approved));
        assert_eq!(parcel.status_logs.len(), 3);
    }

    #[test]
    fn in_transit_serializes_with_a_space() {
        let json = serde_json::to_string(&ParcelStatus::InTransit).unwrap();
        assert_eq!(json, r#""In Transit""#);

        let round_trip: ParcelStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(round_trip, ParcelStatus::InTransit);
    }

    #[test]
    fn public_view_drops_block_events_and_private_fields() {
        let admin = Uuid::new_v4();
        let mut parcel = Parcel::book(
            Uuid::new_v4(),
            "TRK-20250101-ABC123".to_string(),
            &payload(),
            Uuid::new_v4(),
        );
        parcel.transition_to(ParcelStatus::Approved, admin, Some("Depot 4".to_string()), None);
        parcel.record_block(true, admin, None);

        let view = PublicParcelView::from_parcel(&parcel);
        assert_eq!(view.timeline.len(), 2);
        assert_eq!(view.timeline[1].status, ParcelStatus::Approved);
        assert_eq!(view.timeline[1].location.as_deref(), Some("Depot 4"));

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("receiver").is_none());
        assert!(json.get("sender").is_none());
        assert!(json.get("delivery_address").is_none());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;
use crate::enums::PhoneCallStatus;

/// A phone line. Numbers are globally unique; a character may hold several
/// with at most one marked primary by the telephony game logic.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhoneNumber {
    pub id: Uuid,
    pub number: String,
    pub character_id: Option<Uuid>,
    pub is_primary: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for PhoneNumber {
    const TABLE: &'static str = "phone_numbers";
}

/// An address-book entry; unique per (owning line, contact number).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhoneContact {
    pub id: Uuid,
    pub owner_number_id: Uuid,
    pub name: String,
    pub number: String,
}

impl Entity for PhoneContact {
    const TABLE: &'static str = "phone_contacts";
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhoneMessage {
    pub id: Uuid,
    pub from_number_id: Uuid,
    pub to_number_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
    pub meta: Value,
}

impl Entity for PhoneMessage {
    const TABLE: &'static str = "phone_messages";
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhoneCall {
    pub id: Uuid,
    pub from_number_id: Uuid,
    pub to_number_id: Uuid,
    pub status: PhoneCallStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_sec: i32,
    pub meta: Value,
}

impl Entity for PhoneCall {
    const TABLE: &'static str = "phone_calls";
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vai trò của một bên trong cuộc trò chuyện hai người.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Passenger,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "driver" => Some(Self::Driver),
            "passenger" => Some(Self::Passenger),
            _ => None,
        }
    }

    /// Wire form, also used as a REST path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Passenger => "passenger",
        }
    }

    /// The other party's role in the same conversation.
    pub fn counterpart(self) -> Self {
        match self {
            Self::Driver => Self::Passenger,
            Self::Passenger => Self::Driver,
        }
    }

    /// Generic display label shown when profile lookup fails.
    pub fn fallback_label(self) -> &'static str {
        match self {
            Self::Driver => "Driver",
            Self::Passenger => "Passenger",
        }
    }
}

/// Signed-in identity, loaded once from local storage and passed explicitly
/// into the chat layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

/// Domain model đại diện một tin nhắn chat.
///
/// The backend owns these records; the client holds read-only copies and
/// trusts the server-returned order. `sender_id` always equals one side of
/// the (driver, passenger) pair as produced by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub driver_id: String,
    pub passenger_id: String,
    /// Ride correlation tag, orthogonal to the pair keying the history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<i64>,
    pub sender_id: String,
    pub sender_role: Role,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn sender_matches_pair(&self) -> bool {
        self.sender_id == self.driver_id || self.sender_id == self.passenger_id
    }
}

/// Body of `POST /api/chat/send`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub driver_id: String,
    pub passenger_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<i64>,
    pub sender_id: String,
    pub sender_role: Role,
    pub message: String,
}

/// Per-counterpart summary populating the chat list screen. Derived by the
/// backend from message history; never persisted client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub partner_id: String,
    #[serde(default)]
    pub partner_name: Option<String>,
    pub last_message: String,
    pub last_timestamp: DateTime<Utc>,
}

/// Profile payload from the driver/passenger endpoints. Only the name
/// fields matter here (display-name resolution).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Profile {
    pub fn display_name(&self) -> Option<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if name.trim().is_empty() { None } else { Some(name) }
    }
}

/// A WGS84 point, kept as lat/lng for map callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

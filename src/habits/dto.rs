use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{Frequency, Habit};

/// Request body for habit creation.
#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
}

/// Request body for a full habit update. Ownership and creation time are
/// not part of the payload and cannot be changed.
#[derive(Debug, Deserialize)]
pub struct UpdateHabitRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
}

/// Habit as returned to the client; the owner reference stays internal.
#[derive(Debug, Serialize)]
pub struct HabitResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub created_at: OffsetDateTime,
}

impl From<Habit> for HabitResponse {
    fn from(h: Habit) -> Self {
        Self {
            id: h.id,
            name: h.name,
            description: h.description,
            frequency: h.frequency,
            created_at: h.created_at,
        }
    }
}

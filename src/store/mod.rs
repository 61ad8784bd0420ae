use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

/// User record in the credential store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 digest, never exposed in JSON
    pub created_at: OffsetDateTime,
}

/// How often a habit is expected to be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "habit_frequency", rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
}

/// Habit record. `owner_id` is set at creation and never reassigned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Habit {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub created_at: OffsetDateTime,
}

/// Fields supplied by the caller when creating a habit.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub frequency: Frequency,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated. The store is the authority on
    /// uniqueness; races between concurrent writers surface here.
    #[error("duplicate record")]
    Duplicate,
    #[error("store unavailable")]
    Unavailable(#[source] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;
}

#[async_trait]
pub trait HabitStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Habit>, StoreError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Habit>, StoreError>;
    async fn insert(&self, habit: NewHabit) -> Result<Habit, StoreError>;
    async fn update(&self, habit: &Habit) -> Result<Habit, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Habit, HabitStore, NewHabit, StoreError, User, UserStore};

/// sqlx-backed store; a single pool serves both collaborators.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = e {
        // 23505 = unique_violation
        if db.code().as_deref() == Some("23505") {
            return StoreError::Duplicate;
        }
    }
    StoreError::Unavailable(e.into())
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }
}

#[async_trait]
impl HabitStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Habit>, StoreError> {
        sqlx::query_as::<_, Habit>(
            r#"
            SELECT id, owner_id, name, description, frequency, created_at
            FROM habits
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Habit>, StoreError> {
        sqlx::query_as::<_, Habit>(
            r#"
            SELECT id, owner_id, name, description, frequency, created_at
            FROM habits
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn insert(&self, habit: NewHabit) -> Result<Habit, StoreError> {
        sqlx::query_as::<_, Habit>(
            r#"
            INSERT INTO habits (owner_id, name, description, frequency)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_id, name, description, frequency, created_at
            "#,
        )
        .bind(habit.owner_id)
        .bind(habit.name)
        .bind(habit.description)
        .bind(habit.frequency)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn update(&self, habit: &Habit) -> Result<Habit, StoreError> {
        sqlx::query_as::<_, Habit>(
            r#"
            UPDATE habits
            SET name = $2, description = $3, frequency = $4
            WHERE id = $1
            RETURNING id, owner_id, name, description, frequency, created_at
            "#,
        )
        .bind(habit.id)
        .bind(&habit.name)
        .bind(&habit.description)
        .bind(habit.frequency)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }
}

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Habit, HabitStore, NewHabit, StoreError, User, UserStore};

/// In-process store backing `AppState::fake` and the unit tests.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    habits: RwLock<HashMap<Uuid, Habit>>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl HabitStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Habit>, StoreError> {
        let habits = self.habits.read().unwrap_or_else(|e| e.into_inner());
        Ok(habits.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Habit>, StoreError> {
        let habits = self.habits.read().unwrap_or_else(|e| e.into_inner());
        let mut rows: Vec<Habit> = habits
            .values()
            .filter(|h| h.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, habit: NewHabit) -> Result<Habit, StoreError> {
        let mut habits = self.habits.write().unwrap_or_else(|e| e.into_inner());
        let habit = Habit {
            id: Uuid::new_v4(),
            owner_id: habit.owner_id,
            name: habit.name,
            description: habit.description,
            frequency: habit.frequency,
            created_at: OffsetDateTime::now_utc(),
        };
        habits.insert(habit.id, habit.clone());
        Ok(habit)
    }

    async fn update(&self, habit: &Habit) -> Result<Habit, StoreError> {
        let mut habits = self.habits.write().unwrap_or_else(|e| e.into_inner());
        let existing = habits
            .get_mut(&habit.id)
            .ok_or_else(|| StoreError::Unavailable(anyhow::anyhow!("no such habit")))?;
        existing.name = habit.name.clone();
        existing.description = habit.description.clone();
        existing.frequency = habit.frequency;
        Ok(existing.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut habits = self.habits.write().unwrap_or_else(|e| e.into_inner());
        habits.remove(&id);
        Ok(())
    }
}

use tracing::info;
use uuid::Uuid;

use super::dto::{CreateHabitRequest, UpdateHabitRequest};
use crate::{
    auth::service::{authorize_owner, CurrentUser},
    error::ApiError,
    state::AppState,
    store::{Habit, NewHabit},
};

/// Listing is always scoped to the caller; there is no global listing path.
pub async fn list_habits(state: &AppState, identity: &CurrentUser) -> Result<Vec<Habit>, ApiError> {
    Ok(state.habits.list_by_owner(identity.user.id).await?)
}

pub async fn create_habit(
    state: &AppState,
    identity: &CurrentUser,
    req: CreateHabitRequest,
) -> Result<Habit, ApiError> {
    let habit = state
        .habits
        .insert(NewHabit {
            owner_id: identity.user.id,
            name: req.name,
            description: req.description,
            frequency: req.frequency,
        })
        .await?;
    info!(habit_id = %habit.id, user_id = %identity.user.id, "habit created");
    Ok(habit)
}

/// Lookup happens before the ownership check, so an unknown id stays
/// `NotFound` while someone else's id stays `Forbidden`.
async fn find_owned(
    state: &AppState,
    identity: &CurrentUser,
    id: Uuid,
) -> Result<Habit, ApiError> {
    let habit = state
        .habits
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    authorize_owner(identity, habit.owner_id)?;
    Ok(habit)
}

pub async fn update_habit(
    state: &AppState,
    identity: &CurrentUser,
    id: Uuid,
    req: UpdateHabitRequest,
) -> Result<Habit, ApiError> {
    let mut habit = find_owned(state, identity, id).await?;
    habit.name = req.name;
    habit.description = req.description;
    habit.frequency = req.frequency;
    Ok(state.habits.update(&habit).await?)
}

pub async fn delete_habit(
    state: &AppState,
    identity: &CurrentUser,
    id: Uuid,
) -> Result<(), ApiError> {
    let habit = find_owned(state, identity, id).await?;
    state.habits.delete(habit.id).await?;
    info!(habit_id = %habit.id, user_id = %identity.user.id, "habit deleted");
    Ok(())
}

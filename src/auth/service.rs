use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{auth::password, error::ApiError, state::AppState, store::User};

/// Identity resolved from a bearer token, valid for one request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn require_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "email and password are required".into(),
        ));
    }
    Ok(())
}

/// Registers a new account and returns an identity token for it.
pub async fn register(state: &AppState, email: &str, password: &str) -> Result<String, ApiError> {
    require_credentials(email, password)?;
    if !is_valid_email(email) {
        warn!(%email, "invalid email");
        return Err(ApiError::Validation("invalid email".into()));
    }

    if state.users.find_by_email(email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::Conflict);
    }

    let hash = password::hash_password(password).map_err(ApiError::Unavailable)?;

    // The store is the authority on uniqueness; a concurrent registration
    // that wins the race surfaces as a duplicate and becomes the same
    // conflict as the early check above.
    let user = state.users.insert(email, &hash).await?;

    let token = state.keys.issue(&user.email).map_err(ApiError::Unavailable)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(token)
}

/// Authenticates credentials and returns a fresh identity token. Unknown
/// email and wrong password produce the same outward failure.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<String, ApiError> {
    require_credentials(email, password)?;

    let user = match state.users.find_by_email(email).await? {
        Some(u) => u,
        None => {
            warn!(%email, "login with unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !password::verify_password(password, &user.password_hash) {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.keys.issue(&user.email).map_err(ApiError::Unavailable)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

/// Turns an optional bearer token into an authenticated identity. A missing
/// token, any validation failure and a subject with no stored user are all
/// the same rejection; nothing distinguishes them outward.
pub async fn resolve_identity(
    state: &AppState,
    token: Option<&str>,
) -> Result<CurrentUser, ApiError> {
    let token = token.ok_or(ApiError::Unauthenticated)?;
    let email = state.keys.validate(token).map_err(|e| {
        warn!(reason = %e, "token rejected");
        ApiError::Unauthenticated
    })?;
    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(ApiError::from)?
        .ok_or(ApiError::Unauthenticated)?;
    Ok(CurrentUser { user })
}

/// Allow iff the authenticated user owns the resource.
pub fn authorize_owner(identity: &CurrentUser, resource_owner_id: Uuid) -> Result<(), ApiError> {
    if identity.user.id != resource_owner_id {
        warn!(user_id = %identity.user.id, owner_id = %resource_owner_id, "ownership check failed");
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtKeys;
    use time::Duration;

    #[tokio::test]
    async fn register_then_login_yields_distinct_valid_tokens() {
        let state = AppState::fake();
        let t1 = register(&state, "a@x.com", "pw123").await.expect("register");
        let t2 = login(&state, "a@x.com", "pw123").await.expect("login");
        assert_ne!(t1, t2);
        assert_eq!(state.keys.validate(&t1).unwrap(), "a@x.com");
        assert_eq!(state.keys.validate(&t2).unwrap(), "a@x.com");
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_conflict() {
        let state = AppState::fake();
        register(&state, "a@x.com", "pw123").await.expect("register");
        let err = register(&state, "a@x.com", "other-pw").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict));
    }

    #[tokio::test]
    async fn missing_fields_are_a_validation_error() {
        let state = AppState::fake();
        assert!(matches!(
            register(&state, "", "pw123").await.unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            register(&state, "a@x.com", "").await.unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            login(&state, "", "pw123").await.unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            login(&state, "a@x.com", "").await.unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let state = AppState::fake();
        register(&state, "a@x.com", "pw123").await.expect("register");

        let unknown = login(&state, "b@x.com", "pw123").await.unwrap_err();
        let wrong = login(&state, "a@x.com", "not-the-password").await.unwrap_err();
        assert!(matches!(unknown, ApiError::InvalidCredentials));
        assert!(matches!(wrong, ApiError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn resolve_identity_returns_the_registered_user() {
        let state = AppState::fake();
        let token = register(&state, "a@x.com", "pw123").await.expect("register");
        let identity = resolve_identity(&state, Some(&token)).await.expect("resolve");
        assert_eq!(identity.user.email, "a@x.com");
    }

    #[tokio::test]
    async fn all_resolution_failures_are_the_same_rejection() {
        let state = AppState::fake();
        register(&state, "a@x.com", "pw123").await.expect("register");

        // No token at all.
        assert!(matches!(
            resolve_identity(&state, None).await.unwrap_err(),
            ApiError::Unauthenticated
        ));

        // Garbage token.
        assert!(matches!(
            resolve_identity(&state, Some("not-a-token")).await.unwrap_err(),
            ApiError::Unauthenticated
        ));

        // Expired token signed with the right key.
        let expired_keys = JwtKeys::new("test-secret", Duration::hours(-1));
        let expired = expired_keys.issue("a@x.com").expect("issue");
        assert!(matches!(
            resolve_identity(&state, Some(&expired)).await.unwrap_err(),
            ApiError::Unauthenticated
        ));

        // Valid token whose subject no longer resolves to a user.
        let stale = state.keys.issue("ghost@x.com").expect("issue");
        assert!(matches!(
            resolve_identity(&state, Some(&stale)).await.unwrap_err(),
            ApiError::Unauthenticated
        ));
    }

    #[tokio::test]
    async fn authorize_owner_allows_only_the_owner() {
        let state = AppState::fake();
        let token = register(&state, "a@x.com", "pw123").await.expect("register");
        let identity = resolve_identity(&state, Some(&token)).await.expect("resolve");

        assert!(authorize_owner(&identity, identity.user.id).is_ok());
        assert!(matches!(
            authorize_owner(&identity, Uuid::new_v4()).unwrap_err(),
            ApiError::Forbidden
        ));
    }
}

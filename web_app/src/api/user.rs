//! # User API Module
//!
//! Login of doctors and pet owners. Passwords are stored as Argon2 PHC
//! strings and verified on read.

use crate::{consts, front::errors::ApiError, metric, models, repo};
use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// Checks `candidate` against a stored PHC string.
///
/// A stored value that is not a PHC string never matches, whatever the
/// candidate is.
pub fn verify_password(stored: &str, candidate: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(hash) => Argon2::default()
            .verify_password(candidate.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// Validates the credentials and returns the session summary of the user.
///
/// # Errors
/// `InvalidInput` if a field is blank, `Unauthenticated` on an unknown
/// username or a wrong password.
pub async fn login(
    username: &str,
    password: &str,
    repo: &repo::ImplAppRepo,
) -> Result<models::user_app::SessionUser, ApiError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }

    let Some(user) = repo.get_user_by_username(username).await? else {
        metric::incr_login_statds("unknown_user");
        return Err(ApiError::Unauthenticated);
    };

    if !user.password.starts_with(consts::ARGON2_PHC_PREFIX) {
        logfire::warn!(
            "user {username} has a password that is not hashed, run the hash-passwords script",
            username = username.to_string()
        );
    }

    if !verify_password(&user.password, password) {
        metric::incr_login_statds("invalid_password");
        return Err(ApiError::Unauthenticated);
    }

    metric::incr_login_statds("success");
    logfire::info!(
        "user {user_id} logged in as {user_type}",
        user_id = user.id,
        user_type = user.user_type.to_string()
    );

    Ok(models::user_app::SessionUser::from(&user))
}

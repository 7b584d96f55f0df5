use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, Default)]
pub enum UserType {
    #[serde(rename = "doctor")]
    #[display("doctor")]
    Doctor,
    #[default]
    #[serde(rename = "pet-owner")]
    #[display("pet-owner")]
    PetOwner,
}

impl std::str::FromStr for UserType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "doctor" => Ok(UserType::Doctor),
            "pet-owner" => Ok(UserType::PetOwner),
            other => anyhow::bail!("unknown user_type: {other}"),
        }
    }
}

/// Stored account. `password` holds an Argon2 PHC string.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a logged user is allowed to see of itself, also the identity cookie payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub user_type: UserType,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        SessionUser {
            id: user.id,
            username: user.username.clone(),
            user_type: user.user_type,
        }
    }
}

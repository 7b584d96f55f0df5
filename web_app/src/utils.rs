//! Helper functions could be used in api/, front/, ...

use crate::config;
use anyhow::anyhow;
use argon2::Argon2;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
};
use std::str::FromStr;
use uuid::Uuid;

pub async fn setup_sqlite_db_pool(encrypted: bool) -> anyhow::Result<SqlitePool> {
    let app_config = &*config::APP_CONFIG;
    if encrypted {
        return Ok(SqlitePool::connect_with(
            SqliteConnectOptions::from_str(&app_config.db_host)?
                .pragma("key", app_config.db_pass_encrypt.clone())
                .pragma("cipher_page_size", "1024")
                .pragma("kdf_iter", "64000")
                .pragma("cipher_hmac_algorithm", "HMAC_SHA1")
                .pragma("cipher_kdf_algorithm", "PBKDF2_HMAC_SHA1")
                .pragma("foreign_keys", "ON")
                .journal_mode(SqliteJournalMode::Delete),
        )
        .await?);
    }

    Ok(SqlitePool::connect_with(
        SqliteConnectOptions::from_str(&app_config.db_host)?.pragma("foreign_keys", "ON"),
    )
    .await?)
}

/// Derives a 32 bytes key from two uuids. Used to sign the identity cookie.
pub fn build_key(pwd: &Uuid, salt: &Uuid) -> anyhow::Result<[u8; 32]> {
    let mut key = [0u8; 32];
    Argon2::default()
        .hash_password_into(pwd.as_bytes(), salt.as_bytes(), &mut key)
        .map_err(|err| anyhow!("key couldn't be created: {}", err))?;

    Ok(key)
}

/// Fresh key on every start, so cookies do not survive a restart
pub fn build_random_key() -> anyhow::Result<[u8; 32]> {
    build_key(&Uuid::new_v4(), &Uuid::new_v4())
}

/// Trims a request text field
pub fn clean_text(value: &str) -> String {
    value.trim().to_string()
}

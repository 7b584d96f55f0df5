pub mod sqlite;
pub mod sqlite_queries;

use crate::models;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppRepo {
    /// Cheap round trip to check the store is reachable
    async fn ping(&self) -> anyhow::Result<()>;

    /// Releases the underlying connections. The repo is unusable afterwards.
    async fn close(&self);

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> anyhow::Result<Option<models::user_app::User>>;

    /// Finds the owner/vet with this exact `(name, contact_number)` or creates it.
    ///
    /// Two concurrent calls with the same identity may both insert; the
    /// duplicate rows are harmless and accepted.
    async fn upsert_contact(
        &self,
        kind: models::contact::ContactKind,
        name: &str,
        contact_number: &str,
    ) -> anyhow::Result<models::contact::Contact>;

    async fn get_contact_by_id(
        &self,
        kind: models::contact::ContactKind,
        contact_id: i64,
    ) -> anyhow::Result<Option<models::contact::Contact>>;

    async fn update_contact(
        &self,
        kind: models::contact::ContactKind,
        contact_id: i64,
        name: &str,
        contact_number: &str,
    ) -> anyhow::Result<()>;

    async fn delete_contact(
        &self,
        kind: models::contact::ContactKind,
        contact_id: i64,
    ) -> anyhow::Result<()>;

    /// Whether any pet still points at this owner/vet
    async fn is_contact_referenced(
        &self,
        kind: models::contact::ContactKind,
        contact_id: i64,
    ) -> anyhow::Result<bool>;

    async fn insert_pet(&self, pet: &models::pet::Pet) -> anyhow::Result<i64>;

    async fn update_pet(&self, pet: &models::pet::Pet) -> anyhow::Result<()>;

    async fn delete_pet(&self, pet_id: i64) -> anyhow::Result<()>;

    async fn get_pet_by_id(&self, pet_id: i64) -> anyhow::Result<Option<models::pet::Pet>>;

    async fn get_pet_details_by_id(
        &self,
        pet_id: i64,
    ) -> anyhow::Result<Option<models::pet::PetDetails>>;

    async fn get_pet_details_by_microchip(
        &self,
        microchip_number: &str,
    ) -> anyhow::Result<Option<models::pet::PetDetails>>;

    async fn get_all_pet_details(&self) -> anyhow::Result<Vec<models::pet::PetDetails>>;

    /// Newest first
    async fn get_recent_pet_details(
        &self,
        limit: i64,
    ) -> anyhow::Result<Vec<models::pet::PetDetails>>;

    /// Every pet, in insertion order
    async fn get_pet_stat_rows(&self) -> anyhow::Result<Vec<models::pet::PetStatRow>>;

    /// Whole conversation, oldest first
    async fn get_chat_history(
        &self,
        microchip_number: &str,
    ) -> anyhow::Result<Vec<models::chat::ChatMessage>>;

    /// The `limit` latest messages of a conversation, oldest first
    async fn get_latest_chat_messages(
        &self,
        microchip_number: &str,
        limit: i64,
    ) -> anyhow::Result<Vec<models::chat::ChatMessage>>;

    async fn insert_chat_message(
        &self,
        microchip_number: &str,
        sender: models::chat::ChatSender,
        message: &str,
    ) -> anyhow::Result<models::chat::ChatMessage>;

    async fn insert_doctor_message(
        &self,
        message: &models::chat::DoctorMessage,
    ) -> anyhow::Result<i64>;

    /// Newest first
    async fn get_pending_doctor_messages(
        &self,
    ) -> anyhow::Result<Vec<models::chat::DoctorMessage>>;

    /// Moves the message to `read`. Returns `false` when the id does not exist.
    /// The first read time is kept when the message was already read.
    async fn mark_doctor_message_read(
        &self,
        message_id: i64,
        read_at: DateTime<Utc>,
    ) -> anyhow::Result<bool>;
}

pub type ImplAppRepo = Box<dyn AppRepo>;

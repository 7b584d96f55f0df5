use crate::models::{self, contact::ContactKind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Row, SqlitePool, sqlite::SqliteRow};

use super::{AppRepo, sqlite_queries};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

/// Decodes a text column through `FromStr`, reporting bad values as decode errors
fn try_get_parsed<T>(row: &SqliteRow, column: &str) -> sqlx::Result<T>
where
    T: std::str::FromStr<Err = anyhow::Error>,
{
    let value: String = row.try_get(column)?;
    value.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: e.into(),
    })
}

fn try_get_gender(row: &SqliteRow) -> sqlx::Result<models::pet::PetGender> {
    Ok(models::pet::PetGender::parse(&row.try_get::<String, &str>("gender")?).unwrap_or_default())
}

impl FromRow<'_, SqliteRow> for models::pet::Pet {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            pet_type: models::pet::PetType::from_tag(row.try_get("pet_type")?),
            race: row.try_get("race")?,
            gender: try_get_gender(row)?,
            birthdate: row.try_get("birthdate")?,
            microchip_number: row.try_get("microchip_number")?,
            completed_vaccinations: row.try_get("completed_vaccinations")?,
            scheduled_vaccinations: row.try_get("scheduled_vaccinations")?,
            allergy: row.try_get("allergy")?,
            owner_id: row.try_get("owner_id")?,
            vet_id: row.try_get("vet_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::pet::PetDetails {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            pet_type: models::pet::PetType::from_tag(row.try_get("pet_type")?),
            race: row.try_get("race")?,
            gender: try_get_gender(row)?,
            birthdate: row.try_get("birthdate")?,
            microchip_number: row.try_get("microchip_number")?,
            completed_vaccinations: row.try_get("completed_vaccinations")?,
            scheduled_vaccinations: row.try_get("scheduled_vaccinations")?,
            allergy: row.try_get("allergy")?,
            owner_id: row.try_get("owner_id")?,
            vet_id: row.try_get("vet_id")?,
            owner_name: row.try_get("owner_name")?,
            owner_contact: row.try_get("owner_contact")?,
            vet_name: row.try_get("vet_name")?,
            vet_contact: row.try_get("vet_contact")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::pet::PetStatRow {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            pet_type: models::pet::PetType::from_tag(row.try_get("pet_type")?),
            completed_vaccinations: row.try_get("completed_vaccinations")?,
            scheduled_vaccinations: row.try_get("scheduled_vaccinations")?,
            allergy: row.try_get("allergy")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::contact::Contact {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            contact_number: row.try_get("contact_number")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::user_app::User {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password: row.try_get("password")?,
            user_type: try_get_parsed(row, "user_type")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::chat::ChatMessage {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            microchip_number: row.try_get("microchip_number")?,
            sender: try_get_parsed(row, "sender")?,
            message: row.try_get("message")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::chat::DoctorMessage {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            microchip_number: row.try_get("microchip_number")?,
            owner_name: row.try_get("owner_name")?,
            owner_contact: row.try_get("owner_contact")?,
            pet_name: row.try_get("pet_name")?,
            pet_type: row.try_get("pet_type")?,
            summary: row.try_get("summary")?,
            pet_info: serde_json::from_str(row.try_get("pet_info")?)
                .unwrap_or_else(|_| serde_json::json!({})),
            status: try_get_parsed(row, "status")?,
            read_at: row.try_get("read_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn find_contact_query(kind: ContactKind) -> &'static str {
    match kind {
        ContactKind::Owner => sqlite_queries::QUERY_FIND_PET_OWNER,
        ContactKind::Vet => sqlite_queries::QUERY_FIND_VET,
    }
}

fn insert_contact_query(kind: ContactKind) -> &'static str {
    match kind {
        ContactKind::Owner => sqlite_queries::QUERY_INSERT_PET_OWNER,
        ContactKind::Vet => sqlite_queries::QUERY_INSERT_VET,
    }
}

#[async_trait]
impl AppRepo for SqlxSqliteRepo {
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(sqlx::query("SELECT 1;")
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn close(&self) {
        self.db_pool.close().await
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> anyhow::Result<Option<models::user_app::User>> {
        Ok(sqlx::query_as::<_, models::user_app::User>(
            sqlite_queries::QUERY_GET_USER_BY_USERNAME,
        )
        .bind(username)
        .fetch_optional(&self.db_pool)
        .await?)
    }

    async fn upsert_contact(
        &self,
        kind: ContactKind,
        name: &str,
        contact_number: &str,
    ) -> anyhow::Result<models::contact::Contact> {
        if let Some(contact) =
            sqlx::query_as::<_, models::contact::Contact>(find_contact_query(kind))
                .bind(name)
                .bind(contact_number)
                .fetch_optional(&self.db_pool)
                .await?
        {
            return Ok(contact);
        }

        let now = Utc::now();
        Ok(
            sqlx::query_as::<_, models::contact::Contact>(insert_contact_query(kind))
                .bind(name)
                .bind(contact_number)
                .bind(now)
                .bind(now)
                .fetch_one(&self.db_pool)
                .await?,
        )
    }

    async fn get_contact_by_id(
        &self,
        kind: ContactKind,
        contact_id: i64,
    ) -> anyhow::Result<Option<models::contact::Contact>> {
        let query = match kind {
            ContactKind::Owner => sqlite_queries::QUERY_GET_PET_OWNER_BY_ID,
            ContactKind::Vet => sqlite_queries::QUERY_GET_VET_BY_ID,
        };

        Ok(sqlx::query_as::<_, models::contact::Contact>(query)
            .bind(contact_id)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn update_contact(
        &self,
        kind: ContactKind,
        contact_id: i64,
        name: &str,
        contact_number: &str,
    ) -> anyhow::Result<()> {
        let query = match kind {
            ContactKind::Owner => sqlite_queries::QUERY_UPDATE_PET_OWNER,
            ContactKind::Vet => sqlite_queries::QUERY_UPDATE_VET,
        };

        Ok(sqlx::query(query)
            .bind(contact_id)
            .bind(name)
            .bind(contact_number)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn delete_contact(&self, kind: ContactKind, contact_id: i64) -> anyhow::Result<()> {
        let query = match kind {
            ContactKind::Owner => sqlite_queries::QUERY_DELETE_PET_OWNER,
            ContactKind::Vet => sqlite_queries::QUERY_DELETE_VET,
        };

        Ok(sqlx::query(query)
            .bind(contact_id)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn is_contact_referenced(
        &self,
        kind: ContactKind,
        contact_id: i64,
    ) -> anyhow::Result<bool> {
        let query = match kind {
            ContactKind::Owner => sqlite_queries::QUERY_IS_PET_OWNER_REFERENCED,
            ContactKind::Vet => sqlite_queries::QUERY_IS_VET_REFERENCED,
        };

        let referenced = sqlx::query_scalar::<_, i64>(query)
            .bind(contact_id)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(referenced != 0)
    }

    async fn insert_pet(&self, pet: &models::pet::Pet) -> anyhow::Result<i64> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_PET)
            .bind(&pet.name)
            .bind(pet.pet_type.to_string())
            .bind(&pet.race)
            .bind(pet.gender.to_string())
            .bind(pet.birthdate)
            .bind(&pet.microchip_number)
            .bind(&pet.completed_vaccinations)
            .bind(&pet.scheduled_vaccinations)
            .bind(&pet.allergy)
            .bind(pet.owner_id)
            .bind(pet.vet_id)
            .bind(pet.created_at)
            .bind(pet.updated_at)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn update_pet(&self, pet: &models::pet::Pet) -> anyhow::Result<()> {
        sqlx::query(sqlite_queries::QUERY_UPDATE_PET)
            .bind(pet.id)
            .bind(&pet.name)
            .bind(pet.pet_type.to_string())
            .bind(&pet.race)
            .bind(pet.gender.to_string())
            .bind(pet.birthdate)
            .bind(&pet.microchip_number)
            .bind(&pet.completed_vaccinations)
            .bind(&pet.scheduled_vaccinations)
            .bind(&pet.allergy)
            .bind(pet.vet_id)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    async fn delete_pet(&self, pet_id: i64) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_DELETE_PET)
            .bind(pet_id)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn get_pet_by_id(&self, pet_id: i64) -> anyhow::Result<Option<models::pet::Pet>> {
        Ok(
            sqlx::query_as::<_, models::pet::Pet>(sqlite_queries::QUERY_GET_PET_BY_ID)
                .bind(pet_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn get_pet_details_by_id(
        &self,
        pet_id: i64,
    ) -> anyhow::Result<Option<models::pet::PetDetails>> {
        let query = sqlite_queries::query_get_pet_details_by_id();

        Ok(sqlx::query_as::<_, models::pet::PetDetails>(&query)
            .bind(pet_id)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn get_pet_details_by_microchip(
        &self,
        microchip_number: &str,
    ) -> anyhow::Result<Option<models::pet::PetDetails>> {
        let query = sqlite_queries::query_get_pet_details_by_microchip();

        Ok(sqlx::query_as::<_, models::pet::PetDetails>(&query)
            .bind(microchip_number)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn get_all_pet_details(&self) -> anyhow::Result<Vec<models::pet::PetDetails>> {
        let query = sqlite_queries::query_get_all_pet_details();

        Ok(sqlx::query_as::<_, models::pet::PetDetails>(&query)
            .fetch_all(&self.db_pool)
            .await?)
    }

    async fn get_recent_pet_details(
        &self,
        limit: i64,
    ) -> anyhow::Result<Vec<models::pet::PetDetails>> {
        let query = sqlite_queries::query_get_recent_pet_details();

        Ok(sqlx::query_as::<_, models::pet::PetDetails>(&query)
            .bind(limit)
            .fetch_all(&self.db_pool)
            .await?)
    }

    async fn get_pet_stat_rows(&self) -> anyhow::Result<Vec<models::pet::PetStatRow>> {
        Ok(
            sqlx::query_as::<_, models::pet::PetStatRow>(sqlite_queries::QUERY_GET_PET_STAT_ROWS)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn get_chat_history(
        &self,
        microchip_number: &str,
    ) -> anyhow::Result<Vec<models::chat::ChatMessage>> {
        Ok(
            sqlx::query_as::<_, models::chat::ChatMessage>(sqlite_queries::QUERY_GET_CHAT_HISTORY)
                .bind(microchip_number)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn get_latest_chat_messages(
        &self,
        microchip_number: &str,
        limit: i64,
    ) -> anyhow::Result<Vec<models::chat::ChatMessage>> {
        Ok(sqlx::query_as::<_, models::chat::ChatMessage>(
            sqlite_queries::QUERY_GET_LATEST_CHAT_MESSAGES,
        )
        .bind(microchip_number)
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn insert_chat_message(
        &self,
        microchip_number: &str,
        sender: models::chat::ChatSender,
        message: &str,
    ) -> anyhow::Result<models::chat::ChatMessage> {
        Ok(sqlx::query_as::<_, models::chat::ChatMessage>(
            sqlite_queries::QUERY_INSERT_CHAT_MESSAGE,
        )
        .bind(microchip_number)
        .bind(sender.to_string())
        .bind(message)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?)
    }

    async fn insert_doctor_message(
        &self,
        message: &models::chat::DoctorMessage,
    ) -> anyhow::Result<i64> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_DOCTOR_MESSAGE)
            .bind(&message.microchip_number)
            .bind(&message.owner_name)
            .bind(&message.owner_contact)
            .bind(&message.pet_name)
            .bind(&message.pet_type)
            .bind(&message.summary)
            .bind(message.pet_info.to_string())
            .bind(message.status.to_string())
            .bind(message.read_at)
            .bind(message.created_at)
            .bind(message.updated_at)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn get_pending_doctor_messages(
        &self,
    ) -> anyhow::Result<Vec<models::chat::DoctorMessage>> {
        Ok(sqlx::query_as::<_, models::chat::DoctorMessage>(
            sqlite_queries::QUERY_GET_PENDING_DOCTOR_MESSAGES,
        )
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn mark_doctor_message_read(
        &self,
        message_id: i64,
        read_at: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(sqlite_queries::QUERY_MARK_DOCTOR_MESSAGE_READ)
            .bind(message_id)
            .bind(read_at)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Single connection in-memory database loaded with the project schema
#[cfg(test)]
pub async fn in_memory_repo() -> SqlxSqliteRepo {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(
            SqliteConnectOptions::from_str("sqlite::memory:")
                .unwrap()
                .foreign_keys(true),
        )
        .await
        .unwrap();

    sqlx::raw_sql(include_str!("../../../migrations/0001_init.sql"))
        .execute(&db_pool)
        .await
        .unwrap();

    SqlxSqliteRepo { db_pool }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{chat::ChatSender, pet::Pet};

    async fn insert_test_pet(repo: &SqlxSqliteRepo, name: &str, owner: &str) -> i64 {
        let owner = repo
            .upsert_contact(ContactKind::Owner, owner, "")
            .await
            .unwrap();
        let now = Utc::now();
        repo.insert_pet(&Pet {
            name: name.into(),
            owner_id: owner.id,
            created_at: now,
            updated_at: now,
            ..Default::default()
        })
        .await
        .unwrap()
    }

    #[ntex::test]
    async fn test_upsert_contact_reuses_exact_identity() {
        let repo = in_memory_repo().await;

        let first = repo
            .upsert_contact(ContactKind::Owner, "Ahmet", "555")
            .await
            .unwrap();
        let same = repo
            .upsert_contact(ContactKind::Owner, "Ahmet", "555")
            .await
            .unwrap();
        let other_contact = repo
            .upsert_contact(ContactKind::Owner, "Ahmet", "")
            .await
            .unwrap();
        let vet = repo
            .upsert_contact(ContactKind::Vet, "Ahmet", "555")
            .await
            .unwrap();

        assert_eq!(first.id, same.id);
        assert_ne!(first.id, other_contact.id);
        assert!(
            repo.get_contact_by_id(ContactKind::Vet, vet.id)
                .await
                .unwrap()
                .is_some_and(|v| v.name == "Ahmet")
        );
    }

    #[ntex::test]
    async fn test_is_contact_referenced_follows_pets() {
        let repo = in_memory_repo().await;
        let pet_id = insert_test_pet(&repo, "Max", "Ahmet").await;
        let pet = repo.get_pet_by_id(pet_id).await.unwrap().unwrap();

        assert!(
            repo.is_contact_referenced(ContactKind::Owner, pet.owner_id)
                .await
                .unwrap()
        );

        repo.delete_pet(pet_id).await.unwrap();

        assert!(
            !repo
                .is_contact_referenced(ContactKind::Owner, pet.owner_id)
                .await
                .unwrap()
        );
    }

    #[ntex::test]
    async fn test_pet_details_inline_owner_and_missing_vet() {
        let repo = in_memory_repo().await;
        let pet_id = insert_test_pet(&repo, "Luna", "Ayse").await;

        let details = repo.get_pet_details_by_id(pet_id).await.unwrap().unwrap();

        assert_eq!(details.name, "Luna");
        assert_eq!(details.owner_name, "Ayse");
        assert_eq!(details.vet_name, "");
        assert_eq!(details.vet_id, None);
        assert!(repo.get_pet_details_by_id(pet_id + 1).await.unwrap().is_none());
    }

    #[ntex::test]
    async fn test_latest_chat_messages_are_the_newest_in_ascending_order() {
        let repo = in_memory_repo().await;
        for i in 0..5 {
            repo.insert_chat_message("CHIP1", ChatSender::User, &format!("msg {i}"))
                .await
                .unwrap();
        }
        repo.insert_chat_message("CHIP2", ChatSender::User, "other")
            .await
            .unwrap();

        let latest = repo.get_latest_chat_messages("CHIP1", 3).await.unwrap();
        let texts: Vec<&str> = latest.iter().map(|m| m.message.as_str()).collect();

        assert_eq!(texts, vec!["msg 2", "msg 3", "msg 4"]);
        assert_eq!(repo.get_chat_history("CHIP1").await.unwrap().len(), 5);
    }

    #[ntex::test]
    async fn test_mark_doctor_message_read_unknown_id() {
        let repo = in_memory_repo().await;

        assert!(
            !repo
                .mark_doctor_message_read(42, Utc::now())
                .await
                .unwrap()
        );
    }

    #[ntex::test]
    async fn test_mark_doctor_message_read_keeps_first_read_at() {
        let repo = in_memory_repo().await;
        let now = Utc::now();
        let message_id = repo
            .insert_doctor_message(&models::chat::DoctorMessage {
                microchip_number: "DOG001".into(),
                summary: "vomiting since yesterday".into(),
                pet_info: serde_json::json!({}),
                created_at: now,
                updated_at: now,
                ..Default::default()
            })
            .await
            .unwrap();

        let first_read = now + chrono::TimeDelta::minutes(5);
        assert!(repo.mark_doctor_message_read(message_id, first_read).await.unwrap());
        assert!(
            repo.mark_doctor_message_read(message_id, first_read + chrono::TimeDelta::hours(1))
                .await
                .unwrap()
        );

        let read_at: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT read_at FROM doctor_message WHERE id = ?")
                .bind(message_id)
                .fetch_one(&repo.db_pool)
                .await
                .unwrap();
        assert_eq!(read_at, Some(first_read));
        assert!(repo.get_pending_doctor_messages().await.unwrap().is_empty());
    }

    #[ntex::test]
    async fn test_ping_and_close() {
        let repo = in_memory_repo().await;

        assert!(repo.ping().await.is_ok());
        repo.close().await;
        assert!(repo.ping().await.is_err());
    }
}

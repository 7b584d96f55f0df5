//! Doctor handoff: conversation summaries queued for doctor review

use crate::{
    front::errors::ApiError,
    metric,
    models::{
        self,
        chat::{DoctorMessage, DoctorMessageStatus},
    },
    repo,
};
use chrono::Utc;
use serde_json::json;

/// Queues a summary for the doctors with the current owner and pet display
/// fields copied onto it.
///
/// # Returns
/// The new doctor message id
///
/// # Errors
/// `InvalidInput` on a blank microchip number or summary, `NotFound` when no
/// pet has that microchip number. Nothing is written in both cases.
pub async fn send_to_doctor(
    microchip_number: &str,
    summary: &str,
    pet_info: Option<serde_json::Value>,
    repo: &repo::ImplAppRepo,
) -> Result<i64, ApiError> {
    let microchip_number = microchip_number.trim();
    let summary = summary.trim();
    if microchip_number.is_empty() || summary.is_empty() {
        return Err(ApiError::InvalidInput(
            "Microchip number and summary are required".to_string(),
        ));
    }

    let pet = repo
        .get_pet_details_by_microchip(microchip_number)
        .await?
        .ok_or_else(|| ApiError::NotFound("Pet not found".to_string()))?;

    let now = Utc::now();
    let message = DoctorMessage {
        microchip_number: microchip_number.to_string(),
        owner_name: pet.owner_name,
        owner_contact: pet.owner_contact,
        pet_name: pet.name,
        pet_type: pet.pet_type.to_string(),
        summary: summary.to_string(),
        pet_info: pet_info
            .filter(|info| !info.is_null())
            .unwrap_or_else(|| json!({})),
        status: DoctorMessageStatus::Pending,
        read_at: None,
        created_at: now,
        updated_at: now,
        ..Default::default()
    };

    let message_id = repo.insert_doctor_message(&message).await?;

    metric::incr_doctor_handoff_statds("sent");
    logfire::info!(
        "doctor message {message_id} queued for {microchip_number}",
        message_id = message_id,
        microchip_number = microchip_number.to_string()
    );

    Ok(message_id)
}

/// Moves a message to `read`. Marking an already read message again succeeds
/// and keeps its first read time.
pub async fn mark_read(message_id: i64, repo: &repo::ImplAppRepo) -> Result<(), ApiError> {
    if !repo.mark_doctor_message_read(message_id, Utc::now()).await? {
        return Err(ApiError::NotFound("Message not found".to_string()));
    }

    metric::incr_doctor_handoff_statds("read");

    Ok(())
}

/// Pending messages, newest first
pub async fn list_pending(
    repo: &repo::ImplAppRepo,
) -> Result<Vec<models::chat::DoctorMessage>, ApiError> {
    Ok(repo.get_pending_doctor_messages().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api,
        front::forms,
        repo::{MockAppRepo, sqlite::in_memory_repo},
    };

    async fn repo_with_pet(microchip_number: &str) -> repo::ImplAppRepo {
        let repo: repo::ImplAppRepo = Box::new(in_memory_repo().await);
        api::pet::create_pet(
            &forms::pet::PetRecordForm {
                pet_name: "Max".into(),
                pet_type: "Dog".into(),
                pet_microchip_number: microchip_number.into(),
                pet_owner_name: "Ahmet".into(),
                pet_owner_contact_number: "555-0101".into(),
                ..Default::default()
            },
            &repo,
        )
        .await
        .unwrap();
        repo
    }

    #[ntex::test]
    async fn test_unknown_microchip_writes_nothing() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_pet_details_by_microchip()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_insert_doctor_message().never();
        let repo: repo::ImplAppRepo = Box::new(mock_repo);

        assert_eq!(
            send_to_doctor("NOPE", "vomiting since morning", None, &repo).await,
            Err(ApiError::NotFound("Pet not found".into()))
        );
    }

    #[ntex::test]
    async fn test_blank_summary_is_invalid() {
        let repo: repo::ImplAppRepo = Box::new(MockAppRepo::new());

        assert!(matches!(
            send_to_doctor("DOG001", " ", None, &repo).await,
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[ntex::test]
    async fn test_send_to_doctor_denormalizes_owner_and_pet() {
        let repo = repo_with_pet("DOG001").await;

        let message_id = send_to_doctor(
            "DOG001",
            "Max vomited twice today",
            Some(json!({"name": "Max"})),
            &repo,
        )
        .await
        .unwrap();

        let pending = list_pending(&repo).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, message_id);
        assert_eq!(pending[0].owner_name, "Ahmet");
        assert_eq!(pending[0].owner_contact, "555-0101");
        assert_eq!(pending[0].pet_name, "Max");
        assert_eq!(pending[0].pet_type, "Dog");
        assert_eq!(pending[0].pet_info, json!({"name": "Max"}));
        assert_eq!(pending[0].status, DoctorMessageStatus::Pending);
    }

    #[ntex::test]
    async fn test_list_pending_newest_first() {
        let repo = repo_with_pet("DOG001").await;

        let first = send_to_doctor("DOG001", "first", None, &repo).await.unwrap();
        let second = send_to_doctor("DOG001", "second", None, &repo).await.unwrap();

        let ids: Vec<i64> = list_pending(&repo)
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[ntex::test]
    async fn test_mark_read_is_idempotent() {
        let repo = repo_with_pet("DOG001").await;
        let message_id = send_to_doctor("DOG001", "summary", None, &repo).await.unwrap();

        mark_read(message_id, &repo).await.unwrap();
        mark_read(message_id, &repo).await.unwrap();

        assert!(list_pending(&repo).await.unwrap().is_empty());
        assert_eq!(
            mark_read(message_id + 1, &repo).await,
            Err(ApiError::NotFound("Message not found".into()))
        );
    }
}

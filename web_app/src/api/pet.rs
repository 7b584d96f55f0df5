//! # Pet Record API Module
//!
//! Create, read, update and delete of pet records, plus the owner/vet
//! find-or-create and the cascade delete of contacts no pet points at anymore.

use crate::{
    consts,
    front::{errors::ApiError, forms},
    metric,
    models::{
        self,
        contact::ContactKind,
        pet::{PetGender, PetType},
    },
    repo, utils,
};
use chrono::{DateTime, NaiveDate, Utc};

/// A [forms::pet::PetRecordForm] that passed validation
#[derive(Debug, Clone, PartialEq)]
struct ValidatedRecord {
    pet: models::pet::Pet,
    owner_name: String,
    owner_contact: String,
    vet: Option<(String, String)>,
}

fn parse_birthdate(value: &str) -> Result<Option<NaiveDate>, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, consts::BIRTHDATE_INPUT_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map(Some)
        .map_err(|_| ApiError::InvalidInput(format!("invalid pet birthdate: {value}")))
}

/// Checks the required fields and normalizes the rest. Text is trimmed and a
/// blank optional field stays blank.
fn validate_record(form: &forms::pet::PetRecordForm) -> Result<ValidatedRecord, ApiError> {
    let name = utils::clean_text(&form.pet_name);
    let pet_type = utils::clean_text(&form.pet_type);
    let owner_name = utils::clean_text(&form.pet_owner_name);

    if name.is_empty() || pet_type.is_empty() || owner_name.is_empty() {
        return Err(ApiError::InvalidInput(
            "Required fields are missing".to_string(),
        ));
    }

    let gender = PetGender::parse(&form.pet_gender).ok_or_else(|| {
        ApiError::InvalidInput(format!("invalid pet gender: {}", form.pet_gender.trim()))
    })?;

    let vet_name = utils::clean_text(&form.vet_name);
    let vet = (!vet_name.is_empty()).then(|| (vet_name, utils::clean_text(&form.vet_contact_number)));

    Ok(ValidatedRecord {
        pet: models::pet::Pet {
            name,
            pet_type: PetType::from_tag(&pet_type),
            race: utils::clean_text(&form.pet_race),
            gender,
            birthdate: parse_birthdate(&form.pet_birthdate)?,
            microchip_number: utils::clean_text(&form.pet_microchip_number),
            completed_vaccinations: utils::clean_text(&form.completed_vaccinations),
            scheduled_vaccinations: utils::clean_text(&form.scheduled_vaccinations),
            allergy: utils::clean_text(&form.allergy),
            ..Default::default()
        },
        owner_name,
        owner_contact: utils::clean_text(&form.pet_owner_contact_number),
        vet,
    })
}

fn pet_not_found() -> ApiError {
    ApiError::NotFound("Pet not found".to_string())
}

/// Creates a pet, reusing the owner and vet with the exact same name and
/// contact number or creating them.
///
/// # Returns
/// The new pet id
///
/// # Errors
/// `InvalidInput` when name, type or owner name is missing, the gender is not
/// one of the accepted values or the birthdate can not be parsed.
pub async fn create_pet(
    form: &forms::pet::PetRecordForm,
    repo: &repo::ImplAppRepo,
) -> Result<i64, ApiError> {
    let _span = logfire::span!("create_pet").entered();

    let record = validate_record(form)?;

    let owner = repo
        .upsert_contact(ContactKind::Owner, &record.owner_name, &record.owner_contact)
        .await?;

    let vet_id = match &record.vet {
        Some((name, contact)) => Some(repo.upsert_contact(ContactKind::Vet, name, contact).await?.id),
        None => None,
    };

    let now = Utc::now();
    let pet = models::pet::Pet {
        owner_id: owner.id,
        vet_id,
        created_at: now,
        updated_at: now,
        ..record.pet
    };

    let pet_id = repo.insert_pet(&pet).await?;

    metric::incr_record_action_statds("create");
    logfire::info!("pet {pet_id} created", pet_id = pet_id);

    Ok(pet_id)
}

/// Overwrites every field of the pet. A blank field clears the stored value.
///
/// The linked owner is updated in place when its name or contact changed. A
/// linked vet is updated when a vet name is given; a pet without vet gets one
/// linked the same way create does.
pub async fn update_pet(
    pet_id: i64,
    form: &forms::pet::PetRecordForm,
    repo: &repo::ImplAppRepo,
) -> Result<(), ApiError> {
    let _span = logfire::span!("update_pet").entered();

    let current = repo.get_pet_by_id(pet_id).await?.ok_or_else(pet_not_found)?;
    let record = validate_record(form)?;

    let vet_id = match (current.vet_id, &record.vet) {
        (Some(vet_id), Some((name, contact))) => {
            repo.update_contact(ContactKind::Vet, vet_id, name, contact)
                .await?;
            Some(vet_id)
        }
        (None, Some((name, contact))) => {
            Some(repo.upsert_contact(ContactKind::Vet, name, contact).await?.id)
        }
        (vet_id, None) => vet_id,
    };

    repo.update_pet(&models::pet::Pet {
        id: current.id,
        owner_id: current.owner_id,
        vet_id,
        created_at: current.created_at,
        updated_at: Utc::now(),
        ..record.pet
    })
    .await?;

    let owner_changed = repo
        .get_contact_by_id(ContactKind::Owner, current.owner_id)
        .await?
        .is_some_and(|owner| {
            owner.name != record.owner_name || owner.contact_number != record.owner_contact
        });
    if owner_changed {
        repo.update_contact(
            ContactKind::Owner,
            current.owner_id,
            &record.owner_name,
            &record.owner_contact,
        )
        .await?;
    }

    metric::incr_record_action_statds("update");

    Ok(())
}

async fn delete_contact_if_orphan(
    kind: ContactKind,
    contact_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<()> {
    if repo.is_contact_referenced(kind, contact_id).await? {
        return Ok(());
    }

    repo.delete_contact(kind, contact_id).await?;

    metric::incr_record_action_statds(&format!("cascade_delete_{kind}"));
    logfire::info!(
        "{kind} {contact_id} deleted, no pet references it",
        kind = kind.to_string(),
        contact_id = contact_id
    );

    Ok(())
}

/// Deletes the pet, then its owner and vet when no other pet references them.
///
/// The steps are independent writes: a failure after the pet delete leaves an
/// unreferenced owner/vet row behind.
pub async fn delete_pet(pet_id: i64, repo: &repo::ImplAppRepo) -> Result<(), ApiError> {
    let _span = logfire::span!("delete_pet").entered();

    let pet = repo.get_pet_by_id(pet_id).await?.ok_or_else(pet_not_found)?;

    repo.delete_pet(pet.id).await?;
    metric::incr_record_action_statds("delete");

    delete_contact_if_orphan(ContactKind::Owner, pet.owner_id, repo).await?;
    if let Some(vet_id) = pet.vet_id {
        delete_contact_if_orphan(ContactKind::Vet, vet_id, repo).await?;
    }

    Ok(())
}

pub async fn get_pet(
    pet_id: i64,
    repo: &repo::ImplAppRepo,
) -> Result<models::pet::PetDetails, ApiError> {
    repo.get_pet_details_by_id(pet_id)
        .await?
        .ok_or_else(pet_not_found)
}

/// Lookup used by pet owners, who log in with the microchip number
pub async fn get_pet_by_microchip(
    microchip_number: &str,
    repo: &repo::ImplAppRepo,
) -> Result<models::pet::PetDetails, ApiError> {
    let microchip_number = microchip_number.trim();
    if microchip_number.is_empty() {
        return Err(ApiError::InvalidInput(
            "Microchip number is required".to_string(),
        ));
    }

    repo.get_pet_details_by_microchip(microchip_number)
        .await?
        .ok_or_else(|| ApiError::NotFound("No pet found with this microchip number".to_string()))
}

pub async fn list_pets(repo: &repo::ImplAppRepo) -> Result<Vec<models::pet::PetDetails>, ApiError> {
    Ok(repo.get_all_pet_details().await?)
}

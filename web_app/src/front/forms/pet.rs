use serde::{Deserialize, Serialize};

/// Pet record as sent by the client on create and update.
/// Missing keys deserialize as empty strings.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct PetRecordForm {
    pub pet_name: String,
    pub pet_type: String,
    pub pet_race: String,
    pub pet_gender: String,
    /// `YYYY-MM-DD`, an RFC 3339 timestamp is accepted too
    pub pet_birthdate: String,
    pub pet_microchip_number: String,
    pub completed_vaccinations: String,
    pub scheduled_vaccinations: String,
    pub allergy: String,
    pub pet_owner_name: String,
    pub pet_owner_contact_number: String,
    pub vet_name: String,
    pub vet_contact_number: String,
}

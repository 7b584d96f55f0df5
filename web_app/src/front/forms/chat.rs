use crate::models;
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatMessageForm {
    pub microchip_number: String,
    pub message: String,
    pub pet_info: Option<models::chat::PetContext>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SendToDoctorForm {
    pub microchip_number: String,
    pub summary: String,
    /// Stored as sent
    pub pet_info: Option<serde_json::Value>,
}

use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Species tags accepted on a pet record
#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum PetType {
    #[display("Dog")]
    Dog,
    #[display("Cat")]
    Cat,
    #[display("Bird")]
    Bird,
    #[display("Rabbit")]
    Rabbit,
    #[display("Hamster")]
    Hamster,
    #[default]
    #[display("Other")]
    Other,
}

impl PetType {
    /// Maps a free tag to a species. Anything outside the fixed set is `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "dog" => PetType::Dog,
            "cat" => PetType::Cat,
            "bird" => PetType::Bird,
            "rabbit" => PetType::Rabbit,
            "hamster" => PetType::Hamster,
            _ => PetType::Other,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum PetGender {
    #[display("Male")]
    Male,
    #[display("Female")]
    Female,
    #[default]
    #[serde(rename = "")]
    #[display("")]
    Unspecified,
}

impl PetGender {
    /// `None` when the value is neither empty nor one of the two genders
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "" => Some(PetGender::Unspecified),
            "male" => Some(PetGender::Male),
            "female" => Some(PetGender::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub pet_type: PetType,
    pub race: String,
    pub gender: PetGender,
    pub birthdate: Option<NaiveDate>,
    pub microchip_number: String,
    pub completed_vaccinations: String,
    pub scheduled_vaccinations: String,
    pub allergy: String,
    pub owner_id: i64,
    pub vet_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pet joined with the display fields of its owner and vet
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct PetDetails {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: PetType,
    pub race: String,
    pub gender: PetGender,
    pub birthdate: Option<NaiveDate>,
    pub microchip_number: String,
    pub completed_vaccinations: String,
    pub scheduled_vaccinations: String,
    pub allergy: String,
    pub owner_id: i64,
    pub vet_id: Option<i64>,
    pub owner_name: String,
    pub owner_contact: String,
    pub vet_name: String,
    pub vet_contact: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The columns the dashboard statistics scan reads from every pet
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PetStatRow {
    pub pet_type: PetType,
    pub completed_vaccinations: String,
    pub scheduled_vaccinations: String,
    pub allergy: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_species_maps_to_other() {
        assert_eq!(PetType::from_tag("dog"), PetType::Dog);
        assert_eq!(PetType::from_tag(" Hamster "), PetType::Hamster);
        assert_eq!(PetType::from_tag("Iguana"), PetType::Other);
        assert_eq!(PetType::from_tag(""), PetType::Other);
    }

    #[test]
    fn test_gender_accepts_two_values_or_empty() {
        assert_eq!(PetGender::parse("Male"), Some(PetGender::Male));
        assert_eq!(PetGender::parse("female"), Some(PetGender::Female));
        assert_eq!(PetGender::parse(""), Some(PetGender::Unspecified));
        assert_eq!(PetGender::parse("unknown"), None);
        assert_eq!(PetGender::Unspecified.to_string(), "");
    }

    #[test]
    fn test_pet_details_serializes_type_key() {
        let details = PetDetails {
            pet_type: PetType::Cat,
            ..Default::default()
        };
        let value = serde_json::to_value(&details).unwrap();

        assert_eq!(value["type"], "Cat");
        assert_eq!(value["gender"], "");
    }
}

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChatSender {
    #[serde(rename = "user")]
    #[display("user")]
    User,
    #[serde(rename = "ai")]
    #[display("ai")]
    Ai,
}

impl std::str::FromStr for ChatSender {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(ChatSender::User),
            "ai" => Ok(ChatSender::Ai),
            other => anyhow::bail!("unknown chat sender: {other}"),
        }
    }
}

/// One line of a conversation. Append only.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub id: i64,
    pub microchip_number: String,
    pub sender: ChatSender,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Display, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DoctorMessageStatus {
    #[default]
    #[serde(rename = "pending")]
    #[display("pending")]
    Pending,
    #[serde(rename = "read")]
    #[display("read")]
    Read,
}

impl std::str::FromStr for DoctorMessageStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(DoctorMessageStatus::Pending),
            "read" => Ok(DoctorMessageStatus::Read),
            other => anyhow::bail!("unknown doctor message status: {other}"),
        }
    }
}

/// Conversation summary handed from a pet owner to the doctors' review queue
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DoctorMessage {
    pub id: i64,
    pub microchip_number: String,
    pub owner_name: String,
    pub owner_contact: String,
    pub pet_name: String,
    pub pet_type: String,
    pub summary: String,
    pub pet_info: serde_json::Value,
    pub status: DoctorMessageStatus,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pet fields the client sends along a chat message to ground the reply
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PetContext {
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: String,
    pub race: String,
    pub microchip: String,
}

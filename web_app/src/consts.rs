/// Prior messages loaded as conversational context for a new reply
pub const CHAT_CONTEXT_MAX_MESSAGES: i64 = 20;

/// Distinct allergy strings listed in the dashboard statistics
pub const STATS_TOP_ALLERGIES: usize = 10;

/// Most recently created pets listed in the dashboard statistics
pub const STATS_RECENT_PETS: i64 = 5;

pub const BIRTHDATE_INPUT_FORMAT: &str = "%Y-%m-%d";

pub const MAX_AGE_IDENTITY_COOKIE: i64 = chrono::TimeDelta::hours(8).num_seconds();

pub const IDENTITY_COOKIE_NAME: &str = "vet_records_user";

/// Prefix shared by every Argon2 PHC string stored as a password
pub const ARGON2_PHC_PREFIX: &str = "$argon2";

/// Scripted greeting shown to a conversation without history. Never persisted.
pub const CHAT_GREETING: &str = "Hello! 👋 I'm your AI Veterinary Assistant. I'm here to help you with questions about your pet's health and well-being.

How can I assist you today? You can ask me about:
- Vaccination schedules
- Health concerns
- Nutrition and diet
- Behavioral issues
- General pet care

Remember, for urgent or serious concerns, please contact your veterinarian directly.";

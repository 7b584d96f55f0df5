//! Prompt composition for the generative reply providers

use crate::models::chat::{ChatMessage, ChatSender, PetContext};

pub const VET_PERSONA: &str = "You are a professional and compassionate veterinary assistant AI. Your role is to help pet owners with their pet health concerns.

Guidelines:
- Be empathetic, professional, and caring
- Provide accurate veterinary advice based on common knowledge
- Always recommend consulting a real veterinarian for serious concerns
- Ask follow-up questions to better understand the pet's condition
- Use simple, clear language that pet owners can understand
- Be supportive and reassuring
- If you're unsure about something, admit it and suggest seeing a vet
- Respond in a conversational, friendly manner
- Keep responses concise but informative
- Respond in the same language as the user (Turkish or English)
- For urgent situations (poisoning, severe symptoms), emphasize immediate veterinary care

Remember: You are here to help, but you cannot replace professional veterinary care for serious issues.";

const TURKISH_LETTERS: &[char] = &['ç', 'ğ', 'ı', 'ö', 'ş', 'ü', 'Ç', 'Ğ', 'İ', 'Ö', 'Ş', 'Ü'];
const TURKISH_KEYWORDS: &[&str] = &["kusma", "hasta", "aşı"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Turkish,
}

impl Language {
    fn instruction(&self) -> &'static str {
        match self {
            Language::English => "Please respond in English. The user is speaking in English.",
            Language::Turkish => "Lütfen Türkçe olarak yanıt verin. Kullanıcı Türkçe konuşuyor.",
        }
    }
}

/// Keyword and letter heuristic. Plain ASCII `I` is not a Turkish marker.
pub fn detect_language(message: &str) -> Language {
    if message.contains(TURKISH_LETTERS) {
        return Language::Turkish;
    }

    let message = message.to_lowercase();
    if TURKISH_KEYWORDS.iter().any(|kw| message.contains(kw)) {
        return Language::Turkish;
    }

    Language::English
}

fn or_not_provided(value: &str) -> &str {
    if value.trim().is_empty() {
        "Not provided"
    } else {
        value
    }
}

fn pet_section(pet: &PetContext) -> String {
    format!(
        "\n\nPet Information:\n- Name: {}\n- Type: {}\n- Race: {}\n- Microchip: {}",
        or_not_provided(&pet.name),
        or_not_provided(&pet.pet_type),
        or_not_provided(&pet.race),
        or_not_provided(&pet.microchip),
    )
}

fn history_section(history: &[ChatMessage]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let lines: String = history
        .iter()
        .map(|msg| {
            let role = match msg.sender {
                ChatSender::User => "Owner",
                ChatSender::Ai => "AI Vet",
            };
            format!("{role}: {}\n", msg.message)
        })
        .collect();

    format!("\n\nPrevious conversation:\n{lines}")
}

/// Persona, pet context, prior turns (oldest first), language steering and
/// the new message, in that order.
pub fn build_prompt(message: &str, pet: Option<&PetContext>, history: &[ChatMessage]) -> String {
    format!(
        "{VET_PERSONA}{}{}\n\n{}\n\nCurrent message from pet owner: {message}\n\nPlease provide a helpful, empathetic response as the AI veterinary assistant:",
        pet.map(pet_section).unwrap_or_default(),
        history_section(history),
        detect_language(message).instruction(),
    )
}

//! # Chat API Module
//!
//! Conversations are keyed by the pet microchip number. Each message gets a
//! reply from the first generative provider that answers, or from the
//! deterministic fallback when none does, so a valid message always produces
//! two stored lines.

use crate::{
    consts,
    front::errors::ApiError,
    metric,
    models::{
        self,
        chat::{ChatMessage, ChatSender},
    },
    repo,
    services::{self, fallback, prompts},
};
use serde::Serialize;

/// Where a conversation stands, derived from its stored lines
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ConversationState {
    #[serde(rename = "no-history")]
    NoHistory,
    /// One exchange so far
    #[serde(rename = "greeted")]
    Greeted,
    #[serde(rename = "active")]
    Active,
}

impl ConversationState {
    pub fn from_message_count(count: usize) -> Self {
        match count {
            0 => ConversationState::NoHistory,
            1 | 2 => ConversationState::Greeted,
            _ => ConversationState::Active,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ChatHistory {
    pub state: ConversationState,
    /// Scripted welcome for a conversation that has not started. Not stored.
    pub greeting: Option<&'static str>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, PartialEq)]
pub struct ChatExchange {
    pub user_message: ChatMessage,
    pub ai_message: ChatMessage,
}

fn require_microchip(microchip_number: &str) -> Result<&str, ApiError> {
    let microchip_number = microchip_number.trim();
    if microchip_number.is_empty() {
        return Err(ApiError::InvalidInput(
            "Microchip number is required".to_string(),
        ));
    }

    Ok(microchip_number)
}

pub async fn get_history(
    microchip_number: &str,
    repo: &repo::ImplAppRepo,
) -> Result<ChatHistory, ApiError> {
    let messages = repo
        .get_chat_history(require_microchip(microchip_number)?)
        .await?;
    let state = ConversationState::from_message_count(messages.len());

    Ok(ChatHistory {
        state,
        greeting: (state == ConversationState::NoHistory).then_some(consts::CHAT_GREETING),
        messages,
    })
}

/// Name of what produced the reply and its text. The name is a model id, or
/// `fallback_<topic>` for a canned reply. Never fails.
pub async fn generate_reply(
    message: &str,
    pet: Option<&models::chat::PetContext>,
    history: &[ChatMessage],
    reply_chain: &services::ReplyChain,
) -> (String, String) {
    if !reply_chain.is_empty() {
        let prompt = prompts::build_prompt(message, pet, history);
        if let Some(reply) = reply_chain.generate(&prompt).await {
            return reply;
        }

        logfire::warn!("every reply provider failed, answering with the fallback");
    }

    (
        format!("fallback_{}", fallback::fallback_topic(message)),
        fallback::fallback_reply(message),
    )
}

/// Stores the owner message, produces a reply and stores it.
///
/// # Errors
/// `InvalidInput` when the microchip number or the message is blank, before
/// anything is written. Losing the context only degrades the reply; a failed
/// write is a `StoreFailure`.
pub async fn send_message(
    microchip_number: &str,
    message: &str,
    pet: Option<&models::chat::PetContext>,
    repo: &repo::ImplAppRepo,
    reply_chain: &services::ReplyChain,
) -> Result<ChatExchange, ApiError> {
    let _span = logfire::span!("send_chat_message").entered();

    if microchip_number.trim().is_empty() || message.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "Microchip number and message are required".to_string(),
        ));
    }
    let microchip_number = microchip_number.trim();

    let history = repo
        .get_latest_chat_messages(microchip_number, consts::CHAT_CONTEXT_MAX_MESSAGES)
        .await
        .unwrap_or_else(|e| {
            logfire::warn!(
                "could not load chat context: {error}",
                error = format!("{e:#}")
            );
            Vec::new()
        });

    let user_message = repo
        .insert_chat_message(microchip_number, ChatSender::User, message)
        .await?;

    let (source, reply) = generate_reply(message.trim(), pet, &history, reply_chain).await;
    metric::incr_chat_reply_statds(&source);

    let ai_message = repo
        .insert_chat_message(microchip_number, ChatSender::Ai, &reply)
        .await?;

    Ok(ChatExchange {
        user_message,
        ai_message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        repo::{MockAppRepo, sqlite::in_memory_repo},
        services::{MockReplyProvider, ReplyChain},
    };
    use chrono::Utc;
    use std::sync::Arc;

    fn chat_message(id: i64, sender: ChatSender, message: &str) -> ChatMessage {
        ChatMessage {
            id,
            microchip_number: "DOG001".into(),
            sender,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    fn failing_chain() -> ReplyChain {
        let mut provider = MockReplyProvider::new();
        provider.expect_name().return_const("gemini-2.0-flash".to_string());
        provider
            .expect_generate()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        ReplyChain::new(vec![Arc::new(provider)])
    }

    #[test]
    fn test_conversation_state_from_history() {
        assert_eq!(ConversationState::from_message_count(0), ConversationState::NoHistory);
        assert_eq!(ConversationState::from_message_count(2), ConversationState::Greeted);
        assert_eq!(ConversationState::from_message_count(3), ConversationState::Active);
    }

    #[ntex::test]
    async fn test_empty_message_writes_nothing() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo.expect_insert_chat_message().never();
        mock_repo.expect_get_latest_chat_messages().never();
        let repo: repo::ImplAppRepo = Box::new(mock_repo);

        for (chip, text) in [("DOG001", ""), ("DOG001", "   "), ("", "hello")] {
            assert!(matches!(
                send_message(chip, text, None, &repo, &ReplyChain::default()).await,
                Err(ApiError::InvalidInput(_))
            ));
        }
    }

    #[ntex::test]
    async fn test_unreachable_provider_still_writes_two_rows() {
        let repo: repo::ImplAppRepo = Box::new(in_memory_repo().await);

        let exchange = send_message("DOG001", "my dog is vomiting", None, &repo, &failing_chain())
            .await
            .unwrap();

        let history = repo.get_chat_history("DOG001").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sender, ChatSender::User);
        assert_eq!(history[1].sender, ChatSender::Ai);
        assert_eq!(exchange.ai_message.message, fallback::fallback_reply("my dog is vomiting"));
    }

    #[ntex::test]
    async fn test_user_message_is_stored_as_sent() {
        let repo: repo::ImplAppRepo = Box::new(in_memory_repo().await);

        let exchange = send_message("DOG001", "  hello\n", None, &repo, &ReplyChain::default())
            .await
            .unwrap();

        assert_eq!(exchange.user_message.message, "  hello\n");
        assert_eq!(
            repo.get_chat_history("DOG001").await.unwrap()[0].message,
            "  hello\n"
        );
        assert_eq!(exchange.ai_message.message, fallback::fallback_reply("hello"));
    }

    #[ntex::test]
    async fn test_reply_source_names_fallback_topic() {
        let (source, _) = generate_reply("my dog is vomiting", None, &[], &failing_chain()).await;
        assert_eq!(source, "fallback_vomit");

        let (source, _) = generate_reply("hello", None, &[], &ReplyChain::default()).await;
        assert_eq!(source, "fallback_greeting");
    }

    #[ntex::test]
    async fn test_context_failure_is_not_fatal() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_latest_chat_messages()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("no such table: chat_message")));
        mock_repo
            .expect_insert_chat_message()
            .times(2)
            .returning(|_, sender, message| Ok(chat_message(1, sender, message)));
        let repo: repo::ImplAppRepo = Box::new(mock_repo);

        let exchange = send_message("DOG001", "hello", None, &repo, &ReplyChain::default())
            .await
            .unwrap();

        assert_eq!(exchange.user_message.message, "hello");
        assert_eq!(exchange.ai_message.sender, ChatSender::Ai);
    }

    #[ntex::test]
    async fn test_provider_reply_is_stored_with_context_in_prompt() {
        let mut provider = MockReplyProvider::new();
        provider.expect_name().return_const("gemini-2.0-flash".to_string());
        provider
            .expect_generate()
            .times(1)
            .returning(|prompt| {
                assert!(prompt.contains("Owner: is chocolate bad?\nAI Vet: Yes, it is toxic.\n"));
                assert!(prompt.contains("- Name: Max"));
                assert!(prompt.contains("Current message from pet owner: he ate some"));
                Ok(" Please call your vet now. ".to_string())
            });
        let chain = ReplyChain::new(vec![Arc::new(provider)]);

        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_latest_chat_messages()
            .times(1)
            .returning(|chip, limit| {
                assert_eq!(chip, "DOG001");
                assert_eq!(limit, consts::CHAT_CONTEXT_MAX_MESSAGES);
                Ok(vec![
                    chat_message(1, ChatSender::User, "is chocolate bad?"),
                    chat_message(2, ChatSender::Ai, "Yes, it is toxic."),
                ])
            });
        mock_repo
            .expect_insert_chat_message()
            .times(2)
            .returning(|_, sender, message| Ok(chat_message(3, sender, message)));
        let repo: repo::ImplAppRepo = Box::new(mock_repo);

        let pet = models::chat::PetContext {
            name: "Max".into(),
            ..Default::default()
        };
        let exchange = send_message("DOG001", "he ate some", Some(&pet), &repo, &chain)
            .await
            .unwrap();

        assert_eq!(exchange.ai_message.message, "Please call your vet now.");
    }

    #[ntex::test]
    async fn test_history_greets_new_conversation() {
        let repo: repo::ImplAppRepo = Box::new(in_memory_repo().await);

        let history = get_history("CAT001", &repo).await.unwrap();
        assert_eq!(history.state, ConversationState::NoHistory);
        assert_eq!(history.greeting, Some(consts::CHAT_GREETING));
        assert!(history.messages.is_empty());

        send_message("CAT001", "hello", None, &repo, &ReplyChain::default())
            .await
            .unwrap();

        let history = get_history("CAT001", &repo).await.unwrap();
        assert_eq!(history.state, ConversationState::Greeted);
        assert_eq!(history.greeting, None);
        assert_eq!(history.messages.len(), 2);
    }
}

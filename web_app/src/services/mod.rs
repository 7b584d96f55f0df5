pub mod fallback;
pub mod gemini;
pub mod prompts;

use crate::config;
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

/// Something able to turn a prompt into a reply text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Used in logs and metrics
    fn name(&self) -> String;

    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Providers tried in order. The first non blank reply wins, the rest are
/// never called.
#[derive(Clone, Default)]
pub struct ReplyChain {
    providers: Vec<Arc<dyn ReplyProvider>>,
}

impl ReplyChain {
    pub fn new(providers: Vec<Arc<dyn ReplyProvider>>) -> Self {
        Self { providers }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `(provider name, trimmed reply)`, or `None` when every link failed
    pub async fn generate(&self, prompt: &str) -> Option<(String, String)> {
        for provider in &self.providers {
            let name = provider.name();
            match provider.generate(prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    logfire::info!("reply provider {name} answered", name = name.clone());
                    return Some((name, text.trim().to_string()));
                }
                Ok(_) => {
                    logfire::warn!("reply provider {name} returned blank text", name = name);
                }
                Err(e) => {
                    logfire::warn!(
                        "reply provider {name} failed: {error}",
                        name = name,
                        error = format!("{e:#}")
                    );
                }
            }
        }

        None
    }
}

/// One generative model per configured id, or an empty chain without api key
pub fn build_reply_chain(app_config: &config::AppConfig) -> anyhow::Result<ReplyChain> {
    let Some(api_key) = app_config.gemini_key() else {
        return Ok(ReplyChain::default());
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(app_config.gemini_timeout_secs))
        .build()?;

    Ok(ReplyChain::new(
        app_config
            .gemini_model_ids()
            .iter()
            .map(|model| {
                Arc::new(gemini::GeminiModel::new(
                    client.clone(),
                    &app_config.gemini_api_base_url,
                    api_key,
                    model,
                )) as Arc<dyn ReplyProvider>
            })
            .collect(),
    ))
}

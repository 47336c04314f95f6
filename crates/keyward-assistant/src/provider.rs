// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat provider implementations and selection from config.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use keyward_config::model::AssistantConfig;
use keyward_core::{ChatMessage, ChatProvider, HealthStatus, KeywardError, PluginAdapter};
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::client::CompletionClient;
use crate::types::{ApiMessage, CompletionRequest};

/// Provider backed by an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: CompletionClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiProvider {
    pub fn new(api_key: &SecretString, config: &AssistantConfig) -> Result<Self, KeywardError> {
        let client = CompletionClient::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, KeywardError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KeywardError> {
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, KeywardError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: messages.iter().map(ApiMessage::from).collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.client.complete(&request).await?;
        if let Some(usage) = response.usage {
            debug!(
                id = %response.id,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        response
            .reply()
            .map(str::to_string)
            .ok_or_else(|| KeywardError::Provider {
                message: "chat API returned no reply text".into(),
                source: None,
            })
    }
}

/// Stand-in used when no API key is available. Every request fails.
#[derive(Debug, Clone)]
pub struct UnconfiguredProvider {
    key_env: String,
}

impl UnconfiguredProvider {
    pub fn new(key_env: impl Into<String>) -> Self {
        Self {
            key_env: key_env.into(),
        }
    }
}

#[async_trait]
impl PluginAdapter for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, KeywardError> {
        Ok(HealthStatus::Degraded(format!("{} is not set", self.key_env)))
    }

    async fn shutdown(&self) -> Result<(), KeywardError> {
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for UnconfiguredProvider {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, KeywardError> {
        Err(KeywardError::Provider {
            message: format!("assistant API key variable {} is not set", self.key_env),
            source: None,
        })
    }
}

/// Build the provider `config` describes, reading the API key from the
/// environment variable it names.
///
/// A missing or empty key is not fatal: the rest of Keyward works without
/// the assistant, so this returns an [`UnconfiguredProvider`] and warns.
pub fn provider_from_config(
    config: &AssistantConfig,
) -> Result<Arc<dyn ChatProvider>, KeywardError> {
    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => {
            let key = SecretString::from(key);
            let provider: Arc<dyn ChatProvider> = Arc::new(OpenAiProvider::new(&key, config)?);
            Ok(provider)
        }
        _ => {
            warn!(
                var = %config.api_key_env,
                "assistant API key missing; chatbot requests will fail"
            );
            Ok(Arc::new(UnconfiguredProvider::new(&config.api_key_env)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyward_core::ChatRole;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> AssistantConfig {
        AssistantConfig {
            base_url: base_url.to_string(),
            model: "gpt-test".to_string(),
            max_tokens: 64,
            ..AssistantConfig::default()
        }
    }

    #[tokio::test]
    async fn openai_provider_sends_roles_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-test",
                "max_tokens": 64,
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "choices": [{"message": {"role": "assistant", "content": "Hello!"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            OpenAiProvider::new(&SecretString::from("sk-unit".to_string()), &config(&server.uri())).unwrap();
        let reply = provider
            .complete(&[
                ChatMessage::new(ChatRole::System, "be brief"),
                ChatMessage::new(ChatRole::User, "hi"),
            ])
            .await
            .unwrap();
        assert_eq!(reply, "Hello!");
    }

    #[tokio::test]
    async fn empty_choices_are_a_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let provider =
            OpenAiProvider::new(&SecretString::from("sk-unit".to_string()), &config(&server.uri())).unwrap();
        let err = provider
            .complete(&[ChatMessage::new(ChatRole::User, "hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, KeywardError::Provider { .. }));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn missing_key_yields_unconfigured_provider() {
        let config = AssistantConfig {
            api_key_env: "KEYWARD_ASSISTANT_TEST_UNSET_KEY".to_string(),
            ..AssistantConfig::default()
        };
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.name(), "unconfigured");
        assert!(logs_contain("assistant API key missing"));

        let health = provider.health_check().await.unwrap();
        assert!(matches!(health, HealthStatus::Degraded(_)));

        let err = provider
            .complete(&[ChatMessage::new(ChatRole::User, "hi")])
            .await
            .unwrap_err();
        assert!(err.is_internal());
        assert!(err.to_string().contains("KEYWARD_ASSISTANT_TEST_UNSET_KEY"));
    }
}

use std::time::Duration;

use crate::error::{AgentError, AgentResult};

/// Parameters for a chat request to Ollama.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub top_p: f32,
    pub json_format: bool,
}

/// A model that answers a single system + user exchange.
///
/// The intent resolver talks to this trait so it can be driven by a scripted
/// model in tests.
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;
    async fn chat(&self, request: ChatRequest) -> AgentResult<String>;

    /// Whether the model backend is reachable right now.
    async fn health_check(&self) -> bool {
        true
    }
}

/// Shared HTTP client for Ollama API calls.
pub struct OllamaClient {
    pub endpoint: String,
    pub model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(endpoint: String, model: String, timeout: Duration) -> AgentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::EndpointUnreachable {
                endpoint: endpoint.clone(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
            timeout,
            client,
        })
    }

    fn build_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt }
            ],
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "top_p": request.top_p
            }
        });

        if request.json_format {
            body["format"] = serde_json::json!("json");
        }

        body
    }

    fn map_send_error(&self, e: reqwest::Error) -> AgentError {
        if e.is_timeout() {
            log::error!("Ollama request timed out after {:?}", self.timeout);
            AgentError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            log::error!("Ollama request to {} failed: {}", self.endpoint, e);
            AgentError::EndpointUnreachable {
                endpoint: self.endpoint.clone(),
                message: e.to_string(),
            }
        }
    }
}

/// Pull `message.content` out of a non-streaming `/api/chat` response.
fn extract_content(response_json: &serde_json::Value) -> AgentResult<String> {
    response_json["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AgentError::Validation("no content in Ollama response".to_string()))
}

#[async_trait::async_trait]
impl ChatModel for OllamaClient {
    fn name(&self) -> &str {
        &self.model
    }

    /// Send a chat request to the Ollama API and return the response content.
    async fn chat(&self, request: ChatRequest) -> AgentResult<String> {
        let body = self.build_body(&request);

        let response = self
            .client
            .post(format!("{}/api/chat", self.endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Endpoint { status, body });
        }

        let response_json: serde_json::Value = response.json().await.map_err(|e| {
            AgentError::Validation(format!("failed to parse Ollama response: {}", e))
        })?;

        extract_content(&response_json)
    }

    /// Check that the Ollama server answers on `/api/tags`.
    ///
    /// Connection failures and timeouts yield `false`, not an error.
    async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        log::debug!("Checking Ollama health at {}", url);

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log::warn!("Ollama health check failed with status: {}", response.status());
                false
            }
            Err(e) => {
                log::warn!("Cannot reach Ollama at {}: {}", self.endpoint, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> OllamaClient {
        OllamaClient::new(
            endpoint.to_string(),
            "qwen2.5".to_string(),
            Duration::from_millis(200),
        )
        .unwrap()
    }

    fn request(json_format: bool) -> ChatRequest {
        ChatRequest {
            system_prompt: "system".to_string(),
            user_prompt: "list my notes".to_string(),
            temperature: 0.1,
            top_p: 0.9,
            json_format,
        }
    }

    #[test]
    fn test_build_body_json_mode() {
        let body = client("http://localhost:11434").build_body(&request(true));
        assert_eq!(body["model"], "qwen2.5");
        assert_eq!(body["stream"], false);
        assert_eq!(body["format"], "json");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "list my notes");
    }

    #[test]
    fn test_build_body_plain_mode_has_no_format() {
        let body = client("http://localhost:11434").build_body(&request(false));
        assert!(body.get("format").is_none());
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        assert_eq!(client("http://localhost:11434/").endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_extract_content() {
        let json = serde_json::json!({
            "model": "qwen2.5",
            "message": { "role": "assistant", "content": "{\"tool\":\"list_notes\"}" },
            "done": true
        });
        assert_eq!(extract_content(&json).unwrap(), "{\"tool\":\"list_notes\"}");

        let missing = serde_json::json!({ "done": true });
        assert!(matches!(extract_content(&missing), Err(AgentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        assert!(!client("http://127.0.0.1:59999").health_check().await);
    }

    #[tokio::test]
    async fn test_chat_unreachable_endpoint() {
        let result = client("http://127.0.0.1:59999").chat(request(true)).await;
        assert!(matches!(
            result,
            Err(AgentError::EndpointUnreachable { .. }) | Err(AgentError::Timeout { .. })
        ));
    }
}

use crate::models::{ChatRequest, ChatResponse, ContentSource, EssayRequest, EssayResponse};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the AI provider
#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("No AI provider configured")]
    NotConfigured,
}

#[derive(Debug, Deserialize)]
struct ProviderEssay {
    essay: String,
}

#[derive(Debug, Deserialize)]
struct ProviderChat {
    response: String,
}

/// Client for the external AI provider
///
/// Every operation has a deterministic local fallback, so callers always
/// get an answer. Provider failures are logged and never surfaced.
pub struct AiClient {
    endpoint: Option<String>,
    api_key: Option<String>,
    client: Client,
}

impl AiClient {
    /// Create a new AI client; `endpoint = None` means fallbacks only
    pub fn new(
        endpoint: Option<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        let endpoint = endpoint
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty());

        Ok(Self {
            endpoint,
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    /// Client that never leaves the process
    pub fn offline() -> Result<Self, AiError> {
        Self::new(None, None, 30)
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = self.endpoint.as_deref().ok_or(AiError::NotConfigured)?;
        let url = format!("{}/{}", endpoint, path);

        tracing::debug!("Calling AI provider: {}", url);

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(AiError::Status(response.status().as_u16()));
        }

        let json: Value = response.json().await?;
        serde_json::from_value(json).map_err(|e| AiError::InvalidResponse(e.to_string()))
    }

    /// Ask the provider for an essay
    pub async fn request_essay(&self, request: &EssayRequest) -> Result<String, AiError> {
        let reply: ProviderEssay = self.post_json("essay-generation", request).await?;
        non_empty(reply.essay)
    }

    /// Ask the provider for a chat reply
    pub async fn request_chat(&self, request: &ChatRequest) -> Result<String, AiError> {
        let reply: ProviderChat = self.post_json("chat", request).await?;
        non_empty(reply.response)
    }

    /// Generate an essay, falling back to the built-in template
    pub async fn generate_essay(&self, request: &EssayRequest) -> EssayResponse {
        if self.is_configured() {
            match self.request_essay(request).await {
                Ok(essay) => {
                    return EssayResponse {
                        essay,
                        source: ContentSource::Provider,
                    }
                }
                Err(e) => tracing::warn!("Essay generation failed, using template: {}", e),
            }
        }

        EssayResponse {
            essay: template_essay(request),
            source: ContentSource::Template,
        }
    }

    /// Answer a chat message, falling back to keyword replies
    pub async fn chat(&self, request: &ChatRequest) -> ChatResponse {
        if self.is_configured() {
            match self.request_chat(request).await {
                Ok(response) => {
                    return ChatResponse {
                        response,
                        source: ContentSource::Provider,
                    }
                }
                Err(e) => tracing::warn!("Chat request failed, using local reply: {}", e),
            }
        }

        ChatResponse {
            response: contextual_reply(request),
            source: ContentSource::Template,
        }
    }
}

fn non_empty(text: String) -> Result<String, AiError> {
    if text.trim().is_empty() {
        Err(AiError::InvalidResponse("empty content".to_string()))
    } else {
        Ok(text)
    }
}

fn field_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
}

/// Statement-of-purpose template used when the provider is unavailable
pub fn template_essay(request: &EssayRequest) -> String {
    let personal_info = field_or(&request.personal_info, "a long-standing curiosity about the field");
    let experiences = field_or(&request.experiences, "my coursework and projects");
    let goals = field_or(&request.goals, "making a meaningful contribution to the field");

    format!(
        "Dear Admissions Committee,

I am writing to express my strong interest in the {program} program at {school}. My passion for this field stems from {personal_info}.

Throughout my academic and professional journey, I have gained valuable experience through {experiences}. These experiences have not only strengthened my technical skills but also developed my ability to tackle complex challenges.

What particularly attracts me to {school} is its reputation for excellence and innovation. I am excited about the opportunity to contribute to the vibrant academic community and work towards my goal of {goals}.

I am confident that my background and enthusiasm make me a strong candidate for your program. Thank you for your consideration.

Sincerely,
[Your Name]",
        program = request.program.trim(),
        school = request.school.trim(),
        personal_info = personal_info,
        experiences = experiences,
        goals = goals,
    )
}

fn profile_gpa(request: &ChatRequest) -> Option<String> {
    match request.user_profile.as_ref()?.get("gpa")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Keyword-based assistant reply
pub fn contextual_reply(request: &ChatRequest) -> String {
    let message = request.message.to_lowercase();

    if message.contains("gpa") || message.contains("成绩") {
        let gpa = profile_gpa(request)
            .map(|gpa| format!("你的GPA {}", gpa))
            .unwrap_or_else(|| "你的GPA情况".to_string());
        return format!(
            "根据{}，我建议你重点关注匹配度较高的学校。同时可以通过提升其他方面的背景来增强竞争力。",
            gpa
        );
    }

    if message.contains("文书") || message.contains("essay") {
        return "文书是申请中的重要环节。我建议你使用我们的AI文书助手，它能根据你的背景生成个性化的文书草稿。".to_string();
    }

    if message.contains("学校") || message.contains("推荐") || message.contains("school") {
        return "我已经根据你的背景为你推荐了几所匹配的学校。你可以在学校推荐页面查看详细的匹配分析。".to_string();
    }

    "我理解你的问题。建议你先完善个人资料，这样我能为你提供更精准的建议和推荐。".to_string()
}

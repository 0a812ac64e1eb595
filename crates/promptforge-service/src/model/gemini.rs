use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{GenerateRequest, GenerativeModel, ProviderError, SamplingParams};

/// Finish reasons that mean the candidate was withheld by safety filtering.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

/// Gemini `generateContent` REST client.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Option<String>, ProviderError> {
        let url = self.endpoint(&request.model);
        debug!("POST {url}");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::from(request))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("read body: {e}")))?;

        if !status.is_success() {
            warn!("gemini returned {status}");
            return Err(parse_error_body(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        if let Some(ref usage) = parsed.usage_metadata {
            info!(
                "gemini usage: prompt={:?} candidates={:?} total={:?}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        extract_text(parsed)
    }
}

// -- Wire types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    candidate_count: u32,
}

impl From<SamplingParams> for GenerationConfig {
    fn from(s: SamplingParams) -> Self {
        Self {
            temperature: s.temperature,
            top_p: s.top_p,
            top_k: s.top_k,
            candidate_count: s.candidate_count,
        }
    }
}

impl<'a> From<&'a GenerateRequest> for GenerateContentRequest<'a> {
    fn from(req: &'a GenerateRequest) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &req.system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &req.user_message,
                }],
            }],
            generation_config: req.sampling.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentResponse>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

fn extract_text(resp: GenerateContentResponse) -> Result<Option<String>, ProviderError> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ProviderError::Blocked { reason });
    }

    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Ok(None);
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = candidate.finish_reason {
            if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) {
                return Err(ProviderError::Blocked { reason });
            }
        }
        return Ok(None);
    }

    Ok(Some(text))
}

fn parse_error_body(status: u16, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let err = envelope.error;
            let msg = err.message.unwrap_or_else(|| body.to_string());
            let message = match err.status {
                Some(ref code) if !code.is_empty() => format!("{code}: {msg}"),
                _ => msg,
            };
            ProviderError::Http {
                status,
                code: err.status,
                reason: err.details.into_iter().find_map(|d| d.reason),
                message,
            }
        }
        Err(_) => ProviderError::Http {
            status,
            code: None,
            reason: None,
            message: body.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_body_shape() {
        let req = GenerateRequest {
            model: "gemini-2.5-flash".into(),
            system_instruction: "be helpful".into(),
            user_message: "hello".into(),
            sampling: SamplingParams::default(),
        };
        let body = serde_json::to_value(GenerateContentRequest::from(&req)).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be helpful");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["candidateCount"], 1);
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((body["generationConfig"]["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = GeminiClient::new("k", "http://localhost:9/v1beta/models/");
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn extract_concatenates_parts() {
        let resp = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(extract_text(resp).unwrap().as_deref(), Some("Hello world"));
    }

    #[test]
    fn extract_no_candidates_is_none() {
        assert_eq!(extract_text(parse(r#"{"candidates":[]}"#)).unwrap(), None);
        assert_eq!(extract_text(parse("{}")).unwrap(), None);
    }

    #[test]
    fn extract_prompt_feedback_block() {
        let resp = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert_eq!(
            extract_text(resp).unwrap_err(),
            ProviderError::Blocked {
                reason: "SAFETY".into()
            }
        );
    }

    #[test]
    fn extract_safety_finish_without_text() {
        let resp = parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert!(matches!(
            extract_text(resp),
            Err(ProviderError::Blocked { .. })
        ));
    }

    #[test]
    fn extract_max_tokens_without_text_is_none() {
        let resp = parse(r#"{"candidates":[{"content":{"parts":[]},"finishReason":"MAX_TOKENS"}]}"#);
        assert_eq!(extract_text(resp).unwrap(), None);
    }

    #[test]
    fn error_envelope_is_parsed() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID"}]}}"#;
        match parse_error_body(400, body) {
            ProviderError::Http {
                status,
                code,
                reason,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("INVALID_ARGUMENT"));
                assert_eq!(reason.as_deref(), Some("API_KEY_INVALID"));
                assert_eq!(
                    message,
                    "INVALID_ARGUMENT: API key not valid. Please pass a valid API key."
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_json_error_body_is_kept_raw() {
        match parse_error_body(502, "  Bad Gateway\n") {
            ProviderError::Http { message, code, .. } => {
                assert_eq!(message, "Bad Gateway");
                assert!(code.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::provider::{PlanRequest, PlannerError, PlannerProvider, PlannerResult};
use crate::agent::AgentReply;

#[derive(Debug, Clone)]
pub struct GeminiPlanner {
    client: Client,
    api_key: String,
    model: String,
    thinking_model: String,
    base_url: String,
}

impl GeminiPlanner {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        model: String,
        thinking_model: String,
        base_url: String,
    ) -> PlannerResult<Self> {
        let api_key = api_key
            .filter(|v| !v.trim().is_empty())
            .ok_or(PlannerError::MissingApiKey)?;

        Ok(Self {
            client,
            api_key,
            model,
            thinking_model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, thinking: bool) -> String {
        let model = if thinking {
            &self.thinking_model
        } else {
            &self.model
        };
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn build_request(request: &PlanRequest) -> PlannerResult<GenerateRequest> {
        let mut parts = Vec::new();
        if let Some(image) = &request.image {
            if !image.mime_type.starts_with("image/") {
                return Err(PlannerError::UnsupportedImageType {
                    mime_type: image.mime_type.clone(),
                });
            }
            parts.push(RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.data_base64.clone(),
                },
            });
        }
        parts.push(RequestPart::Text {
            text: request.user_message.clone(),
        });

        Ok(GenerateRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts,
            }],
            system_instruction: request.system_instruction.as_ref().map(|text| {
                SystemInstruction {
                    parts: vec![RequestPart::Text { text: text.clone() }],
                }
            }),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        })
    }

    fn extract_text(resp: GenerateResponse) -> PlannerResult<String> {
        for candidate in resp.candidates {
            for part in candidate.content.parts {
                let text = part.text.trim();
                if !text.is_empty() {
                    return Ok(text.to_string());
                }
            }
        }

        Err(PlannerError::EmptyResponse)
    }

    fn parse_reply(text: &str) -> PlannerResult<AgentReply> {
        serde_json::from_str(strip_code_fences(text))
            .map_err(|err| PlannerError::Parse(err.to_string()))
    }
}

// Models wrap JSON in Markdown fences often enough that stripping them
// beats failing the parse, even with responseMimeType set.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

impl PlannerProvider for GeminiPlanner {
    async fn plan(&self, request: PlanRequest) -> PlannerResult<AgentReply> {
        let payload = Self::build_request(&request)?;
        let resp = self
            .client
            .post(self.endpoint(request.thinking))
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|err| PlannerError::Transport(err.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            let body = body.chars().take(400).collect::<String>();
            return Err(PlannerError::HttpStatus { status, body });
        }

        let parsed = resp
            .json::<GenerateResponse>()
            .await
            .map_err(|err| PlannerError::Parse(err.to_string()))?;
        let text = Self::extract_text(parsed)?;
        Self::parse_reply(&text)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

use std::fmt;

use base64::{Engine as _, prelude::BASE64_STANDARD};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    llm::{Model, OutputMessage, ServiceError, ServiceErrorKind},
    prompt::Part,
};

mod error;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct Request<'a> {
    pub api_key: &'a str,
    pub model: Model,
    pub body: RequestBody,
}

#[derive(Debug, Serialize)]
pub struct RequestBody {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WirePart {
    Text(String),
    InlineData(Blob),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: &'static str,
    /// base64
    pub data: String,
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("mime_type", &self.mime_type)
            .field("data", &format_args!("<{} base64 chars>", self.data.len()))
            .finish()
    }
}

impl RequestBody {
    pub fn from_parts(parts: &[Part<'_>]) -> Self {
        let parts = parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => WirePart::Text(text.to_string()),
                Part::Image(image) => WirePart::InlineData(Blob {
                    mime_type: image.format.mime_type(),
                    data: BASE64_STANDARD.encode(image.data()),
                }),
            })
            .collect();

        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: usize,
    #[serde(default)]
    pub candidates_token_count: usize,
}

impl ResponseBody {
    /// Joins the text parts of the first candidate.
    pub fn into_output(self) -> OutputMessage {
        let usage = self.usage_metadata.unwrap_or_default();
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let (text, finish_reason) = match self.candidates.into_iter().next() {
            Some(candidate) => (
                candidate
                    .content
                    .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
                    .unwrap_or_default(),
                candidate.finish_reason,
            ),
            None => (String::new(), None),
        };

        OutputMessage {
            text,
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
            finish_reason: block_reason.or(finish_reason),
        }
    }
}

pub async fn send_request(
    req: Request<'_>,
    client: &reqwest::Client,
) -> Result<ResponseBody, ServiceError> {
    if req.api_key.is_empty() {
        return Err(ServiceError::new(
            ServiceErrorKind::Authentication,
            "no API key configured, set API_KEY or run `image_to_story configure`",
        ));
    }

    let url = format!("{BASE_URL}/{}:generateContent", req.model);
    debug!("POST {url}\n{:#?}", req.body);

    let res = client
        .post(&url)
        .header("x-goog-api-key", req.api_key)
        .json(&req.body)
        .send()
        .await
        .map_err(|e| ServiceError::new(ServiceErrorKind::Network, e.to_string()))?;

    let status = res.status();
    let text = res
        .text()
        .await
        .map_err(|e| ServiceError::new(ServiceErrorKind::Network, e.to_string()))?;

    if !status.is_success() {
        return Err(error::from_response(status, &text));
    }
    debug!("Gemini response:\n{text}");

    serde_json::from_str(&text).map_err(|e| {
        ServiceError::new(
            ServiceErrorKind::MalformedResponse,
            format!("{e} in response body: {text}"),
        )
    })
}

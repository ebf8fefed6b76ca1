//! Wire types for the Gemini image and Veo video endpoints.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Serialize, Deserialize};

pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.0-generate-preview";
pub const API_KEY_HEADER: &str = "x-goog-api-key";
/// Interval between video operation status checks.
pub const VIDEO_POLL_INTERVAL_MS: u64 = 10_000;

pub fn generate_content_url(model: &str) -> String {
    format!("{}/models/{}:generateContent", API_BASE_URL, model)
}

pub fn predict_long_running_url(model: &str) -> String {
    format!("{}/models/{}:predictLongRunning", API_BASE_URL, model)
}

pub fn operation_url(operation_name: &str) -> String {
    format!("{}/{}", API_BASE_URL, operation_name.trim_start_matches('/'))
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn image(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(format!("Generate an image: {}", prompt)),
                    inline_data: None,
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    pub data: String,
}

fn default_mime_type() -> String {
    "image/png".to_string()
}

impl InlineData {
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.data.as_bytes())
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// First inline image of the first candidate.
    pub fn first_image(&self) -> Option<&InlineData> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictVideoRequest {
    pub instances: Vec<VideoInstance>,
}

impl PredictVideoRequest {
    pub fn new(prompt: &str) -> Self {
        Self {
            instances: vec![VideoInstance { prompt: prompt.to_string() }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VideoInstance {
    pub prompt: String,
}

/// Long-running operation handle returned by `predictLongRunning` and by
/// every status poll.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(default)]
    pub response: Option<OperationResponse>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct GeneratedSample {
    #[serde(default)]
    pub video: Option<VideoFile>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct VideoFile {
    #[serde(default)]
    pub uri: String,
}

impl Operation {
    /// Download URI of the first generated sample once the job is done.
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .iter()
            .filter_map(|s| s.video.as_ref())
            .map(|v| v.uri.as_str())
            .find(|uri| !uri.is_empty())
    }
}

use reqwest::Client;
use regret_shared::gemini::{self, GenerateContentRequest, GenerateContentResponse};
use tracing::debug;

use super::{read_json, MediaGenerator};
use crate::error::GeneratorError;

/// Gemini `generateContent` with an image-only response modality.
#[derive(Debug, Clone)]
pub struct GeminiImageClient {
    http: Client,
    api_key: String,
    model: String,
}

impl GeminiImageClient {
    pub fn new(http: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

impl MediaGenerator for GeminiImageClient {
    fn extension(&self) -> &'static str {
        "png"
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, GeneratorError> {
        debug!("POST generateContent model={}", self.model);
        let response = self
            .http
            .post(gemini::generate_content_url(&self.model))
            .header(gemini::API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::image(prompt))
            .send()
            .await?;

        let body: GenerateContentResponse = read_json(response).await?;
        image_bytes(&body)
    }
}

pub(crate) fn image_bytes(body: &GenerateContentResponse) -> Result<Vec<u8>, GeneratorError> {
    if let Some(error) = &body.error {
        return Err(GeneratorError::Provider(error.message.clone()));
    }
    let image = body.first_image().ok_or(GeneratorError::EmptyResult)?;
    Ok(image.decode()?)
}

use std::time::Duration;

use reqwest::Client;
use regret_shared::gemini::{self, Operation, PredictVideoRequest};
use tracing::{debug, info};

use super::{read_json, MediaGenerator};
use crate::error::GeneratorError;

const DEFAULT_MAX_POLLS: u32 = 60;

/// Veo `predictLongRunning`: submit, poll the operation until done, download.
#[derive(Debug, Clone)]
pub struct VeoVideoClient {
    http: Client,
    api_key: String,
    model: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl VeoVideoClient {
    pub fn new(http: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            poll_interval: Duration::from_millis(gemini::VIDEO_POLL_INTERVAL_MS),
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    async fn fetch_operation(&self, name: &str) -> Result<Operation, GeneratorError> {
        let response = self
            .http
            .get(gemini::operation_url(name))
            .header(gemini::API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        read_json(response).await
    }
}

impl MediaGenerator for VeoVideoClient {
    fn extension(&self) -> &'static str {
        "mp4"
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, GeneratorError> {
        let response = self
            .http
            .post(gemini::predict_long_running_url(&self.model))
            .header(gemini::API_KEY_HEADER, &self.api_key)
            .json(&PredictVideoRequest::new(prompt))
            .send()
            .await?;
        let mut operation: Operation = read_json(response).await?;
        if let Some(error) = &operation.error {
            return Err(GeneratorError::Provider(error.message.clone()));
        }
        info!("Video job {} submitted", operation.name);

        let mut polls = 0;
        while !operation.done {
            if polls >= self.max_polls {
                return Err(GeneratorError::PollTimeout(operation.name));
            }
            tokio::time::sleep(self.poll_interval).await;
            operation = self.fetch_operation(&operation.name).await?;
            polls += 1;
            debug!("Video job {} poll {} done={}", operation.name, polls, operation.done);
        }

        let uri = finished_video_uri(&operation)?;
        let download = self
            .http
            .get(uri)
            .header(gemini::API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        if !download.status().is_success() {
            return Err(GeneratorError::Provider(format!("video download returned {}", download.status())));
        }
        Ok(download.bytes().await?.to_vec())
    }
}

pub(crate) fn finished_video_uri(operation: &Operation) -> Result<&str, GeneratorError> {
    if let Some(error) = &operation.error {
        return Err(GeneratorError::Provider(error.message.clone()));
    }
    operation.video_uri().ok_or(GeneratorError::EmptyResult)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_operation_with_sample() {
        let operation: Operation = serde_json::from_str(
            r#"{"name":"models/veo/operations/7","done":true,"response":{"generateVideoResponse":{"generatedSamples":[{"video":{"uri":"https://files/v:download"}}]}}}"#,
        )
        .unwrap();
        assert_eq!(finished_video_uri(&operation).unwrap(), "https://files/v:download");
    }

    #[test]
    fn test_failed_operation_is_provider_error() {
        let operation: Operation = serde_json::from_str(
            r#"{"name":"models/veo/operations/7","done":true,"error":{"code":3,"message":"prompt blocked"}}"#,
        )
        .unwrap();
        assert!(matches!(finished_video_uri(&operation), Err(GeneratorError::Provider(_))));
    }

    #[test]
    fn test_done_without_samples_is_empty() {
        let operation: Operation =
            serde_json::from_str(r#"{"name":"models/veo/operations/7","done":true,"response":{}}"#).unwrap();
        assert!(matches!(finished_video_uri(&operation), Err(GeneratorError::EmptyResult)));
    }
}

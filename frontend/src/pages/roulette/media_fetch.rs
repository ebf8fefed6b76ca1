use base64::{engine::general_purpose::STANDARD, Engine as _};
use gloo::net::http::Request;
use gloo_timers::future::TimeoutFuture;
use regret_shared::gemini::{
    self, GenerateContentRequest, GenerateContentResponse, Operation, PredictVideoRequest,
};
use regret_shared::{CancellationToken, MediaKind, MediaOutcome, MediaRef, MediaRequest};

use crate::config::gemini_api_key;

// Upper bound on status polls for one video job.
const MAX_VIDEO_POLLS: u32 = 60;

/// Runs one deferred media request. Never panics; every failure turns into
/// `MediaOutcome::Failed` so the scene falls back to text only.
pub async fn fetch_media(request: &MediaRequest, token: &CancellationToken) -> MediaOutcome {
    let Some(api_key) = gemini_api_key() else {
        log::warn!("GEMINI_API_KEY not set at build time, skipping generated media");
        return MediaOutcome::Failed;
    };

    let result = match request.kind {
        MediaKind::Image => generate_image(&request.prompt, api_key).await,
        MediaKind::Video => generate_video(&request.prompt, api_key, token).await,
    };

    match result {
        Ok(url) => MediaOutcome::Ready(MediaRef {
            url,
            kind: request.kind,
        }),
        Err(e) => {
            log::error!("Media generation failed: {}", e);
            MediaOutcome::Failed
        }
    }
}

async fn generate_image(prompt: &str, api_key: &str) -> Result<String, String> {
    let body = GenerateContentRequest::image(prompt);
    let response = Request::post(&gemini::generate_content_url(gemini::DEFAULT_IMAGE_MODEL))
        .header(gemini::API_KEY_HEADER, api_key)
        .json(&body)
        .map_err(|e| format!("Error building request: {:?}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {:?}", e))?;

    let status = response.status();
    let data: GenerateContentResponse = response
        .json()
        .await
        .map_err(|e| format!("Error parsing image response: {:?}", e))?;

    if let Some(error) = data.error.as_ref() {
        return Err(format!("API error {}: {}", status, error.message));
    }
    if !(200..300).contains(&status) {
        return Err(format!("Error status: {}", status));
    }

    data.first_image()
        .map(|image| image.to_data_url())
        .ok_or_else(|| "No image data in response".to_string())
}

async fn generate_video(prompt: &str, api_key: &str, token: &CancellationToken) -> Result<String, String> {
    let body = PredictVideoRequest::new(prompt);
    let mut operation = post_operation(
        &gemini::predict_long_running_url(gemini::DEFAULT_VIDEO_MODEL),
        api_key,
        &body,
    )
    .await?;

    let mut polls = 0;
    while !operation.done {
        if polls >= MAX_VIDEO_POLLS {
            return Err(format!("Video job {} did not finish", operation.name));
        }
        TimeoutFuture::new(gemini::VIDEO_POLL_INTERVAL_MS as u32).await;
        if token.is_cancelled() {
            return Err("Video polling cancelled".to_string());
        }
        operation = get_operation(&operation.name, api_key).await?;
        polls += 1;
    }

    if let Some(error) = operation.error.as_ref() {
        return Err(format!("Video job failed: {}", error.message));
    }
    let uri = operation
        .video_uri()
        .ok_or_else(|| "Video job finished without a sample".to_string())?;

    let response = Request::get(uri)
        .header(gemini::API_KEY_HEADER, api_key)
        .send()
        .await
        .map_err(|e| format!("Network error: {:?}", e))?;
    if !response.ok() {
        return Err(format!("Error status: {}", response.status()));
    }
    let mime = response
        .headers()
        .get("content-type")
        .unwrap_or_else(|| "video/mp4".to_string());
    let bytes = response
        .binary()
        .await
        .map_err(|e| format!("Error reading video: {:?}", e))?;

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

async fn post_operation(url: &str, api_key: &str, body: &PredictVideoRequest) -> Result<Operation, String> {
    let response = Request::post(url)
        .header(gemini::API_KEY_HEADER, api_key)
        .json(body)
        .map_err(|e| format!("Error building request: {:?}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {:?}", e))?;
    read_operation(response).await
}

async fn get_operation(name: &str, api_key: &str) -> Result<Operation, String> {
    let response = Request::get(&gemini::operation_url(name))
        .header(gemini::API_KEY_HEADER, api_key)
        .send()
        .await
        .map_err(|e| format!("Network error: {:?}", e))?;
    read_operation(response).await
}

async fn read_operation(response: gloo::net::http::Response) -> Result<Operation, String> {
    let status = response.status();
    let operation: Operation = response
        .json()
        .await
        .map_err(|e| format!("Error parsing operation: {:?}", e))?;
    if !(200..300).contains(&status) {
        let message = operation.error.map(|e| e.message).unwrap_or_default();
        return Err(format!("Error status {}: {}", status, message));
    }
    Ok(operation)
}

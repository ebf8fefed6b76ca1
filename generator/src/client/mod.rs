mod image;
mod video;

use std::future::Future;

use crate::error::GeneratorError;

pub use image::GeminiImageClient;
pub use video::VeoVideoClient;

/// A backend that turns one scene prompt into file bytes.
pub trait MediaGenerator {
    /// File extension for outputs, without the dot.
    fn extension(&self) -> &'static str;

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<Vec<u8>, GeneratorError>>;
}

/// Reads a JSON body, reporting non-2xx statuses without a parsable body as
/// provider errors.
async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, GeneratorError> {
    let status = response.status();
    let text = response.text().await?;
    match serde_json::from_str::<T>(&text) {
        Ok(body) => Ok(body),
        Err(_) if !status.is_success() => Err(GeneratorError::Provider(format!("HTTP {}", status))),
        Err(e) => Err(e.into()),
    }
}

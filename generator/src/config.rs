use std::path::PathBuf;
use std::time::Duration;

use regret_shared::gemini::{DEFAULT_IMAGE_MODEL, DEFAULT_VIDEO_MODEL};
use regret_shared::MediaKind;

use crate::error::GeneratorError;

pub const DEFAULT_OUTPUT_DIR: &str = "frontend/public/images";
pub const DEFAULT_RATE_LIMIT_SECS: u64 = 8;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub output_dir: PathBuf,
    /// JSON catalog to read instead of the built-in one.
    pub catalog_path: Option<PathBuf>,
    pub media: MediaKind,
    pub image_model: String,
    pub video_model: String,
    /// Pause after every generation request.
    pub rate_limit: Duration,
}

impl GeneratorConfig {
    pub fn from_env() -> Result<Self, GeneratorError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GeneratorError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("GEMINI_API_KEY")
            .or_else(|| var("VITE_GEMINI_API_KEY"))
            .ok_or(GeneratorError::MissingApiKey)?;

        let media = match var("REGRET_MEDIA").as_deref() {
            None | Some("image") => MediaKind::Image,
            Some("video") => MediaKind::Video,
            Some(other) => {
                return Err(GeneratorError::Config(format!(
                    "REGRET_MEDIA must be `image` or `video`, got `{}`",
                    other
                )))
            }
        };

        let rate_limit_secs = match var("REGRET_RATE_LIMIT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                GeneratorError::Config(format!("REGRET_RATE_LIMIT_SECS is not a number: `{}`", raw))
            })?,
            None => DEFAULT_RATE_LIMIT_SECS,
        };

        Ok(Self {
            api_key,
            output_dir: PathBuf::from(var("REGRET_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string())),
            catalog_path: var("REGRET_CATALOG").map(PathBuf::from),
            media,
            image_model: var("GEMINI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            video_model: var("GEMINI_VIDEO_MODEL").unwrap_or_else(|| DEFAULT_VIDEO_MODEL.to_string()),
            rate_limit: Duration::from_secs(rate_limit_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let err = GeneratorConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingApiKey));

        let err = GeneratorConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingApiKey));
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_lookup(lookup(&[("VITE_GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.media, MediaKind::Image);
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.rate_limit, Duration::from_secs(8));
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "primary"),
            ("VITE_GEMINI_API_KEY", "fallback"),
            ("REGRET_MEDIA", "video"),
            ("REGRET_OUTPUT_DIR", "out"),
            ("REGRET_RATE_LIMIT_SECS", "0"),
            ("REGRET_CATALOG", "custom.json"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "primary");
        assert_eq!(config.media, MediaKind::Video);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.rate_limit, Duration::ZERO);
        assert_eq!(config.catalog_path, Some(PathBuf::from("custom.json")));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = GeneratorConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("REGRET_MEDIA", "gif")])).unwrap_err();
        assert!(matches!(err, GeneratorError::Config(_)));

        let err = GeneratorConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("REGRET_RATE_LIMIT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, GeneratorError::Config(_)));
    }
}

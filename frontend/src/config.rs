use regret_shared::{MediaStrategy, RouletteConfig, SelectionPolicy};
use web_sys::window;

/// Roulette settings baked in at build time.
///
/// `REGRET_MEDIA` picks the media provider (`static`, `image`, `video`) and
/// `REGRET_SELECTION` the draw policy (`no_repeat`, `with_replacement`).
pub fn app_config() -> RouletteConfig {
    let media = match option_env!("REGRET_MEDIA") {
        Some("image") => MediaStrategy::GeneratedImage,
        Some("video") => MediaStrategy::GeneratedVideo,
        _ => MediaStrategy::Static,
    };
    let selection = match option_env!("REGRET_SELECTION") {
        Some("with_replacement") => SelectionPolicy::WithReplacement,
        _ => SelectionPolicy::NoRepeat,
    };

    RouletteConfig {
        media,
        selection,
        ..RouletteConfig::default()
    }
}

/// Gemini key for the generated media providers.
pub fn gemini_api_key() -> Option<&'static str> {
    option_env!("GEMINI_API_KEY").filter(|key| !key.is_empty())
}

pub fn get_asset_base_url() -> String {
    if let Some(window) = window() {
        if let Ok(origin) = window.location().origin() {
            return origin;
        }
    }

    // Default to the trunk dev server
    "http://127.0.0.1:8080".to_string()
}

pub fn get_asset_url(path: &str) -> String {
    if path.starts_with("http") || path.starts_with("data:") {
        path.to_string()
    } else {
        format!("{}{}", get_asset_base_url(), path)
    }
}

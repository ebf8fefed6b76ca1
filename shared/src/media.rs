use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Serialize, Deserialize};

use crate::catalog::ScenarioRecord;
use crate::scenes::SceneKind;

/// Where scene media comes from. One strategy per deployment.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MediaStrategy {
    /// Pre-baked asset paths, resolved immediately.
    #[default]
    Static,
    /// One image generation request per scene.
    GeneratedImage,
    /// One long-running video job per scene.
    GeneratedVideo,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaStrategy {
    pub fn kind(self) -> MediaKind {
        match self {
            MediaStrategy::Static | MediaStrategy::GeneratedImage => MediaKind::Image,
            MediaStrategy::GeneratedVideo => MediaKind::Video,
        }
    }

    pub fn is_deferred(self) -> bool {
        !matches!(self, MediaStrategy::Static)
    }
}

/// A displayable media reference: asset path, remote URL or data URL.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub url: String,
    pub kind: MediaKind,
}

/// Per-scene media state inside a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MediaSlot {
    #[default]
    Pending,
    Ready(MediaRef),
    Absent,
}

impl MediaSlot {
    pub fn is_pending(&self) -> bool {
        matches!(self, MediaSlot::Pending)
    }

    pub fn media(&self) -> Option<&MediaRef> {
        match self {
            MediaSlot::Ready(media) => Some(media),
            _ => None,
        }
    }
}

/// What a provider reports back for one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaOutcome {
    Ready(MediaRef),
    Failed,
}

/// Identifies one spin-through-storyboard cycle.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Shared cancellation flag handed to in-flight media work.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    pub prompt: String,
    pub kind: MediaKind,
}

/// A unit of deferred media work the host must run and report back through
/// `StageController::complete_media`.
#[derive(Debug, Clone)]
pub struct MediaTicket {
    pub session: SessionId,
    pub scene: SceneKind,
    pub request: MediaRequest,
    pub token: CancellationToken,
}

/// Initial slot for a scene and, for deferred strategies, the request to run.
pub fn plan_scene(
    record: &ScenarioRecord,
    scene: SceneKind,
    strategy: MediaStrategy,
) -> (MediaSlot, Option<MediaRequest>) {
    let Some(source) = record.scene(scene).media_source(strategy) else {
        return (MediaSlot::Absent, None);
    };

    if strategy.is_deferred() {
        let request = MediaRequest {
            prompt: source.to_string(),
            kind: strategy.kind(),
        };
        (MediaSlot::Pending, Some(request))
    } else {
        let media = MediaRef {
            url: source.to_string(),
            kind: strategy.kind(),
        };
        (MediaSlot::Ready(media), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_catalog;

    #[test]
    fn test_token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_static_plan_resolves_immediately() {
        let catalog = test_catalog(&["a"]);
        let (slot, request) = plan_scene(&catalog.records()[0], SceneKind::AlternateLife, MediaStrategy::Static);
        assert_eq!(slot.media().map(|m| m.url.as_str()), Some("/images/a-dream.png"));
        assert!(request.is_none());
    }

    #[test]
    fn test_generated_plan_is_pending() {
        let catalog = test_catalog(&["a"]);
        let (slot, request) = plan_scene(&catalog.records()[0], SceneKind::Reality, MediaStrategy::GeneratedImage);
        assert!(slot.is_pending());
        assert_eq!(request.unwrap().prompt, "a reality prompt");
    }

    #[test]
    fn test_missing_source_is_absent() {
        let catalog = test_catalog(&["a"]);
        let (slot, request) = plan_scene(&catalog.records()[0], SceneKind::Opportunity, MediaStrategy::GeneratedVideo);
        assert_eq!(slot, MediaSlot::Absent);
        assert!(request.is_none());
    }
}

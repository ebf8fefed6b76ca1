use serde::{Serialize, Deserialize};

use crate::media::MediaStrategy;
use crate::selector::SelectionPolicy;
use crate::wheel_layout::DEFAULT_REPLICATION;

/// Timing of the spinning stage, measured from the moment the user spins.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct StageTimings {
    /// Length of the wheel rotation animation.
    pub spin_animation_ms: u64,
    /// When the "the wheel has spoken" overlay appears.
    pub reveal_ms: u64,
    /// When the storyboard takes over.
    pub storyboard_ms: u64,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            spin_animation_ms: 4_500,
            reveal_ms: 4_800,
            storyboard_ms: 7_500,
        }
    }
}

/// Deployment choices for one roulette instance.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RouletteConfig {
    pub replication: usize,
    pub selection: SelectionPolicy,
    pub media: MediaStrategy,
    pub timings: StageTimings,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            replication: DEFAULT_REPLICATION,
            selection: SelectionPolicy::NoRepeat,
            media: MediaStrategy::Static,
            timings: StageTimings::default(),
        }
    }
}

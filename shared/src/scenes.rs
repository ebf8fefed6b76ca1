use serde::{Serialize, Deserialize};

/// Number of scenes every scenario carries.
pub const SCENE_COUNT: usize = 3;

/// The three fixed storyboard beats, in display order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    Opportunity,
    AlternateLife,
    Reality,
}

impl SceneKind {
    pub const ALL: [SceneKind; SCENE_COUNT] = [
        SceneKind::Opportunity,
        SceneKind::AlternateLife,
        SceneKind::Reality,
    ];

    pub fn index(self) -> usize {
        match self {
            SceneKind::Opportunity => 0,
            SceneKind::AlternateLife => 1,
            SceneKind::Reality => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The scene that follows this one, `None` on the terminal scene.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn is_terminal(self) -> bool {
        self == SceneKind::Reality
    }

    /// File-name fragment used for pre-generated assets (`{id}-{slug}.png`).
    pub fn slug(self) -> &'static str {
        match self {
            SceneKind::Opportunity => "opportunity",
            SceneKind::AlternateLife => "dream",
            SceneKind::Reality => "reality",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SceneKind::Opportunity => "WHAT YOU MISSED",
            SceneKind::AlternateLife => "THE LIFE YOU NEVER LIVED",
            SceneKind::Reality => "YOUR REALITY",
        }
    }

    pub fn sublabel(self) -> &'static str {
        match self {
            SceneKind::Opportunity => "Because you thought you knew better",
            SceneKind::AlternateLife => "If only you had taken the chance",
            SceneKind::Reality => "Monday through Friday, forever",
        }
    }

    pub fn numeral(self) -> &'static str {
        match self {
            SceneKind::Opportunity => "I",
            SceneKind::AlternateLife => "II",
            SceneKind::Reality => "III",
        }
    }

    /// Accent colour for the scene chrome.
    pub fn accent(self) -> &'static str {
        match self {
            SceneKind::Opportunity => "#c5a059",
            SceneKind::AlternateLife => "#22c55e",
            SceneKind::Reality => "#ef4444",
        }
    }
}

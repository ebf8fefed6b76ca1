use std::collections::HashSet;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::media::MediaStrategy;
use crate::scenes::{SceneKind, SCENE_COUNT};

const BUILTIN_CATALOG: &str = include_str!("../data/regrets.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,
    #[error("duplicate scenario id `{0}`")]
    DuplicateId(String),
    #[error("scenario `{id}` is invalid: {source}")]
    InvalidScenario {
        id: String,
        #[source]
        source: ValidationErrors,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Payload for one storyboard scene. Which of the media fields is populated
/// decides which media strategy a deployment can use.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SceneEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_prompt: Option<String>,
}

impl SceneEntry {
    /// The field the given strategy reads, if present and non-blank.
    pub fn media_source(&self, strategy: MediaStrategy) -> Option<&str> {
        let field = match strategy {
            MediaStrategy::Static => &self.image_path,
            MediaStrategy::GeneratedImage => &self.image_prompt,
            MediaStrategy::GeneratedVideo => &self.video_prompt,
        };
        field.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.as_deref().map(|t| t.lines().collect()).unwrap_or_default()
    }
}

/// One selectable regret storyline.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRecord {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default)]
    pub category: String,
    #[validate(custom = "validate_wheel_color")]
    pub wheel_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheel_icon: Option<String>,
    pub scenes: [SceneEntry; SCENE_COUNT],
}

impl ScenarioRecord {
    pub fn scene(&self, kind: SceneKind) -> &SceneEntry {
        &self.scenes[kind.index()]
    }

    /// Subtitle, or the year for records that carry one instead.
    pub fn tagline(&self) -> Option<&str> {
        self.subtitle.as_deref().or(self.year.as_deref())
    }

    /// Deterministic asset name for a scene, e.g. `bitcoin-dream`.
    pub fn asset_stem(&self, kind: SceneKind) -> String {
        format!("{}-{}", self.id, kind.slug())
    }
}

pub fn validate_wheel_color(color: &str) -> Result<(), ValidationError> {
    let hex = color.strip_prefix('#').unwrap_or("");
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::new("invalid_wheel_color"));
    }
    Ok(())
}

/// Ordered, immutable list of scenarios. Construct once and pass it to the
/// components that need it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<ScenarioRecord>,
}

impl Catalog {
    pub fn from_records(records: Vec<ScenarioRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        for record in &records {
            record.validate().map_err(|source| CatalogError::InvalidScenario {
                id: record.id.clone(),
                source,
            })?;
            if !ids.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }

        Ok(Self { records })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<ScenarioRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// The five scenarios bundled with the app.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ScenarioRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&ScenarioRecord> {
        self.records.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.records.iter()
    }

    /// True when every scene carries the field `strategy` needs.
    pub fn supports(&self, strategy: MediaStrategy) -> bool {
        self.records
            .iter()
            .all(|r| r.scenes.iter().all(|s| s.media_source(strategy).is_some()))
    }
}

#[cfg(test)]
pub(crate) fn test_catalog(ids: &[&str]) -> Catalog {
    let colors = ["#8b6914", "#92400e", "#059669", "#14532d", "#be185d", "#1d4ed8"];
    let records = ids
        .iter()
        .enumerate()
        .map(|(i, id)| ScenarioRecord {
            id: id.to_string(),
            title: format!("Scenario {}", id),
            subtitle: None,
            year: None,
            category: "Test".to_string(),
            wheel_color: colors[i % colors.len()].to_string(),
            wheel_icon: None,
            scenes: SceneKind::ALL.map(|kind| SceneEntry {
                text: Some(format!("{} line one\n\"{} line two\"", id, kind.slug())),
                image_path: Some(format!("/images/{}-{}.png", id, kind.slug())),
                image_prompt: Some(format!("{} {} prompt", id, kind.slug())),
                video_prompt: None,
            }),
        })
        .collect();
    Catalog::from_records(records).expect("test catalog is valid")
}

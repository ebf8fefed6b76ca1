pub mod catalog;
pub mod config;
pub mod gemini;
pub mod media;
pub mod narrative;
pub mod scenes;
pub mod selector;
pub mod spin;
pub mod stage;
pub mod wheel_layout;

pub use catalog::{Catalog, CatalogError, ScenarioRecord, SceneEntry};
pub use config::{RouletteConfig, StageTimings};
pub use media::{
    CancellationToken, MediaKind, MediaOutcome, MediaRef, MediaRequest, MediaSlot,
    MediaStrategy, MediaTicket, SessionId,
};
pub use scenes::SceneKind;
pub use selector::{SelectionPolicy, Selector};
pub use spin::{resolve_spin, SpinResolution};
pub use stage::{SpinPlan, Stage, StageController, StageEvent};
pub use wheel_layout::{LayoutError, Segment, WheelLayout};

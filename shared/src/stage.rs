use rand::Rng;
use serde::Serialize;

use crate::catalog::{Catalog, ScenarioRecord};
use crate::config::RouletteConfig;
use crate::media::{
    plan_scene, CancellationToken, MediaOutcome, MediaSlot, MediaTicket, SessionId,
};
use crate::scenes::SceneKind;
use crate::selector::Selector;
use crate::spin::{accumulate_rotation, resolve_spin, SpinResolution};
use crate::wheel_layout::{LayoutError, WheelLayout};

/// Where the roulette currently is.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Landing,
    Spinning,
    Storyboard(SceneKind),
}

/// Time-driven happenings reported by `StageController::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    ResultRevealed,
    StoryboardEntered,
}

/// Everything the host needs after a spin starts.
#[derive(Debug, Clone)]
pub struct SpinPlan {
    pub session: SessionId,
    pub scenario_index: usize,
    pub resolution: SpinResolution,
    /// Absolute rotation the wheel should animate to.
    pub wheel_rotation: f64,
    /// Deferred media work, one ticket per scene that needs fetching.
    pub tickets: Vec<MediaTicket>,
}

#[derive(Debug)]
struct Session {
    id: SessionId,
    token: CancellationToken,
    spun_at: u64,
    revealed: bool,
    media: [MediaSlot; 3],
}

/// Landing → spinning → storyboard sequencer.
///
/// Time is supplied by the caller in milliseconds; the host is expected to
/// call `tick` at `next_deadline()` (or more often).
#[derive(Debug)]
pub struct StageController {
    catalog: Catalog,
    layout: WheelLayout,
    selector: Selector,
    config: RouletteConfig,
    stage: Stage,
    wheel_rotation: f64,
    selected: Option<(usize, usize)>,
    session: Option<Session>,
    next_session: u64,
}

impl StageController {
    pub fn new(catalog: Catalog, config: RouletteConfig) -> Result<Self, LayoutError> {
        let layout = WheelLayout::build(&catalog, config.replication)?;
        if !catalog.supports(config.media) {
            log::warn!("catalog lacks {:?} sources for some scenes, those scenes will show no media", config.media);
        }

        Ok(Self {
            selector: Selector::new(config.selection),
            catalog,
            layout,
            config,
            stage: Stage::Landing,
            wheel_rotation: 0.0,
            selected: None,
            session: None,
            next_session: 0,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn scene(&self) -> Option<SceneKind> {
        match self.stage {
            Stage::Storyboard(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn is_terminal_scene(&self) -> bool {
        self.scene().is_some_and(SceneKind::is_terminal)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layout(&self) -> &WheelLayout {
        &self.layout
    }

    pub fn config(&self) -> &RouletteConfig {
        &self.config
    }

    pub fn wheel_rotation(&self) -> f64 {
        self.wheel_rotation
    }

    /// Scenario chosen by the most recent spin.
    pub fn scenario(&self) -> Option<&ScenarioRecord> {
        self.selected.and_then(|(index, _)| self.catalog.get(index))
    }

    pub fn segment_index(&self) -> Option<usize> {
        self.selected.map(|(_, segment)| segment)
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn result_revealed(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.revealed)
    }

    pub fn media(&self, scene: SceneKind) -> Option<&MediaSlot> {
        self.session.as_ref().map(|s| &s.media[scene.index()])
    }

    /// Starts a spin. Only legal from the landing stage.
    pub fn spin<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> Option<SpinPlan> {
        if self.stage != Stage::Landing {
            log::debug!("ignoring spin while {:?}", self.stage);
            return None;
        }

        let record = self.selector.pick_next(&self.catalog, rng);
        let scenario_index = self.catalog.position(&record.id)?;
        let resolution = resolve_spin(&self.layout, &record.id, rng)?;

        if let Some(stale) = self.session.take() {
            stale.token.cancel();
        }

        self.next_session += 1;
        let id = SessionId(self.next_session);
        let token = CancellationToken::new();
        let mut tickets = Vec::new();
        let media = SceneKind::ALL.map(|scene| {
            let (slot, request) = plan_scene(record, scene, self.config.media);
            if let Some(request) = request {
                tickets.push(MediaTicket {
                    session: id,
                    scene,
                    request,
                    token: token.clone(),
                });
            }
            slot
        });

        self.wheel_rotation = accumulate_rotation(self.wheel_rotation, resolution.target_rotation);
        self.selected = Some((scenario_index, resolution.segment_index));
        self.session = Some(Session {
            id,
            token,
            spun_at: now_ms,
            revealed: false,
            media,
        });
        self.stage = Stage::Spinning;

        log::info!(
            "{} spun onto `{}` (segment {}, {} turns)",
            id,
            record.id,
            resolution.segment_index,
            resolution.full_turns
        );

        Some(SpinPlan {
            session: id,
            scenario_index,
            resolution,
            wheel_rotation: self.wheel_rotation,
            tickets,
        })
    }

    /// Next instant at which `tick` has something to do.
    pub fn next_deadline(&self) -> Option<u64> {
        if self.stage != Stage::Spinning {
            return None;
        }
        let session = self.session.as_ref()?;
        let timings = &self.config.timings;
        let storyboard_at = session.spun_at + timings.storyboard_ms;
        if session.revealed {
            Some(storyboard_at)
        } else {
            Some((session.spun_at + timings.reveal_ms).min(storyboard_at))
        }
    }

    /// Applies every timed transition due at `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Vec<StageEvent> {
        let mut events = Vec::new();
        if self.stage != Stage::Spinning {
            return events;
        }
        let timings = self.config.timings;
        let Some(session) = self.session.as_mut() else {
            return events;
        };

        let reveal_at = session.spun_at + timings.reveal_ms;
        let storyboard_at = session.spun_at + timings.storyboard_ms;

        if !session.revealed && (now_ms >= reveal_at || now_ms >= storyboard_at) {
            session.revealed = true;
            events.push(StageEvent::ResultRevealed);
        }
        if now_ms >= storyboard_at {
            self.stage = Stage::Storyboard(SceneKind::Opportunity);
            events.push(StageEvent::StoryboardEntered);
        }
        events
    }

    /// "Continue": moves to the next scene. No-op outside the storyboard and
    /// on the terminal scene.
    pub fn advance(&mut self) -> bool {
        let Stage::Storyboard(scene) = self.stage else {
            return false;
        };
        match scene.next() {
            Some(next) => {
                self.stage = Stage::Storyboard(next);
                true
            }
            None => false,
        }
    }

    /// Back to landing from anywhere. Cancels the session's pending media and
    /// timers; returns the abandoned session.
    pub fn reset(&mut self) -> Option<SessionId> {
        let abandoned = self.session.take().map(|session| {
            session.token.cancel();
            session.id
        });
        self.stage = Stage::Landing;
        if let Some(id) = abandoned {
            log::info!("{} reset to landing", id);
        }
        abandoned
    }

    /// Stores a provider result if it still belongs to the live session.
    pub fn complete_media(&mut self, session: SessionId, scene: SceneKind, outcome: MediaOutcome) -> bool {
        let Some(current) = self.session.as_mut() else {
            log::debug!("discarding media for {} {:?}: no live session", session, scene);
            return false;
        };
        if current.id != session || current.token.is_cancelled() {
            log::debug!("discarding stale media for {} {:?}", session, scene);
            return false;
        }

        let slot = &mut current.media[scene.index()];
        if !slot.is_pending() {
            return false;
        }
        *slot = match outcome {
            MediaOutcome::Ready(media) => MediaSlot::Ready(media),
            MediaOutcome::Failed => {
                log::warn!("media for {} {:?} failed, showing scene without it", session, scene);
                MediaSlot::Absent
            }
        };
        true
    }

    /// Host-side entry point for a finished ticket. Work whose token was
    /// cancelled while in flight is dropped before touching the session.
    pub fn deliver(&mut self, ticket: &MediaTicket, outcome: MediaOutcome) -> bool {
        if ticket.token.is_cancelled() {
            log::debug!("dropping media for cancelled {} {:?}", ticket.session, ticket.scene);
            return false;
        }
        self.complete_media(ticket.session, ticket.scene, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_catalog;
    use crate::media::{MediaKind, MediaRef, MediaStrategy};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn controller(media: MediaStrategy) -> StageController {
        let config = RouletteConfig {
            media,
            ..RouletteConfig::default()
        };
        StageController::new(test_catalog(&["a", "b", "c", "d"]), config).unwrap()
    }

    fn image(url: &str) -> MediaOutcome {
        MediaOutcome::Ready(MediaRef {
            url: url.to_string(),
            kind: MediaKind::Image,
        })
    }

    #[test]
    fn test_spin_then_auto_storyboard() {
        let mut ctl = controller(MediaStrategy::Static);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(ctl.stage(), Stage::Landing);

        let plan = ctl.spin(1_000, &mut rng).unwrap();
        assert_eq!(ctl.stage(), Stage::Spinning);
        assert!(plan.tickets.is_empty());
        assert_eq!(ctl.next_deadline(), Some(5_800));

        assert!(ctl.tick(5_000).is_empty());
        assert_eq!(ctl.tick(5_800), vec![StageEvent::ResultRevealed]);
        assert!(ctl.result_revealed());
        assert_eq!(ctl.next_deadline(), Some(8_500));
        assert_eq!(ctl.stage(), Stage::Spinning);

        assert_eq!(ctl.tick(8_500), vec![StageEvent::StoryboardEntered]);
        assert_eq!(ctl.stage(), Stage::Storyboard(SceneKind::Opportunity));
        assert_eq!(ctl.next_deadline(), None);
    }

    #[test]
    fn test_late_tick_emits_both_events() {
        let mut ctl = controller(MediaStrategy::Static);
        let mut rng = StdRng::seed_from_u64(2);
        ctl.spin(0, &mut rng).unwrap();
        assert_eq!(
            ctl.tick(60_000),
            vec![StageEvent::ResultRevealed, StageEvent::StoryboardEntered]
        );
    }

    #[test]
    fn test_user_actions_cannot_skip_spinning() {
        let mut ctl = controller(MediaStrategy::Static);
        let mut rng = StdRng::seed_from_u64(3);
        ctl.spin(0, &mut rng).unwrap();
        assert!(!ctl.advance());
        assert!(ctl.spin(100, &mut rng).is_none());
        assert_eq!(ctl.stage(), Stage::Spinning);
    }

    #[test]
    fn test_continue_walks_scenes_and_stops_at_reality() {
        let mut ctl = controller(MediaStrategy::Static);
        let mut rng = StdRng::seed_from_u64(4);
        ctl.spin(0, &mut rng).unwrap();
        ctl.tick(7_500);

        assert!(ctl.advance());
        assert_eq!(ctl.stage(), Stage::Storyboard(SceneKind::AlternateLife));
        assert!(ctl.advance());
        assert_eq!(ctl.stage(), Stage::Storyboard(SceneKind::Reality));
        assert!(ctl.is_terminal_scene());

        assert!(!ctl.advance());
        assert_eq!(ctl.stage(), Stage::Storyboard(SceneKind::Reality));
    }

    #[test]
    fn test_reset_from_reality_cancels_tokens() {
        let mut ctl = controller(MediaStrategy::GeneratedImage);
        let mut rng = StdRng::seed_from_u64(5);
        let plan = ctl.spin(0, &mut rng).unwrap();
        assert_eq!(plan.tickets.len(), 3);
        ctl.tick(7_500);
        ctl.advance();
        ctl.advance();

        assert_eq!(ctl.reset(), Some(plan.session));
        assert_eq!(ctl.stage(), Stage::Landing);
        assert!(plan.tickets.iter().all(|t| t.token.is_cancelled()));
        assert_eq!(ctl.next_deadline(), None);
    }

    #[test]
    fn test_reset_while_spinning_drops_pending_transition() {
        let mut ctl = controller(MediaStrategy::Static);
        let mut rng = StdRng::seed_from_u64(6);
        ctl.spin(0, &mut rng).unwrap();
        ctl.reset();
        assert!(ctl.tick(10_000).is_empty());
        assert_eq!(ctl.stage(), Stage::Landing);
    }

    #[test]
    fn test_media_after_reset_is_ignored() {
        let mut ctl = controller(MediaStrategy::GeneratedImage);
        let mut rng = StdRng::seed_from_u64(7);
        let first = ctl.spin(0, &mut rng).unwrap();
        ctl.reset();

        let second = ctl.spin(20_000, &mut rng).unwrap();
        assert_ne!(first.session, second.session);

        // The first session's provider resolves late.
        let late = &first.tickets[0];
        assert!(!ctl.complete_media(late.session, late.scene, image("stale.png")));
        assert!(ctl.media(late.scene).unwrap().is_pending());

        ctl.reset();
        assert!(!ctl.complete_media(second.session, SceneKind::Reality, image("late.png")));
        assert_eq!(ctl.media(SceneKind::Reality), None);
    }

    /// Holds tickets and resolves them whenever the test says so.
    struct DelayedProvider {
        queued: Vec<MediaTicket>,
    }

    impl DelayedProvider {
        fn resolve_all(&mut self, ctl: &mut StageController) -> Vec<bool> {
            self.queued
                .drain(..)
                .rev()
                .map(|ticket| {
                    let url = format!("{}-{}.png", ticket.session, ticket.scene.slug());
                    ctl.deliver(&ticket, image(&url))
                })
                .collect()
        }
    }

    #[test]
    fn test_delayed_provider_after_reset_changes_nothing() {
        let mut ctl = controller(MediaStrategy::GeneratedImage);
        let mut rng = StdRng::seed_from_u64(12);
        let first = ctl.spin(0, &mut rng).unwrap();
        let mut provider = DelayedProvider { queued: first.tickets };

        ctl.reset();
        let second = ctl.spin(10_000, &mut rng).unwrap();

        assert_eq!(provider.resolve_all(&mut ctl), vec![false, false, false]);
        for scene in SceneKind::ALL {
            assert!(ctl.media(scene).unwrap().is_pending());
        }

        provider.queued = second.tickets;
        assert_eq!(provider.resolve_all(&mut ctl), vec![true, true, true]);
        assert!(ctl.media(SceneKind::Reality).unwrap().media().is_some());
    }

    #[test]
    fn test_delayed_provider_after_final_reset() {
        let mut ctl = controller(MediaStrategy::GeneratedImage);
        let mut rng = StdRng::seed_from_u64(13);
        let plan = ctl.spin(0, &mut rng).unwrap();
        assert_eq!(plan.tickets.len(), 3);
        let mut provider = DelayedProvider { queued: plan.tickets };

        ctl.tick(7_500);
        ctl.reset();

        assert_eq!(provider.resolve_all(&mut ctl), vec![false, false, false]);
        assert_eq!(ctl.stage(), Stage::Landing);
        assert_eq!(ctl.media(SceneKind::Opportunity), None);
    }

    #[test]
    fn test_media_arrives_out_of_order() {
        let mut ctl = controller(MediaStrategy::GeneratedImage);
        let mut rng = StdRng::seed_from_u64(8);
        let plan = ctl.spin(0, &mut rng).unwrap();

        assert!(ctl.complete_media(plan.session, SceneKind::Reality, image("r.png")));
        assert!(ctl.complete_media(plan.session, SceneKind::Opportunity, MediaOutcome::Failed));
        ctl.tick(7_500);
        ctl.advance();

        assert_eq!(ctl.media(SceneKind::Opportunity), Some(&MediaSlot::Absent));
        assert!(ctl.media(SceneKind::AlternateLife).unwrap().is_pending());
        assert_eq!(ctl.media(SceneKind::Reality).unwrap().media().unwrap().url, "r.png");

        // A second report for a settled scene changes nothing.
        assert!(!ctl.complete_media(plan.session, SceneKind::Reality, image("again.png")));
    }

    #[test]
    fn test_static_media_ready_on_spin() {
        let mut ctl = controller(MediaStrategy::Static);
        let mut rng = StdRng::seed_from_u64(9);
        ctl.spin(0, &mut rng).unwrap();
        let id = ctl.scenario().unwrap().id.clone();
        for scene in SceneKind::ALL {
            let expected = format!("/images/{}-{}.png", id, scene.slug());
            assert_eq!(ctl.media(scene).unwrap().media().unwrap().url, expected);
        }
    }

    #[test]
    fn test_wheel_rotation_accumulates_and_lands() {
        let mut ctl = controller(MediaStrategy::Static);
        let mut rng = StdRng::seed_from_u64(10);
        let mut previous = 0.0;
        for round in 0..12 {
            let plan = ctl.spin(round * 10_000, &mut rng).unwrap();
            assert!(plan.wheel_rotation > previous);
            let landed = ctl.layout().scenario_under_pointer(plan.wheel_rotation);
            assert_eq!(landed, ctl.scenario().unwrap().id);
            assert_eq!(ctl.segment_index(), Some(plan.resolution.segment_index));
            previous = plan.wheel_rotation;
            ctl.reset();
        }
    }

    #[test]
    fn test_no_repeat_across_spins() {
        let mut ctl = controller(MediaStrategy::Static);
        let mut rng = StdRng::seed_from_u64(11);
        let mut ids = Vec::new();
        for _ in 0..4 {
            ctl.spin(0, &mut rng).unwrap();
            ids.push(ctl.scenario().unwrap().id.clone());
            ctl.reset();
        }
        ids.sort();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }
}

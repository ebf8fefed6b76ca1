use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::catalog::{Catalog, ScenarioRecord};

/// How the next scenario is drawn.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Every scenario is shown once before any repeats.
    #[default]
    NoRepeat,
    /// Plain uniform draw over the whole catalog every time.
    WithReplacement,
}

/// Picks scenarios and owns the seen set.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    policy: SelectionPolicy,
    seen: HashSet<String>,
}

impl Selector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            seen: HashSet::new(),
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }

    pub fn pick_next<'c, R: Rng + ?Sized>(
        &mut self,
        catalog: &'c Catalog,
        rng: &mut R,
    ) -> &'c ScenarioRecord {
        let records = catalog.records();

        if self.policy == SelectionPolicy::WithReplacement {
            return &records[rng.gen_range(0..records.len())];
        }

        let mut available: Vec<&ScenarioRecord> =
            records.iter().filter(|r| !self.seen.contains(&r.id)).collect();
        if available.is_empty() {
            log::debug!("all {} scenarios seen, starting a new round", records.len());
            self.seen.clear();
            available = records.iter().collect();
        }

        // Catalogs are never empty, so there is always a candidate.
        let chosen = available
            .choose(rng)
            .copied()
            .unwrap_or(&records[0]);
        self.seen.insert(chosen.id.clone());
        chosen
    }
}

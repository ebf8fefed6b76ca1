//! Line-by-line reveal timing for a scene's narrative text.

pub const FIRST_LINE_DELAY_MS: u64 = 500;
pub const LINE_INTERVAL_MS: u64 = 1_200;
pub const ACTIONS_DELAY_MS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeLine {
    pub text: String,
    pub is_quote: bool,
}

/// Reveal schedule for one scene, relative to the moment the scene starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeSchedule {
    lines: Vec<NarrativeLine>,
}

impl NarrativeSchedule {
    pub fn new(text: &str) -> Self {
        let lines = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| NarrativeLine {
                text: line.to_string(),
                is_quote: line.starts_with('"') || line.starts_with('\u{201C}'),
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[NarrativeLine] {
        &self.lines
    }

    /// When line `index` becomes visible.
    pub fn line_at(&self, index: usize) -> u64 {
        FIRST_LINE_DELAY_MS + index as u64 * LINE_INTERVAL_MS
    }

    /// When the scene's actions become available.
    pub fn actions_at(&self) -> u64 {
        match self.lines.len() {
            0 => 0,
            n => self.line_at(n - 1) + ACTIONS_DELAY_MS,
        }
    }

    pub fn visible_count(&self, elapsed_ms: u64) -> usize {
        (0..self.lines.len())
            .take_while(|&i| self.line_at(i) <= elapsed_ms)
            .count()
    }

    /// The line currently in the spotlight, if any has appeared.
    pub fn active_line(&self, elapsed_ms: u64) -> Option<usize> {
        self.visible_count(elapsed_ms).checked_sub(1)
    }

    pub fn actions_ready(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.actions_at()
    }
}

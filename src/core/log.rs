//! Narrative log: the append-only replay stream.
//!
//! Every entry is attributed to a (round, phase). The engine never reads
//! the log back to make decisions; it only feeds decision context and
//! external replay/visualization tooling, which keys on the bracketed
//! tags below.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::state::Phase;

/// Bracketed tags understood by the log-parsing tooling.
pub mod tags {
    pub const NIGHT_PHASE: &str = "[NIGHT PHASE]";
    pub const GUARDIAN: &str = "[GUARDIAN] Protecting...";
    pub const WEREWOLVES: &str = "[WEREWOLVES] Choosing target...";
    pub const SEER: &str = "[SEER] Checking...";
    pub const WITCH: &str = "[WITCH] Deciding...";
    pub const MORNING: &str = "[MORNING] Announcement:";
    pub const DEAD: &str = "[DEAD]";
    pub const LAST_WORDS: &str = "[LAST WORDS]";
    pub const DAY_PHASE: &str = "[DAY PHASE]";
    pub const VOTING: &str = "[VOTING] Voting Phase";
    pub const ELIMINATED: &str = "[ELIMINATED]";
    pub const HUNTER_SKILL: &str = "[HUNTER SKILL]";
    pub const INVALID: &str = "[INVALID]";
    pub const WINNER: &str = "[WINNER]";
    pub const DRAW: &str = "[DRAW] Maximum rounds reached";
}

/// One narrative line (may span several physical lines).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Round the event happened in (0 = setup).
    pub round: u32,
    /// Phase the event happened in.
    pub phase: Phase,
    /// Free-form text.
    pub text: String,
}

/// Append-only narrative stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeLog {
    entries: Vector<LogEntry>,
}

impl NarrativeLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, round: u32, phase: Phase, text: impl Into<String>) {
        self.entries.push_back(LogEntry {
            round,
            phase,
            text: text.into(),
        });
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in append order.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The last `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &LogEntry> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip)
    }

    /// Entries recorded during `round`.
    pub fn round(&self, round: u32) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.round == round)
    }

    /// True if any entry contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.text.contains(needle))
    }

    /// Render as a plain transcript, one entry per line.
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.text);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_recent() {
        let mut log = NarrativeLog::new();
        for i in 0..7 {
            log.push(1, Phase::Night, format!("event {}", i));
        }

        let recent: Vec<_> = log.recent(3).map(|e| e.text.as_str()).collect();
        assert_eq!(recent, vec!["event 4", "event 5", "event 6"]);
        assert_eq!(log.recent(100).count(), 7);
    }

    #[test]
    fn test_round_filter() {
        let mut log = NarrativeLog::new();
        log.push(1, Phase::Night, "a");
        log.push(2, Phase::Day, "b");
        log.push(2, Phase::Voting, "c");

        assert_eq!(log.round(2).count(), 2);
        assert!(log.contains("b"));
        assert_eq!(log.transcript(), "a\nb\nc\n");
    }
}

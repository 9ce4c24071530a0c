use crate::clue_index::ClueIndex;
use crate::explorer::{ExitReason, Explorer, LeafPolicy};
use crate::mansion::{ClueTable, Mansion, MansionError};
use crate::room_tree::RoomTree;
use crate::suspect_map::{DEFAULT_CAPACITY, SuspectMap, SuspectMapError};
use crate::terminal::Terminal;
use crate::verdict::{self, DEFAULT_THRESHOLD, Verdict};
use serde::Serialize;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    #[error("invalid mansion: {0}")]
    Mansion(#[from] MansionError),
    #[error("invalid suspect table: {0}")]
    SuspectMap(#[from] SuspectMapError),
    #[error("console I/O failed")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub leaf_policy: LeafPolicy,
    pub threshold: u32,
    pub capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            leaf_policy: LeafPolicy::default(),
            threshold: DEFAULT_THRESHOLD,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectedClue {
    pub text: String,
    pub count: u32,
    pub suspect: Option<String>,
}

/// What happened in one play-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseSummary {
    pub visited: Vec<String>,
    pub exit: ExitReason,
    pub clues: Vec<CollectedClue>,
    pub verdict: Verdict,
}

pub struct Game {
    rooms: RoomTree,
    clue_rules: ClueTable,
    suspects: SuspectMap,
    settings: Settings,
}

impl Game {
    pub fn new(mansion: &Mansion, settings: Settings) -> Result<Self, QuestError> {
        let rooms = mansion.build_rooms()?;
        let clue_rules = mansion.clue_table()?;
        let suspects = mansion.suspect_map(settings.capacity)?;
        info!(
            rooms = rooms.len(),
            facts = suspects.len(),
            buckets = suspects.capacity(),
            "mansion ready"
        );
        Ok(Self {
            rooms,
            clue_rules,
            suspects,
            settings,
        })
    }

    pub fn rooms(&self) -> &RoomTree {
        &self.rooms
    }

    /// Exploration followed by the trial. Every play-through starts with an
    /// empty clue index.
    pub fn play<T: Terminal + ?Sized>(&self, terminal: &mut T) -> Result<CaseSummary, QuestError> {
        terminal.say("Welcome to Detective Quest!")?;

        let mut clues = ClueIndex::new();
        let explorer = Explorer::new(
            &self.rooms,
            &self.clue_rules,
            &self.suspects,
            self.settings.leaf_policy,
        );
        let exploration = explorer.explore(terminal, &mut clues)?;
        let verdict =
            verdict::hold_trial(terminal, &clues, &self.suspects, self.settings.threshold)?;

        let clues = clues
            .in_order()
            .map(|entry| CollectedClue {
                text: entry.text().to_string(),
                count: entry.count(),
                suspect: self.suspects.lookup(entry.text()).map(str::to_string),
            })
            .collect();

        Ok(CaseSummary {
            visited: exploration.visited,
            exit: exploration.exit,
            clues,
            verdict,
        })
    }
}

pub mod clue_index;
pub mod explorer;
pub mod game;
pub mod mansion;
pub mod room_tree;
pub mod scripted_terminal;
pub mod suspect_map;
pub mod terminal;
pub mod verdict;


pub use clue_index::{ClueEntry, ClueIndex};
pub use explorer::{ExitReason, Explorer, LeafPolicy};
pub use game::{CaseSummary, Game, QuestError, Settings};
pub use mansion::Mansion;
pub use room_tree::{Direction, Room, RoomTree};
pub use suspect_map::{SuspectMap, hash_djb2};
pub use terminal::{ConsoleTerminal, Terminal};
pub use verdict::Verdict;

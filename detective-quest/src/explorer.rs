use crate::clue_index::ClueIndex;
use crate::mansion::ClueTable;
use crate::room_tree::{Direction, Room, RoomTree};
use crate::suspect_map::SuspectMap;
use crate::terminal::Terminal;
use serde::{Deserialize, Serialize};
use std::io;
use std::str::FromStr;
use tracing::{debug, info};

/// What happens when the player walks into a room with no way onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafPolicy {
    /// Keep prompting; only an explicit exit ends the walk.
    #[default]
    Prompt,
    /// The walk ends by itself at a dead end.
    AutoExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Go(Direction),
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized command {0:?}")]
pub struct CommandError(pub String);

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // e/d/s: esquerda, direita, sair
        match s.trim().to_lowercase().as_str() {
            "e" | "l" | "left" | "go left" => Ok(Command::Go(Direction::Left)),
            "d" | "r" | "right" | "go right" => Ok(Command::Go(Direction::Right)),
            "s" | "q" | "exit" | "quit" => Ok(Command::Exit),
            _ => Err(CommandError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    PlayerExit,
    InputClosed,
    ReachedLeaf,
}

/// Rooms entered, in order, and how the walk ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exploration {
    pub visited: Vec<String>,
    pub exit: ExitReason,
}

enum Step<'r> {
    Move(&'r Room),
    Stop(ExitReason),
}

pub struct Explorer<'a> {
    rooms: &'a RoomTree,
    clue_rules: &'a ClueTable,
    suspects: &'a SuspectMap,
    leaf_policy: LeafPolicy,
}

impl<'a> Explorer<'a> {
    pub fn new(
        rooms: &'a RoomTree,
        clue_rules: &'a ClueTable,
        suspects: &'a SuspectMap,
        leaf_policy: LeafPolicy,
    ) -> Self {
        Self {
            rooms,
            clue_rules,
            suspects,
            leaf_policy,
        }
    }

    /// Walks the mansion from the entrance, dropping every clue found into `clues`.
    pub fn explore<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
        clues: &mut ClueIndex,
    ) -> io::Result<Exploration> {
        let mut visited = Vec::new();
        let mut current = self.rooms.root();

        loop {
            self.enter(current, terminal, clues)?;
            visited.push(current.name().to_string());

            if current.is_leaf() && self.leaf_policy == LeafPolicy::AutoExit {
                terminal.say("")?;
                terminal.say("This room has no other way out. The exploration ends here.")?;
                return Ok(self.finish(visited, ExitReason::ReachedLeaf));
            }

            match self.choose(current, terminal)? {
                Step::Move(next) => current = next,
                Step::Stop(exit) => return Ok(self.finish(visited, exit)),
            }
        }
    }

    fn finish(&self, visited: Vec<String>, exit: ExitReason) -> Exploration {
        info!(rooms = visited.len(), ?exit, "exploration finished");
        Exploration { visited, exit }
    }

    fn enter<T: Terminal + ?Sized>(
        &self,
        room: &Room,
        terminal: &mut T,
        clues: &mut ClueIndex,
    ) -> io::Result<()> {
        debug!(room = room.name(), "entered room");
        terminal.say("")?;
        terminal.say(&format!("You are in: {}", room.name()))?;

        let Some(clue) = self.clue_rules.clue_for(room.name()) else {
            return terminal.say("No clue here.");
        };

        let count = clues.insert(clue);
        info!(room = room.name(), clue, count, "clue collected");
        terminal.say(&format!("You found a clue: \"{}\"", clue))?;

        match self.suspects.lookup(clue) {
            Some(suspect) => terminal.say(&format!("This clue points to: {}", suspect)),
            None => terminal.say("No known suspect for this clue."),
        }
    }

    fn choose<'r, T: Terminal + ?Sized>(
        &self,
        room: &'r Room,
        terminal: &mut T,
    ) -> io::Result<Step<'r>> {
        loop {
            terminal.say("Choose a path:")?;
            if let Some(left) = room.left() {
                terminal.say(&format!("  (e) go left  -> {}", left.name()))?;
            }
            if let Some(right) = room.right() {
                terminal.say(&format!("  (d) go right -> {}", right.name()))?;
            }
            terminal.say("  (s) exit the exploration")?;

            let Some(answer) = terminal.ask("Option: ")? else {
                terminal.say("")?;
                terminal.say("No more input. Ending the exploration.")?;
                return Ok(Step::Stop(ExitReason::InputClosed));
            };

            match answer.parse::<Command>() {
                Ok(Command::Exit) => {
                    terminal.say("")?;
                    terminal.say("You decided to end the exploration.")?;
                    return Ok(Step::Stop(ExitReason::PlayerExit));
                }
                Ok(Command::Go(direction)) => match room.child(direction) {
                    Some(next) => return Ok(Step::Move(next)),
                    None => {
                        debug!(room = room.name(), %direction, "no door that way");
                        terminal.say(&format!(
                            "There is no way {} from {}. Try again.",
                            direction,
                            room.name()
                        ))?;
                    }
                },
                Err(err) => {
                    debug!(%err, "rejected command");
                    terminal.say("Invalid option! Try again.")?;
                }
            }
        }
    }
}

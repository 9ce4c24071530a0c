use crate::room_tree::{LayoutError, RoomSpec, RoomTree};
use crate::suspect_map::{SuspectMap, SuspectMapError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// 部屋名 → 手がかり
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueRule {
    pub room: String,
    pub clue: String,
}

/// 手がかり → 容疑者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspectFact {
    pub clue: String,
    pub suspect: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MansionError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("clue rule refers to unknown room {room:?}")]
    UnknownClueRoom { room: String },
    #[error("room {room:?} has more than one clue rule")]
    DuplicateClueRule { room: String },
}

/// Everything the case is made of: the floor plan, which clue lies in which
/// room, and whom each clue points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mansion {
    pub rooms: Vec<RoomSpec>,
    #[serde(default)]
    pub clue_rules: Vec<ClueRule>,
    #[serde(default)]
    pub suspects: Vec<SuspectFact>,
}

impl Mansion {
    /// The built-in Detective Quest case.
    pub fn detective_quest() -> Self {
        let rooms = vec![
            RoomSpec::new("Hall", Some("Cozinha"), Some("Jardim")),
            RoomSpec::new("Cozinha", Some("Estufa"), Some("Porao")),
            RoomSpec::new("Jardim", None, None),
            RoomSpec::new("Estufa", None, None),
            RoomSpec::new("Porao", Some("Adega"), None),
            RoomSpec::new("Adega", None, None),
        ];

        let clue_rules = [
            ("Hall", ""),
            ("Cozinha", "Pegadas de lama recentes"),
            ("Jardim", "Rosas pisoteadas"),
            ("Estufa", "Luvas enterradas"),
            ("Porao", "Chave enferrujada"),
            ("Adega", "Taca de vinho"),
        ]
        .into_iter()
        .map(|(room, clue)| ClueRule {
            room: room.to_string(),
            clue: clue.to_string(),
        })
        .collect();

        let suspects = [
            ("Pegadas de lama recentes", "Jardineiro"),
            ("Luvas enterradas", "Jardineiro"),
            ("Rosas pisoteadas", "Governanta"),
            ("Chave enferrujada", "Zelador"),
            ("Carta ameacadora", "Mordomo"),
        ]
        .into_iter()
        .map(|(clue, suspect)| SuspectFact {
            clue: clue.to_string(),
            suspect: suspect.to_string(),
        })
        .collect();

        Self {
            rooms,
            clue_rules,
            suspects,
        }
    }

    pub fn build_rooms(&self) -> Result<RoomTree, MansionError> {
        Ok(RoomTree::build(&self.rooms)?)
    }

    pub fn clue_table(&self) -> Result<ClueTable, MansionError> {
        let mut by_room = HashMap::with_capacity(self.clue_rules.len());
        for rule in &self.clue_rules {
            if !self.rooms.iter().any(|r| r.name == rule.room) {
                return Err(MansionError::UnknownClueRoom {
                    room: rule.room.clone(),
                });
            }
            if by_room
                .insert(rule.room.clone(), rule.clue.clone())
                .is_some()
            {
                return Err(MansionError::DuplicateClueRule {
                    room: rule.room.clone(),
                });
            }
        }
        Ok(ClueTable { by_room })
    }

    /// Loads the suspect facts into a table with `capacity` buckets.
    /// A later fact about the same clue replaces an earlier one.
    pub fn suspect_map(&self, capacity: usize) -> Result<SuspectMap, SuspectMapError> {
        let mut map = SuspectMap::with_capacity(capacity)?;
        for fact in &self.suspects {
            if let Some(previous) = map.insert(&fact.clue, &fact.suspect) {
                warn!(
                    clue = %fact.clue,
                    %previous,
                    suspect = %fact.suspect,
                    "clue was already attributed; keeping the later suspect"
                );
            }
        }
        Ok(map)
    }
}

/// Fixed room → clue rule table.
#[derive(Debug, Clone, Default)]
pub struct ClueTable {
    by_room: HashMap<String, String>,
}

impl ClueTable {
    /// Rooms without a rule, or with an empty clue, hold nothing.
    pub fn clue_for(&self, room: &str) -> Option<&str> {
        self.by_room
            .get(room)
            .map(String::as_str)
            .filter(|clue| !clue.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room_tree::Direction;

    #[test]
    fn built_in_case_is_consistent() {
        let mansion = Mansion::detective_quest();
        let rooms = mansion.build_rooms().unwrap();
        let clues = mansion.clue_table().unwrap();
        let suspects = mansion.suspect_map(101).unwrap();

        assert_eq!(rooms.len(), 6);
        assert_eq!(rooms.root().name(), "Hall");
        assert_eq!(
            rooms.path_to("Porao"),
            Some(vec![Direction::Left, Direction::Right])
        );
        assert!(rooms.find("Jardim").unwrap().is_leaf());

        assert_eq!(clues.clue_for("Hall"), None);
        assert_eq!(clues.clue_for("Cozinha"), Some("Pegadas de lama recentes"));
        assert_eq!(clues.clue_for("Sotao"), None);

        assert_eq!(suspects.lookup("Luvas enterradas"), Some("Jardineiro"));
        assert_eq!(suspects.lookup("Taca de vinho"), None);
        assert_eq!(
            suspects.suspects(),
            vec!["Governanta", "Jardineiro", "Mordomo", "Zelador"]
        );
    }

    #[test]
    fn layout_can_be_swapped_from_json() {
        let json = r#"{
            "rooms": [
                { "name": "Foyer", "left": "Study" },
                { "name": "Study" }
            ],
            "clue_rules": [ { "room": "Study", "clue": "Ink stain" } ],
            "suspects": [ { "clue": "Ink stain", "suspect": "Butler" } ]
        }"#;
        let mansion: Mansion = serde_json::from_str(json).unwrap();
        let rooms = mansion.build_rooms().unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms.root().left().unwrap().name(), "Study");
        assert!(rooms.root().right().is_none());
        assert_eq!(mansion.clue_table().unwrap().clue_for("Study"), Some("Ink stain"));
        assert_eq!(
            mansion.suspect_map(3).unwrap().lookup("Ink stain"),
            Some("Butler")
        );
    }

    #[test]
    fn built_in_case_survives_json() {
        let mansion = Mansion::detective_quest();
        let json = serde_json::to_string(&mansion).unwrap();
        let back: Mansion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mansion);
    }

    #[test]
    fn bad_clue_rules() {
        let mut unknown = Mansion::detective_quest();
        unknown.clue_rules.push(ClueRule {
            room: "Sotao".into(),
            clue: "Poeira".into(),
        });
        assert_eq!(
            unknown.clue_table().unwrap_err(),
            MansionError::UnknownClueRoom {
                room: "Sotao".into()
            }
        );

        let mut twice = Mansion::detective_quest();
        twice.clue_rules.push(ClueRule {
            room: "Hall".into(),
            clue: "Poeira".into(),
        });
        assert_eq!(
            twice.clue_table().unwrap_err(),
            MansionError::DuplicateClueRule {
                room: "Hall".into()
            }
        );
    }

    #[test]
    fn later_fact_wins() {
        let mut mansion = Mansion::detective_quest();
        mansion.suspects.push(SuspectFact {
            clue: "Chave enferrujada".into(),
            suspect: "Mordomo".into(),
        });
        let map = mansion.suspect_map(101).unwrap();
        assert_eq!(map.lookup("Chave enferrujada"), Some("Mordomo"));
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn layout_errors_pass_through() {
        let mut mansion = Mansion::detective_quest();
        mansion.rooms.clear();
        assert_eq!(
            mansion.build_rooms().unwrap_err(),
            MansionError::Layout(LayoutError::Empty)
        );
    }
}

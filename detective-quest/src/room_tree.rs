use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// 部屋から出られる二つの扉
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// One room of the mansion. Each room owns its two optional children.
#[derive(Debug)]
pub struct Room {
    name: String,
    left: Option<Box<Room>>,
    right: Option<Box<Room>>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            left: None,
            right: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn left(&self) -> Option<&Room> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Room> {
        self.right.as_deref()
    }

    pub fn child(&self, direction: Direction) -> Option<&Room> {
        match direction {
            Direction::Left => self.left(),
            Direction::Right => self.right(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Attaches `room` behind the left door, replacing whatever was there.
    pub fn set_left(&mut self, room: Room) -> &mut Room {
        self.left.insert(Box::new(room))
    }

    pub fn set_right(&mut self, room: Room) -> &mut Room {
        self.right.insert(Box::new(room))
    }
}

impl Drop for Room {
    // Children are detached before their parent is freed, so a long chain of
    // rooms never recurses through the destructor.
    fn drop(&mut self) {
        let mut pending: Vec<Box<Room>> = Vec::new();
        pending.extend(self.right.take());
        pending.extend(self.left.take());
        while let Some(mut room) = pending.pop() {
            pending.extend(room.right.take());
            pending.extend(room.left.take());
        }
    }
}

/// 間取り定義の 1 行（先頭の行が玄関）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
}

impl RoomSpec {
    pub fn new(name: &str, left: Option<&str>, right: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            left: left.map(str::to_string),
            right: right.map(str::to_string),
        }
    }

    fn children(&self) -> impl Iterator<Item = &str> {
        self.left.iter().chain(self.right.iter()).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("mansion layout has no rooms")]
    Empty,
    #[error("room {name:?} is declared more than once")]
    DuplicateRoom { name: String },
    #[error("room {parent:?} leads to unknown room {child:?}")]
    UnknownRoom { parent: String, child: String },
    #[error("room {name:?} can be entered from more than one door")]
    SharedRoom { name: String },
    #[error("entrance {name:?} cannot sit behind another room's door")]
    EntranceIsChild { name: String },
    #[error("room {name:?} cannot be reached from the entrance")]
    Unreachable { name: String },
}

/// The whole mansion, rooted at the entrance.
#[derive(Debug)]
pub struct RoomTree {
    root: Room,
    len: usize,
}

impl RoomTree {
    pub fn from_root(root: Room) -> Self {
        let mut tree = Self { root, len: 0 };
        tree.len = tree.iter().count();
        tree
    }

    /// Wires the rooms of `layout` together. The first entry is the entrance.
    pub fn build(layout: &[RoomSpec]) -> Result<Self, LayoutError> {
        let entrance = layout.first().ok_or(LayoutError::Empty)?;

        let mut by_name: HashMap<&str, &RoomSpec> = HashMap::new();
        for spec in layout {
            if by_name.insert(spec.name.as_str(), spec).is_some() {
                return Err(LayoutError::DuplicateRoom {
                    name: spec.name.clone(),
                });
            }
        }

        let mut entered: HashSet<&str> = HashSet::new();
        for spec in layout {
            for child in spec.children() {
                if !by_name.contains_key(child) {
                    return Err(LayoutError::UnknownRoom {
                        parent: spec.name.clone(),
                        child: child.to_string(),
                    });
                }
                if child == entrance.name {
                    return Err(LayoutError::EntranceIsChild {
                        name: child.to_string(),
                    });
                }
                if !entered.insert(child) {
                    return Err(LayoutError::SharedRoom {
                        name: child.to_string(),
                    });
                }
            }
        }

        // 親が高々 1 つなので、玄関から辿れる部分は必ず木になる
        let root = assemble(entrance, &by_name)?;
        let tree = Self::from_root(root);

        if tree.len != layout.len() {
            let reached: HashSet<&str> = tree.iter().map(Room::name).collect();
            if let Some(spec) = layout.iter().find(|s| !reached.contains(s.name.as_str())) {
                return Err(LayoutError::Unreachable {
                    name: spec.name.clone(),
                });
            }
        }

        Ok(tree)
    }

    pub fn root(&self) -> &Room {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.len
    }

    // There is always an entrance.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn find(&self, name: &str) -> Option<&Room> {
        self.iter().find(|room| room.name() == name)
    }

    /// The unique sequence of doors leading from the entrance to `name`.
    pub fn path_to(&self, name: &str) -> Option<Vec<Direction>> {
        let mut stack: Vec<(&Room, Vec<Direction>)> = vec![(&self.root, Vec::new())];
        while let Some((room, path)) = stack.pop() {
            if room.name() == name {
                return Some(path);
            }
            for direction in [Direction::Right, Direction::Left] {
                if let Some(child) = room.child(direction) {
                    let mut next = path.clone();
                    next.push(direction);
                    stack.push((child, next));
                }
            }
        }
        None
    }

    /// Pre-order walk: a room comes before everything behind its doors.
    pub fn iter(&self) -> Rooms<'_> {
        Rooms {
            stack: vec![&self.root],
        }
    }

    /// Indented map of the mansion, one line per room.
    pub fn outline(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.len);
        let mut stack: Vec<(&Room, usize, Option<Direction>)> = vec![(&self.root, 0, None)];
        while let Some((room, depth, via)) = stack.pop() {
            let marker = match via {
                None => String::new(),
                Some(direction) => format!("({}) ", direction),
            };
            lines.push(format!("{}{}{}", "  ".repeat(depth), marker, room.name()));
            if let Some(right) = room.right() {
                stack.push((right, depth + 1, Some(Direction::Right)));
            }
            if let Some(left) = room.left() {
                stack.push((left, depth + 1, Some(Direction::Left)));
            }
        }
        lines
    }
}

pub struct Rooms<'a> {
    stack: Vec<&'a Room>,
}

impl<'a> Iterator for Rooms<'a> {
    type Item = &'a Room;

    fn next(&mut self) -> Option<Self::Item> {
        let room = self.stack.pop()?;
        self.stack.extend(room.right());
        self.stack.extend(room.left());
        Some(room)
    }
}

fn assemble(spec: &RoomSpec, by_name: &HashMap<&str, &RoomSpec>) -> Result<Room, LayoutError> {
    let mut room = Room::new(spec.name.as_str());
    if let Some(left) = &spec.left {
        room.set_left(assemble(lookup(spec, left, by_name)?, by_name)?);
    }
    if let Some(right) = &spec.right {
        room.set_right(assemble(lookup(spec, right, by_name)?, by_name)?);
    }
    Ok(room)
}

fn lookup<'a>(
    parent: &RoomSpec,
    child: &str,
    by_name: &HashMap<&str, &'a RoomSpec>,
) -> Result<&'a RoomSpec, LayoutError> {
    by_name
        .get(child)
        .copied()
        .ok_or_else(|| LayoutError::UnknownRoom {
            parent: parent.name.clone(),
            child: child.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_layout() -> Vec<RoomSpec> {
        vec![
            RoomSpec::new("Hall", Some("Kitchen"), Some("Garden")),
            RoomSpec::new("Kitchen", None, Some("Cellar")),
            RoomSpec::new("Garden", None, None),
            RoomSpec::new("Cellar", None, None),
        ]
    }

    #[test]
    fn manual_wiring() {
        let mut hall = Room::new("Hall");
        hall.set_left(Room::new("Kitchen"))
            .set_right(Room::new("Cellar"));
        hall.set_right(Room::new("Garden"));

        let tree = RoomTree::from_root(hall);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().name(), "Hall");
        assert_eq!(tree.root().left().map(Room::name), Some("Kitchen"));
        assert!(tree.find("Garden").unwrap().is_leaf());
        assert!(!tree.root().is_leaf());
    }

    #[test]
    fn build_from_layout() {
        let tree = RoomTree::build(&small_layout()).unwrap();
        assert_eq!(tree.len(), 4);

        let names: Vec<&str> = tree.iter().map(Room::name).collect();
        assert_eq!(names, vec!["Hall", "Kitchen", "Cellar", "Garden"]);

        let kitchen = tree.root().child(Direction::Left).unwrap();
        assert!(kitchen.child(Direction::Left).is_none());
        assert_eq!(kitchen.child(Direction::Right).unwrap().name(), "Cellar");
    }

    #[test]
    fn paths_are_unique() {
        let tree = RoomTree::build(&small_layout()).unwrap();
        assert_eq!(tree.path_to("Hall"), Some(vec![]));
        assert_eq!(
            tree.path_to("Cellar"),
            Some(vec![Direction::Left, Direction::Right])
        );
        assert_eq!(tree.path_to("Garden"), Some(vec![Direction::Right]));
        assert_eq!(tree.path_to("Attic"), None);
    }

    #[test]
    fn outline_indents_by_depth() {
        let tree = RoomTree::build(&small_layout()).unwrap();
        assert_eq!(
            tree.outline(),
            vec![
                "Hall".to_string(),
                "  (left) Kitchen".to_string(),
                "    (right) Cellar".to_string(),
                "  (right) Garden".to_string(),
            ]
        );
    }

    #[test]
    fn rejects_malformed_layouts() {
        assert_eq!(RoomTree::build(&[]).unwrap_err(), LayoutError::Empty);

        let mut dup = small_layout();
        dup.push(RoomSpec::new("Garden", None, None));
        assert_eq!(
            RoomTree::build(&dup).unwrap_err(),
            LayoutError::DuplicateRoom {
                name: "Garden".into()
            }
        );

        let mut unknown = small_layout();
        unknown[2].left = Some("Attic".into());
        assert_eq!(
            RoomTree::build(&unknown).unwrap_err(),
            LayoutError::UnknownRoom {
                parent: "Garden".into(),
                child: "Attic".into()
            }
        );

        let mut shared = small_layout();
        shared[2].left = Some("Cellar".into());
        assert_eq!(
            RoomTree::build(&shared).unwrap_err(),
            LayoutError::SharedRoom {
                name: "Cellar".into()
            }
        );

        let mut back_to_hall = small_layout();
        back_to_hall[3].left = Some("Hall".into());
        assert_eq!(
            RoomTree::build(&back_to_hall).unwrap_err(),
            LayoutError::EntranceIsChild {
                name: "Hall".into()
            }
        );

        // 玄関から切り離された閉路
        let mut island = small_layout();
        island.push(RoomSpec::new("Attic", Some("Loft"), None));
        island.push(RoomSpec::new("Loft", Some("Attic"), None));
        assert_eq!(
            RoomTree::build(&island).unwrap_err(),
            LayoutError::Unreachable {
                name: "Attic".into()
            }
        );
    }

    #[test]
    fn deep_chain_drops_without_recursion() {
        let layout: Vec<RoomSpec> = (0..200)
            .map(|i| {
                let next = format!("room-{}", i + 1);
                RoomSpec {
                    name: format!("room-{}", i),
                    left: (i < 199).then_some(next),
                    right: None,
                }
            })
            .collect();
        let tree = RoomTree::build(&layout).unwrap();
        assert_eq!(tree.len(), 200);
        assert_eq!(tree.path_to("room-199").map(|p| p.len()), Some(199));
        drop(tree);
    }
}

use serde::Serialize;
use std::cmp::Ordering;

/// 集めた手がかりと、その発見回数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClueEntry {
    text: String,
    count: u32,
}

impl ClueEntry {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[derive(Debug)]
struct ClueNode {
    entry: ClueEntry,
    left: Option<Box<ClueNode>>,
    right: Option<Box<ClueNode>>,
}

impl ClueNode {
    fn leaf(text: &str) -> Box<Self> {
        Box::new(Self {
            entry: ClueEntry {
                text: text.to_string(),
                count: 1,
            },
            left: None,
            right: None,
        })
    }
}

/// Inserts `text` below `node` and hands back the subtree root together with
/// the entry's count after the insertion. Equal keys are merged in place.
fn insert_node(node: Option<Box<ClueNode>>, text: &str) -> (Box<ClueNode>, u32) {
    let Some(mut node) = node else {
        return (ClueNode::leaf(text), 1);
    };
    let count = match text.cmp(node.entry.text.as_str()) {
        Ordering::Less => {
            let (left, count) = insert_node(node.left.take(), text);
            node.left = Some(left);
            count
        }
        Ordering::Greater => {
            let (right, count) = insert_node(node.right.take(), text);
            node.right = Some(right);
            count
        }
        Ordering::Equal => {
            node.entry.count += 1;
            node.entry.count
        }
    };
    (node, count)
}

/// Binary search tree of collected clues, ordered by text.
#[derive(Debug, Default)]
pub struct ClueIndex {
    root: Option<Box<ClueNode>>,
    len: usize,
}

impl ClueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sighting of `text` and returns how many times it has been seen.
    pub fn insert(&mut self, text: &str) -> u32 {
        let (root, count) = insert_node(self.root.take(), text);
        self.root = Some(root);
        if count == 1 {
            self.len += 1;
        }
        count
    }

    pub fn get(&self, text: &str) -> Option<u32> {
        let mut node = self.root.as_deref();
        while let Some(current) = node {
            node = match text.cmp(current.entry.text.as_str()) {
                Ordering::Less => current.left.as_deref(),
                Ordering::Greater => current.right.as_deref(),
                Ordering::Equal => return Some(current.entry.count),
            };
        }
        None
    }

    /// Number of distinct clues.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn total_occurrences(&self) -> u32 {
        self.in_order().map(ClueEntry::count).sum()
    }

    /// Walks the clues in ascending order. Every call starts a fresh walk.
    pub fn in_order(&self) -> InOrder<'_> {
        InOrder::new(self.root.as_deref())
    }
}

impl<'a> IntoIterator for &'a ClueIndex {
    type Item = &'a ClueEntry;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

pub struct InOrder<'a> {
    stack: Vec<&'a ClueNode>,
}

impl<'a> InOrder<'a> {
    fn new(root: Option<&'a ClueNode>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a ClueNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a ClueEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.entry)
    }
}

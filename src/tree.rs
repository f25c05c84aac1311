//! Groups flat per-file coverage records into a directory tree.
//!
//! Records are inserted one at a time by splitting their path on `/`;
//! directories are created on demand and keep their children in first-seen
//! order. After insertion a single bottom-up pass rolls raw counts into each
//! directory's [`Aggregate`]. The builder either returns a complete,
//! invariant-satisfying tree or an error — never a partial tree.

use std::collections::{HashMap, HashSet};

use crate::error::{CovmapError, Result};
use crate::model::{Aggregate, CoverageRecord};

/// A node in the coverage tree: an interior directory or a leaf file.
#[derive(Debug)]
pub enum TreeNode {
    Directory(DirectoryNode),
    File(FileNode),
}

impl TreeNode {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Directory(dir) => &dir.name,
            TreeNode::File(file) => &file.name,
        }
    }

    #[must_use]
    pub fn aggregate(&self) -> Aggregate {
        match self {
            TreeNode::Directory(dir) => dir.aggregate,
            TreeNode::File(file) => file.aggregate(),
        }
    }
}

/// An interior node. Children are unique by name and iterate in the order
/// they were first created during the build pass.
#[derive(Debug, Default)]
pub struct DirectoryNode {
    pub name: String,
    pub aggregate: Aggregate,
    children: Vec<TreeNode>,
    index: HashMap<String, usize>,
}

impl DirectoryNode {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.index.get(name).map(|&i| &self.children[i])
    }

    fn push_child(&mut self, node: TreeNode) -> usize {
        let idx = self.children.len();
        self.index.insert(node.name().to_string(), idx);
        self.children.push(node);
        idx
    }

    fn insert(&mut self, segments: &[&str], record: CoverageRecord) -> Result<()> {
        let (head, rest) = match segments.split_first() {
            Some(parts) => parts,
            // Unreachable: build() rejects paths with no segments.
            None => return Ok(()),
        };

        if rest.is_empty() {
            // Duplicate file paths were rejected up front, so an existing
            // child here must be a directory with the same name.
            if self.index.contains_key(*head) {
                return Err(CovmapError::ConflictingPath(record.path));
            }
            self.push_child(TreeNode::File(FileNode {
                name: (*head).to_string(),
                record,
            }));
            return Ok(());
        }

        let idx = match self.index.get(*head).copied() {
            Some(i) => i,
            None => self.push_child(TreeNode::Directory(DirectoryNode::new(*head))),
        };
        match &mut self.children[idx] {
            TreeNode::Directory(dir) => dir.insert(rest, record),
            TreeNode::File(_) => Err(CovmapError::ConflictingPath(record.path)),
        }
    }

    fn rollup(&mut self) {
        let mut aggregate = Aggregate::default();
        for child in &mut self.children {
            match child {
                TreeNode::Directory(dir) => {
                    dir.rollup();
                    aggregate.add(&dir.aggregate);
                }
                TreeNode::File(file) => aggregate.add(&file.aggregate()),
            }
        }
        self.aggregate = aggregate;
    }
}

/// A leaf node holding the record for one source file.
#[derive(Debug)]
pub struct FileNode {
    /// Final path segment.
    pub name: String,
    pub record: CoverageRecord,
}

impl FileNode {
    #[must_use]
    pub fn aggregate(&self) -> Aggregate {
        Aggregate::from(&self.record)
    }
}

/// Build the coverage tree from a flat record list.
///
/// The root directory is named `"."` and represents the (empty) common
/// prefix of all record paths. An empty record list yields an empty root
/// with an all-zero aggregate.
pub fn build(records: Vec<CoverageRecord>) -> Result<DirectoryNode> {
    // Validate everything before constructing any nodes.
    {
        let mut seen: HashSet<&str> = HashSet::new();
        for record in &records {
            record.validate()?;
            if record.path.is_empty() || record.path.split('/').any(str::is_empty) {
                return Err(CovmapError::Parse(format!(
                    "malformed path in coverage record: '{}'",
                    record.path
                )));
            }
            if !seen.insert(&record.path) {
                return Err(CovmapError::DuplicatePath(record.path.clone()));
            }
        }
    }

    let mut root = DirectoryNode::new(".");
    for record in records {
        // Segments are copied out so the record itself can move into the leaf.
        let segments: Vec<String> = record.path.split('/').map(str::to_string).collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        root.insert(&segments, record)?;
    }
    root.rollup();
    Ok(root)
}

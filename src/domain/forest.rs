//! Copy-on-write forest of nodes.
//!
//! A [`Forest`] is an immutable snapshot. Every mutating operation returns a
//! new snapshot and leaves its input untouched, so a caller holding the old
//! value can diff it against the new one.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{instrument, trace};

use crate::domain::column::{ColumnEntry, ColumnView};
use crate::domain::error::DomainError;
use crate::domain::node::{Node, CHILDREN_FIELD};
use crate::domain::value::FieldValue;

/// Ordered sequence of root nodes behind a shared pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    roots: Arc<Vec<Node>>,
}

impl From<Vec<Node>> for Forest {
    fn from(roots: Vec<Node>) -> Self {
        Self::new(roots)
    }
}

impl Forest {
    pub fn new(roots: Vec<Node>) -> Self {
        Self {
            roots: Arc::new(roots),
        }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Whether both values are the very same snapshot.
    pub fn ptr_eq(&self, other: &Forest) -> bool {
        Arc::ptr_eq(&self.roots, &other.roots)
    }

    /// Total number of nodes across all trees.
    pub fn len(&self) -> usize {
        self.roots.iter().map(Node::subtree_size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.roots.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Pre-order traversal: parents before children, children left to right.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.iter_with_depth().map(|(_, node)| node)
    }

    /// Pre-order traversal yielding the nesting level (roots are 0).
    pub fn iter_with_depth(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(&self.roots)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn find_node(&self, key: &str, id: &FieldValue) -> Option<&Node> {
        find_in(&self.roots, key, id)
    }

    pub fn contains(&self, key: &str, id: &FieldValue) -> bool {
        self.find_node(key, id).is_some()
    }

    /// Chain of nodes from a root down to the match, both ends included.
    pub fn path_to(&self, key: &str, id: &FieldValue) -> Option<Vec<&Node>> {
        let mut path = Vec::new();
        if path_in(&self.roots, key, id, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    /// Append `child` at the end of the children of `parent_id`.
    ///
    /// A parent without a children sequence is not upgraded to have one.
    /// Duplicate ids are not checked here.
    #[instrument(level = "debug", skip(self, child))]
    pub fn append_child(
        &self,
        key: &str,
        parent_id: &FieldValue,
        child: Node,
    ) -> Result<Forest, DomainError> {
        if child.fields.contains_key(CHILDREN_FIELD) {
            return Err(DomainError::ReservedField {
                name: CHILDREN_FIELD.to_string(),
            });
        }
        let mut roots = (*self.roots).clone();
        let parent =
            find_in_mut(&mut roots, key, parent_id).ok_or_else(|| DomainError::NodeNotFound {
                key: key.to_string(),
                id: parent_id.clone(),
            })?;
        let children = parent
            .children
            .as_mut()
            .ok_or_else(|| DomainError::ChildrenAbsent {
                id: parent_id.clone(),
            })?;
        children.push(child);
        trace!("appended child, parent now has {} children", children.len());
        Ok(Forest::new(roots))
    }

    /// Remove the first pre-order match together with its subtree.
    ///
    /// Without a match the same snapshot comes back with `false`.
    pub fn remove_node(&self, key: &str, id: &FieldValue) -> (Forest, bool) {
        let (forest, removed) = self.take_node(key, id);
        (forest, removed.is_some())
    }

    /// Like [`Forest::remove_node`], handing back the removed subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn take_node(&self, key: &str, id: &FieldValue) -> (Forest, Option<Node>) {
        if !self.contains(key, id) {
            return (self.clone(), None);
        }
        let mut roots = (*self.roots).clone();
        let removed = take_in(&mut roots, key, id);
        (Forest::new(roots), removed)
    }

    /// Pair `index_field` with `column` for every node carrying both, in pre-order.
    ///
    /// A field set to `null` is present and yields a `null` entry.
    #[instrument(level = "debug", skip(self))]
    pub fn flatten_column(&self, column: &str, index_field: &str) -> ColumnView {
        let mut view = ColumnView::new(column, index_field);
        for node in self.iter() {
            let pair = (node.fields.get(index_field), node.fields.get(column));
            if let (Some(index), Some(value)) = pair {
                view.entries.push(ColumnEntry {
                    index: index.clone(),
                    value: value.clone(),
                });
            }
        }
        view
    }

    /// Keys of all leaves, in pre-order. Leaves without a key are skipped.
    pub fn leaf_keys(&self, key: &str) -> Vec<FieldValue> {
        self.iter()
            .filter(|node| node.is_leaf())
            .filter_map(|node| node.key(key).cloned())
            .collect()
    }

    /// Every key value occurring more than once, reported once, in pre-order.
    pub fn duplicate_keys(&self, key: &str) -> Vec<FieldValue> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for id in self.iter().filter_map(|node| node.key(key)) {
            // Debug keeps the variant, so 1 and 1.0 stay distinct
            let fingerprint = format!("{:?}", id);
            if !seen.insert(fingerprint.clone()) && reported.insert(fingerprint) {
                duplicates.push(id.clone());
            }
        }
        duplicates
    }

    /// Fails on the first duplicated key.
    pub fn validate(&self, key: &str) -> Result<(), DomainError> {
        match self.duplicate_keys(key).into_iter().next() {
            Some(id) => Err(DomainError::DuplicateKey {
                key: key.to_string(),
                id,
            }),
            None => Ok(()),
        }
    }
}

fn find_in<'a>(nodes: &'a [Node], key: &str, id: &FieldValue) -> Option<&'a Node> {
    for node in nodes {
        if node.has_key(key, id) {
            return Some(node);
        }
        if let Some(found) = find_in(node.children(), key, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [Node], key: &str, id: &FieldValue) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.has_key(key, id) {
            return Some(node);
        }
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = find_in_mut(children, key, id) {
                return Some(found);
            }
        }
    }
    None
}

fn take_in(nodes: &mut Vec<Node>, key: &str, id: &FieldValue) -> Option<Node> {
    for i in 0..nodes.len() {
        if nodes[i].has_key(key, id) {
            return Some(nodes.remove(i));
        }
        if let Some(children) = nodes[i].children.as_mut() {
            if let Some(taken) = take_in(children, key, id) {
                return Some(taken);
            }
        }
    }
    None
}

fn path_in<'a>(nodes: &'a [Node], key: &str, id: &FieldValue, path: &mut Vec<&'a Node>) -> bool {
    for node in nodes {
        path.push(node);
        if node.has_key(key, id) || path_in(node.children(), key, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Explicit-stack pre-order iterator over a forest.
pub struct PreOrderIter<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> PreOrderIter<'a> {
    fn new(roots: &'a [Node]) -> Self {
        // Push in reverse so the leftmost root pops first
        let stack = roots.iter().rev().map(|node| (0, node)).collect();
        Self { stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        for child in node.children().iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

impl Serialize for Forest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.roots.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Forest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Node>::deserialize(deserializer).map(Forest::new)
    }
}

//! Tree node: named scalar fields plus an optional ordered children sequence

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::value::FieldValue;

/// Name of the field holding a node's children.
pub const CHILDREN_FIELD: &str = "children";

/// Named fields of a node, in document order.
pub type Fields = IndexMap<String, FieldValue>;

/// A record of named fields with optional children.
///
/// `children == None` (absent or `null` in JSON) and `Some(vec![])` are both
/// leaves for traversal. They only differ for appending: a child can be
/// appended to an existing (possibly empty) sequence, never to an absent one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaf whose children sequence exists but is empty.
    pub fn with_empty_children(mut self) -> Self {
        self.children = Some(Vec::new());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Field value, `None` when missing or `null`.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn key(&self, key_field: &str) -> Option<&FieldValue> {
        self.field(key_field)
    }

    pub fn has_key(&self, key_field: &str, id: &FieldValue) -> bool {
        self.key(key_field) == Some(id)
    }

    /// Children for traversal; absent and empty look the same here.
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Copy of this node without its children (the `selectedItem` shape).
    pub fn without_children(&self) -> Node {
        Node {
            fields: self.fields.clone(),
            children: None,
        }
    }

    /// Number of nodes in the subtree rooted here, including this node.
    pub fn subtree_size(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_size).sum::<usize>()
    }

    /// Whether this node or any descendant carries `id`.
    pub fn contains_key(&self, key_field: &str, id: &FieldValue) -> bool {
        self.has_key(key_field, id)
            || self
                .children()
                .iter()
                .any(|child| child.contains_key(key_field, id))
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }
}

//! Text rendering of a forest via termtree

use termtree::Tree;
use tracing::instrument;

use crate::domain::forest::Forest;
use crate::domain::node::Node;

/// Conversion into a printable `termtree::Tree`.
pub trait TreeConvert {
    fn to_tree_string(&self, labels: &NodeLabel<'_>) -> Tree<String>;
}

/// Which fields make up a node's line: `<label field> (<key>)`.
#[derive(Debug, Clone, Copy)]
pub struct NodeLabel<'a> {
    pub key: &'a str,
    pub label_field: Option<&'a str>,
}

impl NodeLabel<'_> {
    pub fn render(&self, node: &Node) -> String {
        let key = node
            .key(self.key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".to_string());
        match self.label_field.and_then(|field| node.field(field)) {
            Some(label) if self.label_field != Some(self.key) => format!("{} ({})", label, key),
            _ => key,
        }
    }
}

impl TreeConvert for Node {
    fn to_tree_string(&self, labels: &NodeLabel<'_>) -> Tree<String> {
        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|c| c.to_tree_string(labels))
            .collect();
        Tree::new(labels.render(self)).with_leaves(leaves)
    }
}

impl TreeConvert for Forest {
    /// Roots hang under a synthetic `.` node so several trees print as one.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, labels: &NodeLabel<'_>) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("Empty forest".to_string());
        }
        let leaves: Vec<_> = self
            .roots()
            .iter()
            .map(|root| root.to_tree_string(labels))
            .collect();
        Tree::new(".".to_string()).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_forest_when_rendering_then_shows_labels_and_keys() {
        let forest = Forest::new(vec![Node::new()
            .with_field("id", 1)
            .with_field("name", "Lags")
            .with_child(Node::new().with_field("id", 2).with_field("name", "Lag1"))]);
        let labels = NodeLabel {
            key: "id",
            label_field: Some("name"),
        };

        let rendered = forest.to_tree_string(&labels).to_string();

        assert!(rendered.contains("Lags (1)"));
        assert!(rendered.contains("Lag1 (2)"));
    }

    #[test]
    fn given_label_field_equal_to_key_when_rendering_then_prints_key_once() {
        let node = Node::new().with_field("name", "Forecast");
        let labels = NodeLabel {
            key: "name",
            label_field: Some("name"),
        };
        assert_eq!(labels.render(&node), "Forecast");
    }
}

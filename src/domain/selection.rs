//! Row and column selection state

use serde::{Deserialize, Serialize};

use crate::domain::column::ColumnView;
use crate::domain::node::Node;

/// What a row click hands back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionBehavior {
    /// The node without its children (`selectedItem`).
    #[default]
    SelectItems,
    /// A full copy of the node (`selectedRow`).
    SelectRows,
}

impl SelectionBehavior {
    /// Property name under which the host sees the selected node.
    pub fn output_name(&self) -> &'static str {
        match self {
            SelectionBehavior::SelectItems => "selectedItem",
            SelectionBehavior::SelectRows => "selectedRow",
        }
    }

    /// Shape of the node as stored in the selection.
    pub fn capture(&self, node: &Node) -> Node {
        match self {
            SelectionBehavior::SelectItems => node.without_children(),
            SelectionBehavior::SelectRows => node.clone(),
        }
    }
}

/// At most one selected row and at most one selected column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub row: Option<Node>,
    pub column: Option<ColumnView>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.row.is_none() && self.column.is_none()
    }

    pub fn clear_row(&mut self) {
        self.row = None;
    }

    pub fn clear_column(&mut self) {
        self.column = None;
    }
}

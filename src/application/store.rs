//! HierarchyTreeStore: forest plus selection, driven by host events
//!
//! Each operation runs to completion synchronously. Mutations swap in a new
//! [`Forest`] snapshot; previously handed-out snapshots never change.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info, instrument};

use crate::application::props::HierarchyProps;
use crate::domain::{
    ColorScheme, ColumnDescriptor, ColumnView, DomainError, FieldValue, Fields, Forest, IdStrategy,
    Node,
    Selection, SelectionBehavior,
};

/// Knobs that are not part of the widget properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub id_strategy: IdStrategy,
    pub id_separator: String,
    /// Reject duplicate ids on load and on append.
    pub strict_ids: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            id_separator: "-".to_string(),
            strict_ids: false,
        }
    }
}

/// What the host gets to publish after an event.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub data: Forest,
    pub behavior: SelectionBehavior,
    pub selected: Option<Node>,
    pub selected_column: Option<ColumnView>,
}

impl Serialize for StoreSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("data", &self.data)?;
        map.serialize_entry(self.behavior.output_name(), &self.selected)?;
        map.serialize_entry("selectedColumn", &self.selected_column)?;
        map.end()
    }
}

#[derive(Debug, Clone)]
pub struct HierarchyTreeStore {
    props: HierarchyProps,
    selection: Selection,
    options: StoreOptions,
}

impl HierarchyTreeStore {
    /// Create a store; in strict mode duplicate ids in `props.data` are rejected.
    pub fn new(props: HierarchyProps, options: StoreOptions) -> Result<Self, DomainError> {
        if options.strict_ids {
            props.data.validate(props.identity_field())?;
        }
        debug!(
            "store created: {} nodes, key={}",
            props.data.len(),
            props.identity_field()
        );
        Ok(Self {
            props,
            selection: Selection::default(),
            options,
        })
    }

    pub fn props(&self) -> &HierarchyProps {
        &self.props
    }

    pub fn into_props(self) -> HierarchyProps {
        self.props
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn key(&self) -> &str {
        self.props.identity_field()
    }

    pub fn index_column(&self) -> Option<&str> {
        self.props.index_column_name.as_deref()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.props.columns
    }

    pub fn colors(&self) -> ColorScheme {
        self.props.effective_colors()
    }

    pub fn behavior(&self) -> SelectionBehavior {
        self.props.variant.behavior()
    }

    pub fn data(&self) -> Forest {
        self.props.data.clone()
    }

    /// Replace the whole forest (no merge).
    ///
    /// A selected row that no longer exists is cleared, otherwise refreshed
    /// from the new data. A selected column is re-derived.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn set_data(&mut self, forest: Forest) -> Result<(), DomainError> {
        if self.options.strict_ids {
            forest.validate(self.key())?;
        }
        self.props.data = forest;
        self.refresh_row();
        self.refresh_column();
        Ok(())
    }

    pub fn find(&self, id: &FieldValue) -> Option<&Node> {
        self.props.data.find_node(self.key(), id)
    }

    /// Select the node with `id`; an unknown id leaves the selection as is.
    #[instrument(level = "debug", skip(self))]
    pub fn select(&mut self, id: &FieldValue) -> Option<&Node> {
        let captured = self.find(id).map(|node| self.behavior().capture(node))?;
        self.selection.row = Some(captured);
        self.selection.row.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_row();
    }

    pub fn selected(&self) -> Option<&Node> {
        self.selection.row.as_ref()
    }

    /// Select a column by name, flattening it against the index column.
    ///
    /// Selecting the index column itself is ignored and yields `Ok(None)`.
    #[instrument(level = "debug", skip(self))]
    pub fn select_column(&mut self, name: &str) -> Result<Option<&ColumnView>, DomainError> {
        let index = self.index_column().ok_or(DomainError::NoIndexColumn)?;
        if name == index {
            return Ok(None);
        }
        let view = self.props.data.flatten_column(name, index);
        debug!("column {} selected with {} entries", name, view.len());
        self.selection.column = Some(view);
        Ok(self.selection.column.as_ref())
    }

    pub fn clear_column(&mut self) {
        self.selection.clear_column();
    }

    pub fn selected_column(&self) -> Option<&ColumnView> {
        self.selection.column.as_ref()
    }

    /// Append `child` under `parent_id`.
    #[instrument(level = "debug", skip(self, child))]
    pub fn append_child(&mut self, parent_id: &FieldValue, child: Node) -> Result<(), DomainError> {
        if self.options.strict_ids {
            let id = child.key(self.key()).ok_or_else(|| DomainError::MissingKey {
                key: self.key().to_string(),
            })?;
            if self.props.data.contains(self.key(), id) {
                return Err(DomainError::DuplicateKey {
                    key: self.key().to_string(),
                    id: id.clone(),
                });
            }
        }
        let forest = self.props.data.append_child(self.key(), parent_id, child)?;
        self.props.data = forest;
        self.refresh_column();
        Ok(())
    }

    /// Append a child built from `fields`, with an id from the configured strategy.
    pub fn add_generated_child(
        &mut self,
        parent_id: &FieldValue,
        fields: Fields,
    ) -> Result<FieldValue, DomainError> {
        let id = self.options.id_strategy.next_child_id(
            &self.props.data,
            self.key(),
            parent_id,
            &self.options.id_separator,
        )?;
        let mut child = Node {
            fields,
            children: None,
        };
        child.set_field(self.key().to_string(), id.clone());
        self.append_child(parent_id, child)?;
        info!("added child {} under {}", id, parent_id);
        Ok(id)
    }

    /// Remove the node with `id` and its subtree.
    ///
    /// Clears the selected row when it is the removed node or one of its descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: &FieldValue) -> bool {
        let (forest, removed) = self.props.data.take_node(self.key(), id);
        let Some(removed) = removed else {
            debug!("nothing to remove for {}", id);
            return false;
        };
        self.props.data = forest;

        let selection_gone = self
            .selection
            .row
            .as_ref()
            .and_then(|row| row.key(self.props.identity_field()))
            .is_some_and(|selected| removed.contains_key(self.props.identity_field(), selected));
        if selection_gone {
            debug!("selected node went with the removed subtree");
            self.selection.clear_row();
        }
        self.refresh_column();
        info!("removed {} ({} nodes)", id, removed.subtree_size());
        true
    }

    /// Remove whatever row is selected; `false` when nothing is selected.
    pub fn remove_selected(&mut self) -> bool {
        let Some(id) = self
            .selection
            .row
            .as_ref()
            .and_then(|row| row.key(self.key()).cloned())
        else {
            return false;
        };
        self.remove(&id)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.props.data.validate(self.key())
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            data: self.data(),
            behavior: self.behavior(),
            selected: self.selection.row.clone(),
            selected_column: self.selection.column.clone(),
        }
    }

    fn refresh_row(&mut self) {
        let key = self.props.identity_field();
        let fresh = self
            .selection
            .row
            .as_ref()
            .and_then(|row| row.key(key))
            .and_then(|id| self.props.data.find_node(key, id))
            .map(|node| self.props.variant.behavior().capture(node));
        if fresh.is_none() && self.selection.row.is_some() {
            debug!("selected node no longer present, clearing selection");
        }
        self.selection.row = fresh;
    }

    fn refresh_column(&mut self) {
        let (Some(column), Some(index)) = (
            self.selection.column.as_ref(),
            self.props.index_column_name.as_deref(),
        ) else {
            return;
        };
        let view = self.props.data.flatten_column(&column.name, index);
        self.selection.column = Some(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unknown_id_when_select_then_keeps_previous_selection() {
        let forest = Forest::new(vec![Node::new().with_field("id", "1")]);
        let mut store =
            HierarchyTreeStore::new(HierarchyProps::new(forest), StoreOptions::default()).unwrap();
        store.select(&"1".into());

        assert!(store.select(&"nope".into()).is_none());
        assert_eq!(
            store.selected().and_then(|n| n.key("id")),
            Some(&FieldValue::from("1"))
        );
    }

    #[test]
    fn given_snapshot_when_serializing_then_uses_variant_output_name() {
        let forest = Forest::new(vec![Node::new().with_field("id", "1")]);
        let mut store =
            HierarchyTreeStore::new(HierarchyProps::new(forest), StoreOptions::default()).unwrap();
        store.select(&"1".into());

        let json = serde_json::to_value(store.snapshot()).unwrap();

        assert_eq!(json["selectedRow"]["id"], "1");
        assert!(json["selectedColumn"].is_null());
    }
}

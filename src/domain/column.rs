//! Column metadata, column views and colour tokens

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::value::FieldValue;

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Presentation metadata for one column. Never interpreted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_text: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Header text: the label, falling back to the field name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// One `(index value, column value)` pair of a column view.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnEntry {
    pub index: FieldValue,
    pub value: FieldValue,
}

/// Cross-section of one field across the forest, in pre-order.
///
/// Serializes in the `selectedColumn` shape:
/// `{"name": .., "data": [{<index_field>: .., "value": ..}, ..]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub name: String,
    pub index_field: String,
    pub entries: Vec<ColumnEntry>,
}

impl ColumnView {
    pub fn new(name: impl Into<String>, index_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index_field: index_field.into(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all numeric values; non-numeric values are ignored.
    pub fn numeric_total(&self) -> f64 {
        self.entries.iter().filter_map(|e| e.value.as_f64()).sum()
    }
}

struct EntryRow<'a> {
    index_field: &'a str,
    entry: &'a ColumnEntry,
}

impl Serialize for EntryRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.index_field, &self.entry.index)?;
        map.serialize_entry("value", &self.entry.value)?;
        map.end()
    }
}

impl Serialize for ColumnView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<EntryRow<'_>> = self
            .entries
            .iter()
            .map(|entry| EntryRow {
                index_field: &self.index_field,
                entry,
            })
            .collect();
        let mut state = serializer.serialize_struct("ColumnView", 2)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("data", &rows)?;
        state.end()
    }
}

/// Opaque mapping of visual tokens to colours, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorScheme(pub BTreeMap<String, String>);

impl ColorScheme {
    /// Defaults of the simple list and column-table widgets.
    pub fn item_defaults() -> Self {
        Self::from_pairs(&[("primary", "#7c3aed"), ("background", "#e5e7eb")])
    }

    /// Defaults of the generic row table.
    pub fn row_defaults() -> Self {
        Self::from_pairs(&[("hoverColor", "#f5f5f5"), ("selectedColor", "#e6f7ff")])
    }

    fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Overlay wins per token; tokens only in `self` are kept.
    pub fn merged_with(&self, overlay: &ColorScheme) -> Self {
        let mut merged = self.0.clone();
        merged.extend(overlay.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self(merged)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.0.get(token).map(String::as_str)
    }
}

//! Input properties of a hierarchy widget

use serde::{Deserialize, Serialize};

use crate::domain::{ColorScheme, ColumnDescriptor, Forest, SelectionBehavior};

pub const DEFAULT_UNIQUE_KEY: &str = "id";

/// Widget flavour; decides the selection shape and the colour defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Expandable list with a percentage bar per item.
    Simple,
    /// Multi-column table keyed by an index column, with column selection.
    Table,
    /// Table of arbitrary columns with row selection.
    #[default]
    Generic,
}

impl Variant {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "simple" => Some(Self::Simple),
            "table" => Some(Self::Table),
            "generic" => Some(Self::Generic),
            _ => None,
        }
    }

    pub fn behavior(&self) -> SelectionBehavior {
        match self {
            Variant::Simple | Variant::Table => SelectionBehavior::SelectItems,
            Variant::Generic => SelectionBehavior::SelectRows,
        }
    }

    pub fn default_colors(&self) -> ColorScheme {
        match self {
            Variant::Simple => ColorScheme::item_defaults(),
            Variant::Table => ColorScheme::default(),
            Variant::Generic => ColorScheme::row_defaults(),
        }
    }
}

/// The properties a host passes in: data plus pass-through metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyProps {
    #[serde(default)]
    pub data: Forest,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default = "default_unique_key")]
    pub unique_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_column_name: Option<String>,
    #[serde(default, skip_serializing_if = "ColorScheme::is_empty")]
    pub colors: ColorScheme,
    #[serde(default)]
    pub variant: Variant,
}

fn default_unique_key() -> String {
    DEFAULT_UNIQUE_KEY.to_string()
}

impl Default for HierarchyProps {
    fn default() -> Self {
        Self::new(Forest::default())
    }
}

impl HierarchyProps {
    pub fn new(data: Forest) -> Self {
        Self {
            data,
            columns: Vec::new(),
            unique_key: default_unique_key(),
            index_column_name: None,
            colors: ColorScheme::default(),
            variant: Variant::default(),
        }
    }

    /// Field identifying a node: the index column for tables, else the unique key.
    pub fn identity_field(&self) -> &str {
        match (self.variant, self.index_column_name.as_deref()) {
            (Variant::Table, Some(index)) => index,
            _ => &self.unique_key,
        }
    }

    /// Variant defaults overlaid with the configured colours.
    pub fn effective_colors(&self) -> ColorScheme {
        self.variant.default_colors().merged_with(&self.colors)
    }
}

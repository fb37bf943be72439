//! Generation of ids for newly appended children

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::forest::Forest;
use crate::domain::value::FieldValue;

/// How a fresh child id is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    /// `<parent><sep><child count + 1>`; may collide after removals.
    SiblingCount,
    /// Sibling-count candidate, bumped until unused in the whole forest.
    #[default]
    Unique,
    /// Random v4 UUID.
    Uuid,
}

impl IdStrategy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "sibling-count" => Some(Self::SiblingCount),
            "unique" => Some(Self::Unique),
            "uuid" => Some(Self::Uuid),
            _ => None,
        }
    }

    /// Next id for a child of `parent_id`.
    pub fn next_child_id(
        &self,
        forest: &Forest,
        key: &str,
        parent_id: &FieldValue,
        separator: &str,
    ) -> Result<FieldValue, DomainError> {
        let parent = forest
            .find_node(key, parent_id)
            .ok_or_else(|| DomainError::NodeNotFound {
                key: key.to_string(),
                id: parent_id.clone(),
            })?;
        let siblings = parent.children().len();

        let id = match self {
            IdStrategy::SiblingCount => child_id(parent_id, separator, siblings + 1),
            IdStrategy::Unique => {
                let mut n = siblings + 1;
                let mut candidate = child_id(parent_id, separator, n);
                while forest.contains(key, &candidate) {
                    n += 1;
                    candidate = child_id(parent_id, separator, n);
                }
                candidate
            }
            IdStrategy::Uuid => FieldValue::Text(Uuid::new_v4().to_string()),
        };
        debug!("next child id for {}: {}", parent_id, id);
        Ok(id)
    }
}

fn child_id(parent_id: &FieldValue, separator: &str, n: usize) -> FieldValue {
    FieldValue::Text(format!("{}{}{}", parent_id, separator, n))
}

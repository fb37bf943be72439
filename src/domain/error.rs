//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::value::FieldValue;

/// Domain errors represent violations of the tree model's rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("no node with {key} = {id}")]
    NodeNotFound { key: String, id: FieldValue },

    #[error("node {id} has no children sequence to append to")]
    ChildrenAbsent { id: FieldValue },

    #[error("duplicate {key}: {id}")]
    DuplicateKey { key: String, id: FieldValue },

    #[error("node lacks key field: {key}")]
    MissingKey { key: String },

    #[error("field name is reserved for the children sequence: {name}")]
    ReservedField { name: String },

    #[error("no index column configured")]
    NoIndexColumn,
}

impl DomainError {
    /// Both missing-parent flavours of a failed append count as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::NodeNotFound { .. } | DomainError::ChildrenAbsent { .. }
        )
    }
}

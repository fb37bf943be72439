//! Domain layer: tree model, selection and column views
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod column;
pub mod display;
pub mod error;
pub mod forest;
pub mod ids;
pub mod node;
pub mod selection;
pub mod value;

pub use column::{Alignment, ColorScheme, ColumnDescriptor, ColumnEntry, ColumnView};
pub use display::{NodeLabel, TreeConvert};
pub use error::DomainError;
pub use forest::{Forest, PreOrderIter};
pub use ids::IdStrategy;
pub use node::{Fields, Node, CHILDREN_FIELD};
pub use selection::{Selection, SelectionBehavior};
pub use value::FieldValue;

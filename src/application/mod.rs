//! Application layer: the hierarchy store and its properties
//!
//! This layer orchestrates domain logic; it performs no I/O itself.

pub mod error;
pub mod error_ext;
pub mod props;
pub mod shared;
pub mod store;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::ContextExt;
pub use props::{HierarchyProps, Variant, DEFAULT_UNIQUE_KEY};
pub use shared::SharedStore;
pub use store::{HierarchyTreeStore, StoreOptions, StoreSnapshot};

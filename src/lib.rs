//! Copy-on-write data layer for hierarchical tables.
//!
//! A [`domain::Forest`] holds the tree data; a
//! [`application::HierarchyTreeStore`] adds selection on top and is what a
//! presentation layer drives in response to user events.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{HierarchyProps, HierarchyTreeStore, SharedStore, StoreOptions};
pub use domain::{FieldValue, Forest, Node};

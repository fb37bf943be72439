//! Service container for dependency injection
//!
//! Wires settings, the filesystem and the document repository together.

use std::path::Path;
use std::sync::Arc;

use crate::application::HierarchyTreeStore;
use crate::config::Settings;
use crate::infrastructure::document::{Document, DocumentRepository};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Document loading and saving
    pub documents: DocumentRepository,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let documents = DocumentRepository::new(fs.clone(), settings.clone());

        Self {
            settings,
            fs,
            documents,
        }
    }

    /// Load a document and build a store over it.
    pub fn open_store(&self, path: &Path) -> InfraResult<(Document, HierarchyTreeStore)> {
        let document = self.documents.load(path)?;
        let store = HierarchyTreeStore::new(document.props.clone(), self.settings.store_options())?;
        Ok((document, store))
    }
}

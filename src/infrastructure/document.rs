//! JSON documents on disk
//!
//! A document is either the full property object
//! (`{"data": [...], "columns": [...], "uniqueKey": ...}`) or a bare array of
//! root nodes. Bare arrays take their metadata from [`Settings`].

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::HierarchyProps;
use crate::config::Settings;
use crate::domain::Forest;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

/// On-disk layout of a document, kept so rewrites preserve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    Bare,
    Props,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub props: HierarchyProps,
    pub shape: DocumentShape,
}

impl Document {
    /// Serialize back into the shape it was read in.
    pub fn render(&self) -> InfraResult<String> {
        let rendered = match self.shape {
            DocumentShape::Bare => serde_json::to_string_pretty(&self.props.data),
            DocumentShape::Props => serde_json::to_string_pretty(&self.props),
        };
        rendered.map_err(|e| InfraError::json("render", e))
    }
}

pub struct DocumentRepository {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl DocumentRepository {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> InfraResult<Document> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        let document = self.parse(&content).map_err(|e| match e {
            InfraError::Json { source, .. } => InfraError::json(path.display().to_string(), source),
            other => other,
        })?;
        debug!(
            "loaded {:?} document with {} nodes",
            document.shape,
            document.props.data.len()
        );
        Ok(document)
    }

    pub fn parse(&self, content: &str) -> InfraResult<Document> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| InfraError::json("parse", e))?;
        if value.is_array() {
            let forest: Forest =
                serde_json::from_value(value).map_err(|e| InfraError::json("parse", e))?;
            Ok(Document {
                props: self.settings.props_for(forest),
                shape: DocumentShape::Bare,
            })
        } else {
            let props: HierarchyProps =
                serde_json::from_value(value).map_err(|e| InfraError::json("parse", e))?;
            Ok(Document {
                props,
                shape: DocumentShape::Props,
            })
        }
    }

    #[instrument(level = "debug", skip(self, document))]
    pub fn save(&self, path: &Path, document: &Document) -> InfraResult<()> {
        let rendered = document.render()?;
        self.fs
            .write(path, &rendered)
            .map_err(|e| InfraError::io(format!("write {}", path.display()), e))
    }
}

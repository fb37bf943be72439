//! Error conversion helpers
//!
//! Attach a human-readable context to foreign errors on their way into
//! [`ApplicationError::OperationFailed`].

use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting foreign results into `ApplicationResult`.
pub trait ContextExt<T> {
    /// Wrap the error with an action label.
    fn with_context(self, action: &str) -> ApplicationResult<T>;

    /// Wrap the error with an action label and the path it concerned.
    ///
    /// # Example
    /// ```ignore
    /// std::fs::read_to_string(&path).with_path_context("read config", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T, E> ContextExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: action.to_string(),
            source: Box::new(e),
        })
    }

    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.with_context(&format!("{}: {}", action, path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_io_error_when_adding_path_context_then_message_names_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));

        let err = result
            .with_path_context("read document", Path::new("/tmp/tree.json"))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "operation failed: read document: /tmp/tree.json"
        );
    }
}

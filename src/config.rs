//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/hstore/hstore.toml`
//! 3. Local config: `<dir>/.hstore.toml`
//! 4. Environment variables: `HSTORE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{
    ApplicationError, ContextExt, HierarchyProps, StoreOptions, Variant, DEFAULT_UNIQUE_KEY,
};
use crate::domain::{ColorScheme, Forest, IdStrategy};

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub unique_key: Option<String>,
    pub index_column: Option<String>,
    pub variant: Option<Variant>,
    pub id_strategy: Option<IdStrategy>,
    pub id_separator: Option<String>,
    pub strict_ids: Option<bool>,
    pub colors: Option<ColorScheme>,
}

/// Unified configuration for hstore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Field holding node ids (default: "id")
    pub unique_key: String,
    /// Row index column for table documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_column: Option<String>,
    /// Widget flavour assumed for bare-array documents
    pub variant: Variant,
    /// How ids of generated children are derived
    pub id_strategy: IdStrategy,
    /// Joins parent id and child number for generated ids
    pub id_separator: String,
    /// Reject duplicate ids on load and append
    pub strict_ids: bool,
    /// Colour tokens, merged per token across layers
    pub colors: ColorScheme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unique_key: DEFAULT_UNIQUE_KEY.to_string(),
            index_column: None,
            variant: Variant::default(),
            id_strategy: IdStrategy::default(),
            id_separator: "-".to_string(),
            strict_ids: false,
            colors: ColorScheme::default(),
        }
    }
}

/// Get the XDG config directory for hstore.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hstore").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("hstore.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".hstore.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).with_path_context("read config", path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Colours: merged per token, overlay wins on conflicts
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            unique_key: overlay
                .unique_key
                .clone()
                .unwrap_or_else(|| self.unique_key.clone()),
            index_column: overlay
                .index_column
                .clone()
                .or_else(|| self.index_column.clone()),
            variant: overlay.variant.unwrap_or(self.variant),
            id_strategy: overlay.id_strategy.unwrap_or(self.id_strategy),
            id_separator: overlay
                .id_separator
                .clone()
                .unwrap_or_else(|| self.id_separator.clone()),
            strict_ids: overlay.strict_ids.unwrap_or(self.strict_ids),
            colors: overlay
                .colors
                .as_ref()
                .map(|c| self.colors.merged_with(c))
                .unwrap_or_else(|| self.colors.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.hstore.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply HSTORE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("HSTORE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("unique_key") {
            settings.unique_key = val;
        }
        if let Ok(val) = config.get_string("index_column") {
            settings.index_column = Some(val);
        }
        if let Ok(val) = config.get_string("variant") {
            settings.variant = Variant::parse(&val).ok_or_else(|| ApplicationError::Config {
                message: format!("unknown variant: {}", val),
            })?;
        }
        if let Ok(val) = config.get_string("id_strategy") {
            settings.id_strategy =
                IdStrategy::parse(&val).ok_or_else(|| ApplicationError::Config {
                    message: format!("unknown id strategy: {}", val),
                })?;
        }
        if let Ok(val) = config.get_string("id_separator") {
            settings.id_separator = val;
        }
        if let Ok(val) = config.get_bool("strict_ids") {
            settings.strict_ids = val;
        }

        Ok(settings)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            id_strategy: self.id_strategy,
            id_separator: self.id_separator.clone(),
            strict_ids: self.strict_ids,
        }
    }

    /// Properties for a bare-array document, filled from these settings.
    pub fn props_for(&self, data: Forest) -> HierarchyProps {
        HierarchyProps {
            data,
            columns: Vec::new(),
            unique_key: self.unique_key.clone(),
            index_column_name: self.index_column.clone(),
            colors: self.colors.clone(),
            variant: self.variant,
        }
    }

    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("render settings: {}", e),
        })
    }
}

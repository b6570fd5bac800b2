//! Collection configuration via TOML
//!
//! A collection is configured with the properties it indexes eagerly and
//! whether writes patch those indexes incrementally. The collator is not
//! part of the file; it is supplied programmatically.

use serde::{Deserialize, Serialize};
use std::path::Path;

use collatedb_core::{Error, PropertyPath, Result};

/// Conventional file name for a collection config.
pub const CONFIG_FILE_NAME: &str = "collection.toml";

/// Collection configuration.
///
/// # Example
///
/// ```toml
/// # Properties indexed as soon as the collection is created
/// indices = ["b", "user.age"]
///
/// # true  = patch every index on every write (default)
/// # false = mark indexes dirty on write, rebuild lazily on next use
/// adaptive_binary_indices = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Properties to keep binary indexes for.
    #[serde(default)]
    pub indices: Vec<String>,
    /// Maintain indexes incrementally on every write.
    #[serde(default = "default_adaptive")]
    pub adaptive_binary_indices: bool,
}

fn default_adaptive() -> bool {
    true
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            indices: Vec::new(),
            adaptive_binary_indices: default_adaptive(),
        }
    }
}

impl CollectionConfig {
    /// Config indexing the given properties.
    pub fn with_indices<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indices: indices.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Switch to lazy (dirty-flag) index maintenance.
    pub fn lazy(mut self) -> Self {
        self.adaptive_binary_indices = false;
        self
    }

    /// Parse every configured index property.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for the first property that does not parse.
    pub fn index_paths(&self) -> Result<Vec<PropertyPath>> {
        self.indices
            .iter()
            .map(|p| p.parse::<PropertyPath>().map_err(Error::from))
            .collect()
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# collatedb collection configuration
#
# Properties indexed as soon as the collection is created.
# Dotted paths reach into nested documents.
indices = []

# Index maintenance on write:
#   true  = patch every binary index on every insert/update/remove (default)
#   false = mark indexes dirty, rebuild lazily on next sort or lookup
adaptive_binary_indices = true
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this config, or if
    /// an index property does not parse.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CollectionConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse collection config: {}", e)))?;
        // Validate the index paths eagerly
        config.index_paths()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

//! Identity configuration: alias groups and replacement-player names
//!
//! The resolver used to rely on mutable global name lists; here they are an
//! explicit, immutable configuration value constructed once at startup and
//! threaded into the resolver.

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Name-level identity knowledge supplied by the operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Groups of literal display names known to belong to one human. The
    /// first entry of each group is the canonical spelling.
    #[serde(default)]
    pub same_players: Vec<Vec<String>>,

    /// Display names of anonymous stand-in players. Matched by prefix, since
    /// the resolver suffixes raw ids onto these names to keep them unique.
    #[serde(default)]
    pub replacement_names: Vec<String>,
}

impl IdentityConfig {
    /// Load the configuration from a TOML file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RatingError::ConfigurationError {
                message: format!("cannot read {}: {}", path.display(), e),
            }
        })?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| RatingError::ConfigurationError {
                message: format!("cannot parse {}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the alias groups: non-empty groups, no name claimed twice.
    pub fn validate(&self) -> Result<()> {
        self.alias_map().map(|_| ())
    }

    /// Build the raw-name to canonical-name mapping from the alias groups.
    pub fn alias_map(&self) -> Result<HashMap<String, String>> {
        let mut aliases = HashMap::new();
        for group in &self.same_players {
            let canonical = group.first().ok_or_else(|| {
                RatingError::ConfigurationError {
                    message: "empty same_players group".to_string(),
                }
            })?;
            for name in group {
                if aliases
                    .insert(name.clone(), canonical.clone())
                    .is_some()
                {
                    return Err(RatingError::ConfigurationError {
                        message: format!("name '{}' appears in two same_players groups", name),
                    }
                    .into());
                }
            }
        }
        Ok(aliases)
    }

    /// Membership test for replacement players. Prefix matching, because
    /// canonicalization appends " (id N)" to replacement names.
    pub fn is_replacement_name(&self, name: &str) -> bool {
        self.replacement_names
            .iter()
            .any(|r| name.starts_with(r.as_str()))
    }
}

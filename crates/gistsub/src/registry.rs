use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One subscriber in the registry table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(default)]
    pub name:    Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra:   Map<String, Value>,
}

fn enabled_by_default() -> bool { true }

/// Known subscribers keyed by path token. Informational only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl Registry {
    /// Loads the table at `path`. A missing file is an empty registry; an
    /// unreadable or malformed one is logged and treated the same way.
    pub fn load(path: &Path) -> Self {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no registry file");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "registry unreadable, ignoring");
                return Self::default();
            }
        };

        Self::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "registry malformed, ignoring");
            Self::default()
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_slice(bytes)?;
        Ok(Self { entries })
    }

    pub fn get(&self, path_token: &str) -> Option<&RegistryEntry> { self.entries.get(path_token) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

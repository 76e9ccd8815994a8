use crate::error::{Result, UptestError};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A dependency pinned in the lockfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Install spec for the newest published release, `<name>@latest`
    pub fn latest_spec(&self) -> String {
        format!("{}@latest", self.name)
    }

    /// Install spec for the version captured from the lockfile, `<name>@<version>`
    pub fn pinned_spec(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

#[derive(Debug, Deserialize)]
struct Lockfile {
    #[serde(default)]
    dependencies: Option<IndexMap<String, LockedEntry>>,
}

#[derive(Debug, Deserialize)]
struct LockedEntry {
    version: String,
}

/// LockfileReaderAgent reads the resolved-dependency table
pub struct LockfileReaderAgent;

impl LockfileReaderAgent {
    pub fn new() -> Self {
        Self
    }

    /// Read `package-lock.json` and return its dependencies in declaration order.
    ///
    /// A lockfile without a `dependencies` table yields an empty list.
    pub fn read_dependencies<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Dependency>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            UptestError::LockfileParsing(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse_dependencies(&content)
    }

    pub fn parse_dependencies(&self, content: &str) -> Result<Vec<Dependency>> {
        let lockfile: Lockfile = serde_json::from_str(content)
            .map_err(|e| UptestError::LockfileParsing(format!("Failed to parse JSON: {}", e)))?;

        Ok(lockfile
            .dependencies
            .unwrap_or_default()
            .into_iter()
            .map(|(name, entry)| Dependency::new(name, entry.version))
            .collect())
    }
}

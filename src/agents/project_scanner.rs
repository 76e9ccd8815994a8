use crate::error::{Result, UptestError};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCKFILE_NAME: &str = "package-lock.json";
pub const MANIFEST_NAME: &str = "package.json";

/// ProjectScannerAgent validates the project structure
pub struct ProjectScannerAgent {
    project_path: PathBuf,
}

impl ProjectScannerAgent {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Checks the project directory and locates the lockfile.
    ///
    /// Both files are resolved relative to the project directory and symlinks
    /// are followed. The manifest is only located, not required: a project
    /// with nothing locked never needs it.
    pub fn validate(&self) -> Result<ProjectInfo> {
        let metadata = fs::metadata(&self.project_path).map_err(|e| {
            UptestError::ProjectValidation(format!(
                "Invalid path '{}': {e}",
                self.project_path.display()
            ))
        })?;
        if !metadata.is_dir() {
            return Err(UptestError::ProjectValidation(format!(
                "Path '{}' is not a directory",
                self.project_path.display()
            )));
        }

        let lockfile_path = self.project_path.join(LOCKFILE_NAME);
        if !lockfile_path.is_file() {
            return Err(UptestError::ProjectValidation(format!(
                "{} not found in {}",
                LOCKFILE_NAME,
                self.project_path.display()
            )));
        }

        Ok(ProjectInfo {
            manifest_path: self.project_path.join(MANIFEST_NAME),
            lockfile_path,
            project_path: self.project_path.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub project_path: PathBuf,
    pub lockfile_path: PathBuf,
    pub manifest_path: PathBuf,
}

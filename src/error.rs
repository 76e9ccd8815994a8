use thiserror::Error;

#[derive(Error, Debug)]
pub enum UptestError {
    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("Lockfile parsing failed: {0}")]
    LockfileParsing(String),

    #[error("Manifest parsing failed: {0}")]
    ManifestParsing(String),

    #[error("Failed to launch process: {0}")]
    ProcessLaunch(String),

    #[error("Package manager failed: {0}")]
    PackageManager(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UptestError>;

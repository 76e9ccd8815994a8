pub mod lockfile_reader;
pub mod manifest_reader;
pub mod project_scanner;
pub mod upgrade_runner;

pub use lockfile_reader::{Dependency, LockfileReaderAgent};
pub use manifest_reader::ManifestReaderAgent;
pub use project_scanner::ProjectScannerAgent;
pub use upgrade_runner::{UpgradeReport, UpgradeRunner};

use crate::error::{Result, UptestError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// The project's test script split into an executable and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl TestCommand {
    /// Splits on whitespace. Quoting is not interpreted, so `mocha "a b"`
    /// yields the arguments `"a` and `b"`.
    pub fn parse(script: &str) -> Result<Self> {
        let mut tokens = script.split_whitespace().map(str::to_string);
        let program = tokens.next().ok_or_else(|| {
            UptestError::ManifestParsing("scripts.test is empty".to_string())
        })?;

        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }
}

impl fmt::Display for TestCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    scripts: Option<HashMap<String, String>>,
}

/// ManifestReaderAgent extracts the test command from `package.json`
pub struct ManifestReaderAgent;

impl ManifestReaderAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn read_test_command<P: AsRef<Path>>(&self, path: P) -> Result<TestCommand> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            UptestError::ManifestParsing(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse_test_command(&content)
    }

    pub fn parse_test_command(&self, content: &str) -> Result<TestCommand> {
        let manifest: PackageManifest = serde_json::from_str(content)
            .map_err(|e| UptestError::ManifestParsing(format!("Failed to parse JSON: {}", e)))?;

        let script = manifest
            .scripts
            .and_then(|mut scripts| scripts.remove("test"))
            .ok_or_else(|| {
                UptestError::ManifestParsing("No scripts.test entry in package.json".to_string())
            })?;

        TestCommand::parse(&script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_program_and_args() {
        let command = TestCommand::parse("node test.js").unwrap();
        assert_eq!(command.program, "node");
        assert_eq!(command.args, vec!["test.js".to_string()]);
    }

    #[test]
    fn collapses_repeated_whitespace() {
        let command = TestCommand::parse("  jest   --ci\t--runInBand ").unwrap();
        assert_eq!(command.program, "jest");
        assert_eq!(command.args, vec!["--ci", "--runInBand"]);
        assert_eq!(command.to_string(), "jest --ci --runInBand");
    }

    #[test]
    fn quotes_are_not_interpreted() {
        let command = TestCommand::parse(r#"mocha --grep "two words""#).unwrap();
        assert_eq!(command.args, vec!["--grep", "\"two", "words\""]);
    }

    #[test]
    fn blank_script_is_rejected() {
        assert!(TestCommand::parse("   ").is_err());
    }

    #[test]
    fn reads_scripts_test() {
        let content = r#"{
            "name": "app",
            "scripts": { "start": "node index.js", "test": "node test.js" }
        }"#;
        let command = ManifestReaderAgent::new().parse_test_command(content).unwrap();
        assert_eq!(command.to_string(), "node test.js");
    }

    #[test]
    fn missing_test_script_is_rejected() {
        let reader = ManifestReaderAgent::new();
        for content in [
            r#"{ "name": "app" }"#,
            r#"{ "scripts": { "build": "tsc" } }"#,
        ] {
            let err = reader.parse_test_command(content).unwrap_err();
            assert!(matches!(err, UptestError::ManifestParsing(_)));
        }
    }
}

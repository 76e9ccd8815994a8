use crate::agents::lockfile_reader::Dependency;
use crate::agents::manifest_reader::TestCommand;
use crate::error::{Result, UptestError};
use crate::process::ProcessRunner;
use crate::utils::log::{LogKind, log};
use std::sync::Arc;

/// Terminal state of one dependency's upgrade attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyOutcome {
    /// Tests passed on the latest version; the upgrade is kept.
    Passed,
    /// Tests failed; the pinned version was reinstalled.
    Reverted,
}

/// UpgradeRunner drives install-latest, test, keep-or-revert for each dependency in turn
pub struct UpgradeRunner {
    runner: Arc<dyn ProcessRunner>,
    package_manager: String,
    test_command: TestCommand,
}

impl UpgradeRunner {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        package_manager: impl Into<String>,
        test_command: TestCommand,
    ) -> Self {
        Self {
            runner,
            package_manager: package_manager.into(),
            test_command,
        }
    }

    pub fn package_manager(&self) -> &str {
        &self.package_manager
    }

    /// Process every dependency sequentially.
    ///
    /// Test failures are recorded and rolled back; any other failure aborts
    /// the run and is returned without a report.
    pub fn run(&self, dependencies: &[Dependency]) -> Result<UpgradeReport> {
        let mut report = UpgradeReport::new();

        for dependency in dependencies {
            let outcome = self.upgrade_one(dependency)?;
            report.record(&dependency.name, outcome);
        }

        Ok(report)
    }

    fn upgrade_one(&self, dependency: &Dependency) -> Result<DependencyOutcome> {
        log(
            LogKind::Info,
            &format!("Installing latest version of {}...", dependency.name),
        );
        self.install(&dependency.latest_spec())?;

        log(LogKind::Info, "Running tests...");
        let tests = self
            .runner
            .run(&self.test_command.program, &self.test_command.args)?;

        if tests.success() {
            log(LogKind::Info, "Tests passed!");
            return Ok(DependencyOutcome::Passed);
        }

        log(LogKind::Info, "Tests failed! Rolling back...");
        self.install(&dependency.pinned_spec())?;
        Ok(DependencyOutcome::Reverted)
    }

    fn install(&self, spec: &str) -> Result<()> {
        let args = vec!["i".to_string(), spec.to_string()];
        let outcome = self.runner.run(&self.package_manager, &args)?;

        if !outcome.success() {
            return Err(UptestError::PackageManager(format!(
                "'{} i {}' failed with {}",
                self.package_manager,
                spec,
                outcome.describe()
            )));
        }

        Ok(())
    }
}

/// Names of the dependencies whose upgrade was kept and of those rolled back,
/// in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeReport {
    pub passed: Vec<String>,
    pub failed: Vec<String>,
}

impl UpgradeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, outcome: DependencyOutcome) {
        match outcome {
            DependencyOutcome::Passed => self.passed.push(name.to_string()),
            DependencyOutcome::Reverted => self.failed.push(name.to_string()),
        }
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }

    /// One install invocation that upgrades every passed dependency to latest
    pub fn suggested_command(&self, package_manager: &str) -> String {
        let mut command = format!("{} i", package_manager);
        for name in &self.passed {
            command.push(' ');
            command.push_str(name);
            command.push_str("@latest");
        }
        command
    }

    /// The three end-of-run lines: passed list, failed list, suggested command
    pub fn summary_lines(&self, package_manager: &str) -> [String; 3] {
        [
            format!("Tests passed for {}", self.passed.join(", ")),
            format!("Tests failed for {}", self.failed.join(", ")),
            format!("To update, run {}", self.suggested_command(package_manager)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ExitOutcome;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn exit_with(code: i32) -> ExitOutcome {
        ExitOutcome { code: Some(code) }
    }

    /// Records every invocation and answers test runs from a script of exit codes.
    struct ScriptedRunner {
        calls: Mutex<Vec<String>>,
        test_codes: Mutex<VecDeque<i32>>,
        failing_install: Option<String>,
    }

    impl ScriptedRunner {
        fn new(test_codes: &[i32]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                test_codes: Mutex::new(test_codes.iter().copied().collect()),
                failing_install: None,
            }
        }

        fn failing_install(mut self, spec: &str) -> Self {
            self.failing_install = Some(spec.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ProcessRunner for ScriptedRunner {
        fn run(&self, program: &str, args: &[String]) -> Result<ExitOutcome> {
            let line = format!("{} {}", program, args.join(" "));
            self.calls.lock().unwrap().push(line);

            if program == "npm" {
                if self.failing_install.as_deref() == args.get(1).map(String::as_str) {
                    return Ok(exit_with(1));
                }
                return Ok(exit_with(0));
            }

            let code = self
                .test_codes
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected test run");
            Ok(exit_with(code))
        }
    }

    struct UnlaunchableRunner;

    impl ProcessRunner for UnlaunchableRunner {
        fn run(&self, program: &str, _args: &[String]) -> Result<ExitOutcome> {
            Err(UptestError::ProcessLaunch(format!("Failed to spawn '{}'", program)))
        }
    }

    fn node_test() -> TestCommand {
        TestCommand::parse("node test.js").unwrap()
    }

    fn deps(pairs: &[(&str, &str)]) -> Vec<Dependency> {
        pairs
            .iter()
            .map(|(name, version)| Dependency::new(*name, *version))
            .collect()
    }

    #[test]
    fn keeps_passing_upgrade_and_reverts_failing_one() {
        let scripted = Arc::new(ScriptedRunner::new(&[0, 1]));
        let runner = UpgradeRunner::new(scripted.clone(), "npm", node_test());

        let report = runner
            .run(&deps(&[("A", "1.0.0"), ("B", "2.0.0")]))
            .unwrap();

        assert_eq!(
            scripted.calls(),
            vec![
                "npm i A@latest",
                "node test.js",
                "npm i B@latest",
                "node test.js",
                "npm i B@2.0.0",
            ]
        );
        assert_eq!(report.passed, vec!["A"]);
        assert_eq!(report.failed, vec!["B"]);
        assert_eq!(report.suggested_command("npm"), "npm i A@latest");
    }

    #[test]
    fn every_dependency_lands_in_exactly_one_list() {
        let codes = [0, 2, 0, 0, 127, 1];
        let names = ["a", "b", "c", "d", "e", "f"];
        let dependencies: Vec<_> = names
            .iter()
            .map(|n| Dependency::new(*n, "0.1.0"))
            .collect();
        let runner = UpgradeRunner::new(
            Arc::new(ScriptedRunner::new(&codes)),
            "npm",
            node_test(),
        );

        let report = runner.run(&dependencies).unwrap();

        assert_eq!(report.total(), names.len());
        assert_eq!(report.passed, vec!["a", "c", "d"]);
        assert_eq!(report.failed, vec!["b", "e", "f"]);
        assert!(report.passed.iter().all(|p| !report.failed.contains(p)));
    }

    #[test]
    fn revert_uses_exact_pinned_version() {
        let scripted = Arc::new(ScriptedRunner::new(&[1]));
        let runner = UpgradeRunner::new(scripted.clone(), "npm", node_test());

        runner.run(&deps(&[("@scope/pkg", "1.2.3-beta.4")])).unwrap();

        assert_eq!(scripted.calls().last().unwrap(), "npm i @scope/pkg@1.2.3-beta.4");
    }

    #[test]
    fn passing_dependencies_are_never_reverted() {
        let scripted = Arc::new(ScriptedRunner::new(&[0, 0]));
        let runner = UpgradeRunner::new(scripted.clone(), "npm", node_test());

        let report = runner.run(&deps(&[("x", "1.0.0"), ("y", "2.0.0")])).unwrap();

        let installs: Vec<_> = scripted
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("npm"))
            .collect();
        assert_eq!(installs, vec!["npm i x@latest", "npm i y@latest"]);
        assert_eq!(report.suggested_command("npm"), "npm i x@latest y@latest");
    }

    #[test]
    fn no_dependencies_spawns_nothing() {
        let scripted = Arc::new(ScriptedRunner::new(&[]));
        let runner = UpgradeRunner::new(scripted.clone(), "npm", node_test());

        let report = runner.run(&[]).unwrap();

        assert!(scripted.calls().is_empty());
        assert_eq!(report, UpgradeReport::new());
    }

    #[test]
    fn failed_install_aborts_remaining_dependencies() {
        let scripted = Arc::new(ScriptedRunner::new(&[0]).failing_install("B@latest"));
        let runner = UpgradeRunner::new(scripted.clone(), "npm", node_test());

        let err = runner
            .run(&deps(&[("A", "1.0.0"), ("B", "2.0.0"), ("C", "3.0.0")]))
            .unwrap_err();

        assert!(matches!(err, UptestError::PackageManager(_)));
        assert_eq!(scripted.calls().last().unwrap(), "npm i B@latest");
        assert!(!scripted.calls().iter().any(|c| c.contains("C@")));
    }

    #[test]
    fn failed_revert_is_not_retried() {
        let scripted = Arc::new(ScriptedRunner::new(&[1]).failing_install("A@1.0.0"));
        let runner = UpgradeRunner::new(scripted.clone(), "npm", node_test());

        let err = runner.run(&deps(&[("A", "1.0.0")])).unwrap_err();

        assert!(err.to_string().contains("npm i A@1.0.0"));
        assert_eq!(scripted.calls().len(), 3);
    }

    #[test]
    fn launch_failure_propagates() {
        let runner = UpgradeRunner::new(Arc::new(UnlaunchableRunner), "npm", node_test());
        let err = runner.run(&deps(&[("A", "1.0.0")])).unwrap_err();
        assert!(matches!(err, UptestError::ProcessLaunch(_)));
    }

    #[test]
    fn summary_lines_match_console_contract() {
        let mut report = UpgradeReport::new();
        report.record("A", DependencyOutcome::Passed);
        report.record("B", DependencyOutcome::Reverted);
        report.record("C", DependencyOutcome::Passed);

        assert_eq!(
            report.summary_lines("pnpm"),
            [
                "Tests passed for A, C".to_string(),
                "Tests failed for B".to_string(),
                "To update, run pnpm i A@latest C@latest".to_string(),
            ]
        );
    }

    #[test]
    fn suggestion_without_passes_is_bare_install() {
        let mut report = UpgradeReport::new();
        report.record("B", DependencyOutcome::Reverted);
        assert_eq!(report.suggested_command("npm"), "npm i");
    }
}

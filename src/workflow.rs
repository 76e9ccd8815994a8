use crate::agents::{
    Dependency, LockfileReaderAgent, ManifestReaderAgent, ProjectScannerAgent, UpgradeReport,
    UpgradeRunner,
};
use crate::error::Result;
use crate::process::{self, SystemProcessRunner};
use crate::utils::NameFilter;
use crate::utils::log::{LogKind, log};
use colored::Colorize;
use std::path::Path;

const NOTHING_TO_UPDATE: &str = "You don't have any dependencies to update! Wooho!";

/// How a workflow ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every step ran.
    Finished,
    /// Nothing was locked or selected; the notice has been printed and no
    /// subprocess was started.
    NothingToDo,
}

/// Execute the upgrade workflow
pub fn execute_run<P: AsRef<Path>>(
    project_path: P,
    package_manager: &str,
    filter: Option<&str>,
) -> Result<Completion> {
    let project_path = project_path.as_ref();
    // Validated before any step prints, so a bad pattern fails fast.
    let filter = filter.map(NameFilter::new).transpose()?;

    println!("{}", "Starting dependency upgrade run...".cyan().bold());

    // Step 1: Validate project structure
    println!("\n{}", "1. Validating project structure...".yellow());
    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;
    println!("{}", "✓ Project structure is valid".green());

    // Step 2: Read locked dependencies
    println!("\n{}", "2. Reading lockfile...".yellow());
    let mut dependencies =
        LockfileReaderAgent::new().read_dependencies(&project_info.lockfile_path)?;
    if dependencies.is_empty() {
        println!("{}", NOTHING_TO_UPDATE);
        return Ok(Completion::NothingToDo);
    }

    if let Some(filter) = &filter {
        dependencies.retain(|dep| filter.matches(&dep.name));
        if dependencies.is_empty() {
            println!(
                "{}",
                format!("No dependencies matched pattern '{}'.", filter.pattern()).yellow()
            );
            return Ok(Completion::NothingToDo);
        }
    }
    println!(
        "   Found {} locked dependencies",
        dependencies.len().to_string().yellow()
    );

    // Step 3: Read the test command
    println!("\n{}", "3. Reading test command...".yellow());
    let test_command =
        ManifestReaderAgent::new().read_test_command(&project_info.manifest_path)?;
    println!("   {}", test_command.to_string().bright_cyan());

    // Step 4: Upgrade one at a time
    println!("\n{}", "4. Upgrading dependencies...".yellow());
    let runner = UpgradeRunner::new(
        process::shared(SystemProcessRunner::new(&project_info.project_path)),
        package_manager,
        test_command,
    );
    let report = runner.run(&dependencies)?;
    println!(
        "{}",
        format!("✓ Processed {} dependencies", report.total()).green()
    );

    print_summary(&report, runner.package_manager());

    Ok(Completion::Finished)
}

fn print_summary(report: &UpgradeReport, package_manager: &str) {
    println!();
    for line in report.summary_lines(package_manager) {
        println!("{}", line);
    }
}

/// Execute the list workflow - display locked dependencies and the test command
pub fn execute_list<P: AsRef<Path>>(project_path: P) -> Result<Completion> {
    let project_path = project_path.as_ref();
    println!("{}", "Listing locked dependencies...".cyan().bold());

    // Step 1: Validate project structure
    println!("\n{}", "1. Validating project structure...".yellow());
    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;
    println!("{}", "✓ Project structure is valid".green());

    // Step 2: Read locked dependencies
    println!("\n{}", "2. Reading lockfile...".yellow());
    let dependencies = LockfileReaderAgent::new().read_dependencies(&project_info.lockfile_path)?;
    if dependencies.is_empty() {
        println!("{}", NOTHING_TO_UPDATE);
        return Ok(Completion::NothingToDo);
    }
    println!("{}", "✓ Lockfile loaded".green());

    print_dependencies(&dependencies);

    match ManifestReaderAgent::new().read_test_command(&project_info.manifest_path) {
        Ok(command) => {
            println!("\n{}", "Test command:".cyan().bold());
            println!("  {}", command.to_string().bright_cyan());
        }
        Err(e) => {
            let note = format!("No test command: {}", e);
            log(LogKind::Info, &note.dimmed().to_string());
        }
    }

    Ok(Completion::Finished)
}

fn print_dependencies(dependencies: &[Dependency]) {
    println!("\n{}", "📦 Dependencies:".cyan().bold());
    for dependency in dependencies {
        println!(
            "  {}@{}",
            dependency.name.white().bold(),
            dependency.version.green()
        );
    }

    println!("\n{}", "Summary:".cyan().bold());
    println!("  {} dependencies", dependencies.len().to_string().yellow());
}

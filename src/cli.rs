use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "uptest",
    about = "Upgrade locked dependencies one at a time, keeping only the ones your tests accept",
    version,
    author
)]
pub struct Cli {
    /// Path to the project directory (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    pub path: String,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Try the latest version of every locked dependency, rolling back on test failure
    Run {
        /// Package manager executable used for installs
        #[arg(long = "package-manager", value_name = "PROGRAM", default_value = "npm")]
        package_manager: String,

        /// Only process dependencies whose name matches this glob (e.g. "*eslint*")
        #[arg(long, value_name = "GLOB")]
        filter: Option<String>,
    },

    /// List the dependencies pinned in the lockfile
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults_to_npm() {
        let cli = Cli::parse_from(["uptest", "run"]);
        assert_eq!(cli.path, ".");
        match cli.command {
            Commands::Run {
                package_manager,
                filter,
            } => {
                assert_eq!(package_manager, "npm");
                assert!(filter.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "uptest",
            "run",
            "--package-manager",
            "pnpm",
            "--filter",
            "react*",
            "--path",
            "/tmp/app",
            "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.path, "/tmp/app");
        assert!(matches!(
            cli.command,
            Commands::Run { ref package_manager, filter: Some(ref f) } if package_manager == "pnpm" && f == "react*"
        ));
    }
}

mod agents;
mod cli;
mod error;
mod process;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use utils::log::{LogKind, log};
use workflow::Completion;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var(utils::log::VERBOSE_ENV, "1");
        }
    }

    let result = match cli.command {
        Commands::Run {
            package_manager,
            filter,
        } => workflow::execute_run(&cli.path, &package_manager, filter.as_deref()),
        Commands::List => workflow::execute_list(&cli.path),
    };

    match result {
        Ok(Completion::Finished) => log(LogKind::Success, "Process completed successfully."),
        Ok(Completion::NothingToDo) => {}
        Err(e) => {
            log(LogKind::Fatal, "Something went wrong :(");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

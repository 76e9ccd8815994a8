use crate::error::{Result, UptestError};
use crate::process::{ExitOutcome, ProcessRunner, relay_output};
use crate::utils::log::verbose;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

/// Runs real subprocesses inside the project directory.
pub struct SystemProcessRunner {
    working_dir: PathBuf,
}

impl SystemProcessRunner {
    pub fn new<P: AsRef<Path>>(working_dir: P) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ExitOutcome> {
        let command_line = if args.is_empty() {
            program.to_string()
        } else {
            format!("{} {}", program, args.join(" "))
        };
        verbose(&format!(
            "Executing: {} (in {})",
            command_line,
            self.working_dir.display()
        ));

        let mut child = Command::new(program)
            .current_dir(&self.working_dir)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                UptestError::ProcessLaunch(format!("Failed to spawn '{}': {}", command_line, e))
            })?;

        let status = {
            let mut ours = io::stdout().lock();
            relay_and_wait(&mut child, &mut ours, &command_line)?
        };

        let outcome = ExitOutcome {
            code: status.code(),
        };
        verbose(&format!("'{}' finished with {}", command_line, outcome.describe()));
        Ok(outcome)
    }
}

/// Relays the child's stdout into `sink` until the child closes it, then reaps
/// the child. If relaying fails the child is killed and reaped before the
/// error is returned.
fn relay_and_wait<W: Write>(
    child: &mut Child,
    sink: &mut W,
    command_line: &str,
) -> Result<ExitStatus> {
    if let Some(stdout) = child.stdout.take() {
        if let Err(e) = relay_output(stdout, sink) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(UptestError::ProcessLaunch(format!(
                "Failed to relay output of '{}': {}",
                command_line, e
            )));
        }
    }

    child.wait().map_err(|e| {
        UptestError::ProcessLaunch(format!("Failed to wait for '{}': {}", command_line, e))
    })
}

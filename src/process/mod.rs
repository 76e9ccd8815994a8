use crate::error::Result;
use std::io::{self, Read, Write};
use std::sync::Arc;

pub mod system;
pub use system::SystemProcessRunner;

/// How a subprocess terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

/// Launches one subprocess at a time and blocks until it has terminated.
///
/// Implementations relay the child's standard output to ours while waiting.
/// An `Err` means the process could not be started or awaited; a process that
/// ran and exited non-zero is reported through `ExitOutcome`.
pub trait ProcessRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> Result<ExitOutcome>;
}

pub fn shared<R: ProcessRunner + 'static>(runner: R) -> Arc<dyn ProcessRunner> {
    Arc::new(runner)
}

/// Copies `reader` into `writer` unmodified until end of stream, flushing
/// after every chunk so output shows up as it is produced.
pub fn relay_output<R: Read, W: Write>(mut reader: R, writer: &mut W) -> io::Result<u64> {
    let mut buffer = [0u8; 8 * 1024];
    let mut total = 0u64;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..read])?;
        writer.flush()?;
        total += read as u64;
    }

    Ok(total)
}

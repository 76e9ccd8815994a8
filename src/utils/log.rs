use colored::Colorize;
use std::fmt;

/// Environment variable that turns on `[VERBOSE]` diagnostics.
pub const VERBOSE_ENV: &str = "UPTEST_VERBOSE";

/// Kind of event written to the console log stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Success,
    Fatal,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogKind::Info => "Info",
            LogKind::Success => "Success",
            LogKind::Fatal => "Fatal",
        };
        f.write_str(label)
    }
}

/// Formats an event line as `[<Type>] <message>` with the type highlighted.
pub fn format_line(kind: LogKind, message: &str) -> String {
    format!("[{}] {}", kind.to_string().cyan(), message)
}

pub fn log(kind: LogKind, message: &str) {
    println!("{}", format_line(kind, message));
}

pub fn is_verbose() -> bool {
    std::env::var(VERBOSE_ENV).is_ok()
}

/// Writes a diagnostic to stderr when verbose mode is on
pub fn verbose(message: &str) {
    if is_verbose() {
        eprintln!("[VERBOSE] {}", message);
    }
}

use crate::error::{Result, UptestError};
use regex::Regex;

/// Selects npm packages by name.
///
/// Patterns follow the shape of npm names:
/// - `@scope/name` matches the scope and the name separately
/// - `@scope` (or `@scope/*`) selects every package in that scope
/// - `name` matches the unscoped part of any package, scoped or not
///
/// `*` and `?` are wildcards inside a part; matching ignores case.
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: String,
    scope: Option<Regex>,
    name: Regex,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        let invalid = |reason: &str| {
            UptestError::ProjectValidation(format!("Invalid filter '{}': {}", pattern, reason))
        };

        if pattern.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        let (scope, name) = match pattern.strip_prefix('@') {
            Some(scoped) => match scoped.split_once('/') {
                Some((scope, name)) => (Some(scope), name),
                None => (Some(scoped), "*"),
            },
            None if pattern.contains('/') => {
                return Err(invalid("only scoped patterns may contain '/'"));
            }
            None => (None, pattern),
        };

        if scope.is_some_and(str::is_empty) || name.is_empty() || name.contains('/') {
            return Err(invalid("expected '@scope/name', '@scope' or 'name'"));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            scope: scope.map(part_regex).transpose().map_err(|e| invalid(&e.to_string()))?,
            name: part_regex(name).map_err(|e| invalid(&e.to_string()))?,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, package: &str) -> bool {
        let (scope, name) = split_package(package);
        let scope_ok = match (&self.scope, scope) {
            (None, _) => true,
            (Some(wanted), Some(scope)) => wanted.is_match(scope),
            (Some(_), None) => false,
        };
        scope_ok && self.name.is_match(name)
    }
}

/// Splits `@scope/name` into `(Some("scope"), "name")`; unscoped names have no scope.
fn split_package(package: &str) -> (Option<&str>, &str) {
    package
        .strip_prefix('@')
        .and_then(|scoped| scoped.split_once('/'))
        .map_or((None, package), |(scope, name)| (Some(scope), name))
}

fn part_regex(part: &str) -> std::result::Result<Regex, regex::Error> {
    let body: String = part
        .split_inclusive(['*', '?'])
        .map(|chunk| {
            let (literal, wildcard) = match chunk.chars().last() {
                Some('*') => (&chunk[..chunk.len() - 1], ".*"),
                Some('?') => (&chunk[..chunk.len() - 1], "."),
                _ => (chunk, ""),
            };
            format!("{}{}", regex::escape(literal), wildcard)
        })
        .collect();
    Regex::new(&format!("(?i)^{}$", body))
}

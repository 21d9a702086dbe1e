//! File input and stdout output for the CLI
//!
//! - Input: a JSON array of scoped constraints
//! - Output: explain text, or a single JSON object, on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::expressions::ScopedConstraint;

use super::errors::{CliError, CliResult};

/// Read the constraint set of a request from a JSON file
pub fn read_constraints(path: &Path) -> CliResult<Vec<ScopedConstraint>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&content)
        .map_err(|e| CliError::invalid_constraints(format!("{}: {}", path.display(), e)))
}

/// Write explain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;

    Ok(())
}

/// Write a value as pretty JSON to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_constraints() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[{{"expression": {{"kind": "include", "value": ["author"]}}}}, {{"scope": "author", "expression": {{"kind": "sort", "value": [{{"target": {{"field": "name"}}, "ascending": true}}]}}}}]"#
        )
        .unwrap();

        let constraints = read_constraints(file.path()).unwrap();
        assert_eq!(constraints.len(), 2);
        assert!(constraints[0].scope.is_none());
        assert_eq!(constraints[1].scope.as_ref().unwrap().to_string(), "author");
    }

    #[test]
    fn test_empty_file_is_no_constraints() {
        let file = NamedTempFile::new().unwrap();
        assert!(read_constraints(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_constraints() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{\"not\": \"an array\"}}").unwrap();

        let err = read_constraints(file.path()).unwrap_err();
        assert_eq!(err.code_str(), "CLI_INVALID_CONSTRAINTS");
    }
}

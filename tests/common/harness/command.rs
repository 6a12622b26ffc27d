//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility shared by several test binaries
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `todomark` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct TodomarkCommand {
    args: Vec<String>,
    home: Option<PathBuf>,
    stdin: Option<String>,
}

impl TodomarkCommand {
    /// Creates a new command for the `todomark` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            home: None,
            stdin: None,
        }
    }

    /// Sets the `--db` option.
    pub fn db(mut self, path: &Path) -> Self {
        self.args.push("--db".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Points HOME and the XDG directories at `dir` so no user config leaks in.
    pub fn home(mut self, dir: &Path) -> Self {
        self.home = Some(dir.to_path_buf());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Feeds `input` on stdin.
    pub fn stdin(mut self, input: &str) -> Self {
        self.stdin = Some(input.to_string());
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("todomark").expect("Failed to find todomark binary");
        cmd.env_remove("TODOMARK_DB").env_remove("RUST_LOG");
        if let Some(home) = &self.home {
            cmd.env("HOME", home)
                .env("XDG_CONFIG_HOME", home.join(".config"))
                .env("XDG_DATA_HOME", home.join(".local/share"));
        }
        if let Some(input) = self.stdin {
            cmd.write_stdin(input);
        }
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `reconcile` command on one path.
    pub fn reconcile(self, path: &Path) -> Self {
        self.args(["reconcile".to_string(), path.to_string_lossy().to_string()])
    }

    /// Configures for the `create` command.
    pub fn create(self, text: &str) -> Self {
        self.args(["create", text])
    }

    /// Configures for the `delete` command.
    pub fn delete(self, text: &str) -> Self {
        self.args(["delete", text])
    }

    /// Configures for the `load` command.
    pub fn load(self) -> Self {
        self.args(["load"])
    }

    /// Configures for the `search` command with a query.
    pub fn search(self, query: &str) -> Self {
        self.args(["search", query])
    }

    /// Configures for the `show` command with an ID.
    pub fn show(self, id: &str) -> Self {
        self.args(["show", id])
    }

    /// Configures for the `tags` command.
    pub fn tags(self) -> Self {
        self.args(["tags"])
    }

    // ===========================================
    // Options
    // ===========================================

    /// Adds `--read` to the command.
    pub fn read_mode(self) -> Self {
        self.args(["--read"])
    }

    /// Adds `--stdout` to the command.
    pub fn to_stdout(self) -> Self {
        self.args(["--stdout"])
    }

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for TodomarkCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        TodomarkCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_db() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("todos.db");
        let cmd = TodomarkCommand::new().db(&db);
        let args = cmd.get_args();
        assert_eq!(args[0], "--db");
        assert_eq!(args[1], db.to_string_lossy());
    }

    #[test]
    fn test_command_output_success() {
        let output = TodomarkCommand::new().args(["--help"]).output_success();
        assert!(output.contains("todomark") || output.contains("todo"));
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = TodomarkCommand::new().search("milk").format_json();
        let args = cmd.get_args();
        assert!(args.contains(&"search".to_string()));
        assert!(args.contains(&"--format".to_string()));
        assert!(args.contains(&"json".to_string()));
    }
}

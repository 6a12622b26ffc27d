//! Isolated test environment with temp directory.

// Allow dead code since this is a test utility shared by several test binaries
#![allow(dead_code)]

use super::TodomarkCommand;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use todomark::domain::{NewTodo, TodoId};
use todomark::store::{StoreSource, TodoDb, TodoRepository};

/// Isolated test environment with a temporary directory.
///
/// Holds the documents, the todo database and a fake home directory, all
/// cleaned up on drop.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Root of the environment
    root: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().to_path_buf();
        std::fs::create_dir_all(root.join("docs")).expect("Failed to create docs directory");
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Returns the root of the environment, used as HOME.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory holding test documents.
    pub fn docs_dir(&self) -> PathBuf {
        self.root.join("docs")
    }

    /// Returns the path of the todo database.
    pub fn db_path(&self) -> PathBuf {
        self.root.join("todos.db")
    }

    /// Returns a handle on the todo database, creating it if needed.
    pub fn db(&self) -> TodoDb {
        let db = TodoDb::new(self.db_path());
        db.init().expect("Failed to initialize todo database");
        db
    }

    /// Inserts a todo directly into the database.
    pub fn add_todo(&self, todo: NewTodo) -> TodoId {
        self.db()
            .connect()
            .and_then(|mut store| store.insert(&todo))
            .expect("Failed to insert todo")
    }

    /// Writes a document below the docs directory and returns its path.
    pub fn write_doc(&self, name: &str, content: &str) -> PathBuf {
        let path = self.docs_dir().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create document directory");
        }
        std::fs::write(&path, content).expect("Failed to write document");
        path
    }

    /// Reads a document back.
    pub fn read_doc(&self, path: &Path) -> String {
        std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }

    /// Writes a config file into the fake home and returns its path.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let dir = self.root.join(".config").join("todomark");
        std::fs::create_dir_all(&dir).expect("Failed to create config directory");
        let path = dir.join("config.toml");
        std::fs::write(&path, content).expect("Failed to write config");
        path
    }

    /// Creates a command configured for this test environment.
    pub fn cmd(&self) -> TodomarkCommand {
        TodomarkCommand::new().home(&self.root).db(&self.db_path())
    }

    /// Creates a command that only has the fake home, no `--db`.
    pub fn bare_cmd(&self) -> TodomarkCommand {
        TodomarkCommand::new().home(&self.root)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.docs_dir().is_dir(), "docs directory should exist");
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.root().to_path_buf()
        };
        assert!(
            !path.exists(),
            "temp directory should be cleaned up on drop"
        );
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--db");
        assert_eq!(args[1], env.db_path().to_string_lossy());
    }

    #[test]
    fn test_env_add_todo() {
        let env = TestEnv::new();
        let id = env.add_todo(NewTodo::new("seed"));
        let todo = env.db().connect().unwrap().get_by_id(id).unwrap().unwrap();
        assert_eq!(todo.todo, "seed");
    }
}

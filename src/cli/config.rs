//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::infra::mime::MimeRules;

/// Environment variable naming the todo database.
pub const DB_ENV: &str = "TODOMARK_DB";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Todo database file
    pub db: Option<PathBuf>,

    /// MIME rule file replacing the built-in table
    pub mime_rules: Option<PathBuf>,

    /// Bookmark database used by `open --bookmark` and `unbookmark`
    pub bookmarks_db: Option<PathBuf>,

    /// Editor command for text targets of `open`
    pub editor: Option<String>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, defaulting when it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/todomark/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("todomark")
            .join("config.toml")
    }

    /// Resolve the todo database path.
    ///
    /// Precedence order:
    /// 1. CLI `--db` argument
    /// 2. `$TODOMARK_DB`
    /// 3. Config file `db` setting
    /// 4. `<data dir>/todomark/todos.db`
    pub fn db_path(&self, cli_db: Option<&PathBuf>) -> PathBuf {
        self.db_path_with_env(cli_db, std::env::var_os(DB_ENV).map(PathBuf::from))
    }

    fn db_path_with_env(&self, cli_db: Option<&PathBuf>, env_db: Option<PathBuf>) -> PathBuf {
        cli_db
            .cloned()
            .or(env_db)
            .or_else(|| self.db.clone())
            .unwrap_or_else(Self::default_db_path)
    }

    pub fn default_db_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("todomark")
            .join("todos.db")
    }

    /// Resolve the bookmark database, next to the todo database by default.
    pub fn bookmarks_path(&self, db_path: &Path) -> PathBuf {
        self.bookmarks_db.clone().unwrap_or_else(|| {
            db_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("bookmarks.db")
        })
    }

    /// Resolve the editor command.
    ///
    /// Precedence order:
    /// 1. Config file `editor` setting
    /// 2. $EDITOR environment variable
    /// 3. $VISUAL environment variable
    /// 4. "vi" as fallback
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// The MIME rule table, loaded once per process.
    pub fn mime_rules(&self) -> Result<MimeRules> {
        match &self.mime_rules {
            Some(path) => MimeRules::load(path)
                .with_context(|| format!("failed to load MIME rules: {}", path.display())),
            None => Ok(MimeRules::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_db(db: &str) -> Config {
        Config {
            db: Some(PathBuf::from(db)),
            ..Config::default()
        }
    }

    #[test]
    fn default_config_has_no_db() {
        let config = Config::default();
        assert!(config.db.is_none());
        assert!(config.mime_rules.is_none());
    }

    #[test]
    fn db_path_prefers_cli_arg() {
        let config = with_db("/config/todos.db");
        let cli_db = PathBuf::from("/cli/todos.db");
        assert_eq!(
            config.db_path_with_env(Some(&cli_db), Some(PathBuf::from("/env/todos.db"))),
            PathBuf::from("/cli/todos.db")
        );
    }

    #[test]
    fn db_path_env_beats_config() {
        let config = with_db("/config/todos.db");
        assert_eq!(
            config.db_path_with_env(None, Some(PathBuf::from("/env/todos.db"))),
            PathBuf::from("/env/todos.db")
        );
    }

    #[test]
    fn db_path_falls_back_to_config() {
        let config = with_db("/config/todos.db");
        assert_eq!(
            config.db_path_with_env(None, None),
            PathBuf::from("/config/todos.db")
        );
    }

    #[test]
    fn db_path_falls_back_to_data_dir() {
        let config = Config::default();
        let path = config.db_path_with_env(None, None);
        assert!(path.ends_with("todomark/todos.db"));
    }

    #[test]
    fn bookmarks_default_next_to_db() {
        let config = Config::default();
        assert_eq!(
            config.bookmarks_path(Path::new("/data/todomark/todos.db")),
            PathBuf::from("/data/todomark/bookmarks.db")
        );
    }

    #[test]
    fn config_path_is_in_config_dir() {
        let path = Config::config_path();
        assert!(path.ends_with("todomark/config.toml"));
    }

    #[test]
    fn load_from_parses_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "db = \"/srv/todos.db\"\nmime_rules = \"/etc/todomark/mime.conf\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.db, Some(PathBuf::from("/srv/todos.db")));
        assert_eq!(
            config.mime_rules,
            Some(PathBuf::from("/etc/todomark/mime.conf"))
        );
        assert!(config.bookmarks_db.is_none());
    }

    #[test]
    fn load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.db.is_none());
    }

    #[test]
    fn load_from_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "db = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();

        assert!(format!("{err:#}").contains("failed to parse config file"));
    }

    #[test]
    fn editor_prefers_config() {
        let config = Config {
            editor: Some("nvim".to_string()),
            ..Config::default()
        };
        assert_eq!(config.editor(), "nvim");
    }

    #[test]
    fn mime_rules_default_to_builtin() {
        let rules = Config::default().mime_rules().unwrap();
        assert_eq!(rules.classify("a.md"), "text/markdown");
    }
}

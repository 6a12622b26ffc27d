use super::*;
use crate::cli::OpenArgs;
use crate::domain::{NewTodo, TagSet, TodoId, TodoStatus};
use crate::infra::bookmarks::{BookmarkStore, MANAGED_TAG, SqliteBookmarks};
use crate::infra::mime::MimeRules;
use crate::infra::opener::Opener;
use crate::reconcile::Mode;
use crate::store::TodoRepository;
use anyhow::bail;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Test helpers
fn setup_db() -> (TempDir, TodoDb) {
    let dir = TempDir::new().unwrap();
    let db = TodoDb::new(dir.path().join("todos.db"));
    db.init().unwrap();
    (dir, db)
}

fn insert(db: &TodoDb, new: NewTodo) -> TodoId {
    db.connect().unwrap().insert(&new).unwrap()
}

// ===========================================
// reconcile_text tests
// ===========================================

#[test]
fn reconcile_text_assigns_codes_and_keeps_prose() {
    let (_dir, db) = setup_db();
    let text = "# Plan\n\n- [ ] buy milk\n\t- [ ] find shop\n";

    let out = reconcile_text(&db, text, "plan.md", Mode::Write).unwrap();

    assert_eq!(out, "# Plan\n\n-%1% [ ] buy milk\n\t-%2% [ ] find shop\n");
    let child = db.connect().unwrap().get_by_id(TodoId::new(2)).unwrap().unwrap();
    assert_eq!(child.parent_id, Some(TodoId::new(1)));
    assert_eq!(child.path, "plan.md");
}

#[test]
fn reconcile_text_is_idempotent() {
    let (_dir, db) = setup_db();
    let once = reconcile_text(&db, "- [ ] a\n- [x] b\n", "t.md", Mode::Write).unwrap();
    let twice = reconcile_text(&db, &once, "t.md", Mode::Write).unwrap();
    assert_eq!(once, twice);
    assert_eq!(db.connect().unwrap().list_all().unwrap().len(), 2);
}

#[test]
fn reconcile_text_without_trailing_newline() {
    let (_dir, db) = setup_db();
    let out = reconcile_text(&db, "just prose", "t.md", Mode::Write).unwrap();
    assert_eq!(out, "just prose");
}

#[test]
fn reconcile_text_read_mode_repaints_from_store() {
    let (_dir, db) = setup_db();
    let written = reconcile_text(&db, "- [ ] call mom\n", "t.md", Mode::Write).unwrap();

    let mut store = db.connect().unwrap();
    let mut todo = store.get_by_id(TodoId::new(1)).unwrap().unwrap();
    todo.status = TodoStatus::Done;
    store.update(&todo).unwrap();
    drop(store);

    let read = reconcile_text(&db, &written, "t.md", Mode::Read).unwrap();

    assert_eq!(read, "-%1% [x] call mom\n");
}

#[test]
fn reconcile_text_drops_deleted_lines() {
    let (_dir, db) = setup_db();
    let written = reconcile_text(&db, "- [ ] keep\n- [ ] drop\n", "t.md", Mode::Write).unwrap();
    let marked = written.replace("-%2% [ ]", "-%2% [d]");

    let out = reconcile_text(&db, &marked, "t.md", Mode::Write).unwrap();

    assert_eq!(out, "-%1% [ ] keep\n");
    assert!(db.connect().unwrap().get_by_id(TodoId::new(2)).unwrap().is_none());
}

#[test]
fn reconcile_text_reports_duplicates() {
    let (_dir, db) = setup_db();
    insert(&db, NewTodo::new("same"));
    insert(&db, NewTodo::new("same"));

    let err = reconcile_text(&db, "- [ ] same\n", "t.md", Mode::Write).unwrap_err();

    assert!(err.to_string().contains("DB inconsistency"));
}

// ===========================================
// collect_files tests
// ===========================================

#[test]
fn collect_files_expands_directories() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("b.md"), "").unwrap();
    std::fs::write(dir.path().join("a.md"), "").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "").unwrap();
    let single = dir.path().join("notes.txt");

    let files = collect_files(&[dir.path().to_path_buf(), single.clone()]).unwrap();

    assert_eq!(
        files,
        vec![dir.path().join("a.md"), dir.path().join("b.md"), single]
    );
}

// ===========================================
// load / search / show tests
// ===========================================

#[test]
fn load_lines_escape_doubles_percent() {
    let (_dir, db) = setup_db();
    insert(&db, NewTodo::new("todo yyy"));

    assert_eq!(load_lines(&db, false).unwrap(), vec!["-%1% [ ] todo yyy"]);
    assert_eq!(load_lines(&db, true).unwrap(), vec!["-%%1%% [ ] todo yyy"]);
}

#[test]
fn search_todos_filters_inactive() {
    let (_dir, db) = setup_db();
    insert(&db, NewTodo::new("water plants"));
    insert(&db, NewTodo::new("water lawn").status(TodoStatus::Done));
    let store = db.connect().unwrap();

    let all = search_todos(&store, "water", false).unwrap();
    let active = search_todos(&store, "water", true).unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].todo, "water plants");
}

#[test]
fn format_todo_uses_buffer_form() {
    let (_dir, db) = setup_db();
    let mut tags = TagSet::new();
    tags.insert("home".parse().unwrap());
    let id = insert(&db, NewTodo::new("fix door").tags(tags));

    let todo = db.connect().unwrap().get_by_id(id).unwrap().unwrap();

    assert_eq!(format_todo(&todo), "-%1% [ ] fix door{t:home}");
}

#[test]
fn todo_detail_includes_hierarchy() {
    let (_dir, db) = setup_db();
    let root = insert(&db, NewTodo::new("root"));
    let mid = insert(&db, NewTodo::new("mid").parent(Some(root)));
    let leaf = insert(&db, NewTodo::new("leaf").parent(Some(mid)));
    let store = db.connect().unwrap();

    let detail = todo_detail(&store, leaf).unwrap();
    assert_eq!(detail.depth, 2);
    assert_eq!(detail.ancestors, vec![mid.get(), root.get()]);
    assert_eq!(detail.overall_status, None);

    let detail = todo_detail(&store, mid).unwrap();
    assert_eq!(detail.overall_status.as_deref(), Some("open"));
}

#[test]
fn todo_detail_unknown_id() {
    let (_dir, db) = setup_db();
    let store = db.connect().unwrap();
    let err = todo_detail(&store, TodoId::new(42)).unwrap_err();
    assert_eq!(err.to_string(), "todo not found: %42%");
}

// ===========================================
// handle_open_impl tests
// ===========================================

struct MockEditor {
    opened: RefCell<Option<(PathBuf, Option<String>)>>,
    should_fail: bool,
}

impl MockEditor {
    fn new() -> Self {
        Self {
            opened: RefCell::new(None),
            should_fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }
}

impl EditorLauncher for MockEditor {
    fn open(&self, path: &Path, anchor: Option<&str>) -> Result<()> {
        *self.opened.borrow_mut() = Some((path.to_path_buf(), anchor.map(str::to_string)));
        if self.should_fail {
            bail!("editor failed to open");
        }
        Ok(())
    }
}

#[derive(Default)]
struct MockOpener {
    opened: RefCell<Vec<String>>,
}

impl Opener for MockOpener {
    fn open(&self, target: &str) {
        self.opened.borrow_mut().push(target.to_string());
    }
}

fn open_args(uri: &str, bookmark: bool) -> OpenArgs {
    OpenArgs {
        uri: uri.to_string(),
        bookmark,
    }
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn open_url_goes_to_system_opener() {
    let editor = MockEditor::new();
    let opener = MockOpener::default();

    let opened = handle_open_impl(
        &open_args("https://example.com/a#frag", false),
        &MimeRules::builtin(),
        &editor,
        &opener,
        None,
        no_env,
    )
    .unwrap();

    assert_eq!(opened, Opened::System("https://example.com/a#frag".to_string()));
    assert_eq!(*opener.opened.borrow(), vec!["https://example.com/a#frag"]);
    assert!(editor.opened.borrow().is_none());
}

#[test]
fn open_markdown_goes_to_editor_with_anchor() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("plan.md");
    std::fs::write(&file, "# Todo\n").unwrap();
    let editor = MockEditor::new();
    let opener = MockOpener::default();
    let uri = format!("{}#Todo", file.display());

    let opened = handle_open_impl(
        &open_args(&uri, false),
        &MimeRules::builtin(),
        &editor,
        &opener,
        None,
        no_env,
    )
    .unwrap();

    assert_eq!(opened, Opened::Editor(file.clone()));
    assert_eq!(
        *editor.opened.borrow(),
        Some((file, Some("#Todo".to_string())))
    );
    assert!(opener.opened.borrow().is_empty());
}

#[test]
fn open_binary_file_goes_to_system_opener() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("scan.pdf");
    std::fs::write(&file, "").unwrap();
    let opener = MockOpener::default();
    let root = dir.path().to_str().unwrap().to_string();

    let opened = handle_open_impl(
        &open_args("$DOCS/scan.pdf", false),
        &MimeRules::builtin(),
        &MockEditor::new(),
        &opener,
        None,
        |name: &str| (name == "DOCS").then(|| root.clone()),
    )
    .unwrap();

    assert_eq!(opened, Opened::System(file.display().to_string()));
}

#[test]
fn open_reports_unset_variable() {
    let err = handle_open_impl(
        &open_args("$NOPE/file.md", false),
        &MimeRules::builtin(),
        &MockEditor::new(),
        &MockOpener::default(),
        None,
        no_env,
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "$NOPE not set in environment, cannot proceed");
}

#[test]
fn open_propagates_editor_failure() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "").unwrap();

    let result = handle_open_impl(
        &open_args(file.to_str().unwrap(), false),
        &MimeRules::builtin(),
        &MockEditor::failing(),
        &MockOpener::default(),
        None,
        no_env,
    );

    assert!(result.is_err());
}

#[test]
fn open_with_bookmark_records_url() {
    let mut bookmarks = SqliteBookmarks::open_in_memory().unwrap();

    handle_open_impl(
        &open_args("https://docs.rs", true),
        &MimeRules::builtin(),
        &MockEditor::new(),
        &MockOpener::default(),
        Some(&mut bookmarks),
        no_env,
    )
    .unwrap();

    let id = bookmarks.find_by_url("https://docs.rs").unwrap().unwrap();
    assert_eq!(bookmarks.tags_of(id).unwrap().as_deref(), Some(MANAGED_TAG));
}

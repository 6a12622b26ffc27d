//! Collaborators around the core: documents on disk, link targets, MIME
//! rules, the OS opener and bookmarks.

pub mod bookmarks;
pub mod fs;
pub mod mime;
pub mod opener;
pub mod uri;

pub use fs::{FsError, read_document, scan_markdown_files, write_document};

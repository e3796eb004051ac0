//! Flat-file note storage: one file per note, named by its normalized title.

use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{AgentError, AgentResult};

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub title: String,
    pub body: String,
}

/// Listing entry for a stored note.
#[derive(Debug, Clone)]
pub struct NoteSummary {
    pub title: String,
    pub modified: Option<DateTime<Local>>,
}

#[derive(Debug, Clone)]
pub struct NoteStore {
    dir: PathBuf,
    extension: String,
}

impl NoteStore {
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_lowercase(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Normalize a user-supplied title into the on-disk stem.
    ///
    /// A trailing copy of the note extension is dropped, the rest is
    /// lowercased, spaces and path separators become `_`, and characters
    /// unsafe in filenames are removed.
    pub fn normalize_title(&self, title: &str) -> AgentResult<String> {
        let mut title = title.trim();
        let suffix = format!(".{}", self.extension);
        if title.len() > suffix.len()
            && title.is_char_boundary(title.len() - suffix.len())
            && title[title.len() - suffix.len()..].eq_ignore_ascii_case(&suffix)
        {
            title = &title[..title.len() - suffix.len()];
        }

        let stem: String = title
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| ![':', '*', '?', '"', '<', '>', '|'].contains(c) && !c.is_control())
            .map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
            .collect();

        if stem.is_empty() || stem.chars().all(|c| c == '.') {
            return Err(AgentError::Validation(format!(
                "'{}' is not a usable note title",
                title
            )));
        }

        Ok(stem)
    }

    pub fn filename_for(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension)
    }

    /// Write a new note. Never overwrites an existing file.
    ///
    /// The body is written to a temporary file in the notes directory and
    /// then moved into place without clobbering, so a failed write leaves
    /// nothing behind.
    pub fn create(&self, title: &str, body: &str) -> AgentResult<String> {
        self.create_with(title, |file| file.write_all(body.as_bytes()))
    }

    fn create_with<F>(&self, title: &str, write_body: F) -> AgentResult<String>
    where
        F: FnOnce(&mut File) -> std::io::Result<()>,
    {
        let stem = self.normalize_title(title)?;
        let filename = self.filename_for(&stem);
        let path = self.dir.join(&filename);

        std::fs::create_dir_all(&self.dir)?;
        if path.exists() {
            return Err(AgentError::DuplicateNote(stem));
        }

        let mut staged = tempfile::Builder::new()
            .prefix(".note-")
            .suffix(".partial")
            .tempfile_in(&self.dir)?;
        write_body(staged.as_file_mut())?;
        staged.as_file().sync_all()?;

        match staged.persist_noclobber(&path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                return Err(AgentError::DuplicateNote(stem));
            }
            Err(e) => return Err(e.error.into()),
        }

        log::info!("NoteStore: created {}", path.display());
        Ok(filename)
    }

    pub fn read(&self, title: &str) -> AgentResult<Note> {
        let stem = self.normalize_title(title)?;
        let path = self.dir.join(self.filename_for(&stem));

        match std::fs::read_to_string(&path) {
            Ok(body) => Ok(Note { title: stem, body }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AgentError::NotFound(stem)),
            Err(e) => Err(e.into()),
        }
    }

    /// List stored notes sorted by title. A missing directory is empty.
    pub fn list(&self) -> AgentResult<Vec<NoteSummary>> {
        if !self.dir.exists() {
            log::info!("NoteStore: directory does not exist yet: {}", self.dir.display());
            return Ok(Vec::new());
        }

        let mut notes = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("NoteStore: failed to read dir entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let matches_extension = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension));
            if !matches_extension {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let file_name = entry.file_name();
            let readable = self.normalize_title(stem).is_ok_and(|normalized| {
                file_name.to_str() == Some(self.filename_for(&normalized).as_str())
            });
            if !readable {
                log::warn!(
                    "NoteStore: skipping {}: not a normalized note name",
                    path.display()
                );
                continue;
            }

            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Local>::from);

            notes.push(NoteSummary {
                title: stem.to_string(),
                modified,
            });
        }

        notes.sort_by(|a, b| a.title.cmp(&b.title));
        log::info!("NoteStore: found {} notes", notes.len());
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, NoteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path(), ".txt");
        (dir, store)
    }

    #[test]
    fn test_normalize_title() {
        let (_dir, store) = store();
        assert_eq!(store.normalize_title("Meeting Tomorrow").unwrap(), "meeting_tomorrow");
        assert_eq!(store.normalize_title("meeting tomorrow.TXT").unwrap(), "meeting_tomorrow");
        assert_eq!(store.normalize_title("a/b\\c").unwrap(), "a_b_c");
        assert_eq!(store.normalize_title("What? Now: <yes>").unwrap(), "what_now_yes");
        assert!(store.normalize_title("   ").is_err());
        assert!(store.normalize_title("..").is_err());
        assert!(store.normalize_title("???").is_err());
    }

    #[test]
    fn test_create_then_read_returns_body() {
        let (_dir, store) = store();
        let filename = store.create("Waldo", "finding waldo is hard").unwrap();
        assert_eq!(filename, "waldo.txt");

        let note = store.read("waldo").unwrap();
        assert_eq!(note.title, "waldo");
        assert_eq!(note.body, "finding waldo is hard");
    }

    #[test]
    fn test_create_duplicate_never_overwrites() {
        let (_dir, store) = store();
        store.create("ideas", "first").unwrap();

        let err = store.create("Ideas", "second").unwrap_err();
        assert!(matches!(err, AgentError::DuplicateNote(ref t) if t == "ideas"));
        assert_eq!(store.read("ideas").unwrap().body, "first");
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.read("ghost"), Err(AgentError::NotFound(ref t)) if t == "ghost"));
    }

    #[test]
    fn test_list_empty_and_after_creates() {
        let (dir, store) = store();
        assert!(store.list().unwrap().is_empty());

        store.create("beta", "b").unwrap();
        store.create("alpha", "a").unwrap();
        store.create("gamma", "g").unwrap();
        std::fs::write(dir.path().join("stray.md"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("folder.txt")).unwrap();

        let titles: Vec<String> = store.list().unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("not-yet"), "txt");
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_makes_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("fresh"), "txt");
        store.create("first", "hello").unwrap();
        assert_eq!(store.read("first").unwrap().body, "hello");
    }

    #[test]
    fn test_failed_write_leaves_no_file_behind() {
        let (dir, store) = store();

        let err = store
            .create_with("big", |_| {
                Err(std::io::Error::new(ErrorKind::Other, "File too large"))
            })
            .unwrap_err();
        assert!(matches!(err, AgentError::Io(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(matches!(store.read("big"), Err(AgentError::NotFound(_))));

        store.create("big", "full body").unwrap();
        assert_eq!(store.read("big").unwrap().body, "full body");
    }

    #[test]
    fn test_list_skips_names_that_cannot_be_read_back() {
        let (dir, store) = store();
        store.create("project_plan", "plan").unwrap();
        std::fs::write(dir.path().join("Project Plan.txt"), "by hand").unwrap();
        std::fs::write(dir.path().join("shouty.TXT"), "upper-case extension").unwrap();

        let listed = store.list().unwrap();
        let titles: Vec<&str> = listed.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["project_plan"]);
        for note in &listed {
            assert!(store.read(&note.title).is_ok());
        }
    }
}

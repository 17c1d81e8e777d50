// SPDX-License-Identifier: MPL-2.0
//! Markdown note editing over a directory of files.
//!
//! The [`Editor`] lists the markdown files of a chosen directory and keeps
//! the working copy of the selected note: its title (file name) and content.
//! Saving writes the content and, when the title changed, renames the file.

mod date;
mod fs;

pub use date::format_date;
pub use fs::{
    DirectoryHandle, DirectoryPicker, FileHandle, FileSystem, FixedDirectory, LocalFileSystem,
    NoteEntry,
};

use crate::app::config::SortOrder;
use crate::error::{Error, Result};
use std::path::Path;

/// Extensions recognised as markdown.
const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Base name used for new notes.
const UNTITLED: &str = "Untitled";

/// Checks if a file name has a markdown extension (case-insensitive).
#[must_use]
pub fn is_markdown(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Candidate name for the n-th new note: `Untitled.md`, `Untitled1.md`, ...
fn untitled_name(n: u64) -> String {
    if n == 0 {
        format!("{UNTITLED}.md")
    } else {
        format!("{UNTITLED}{n}.md")
    }
}

fn validate_file_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || name.contains(['/', '\\'])
        || !is_markdown(name)
    {
        return Err(Error::InvalidFileName(name.to_string()));
    }
    Ok(())
}

fn sort_entries(entries: &mut [NoteEntry], sort_order: SortOrder) {
    match sort_order {
        SortOrder::Alphabetical => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOrder::ModifiedDate => entries.sort_by(|a, b| a.modified.cmp(&b.modified)),
        SortOrder::CreatedDate => entries.sort_by(|a, b| a.created.cmp(&b.created)),
    }
}

/// Working state of the note editor.
#[derive(Debug)]
pub struct Editor<F> {
    fs: F,
    sort_order: SortOrder,
    directory: Option<DirectoryHandle>,
    files: Vec<NoteEntry>,
    selected: Option<NoteEntry>,
    title: String,
    content: String,
    initial_content: String,
}

impl<F: FileSystem> Editor<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            sort_order: SortOrder::default(),
            directory: None,
            files: Vec::new(),
            selected: None,
            title: String::new(),
            content: String::new(),
            initial_content: String::new(),
        }
    }

    #[must_use]
    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Asks `picker` for a directory and lists its markdown files.
    ///
    /// Returns `Ok(false)` if the user cancelled; the current state is kept.
    pub fn load_files(&mut self, picker: &mut dyn DirectoryPicker) -> Result<bool> {
        let Some(directory) = picker.pick()? else {
            return Ok(false);
        };
        self.open_directory(directory)?;
        Ok(true)
    }

    /// Switches to `directory`, dropping the current selection.
    pub fn open_directory(&mut self, directory: DirectoryHandle) -> Result<()> {
        let files = self.scan(&directory)?;
        tracing::debug!(
            directory = %directory.path().display(),
            count = files.len(),
            "opened notes directory"
        );
        self.directory = Some(directory);
        self.files = files;
        self.clear_selection();
        Ok(())
    }

    /// Lists the current directory again.
    pub fn refresh(&mut self) -> Result<()> {
        let directory = self.directory.clone().ok_or(Error::NoDirectory)?;
        self.files = self.scan(&directory)?;
        Ok(())
    }

    #[must_use]
    pub fn is_folder_selected(&self) -> bool {
        self.directory.is_some()
    }

    #[must_use]
    pub fn directory(&self) -> Option<&DirectoryHandle> {
        self.directory.as_ref()
    }

    /// Markdown files of the current directory.
    #[must_use]
    pub fn files(&self) -> &[NoteEntry] {
        &self.files
    }

    #[must_use]
    pub fn selected(&self) -> Option<&NoteEntry> {
        self.selected.as_ref()
    }

    /// Title being edited; saved as the file name.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Whether the content differs from what was last loaded or saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.content != self.initial_content
    }

    /// Selects a listed file and loads its current content from disk.
    pub fn select(&mut self, handle: &FileHandle) -> Result<()> {
        let entry = self
            .files
            .iter()
            .find(|entry| &entry.handle == handle)
            .cloned()
            .ok_or_else(|| Error::NotFound(handle.name()))?;

        let content = self.fs.read(&entry.handle)?;

        self.title = entry.name.clone();
        self.selected = Some(entry);
        self.initial_content = content.clone();
        self.content = content;
        Ok(())
    }

    /// Writes the content of the selected file.
    ///
    /// If the title changed, the new name is checked before anything is
    /// written and the file is renamed after the write. The listing entry is
    /// located by the pre-rename handle; if it is missing the directory is
    /// listed again so the listing never keeps a stale name.
    pub fn save(&mut self) -> Result<()> {
        let selected = self.selected.clone().ok_or(Error::NoFileSelected)?;
        let renaming = self.title != selected.name;

        if renaming {
            validate_file_name(&self.title)?;
            let directory = self.directory.as_ref().ok_or(Error::NoDirectory)?;
            if self.fs.exists(directory, &self.title) {
                return Err(Error::AlreadyExists(self.title.clone()));
            }
        }

        self.fs.write(&selected.handle, &self.content)?;

        let handle = if renaming {
            let renamed = self.fs.rename(&selected.handle, &self.title)?;
            tracing::debug!(from = %selected.name, to = %self.title, "renamed note");
            renamed
        } else {
            selected.handle.clone()
        };

        let updated = self.fs.stat(&handle)?;
        match self
            .files
            .iter()
            .position(|entry| entry.handle == selected.handle)
        {
            Some(index) => {
                self.files[index] = updated.clone();
                sort_entries(&mut self.files, self.sort_order);
            }
            None => self.refresh()?,
        }

        self.title = updated.name.clone();
        self.selected = Some(updated);
        self.initial_content = self.content.clone();
        Ok(())
    }

    /// Creates the first free `Untitled*.md` note, lists it and selects it.
    pub fn create_new_file(&mut self) -> Result<FileHandle> {
        let directory = self.directory.clone().ok_or(Error::NoDirectory)?;
        let name = self.next_untitled_name(&directory);

        let handle = self.fs.create(&directory, &name)?;
        let entry = self.fs.stat(&handle)?;
        self.files.push(entry);
        self.select(&handle)?;
        Ok(handle)
    }

    /// Deletes the selected file and clears the selection.
    pub fn delete_selected_file(&mut self) -> Result<()> {
        let selected = self.selected.clone().ok_or(Error::NoFileSelected)?;

        self.fs.delete(&selected.handle)?;
        self.files.retain(|entry| entry.handle != selected.handle);
        self.clear_selection();
        Ok(())
    }

    fn next_untitled_name(&self, directory: &DirectoryHandle) -> String {
        (0..)
            .map(untitled_name)
            .find(|name| {
                !self.fs.exists(directory, name) && !self.files.iter().any(|e| &e.name == name)
            })
            .unwrap_or_else(|| untitled_name(u64::MAX))
    }

    fn scan(&self, directory: &DirectoryHandle) -> Result<Vec<NoteEntry>> {
        let mut files: Vec<NoteEntry> = self
            .fs
            .list(directory)?
            .into_iter()
            .filter(|entry| is_markdown(&entry.name))
            .collect();
        sort_entries(&mut files, self.sort_order);
        Ok(files)
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.title.clear();
        self.content.clear();
        self.initial_content.clear();
    }
}

//! Template documents kept in a folder of markdown files.
//!
//! A template is named by its file stem. `travel` resolves to `<folder>/travel.md` when that
//! exists and otherwise to the first `travel.md` found in a subfolder.

use crate::error::ChatError;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Source of template documents.
pub trait TemplateStore {
    /// Names of every available template, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list(&self) -> Result<Vec<String>, ChatError>;

    /// Raw text of the template called `name`, or `None` if there is no such template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template exists but cannot be read.
    fn load(&self, name: &str) -> Result<Option<String>, ChatError>;
}

#[derive(Clone, Debug)]
/// Templates stored as `.md` files anywhere below a folder.
pub struct FolderTemplates {
    root: PathBuf,
}

impl FolderTemplates {
    #[must_use]
    /// Store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn markdown_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkBuilder::new(&self.root)
            .standard_filters(true)
            .build()
            .flatten()
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(ignore::DirEntry::into_path)
            .filter(|path| is_markdown(path))
            .collect();
        files.sort();
        files
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

fn stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

impl TemplateStore for FolderTemplates {
    fn list(&self) -> Result<Vec<String>, ChatError> {
        if !self.root.is_dir() {
            tracing::warn!(folder = %self.root.display(), "template folder does not exist");
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = self.markdown_files().iter().filter_map(|p| stem(p)).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<Option<String>, ChatError> {
        let direct = self.root.join(format!("{name}.md"));
        let path = if direct.is_file() {
            Some(direct)
        } else {
            self.markdown_files()
                .into_iter()
                .find(|path| stem(path).as_deref() == Some(name))
        };
        let Some(path) = path else {
            tracing::debug!(template = name, "template not found");
            return Ok(None);
        };
        let text = fs::read_to_string(&path)?;
        tracing::debug!(template = name, path = %path.display(), "template loaded");
        Ok(Some(text))
    }
}

#[derive(Clone, Copy, Debug, Default)]
/// Store used when no template folder is configured.
pub struct NoTemplates;

impl TemplateStore for NoTemplates {
    fn list(&self) -> Result<Vec<String>, ChatError> {
        Ok(Vec::new())
    }

    fn load(&self, _name: &str) -> Result<Option<String>, ChatError> {
        Ok(None)
    }
}

/// Folders below `root` (itself included, as `/`), relative to it and sorted.
///
/// # Errors
///
/// Returns an error if `root` is not a readable directory.
pub fn list_folders(root: &Path) -> Result<Vec<String>, ChatError> {
    fs::read_dir(root)?;
    let mut folders: Vec<String> = WalkBuilder::new(root)
        .standard_filters(true)
        .build()
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_dir()))
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            if relative.as_os_str().is_empty() {
                Some("/".to_string())
            } else {
                Some(relative.to_string_lossy().replace('\\', "/"))
            }
        })
        .collect();
    folders.sort();
    Ok(folders)
}

#[cfg(test)]
#[path = "tests/template.rs"]
mod tests;

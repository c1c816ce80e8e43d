//! Stream-transportable file objects
//!
//! A [`FileObject`] is the vinyl-style shape every document record is
//! wrapped in before it travels down a push stream: a path resolved against
//! a `cwd` and `base`, optional byte contents and whatever extra fields the
//! record carried.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    cwd: PathBuf,
    base: Option<PathBuf>,
    history: Vec<PathBuf>,
    contents: Option<Vec<u8>>,
    data: Map<String, Value>,
}

impl FileObject {
    /// Create a file object for `path` with no contents
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            history: vec![path.into()],
            ..Self::empty()
        }
    }

    /// Create a path-less, content-less file object
    pub fn empty() -> Self {
        Self {
            cwd: PathBuf::from("."),
            base: None,
            history: Vec::new(),
            contents: None,
            data: Map::new(),
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Base directory; defaults to `cwd`
    pub fn base(&self) -> &Path {
        self.base.as_deref().unwrap_or(&self.cwd)
    }

    /// Current path, i.e. the last entry in the path history
    pub fn path(&self) -> Option<&Path> {
        self.history.last().map(PathBuf::as_path)
    }

    /// Every path this file has had, oldest first
    pub fn history(&self) -> &[PathBuf] {
        &self.history
    }

    /// Change the path, keeping the previous one in the history
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if self.path() != Some(path.as_path()) {
            self.history.push(path);
        }
    }

    /// Path relative to `base`, or the path itself when it lies outside of it
    pub fn relative(&self) -> Option<PathBuf> {
        let path = self.path()?;
        let relative = if path.is_absolute() || self.base.is_some() {
            path.strip_prefix(self.base()).unwrap_or(path)
        } else {
            path
        };
        Some(relative.to_path_buf())
    }

    pub fn dirname(&self) -> Option<&Path> {
        self.path().and_then(Path::parent)
    }

    pub fn basename(&self) -> Option<&str> {
        self.path()?.file_name()?.to_str()
    }

    pub fn stem(&self) -> Option<&str> {
        self.path()?.file_stem()?.to_str()
    }

    /// Extension including the leading dot, e.g. `.hbs`
    pub fn extname(&self) -> Option<String> {
        let ext = self.path()?.extension()?.to_str()?;
        Some(format!(".{}", ext))
    }

    /// Replace the extension; accepts `.html` or `html`
    pub fn set_extname(&mut self, ext: &str) {
        if let Some(path) = self.path() {
            let next = path.with_extension(ext.trim_start_matches('.'));
            self.set_path(next);
        }
    }

    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }

    /// Contents as UTF-8, if present and valid
    pub fn contents_str(&self) -> Option<&str> {
        self.contents()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn set_contents(&mut self, contents: Option<Vec<u8>>) {
        self.contents = contents;
    }

    /// True when the file carries no contents
    pub fn is_null(&self) -> bool {
        self.contents.is_none()
    }

    /// Extra record fields carried along with the file
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }
}

impl Default for FileObject {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_parts() {
        let file = FileObject::new("templates/pages/about.hbs");
        assert_eq!(file.basename(), Some("about.hbs"));
        assert_eq!(file.stem(), Some("about"));
        assert_eq!(file.extname().as_deref(), Some(".hbs"));
        assert_eq!(file.dirname(), Some(Path::new("templates/pages")));
    }

    #[test]
    fn test_relative_to_base() {
        let file = FileObject::new("/site/templates/about.hbs")
            .with_cwd("/site")
            .with_base("/site/templates");
        assert_eq!(file.relative(), Some(PathBuf::from("about.hbs")));

        let outside = FileObject::new("/elsewhere/x.md").with_cwd("/site");
        assert_eq!(outside.relative(), Some(PathBuf::from("/elsewhere/x.md")));
    }

    #[test]
    fn test_set_extname_keeps_history() {
        let mut file = FileObject::new("one.hbs");
        file.set_extname(".html");
        assert_eq!(file.path(), Some(Path::new("one.html")));
        assert_eq!(file.history().len(), 2);

        // Setting the same path again is a no-op
        file.set_path("one.html");
        assert_eq!(file.history().len(), 2);
    }

    #[test]
    fn test_null_file() {
        let file = FileObject::empty();
        assert!(file.is_null());
        assert_eq!(file.path(), None);
        assert_eq!(file.relative(), None);
    }
}

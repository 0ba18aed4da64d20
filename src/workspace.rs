//! The directory a command runs against.
//!
//! A [`Workspace`] stands in for the process working directory: the
//! configuration lives at `<root>/.rulebased/config.json` and relative
//! source paths resolve against `root`. The CLI builds one from `--dir`
//! (or the current directory) and hands it to every component.

use std::path::{Path, PathBuf};

use crate::config::ConfigStore;

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace rooted at the process working directory.
    pub fn current() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(&self.root)
    }
}

//! Config trees on disk for esq-config unit tests.

use std::{fs, path::PathBuf};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A temporary project tree with its own home directory for the global config.
pub struct ConfigTree {
    /// Owned temporary directory, removed on drop.
    root: TempDir,
}

impl ConfigTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Location of the global config inside the tree's home directory.
    pub fn global_path(&self) -> PathBuf {
        self.home().join(CONFIG_FILENAME)
    }

    /// The tree's home directory, created on demand.
    pub fn home(&self) -> PathBuf {
        self.dir("home")
    }

    /// Creates `rel_dir` (and its parents) and returns its path.
    pub fn dir(&self, rel_dir: &str) -> PathBuf {
        let dir = self.root.path().join(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes `.esq.toml` with `contents` into `rel_dir`.
    pub fn config(&self, rel_dir: &str, contents: &str) -> PathBuf {
        let path = self.dir(rel_dir).join(CONFIG_FILENAME);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Writes a config that only sets the page size, so each file's contribution is visible.
    pub fn sized(&self, rel_dir: &str, size: usize) -> PathBuf {
        self.config(rel_dir, &format!("[page]\nsize = {size}\n"))
    }

    /// Writes a `root = true` config that sets the page size.
    pub fn root_config(&self, rel_dir: &str, size: usize) -> PathBuf {
        self.config(rel_dir, &format!("root = true\n\n[page]\nsize = {size}\n"))
    }

    /// Writes the global config.
    pub fn global(&self, contents: &str) -> PathBuf {
        let path = self.global_path();
        fs::write(&path, contents).unwrap();
        path
    }
}

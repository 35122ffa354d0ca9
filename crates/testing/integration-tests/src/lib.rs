//! Integration test utilities for the oc pipeline

use anyhow::{Context, Result};
use oc_driver::{Config, Outputs, Session};
use oc_span::FileId;
use oc_syntax::{Node, TreeBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the JSON tree fixtures
#[must_use]
pub fn trees_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("trees")
}

/// Every `.json` fixture under [`trees_dir`], sorted by name
///
/// # Errors
///
/// Returns an error if the directory cannot be read
pub fn tree_fixtures() -> Result<Vec<PathBuf>> {
    let dir = trees_dir();
    let mut trees = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            trees.push(path);
        }
    }
    trees.sort();
    Ok(trees)
}

/// Test fixture helper: one session plus a scratch output directory
pub struct TestFixture {
    /// Session every compilation runs in
    pub session: Session,
    /// Scratch directory removed when the fixture is dropped
    pub out_dir: tempfile::TempDir,
}

impl TestFixture {
    /// Fixture with the default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch directory cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Fixture with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch directory cannot be created
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            session: Session::new(config),
            out_dir: tempfile::tempdir()?,
        })
    }

    /// Build a tree by hand and compile it
    pub fn compile_built(&self, build: impl FnOnce(&TreeBuilder<'_>) -> Vec<Node>) -> Outputs {
        let mut root = self.build(build);
        self.session.compile(&mut root)
    }

    /// Build a tree by hand without compiling it
    pub fn build(&self, build: impl FnOnce(&TreeBuilder<'_>) -> Vec<Node>) -> Node {
        let b = self.session.builder(FileId(0));
        let items = build(&b);
        b.root("test.oc", items)
    }

    /// Compile a fixture from [`trees_dir`] by file name
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture cannot be read or loaded
    pub fn compile_fixture(&self, name: &str) -> Result<Outputs> {
        self.session.compile_file(&trees_dir().join(name))
    }

    /// Compile a fixture and write its outputs into the scratch directory
    ///
    /// # Errors
    ///
    /// Returns an error if compiling or writing fails
    pub fn build_fixture(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let outputs = self.session.compile_file(path)?;
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .context("fixture without a file name")?;
        outputs.write_to(self.out_dir.path(), stem, &self.session.config().emit)
    }
}

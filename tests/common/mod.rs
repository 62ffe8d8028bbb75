// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace holding a rules file, a
// source tree and a destination directory, plus a fluent builder so each
// integration test can lay out its dotfiles without repeating filesystem
// boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use clap::Parser as _;
use dot_templater::cli::Cli;
use dot_templater::commands;
use dot_templater::logging::Logger;

/// Lay out the empty skeleton every test starts from inside `root`.
///
/// Creates:
/// - `rules` : empty rules file
/// - `src/`  : dotfiles source tree
/// - `dest/` : destination directory
pub fn setup_minimal_workspace(root: &Path) {
    std::fs::write(root.join("rules"), "").expect("write rules");
    std::fs::create_dir_all(root.join("src")).expect("create src dir");
    std::fs::create_dir_all(root.join("dest")).expect("create dest dir");
}

/// An isolated templating workspace backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory containing the workspace.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with an empty rules file and empty trees.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        setup_minimal_workspace(root.path());
        Self { root }
    }

    /// Path to the rules file.
    pub fn rules_path(&self) -> PathBuf {
        self.root.path().join("rules")
    }

    /// Path to the source tree.
    pub fn src_path(&self) -> PathBuf {
        self.root.path().join("src")
    }

    /// Path to the destination directory.
    pub fn dest_path(&self) -> PathBuf {
        self.root.path().join("dest")
    }

    /// Path of `relative` inside the destination directory.
    pub fn dest_file(&self, relative: &str) -> PathBuf {
        self.dest_path().join(relative)
    }

    /// Read `relative` from the destination directory as text.
    pub fn read_dest(&self, relative: &str) -> String {
        std::fs::read_to_string(self.dest_file(relative)).expect("read dest file")
    }

    /// Arguments for a tree run, followed by `extra`.
    pub fn tree_args(&self, extra: &[&str]) -> Vec<String> {
        let mut args = vec![
            "dot-templater".to_string(),
            self.rules_path().display().to_string(),
            self.src_path().display().to_string(),
            self.dest_path().display().to_string(),
        ];
        args.extend(extra.iter().map(ToString::to_string));
        args
    }

    /// Run the templater in-process over the source tree.
    pub fn run(&self, extra: &[&str]) -> (anyhow::Result<()>, Logger) {
        let cli = Cli::parse_from(self.tree_args(extra));
        let log = Logger::new();
        let result = commands::run(&cli, &log);
        (result, log)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to customise the workspace before the context is
/// finalised without modifying the shared setup.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by an empty workspace.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Overwrite the rules file with `content`.
    pub fn with_rules(self, content: &str) -> Self {
        std::fs::write(self.ctx.rules_path(), content).expect("write rules");
        self
    }

    /// Write `content` to `src/<relative>`, creating parent directories.
    pub fn with_source_file(self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        write_with_parents(&self.ctx.src_path().join(relative), content.as_ref());
        self
    }

    /// Write `content` to `dest/<relative>`, creating parent directories.
    pub fn with_dest_file(self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        write_with_parents(&self.ctx.dest_path().join(relative), content.as_ref());
        self
    }

    /// Create an empty directory at `src/<relative>`.
    pub fn with_source_dir(self, relative: &str) -> Self {
        std::fs::create_dir_all(self.ctx.src_path().join(relative)).expect("create source dir");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_with_parents(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

//! Domain-specific error types for the templater.
//!
//! Library modules return typed errors built with [`thiserror`]; the binary
//! converts them to [`anyhow::Error`] at the command boundary via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! TemplaterError
//! ├── Args(ArgsError)        : command-line validation
//! ├── Config(ConfigError)    : rules file unreadable or a SHELL value failed
//! ├── Template(TemplateError): opening, reading or writing a templated file
//! └── Tree(TreeError)        : traversal, directory mirroring, raw copies
//! ```
//!
//! There is no parse error: every rules line is valid. Only running the
//! command behind a `KEY=SHELL command` line can fail while loading.

use thiserror::Error;

/// Top-level error type for the templater.
#[derive(Error, Debug)]
pub enum TemplaterError {
    /// Invalid command-line arguments.
    #[error("Invalid arguments: {0}")]
    Args(#[from] ArgsError),

    /// Rules file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Templating a single file failed.
    #[error("Templating error: {0}")]
    Template(#[from] TemplateError),

    /// Walking or mirroring the source tree failed.
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Command-line arguments that name missing or wrong-typed paths.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgsError {
    /// The rules path is not an existing file.
    #[error("Expected first argument to be a rules file: {0}")]
    RulesNotFile(String),

    /// The source path is not an existing directory.
    #[error("Expected second argument to be a dotfiles directory: {0}")]
    SourceNotDir(String),

    /// The destination path is not an existing directory.
    #[error("Expected third argument to be a destination directory: {0}")]
    DestNotDir(String),

    /// Exactly one of source and destination was given.
    #[error("Source and destination directories must be given together")]
    UnpairedDirs,
}

/// Errors that arise from loading the rules file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The rules file is missing or unreadable.
    #[error("Error reading rules file {path}: {source}")]
    Read {
        /// Path to the rules file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The shell for a `SHELL` value could not be started.
    #[error("Cannot run shell command `{command}`: {source}")]
    Shell {
        /// Command text after `SHELL `.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The command for a `SHELL` value exited non-zero.
    #[error("Shell command `{command}` failed (exit {code}): {stderr}")]
    ShellFailed {
        /// Command text after `SHELL `.
        command: String,
        /// Exit code, or -1 if killed by a signal.
        code: i32,
        /// Trimmed standard error.
        stderr: String,
    },
}

/// Errors that arise while templating one file.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The source file cannot be opened for reading.
    #[error("Cannot open {path} for reading: {source}")]
    OpenInput {
        /// Source file path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The destination file cannot be opened for writing.
    #[error("Cannot open {path} for writing: {source}")]
    OpenOutput {
        /// Destination file path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Reading or writing failed after both files were opened.
    #[error("I/O error templating {path}: {source}")]
    Io {
        /// Path of the file being templated.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from traversal and raw file operations.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The directory walk failed.
    #[error("Cannot walk {path}: {source}")]
    Walk {
        /// Path at which the walk failed.
        path: String,
        /// Underlying walk error.
        source: walkdir::Error,
    },

    /// A destination directory could not be created.
    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A binary file could not be copied.
    #[error("Cannot copy {from} to {to}: {source}")]
    Copy {
        /// Source path.
        from: String,
        /// Destination path.
        to: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Permission bits could not be mirrored onto the destination.
    #[error("Cannot copy permissions to {path}: {source}")]
    Permissions {
        /// Destination path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

//! Templated dotfiles copier.
//!
//! Copies a tree of dotfiles into a destination directory, rewriting each
//! text file on the way: configured keys are replaced with their values and
//! feature blocks delimited by `### name` marker lines are kept or dropped
//! depending on whether the feature is enabled. Binary files are copied
//! verbatim. Without source and destination directories, standard input is
//! templated to standard output.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: parse and validate the rules file, running `SHELL` values
//!   through [`exec`]
//! - **[`substitution`]** and **[`feature`]**: the per-line transforms
//! - **[`template`]**: stream a file through both transforms
//! - **[`tree`]**: walk the source tree and mirror it at the destination
//! - **[`commands`]**: top-level orchestration (`template`, `diff`, `stdin`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod feature;
pub mod logging;
pub mod substitution;
pub mod template;
pub mod tree;

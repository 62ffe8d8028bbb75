//! Command orchestration: argument validation, rules loading and dispatch to
//! the tree, diff and stdin runners.
pub mod diff;
pub mod processing;
pub mod stdin;
pub mod template;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::{Cli, Mode};
use crate::config::Rules;
use crate::error::ArgsError;
use crate::logging::Logger;
use crate::tree::IgnoreList;

/// Source and destination roots of a tree run, both canonicalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePaths {
    /// Directory the dotfiles are read from.
    pub source: PathBuf,
    /// Directory the templated files are written to.
    pub dest: PathBuf,
}

/// Shared state produced by the common setup sequence.
///
/// Encapsulates argument validation, path canonicalisation and rules loading
/// so that each runner starts from the same checked inputs.
#[derive(Debug)]
pub struct RunSetup {
    /// Rules loaded from the rules file.
    pub rules: Rules,
    /// Tree roots, or `None` when templating standard input.
    pub tree: Option<TreePaths>,
    /// Paths relative to the source root that are skipped.
    pub ignore: IgnoreList,
    /// Whether files are processed on the rayon pool.
    pub parallel: bool,
}

impl RunSetup {
    /// Validate the arguments and load the rules file.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument names a missing or wrong-typed path,
    /// a path cannot be canonicalised, or the rules file cannot be read.
    pub fn init(cli: &Cli, log: &Logger) -> Result<Self> {
        check_args(cli)?;

        let tree = match cli.mode() {
            Mode::Stdin => None,
            Mode::Tree { source, dest } => Some(TreePaths {
                source: canonicalize(&source)?,
                dest: canonicalize(&dest)?,
            }),
        };

        let rules_path = canonicalize(&cli.rules)?;
        log.debug(&format!("rules: {}", rules_path.display()));
        let (rules, warnings) = Rules::load_checked(&rules_path)?;

        log.debug(&format!("{} substitutions", rules.substitutions.len()));
        log.debug(&format!("{} features", rules.features.len()));
        for name in rules.features.sorted() {
            log.debug(&format!("feature enabled: {name}"));
        }

        if !warnings.is_empty() {
            log.warn(&format!("found {} rules warning(s):", warnings.len()));
            for warning in &warnings {
                log.warn(&format!(
                    "  line {} [{}]: {}",
                    warning.line, warning.item, warning.message
                ));
            }
        }

        Ok(Self {
            rules,
            tree,
            ignore: IgnoreList::new(&cli.ignore),
            parallel: cli.parallel,
        })
    }
}

/// Check that every path argument exists with the right type.
///
/// # Errors
///
/// Returns the first [`ArgsError`] found, checking the rules file first.
pub fn check_args(cli: &Cli) -> Result<(), ArgsError> {
    if !cli.rules.is_file() {
        return Err(ArgsError::RulesNotFile(cli.rules.display().to_string()));
    }
    match (&cli.source, &cli.dest) {
        (None, None) => Ok(()),
        (Some(source), Some(dest)) => {
            if !source.is_dir() {
                return Err(ArgsError::SourceNotDir(source.display().to_string()));
            }
            if !dest.is_dir() {
                return Err(ArgsError::DestNotDir(dest.display().to_string()));
            }
            Ok(())
        }
        _ => Err(ArgsError::UnpairedDirs),
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).with_context(|| format!("resolving {}", path.display()))
}

/// Run the command the arguments ask for.
///
/// # Errors
///
/// Returns an error if setup fails or the selected runner fails.
pub fn run(cli: &Cli, log: &Logger) -> Result<()> {
    let setup = RunSetup::init(cli, log)?;
    match &setup.tree {
        None => {
            if cli.diff {
                log.warn("--diff has no effect when templating standard input");
            }
            stdin::run(&setup, log)
        }
        Some(paths) if cli.diff => diff::run(&setup, paths, log),
        Some(paths) => template::run(&setup, paths, log),
    }
}

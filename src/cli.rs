//! Command-line arguments.
use std::path::PathBuf;

use clap::Parser;

/// Version reported by `--version`: the build-stamped
/// `DOT_TEMPLATER_VERSION` when present, otherwise the crate version.
pub const VERSION: &str = match option_env!("DOT_TEMPLATER_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Command-line entry point.
#[derive(Parser, Debug)]
#[command(
    name = "dot-templater",
    about = "Copy a dotfiles tree, substituting keys and filtering feature blocks",
    version = VERSION,
    after_help = concat!(
        "Copy files from SRC_DIR to DEST_DIR using rules defined in RULES.\n\n",
        "Rules configuration:\n",
        "  Keys and values are separated by the first '=' in a line.\n",
        "  In each copied file, each key is replaced by the associated value.\n\n",
        "Feature configuration:\n",
        "  Any line in the rules file without an '=' is an enabled feature.\n",
        "  Blocks in dotfiles start and end with a line of three octothorpes,\n",
        "  a space and the feature name. Blocks whose feature is not enabled\n",
        "  are left out of the templated file.\n\n",
        "Without SRC_DIR and DEST_DIR, standard input is templated to standard output.",
    )
)]
pub struct Cli {
    /// Path to the rules file
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// Directory containing the dotfiles to template
    #[arg(value_name = "SRC_DIR", requires = "dest")]
    pub source: Option<PathBuf>,

    /// Directory to write templated files to
    #[arg(value_name = "DEST_DIR")]
    pub dest: Option<PathBuf>,

    /// Show what would change instead of writing files
    #[arg(short, long)]
    pub diff: bool,

    /// Paths relative to SRC_DIR to skip
    #[arg(short, long, value_name = "PATH", value_delimiter = ',')]
    pub ignore: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Template files one at a time (parallel is enabled by default)
    #[arg(long = "no-parallel", action = clap::ArgAction::SetFalse)]
    pub parallel: bool,
}

/// What the parsed arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Template standard input to standard output.
    Stdin,
    /// Template `source` into `dest`.
    Tree {
        /// Source directory.
        source: PathBuf,
        /// Destination directory.
        dest: PathBuf,
    },
}

impl Cli {
    /// Resolve the positional directories into a [`Mode`].
    ///
    /// Clap already rejects a source without a destination; the remaining
    /// case (destination only) cannot be expressed positionally.
    #[must_use]
    pub fn mode(&self) -> Mode {
        match (&self.source, &self.dest) {
            (Some(source), Some(dest)) => Mode::Tree {
                source: source.clone(),
                dest: dest.clone(),
            },
            _ => Mode::Stdin,
        }
    }
}

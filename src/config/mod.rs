//! Rules file loading: substitutions and enabled features.
pub mod parser;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::exec;
use crate::feature::FeatureSet;
use crate::substitution::SubstitutionTable;

use parser::ConfigLine;
use validation::ValidationWarning;

/// Everything a rules file configures for one templating run.
///
/// Built once before any file is templated and read-only afterwards, so a
/// single `&Rules` can be shared across worker threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rules {
    /// Path the rules were read from, if any.
    pub source: Option<PathBuf>,
    /// Substitutions in declaration order.
    pub substitutions: SubstitutionTable,
    /// Enabled features.
    pub features: FeatureSet,
}

impl Rules {
    /// Build rules from rules-file content.
    ///
    /// `KEY=SHELL command` lines run `command` through the system shell, in
    /// file order, and use its trimmed standard output as the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use dot_templater::config::Rules;
    ///
    /// let rules = Rules::parse("# personal machine\nlaptop\nNAME=Ada\n")?;
    /// assert!(rules.features.is_enabled("laptop"));
    /// assert_eq!(rules.substitutions.apply("hi NAME"), "hi Ada");
    /// # Ok::<(), dot_templater::error::ConfigError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Shell`] or [`ConfigError::ShellFailed`] if a
    /// `SHELL` command cannot be run or exits non-zero.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut rules = Self::default();
        for line in parser::parse(content) {
            match line {
                ConfigLine::Substitution { key, value } => rules.substitutions.push(key, value),
                ConfigLine::Command { key, command } => {
                    let value = exec::shell_value(&command)?;
                    rules.substitutions.push(key, value);
                }
                ConfigLine::Feature { name } => {
                    rules.features.insert(name);
                }
                ConfigLine::Comment | ConfigLine::Blank => {}
            }
        }
        Ok(rules)
    }

    /// Read and parse the rules file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read as UTF-8 text,
    /// or a shell error as described in [`Rules::parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read(path)?;
        Ok(Self::parse(&content)?.with_source(path))
    }

    /// Read and parse the rules file at `path`, also returning the advisory
    /// warnings from [`validation::validate`].
    ///
    /// # Errors
    ///
    /// Same as [`Rules::load`].
    pub fn load_checked(path: &Path) -> Result<(Self, Vec<ValidationWarning>), ConfigError> {
        let content = read(path)?;
        let warnings = validation::validate(&content);
        Ok((Self::parse(&content)?.with_source(path), warnings))
    }

    fn with_source(mut self, path: &Path) -> Self {
        self.source = Some(path.to_path_buf());
        self
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })
}

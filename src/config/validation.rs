//! Advisory checks over a rules file.
//!
//! None of these are errors: the rules grammar accepts every line. They flag
//! lines that are legal but almost certainly not what the author meant.
use std::collections::HashSet;

use super::parser::{self, ConfigLine};

/// A suspicious rules-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// 1-based line number in the rules file.
    pub line: usize,
    /// The key or feature name that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    #[must_use]
    fn new(line: usize, item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line,
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Check rules-file content and return any warnings, in line order.
///
/// # Examples
///
/// ```
/// use dot_templater::config::validation::validate;
///
/// let warnings = validate("=oops\nHOME=/home/HOME\n");
/// assert_eq!(warnings.len(), 2);
/// assert_eq!(warnings[0].line, 1);
/// ```
#[must_use]
pub fn validate(content: &str) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut keys = HashSet::new();
    let mut features = HashSet::new();

    for (index, line) in parser::parse(content).enumerate() {
        let line_num = index + 1;
        match line {
            ConfigLine::Substitution { key, value } => {
                if key.is_empty() {
                    warnings.push(ValidationWarning::new(
                        line_num,
                        key,
                        "empty key is ignored",
                    ));
                    continue;
                }
                if value.contains(&key) {
                    warnings.push(ValidationWarning::new(
                        line_num,
                        key.clone(),
                        "value contains its own key; occurrences are replaced once without rescanning",
                    ));
                }
                if !keys.insert(key.clone()) {
                    warnings.push(ValidationWarning::new(
                        line_num,
                        key,
                        "duplicate key; it only matches text introduced after the earlier entry",
                    ));
                }
            }
            ConfigLine::Command { key, .. } => {
                if key.is_empty() {
                    warnings.push(ValidationWarning::new(
                        line_num,
                        key,
                        "empty key is ignored; its command still runs",
                    ));
                    continue;
                }
                if !keys.insert(key.clone()) {
                    warnings.push(ValidationWarning::new(
                        line_num,
                        key,
                        "duplicate key; it only matches text introduced after the earlier entry",
                    ));
                }
            }
            ConfigLine::Feature { name } => {
                if name.trim() != name {
                    warnings.push(ValidationWarning::new(
                        line_num,
                        name.clone(),
                        "feature name has surrounding whitespace; markers must match it exactly",
                    ));
                }
                if !features.insert(name.clone()) {
                    warnings.push(ValidationWarning::new(
                        line_num,
                        name,
                        "feature enabled more than once",
                    ));
                }
            }
            ConfigLine::Comment | ConfigLine::Blank => {}
        }
    }

    warnings
}

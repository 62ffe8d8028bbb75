//! Line classification for rules files.
//!
//! The grammar is total: every line is a comment, a blank, a substitution,
//! a shell-computed substitution or a feature flag, so there is no parse
//! error type. Shell commands are only recorded here; running them is up to
//! [`Rules::parse`](super::Rules::parse).

/// Value prefix that turns a substitution into a shell command whose trimmed
/// standard output becomes the value.
pub const SHELL_PREFIX: &str = "SHELL ";

/// Classification of a single rules-file line.
///
/// # Examples
///
/// ```
/// use dot_templater::config::parser::{ConfigLine, classify_line};
///
/// assert_eq!(classify_line("# note"), ConfigLine::Comment);
/// assert_eq!(
///     classify_line("EMAIL=me@example.com"),
///     ConfigLine::Substitution { key: "EMAIL".into(), value: "me@example.com".into() }
/// );
/// assert_eq!(classify_line("laptop"), ConfigLine::Feature { name: "laptop".into() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLine {
    /// Line starting with `#`.
    Comment,
    /// Empty line. Carries no meaning and never registers a feature.
    Blank,
    /// `key=value`, split on the first `=`.
    Substitution {
        /// Text before the first `=`; may be empty.
        key: String,
        /// Text after the first `=`; may be empty or contain more `=`.
        value: String,
    },
    /// `key=SHELL command`: the value is computed by running `command`.
    Command {
        /// Text before the first `=`; may be empty.
        key: String,
        /// Everything after `SHELL `.
        command: String,
    },
    /// Any other line; the whole line is the feature name.
    Feature {
        /// Feature name, exactly as written (terminator excluded).
        name: String,
    },
}

/// Classify one line of a rules file.
///
/// `line` must not include its terminator. Leading and trailing whitespace is
/// significant: `" x"` is a feature named `" x"`, and a whitespace-only line
/// is a feature too.
#[must_use]
pub fn classify_line(line: &str) -> ConfigLine {
    if line.is_empty() {
        return ConfigLine::Blank;
    }
    if line.starts_with('#') {
        return ConfigLine::Comment;
    }
    match line.split_once('=') {
        Some((key, value)) => match value.strip_prefix(SHELL_PREFIX) {
            Some(command) => ConfigLine::Command {
                key: key.to_string(),
                command: command.to_string(),
            },
            None => ConfigLine::Substitution {
                key: key.to_string(),
                value: value.to_string(),
            },
        },
        None => ConfigLine::Feature {
            name: line.to_string(),
        },
    }
}

/// Classify every line of `content`, in order.
///
/// Lines are split on `\n`; a `\r` directly before the `\n` belongs to the
/// terminator. A trailing newline does not produce a final empty line.
///
/// # Examples
///
/// ```
/// use dot_templater::config::parser::{ConfigLine, parse};
///
/// let lines: Vec<_> = parse("# rules\nwork\nNAME=Ada\n").collect();
/// assert_eq!(lines.len(), 3);
/// assert_eq!(lines[1], ConfigLine::Feature { name: "work".into() });
/// ```
pub fn parse(content: &str) -> impl Iterator<Item = ConfigLine> + '_ {
    content.lines().map(classify_line)
}

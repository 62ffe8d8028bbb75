//! Enabled features and the `### name` block filter.
use std::collections::HashSet;

use crate::substitution::SubstitutionTable;

/// Literal that introduces a marker line (after optional spaces and tabs).
pub const MARKER_PREFIX: &str = "### ";

/// Strip one trailing `\n` or `\r\n` from `line`.
#[must_use]
pub fn trim_line_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |l| l.strip_suffix('\r').unwrap_or(l))
}

/// Return the feature name of a marker line, or `None` for ordinary lines.
///
/// A marker line is one that, ignoring leading spaces and tabs, starts with
/// `### `. The name is everything after that prefix, minus the terminator.
///
/// # Examples
///
/// ```
/// use dot_templater::feature::marker_name;
///
/// assert_eq!(marker_name("### laptop\n"), Some("laptop"));
/// assert_eq!(marker_name("    ### work"), Some("work"));
/// assert_eq!(marker_name("#### heading"), None);
/// assert_eq!(marker_name("###laptop"), None);
/// ```
#[must_use]
pub fn marker_name(line: &str) -> Option<&str> {
    line.trim_start_matches([' ', '\t'])
        .strip_prefix(MARKER_PREFIX)
        .map(trim_line_terminator)
}

/// Set of features enabled by the rules file.
///
/// # Examples
///
/// ```
/// use dot_templater::feature::FeatureSet;
///
/// let features: FeatureSet = ["laptop"].into_iter().collect();
/// assert!(features.is_enabled("laptop\n"));
/// assert!(!features.is_enabled("Laptop"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    names: HashSet<String>,
}

impl FeatureSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a feature. Returns `false` if it was already enabled.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Exact-match lookup, ignoring one trailing line terminator on `name`.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.names.contains(trim_line_terminator(name))
    }

    /// Number of enabled features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no feature is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Enabled feature names, sorted.
    #[must_use]
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// State of a [`BlockFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterState {
    /// Lines are substituted and emitted.
    #[default]
    Passing,
    /// Lines are dropped until the next marker.
    Suppressing,
}

/// Per-file toggle over `### name` blocks.
///
/// Blocks do not nest: while suppressing, the next marker closes the block
/// whatever its name. While passing, a marker for an enabled feature is
/// swallowed and a marker for a disabled one starts suppressing.
///
/// # Examples
///
/// ```
/// use dot_templater::feature::{BlockFilter, FeatureSet};
/// use dot_templater::substitution::SubstitutionTable;
///
/// let features = FeatureSet::new();
/// let subs = SubstitutionTable::new();
/// let mut filter = BlockFilter::new();
///
/// assert_eq!(filter.process("### extra\n", &features, &subs), None);
/// assert_eq!(filter.process("hidden\n", &features, &subs), None);
/// assert_eq!(filter.process("### extra\n", &features, &subs), None);
/// assert_eq!(filter.process("shown\n", &features, &subs).as_deref(), Some("shown\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockFilter {
    state: FilterState,
}

impl BlockFilter {
    /// Create a filter in the [`FilterState::Passing`] state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> FilterState {
        self.state
    }

    /// Whether the filter currently drops non-marker lines.
    #[must_use]
    pub fn is_suppressing(&self) -> bool {
        self.state == FilterState::Suppressing
    }

    /// Feed one line (terminator included) through the filter.
    ///
    /// Returns the substituted line to emit, or `None` when the line is a
    /// marker or falls inside a suppressed block. Substitution is applied to
    /// the line body only; the terminator is re-attached unchanged.
    pub fn process(
        &mut self,
        line: &str,
        features: &FeatureSet,
        substitutions: &SubstitutionTable,
    ) -> Option<String> {
        if let Some(name) = marker_name(line) {
            self.on_marker(name, features);
            return None;
        }
        if self.is_suppressing() {
            return None;
        }
        let body = trim_line_terminator(line);
        let terminator = line.get(body.len()..).unwrap_or_default();
        let mut out = substitutions.apply(body);
        out.push_str(terminator);
        Some(out)
    }

    fn on_marker(&mut self, name: &str, features: &FeatureSet) {
        self.state = match self.state {
            FilterState::Suppressing => {
                tracing::debug!("closing suppressed block at marker '{name}'");
                FilterState::Passing
            }
            FilterState::Passing if features.is_enabled(name) => FilterState::Passing,
            FilterState::Passing => {
                tracing::debug!("suppressing block for disabled feature '{name}'");
                FilterState::Suppressing
            }
        };
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn run(lines: &[&str], features: &FeatureSet, subs: &SubstitutionTable) -> String {
        let mut filter = BlockFilter::new();
        lines
            .iter()
            .filter_map(|line| filter.process(line, features, subs))
            .collect()
    }

    fn enabled(names: &[&str]) -> FeatureSet {
        names.iter().copied().collect()
    }

    // -----------------------------------------------------------------------
    // marker_name
    // -----------------------------------------------------------------------

    #[test]
    fn marker_requires_space_after_hashes() {
        assert_eq!(marker_name("### x"), Some("x"));
        assert_eq!(marker_name("###x"), None);
        assert_eq!(marker_name("## x"), None);
    }

    #[test]
    fn marker_allows_leading_whitespace() {
        assert_eq!(marker_name("\t  ### x\n"), Some("x"));
    }

    #[test]
    fn only_spaces_and_tabs_may_indent_a_marker() {
        assert_eq!(marker_name("\u{3000}### x"), None);
        assert_eq!(marker_name("\u{a0}### x"), None);
        assert_eq!(marker_name("\r### x"), None);
    }

    #[test]
    fn marker_name_keeps_interior_text() {
        assert_eq!(marker_name("### two words\r\n"), Some("two words"));
    }

    #[test]
    fn marker_with_empty_name() {
        assert_eq!(marker_name("### \n"), Some(""));
    }

    #[test]
    fn hash_inside_line_is_not_marker() {
        assert_eq!(marker_name("echo ### x"), None);
    }

    // -----------------------------------------------------------------------
    // FeatureSet
    // -----------------------------------------------------------------------

    #[test]
    fn feature_lookup_is_exact() {
        let f = enabled(&["laptop"]);
        assert!(f.is_enabled("laptop"));
        assert!(f.is_enabled("laptop\n"));
        assert!(f.is_enabled("laptop\r\n"));
        assert!(!f.is_enabled("laptop "));
        assert!(!f.is_enabled("LAPTOP"));
        assert!(!f.is_enabled(""));
    }

    #[test]
    fn insert_reports_duplicates() {
        let mut f = FeatureSet::new();
        assert!(f.insert("a"));
        assert!(!f.insert("a"));
        assert_eq!(f.len(), 1);
        assert_eq!(f.sorted(), ["a"]);
    }

    // -----------------------------------------------------------------------
    // BlockFilter
    // -----------------------------------------------------------------------

    #[test]
    fn enabled_block_passes_without_markers() {
        let out = run(
            &["### x\n", "kept\n", "### x\n", "dropped\n"],
            &enabled(&["x"]),
            &SubstitutionTable::new(),
        );
        // The second marker does not start suppressing: "x" is enabled, so
        // "dropped" is emitted too.
        assert_eq!(out, "kept\ndropped\n");
    }

    #[test]
    fn disabled_block_is_fully_removed() {
        let out = run(
            &["### y\n", "hidden\n", "### y\n"],
            &FeatureSet::new(),
            &SubstitutionTable::new(),
        );
        assert_eq!(out, "");
    }

    #[test]
    fn close_is_positional_not_by_name() {
        // "### b" closes the block opened by the disabled "### a".
        let out = run(
            &["### a\n", "one\n", "### b\n", "two\n", "### a\n", "three\n"],
            &FeatureSet::new(),
            &SubstitutionTable::new(),
        );
        // The trailing "### a" opens a new suppressed block, hiding "three".
        assert_eq!(out, "two\n");
    }

    #[test]
    fn six_line_fixture_with_enabled_feature() {
        let out = run(
            &["### x\n", "a\n", "### x\n", "### y\n", "b\n", "### y\n"],
            &enabled(&["x"]),
            &SubstitutionTable::new(),
        );
        assert_eq!(out, "a\n");
    }

    #[test]
    fn unterminated_block_drops_rest() {
        let mut filter = BlockFilter::new();
        let features = FeatureSet::new();
        let subs = SubstitutionTable::new();
        assert!(filter.process("### gone\n", &features, &subs).is_none());
        assert!(filter.process("a\n", &features, &subs).is_none());
        assert!(filter.process("b", &features, &subs).is_none());
        assert_eq!(filter.state(), FilterState::Suppressing);
    }

    #[test]
    fn suppressed_lines_are_not_substituted() {
        let mut subs = SubstitutionTable::new();
        subs.push("KEY", "value");
        let out = run(
            &["KEY\n", "### off\n", "KEY\n", "### off\n", "KEY"],
            &FeatureSet::new(),
            &subs,
        );
        assert_eq!(out, "value\nvalue");
    }

    #[test]
    fn substitution_never_touches_terminator() {
        let mut subs = SubstitutionTable::new();
        subs.push("\n", "NEWLINE");
        subs.push("\r", "CR");
        let out = run(&["a\r\n", "b\n"], &FeatureSet::new(), &subs);
        assert_eq!(out, "a\r\nb\n");
    }

    #[test]
    fn indented_marker_toggles() {
        let out = run(
            &["  ### off\n", "hidden\n", "\t### off\n", "shown\n"],
            &FeatureSet::new(),
            &SubstitutionTable::new(),
        );
        assert_eq!(out, "shown\n");
    }

    #[test]
    fn new_filter_starts_passing() {
        let filter = BlockFilter::new();
        assert_eq!(filter.state(), FilterState::Passing);
        assert!(!filter.is_suppressing());
    }
}

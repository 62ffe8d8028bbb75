//! Ordered key → value text substitution.
//!
//! Each entry is expanded to its fixed point before the next entry runs, so a
//! later key sees the output of every earlier key. Two cases cannot reach a
//! fixed point and get an explicit policy instead:
//!
//! - an empty key is never applied;
//! - a key whose value contains the key is replaced in a single left-to-right
//!   pass without rescanning.
//!
//! Any other key is still bounded by [`MAX_EXPANSIONS`] stalled replacements
//! per line.

/// Upper bound on stalled replacements of a single key within a single line.
///
/// A replacement makes progress when it lands further left than any earlier
/// one or leaves less text after the inserted value than any earlier one.
/// Both distances only shrink a finite number of times, so a key that keeps
/// matching without progress is cycling. Keys whose value is shorter than the
/// key always terminate and never stall. When the bound is reached, remaining
/// occurrences are replaced in one non-rescanning pass and a warning is
/// logged.
pub const MAX_EXPANSIONS: usize = 10_000;

/// A single `key=value` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Literal text to search for.
    pub key: String,
    /// Replacement text.
    pub value: String,
}

impl Substitution {
    /// Create a substitution from a key and a value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether the value contains the key, which rules out fixed-point
    /// expansion.
    #[must_use]
    pub fn is_self_referential(&self) -> bool {
        !self.key.is_empty() && self.value.contains(&self.key)
    }

    /// Replace every occurrence of the key in `line` in place.
    fn expand(&self, line: &mut String) {
        let key = self.key.as_str();
        if key.is_empty() || !line.contains(key) {
            return;
        }
        if self.is_self_referential() {
            *line = line.replace(key, &self.value);
            return;
        }

        let shrinks = self.value.len() < key.len();
        let mut from = 0;
        let mut stalls = 0;
        let mut min_at = usize::MAX;
        let mut min_tail = usize::MAX;
        while let Some(offset) = line.get(from..).and_then(|rest| rest.find(key)) {
            if stalls == MAX_EXPANSIONS {
                tracing::warn!(
                    "substitution for '{key}' did not settle after {MAX_EXPANSIONS} stalled replacements; finishing with a single pass"
                );
                *line = line.replace(key, &self.value);
                return;
            }
            let at = from + offset;
            line.replace_range(at..at + key.len(), &self.value);

            let tail = line.len() - (at + self.value.len());
            if at < min_at || tail < min_tail {
                min_at = min_at.min(at);
                min_tail = min_tail.min(tail);
            } else if !shrinks {
                stalls += 1;
            }

            // Text before `at` is untouched, so the next match can start no
            // earlier than `key.len() - 1` bytes before the splice.
            from = at.saturating_sub(key.len() - 1);
            while !line.is_char_boundary(from) {
                from -= 1;
            }
        }
    }
}

/// Insertion-ordered list of substitutions.
///
/// Duplicate keys are kept; every entry is applied in order.
///
/// # Examples
///
/// ```
/// use dot_templater::substitution::SubstitutionTable;
///
/// let mut table = SubstitutionTable::new();
/// table.push("A", "B");
/// table.push("B", "C");
/// assert_eq!(table.apply("A"), "C");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: Vec<Substitution>,
}

impl SubstitutionTable {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a substitution after all existing ones.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Substitution::new(key, value));
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Substitution> {
        self.entries.iter()
    }

    /// Apply every substitution to `line` and return the result.
    ///
    /// The input is never modified; a line without any configured key comes
    /// back as an equal copy.
    #[must_use]
    pub fn apply(&self, line: &str) -> String {
        let mut result = line.to_string();
        for substitution in &self.entries {
            substitution.expand(&mut result);
        }
        result
    }
}

impl FromIterator<Substitution> for SubstitutionTable {
    fn from_iter<I: IntoIterator<Item = Substitution>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SubstitutionTable {
    type Item = &'a Substitution;
    type IntoIter = std::slice::Iter<'a, Substitution>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::capture_logs;

    fn table(pairs: &[(&str, &str)]) -> SubstitutionTable {
        pairs
            .iter()
            .map(|(k, v)| Substitution::new(*k, *v))
            .collect()
    }

    #[test]
    fn no_matching_key_returns_equal_copy() {
        let t = table(&[("FOO", "bar")]);
        assert_eq!(t.apply("nothing to see\n"), "nothing to see\n");
    }

    #[test]
    fn empty_table_returns_equal_copy() {
        assert_eq!(SubstitutionTable::new().apply("line"), "line");
    }

    #[test]
    fn replaces_every_occurrence() {
        let t = table(&[("FOO", "bar")]);
        assert_eq!(t.apply("FOO FOO"), "bar bar");
    }

    #[test]
    fn later_keys_see_earlier_output() {
        let t = table(&[("A", "B"), ("B", "C")]);
        assert_eq!(t.apply("A"), "C");
    }

    #[test]
    fn earlier_keys_do_not_see_later_output() {
        let t = table(&[("B", "C"), ("A", "B")]);
        assert_eq!(t.apply("A"), "B");
    }

    #[test]
    fn duplicate_keys_are_applied_in_order() {
        let t = table(&[("X", "1"), ("X", "2")]);
        assert_eq!(t.apply("X"), "1");
        let t = table(&[("X", "Y"), ("Y", "Z"), ("Y", "never")]);
        assert_eq!(t.apply("XY"), "ZZ");
    }

    #[test]
    fn expansion_rescans_to_fixed_point() {
        // "aabb" -> "aab" -> "aa": the splice creates a new match.
        let t = table(&[("ab", "a")]);
        assert_eq!(t.apply("aabb"), "aa");
    }

    #[test]
    fn rescan_catches_match_straddling_splice_start() {
        // "xab" with ab -> b gives "xb", which now matches "xb".
        let t = table(&[("ab", "b"), ("xb", "ok")]);
        assert_eq!(t.apply("xab"), "ok");
        let t = table(&[("aab", "b")]);
        assert_eq!(t.apply("aaaab"), "b");
    }

    #[test]
    fn self_referential_value_replaces_once_per_occurrence() {
        let t = table(&[("a", "aa")]);
        assert_eq!(t.apply("a"), "aa");
        assert_eq!(t.apply("a-a"), "aa-aa");
    }

    #[test]
    fn self_referential_detection() {
        assert!(Substitution::new("HOME", "/home/HOME").is_self_referential());
        assert!(!Substitution::new("HOME", "/home/me").is_self_referential());
        assert!(!Substitution::new("", "anything").is_self_referential());
    }

    #[test]
    fn empty_key_is_ignored() {
        let t = table(&[("", "boom")]);
        assert_eq!(t.apply("unchanged"), "unchanged");
    }

    #[test]
    fn empty_value_deletes_key() {
        let t = table(&[("TODO ", "")]);
        assert_eq!(t.apply("TODO TODO done"), "done");
    }

    #[test]
    fn multibyte_text_is_handled() {
        let t = table(&[("名前", "Ada"), ("é", "e")]);
        assert_eq!(t.apply("名前: café é"), "Ada: cafe e");
    }

    #[test]
    fn rescan_start_lands_on_char_boundary() {
        // Multi-byte characters right before the splice point.
        let t = table(&[("éx", "y")]);
        assert_eq!(t.apply("ééxx"), "éyx");
        let t = table(&[("ab", "é")]);
        assert_eq!(t.apply("éab"), "éé");
    }

    #[test]
    fn input_is_not_modified() {
        let t = table(&[("A", "B")]);
        let line = String::from("A");
        let out = t.apply(&line);
        assert_eq!(line, "A");
        assert_eq!(out, "B");
    }

    #[test]
    fn len_and_iteration_follow_insertion_order() {
        let t = table(&[("one", "1"), ("two", "2")]);
        assert_eq!(t.len(), 2);
        assert!(!t.is_empty());
        let keys: Vec<_> = t.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["one", "two"]);
    }

    #[test]
    fn many_occurrences_settle_without_warning() {
        let t = table(&[("a", "b")]);
        let line = "a".repeat(MAX_EXPANSIONS + 1);
        let (out, logs) = capture_logs(|| t.apply(&line));
        assert_eq!(out, "b".repeat(MAX_EXPANSIONS + 1));
        assert!(logs.is_empty(), "unexpected logs: {logs}");
    }

    #[test]
    fn long_leftward_chain_settles_without_warning() {
        // Every splice creates a new match one byte further left.
        let t = table(&[("ab", "bb")]);
        let line = format!("{}b", "a".repeat(MAX_EXPANSIONS + 1));
        let (out, logs) = capture_logs(|| t.apply(&line));
        assert_eq!(out, "b".repeat(MAX_EXPANSIONS + 2));
        assert!(logs.is_empty(), "unexpected logs: {logs}");
    }

    #[test]
    fn shrinking_chain_settles_without_warning() {
        let t = table(&[("aab", "b")]);
        let line = format!("{}b", "a".repeat(2 * MAX_EXPANSIONS + 2));
        let (out, logs) = capture_logs(|| t.apply(&line));
        assert_eq!(out, "b");
        assert!(logs.is_empty(), "unexpected logs: {logs}");
    }

    #[test]
    fn cycling_key_falls_back_to_single_pass() {
        // "bbaa" does not contain "ab", yet every splice recreates it.
        let t = table(&[("ab", "bbaa")]);
        assert!(!t.iter().any(Substitution::is_self_referential));
        let (out, logs) = capture_logs(|| t.apply("aab"));
        let expected = format!(
            "{}abb{}",
            "b".repeat(MAX_EXPANSIONS + 2),
            "a".repeat(MAX_EXPANSIONS + 4)
        );
        assert_eq!(out, expected);
        assert!(logs.contains("WARN"), "missing warning: {logs}");
        assert!(logs.contains("'ab' did not settle"), "missing warning: {logs}");
    }
}

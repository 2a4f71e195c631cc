//! Line-oriented parser producing a [`SectionMap`].
//!
//! Grammar, one line at a time (after trimming spaces and tabs):
//!
//! ```text
//! [Section Name]        opens a new current section
//! key = value           entry in the current section (split on the first '=')
//! anything else         skipped
//! ```
//!
//! Entries before the first header land in the unnamed section `""`.
//! A repeated key in the same section keeps the last value seen.

use std::collections::BTreeMap;

/// Section name → (key → raw value).
pub type SectionMap = BTreeMap<String, BTreeMap<String, String>>;

/// Which side of `=` holds the map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyRole {
    /// `key=value`, split on the first `=`.
    #[default]
    Normal,
    /// `value=key`, split on the last `=`.
    ///
    /// Used for the binding section, whose lines are `<command>=<KeyName>`:
    /// the command text may itself contain `=`, the key name never does.
    Reversed,
}

/// One `key=value` line, borrowed from the parsed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub section: &'a str,
    pub key: &'a str,
    pub value: &'a str,
}

/// Yields every entry of `text` in file order.
///
/// Repeated sections and keys are yielded as they appear; callers that want
/// last-write-wins apply them in sequence.
pub fn entries(text: &str, role: KeyRole) -> impl Iterator<Item = Entry<'_>> {
    let mut current = "";
    text.lines().filter_map(move |raw_line| {
        let line = trim_horizontal(raw_line);
        if let Some(name) = section_header(line) {
            current = name;
            return None;
        }
        let (left, right) = split_entry(line, role)?;
        let (key, value) = match role {
            KeyRole::Normal => (left, right),
            KeyRole::Reversed => (right, left),
        };
        Some(Entry {
            section: current,
            key,
            value,
        })
    })
}

/// Parses `text` into a [`SectionMap`].
pub fn parse(text: &str, role: KeyRole) -> SectionMap {
    let mut sections = SectionMap::new();
    for entry in entries(text, role) {
        sections
            .entry(entry.section.to_string())
            .or_default()
            .insert(entry.key.to_string(), entry.value.to_string());
    }
    sections
}

/// Returns the section name if `line` (already trimmed) is a `[header]`.
pub(crate) fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(trim_horizontal)
}

/// Returns the trimmed text left of the first `=`, if the line is an entry.
pub(crate) fn entry_key(line: &str) -> Option<&str> {
    split_entry(trim_horizontal(line), KeyRole::Normal).map(|(key, _)| key)
}

fn split_entry(line: &str, role: KeyRole) -> Option<(&str, &str)> {
    let split = match role {
        KeyRole::Normal => line.split_once('='),
        KeyRole::Reversed => line.rsplit_once('='),
    };
    split.map(|(left, right)| (trim_horizontal(left), trim_horizontal(right)))
}

pub(crate) fn trim_horizontal(s: &str) -> &str {
    s.trim_matches(|c| c == ' ' || c == '\t')
}

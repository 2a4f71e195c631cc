//! In-place editor for INI text.
//!
//! Saving is a *merge*, not an overwrite: [`Document::set`] rewrites (or
//! inserts) exactly one key and leaves every other line byte-for-byte intact,
//! including comments, unknown sections and the original line endings.
//!
//! # Edit rules
//!
//! 1. Section present, key present → every `key=` line under every
//!    `[section]` header is replaced with `key=value`.
//! 2. Section present, key absent → `key=value` is inserted after the last
//!    non-blank line of the first `[section]` block, so blank separators stay
//!    where they are.
//! 3. Section absent → `[section]` and `key=value` are appended at the end of
//!    the text, preceded by a blank separator line when the text is non-empty.
//!
//! Section and key comparisons ignore ASCII case, matching registry lookups.

use std::fmt;

use super::parser::{entry_key, section_header, trim_horizontal};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    text: String,
    eol: &'static str,
}

/// Editable line buffer over an INI file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
    newline: &'static str,
}

impl Document {
    /// Splits `text` into lines, remembering each line's terminator.
    pub fn parse(text: &str) -> Self {
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let lines = text
            .split_inclusive('\n')
            .map(|chunk| {
                if let Some(body) = chunk.strip_suffix("\r\n") {
                    Line { text: body.to_string(), eol: "\r\n" }
                } else if let Some(body) = chunk.strip_suffix('\n') {
                    Line { text: body.to_string(), eol: "\n" }
                } else {
                    Line { text: chunk.to_string(), eol: "" }
                }
            })
            .collect();
        Self { lines, newline }
    }

    /// Sets `key` in `section` to `value`, following the module's edit rules.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let entry = format!("{key}={value}");

        let bodies = self.section_bodies(section);
        let Some(&(start, end)) = bodies.first() else {
            self.append_section(section, entry);
            return;
        };

        // A section may be split over several headers: rewrite every copy.
        let mut replaced = false;
        for &(block_start, block_end) in &bodies {
            for line in &mut self.lines[block_start..block_end] {
                if key_matches(&line.text, key) {
                    line.text.clone_from(&entry);
                    replaced = true;
                }
            }
        }
        if replaced {
            return;
        }

        // Insert after the last non-blank line of the first block (the header
        // itself when the body is blank).
        let insert_at = (start..end)
            .rev()
            .find(|&i| !trim_horizontal(&self.lines[i].text).is_empty())
            .map_or(start, |i| i + 1);
        self.terminate_line(insert_at - 1);
        let eol = if insert_at == self.lines.len() { self.newline } else { self.lines[insert_at - 1].eol };
        self.lines.insert(insert_at, Line { text: entry, eol });
    }

    /// Index ranges of the lines under each `[section]` header, in file order.
    fn section_bodies(&self, section: &str) -> Vec<(usize, usize)> {
        let headers: Vec<(usize, bool)> = self
            .lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| {
                section_header(trim_horizontal(&line.text))
                    .map(|name| (i, name.eq_ignore_ascii_case(section)))
            })
            .collect();

        headers
            .iter()
            .enumerate()
            .filter(|(_, (_, matching))| *matching)
            .map(|(n, &(header, _))| {
                let end = headers.get(n + 1).map_or(self.lines.len(), |&(next, _)| next);
                (header + 1, end)
            })
            .collect()
    }

    fn append_section(&mut self, section: &str, entry: String) {
        if let Some(last) = self.lines.len().checked_sub(1) {
            self.terminate_line(last);
            if !trim_horizontal(&self.lines[last].text).is_empty() {
                self.lines.push(Line { text: String::new(), eol: self.newline });
            }
        }
        self.lines.push(Line { text: format!("[{section}]"), eol: self.newline });
        self.lines.push(Line { text: entry, eol: self.newline });
    }

    /// Gives line `index` a terminator if it is the unterminated last line.
    fn terminate_line(&mut self, index: usize) {
        let newline = self.newline;
        if let Some(line) = self.lines.get_mut(index) {
            if line.eol.is_empty() {
                line.eol = newline;
            }
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(&line.text)?;
            f.write_str(line.eol)?;
        }
        Ok(())
    }
}

fn key_matches(line: &str, key: &str) -> bool {
    entry_key(line).is_some_and(|k| k.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing_key() {
        // Arrange
        let mut doc = Document::parse("[Section1]\ntestInt=0\ntestBool=true\n");

        // Act
        doc.set("Section1", "testInt", "42");

        // Assert
        assert_eq!(doc.to_string(), "[Section1]\ntestInt=42\ntestBool=true\n");
    }

    #[test]
    fn test_set_appends_missing_key_before_blank_separator() {
        // Arrange
        let mut doc = Document::parse("[A]\nx=1\n\n[B]\ny=2\n");

        // Act
        doc.set("A", "z", "3");

        // Assert
        assert_eq!(doc.to_string(), "[A]\nx=1\nz=3\n\n[B]\ny=2\n");
    }

    #[test]
    fn test_set_appends_missing_section_with_blank_separator() {
        let mut doc = Document::parse("[A]\nx=1\n");
        doc.set("B", "y", "2");
        assert_eq!(doc.to_string(), "[A]\nx=1\n\n[B]\ny=2\n");
    }

    #[test]
    fn test_set_on_empty_document_has_no_leading_blank_line() {
        let mut doc = Document::parse("");
        doc.set("A", "x", "1");
        assert_eq!(doc.to_string(), "[A]\nx=1\n");
    }

    #[test]
    fn test_set_terminates_unterminated_last_line() {
        let mut doc = Document::parse("[A]\nx=1");
        doc.set("A", "y", "2");
        assert_eq!(doc.to_string(), "[A]\nx=1\ny=2\n");
    }

    #[test]
    fn test_set_matches_section_and_key_case_insensitively() {
        let mut doc = Document::parse("[section1]\nTESTINT=0\n");
        doc.set("Section1", "testInt", "9");
        assert_eq!(doc.to_string(), "[section1]\ntestInt=9\n");
    }

    #[test]
    fn test_set_preserves_crlf_and_untouched_lines() {
        // Arrange
        let original = "; comment\r\n[Other]\r\nkeep = me\r\n\r\n[A]\r\nx=1\r\n";
        let mut doc = Document::parse(original);

        // Act
        doc.set("A", "x", "5");

        // Assert
        assert_eq!(doc.to_string(), "; comment\r\n[Other]\r\nkeep = me\r\n\r\n[A]\r\nx=5\r\n");
    }

    #[test]
    fn test_set_into_empty_section_goes_right_after_header() {
        let mut doc = Document::parse("[A]\n\n[B]\ny=2\n");
        doc.set("A", "x", "1");
        assert_eq!(doc.to_string(), "[A]\nx=1\n\n[B]\ny=2\n");
    }

    #[test]
    fn test_set_rewrites_key_in_repeated_section_blocks() {
        // Arrange
        let mut doc = Document::parse("[Section1]\nx=1\n\n[Other]\ny=2\n\n[section1]\ntestInt=5\n");

        // Act
        doc.set("Section1", "testInt", "9");

        // Assert
        assert_eq!(
            doc.to_string(),
            "[Section1]\nx=1\n\n[Other]\ny=2\n\n[section1]\ntestInt=9\n"
        );
    }

    #[test]
    fn test_set_replaces_key_in_every_block_that_holds_it() {
        let mut doc = Document::parse("[A]\nk=1\n[A]\nk=2\n");
        doc.set("A", "k", "3");
        assert_eq!(doc.to_string(), "[A]\nk=3\n[A]\nk=3\n");
    }

    #[test]
    fn test_unmodified_document_round_trips_byte_for_byte() {
        let text = "orphan=1\n[A]\r\nx=1\n\n  [B]  \nweird line\ny=2";
        assert_eq!(Document::parse(text).to_string(), text);
    }
}

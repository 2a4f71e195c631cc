//! Binding command grammar.
//!
//! A binding string is one or more commands joined with `|`:
//!
//! ```text
//! binding := command ( "|" command )*
//! command := action ":" section "." field "=" value
//! action  := "OnPress" | "OnRelease"
//! ```
//!
//! `section` runs up to the first `.`, `field` up to the first `=` after it,
//! and `value` is everything that follows (it may contain `=`, `,` or `.`).
//! Anything else is rejected with [`ConfigError::MalformedCommand`]; there is
//! no partially-populated command.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Separator between commands packed into one binding.
pub const COMMAND_SEPARATOR: char = '|';

/// Key transition a command reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    OnPress,
    OnRelease,
}

impl ActionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnPress => "OnPress",
            Self::OnRelease => "OnRelease",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OnPress" => Ok(Self::OnPress),
            "OnRelease" => Ok(Self::OnRelease),
            other => Err(malformed(s, format!("unknown action {other:?}"))),
        }
    }
}

/// One parsed `Action:section.field=value` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: ActionType,
    pub section: String,
    pub field: String,
    pub value: String,
}

impl Command {
    /// The part after the action prefix: `section.field=value`.
    pub fn payload(&self) -> String {
        format!("{}.{}={}", self.section, self.field, self.value)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.action, self.payload())
    }
}

impl FromStr for Command {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_command(s)
    }
}

/// Parses a single command segment.
///
/// Surrounding whitespace of the segment is ignored.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedCommand`] for an unknown action prefix, a
/// missing `:`, `.` or `=`, or an empty section or field name.
pub fn parse_command(text: &str) -> Result<Command, ConfigError> {
    let segment = text.trim();

    let (action, rest) = segment
        .split_once(':')
        .ok_or_else(|| malformed(segment, "missing `:` after action"))?;
    let action = action
        .parse::<ActionType>()
        .map_err(|_| malformed(segment, format!("unknown action {action:?}")))?;

    let (section, rest) = rest
        .split_once('.')
        .ok_or_else(|| malformed(segment, "missing `.` between section and field"))?;
    let (field, value) = rest
        .split_once('=')
        .ok_or_else(|| malformed(segment, "missing `=` before value"))?;

    if section.is_empty() {
        return Err(malformed(segment, "empty section name"));
    }
    if field.is_empty() {
        return Err(malformed(segment, "empty field name"));
    }

    Ok(Command {
        action,
        section: section.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Splits a binding into its non-blank command segments.
pub fn split_binding(binding: &str) -> impl Iterator<Item = &str> {
    binding
        .split(COMMAND_SEPARATOR)
        .filter(|segment| !segment.trim().is_empty())
}

fn malformed(command: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::MalformedCommand {
        command: command.to_string(),
        reason: reason.into(),
    }
}

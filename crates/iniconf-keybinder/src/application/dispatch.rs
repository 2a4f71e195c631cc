//! Runs binding commands against the registry.
//!
//! A binding string holds `|`-separated commands.  For a given key transition
//! only the commands with the matching [`ActionType`] run, each one
//! independently: a malformed segment, an unknown `section.field` or a value
//! that does not parse as the item's type is skipped, and the remaining
//! segments still execute.
//!
//! Malformed segments are already warned about when the keybind table is
//! loaded, so dispatch only counts them, and only for the transition their
//! action prefix names.

use iniconf_core::{parse_command, split_binding, ActionType, Registry};
use tracing::{debug, warn};

use super::keybinds::KeybindTable;

/// What one dispatch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Commands whose value was written into the registry.
    pub applied: usize,
    /// Segments skipped because of a parse, lookup or conversion failure.
    pub skipped: usize,
}

/// Executes the `action` commands bound to `key_name`.
///
/// A key without a binding is a no-op.
pub fn execute_bind(
    table: &KeybindTable,
    registry: &mut Registry,
    key_name: &str,
    action: ActionType,
) -> DispatchReport {
    execute_commands(registry, table.get_bind(key_name), action)
}

/// Executes the `action` commands of a raw binding string.
pub fn execute_commands(registry: &mut Registry, binding: &str, action: ActionType) -> DispatchReport {
    let mut report = DispatchReport::default();

    for segment in split_binding(binding) {
        let command = match parse_command(segment) {
            Ok(command) => command,
            Err(e) => {
                if segment_action(segment) == Some(action) {
                    debug!("skipping command: {e}");
                    report.skipped += 1;
                }
                continue;
            }
        };
        if command.action != action {
            continue;
        }

        let index = match registry.find(&command.section, &command.field) {
            Ok(index) => index,
            Err(e) => {
                warn!("skipping {command}: {e}");
                report.skipped += 1;
                continue;
            }
        };
        match registry.set_from_str(index, &command.value) {
            Ok(()) => {
                debug!(%command, "command applied");
                report.applied += 1;
            }
            Err(e) => {
                warn!("skipping {command}: {e}");
                report.skipped += 1;
            }
        }
    }

    report
}

/// Action named by a segment's prefix, even when the rest is malformed.
fn segment_action(segment: &str) -> Option<ActionType> {
    let (prefix, _) = segment.trim().split_once(':')?;
    prefix.parse().ok()
}

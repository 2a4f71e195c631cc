//! A single declared configuration item.

use super::value::{TypeTag, TypedValue};

/// One named, typed configuration value living in a section.
///
/// The item's tag is fixed at declaration: every later write goes through
/// [`crate::Registry`], which rejects values of a different tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigItem {
    name: String,
    section: String,
    value: TypedValue,
    default: TypedValue,
}

impl ConfigItem {
    pub(crate) fn new(name: &str, section: &str, default: TypedValue) -> Self {
        Self {
            name: name.to_string(),
            section: section.to_string(),
            value: default.clone(),
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn type_tag(&self) -> TypeTag {
        self.default.tag()
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    /// The value the item was declared with.
    pub fn default_value(&self) -> &TypedValue {
        &self.default
    }

    /// Case-insensitive match on section and key.
    pub fn matches(&self, section: &str, key: &str) -> bool {
        self.section.eq_ignore_ascii_case(section) && self.name.eq_ignore_ascii_case(key)
    }

    pub(crate) fn value_mut(&mut self) -> &mut TypedValue {
        &mut self.value
    }

    /// Replaces the value; callers have already checked the tag.
    pub(crate) fn replace(&mut self, value: TypedValue) {
        debug_assert_eq!(value.tag(), self.type_tag());
        self.value = value;
    }
}

//! Domain types for the configuration registry.
//!
//! This module contains pure data types with no file system access:
//!
//! - **`value`** – the closed [`TypeTag`] enumeration, the [`TypedValue`] sum
//!   type, the [`ConfigValue`] trait that binds Rust types to tags, and the
//!   tag-directed text encoding of every variant.
//! - **`item`** – [`ConfigItem`], one declared `section.name` entry.

pub mod item;
pub mod value;

pub use item::ConfigItem;
pub use value::{Color, ConfigValue, KeyBind, TypeTag, TypedValue, ValueSyntaxError};

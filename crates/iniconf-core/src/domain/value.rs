//! Tagged configuration values and their text encodings.
//!
//! Every stored value is a [`TypedValue`]: a closed sum type whose variant is
//! the value's [`TypeTag`].  All serialize / parse / dispatch sites match on it
//! exhaustively, so a new variant cannot silently fall through.
//!
//! # Text encodings
//!
//! | Tag          | Example text   |
//! |--------------|----------------|
//! | Bool         | `true`         |
//! | Int          | `-42`          |
//! | Float        | `1.5`          |
//! | String       | `hello world`  |
//! | Color        | `255,0,0,255`  |
//! | IntVector    | `1,2,3,4`      |
//! | FloatVector  | `0.5,1,2.25`   |
//! | KeyBind      | `4`            |
//!
//! Parsing is always *tag-directed*: the destination's tag picks the parser,
//! the text's shape never picks the type.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::keymap::{windows_vk, KeyCode};

/// Identifies the stored shape of a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Int,
    Float,
    String,
    Color,
    IntVector,
    FloatVector,
    KeyBind,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Color => "color",
            Self::IntVector => "int vector",
            Self::FloatVector => "float vector",
            Self::KeyBind => "keybind",
        };
        f.write_str(name)
    }
}

/// Text could not be parsed as the requested [`TypeTag`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValueSyntaxError(String);

impl ValueSyntaxError {
    fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Human-readable reason the text was rejected.
    pub fn reason(&self) -> &str {
        &self.0
    }
}

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = ValueSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = components(s);
        if parts.len() != 4 {
            return Err(ValueSyntaxError::new(format!(
                "expected 4 components (r,g,b,a), found {}",
                parts.len()
            )));
        }
        let mut channels = [0u8; 4];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u8>()
                .map_err(|e| ValueSyntaxError::new(format!("channel {part:?}: {e}")))?;
        }
        let [r, g, b, a] = channels;
        Ok(Self { r, g, b, a })
    }
}

/// A key binding stored as a virtual key code.
///
/// The display name comes from the built-in Windows virtual-key table; codes
/// without a name render as `Unknown Key: <code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyBind {
    code: KeyCode,
}

impl KeyBind {
    pub const fn new(code: KeyCode) -> Self {
        Self { code }
    }

    pub const fn code(self) -> KeyCode {
        self.code
    }

    pub fn set(&mut self, code: KeyCode) {
        self.code = code;
    }

    /// Human-readable name of the bound key.
    pub fn name(self) -> String {
        match windows_vk::vk_name(self.code) {
            Some(name) => name.to_string(),
            None => format!("Unknown Key: {}", self.code),
        }
    }
}

impl fmt::Display for KeyBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A configuration value tagged with its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    Color(Color),
    IntVector(Vec<i32>),
    FloatVector(Vec<f32>),
    KeyBind(KeyBind),
}

impl TypedValue {
    /// The tag identifying this value's variant.
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Bool(_) => TypeTag::Bool,
            Self::Int(_) => TypeTag::Int,
            Self::Float(_) => TypeTag::Float,
            Self::String(_) => TypeTag::String,
            Self::Color(_) => TypeTag::Color,
            Self::IntVector(_) => TypeTag::IntVector,
            Self::FloatVector(_) => TypeTag::FloatVector,
            Self::KeyBind(_) => TypeTag::KeyBind,
        }
    }

    /// Encodes the value as the text stored on the right of `key=`.
    pub fn to_ini_string(&self) -> String {
        match self {
            Self::Bool(v) => String::from(if *v { "true" } else { "false" }),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::String(v) => v.clone(),
            Self::Color(v) => v.to_string(),
            Self::IntVector(v) => join(v),
            Self::FloatVector(v) => join(v),
            Self::KeyBind(v) => v.code().to_string(),
        }
    }

    /// Checks that [`to_ini_string`](Self::to_ini_string) reads back as the
    /// same value once written on a `key=value` line.
    ///
    /// Only strings can fail: a line break would split the entry, and
    /// surrounding spaces or tabs are trimmed on read.
    ///
    /// # Errors
    ///
    /// Returns [`ValueSyntaxError`] naming the offending content.
    pub fn check_storable(&self) -> Result<(), ValueSyntaxError> {
        let Self::String(text) = self else {
            return Ok(());
        };
        if text.contains(['\r', '\n']) {
            return Err(ValueSyntaxError::new("line breaks cannot be stored"));
        }
        if text.trim_matches([' ', '\t']).len() != text.len() {
            return Err(ValueSyntaxError::new(
                "leading or trailing spaces and tabs cannot be stored",
            ));
        }
        Ok(())
    }

    /// Parses `raw` as a value of type `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueSyntaxError`] when `raw` is not valid text for `tag`.
    pub fn parse_as(tag: TypeTag, raw: &str) -> Result<Self, ValueSyntaxError> {
        let value = match tag {
            TypeTag::Bool => Self::Bool(parse_bool(raw)?),
            TypeTag::Int => Self::Int(parse_number(raw)?),
            TypeTag::Float => Self::Float(parse_number(raw)?),
            TypeTag::String => Self::String(raw.to_string()),
            TypeTag::Color => Self::Color(raw.parse()?),
            TypeTag::IntVector => Self::IntVector(parse_list(raw)?),
            TypeTag::FloatVector => Self::FloatVector(parse_list(raw)?),
            TypeTag::KeyBind => Self::KeyBind(KeyBind::new(parse_number(raw)?)),
        };
        Ok(value)
    }
}

/// Binds a Rust type to the [`TypeTag`] it is stored under.
///
/// Implemented for `bool`, `i32`, `f32`, `String`, [`Color`], `Vec<i32>`,
/// `Vec<f32>` and [`KeyBind`].
pub trait ConfigValue: Sized {
    /// Tag of the variant this type lives in.
    const TAG: TypeTag;

    fn into_value(self) -> TypedValue;

    /// Returns a copy of the payload if `value` holds this type's variant.
    fn from_value(value: &TypedValue) -> Option<Self>;

    /// Borrows the payload mutably if `value` holds this type's variant.
    fn from_value_mut(value: &mut TypedValue) -> Option<&mut Self>;
}

macro_rules! impl_config_value {
    ($ty:ty, $variant:ident) => {
        impl ConfigValue for $ty {
            const TAG: TypeTag = TypeTag::$variant;

            fn into_value(self) -> TypedValue {
                TypedValue::$variant(self)
            }

            fn from_value(value: &TypedValue) -> Option<Self> {
                match value {
                    TypedValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }

            fn from_value_mut(value: &mut TypedValue) -> Option<&mut Self> {
                match value {
                    TypedValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_config_value!(bool, Bool);
impl_config_value!(i32, Int);
impl_config_value!(f32, Float);
impl_config_value!(String, String);
impl_config_value!(Color, Color);
impl_config_value!(Vec<i32>, IntVector);
impl_config_value!(Vec<f32>, FloatVector);
impl_config_value!(KeyBind, KeyBind);

// ── Text helpers ──────────────────────────────────────────────────────────────

fn parse_bool(raw: &str) -> Result<bool, ValueSyntaxError> {
    let text = raw.trim();
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ValueSyntaxError::new("expected `true` or `false`"))
    }
}

fn parse_number<T>(raw: &str) -> Result<T, ValueSyntaxError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ValueSyntaxError::new(e.to_string()))
}

fn parse_list<T>(raw: &str) -> Result<Vec<T>, ValueSyntaxError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    components(raw)
        .into_iter()
        .map(|part| {
            part.parse::<T>()
                .map_err(|e| ValueSyntaxError::new(format!("element {part:?}: {e}")))
        })
        .collect()
}

/// Splits comma-joined text into trimmed components; blank text has none.
fn components(raw: &str) -> Vec<&str> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::trim).collect()
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_encodes_as_four_components() {
        let value = TypedValue::Color(Color::new(255, 0, 0, 255));
        assert_eq!(value.to_ini_string(), "255,0,0,255");
    }

    #[test]
    fn test_color_rejects_three_components() {
        let err = TypedValue::parse_as(TypeTag::Color, "1,2,3").unwrap_err();
        assert!(err.reason().contains("expected 4 components"));
    }

    #[test]
    fn test_color_rejects_channel_above_255() {
        assert!(TypedValue::parse_as(TypeTag::Color, "256,0,0,0").is_err());
    }

    #[test]
    fn test_four_ints_parse_as_vector_when_tag_says_vector() {
        // Tag-directed: the same text is a vector here, never a color.
        let value = TypedValue::parse_as(TypeTag::IntVector, "1,2,3,4").unwrap();
        assert_eq!(value, TypedValue::IntVector(vec![1, 2, 3, 4]));
    }

    #[test]
    fn test_bool_accepts_mixed_case() {
        assert_eq!(
            TypedValue::parse_as(TypeTag::Bool, "True").unwrap(),
            TypedValue::Bool(true)
        );
        assert_eq!(
            TypedValue::parse_as(TypeTag::Bool, " false ").unwrap(),
            TypedValue::Bool(false)
        );
    }

    #[test]
    fn test_bool_rejects_numeric_text() {
        assert!(TypedValue::parse_as(TypeTag::Bool, "1").is_err());
    }

    #[test]
    fn test_int_rejects_float_text() {
        assert!(TypedValue::parse_as(TypeTag::Int, "1.5").is_err());
    }

    #[test]
    fn test_float_text_round_trips() {
        let value = TypedValue::Float(1.5);
        let text = value.to_ini_string();
        assert_eq!(TypedValue::parse_as(TypeTag::Float, &text).unwrap(), value);
    }

    #[test]
    fn test_empty_vector_round_trips() {
        let value = TypedValue::FloatVector(Vec::new());
        assert_eq!(value.to_ini_string(), "");
        assert_eq!(
            TypedValue::parse_as(TypeTag::FloatVector, "").unwrap(),
            value
        );
    }

    #[test]
    fn test_string_is_kept_verbatim() {
        let value = TypedValue::parse_as(TypeTag::String, "a, b = c").unwrap();
        assert_eq!(value, TypedValue::String("a, b = c".to_string()));
    }

    #[test]
    fn test_check_storable_rejects_line_breaks_and_padding() {
        assert!(TypedValue::String("a\nb".into()).check_storable().is_err());
        assert!(TypedValue::String("a\r".into()).check_storable().is_err());
        assert!(TypedValue::String("\ta".into()).check_storable().is_err());
        assert!(TypedValue::String("a b = c".into()).check_storable().is_ok());
        assert!(TypedValue::Float(f32::NAN).check_storable().is_ok());
    }

    #[test]
    fn test_keybind_stores_code_and_names_known_keys() {
        let value = TypedValue::parse_as(TypeTag::KeyBind, "4").unwrap();
        assert_eq!(value, TypedValue::KeyBind(KeyBind::new(4)));
        assert_eq!(KeyBind::new(4).name(), "Middle Mouse Button");
        assert_eq!(KeyBind::new(0x0E).name(), "Unknown Key: 14");
    }

    #[test]
    fn test_config_value_rejects_other_variant() {
        let value = TypedValue::Int(3);
        assert_eq!(i32::from_value(&value), Some(3));
        assert_eq!(bool::from_value(&value), None);
        assert_eq!(<Vec<i32>>::TAG, TypeTag::IntVector);
    }
}

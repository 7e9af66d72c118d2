//! Tagged values
//!
//! [`Argument`] is the decoded form of one value record. Variable-length
//! content is held in a `Cow`, so values read from a buffer borrow the
//! buffer's bytes and values built by callers may own theirs.
//!
//! Two families of accessors exist:
//! - lenient (`as_*`, `is_true`, `Display`): total, never fail, fall back to
//!   zero or empty for anything they cannot interpret
//! - strict (`try_*`): return [`ArgumentsError::Conversion`] instead of
//!   guessing

use crate::convert::{
    decode_wide, decode_wide_lossy, encode_wide, from_hex, looks_numeric, parse_leading_f64,
    parse_leading_i64, parse_leading_u64, to_hex,
};
use crate::error::{ArgumentsError, Result};
use crate::tag::ValueType;
use serde::ser::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// One typed value, borrowed from a buffer or owned by the caller
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Argument<'a> {
    #[default]
    Unknown,
    Bool(bool),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Pointer(u64),
    Guid([u8; 16]),
    /// Single-byte text, not required to be UTF-8
    String(Cow<'a, [u8]>),
    Utf8String(Cow<'a, [u8]>),
    /// UTF-16 code units as native-endian bytes
    WString(Cow<'a, [u8]>),
    Binary(Cow<'a, [u8]>),
}

impl<'a> Argument<'a> {
    pub fn utf8(text: impl Into<Cow<'a, str>>) -> Self {
        match text.into() {
            Cow::Borrowed(s) => Argument::Utf8String(Cow::Borrowed(s.as_bytes())),
            Cow::Owned(s) => Argument::Utf8String(Cow::Owned(s.into_bytes())),
        }
    }

    pub fn ascii(text: impl Into<Cow<'a, str>>) -> Self {
        match text.into() {
            Cow::Borrowed(s) => Argument::String(Cow::Borrowed(s.as_bytes())),
            Cow::Owned(s) => Argument::String(Cow::Owned(s.into_bytes())),
        }
    }

    /// UTF-16 text transcoded from `text`
    pub fn wide(text: &str) -> Argument<'static> {
        Argument::WString(Cow::Owned(encode_wide(text)))
    }

    pub fn wide_units(units: &[u16]) -> Argument<'static> {
        Argument::WString(Cow::Owned(
            units.iter().flat_map(|unit| unit.to_ne_bytes()).collect(),
        ))
    }

    pub fn binary(bytes: impl Into<Cow<'a, [u8]>>) -> Self {
        Argument::Binary(bytes.into())
    }

    pub fn guid(bytes: [u8; 16]) -> Self {
        Argument::Guid(bytes)
    }

    pub fn pointer(address: u64) -> Self {
        Argument::Pointer(address)
    }

    /// Decode a payload of type `ty` without copying variable-length content
    ///
    /// `bytes` is the exact content: the fixed-size payload, or the
    /// native-length bytes of a variable value.
    pub fn from_raw(ty: ValueType, bytes: &'a [u8]) -> Result<Self> {
        let value = match ty {
            ValueType::Unknown => {
                exact::<0>(ty, bytes)?;
                Argument::Unknown
            }
            ValueType::Bool => Argument::Bool(exact::<1>(ty, bytes)?[0] != 0),
            ValueType::Int8 => Argument::Int8(i8::from_ne_bytes(exact(ty, bytes)?)),
            ValueType::UInt8 => Argument::UInt8(exact::<1>(ty, bytes)?[0]),
            ValueType::Int16 => Argument::Int16(i16::from_ne_bytes(exact(ty, bytes)?)),
            ValueType::UInt16 => Argument::UInt16(u16::from_ne_bytes(exact(ty, bytes)?)),
            ValueType::Int32 => Argument::Int32(i32::from_ne_bytes(exact(ty, bytes)?)),
            ValueType::UInt32 => Argument::UInt32(u32::from_ne_bytes(exact(ty, bytes)?)),
            ValueType::Int64 => Argument::Int64(i64::from_ne_bytes(exact(ty, bytes)?)),
            ValueType::UInt64 => Argument::UInt64(u64::from_ne_bytes(exact(ty, bytes)?)),
            ValueType::Float => Argument::Float(f32::from_ne_bytes(exact(ty, bytes)?)),
            ValueType::Double => Argument::Double(f64::from_ne_bytes(exact(ty, bytes)?)),
            ValueType::Pointer => Argument::Pointer(u64::from_ne_bytes(exact(ty, bytes)?)),
            ValueType::Guid => Argument::Guid(exact(ty, bytes)?),
            ValueType::String => Argument::String(Cow::Borrowed(bytes)),
            ValueType::Utf8String => Argument::Utf8String(Cow::Borrowed(bytes)),
            ValueType::WString => {
                if bytes.len() % 2 != 0 {
                    return Err(ArgumentsError::InvalidPayload {
                        type_name: ty.name(),
                        expected: bytes.len() + 1,
                        found: bytes.len(),
                    });
                }
                Argument::WString(Cow::Borrowed(bytes))
            }
            ValueType::Binary => Argument::Binary(Cow::Borrowed(bytes)),
        };
        Ok(value)
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Argument::Unknown => ValueType::Unknown,
            Argument::Bool(_) => ValueType::Bool,
            Argument::Int8(_) => ValueType::Int8,
            Argument::UInt8(_) => ValueType::UInt8,
            Argument::Int16(_) => ValueType::Int16,
            Argument::UInt16(_) => ValueType::UInt16,
            Argument::Int32(_) => ValueType::Int32,
            Argument::UInt32(_) => ValueType::UInt32,
            Argument::Int64(_) => ValueType::Int64,
            Argument::UInt64(_) => ValueType::UInt64,
            Argument::Float(_) => ValueType::Float,
            Argument::Double(_) => ValueType::Double,
            Argument::Pointer(_) => ValueType::Pointer,
            Argument::Guid(_) => ValueType::Guid,
            Argument::String(_) => ValueType::String,
            Argument::Utf8String(_) => ValueType::Utf8String,
            Argument::WString(_) => ValueType::WString,
            Argument::Binary(_) => ValueType::Binary,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// Variable-length content, `None` for fixed-size values
    pub fn content(&self) -> Option<&[u8]> {
        match self {
            Argument::String(bytes)
            | Argument::Utf8String(bytes)
            | Argument::WString(bytes)
            | Argument::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Payload size in bytes (content length for variable types)
    pub fn byte_len(&self) -> usize {
        match self.content() {
            Some(bytes) => bytes.len(),
            None => self.value_type().fixed_size().unwrap_or(0),
        }
    }

    /// Length stored in the inline length field: bytes, or UTF-16 units
    pub fn native_len(&self) -> usize {
        self.byte_len() / self.value_type().unit_size()
    }

    /// Write the payload into `out`, which must be exactly `byte_len()` long
    pub fn write_payload(&self, out: &mut [u8]) {
        match self {
            Argument::Unknown => {}
            Argument::Bool(v) => out[0] = u8::from(*v),
            Argument::Int8(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Argument::UInt8(v) => out[0] = *v,
            Argument::Int16(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Argument::UInt16(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Argument::Int32(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Argument::UInt32(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Argument::Int64(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Argument::UInt64(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Argument::Float(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Argument::Double(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Argument::Pointer(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Argument::Guid(v) => out.copy_from_slice(v),
            Argument::String(bytes)
            | Argument::Utf8String(bytes)
            | Argument::WString(bytes)
            | Argument::Binary(bytes) => out.copy_from_slice(bytes),
        }
    }

    /// Detach from the buffer the value was read from
    pub fn into_owned(self) -> Argument<'static> {
        match self {
            Argument::Unknown => Argument::Unknown,
            Argument::Bool(v) => Argument::Bool(v),
            Argument::Int8(v) => Argument::Int8(v),
            Argument::UInt8(v) => Argument::UInt8(v),
            Argument::Int16(v) => Argument::Int16(v),
            Argument::UInt16(v) => Argument::UInt16(v),
            Argument::Int32(v) => Argument::Int32(v),
            Argument::UInt32(v) => Argument::UInt32(v),
            Argument::Int64(v) => Argument::Int64(v),
            Argument::UInt64(v) => Argument::UInt64(v),
            Argument::Float(v) => Argument::Float(v),
            Argument::Double(v) => Argument::Double(v),
            Argument::Pointer(v) => Argument::Pointer(v),
            Argument::Guid(v) => Argument::Guid(v),
            Argument::String(b) => Argument::String(Cow::Owned(b.into_owned())),
            Argument::Utf8String(b) => Argument::Utf8String(Cow::Owned(b.into_owned())),
            Argument::WString(b) => Argument::WString(Cow::Owned(b.into_owned())),
            Argument::Binary(b) => Argument::Binary(Cow::Owned(b.into_owned())),
        }
    }

    /// Re-borrow without copying content
    pub fn reborrow(&self) -> Argument<'_> {
        match self {
            Argument::String(b) => Argument::String(Cow::Borrowed(b)),
            Argument::Utf8String(b) => Argument::Utf8String(Cow::Borrowed(b)),
            Argument::WString(b) => Argument::WString(Cow::Borrowed(b)),
            Argument::Binary(b) => Argument::Binary(Cow::Borrowed(b)),
            other => other.clone(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Argument::Unknown)
    }

    pub fn is_text(&self) -> bool {
        self.value_type().is_text()
    }

    pub fn is_numeric(&self) -> bool {
        self.value_type().is_numeric()
    }

    /// Text content as UTF-8, decoding wide strings and replacing invalid data
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Argument::String(b) | Argument::Utf8String(b) => Some(String::from_utf8_lossy(b)),
            Argument::WString(b) => Some(Cow::Owned(decode_wide_lossy(b))),
            _ => None,
        }
    }

    /// Borrowed UTF-8 text for single-byte and UTF-8 strings
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::String(b) | Argument::Utf8String(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Argument::Binary(b) => Some(b),
            Argument::Guid(g) => Some(g),
            _ => None,
        }
    }

    // ---- lenient coercion ----

    /// Zero, empty and unknown values are false, everything else true
    pub fn is_true(&self) -> bool {
        match self {
            Argument::Unknown => false,
            Argument::Bool(v) => *v,
            Argument::Float(v) => *v != 0.0,
            Argument::Double(v) => *v != 0.0,
            Argument::Guid(g) => g.iter().any(|b| *b != 0),
            Argument::String(b)
            | Argument::Utf8String(b)
            | Argument::WString(b)
            | Argument::Binary(b) => !b.is_empty(),
            other => other.as_i128() != 0,
        }
    }

    /// Numbers are true when nonzero; text is true for `true` or a nonzero
    /// leading number
    pub fn as_bool(&self) -> bool {
        match self.text() {
            Some(text) => {
                let text = text.trim();
                text.eq_ignore_ascii_case("true") || parse_leading_i64(text) != 0
            }
            None => self.is_true(),
        }
    }

    pub fn as_i32(&self) -> i32 {
        self.as_i64() as i32
    }

    pub fn as_u32(&self) -> u32 {
        self.as_u64() as u32
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            Argument::Float(v) => *v as i64,
            Argument::Double(v) => *v as i64,
            Argument::String(_) | Argument::Utf8String(_) | Argument::WString(_) => {
                self.text().map_or(0, |text| parse_leading_i64(&text))
            }
            other => other.as_i128() as i64,
        }
    }

    pub fn as_u64(&self) -> u64 {
        match self {
            Argument::Float(v) => *v as u64,
            Argument::Double(v) => *v as u64,
            Argument::String(_) | Argument::Utf8String(_) | Argument::WString(_) => {
                self.text().map_or(0, |text| parse_leading_u64(&text))
            }
            other => other.as_i128() as u64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Argument::Float(v) => f64::from(*v),
            Argument::Double(v) => *v,
            Argument::String(_) | Argument::Utf8String(_) | Argument::WString(_) => {
                self.text().map_or(0.0, |text| parse_leading_f64(&text))
            }
            other => other.as_i128() as f64,
        }
    }

    pub fn as_f32(&self) -> f32 {
        self.as_f64() as f32
    }

    /// Integer view of integral values; floats truncate, the rest are zero
    fn as_i128(&self) -> i128 {
        match self {
            Argument::Bool(v) => i128::from(*v),
            Argument::Int8(v) => i128::from(*v),
            Argument::UInt8(v) => i128::from(*v),
            Argument::Int16(v) => i128::from(*v),
            Argument::UInt16(v) => i128::from(*v),
            Argument::Int32(v) => i128::from(*v),
            Argument::UInt32(v) => i128::from(*v),
            Argument::Int64(v) => i128::from(*v),
            Argument::UInt64(v) => i128::from(*v),
            Argument::Pointer(v) => i128::from(*v),
            Argument::Float(v) => *v as i128,
            Argument::Double(v) => *v as i128,
            _ => 0,
        }
    }

    // ---- strict conversion ----

    fn conversion_error(&self, target: &'static str) -> ArgumentsError {
        ArgumentsError::Conversion {
            value: format!("{} ({})", self, self.type_name()),
            target,
        }
    }

    /// Exact integer value, rejecting fractions, text that is not entirely a
    /// number, and non-numeric types
    fn try_i128(&self, target: &'static str) -> Result<i128> {
        match self {
            Argument::Float(_) | Argument::Double(_) => {
                let v = self.as_f64();
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1.8e19 {
                    Ok(v as i128)
                } else {
                    Err(self.conversion_error(target))
                }
            }
            Argument::String(_) | Argument::Utf8String(_) | Argument::WString(_) => self
                .try_text()?
                .trim()
                .parse::<i128>()
                .map_err(|_| self.conversion_error(target)),
            Argument::Unknown | Argument::Guid(_) | Argument::Binary(_) => {
                Err(self.conversion_error(target))
            }
            other => Ok(other.as_i128()),
        }
    }

    pub fn try_i64(&self) -> Result<i64> {
        i64::try_from(self.try_i128("int64")?).map_err(|_| self.conversion_error("int64"))
    }

    pub fn try_u64(&self) -> Result<u64> {
        u64::try_from(self.try_i128("uint64")?).map_err(|_| self.conversion_error("uint64"))
    }

    pub fn try_i32(&self) -> Result<i32> {
        i32::try_from(self.try_i128("int32")?).map_err(|_| self.conversion_error("int32"))
    }

    pub fn try_u32(&self) -> Result<u32> {
        u32::try_from(self.try_i128("uint32")?).map_err(|_| self.conversion_error("uint32"))
    }

    pub fn try_f64(&self) -> Result<f64> {
        match self {
            Argument::Float(v) => Ok(f64::from(*v)),
            Argument::Double(v) => Ok(*v),
            Argument::String(_) | Argument::Utf8String(_) | Argument::WString(_) => self
                .try_text()?
                .trim()
                .parse::<f64>()
                .map_err(|_| self.conversion_error("double")),
            Argument::Unknown | Argument::Guid(_) | Argument::Binary(_) => {
                Err(self.conversion_error("double"))
            }
            other => Ok(other.as_i128() as f64),
        }
    }

    /// Accepts bools, the integers 0 and 1, and the words `true`/`false`/`1`/`0`
    pub fn try_bool(&self) -> Result<bool> {
        match self {
            Argument::Bool(v) => Ok(*v),
            Argument::String(_) | Argument::Utf8String(_) | Argument::WString(_) => {
                let text = self.try_text()?;
                match text.trim() {
                    t if t.eq_ignore_ascii_case("true") || t == "1" => Ok(true),
                    t if t.eq_ignore_ascii_case("false") || t == "0" => Ok(false),
                    _ => Err(self.conversion_error("bool")),
                }
            }
            _ => match self.try_i128("bool") {
                Ok(0) => Ok(false),
                Ok(1) => Ok(true),
                _ => Err(self.conversion_error("bool")),
            },
        }
    }

    /// Text content, failing on invalid UTF-8 or UTF-16 and on non-text values
    pub fn try_text(&self) -> Result<Cow<'_, str>> {
        match self {
            Argument::String(b) | Argument::Utf8String(b) => std::str::from_utf8(b)
                .map(Cow::Borrowed)
                .map_err(|_| self.conversion_error("utf8")),
            Argument::WString(b) => decode_wide(b)
                .map(Cow::Owned)
                .ok_or_else(|| self.conversion_error("utf8")),
            _ => Err(self.conversion_error("utf8")),
        }
    }

    fn try_int<T: TryFrom<i128>>(&self, target: &'static str) -> Result<T> {
        T::try_from(self.try_i128(target)?).map_err(|_| self.conversion_error(target))
    }

    // ---- parsing ----

    /// Convert `text` to a value of type `ty` using the strict conversions
    ///
    /// GUIDs take 32 hex digits (dashes ignored), binary takes hex pairs and
    /// pointers take a decimal address.
    pub fn parse_as(ty: ValueType, text: &str) -> Result<Argument<'static>> {
        let source = Argument::utf8(text);
        let value = match ty {
            ValueType::Unknown => return Err(source.conversion_error("unknown")),
            ValueType::Bool => Argument::Bool(source.try_bool()?),
            ValueType::Int8 => Argument::Int8(source.try_int("int8")?),
            ValueType::UInt8 => Argument::UInt8(source.try_int("uint8")?),
            ValueType::Int16 => Argument::Int16(source.try_int("int16")?),
            ValueType::UInt16 => Argument::UInt16(source.try_int("uint16")?),
            ValueType::Int32 => Argument::Int32(source.try_int("int32")?),
            ValueType::UInt32 => Argument::UInt32(source.try_int("uint32")?),
            ValueType::Int64 => Argument::Int64(source.try_int("int64")?),
            ValueType::UInt64 => Argument::UInt64(source.try_int("uint64")?),
            ValueType::Float => Argument::Float(source.try_f64()? as f32),
            ValueType::Double => Argument::Double(source.try_f64()?),
            ValueType::Pointer => Argument::Pointer(source.try_int("pointer")?),
            ValueType::Guid => {
                let digits: String = text.trim().chars().filter(|c| *c != '-').collect();
                let bytes = from_hex(&digits).ok_or_else(|| source.conversion_error("guid"))?;
                Argument::Guid(
                    bytes
                        .try_into()
                        .map_err(|_| source.conversion_error("guid"))?,
                )
            }
            ValueType::String => Argument::ascii(text.to_owned()),
            ValueType::Utf8String => Argument::utf8(text.to_owned()),
            ValueType::WString => Argument::wide(text),
            ValueType::Binary => Argument::binary(
                from_hex(text.trim()).ok_or_else(|| source.conversion_error("binary"))?,
            ),
        };
        Ok(value)
    }

    /// Guess the type of `text`: a whole integer becomes `Int64`, another
    /// number `Double`, anything else UTF-8 text
    pub fn infer(text: &str) -> Argument<'static> {
        let trimmed = text.trim();
        if looks_numeric(trimmed) {
            if let Ok(v) = trimmed.parse::<i64>() {
                return Argument::Int64(v);
            }
            if let Ok(v) = trimmed.parse::<f64>() {
                return Argument::Double(v);
            }
        }
        Argument::utf8(text.to_owned())
    }

    // ---- comparison ----

    /// Compare within a type group: numbers by value across widths, text by
    /// decoded content across encodings, everything else strictly
    pub fn eq_group(&self, other: &Argument<'_>) -> bool {
        let (a, b) = (self.value_type(), other.value_type());
        if a.is_numeric() && b.is_numeric() {
            if a.is_floating() || b.is_floating() {
                self.as_f64() == other.as_f64()
            } else {
                self.as_i128() == other.as_i128()
            }
        } else if a.is_text() && b.is_text() {
            self.text() == other.text()
        } else {
            self == other
        }
    }
}

fn exact<const N: usize>(ty: ValueType, bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| ArgumentsError::InvalidPayload {
            type_name: ty.name(),
            expected: N,
            found: bytes.len(),
        })
}

/// Lenient string form used by `print` and template substitution
impl fmt::Display for Argument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Unknown => Ok(()),
            Argument::Bool(v) => f.write_str(if *v { "1" } else { "0" }),
            Argument::Int8(v) => write!(f, "{}", v),
            Argument::UInt8(v) => write!(f, "{}", v),
            Argument::Int16(v) => write!(f, "{}", v),
            Argument::UInt16(v) => write!(f, "{}", v),
            Argument::Int32(v) => write!(f, "{}", v),
            Argument::UInt32(v) => write!(f, "{}", v),
            Argument::Int64(v) => write!(f, "{}", v),
            Argument::UInt64(v) => write!(f, "{}", v),
            Argument::Float(v) => write!(f, "{}", v),
            Argument::Double(v) => write!(f, "{}", v),
            Argument::Pointer(v) => write!(f, "{:#x}", v),
            Argument::Guid(g) => f.write_str(&to_hex(g)),
            Argument::Binary(b) => f.write_str(&to_hex(b)),
            Argument::String(b) | Argument::Utf8String(b) => {
                f.write_str(&String::from_utf8_lossy(b))
            }
            Argument::WString(b) => f.write_str(&decode_wide_lossy(b)),
        }
    }
}

impl Serialize for Argument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Argument::Unknown => serializer.serialize_unit(),
            Argument::Bool(v) => serializer.serialize_bool(*v),
            Argument::Int8(v) => serializer.serialize_i8(*v),
            Argument::UInt8(v) => serializer.serialize_u8(*v),
            Argument::Int16(v) => serializer.serialize_i16(*v),
            Argument::UInt16(v) => serializer.serialize_u16(*v),
            Argument::Int32(v) => serializer.serialize_i32(*v),
            Argument::UInt32(v) => serializer.serialize_u32(*v),
            Argument::Int64(v) => serializer.serialize_i64(*v),
            Argument::UInt64(v) => serializer.serialize_u64(*v),
            Argument::Float(v) => serializer.serialize_f32(*v),
            Argument::Double(v) => serializer.serialize_f64(*v),
            Argument::Pointer(v) => serializer.serialize_u64(*v),
            Argument::Guid(_) | Argument::Binary(_) => serializer.serialize_str(&self.to_string()),
            Argument::String(_) | Argument::Utf8String(_) | Argument::WString(_) => {
                serializer.serialize_str(&self.to_string())
            }
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Argument<'_> {
                fn from(value: $ty) -> Self {
                    Argument::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
}

impl<'a> From<&'a str> for Argument<'a> {
    fn from(value: &'a str) -> Self {
        Argument::ascii(value)
    }
}

impl From<String> for Argument<'_> {
    fn from(value: String) -> Self {
        Argument::ascii(value)
    }
}

impl<'a> From<&'a [u8]> for Argument<'a> {
    fn from(value: &'a [u8]) -> Self {
        Argument::Binary(Cow::Borrowed(value))
    }
}

impl From<Vec<u8>> for Argument<'_> {
    fn from(value: Vec<u8>) -> Self {
        Argument::Binary(Cow::Owned(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_fixed_width_checked() {
        let bytes = 25i32.to_ne_bytes();
        assert_eq!(
            Argument::from_raw(ValueType::Int32, &bytes).unwrap(),
            Argument::Int32(25)
        );
        assert!(matches!(
            Argument::from_raw(ValueType::Int64, &bytes),
            Err(ArgumentsError::InvalidPayload {
                expected: 8,
                found: 4,
                ..
            })
        ));
        assert!(Argument::from_raw(ValueType::WString, &[0x41]).is_err());
    }

    #[test]
    fn test_from_raw_borrows_variable_content() {
        let bytes = b"Bob".to_vec();
        let value = Argument::from_raw(ValueType::String, &bytes).unwrap();
        assert!(matches!(value, Argument::String(Cow::Borrowed(_))));
        assert_eq!(value.as_str(), Some("Bob"));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Argument::Int8(-3).as_i64(), -3);
        assert_eq!(Argument::Int8(-3).as_u32(), u32::MAX - 2);
        assert_eq!(Argument::UInt64(u64::MAX).as_i64(), -1);
        assert_eq!(Argument::Double(3.9).as_i32(), 3);
        assert_eq!(Argument::Float(2.5).as_f64(), 2.5);
        assert_eq!(Argument::Bool(true).as_u64(), 1);
        assert!(Argument::Int16(-1).as_bool());
        assert!(!Argument::UInt32(0).as_bool());
    }

    #[test]
    fn test_text_coercion_is_lenient() {
        assert_eq!(Argument::from("42abc").as_i32(), 42);
        assert_eq!(Argument::from("abc").as_i64(), 0);
        assert_eq!(Argument::utf8("  -1.5e2x").as_f64(), -150.0);
        assert_eq!(Argument::wide("77").as_u64(), 77);
        assert!(Argument::from("true").as_bool());
        assert!(Argument::from("3").as_bool());
        assert!(!Argument::from("no").as_bool());
    }

    #[test]
    fn test_unknown_yields_zero_values() {
        let value = Argument::Unknown;
        assert_eq!(value.as_i64(), 0);
        assert_eq!(value.as_f64(), 0.0);
        assert!(!value.as_bool());
        assert!(!value.is_true());
        assert_eq!(value.to_string(), "");
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(Argument::Bool(true).to_string(), "1");
        assert_eq!(Argument::Int32(-25).to_string(), "-25");
        assert_eq!(Argument::Double(0.5).to_string(), "0.5");
        assert_eq!(Argument::Pointer(0xbeef).to_string(), "0xbeef");
        assert_eq!(Argument::binary(&[0x0Au8, 0xFF][..]).to_string(), "0AFF");
        let mut guid = [0u8; 16];
        guid[0] = 0xAB;
        assert_eq!(
            Argument::Guid(guid).to_string(),
            "AB000000000000000000000000000000"
        );
        assert_eq!(Argument::wide("wide ✓").to_string(), "wide ✓");
    }

    #[test]
    fn test_is_true() {
        assert!(Argument::from("x").is_true());
        assert!(!Argument::from("").is_true());
        assert!(!Argument::binary(Vec::<u8>::new()).is_true());
        assert!(!Argument::Guid([0; 16]).is_true());
        assert!(Argument::Double(-0.1).is_true());
    }

    #[test]
    fn test_strict_conversion() {
        assert_eq!(Argument::from(" 12 ").try_i32().unwrap(), 12);
        assert!(Argument::from("12abc").try_i32().is_err());
        assert!(Argument::Int64(-1).try_u64().is_err());
        assert!(Argument::Int64(i64::from(i32::MAX) + 1).try_i32().is_err());
        assert_eq!(Argument::Double(4.0).try_i64().unwrap(), 4);
        assert!(Argument::Double(4.5).try_i64().is_err());
        assert!(Argument::Unknown.try_f64().is_err());
        assert_eq!(Argument::utf8("2.25").try_f64().unwrap(), 2.25);
        assert!(Argument::from("FALSE").try_bool().map(|b| !b).unwrap());
        assert!(Argument::Int32(2).try_bool().is_err());
        assert!(matches!(
            Argument::binary(vec![1u8]).try_text(),
            Err(ArgumentsError::Conversion { target: "utf8", .. })
        ));
    }

    #[test]
    fn test_parse_as_named_types() {
        assert_eq!(
            Argument::parse_as(ValueType::Int32, "1000").unwrap(),
            Argument::Int32(1000)
        );
        assert_eq!(
            Argument::parse_as(ValueType::Double, ".234").unwrap(),
            Argument::Double(0.234)
        );
        assert_eq!(
            Argument::parse_as(ValueType::String, "London").unwrap(),
            Argument::ascii("London")
        );
        assert_eq!(
            Argument::parse_as(ValueType::WString, "wide").unwrap(),
            Argument::wide("wide")
        );
        assert_eq!(
            Argument::parse_as(ValueType::Bool, "true").unwrap(),
            Argument::Bool(true)
        );
        assert_eq!(
            Argument::parse_as(ValueType::Binary, "0aFF").unwrap(),
            Argument::binary(vec![0x0Au8, 0xFF])
        );
        let guid = Argument::parse_as(ValueType::Guid, "AB000000-0000-0000-0000-0000000000CD").unwrap();
        assert_eq!(guid.to_string(), "AB0000000000000000000000000000CD");
    }

    #[test]
    fn test_parse_as_rejects_bad_text() {
        assert!(Argument::parse_as(ValueType::Int8, "300").is_err());
        assert!(Argument::parse_as(ValueType::UInt16, "-1").is_err());
        assert!(Argument::parse_as(ValueType::Int32, "12abc").is_err());
        assert!(Argument::parse_as(ValueType::Double, "fast").is_err());
        assert!(Argument::parse_as(ValueType::Guid, "ABCD").is_err());
        assert!(Argument::parse_as(ValueType::Binary, "xyz").is_err());
        assert!(matches!(
            Argument::parse_as(ValueType::Unknown, ""),
            Err(ArgumentsError::Conversion { target: "unknown", .. })
        ));
    }

    #[test]
    fn test_infer() {
        assert_eq!(Argument::infer("42"), Argument::Int64(42));
        assert_eq!(Argument::infer(" -7 "), Argument::Int64(-7));
        assert_eq!(Argument::infer("2.5"), Argument::Double(2.5));
        assert_eq!(Argument::infer("1e3"), Argument::Double(1000.0));
        assert_eq!(Argument::infer("nan"), Argument::utf8("nan"));
        assert_eq!(Argument::infer("12px"), Argument::utf8("12px"));
        assert_eq!(Argument::infer(""), Argument::utf8(""));
    }

    #[test]
    fn test_eq_group() {
        assert!(Argument::Int8(7).eq_group(&Argument::UInt64(7)));
        assert!(Argument::Int32(2).eq_group(&Argument::Double(2.0)));
        assert!(!Argument::Int64(-1).eq_group(&Argument::UInt64(u64::MAX)));
        assert!(Argument::from("abc").eq_group(&Argument::wide("abc")));
        assert!(!Argument::from("1").eq_group(&Argument::Int32(1)));
        assert_ne!(Argument::Int8(7), Argument::UInt64(7));
    }

    #[test]
    fn test_into_owned_detaches() {
        let owned = {
            let text = String::from("temporary");
            Argument::ascii(text.as_str()).into_owned()
        };
        assert_eq!(owned.as_str(), Some("temporary"));
    }

    #[test]
    fn test_native_len_counts_units() {
        let value = Argument::wide("abc");
        assert_eq!(value.byte_len(), 6);
        assert_eq!(value.native_len(), 3);
        assert_eq!(Argument::Guid([1; 16]).byte_len(), 16);
    }
}

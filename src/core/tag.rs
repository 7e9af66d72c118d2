//! Type tag registry
//!
//! Every record in an argument buffer starts with an 8-bit tag. The low five
//! bits carry the type number, the top three bits are flags. Variable-length
//! values always carry [`LENGTH_FLAG`] so a reader can tell from the tag alone
//! that an inline native-length field follows the header.

use crate::error::{ArgumentsError, Result};
use serde::{Deserialize, Serialize};

/// Tag of the name sub-record that may precede a value record
pub const NAME_MARKER: u8 = 20;

/// Flag set on tags of values that carry an inline length field
pub const LENGTH_FLAG: u8 = 0x40;

/// Bits of a tag reserved for flags
pub const TYPE_FLAGS_MASK: u8 = 0xE0;

/// Bits of a tag holding the type number
pub const TYPE_NUMBER_MASK: u8 = 0x1F;

/// Value types that can be stored in an argument buffer
///
/// Discriminants are the on-wire type numbers. Number 17 (UTF-32 text) and
/// 19 are reserved and never produced or accepted.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Unknown = 0,
    Bool = 1,
    Int8 = 2,
    UInt8 = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32 = 6,
    UInt32 = 7,
    Int64 = 8,
    UInt64 = 9,
    Float = 10,
    Double = 11,
    /// Opaque 64-bit address, stored and compared but never dereferenced
    Pointer = 12,
    Guid = 13,
    /// Single-byte text
    String = 14,
    Utf8String = 15,
    /// UTF-16 text in native byte order
    WString = 16,
    Binary = 18,
}

impl ValueType {
    /// Resolve a type number (flags already stripped)
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ValueType::Unknown),
            1 => Ok(ValueType::Bool),
            2 => Ok(ValueType::Int8),
            3 => Ok(ValueType::UInt8),
            4 => Ok(ValueType::Int16),
            5 => Ok(ValueType::UInt16),
            6 => Ok(ValueType::Int32),
            7 => Ok(ValueType::UInt32),
            8 => Ok(ValueType::Int64),
            9 => Ok(ValueType::UInt64),
            10 => Ok(ValueType::Float),
            11 => Ok(ValueType::Double),
            12 => Ok(ValueType::Pointer),
            13 => Ok(ValueType::Guid),
            14 => Ok(ValueType::String),
            15 => Ok(ValueType::Utf8String),
            16 => Ok(ValueType::WString),
            18 => Ok(ValueType::Binary),
            _ => Err(ArgumentsError::InvalidTag(value)),
        }
    }

    /// Resolve a full header tag, ignoring flag bits
    ///
    /// The name marker is not a value type and is rejected.
    pub fn from_tag(tag: u8) -> Result<Self> {
        if is_name_marker(tag) {
            return Err(ArgumentsError::InvalidTag(tag));
        }
        Self::from_u8(tag & TYPE_NUMBER_MASK).map_err(|_| ArgumentsError::InvalidTag(tag))
    }

    /// Resolve a tag read from a packed value header
    ///
    /// Unlike [`ValueType::from_tag`] the flag bits must be exactly the ones
    /// [`ValueType::tag`] writes.
    pub fn from_header_tag(tag: u8) -> Result<Self> {
        let ty = Self::from_tag(tag)?;
        if ty.tag() != tag {
            return Err(ArgumentsError::InvalidTag(tag));
        }
        Ok(ty)
    }

    /// Tag written into a value header, including the length flag for
    /// variable-length types
    pub fn tag(self) -> u8 {
        if self.is_fixed_size() {
            self as u8
        } else {
            self as u8 | LENGTH_FLAG
        }
    }

    pub fn is_fixed_size(self) -> bool {
        !matches!(
            self,
            ValueType::String | ValueType::Utf8String | ValueType::WString | ValueType::Binary
        )
    }

    /// Payload size of a fixed-size type, `None` for variable-length types
    pub fn fixed_size(self) -> Option<usize> {
        let size = match self {
            ValueType::Unknown => 0,
            ValueType::Bool | ValueType::Int8 | ValueType::UInt8 => 1,
            ValueType::Int16 | ValueType::UInt16 => 2,
            ValueType::Int32 | ValueType::UInt32 | ValueType::Float => 4,
            ValueType::Int64 | ValueType::UInt64 | ValueType::Double | ValueType::Pointer => 8,
            ValueType::Guid => 16,
            ValueType::String | ValueType::Utf8String | ValueType::WString | ValueType::Binary => {
                return None
            }
        };
        Some(size)
    }

    /// Bytes per unit counted by the inline native-length field
    pub fn unit_size(self) -> usize {
        match self {
            ValueType::WString => 2,
            _ => 1,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ValueType::Int8
                | ValueType::UInt8
                | ValueType::Int16
                | ValueType::UInt16
                | ValueType::Int32
                | ValueType::UInt32
                | ValueType::Int64
                | ValueType::UInt64
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, ValueType::Float | ValueType::Double)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_floating() || self == ValueType::Bool
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            ValueType::String | ValueType::Utf8String | ValueType::WString
        )
    }

    /// Human-readable type name used by debug output
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Unknown => "unknown",
            ValueType::Bool => "bool",
            ValueType::Int8 => "int8",
            ValueType::UInt8 => "uint8",
            ValueType::Int16 => "int16",
            ValueType::UInt16 => "uint16",
            ValueType::Int32 => "int32",
            ValueType::UInt32 => "uint32",
            ValueType::Int64 => "int64",
            ValueType::UInt64 => "uint64",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Pointer => "pointer",
            ValueType::Guid => "guid",
            ValueType::String => "ascii",
            ValueType::Utf8String => "utf8",
            ValueType::WString => "unicode",
            ValueType::Binary => "binary",
        }
    }

    /// Look up a type by the name returned from [`ValueType::name`]
    ///
    /// The text type names `string`, `utf8string` and `wstring` are accepted
    /// as aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ValueType::String),
            "utf8string" => Some(ValueType::Utf8String),
            "wstring" => Some(ValueType::WString),
            _ => ALL_TYPES.iter().copied().find(|ty| ty.name() == name),
        }
    }
}

/// Every supported value type in type-number order
pub const ALL_TYPES: [ValueType; 18] = [
    ValueType::Unknown,
    ValueType::Bool,
    ValueType::Int8,
    ValueType::UInt8,
    ValueType::Int16,
    ValueType::UInt16,
    ValueType::Int32,
    ValueType::UInt32,
    ValueType::Int64,
    ValueType::UInt64,
    ValueType::Float,
    ValueType::Double,
    ValueType::Pointer,
    ValueType::Guid,
    ValueType::String,
    ValueType::Utf8String,
    ValueType::WString,
    ValueType::Binary,
];

pub fn is_name_marker(tag: u8) -> bool {
    tag == NAME_MARKER
}

/// Classify a raw header tag
pub fn is_fixed_size(tag: u8) -> Result<bool> {
    ValueType::from_tag(tag).map(ValueType::is_fixed_size)
}

/// Payload size for a raw fixed-size header tag
pub fn fixed_size(tag: u8) -> Result<usize> {
    ValueType::from_tag(tag)?
        .fixed_size()
        .ok_or(ArgumentsError::InvalidTag(tag))
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_number_conversion() {
        for ty in ALL_TYPES {
            assert_eq!(ValueType::from_u8(ty as u8).unwrap(), ty);
        }
        assert!(matches!(
            ValueType::from_u8(17),
            Err(ArgumentsError::InvalidTag(17))
        ));
        assert!(ValueType::from_u8(19).is_err());
        assert!(ValueType::from_u8(31).is_err());
    }

    #[test]
    fn test_tag_flags() {
        assert_eq!(ValueType::Int32.tag(), 6);
        assert_eq!(ValueType::String.tag(), 14 | LENGTH_FLAG);
        assert_eq!(ValueType::Binary.tag(), 0x52);
        assert_eq!(ValueType::from_tag(0x4E).unwrap(), ValueType::String);
        assert!(ValueType::from_tag(NAME_MARKER).is_err());
    }

    #[test]
    fn test_header_tags_need_exact_flags() {
        for ty in ALL_TYPES {
            assert_eq!(ValueType::from_header_tag(ty.tag()).unwrap(), ty);
        }
        // Int32 with the length flag, String without it, stray flag bits
        for tag in [0x46, 0x0E, 0x86, 0x26, 0x4E | 0x80] {
            assert!(matches!(
                ValueType::from_header_tag(tag),
                Err(ArgumentsError::InvalidTag(t)) if t == tag
            ));
        }
        assert!(ValueType::from_header_tag(NAME_MARKER).is_err());
    }

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(fixed_size(ValueType::Bool.tag()).unwrap(), 1);
        assert_eq!(fixed_size(ValueType::Int16.tag()).unwrap(), 2);
        assert_eq!(fixed_size(ValueType::Float.tag()).unwrap(), 4);
        assert_eq!(fixed_size(ValueType::Pointer.tag()).unwrap(), 8);
        assert_eq!(fixed_size(ValueType::Guid.tag()).unwrap(), 16);
        assert_eq!(ValueType::Unknown.fixed_size(), Some(0));
        assert!(fixed_size(ValueType::Utf8String.tag()).is_err());
        assert!(!is_fixed_size(ValueType::WString.tag()).unwrap());
        assert!(is_fixed_size(ValueType::Double.tag()).unwrap());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(ValueType::String.name(), "ascii");
        assert_eq!(ValueType::WString.to_string(), "unicode");
        assert_eq!(ValueType::from_name("uint64"), Some(ValueType::UInt64));
        assert_eq!(ValueType::from_name("utf32"), None);
        assert_eq!(ValueType::from_name("string"), Some(ValueType::String));
        assert_eq!(ValueType::from_name("wstring"), Some(ValueType::WString));
        for ty in ALL_TYPES {
            assert_eq!(ValueType::from_name(ty.name()), Some(ty));
        }
    }
}

//! Entry codec
//!
//! Pure functions over byte slices that compute and apply the physical
//! layout of one entry:
//!
//! ```text
//! entry        := [name_record]? value_record
//! name_record  := header(NAME, raw_name_len) name_bytes pad
//! value_record := header(tag, encoded_len) [native_len: u32]? payload pad
//! header       := u32, top 8 bits tag, low 24 bits length
//! ```
//!
//! Every record starts on a 4 byte boundary. All integers are native byte
//! order. Readers take the used region of a buffer as `src`, so the slice
//! length is the bound every record is checked against.

use crate::error::{ArgumentsError, Result};
use crate::tag::{is_name_marker, ValueType, NAME_MARKER};
use crate::value::Argument;

/// Record alignment in bytes
pub const ALIGNMENT: usize = 4;

/// Size of the packed tag/length header word
pub const HEADER_SIZE: usize = 4;

/// Size of the inline native-length field of variable-length values
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Largest encoded length representable in a header (24 bits)
pub const MAX_ENCODED_LEN: usize = 0x00FF_FFFF;

/// Largest name in bytes
pub const MAX_NAME_LEN: usize = 255;

const LENGTH_MASK: u32 = 0x00FF_FFFF;
const TAG_SHIFT: u32 = 24;

/// Round `size` up to the record alignment
pub const fn align(size: usize) -> usize {
    (size + ALIGNMENT - 1) & !(ALIGNMENT - 1)
}

/// Encoded length of a value record (the span after its header)
///
/// `byte_len` is the content length in bytes; for wide strings the stored
/// native length is half of it.
pub fn encoded_size_of(ty: ValueType, byte_len: usize) -> usize {
    match ty.fixed_size() {
        Some(size) => align(size),
        None => align(LENGTH_FIELD_SIZE + byte_len),
    }
}

/// Full size of a value record including its header
pub fn value_record_size(value: &Argument<'_>) -> usize {
    HEADER_SIZE + encoded_size_of(value.value_type(), value.byte_len())
}

/// Full size of a name record including its header
pub fn name_record_size(name: &str) -> usize {
    HEADER_SIZE + align(name.len())
}

/// Full size of an entry with an optional name
pub fn entry_size(name: Option<&str>, value: &Argument<'_>) -> usize {
    name.map_or(0, name_record_size) + value_record_size(value)
}

/// Reject names that cannot be stored
pub fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ArgumentsError::InvalidName("name is empty".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ArgumentsError::NameTooLong {
            length: name.len(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Reject values whose encoded length does not fit the header
pub fn check_value(value: &Argument<'_>) -> Result<()> {
    let encoded = encoded_size_of(value.value_type(), value.byte_len());
    if encoded > MAX_ENCODED_LEN {
        return Err(ArgumentsError::ValueTooLarge {
            length: encoded,
            max: MAX_ENCODED_LEN,
        });
    }
    Ok(())
}

/// Reject a stored name length the write path would never produce
fn check_name_len(position: usize, len: usize) -> Result<()> {
    if len == 0 {
        return Err(ArgumentsError::InvalidName(format!(
            "empty name at position {}",
            position
        )));
    }
    if len > MAX_NAME_LEN {
        return Err(ArgumentsError::NameTooLong {
            length: len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

fn check_alignment(position: usize) -> Result<()> {
    if position % ALIGNMENT != 0 {
        return Err(ArgumentsError::MisalignedPosition(position));
    }
    Ok(())
}

fn check_room(len: usize, position: usize, needed: usize) -> Result<()> {
    let available = len.saturating_sub(position);
    if needed > available {
        return Err(ArgumentsError::Truncated {
            position,
            needed,
            available,
        });
    }
    Ok(())
}

fn read_u32(src: &[u8], position: usize) -> Result<u32> {
    check_room(src.len(), position, 4)?;
    let mut word = [0u8; 4];
    word.copy_from_slice(&src[position..position + 4]);
    Ok(u32::from_ne_bytes(word))
}

/// Pack `tag` and `encoded_len` into the header word at `position`
pub fn write_header(dest: &mut [u8], position: usize, tag: u8, encoded_len: usize) -> Result<()> {
    check_alignment(position)?;
    if encoded_len > MAX_ENCODED_LEN {
        return Err(ArgumentsError::ValueTooLarge {
            length: encoded_len,
            max: MAX_ENCODED_LEN,
        });
    }
    check_room(dest.len(), position, HEADER_SIZE)?;
    let word = (u32::from(tag) << TAG_SHIFT) | encoded_len as u32;
    dest[position..position + HEADER_SIZE].copy_from_slice(&word.to_ne_bytes());
    Ok(())
}

/// Unpack the header word at `position` into `(tag, length)`
pub fn read_header(src: &[u8], position: usize) -> Result<(u8, usize)> {
    check_alignment(position)?;
    let word = read_u32(src, position)?;
    Ok(((word >> TAG_SHIFT) as u8, (word & LENGTH_MASK) as usize))
}

/// Write a name record, returning the position just past it
pub fn write_name(dest: &mut [u8], position: usize, name: &str) -> Result<usize> {
    check_name(name)?;
    let end = position + name_record_size(name);
    check_room(dest.len(), position, end - position)?;
    write_header(dest, position, NAME_MARKER, name.len())?;
    let start = position + HEADER_SIZE;
    dest[start..start + name.len()].copy_from_slice(name.as_bytes());
    dest[start + name.len()..end].fill(0);
    Ok(end)
}

/// Read the name record at `position`, returning the name and the position
/// of the value record that follows
pub fn read_name(src: &[u8], position: usize) -> Result<(&str, usize)> {
    let (tag, len) = read_header(src, position)?;
    if !is_name_marker(tag) {
        return Err(ArgumentsError::NotAName { position, tag });
    }
    check_name_len(position, len)?;
    let start = position + HEADER_SIZE;
    check_room(src.len(), start, align(len))?;
    let name = std::str::from_utf8(&src[start..start + len])
        .map_err(|e| ArgumentsError::InvalidName(format!("at position {}: {}", position, e)))?;
    Ok((name, start + align(len)))
}

/// Write a value record, returning the position just past it
pub fn write_value(dest: &mut [u8], position: usize, value: &Argument<'_>) -> Result<usize> {
    check_value(value)?;
    let ty = value.value_type();
    let byte_len = value.byte_len();
    let encoded = encoded_size_of(ty, byte_len);
    let end = position + HEADER_SIZE + encoded;
    check_room(dest.len(), position, end - position)?;

    write_header(dest, position, ty.tag(), encoded)?;
    let mut start = position + HEADER_SIZE;
    if !ty.is_fixed_size() {
        let native = value.native_len() as u32;
        dest[start..start + LENGTH_FIELD_SIZE].copy_from_slice(&native.to_ne_bytes());
        start += LENGTH_FIELD_SIZE;
    }
    value.write_payload(&mut dest[start..start + byte_len]);
    dest[start + byte_len..end].fill(0);
    Ok(end)
}

/// Read the value record at `position`, returning the value and the position
/// just past it
pub fn read_value(src: &[u8], position: usize) -> Result<(Argument<'_>, usize)> {
    let (tag, encoded) = read_header(src, position)?;
    let ty = ValueType::from_header_tag(tag)?;
    let start = position + HEADER_SIZE;
    check_room(src.len(), start, encoded)?;
    let end = start + encoded;

    let (content_start, byte_len) = match ty.fixed_size() {
        Some(size) => (start, size),
        None => {
            let native = read_u32(src, start)? as usize;
            (start + LENGTH_FIELD_SIZE, native * ty.unit_size())
        }
    };

    let expected = encoded_size_of(ty, byte_len);
    if expected != encoded {
        return Err(ArgumentsError::InvalidPayload {
            type_name: ty.name(),
            expected,
            found: encoded,
        });
    }

    let value = Argument::from_raw(ty, &src[content_start..content_start + byte_len])?;
    Ok((value, end))
}

/// Position of the value record of the entry at `position`
pub fn skip_name_if_present(src: &[u8], position: usize) -> Result<usize> {
    let (tag, len) = read_header(src, position)?;
    if is_name_marker(tag) {
        check_name_len(position, len)?;
        let next = position + HEADER_SIZE + align(len);
        check_room(src.len(), position, next - position)?;
        Ok(next)
    } else {
        Ok(position)
    }
}

/// Position of the entry following the one at `position`
///
/// Only headers are inspected; payloads are not decoded.
pub fn advance_to_next_entry(src: &[u8], position: usize) -> Result<usize> {
    let value_position = skip_name_if_present(src, position)?;
    let (tag, encoded) = read_header(src, value_position)?;
    ValueType::from_header_tag(tag)?;
    let next = value_position + HEADER_SIZE + encoded;
    check_room(src.len(), value_position, next - value_position)?;
    Ok(next)
}

/// One fully decoded entry
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry<'a> {
    /// Start of the entry (its name record, if any)
    pub position: usize,
    pub name: Option<&'a str>,
    /// Start of the value record
    pub value_position: usize,
    pub value: Argument<'a>,
    /// Start of the next entry
    pub end: usize,
}

/// Decode the entry at `position`, validating both records
pub fn decode_entry(src: &[u8], position: usize) -> Result<RawEntry<'_>> {
    let (tag, _) = read_header(src, position)?;
    let (name, value_position) = if is_name_marker(tag) {
        let (name, next) = read_name(src, position)?;
        (Some(name), next)
    } else {
        (None, position)
    };
    let (value, end) = read_value(src, value_position)?;
    Ok(RawEntry {
        position,
        name,
        value_position,
        value,
        end,
    })
}

/// Write an entry with an optional name, returning the position just past it
pub fn write_entry(
    dest: &mut [u8],
    position: usize,
    name: Option<&str>,
    value: &Argument<'_>,
) -> Result<usize> {
    let value_position = match name {
        Some(name) => write_name(dest, position, name)?,
        None => position,
    };
    write_value(dest, value_position, value)
}

/// Walk every entry of `src`, failing on the first malformed record
pub fn validate(src: &[u8]) -> Result<usize> {
    check_alignment(src.len())?;
    let mut count = 0;
    let mut position = 0;
    while position < src.len() {
        position = decode_entry(src, position)?.end;
        count += 1;
    }
    Ok(count)
}

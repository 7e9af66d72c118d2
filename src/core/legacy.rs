//! Import of the byte-oriented legacy layout
//!
//! Older buffers were written without alignment or packed headers:
//!
//! ```text
//! entry := [0x14 name_len:u8 name]? type:u8 [length:u32]? payload
//! ```
//!
//! Fixed-size values are followed directly by their payload. Values whose
//! type byte carries the length flag have a native-endian `u32` byte count
//! that includes a trailing terminator for text. Single-byte and UTF-8 text
//! without the flag is zero terminated, as is wide text (by a zero unit).
//!
//! Legacy buffers are only read; everything is converted to the packed layout.

use crate::buffer::ArgumentBuffer;
use crate::error::{ArgumentsError, Result};
use crate::store::ArgumentStore;
use crate::tag::{ValueType, LENGTH_FLAG, NAME_MARKER};
use crate::value::Argument;
use tracing::debug;

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn error(&self, reason: impl Into<String>) -> ArgumentsError {
        ArgumentsError::Legacy {
            offset: self.offset,
            reason: reason.into(),
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.bytes.len() - self.offset;
        if len > available {
            return Err(self.error(format!(
                "needs {} bytes, {} available",
                len, available
            )));
        }
        let bytes = self.bytes;
        let slice = &bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn length(&mut self) -> Result<usize> {
        let raw = self.take(4)?;
        Ok(u32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize)
    }

    /// Bytes up to a terminator of `unit` zero bytes, terminator consumed
    fn terminated(&mut self, unit: usize) -> Result<&'a [u8]> {
        let bytes = self.bytes;
        let rest = &bytes[self.offset..];
        let end = rest
            .chunks_exact(unit)
            .position(|chunk| chunk.iter().all(|b| *b == 0))
            .ok_or_else(|| self.error("unterminated text value"))?;
        let content = self.take(end * unit)?;
        self.take(unit)?;
        Ok(content)
    }

    fn name(&mut self) -> Result<Option<&'a str>> {
        if self.bytes.get(self.offset) != Some(&NAME_MARKER) {
            return Ok(None);
        }
        self.take(1)?;
        let len = usize::from(self.byte()?);
        let raw = self.take(len)?;
        let name = std::str::from_utf8(raw).map_err(|_| self.error("name is not UTF-8"))?;
        Ok((!name.is_empty()).then_some(name))
    }

    fn value(&mut self) -> Result<Argument<'a>> {
        let tag = self.byte()?;
        let ty = ValueType::from_tag(tag)
            .map_err(|_| self.error(format!("unsupported type tag {:#04x}", tag)))?;

        let content = if tag & LENGTH_FLAG != 0 {
            let len = self.length()?;
            let raw = self.take(len)?;
            match ty {
                ValueType::String | ValueType::Utf8String => {
                    raw.strip_suffix(&[0u8]).unwrap_or(raw)
                }
                ValueType::WString => raw.strip_suffix(&[0u8, 0]).unwrap_or(raw),
                _ => raw,
            }
        } else if let Some(size) = ty.fixed_size() {
            self.take(size)?
        } else {
            match ty {
                ValueType::String | ValueType::Utf8String => self.terminated(1)?,
                ValueType::WString => self.terminated(2)?,
                _ => return Err(self.error(format!("{} value without length", ty.name()))),
            }
        };

        let offset = self.offset;
        Argument::from_raw(ty, content).map_err(|e| ArgumentsError::Legacy {
            offset,
            reason: e.to_string(),
        })
    }
}

/// Convert a legacy buffer into a packed one
pub fn import<S: ArgumentStore + Default>(bytes: &[u8]) -> Result<ArgumentBuffer<S>> {
    let mut reader = Reader { bytes, offset: 0 };
    let mut buffer = ArgumentBuffer::<S>::new();
    let mut count = 0;
    while reader.offset < bytes.len() {
        let name = reader.name()?;
        let value = reader.value()?;
        match name {
            Some(name) => buffer.append_named(name, value)?,
            None => buffer.append(value)?,
        };
        count += 1;
    }
    debug!(
        "Imported {} legacy entries ({} bytes -> {} bytes)",
        count,
        bytes.len(),
        buffer.used_len()
    );
    Ok(buffer)
}

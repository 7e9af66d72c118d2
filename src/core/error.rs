use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArgumentsError {
    #[error("Invalid type tag: {0:#04x}")]
    InvalidTag(u8),

    #[error("Expected a name record at position {position}, found tag {tag:#04x}")]
    NotAName { position: usize, tag: u8 },

    #[error("Position {position} is out of range (used length {used})")]
    PositionOutOfRange { position: usize, used: usize },

    #[error("Position {0} is not aligned to a 4 byte boundary")]
    MisalignedPosition(usize),

    #[error("Position {0} is not the start of an entry")]
    NotAnEntry(usize),

    #[error("Index {index} is out of range ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Truncated record at {position}: needs {needed} bytes, {available} available")]
    Truncated {
        position: usize,
        needed: usize,
        available: usize,
    },

    #[error("Value too large: {length} bytes exceeds the {max} byte entry limit")]
    ValueTooLarge { length: usize, max: usize },

    #[error("Name too long: {length} bytes (max {max})")]
    NameTooLong { length: usize, max: usize },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid {type_name} payload: expected {expected} bytes, found {found}")]
    InvalidPayload {
        type_name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Allocation error: {0}")]
    Allocation(String),

    #[error("Cannot convert {value} to {target}")]
    Conversion { value: String, target: &'static str },

    #[error("Cannot parse argument text `{text}`: {reason}")]
    Parse { text: String, reason: String },

    #[error("Malformed legacy buffer at offset {offset}: {reason}")]
    Legacy { offset: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArgumentsError>;

//! Text interchange formats: JSON, URI query strings and YAML
//!
//! Entries are grouped by section: a named entry and the unnamed entries
//! after it form one key. A key with a single value maps to that value, a
//! longer section maps to a list. Unnamed entries before the first name are
//! grouped under the empty key. Repeated names produce repeated keys.

use crate::buffer::ArgumentBuffer;
use crate::error::Result;
use crate::print::quote;
use crate::store::ArgumentStore;
use crate::value::Argument;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::Write;

type Group<'a> = (&'a str, Vec<Argument<'a>>);

fn groups<S: ArgumentStore>(buffer: &ArgumentBuffer<S>) -> Vec<Group<'_>> {
    let mut groups: Vec<Group<'_>> = Vec::new();
    for entry in buffer.iter() {
        if entry.name.is_none() {
            if let Some((_, values)) = groups.last_mut() {
                values.push(entry.value);
                continue;
            }
        }
        groups.push((entry.name.unwrap_or(""), vec![entry.value]));
    }
    groups
}

impl<S: ArgumentStore> Serialize for ArgumentBuffer<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> std::result::Result<Z::Ok, Z::Error> {
        let groups = groups(self);
        let mut map = serializer.serialize_map(Some(groups.len()))?;
        for (name, values) in &groups {
            match values.as_slice() {
                [single] => map.serialize_entry(name, single)?,
                _ => map.serialize_entry(name, values)?,
            }
        }
        map.end()
    }
}

/// Plain text form used by URI and YAML output: booleans as words
fn plain(value: &Argument<'_>) -> String {
    match value {
        Argument::Bool(v) => v.to_string(),
        other => other.to_string(),
    }
}

fn percent_encode(text: &str, out: &mut String) {
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{:02X}", byte);
        }
    }
}

const YAML_INDICATORS: &[char] = &[
    ':', '#', '{', '}', '[', ']', ',', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`', '\n',
    '\r', '\t',
];

fn yaml_needs_quotes(text: &str) -> bool {
    const RESERVED: [&str; 8] = ["true", "false", "yes", "no", "null", "~", "on", "off"];
    text.is_empty()
        || text.trim() != text
        || text.starts_with(&['-', '?'][..])
        || text.contains(YAML_INDICATORS)
        || text.parse::<f64>().is_ok()
        || RESERVED.contains(&text.to_ascii_lowercase().as_str())
}

fn yaml_scalar(value: &Argument<'_>) -> String {
    match value {
        Argument::Unknown => "~".to_string(),
        Argument::String(_)
        | Argument::Utf8String(_)
        | Argument::WString(_)
        | Argument::Binary(_)
        | Argument::Guid(_) => {
            let text = value.to_string();
            if yaml_needs_quotes(&text) {
                quote(&text)
            } else {
                text
            }
        }
        other => plain(other),
    }
}

impl<S: ArgumentStore> ArgumentBuffer<S> {
    /// JSON object keyed by entry name
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `name=value` pairs joined by `&`, percent-encoded; unnamed entries
    /// are skipped
    pub fn to_uri(&self) -> String {
        let mut out = String::new();
        for entry in self.iter() {
            let Some(name) = entry.name else { continue };
            if !out.is_empty() {
                out.push('&');
            }
            percent_encode(name, &mut out);
            out.push('=');
            percent_encode(&plain(&entry.value), &mut out);
        }
        out
    }

    /// Block-style YAML mapping, sections as sequences
    pub fn to_yaml(&self) -> String {
        let mut out = String::new();
        for (name, values) in groups(self) {
            let key = if yaml_needs_quotes(name) {
                quote(name)
            } else {
                name.to_string()
            };
            match values.as_slice() {
                [single] => {
                    let _ = writeln!(out, "{}: {}", key, yaml_scalar(single));
                }
                _ => {
                    let _ = writeln!(out, "{}:", key);
                    for value in &values {
                        let _ = writeln!(out, "  - {}", yaml_scalar(value));
                    }
                }
            }
        }
        out
    }
}

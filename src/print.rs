//! Human-readable rendering and template substitution

use crate::buffer::ArgumentBuffer;
use crate::iter::Entry;
use crate::store::ArgumentStore;
use crate::value::Argument;
use std::fmt::{self, Write};

/// Quote `text` as a JSON string literal
pub(crate) fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// JSON rendering of a single value: text, binary and GUIDs quoted, numbers
/// bare, unknown values as `null`
pub(crate) fn json_value(value: &Argument<'_>) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| quote(&value.to_string()))
}

impl<S: ArgumentStore> ArgumentBuffer<S> {
    /// `"name": value, value2, ...`; unnamed entries render without a key
    pub fn print(&self) -> String {
        self.render(", ", |entry, out| {
            if let Some(name) = entry.name {
                let _ = write!(out, "\"{}\": ", name);
            }
            let _ = write!(out, "{}", entry.value);
        })
    }

    /// Like [`print`](Self::print) but with text values quoted and escaped
    pub fn print_json(&self) -> String {
        self.render(", ", |entry, out| {
            if let Some(name) = entry.name {
                let _ = write!(out, "{}: ", quote(name));
            }
            out.push_str(&json_value(&entry.value));
        })
    }

    /// Names of the named entries joined by `separator`
    pub fn print_keys(&self, separator: &str) -> String {
        self.names().collect::<Vec<_>>().join(separator)
    }

    /// Values of all entries joined by `separator`
    pub fn print_values(&self, separator: &str) -> String {
        self.render(separator, |entry, out| {
            let _ = write!(out, "{}", entry.value);
        })
    }

    /// One `name = value : type` line per entry; unnamed entries show their
    /// index instead of a name
    pub fn debug_print(&self) -> String {
        let mut out = String::new();
        for (index, entry) in self.iter().enumerate() {
            match entry.name {
                Some(name) => {
                    let _ = write!(out, "{}", name);
                }
                None => {
                    let _ = write!(out, "[{}]", index);
                }
            }
            let _ = writeln!(out, " = {} : {}", entry.value, entry.value.type_name());
        }
        out
    }

    /// Substitute `{name}` with the named value and `{}` with the next value
    /// by position
    ///
    /// Missing names and positions substitute nothing. `{{` and `}}` produce
    /// literal braces; an unterminated `{` is copied as-is.
    pub fn format_template(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut positional = 0;
        let mut rest = template;

        while let Some(open) = rest.find(|c: char| c == '{' || c == '}') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];

            if tail.starts_with("{{") || tail.starts_with("}}") {
                out.push_str(&tail[..1]);
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with('}') {
                out.push('}');
                rest = &tail[1..];
                continue;
            }

            let Some(close) = tail.find('}') else {
                out.push_str(tail);
                rest = "";
                break;
            };
            let key = &tail[1..close];
            let value = if key.is_empty() {
                positional += 1;
                self.value_at(positional - 1)
            } else {
                self.value(key)
            };
            let _ = write!(out, "{}", value);
            rest = &tail[close + 1..];
        }

        out.push_str(rest);
        out
    }

    fn render(&self, separator: &str, mut each: impl FnMut(&Entry<'_>, &mut String)) -> String {
        let mut out = String::new();
        for (index, entry) in self.iter().enumerate() {
            if index > 0 {
                out.push_str(separator);
            }
            each(&entry, &mut out);
        }
        out
    }
}

impl<S: ArgumentStore> fmt::Display for ArgumentBuffer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}

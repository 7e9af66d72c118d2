//! Programmatic construction of argument buffers

use crate::buffer::ArgumentBuffer;
use crate::error::Result;
use crate::store::ArgumentStore;
use crate::value::Argument;
use tracing::debug;

/// Builder collecting entries before writing them into one allocation
///
/// # Example
///
/// ```rust
/// use argbuf::{Arguments, ArgumentsBuilder};
///
/// let args: Arguments = ArgumentsBuilder::new()
///     .named("user", "alice")
///     .named("retries", 3u32)
///     .section("ports", [80u16, 443])
///     .build()
///     .unwrap();
/// assert_eq!(args.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgumentsBuilder {
    capacity: Option<usize>,
    entries: Vec<(Option<String>, Argument<'static>)>,
}

impl ArgumentsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial capacity in bytes; defaults to the exact encoded size
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn named<'v, N: Into<String>>(mut self, name: N, value: impl Into<Argument<'v>>) -> Self {
        self.entries
            .push((Some(name.into()), value.into().into_owned()));
        self
    }

    pub fn value<'v>(mut self, value: impl Into<Argument<'v>>) -> Self {
        self.entries.push((None, value.into().into_owned()));
        self
    }

    /// Named first value followed by unnamed values
    pub fn section<'v, N, I>(mut self, name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator,
        I::Item: Into<Argument<'v>>,
    {
        let mut name = Some(name.into());
        for value in values {
            self.entries.push((name.take(), value.into().into_owned()));
        }
        self
    }

    /// Write the collected entries into a new buffer
    pub fn build<S: ArgumentStore + Default>(self) -> Result<ArgumentBuffer<S>> {
        let needed: usize = self
            .entries
            .iter()
            .map(|(name, value)| crate::codec::entry_size(name.as_deref(), value))
            .sum();
        let capacity = self.capacity.unwrap_or(needed).max(needed);
        debug!(
            "Building argument buffer with {} entries ({} bytes)",
            self.entries.len(),
            capacity
        );

        let mut buffer = ArgumentBuffer::<S>::with_capacity(capacity)?;
        for (name, value) in &self.entries {
            match name {
                Some(name) => buffer.append_named(name, value.reborrow())?,
                None => buffer.append(value.reborrow())?,
            };
        }
        Ok(buffer)
    }
}

//! Forward iteration over entries
//!
//! Iterators decode one entry per step. A malformed record ends the
//! iteration (and is logged); buffers mutated only through
//! [`ArgumentBuffer`](crate::buffer::ArgumentBuffer) never contain one.

use crate::buffer::Position;
use crate::codec::{decode_entry, RawEntry};
use crate::value::Argument;
use tracing::warn;

/// One decoded entry
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    pub position: Position,
    pub name: Option<&'a str>,
    pub value: Argument<'a>,
}

impl<'a> Entry<'a> {
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

impl<'a> From<RawEntry<'a>> for Entry<'a> {
    fn from(raw: RawEntry<'a>) -> Self {
        Entry {
            position: Position::from_offset(raw.position),
            name: raw.name,
            value: raw.value,
        }
    }
}

/// Iterator over all entries in insertion order
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    src: &'a [u8],
    offset: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(src: &'a [u8]) -> Self {
        Iter { src, offset: 0 }
    }

    pub(crate) fn starting_at(src: &'a [u8], offset: usize) -> Self {
        Iter { src, offset }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.src.len() {
            return None;
        }
        match decode_entry(self.src, self.offset) {
            Ok(raw) => {
                self.offset = raw.end;
                Some(raw.into())
            }
            Err(e) => {
                warn!("Stopping traversal at position {}: {}", self.offset, e);
                self.offset = self.src.len();
                None
            }
        }
    }
}

/// Entries of one section: the named entry and the unnamed entries after it
#[derive(Debug, Clone)]
pub struct Section<'a> {
    inner: Iter<'a>,
    started: bool,
}

impl<'a> Section<'a> {
    pub(crate) fn new(src: &'a [u8], start: Option<usize>) -> Self {
        Section {
            inner: Iter::starting_at(src, start.unwrap_or(src.len())),
            started: false,
        }
    }
}

impl<'a> Iterator for Section<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        if self.started && entry.is_named() {
            self.inner.offset = self.inner.src.len();
            return None;
        }
        self.started = true;
        Some(entry)
    }
}

/// Names of named entries, repeated names included
#[derive(Debug, Clone)]
pub struct Names<'a> {
    inner: Iter<'a>,
}

impl<'a> Names<'a> {
    pub(crate) fn new(src: &'a [u8]) -> Self {
        Names {
            inner: Iter::new(src),
        }
    }
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(|entry| entry.name)
    }
}

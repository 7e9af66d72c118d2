//! Argument buffer engine
//!
//! [`ArgumentBuffer`] keeps an ordered list of optionally named, typed values
//! in one contiguous region. Entries are found by walking the records from
//! offset 0; nothing else is indexed, so lookups are linear in the number of
//! entries.
//!
//! Positions are byte offsets. They stay meaningful across reallocation but
//! any mutation that moves bytes (set with a size change, insert, remove)
//! shifts the entries after it, so positions obtained before a mutation must
//! not be reused after it. Every mutating call returns the current position
//! of the entry it touched.

use crate::codec::{
    self, advance_to_next_entry, check_name, check_value, decode_entry, entry_size,
    value_record_size, write_entry, write_value, RawEntry,
};
use crate::error::{ArgumentsError, Result};
use crate::iter::{Entry, Iter, Names, Section};
use crate::key::Key;
use crate::shared::SharedStore;
use crate::store::{ArgumentStore, BorrowedStore, OwnedStore};
use crate::tag::{is_name_marker, ValueType};
use crate::value::Argument;
use std::io::{Read, Write};
use tracing::{debug, trace};

/// Byte offset of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(usize);

impl Position {
    pub const START: Position = Position(0);

    pub fn from_offset(offset: usize) -> Self {
        Position(offset)
    }

    pub fn offset(self) -> usize {
        self.0
    }
}

/// Packed buffer of typed, optionally named values
#[derive(Debug, Clone, Default)]
pub struct ArgumentBuffer<S> {
    store: S,
}

/// Buffer owning its heap region
pub type Arguments = ArgumentBuffer<OwnedStore>;

/// Buffer sharing its region between clones until one of them writes
pub type SharedArguments = ArgumentBuffer<SharedStore>;

/// Buffer that starts in a caller-provided region
pub type BorrowedArguments<'a> = ArgumentBuffer<BorrowedStore<'a>>;

impl<S: ArgumentStore + Default> ArgumentBuffer<S> {
    pub fn new() -> Self {
        ArgumentBuffer {
            store: S::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.store.reserve(capacity)?;
        Ok(buffer)
    }

    /// Copy a serialized region after validating every record in it
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let count = codec::validate(bytes)?;
        let mut buffer = Self::new();
        buffer.store.reserve(bytes.len())?;
        buffer.store.region_mut()[..bytes.len()].copy_from_slice(bytes);
        buffer.store.set_used(bytes.len());
        debug!(
            "Loaded argument buffer with {} entries ({} bytes)",
            count,
            bytes.len()
        );
        Ok(buffer)
    }

    /// Read a serialized region to the end of `reader`
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Build from an ordered list of optionally named values
    pub fn from_pairs<'n, 'v, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Option<&'n str>, Argument<'v>)>,
    {
        let mut buffer = Self::new();
        for (name, value) in pairs {
            buffer.push(name, &value)?;
        }
        Ok(buffer)
    }
}

impl<'a> ArgumentBuffer<BorrowedStore<'a>> {
    /// Empty buffer writing into `region` until it runs out of room
    pub fn new_in(region: &'a mut [u8]) -> Self {
        ArgumentBuffer {
            store: BorrowedStore::new(region),
        }
    }

    /// Whether the content still lives in the caller's region
    pub fn is_borrowed(&self) -> bool {
        self.store.is_borrowed()
    }
}

impl ArgumentBuffer<SharedStore> {
    /// Number of handles sharing this buffer's allocation
    pub fn reference_count(&self) -> usize {
        self.store.reference_count()
    }

    pub fn shares_with(&self, other: &SharedArguments) -> bool {
        self.store.shares_with(&other.store)
    }
}

impl<S: ArgumentStore> ArgumentBuffer<S> {
    // ---- storage ----

    /// The used region, exactly as stored
    pub fn as_bytes(&self) -> &[u8] {
        self.store.data()
    }

    pub fn used_len(&self) -> usize {
        self.store.used()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn is_owner(&self) -> bool {
        self.store.is_owner()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ensure room for at least `min_bytes`; returns whether storage moved
    pub fn reserve(&mut self, min_bytes: usize) -> Result<bool> {
        self.store.reserve(min_bytes)
    }

    /// Drop spare capacity so that capacity equals the used length
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.store.shrink_to_fit()
    }

    /// Release the storage; the buffer behaves as freshly constructed
    pub fn clear(&mut self) {
        trace!("Clearing argument buffer ({} bytes)", self.store.used());
        self.store.release();
    }

    /// Write the used region verbatim
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.as_bytes())?;
        Ok(())
    }

    /// Copy the content into a buffer with different storage
    pub fn to_buffer<T: ArgumentStore + Default>(&self) -> Result<ArgumentBuffer<T>> {
        let mut buffer = ArgumentBuffer::<T>::new();
        let bytes = self.as_bytes();
        buffer.store.reserve(bytes.len())?;
        buffer.store.region_mut()[..bytes.len()].copy_from_slice(bytes);
        buffer.store.set_used(bytes.len());
        Ok(buffer)
    }

    // ---- traversal ----

    /// Number of entries, counted by walking the buffer
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.used() == 0
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.store.data())
    }

    /// Names of all named entries in order
    pub fn names(&self) -> Names<'_> {
        Names::new(self.store.data())
    }

    /// Named entries only, in order
    pub fn named(&self) -> impl Iterator<Item = Entry<'_>> + '_ {
        self.iter().filter(Entry::is_named)
    }

    /// Position of the first entry, `None` when empty
    pub fn first(&self) -> Option<Position> {
        (!self.is_empty()).then_some(Position::START)
    }

    /// Position of the entry after `position`, `None` at the end
    pub fn next(&self, position: Position) -> Result<Option<Position>> {
        self.check_position(position)?;
        let next = advance_to_next_entry(self.store.data(), position.0)?;
        Ok((next < self.store.used()).then_some(Position(next)))
    }

    fn check_position(&self, position: Position) -> Result<()> {
        let used = self.store.used();
        if position.0 >= used {
            return Err(ArgumentsError::PositionOutOfRange {
                position: position.0,
                used,
            });
        }
        if position.0 % codec::ALIGNMENT != 0 {
            return Err(ArgumentsError::MisalignedPosition(position.0));
        }
        Ok(())
    }

    /// Decode the entry at `position` with bounds and record checks only
    fn entry_at(&self, position: Position) -> Result<RawEntry<'_>> {
        self.check_position(position)?;
        decode_entry(self.store.data(), position.0)
    }

    /// Decode the entry at `position`, first proving that it is reachable
    /// from the start of the buffer
    fn boundary(&self, position: Position) -> Result<RawEntry<'_>> {
        self.check_position(position)?;
        let src = self.store.data();
        let mut offset = 0;
        while offset < position.0 {
            offset = advance_to_next_entry(src, offset)?;
        }
        if offset != position.0 {
            return Err(ArgumentsError::NotAnEntry(position.0));
        }
        decode_entry(src, offset)
    }

    fn is_unnamed_at(&self, offset: usize) -> Result<bool> {
        if offset >= self.store.used() {
            return Ok(false);
        }
        let (tag, _) = codec::read_header(self.store.data(), offset)?;
        Ok(!is_name_marker(tag))
    }

    /// First offset at or after `offset` that is not an unnamed entry
    fn skip_unnamed(&self, mut offset: usize) -> Result<usize> {
        while self.is_unnamed_at(offset)? {
            offset = advance_to_next_entry(self.store.data(), offset)?;
        }
        Ok(offset)
    }

    // ---- lookup ----

    /// Position of the first entry named `name`
    pub fn find(&self, name: &str) -> Option<Position> {
        self.iter()
            .find(|entry| entry.name == Some(name))
            .map(|entry| entry.position)
    }

    /// Position of the first entry named `name` after the entry at `after`
    pub fn find_from(&self, name: &str, after: Position) -> Option<Position> {
        let src = self.store.data();
        let start = advance_to_next_entry(src, after.0).ok()?;
        Iter::starting_at(src, start)
            .find(|entry| entry.name == Some(name))
            .map(|entry| entry.position)
    }

    pub fn find_all(&self, name: &str) -> Vec<Position> {
        self.iter()
            .filter(|entry| entry.name == Some(name))
            .map(|entry| entry.position)
            .collect()
    }

    /// Position of the `n`-th (zero-based) entry named `name`
    pub fn find_nth(&self, name: &str, n: usize) -> Option<Position> {
        self.iter()
            .filter(|entry| entry.name == Some(name))
            .nth(n)
            .map(|entry| entry.position)
    }

    /// Position of the entry at `index` in insertion order
    pub fn find_index(&self, index: usize) -> Option<Position> {
        self.iter().nth(index).map(|entry| entry.position)
    }

    /// First entry named `name` whose value equals `value` within its type
    /// group (see [`Argument::eq_group`])
    pub fn find_value(&self, name: &str, value: &Argument<'_>) -> Option<Position> {
        self.iter()
            .find(|entry| entry.name == Some(name) && entry.value.eq_group(value))
            .map(|entry| entry.position)
    }

    /// Entry of the section `name` whose value equals `value` within its
    /// type group
    pub fn find_in_section(&self, name: &str, value: &Argument<'_>) -> Option<Position> {
        self.section(name)
            .find(|entry| entry.value.eq_group(value))
            .map(|entry| entry.position)
    }

    pub fn count(&self, name: &str) -> usize {
        self.names().filter(|n| *n == name).count()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Resolve a key to a position
    pub fn position_of(&self, key: Key<'_>) -> Option<Position> {
        match key {
            Key::Name(name) => self.find(name),
            Key::Index(index) => self.find_index(index),
            Key::Section(name, n) => self.section(name).nth(n).map(|entry| entry.position),
        }
    }

    // ---- reading ----

    /// Value at `position` without copying variable-length content
    pub fn get(&self, position: Position) -> Result<Argument<'_>> {
        Ok(self.entry_at(position)?.value)
    }

    pub fn entry(&self, position: Position) -> Result<Entry<'_>> {
        Ok(self.entry_at(position)?.into())
    }

    pub fn name_at(&self, position: Position) -> Result<Option<&str>> {
        Ok(self.entry_at(position)?.name)
    }

    /// Value of the first entry named `name`, [`Argument::Unknown`] if absent
    pub fn value(&self, name: &str) -> Argument<'_> {
        self.get_key(Key::Name(name))
    }

    /// Value at `index`, [`Argument::Unknown`] if out of range
    pub fn value_at(&self, index: usize) -> Argument<'_> {
        self.get_key(Key::Index(index))
    }

    /// Value addressed by `key`, [`Argument::Unknown`] if absent
    pub fn get_key<'k>(&self, key: impl Into<Key<'k>>) -> Argument<'_> {
        self.position_of(key.into())
            .and_then(|position| self.get(position).ok())
            .unwrap_or_default()
    }

    /// Values of the first two entries named `name`
    pub fn find_pair(&self, name: &str) -> (Argument<'_>, Argument<'_>) {
        let mut values = self
            .iter()
            .filter(|entry| entry.name == Some(name))
            .map(|entry| entry.value);
        let first = values.next().unwrap_or_default();
        let second = values.next().unwrap_or_default();
        (first, second)
    }

    /// Values for each name, [`Argument::Unknown`] for missing ones
    pub fn get_many(&self, names: &[&str]) -> Vec<Argument<'_>> {
        names.iter().map(|name| self.value(name)).collect()
    }

    /// Value of the first name in `names` that exists
    pub fn first_of(&self, names: &[&str]) -> Option<Argument<'_>> {
        names
            .iter()
            .find_map(|name| self.find(name))
            .and_then(|position| self.get(position).ok())
    }

    /// Entries of the section started by the first entry named `name`
    pub fn section(&self, name: &str) -> Section<'_> {
        Section::new(self.store.data(), self.find(name).map(Position::offset))
    }

    /// Values of the section `name`, starting with the named value itself
    pub fn section_values(&self, name: &str) -> Vec<Argument<'_>> {
        self.section(name).map(|entry| entry.value).collect()
    }

    /// Value `n` of the section `name`, [`Argument::Unknown`] if absent
    pub fn section_value(&self, name: &str, n: usize) -> Argument<'_> {
        self.get_key(Key::Section(name, n))
    }

    /// Whether every named entry of `other` exists here with an equal value
    pub fn contains_all<T: ArgumentStore>(&self, other: &ArgumentBuffer<T>) -> bool {
        other.iter().all(|entry| match entry.name {
            Some(name) => self
                .find(name)
                .and_then(|position| self.get(position).ok())
                .is_some_and(|value| value == entry.value),
            None => true,
        })
    }

    // ---- appending ----

    fn push(&mut self, name: Option<&str>, value: &Argument<'_>) -> Result<Position> {
        if let Some(name) = name {
            check_name(name)?;
        }
        check_value(value)?;
        let position = self.store.used();
        let end = position + entry_size(name, value);
        self.store.reserve(end)?;
        let written = write_entry(self.store.region_mut(), position, name, value)?;
        debug_assert_eq!(written, end);
        self.store.set_used(end);
        Ok(Position(position))
    }

    /// Append an unnamed value
    pub fn append<'v>(&mut self, value: impl Into<Argument<'v>>) -> Result<Position> {
        self.push(None, &value.into())
    }

    /// Append a named value
    pub fn append_named<'v>(
        &mut self,
        name: &str,
        value: impl Into<Argument<'v>>,
    ) -> Result<Position> {
        self.push(Some(name), &value.into())
    }

    /// Append a value given as a type and its raw native-endian content
    pub fn append_raw(&mut self, ty: ValueType, bytes: &[u8]) -> Result<Position> {
        self.push(None, &Argument::from_raw(ty, bytes)?)
    }

    pub fn append_raw_named(&mut self, name: &str, ty: ValueType, bytes: &[u8]) -> Result<Position> {
        self.push(Some(name), &Argument::from_raw(ty, bytes)?)
    }

    /// Append a section: `name` with the first value, the rest unnamed
    pub fn append_section<'v, I>(&mut self, name: &str, values: I) -> Result<Option<Position>>
    where
        I: IntoIterator,
        I::Item: Into<Argument<'v>>,
    {
        let mut values = values.into_iter().map(Into::<Argument<'v>>::into);
        let Some(first) = values.next() else {
            return Ok(None);
        };
        let position = self.push(Some(name), &first)?;
        for value in values {
            self.push(None, &value)?;
        }
        Ok(Some(position))
    }

    /// Append every value unnamed; returns the position of the first one
    pub fn append_many<'v, I>(&mut self, values: I) -> Result<Option<Position>>
    where
        I: IntoIterator,
        I::Item: Into<Argument<'v>>,
    {
        let mut first = None;
        for value in values {
            let position = self.push(None, &value.into())?;
            first.get_or_insert(position);
        }
        Ok(first)
    }

    /// Append entries written as `name,type,value` and separated by `;`
    ///
    /// Type names resolve through [`ValueType::from_name`] and values convert
    /// with [`Argument::parse_as`]. An empty name appends an unnamed value
    /// and a trailing `;` is allowed. The whole text is parsed before the
    /// first entry is written. Returns the number of entries appended.
    ///
    /// ```
    /// # use argbuf::{Argument, Arguments};
    /// let mut args = Arguments::new();
    /// args.append_parsed("one,int32,1000;two,double,.234;city,string,London")?;
    /// assert_eq!(args.value("one"), Argument::Int32(1000));
    /// assert_eq!(args.value("city").as_str(), Some("London"));
    /// # Ok::<(), argbuf::ArgumentsError>(())
    /// ```
    pub fn append_parsed(&mut self, text: &str) -> Result<usize> {
        let text = text.strip_suffix(';').unwrap_or(text);
        if text.is_empty() {
            return Ok(0);
        }
        let entries = text
            .split(';')
            .map(parse_entry)
            .collect::<Result<Vec<_>>>()?;

        let size: usize = entries
            .iter()
            .map(|(name, value)| entry_size(*name, value))
            .sum();
        self.store.reserve(self.store.used() + size)?;
        for (name, value) in &entries {
            self.push(*name, value)?;
        }
        debug!("Appended {} parsed entries ({} bytes)", entries.len(), size);
        Ok(entries.len())
    }

    /// Append `text` under `name`, typed by [`Argument::infer`]
    pub fn append_inferred(&mut self, name: &str, text: &str) -> Result<Position> {
        self.push(Some(name), &Argument::infer(text))
    }

    /// Append named entries of `other` whose names do not exist here
    pub fn merge<T: ArgumentStore>(&mut self, other: &ArgumentBuffer<T>) -> Result<()> {
        for entry in other.iter() {
            if let Some(name) = entry.name {
                if !self.exists(name) {
                    self.push(Some(name), &entry.value)?;
                }
            }
        }
        Ok(())
    }

    // ---- in-place mutation ----

    /// Move the bytes after `at + old_len` so the span at `at` becomes
    /// `new_len` bytes long
    fn resize_span(&mut self, at: usize, old_len: usize, new_len: usize) -> Result<()> {
        let used = self.store.used();
        if new_len == old_len {
            return Ok(());
        }
        let new_used = used - old_len + new_len;
        self.store.reserve(new_used)?;
        let region = self.store.region_mut();
        region.copy_within(at + old_len..used, at + new_len);
        self.store.set_used(new_used);
        trace!(
            "Resized span at {} from {} to {} bytes ({} -> {} used)",
            at,
            old_len,
            new_len,
            used,
            new_used
        );
        Ok(())
    }

    /// Replace the value of the entry at `position`, keeping its name
    ///
    /// A fixed-size value replaced by one of the same type is overwritten in
    /// place; otherwise the following entries move by the size difference.
    pub fn set<'v>(&mut self, position: Position, value: impl Into<Argument<'v>>) -> Result<Position> {
        let value = value.into();
        check_value(&value)?;
        let (value_position, old_type, old_len) = {
            let raw = self.boundary(position)?;
            (raw.value_position, raw.value.value_type(), raw.end - raw.value_position)
        };

        let new_type = value.value_type();
        if !(old_type == new_type && new_type.is_fixed_size()) {
            self.resize_span(value_position, old_len, value_record_size(&value))?;
        }
        write_value(self.store.region_mut(), value_position, &value)?;
        Ok(position)
    }

    /// Replace the first entry named `name`, or append it when absent
    pub fn set_named<'v>(&mut self, name: &str, value: impl Into<Argument<'v>>) -> Result<Position> {
        match self.find(name) {
            Some(position) => self.set(position, value),
            None => self.append_named(name, value),
        }
    }

    pub fn set_index<'v>(&mut self, index: usize, value: impl Into<Argument<'v>>) -> Result<Position> {
        let position = self.find_index(index).ok_or_else(|| ArgumentsError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        self.set(position, value)
    }

    /// Replace the entry addressed by `key`
    ///
    /// A missing name is appended, and a section slot just past the end of
    /// its section is inserted there.
    pub fn set_key<'k, 'v>(
        &mut self,
        key: impl Into<Key<'k>>,
        value: impl Into<Argument<'v>>,
    ) -> Result<Position> {
        match key.into() {
            Key::Name(name) => self.set_named(name, value),
            Key::Index(index) => self.set_index(index, value),
            Key::Section(name, n) => {
                if let Some(position) = self.position_of(Key::Section(name, n)) {
                    return self.set(position, value);
                }
                let len = self.section(name).count();
                match (len, n) {
                    (0, 0) => self.append_named(name, value),
                    (len, n) if n == len => {
                        let start = self.find(name).map_or(0, Position::offset);
                        let end = self.skip_unnamed(advance_to_next_entry(self.store.data(), start)?)?;
                        self.insert(Position(end), None, value)
                    }
                    (len, n) => Err(ArgumentsError::IndexOutOfRange { index: n, len }),
                }
            }
        }
    }

    /// Insert a new entry before the entry at `position`
    ///
    /// `position` may also be the used length, which appends.
    pub fn insert<'v>(
        &mut self,
        position: Position,
        name: Option<&str>,
        value: impl Into<Argument<'v>>,
    ) -> Result<Position> {
        let value = value.into();
        if position.0 == self.store.used() {
            return self.push(name, &value);
        }
        if let Some(name) = name {
            check_name(name)?;
        }
        check_value(&value)?;
        self.boundary(position)?;

        let size = entry_size(name, &value);
        self.resize_span(position.0, 0, size)?;
        write_entry(self.store.region_mut(), position.0, name, &value)?;
        Ok(position)
    }

    /// Insert a new entry so that it ends up at `index`
    pub fn insert_at<'v>(
        &mut self,
        index: usize,
        name: Option<&str>,
        value: impl Into<Argument<'v>>,
    ) -> Result<Position> {
        let position = match self.find_index(index) {
            Some(position) => position,
            None => {
                let len = self.len();
                if index != len {
                    return Err(ArgumentsError::IndexOutOfRange { index, len });
                }
                Position(self.store.used())
            }
        };
        self.insert(position, name, value)
    }

    /// Remove the entry at `position`, name included
    pub fn remove(&mut self, position: Position) -> Result<()> {
        let end = self.boundary(position)?.end;
        debug!("Removing entry at {} ({} bytes)", position.0, end - position.0);
        self.resize_span(position.0, end - position.0, 0)
    }

    /// Remove the first entry named `name`; returns whether one existed
    pub fn remove_named(&mut self, name: &str) -> Result<bool> {
        match self.find(name) {
            Some(position) => self.remove(position).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn remove_index(&mut self, index: usize) -> Result<()> {
        let position = self.find_index(index).ok_or_else(|| ArgumentsError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        self.remove(position)
    }

    /// Remove the entry addressed by `key`; returns whether one existed
    pub fn remove_key<'k>(&mut self, key: impl Into<Key<'k>>) -> Result<bool> {
        match self.position_of(key.into()) {
            Some(position) => self.remove(position).map(|_| true),
            None => Ok(false),
        }
    }

    /// Replace the values of section `name`
    ///
    /// Existing values are overwritten in order, extra values are inserted
    /// before the next named entry and surplus old values are removed. An
    /// empty `values` removes the section; a missing section is appended.
    ///
    /// Every value is checked before the first byte changes, so a value that
    /// cannot be stored leaves the buffer untouched.
    pub fn set_section<'v, I>(&mut self, name: &str, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Argument<'v>>,
    {
        let values: Vec<Argument<'v>> = values.into_iter().map(Into::into).collect();
        check_name(name)?;
        values.iter().try_for_each(check_value)?;

        let mut values = values.into_iter();
        let Some(start) = self.find(name) else {
            self.append_section(name, values)?;
            return Ok(());
        };

        let mut cursor = match values.next() {
            Some(first) => {
                self.set(start, first)?;
                advance_to_next_entry(self.store.data(), start.0)?
            }
            None => start.0,
        };

        for value in values {
            if self.is_unnamed_at(cursor)? {
                self.set(Position(cursor), value)?;
            } else {
                self.insert(Position(cursor), None, value)?;
            }
            cursor = advance_to_next_entry(self.store.data(), cursor)?;
        }

        let end = if cursor == start.0 {
            self.skip_unnamed(advance_to_next_entry(self.store.data(), start.0)?)?
        } else {
            self.skip_unnamed(cursor)?
        };
        self.resize_span(cursor, end - cursor, 0)
    }
}

/// One `name,type,value` item of [`ArgumentBuffer::append_parsed`]
fn parse_entry(item: &str) -> Result<(Option<&str>, Argument<'static>)> {
    let error = |reason: String| ArgumentsError::Parse {
        text: item.to_string(),
        reason,
    };
    let mut fields = item.splitn(3, ',');
    let (Some(name), Some(type_name), Some(text)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(error("expected name,type,value".to_string()));
    };

    let ty = ValueType::from_name(type_name.trim())
        .ok_or_else(|| error(format!("unknown type `{}`", type_name)))?;
    let value = Argument::parse_as(ty, text).map_err(|e| error(e.to_string()))?;
    let name = (!name.is_empty()).then_some(name);
    if let Some(name) = name {
        check_name(name).map_err(|e| error(e.to_string()))?;
    }
    check_value(&value)?;
    Ok((name, value))
}

/// Buffers are equal when they hold the same names and values in the same
/// order, whatever their storage
impl<S: ArgumentStore, T: ArgumentStore> PartialEq<ArgumentBuffer<T>> for ArgumentBuffer<S> {
    fn eq(&self, other: &ArgumentBuffer<T>) -> bool {
        self.iter()
            .map(|entry| (entry.name, entry.value))
            .eq(other.iter().map(|entry| (entry.name, entry.value)))
    }
}

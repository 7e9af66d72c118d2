//! Backing storage for argument buffers
//!
//! The buffer engine is generic over [`ArgumentStore`]. Stores only manage
//! bytes: capacity, the used length and reallocation. They know nothing about
//! records.
//!
//! - [`OwnedStore`]: a heap region owned by one handle, cloned deeply
//! - [`BorrowedStore`]: starts on a caller-provided region and moves to the
//!   heap the first time it has to grow
//! - [`SharedStore`](crate::shared::SharedStore): reference counted, copy on
//!   write

use crate::error::{ArgumentsError, Result};
use tracing::debug;

/// Capacities are rounded up to this many bytes when growing
pub const GROWTH_ALIGNMENT: usize = 64;

/// Storage interface used by [`ArgumentBuffer`](crate::buffer::ArgumentBuffer)
pub trait ArgumentStore {
    /// The used region
    fn data(&self) -> &[u8];

    /// Bytes available without reallocating
    fn capacity(&self) -> usize;

    /// Length of the used region
    fn used(&self) -> usize;

    /// Ensure capacity of at least `min_bytes`
    ///
    /// Returns `true` when the storage was reallocated, a copy-on-write fork
    /// included. After `Ok(_)` the capacity is at least `min_bytes`.
    fn reserve(&mut self, min_bytes: usize) -> Result<bool>;

    /// The whole writable region, `capacity()` bytes long
    ///
    /// Stores that share their bytes must make them exclusive first.
    fn region_mut(&mut self) -> &mut [u8];

    /// Record a new used length; `used <= capacity()`
    fn set_used(&mut self, used: usize);

    /// Reallocate so that capacity equals the used length
    fn shrink_to_fit(&mut self) -> Result<()>;

    /// Drop the storage and return to the empty state
    fn release(&mut self);

    /// Whether this handle exclusively owns a heap allocation
    fn is_owner(&self) -> bool;
}

/// Capacity chosen when at least `min_bytes` are needed
///
/// Fails with [`ArgumentsError::Allocation`] when the padded size does not
/// fit in `usize`.
pub fn grow_capacity(min_bytes: usize) -> Result<usize> {
    min_bytes
        .checked_add(min_bytes / 2)
        .and_then(|wanted| wanted.checked_next_multiple_of(GROWTH_ALIGNMENT))
        .ok_or_else(|| {
            ArgumentsError::Allocation(format!("{} bytes exceeds the address space", min_bytes))
        })
}

/// Allocate a zeroed region of `capacity` bytes holding a copy of `content`
pub(crate) fn allocate(capacity: usize, content: &[u8]) -> Result<Box<[u8]>> {
    debug_assert!(content.len() <= capacity);
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(capacity)
        .map_err(|e| ArgumentsError::Allocation(format!("{} bytes: {}", capacity, e)))?;
    bytes.extend_from_slice(content);
    bytes.resize(capacity, 0);
    Ok(bytes.into_boxed_slice())
}

/// Heap storage owned by a single handle
#[derive(Debug, Clone, Default)]
pub struct OwnedStore {
    data: Box<[u8]>,
    used: usize,
}

impl OwnedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArgumentStore for OwnedStore {
    fn data(&self) -> &[u8] {
        &self.data[..self.used]
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn used(&self) -> usize {
        self.used
    }

    fn reserve(&mut self, min_bytes: usize) -> Result<bool> {
        if min_bytes <= self.data.len() {
            return Ok(false);
        }
        let capacity = grow_capacity(min_bytes)?;
        debug!(
            "Growing argument buffer from {} to {} bytes",
            self.data.len(),
            capacity
        );
        self.data = allocate(capacity, &self.data[..self.used])?;
        Ok(true)
    }

    fn region_mut(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }

    fn set_used(&mut self, used: usize) {
        debug_assert!(used <= self.data.len());
        self.used = used;
    }

    fn shrink_to_fit(&mut self) -> Result<()> {
        if self.data.len() != self.used {
            debug!(
                "Shrinking argument buffer from {} to {} bytes",
                self.data.len(),
                self.used
            );
            self.data = allocate(self.used, &self.data[..self.used])?;
        }
        Ok(())
    }

    fn release(&mut self) {
        self.data = Box::default();
        self.used = 0;
    }

    fn is_owner(&self) -> bool {
        !self.data.is_empty()
    }
}

#[derive(Debug)]
enum Region<'a> {
    Borrowed(&'a mut [u8]),
    Owned(Box<[u8]>),
}

/// Storage that starts in a caller-provided region
///
/// The region is used as-is until an operation needs more room; from then on
/// the content lives in an owned heap allocation and the borrowed region is
/// no longer touched.
#[derive(Debug)]
pub struct BorrowedStore<'a> {
    region: Region<'a>,
    used: usize,
}

impl<'a> BorrowedStore<'a> {
    /// Use `region` as empty storage
    pub fn new(region: &'a mut [u8]) -> Self {
        BorrowedStore {
            region: Region::Borrowed(region),
            used: 0,
        }
    }

    /// Whether the content still lives in the caller's region
    pub fn is_borrowed(&self) -> bool {
        matches!(self.region, Region::Borrowed(_))
    }

    fn bytes(&self) -> &[u8] {
        match &self.region {
            Region::Borrowed(region) => &region[..],
            Region::Owned(data) => &data[..],
        }
    }
}

impl Default for BorrowedStore<'_> {
    fn default() -> Self {
        BorrowedStore {
            region: Region::Owned(Box::default()),
            used: 0,
        }
    }
}

impl ArgumentStore for BorrowedStore<'_> {
    fn data(&self) -> &[u8] {
        &self.bytes()[..self.used]
    }

    fn capacity(&self) -> usize {
        self.bytes().len()
    }

    fn used(&self) -> usize {
        self.used
    }

    fn reserve(&mut self, min_bytes: usize) -> Result<bool> {
        if min_bytes <= self.capacity() {
            return Ok(false);
        }
        let capacity = grow_capacity(min_bytes)?;
        if self.is_borrowed() {
            debug!(
                "Moving borrowed argument buffer to the heap ({} bytes)",
                capacity
            );
        }
        let data = allocate(capacity, self.data())?;
        self.region = Region::Owned(data);
        Ok(true)
    }

    fn region_mut(&mut self) -> &mut [u8] {
        match &mut self.region {
            Region::Borrowed(region) => &mut region[..],
            Region::Owned(data) => &mut data[..],
        }
    }

    fn set_used(&mut self, used: usize) {
        debug_assert!(used <= self.capacity());
        self.used = used;
    }

    fn shrink_to_fit(&mut self) -> Result<()> {
        if self.capacity() != self.used {
            let data = allocate(self.used, self.data())?;
            self.region = Region::Owned(data);
        }
        Ok(())
    }

    fn release(&mut self) {
        self.region = Region::Owned(Box::default());
        self.used = 0;
    }

    fn is_owner(&self) -> bool {
        matches!(&self.region, Region::Owned(data) if !data.is_empty())
    }
}

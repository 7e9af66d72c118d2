//! Reference-counted storage
//!
//! Cloning a [`SharedStore`] shares one allocation. The used length lives in
//! the shared block next to the bytes, so every handle sees the same content.
//! The first mutation through a handle whose block is shared forks a private
//! copy (copy on write); the other handles keep the original.

use crate::error::Result;
use crate::store::{allocate, grow_capacity, ArgumentStore};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
struct SharedBlock {
    used: usize,
    data: Box<[u8]>,
}

impl SharedBlock {
    fn new(capacity: usize, content: &[u8]) -> Result<Self> {
        Ok(SharedBlock {
            used: content.len(),
            data: allocate(capacity, content)?,
        })
    }
}

/// Storage shared between handles until one of them writes
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    block: Option<Arc<SharedBlock>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles sharing the allocation, 0 when empty
    pub fn reference_count(&self) -> usize {
        self.block.as_ref().map_or(0, Arc::strong_count)
    }

    /// Whether two handles point at the same allocation
    pub fn shares_with(&self, other: &SharedStore) -> bool {
        match (&self.block, &other.block) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn block_mut(&mut self) -> Option<&mut SharedBlock> {
        let block = self.block.as_mut()?;
        if Arc::strong_count(block) > 1 {
            debug!(
                "Forking shared argument buffer ({} of {} bytes used, {} handles)",
                block.used,
                block.data.len(),
                Arc::strong_count(block)
            );
        }
        Some(Arc::make_mut(block))
    }
}

impl ArgumentStore for SharedStore {
    fn data(&self) -> &[u8] {
        match &self.block {
            Some(block) => &block.data[..block.used],
            None => &[],
        }
    }

    fn capacity(&self) -> usize {
        self.block.as_ref().map_or(0, |block| block.data.len())
    }

    fn used(&self) -> usize {
        self.block.as_ref().map_or(0, |block| block.used)
    }

    /// Grows like the other stores. A handle whose block is shared forks
    /// here even when the capacity already suffices, so the writes that
    /// follow never reallocate behind the caller's back.
    fn reserve(&mut self, min_bytes: usize) -> Result<bool> {
        if min_bytes <= self.capacity() {
            if self.reference_count() <= 1 {
                return Ok(false);
            }
            debug!(
                "Forking shared argument buffer on reserve ({} handles)",
                self.reference_count()
            );
            let block = SharedBlock::new(self.capacity(), self.data())?;
            self.block = Some(Arc::new(block));
            return Ok(true);
        }
        let capacity = grow_capacity(min_bytes)?;
        debug!(
            "Growing shared argument buffer from {} to {} bytes",
            self.capacity(),
            capacity
        );
        // The new block is private; other handles keep the old one.
        let block = SharedBlock::new(capacity, self.data())?;
        self.block = Some(Arc::new(block));
        Ok(true)
    }

    fn region_mut(&mut self) -> &mut [u8] {
        match self.block_mut() {
            Some(block) => &mut block.data[..],
            None => &mut [],
        }
    }

    fn set_used(&mut self, used: usize) {
        if let Some(block) = self.block_mut() {
            debug_assert!(used <= block.data.len());
            block.used = used;
        } else {
            debug_assert_eq!(used, 0);
        }
    }

    fn shrink_to_fit(&mut self) -> Result<()> {
        let used = self.used();
        if used == 0 {
            self.block = None;
        } else if self.capacity() != used {
            let block = SharedBlock::new(used, self.data())?;
            self.block = Some(Arc::new(block));
        }
        Ok(())
    }

    fn release(&mut self) {
        self.block = None;
    }

    fn is_owner(&self) -> bool {
        self.reference_count() == 1
    }
}

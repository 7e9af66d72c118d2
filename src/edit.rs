//! Editable handles addressing one entry by key

use crate::buffer::{ArgumentBuffer, Position};
use crate::error::Result;
use crate::key::Key;
use crate::store::ArgumentStore;
use crate::value::Argument;

/// Read/write access to the entry a [`Key`] points at
///
/// Reads resolve the key on every call, so the handle stays correct while
/// writes through it move bytes around.
#[derive(Debug)]
pub struct ArgumentEdit<'b, 'k, S: ArgumentStore> {
    buffer: &'b mut ArgumentBuffer<S>,
    key: Key<'k>,
}

impl<'b, 'k, S: ArgumentStore> ArgumentEdit<'b, 'k, S> {
    pub fn key(&self) -> Key<'k> {
        self.key
    }

    pub fn position(&self) -> Option<Position> {
        self.buffer.position_of(self.key)
    }

    pub fn exists(&self) -> bool {
        self.position().is_some()
    }

    /// Current value, [`Argument::Unknown`] when the entry does not exist
    pub fn get(&self) -> Argument<'_> {
        self.buffer.get_key(self.key)
    }

    /// Write through [`ArgumentBuffer::set_key`]
    pub fn set<'v>(&mut self, value: impl Into<Argument<'v>>) -> Result<Position> {
        self.buffer.set_key(self.key, value)
    }

    pub fn remove(self) -> Result<bool> {
        self.buffer.remove_key(self.key)
    }
}

impl<S: ArgumentStore> ArgumentBuffer<S> {
    /// Editable handle for the entry addressed by `key`
    pub fn edit<'k>(&mut self, key: impl Into<Key<'k>>) -> ArgumentEdit<'_, 'k, S> {
        ArgumentEdit {
            buffer: self,
            key: key.into(),
        }
    }
}

//! Entry addressing by name, index or section slot

/// Identifies one entry of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'k> {
    /// First entry with this name
    Name(&'k str),
    /// Entry at this zero-based index in insertion order
    Index(usize),
    /// Value `n` of the section started by the named entry (0 is the named
    /// entry itself)
    Section(&'k str, usize),
}

impl<'k> From<&'k str> for Key<'k> {
    fn from(name: &'k str) -> Self {
        Key::Name(name)
    }
}

impl<'k> From<&'k String> for Key<'k> {
    fn from(name: &'k String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl<'k> From<(&'k str, usize)> for Key<'k> {
    fn from((name, n): (&'k str, usize)) -> Self {
        Key::Section(name, n)
    }
}

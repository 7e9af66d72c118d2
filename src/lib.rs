//! # argbuf - Packed Self-Describing Argument Buffers
//!
//! `argbuf` stores an ordered list of optionally named, typed values in one
//! contiguous, 4-byte aligned region:
//!
//! - **No per-entry allocation**: every record is a header word, an optional
//!   length word and the payload, packed back to back
//! - **Self-describing**: each value carries its type tag, so a buffer can be
//!   copied, written to disk and read back without a schema
//! - **Sections**: a named entry followed by unnamed ones carries a list of
//!   values under one key
//! - **Three storage flavors**: owned, shared copy-on-write, and borrowed
//!   from a caller-provided region
//!
//! ## Quick Start
//!
//! ```rust
//! use argbuf::{Arguments, Result};
//!
//! # fn main() -> Result<()> {
//! let mut args = Arguments::new();
//! args.append_named("age", 25i32)?;
//! args.append_named("name", "Bob")?;
//! assert_eq!(args.print(), "\"age\": 25, \"name\": Bob");
//!
//! args.remove_named("age")?;
//! assert_eq!(args.len(), 1);
//! assert_eq!(args.value("name").to_string(), "Bob");
//! # Ok(())
//! # }
//! ```
//!
//! ## Sections and Shared Buffers
//!
//! ```rust
//! use argbuf::{ArgumentsBuilder, Result, SharedArguments};
//!
//! # fn main() -> Result<()> {
//! let original: SharedArguments = ArgumentsBuilder::new()
//!     .section("values", [100i32, 200, 300])
//!     .named("mode", "fast")
//!     .build()?;
//!
//! // Clones share one allocation until one of them writes
//! let mut copy = original.clone();
//! assert!(copy.shares_with(&original));
//!
//! copy.set_section("values", [1i32, 2])?;
//! assert!(!copy.shares_with(&original));
//! assert_eq!(original.section_values("values").len(), 3);
//! assert_eq!(copy.section_values("values").len(), 2);
//! assert_eq!(copy.value("mode").to_string(), "fast");
//! # Ok(())
//! # }
//! ```

// Core implementation
pub mod core;

pub mod builder;
pub mod edit;
pub mod io;
pub mod print;

// Re-export core modules internally so crate:: paths in core resolve
#[allow(unused_imports)]
pub(crate) use self::core::{
    buffer, codec, convert, error, iter, key, legacy, shared, store, tag, value,
};

pub use crate::builder::ArgumentsBuilder;
pub use crate::core::{
    buffer::{ArgumentBuffer, Arguments, BorrowedArguments, Position, SharedArguments},
    codec::{ALIGNMENT, MAX_ENCODED_LEN, MAX_NAME_LEN},
    error::{ArgumentsError, Result},
    iter::{Entry, Iter, Names, Section},
    key::Key,
    legacy::import as import_legacy,
    shared::SharedStore,
    store::{ArgumentStore, BorrowedStore, OwnedStore, GROWTH_ALIGNMENT},
    tag::ValueType,
    value::Argument,
};
pub use crate::edit::ArgumentEdit;

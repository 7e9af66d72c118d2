//! Packed argument buffer core: type tags, values, the entry codec and the
//! buffer engine with its storage backends

pub mod buffer;
pub mod codec;
pub mod convert;
pub mod error;
pub mod iter;
pub mod key;
pub mod legacy;
pub mod shared;
pub mod store;
pub mod tag;
pub mod value;

pub use buffer::{ArgumentBuffer, Arguments, BorrowedArguments, Position, SharedArguments};
pub use error::{ArgumentsError, Result};
pub use value::Argument;

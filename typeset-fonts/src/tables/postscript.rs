//! PostScript (CFF) building blocks: INDEX, DICT, string identifiers,
//! FDSelect and the Type 2 charstring interpreter.

use std::fmt;

use crate::ReadError;

#[path = "./postscript/charstring.rs"]
pub mod charstring;
#[path = "./postscript/dict.rs"]
pub mod dict;
#[path = "./postscript/fd_select.rs"]
mod fd_select;
#[path = "./postscript/index.rs"]
mod index;
#[path = "./postscript/stack.rs"]
mod stack;
#[path = "./postscript/string.rs"]
mod string;

pub use charstring::{CharString, Command, Operator, NESTING_DEPTH_LIMIT};
pub use fd_select::FdSelect;
pub use index::Index;
pub use stack::{Number, Stack};
pub use string::{Latin1String, StringId, STANDARD_STRINGS};

/// Errors that are specific to PostScript processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The `off_size` field in an INDEX contained an invalid value.
    InvalidIndexOffsetSize(u8),
    /// An INDEX contained a zero offset.
    ZeroOffset,
    InvalidDictOperator(u8),
    InvalidNumber,
    StackOverflow,
    StackUnderflow,
    InvalidStackAccess(usize),
    /// A one byte charstring operator that is reserved or unsupported.
    InvalidOperator(u8),
    /// A two byte (escaped) charstring operator that is reserved or
    /// unsupported.
    InvalidEscapedOperator(u8),
    /// A path or hint operator was given a number of operands it can't
    /// accept.
    InvalidArgumentCount {
        operator: Operator,
        count: usize,
    },
    /// A subroutine call whose biased index was outside the subroutine INDEX.
    InvalidSubroutineIndex(i32),
    /// A `callsubr` was encountered but the font has no local subroutines.
    MissingSubroutines,
    NestingDepthExceeded,
    InvalidFontIndex(u32),
    MissingPrivateDict,
    MissingCharstrings,
    UnsupportedCharstringType(i32),
    /// Underlying parsing error.
    Read(ReadError),
}

impl From<ReadError> for Error {
    fn from(value: ReadError) -> Self {
        Self::Read(value)
    }
}

impl From<Error> for ReadError {
    fn from(value: Error) -> Self {
        match value {
            Error::Read(err) => err,
            Error::InvalidIndexOffsetSize(size) => ReadError::InvalidFormat(size as i64),
            Error::UnsupportedCharstringType(ty) => ReadError::InvalidFormat(ty as i64),
            Error::MissingCharstrings => ReadError::MalformedData("missing CharStrings INDEX"),
            Error::MissingPrivateDict => ReadError::MalformedData("missing Private DICT"),
            _ => ReadError::MalformedData("invalid CFF structure"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIndexOffsetSize(size) => {
                write!(f, "invalid offset size of {size} for INDEX (expected 1-4)")
            }
            Self::ZeroOffset => {
                write!(f, "invalid offset of 0 in INDEX (must be >= 1)")
            }
            Self::InvalidDictOperator(op) => write!(f, "invalid DICT operator {op}"),
            Self::InvalidNumber => write!(f, "number is in an invalid format"),
            Self::StackOverflow => write!(f, "maximum operand stack depth exceeded"),
            Self::StackUnderflow => write!(f, "operand stack underflow"),
            Self::InvalidStackAccess(index) => {
                write!(f, "stack access at index {index} is out of bounds")
            }
            Self::InvalidOperator(op) => write!(f, "invalid charstring operator {op}"),
            Self::InvalidEscapedOperator(op) => {
                write!(f, "invalid charstring operator 12 {op}")
            }
            Self::InvalidArgumentCount { operator, count } => {
                write!(f, "{count} operands is invalid for {}", operator.name())
            }
            Self::InvalidSubroutineIndex(index) => {
                write!(f, "subroutine index {index} is out of bounds")
            }
            Self::MissingSubroutines => {
                write!(f, "encountered a callsubr operator without local subroutines")
            }
            Self::NestingDepthExceeded => write!(
                f,
                "subroutine nesting depth exceeded the limit of {NESTING_DEPTH_LIMIT}"
            ),
            Self::InvalidFontIndex(index) => write!(f, "font index {index} is out of bounds"),
            Self::MissingPrivateDict => write!(f, "font is missing a Private DICT"),
            Self::MissingCharstrings => write!(f, "font is missing a CharStrings INDEX"),
            Self::UnsupportedCharstringType(ty) => {
                write!(f, "charstring type {ty} is not supported (expected 2)")
            }
            Self::Read(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

//! Handling offsets

use super::read::{FontRead, ReadError};
use crate::{font_data::FontData, read::FontReadWithArgs};
use types::{Nullable, Offset};

/// A helper trait providing a 'resolve' method for offset types
pub trait ResolveOffset {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError>;

    fn resolve_with_args<'a, T: FontReadWithArgs<'a>>(
        &self,
        data: FontData<'a>,
        args: &T::Args,
    ) -> Result<T, ReadError>;
}

/// A helper trait providing a 'resolve' method for nullable offset types
pub trait ResolveNullableOffset {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Option<Result<T, ReadError>>;
}

impl<O: Offset> ResolveNullableOffset for Nullable<O> {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Option<Result<T, ReadError>> {
        match self.offset().resolve(data) {
            Ok(thing) => Some(Ok(thing)),
            Err(ReadError::NullOffset) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<O: Offset> ResolveOffset for O {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError> {
        self.non_null()
            .ok_or(ReadError::NullOffset)
            .and_then(|off| data.split_off(off).ok_or(ReadError::OutOfBounds))
            .and_then(T::read)
    }

    fn resolve_with_args<'a, T: FontReadWithArgs<'a>>(
        &self,
        data: FontData<'a>,
        args: &T::Args,
    ) -> Result<T, ReadError> {
        self.non_null()
            .ok_or(ReadError::NullOffset)
            .and_then(|off| data.split_off(off).ok_or(ReadError::OutOfBounds))
            .and_then(|data| T::read_with_args(data, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Offset16, Scalar};

    struct Word(u16);

    impl<'a> FontRead<'a> for Word {
        fn read(data: FontData<'a>) -> Result<Self, ReadError> {
            data.read_at(0).map(Word)
        }
    }

    #[test]
    fn resolve() {
        let data = FontData::new(&[0, 0, 0xAB, 0xCD]);
        let word: Word = Offset16::new(2).resolve(data).unwrap();
        assert_eq!(word.0, 0xABCD);
        assert!(matches!(
            Offset16::new(0).resolve::<Word>(data),
            Err(ReadError::NullOffset)
        ));
        assert!(matches!(
            Offset16::new(3).resolve::<Word>(data),
            Err(ReadError::OutOfBounds)
        ));
        let nullable = Nullable::<Offset16>::from_raw([0, 0]);
        assert!(ResolveNullableOffset::resolve::<Word>(&nullable, data).is_none());
    }
}

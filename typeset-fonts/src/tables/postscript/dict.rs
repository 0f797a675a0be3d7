//! Parsing for PostScript DICTs.

use std::ops::Range;

use super::{Error, Number, Stack, StringId};
use crate::{font_data::Cursor, types::Fixed, FontData, ReadError};

/// PostScript DICT operator.
///
/// Only the operators needed to locate glyph programs and their widths are
/// named; every other defined operator is kept as [`Operator::Other`]. See
/// "Table 9 Top DICT Operator Entries" and "Table 23 Private DICT Operators"
/// at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    FullName,
    FamilyName,
    CharstringsOffset,
    PrivateDictRange,
    CharstringType,
    Ros,
    FdArrayOffset,
    FdSelectOffset,
    SubrsOffset,
    DefaultWidthX,
    NominalWidthX,
    /// The opcode of an operator whose operands are not interpreted.
    ///
    /// Two byte operators are stored as `0x0C00 | b1`.
    Other(u16),
}

impl Operator {
    const ESCAPED: u16 = 0x0C00;

    fn from_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            2 => FullName,
            3 => FamilyName,
            17 => CharstringsOffset,
            18 => PrivateDictRange,
            19 => SubrsOffset,
            20 => DefaultWidthX,
            21 => NominalWidthX,
            0..=11 | 13..=16 => Other(opcode as u16),
            _ => return None,
        })
    }

    fn from_extended_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            6 => CharstringType,
            30 => Ros,
            36 => FdArrayOffset,
            37 => FdSelectOffset,
            0..=14 | 17..=23 | 31..=35 | 38 => Other(Self::ESCAPED | opcode as u16),
            _ => return None,
        })
    }
}

/// Either a PostScript DICT operator or a (numeric) operand.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Token {
    Operator(Operator),
    Operand(Number),
}

impl From<Operator> for Token {
    fn from(value: Operator) -> Self {
        Self::Operator(value)
    }
}

impl<T> From<T> for Token
where
    T: Into<Number>,
{
    fn from(value: T) -> Self {
        Self::Operand(value.into())
    }
}

/// Given a byte slice containing DICT data, returns an iterator yielding
/// raw operands and operators.
pub fn tokens(dict_data: &[u8]) -> impl Iterator<Item = Result<Token, Error>> + '_ + Clone {
    let mut cursor = FontData::new(dict_data).cursor();
    std::iter::from_fn(move || {
        if cursor.remaining_bytes() == 0 {
            None
        } else {
            Some(parse_token(&mut cursor))
        }
    })
}

fn parse_token(cursor: &mut Cursor) -> Result<Token, Error> {
    // Escape opcode for accessing extensions.
    const ESCAPE: u8 = 12;
    let b0 = cursor.read::<u8>()?;
    Ok(if b0 == ESCAPE {
        let b1 = cursor.read::<u8>()?;
        Token::Operator(Operator::from_extended_opcode(b1).ok_or(Error::InvalidDictOperator(b1))?)
    } else {
        match b0 {
            28 | 29 | 32..=254 => Token::Operand(parse_int(cursor, b0)?.into()),
            30 => Token::Operand(parse_real(cursor)?.into()),
            _ => Token::Operator(Operator::from_opcode(b0).ok_or(Error::InvalidDictOperator(b0))?),
        }
    })
}

/// PostScript DICT operator with its associated operands.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Entry {
    FullName(StringId),
    FamilyName(StringId),
    CharstringsOffset(usize),
    PrivateDictRange(Range<usize>),
    CharstringType(i32),
    Ros {
        registry: StringId,
        ordering: StringId,
        supplement: Fixed,
    },
    FdArrayOffset(usize),
    FdSelectOffset(usize),
    SubrsOffset(usize),
    DefaultWidthX(Fixed),
    NominalWidthX(Fixed),
    /// An operator that is skipped, with its raw operands.
    Other { opcode: u16, operands: Vec<Fixed> },
}

/// Given a byte slice containing DICT data, returns an iterator yielding
/// each operator with its associated operands.
pub fn entries(dict_data: &[u8]) -> impl Iterator<Item = Result<Entry, Error>> + '_ {
    let mut stack = Stack::new();
    let mut tokens = tokens(dict_data);
    std::iter::from_fn(move || loop {
        let token = match tokens.next()? {
            Ok(token) => token,
            Err(e) => return Some(Err(e)),
        };
        match token {
            Token::Operand(number) => match stack.push(number) {
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            },
            Token::Operator(op) => {
                let entry = parse_entry(op, &mut stack);
                stack.clear();
                return Some(entry);
            }
        }
    })
}

fn parse_entry(op: Operator, stack: &mut Stack) -> Result<Entry, Error> {
    use Operator::*;
    Ok(match op {
        FullName => Entry::FullName(stack.pop_i32()?.into()),
        FamilyName => Entry::FamilyName(stack.pop_i32()?.into()),
        CharstringsOffset => Entry::CharstringsOffset(pop_offset(stack)?),
        PrivateDictRange => {
            // size, then offset
            let len = to_offset(stack.get_i32(0)?)?;
            let start = to_offset(stack.get_i32(1)?)?;
            let end = start.checked_add(len).ok_or(ReadError::OutOfBounds)?;
            Entry::PrivateDictRange(start..end)
        }
        CharstringType => Entry::CharstringType(stack.pop_i32()?),
        Ros => Entry::Ros {
            registry: stack.get_i32(0)?.into(),
            ordering: stack.get_i32(1)?.into(),
            supplement: stack.get_fixed(2)?,
        },
        FdArrayOffset => Entry::FdArrayOffset(pop_offset(stack)?),
        FdSelectOffset => Entry::FdSelectOffset(pop_offset(stack)?),
        SubrsOffset => Entry::SubrsOffset(pop_offset(stack)?),
        DefaultWidthX => Entry::DefaultWidthX(stack.pop_fixed()?),
        NominalWidthX => Entry::NominalWidthX(stack.pop_fixed()?),
        Other(opcode) => Entry::Other {
            opcode,
            operands: stack.fixed_values().collect(),
        },
    })
}

fn to_offset(value: i32) -> Result<usize, Error> {
    usize::try_from(value).map_err(|_| ReadError::OutOfBounds.into())
}

fn pop_offset(stack: &mut Stack) -> Result<usize, Error> {
    to_offset(stack.pop_i32()?)
}

/// Parse an integer operand whose first byte `b0` has already been read.
pub(crate) fn parse_int(cursor: &mut Cursor, b0: u8) -> Result<i32, Error> {
    // Size   b0 range     Value range              Value calculation
    //--------------------------------------------------------------------------------
    // 1      32 to 246    -107 to +107             b0 - 139
    // 2      247 to 250   +108 to +1131            (b0 - 247) * 256 + b1 + 108
    // 2      251 to 254   -1131 to -108            -(b0 - 251) * 256 - b1 - 108
    // 3      28           -32768 to +32767         b1 << 8 | b2
    // 5      29           -(2^31) to +(2^31 - 1)   b1 << 24 | b2 << 16 | b3 << 8 | b4
    Ok(match b0 {
        32..=246 => b0 as i32 - 139,
        247..=250 => (b0 as i32 - 247) * 256 + cursor.read::<u8>()? as i32 + 108,
        251..=254 => -(b0 as i32 - 251) * 256 - cursor.read::<u8>()? as i32 - 108,
        28 => cursor.read::<i16>()? as i32,
        29 => cursor.read::<i32>()?,
        _ => {
            return Err(Error::InvalidNumber);
        }
    })
}

/// Parse a real number encoded as a sequence of nibbles, following the
/// leading `30` byte.
///
/// Values outside the range of 16.16 fixed point saturate.
fn parse_real(cursor: &mut Cursor) -> Result<Fixed, Error> {
    // Nibble value    Represents
    //----------------------------------
    // 0 to 9          0 to 9
    // a               . (decimal point)
    // b               E
    // c               E-
    // d               <reserved>
    // e               - (minus)
    // f               end of number
    let mut text = String::new();
    'outer: loop {
        let b = cursor.read::<u8>()?;
        for nibble in [b >> 4, b & 0xF] {
            match nibble {
                0x0..=0x9 => text.push((b'0' + nibble) as char),
                0xA => text.push('.'),
                0xB => text.push('E'),
                0xC => text.push_str("E-"),
                0xE => text.push('-'),
                0xF => break 'outer,
                _ => return Err(Error::InvalidNumber),
            }
        }
    }
    let value: f64 = text.parse().map_err(|_| Error::InvalidNumber)?;
    let limit = Fixed::MAX.to_f64();
    Ok(Fixed::from_f64(value.clamp(-limit, limit)))
}

#[cfg(test)]
mod tests {
    use font_test_data::bebuffer::BeBuffer;

    use super::*;

    #[test]
    fn int_operands() {
        // Test the boundary conditions of the ranged int operators
        let empty = FontData::new(&[]);
        let min_byte = FontData::new(&[0]);
        let max_byte = FontData::new(&[255]);
        // 32..=246 => -107..=107
        assert_eq!(parse_int(&mut empty.cursor(), 32).unwrap(), -107);
        assert_eq!(parse_int(&mut empty.cursor(), 246).unwrap(), 107);
        // 247..=250 => +108 to +1131
        assert_eq!(parse_int(&mut min_byte.cursor(), 247).unwrap(), 108);
        assert_eq!(parse_int(&mut max_byte.cursor(), 250).unwrap(), 1131);
        // 251..=254 => -1131 to -108
        assert_eq!(parse_int(&mut min_byte.cursor(), 251).unwrap(), -108);
        assert_eq!(parse_int(&mut max_byte.cursor(), 254).unwrap(), -1131);
        assert!(parse_int(&mut empty.cursor(), 28).is_err());
    }

    #[test]
    fn real_operands() {
        // -2.25 is encoded as (1e) e2 a2 5f and 0.140541E-3 as
        // (1e) 0a 14 05 41 c3 ff
        let bytes = FontData::new(&[0xe2, 0xa2, 0x5f]);
        assert_eq!(
            parse_real(&mut bytes.cursor()).unwrap(),
            Fixed::from_f64(-2.25)
        );
        let bytes = FontData::new(&[0x0a, 0x14, 0x05, 0x41, 0xc3, 0xff]);
        assert_eq!(
            parse_real(&mut bytes.cursor()).unwrap(),
            Fixed::from_f64(0.140541E-3)
        );
        let unterminated = FontData::new(&[0x12]);
        assert!(parse_real(&mut unterminated.cursor()).is_err());
        let reserved = FontData::new(&[0x1d, 0xff]);
        assert_eq!(
            parse_real(&mut reserved.cursor()),
            Err(Error::InvalidNumber)
        );
    }

    #[test]
    fn top_dict_entries() {
        use Entry::*;
        let buf = BeBuffer::new()
            // 391 FamilyName
            .extend([28u8, 0x01, 0x87, 3])
            // 2 CharstringType
            .extend([141u8, 12, 6])
            // 0.001 0 0 0.001 0 0 FontMatrix
            .extend([30u8, 0x0a, 0x00, 0x1f, 139, 139, 30, 0x0a, 0x00, 0x1f, 139, 139, 12, 7])
            // 4000 CharStrings
            .extend([29u8, 0, 0, 0x0f, 0xa0, 17])
            // 45 1200 Private
            .extend([184u8, 28, 0x04, 0xb0, 18]);
        let entries = entries(&buf).collect::<Result<Vec<_>, _>>().unwrap();
        let thousandth = Fixed::from_f64(0.001);
        assert_eq!(
            entries,
            [
                FamilyName(StringId::new(391)),
                CharstringType(2),
                Other {
                    opcode: 0x0C07,
                    operands: vec![
                        thousandth,
                        Fixed::ZERO,
                        Fixed::ZERO,
                        thousandth,
                        Fixed::ZERO,
                        Fixed::ZERO
                    ],
                },
                CharstringsOffset(4000),
                PrivateDictRange(1200..1245),
            ]
        );
    }

    #[test]
    fn private_dict_entries() {
        use Entry::*;
        // -15 15 466 15 BlueValues, 80 defaultWidthX, 2 Subrs
        let buf = BeBuffer::new()
            .extend([124u8, 154, 28, 0x01, 0xd2, 154, 6])
            .extend([219u8, 20])
            .extend([141u8, 19]);
        let entries = entries(&buf).collect::<Result<Vec<_>, _>>().unwrap();
        // blues are delta encoded; the raw values are kept
        let blues = [-15, 15, 466, 15].map(Fixed::from_i32).to_vec();
        assert_eq!(
            entries,
            [
                Other {
                    opcode: 6,
                    operands: blues
                },
                DefaultWidthX(Fixed::from_i32(80)),
                SubrsOffset(2)
            ]
        );
    }

    #[test]
    fn invalid_operator() {
        // 22..=27 are reserved
        let buf = BeBuffer::new().extend([139u8, 25]);
        assert_eq!(
            entries(&buf).next(),
            Some(Err(Error::InvalidDictOperator(25)))
        );
        let buf = BeBuffer::new().extend([139u8, 12, 99]);
        assert_eq!(
            entries(&buf).next(),
            Some(Err(Error::InvalidDictOperator(99)))
        );
    }

    #[test]
    fn missing_operand() {
        let buf = BeBuffer::new().push(17u8);
        assert_eq!(entries(&buf).next(), Some(Err(Error::StackUnderflow)));
    }
}

//! Operand stack for DICT and charstring parsing.

use types::Fixed;

use super::Error;

/// Maximum size of the operand stack.
///
/// "The Type 2 argument stack ... is limited to 48 entries", which is also
/// the limit for operands preceding a DICT operator in CFF.
///
/// <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=33>
pub const MAX_STACK: usize = 48;

/// A number pushed to the operand stack.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Number {
    I32(i32),
    Fixed(Fixed),
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<Fixed> for Number {
    fn from(value: Fixed) -> Self {
        Self::Fixed(value)
    }
}

/// Operand stack for DICTs and charstrings.
///
/// The stack holds either 32-bit integers or 16.16 fixed point values. The
/// type is known when pushing and the expected type is known (based on the
/// operator) when reading, so conversion happens on demand at read time.
/// Entries live in parallel arrays of raw values and "is fixed" flags.
#[derive(Clone)]
pub struct Stack {
    values: [i32; MAX_STACK],
    value_is_fixed: [bool; MAX_STACK],
    top: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            values: [0; MAX_STACK],
            value_is_fixed: [false; MAX_STACK],
            top: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    pub fn len(&self) -> usize {
        self.top
    }

    pub fn clear(&mut self) {
        self.top = 0;
    }

    pub fn push(&mut self, number: impl Into<Number>) -> Result<(), Error> {
        match number.into() {
            Number::I32(value) => self.push_impl(value, false),
            Number::Fixed(value) => self.push_impl(value.to_bits(), true),
        }
    }

    /// Returns the 32-bit integer at the given index on the stack.
    ///
    /// Fixed point values are truncated.
    pub fn get_i32(&self, index: usize) -> Result<i32, Error> {
        if index >= self.top {
            return Err(Error::InvalidStackAccess(index));
        }
        let value = self.values[index];
        Ok(if self.value_is_fixed[index] {
            Fixed::from_bits(value).to_i32()
        } else {
            value
        })
    }

    /// Returns the 16.16 fixed point value at the given index on the stack.
    ///
    /// Integers are converted, saturating if out of range.
    pub fn get_fixed(&self, index: usize) -> Result<Fixed, Error> {
        if index >= self.top {
            return Err(Error::InvalidStackAccess(index));
        }
        Ok(self.fixed_at(index))
    }

    /// Pops a 32-bit integer from the top of stack.
    pub fn pop_i32(&mut self) -> Result<i32, Error> {
        let i = self.pop()?;
        let value = self.values[i];
        Ok(if self.value_is_fixed[i] {
            Fixed::from_bits(value).to_i32()
        } else {
            value
        })
    }

    /// Pops a 16.16 fixed point value from the top of the stack.
    pub fn pop_fixed(&mut self) -> Result<Fixed, Error> {
        let i = self.pop()?;
        Ok(self.fixed_at(i))
    }

    /// Returns an iterator yielding all elements on the stack
    /// as 16.16 fixed point values.
    pub fn fixed_values(&self) -> impl Iterator<Item = Fixed> + '_ {
        (0..self.top).map(|i| self.fixed_at(i))
    }

    /// Exchanges the two topmost elements.
    pub fn exch(&mut self) -> Result<(), Error> {
        if self.top < 2 {
            return Err(Error::StackUnderflow);
        }
        self.values.swap(self.top - 1, self.top - 2);
        self.value_is_fixed.swap(self.top - 1, self.top - 2);
        Ok(())
    }

    /// Pushes a copy of the element `depth` places below the top.
    ///
    /// A negative depth duplicates the top element.
    pub fn index(&mut self, depth: i32) -> Result<(), Error> {
        let depth = depth.max(0) as usize;
        if depth >= self.top {
            return Err(Error::StackUnderflow);
        }
        let i = self.top - 1 - depth;
        let (value, is_fixed) = (self.values[i], self.value_is_fixed[i]);
        self.push_impl(value, is_fixed)
    }

    /// Rotates the topmost `count` elements by `shift` positions toward the
    /// top of the stack.
    pub fn roll(&mut self, count: i32, shift: i32) -> Result<(), Error> {
        if count <= 0 || count as usize > self.top {
            return Err(Error::StackUnderflow);
        }
        let count = count as usize;
        let start = self.top - count;
        let shift = shift.rem_euclid(count as i32) as usize;
        self.values[start..self.top].rotate_right(shift);
        self.value_is_fixed[start..self.top].rotate_right(shift);
        Ok(())
    }

    fn fixed_at(&self, index: usize) -> Fixed {
        let value = self.values[index];
        if self.value_is_fixed[index] {
            Fixed::from_bits(value)
        } else {
            Fixed::from_i32(value)
        }
    }

    fn push_impl(&mut self, value: i32, is_fixed: bool) -> Result<(), Error> {
        if self.top == MAX_STACK {
            return Err(Error::StackOverflow);
        }
        self.values[self.top] = value;
        self.value_is_fixed[self.top] = is_fixed;
        self.top += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<usize, Error> {
        if self.top > 0 {
            self.top -= 1;
            Ok(self.top)
        } else {
            Err(Error::StackUnderflow)
        }
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

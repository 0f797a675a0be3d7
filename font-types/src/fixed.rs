//! fixed-point numerical types

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 32-bit signed fixed point number with 16 bits of fraction.
///
/// This is the representation used for CFF charstring operands: integers
/// are stored shifted left by 16, and the `255` operand encoding supplies
/// the raw bits directly.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Fixed(i32);

impl Fixed {
    /// Minimum value.
    pub const MIN: Self = Self(i32::MIN);

    /// Maximum value.
    pub const MAX: Self = Self(i32::MAX);

    /// This type's smallest representable value
    pub const EPSILON: Self = Self(1);

    /// Representation of 0.0.
    pub const ZERO: Self = Self(0);

    /// Representation of 1.0.
    pub const ONE: Self = Self(1 << 16);

    const INT_MASK: i32 = !0 << 16;
    const ROUND: i32 = 1 << 15;

    /// Creates a new fixed point value from the underlying bit representation.
    #[inline(always)]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Returns the underlying bit representation of the value.
    #[inline(always)]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Creates a fixed point value from an integer, saturating on overflow.
    #[inline(always)]
    pub const fn from_i32(i: i32) -> Self {
        Self(i.saturating_mul(1 << 16))
    }

    /// Returns the value truncated towards negative infinity, as an integer.
    #[inline(always)]
    pub const fn to_i32(self) -> i32 {
        self.0 >> 16
    }

    /// Returns the value rounded to the nearest integer.
    pub fn round_to_i32(self) -> i32 {
        self.round().to_i32()
    }

    /// Returns the nearest integer value.
    pub fn round(self) -> Self {
        Self(self.0.wrapping_add(Self::ROUND) & Self::INT_MASK)
    }

    /// Returns the absolute value of the number.
    pub fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    /// Returns the largest integer less than or equal to the number.
    pub fn floor(self) -> Self {
        Self(self.0 & Self::INT_MASK)
    }

    /// Returns the fractional part of the number.
    pub fn fract(self) -> Self {
        Self(self.0 - self.floor().0)
    }

    /// Returns true if the value has no fractional part.
    pub fn is_integer(self) -> bool {
        self.0 & !Self::INT_MASK == 0
    }

    /// Wrapping addition.
    pub fn wrapping_add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    /// Wrapping subtraction.
    pub fn wrapping_sub(self, other: Self) -> Self {
        Self(self.0.wrapping_sub(other.0))
    }

    /// Square root, computed in 64-bit integer arithmetic.
    ///
    /// Negative inputs return zero.
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::ZERO;
        }
        let mut value = (self.0 as u64) << 16;
        let mut root = 0u64;
        let mut bit = 1u64 << 62;
        while bit > value {
            bit >>= 2;
        }
        while bit != 0 {
            if value >= root + bit {
                value -= root + bit;
                root = (root >> 1) + bit;
            } else {
                root >>= 1;
            }
            bit >>= 2;
        }
        Self(root as i32)
    }

    /// Creates a fixed point value from a 64-bit float, rounding to the
    /// nearest representable value.
    pub fn from_f64(x: f64) -> Self {
        Self((x * 65536.0).round() as i32)
    }

    /// Returns the value as a 64-bit float.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    /// Returns the value as a 32-bit float.
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }
}

impl Add for Fixed {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Fixed {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(self.0.wrapping_sub(other.0))
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Fixed {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Self;
    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        let product = (self.0 as i64 * other.0 as i64 + 0x8000) >> 16;
        Self(product.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }
}

impl Div for Fixed {
    type Output = Self;
    /// Division by zero saturates rather than panicking.
    #[inline(always)]
    fn div(self, other: Self) -> Self {
        if other.0 == 0 {
            return if self.0 < 0 { Self::MIN } else { Self::MAX };
        }
        let quotient = ((self.0 as i64) << 16) / other.0 as i64;
        Self(quotient.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.to_i32())
        } else {
            write!(f, "{}", self.to_f64())
        }
    }
}

impl std::fmt::Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl crate::raw::Scalar for Fixed {
    type Raw = [u8; 4];

    fn to_raw(self) -> Self::Raw {
        self.0.to_be_bytes()
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self(i32::from_be_bytes(raw))
    }
}

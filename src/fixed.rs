/// Signed 20.12 fixed-point scalar.
///
/// All depth comparisons and clip-plane math run on this type so that
/// pass boundaries are bit-exact and reproducible: two records with the
/// same world depth always land on the same side of a clip plane, which
/// floating point does not guarantee once values pass through different
/// expression orders.
///
/// Semantics:
/// - 12 fractional bits (resolution 1/4096).
/// - Add/sub wrap like the underlying `i32`.
/// - Multiply widens to `i64` and shifts right arithmetically, so the
///   product rounds toward negative infinity.
/// - Divide widens, shifts the dividend left, and uses `i64` division,
///   so the quotient truncates toward zero.
/// - `from_f32` truncates toward zero (the cast semantics of `as`).
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i32);

impl Fixed {
    pub const FRAC_BITS: u32 = 12;

    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(1 << Self::FRAC_BITS);
    pub const MAX: Fixed = Fixed(i32::MAX);
    pub const MIN: Fixed = Fixed(i32::MIN);

    /// Construct from a raw bit pattern (integer value scaled by 4096).
    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Fixed(bits)
    }

    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Construct from a whole number. Wraps if `v` exceeds 19 bits.
    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Fixed(v.wrapping_shl(Self::FRAC_BITS))
    }

    /// Whole part, rounded toward negative infinity.
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Quantize a float. Truncates toward zero; out-of-range values
    /// saturate to `MIN`/`MAX` per `as`-cast semantics.
    #[inline]
    pub fn from_f32(v: f32) -> Self {
        Fixed((v * (1 << Self::FRAC_BITS) as f32) as i32)
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / (1 << Self::FRAC_BITS) as f32
    }

    #[inline]
    pub fn min(self, other: Fixed) -> Fixed {
        if self.0 < other.0 {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn max(self, other: Fixed) -> Fixed {
        if self.0 > other.0 {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn clamp(self, lo: Fixed, hi: Fixed) -> Fixed {
        self.max(lo).min(hi)
    }

    #[inline]
    pub fn abs(self) -> Fixed {
        Fixed(self.0.wrapping_abs())
    }

    #[inline]
    pub fn saturating_add(self, other: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(other.0))
    }

    #[inline]
    pub fn saturating_sub(self, other: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(other.0))
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        // Arithmetic shift: product rounds toward negative infinity.
        Fixed(((self.0 as i64 * rhs.0 as i64) >> Self::FRAC_BITS) as i32)
    }
}

impl Div for Fixed {
    type Output = Fixed;
    #[inline]
    fn div(self, rhs: Fixed) -> Fixed {
        // i64 division truncates toward zero.
        Fixed((((self.0 as i64) << Self::FRAC_BITS) / rhs.0 as i64) as i32)
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self.to_f32())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

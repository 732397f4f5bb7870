//! Exact machine-word rational arithmetic.
//!
//! Numeric literals in an expression are kept as exact rationals so that
//! re-parsing identical text always produces identical nodes, and so that
//! constant folding during differentiation never loses precision. The checked
//! constructors return `None` on overflow; callers fall back to building an
//! unfolded symbolic node instead.

use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// An exact rational with a 64-bit numerator and denominator.
///
/// Invariant: the denominator is positive and the fraction is in lowest
/// terms. The sign lives in the numerator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SmallRational {
    num: i64,
    den: u64,
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Normalizes a wide fraction into a `SmallRational`, if it fits.
fn normalize(num: i128, den: i128) -> Option<SmallRational> {
    if den == 0 {
        return None;
    }
    let sign = if (num < 0) == (den < 0) { 1i128 } else { -1i128 };
    let num_abs = num.unsigned_abs();
    let den_abs = den.unsigned_abs();
    if num_abs == 0 {
        return Some(SmallRational { num: 0, den: 1 });
    }
    let g = gcd(num_abs, den_abs);
    let num = i64::try_from(sign * i128::try_from(num_abs / g).ok()?).ok()?;
    let den = u64::try_from(den_abs / g).ok()?;
    Some(SmallRational { num, den })
}

impl SmallRational {
    /// Creates a rational from numerator and denominator.
    ///
    /// Returns `None` if the denominator is zero or the reduced fraction
    /// does not fit in 64 bits.
    #[must_use]
    pub fn new(num: i64, den: i64) -> Option<Self> {
        normalize(i128::from(num), i128::from(den))
    }

    /// Creates a rational from an integer (denominator = 1).
    #[must_use]
    pub const fn from_integer(n: i64) -> Self {
        Self { num: n, den: 1 }
    }

    /// Returns the numerator (carries the sign).
    #[must_use]
    pub const fn numerator(self) -> i64 {
        self.num
    }

    /// Returns the denominator (always positive).
    #[must_use]
    pub const fn denominator(self) -> u64 {
        self.den
    }

    /// Returns true if the denominator is one.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        self.den == 1
    }

    /// Converts to an integer if the denominator is one.
    #[must_use]
    pub const fn to_integer(self) -> Option<i64> {
        if self.den == 1 {
            Some(self.num)
        } else {
            None
        }
    }

    /// Converts to the nearest `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Checked addition.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let num = i128::from(self.num) * i128::from(rhs.den)
            + i128::from(rhs.num) * i128::from(self.den);
        normalize(num, i128::from(self.den) * i128::from(rhs.den))
    }

    /// Checked subtraction.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        let num = i128::from(self.num) * i128::from(rhs.den)
            - i128::from(rhs.num) * i128::from(self.den);
        normalize(num, i128::from(self.den) * i128::from(rhs.den))
    }

    /// Checked multiplication.
    #[must_use]
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        normalize(
            i128::from(self.num) * i128::from(rhs.num),
            i128::from(self.den) * i128::from(rhs.den),
        )
    }

    /// Checked division. Returns `None` if `rhs` is zero.
    #[must_use]
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.num == 0 {
            return None;
        }
        normalize(
            i128::from(self.num) * i128::from(rhs.den),
            i128::from(self.den) * i128::from(rhs.num),
        )
    }

    /// Checked negation.
    #[must_use]
    pub fn checked_neg(self) -> Option<Self> {
        Some(Self {
            num: self.num.checked_neg()?,
            den: self.den,
        })
    }

    /// Checked integer power. Handles negative exponents by inverting.
    ///
    /// Returns `None` on overflow or when raising zero to a negative power.
    #[must_use]
    pub fn checked_powi(self, exp: i32) -> Option<Self> {
        if exp == 0 {
            return Some(Self::one());
        }
        if self.num == 0 && exp < 0 {
            return None;
        }
        let mut acc = Self::one();
        for _ in 0..exp.unsigned_abs() {
            acc = acc.checked_mul(self)?;
        }
        if exp < 0 {
            Self::one().checked_div(acc)
        } else {
            Some(acc)
        }
    }
}

impl Zero for SmallRational {
    fn zero() -> Self {
        Self::from_integer(0)
    }

    fn is_zero(&self) -> bool {
        self.num == 0
    }
}

impl One for SmallRational {
    fn one() -> Self {
        Self::from_integer(1)
    }

    fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }
}

// The panicking operator impls exist to satisfy `Zero`/`One`; hot paths use
// the checked methods above.

impl Add for SmallRational {
    type Output = Self;

    /// # Panics
    ///
    /// Panics on 64-bit overflow.
    fn add(self, rhs: Self) -> Self {
        self.checked_add(rhs).expect("rational addition overflow")
    }
}

impl Sub for SmallRational {
    type Output = Self;

    /// # Panics
    ///
    /// Panics on 64-bit overflow.
    fn sub(self, rhs: Self) -> Self {
        self.checked_sub(rhs).expect("rational subtraction overflow")
    }
}

impl Mul for SmallRational {
    type Output = Self;

    /// # Panics
    ///
    /// Panics on 64-bit overflow.
    fn mul(self, rhs: Self) -> Self {
        self.checked_mul(rhs)
            .expect("rational multiplication overflow")
    }
}

impl Neg for SmallRational {
    type Output = Self;

    /// # Panics
    ///
    /// Panics when negating `i64::MIN / den`.
    fn neg(self) -> Self {
        self.checked_neg().expect("rational negation overflow")
    }
}

impl fmt::Display for SmallRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

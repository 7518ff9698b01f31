//! Fixed-point decimal arithmetic with 18 fractional digits
//!
//! [`Dec`] stores a signed big integer scaled by 10^18, the same representation
//! the chain uses for its own decimals. Every operation that can lose precision
//! truncates toward zero at the 18th fractional digit. Nothing here touches
//! floating point, so results are bit-identical on every platform.
//!
//! ## Design Principles
//!
//! - **Truncate, never round**: `mul`, `quo` and `pow` drop digits past the scale
//! - **Closed arithmetic**: every operation takes and returns `Dec`
//! - **Checked division**: division by zero is an error value, not a panic
//! - **Exact parsing**: strings with more than 18 fractional digits are rejected

use crate::common::errors::FixedPointError;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Number of fractional digits carried by every [`Dec`]
pub const PRECISION: u32 = 18;

/// Upper bound on binomial series terms evaluated by [`Dec::pow_approx`]
pub const MAX_SERIES_TERMS: usize = 100_000;

static SCALE: Lazy<BigInt> = Lazy::new(|| BigInt::from(10u8).pow(PRECISION));

static TWO: Lazy<Dec> = Lazy::new(|| Dec::from_int(2));

/// Precision at which the fractional power series stops (10^-8)
///
/// Matches the constant the chain's balancer math uses, so estimated swap
/// outputs agree with executed ones.
pub static POW_PRECISION: Lazy<Dec> = Lazy::new(|| Dec::from_raw(BigInt::from(10u8).pow(10)));

/// Signed decimal with a fixed scale of 10^18
///
/// Examples:
/// - `1` is stored as `1_000_000_000_000_000_000`
/// - `0.5` is stored as `500_000_000_000_000_000`
/// - `1 / 3` truncates to `0.333333333333333333`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dec {
    raw: BigInt,
}

impl Dec {
    /// Zero
    pub fn zero() -> Self {
        Self { raw: BigInt::zero() }
    }

    /// One
    pub fn one() -> Self {
        Self { raw: SCALE.clone() }
    }

    /// Create from an integer value
    pub fn from_int(value: impl Into<BigInt>) -> Self {
        Self {
            raw: value.into() * &*SCALE,
        }
    }

    /// Create from a raw scaled integer (value = raw / 10^18)
    pub fn from_raw(raw: BigInt) -> Self {
        Self { raw }
    }

    /// Create `numerator / denominator`, truncated
    pub fn from_ratio(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, FixedPointError> {
        Self::from_int(numerator).checked_quo(&Self::from_int(denominator))
    }

    /// `10^exponent` as a decimal
    pub fn ten_pow(exponent: u32) -> Self {
        Self::from_int(BigInt::from(10u8).pow(exponent))
    }

    /// Raw scaled integer
    pub fn raw(&self) -> &BigInt {
        &self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.raw.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.raw.is_negative()
    }

    pub fn abs(&self) -> Self {
        Self {
            raw: self.raw.abs(),
        }
    }

    /// Division truncated toward zero at the fixed scale
    pub fn checked_quo(&self, rhs: &Dec) -> Result<Dec, FixedPointError> {
        if rhs.raw.is_zero() {
            return Err(FixedPointError::DivisionByZero);
        }
        Ok(Self {
            raw: (&self.raw * &*SCALE) / &rhs.raw,
        })
    }

    /// Exact multiplication by an integer
    pub fn mul_int(&self, rhs: &BigInt) -> Dec {
        Self {
            raw: &self.raw * rhs,
        }
    }

    /// Division by an integer, truncated toward zero
    pub fn quo_int(&self, rhs: &BigInt) -> Result<Dec, FixedPointError> {
        if rhs.is_zero() {
            return Err(FixedPointError::DivisionByZero);
        }
        Ok(Self {
            raw: &self.raw / rhs,
        })
    }

    /// Integer part, truncated toward zero
    pub fn truncate(&self) -> BigInt {
        &self.raw / &*SCALE
    }

    /// Integer part as a decimal
    pub fn truncate_dec(&self) -> Dec {
        Self::from_int(self.truncate())
    }

    /// Integer power by square-and-multiply; each multiplication truncates
    pub fn power(&self, mut exponent: u64) -> Dec {
        let mut result = Dec::one();
        let mut base = self.clone();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = &result * &base;
            }
            exponent >>= 1;
            if exponent > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// `self ^ exponent` for a base in (0, 2) and a non-negative exponent
    ///
    /// The exponent is split into an integer part, computed exactly with
    /// [`Dec::power`], and a fractional part, computed with
    /// [`Dec::pow_approx`] at [`POW_PRECISION`]. The absolute error of the
    /// fractional factor stays below `POW_PRECISION` plus one unit in the
    /// 18th digit per series step.
    pub fn pow(&self, exponent: &Dec) -> Result<Dec, FixedPointError> {
        if !self.is_positive() || *self >= *TWO {
            return Err(FixedPointError::PowBaseOutOfRange {
                base: self.to_string(),
            });
        }
        if exponent.is_negative() {
            return Err(FixedPointError::NegativeExponent {
                exp: exponent.to_string(),
            });
        }

        let integer = exponent.truncate_dec();
        let fractional = exponent - &integer;
        let whole = integer
            .truncate()
            .to_u64()
            .ok_or_else(|| FixedPointError::Overflow {
                value: integer.to_string(),
                target: "u64",
            })?;

        let integer_pow = self.power(whole);
        if fractional.is_zero() {
            return Ok(integer_pow);
        }

        let fractional_pow = self.pow_approx(&fractional, &POW_PRECISION)?;
        Ok(&integer_pow * &fractional_pow)
    }

    /// Binomial series `(1 + x)^a = Σ C(a, k) x^k` with `x = self - 1`
    ///
    /// Requires `0 < self < 2` and `0 <= exponent < 1`. Stops as soon as a term
    /// falls below `precision`; since `|x| < 1` the omitted tail is smaller
    /// than the last term evaluated.
    pub fn pow_approx(&self, exponent: &Dec, precision: &Dec) -> Result<Dec, FixedPointError> {
        if !self.is_positive() || *self >= *TWO {
            return Err(FixedPointError::PowBaseOutOfRange {
                base: self.to_string(),
            });
        }
        if exponent.is_negative() || *exponent >= Dec::one() {
            return Err(FixedPointError::FractionalExponentOutOfRange {
                exp: exponent.to_string(),
            });
        }
        if exponent.is_zero() {
            return Ok(Dec::one());
        }

        let one = Dec::one();
        let (x, x_negative) = abs_difference_with_sign(self, &one);
        let mut term = Dec::one();
        let mut sum = Dec::one();
        let mut negative = false;

        // C(a, k) x^k = C(a, k-1) x^(k-1) * (a - (k-1)) / k * x
        for k in 1..=MAX_SERIES_TERMS {
            if term < *precision {
                return Ok(sum);
            }
            let big_k = Dec::from_int(k as u64);
            let (c, c_negative) = abs_difference_with_sign(exponent, &(&big_k - &one));
            term = &term * &(&c * &x);
            term = term.checked_quo(&big_k)?;
            if term.is_zero() {
                return Ok(sum);
            }
            if x_negative {
                negative = !negative;
            }
            if c_negative {
                negative = !negative;
            }
            if negative {
                sum = &sum - &term;
            } else {
                sum = &sum + &term;
            }
        }

        Err(FixedPointError::SeriesDidNotConverge {
            iterations: MAX_SERIES_TERMS,
        })
    }
}

/// `|a - b|` and whether `a < b`
fn abs_difference_with_sign(a: &Dec, b: &Dec) -> (Dec, bool) {
    if a >= b {
        (a - b, false)
    } else {
        (b - a, true)
    }
}

impl FromStr for Dec {
    type Err = FixedPointError;

    /// Parse `[-]digits[.digits]` with at most 18 fractional digits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FixedPointError::InvalidDecimal {
            input: s.to_string(),
        };

        let input = s.trim();
        let (negative, unsigned) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input.strip_prefix('+').unwrap_or(input)),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) if !frac_part.is_empty() => (int_part, frac_part),
            Some(_) => return Err(invalid()),
            None => (unsigned, ""),
        };

        if int_part.is_empty()
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        if frac_part.len() > PRECISION as usize {
            return Err(FixedPointError::TooMuchPrecision {
                input: s.to_string(),
                max: PRECISION,
            });
        }

        let digits = format!("{}{:0<width$}", int_part, frac_part, width = PRECISION as usize);
        let magnitude = BigInt::from_str(&digits).map_err(|_| invalid())?;

        Ok(Self {
            raw: if negative { -magnitude } else { magnitude },
        })
    }
}

/// Always prints the full 18 fractional digits, e.g. `0.007495768517772225`
impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.raw.abs();
        let integer = &magnitude / &*SCALE;
        let fraction = (&magnitude % &*SCALE).to_string();
        let sign = if self.raw.is_negative() { "-" } else { "" };
        write!(
            f,
            "{}{}.{:0>width$}",
            sign,
            integer,
            fraction,
            width = PRECISION as usize
        )
    }
}

impl Serialize for Dec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Dec::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "decimal-interop")]
impl TryFrom<rust_decimal::Decimal> for Dec {
    type Error = FixedPointError;

    fn try_from(value: rust_decimal::Decimal) -> Result<Self, Self::Error> {
        let scale = value.scale();
        if scale > PRECISION {
            return Err(FixedPointError::TooMuchPrecision {
                input: value.to_string(),
                max: PRECISION,
            });
        }
        let raw = BigInt::from(value.mantissa()) * BigInt::from(10u8).pow(PRECISION - scale);
        Ok(Self { raw })
    }
}

// Arithmetic via traits. Add, Sub and Neg are exact; Mul truncates.

impl<'a> Add<&'a Dec> for &'a Dec {
    type Output = Dec;

    fn add(self, rhs: &'a Dec) -> Dec {
        Dec {
            raw: &self.raw + &rhs.raw,
        }
    }
}

impl Add for Dec {
    type Output = Dec;

    fn add(self, rhs: Dec) -> Dec {
        &self + &rhs
    }
}

impl<'a> Sub<&'a Dec> for &'a Dec {
    type Output = Dec;

    fn sub(self, rhs: &'a Dec) -> Dec {
        Dec {
            raw: &self.raw - &rhs.raw,
        }
    }
}

impl Sub for Dec {
    type Output = Dec;

    fn sub(self, rhs: Dec) -> Dec {
        &self - &rhs
    }
}

impl<'a> Mul<&'a Dec> for &'a Dec {
    type Output = Dec;

    fn mul(self, rhs: &'a Dec) -> Dec {
        Dec {
            raw: (&self.raw * &rhs.raw) / &*SCALE,
        }
    }
}

impl Mul for Dec {
    type Output = Dec;

    fn mul(self, rhs: Dec) -> Dec {
        &self * &rhs
    }
}

impl Neg for &Dec {
    type Output = Dec;

    fn neg(self) -> Dec {
        Dec {
            raw: -&self.raw,
        }
    }
}

impl Neg for Dec {
    type Output = Dec;

    fn neg(self) -> Dec {
        -&self
    }
}

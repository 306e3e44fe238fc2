//! Fixed-point arithmetic.
//!
//! On-chain quantities are integers scaled by `10^decimals` of the token they
//! denominate. [`FixedPoint`] normalizes everything to 18 decimals and follows
//! the on-chain rules exactly: every multiplication and division truncates
//! toward zero, and overflow is reported instead of wrapping.

use std::{fmt, str::FromStr};

use alloy::primitives::{I256, U256};
use fastnum::{
    D256, bint,
    decimal::{Context, Decimal, RoundingMode},
};

const SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Arithmetic and parsing failures of [`FixedPoint`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NumError {
    #[error("fixed-point overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("square root of negative value")]
    NegativeSqrt,

    #[error("invalid decimal literal: {0}")]
    Parse(String),
}

/// Fixed-point to decimal converter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    decimals: i32,
}

impl Converter {
    pub(crate) fn new(decimals: u8) -> Self {
        Self {
            decimals: decimals as i32,
        }
    }

    pub fn from_signed<const N: usize>(&self, value: I256) -> Decimal<N> {
        let unscaled = bint::UInt::<N>::from_le_slice(value.unsigned_abs().as_le_slice())
            .expect("Converter: abs(I256) -> UInt::<N>");
        Decimal::<N>::from_parts(
            unscaled,
            -self.decimals,
            match value.sign() {
                alloy::primitives::Sign::Negative => fastnum::decimal::Sign::Minus,
                alloy::primitives::Sign::Positive => fastnum::decimal::Sign::Plus,
            },
            Context::default().with_rounding_mode(RoundingMode::Floor),
        )
    }

    pub fn to_signed<const N: usize>(&self, value: Decimal<N>) -> I256 {
        let rescaled = value.rescale(self.decimals as i16);
        let mut res = I256::try_from_le_slice(rescaled.digits().to_radix_le(256).as_slice())
            .unwrap_or_default();
        if value.is_negative() {
            res = res.saturating_neg();
        }
        res
    }
}

/// Signed 18-decimal fixed-point number backed by a 256-bit integer.
///
/// Equality and ordering compare the raw scaled integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPoint(I256);

impl FixedPoint {
    pub const DECIMALS: u8 = 18;
    pub const ZERO: Self = Self(I256::ZERO);
    pub const ONE: Self = Self(I256::from_raw(SCALE));

    /// Wraps a raw value already scaled by `10^18`.
    pub const fn from_raw(raw: I256) -> Self {
        Self(raw)
    }

    /// Raw value scaled by `10^18`.
    pub const fn into_raw(self) -> I256 {
        self.0
    }

    pub fn from_int(value: i64) -> Self {
        let abs = Self(I256::from_raw(U256::from(value.unsigned_abs()) * SCALE));
        if value < 0 { Self(-abs.0) } else { abs }
    }

    /// Normalizes a raw token amount with `decimals` decimals.
    /// Amounts with more than 18 decimals lose the extra digits (truncation).
    pub fn from_units(raw: U256, decimals: u8) -> Result<Self, NumError> {
        let scaled = if decimals <= Self::DECIMALS {
            raw.checked_mul(pow10(Self::DECIMALS - decimals))
                .ok_or(NumError::Overflow)?
        } else {
            raw / pow10(decimals - Self::DECIMALS)
        };
        I256::try_from(scaled)
            .map(Self)
            .map_err(|_| NumError::Overflow)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn try_add(self, rhs: Self) -> Result<Self, NumError> {
        self.0.checked_add(rhs.0).map(Self).ok_or(NumError::Overflow)
    }

    pub fn try_sub(self, rhs: Self) -> Result<Self, NumError> {
        self.0.checked_sub(rhs.0).map(Self).ok_or(NumError::Overflow)
    }

    /// `self * rhs / 10^18`, truncating toward zero.
    pub fn try_mul(self, rhs: Self) -> Result<Self, NumError> {
        self.0
            .checked_mul(rhs.0)
            .and_then(|product| product.checked_div(I256::from_raw(SCALE)))
            .map(Self)
            .ok_or(NumError::Overflow)
    }

    /// `self * 10^18 / rhs`, truncating toward zero.
    pub fn try_div(self, rhs: Self) -> Result<Self, NumError> {
        if rhs.is_zero() {
            return Err(NumError::DivisionByZero);
        }
        self.0
            .checked_mul(I256::from_raw(SCALE))
            .and_then(|scaled| scaled.checked_div(rhs.0))
            .map(Self)
            .ok_or(NumError::Overflow)
    }

    /// Floor of the square root, keeping the 18-decimal scale.
    pub fn try_sqrt(self) -> Result<Self, NumError> {
        if self.is_negative() {
            return Err(NumError::NegativeSqrt);
        }
        let scaled = self
            .0
            .into_raw()
            .checked_mul(SCALE)
            .ok_or(NumError::Overflow)?;
        I256::try_from(isqrt(scaled))
            .map(Self)
            .map_err(|_| NumError::Overflow)
    }

    /// Bounds the value into the closed range spanned by `a` and `b`,
    /// regardless of their order.
    pub fn bounded(self, a: Self, b: Self) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.max(lo).min(hi)
    }

    /// Decimal representation for interop with `fastnum` based code.
    pub fn to_decimal(self) -> D256 {
        Converter::new(Self::DECIMALS).from_signed(self.0)
    }

    /// Renders the value with exactly `digits` decimals, truncating the rest.
    pub fn to_precision_string(self, digits: u8) -> String {
        let digits = digits.min(Self::DECIMALS);
        let abs = self.0.unsigned_abs() / pow10(Self::DECIMALS - digits);
        let sign = if self.is_negative() && !abs.is_zero() {
            "-"
        } else {
            ""
        };
        if digits == 0 {
            return format!("{sign}{abs}");
        }
        let unit = pow10(digits);
        let frac = (abs % unit).to::<u64>();
        format!(
            "{sign}{}.{frac:0width$}",
            abs / unit,
            width = digits as usize
        )
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.to_precision_string(Self::DECIMALS);
        let trimmed = full.trim_end_matches('0').trim_end_matches('.');
        f.write_str(trimmed)
    }
}

impl FromStr for FixedPoint {
    type Err = NumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = D256::from_str(s.trim(), Context::default())
            .map_err(|_| NumError::Parse(s.to_string()))?;
        if !parsed.is_finite() {
            return Err(NumError::Parse(s.to_string()));
        }
        let converter = Converter::new(Self::DECIMALS);
        let raw = converter.to_signed(parsed);
        // Rejects literals with more than 18 decimals or out of range
        if converter.from_signed::<4>(raw) != parsed {
            return Err(NumError::Parse(s.to_string()));
        }
        Ok(Self(raw))
    }
}

fn pow10(exp: u8) -> U256 {
    U256::from(10u8).pow(U256::from(exp))
}

/// Integer square root (floor), Newton iteration.
fn isqrt(n: U256) -> U256 {
    if n < U256::from(2u8) {
        return n;
    }
    let mut x = n;
    let mut y = (n >> 1) + (n & U256::from(1u8));
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}

use crate::error::MathError;
use alloy_primitives::U256;
use std::str::FromStr;

const U256_ONE: U256 = U256::ONE;
const U256_TWO: U256 = U256::from_limbs([2, 0, 0, 0]);
const U256_THREE: U256 = U256::from_limbs([3, 0, 0, 0]);

/// Direction in which an inexact integer division is resolved.
///
/// Amounts owed to the pool (inputs, fees) round [`Rounding::Up`];
/// amounts leaving the pool (outputs) round [`Rounding::Down`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Rounding {
    Down,
    Up,
}

impl TryFrom<u8> for Rounding {
    type Error = MathError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rounding::Down),
            1 => Ok(Rounding::Up),
            _ => Err(MathError::InvalidRoundingMode),
        }
    }
}

impl FromStr for Rounding {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" => Ok(Rounding::Down),
            "up" => Ok(Rounding::Up),
            _ => Err(MathError::InvalidRoundingMode),
        }
    }
}

/// Computes `floor(a * b / denominator)` with full 512‑bit intermediate
/// precision, returning a `MathError` on overflow or division by zero.
///
/// This is the 512‑bit FullMath `mulDiv` routine (Remco Bloemen's
/// algorithm as used by Uniswap V3), unchanged apart from error handling.
///
/// The product is never materialised in 256 bits, so `a * b` may exceed
/// `U256::MAX` as long as the quotient fits.
fn mul_div_floor(a: U256, b: U256, mut denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let mm = a.mul_mod(b, U256::MAX);
    let mut prod0 = a.wrapping_mul(b);

    let (mut prod1, borrow1) = mm.overflowing_sub(prod0);
    if borrow1 {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    if prod1.is_zero() {
        return Ok(prod0.wrapping_div(denominator));
    }

    if denominator <= prod1 {
        return Err(MathError::Overflow);
    }

    let remainder = a.mul_mod(b, denominator);
    let (prod0_new, borrow2) = prod0.overflowing_sub(remainder);
    prod0 = prod0_new;
    if borrow2 {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    let twos = denominator & denominator.wrapping_neg();
    denominator = denominator.wrapping_div(twos);
    prod0 = prod0.wrapping_div(twos);

    let twos_adj = twos
        .wrapping_neg()
        .wrapping_div(twos)
        .wrapping_add(U256_ONE);
    prod0 |= prod1.wrapping_mul(twos_adj);

    let mut inv = U256_THREE.wrapping_mul(denominator) ^ U256_TWO;

    macro_rules! newton_iteration {
        () => {
            inv = inv.wrapping_mul(U256_TWO.wrapping_sub(denominator.wrapping_mul(inv)))
        };
    }

    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();

    Ok(prod0.wrapping_mul(inv))
}

/// Computes `x * y / denominator` rounded in the requested direction.
///
/// This underpins every fee and slippage calculation; the intermediate
/// product is carried at 512 bits so it can never wrap silently.
#[inline]
pub fn mul_div(
    x: U256,
    y: U256,
    denominator: U256,
    rounding: Rounding,
) -> Result<U256, MathError> {
    let result = mul_div_floor(x, y, denominator)?;

    match rounding {
        Rounding::Down => Ok(result),
        Rounding::Up => {
            if x.mul_mod(y, denominator).is_zero() {
                Ok(result)
            } else {
                result.checked_add(U256_ONE).ok_or(MathError::Overflow)
            }
        }
    }
}

/// Computes `(x * y) >> offset`, rounding up when any shifted-out bit is set
/// and `rounding` is [`Rounding::Up`].
///
/// With `offset = 64` this multiplies an amount by a Q64.64 price.
#[inline]
pub fn mul_shift_right(
    x: U256,
    y: U256,
    offset: usize,
    rounding: Rounding,
) -> Result<U256, MathError> {
    if offset >= 256 {
        return Err(MathError::Overflow);
    }

    let prod = x.checked_mul(y).ok_or(MathError::Overflow)?;
    let result = prod >> offset;

    if rounding == Rounding::Up && offset > 0 {
        let mask = (U256_ONE << offset) - U256_ONE;
        if !(prod & mask).is_zero() {
            return result.checked_add(U256_ONE).ok_or(MathError::Overflow);
        }
    }
    Ok(result)
}

/// Computes `(x << offset) / y` rounded in the requested direction.
///
/// With `offset = 64` this divides an amount by a Q64.64 price.
#[inline]
pub fn shift_left_div(
    x: U256,
    y: U256,
    offset: usize,
    rounding: Rounding,
) -> Result<U256, MathError> {
    if y.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    if offset >= 256 || (!x.is_zero() && x.leading_zeros() < offset) {
        return Err(MathError::Overflow);
    }

    div_round(x << offset, y, rounding)
}

/// Returns `(x / y, x % y)`, or `MathError::DivisionByZero` when `y` is zero.
#[inline]
pub fn div_rem(x: U256, y: U256) -> Result<(U256, U256), MathError> {
    if y.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    Ok(x.div_rem(y))
}

/// Divides `x` by `y` with explicit rounding.
///
/// `Up` yields `ceil(x / y)`, `Down` truncates.
#[inline]
pub fn div_round(x: U256, y: U256, rounding: Rounding) -> Result<U256, MathError> {
    let (quotient, remainder) = div_rem(x, y)?;

    match rounding {
        Rounding::Up if !remainder.is_zero() => Ok(quotient + U256_ONE),
        _ => Ok(quotient),
    }
}

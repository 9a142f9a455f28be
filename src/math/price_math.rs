use crate::error::{Error, MathError};
use crate::math::math_helpers::{Rounding, mul_shift_right, shift_left_div};
use crate::{ACTIVE_ID, BASIS_POINT_MAX, SCALE, SCALE_OFFSET};
use alloy_primitives::U256;

const U128_MAX: U256 = U256::from_limbs([u64::MAX, u64::MAX, 0, 0]);

/// Raises a Q64.64 `base` to a signed integer power using square‑and‑multiply.
///
/// Every partial product rounds down. Negative exponents are served by
/// inverting the positive power, `2^128 / base^|exp|`, so the result stays
/// in Q64.64. Results that do not fit in 128 bits fail with
/// `MathError::Overflow`, results that truncate to zero with
/// `MathError::Underflow`.
pub fn pow_q64(base: U256, exp: i64) -> Result<U256, MathError> {
    let invert = exp < 0;
    let mut remaining = exp.unsigned_abs();

    let mut result = SCALE;
    let mut squared = base;

    let overflow = if invert {
        MathError::Underflow
    } else {
        MathError::Overflow
    };

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = mul_shift_right(result, squared, SCALE_OFFSET, Rounding::Down)
                .map_err(|_| overflow.clone())?;
            if result > U128_MAX {
                return Err(overflow);
            }
        }
        remaining >>= 1;
        if remaining > 0 {
            squared = mul_shift_right(squared, squared, SCALE_OFFSET, Rounding::Down)
                .map_err(|_| overflow.clone())?;
        }
    }

    if invert {
        result = shift_left_div(SCALE, result, SCALE_OFFSET, Rounding::Down)?;
        if result.is_zero() {
            return Err(MathError::Underflow);
        }
    }

    Ok(result)
}

/// Returns the Q64.64 price of `bin_id`, i.e. `(1 + bin_step / 10_000)^(bin_id - ACTIVE_ID)`.
///
/// The price is quoted in units of Y per unit of X. A `bin_step` of zero is a
/// flat ladder where every bin is priced at exactly one.
pub fn get_price_from_id(bin_step: u16, bin_id: i32) -> Result<U256, Error> {
    if u32::from(bin_step) > BASIS_POINT_MAX {
        return Err(Error::InvalidParameter("bin step exceeds 10000 basis points"));
    }

    let base = SCALE + (U256::from(bin_step) << SCALE_OFFSET) / U256::from(BASIS_POINT_MAX);
    let exponent = i64::from(bin_id) - i64::from(ACTIVE_ID);

    Ok(pow_q64(base, exponent)?)
}

fn validate_bin_step(bin_step: u16) -> Result<(), Error> {
    if bin_step == 0 || u32::from(bin_step) > BASIS_POINT_MAX {
        return Err(Error::InvalidParameter("bin step must be within (0, 10000]"));
    }
    Ok(())
}

/// Converts a bin id into a human‑readable price of the base token
/// denominated in the quote token, adjusted for token decimals.
pub fn price_from_id(
    bin_step: u16,
    bin_id: i32,
    base_decimals: u8,
    quote_decimals: u8,
) -> Result<f64, Error> {
    validate_bin_step(bin_step)?;

    let exponent = bin_id
        .checked_sub(ACTIVE_ID)
        .ok_or(Error::InvalidParameter("bin id out of range"))?;
    let step_ratio = 1.0 + f64::from(bin_step) / f64::from(BASIS_POINT_MAX);
    let decimals_diff = i32::from(base_decimals) - i32::from(quote_decimals);

    Ok(step_ratio.powi(exponent) * 10f64.powi(decimals_diff))
}

/// Converts a decimal‑adjusted price back into the nearest bin id.
///
/// Floating point logarithms can drift by at most one bin away from the
/// exact inverse of [`price_from_id`] for extreme exponents.
pub fn id_from_price(
    price: f64,
    bin_step: u16,
    base_decimals: u8,
    quote_decimals: u8,
) -> Result<i32, Error> {
    validate_bin_step(bin_step)?;
    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidParameter("price must be positive and finite"));
    }

    let decimals_diff = i32::from(quote_decimals) - i32::from(base_decimals);
    let price_adjusted = price * 10f64.powi(decimals_diff);
    let step_ratio = 1.0 + f64::from(bin_step) / f64::from(BASIS_POINT_MAX);

    let exponent = (price_adjusted.ln() / step_ratio.ln()).round();
    let bin_id = exponent + f64::from(ACTIVE_ID);

    if !bin_id.is_finite() || bin_id < f64::from(i32::MIN) || bin_id > f64::from(i32::MAX) {
        return Err(Error::InvalidParameter("price maps outside the bin id range"));
    }

    Ok(bin_id as i32)
}

//! Two‑tier fee model: a static base fee set by the pool plus a variable fee
//! that grows with the square of recent volatility.
//!
//! Rates are expressed in [`PRECISION`](crate::PRECISION) units, so
//! `10_000_000` is 1%. Fee amounts are always rounded in the pool's favour.

use crate::error::{Error, MathError};
use crate::math::math_helpers::{Rounding, mul_div};
use crate::{BASIS_POINT_MAX, PRECISION, VARIABLE_FEE_PRECISION};
use alloy_primitives::U256;

/// Base fee rate: `bin_step * base_factor * 10`.
#[inline]
pub fn get_base_fee(bin_step: u16, base_factor: u16) -> u128 {
    u128::from(bin_step) * u128::from(base_factor) * 10
}

/// Variable fee rate: `ceil((volatility_accumulator * bin_step)^2 * variable_fee_control / 1e11)`.
///
/// Returns zero when the pool has the variable fee disabled.
pub fn get_variable_fee(
    volatility_accumulator: u32,
    bin_step: u16,
    variable_fee_control: u32,
) -> Result<u128, MathError> {
    if variable_fee_control == 0 {
        return Ok(0);
    }

    let prod = u128::from(volatility_accumulator) * u128::from(bin_step);
    let numerator = prod
        .checked_mul(prod)
        .and_then(|square| square.checked_mul(u128::from(variable_fee_control)))
        .ok_or(MathError::Overflow)?;

    Ok(numerator.div_ceil(VARIABLE_FEE_PRECISION))
}

/// Total fee rate charged in the current bin: base fee plus variable fee.
pub fn get_total_fee(
    bin_step: u16,
    base_factor: u16,
    volatility_accumulator: u32,
    variable_fee_control: u32,
) -> Result<u128, MathError> {
    let variable_fee = get_variable_fee(volatility_accumulator, bin_step, variable_fee_control)?;

    get_base_fee(bin_step, base_factor)
        .checked_add(variable_fee)
        .ok_or(MathError::Overflow)
}

/// Fee taken out of a gross `amount`: `ceil(amount * fee / PRECISION)`.
#[inline]
pub fn get_fee_amount(amount: U256, fee: u128) -> Result<U256, Error> {
    Ok(mul_div(
        amount,
        U256::from(fee),
        U256::from(PRECISION),
        Rounding::Up,
    )?)
}

/// Fee to add on top of a net `amount` so that, once the fee is deducted,
/// exactly `amount` remains: `ceil(amount * fee / (PRECISION - fee))`.
pub fn get_fee_for_amount(amount: U256, fee: u128) -> Result<U256, Error> {
    if fee >= PRECISION {
        return Err(Error::InvalidParameter("fee rate must be below 100%"));
    }

    Ok(mul_div(
        amount,
        U256::from(fee),
        U256::from(PRECISION - fee),
        Rounding::Up,
    )?)
}

/// Share of `fee_amount` owed to the protocol: `floor(fee_amount * protocol_share / 10_000)`.
#[inline]
pub fn get_protocol_fee(fee_amount: U256, protocol_share: u16) -> Result<U256, Error> {
    Ok(mul_div(
        fee_amount,
        U256::from(protocol_share),
        U256::from(BASIS_POINT_MAX),
        Rounding::Down,
    )?)
}

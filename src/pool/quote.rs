use crate::error::{Error, SwapError};
use crate::math::fee_math::get_fee_amount;
use crate::math::math_helpers::{Rounding, mul_div};
use crate::math::price_math::get_price_from_id;
use crate::pool::bin_array::BinArrayRange;
use crate::pool::pair::PairState;
use crate::pool::swap::{SwapResult, SwapSimulator, convert_in_to_out};
use alloy_primitives::U256;
use tracing::debug;

/// Slippage percentages are carried with nine decimals.
const SLIPPAGE_SCALE: f64 = 1_000_000_000.0;
const HUNDRED_PERCENT: u64 = 100_000_000_000;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuoteParams {
    /// Input amount when `is_exact_input`, otherwise the desired output.
    pub amount: U256,
    /// Swap direction: `true` sells X for Y, `false` sells Y for X.
    pub swap_for_y: bool,
    pub is_exact_input: bool,
    /// Tolerated slippage in percent, within `[0, 100)`.
    ///
    /// The value is rounded to nine decimals before use, so anything above
    /// `99.9999999995` counts as 100% and is rejected with
    /// `SwapError::InvalidSlippage`.
    pub slippage_percent: f64,
}

impl QuoteParams {
    #[inline]
    pub fn new(amount: U256, swap_for_y: bool, is_exact_input: bool, slippage_percent: f64) -> Self {
        Self {
            amount,
            swap_for_y,
            is_exact_input,
            slippage_percent,
        }
    }

    #[inline]
    pub fn exact_in(amount_in: U256, swap_for_y: bool, slippage_percent: f64) -> Self {
        Self::new(amount_in, swap_for_y, true, slippage_percent)
    }

    #[inline]
    pub fn exact_out(amount_out: U256, swap_for_y: bool, slippage_percent: f64) -> Self {
        Self::new(amount_out, swap_for_y, false, slippage_percent)
    }
}

/// Advisory swap quote plus the slippage‑bounded amounts to submit.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Quote {
    pub amount_in: U256,
    pub amount_out: U256,
    /// Amount to submit: the input for exact‑input swaps, the output otherwise.
    pub amount: U256,
    /// Bound on the other side: minimum output for exact‑input swaps,
    /// maximum input otherwise.
    pub other_amount_offset: U256,
    /// Relative shortfall of `amount_out` against a trade filled entirely at
    /// the active bin's price. Zero or negative.
    pub price_impact_percent: f64,
}

/// Returns the share of an amount kept after slippage, scaled by
/// [`HUNDRED_PERCENT`].
fn slippage_keep(slippage_percent: f64) -> Result<U256, Error> {
    if !slippage_percent.is_finite() || !(0.0..100.0).contains(&slippage_percent) {
        return Err(SwapError::InvalidSlippage.into());
    }

    let scaled = (slippage_percent * SLIPPAGE_SCALE).round() as u64;
    if scaled >= HUNDRED_PERCENT {
        return Err(SwapError::InvalidSlippage.into());
    }

    Ok(U256::from(HUNDRED_PERCENT - scaled))
}

/// `floor(amount_out * (1 - slippage))`.
pub fn min_amount_out(amount_out: U256, slippage_percent: f64) -> Result<U256, Error> {
    let keep = slippage_keep(slippage_percent)?;
    Ok(mul_div(
        amount_out,
        keep,
        U256::from(HUNDRED_PERCENT),
        Rounding::Down,
    )?)
}

/// `ceil(amount_in / (1 - slippage))`.
pub fn max_amount_in(amount_in: U256, slippage_percent: f64) -> Result<U256, Error> {
    let keep = slippage_keep(slippage_percent)?;
    Ok(mul_div(
        amount_in,
        U256::from(HUNDRED_PERCENT),
        keep,
        Rounding::Up,
    )?)
}

fn u256_to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * 18446744073709551616.0 + *limb as f64)
}

/// Quotes a swap against the loaded window and derives the slippage bounds
/// and price impact.
///
/// A window without any liquidity yields an all‑zero quote instead of an
/// error.
pub fn get_quote(
    pair: &PairState,
    bins: BinArrayRange<'_>,
    params: QuoteParams,
    now: Option<u64>,
) -> Result<Quote, Error> {
    if params.amount.is_zero() {
        return Err(SwapError::ZeroAmount.into());
    }
    slippage_keep(params.slippage_percent)?;
    pair.validate()?;

    if bins.total_supply() == 0 {
        debug!(active_id = pair.active_id, "no liquidity in loaded bins, returning zero quote");
        return Ok(Quote::default());
    }

    let simulator = SwapSimulator::new(pair, bins, now);
    let result = if params.is_exact_input {
        simulator.simulate_exact_in(params.amount, params.swap_for_y)?
    } else {
        simulator.simulate_exact_out(params.amount, params.swap_for_y)?
    };

    let (max_in, min_out) = if params.is_exact_input {
        (
            result.amount_in,
            min_amount_out(result.amount_out, params.slippage_percent)?,
        )
    } else {
        (
            max_amount_in(result.amount_in, params.slippage_percent)?,
            result.amount_out,
        )
    };

    let best_case_amount_out = best_case_amount_out(&simulator, pair, &result, params.swap_for_y)?;
    let price_impact_percent = if best_case_amount_out.is_zero() {
        0.0
    } else {
        let best = u256_to_f64(best_case_amount_out);
        (u256_to_f64(result.amount_out) - best) / best * 100.0
    };

    let quote = Quote {
        amount_in: result.amount_in,
        amount_out: result.amount_out,
        amount: if params.is_exact_input { max_in } else { min_out },
        other_amount_offset: if params.is_exact_input { min_out } else { max_in },
        price_impact_percent,
    };

    debug!(
        amount_in = %quote.amount_in,
        amount_out = %quote.amount_out,
        amount = %quote.amount,
        other_amount_offset = %quote.other_amount_offset,
        price_impact_percent = quote.price_impact_percent,
        "assembled quote"
    );

    Ok(quote)
}

/// Output the simulated input would buy if it were filled entirely in the
/// active bin, at its price and current fee, with unlimited reserves.
fn best_case_amount_out(
    simulator: &SwapSimulator<'_>,
    pair: &PairState,
    result: &SwapResult,
    swap_for_y: bool,
) -> Result<U256, Error> {
    let mut tracker = simulator.initial_tracker();
    tracker.update_volatility_accumulator(pair.active_id);
    let total_fee = tracker.total_fee(pair.bin_step)?;

    let price = get_price_from_id(pair.bin_step, pair.active_id)?;
    let fee_amount = get_fee_amount(result.amount_in, total_fee)?;

    convert_in_to_out(
        result.amount_in.saturating_sub(fee_amount),
        price,
        swap_for_y,
        Rounding::Down,
    )
}

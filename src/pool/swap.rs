use crate::error::{Error, StateError, SwapError};
use crate::math::fee_math::{get_fee_amount, get_fee_for_amount, get_protocol_fee};
use crate::math::math_helpers::{Rounding, mul_shift_right, shift_left_div};
use crate::math::price_math::get_price_from_id;
use crate::pool::bin_array::{Bin, BinArrayRange};
use crate::pool::pair::PairState;
use crate::pool::volatility::VolatilityTracker;
use crate::{MAX_BIN_CROSSINGS, SCALE_OFFSET};
use alloy_primitives::U256;
use tracing::{debug, trace};

/// Amounts produced by swapping inside a single bin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapStepResult {
    /// Input consumed by the bin, fee included.
    pub amount_in_with_fees: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
    /// Part of `fee_amount` owed to the protocol.
    pub protocol_fee_amount: U256,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SwapResult {
    /// Total input, fees included.
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
    pub protocol_fee_amount: U256,
    /// Number of bins the swap touched, the starting bin included.
    pub bins_visited: u32,
    /// Last bin the swap touched.
    pub end_bin_id: i32,
}

/// Converts an input amount into output units at a Q64.64 Y‑per‑X `price`.
#[inline]
pub(crate) fn convert_in_to_out(
    amount: U256,
    price: U256,
    swap_for_y: bool,
    rounding: Rounding,
) -> Result<U256, Error> {
    let converted = if swap_for_y {
        mul_shift_right(amount, price, SCALE_OFFSET, rounding)?
    } else {
        shift_left_div(amount, price, SCALE_OFFSET, rounding)?
    };
    Ok(converted)
}

/// Converts an output amount into the input needed at a Q64.64 Y‑per‑X `price`.
#[inline]
pub(crate) fn convert_out_to_in(
    amount: U256,
    price: U256,
    swap_for_y: bool,
    rounding: Rounding,
) -> Result<U256, Error> {
    let converted = if swap_for_y {
        shift_left_div(amount, price, SCALE_OFFSET, rounding)?
    } else {
        mul_shift_right(amount, price, SCALE_OFFSET, rounding)?
    };
    Ok(converted)
}

/// Swaps as much of `amount_in_left` as `bin` can absorb at `price`.
///
/// If the remaining input covers the whole output reserve plus its fee the
/// bin is drained; otherwise the full remaining input is consumed and the
/// output is rounded down and capped at the reserve.
pub fn compute_swap_step_exact_in(
    bin: &Bin,
    price: U256,
    amount_in_left: U256,
    swap_for_y: bool,
    total_fee: u128,
    protocol_share: u16,
) -> Result<SwapStepResult, Error> {
    let reserve_out = U256::from(bin.reserve_out(swap_for_y));

    let max_amount_in = convert_out_to_in(reserve_out, price, swap_for_y, Rounding::Up)?;
    let max_fee = get_fee_for_amount(max_amount_in, total_fee)?;
    let max_amount_in_with_fees = max_amount_in + max_fee;

    let (amount_in_with_fees, amount_out, fee_amount) = if amount_in_left >= max_amount_in_with_fees
    {
        (max_amount_in_with_fees, reserve_out, max_fee)
    } else {
        let fee_amount = get_fee_amount(amount_in_left, total_fee)?;
        let amount_in = amount_in_left - fee_amount;
        let amount_out = convert_in_to_out(amount_in, price, swap_for_y, Rounding::Down)?;

        (amount_in_left, amount_out.min(reserve_out), fee_amount)
    };

    Ok(SwapStepResult {
        amount_in_with_fees,
        amount_out,
        fee_amount,
        protocol_fee_amount: get_protocol_fee(fee_amount, protocol_share)?,
    })
}

/// Takes up to `amount_out_left` out of `bin` at `price` and computes the
/// input, fee included, that the pool requires for it.
pub fn compute_swap_step_exact_out(
    bin: &Bin,
    price: U256,
    amount_out_left: U256,
    swap_for_y: bool,
    total_fee: u128,
    protocol_share: u16,
) -> Result<SwapStepResult, Error> {
    let reserve_out = U256::from(bin.reserve_out(swap_for_y));
    let amount_out = amount_out_left.min(reserve_out);

    let amount_in = convert_out_to_in(amount_out, price, swap_for_y, Rounding::Up)?;
    let fee_amount = get_fee_for_amount(amount_in, total_fee)?;

    Ok(SwapStepResult {
        amount_in_with_fees: amount_in + fee_amount,
        amount_out,
        fee_amount,
        protocol_fee_amount: get_protocol_fee(fee_amount, protocol_share)?,
    })
}

// the running state of a simulated swap
struct SwapState {
    // the amount remaining to be swapped in (exact in) or out (exact out)
    amount_specified_remaining: U256,
    // the amount already produced (exact in) or required (exact out) on the other side
    amount_calculated: U256,
    // the bin currently being swapped in
    active_id: i32,
    fee_amount: U256,
    protocol_fee_amount: U256,
    bins_visited: u32,
}

/// Walks bins away from the active bin to simulate a swap against an
/// immutable pool snapshot.
///
/// A simulator owns nothing mutable: every call seeds its own
/// [`VolatilityTracker`] from the pair, so one instance may be shared
/// between threads.
#[derive(Clone, Copy, Debug)]
pub struct SwapSimulator<'a> {
    pair: &'a PairState,
    bins: BinArrayRange<'a>,
    now: Option<u64>,
}

impl<'a> SwapSimulator<'a> {
    /// `now` is the resolved block timestamp. `None` leaves the volatility
    /// references as persisted.
    pub fn new(pair: &'a PairState, bins: BinArrayRange<'a>, now: Option<u64>) -> Self {
        Self { pair, bins, now }
    }

    /// Volatility state at the start of a swap, references already updated.
    pub fn initial_tracker(&self) -> VolatilityTracker {
        let mut tracker = VolatilityTracker::new(self.pair);
        if let Some(now) = self.now {
            tracker.update_references(self.pair.active_id, now);
        }
        tracker
    }

    /// Simulates selling exactly `amount_in`, fees included.
    pub fn simulate_exact_in(&self, amount_in: U256, swap_for_y: bool) -> Result<SwapResult, Error> {
        self.swap(amount_in, swap_for_y, true)
    }

    /// Simulates buying exactly `amount_out`.
    pub fn simulate_exact_out(
        &self,
        amount_out: U256,
        swap_for_y: bool,
    ) -> Result<SwapResult, Error> {
        self.swap(amount_out, swap_for_y, false)
    }

    fn swap(
        &self,
        amount_specified: U256,
        swap_for_y: bool,
        exact_input: bool,
    ) -> Result<SwapResult, Error> {
        if amount_specified.is_zero() {
            return Err(SwapError::ZeroAmount.into());
        }

        let bin_step = self.pair.bin_step;
        let protocol_share = self.pair.static_fee_parameters.protocol_share;
        let mut tracker = self.initial_tracker();

        let mut state = SwapState {
            amount_specified_remaining: amount_specified,
            amount_calculated: U256::ZERO,
            active_id: self.pair.active_id,
            fee_amount: U256::ZERO,
            protocol_fee_amount: U256::ZERO,
            bins_visited: 0,
        };

        while !state.amount_specified_remaining.is_zero() {
            if state.bins_visited >= MAX_BIN_CROSSINGS {
                return Err(SwapError::SwapCrossesTooManyBins.into());
            }

            tracker.update_volatility_accumulator(state.active_id);
            let total_fee = tracker.total_fee(bin_step)?;

            let bin = self.bins.get_bin(state.active_id)?;
            let price = get_price_from_id(bin_step, state.active_id)?;

            let step = if exact_input {
                compute_swap_step_exact_in(
                    bin,
                    price,
                    state.amount_specified_remaining,
                    swap_for_y,
                    total_fee,
                    protocol_share,
                )?
            } else {
                compute_swap_step_exact_out(
                    bin,
                    price,
                    state.amount_specified_remaining,
                    swap_for_y,
                    total_fee,
                    protocol_share,
                )?
            };

            state.bins_visited += 1;
            state.fee_amount += step.fee_amount;
            state.protocol_fee_amount += step.protocol_fee_amount;

            if exact_input {
                state.amount_specified_remaining -= step.amount_in_with_fees;
                state.amount_calculated += step.amount_out;
            } else {
                state.amount_specified_remaining -= step.amount_out;
                state.amount_calculated += step.amount_in_with_fees;
            }

            trace!(
                bin_id = state.active_id,
                total_fee,
                amount_in = %step.amount_in_with_fees,
                amount_out = %step.amount_out,
                fee = %step.fee_amount,
                remaining = %state.amount_specified_remaining,
                "swap step"
            );

            if !state.amount_specified_remaining.is_zero() {
                state.active_id = next_bin_id(state.active_id, swap_for_y)?;
            }
        }

        let (amount_in, amount_out) = if exact_input {
            (amount_specified, state.amount_calculated)
        } else {
            (state.amount_calculated, amount_specified)
        };

        debug!(
            exact_input,
            swap_for_y,
            %amount_in,
            %amount_out,
            fee = %state.fee_amount,
            bins_visited = state.bins_visited,
            end_bin_id = state.active_id,
            "simulated swap"
        );

        Ok(SwapResult {
            amount_in,
            amount_out,
            fee_amount: state.fee_amount,
            protocol_fee_amount: state.protocol_fee_amount,
            bins_visited: state.bins_visited,
            end_bin_id: state.active_id,
        })
    }

    /// Returns the output liquidity reachable from the active bin in the
    /// given direction, bounded by the loaded window and by
    /// [`MAX_BIN_CROSSINGS`].
    ///
    /// Useful as an upper bound before searching for an optimal trade size.
    pub fn max_amount_out(&self, swap_for_y: bool) -> U256 {
        let mut total = U256::ZERO;
        let mut bin_id = self.pair.active_id;

        for _ in 0..MAX_BIN_CROSSINGS {
            let Ok(bin) = self.bins.get_bin(bin_id) else {
                break;
            };
            total += U256::from(bin.reserve_out(swap_for_y));

            match next_bin_id(bin_id, swap_for_y) {
                Ok(next) => bin_id = next,
                Err(_) => break,
            }
        }
        total
    }
}

/// Bin the swap moves to once the current one is exhausted: down when
/// selling X for Y, up otherwise.
#[inline]
fn next_bin_id(bin_id: i32, swap_for_y: bool) -> Result<i32, StateError> {
    let next = if swap_for_y {
        bin_id.checked_sub(1)
    } else {
        bin_id.checked_add(1)
    };
    next.ok_or(StateError::BinNotFound(bin_id))
}

//! Property-based tests for the swap simulator and quoting.
//!
//! 1. **Monotonicity**: a larger exact input never yields less output.
//! 2. **Exact-out consistency**: the input quoted for an exact output buys at
//!    least that output when swapped as an exact input.
//! 3. **Slippage bounds**: `min_amount_out <= amount_out` and
//!    `max_amount_in >= amount_in`.
//! 4. **Fee positivity**: a non-zero base factor always charges a fee.
//! 5. **Price round-trip**: `id_from_price(price_from_id(id)) == id`.

use proptest::prelude::*;

use crate::ACTIVE_ID;
use crate::math::bin_math::{bin_array_window, position};
use crate::math::fee_math::get_total_fee;
use crate::math::price_math::{id_from_price, price_from_id};
use crate::pool::bin_array::{Bin, BinArray, BinArrayRange};
use crate::pool::pair::{DynamicFeeParameters, PairState, StaticFeeParameters};
use crate::pool::quote::{QuoteParams, get_quote, max_amount_in, min_amount_out};
use crate::pool::swap::SwapSimulator;
use alloy_primitives::U256;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const LADDER_HALF_WIDTH: i32 = 8;

fn make_pair(bin_step: u16, base_factor: u16, variable_fee_control: u32) -> PairState {
    PairState::new(
        bin_step,
        ACTIVE_ID,
        StaticFeeParameters {
            base_factor,
            protocol_share: 1000,
            variable_fee_control,
            reduction_factor: 5000,
            max_volatility_accumulator: 100_000,
            filter_period: 30,
            decay_period: 600,
        },
        DynamicFeeParameters {
            id_reference: ACTIVE_ID,
            ..Default::default()
        },
    )
}

/// Lays `reserves` out symmetrically around the active bin: Y below it, X
/// above it, both in the active bin itself.
fn make_ladder(reserves: &[u64]) -> Vec<BinArray> {
    let mut arrays: Vec<BinArray> = bin_array_window(ACTIVE_ID)
        .into_iter()
        .map(BinArray::empty)
        .collect();
    let first = arrays[0].index;

    for (i, reserve) in reserves.iter().enumerate() {
        let delta = i as i32 - LADDER_HALF_WIDTH;
        let bin_id = ACTIVE_ID + delta;
        let bin = match delta {
            d if d < 0 => Bin::new(0, *reserve, u128::from(*reserve)),
            d if d > 0 => Bin::new(*reserve, 0, u128::from(*reserve)),
            _ => Bin::new(*reserve / 2, *reserve / 2, u128::from(*reserve)),
        };
        let (index, offset) = position(bin_id);
        arrays[(index - first) as usize].bins[offset] = bin;
    }
    arrays
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn bin_step_strategy() -> impl Strategy<Value = u16> {
    1u16..=100
}

fn reserves_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..=1_000_000_000, (2 * LADDER_HALF_WIDTH + 1) as usize)
}

fn amount_strategy() -> impl Strategy<Value = u64> {
    1u64..=5_000_000_000
}

fn slippage_strategy() -> impl Strategy<Value = f64> {
    0.0f64..99.0
}

// ---------------------------------------------------------------------------
// Simulation properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_exact_in_output_is_monotonic(
        bin_step in bin_step_strategy(),
        base_factor in 0u16..=20_000,
        vfc in 0u32..=10_000,
        reserves in reserves_strategy(),
        a in amount_strategy(),
        b in amount_strategy(),
        swap_for_y in any::<bool>(),
    ) {
        let pair = make_pair(bin_step, base_factor, vfc);
        let arrays = make_ladder(&reserves);
        let Ok(range) = BinArrayRange::new(&arrays) else {
            panic!("valid window");
        };
        let simulator = SwapSimulator::new(&pair, range, None);

        let (small, large) = (a.min(b), a.max(b));
        let Ok(large_result) = simulator.simulate_exact_in(U256::from(large), swap_for_y) else {
            return Ok(());
        };
        let Ok(small_result) = simulator.simulate_exact_in(U256::from(small), swap_for_y) else {
            return Ok(());
        };

        prop_assert!(
            small_result.amount_out <= large_result.amount_out,
            "out({}) = {} > out({}) = {}",
            small, small_result.amount_out, large, large_result.amount_out
        );
    }

    #[test]
    fn prop_exact_out_input_buys_requested_output(
        bin_step in bin_step_strategy(),
        base_factor in 0u16..=20_000,
        vfc in 0u32..=10_000,
        reserves in reserves_strategy(),
        amount_out in 1u64..=2_000_000_000,
        swap_for_y in any::<bool>(),
    ) {
        let pair = make_pair(bin_step, base_factor, vfc);
        let arrays = make_ladder(&reserves);
        let Ok(range) = BinArrayRange::new(&arrays) else {
            panic!("valid window");
        };
        let simulator = SwapSimulator::new(&pair, range, None);

        let Ok(exact_out) = simulator.simulate_exact_out(U256::from(amount_out), swap_for_y) else {
            return Ok(());
        };
        let Ok(exact_in) = simulator.simulate_exact_in(exact_out.amount_in, swap_for_y) else {
            return Ok(());
        };

        prop_assert!(
            exact_in.amount_out >= exact_out.amount_out,
            "paying {} bought {} < {}",
            exact_out.amount_in, exact_in.amount_out, exact_out.amount_out
        );
    }

    #[test]
    fn prop_quote_respects_slippage_bounds(
        bin_step in bin_step_strategy(),
        base_factor in 0u16..=20_000,
        reserves in reserves_strategy(),
        amount in amount_strategy(),
        slippage in slippage_strategy(),
        swap_for_y in any::<bool>(),
        is_exact_input in any::<bool>(),
    ) {
        let pair = make_pair(bin_step, base_factor, 0);
        let arrays = make_ladder(&reserves);
        let Ok(range) = BinArrayRange::new(&arrays) else {
            panic!("valid window");
        };

        let params = QuoteParams::new(U256::from(amount), swap_for_y, is_exact_input, slippage);
        let Ok(quote) = get_quote(&pair, range, params, None) else {
            return Ok(());
        };

        if is_exact_input {
            prop_assert_eq!(quote.amount, quote.amount_in);
            prop_assert!(quote.other_amount_offset <= quote.amount_out);
        } else {
            prop_assert_eq!(quote.amount, quote.amount_out);
            prop_assert!(quote.other_amount_offset >= quote.amount_in);
        }
        prop_assert!(quote.price_impact_percent <= 0.0 || quote.amount_out.is_zero());
    }
}

// ---------------------------------------------------------------------------
// Pure math properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_slippage_helpers_bound_amounts(
        amount in any::<u64>(),
        slippage in slippage_strategy(),
    ) {
        let amount = U256::from(amount);
        let Ok(min_out) = min_amount_out(amount, slippage) else {
            panic!("slippage within range");
        };
        let Ok(max_in) = max_amount_in(amount, slippage) else {
            panic!("slippage within range");
        };

        prop_assert!(min_out <= amount);
        prop_assert!(max_in >= amount);
    }

    #[test]
    fn prop_base_factor_always_charges(
        bin_step in bin_step_strategy(),
        base_factor in 1u16..=u16::MAX,
        vfc in any::<u32>(),
    ) {
        let Ok(fee) = get_total_fee(bin_step, base_factor, 0, vfc) else {
            panic!("zero accumulator cannot overflow");
        };
        prop_assert!(fee > 0);
    }

    #[test]
    fn prop_price_id_round_trip(
        step_idx in 0usize..4,
        delta in -2_000i32..=2_000,
        decimals in 0u8..=12,
    ) {
        let bin_step = [1u16, 10, 25, 100][step_idx];
        let bin_id = ACTIVE_ID + delta;

        let Ok(price) = price_from_id(bin_step, bin_id, decimals, decimals) else {
            panic!("valid bin step");
        };
        let Ok(round_trip) = id_from_price(price, bin_step, decimals, decimals) else {
            panic!("finite positive price");
        };

        prop_assert_eq!(round_trip, bin_id);
    }
}

#![allow(dead_code)]

use criterion::Criterion;
use dlmm_swap_math::math::bin_math::{bin_array_window, position};
use dlmm_swap_math::math::fee_math::{get_fee_amount, get_fee_for_amount, get_total_fee};
use dlmm_swap_math::math::math_helpers::{Rounding, mul_div, mul_shift_right, shift_left_div};
use dlmm_swap_math::math::price_math::{get_price_from_id, id_from_price, price_from_id};
use dlmm_swap_math::{
    ACTIVE_ID, Bin, BinArray, BinArrayRange, DynamicFeeParameters, PairState, QuoteParams, SCALE,
    StaticFeeParameters, SwapSimulator, U256, get_quote,
};
use std::hint::black_box;

pub fn bench_price_math(c: &mut Criterion) {
    c.bench_function("get_price_from_id near", |b| {
        b.iter(|| get_price_from_id(black_box(25), black_box(ACTIVE_ID + 17)))
    });
    c.bench_function("get_price_from_id far", |b| {
        b.iter(|| get_price_from_id(black_box(25), black_box(ACTIVE_ID - 40_000)))
    });
    c.bench_function("price_from_id", |b| {
        b.iter(|| price_from_id(black_box(25), black_box(ACTIVE_ID + 1_234), 9, 6))
    });
    c.bench_function("id_from_price", |b| {
        b.iter(|| id_from_price(black_box(183.42), black_box(25), 9, 6))
    });
}

pub fn bench_fee_math(c: &mut Criterion) {
    c.bench_function("get_total_fee", |b| {
        b.iter(|| get_total_fee(black_box(25), black_box(10_000), black_box(120_000), 7500))
    });

    let amount = U256::from(1_234_567_890u64);
    c.bench_function("get_fee_amount", |b| {
        b.iter(|| get_fee_amount(black_box(amount), black_box(2_500_000)))
    });
    c.bench_function("get_fee_for_amount", |b| {
        b.iter(|| get_fee_for_amount(black_box(amount), black_box(2_500_000)))
    });
}

pub fn bench_math_helpers(c: &mut Criterion) {
    let x = U256::from(u128::MAX);
    let y = SCALE + U256::from(12_345u64);
    let den = U256::from(1_000_000_007u64);

    c.bench_function("mul_div", |b| {
        b.iter(|| mul_div(black_box(x), black_box(y), black_box(den), Rounding::Up))
    });
    c.bench_function("mul_shift_right", |b| {
        b.iter(|| mul_shift_right(black_box(x), black_box(y), 64, Rounding::Down))
    });
    c.bench_function("shift_left_div", |b| {
        b.iter(|| shift_left_div(black_box(x), black_box(y), 64, Rounding::Up))
    });
}

pub fn sample_pair() -> PairState {
    PairState::new(
        25,
        ACTIVE_ID,
        StaticFeeParameters {
            base_factor: 10_000,
            protocol_share: 2000,
            variable_fee_control: 7500,
            reduction_factor: 5000,
            max_volatility_accumulator: 150_000,
            filter_period: 30,
            decay_period: 600,
        },
        DynamicFeeParameters {
            volatility_accumulator: 20_000,
            volatility_reference: 10_000,
            id_reference: ACTIVE_ID + 1,
            time_last_updated: 1_700_000_000,
        },
    )
}

/// Three arrays with 1e9 units of liquidity in every bin around the active one.
pub fn sample_window() -> Vec<BinArray> {
    let mut arrays: Vec<BinArray> = bin_array_window(ACTIVE_ID)
        .into_iter()
        .map(BinArray::empty)
        .collect();
    let first = arrays[0].index;

    for delta in -40i32..=40 {
        let bin = match delta {
            d if d < 0 => Bin::new(0, 1_000_000_000, 1_000_000_000),
            d if d > 0 => Bin::new(1_000_000_000, 0, 1_000_000_000),
            _ => Bin::new(500_000_000, 500_000_000, 1_000_000_000),
        };
        let (index, offset) = position(ACTIVE_ID + delta);
        arrays[(index - first) as usize].bins[offset] = bin;
    }
    arrays
}

pub fn bench_swap(c: &mut Criterion) {
    let pair = sample_pair();
    let arrays = sample_window();
    let Ok(range) = BinArrayRange::new(&arrays) else {
        panic!("valid window");
    };
    let simulator = SwapSimulator::new(&pair, range, Some(1_700_000_010));

    c.bench_function("simulate_exact_in single bin", |b| {
        b.iter(|| simulator.simulate_exact_in(black_box(U256::from(1_000_000u64)), true))
    });
    c.bench_function("simulate_exact_in 20 bins", |b| {
        b.iter(|| simulator.simulate_exact_in(black_box(U256::from(20_000_000_000u64)), true))
    });
    c.bench_function("simulate_exact_out 20 bins", |b| {
        b.iter(|| simulator.simulate_exact_out(black_box(U256::from(19_000_000_000u64)), false))
    });
}

pub fn bench_quote(c: &mut Criterion) {
    let pair = sample_pair();
    let arrays = sample_window();
    let Ok(range) = BinArrayRange::new(&arrays) else {
        panic!("valid window");
    };
    let params = QuoteParams::exact_in(U256::from(5_000_000_000u64), true, 0.5);

    c.bench_function("get_quote 5 bins", |b| {
        b.iter(|| get_quote(&pair, range, black_box(params), Some(1_700_000_010)))
    });
}

//! Discretized‑liquidity (bin based) AMM math, swap simulation and quoting
//! in pure Rust.
//!
//! This crate exposes:
//! - Low‑level math primitives (`math::*`) for Q64.64 prices, fees and bin
//!   addressing.
//! - A bin‑walking [`SwapSimulator`] running against an immutable pool snapshot,
//!   with the pool's volatility‑driven dynamic fee.
//! - [`get_quote`], which adds slippage bounds and price impact on top of a
//!   simulation, and [`fetch_quote`], which loads the snapshot through a
//!   [`SnapshotSource`] first.
//!
//! # Examples
//!
//! ## Pure math
//! ```
//! use dlmm_swap_math::{math::price_math::get_price_from_id, ACTIVE_ID, SCALE};
//!
//! // The centre bin always trades at 1.0.
//! assert_eq!(get_price_from_id(25, ACTIVE_ID).unwrap(), SCALE);
//! assert!(get_price_from_id(25, ACTIVE_ID + 1).unwrap() > SCALE);
//! ```
//!
//! ## Quoting against an in‑memory snapshot
//! ```
//! use dlmm_swap_math::{
//!     get_quote, math::bin_math::position, Bin, BinArray, BinArrayRange,
//!     DynamicFeeParameters, PairState, QuoteParams, StaticFeeParameters, ACTIVE_ID, U256,
//! };
//!
//! let pair = PairState::new(
//!     100,
//!     ACTIVE_ID,
//!     StaticFeeParameters {
//!         base_factor: 5000,
//!         protocol_share: 2000,
//!         variable_fee_control: 0,
//!         reduction_factor: 5000,
//!         max_volatility_accumulator: 350_000,
//!         filter_period: 30,
//!         decay_period: 600,
//!     },
//!     DynamicFeeParameters { id_reference: ACTIVE_ID, ..Default::default() },
//! );
//!
//! let (index, offset) = position(ACTIVE_ID);
//! let mut array = BinArray::empty(index);
//! array.bins[offset] = Bin::new(0, 10_000_000, 10_000_000);
//! let arrays = [array];
//!
//! let range = BinArrayRange::new(&arrays).unwrap();
//! let params = QuoteParams::exact_in(U256::from(1_000_000u64), true, 0.5); // 0.5% slippage
//! let quote = get_quote(&pair, range, params, None).unwrap();
//!
//! assert_eq!(quote.amount_out, U256::from(995_000u64));
//! println!("min out: {}, impact: {}%", quote.other_amount_offset, quote.price_impact_percent);
//! ```

pub use alloy_primitives::{B256, U256};

pub mod error;
mod hash;
pub mod math;

pub use hash::FastMap;

pub mod pool;

pub use pool::bin_array::{Bin, BinArray, BinArrayRange};
pub use pool::pair::{DynamicFeeParameters, PairAddress, PairState, StaticFeeParameters};
pub use pool::quote::{Quote, QuoteParams, get_quote};
pub use pool::source::{MemorySource, SnapshotSource, fetch_quote};
pub use pool::swap::{SwapResult, SwapSimulator};
pub use pool::volatility::VolatilityTracker;

/// Bin id whose price is exactly 1.0.
pub const ACTIVE_ID: i32 = 1 << 23;
/// Bins stored per bin array.
pub const BIN_ARRAY_SIZE: usize = 256;
/// Most bins a single swap may touch.
pub const MAX_BIN_CROSSINGS: u32 = 30;
/// Denominator of fee rates: `1e9` is 100%.
pub const PRECISION: u128 = 1_000_000_000;
pub const BASIS_POINT_MAX: u32 = 10_000;
pub const VARIABLE_FEE_PRECISION: u128 = 100_000_000_000;

pub const SCALE_OFFSET: usize = 64;
/// 1.0 in Q64.64.
pub const SCALE: U256 = U256::from_limbs([0, 1, 0, 0]);

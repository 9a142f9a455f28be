use crate::BASIS_POINT_MAX;
use crate::error::MathError;
use crate::math::fee_math::get_total_fee;
use crate::pool::pair::{PairState, StaticFeeParameters};

/// Per‑simulation copy of a pair's volatility state.
///
/// Seeded from [`PairState::dynamic_fee_parameters`] and mutated only while
/// a single swap is being simulated. It is a plain value, so concurrent
/// quotes never observe each other's updates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VolatilityTracker {
    pub volatility_accumulator: u32,
    pub volatility_reference: u32,
    pub id_reference: i32,
    pub time_last_updated: u64,
    params: StaticFeeParameters,
}

impl VolatilityTracker {
    pub fn new(pair: &PairState) -> Self {
        let dynamic = pair.dynamic_fee_parameters;
        Self {
            volatility_accumulator: dynamic.volatility_accumulator,
            volatility_reference: dynamic.volatility_reference,
            id_reference: dynamic.id_reference,
            time_last_updated: dynamic.time_last_updated,
            params: pair.static_fee_parameters,
        }
    }

    /// Moves the reference bin and decays the reference volatility according
    /// to the time elapsed since the last update.
    ///
    /// Past the filter period the reference id snaps to `active_id`; past the
    /// decay period the reference volatility resets to zero, otherwise it is
    /// the accumulator scaled by the reduction factor.
    pub fn update_references(&mut self, active_id: i32, now: u64) {
        let elapsed = now.saturating_sub(self.time_last_updated);

        if elapsed > u64::from(self.params.filter_period) {
            self.id_reference = active_id;

            self.volatility_reference = if elapsed >= u64::from(self.params.decay_period) {
                0
            } else {
                let reduced = u64::from(self.volatility_accumulator)
                    * u64::from(self.params.reduction_factor)
                    / u64::from(BASIS_POINT_MAX);
                u32::try_from(reduced).unwrap_or(u32::MAX)
            };
        }

        self.time_last_updated = now;
    }

    /// Recomputes the accumulator for the bin currently being swapped in.
    pub fn update_volatility_accumulator(&mut self, active_id: i32) {
        let delta_id = (i64::from(active_id) - i64::from(self.id_reference)).unsigned_abs();

        let accumulator = u128::from(delta_id) * u128::from(BASIS_POINT_MAX)
            + u128::from(self.volatility_reference);

        self.volatility_accumulator =
            accumulator.min(u128::from(self.params.max_volatility_accumulator)) as u32;
    }

    /// Total fee rate for the current accumulator value.
    pub fn total_fee(&self, bin_step: u16) -> Result<u128, MathError> {
        get_total_fee(
            bin_step,
            self.params.base_factor,
            self.volatility_accumulator,
            self.params.variable_fee_control,
        )
    }
}

use crate::BASIS_POINT_MAX;
use crate::error::{Error, MathError};
use crate::math::fee_math::get_total_fee;
use alloy_primitives::B256;

/// Address of a pair account. Opaque to the simulator; only the snapshot
/// source interprets it.
pub type PairAddress = B256;

/// Fee parameters fixed by the pool operator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StaticFeeParameters {
    pub base_factor: u16,
    /// Protocol share of every fee, in basis points.
    pub protocol_share: u16,
    pub variable_fee_control: u32,
    /// Reduction applied to the accumulator when it becomes the new reference, in basis points.
    pub reduction_factor: u16,
    pub max_volatility_accumulator: u32,
    /// Seconds of inactivity before the reference bin is moved.
    pub filter_period: u16,
    /// Seconds of inactivity after which volatility is forgotten entirely.
    pub decay_period: u16,
}

/// Volatility state as last persisted by the pool.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DynamicFeeParameters {
    pub volatility_accumulator: u32,
    pub volatility_reference: u32,
    pub id_reference: i32,
    pub time_last_updated: u64,
}

/// Read‑only snapshot of a pair's pricing and fee configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PairState {
    pub bin_step: u16,
    pub active_id: i32,
    pub static_fee_parameters: StaticFeeParameters,
    pub dynamic_fee_parameters: DynamicFeeParameters,
}

impl PairState {
    /// Creates a pair snapshot from its parts.
    pub fn new(
        bin_step: u16,
        active_id: i32,
        static_fee_parameters: StaticFeeParameters,
        dynamic_fee_parameters: DynamicFeeParameters,
    ) -> Self {
        Self {
            bin_step,
            active_id,
            static_fee_parameters,
            dynamic_fee_parameters,
        }
    }

    /// Checks that every basis‑point parameter is within `[0, 10_000]`.
    pub fn validate(&self) -> Result<(), Error> {
        let bps = |value: u16| u32::from(value) <= BASIS_POINT_MAX;

        if !bps(self.bin_step) {
            return Err(Error::InvalidParameter("bin step exceeds 10000 basis points"));
        }
        if !bps(self.static_fee_parameters.reduction_factor) {
            return Err(Error::InvalidParameter(
                "reduction factor exceeds 10000 basis points",
            ));
        }
        if !bps(self.static_fee_parameters.protocol_share) {
            return Err(Error::InvalidParameter(
                "protocol share exceeds 10000 basis points",
            ));
        }
        Ok(())
    }

    /// Total fee rate implied by the persisted accumulator, without any
    /// time‑based update.
    pub fn current_total_fee(&self) -> Result<u128, MathError> {
        get_total_fee(
            self.bin_step,
            self.static_fee_parameters.base_factor,
            self.dynamic_fee_parameters.volatility_accumulator,
            self.static_fee_parameters.variable_fee_control,
        )
    }
}

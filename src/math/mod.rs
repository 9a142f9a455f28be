pub mod bin_math;
pub mod fee_math;
pub mod math_helpers;
pub mod price_math;

pub mod bin_array;
pub mod pair;
pub mod quote;
pub mod source;
pub mod swap;
pub mod volatility;

#[cfg(test)]
mod proptest_properties;

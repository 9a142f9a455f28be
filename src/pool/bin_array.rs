use crate::BIN_ARRAY_SIZE;
use crate::error::StateError;
use crate::math::bin_math::position;

/// Reserves held at one discrete price point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Bin {
    pub reserve_x: u64,
    pub reserve_y: u64,
    pub total_supply: u128,
}

impl Bin {
    pub fn new(reserve_x: u64, reserve_y: u64, total_supply: u128) -> Self {
        Self {
            reserve_x,
            reserve_y,
            total_supply,
        }
    }

    /// Reserve paid out by the bin for the given direction.
    #[inline]
    pub fn reserve_out(&self, swap_for_y: bool) -> u64 {
        if swap_for_y {
            self.reserve_y
        } else {
            self.reserve_x
        }
    }
}

/// A snapshot of [`BIN_ARRAY_SIZE`] consecutive bins, addressed by
/// `index = floor(bin_id / 256)`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinArray {
    pub index: i32,
    pub bins: Vec<Bin>,
}

impl BinArray {
    pub fn new(index: i32, bins: Vec<Bin>) -> Result<Self, StateError> {
        if bins.len() != BIN_ARRAY_SIZE {
            return Err(StateError::InvalidBinArrayLength {
                index,
                len: bins.len(),
            });
        }
        Ok(Self { index, bins })
    }

    /// An array with no liquidity, standing in for one that has never been
    /// initialised on chain.
    pub fn empty(index: i32) -> Self {
        Self {
            index,
            bins: vec![Bin::default(); BIN_ARRAY_SIZE],
        }
    }
}

/// Read‑only window over one to three contiguous [`BinArray`] snapshots.
///
/// Lookups are O(1): the array is found from the id's array index relative
/// to the first loaded array.
#[derive(Clone, Copy, Debug)]
pub struct BinArrayRange<'a> {
    arrays: &'a [BinArray],
}

impl<'a> BinArrayRange<'a> {
    /// Validates that `arrays` holds 1–3 full arrays whose indices increase
    /// by exactly one.
    pub fn new(arrays: &'a [BinArray]) -> Result<Self, StateError> {
        if arrays.is_empty() || arrays.len() > 3 {
            return Err(StateError::InvalidBinArrayCount(arrays.len()));
        }

        for array in arrays {
            if array.bins.len() != BIN_ARRAY_SIZE {
                return Err(StateError::InvalidBinArrayLength {
                    index: array.index,
                    len: array.bins.len(),
                });
            }
        }

        for pair in arrays.windows(2) {
            let expected = pair[0].index + 1;
            if pair[1].index != expected {
                return Err(StateError::BinArrayIndexMismatch {
                    expected,
                    found: pair[1].index,
                });
            }
        }

        Ok(Self { arrays })
    }

    pub fn get_bin(&self, bin_id: i32) -> Result<&'a Bin, StateError> {
        let (array_index, offset) = position(bin_id);
        let first = self.arrays[0].index;

        let slot = i64::from(array_index) - i64::from(first);
        if slot < 0 || slot >= self.arrays.len() as i64 {
            return Err(StateError::BinNotFound(bin_id));
        }

        Ok(&self.arrays[slot as usize].bins[offset])
    }

    /// Whether `bin_id` falls inside the loaded window.
    pub fn contains(&self, bin_id: i32) -> bool {
        self.get_bin(bin_id).is_ok()
    }

    /// Every loaded bin, in ascending id order.
    pub fn get_all_bins(&self) -> impl Iterator<Item = &'a Bin> + 'a {
        self.arrays.iter().flat_map(|array| array.bins.iter())
    }

    /// Sum of `total_supply` over the whole window.
    pub fn total_supply(&self) -> u128 {
        self.get_all_bins()
            .fold(0u128, |acc, bin| acc.saturating_add(bin.total_supply))
    }
}

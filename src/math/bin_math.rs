use crate::BIN_ARRAY_SIZE;

/// Computes the bin array index and the offset inside that array for a bin id.
///
/// Uses Euclidean division so negative ids land in the array below zero
/// instead of truncating toward it.
#[inline]
pub fn position(bin_id: i32) -> (i32, usize) {
    (
        bin_id.div_euclid(BIN_ARRAY_SIZE as i32),
        bin_id.rem_euclid(BIN_ARRAY_SIZE as i32) as usize,
    )
}

/// Returns `floor(bin_id / 256)`, the index of the array that stores `bin_id`.
#[inline]
pub fn bin_array_index(bin_id: i32) -> i32 {
    position(bin_id).0
}

/// Returns the contiguous bin array indices to load before quoting around
/// `active_id`: the active array and one neighbour on each side.
///
/// A swap can cross at most [`MAX_BIN_CROSSINGS`](crate::MAX_BIN_CROSSINGS)
/// bins, which is always covered by one neighbouring array.
pub fn bin_array_window(active_id: i32) -> [i32; 3] {
    let index = bin_array_index(active_id);
    [index - 1, index, index + 1]
}

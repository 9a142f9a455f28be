use crate::FastMap;
use crate::error::{Error, SourceError};
use crate::math::bin_math::bin_array_window;
use crate::pool::bin_array::{BinArray, BinArrayRange};
use crate::pool::pair::{PairAddress, PairState};
use crate::pool::quote::{Quote, QuoteParams, get_quote};
use futures::try_join;
use std::future::Future;
use tracing::{debug, warn};

/// Read access to pool snapshots and block time.
///
/// Implementations wrap an RPC client, an indexer or a fixture. All reads for
/// one quote happen before simulation starts, so a source never observes the
/// simulator.
pub trait SnapshotSource {
    fn fetch_pair_state(
        &self,
        pair: &PairAddress,
    ) -> impl Future<Output = Result<PairState, SourceError>> + Send;

    /// Returns the requested arrays that exist. Arrays that were never
    /// initialised are simply left out.
    fn fetch_bin_arrays(
        &self,
        pair: &PairAddress,
        indices: &[i32],
    ) -> impl Future<Output = Result<Vec<BinArray>, SourceError>> + Send;

    /// Resolves the block timestamp at `at`, or the latest one when `at` is
    /// `None`. `Ok(None)` means no timestamp is available.
    fn time_oracle(
        &self,
        at: Option<u64>,
    ) -> impl Future<Output = Result<Option<u64>, SourceError>> + Send;
}

/// Fetches the pair, the three bin arrays around its active bin and the block
/// time, then quotes against that snapshot.
pub async fn fetch_quote<S>(
    source: &S,
    pair: &PairAddress,
    params: QuoteParams,
    at: Option<u64>,
) -> Result<Quote, Error>
where
    S: SnapshotSource + ?Sized,
{
    let pair_state = source.fetch_pair_state(pair).await?;
    let window = bin_array_window(pair_state.active_id);

    let (fetched, now) = try_join!(
        source.fetch_bin_arrays(pair, &window),
        source.time_oracle(at)
    )?;

    debug!(
        %pair,
        active_id = pair_state.active_id,
        fetched = fetched.len(),
        ?now,
        "loaded pool snapshot"
    );

    if now.is_none() {
        warn!(%pair, "no block timestamp available, volatility references left as persisted");
    }

    let arrays = fill_window(&window, fetched);
    let range = BinArrayRange::new(&arrays)?;

    get_quote(&pair_state, range, params, now)
}

/// Orders `fetched` along `window`, substituting empty arrays for the
/// indices the source did not return.
fn fill_window(window: &[i32], fetched: Vec<BinArray>) -> Vec<BinArray> {
    let mut by_index: FastMap<i32, BinArray> = FastMap::default();
    by_index.reserve(fetched.len());

    for array in fetched {
        if window.contains(&array.index) {
            by_index.insert(array.index, array);
        }
    }

    window
        .iter()
        .map(|&index| {
            by_index
                .remove(&index)
                .unwrap_or_else(|| BinArray::empty(index))
        })
        .collect()
}

/// Snapshot source backed by in‑memory maps, for fixtures and replays.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    pairs: FastMap<PairAddress, PairState>,
    bin_arrays: FastMap<(PairAddress, i32), BinArray>,
    latest_timestamp: Option<u64>,
}

impl MemorySource {
    pub fn new(latest_timestamp: Option<u64>) -> Self {
        Self {
            latest_timestamp,
            ..Default::default()
        }
    }

    pub fn insert_pair(&mut self, address: PairAddress, state: PairState) {
        self.pairs.insert(address, state);
    }

    pub fn insert_bin_array(&mut self, address: PairAddress, array: BinArray) {
        self.bin_arrays.insert((address, array.index), array);
    }
}

impl SnapshotSource for MemorySource {
    async fn fetch_pair_state(&self, pair: &PairAddress) -> Result<PairState, SourceError> {
        self.pairs
            .get(pair)
            .copied()
            .ok_or_else(|| SourceError::NotFound(format!("pair {pair}")))
    }

    async fn fetch_bin_arrays(
        &self,
        pair: &PairAddress,
        indices: &[i32],
    ) -> Result<Vec<BinArray>, SourceError> {
        Ok(indices
            .iter()
            .filter_map(|index| self.bin_arrays.get(&(*pair, *index)).cloned())
            .collect())
    }

    async fn time_oracle(&self, at: Option<u64>) -> Result<Option<u64>, SourceError> {
        Ok(at.or(self.latest_timestamp))
    }
}

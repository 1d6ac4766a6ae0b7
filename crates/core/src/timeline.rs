//! Detection-density timeline binning.
//!
//! A frame falls in bin `floor(floor(frame / fps) / bin_secs)`. Timelines
//! are dense: index `i` is bin `i`, from 0 to the last occupied bin.

use crate::detection::FrameRate;
use crate::error::CoreError;

/// Smallest accepted bin width in seconds.
pub const MIN_BIN_SECS: u64 = 1;

/// Largest accepted bin width in seconds.
pub const MAX_BIN_SECS: u64 = 60;

/// Bin width used when the caller does not pass one.
pub const DEFAULT_BIN_SECS: u64 = 1;

/// Longest timeline that will be materialized. A 1-second timeline of this
/// length covers about twelve days of video.
pub const MAX_TIMELINE_BINS: u64 = 1 << 20;

/// Bin index of `frame`. A `bin_secs` of zero is treated as one.
pub fn bin_of(frame: u64, bin_secs: u64, fps: FrameRate) -> u64 {
    fps.seconds_of(frame) / bin_secs.max(MIN_BIN_SECS)
}

/// Expand sparse `(bin, count)` pairs into a dense count vector.
///
/// Bins may arrive in any order and repeat; repeated bins are summed. No
/// input yields an empty vector, never a single zero. Fails with
/// [`CoreError::Validation`] when a bin lies at or past [`MAX_TIMELINE_BINS`].
pub fn dense_fill<I>(sparse: I) -> Result<Vec<u64>, CoreError>
where
    I: IntoIterator<Item = (u64, u64)>,
{
    let mut counts: Vec<u64> = Vec::new();
    for (bin, count) in sparse {
        let idx = usize::try_from(bin)
            .ok()
            .filter(|_| bin < MAX_TIMELINE_BINS)
            .ok_or_else(|| too_long(bin))?;
        if idx >= counts.len() {
            counts.resize(idx + 1, 0);
        }
        counts[idx] += count;
    }
    Ok(counts)
}

fn too_long(bin: u64) -> CoreError {
    CoreError::Validation(format!(
        "timeline would need {} bins, more than the limit of {MAX_TIMELINE_BINS}; use a larger bin_sec",
        u128::from(bin) + 1
    ))
}

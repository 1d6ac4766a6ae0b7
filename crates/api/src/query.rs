//! Query parameter types for the detection endpoints.
//!
//! Frames are taken as signed integers so negative values are reported as
//! validation errors rather than generic parse failures.

use serde::Deserialize;

/// `?frame=` for single-frame and hit-navigation queries.
#[derive(Debug, Deserialize)]
pub struct FrameParams {
    pub frame: i64,
}

/// `?start_frame=&end_frame=` for range queries.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start_frame: i64,
    pub end_frame: i64,
}

/// `?bin_sec=` for the timeline; defaults when absent.
#[derive(Debug, Deserialize)]
pub struct TimelineParams {
    pub bin_sec: Option<i64>,
}

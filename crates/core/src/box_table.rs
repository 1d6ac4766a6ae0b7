//! Frame-indexed detection table for a single video.
//!
//! Rows are sorted once by `(frame, box_index)` at construction; every query
//! afterwards is a binary search over that order, so point and range lookups
//! cost `O(log n + k)` and hit navigation costs `O(log n)`. The table has no
//! mutation API and can be shared freely behind an `Arc`.

use serde::Serialize;

use crate::detection::{Detection, FrameRate};
use crate::error::CoreError;
use crate::timeline;

/// Immutable, frame-sorted detections of one video.
#[derive(Debug, Clone, Default)]
pub struct BoxTable {
    rows: Vec<Detection>,
}

/// Row and frame counts of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub rows: usize,
    pub frames: usize,
    pub first_frame: Option<u64>,
    pub last_frame: Option<u64>,
}

impl BoxTable {
    /// Build a table from rows in any order.
    pub fn new(mut rows: Vec<Detection>) -> Self {
        rows.sort_by_key(|d| (d.frame, d.box_index));
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in `(frame, box_index)` order.
    pub fn rows(&self) -> &[Detection] {
        &self.rows
    }

    /// Index of the first row with `row.frame >= frame`.
    fn lower_bound(&self, frame: u64) -> usize {
        self.rows.partition_point(|d| d.frame < frame)
    }

    /// Index of the first row with `row.frame > frame`.
    fn upper_bound(&self, frame: u64) -> usize {
        self.rows.partition_point(|d| d.frame <= frame)
    }

    /// Detections at exactly `frame`, ordered by `box_index`. Empty when the
    /// frame has no detections.
    pub fn point_query(&self, frame: u64) -> &[Detection] {
        &self.rows[self.lower_bound(frame)..self.upper_bound(frame)]
    }

    /// Detections with `start <= frame <= end`, ordered by
    /// `(frame, box_index)`. An inverted range is empty, not an error.
    pub fn range_query(&self, start: u64, end: u64) -> &[Detection] {
        if start > end {
            return &[];
        }
        &self.rows[self.lower_bound(start)..self.upper_bound(end)]
    }

    /// Dense per-bin detection counts from bin 0 to the last occupied bin.
    ///
    /// An empty table yields an empty timeline. A table whose last bin is
    /// past [`timeline::MAX_TIMELINE_BINS`] fails with
    /// [`CoreError::Validation`] instead of allocating.
    pub fn timeline_bins(&self, bin_secs: u64, fps: FrameRate) -> Result<Vec<u64>, CoreError> {
        // Rows are frame-sorted, so equal bins are adjacent: fold runs into
        // one (bin, count) pair each before filling.
        let mut sparse: Vec<(u64, u64)> = Vec::new();
        for d in &self.rows {
            let bin = timeline::bin_of(d.frame, bin_secs, fps);
            match sparse.last_mut() {
                Some((last, count)) if *last == bin => *count += 1,
                _ => sparse.push((bin, 1)),
            }
        }
        timeline::dense_fill(sparse)
    }

    /// Smallest occupied frame strictly after `frame`.
    pub fn next_hit(&self, frame: u64) -> Option<u64> {
        self.rows.get(self.upper_bound(frame)).map(|d| d.frame)
    }

    /// Largest occupied frame strictly before `frame`.
    pub fn prev_hit(&self, frame: u64) -> Option<u64> {
        self.lower_bound(frame)
            .checked_sub(1)
            .map(|idx| self.rows[idx].frame)
    }

    /// Number of distinct frames with at least one detection.
    pub fn frame_count(&self) -> usize {
        let mut frames = 0;
        let mut last = None;
        for d in &self.rows {
            if last != Some(d.frame) {
                frames += 1;
                last = Some(d.frame);
            }
        }
        frames
    }

    pub fn first_frame(&self) -> Option<u64> {
        self.rows.first().map(|d| d.frame)
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.rows.last().map(|d| d.frame)
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary {
            rows: self.len(),
            frames: self.frame_count(),
            first_frame: self.first_frame(),
            last_frame: self.last_frame(),
        }
    }
}

impl FromIterator<Detection> for BoxTable {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DEFAULT_FPS;

    fn det(frame: u64, box_index: u32) -> Detection {
        Detection {
            frame,
            box_index,
            x: frame as f64,
            y: box_index as f64,
            width: 10.0,
            height: 20.0,
        }
    }

    /// Frames 5 (two boxes) and 10 (one box), inserted out of order.
    fn sample() -> BoxTable {
        BoxTable::new(vec![det(10, 0), det(5, 1), det(5, 0)])
    }

    fn keys(rows: &[Detection]) -> Vec<(u64, u32)> {
        rows.iter().map(|d| (d.frame, d.box_index)).collect()
    }

    /// A larger irregular table: sparse frames, varying box counts.
    fn irregular() -> BoxTable {
        let mut rows = Vec::new();
        for frame in [0u64, 3, 4, 17, 18, 100, 101, 500, 2_400, 2_401] {
            for b in (0..(frame % 4 + 1) as u32).rev() {
                rows.push(det(frame, b));
            }
        }
        BoxTable::new(rows)
    }

    // -- point_query ---------------------------------------------------------

    #[test]
    fn point_query_orders_by_box_index() {
        let t = sample();
        assert_eq!(keys(t.point_query(5)), vec![(5, 0), (5, 1)]);
    }

    #[test]
    fn point_query_absent_frame_is_empty() {
        let t = sample();
        assert!(t.point_query(7).is_empty());
        assert!(t.point_query(0).is_empty());
        assert!(t.point_query(u64::MAX).is_empty());
    }

    #[test]
    fn point_query_is_empty_iff_no_row_has_frame() {
        let t = irregular();
        for frame in 0..2_500 {
            let expected = t.rows().iter().any(|d| d.frame == frame);
            assert_eq!(!t.point_query(frame).is_empty(), expected, "frame {frame}");
        }
    }

    // -- range_query ---------------------------------------------------------

    #[test]
    fn range_query_inclusive_and_ordered() {
        let t = sample();
        assert_eq!(keys(t.range_query(0, 10)), vec![(5, 0), (5, 1), (10, 0)]);
        assert_eq!(keys(t.range_query(5, 5)), vec![(5, 0), (5, 1)]);
        assert_eq!(keys(t.range_query(6, 10)), vec![(10, 0)]);
    }

    #[test]
    fn range_query_inverted_is_empty() {
        let t = sample();
        assert!(t.range_query(10, 5).is_empty());
        assert!(t.range_query(1, 0).is_empty());
    }

    #[test]
    fn range_query_is_union_of_point_queries() {
        let t = irregular();
        for (a, b) in [(0, 0), (0, 20), (4, 17), (19, 99), (100, 2_401), (0, 10_000)] {
            let union: Vec<Detection> = (a..=b).flat_map(|f| t.point_query(f).to_vec()).collect();
            assert_eq!(t.range_query(a, b), union.as_slice(), "range {a}..={b}");
        }
    }

    // -- timeline_bins -------------------------------------------------------

    #[test]
    fn timeline_sample_is_single_bin() {
        assert_eq!(sample().timeline_bins(1, DEFAULT_FPS).unwrap(), vec![3]);
    }

    #[test]
    fn timeline_empty_table_is_empty() {
        assert!(BoxTable::default()
            .timeline_bins(1, DEFAULT_FPS)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn timeline_zero_fills_gaps() {
        let t = BoxTable::new(vec![det(0, 0), det(24 * 3, 0), det(24 * 3, 1)]);
        assert_eq!(t.timeline_bins(1, DEFAULT_FPS).unwrap(), vec![1, 0, 0, 2]);
        assert_eq!(t.timeline_bins(2, DEFAULT_FPS).unwrap(), vec![1, 2]);
    }

    #[test]
    fn timeline_of_far_frame_is_error_not_allocation() {
        let t = BoxTable::new(vec![det(0, 0), det(i64::MAX as u64, 0)]);
        for bin_secs in [1, 60] {
            let err = t.timeline_bins(bin_secs, DEFAULT_FPS).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "bin_secs {bin_secs}");
        }
        // Other queries on the same table are unaffected.
        assert_eq!(t.next_hit(0), Some(i64::MAX as u64));
    }

    #[test]
    fn timeline_length_and_sum_match_table() {
        let t = irregular();
        for bin_secs in [1, 2, 7, 60] {
            let bins = t.timeline_bins(bin_secs, DEFAULT_FPS).unwrap();
            let max_bin = t
                .rows()
                .iter()
                .map(|d| timeline::bin_of(d.frame, bin_secs, DEFAULT_FPS))
                .max()
                .unwrap();
            assert_eq!(bins.len() as u64, max_bin + 1);
            assert_eq!(bins.iter().sum::<u64>(), t.len() as u64);
        }
    }

    // -- next_hit / prev_hit -------------------------------------------------

    #[test]
    fn hits_on_sample() {
        let t = sample();
        assert_eq!(t.next_hit(5), Some(10));
        assert_eq!(t.next_hit(10), None);
        assert_eq!(t.prev_hit(10), Some(5));
        assert_eq!(t.prev_hit(0), None);
        assert_eq!(t.next_hit(0), Some(5));
        assert_eq!(t.prev_hit(5), None);
        assert_eq!(t.prev_hit(u64::MAX), Some(10));
    }

    #[test]
    fn hits_on_empty_table() {
        let t = BoxTable::default();
        assert_eq!(t.next_hit(0), None);
        assert_eq!(t.prev_hit(100), None);
    }

    #[test]
    fn next_hit_sweep_visits_every_occupied_frame_once() {
        let t = irregular();
        let mut expected: Vec<u64> = t.rows().iter().map(|d| d.frame).collect();
        expected.dedup();

        // Frame 0 is occupied in this table; the sweep starts on it.
        let mut visited = vec![0];
        let mut cursor = 0;
        while let Some(next) = t.next_hit(cursor) {
            assert!(next > cursor);
            visited.push(next);
            cursor = next;
        }
        assert_eq!(visited, expected);

        let mut backwards = Vec::new();
        let mut cursor = u64::MAX;
        while let Some(prev) = t.prev_hit(cursor) {
            backwards.push(prev);
            cursor = prev;
        }
        backwards.reverse();
        assert_eq!(backwards, expected);
    }

    // -- summary -------------------------------------------------------------

    #[test]
    fn summary_counts_rows_and_frames() {
        let s = sample().summary();
        assert_eq!(
            s,
            TableSummary {
                rows: 3,
                frames: 2,
                first_frame: Some(5),
                last_frame: Some(10),
            }
        );
        let empty = BoxTable::default().summary();
        assert_eq!(empty.rows, 0);
        assert_eq!(empty.first_frame, None);
    }

    #[test]
    fn collects_from_iterator_sorted() {
        let t: BoxTable = vec![det(3, 1), det(1, 0), det(3, 0)].into_iter().collect();
        assert_eq!(keys(t.rows()), vec![(1, 0), (3, 0), (3, 1)]);
    }
}

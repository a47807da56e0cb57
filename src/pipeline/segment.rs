//! Segmentation: partition a classified page sequence into output runs.
//!
//! Marker pages divide a scan into contiguous runs of content pages. A marker
//! sitting on the very first or very last page bounds nothing on its outer
//! side, so it is dropped before the split points are computed. Only a
//! single marker is trimmed at each end; a second marker right behind it
//! still splits (and yields an empty run).
//!
//! ```text
//! N = 8, markers at {2, 3}
//!
//!   0 1 | 2 | 3 | 4 5 6 7
//!   ───   M   M   ───────
//!   run 1    run 2 run 3
//!  [0,1]    (empty) [4,7]
//! ```

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A contiguous page range that becomes one output document.
///
/// `end` is inclusive. A run with `start == end + 1` is empty: it sits
/// between two adjacent markers and produces no file, but still consumes an
/// ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// 1-based emission order; names the output file.
    pub ordinal: usize,
    pub start: usize,
    pub end: usize,
}

impl Run {
    /// Run covering `start..stop` (half-open). `stop` must be ≥ 1.
    fn between(ordinal: usize, start: usize, stop: usize) -> Self {
        debug_assert!(stop >= 1 && start <= stop);
        Self {
            ordinal,
            start,
            end: stop - 1,
        }
    }

    /// Number of page indices covered.
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Page indices in ascending order.
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }
}

/// Result of segmenting one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segmentation {
    /// Every page is a marker (or the document has no pages): nothing to emit.
    Empty,
    /// No split point remains after edge trimming. The source file is copied
    /// as-is rather than rebuilt from rasters.
    Whole(Run),
    /// At least one split point: `k` interior markers give `k + 1` runs,
    /// some of which may be empty.
    Split(Vec<Run>),
}

impl Segmentation {
    pub fn runs(&self) -> &[Run] {
        match self {
            Segmentation::Empty => &[],
            Segmentation::Whole(run) => std::slice::from_ref(run),
            Segmentation::Split(runs) => runs,
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, Segmentation::Split(_))
    }
}

/// Marker indices that act as split points: all markers, minus one at index
/// 0 and one at index `N - 1`.
pub fn split_points(is_marker: &[bool]) -> Vec<usize> {
    let n = is_marker.len();
    let markers: Vec<usize> = is_marker
        .iter()
        .enumerate()
        .filter_map(|(i, &m)| m.then_some(i))
        .collect();

    let mut points = markers.as_slice();
    if let Some((&0, rest)) = points.split_first() {
        points = rest;
    }
    if let Some((&last, rest)) = points.split_last() {
        if last + 1 == n {
            points = rest;
        }
    }
    points.to_vec()
}

/// Segment a document given the per-page marker flags, in page order.
pub fn segment(is_marker: &[bool]) -> Segmentation {
    let n = is_marker.len();
    if is_marker.iter().all(|&m| m) {
        return Segmentation::Empty;
    }

    let points = split_points(is_marker);
    if points.is_empty() {
        return Segmentation::Whole(Run::between(1, 0, n));
    }

    let mut runs = Vec::with_capacity(points.len() + 1);
    let mut start = 0;
    for &marker in &points {
        runs.push(Run::between(runs.len() + 1, start, marker));
        start = marker + 1;
    }
    runs.push(Run::between(runs.len() + 1, start, n));
    Segmentation::Split(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn flags(n: usize, markers: &[usize]) -> Vec<bool> {
        (0..n).map(|i| markers.contains(&i)).collect()
    }

    fn bounds(seg: &Segmentation) -> Vec<(usize, usize, usize)> {
        seg.runs().iter().map(|r| (r.ordinal, r.start, r.end)).collect()
    }

    #[test]
    fn single_interior_marker() {
        let seg = segment(&flags(6, &[3]));
        assert!(seg.is_split());
        assert_eq!(bounds(&seg), vec![(1, 0, 2), (2, 4, 5)]);
        assert_eq!(seg.runs()[0].len(), 3);
        assert_eq!(seg.runs()[1].len(), 2);
    }

    #[test]
    fn edge_markers_only_means_whole_document() {
        let seg = segment(&flags(6, &[0, 5]));
        assert_eq!(
            seg,
            Segmentation::Whole(Run {
                ordinal: 1,
                start: 0,
                end: 5
            })
        );
    }

    #[test]
    fn adjacent_markers_emit_empty_run() {
        let seg = segment(&flags(8, &[2, 3]));
        assert_eq!(bounds(&seg), vec![(1, 0, 1), (2, 3, 2), (3, 4, 7)]);
        assert!(seg.runs()[1].is_empty());
        assert_eq!(seg.runs()[1].indices().count(), 0);
    }

    #[test]
    fn no_markers_is_whole() {
        let seg = segment(&flags(4, &[]));
        assert!(!seg.is_split());
        assert_eq!(bounds(&seg), vec![(1, 0, 3)]);
    }

    #[test]
    fn single_content_page() {
        let seg = segment(&[false]);
        assert_eq!(bounds(&seg), vec![(1, 0, 0)]);
        assert_eq!(seg.runs()[0].len(), 1);
    }

    #[test]
    fn all_markers_is_empty() {
        for n in 0..6 {
            let seg = segment(&vec![true; n]);
            assert_eq!(seg, Segmentation::Empty, "n = {n}");
            assert!(seg.runs().is_empty());
        }
    }

    #[test]
    fn only_one_marker_trimmed_per_edge() {
        // markers 0 and 1: page 0 trimmed, page 1 still splits
        let seg = segment(&flags(5, &[0, 1]));
        assert_eq!(bounds(&seg), vec![(1, 0, 0), (2, 2, 4)]);
        // markers 3 and 4 of 5: page 4 trimmed, page 3 still splits
        let seg = segment(&flags(5, &[3, 4]));
        assert_eq!(bounds(&seg), vec![(1, 0, 2), (2, 4, 4)]);
    }

    #[test]
    fn leading_marker_folds_into_first_run() {
        let seg = segment(&flags(6, &[0, 3]));
        assert_eq!(bounds(&seg), vec![(1, 0, 2), (2, 4, 5)]);
        assert_eq!(split_points(&flags(6, &[0, 3])), vec![3]);
    }

    /// Every flag sequence up to length 10: runs plus split points cover
    /// `0..N` exactly once, and ordinals are `1..=k` without gaps.
    #[test]
    fn partition_and_ordinal_density_exhaustive() {
        for n in 1..=10usize {
            for mask in 0u32..(1 << n) {
                let f: Vec<bool> = (0..n).map(|i| mask & (1 << i) != 0).collect();
                let seg = segment(&f);
                if f.iter().all(|&m| m) {
                    assert_eq!(seg, Segmentation::Empty);
                    continue;
                }

                let points = split_points(&f);
                let mut seen = BTreeSet::new();
                let mut last_start = None;
                for (i, run) in seg.runs().iter().enumerate() {
                    assert_eq!(run.ordinal, i + 1, "flags {f:?}");
                    if let Some(prev) = last_start {
                        assert!(run.start > prev, "runs out of order for {f:?}");
                    }
                    last_start = Some(run.start);
                    for idx in run.indices() {
                        assert!(seen.insert(idx), "overlap at {idx} for {f:?}");
                    }
                }
                for &p in &points {
                    assert!(f[p]);
                    assert!(seen.insert(p), "split point {p} inside a run for {f:?}");
                }
                assert_eq!(seen, (0..n).collect::<BTreeSet<_>>(), "flags {f:?}");
                assert_eq!(seg.runs().len(), points.len() + 1);
                assert_eq!(seg.is_split(), !points.is_empty());
            }
        }
    }
}

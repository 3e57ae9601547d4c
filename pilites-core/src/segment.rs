//! Channel layout: turning a channel's regions into display segments.
//!
//! ```text
//!  ledCount = 20, regions A:[2,5]  B:[9,30]
//!
//!  0   2       6     9                  19
//!  ├───┼───────┼─────┼───────────────────┤
//!  │ · │   A   │  ·  │         B         │
//! ```
//!
//! Spans are clipped to the strand, sorted by start with a stable sort and
//! swept once. Overlapping spans are all emitted; the output may then
//! contain overlapping segments. Nothing is cached: recompute whenever the
//! regions, their ranges, or the LED count change.

use crate::show::Region;

/// What a segment is drawn as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentOwner<'a> {
    Unassigned,
    Region {
        region: &'a Region,
        /// Position of the region in the input list (palette index).
        index: usize,
    },
}

/// An inclusive run of pixels with one owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    pub start: u32,
    pub end: u32,
    pub owner: SegmentOwner<'a>,
}

impl<'a> Segment<'a> {
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn region(&self) -> Option<&'a Region> {
        match self.owner {
            SegmentOwner::Region { region, .. } => Some(region),
            SegmentOwner::Unassigned => None,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self.owner, SegmentOwner::Unassigned)
    }

    /// Fill color for drawing, or `None` for unassigned pixels.
    pub fn color(&self) -> Option<&'a str> {
        match self.owner {
            SegmentOwner::Region { region, index } => Some(region.display_color(index)),
            SegmentOwner::Unassigned => None,
        }
    }

    /// Share of the strand this segment occupies, in `0.0..=1.0`.
    pub fn width_fraction(&self, led_count: u32) -> f64 {
        if led_count == 0 {
            return 0.0;
        }
        f64::from(self.len()) / f64::from(led_count)
    }
}

struct Span<'a> {
    start: u32,
    end: u32,
    region: &'a Region,
    index: usize,
}

/// Lay out `regions` on a strand of `led_count` pixels.
///
/// Every pixel in `[0, led_count - 1]` is covered; gaps become
/// [`SegmentOwner::Unassigned`] segments. Ranges starting past the end of
/// the strand are dropped, ranges running past it are clipped. Ties on
/// `start` keep region order, then range order within a region.
pub fn segment_channel<'a, I>(led_count: u32, regions: I) -> Vec<Segment<'a>>
where
    I: IntoIterator<Item = &'a Region>,
{
    let Some(last) = led_count.checked_sub(1) else {
        return Vec::new();
    };

    let mut spans: Vec<Span<'a>> = Vec::new();
    for (index, region) in regions.into_iter().enumerate() {
        for range in &region.ranges {
            let end = range.end.min(last);
            if range.start <= end {
                spans.push(Span {
                    start: range.start,
                    end,
                    region,
                    index,
                });
            }
        }
    }
    spans.sort_by_key(|s| s.start);

    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor: u32 = 0;
    for span in spans {
        if span.start > cursor {
            segments.push(Segment {
                start: cursor,
                end: span.start - 1,
                owner: SegmentOwner::Unassigned,
            });
        }
        segments.push(Segment {
            start: span.start,
            end: span.end,
            owner: SegmentOwner::Region {
                region: span.region,
                index: span.index,
            },
        });
        cursor = span.end + 1;
    }
    if cursor < led_count {
        segments.push(Segment {
            start: cursor,
            end: last,
            owner: SegmentOwner::Unassigned,
        });
    }
    segments
}

/// Ruler tick positions at 0, 25, 50, 75 and 100 % of the strand.
pub fn ruler_ticks(led_count: u32) -> Vec<u32> {
    let Some(last) = led_count.checked_sub(1) else {
        return Vec::new();
    };
    let mut ticks: Vec<u32> = [0.0, 0.25, 0.5, 0.75, 1.0]
        .iter()
        .map(|pct| (pct * f64::from(last)).round() as u32)
        .collect();
    ticks.dedup();
    ticks
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::show::PixelRange;

    fn region(id: &str, ranges: &[(u32, u32)]) -> Region {
        Region {
            name: id.into(),
            ranges: ranges
                .iter()
                .map(|&(start, end)| PixelRange { start, end })
                .collect(),
            ..Region::new(id, "ch-1")
        }
    }

    fn shape<'a>(segments: &[Segment<'a>]) -> Vec<(u32, u32, Option<&'a str>)> {
        segments
            .iter()
            .map(|s| (s.start, s.end, s.region().map(|r| r.id.as_str())))
            .collect()
    }

    fn assert_tiles(segments: &[Segment<'_>], led_count: u32) {
        let mut expected = 0;
        for s in segments {
            assert_eq!(s.start, expected, "gap or overlap at {}", s.start);
            assert!(s.start <= s.end);
            expected = s.end + 1;
        }
        assert_eq!(expected, led_count);
        assert_eq!(segments.iter().map(Segment::len).sum::<u32>(), led_count);
    }

    #[test]
    fn no_regions_is_one_unassigned_segment() {
        let segments = segment_channel(10, Vec::<&Region>::new());
        assert_eq!(shape(&segments), [(0, 9, None)]);
    }

    #[test]
    fn zero_leds_yields_nothing() {
        let r = region("a", &[(0, 5)]);
        assert!(segment_channel(0, [&r]).is_empty());
    }

    #[test]
    fn gaps_are_filled() {
        let a = region("a", &[(2, 5)]);
        let b = region("b", &[(9, 30)]);
        let segments = segment_channel(20, [&a, &b]);
        assert_eq!(
            shape(&segments),
            [
                (0, 1, None),
                (2, 5, Some("a")),
                (6, 8, None),
                (9, 19, Some("b")),
            ]
        );
        assert_tiles(&segments, 20);
    }

    #[test]
    fn ranges_past_the_end_are_dropped() {
        let a = region("a", &[(25, 30), (0, 4)]);
        let segments = segment_channel(20, [&a]);
        assert_eq!(shape(&segments), [(0, 4, Some("a")), (5, 19, None)]);
    }

    #[test]
    fn non_contiguous_region_sorted_by_start() {
        let a = region("a", &[(10, 14), (0, 3)]);
        let b = region("b", &[(4, 9)]);
        let segments = segment_channel(15, [&a, &b]);
        assert_eq!(
            shape(&segments),
            [(0, 3, Some("a")), (4, 9, Some("b")), (10, 14, Some("a"))]
        );
        assert_tiles(&segments, 15);
    }

    #[test]
    fn non_overlapping_layouts_tile_exactly() {
        // Deterministic sweep over many strand lengths and split points.
        for led_count in 1..40u32 {
            for cut in 0..led_count {
                let a = region("a", &[(0, cut / 2)]);
                let b = region("b", &[(cut, cut + 3)]);
                let regions: Vec<&Region> = if cut / 2 < cut { vec![&b, &a] } else { vec![&a] };
                let segments = segment_channel(led_count, regions);
                assert_tiles(&segments, led_count);
            }
        }
    }

    #[test]
    fn overlaps_emit_both_segments() {
        let a = region("a", &[(0, 9)]);
        let b = region("b", &[(5, 14)]);
        let segments = segment_channel(20, [&a, &b]);
        assert_eq!(
            shape(&segments),
            [(0, 9, Some("a")), (5, 14, Some("b")), (15, 19, None)]
        );
    }

    #[test]
    fn equal_starts_keep_region_then_range_order() {
        let a = region("a", &[(3, 6)]);
        let b = region("b", &[(3, 4), (3, 8)]);
        let segments = segment_channel(10, [&b, &a]);
        let owners: Vec<_> = shape(&segments)
            .into_iter()
            .filter_map(|(s, e, id)| id.map(|id| (s, e, id)))
            .collect();
        assert_eq!(owners, [(3, 4, "b"), (3, 8, "b"), (3, 6, "a")]);
    }

    #[test]
    fn segment_colors_use_input_position() {
        let a = region("a", &[(0, 1)]);
        let mut b = region("b", &[(2, 3)]);
        b.ui_color = Some("#010203".into());
        let segments = segment_channel(5, [&a, &b]);
        assert_eq!(segments[0].color(), Some("#ef4444"));
        assert_eq!(segments[1].color(), Some("#010203"));
        assert_eq!(segments[2].color(), None);
        assert!((segments[2].width_fraction(5) - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn ruler() {
        assert_eq!(ruler_ticks(150), [0, 37, 75, 112, 149]);
        assert_eq!(ruler_ticks(1), [0]);
        assert!(ruler_ticks(0).is_empty());
    }
}

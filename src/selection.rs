use crate::data::model::Record;

// ---------------------------------------------------------------------------
// Bands: row rank → vertical position interval
// ---------------------------------------------------------------------------

/// Position interval occupied by one rendered row, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub start: f64,
    pub end: f64,
}

impl Band {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn height(&self) -> f64 {
        self.end - self.start
    }
}

/// Band of row `index` out of `total_rows`.
///
/// Each row owns a step of `band_height`; the drawn band is inset by
/// `padding * band_height / 2` on both sides. `padding` is a fraction
/// clamped to `[0, 1)`.
pub fn row_band(index: usize, total_rows: usize, band_height: f64, padding: f64) -> Option<Band> {
    if index >= total_rows {
        return None;
    }
    let padding = padding.clamp(0.0, 0.99);
    let step_start = index as f64 * band_height;
    let inset = padding * band_height / 2.0;
    Some(Band {
        start: step_start + inset,
        end: step_start + band_height - inset,
    })
}

/// Row-to-band geometry shared by the bar chart and the reducer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLayout {
    pub band_height: f64,
    pub padding: f64,
}

impl Default for BandLayout {
    fn default() -> Self {
        BandLayout {
            band_height: 20.0,
            padding: 0.1,
        }
    }
}

impl BandLayout {
    pub fn band(&self, index: usize, total_rows: usize) -> Option<Band> {
        row_band(index, total_rows, self.band_height, self.padding)
    }
}

// ---------------------------------------------------------------------------
// Selection range and statistics
// ---------------------------------------------------------------------------

/// Interval swept by a drag gesture, in band coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRange {
    pub start: f64,
    pub end: f64,
}

impl SelectionRange {
    /// Build from two drag endpoints in either order.
    pub fn new(a: f64, b: f64) -> Self {
        SelectionRange {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Inclusive overlap: partially covered bands count as selected.
    pub fn overlaps(&self, band: &Band) -> bool {
        self.end >= band.start && self.start <= band.end
    }
}

/// Indices of the rows whose band overlaps `range`.
pub fn selected_rows(total_rows: usize, layout: &BandLayout, range: &SelectionRange) -> Vec<usize> {
    (0..total_rows)
        .filter(|&i| {
            layout
                .band(i, total_rows)
                .is_some_and(|band| range.overlaps(&band))
        })
        .collect()
}

/// Summary shown in the statistics panel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionStats {
    pub mean: f64,
    pub max: f64,
    /// Rows with a value above zero.
    pub warming_count: usize,
    /// Rows the statistics were computed over.
    pub rows: usize,
}

impl SelectionStats {
    /// Statistics over a set of values; all zero when there are none.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut rows = 0;
        let mut warming_count = 0;
        for v in values {
            sum += v;
            max = max.max(v);
            rows += 1;
            if v > 0.0 {
                warming_count += 1;
            }
        }
        if rows == 0 {
            return SelectionStats::default();
        }
        SelectionStats {
            mean: sum / rows as f64,
            max,
            warming_count,
            rows,
        }
    }
}

/// Statistics over the rows of `slice` selected by `selection`, or over the
/// whole slice when there is no selection.
pub fn compute_stats(
    slice: &[Record],
    layout: &BandLayout,
    selection: Option<&SelectionRange>,
) -> SelectionStats {
    match selection {
        None => SelectionStats::from_values(slice.iter().map(|r| r.value)),
        Some(range) => SelectionStats::from_values(
            selected_rows(slice.len(), layout, range)
                .into_iter()
                .map(|i| slice[i].value),
        ),
    }
}

// ---------------------------------------------------------------------------
// Brush: drag gesture lifecycle
// ---------------------------------------------------------------------------

/// Idle → Dragging → Committed → (clear) Idle.
/// Starting a new drag from Committed replaces the old range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Brush {
    #[default]
    Idle,
    Dragging { anchor: f64, current: f64 },
    Committed(SelectionRange),
}

impl Brush {
    pub fn start(&mut self, pos: f64) {
        log::debug!("brush start at {pos:.1}");
        *self = Brush::Dragging {
            anchor: pos,
            current: pos,
        };
    }

    /// Move the free end of an active drag. Ignored unless dragging.
    pub fn drag(&mut self, pos: f64) {
        if let Brush::Dragging { current, .. } = self {
            *current = pos;
        }
    }

    /// Freeze the current bounds. Ignored unless dragging.
    pub fn release(&mut self) {
        if let Brush::Dragging { anchor, current } = *self {
            let range = SelectionRange::new(anchor, current);
            log::debug!("brush committed [{:.1}, {:.1}]", range.start, range.end);
            *self = Brush::Committed(range);
        }
    }

    pub fn clear(&mut self) {
        if *self != Brush::Idle {
            log::debug!("brush cleared");
        }
        *self = Brush::Idle;
    }

    /// Range to reduce over; `None` while idle.
    pub fn range(&self) -> Option<SelectionRange> {
        match *self {
            Brush::Idle => None,
            Brush::Dragging { anchor, current } => Some(SelectionRange::new(anchor, current)),
            Brush::Committed(range) => Some(range),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Brush::Dragging { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn abc() -> Vec<Record> {
        vec![
            Record::new("A", "X", 2000, 2.0),
            Record::new("B", "X", 2000, -1.0),
            Record::new("C", "X", 2000, 0.5),
        ]
    }

    const TIGHT: BandLayout = BandLayout {
        band_height: 10.0,
        padding: 0.0,
    };

    #[test]
    fn bands_follow_rank() {
        assert_eq!(row_band(0, 3, 10.0, 0.0), Some(Band { start: 0.0, end: 10.0 }));
        assert_eq!(row_band(2, 3, 10.0, 0.0), Some(Band { start: 20.0, end: 30.0 }));
        assert_eq!(row_band(3, 3, 10.0, 0.0), None);

        let padded = row_band(1, 3, 10.0, 0.2).unwrap();
        assert!((padded.start - 11.0).abs() < 1e-9);
        assert!((padded.end - 19.0).abs() < 1e-9);
        assert!((padded.center() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn partial_overlap_selects_a_and_b() {
        let range = SelectionRange::new(5.0, 15.0);
        assert_eq!(selected_rows(3, &TIGHT, &range), vec![0, 1]);

        let stats = compute_stats(&abc(), &TIGHT, Some(&range));
        assert!((stats.mean - 0.5).abs() < 1e-9);
        assert_eq!(stats.max, 2.0);
        assert_eq!(stats.warming_count, 1);
        assert_eq!(stats.rows, 2);
    }

    #[test]
    fn reversed_drag_is_normalised() {
        assert_eq!(SelectionRange::new(15.0, 5.0), SelectionRange::new(5.0, 15.0));
    }

    #[test]
    fn no_selection_equals_full_selection() {
        let slice = abc();
        for layout in [TIGHT, BandLayout::default()] {
            let full = SelectionRange::new(0.0, slice.len() as f64 * layout.band_height);
            assert_eq!(
                compute_stats(&slice, &layout, None),
                compute_stats(&slice, &layout, Some(&full))
            );
        }
    }

    #[test]
    fn empty_slice_is_all_zero() {
        let zero = SelectionStats::default();
        assert_eq!(compute_stats(&[], &TIGHT, None), zero);
        assert_eq!(
            compute_stats(&[], &TIGHT, Some(&SelectionRange::new(0.0, 100.0))),
            zero
        );
    }

    #[test]
    fn selection_outside_every_band_is_all_zero() {
        let stats = compute_stats(&abc(), &TIGHT, Some(&SelectionRange::new(40.0, 50.0)));
        assert_eq!(stats, SelectionStats::default());
    }

    #[test]
    fn max_of_cooling_rows_stays_negative() {
        let stats = compute_stats(&abc(), &TIGHT, Some(&SelectionRange::new(12.0, 14.0)));
        assert_eq!(stats.max, -1.0);
        assert_eq!(stats.warming_count, 0);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let slice = abc();
        let range = SelectionRange::new(3.0, 27.0);
        let first = compute_stats(&slice, &TIGHT, Some(&range));
        let second = compute_stats(&slice, &TIGHT, Some(&range));
        assert_eq!(first.mean.to_bits(), second.mean.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn brush_lifecycle() {
        let mut brush = Brush::default();
        assert_eq!(brush.range(), None);

        brush.drag(4.0);
        assert_eq!(brush, Brush::Idle);

        brush.start(20.0);
        brush.drag(8.0);
        assert!(brush.is_dragging());
        assert_eq!(brush.range(), Some(SelectionRange::new(8.0, 20.0)));

        brush.release();
        assert_eq!(brush, Brush::Committed(SelectionRange::new(8.0, 20.0)));
        brush.drag(100.0);
        assert_eq!(brush.range(), Some(SelectionRange::new(8.0, 20.0)));

        brush.start(1.0);
        assert_eq!(brush.range(), Some(SelectionRange::new(1.0, 1.0)));

        brush.clear();
        assert_eq!(brush.range(), None);
    }
}

use std::fmt;

use crate::error::AnalyzerError;

// ---------------------------------------------------------------------------
// Selection – the averaged index range
// ---------------------------------------------------------------------------

/// Inclusive index range `[start, end]` over the active column.
///
/// Invariant after every call: `0 <= start < end <= len - 1`.
/// Setters clamp instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    start: usize,
    end: usize,
    len: usize,
}

/// Bring an arbitrary `(start, end)` pair into a valid ordered range over
/// `len` points. Requires `len >= 2`.
///
/// Both bounds are clamped into `[0, len - 1]`; a collapsed or crossed pair
/// is reopened to `end = start + 1`, shifted down when that would run past
/// the last index.
pub fn normalize(start: i64, end: i64, len: usize) -> (usize, usize) {
    debug_assert!(len >= 2);
    let last = len as i64 - 1;
    let mut start = start.clamp(0, last);
    let mut end = end.clamp(0, last);
    if start >= end {
        end = start + 1;
        if end > last {
            end = last;
            start = last - 1;
        }
    }
    (start as usize, end as usize)
}

impl Selection {
    /// Default range for a freshly loaded column: `[0, min(span, len - 1)]`.
    pub fn reset(len: usize, default_span: usize) -> Result<Self, AnalyzerError> {
        let span = default_span.min(len.saturating_sub(1));
        Self::with_bounds(0, span as i64, len)
    }

    /// Build a selection from arbitrary bounds, normalizing them.
    pub fn with_bounds(start: i64, end: i64, len: usize) -> Result<Self, AnalyzerError> {
        if len <= 1 {
            return Err(AnalyzerError::InvalidLength { length: len });
        }
        let (start, end) = normalize(start, end, len);
        Ok(Self { start, end, len })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of points covered, both ends included.
    pub fn count(&self) -> usize {
        self.end - self.start + 1
    }

    /// Length of the column the bounds are clamped against.
    pub fn len(&self) -> usize {
        self.len
    }

    fn last(&self) -> i64 {
        self.len as i64 - 1
    }

    /// Move the start edge, keeping it at least one index left of `end`.
    pub fn set_start(&mut self, new_start: i64) {
        let clamped = new_start.clamp(0, self.last());
        self.start = clamped.min(self.end as i64 - 1) as usize;
    }

    /// Move the end edge, keeping it at least one index right of `start`.
    pub fn set_end(&mut self, new_end: i64) {
        let clamped = new_end.clamp(0, self.last());
        self.end = clamped.max(self.start as i64 + 1) as usize;
    }

    /// Shift the whole range so it begins at `new_start`, preserving width.
    pub fn move_by(&mut self, new_start: i64) {
        let width = (self.end - self.start) as i64;
        let start = new_start.clamp(0, self.last() - width);
        self.start = start as usize;
        self.end = (start + width) as usize;
    }

    /// Arithmetic mean of `data[start..=end]`, or `None` when the clamped
    /// range is empty.
    pub fn mean(&self, data: &[f64]) -> Option<f64> {
        if data.is_empty() {
            return None;
        }
        let start = self.start;
        let end = self.end.min(data.len() - 1);
        if start >= end {
            return None;
        }
        let slice = &data[start..=end];
        Some(slice.iter().sum::<f64>() / slice.len() as f64)
    }
}

// ---------------------------------------------------------------------------
// MeanDisplay – what the mean label shows
// ---------------------------------------------------------------------------

pub const MEAN_LABEL: &str = "Selection mean: ";
pub const NO_DATA_PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeanDisplay {
    Value(f64),
    #[default]
    NoData,
}

impl MeanDisplay {
    pub fn from_selection(selection: Option<&Selection>, data: &[f64]) -> Self {
        selection
            .and_then(|s| s.mean(data))
            .map_or(MeanDisplay::NoData, MeanDisplay::Value)
    }

    /// The bare number as shown, or `None` while the placeholder is up.
    pub fn value_text(&self) -> Option<String> {
        match self {
            MeanDisplay::Value(v) => Some(format!("{v:.4}")),
            MeanDisplay::NoData => None,
        }
    }
}

impl fmt::Display for MeanDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value_text() {
            Some(text) => write!(f, "{MEAN_LABEL}{text}"),
            None => write!(f, "{MEAN_LABEL}{NO_DATA_PLACEHOLDER}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(sel: &Selection, len: usize) {
        assert!(sel.start() < sel.end(), "{sel:?}");
        assert!(sel.end() <= len - 1, "{sel:?}");
    }

    #[test]
    fn reset_uses_default_span_clamped_to_length() {
        let sel = Selection::reset(50_000, 20_000).unwrap();
        assert_eq!((sel.start(), sel.end()), (0, 20_000));

        let sel = Selection::reset(300, 20_000).unwrap();
        assert_eq!((sel.start(), sel.end()), (0, 299));

        let sel = Selection::reset(2, 20_000).unwrap();
        assert_eq!((sel.start(), sel.end()), (0, 1));
    }

    #[test]
    fn len_survives_mutations() {
        let mut sel = Selection::reset(300, 20_000).unwrap();
        assert_eq!(sel.len(), 300);
        sel.set_end(5_000);
        sel.move_by(-10);
        assert_eq!(sel.len(), 300);
        assert_eq!(sel.end(), 299);
    }

    #[test]
    fn reset_rejects_short_columns() {
        assert!(matches!(
            Selection::reset(1, 100),
            Err(AnalyzerError::InvalidLength { length: 1 })
        ));
        assert!(Selection::reset(0, 100).is_err());
    }

    #[test]
    fn set_start_clamps_into_bounds() {
        let mut sel = Selection::with_bounds(10, 20, 100).unwrap();
        sel.set_start(-50);
        assert_eq!(sel.start(), 0);
        sel.set_start(500);
        assert_eq!(sel.start(), 19);
        sel.set_start(20);
        assert_eq!(sel.start(), 19);
        sel.set_start(5);
        assert_eq!((sel.start(), sel.end()), (5, 20));
    }

    #[test]
    fn set_end_clamps_into_bounds() {
        let mut sel = Selection::with_bounds(10, 20, 100).unwrap();
        sel.set_end(1_000);
        assert_eq!(sel.end(), 99);
        sel.set_end(-3);
        assert_eq!(sel.end(), 11);
        sel.set_end(10);
        assert_eq!(sel.end(), 11);
    }

    #[test]
    fn move_by_preserves_width() {
        let mut sel = Selection::with_bounds(10, 30, 100).unwrap();
        for target in [-40, 0, 15, 79, 80, 95, 1_000] {
            sel.move_by(target);
            assert_eq!(sel.end() - sel.start(), 20);
            assert_valid(&sel, 100);
        }
        assert_eq!((sel.start(), sel.end()), (79, 99));
        sel.move_by(-1);
        assert_eq!((sel.start(), sel.end()), (0, 20));
    }

    #[test]
    fn invariant_holds_across_mixed_mutations() {
        let len = 37;
        let mut sel = Selection::reset(len, 20_000).unwrap();
        let inputs = [-9_i64, 0, 1, 5, 17, 35, 36, 37, 400, -1];
        for (i, &a) in inputs.iter().enumerate() {
            for &b in &inputs[i..] {
                sel.set_start(a);
                assert_valid(&sel, len);
                sel.set_end(b);
                assert_valid(&sel, len);
                sel.move_by(a - b);
                assert_valid(&sel, len);
                sel.set_end(a);
                assert_valid(&sel, len);
                sel.set_start(b);
                assert_valid(&sel, len);
            }
        }
    }

    #[test]
    fn collapsed_bounds_reopen() {
        let sel = Selection::with_bounds(2, 2, 10).unwrap();
        assert_eq!((sel.start(), sel.end()), (2, 3));
        assert!(sel.mean(&[0.0; 10]).is_some());

        assert_eq!(normalize(9, 9, 10), (8, 9));
        assert_eq!(normalize(7, 3, 10), (7, 8));
        assert_eq!(normalize(-5, 50, 10), (0, 9));
    }

    #[test]
    fn mean_of_full_range() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sel = Selection::with_bounds(0, 4, data.len()).unwrap();
        let mean = MeanDisplay::from_selection(Some(&sel), &data);
        assert_eq!(mean, MeanDisplay::Value(3.0));
        assert_eq!(mean.to_string(), "Selection mean: 3.0000");
        assert_eq!(mean.value_text().as_deref(), Some("3.0000"));
    }

    #[test]
    fn mean_of_partial_range_includes_both_ends() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sel = Selection::with_bounds(1, 2, data.len()).unwrap();
        assert_eq!(sel.mean(&data), Some(2.5));
        assert_eq!(sel.count(), 2);
    }

    #[test]
    fn mean_against_shorter_data_is_no_data() {
        let sel = Selection::with_bounds(3, 8, 10).unwrap();
        assert_eq!(sel.mean(&[1.0, 2.0, 3.0]), None);
        assert_eq!(sel.mean(&[]), None);
        assert_eq!(MeanDisplay::from_selection(None, &[1.0]).to_string(), "Selection mean: --");
    }
}

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::AnalyzerConfig;
use crate::data::model::{ColumnData, Table};
use crate::error::AnalyzerError;
use crate::export::{self, Clipboard, CopyOutcome, HintSlot};
use crate::interaction::{DragEffect, DragHandler, PointerEvent};
use crate::selection::{MeanDisplay, Selection};

// ---------------------------------------------------------------------------
// Column session – everything tied to the active column
// ---------------------------------------------------------------------------

/// Column data, its selection and the drag state, created and replaced
/// together whenever a column is chosen.
pub struct ColumnSession {
    pub column: ColumnData,
    /// `None` when the column has fewer than two points.
    pub selection: Option<Selection>,
    pub drag: DragHandler,
    pub mean: MeanDisplay,
}

impl ColumnSession {
    pub fn new(column: ColumnData, config: &AnalyzerConfig) -> Self {
        let selection = match Selection::reset(column.len(), config.default_span) {
            Ok(sel) => Some(sel),
            Err(e) => {
                log::warn!("column '{}': {e}", column.name());
                None
            }
        };
        let mean = MeanDisplay::from_selection(selection.as_ref(), column.values());
        Self {
            column,
            selection,
            drag: DragHandler::new(config.edge_tolerance),
            mean,
        }
    }

    /// Route a pointer event to the drag handler and refresh the mean when
    /// the selection was touched.
    pub fn dispatch(&mut self, event: PointerEvent) -> DragEffect {
        let Some(selection) = self.selection.as_mut() else {
            return DragEffect::None;
        };
        let effect = self.drag.handle(event, selection);
        if effect == DragEffect::Redraw {
            self.mean = MeanDisplay::from_selection(Some(&*selection), self.column.values());
        }
        effect
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AnalyzerConfig,

    /// Loaded table (None until user loads a file).
    pub table: Option<Table>,

    /// Path of the loaded table, for the window title / status line.
    pub source_path: Option<PathBuf>,

    /// Valid numeric values per column, computed once per load.
    pub column_counts: Vec<(String, usize)>,

    /// Active column view.
    pub session: Option<ColumnSession>,

    /// Transient copy feedback.
    pub hint: HintSlot,

    /// Informational status shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl AppState {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            hint: HintSlot::new(config.hint_ttl),
            config,
            table: None,
            source_path: None,
            column_counts: Vec::new(),
            session: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded table. Any previous column view is discarded.
    pub fn set_table(&mut self, table: Table, path: PathBuf) {
        self.status_message = Some(format!(
            "Loaded {}: {} rows, {} columns",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            table.len(),
            table.n_columns()
        ));
        self.column_counts = table.numeric_counts();
        self.table = Some(table);
        self.source_path = Some(path);
        self.session = None;
    }

    /// Switch the plotted column. On error the current session is kept.
    pub fn select_column(&mut self, name: &str) -> Result<(), AnalyzerError> {
        let table = self.table.as_ref().ok_or_else(|| AnalyzerError::UnknownColumn {
            column: name.to_string(),
        })?;
        let column = table
            .numeric_column(name)
            .ok_or_else(|| AnalyzerError::UnknownColumn {
                column: name.to_string(),
            })?;
        if column.is_empty() {
            return Err(AnalyzerError::EmptyColumn {
                column: name.to_string(),
            });
        }

        log::info!("plotting column '{name}' with {} valid values", column.len());
        self.session = Some(ColumnSession::new(column, &self.config));
        Ok(())
    }

    pub fn active_column(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.column.name())
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> DragEffect {
        self.session
            .as_mut()
            .map_or(DragEffect::None, |s| s.dispatch(event))
    }

    pub fn mean(&self) -> MeanDisplay {
        self.session.as_ref().map_or(MeanDisplay::NoData, |s| s.mean)
    }

    /// Copy the displayed mean and post the matching hint.
    pub fn copy_mean(&mut self, clipboard: &mut dyn Clipboard, now: Instant) -> CopyOutcome {
        let outcome = export::copy_mean(&self.mean(), clipboard);
        self.hint.show(&outcome, now);
        outcome
    }

    /// Expire stale hints; returns when the next repaint is due.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        self.hint.tick(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::export::HintTone;
    use crate::interaction::DragState;

    fn table() -> Table {
        let a: Vec<CellValue> = (0..50_000).map(|i| CellValue::Number(i as f64)).collect();
        let mut b: Vec<CellValue> = (0..300).map(|i| CellValue::Number((i % 7) as f64)).collect();
        b.resize(50_000, CellValue::Missing);
        let empty = vec![CellValue::Text("n/a".into()); 50_000];
        let single: Vec<CellValue> = std::iter::once(CellValue::Number(4.0))
            .chain(std::iter::repeat(CellValue::Missing).take(49_999))
            .collect();
        Table::from_columns(vec![
            ("A".into(), a),
            ("B".into(), b),
            ("empty".into(), empty),
            ("single".into(), single),
        ])
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_table(table(), PathBuf::from("/tmp/wave.csv"));
        state
    }

    fn bounds(state: &AppState) -> (usize, usize) {
        let sel = state.session.as_ref().unwrap().selection.unwrap();
        (sel.start(), sel.end())
    }

    #[test]
    fn set_table_reports_shape() {
        let state = loaded();
        assert_eq!(
            state.status_message.as_deref(),
            Some("Loaded wave.csv: 50000 rows, 4 columns")
        );
        assert!(state.session.is_none());
        assert_eq!(state.mean(), MeanDisplay::NoData);
        assert_eq!(
            state.column_counts,
            vec![
                ("A".to_string(), 50_000),
                ("B".to_string(), 300),
                ("empty".to_string(), 0),
                ("single".to_string(), 1),
            ]
        );
    }

    #[test]
    fn selecting_column_resets_to_default_span() {
        let mut state = loaded();
        state.select_column("A").unwrap();
        assert_eq!(bounds(&state), (0, 20_000));
        assert_eq!(state.mean(), MeanDisplay::Value(10_000.0));
    }

    #[test]
    fn column_switch_discards_previous_range() {
        let mut state = loaded();
        state.select_column("A").unwrap();
        state.handle_pointer(PointerEvent::Press(10_000.0));
        state.handle_pointer(PointerEvent::Move(30_000.0));
        state.handle_pointer(PointerEvent::Release);
        assert_eq!(bounds(&state), (20_000, 40_000));

        state.select_column("B").unwrap();
        assert_eq!(state.active_column(), Some("B"));
        assert_eq!(bounds(&state), (0, 299));
        assert_eq!(
            state.session.as_ref().unwrap().drag.state(),
            DragState::Idle
        );
    }

    #[test]
    fn drag_recomputes_mean() {
        let mut state = loaded();
        state.select_column("A").unwrap();
        state.handle_pointer(PointerEvent::Press(20_000.0));
        let effect = state.handle_pointer(PointerEvent::Move(10.0));
        assert_eq!(effect, DragEffect::Redraw);
        assert_eq!(bounds(&state), (0, 10));
        assert_eq!(state.mean(), MeanDisplay::Value(5.0));
    }

    #[test]
    fn empty_column_keeps_previous_session() {
        let mut state = loaded();
        state.select_column("A").unwrap();
        let err = state.select_column("empty").unwrap_err();
        assert!(matches!(err, AnalyzerError::EmptyColumn { ref column } if column == "empty"));
        assert_eq!(state.active_column(), Some("A"));

        assert!(matches!(
            state.select_column("nope"),
            Err(AnalyzerError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn single_value_column_plots_without_selection() {
        let mut state = loaded();
        state.select_column("single").unwrap();
        let session = state.session.as_ref().unwrap();
        assert!(session.selection.is_none());
        assert_eq!(state.mean().to_string(), "Selection mean: --");
        assert_eq!(state.handle_pointer(PointerEvent::Press(0.0)), DragEffect::None);
    }

    #[test]
    fn copy_without_data_posts_negative_hint() {
        struct Untouchable;
        impl Clipboard for Untouchable {
            fn set_text(&mut self, _: &str) -> Result<(), AnalyzerError> {
                panic!("clipboard must not be touched");
            }
        }

        let mut state = loaded();
        let now = Instant::now();
        assert_eq!(state.copy_mean(&mut Untouchable, now), CopyOutcome::NoValidData);
        let hint = state.hint.current().unwrap();
        assert_eq!((hint.text, hint.tone), ("No valid data", HintTone::Negative));

        assert!(state.tick(now + Duration::from_secs(1)).is_some());
        assert!(state.tick(now + Duration::from_secs(3)).is_none());
        assert!(state.hint.current().is_none());
    }

    #[test]
    fn copy_with_data_writes_formatted_mean() {
        struct Capture(Option<String>);
        impl Clipboard for Capture {
            fn set_text(&mut self, text: &str) -> Result<(), AnalyzerError> {
                self.0 = Some(text.to_string());
                Ok(())
            }
        }

        let mut state = loaded();
        state.select_column("B").unwrap();
        let mut clip = Capture(None);
        let outcome = state.copy_mean(&mut clip, Instant::now());

        let expected = state.mean().value_text().unwrap();
        assert_eq!(clip.0.as_deref(), Some(expected.as_str()));
        assert_eq!(outcome, CopyOutcome::Copied(expected));
        assert_eq!(state.hint.current().unwrap().tone, HintTone::Affirmative);
    }
}

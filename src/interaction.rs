use crate::selection::Selection;

// ---------------------------------------------------------------------------
// Pointer events in data-index space
// ---------------------------------------------------------------------------

/// Pointer input already projected onto the plot's x axis.
///
/// The dispatch layer only produces `Press` / `Move` while the pointer is
/// inside the plotting area; `Release` is always forwarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(f64),
    Move(f64),
    Release,
}

/// Classification of an active drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    EdgeStart,
    EdgeEnd,
    MoveWhole,
    None,
}

/// Drag state between a press and its release.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingStart,
    DraggingEnd,
    /// `offset` is the pointer's distance from `start` at press time.
    DraggingWhole { offset: f64 },
}

impl DragState {
    pub fn is_active(&self) -> bool {
        !matches!(self, DragState::Idle)
    }

    pub fn mode(&self) -> DragMode {
        match self {
            DragState::Idle => DragMode::None,
            DragState::DraggingStart => DragMode::EdgeStart,
            DragState::DraggingEnd => DragMode::EdgeEnd,
            DragState::DraggingWhole { .. } => DragMode::MoveWhole,
        }
    }
}

/// What the caller has to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEffect {
    /// Nothing changed.
    None,
    /// The selection was touched: redraw the overlay and recompute the mean.
    Redraw,
}

// ---------------------------------------------------------------------------
// DragHandler – press / move / release state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DragHandler {
    state: DragState,
    tolerance: f64,
}

impl DragHandler {
    pub fn new(tolerance: f64) -> Self {
        Self {
            state: DragState::Idle,
            tolerance,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Hit-test a press against the selection.
    ///
    /// Edges are checked before the interior, and the start edge before the
    /// end edge, so a narrow span grabbed in the middle resizes from the left.
    pub fn classify(&self, x: f64, selection: &Selection) -> DragState {
        let start = selection.start() as f64;
        let end = selection.end() as f64;
        if (x - start).abs() < self.tolerance {
            DragState::DraggingStart
        } else if (x - end).abs() < self.tolerance {
            DragState::DraggingEnd
        } else if start <= x && x <= end {
            DragState::DraggingWhole { offset: x - start }
        } else {
            DragState::Idle
        }
    }

    /// Feed one pointer event. Moves are clamped to the selection's column.
    pub fn handle(&mut self, event: PointerEvent, selection: &mut Selection) -> DragEffect {
        match event {
            PointerEvent::Press(x) => {
                if self.state.is_active() || !x.is_finite() {
                    return DragEffect::None;
                }
                self.state = self.classify(x, selection);
                if self.state.is_active() {
                    log::debug!("drag started: {:?} at x={x:.1}", self.state.mode());
                }
                DragEffect::None
            }
            PointerEvent::Move(x) => {
                if !self.state.is_active() || !x.is_finite() {
                    return DragEffect::None;
                }
                let x = x.clamp(0.0, selection.len().saturating_sub(1) as f64);
                match self.state {
                    DragState::DraggingStart => selection.set_start(x.floor() as i64),
                    DragState::DraggingEnd => selection.set_end(x.floor() as i64),
                    DragState::DraggingWhole { offset } => {
                        selection.move_by((x - offset).floor() as i64)
                    }
                    DragState::Idle => return DragEffect::None,
                }
                DragEffect::Redraw
            }
            PointerEvent::Release => {
                if self.state.is_active() {
                    log::debug!(
                        "drag finished: {:?} -> [{}, {}]",
                        self.state.mode(),
                        selection.start(),
                        selection.end()
                    );
                }
                self.state = DragState::Idle;
                DragEffect::None
            }
        }
    }
}

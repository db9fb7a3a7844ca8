use std::time::{Duration, Instant};

use crate::error::AnalyzerError;
use crate::selection::MeanDisplay;

// ---------------------------------------------------------------------------
// Clipboard seam
// ---------------------------------------------------------------------------

/// Plain-text clipboard target.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), AnalyzerError>;
}

/// System clipboard through egui's platform output.
///
/// egui only queues the text for the backend at the end of the frame, so
/// this target never reports a failure.
pub struct EguiClipboard<'a>(pub &'a eframe::egui::Context);

impl Clipboard for EguiClipboard<'_> {
    fn set_text(&mut self, text: &str) -> Result<(), AnalyzerError> {
        self.0.copy_text(text.to_owned());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Copy operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum CopyOutcome {
    /// The clipboard now holds exactly this text.
    Copied(String),
    /// The placeholder was displayed; the clipboard was not touched.
    NoValidData,
    Failed(String),
}

/// Copy the displayed mean (number only, no label) to the clipboard.
pub fn copy_mean(display: &MeanDisplay, clipboard: &mut dyn Clipboard) -> CopyOutcome {
    let Some(text) = display.value_text() else {
        return CopyOutcome::NoValidData;
    };
    match clipboard.set_text(&text) {
        Ok(()) => {
            log::info!("copied mean {text} to clipboard");
            CopyOutcome::Copied(text)
        }
        Err(e) => {
            log::warn!("copy failed: {e}");
            CopyOutcome::Failed(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Status hint with its own expiry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintTone {
    Affirmative,
    Negative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusHint {
    pub text: &'static str,
    pub tone: HintTone,
    /// Copied value or failure reason, shown on hover.
    pub detail: Option<String>,
    expires_at: Instant,
}

impl StatusHint {
    pub fn for_outcome(outcome: &CopyOutcome, now: Instant, ttl: Duration) -> Self {
        let (text, tone, detail) = match outcome {
            CopyOutcome::Copied(value) => ("Copied", HintTone::Affirmative, Some(value.clone())),
            CopyOutcome::NoValidData => ("No valid data", HintTone::Negative, None),
            CopyOutcome::Failed(reason) => ("Copy failed", HintTone::Negative, Some(reason.clone())),
        };
        Self {
            text,
            tone,
            detail,
            expires_at: now + ttl,
        }
    }
}

/// Holds at most one hint. Setting a hint replaces the previous one together
/// with its deadline, so an older deadline can never clear a newer hint.
#[derive(Debug, Clone)]
pub struct HintSlot {
    current: Option<StatusHint>,
    ttl: Duration,
}

impl HintSlot {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn show(&mut self, outcome: &CopyOutcome, now: Instant) {
        self.current = Some(StatusHint::for_outcome(outcome, now, self.ttl));
    }

    /// Drop the hint once its deadline has passed. Returns the time left
    /// until the visible hint expires, for scheduling the next repaint.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        let expires_at = self.current.as_ref()?.expires_at;
        if now >= expires_at {
            self.current = None;
            None
        } else {
            Some(expires_at - now)
        }
    }

    pub fn current(&self) -> Option<&StatusHint> {
        self.current.as_ref()
    }
}

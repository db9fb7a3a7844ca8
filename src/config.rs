use std::time::Duration;

// ---------------------------------------------------------------------------
// Analyzer configuration
// ---------------------------------------------------------------------------

/// Compile-time defaults for the selection and the UI shell.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Width of the selection created when a column is loaded, in samples.
    pub default_span: usize,

    /// Distance (in index units) within which a press grabs an edge.
    /// Not scaled with zoom.
    pub edge_tolerance: f64,

    /// How long a copy hint stays visible.
    pub hint_ttl: Duration,

    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_span: 20_000,
            edge_tolerance: 1000.0,
            hint_ttl: Duration::from_secs(3),
            window_size: [1000.0, 700.0],
            min_window_size: [600.0, 400.0],
        }
    }
}

//! Public types and constants for the dashboard renderer.

/// Sequential color ramps used by the panel specifications. Each chart in the
/// catalog is pinned to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Plasma,
    Greens,
    Reds,
    Purples,
    Oranges,
    Blues,
    YlOrRd,
}

/// Default size of one panel slot in pixels.
pub const DEFAULT_PANEL_WIDTH: u32 = 640;
pub const DEFAULT_PANEL_HEIGHT: u32 = 420;

/// How one page render went: which panels drew and which failed.
///
/// Panels are independent; a failure in one never aborts the others. The
/// failed slot carries a notice instead of a chart.
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    pub rendered: Vec<crate::models::ChartKind>,
    pub failures: Vec<PanelFailure>,
}

#[derive(Debug, Clone)]
pub struct PanelFailure {
    pub kind: crate::models::ChartKind,
    pub reason: String,
}

/// Page-level rendering knobs.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub panel_width: u32,
    pub panel_height: u32,
    /// Locale tag (`en`, `de`, ...) controlling the grouping separators used
    /// on money axes.
    pub locale: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            panel_width: DEFAULT_PANEL_WIDTH,
            panel_height: DEFAULT_PANEL_HEIGHT,
            locale: "en".to_string(),
        }
    }
}

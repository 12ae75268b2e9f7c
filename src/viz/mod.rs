//! Dashboard rendering: compose the selected chart panels into one page.
//!
//! - Backend chosen by output extension (`.svg` → SVG, anything else bitmap)
//! - Row-major grid sized from the layout plan (`columns x panel_width` by
//!   `rows x panel_height`)
//! - Panels are independent: a failing panel is reported in the
//!   [`RenderReport`] and replaced by a notice, the rest still draw
//! - Sequential palettes per panel, locale-aware tick labels

pub mod panels;
mod polar;
mod sankey;
pub mod types;
pub mod util;

pub use types::{
    DEFAULT_PANEL_HEIGHT, DEFAULT_PANEL_WIDTH, Palette, PanelFailure, RenderOptions, RenderReport,
};

use crate::layout::LayoutPlan;
use crate::load::Dataset;
use crate::models::Selection;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

/// One-time registration of a "sans-serif" face for the `ab_glyph` text path,
/// which does not discover OS fonts on its own. The face is read from
/// `SALESDASH_FONT` or a list of well-known system locations.
static INIT_FONTS: Once = Once::new();
static FONTS_AVAILABLE: AtomicBool = AtomicBool::new(false);

fn load_system_font() -> Option<Vec<u8>> {
    if let Ok(path) = std::env::var("SALESDASH_FONT")
        && let Ok(bytes) = std::fs::read(&path)
    {
        return Some(bytes);
    }
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial Unicode.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    for path in CANDIDATES {
        if let Ok(bytes) = std::fs::read(path) {
            return Some(bytes);
        }
    }
    None
}

/// Safe to call many times; only does work once. Returns whether a face is
/// registered — without one, panels keep their geometry but lose labels.
pub fn ensure_fonts_registered() -> bool {
    INIT_FONTS.call_once(|| {
        if let Some(bytes) = load_system_font() {
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if plotters::style::register_font(
                "sans-serif",
                plotters::style::FontStyle::Normal,
                bytes,
            )
            .is_ok()
            {
                FONTS_AVAILABLE.store(true, Ordering::Relaxed);
            }
        }
    });
    FONTS_AVAILABLE.load(Ordering::Relaxed)
}

/// Render the selected charts into a single page at `out_path`.
///
/// Validates the selection (an empty one is the typed nothing-selected
/// condition), plans the row-major grid, aggregates each chart fresh from
/// `dataset`, and draws panel by panel. Returns which panels rendered and
/// which failed; a single bad panel never aborts the page.
pub fn render_dashboard<P: AsRef<Path>>(
    dataset: &Dataset,
    selection: &Selection,
    out_path: P,
    options: &RenderOptions,
) -> Result<RenderReport> {
    let plan = LayoutPlan::new(selection)?;
    ensure_fonts_registered();

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let width = options.panel_width * plan.columns() as u32;
    let height = options.panel_height * plan.row_count() as u32;

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_page(root, dataset, &plan, options)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_page(root, dataset, &plan, options)
    }
}

fn draw_page<DB>(
    root: DrawingArea<DB, Shift>,
    dataset: &Dataset,
    plan: &LayoutPlan,
    options: &RenderOptions,
) -> Result<RenderReport>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let cells = root.split_evenly((plan.row_count(), plan.columns()));
    let locale = util::map_locale(&options.locale);

    let mut report = RenderReport::default();
    for (kind, row, col) in plan.slots() {
        let cell = &cells[row * plan.columns() + col];
        let data = kind.aggregate(dataset);
        match panels::draw_panel(kind, &data, cell, locale) {
            Ok(()) => report.rendered.push(kind),
            Err(err) => {
                let reason = err.to_string();
                let (w, h) = cell.dim_in_pixel();
                let _ = cell.draw(&Text::new(
                    format!("{} unavailable", kind.title()),
                    (w as i32 / 2 - 60, h as i32 / 2),
                    (FontFamily::SansSerif, 12).into_font().color(&RED),
                ));
                report.failures.push(PanelFailure { kind, reason });
            }
        }
    }
    root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(report)
}

//! Utility functions for the renderer: colors, scaling, locale mapping.

use super::types::Palette;
use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

/// Microsoft Office (2013+) chart series palette, used for categorical
/// dimensions (product lines in the bubble panels).
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a categorical color from the Office palette.
#[inline]
pub fn series_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Endpoints of each sequential ramp (light end, saturated end).
fn ramp(palette: Palette) -> ((u8, u8, u8), (u8, u8, u8)) {
    match palette {
        Palette::Plasma => ((13, 8, 135), (240, 249, 33)),
        Palette::Greens => ((229, 245, 224), (0, 109, 44)),
        Palette::Reds => ((254, 224, 210), (165, 15, 21)),
        Palette::Purples => ((239, 237, 245), (84, 39, 143)),
        Palette::Oranges => ((254, 230, 206), (166, 54, 3)),
        Palette::Blues => ((222, 235, 247), (8, 81, 156)),
        Palette::YlOrRd => ((255, 255, 178), (189, 0, 38)),
    }
}

/// Sample a sequential ramp at `t` in `[0, 1]`.
pub fn sample(palette: Palette, t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let (lo, hi) = ramp(palette);
    let lerp = |a: u8, b: u8| -> u8 { (f64::from(a) + (f64::from(b) - f64::from(a)) * t) as u8 };
    RGBColor(lerp(lo.0, hi.0), lerp(lo.1, hi.1), lerp(lo.2, hi.2))
}

/// Spread N categories across a ramp, avoiding the washed-out light end.
pub fn sample_rank(palette: Palette, idx: usize, total: usize) -> RGBColor {
    let t = if total <= 1 {
        0.75
    } else {
        0.25 + 0.7 * (idx as f64 / (total - 1) as f64)
    };
    sample(palette, t)
}

/// Pick a single axis scale and its label based on the overall magnitude.
/// Returns (scale, label), e.g. `(1e6, "millions")`.
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "trillions")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "billions")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "millions")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "thousands")
    } else {
        (1.0, "")
    }
}

/// Format an axis tick: grouped integers for large magnitudes, short
/// decimals below that.
pub fn fmt_tick(v: f64, locale: &'static Locale) -> String {
    let a = v.abs();
    if a >= 1000.0 {
        (v.round() as i64).to_formatted_string(locale)
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else if a >= 10.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}

/// Compact value label for heatmap cells: `12.3k`, `1.2M`, plain below 1000.
pub fn fmt_compact(v: f64) -> String {
    let a = v.abs();
    if a >= 1.0e6 {
        format!("{:.1}M", v / 1.0e6)
    } else if a >= 1.0e3 {
        format!("{:.1}k", v / 1.0e3)
    } else if a >= 10.0 {
        format!("{v:.0}")
    } else if a == 0.0 {
        "0".to_string()
    } else {
        format!("{v:.1}")
    }
}

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `de`, `fr`, `es`, `it`, `pt`,
/// `nl` and their region-qualified variants. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// Pad a max value so the tallest mark does not touch the frame.
pub fn headroom(max: f64) -> f64 {
    if max <= 0.0 { 1.0 } else { max * 1.08 }
}

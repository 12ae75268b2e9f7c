//! Flow-diagram (Sankey-style) drawing: two node columns and weighted bands.

use crate::agg::SalesFlows;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::util::series_color;

const BAR_W: i32 = 14;
const NODE_PAD: i32 = 6;
const LABEL_FONT: u32 = 11;

/// Draw the country-to-product-line flows into `area` (pixel coordinates).
/// Band thickness is proportional to the summed sales carried by the edge.
pub(crate) fn draw_flows<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    flows: &SalesFlows,
) -> Result<()> {
    if flows.links.is_empty() {
        return Ok(());
    }
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);

    let sources = flows.country_count;
    let targets = flows.nodes.len() - sources;

    // Per-node throughput on each side.
    let mut out_totals = vec![0.0f64; sources];
    let mut in_totals = vec![0.0f64; targets];
    for link in &flows.links {
        out_totals[link.source] += link.value;
        in_totals[link.target - sources] += link.value;
    }
    let total: f64 = out_totals.iter().sum();
    if total <= 0.0 {
        return Ok(());
    }

    let usable = |count: usize| (h - NODE_PAD * (count.saturating_sub(1)) as i32 - 8).max(1) as f64;
    let left_scale = usable(sources) / total;
    let right_scale = usable(targets) / total;

    let left_x = 4;
    let right_x = w - 4 - BAR_W;

    // Stack node bars top-down and remember each band's running offset.
    let mut left_tops = vec![0i32; sources];
    let mut y = 4;
    for (i, t) in out_totals.iter().enumerate() {
        left_tops[i] = y;
        let bar_h = ((t * left_scale).round() as i32).max(1);
        area.draw(&Rectangle::new(
            [(left_x, y), (left_x + BAR_W, y + bar_h)],
            series_color(i).filled(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let _ = area.draw(&Text::new(
            flows.nodes[i].clone(),
            (left_x + BAR_W + 4, y + bar_h / 2 - LABEL_FONT as i32 / 2),
            (FontFamily::SansSerif, LABEL_FONT).into_font().color(&BLACK),
        ));
        y += bar_h + NODE_PAD;
    }

    let mut right_tops = vec![0i32; targets];
    let mut y = 4;
    for (j, t) in in_totals.iter().enumerate() {
        right_tops[j] = y;
        let bar_h = ((t * right_scale).round() as i32).max(1);
        area.draw(&Rectangle::new(
            [(right_x, y), (right_x + BAR_W, y + bar_h)],
            RGBColor(120, 120, 120).filled(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let label = flows.nodes[sources + j].clone();
        let est_w = label.len() as i32 * (LABEL_FONT as i32 * 6 / 10);
        let _ = area.draw(&Text::new(
            label,
            (right_x - 4 - est_w, y + bar_h / 2 - LABEL_FONT as i32 / 2),
            (FontFamily::SansSerif, LABEL_FONT).into_font().color(&BLACK),
        ));
        y += bar_h + NODE_PAD;
    }

    // Bands, in the links' sorted order so offsets accumulate consistently.
    let mut left_off = left_tops.clone();
    let mut right_off = right_tops.clone();
    for link in &flows.links {
        let s = link.source;
        let t = link.target - sources;
        let s_th = ((link.value * left_scale).round() as i32).max(1);
        let t_th = ((link.value * right_scale).round() as i32).max(1);
        let quad = vec![
            (left_x + BAR_W, left_off[s]),
            (right_x, right_off[t]),
            (right_x, right_off[t] + t_th),
            (left_x + BAR_W, left_off[s] + s_th),
        ];
        area.draw(&Polygon::new(quad, series_color(s).mix(0.35).filled()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        left_off[s] += s_th;
        right_off[t] += t_th;
    }
    Ok(())
}

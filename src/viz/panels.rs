//! Per-chart drawing routines. One function per catalog entry, each taking
//! the chart's derived table by reference plus its fixed visual specification
//! (palette, axis mapping, reference lines), drawing into one panel slot.
//!
//! Drawers never mutate the tables they receive. An empty table draws an
//! empty panel, not an error.

use anyhow::{Result, bail};
use num_format::Locale;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::{DashedLineSeries, LineSeries};
use std::collections::BTreeSet;

use crate::agg::{
    CategoryCount, CategoryDistribution, CategoryValue, ChartData, CustomerActivity,
    CustomerBehavior, MonthlySales, OrderEconomics, ProductQuantity, SalesFlows, SalesMatrix,
};
use crate::models::ChartKind;

use super::polar;
use super::sankey;
use super::types::Palette;
use super::util::{
    choose_axis_scale, fmt_compact, fmt_tick, headroom, sample, sample_rank, series_color,
};

/// Route one panel to its drawing routine. The table must be the one this
/// chart's aggregation produced.
pub(crate) fn draw_panel<DB: DrawingBackend>(
    kind: ChartKind,
    data: &ChartData,
    area: &DrawingArea<DB, Shift>,
    locale: &'static Locale,
) -> Result<()> {
    match (kind, data) {
        (ChartKind::MonthlySalesTrend, ChartData::MonthlySales(t)) => monthly_trend(area, t, locale),
        (ChartKind::ProductLineSales, ChartData::ProductLineSales(t)) => {
            vertical_bars(area, ChartKind::ProductLineSales, t, Palette::Greens, locale)
        }
        (ChartKind::CustomerBehavior, ChartData::CustomerBehavior(t)) => {
            behavior_scatter(area, t, locale)
        }
        (ChartKind::CountrySales, ChartData::CountrySales(t)) => country_ranking(area, t, locale),
        (ChartKind::PriceByDealSize, ChartData::PriceByDealSize(t)) => price_boxes(area, t, locale),
        (ChartKind::ProductQuantityHeatmap, ChartData::ProductQuantity(t)) => {
            product_heatmap(area, t)
        }
        (ChartKind::ProductLineRadar, ChartData::MeanSalesByProductLine(t)) => {
            radar_panel(area, ChartKind::ProductLineRadar, t, RGBColor(0, 191, 255))
        }
        (ChartKind::DealSizeSales, ChartData::DealSizeSales(t)) => {
            vertical_bars(area, ChartKind::DealSizeSales, t, Palette::Greens, locale)
        }
        (ChartKind::StatusBreakdown, ChartData::StatusCounts(t)) => status_pie(area, t),
        (ChartKind::CustomerLifecycle, ChartData::CustomerRecency(t)) => {
            lifecycle_bubbles(area, t, locale)
        }
        (ChartKind::CountryProductMatrix, ChartData::CountryProductMatrix(t)) => {
            matrix_heatmap(area, t)
        }
        (ChartKind::UnitEconomics, ChartData::UnitEconomics(t)) => economics_bubbles(area, t, locale),
        (ChartKind::RepurchaseCycle, ChartData::RepurchaseCycle(t)) => {
            radar_panel(area, ChartKind::RepurchaseCycle, t, RGBColor(99, 110, 250))
        }
        (ChartKind::CountryProductFlows, ChartData::CountryProductFlows(t)) => flow_panel(area, t),
        (ChartKind::DealSizePotential, ChartData::DealSizePotential(t)) => {
            potential_scatter(area, t, locale)
        }
        (kind, _) => bail!("table does not match panel {}", kind.id()),
    }
}

fn caption_for(kind: ChartKind) -> String {
    format!("{}. {}", kind.id(), kind.title())
}

fn axis_desc(base: &str, scale_word: &str) -> String {
    if scale_word.is_empty() {
        base.to_string()
    } else {
        format!("{base} ({scale_word})")
    }
}

/// Tick formatter for category axes: label integer positions, blank the rest.
fn label_at(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 0.3 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

/// Title plus a centered notice for charts whose aggregation came back empty.
/// Text failures are ignored so a fontless environment still yields a page.
fn empty_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, kind: ChartKind) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let _ = area.draw(&Text::new(
        caption_for(kind),
        (6, 4),
        (FontFamily::SansSerif, 14).into_font().color(&BLACK),
    ));
    let _ = area.draw(&Text::new(
        "no data to display".to_string(),
        (w as i32 / 2 - 50, h as i32 / 2),
        (FontFamily::SansSerif, 12).into_font().color(&RGBColor(120, 120, 120)),
    ));
    Ok(())
}

/// Pixel-space panels draw their caption directly; a missing font must not
/// take the geometry down with it.
fn pixel_caption<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, kind: ChartKind) {
    let _ = area.draw(&Text::new(
        caption_for(kind),
        (6, 4),
        (FontFamily::SansSerif, 14).into_font().color(&BLACK),
    ));
}

/// Chart 1: monthly sales line with markers and a dashed mean reference.
fn monthly_trend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &MonthlySales,
    locale: &'static Locale,
) -> Result<()> {
    if table.points.is_empty() {
        return empty_panel(area, ChartKind::MonthlySalesTrend);
    }
    let n = table.points.len();
    let max = table.points.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let (scale, word) = choose_axis_scale(max);
    let labels: Vec<String> = table.points.iter().map(|(m, _)| m.to_string()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(caption_for(ChartKind::MonthlySalesTrend), (FontFamily::SansSerif, 16))
        .margin(8)
        .x_label_area_size(26)
        .y_label_area_size(52)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), 0.0..headroom(max) / scale)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let x_fmt = |x: &f64| label_at(&labels, *x);
    let y_fmt = |v: &f64| fmt_tick(*v, locale);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.min(8))
        .y_labels(6)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .y_desc(axis_desc("Sales", word))
        .label_style((FontFamily::SansSerif, 11))
        .axis_desc_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let line_color = sample(Palette::Plasma, 0.25);
    chart
        .draw_series(LineSeries::new(
            table
                .points
                .iter()
                .enumerate()
                .map(|(i, (_, v))| (i as f64, v / scale)),
            line_color.stroke_width(2),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    chart
        .draw_series(table.points.iter().enumerate().map(|(i, (_, v))| {
            Circle::new((i as f64, v / scale), 3, line_color.filled())
        }))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    if let Some(mean) = table.mean {
        let orange = RGBColor(255, 165, 0);
        chart
            .draw_series(DashedLineSeries::new(
                [(-0.5, mean / scale), (n as f64 - 0.5, mean / scale)],
                6,
                4,
                orange.stroke_width(1),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let _ = chart.draw_series(std::iter::once(Text::new(
            "average".to_string(),
            (-0.3, mean / scale * 1.03),
            (FontFamily::SansSerif, 11).into_font().color(&orange),
        )));
    }
    Ok(())
}

/// Charts 2 and 8: one bar per category, colored along a ramp.
fn vertical_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    kind: ChartKind,
    rows: &[CategoryValue],
    palette: Palette,
    locale: &'static Locale,
) -> Result<()> {
    if rows.is_empty() {
        return empty_panel(area, kind);
    }
    let n = rows.len();
    let max = rows.iter().map(|c| c.value).fold(0.0, f64::max);
    let (scale, word) = choose_axis_scale(max);
    let labels: Vec<String> = rows.iter().map(|c| c.label.clone()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(caption_for(kind), (FontFamily::SansSerif, 16))
        .margin(8)
        .x_label_area_size(26)
        .y_label_area_size(52)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), 0.0..headroom(max) / scale)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let x_fmt = |x: &f64| label_at(&labels, *x);
    let y_fmt = |v: &f64| fmt_tick(*v, locale);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .y_labels(6)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .y_desc(axis_desc("Sales", word))
        .label_style((FontFamily::SansSerif, 11))
        .axis_desc_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    chart
        .draw_series(rows.iter().enumerate().map(|(i, c)| {
            Rectangle::new(
                [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, c.value / scale)],
                sample_rank(palette, i, n).filled(),
            )
        }))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

/// Chart 3: per-customer scatter with dashed mean cross-hairs and the fitted
/// trend line.
fn behavior_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &CustomerBehavior,
    locale: &'static Locale,
) -> Result<()> {
    if table.customers.is_empty() {
        return empty_panel(area, ChartKind::CustomerBehavior);
    }
    let n = table.customers.len();
    let max_q = table
        .customers
        .iter()
        .map(|c| c.quantity_ordered)
        .fold(0.0, f64::max);
    let max_s = table.customers.iter().map(|c| c.sales).fold(0.0, f64::max);
    let (scale, word) = choose_axis_scale(max_s);

    let mut chart = ChartBuilder::on(area)
        .caption(caption_for(ChartKind::CustomerBehavior), (FontFamily::SansSerif, 16))
        .margin(8)
        .x_label_area_size(26)
        .y_label_area_size(52)
        .build_cartesian_2d(0.0..headroom(max_q), 0.0..headroom(max_s) / scale)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let y_fmt = |v: &f64| fmt_tick(*v, locale);
    chart
        .configure_mesh()
        .x_labels(7)
        .y_labels(6)
        .y_label_formatter(&y_fmt)
        .x_desc("Quantity ordered")
        .y_desc(axis_desc("Sales", word))
        .label_style((FontFamily::SansSerif, 11))
        .axis_desc_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    chart
        .draw_series(table.customers.iter().enumerate().map(|(i, c)| {
            Circle::new(
                (c.quantity_ordered, c.sales / scale),
                4,
                sample_rank(Palette::Reds, i, n).mix(0.85).filled(),
            )
        }))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    if let (Some(mean_q), Some(mean_s)) = (table.mean_quantity, table.mean_sales) {
        chart
            .draw_series(DashedLineSeries::new(
                [(0.0, mean_s / scale), (headroom(max_q), mean_s / scale)],
                5,
                4,
                BLACK.stroke_width(1),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        chart
            .draw_series(DashedLineSeries::new(
                [(mean_q, 0.0), (mean_q, headroom(max_s) / scale)],
                5,
                4,
                BLACK.stroke_width(1),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    if let Some(trend) = table.trend {
        let x0 = 0.0;
        let x1 = headroom(max_q);
        chart
            .draw_series(LineSeries::new(
                [(x0, trend.at(x0) / scale), (x1, trend.at(x1) / scale)],
                series_color(0).stroke_width(2),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Chart 4: countries ranked by total sales as horizontal bars (the
/// geographic stand-in; there is no map backend here).
fn country_ranking<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[CategoryValue],
    locale: &'static Locale,
) -> Result<()> {
    if rows.is_empty() {
        return empty_panel(area, ChartKind::CountrySales);
    }
    let mut ranked: Vec<&CategoryValue> = rows.iter().collect();
    ranked.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal));
    let n = ranked.len();
    let max = ranked.last().map(|c| c.value).unwrap_or(0.0);
    let (scale, word) = choose_axis_scale(max);

    let mut chart = ChartBuilder::on(area)
        .caption(caption_for(ChartKind::CountrySales), (FontFamily::SansSerif, 16))
        .margin(8)
        .x_label_area_size(26)
        .y_label_area_size(10)
        .build_cartesian_2d(0.0..headroom(max) / scale, 0.0..n as f64)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let x_fmt = |v: &f64| fmt_tick(*v, locale);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(0)
        .x_labels(6)
        .x_label_formatter(&x_fmt)
        .x_desc(axis_desc("Sales", word))
        .label_style((FontFamily::SansSerif, 11))
        .axis_desc_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    chart
        .draw_series(ranked.iter().enumerate().map(|(i, c)| {
            let t = if max > 0.0 { c.value / max } else { 0.0 };
            Rectangle::new(
                [(0.0, i as f64 + 0.12), (c.value / scale, i as f64 + 0.88)],
                sample(Palette::Purples, 0.25 + 0.7 * t).filled(),
            )
        }))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    // Country names inside the bar track; largest ends up on top.
    let _ = chart.draw_series(ranked.iter().enumerate().map(|(i, c)| {
        Text::new(
            c.label.clone(),
            (headroom(max) / scale * 0.01, i as f64 + 0.3),
            (FontFamily::SansSerif, 10).into_font().color(&BLACK),
        )
    }));
    Ok(())
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let h = p * (sorted.len() - 1) as f64;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[lo]
    }
}

/// Chart 5: box-and-whisker of unit prices per deal-size category.
fn price_boxes<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[CategoryDistribution],
    locale: &'static Locale,
) -> Result<()> {
    if rows.is_empty() || rows.iter().all(|r| r.values.is_empty()) {
        return empty_panel(area, ChartKind::PriceByDealSize);
    }
    let n = rows.len();
    let max = rows
        .iter()
        .flat_map(|r| r.values.iter())
        .copied()
        .fold(0.0, f64::max);
    let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(caption_for(ChartKind::PriceByDealSize), (FontFamily::SansSerif, 16))
        .margin(8)
        .x_label_area_size(26)
        .y_label_area_size(44)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), 0.0..headroom(max))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let x_fmt = |x: &f64| label_at(&labels, *x);
    let y_fmt = |v: &f64| fmt_tick(*v, locale);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .y_labels(6)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .y_desc("Unit price")
        .label_style((FontFamily::SansSerif, 11))
        .axis_desc_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    for (i, row) in rows.iter().enumerate() {
        if row.values.is_empty() {
            continue;
        }
        let mut sorted = row.values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let (lo, hi) = (sorted[0], sorted[sorted.len() - 1]);
        let q1 = percentile(&sorted, 0.25);
        let med = percentile(&sorted, 0.5);
        let q3 = percentile(&sorted, 0.75);
        let x = i as f64;
        let color = sample_rank(Palette::Oranges, i, n);

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, lo), (x, hi)],
                color.stroke_width(1),
            )))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        for cap in [lo, hi] {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x - 0.12, cap), (x + 0.12, cap)],
                    color.stroke_width(1),
                )))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - 0.25, q1), (x + 0.25, q3)],
                color.mix(0.45).filled(),
            )))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - 0.25, q1), (x + 0.25, q3)],
                color.stroke_width(1),
            )))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x - 0.25, med), (x + 0.25, med)],
                BLACK.stroke_width(2),
            )))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Chart 6: quantity heatmap over (product code, product line), drawn as a
/// raw pixel grid. Codes are too many to label.
fn product_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cells: &[ProductQuantity],
) -> Result<()> {
    if cells.is_empty() {
        return empty_panel(area, ChartKind::ProductQuantityHeatmap);
    }
    pixel_caption(area, ChartKind::ProductQuantityHeatmap);

    let codes: Vec<&str> = {
        let set: BTreeSet<&str> = cells.iter().map(|c| c.product_code.as_str()).collect();
        set.into_iter().collect()
    };
    let lines: Vec<&str> = {
        let set: BTreeSet<&str> = cells.iter().map(|c| c.product_line.as_str()).collect();
        set.into_iter().collect()
    };
    let max = cells.iter().map(|c| c.quantity).max().unwrap_or(0) as f64;

    let (w, h) = area.dim_in_pixel();
    let (left, top, right, bottom) = (100i32, 26i32, 6i32, 6i32);
    let grid_w = (w as i32 - left - right).max(1);
    let grid_h = (h as i32 - top - bottom).max(1);
    let cell_w = grid_w as f64 / codes.len() as f64;
    let cell_h = grid_h as f64 / lines.len() as f64;

    let code_index: ahash::AHashMap<&str, usize> =
        codes.iter().enumerate().map(|(i, c)| (*c, i)).collect();
    let line_index: ahash::AHashMap<&str, usize> =
        lines.iter().enumerate().map(|(i, l)| (*l, i)).collect();

    for cell in cells {
        let cx = code_index[cell.product_code.as_str()];
        let cy = line_index[cell.product_line.as_str()];
        let t = if max > 0.0 { cell.quantity as f64 / max } else { 0.0 };
        let x0 = left + (cx as f64 * cell_w) as i32;
        let y0 = top + (cy as f64 * cell_h) as i32;
        let x1 = left + ((cx + 1) as f64 * cell_w) as i32;
        let y1 = top + ((cy + 1) as f64 * cell_h) as i32;
        area.draw(&Rectangle::new(
            [(x0, y0), (x1.max(x0 + 1), y1.max(y0 + 1))],
            sample(Palette::YlOrRd, t).filled(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    for (i, line) in lines.iter().enumerate() {
        let _ = area.draw(&Text::new(
            (*line).to_string(),
            (4, top + (i as f64 * cell_h + cell_h / 2.0) as i32 - 5),
            (FontFamily::SansSerif, 10).into_font().color(&BLACK),
        ));
    }
    Ok(())
}

/// Charts 7 and 13: radar over one value per product line.
fn radar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    kind: ChartKind,
    rows: &[CategoryValue],
    color: RGBColor,
) -> Result<()> {
    if rows.is_empty() {
        return empty_panel(area, kind);
    }
    pixel_caption(area, kind);

    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let cx = w / 2;
    let cy = h / 2 + 8;
    let radius = (w.min(h) / 2 - 40).max(10) as f64;
    let n = rows.len();
    let max = rows.iter().map(|r| r.value).fold(0.0, f64::max);

    let grid = RGBColor(200, 200, 200);
    for step in 1..=4 {
        let r = radius * step as f64 / 4.0;
        let ring: Vec<(i32, i32)> = (0..=36)
            .map(|s| {
                let a = 2.0 * std::f64::consts::PI * s as f64 / 36.0;
                (cx + (r * a.cos()) as i32, cy + (r * a.sin()) as i32)
            })
            .collect();
        area.draw(&PathElement::new(ring, grid.stroke_width(1)))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    for i in 0..n {
        let tip = polar::spoke_point(cx, cy, radius, i, n);
        area.draw(&PathElement::new(vec![(cx, cy), tip], grid.stroke_width(1)))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let (lx, ly) = polar::spoke_point(cx, cy, radius + 14.0, i, n);
        let _ = area.draw(&Text::new(
            rows[i].label.clone(),
            (lx - rows[i].label.len() as i32 * 3, ly - 5),
            (FontFamily::SansSerif, 10).into_font().color(&BLACK),
        ));
    }

    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let ring = polar::radar_ring(cx, cy, radius, &values, max);
    area.draw(&Polygon::new(ring.clone(), color.mix(0.6).filled()))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let mut outline = ring;
    if let Some(first) = outline.first().copied() {
        outline.push(first);
    }
    area.draw(&PathElement::new(outline, color.stroke_width(2)))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

/// Chart 9: pie of order statuses with a dotted legend.
fn status_pie<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[CategoryCount],
) -> Result<()> {
    let total: usize = rows.iter().map(|r| r.count).sum();
    if total == 0 {
        return empty_panel(area, ChartKind::StatusBreakdown);
    }
    pixel_caption(area, ChartKind::StatusBreakdown);

    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let cx = w * 32 / 100;
    let cy = h / 2 + 8;
    let radius = ((w * 3 / 5).min(h) / 2 - 30).max(10) as f64;

    let n = rows.len();
    let mut frac = 0.0f64;
    for (i, row) in rows.iter().enumerate() {
        let share = row.count as f64 / total as f64;
        let wedge = polar::wedge(cx, cy, radius, frac, frac + share);
        area.draw(&Polygon::new(
            wedge,
            sample_rank(Palette::Reds, i, n).filled(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        frac += share;
    }
    for (i, row) in rows.iter().enumerate() {
        let y = 36 + i as i32 * 16;
        area.draw(&Circle::new(
            (w * 62 / 100, y + 5),
            4,
            sample_rank(Palette::Reds, i, n).filled(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let _ = area.draw(&Text::new(
            format!("{} ({})", row.label, row.count),
            (w * 62 / 100 + 10, y),
            (FontFamily::SansSerif, 11).into_font().color(&BLACK),
        ));
    }
    Ok(())
}

/// Chart 10: recency vs lifetime sales, bubble size and shade by sales.
fn lifecycle_bubbles<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[CustomerActivity],
    locale: &'static Locale,
) -> Result<()> {
    if rows.is_empty() {
        return empty_panel(area, ChartKind::CustomerLifecycle);
    }
    let max_days = rows.iter().map(|r| r.days_since_last).max().unwrap_or(0) as f64;
    let max_sales = rows.iter().map(|r| r.total_sales).fold(0.0, f64::max);
    let (scale, word) = choose_axis_scale(max_sales);

    let mut chart = ChartBuilder::on(area)
        .caption(caption_for(ChartKind::CustomerLifecycle), (FontFamily::SansSerif, 16))
        .margin(8)
        .x_label_area_size(26)
        .y_label_area_size(52)
        .build_cartesian_2d(0.0..headroom(max_days), 0.0..headroom(max_sales) / scale)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let y_fmt = |v: &f64| fmt_tick(*v, locale);
    chart
        .configure_mesh()
        .x_labels(7)
        .y_labels(6)
        .y_label_formatter(&y_fmt)
        .x_desc("Days since last order")
        .y_desc(axis_desc("Total sales", word))
        .label_style((FontFamily::SansSerif, 11))
        .axis_desc_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    chart
        .draw_series(rows.iter().map(|r| {
            let t = if max_sales > 0.0 { r.total_sales / max_sales } else { 0.0 };
            let r_px = (3.0 + 11.0 * t.sqrt()) as i32;
            Circle::new(
                (r.days_since_last as f64, r.total_sales / scale),
                r_px,
                sample(Palette::Blues, 0.3 + 0.7 * t).mix(0.8).filled(),
            )
        }))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

/// Chart 11: country x product-line cross-tab with in-cell values.
fn matrix_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    matrix: &SalesMatrix,
) -> Result<()> {
    if matrix.countries.is_empty() || matrix.product_lines.is_empty() {
        return empty_panel(area, ChartKind::CountryProductMatrix);
    }
    pixel_caption(area, ChartKind::CountryProductMatrix);

    let max = matrix.max_cell();
    let (w, h) = area.dim_in_pixel();
    let (left, top, right, bottom) = (96i32, 26i32, 6i32, 18i32);
    let grid_w = (w as i32 - left - right).max(1);
    let grid_h = (h as i32 - top - bottom).max(1);
    let cols = matrix.product_lines.len();
    let rows = matrix.countries.len();
    let cell_w = grid_w as f64 / cols as f64;
    let cell_h = grid_h as f64 / rows as f64;

    for (r, row) in matrix.cells.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let t = if max > 0.0 { value / max } else { 0.0 };
            let x0 = left + (c as f64 * cell_w) as i32;
            let y0 = top + (r as f64 * cell_h) as i32;
            let x1 = left + ((c + 1) as f64 * cell_w) as i32;
            let y1 = top + ((r + 1) as f64 * cell_h) as i32;
            area.draw(&Rectangle::new(
                [(x0, y0), (x1, y1)],
                sample(Palette::Blues, t).filled(),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            if cell_h >= 11.0 && cell_w >= 30.0 {
                let ink = if t > 0.55 { WHITE } else { BLACK };
                let _ = area.draw(&Text::new(
                    fmt_compact(*value),
                    (x0 + 3, y0 + (cell_h as i32 - 9) / 2),
                    (FontFamily::SansSerif, 9).into_font().color(&ink),
                ));
            }
        }
    }
    for (r, country) in matrix.countries.iter().enumerate() {
        let _ = area.draw(&Text::new(
            country.clone(),
            (4, top + (r as f64 * cell_h + cell_h / 2.0) as i32 - 5),
            (FontFamily::SansSerif, 9).into_font().color(&BLACK),
        ));
    }
    for (c, line) in matrix.product_lines.iter().enumerate() {
        let _ = area.draw(&Text::new(
            line.clone(),
            (left + (c as f64 * cell_w) as i32 + 2, h as i32 - 14),
            (FontFamily::SansSerif, 9).into_font().color(&BLACK),
        ));
    }
    Ok(())
}

/// Chart 12: price vs quantity bubbles sized by revenue, colored by product
/// line, with an inline legend.
fn economics_bubbles<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[OrderEconomics],
    locale: &'static Locale,
) -> Result<()> {
    if rows.is_empty() {
        return empty_panel(area, ChartKind::UnitEconomics);
    }
    let lines: Vec<&str> = {
        let set: BTreeSet<&str> = rows.iter().map(|r| r.product_line.as_str()).collect();
        set.into_iter().collect()
    };
    let max_price = rows.iter().map(|r| r.price_each).fold(0.0, f64::max);
    let max_qty = rows.iter().map(|r| f64::from(r.quantity_ordered)).fold(0.0, f64::max);
    let max_sales = rows.iter().map(|r| r.sales).fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(caption_for(ChartKind::UnitEconomics), (FontFamily::SansSerif, 16))
        .margin(8)
        .x_label_area_size(26)
        .y_label_area_size(44)
        .build_cartesian_2d(0.0..headroom(max_price), 0.0..headroom(max_qty))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let x_fmt = |v: &f64| fmt_tick(*v, locale);
    chart
        .configure_mesh()
        .x_labels(7)
        .y_labels(6)
        .x_label_formatter(&x_fmt)
        .x_desc("Unit price")
        .y_desc("Quantity ordered")
        .label_style((FontFamily::SansSerif, 11))
        .axis_desc_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    chart
        .draw_series(rows.iter().map(|r| {
            let idx = lines
                .iter()
                .position(|l| *l == r.product_line.as_str())
                .unwrap_or(0);
            let t = if max_sales > 0.0 { r.sales / max_sales } else { 0.0 };
            Circle::new(
                (r.price_each, f64::from(r.quantity_ordered)),
                (2.0 + 8.0 * t.sqrt()) as i32,
                series_color(idx).mix(0.55).filled(),
            )
        }))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    // Inline legend, top-right of the plotting area.
    let (w, _) = area.dim_in_pixel();
    for (i, line) in lines.iter().enumerate() {
        let y = 34 + i as i32 * 14;
        let x = w as i32 - 120;
        area.draw(&Circle::new((x, y + 4), 4, series_color(i).filled()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let _ = area.draw(&Text::new(
            (*line).to_string(),
            (x + 10, y),
            (FontFamily::SansSerif, 10).into_font().color(&BLACK),
        ));
    }
    Ok(())
}

/// Chart 14: country to product-line flow bands.
fn flow_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    flows: &SalesFlows,
) -> Result<()> {
    if flows.links.is_empty() {
        return empty_panel(area, ChartKind::CountryProductFlows);
    }
    pixel_caption(area, ChartKind::CountryProductFlows);
    let inner = area.margin(26, 4, 4, 4);
    sankey::draw_flows(&inner, flows)
}

/// Chart 15: strategy quadrant of distinct customers vs mean spend, one
/// labeled marker per deal size.
fn potential_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[crate::agg::DealSizeSummary],
    locale: &'static Locale,
) -> Result<()> {
    if rows.is_empty() {
        return empty_panel(area, ChartKind::DealSizePotential);
    }
    let max_customers = rows.iter().map(|r| r.customers).max().unwrap_or(0) as f64;
    let max_mean = rows.iter().map(|r| r.mean_customer_sales).fold(0.0, f64::max);
    let (scale, word) = choose_axis_scale(max_mean);

    let mut chart = ChartBuilder::on(area)
        .caption(caption_for(ChartKind::DealSizePotential), (FontFamily::SansSerif, 16))
        .margin(8)
        .x_label_area_size(26)
        .y_label_area_size(52)
        .build_cartesian_2d(
            0.0..(max_customers * 1.25 + 1.0),
            0.0..headroom(max_mean) / scale * 1.1,
        )
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let y_fmt = |v: &f64| fmt_tick(*v, locale);
    chart
        .configure_mesh()
        .x_labels(6)
        .y_labels(6)
        .y_label_formatter(&y_fmt)
        .x_desc("Distinct customers")
        .y_desc(axis_desc("Mean customer sales", word))
        .label_style((FontFamily::SansSerif, 11))
        .axis_desc_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    chart
        .draw_series(rows.iter().enumerate().map(|(i, r)| {
            Circle::new(
                (r.customers as f64, r.mean_customer_sales / scale),
                10,
                series_color(i).mix(0.8).filled(),
            )
        }))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let y_nudge = headroom(max_mean) / scale * 0.05;
    let _ = chart.draw_series(rows.iter().map(|r| {
        Text::new(
            r.deal_size.clone(),
            (r.customers as f64, r.mean_customer_sales / scale + y_nudge),
            (FontFamily::SansSerif, 11).into_font().color(&BLACK),
        )
    }));
    Ok(())
}

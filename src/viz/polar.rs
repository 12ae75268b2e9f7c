//! Polar geometry for the radar and pie panels, drawn in pixel coordinates.

use std::f64::consts::PI;

/// Angle of spoke `i` of `n`, starting at twelve o'clock, clockwise.
fn spoke_angle(i: usize, n: usize) -> f64 {
    -PI / 2.0 + 2.0 * PI * i as f64 / n as f64
}

/// Point on the circle around `(cx, cy)` at `radius` for spoke `i` of `n`.
pub(crate) fn spoke_point(cx: i32, cy: i32, radius: f64, i: usize, n: usize) -> (i32, i32) {
    let a = spoke_angle(i, n);
    (
        cx + (radius * a.cos()).round() as i32,
        cy + (radius * a.sin()).round() as i32,
    )
}

/// Closed ring of the radar polygon: one vertex per value, scaled so that
/// `max` sits on the outer radius. A non-positive `max` collapses to the
/// center (flat chart, not a failure).
pub(crate) fn radar_ring(
    cx: i32,
    cy: i32,
    radius: f64,
    values: &[f64],
    max: f64,
) -> Vec<(i32, i32)> {
    let n = values.len();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let r = if max > 0.0 {
                radius * (v / max).clamp(0.0, 1.0)
            } else {
                0.0
            };
            spoke_point(cx, cy, r, i, n)
        })
        .collect()
}

/// Polygon approximating a pie wedge from `frac_start` to `frac_end`
/// (fractions of the full turn, measured from twelve o'clock).
pub(crate) fn wedge(
    cx: i32,
    cy: i32,
    radius: f64,
    frac_start: f64,
    frac_end: f64,
) -> Vec<(i32, i32)> {
    let a0 = -PI / 2.0 + 2.0 * PI * frac_start;
    let a1 = -PI / 2.0 + 2.0 * PI * frac_end;
    // Enough arc segments to look round at panel sizes.
    let steps = (((a1 - a0).abs() / (2.0 * PI) * 72.0).ceil() as usize).max(2);
    let mut pts = Vec::with_capacity(steps + 2);
    pts.push((cx, cy));
    for s in 0..=steps {
        let a = a0 + (a1 - a0) * s as f64 / steps as f64;
        pts.push((
            cx + (radius * a.cos()).round() as i32,
            cy + (radius * a.sin()).round() as i32,
        ));
    }
    pts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_spoke_points_up() {
        let (x, y) = spoke_point(100, 100, 50.0, 0, 5);
        assert_eq!(x, 100);
        assert_eq!(y, 50);
    }

    #[test]
    fn radar_ring_scales_to_max() {
        let ring = radar_ring(0, 0, 100.0, &[50.0, 100.0], 100.0);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring[0], (0, -50));
        assert_eq!(ring[1], (0, 100));
    }

    #[test]
    fn zero_max_collapses_to_center() {
        let ring = radar_ring(10, 20, 100.0, &[0.0, 0.0, 0.0], 0.0);
        assert!(ring.iter().all(|p| *p == (10, 20)));
    }

    #[test]
    fn wedge_is_anchored_at_center() {
        let pts = wedge(5, 5, 10.0, 0.0, 0.25);
        assert_eq!(pts[0], (5, 5));
        assert!(pts.len() >= 4);
    }
}

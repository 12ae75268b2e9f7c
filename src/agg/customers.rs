//! Customer-level rollups: order behavior, recency, repurchase cadence, and
//! deal-size potential.

use super::{CategoryValue, sum_grouped};
use crate::load::Dataset;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals for one customer across all order lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTotals {
    pub customer_name: String,
    pub quantity_ordered: f64,
    pub sales: f64,
}

/// Degree-1 least-squares fit, `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    /// Fit over paired samples. Returns `None` for an empty input; with zero
    /// variance in x the fit degenerates to a flat line through the y mean
    /// rather than failing.
    pub fn fit(points: &[(f64, f64)]) -> Option<TrendLine> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
        let var_x: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
        if var_x <= f64::EPSILON {
            return Some(TrendLine {
                slope: 0.0,
                intercept: mean_y,
            });
        }
        let cov: f64 = points
            .iter()
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();
        let slope = cov / var_x;
        Some(TrendLine {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Per-customer quantity and sales totals, the trend fit over those
/// aggregates, and the mean of each axis (the dashed cross-hairs).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerBehavior {
    pub customers: Vec<CustomerTotals>,
    pub trend: Option<TrendLine>,
    pub mean_quantity: Option<f64>,
    pub mean_sales: Option<f64>,
}

/// Per customer: sum of quantity ordered and sum of sales, with a linear
/// sales-vs-quantity trend fitted over the aggregated points (not raw rows).
pub fn customer_behavior(dataset: &Dataset) -> CustomerBehavior {
    let mut groups: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for r in dataset.records() {
        let e = groups.entry(r.customer_name.clone()).or_insert((0.0, 0.0));
        e.0 += f64::from(r.quantity_ordered);
        e.1 += r.sales;
    }
    let customers: Vec<CustomerTotals> = groups
        .into_iter()
        .map(|(customer_name, (quantity_ordered, sales))| CustomerTotals {
            customer_name,
            quantity_ordered,
            sales,
        })
        .collect();
    let points: Vec<(f64, f64)> = customers
        .iter()
        .map(|c| (c.quantity_ordered, c.sales))
        .collect();
    let n = customers.len() as f64;
    let (mean_quantity, mean_sales) = if customers.is_empty() {
        (None, None)
    } else {
        (
            Some(points.iter().map(|(x, _)| x).sum::<f64>() / n),
            Some(points.iter().map(|(_, y)| y).sum::<f64>() / n),
        )
    };
    CustomerBehavior {
        trend: TrendLine::fit(&points),
        customers,
        mean_quantity,
        mean_sales,
    }
}

/// One customer's most recent order and lifetime sales.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerActivity {
    pub customer_name: String,
    pub last_order: NaiveDate,
    /// Whole days between `last_order` and the dataset's latest order date.
    pub days_since_last: i64,
    pub total_sales: f64,
}

/// Per customer: most recent order date, days elapsed since it relative to
/// the dataset's global maximum order date, and total sales.
pub fn customer_recency(dataset: &Dataset) -> Vec<CustomerActivity> {
    let Some(reference) = dataset.latest_order() else {
        return Vec::new();
    };
    let mut latest: BTreeMap<String, NaiveDate> = BTreeMap::new();
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for r in dataset.records() {
        latest
            .entry(r.customer_name.clone())
            .and_modify(|d| *d = (*d).max(r.order_date))
            .or_insert(r.order_date);
        *totals.entry(r.customer_name.clone()).or_default() += r.sales;
    }
    latest
        .into_iter()
        .map(|(customer_name, last_order)| {
            let total_sales = totals.get(&customer_name).copied().unwrap_or(0.0);
            CustomerActivity {
                days_since_last: (reference - last_order).num_days(),
                customer_name,
                last_order,
                total_sales,
            }
        })
        .collect()
}

/// Average days between repurchases per product line.
///
/// Per (customer, product line) pair the interval is
/// `(max date - min date in days) / max(order count, 1)`; the per-pair values
/// are then averaged per product line. The clamped divisor keeps a
/// single-order pair at zero instead of dividing by zero.
pub fn repurchase_cycle(dataset: &Dataset) -> Vec<CategoryValue> {
    struct PairSpan {
        first: NaiveDate,
        last: NaiveDate,
        orders: usize,
    }
    let mut pairs: BTreeMap<(String, String), PairSpan> = BTreeMap::new();
    for r in dataset.records() {
        let e = pairs
            .entry((r.customer_name.clone(), r.product_line.clone()))
            .or_insert(PairSpan {
                first: r.order_date,
                last: r.order_date,
                orders: 0,
            });
        e.first = e.first.min(r.order_date);
        e.last = e.last.max(r.order_date);
        e.orders += 1;
    }
    let mut per_line: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for ((_, product_line), span) in pairs {
        let days = (span.last - span.first).num_days() as f64;
        let interval = days / span.orders.max(1) as f64;
        let e = per_line.entry(product_line).or_insert((0.0, 0));
        e.0 += interval;
        e.1 += 1;
    }
    per_line
        .into_iter()
        .map(|(label, (sum, n))| CategoryValue {
            label,
            value: sum / n as f64,
        })
        .collect()
}

/// Summary of one deal-size category across customers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealSizeSummary {
    pub deal_size: String,
    /// Number of distinct customers with at least one order in the category.
    pub customers: usize,
    /// Mean of the per-customer sales sums within the category.
    pub mean_customer_sales: f64,
}

/// Per (customer, deal size): sum of sales; then per deal size: distinct
/// customer count and the mean of those per-customer sums.
pub fn deal_size_potential(dataset: &Dataset) -> Vec<DealSizeSummary> {
    let per_pair = sum_grouped(
        dataset.records(),
        |r| (r.deal_size.clone(), r.customer_name.clone()),
        |r| r.sales,
    );
    let mut per_deal: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for ((deal_size, _customer), sales) in per_pair {
        let e = per_deal.entry(deal_size).or_insert((0, 0.0));
        e.0 += 1;
        e.1 += sales;
    }
    per_deal
        .into_iter()
        .map(|(deal_size, (customers, total))| DealSizeSummary {
            deal_size,
            customers,
            mean_customer_sales: total / customers as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agg::testutil::record;

    #[test]
    fn behavior_totals_and_trend() {
        let ds = Dataset::from_records(vec![
            record("01/01/2020", "Acme", "USA", "Cars", "S1", 2, 1.0, 20.0, "Small", "Shipped"),
            record("02/01/2020", "Acme", "USA", "Cars", "S1", 2, 1.0, 20.0, "Small", "Shipped"),
            record("03/01/2020", "Bolt", "USA", "Cars", "S1", 8, 1.0, 80.0, "Small", "Shipped"),
        ]);
        let t = customer_behavior(&ds);
        assert_eq!(t.customers.len(), 2);
        assert_eq!(t.customers[0].customer_name, "Acme");
        assert_eq!(t.customers[0].quantity_ordered, 4.0);
        assert_eq!(t.customers[0].sales, 40.0);
        assert_eq!(t.mean_quantity, Some(6.0));
        assert_eq!(t.mean_sales, Some(60.0));
        // Points (4,40) and (8,80) fit y = 10x exactly.
        let trend = t.trend.unwrap();
        assert!((trend.slope - 10.0).abs() < 1e-9);
        assert!(trend.intercept.abs() < 1e-9);
    }

    #[test]
    fn trend_is_flat_when_quantity_never_varies() {
        let points = vec![(5.0, 10.0), (5.0, 30.0)];
        let fit = TrendLine::fit(&points).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 20.0);
        assert!(TrendLine::fit(&[]).is_none());
    }

    #[test]
    fn recency_measures_from_global_latest_order() {
        let ds = Dataset::from_records(vec![
            record("01/01/2020", "Acme", "USA", "Cars", "S1", 1, 1.0, 10.0, "Small", "Shipped"),
            record("11/01/2020", "Acme", "USA", "Cars", "S1", 1, 1.0, 15.0, "Small", "Shipped"),
            record("31/01/2020", "Bolt", "USA", "Cars", "S1", 1, 1.0, 30.0, "Small", "Shipped"),
        ]);
        let t = customer_recency(&ds);
        assert_eq!(t.len(), 2);
        let acme = &t[0];
        assert_eq!(acme.customer_name, "Acme");
        assert_eq!(acme.last_order.to_string(), "2020-01-11");
        assert_eq!(acme.days_since_last, 20);
        assert_eq!(acme.total_sales, 25.0);
        let bolt = &t[1];
        assert_eq!(bolt.days_since_last, 0);
    }

    #[test]
    fn single_order_pair_has_zero_interval_not_infinity() {
        let ds = Dataset::from_records(vec![record(
            "01/01/2020", "Acme", "USA", "Cars", "S1", 1, 1.0, 10.0, "Small", "Shipped",
        )]);
        let t = repurchase_cycle(&ds);
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].value, 0.0);
        assert!(t[0].value.is_finite());
    }

    #[test]
    fn repurchase_interval_averages_per_line() {
        let ds = Dataset::from_records(vec![
            // Acme/Cars: span 10 days over 2 orders -> 5.0
            record("01/01/2020", "Acme", "USA", "Cars", "S1", 1, 1.0, 1.0, "Small", "Shipped"),
            record("11/01/2020", "Acme", "USA", "Cars", "S1", 1, 1.0, 1.0, "Small", "Shipped"),
            // Bolt/Cars: span 30 days over 3 orders -> 10.0
            record("01/01/2020", "Bolt", "USA", "Cars", "S1", 1, 1.0, 1.0, "Small", "Shipped"),
            record("16/01/2020", "Bolt", "USA", "Cars", "S1", 1, 1.0, 1.0, "Small", "Shipped"),
            record("31/01/2020", "Bolt", "USA", "Cars", "S1", 1, 1.0, 1.0, "Small", "Shipped"),
        ]);
        let t = repurchase_cycle(&ds);
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].label, "Cars");
        assert!((t[0].value - 7.5).abs() < 1e-9);
    }

    #[test]
    fn deal_size_potential_counts_distinct_customers() {
        let ds = Dataset::from_records(vec![
            record("01/01/2020", "Acme", "USA", "Cars", "S1", 1, 1.0, 10.0, "Small", "Shipped"),
            record("02/01/2020", "Acme", "USA", "Cars", "S1", 1, 1.0, 20.0, "Small", "Shipped"),
            record("03/01/2020", "Bolt", "USA", "Cars", "S1", 1, 1.0, 50.0, "Small", "Shipped"),
            record("04/01/2020", "Bolt", "USA", "Cars", "S1", 1, 1.0, 99.0, "Large", "Shipped"),
        ]);
        let t = deal_size_potential(&ds);
        assert_eq!(t.len(), 2);
        let small = t.iter().find(|d| d.deal_size == "Small").unwrap();
        assert_eq!(small.customers, 2);
        // Acme summed to 30, Bolt to 50 -> mean 40.
        assert_eq!(small.mean_customer_sales, 40.0);
        let large = t.iter().find(|d| d.deal_size == "Large").unwrap();
        assert_eq!(large.customers, 1);
        assert_eq!(large.mean_customer_sales, 99.0);
    }
}

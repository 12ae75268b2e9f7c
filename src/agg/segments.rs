//! Rollups over the categorical deal-size and status segments.

use super::{CategoryCount, CategoryDistribution, CategoryValue, category_values, sum_grouped};
use crate::load::Dataset;
use std::collections::BTreeMap;

/// Raw per-row unit prices grouped by deal-size category. A distribution per
/// category, not a scalar; row order within a category follows the file.
pub fn price_by_deal_size(dataset: &Dataset) -> Vec<CategoryDistribution> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in dataset.records() {
        groups
            .entry(r.deal_size.clone())
            .or_default()
            .push(r.price_each);
    }
    groups
        .into_iter()
        .map(|(label, values)| CategoryDistribution { label, values })
        .collect()
}

/// Sum of sales per deal-size category.
pub fn sales_by_deal_size(dataset: &Dataset) -> Vec<CategoryValue> {
    category_values(sum_grouped(
        dataset.records(),
        |r| r.deal_size.clone(),
        |r| r.sales,
    ))
}

/// Count of rows per order status.
pub fn status_counts(dataset: &Dataset) -> Vec<CategoryCount> {
    let mut groups: BTreeMap<String, usize> = BTreeMap::new();
    for r in dataset.records() {
        *groups.entry(r.status.clone()).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|(label, count)| CategoryCount { label, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agg::testutil::record;

    #[test]
    fn prices_stay_unaggregated_per_category() {
        let ds = Dataset::from_records(vec![
            record("01/01/2020", "A", "USA", "Cars", "S1", 1, 35.0, 35.0, "Small", "Shipped"),
            record("02/01/2020", "B", "USA", "Cars", "S1", 1, 99.0, 99.0, "Small", "Shipped"),
            record("03/01/2020", "C", "USA", "Cars", "S1", 1, 120.0, 120.0, "Large", "Shipped"),
        ]);
        let t = price_by_deal_size(&ds);
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].label, "Large");
        assert_eq!(t[0].values, vec![120.0]);
        assert_eq!(t[1].label, "Small");
        assert_eq!(t[1].values, vec![35.0, 99.0]);
    }

    #[test]
    fn status_counts_rows() {
        let ds = Dataset::from_records(vec![
            record("01/01/2020", "A", "USA", "Cars", "S1", 1, 1.0, 1.0, "Small", "Shipped"),
            record("02/01/2020", "B", "USA", "Cars", "S1", 1, 1.0, 1.0, "Small", "Shipped"),
            record("03/01/2020", "C", "USA", "Cars", "S1", 1, 1.0, 1.0, "Small", "Cancelled"),
        ]);
        let t = status_counts(&ds);
        assert_eq!(t.len(), 2);
        assert_eq!((t[0].label.as_str(), t[0].count), ("Cancelled", 1));
        assert_eq!((t[1].label.as_str(), t[1].count), ("Shipped", 2));
    }

    #[test]
    fn deal_size_sums_never_exceed_distinct_categories() {
        let ds = Dataset::from_records(vec![
            record("01/01/2020", "A", "USA", "Cars", "S1", 1, 1.0, 10.0, "Small", "Shipped"),
            record("02/01/2020", "B", "USA", "Cars", "S1", 1, 1.0, 20.0, "Medium", "Shipped"),
            record("03/01/2020", "C", "USA", "Cars", "S1", 1, 1.0, 30.0, "Small", "Shipped"),
        ]);
        let t = sales_by_deal_size(&ds);
        assert_eq!(t.len(), 2);
        let small = t.iter().find(|c| c.label == "Small").unwrap();
        assert_eq!(small.value, 40.0);
    }
}

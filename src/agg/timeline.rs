//! Time-series rollups.

use super::sum_grouped;
use crate::load::Dataset;
use crate::models::MonthKey;

/// Sales summed per month, ascending by month, plus the arithmetic mean of
/// those monthly sums (the dashed reference line in the trend panel).
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySales {
    pub points: Vec<(MonthKey, f64)>,
    pub mean: Option<f64>,
}

pub fn monthly_sales(dataset: &Dataset) -> MonthlySales {
    let groups = sum_grouped(dataset.records(), |r| r.month, |r| r.sales);
    let points: Vec<(MonthKey, f64)> = groups.into_iter().collect();
    let mean = if points.is_empty() {
        None
    } else {
        Some(points.iter().map(|(_, v)| v).sum::<f64>() / points.len() as f64)
    };
    MonthlySales { points, mean }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agg::testutil::record;

    #[test]
    fn sums_per_month_and_takes_mean_of_sums() {
        let ds = Dataset::from_records(vec![
            record("05/01/2020", "A", "USA", "Cars", "S1", 1, 1.0, 100.0, "Small", "Shipped"),
            record("20/01/2020", "B", "USA", "Cars", "S1", 1, 1.0, 50.0, "Small", "Shipped"),
            record("03/02/2020", "A", "USA", "Cars", "S1", 1, 1.0, 30.0, "Small", "Shipped"),
        ]);
        let t = monthly_sales(&ds);
        assert_eq!(t.points.len(), 2);
        assert_eq!(t.points[0].0.to_string(), "2020-01");
        assert_eq!(t.points[0].1, 150.0);
        assert_eq!(t.points[1].1, 30.0);
        // Reference mean equals the mean of the grouped output column.
        let expect = t.points.iter().map(|(_, v)| v).sum::<f64>() / t.points.len() as f64;
        assert_eq!(t.mean, Some(expect));
        assert_eq!(t.mean, Some(90.0));
    }

    #[test]
    fn months_sort_across_year_boundaries() {
        let ds = Dataset::from_records(vec![
            record("01/02/2021", "A", "USA", "Cars", "S1", 1, 1.0, 1.0, "Small", "Shipped"),
            record("01/12/2020", "A", "USA", "Cars", "S1", 1, 1.0, 2.0, "Small", "Shipped"),
        ]);
        let t = monthly_sales(&ds);
        assert_eq!(t.points[0].0.to_string(), "2020-12");
        assert_eq!(t.points[1].0.to_string(), "2021-02");
    }
}

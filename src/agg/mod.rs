//! Chart aggregators: pure rollups of the loaded sales table.
//!
//! Each chart in the catalog owns one aggregation, a function of
//! `&Dataset` to a small derived table. Tables are computed fresh per render,
//! never mutated in place, and iterate grouped keys in sorted order so the
//! output is deterministic. An empty dataset produces empty tables; renderers
//! draw those as empty panels.

pub mod customers;
pub mod markets;
pub mod products;
pub mod segments;
pub mod timeline;

pub use customers::{
    CustomerActivity, CustomerBehavior, CustomerTotals, DealSizeSummary, TrendLine,
    customer_behavior, customer_recency, deal_size_potential, repurchase_cycle,
};
pub use markets::{
    FlowLink, SalesFlows, SalesMatrix, country_product_flows, country_product_matrix,
    sales_by_country,
};
pub use products::{
    OrderEconomics, ProductQuantity, mean_sales_by_product_line, quantity_by_product,
    sales_by_product_line, unit_economics,
};
pub use segments::{price_by_deal_size, sales_by_deal_size, status_counts};
pub use timeline::{MonthlySales, monthly_sales};

use crate::load::Dataset;
use crate::models::{ChartKind, SalesRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// One grouped label with an aggregated numeric value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub label: String,
    pub value: f64,
}

/// One grouped label with a row count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// One grouped label with the raw (unaggregated) values that fell into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistribution {
    pub label: String,
    pub values: Vec<f64>,
}

/// Sum `value` per group key, sorted by key.
pub(crate) fn sum_grouped<K, KF, VF>(records: &[SalesRecord], key: KF, value: VF) -> BTreeMap<K, f64>
where
    K: Ord,
    KF: Fn(&SalesRecord) -> K,
    VF: Fn(&SalesRecord) -> f64,
{
    let mut groups: BTreeMap<K, f64> = BTreeMap::new();
    for r in records {
        *groups.entry(key(r)).or_default() += value(r);
    }
    groups
}

/// Mean of `value` per group key, sorted by key.
pub(crate) fn mean_grouped<K, KF, VF>(
    records: &[SalesRecord],
    key: KF,
    value: VF,
) -> BTreeMap<K, f64>
where
    K: Ord,
    KF: Fn(&SalesRecord) -> K,
    VF: Fn(&SalesRecord) -> f64,
{
    let mut sums: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for r in records {
        let e = sums.entry(key(r)).or_insert((0.0, 0));
        e.0 += value(r);
        e.1 += 1;
    }
    sums.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

pub(crate) fn category_values(groups: BTreeMap<String, f64>) -> Vec<CategoryValue> {
    groups
        .into_iter()
        .map(|(label, value)| CategoryValue { label, value })
        .collect()
}

/// Derived table for one chart, tagged by the catalog entry that computes it.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    MonthlySales(MonthlySales),
    ProductLineSales(Vec<CategoryValue>),
    CustomerBehavior(CustomerBehavior),
    CountrySales(Vec<CategoryValue>),
    PriceByDealSize(Vec<CategoryDistribution>),
    ProductQuantity(Vec<ProductQuantity>),
    MeanSalesByProductLine(Vec<CategoryValue>),
    DealSizeSales(Vec<CategoryValue>),
    StatusCounts(Vec<CategoryCount>),
    CustomerRecency(Vec<CustomerActivity>),
    CountryProductMatrix(SalesMatrix),
    UnitEconomics(Vec<OrderEconomics>),
    RepurchaseCycle(Vec<CategoryValue>),
    CountryProductFlows(SalesFlows),
    DealSizePotential(Vec<DealSizeSummary>),
}

impl ChartKind {
    /// Run this chart's aggregation against the loaded table.
    pub fn aggregate(self, dataset: &Dataset) -> ChartData {
        match self {
            ChartKind::MonthlySalesTrend => ChartData::MonthlySales(monthly_sales(dataset)),
            ChartKind::ProductLineSales => {
                ChartData::ProductLineSales(sales_by_product_line(dataset))
            }
            ChartKind::CustomerBehavior => ChartData::CustomerBehavior(customer_behavior(dataset)),
            ChartKind::CountrySales => ChartData::CountrySales(sales_by_country(dataset)),
            ChartKind::PriceByDealSize => ChartData::PriceByDealSize(price_by_deal_size(dataset)),
            ChartKind::ProductQuantityHeatmap => {
                ChartData::ProductQuantity(quantity_by_product(dataset))
            }
            ChartKind::ProductLineRadar => {
                ChartData::MeanSalesByProductLine(mean_sales_by_product_line(dataset))
            }
            ChartKind::DealSizeSales => ChartData::DealSizeSales(sales_by_deal_size(dataset)),
            ChartKind::StatusBreakdown => ChartData::StatusCounts(status_counts(dataset)),
            ChartKind::CustomerLifecycle => ChartData::CustomerRecency(customer_recency(dataset)),
            ChartKind::CountryProductMatrix => {
                ChartData::CountryProductMatrix(country_product_matrix(dataset))
            }
            ChartKind::UnitEconomics => ChartData::UnitEconomics(unit_economics(dataset)),
            ChartKind::RepurchaseCycle => ChartData::RepurchaseCycle(repurchase_cycle(dataset)),
            ChartKind::CountryProductFlows => {
                ChartData::CountryProductFlows(country_product_flows(dataset))
            }
            ChartKind::DealSizePotential => {
                ChartData::DealSizePotential(deal_size_potential(dataset))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::models::{RawRecord, SalesRecord};
    use chrono::NaiveDate;

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn record(
        date: &str,
        customer: &str,
        country: &str,
        line: &str,
        code: &str,
        qty: u32,
        price: f64,
        sales: f64,
        deal: &str,
        status: &str,
    ) -> SalesRecord {
        let raw = RawRecord {
            order_date: date.to_string(),
            quantity_ordered: qty,
            price_each: price,
            sales,
            status: status.to_string(),
            product_line: line.to_string(),
            product_code: code.to_string(),
            customer_name: customer.to_string(),
            country: country.to_string(),
            deal_size: deal.to_string(),
        };
        let parsed = NaiveDate::parse_from_str(date, "%d/%m/%Y").unwrap();
        SalesRecord::from_raw(raw, parsed)
    }
}

//! Product-level rollups.

use super::{CategoryValue, category_values, mean_grouped, sum_grouped};
use crate::load::Dataset;
use serde::Serialize;

/// Sum of sales per product line.
pub fn sales_by_product_line(dataset: &Dataset) -> Vec<CategoryValue> {
    category_values(sum_grouped(
        dataset.records(),
        |r| r.product_line.clone(),
        |r| r.sales,
    ))
}

/// Mean of sales per product line (radar panel input).
pub fn mean_sales_by_product_line(dataset: &Dataset) -> Vec<CategoryValue> {
    category_values(mean_grouped(
        dataset.records(),
        |r| r.product_line.clone(),
        |r| r.sales,
    ))
}

/// Total quantity ordered for one (product code, product line) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductQuantity {
    pub product_code: String,
    pub product_line: String,
    pub quantity: u64,
}

/// Sum of quantity ordered per (product code, product line) pair, sorted by
/// code then line.
pub fn quantity_by_product(dataset: &Dataset) -> Vec<ProductQuantity> {
    let groups = sum_grouped(
        dataset.records(),
        |r| (r.product_code.clone(), r.product_line.clone()),
        |r| f64::from(r.quantity_ordered),
    );
    groups
        .into_iter()
        .map(|((product_code, product_line), qty)| ProductQuantity {
            product_code,
            product_line,
            quantity: qty as u64,
        })
        .collect()
}

/// One order line's raw economics, with the product line as the categorical
/// dimension. No aggregation; used directly by the bubble panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderEconomics {
    pub price_each: f64,
    pub quantity_ordered: u32,
    pub sales: f64,
    pub product_line: String,
}

pub fn unit_economics(dataset: &Dataset) -> Vec<OrderEconomics> {
    dataset
        .records()
        .iter()
        .map(|r| OrderEconomics {
            price_each: r.price_each,
            quantity_ordered: r.quantity_ordered,
            sales: r.sales,
            product_line: r.product_line.clone(),
        })
        .collect()
}

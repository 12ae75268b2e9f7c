//! Geographic rollups: country totals, the country x product-line cross-tab,
//! and the country-to-product-line flow reshaping.

use super::{CategoryValue, category_values, sum_grouped};
use crate::load::Dataset;
use ahash::AHashMap;
use serde::Serialize;

/// Sum of sales per country.
pub fn sales_by_country(dataset: &Dataset) -> Vec<CategoryValue> {
    category_values(sum_grouped(
        dataset.records(),
        |r| r.country.clone(),
        |r| r.sales,
    ))
}

/// Cross-tabulation of summed sales: rows = countries, columns = product
/// lines. Every cell is defined; combinations absent from the source are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesMatrix {
    pub countries: Vec<String>,
    pub product_lines: Vec<String>,
    /// `cells[row][col]` pairs with `countries[row]` and `product_lines[col]`.
    pub cells: Vec<Vec<f64>>,
}

impl SalesMatrix {
    pub fn max_cell(&self) -> f64 {
        self.cells
            .iter()
            .flatten()
            .copied()
            .fold(0.0_f64, f64::max)
    }
}

pub fn country_product_matrix(dataset: &Dataset) -> SalesMatrix {
    let groups = sum_grouped(
        dataset.records(),
        |r| (r.country.clone(), r.product_line.clone()),
        |r| r.sales,
    );
    let mut countries: Vec<String> = Vec::new();
    let mut product_lines: Vec<String> = Vec::new();
    for (country, line) in groups.keys() {
        // Keys iterate sorted by country, so a country's rows are contiguous.
        if countries.last() != Some(country) {
            countries.push(country.clone());
        }
        if !product_lines.contains(line) {
            product_lines.push(line.clone());
        }
    }
    product_lines.sort();
    let col_index: AHashMap<&str, usize> = product_lines
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let mut cells = vec![vec![0.0; product_lines.len()]; countries.len()];
    let row_index: AHashMap<&str, usize> = countries
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();
    for ((country, line), sales) in &groups {
        cells[row_index[country.as_str()]][col_index[line.as_str()]] = *sales;
    }
    SalesMatrix {
        countries,
        product_lines,
        cells,
    }
}

/// One weighted edge of the flow diagram, indexing into [`SalesFlows::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

/// Sum of sales per (country, product line), reshaped into one node list
/// (countries first, then product lines, each sorted) and weighted edges.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesFlows {
    pub nodes: Vec<String>,
    /// The first `country_count` nodes are countries; the rest product lines.
    pub country_count: usize,
    pub links: Vec<FlowLink>,
}

pub fn country_product_flows(dataset: &Dataset) -> SalesFlows {
    let groups = sum_grouped(
        dataset.records(),
        |r| (r.country.clone(), r.product_line.clone()),
        |r| r.sales,
    );
    let mut countries: Vec<String> = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    for (country, line) in groups.keys() {
        if countries.last() != Some(country) {
            countries.push(country.clone());
        }
        if !lines.contains(line) {
            lines.push(line.clone());
        }
    }
    lines.sort();
    let country_index: AHashMap<&str, usize> = countries
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();
    let line_index: AHashMap<&str, usize> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let country_count = countries.len();
    let links = groups
        .iter()
        .map(|((country, line), sales)| FlowLink {
            source: country_index[country.as_str()],
            target: country_count + line_index[line.as_str()],
            value: *sales,
        })
        .collect();
    let mut nodes = countries;
    nodes.extend(lines);
    SalesFlows {
        nodes,
        country_count,
        links,
    }
}

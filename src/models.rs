use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format used by the source file (e.g. `24/02/2018`).
pub const ORDER_DATE_FORMAT: &str = "%d/%m/%Y";

/// Raw row as it appears in the sales CSV (upper-case headers, date as text).
/// Columns not listed here are ignored on read.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "ORDERDATE")]
    pub order_date: String,
    #[serde(rename = "QUANTITYORDERED")]
    pub quantity_ordered: u32,
    #[serde(rename = "PRICEEACH")]
    pub price_each: f64,
    #[serde(rename = "SALES")]
    pub sales: f64,
    #[serde(rename = "STATUS")]
    pub status: String,
    #[serde(rename = "PRODUCTLINE")]
    pub product_line: String,
    #[serde(rename = "PRODUCTCODE")]
    pub product_code: String,
    #[serde(rename = "CUSTOMERNAME")]
    pub customer_name: String,
    #[serde(rename = "COUNTRY")]
    pub country: String,
    #[serde(rename = "DEALSIZE")]
    pub deal_size: String,
}

/// Year-month truncation of an order date. Orders chronologically,
/// displays and serializes as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Tidy structure used by this crate (one row = one order line).
///
/// `year` and `month` are derived from `order_date` in [`SalesRecord::from_raw`]
/// and stay consistent with it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SalesRecord {
    pub order_date: NaiveDate,
    pub year: i32,
    pub month: MonthKey,
    pub customer_name: String,
    pub country: String,
    pub product_line: String,
    pub product_code: String,
    pub quantity_ordered: u32,
    pub price_each: f64,
    pub sales: f64,
    pub deal_size: String,
    pub status: String,
}

impl SalesRecord {
    /// Convert a raw CSV row into the typed record, deriving year and month.
    /// The raw date must already have been parsed by the loader.
    pub fn from_raw(raw: RawRecord, order_date: NaiveDate) -> Self {
        Self {
            order_date,
            year: order_date.year(),
            month: MonthKey::from_date(order_date),
            customer_name: raw.customer_name,
            country: raw.country,
            product_line: raw.product_line,
            product_code: raw.product_code,
            quantity_ordered: raw.quantity_ordered,
            price_each: raw.price_each,
            sales: raw.sales,
            deal_size: raw.deal_size,
            status: raw.status,
        }
    }
}

/// The fixed chart catalog. Identifiers are stable (1-15) and exhaustive;
/// nothing is added or removed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartKind {
    MonthlySalesTrend,
    ProductLineSales,
    CustomerBehavior,
    CountrySales,
    PriceByDealSize,
    ProductQuantityHeatmap,
    ProductLineRadar,
    DealSizeSales,
    StatusBreakdown,
    CustomerLifecycle,
    CountryProductMatrix,
    UnitEconomics,
    RepurchaseCycle,
    CountryProductFlows,
    DealSizePotential,
}

impl ChartKind {
    /// Full catalog in identifier order.
    pub const ALL: [ChartKind; 15] = [
        ChartKind::MonthlySalesTrend,
        ChartKind::ProductLineSales,
        ChartKind::CustomerBehavior,
        ChartKind::CountrySales,
        ChartKind::PriceByDealSize,
        ChartKind::ProductQuantityHeatmap,
        ChartKind::ProductLineRadar,
        ChartKind::DealSizeSales,
        ChartKind::StatusBreakdown,
        ChartKind::CustomerLifecycle,
        ChartKind::CountryProductMatrix,
        ChartKind::UnitEconomics,
        ChartKind::RepurchaseCycle,
        ChartKind::CountryProductFlows,
        ChartKind::DealSizePotential,
    ];

    /// Stable numeric identifier (1-15).
    pub fn id(self) -> u8 {
        match self {
            ChartKind::MonthlySalesTrend => 1,
            ChartKind::ProductLineSales => 2,
            ChartKind::CustomerBehavior => 3,
            ChartKind::CountrySales => 4,
            ChartKind::PriceByDealSize => 5,
            ChartKind::ProductQuantityHeatmap => 6,
            ChartKind::ProductLineRadar => 7,
            ChartKind::DealSizeSales => 8,
            ChartKind::StatusBreakdown => 9,
            ChartKind::CustomerLifecycle => 10,
            ChartKind::CountryProductMatrix => 11,
            ChartKind::UnitEconomics => 12,
            ChartKind::RepurchaseCycle => 13,
            ChartKind::CountryProductFlows => 14,
            ChartKind::DealSizePotential => 15,
        }
    }

    /// Look up a catalog entry by its numeric identifier.
    pub fn from_id(id: u8) -> Option<ChartKind> {
        ChartKind::ALL.iter().copied().find(|k| k.id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::MonthlySalesTrend => "Monthly Sales Trend",
            ChartKind::ProductLineSales => "Product Line Performance",
            ChartKind::CustomerBehavior => "Customer Order Behavior",
            ChartKind::CountrySales => "Sales by Country",
            ChartKind::PriceByDealSize => "Price by Deal Size",
            ChartKind::ProductQuantityHeatmap => "Product Order Heatmap",
            ChartKind::ProductLineRadar => "Product Line Radar",
            ChartKind::DealSizeSales => "Deal Size Revenue",
            ChartKind::StatusBreakdown => "Order Status Breakdown",
            ChartKind::CustomerLifecycle => "Customer Lifecycle",
            ChartKind::CountryProductMatrix => "Country x Product Matrix",
            ChartKind::UnitEconomics => "Price vs Quantity",
            ChartKind::RepurchaseCycle => "Repurchase Cycle",
            ChartKind::CountryProductFlows => "Country to Product Flows",
            ChartKind::DealSizePotential => "Deal Size Potential",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            ChartKind::MonthlySalesTrend => "Sales summed per month, with overall mean",
            ChartKind::ProductLineSales => "Total sales per product line",
            ChartKind::CustomerBehavior => "Quantity vs sales per customer, with trend",
            ChartKind::CountrySales => "Total sales per country",
            ChartKind::PriceByDealSize => "Unit price distribution per deal size",
            ChartKind::ProductQuantityHeatmap => "Quantity ordered per product code and line",
            ChartKind::ProductLineRadar => "Mean sale amount per product line",
            ChartKind::DealSizeSales => "Total sales per deal size category",
            ChartKind::StatusBreakdown => "Order count per fulfillment status",
            ChartKind::CustomerLifecycle => "Recency vs total sales per customer",
            ChartKind::CountryProductMatrix => "Sales cross-tab, countries x product lines",
            ChartKind::UnitEconomics => "Per-order price and quantity, sized by revenue",
            ChartKind::RepurchaseCycle => "Average days between repurchases per line",
            ChartKind::CountryProductFlows => "Sales flows from countries to product lines",
            ChartKind::DealSizePotential => "Customer count vs mean spend per deal size",
        }
    }
}

/// Errors raised while validating user chart/layout choices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no charts selected")]
    Empty,
    #[error("columns per row must be between {min} and {max}, got {got}")]
    ColumnsOutOfRange { got: usize, min: usize, max: usize },
    #[error("unknown chart identifier: {0}")]
    UnknownChart(String),
}

/// Bounds for the columns-per-row control.
pub const MIN_COLUMNS: usize = 1;
pub const MAX_COLUMNS: usize = 5;
pub const DEFAULT_COLUMNS: usize = 3;

/// The user's chosen subset of the catalog plus the columns-per-row count.
///
/// Recreated on every interaction; duplicates collapse to their first
/// occurrence and list order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    charts: Vec<ChartKind>,
    columns: usize,
}

impl Selection {
    /// Build a selection, validating the column count (1-5).
    pub fn new<I>(charts: I, columns: usize) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = ChartKind>,
    {
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&columns) {
            return Err(SelectionError::ColumnsOutOfRange {
                got: columns,
                min: MIN_COLUMNS,
                max: MAX_COLUMNS,
            });
        }
        let mut seen = [false; 15];
        let mut deduped = Vec::new();
        for kind in charts {
            let slot = (kind.id() - 1) as usize;
            if !seen[slot] {
                seen[slot] = true;
                deduped.push(kind);
            }
        }
        Ok(Self {
            charts: deduped,
            columns,
        })
    }

    /// Parse a comma/semicolon separated list of numeric identifiers, or
    /// `all` for the full catalog.
    pub fn parse(ids: &str, columns: usize) -> Result<Self, SelectionError> {
        if ids.trim().eq_ignore_ascii_case("all") {
            return Self::new(ChartKind::ALL, columns);
        }
        let mut charts = Vec::new();
        for part in ids.split([',', ';']) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let id: u8 = part
                .parse()
                .map_err(|_| SelectionError::UnknownChart(part.to_string()))?;
            let kind = ChartKind::from_id(id)
                .ok_or_else(|| SelectionError::UnknownChart(part.to_string()))?;
            charts.push(kind);
        }
        Self::new(charts, columns)
    }

    pub fn charts(&self) -> &[ChartKind] {
        &self.charts
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Signal the nothing-selected condition instead of attempting layout.
    pub fn ensure_non_empty(&self) -> Result<(), SelectionError> {
        if self.is_empty() {
            Err(SelectionError::Empty)
        } else {
            Ok(())
        }
    }
}

impl Default for Selection {
    /// Full catalog, three columns per row.
    fn default() -> Self {
        Self {
            charts: ChartKind::ALL.to_vec(),
            columns: DEFAULT_COLUMNS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_orders_and_formats() {
        let a = MonthKey { year: 2019, month: 12 };
        let b = MonthKey { year: 2020, month: 1 };
        assert!(a < b);
        assert_eq!(b.to_string(), "2020-01");
    }

    #[test]
    fn catalog_ids_are_stable_and_exhaustive() {
        for (idx, kind) in ChartKind::ALL.iter().enumerate() {
            assert_eq!(kind.id() as usize, idx + 1);
            assert_eq!(ChartKind::from_id(kind.id()), Some(*kind));
        }
        assert_eq!(ChartKind::from_id(0), None);
        assert_eq!(ChartKind::from_id(16), None);
    }

    #[test]
    fn selection_dedupes_and_keeps_order() {
        let sel = Selection::new(
            [
                ChartKind::CountrySales,
                ChartKind::MonthlySalesTrend,
                ChartKind::CountrySales,
            ],
            2,
        )
        .unwrap();
        assert_eq!(
            sel.charts(),
            &[ChartKind::CountrySales, ChartKind::MonthlySalesTrend]
        );
    }

    #[test]
    fn selection_rejects_bad_columns() {
        let err = Selection::new([ChartKind::CountrySales], 6).unwrap_err();
        assert!(matches!(err, SelectionError::ColumnsOutOfRange { got: 6, .. }));
        assert!(Selection::new([ChartKind::CountrySales], 0).is_err());
    }

    #[test]
    fn selection_parse_accepts_ids_and_all() {
        let sel = Selection::parse("1, 4;2", 3).unwrap();
        assert_eq!(
            sel.charts(),
            &[
                ChartKind::MonthlySalesTrend,
                ChartKind::CountrySales,
                ChartKind::ProductLineSales
            ]
        );
        assert_eq!(Selection::parse("all", 3).unwrap().charts().len(), 15);
        assert!(Selection::parse("17", 3).is_err());
        assert!(Selection::parse("cars", 3).is_err());
    }

    #[test]
    fn empty_selection_is_signalled() {
        let sel = Selection::parse("", 3).unwrap();
        assert!(sel.is_empty());
        assert_eq!(sel.ensure_non_empty(), Err(SelectionError::Empty));
    }
}

//! Data loading: read the sales CSV into typed records.
//!
//! One row in the file equals one order line. The order date is parsed under
//! the fixed day/month/year format and the year/month columns are derived from
//! it during conversion, so they can never drift apart. The loader is a pure
//! function of the file contents; the process loads once at startup and passes
//! the [`Dataset`] handle by reference from there on.

use crate::models::{ORDER_DATE_FORMAT, RawRecord, SalesRecord};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading and normalizing the source file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {line}: order date {value:?} does not match {ORDER_DATE_FORMAT}")]
    Date { line: usize, value: String },
}

/// The loaded sales table plus its global maximum order date, which recency
/// aggregations use as the "current date" reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<SalesRecord>,
    latest_order: Option<NaiveDate>,
}

impl Dataset {
    /// Read a delimited sales table from `path`.
    ///
    /// Fails on a missing file, a malformed row, or an order date that does
    /// not parse under the fixed format. A file with only a header yields an
    /// empty (but valid) dataset.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        let mut records = Vec::new();
        for (idx, row) in rdr.deserialize::<RawRecord>().enumerate() {
            let raw = row?;
            let date = NaiveDate::parse_from_str(&raw.order_date, ORDER_DATE_FORMAT).map_err(
                |_| LoadError::Date {
                    // 1-based data row, header excluded
                    line: idx + 1,
                    value: raw.order_date.clone(),
                },
            )?;
            records.push(SalesRecord::from_raw(raw, date));
        }
        Ok(Self::from_records(records))
    }

    /// Build a dataset from already-typed records (used by tests and callers
    /// that synthesize data).
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let latest_order = records.iter().map(|r| r.order_date).max();
        Self {
            records,
            latest_order,
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Maximum order date across the table; `None` for an empty dataset.
    pub fn latest_order(&self) -> Option<NaiveDate> {
        self.latest_order
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    const HEADER: &str = "ORDERNUMBER,QUANTITYORDERED,PRICEEACH,ORDERLINENUMBER,SALES,ORDERDATE,STATUS,PRODUCTLINE,PRODUCTCODE,CUSTOMERNAME,COUNTRY,DEALSIZE";

    fn write_csv(rows: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        for row in rows {
            writeln!(f, "{row}").unwrap();
        }
        (dir, path)
    }

    #[test]
    fn loads_rows_and_derives_year_month() {
        let (_dir, path) = write_csv(&[
            "10100,30,95.7,1,2871.0,24/02/2018,Shipped,Motorcycles,S10_1678,Land of Toys Inc.,USA,Small",
        ]);
        let ds = Dataset::load(&path).unwrap();
        assert_eq!(ds.len(), 1);
        let r = &ds.records()[0];
        assert_eq!(r.order_date, NaiveDate::from_ymd_opt(2018, 2, 24).unwrap());
        assert_eq!(r.year, 2018);
        assert_eq!(r.month.to_string(), "2018-02");
        assert_eq!(ds.latest_order(), Some(r.order_date));
    }

    #[test]
    fn extra_columns_are_ignored() {
        // ORDERNUMBER and ORDERLINENUMBER are not part of the schema we keep.
        let (_dir, path) = write_csv(&[
            "10101,20,81.35,2,1627.0,07/05/2018,Shipped,Classic Cars,S10_1949,Corporate Gift Ideas Co.,USA,Medium",
        ]);
        let ds = Dataset::load(&path).unwrap();
        assert_eq!(ds.records()[0].product_line, "Classic Cars");
        assert_eq!(ds.records()[0].quantity_ordered, 20);
    }

    #[test]
    fn bad_date_reports_row_and_value() {
        let (_dir, path) = write_csv(&[
            "10100,30,95.7,1,2871.0,24/02/2018,Shipped,Motorcycles,S10_1678,Land of Toys Inc.,USA,Small",
            "10101,20,81.35,2,1627.0,2018-05-07,Shipped,Classic Cars,S10_1949,Corporate Gift Ideas Co.,USA,Medium",
        ]);
        match Dataset::load(&path) {
            Err(LoadError::Date { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "2018-05-07");
            }
            other => panic!("expected date error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(matches!(
            Dataset::load(&missing),
            Err(LoadError::Io(_)) | Err(LoadError::Csv(_))
        ));
    }

    #[test]
    fn reload_of_unchanged_file_is_equal() {
        let (_dir, path) = write_csv(&[
            "10100,30,95.7,1,2871.0,24/02/2018,Shipped,Motorcycles,S10_1678,Land of Toys Inc.,USA,Small",
            "10101,20,81.35,2,1627.0,07/05/2018,Shipped,Classic Cars,S10_1949,Corporate Gift Ideas Co.,USA,Medium",
        ]);
        let a = Dataset::load(&path).unwrap();
        let b = Dataset::load(&path).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn header_only_file_is_empty_dataset() {
        let (_dir, path) = write_csv(&[]);
        let ds = Dataset::load(&path).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.latest_order(), None);
    }
}

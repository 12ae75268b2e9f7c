use crate::load::Dataset;
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save the normalized record table as CSV with header (tidy schema, ISO
/// dates, `YYYY-MM` month keys).
pub fn save_csv<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    for r in dataset.records() {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the normalized record table as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(dataset.records())?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawRecord, SalesRecord};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn dataset() -> Dataset {
        let raw = RawRecord {
            order_date: "24/02/2018".into(),
            quantity_ordered: 30,
            price_each: 95.7,
            sales: 2871.0,
            status: "Shipped".into(),
            product_line: "Motorcycles".into(),
            product_code: "S10_1678".into(),
            customer_name: "Land of Toys Inc.".into(),
            country: "USA".into(),
            deal_size: "Small".into(),
        };
        let date = NaiveDate::from_ymd_opt(2018, 2, 24).unwrap();
        Dataset::from_records(vec![SalesRecord::from_raw(raw, date)])
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let ds = dataset();
        save_csv(&ds, &csvp).unwrap();
        save_json(&ds, &jsonp).unwrap();

        let text = std::fs::read_to_string(&csvp).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("order_date"));
        assert!(header.contains("deal_size"));
        assert_eq!(lines.count(), ds.len());

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&jsonp).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["month"], "2018-02");
        assert_eq!(parsed[0]["order_date"], "2018-02-24");
    }
}

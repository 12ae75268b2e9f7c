use chrono::NaiveDate;
use salesdash::models::{RawRecord, SalesRecord};
use salesdash::viz::{self, RenderOptions};
use salesdash::{ChartKind, Dataset, Selection, SelectionError};
use tempfile::tempdir;

#[allow(clippy::too_many_arguments)]
fn row(
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

fn sample_dataset() -> Dataset {
    Dataset::from_records(vec![
        row("05/01/2020", "Acme", "USA", "Cars", "C1", 2, 50.0, 100.0, "Small", "Shipped"),
        row("20/01/2020", "Acme", "USA", "Cars", "C1", 1, 50.0, 50.0, "Small", "Shipped"),
        row("03/02/2020", "Bolt", "France", "Trucks", "T1", 4, 25.0, 100.0, "Medium", "Shipped"),
        row("15/02/2020", "Bolt", "France", "Cars", "C2", 1, 80.0, 80.0, "Large", "Cancelled"),
        row("28/02/2020", "Crux", "Japan", "Trucks", "T1", 2, 25.0, 50.0, "Small", "Shipped"),
    ])
}

#[test]
fn renders_full_catalog_to_svg() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("dashboard.svg");
    let report = viz::render_dashboard(
        &sample_dataset(),
        &Selection::default(),
        &out,
        &RenderOptions::default(),
    )
    .unwrap();
    assert!(out.exists());
    assert_eq!(report.rendered.len() + report.failures.len(), 15);
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("<svg"));
}

#[test]
fn renders_a_subset_to_png() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("subset.png");
    let selection = Selection::new(
        [ChartKind::CountrySales, ChartKind::ProductLineSales],
        2,
    )
    .unwrap();
    let report = viz::render_dashboard(
        &sample_dataset(),
        &selection,
        &out,
        &RenderOptions::default(),
    )
    .unwrap();
    assert!(out.exists());
    assert_eq!(report.rendered.len() + report.failures.len(), 2);
}

#[test]
fn empty_dataset_still_produces_a_page() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("empty.svg");
    let report = viz::render_dashboard(
        &Dataset::from_records(Vec::new()),
        &Selection::default(),
        &out,
        &RenderOptions::default(),
    )
    .unwrap();
    assert!(out.exists());
    // Empty tables draw empty panels, they do not fail.
    assert_eq!(report.rendered.len() + report.failures.len(), 15);
}

#[test]
fn empty_selection_is_the_nothing_selected_condition() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("none.svg");
    let selection = Selection::new(std::iter::empty::<ChartKind>(), 3).unwrap();
    let err = viz::render_dashboard(
        &sample_dataset(),
        &selection,
        &out,
        &RenderOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<SelectionError>(),
        Some(&SelectionError::Empty)
    );
    assert!(!out.exists());
}

#[test]
fn page_dimensions_follow_the_layout_plan() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("grid.svg");
    // Seven charts, three per row: 3 rows of panels.
    let selection = Selection::new(ChartKind::ALL.into_iter().take(7), 3).unwrap();
    let options = RenderOptions {
        panel_width: 300,
        panel_height: 200,
        ..RenderOptions::default()
    };
    viz::render_dashboard(&sample_dataset(), &selection, &out, &options).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("width=\"900\""));
    assert!(text.contains("height=\"600\""));
}

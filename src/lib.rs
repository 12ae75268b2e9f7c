//! salesdash
//!
//! A lightweight Rust library for loading, aggregating, and charting an
//! auto-sales order table as a composable dashboard. Pairs with the
//! `salesdash` CLI and the `salesdash-gui` desktop app.
//!
//! ### Features
//! - Load a sales CSV once into a typed, date-normalized table
//! - A fixed catalog of 15 analytical charts, each backed by its own
//!   aggregation (sums, means, pivots, trend fit, recency, flows)
//! - Row-major layout planning from a user selection (charts + columns/row)
//! - Render the whole page to SVG or PNG with per-panel failure isolation
//! - Export the normalized table as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use salesdash::{Dataset, Selection, viz};
//!
//! let data = Dataset::load("Auto Sales data.csv")?;
//! let selection = Selection::default(); // all 15 charts, 3 per row
//! let report = viz::render_dashboard(
//!     &data,
//!     &selection,
//!     "dashboard.svg",
//!     &viz::RenderOptions::default(),
//! )?;
//! println!("{} panels rendered", report.rendered.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod agg;
pub mod export;
pub mod layout;
pub mod load;
pub mod models;
pub mod viz;

pub use agg::ChartData;
pub use layout::LayoutPlan;
pub use load::{Dataset, LoadError};
pub use models::{ChartKind, Selection, SelectionError};

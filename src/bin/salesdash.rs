use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use salesdash::{ChartKind, Dataset, Selection};
use salesdash::{agg, export, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "salesdash",
    version,
    about = "Load, aggregate & chart auto-sales data as a dashboard page"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render selected charts into one SVG/PNG page.
    Render(RenderArgs),
    /// List the chart catalog (identifier, title, description).
    Charts,
    /// Print a quick summary of the dataset.
    Stats(StatsArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum DataFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Path to the sales CSV (dates in day/month/year format).
    #[arg(short, long)]
    data: PathBuf,
    /// Chart identifiers separated by comma or semicolon (e.g., 1,4,11), or `all`.
    #[arg(long, default_value = "all")]
    charts: String,
    /// Charts per row (1-5).
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    columns: u8,
    /// Output page path (.svg or .png).
    #[arg(long, default_value = "dashboard.svg")]
    out: PathBuf,
    /// Width of one panel slot in pixels.
    #[arg(long, default_value_t = viz::DEFAULT_PANEL_WIDTH)]
    panel_width: u32,
    /// Height of one panel slot in pixels.
    #[arg(long, default_value_t = viz::DEFAULT_PANEL_HEIGHT)]
    panel_height: u32,
    /// Locale for tick labels (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Also save the normalized table (format inferred by --format or extension).
    #[arg(long)]
    out_data: Option<PathBuf>,
    /// Normalized-table format (csv or json). If omitted, inferred from --out-data extension.
    #[arg(long, value_enum)]
    format: Option<DataFormat>,
    /// Print dataset summary to stdout after rendering.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Path to the sales CSV.
    #[arg(short, long)]
    data: PathBuf,
}

fn fmt_money(v: f64) -> String {
    // Two decimals, trailing zeros trimmed.
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Charts => cmd_charts(),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn cmd_charts() -> Result<()> {
    for kind in ChartKind::ALL {
        println!("{:>2}  {:<26} {}", kind.id(), kind.title(), kind.subtitle());
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let dataset = Dataset::load(&args.data)?;
    eprintln!("Loaded {} rows from {}", dataset.len(), args.data.display());

    let selection = Selection::parse(&args.charts, args.columns as usize)?;
    if selection.is_empty() {
        eprintln!("Warning: no charts selected; nothing to render.");
        return Ok(());
    }

    let options = viz::RenderOptions {
        panel_width: args.panel_width,
        panel_height: args.panel_height,
        locale: args.locale.clone(),
    };
    let report = viz::render_dashboard(&dataset, &selection, &args.out, &options)?;
    eprintln!(
        "Wrote {} of {} panels to {}",
        report.rendered.len(),
        selection.charts().len(),
        args.out.display()
    );
    for failure in &report.failures {
        eprintln!(
            "Warning: panel {} ({}) did not render: {}",
            failure.kind.id(),
            failure.kind.title(),
            failure.reason
        );
    }

    if let Some(path) = args.out_data.as_ref() {
        let fmt = match args.format {
            Some(DataFormat::Csv) => "csv",
            Some(DataFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => export::save_csv(&dataset, path)?,
            "json" => export::save_json(&dataset, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", dataset.len(), path.display());
    }

    if args.stats {
        print_summary(&dataset);
    }
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> Result<()> {
    let dataset = Dataset::load(&args.data)?;
    print_summary(&dataset);
    Ok(())
}

fn print_summary(dataset: &Dataset) {
    println!("rows: {}", dataset.len());
    let first = dataset.records().iter().map(|r| r.order_date).min();
    if let (Some(first), Some(last)) = (first, dataset.latest_order()) {
        println!("orders: {first} .. {last}");
    }
    for line in agg::sales_by_product_line(dataset) {
        println!("{:<18} {}", line.label, fmt_money(line.value));
    }
}

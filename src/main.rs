use anyhow::{Context, Result};
use bpagrid::{
    fetch,
    frame::{render_summary, FrameOptions, LoadFrame},
    parse::{split_into_rows_and_headers, Delimiters},
    plot::{self, ChartOptions},
    Config,
};
use reqwest::Client;
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");
    let start = Instant::now();

    // ─── 2) configuration ───────────────────────────────────────────
    let cfg = Config::from_env_or_default()?;
    let zone = cfg.report_zone()?;

    // ─── 3) fetch report & drop preamble ────────────────────────────
    let client = Client::new();
    let raw = fetch::load_report(&client, &cfg).await?;
    let body = fetch::strip_preamble(&raw, cfg.newline(), cfg.skip_lines);

    // ─── 4) parse into records ──────────────────────────────────────
    let delims = Delimiters::new(&cfg.field_delimiter, "\n");
    let doc = split_into_rows_and_headers(&body, &delims).context("splitting report")?;
    let records = doc.records(delims.field);

    // ─── 5) typed frame, derived columns, summary ──────────────────
    let frame = LoadFrame::from_records(
        &doc.headers,
        &records,
        &FrameOptions {
            date_column: cfg.date_column.clone(),
            zone,
        },
    )?
    .with_derived()?;
    println!("{}", render_summary(&frame.summarize()));

    // ─── 6) chart ───────────────────────────────────────────────────
    plot::render_chart(
        &frame,
        &ChartOptions {
            path: cfg.chart_path.clone(),
            width: cfg.chart_width,
            height: cfg.chart_height,
            zone,
            days: plot::CHART_DAYS,
        },
    )?;

    info!(
        chart = %cfg.chart_path.display(),
        elapsed = ?start.elapsed(),
        "all done"
    );
    Ok(())
}

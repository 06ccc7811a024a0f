// src/plot/mod.rs

use anyhow::{anyhow, bail, Result};
use plotters::prelude::*;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::frame::{LoadFrame, ReportZone};

pub const DAY_SECS: i64 = 86_400;
pub const HALF_DAY_SECS: i64 = DAY_SECS / 2;

/// Days covered by the x axis; the report holds roughly a week.
pub const CHART_DAYS: usize = 7;

const Y_RANGE: std::ops::Range<i64> = -10..13_000;

const MAROON: RGBColor = RGBColor(128, 0, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 128);
const GRAY: RGBColor = RGBColor(128, 128, 128);
const PINK: RGBColor = RGBColor(255, 192, 203);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticks {
    pub major: Vec<i64>,
    pub minor: Vec<i64>,
}

/// Major ticks every day from `start`, minor ticks at the half days between them.
pub fn time_ticks(start: i64, days: usize) -> Ticks {
    let major = (0..=days as i64).map(|i| start + i * DAY_SECS).collect();
    let minor = (0..days as i64)
        .map(|i| start + HALF_DAY_SECS + i * DAY_SECS)
        .collect();
    Ticks { major, minor }
}

/// Position of `ts` on the chart's x axis, in days after `start`.
pub fn day_offset(ts: i64, start: i64) -> f64 {
    (ts - start) as f64 / DAY_SECS as f64
}

/// `%b%d` label for a unix timestamp, e.g. `Oct16`.
pub fn tick_label(ts: i64, zone: ReportZone) -> String {
    zone.format(ts, "%b%d").unwrap_or_default()
}

/// Line colour of a frame column; matches the colours of the BPA web chart.
pub fn series_color(name: &str) -> RGBColor {
    match name {
        "Load" => RED,
        "VER" => GREEN,
        "Hydro" => BLUE,
        "Fossil/Biomass" => MAROON,
        "Nuclear" => PURPLE,
        "Total Generation" => GRAY,
        "Excess" => PINK,
        _ => BLACK,
    }
}

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub zone: ReportZone,
    pub days: usize,
}

/// Render every frame column as a line against report time, written as SVG.
///
/// The x axis is measured in days from the first report timestamp; bold grid
/// lines and labels sit on the [`time_ticks`] major ticks, light lines on the
/// minor ones.
#[instrument(level = "info", skip_all, fields(path = %opts.path.display()))]
pub fn render_chart(frame: &LoadFrame, opts: &ChartOptions) -> Result<()> {
    let dates = frame.dates();
    let Some(&start) = dates.first() else {
        bail!("cannot chart an empty frame");
    };
    let ticks = time_ticks(start, opts.days);
    let zone = opts.zone;
    let x_axis = (0f64..opts.days as f64)
        .with_key_points(ticks.major.iter().map(|&t| day_offset(t, start)).collect())
        .with_light_points(ticks.minor.iter().map(|&t| day_offset(t, start)));

    let root = SVGBackend::new(&opts.path, (opts.width, opts.height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("BPA load graph", ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_axis, Y_RANGE)
        .map_err(draw_err)?;

    let label_x = move |day: &f64| tick_label(start + (day * DAY_SECS as f64).round() as i64, zone);
    chart
        .configure_mesh()
        .x_labels(ticks.major.len())
        .x_label_formatter(&label_x)
        .y_labels(4)
        .y_desc("Megawatts")
        .draw()
        .map_err(draw_err)?;

    for (name, values) in frame.value_columns() {
        let color = series_color(&name);
        let points = dates
            .iter()
            .zip(values.values().iter())
            .map(|(&t, &v)| (day_offset(t, start), v));
        chart
            .draw_series(LineSeries::new(points, &color))
            .map_err(draw_err)?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    info!(series = frame.value_columns().len(), "chart written");
    Ok(())
}

fn draw_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("drawing chart: {}", e)
}

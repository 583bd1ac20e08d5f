mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::fmt;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::ListingsApp;
use config::{Cli, MIN_WINDOW_SIZE, WINDOW_SIZE};
use data::filter::{evaluate, FilterCriteria};
use data::loader::load_file;
use data::model::NormalizedDataset;
use data::stats;
use state::AppState;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    // The dashboard has nothing to show without data: a failed load ends the process.
    let dataset = load_file(&cli.data)
        .with_context(|| format!("loading listings from {}", cli.data.display()))?;

    if cli.headless {
        let criteria = headless_criteria(&dataset, &cli);
        let mut text = String::new();
        write_summary(&mut text, &dataset, &criteria).context("formatting summary")?;
        print!("{text}");
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE),
        ..Default::default()
    };

    let state = AppState::new(dataset);
    eframe::run_native(
        "Listings Insights Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(ListingsApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}

/// Criteria from the command line, defaulting to "everything".
fn headless_criteria(dataset: &NormalizedDataset, cli: &Cli) -> FilterCriteria {
    let mut criteria = FilterCriteria::all(dataset);
    if let Some(min) = cli.min_price {
        criteria.price_range.min = min;
    }
    if let Some(max) = cli.max_price {
        criteria.price_range.max = max;
    }
    if !cli.room_types.is_empty() {
        criteria.room_types = cli.room_types.iter().cloned().collect();
    }
    criteria
}

/// Plain-text KPIs for `--headless`.
fn write_summary<W: fmt::Write>(
    out: &mut W,
    dataset: &NormalizedDataset,
    criteria: &FilterCriteria,
) -> fmt::Result {
    let view = evaluate(dataset, criteria);

    writeln!(
        out,
        "Price range:     ${} - ${}",
        criteria.price_range.min, criteria.price_range.max
    )?;
    writeln!(out, "Total listings:  {} of {}", view.count, dataset.len())?;
    match view.average_price {
        Some(avg) => writeln!(out, "Avg. price:      ${avg:.2}")?,
        None => writeln!(out, "Avg. price:      n/a")?,
    }

    if dataset.capabilities.has_room_type {
        for share in stats::room_type_breakdown(dataset, &view) {
            writeln!(
                out,
                "  {:<20} {:>6}  {:>5.1}%",
                share.room_type,
                share.count,
                share.fraction * 100.0
            )?;
        }
    }
    if dataset.capabilities.has_geo {
        writeln!(
            out,
            "Mappable:        {}",
            stats::geo_points(dataset, &view).len()
        )?;
    }
    Ok(())
}

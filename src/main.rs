use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use focusbloom::{reports, FocusApp};
use log::info;

/// Demo driver: runs a short focus session against the real on-disk store
/// and prints the aggregated report.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let dirs = ProjectDirs::from("", "", "focusbloom")
        .context("could not resolve a data directory")?;
    let app = FocusApp::open(dirs.data_dir()).await?;

    app.timer.set_minutes(1).await;
    let snapshot = app.timer.start().await?;
    info!("running a demo session ({} remaining)", snapshot.display);

    tokio::time::sleep(Duration::from_secs(3)).await;
    if let Some(record) = app.timer.stop().await? {
        info!(
            "recorded {}s of focus in {}",
            record.actual_duration_seconds, record.category
        );
    }

    let summary = reports::summarize(&app.sessions.all().await, reports::today());
    println!(
        "today: {} min | all time: {} min | distractions: {}",
        summary.today_total_seconds / 60,
        summary.all_time_total_seconds / 60,
        summary.total_distractions
    );
    for slice in &summary.categories {
        println!("  {:>3}% {} ({} min)", slice.percent, slice.name, slice.minutes);
    }

    app.shutdown().await;
    Ok(())
}

use chrono::{TimeDelta, Utc};
use gfit_client::config::Config;
use gfit_client::http_client::ReqwestFitClient;
use gfit_client::{DateRange, FitClient};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Configure logging from env var `GFIT_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("GFIT_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(format!("{log_env},reqwest=warn"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,reqwest=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!(%log_env, "gfit: log filter");

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%e, "invalid configuration; aborting");
            std::process::exit(1);
        }
    };

    let client = ReqwestFitClient::new(&cfg.base_url, cfg.access_token.clone());
    let now = Utc::now();
    let range = DateRange::new(now - TimeDelta::days(i64::from(cfg.days_back)), now)?;
    tracing::info!(%range, "gfit: fetching calories and activity segments");

    let (calories, activity) = tokio::try_join!(
        client.get_calorie_data(&range),
        client.get_activity_data(&range)
    )?;
    tracing::info!(
        calorie_points = calories.len(),
        activity_points = activity.len(),
        "gfit: datasets normalized"
    );

    let report = gfit_cli::build_report(&calories, &activity, cfg.near_tolerance);
    for line in gfit_cli::render(&report) {
        println!("{line}");
    }
    println!(
        "total {:.1} kcal, {:.1} kcal outside recorded activities",
        report.total_calories, report.unattributed_calories
    );

    Ok(())
}

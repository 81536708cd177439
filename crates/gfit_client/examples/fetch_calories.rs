use chrono::{TimeDelta, Utc};
use gfit_client::{DateRange, FitClient, config::Config, http_client::ReqwestFitClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects GFIT_ACCESS_TOKEN in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestFitClient::new(&cfg.base_url, cfg.access_token);
    let now = Utc::now();
    let range = DateRange::new(now - TimeDelta::days(cfg.days_back as i64), now)?;
    let calories = client.get_calorie_data(&range).await?;
    println!(
        "{}: {} samples, {:.0} kcal",
        calories.interval,
        calories.len(),
        calories.total()
    );
    Ok(())
}

use crate::GfitError;
use chrono::TimeDelta;
use secrecy::SecretString;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";
pub const DEFAULT_DAYS_BACK: u32 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub access_token: SecretString,
    pub base_url: String,
    pub days_back: u32,
    /// Default window used when deciding whether two ranges are near.
    pub near_tolerance: TimeDelta,
}

impl Config {
    pub fn from_env() -> Result<Self, GfitError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, GfitError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let token = get("GFIT_ACCESS_TOKEN")
            .ok_or_else(|| GfitError::Config("GFIT_ACCESS_TOKEN missing".into()))?;
        let base_url = get("GFIT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let days_back = match get("GFIT_DAYS_BACK") {
            Some(v) => parse_number("GFIT_DAYS_BACK", &v)?,
            None => DEFAULT_DAYS_BACK,
        };
        let near_secs = match get("GFIT_NEAR_TOLERANCE_SECS") {
            Some(v) => parse_number("GFIT_NEAR_TOLERANCE_SECS", &v)?,
            None => crate::date_range::DEFAULT_NEAR_SECS,
        };
        let near_tolerance = TimeDelta::try_seconds(near_secs).ok_or_else(|| {
            GfitError::Config(format!("GFIT_NEAR_TOLERANCE_SECS out of range: {near_secs}"))
        })?;
        Ok(Self {
            access_token: SecretString::new(token.into()),
            base_url,
            days_back,
            near_tolerance,
        })
    }
}

fn parse_number<N: std::str::FromStr>(key: &str, raw: &str) -> Result<N, GfitError>
where
    N::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| GfitError::Config(format!("{key}: {e}")))
}

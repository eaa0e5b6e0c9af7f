use std::{env, fmt::Display, net::IpAddr, str::FromStr};

use tracing::{info, warn};

use crate::error::AppError;

/// Extra CORS origins, comma-separated. Read on every request.
pub const CORS_ORIGIN_VAR: &str = "CORS_ORIGIN";

/// Origins of the local front-end dev server.
pub const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

pub struct Config {
    pub host: IpAddr,
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            host: try_load("HOST", "0.0.0.0")?,
            port: try_load("PORT", "3000")?,
        })
    }
}

/// The development origins followed by any configured in `CORS_ORIGIN`.
pub fn allowed_origins() -> Vec<String> {
    parse_origins(env::var(CORS_ORIGIN_VAR).ok().as_deref())
}

pub fn parse_origins(extra: Option<&str>) -> Vec<String> {
    let mut origins: Vec<String> = DEV_ORIGINS.iter().map(|o| o.to_string()).collect();
    if let Some(extra) = extra {
        origins.extend(
            extra
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from),
        );
    }
    origins
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AppError::Config(format!("invalid {key}: {e}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_origins_always_allowed() {
        assert_eq!(parse_origins(None), DEV_ORIGINS);
    }

    #[test]
    fn test_extra_origins_are_trimmed() {
        let origins = parse_origins(Some(" https://me.dev , ,https://www.me.dev"));
        assert_eq!(
            origins,
            [
                "http://localhost:5173",
                "http://127.0.0.1:5173",
                "https://me.dev",
                "https://www.me.dev"
            ]
        );
    }
}

use crate::services::activity::DEFAULT_ATTEMPT_WINDOW;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub secret_key: String,
    pub attempt_window: usize,
    pub match_by_address: bool,
    pub login_path: String,
    pub trust_forwarded_for: bool,
}

fn parse_flag(name: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("{} must be a boolean, got '{}'", name, other)),
    }
}

fn flag_from_env(name: &str, default: bool) -> anyhow::Result<bool> {
    match std::env::var(name) {
        Ok(value) => parse_flag(name, &value),
        Err(_) => Ok(default),
    }
}

fn parse_window(value: &str) -> anyhow::Result<usize> {
    let window: usize = value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("LOGINWATCH_ATTEMPT_WINDOW must be a positive integer"))?;
    if window == 0 {
        anyhow::bail!("LOGINWATCH_ATTEMPT_WINDOW must be at least 1");
    }
    Ok(window)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret_key = std::env::var("SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("SECRET_KEY environment variable is required"))?;

        let attempt_window = match std::env::var("LOGINWATCH_ATTEMPT_WINDOW") {
            Ok(value) => parse_window(&value)?,
            Err(_) => DEFAULT_ATTEMPT_WINDOW,
        };

        Ok(Config {
            bind_addr: {
                let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
                std::env::var("LOGINWATCH_BIND_ADDR")
                    .unwrap_or_else(|_| format!("0.0.0.0:{}", port))
            },
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://loginwatch.db?mode=rwc".to_string()),
            secret_key,
            attempt_window,
            match_by_address: flag_from_env("LOGINWATCH_MATCH_BY_ADDRESS", true)?,
            login_path: std::env::var("LOGINWATCH_LOGIN_PATH")
                .unwrap_or_else(|_| "/login".to_string()),
            trust_forwarded_for: flag_from_env("LOGINWATCH_TRUST_FORWARDED_FOR", false)?,
        })
    }
}

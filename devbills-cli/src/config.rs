use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use devbills_core::time::parse_tz;

use crate::state::ensure_devbills_home;

pub const API_URL_ENV: &str = "DEVBILLS_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiSection,
    pub view: ViewSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSection {
    /// Quiet period after the last keystroke before the list is filtered.
    pub search_debounce_ms: u64,
    pub history_months: u32,
    /// IANA name used to decide which month is "current".
    pub timezone: String,
    pub toast_secs: i64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for ViewSection {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            history_months: 4,
            timezone: "America/Sao_Paulo".to_string(),
            toast_secs: 3,
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse config.toml")
    }

    /// Apply an override for the API base url (normally from the environment).
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.max(1))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.view.search_debounce_ms)
    }

    pub fn toast_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.view.toast_secs)
    }

    /// Configured timezone, falling back to UTC when the name is unknown.
    pub fn timezone(&self) -> Tz {
        parse_tz(&self.view.timezone).unwrap_or_else(|| {
            tracing::warn!(timezone = %self.view.timezone, "unknown timezone, using UTC");
            Tz::UTC
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_devbills_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    let cfg = if p.exists() {
        let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        Config::from_toml(&s)?
    } else {
        Config::default()
    };
    Ok(cfg.with_api_url(std::env::var(API_URL_ENV).ok()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

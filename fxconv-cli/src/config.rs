//! Configuration loading from arguments, environment and the API key file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;

use fxconv_client::DEFAULT_BASE_URL;
use fxconv_hex::inbound::script_filter::DEFAULT_ICON;
use fxconv_types::StartupError;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// File holding the OpenExchangeRates app id
    #[arg(long, env = "FXCONV_API_KEY_FILE", default_value = "apikey", global = true)]
    pub api_key_file: PathBuf,

    /// Directory for currencies.json and latest.json
    #[arg(long, env = "FXCONV_CACHE_DIR", default_value = ".", global = true)]
    pub cache_dir: PathBuf,

    /// Base URL of the rates API
    #[arg(long, env = "FXCONV_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: String,

    /// Maximum age of cached rates, in seconds
    #[arg(
        long,
        env = "FXCONV_RATES_FRESHNESS_SECS",
        default_value_t = 6 * 60 * 60,
        global = true
    )]
    pub rates_freshness_secs: u64,

    /// Timeout for each rates API request, in seconds
    #[arg(long, env = "FXCONV_HTTP_TIMEOUT_SECS", default_value_t = 10, global = true)]
    pub timeout_secs: u64,

    /// Icon shown next to launcher results
    #[arg(long, env = "FXCONV_ICON", default_value = DEFAULT_ICON, global = true)]
    pub icon: String,
}

/// Application configuration.
pub struct Config {
    pub api_key: String,
    pub cache_dir: PathBuf,
    pub api_url: String,
    pub rates_freshness: Duration,
    pub timeout: Duration,
    pub icon: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("cache_dir", &self.cache_dir)
            .field("api_url", &self.api_url)
            .field("rates_freshness", &self.rates_freshness)
            .field("timeout", &self.timeout)
            .field("icon", &self.icon)
            .finish()
    }
}

impl Config {
    /// Resolves settings and reads the API key.
    ///
    /// Fails with [`StartupError::MissingCredential`] when the key file is
    /// missing, unreadable or empty.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let api_key = read_api_key(&settings.api_key_file)?;

        if settings.timeout_secs == 0 {
            anyhow::bail!("--timeout-secs must be at least 1");
        }

        Ok(Self {
            api_key,
            cache_dir: settings.cache_dir,
            api_url: settings.api_url,
            rates_freshness: Duration::from_secs(settings.rates_freshness_secs),
            timeout: Duration::from_secs(settings.timeout_secs),
            icon: settings.icon,
        })
    }
}

fn read_api_key(path: &Path) -> Result<String, StartupError> {
    let missing = |source| StartupError::MissingCredential {
        path: path.to_path_buf(),
        source,
    };

    let key = std::fs::read_to_string(path).map_err(missing)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(missing(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "file is empty",
        )));
    }
    Ok(key.to_string())
}

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::inference::ToxicityModelSource;

#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";
const DEFAULT_TOXICITY_MODEL_URL: &str = "https://huggingface.co/unitary/toxic-bert/resolve/main";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    http_bind: SocketAddr,
    youtube_api_key: String,
    youtube_api_base_url: String,
    youtube_connect_timeout: Duration,
    youtube_total_timeout: Duration,
    export_dir: PathBuf,
    toxicity_model: ToxicityModelSource,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数から設定値を読み込み、検証する。
    ///
    /// # Errors
    /// `YOUTUBE_API_KEY` が未設定、もしくは各種値のパースに失敗した場合は [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let youtube_api_key = env_var("YOUTUBE_API_KEY")?;
        if youtube_api_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "YOUTUBE_API_KEY",
                source: anyhow::anyhow!("must not be empty"),
            });
        }
        let http_bind = parse_socket_addr("COMMENT_ANALYZER_HTTP_BIND", "0.0.0.0:7860")?;
        let youtube_api_base_url = env::var("YOUTUBE_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_YOUTUBE_API_BASE_URL.to_string());
        let youtube_connect_timeout = parse_duration_ms("YOUTUBE_CONNECT_TIMEOUT_MS", 3000)?;
        let youtube_total_timeout = parse_duration_ms("YOUTUBE_TOTAL_TIMEOUT_MS", 30000)?;

        let export_dir = env::var("COMMENT_ANALYZER_EXPORT_DIR")
            .map_or_else(|_| env::temp_dir(), PathBuf::from);
        if !export_dir.is_dir() {
            return Err(ConfigError::Invalid {
                name: "COMMENT_ANALYZER_EXPORT_DIR",
                source: anyhow::anyhow!("{} is not a directory", export_dir.display()),
            });
        }

        let toxicity_model = match env::var("TOXICITY_MODEL_DIR") {
            Ok(dir) => ToxicityModelSource::Local(PathBuf::from(dir)),
            Err(_) => ToxicityModelSource::Remote(
                env::var("TOXICITY_MODEL_URL")
                    .unwrap_or_else(|_| DEFAULT_TOXICITY_MODEL_URL.to_string()),
            ),
        };

        Ok(Self {
            http_bind,
            youtube_api_key,
            youtube_api_base_url,
            youtube_connect_timeout,
            youtube_total_timeout,
            export_dir,
            toxicity_model,
        })
    }

    #[must_use]
    pub fn http_bind(&self) -> SocketAddr {
        self.http_bind
    }

    #[must_use]
    pub fn youtube_api_key(&self) -> &str {
        &self.youtube_api_key
    }

    #[must_use]
    pub fn youtube_api_base_url(&self) -> &str {
        &self.youtube_api_base_url
    }

    #[must_use]
    pub fn youtube_connect_timeout(&self) -> Duration {
        self.youtube_connect_timeout
    }

    #[must_use]
    pub fn youtube_total_timeout(&self) -> Duration {
        self.youtube_total_timeout
    }

    #[must_use]
    pub fn export_dir(&self) -> &std::path::Path {
        &self.export_dir
    }

    #[must_use]
    pub fn toxicity_model(&self) -> &ToxicityModelSource {
        &self.toxicity_model
    }
}

fn env_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());

    raw.parse().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_duration_ms(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default_ms.to_string());
    let ms = raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    Ok(Duration::from_millis(ms))
}

//! 服务配置。
//!
//! 启动时从环境变量读取一次，之后以只读方式注入各组件。

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use guess_core::domain::{DifficultyMatch, GameGenerator};
type Result<T> = anyhow::Result<T>;

/// Google Custom Search JSON API 默认地址。
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// 单张图片默认上限 10 MiB。
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub media_root: PathBuf,
    pub seed_file: Option<PathBuf>,
    pub search: SearchConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// 缺失时图片搜索退化为空操作。
    pub credentials: Option<SearchCredentials>,
    pub endpoint: String,
    pub search_timeout: Duration,
    pub download_timeout: Duration,
    pub max_concurrent_downloads: usize,
    /// 单张图片的最大字节数，超出的下载会被丢弃。
    pub max_image_bytes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            search_timeout: Duration::from_secs(5),
            download_timeout: Duration::from_secs(5),
            max_concurrent_downloads: 40,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SearchCredentials {
    pub api_key: String,
    pub engine_id: String,
}

impl fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("api_key", &"<redacted>")
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub option_count: usize,
    pub difficulty_match: DifficultyMatch,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            option_count: GameGenerator::DEFAULT_OPTION_COUNT,
            difficulty_match: DifficultyMatch::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源构建配置，便于测试。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL is not set"))?;

        let credentials = match (
            non_empty(lookup("SEARCH_API_KEY")),
            non_empty(lookup("SEARCH_ENGINE_ID")),
        ) {
            (Some(api_key), Some(engine_id)) => Some(SearchCredentials { api_key, engine_id }),
            _ => None,
        };

        let max_concurrent_downloads: usize =
            parse_or(&lookup, "MAX_CONCURRENT_DOWNLOADS", 40)?;
        if max_concurrent_downloads == 0 {
            return Err(anyhow!("MAX_CONCURRENT_DOWNLOADS must be at least 1"));
        }

        let search = SearchConfig {
            credentials,
            endpoint: lookup("SEARCH_ENDPOINT").unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string()),
            search_timeout: Duration::from_secs(parse_or(&lookup, "SEARCH_TIMEOUT_SECS", 5)?),
            download_timeout: Duration::from_secs(parse_or(&lookup, "DOWNLOAD_TIMEOUT_SECS", 5)?),
            max_concurrent_downloads,
            max_image_bytes: parse_or(&lookup, "MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
        };

        let option_count = parse_or(
            &lookup,
            "GAME_OPTION_COUNT",
            GameGenerator::DEFAULT_OPTION_COUNT,
        )?;
        if option_count == 0 {
            return Err(anyhow!("GAME_OPTION_COUNT must be at least 1"));
        }

        let game = GameConfig {
            option_count,
            difficulty_match: parse_or(&lookup, "DIFFICULTY_MATCH", DifficultyMatch::Exact)?,
        };

        Ok(Self {
            database_url,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8000)))?,
            media_root: lookup("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("media")),
            seed_file: non_empty(lookup("SEED_FILE")).map(PathBuf::from),
            search,
            game,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match non_empty(lookup(key)) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {raw}")),
        None => Ok(default),
    }
}

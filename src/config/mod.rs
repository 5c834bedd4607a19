//! 프로세스 설정
//! 환경 변수(.env 포함)에서 한 번 읽어 main 에서 각 구성 요소로 전달한다.
// region:    --- Imports
use crate::items::SaleNumberPolicy;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Config Error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}
// endregion: --- Config Error

// region:    --- Config
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_COLLECTION: &str = "auctionItems";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub items_collection: String,
    pub sale_number_policy: SaleNumberPolicy,
    pub body_limit_bytes: usize,
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env_or_default("BIND_ADDR", "0.0.0.0"),
            port: env_parse_or("PORT", DEFAULT_PORT)?,
            database_url: env_required("DATABASE_URL")?,
            database_max_connections: env_parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            items_collection: env_or_default("ITEMS_COLLECTION", DEFAULT_COLLECTION),
            sale_number_policy: env_parse_or("SALE_NUMBER_POLICY", SaleNumberPolicy::default())?,
            body_limit_bytes: env_parse_or("BODY_LIMIT_BYTES", 1024 * 1024)?,
        })
    }

    /// 리스너 주소
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::ParseError {
                key: "BIND_ADDR".to_string(),
                details: e.to_string(),
            })
    }
}

pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn env_parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
// endregion: --- Config

// endregion: --- Tests

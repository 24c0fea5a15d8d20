//! 설정 관리.
//!
//! 우선순위 (낮음 → 높음):
//! 1. 코드 내 기본값
//! 2. `config/default.toml` (없으면 건너뜀)
//! 3. `.env` 파일 및 환경 변수 (`SELECTSHOP__AUTH__JWT_SECRET` 형식)
//!
//! 비밀 값(JWT 키, 관리자 암호, DB URL, 검색 API 시크릿)은 [`SecretString`]으로 보관하여
//! `Debug` 출력에 노출되지 않습니다.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "SELECTSHOP";

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 인증 설정 (필수)
    pub auth: AuthConfig,
    /// 쇼핑 검색 API 설정
    #[serde(default)]
    pub naver: NaverConfig,
    /// 최저가 갱신 작업 설정
    #[serde(default)]
    pub price_refresh: PriceRefreshConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
///
/// `url`이 없으면 서버는 인메모리 저장소로 동작합니다.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL
    #[serde(default)]
    pub url: Option<SecretString>,
    /// 최대 연결 수
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}
fn default_acquire_timeout() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨 / 필터
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 인증 설정.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// base64로 인코딩된 HMAC 서명 키 (디코딩 후 32바이트 이상)
    pub jwt_secret: SecretString,
    /// 토큰 유효 시간 (초)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// 관리자 가입 시 필요한 암호
    pub admin_token: SecretString,
}

fn default_token_ttl() -> u64 {
    3600
}

/// 쇼핑 검색 API 설정.
#[derive(Debug, Deserialize)]
pub struct NaverConfig {
    pub base_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "empty_secret")]
    pub client_secret: SecretString,
    /// 한 번에 가져올 검색 결과 수
    #[serde(default = "default_display")]
    pub display: u32,
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new().into())
}
fn default_display() -> u32 {
    15
}
fn default_search_timeout() -> u64 {
    10
}

impl Default for NaverConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openapi.naver.com".to_string(),
            client_id: String::new(),
            client_secret: empty_secret(),
            display: default_display(),
            timeout_secs: default_search_timeout(),
        }
    }
}

/// 최저가 갱신 작업 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRefreshConfig {
    pub enabled: bool,
    /// 갱신 주기 (초)
    pub interval_secs: u64,
}

impl Default for PriceRefreshConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 86_400,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // .env 파일은 선택 사항
        let _ = dotenvy::dotenv();

        let config = Self::defaults()?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("config/default.toml")
    }

    /// TOML 문자열에서 설정을 로드합니다 (환경 변수 무시).
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("naver.base_url", "https://openapi.naver.com")?
            .set_default("price_refresh.enabled", false)?
            .set_default("price_refresh.interval_secs", 86_400)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_ttl_secs == 0 {
            return Err(ConfigError::Message(
                "auth.token_ttl_secs must be greater than 0".to_string(),
            ));
        }
        if !(1..=100).contains(&self.naver.display) {
            return Err(ConfigError::Message(
                "naver.display must be between 1 and 100".to_string(),
            ));
        }
        if self.price_refresh.enabled && self.price_refresh.interval_secs == 0 {
            return Err(ConfigError::Message(
                "price_refresh.interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const MINIMAL: &str = r#"
        [auth]
        jwt_secret = "c2VjcmV0LWtleS1mb3ItdGVzdGluZy1vbmx5LTMyYnl0ZXMh"
        admin_token = "admin-secret"
    "#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(config.auth.token_ttl_secs, 3600);
        assert_eq!(config.auth.admin_token.expose_secret(), "admin-secret");
        assert!(config.database.url.is_none());
        assert_eq!(config.naver.display, 15);
        assert_eq!(config.naver.base_url, "https://openapi.naver.com");
        assert!(!config.price_refresh.enabled);
    }

    #[test]
    fn test_missing_auth_section_fails() {
        let result = AppConfig::from_toml_str("[server]\nport = 9000\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let toml = format!("{}\ntoken_ttl_secs = 0\n", MINIMAL);
        let err = AppConfig::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("token_ttl_secs"));
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let config = AppConfig::from_toml_str(MINIMAL).unwrap();
        let debug = format!("{:?}", config.auth);
        assert!(!debug.contains("admin-secret"));
    }
}

//! 설정 관리 — ironaudit.toml 파싱 및 런타임 설정
//!
//! [`IronauditConfig`]는 CLI와 로깅이 사용하는 최상위 설정입니다.
//! 감사 코어 자체는 리소스의 예외 라벨 외에는 어떤 설정도 읽지 않습니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`IRONAUDIT_GENERAL_LOG_LEVEL=debug` 형식)
//! 3. 설정 파일 (`ironaudit.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), ironaudit_core::error::IronauditError> {
//! use ironaudit_core::config::IronauditConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = IronauditConfig::load("ironaudit.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = IronauditConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, IronauditError};

/// 매니페스트 파일 최대 크기 기본값 (10 MB)
pub const DEFAULT_MAX_MANIFEST_BYTES: u64 = 10 * 1024 * 1024;

/// ironaudit 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IronauditConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 감사 실행 설정
    #[serde(default)]
    pub audit: AuditConfig,
}

impl IronauditConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, IronauditError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값에 환경변수 오버라이드만 적용해서 반환합니다.
    ///
    /// 파일이 있지만 읽거나 파싱할 수 없으면 에러입니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, IronauditError> {
        let path = path.as_ref();
        match Self::load(path).await {
            Err(IronauditError::Config(ConfigError::FileNotFound { .. })) => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, IronauditError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IronauditError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                IronauditError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, IronauditError> {
        toml::from_str(toml_str).map_err(|e| {
            IronauditError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `IRONAUDIT_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "IRONAUDIT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "IRONAUDIT_GENERAL_LOG_FORMAT");

        override_bool(
            &mut self.audit.fail_on_findings,
            "IRONAUDIT_AUDIT_FAIL_ON_FINDINGS",
        );
        override_u64(
            &mut self.audit.max_manifest_bytes,
            "IRONAUDIT_AUDIT_MAX_MANIFEST_BYTES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), IronauditError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.audit.max_manifest_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "audit.max_manifest_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 감사 실행 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// 발견 사항이 있으면 0이 아닌 종료 코드로 끝낼지 여부
    pub fail_on_findings: bool,
    /// 매니페스트 파일 최대 크기 (바이트)
    pub max_manifest_bytes: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            fail_on_findings: true,
            max_manifest_bytes: DEFAULT_MAX_MANIFEST_BYTES,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

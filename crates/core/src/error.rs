//! 에러 타입 — 도메인별 에러 정의
//!
//! 감사 대상에서 발견된 문제(occurrence)는 에러가 아니라 데이터입니다.
//! 이 모듈의 에러는 감사를 진행할 수 없는 상황만 표현합니다.

/// ironaudit 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum IronauditError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 리소스 감사 에러
    #[error("audit error: {0}")]
    Audit(#[from] ResourceError),

    /// 매니페스트 파싱/로딩 에러
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 리소스 단위 감사 에러
///
/// 한 리소스의 감사를 중단시키지만 다른 리소스에는 영향을 주지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// 리소스 식별 정보를 만들 수 없음
    #[error("resource identity unavailable: {0}")]
    Identity(String),

    /// 감사할 수 없는 리소스 종류
    #[error("resource skipped: {0}")]
    Skipped(String),
}

/// 매니페스트 에러
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// 파일 로딩 실패
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    /// YAML 파싱 실패
    #[error("failed to parse {source_name}: {reason}")]
    Parse { source_name: String, reason: String },
}

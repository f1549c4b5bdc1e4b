//! 검사 에러 타입
//!
//! [`AuditError`]는 리소스 하나의 감사를 중단시키는 상황과 매니페스트 로딩 실패를 표현합니다.
//! 발견 사항은 에러가 아니므로 여기에 포함되지 않습니다.
//! `From<AuditError> for IronauditError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use ironaudit_core::error::{IronauditError, ManifestError, ResourceError};
use ironaudit_core::types::ResourceKind;

/// 검사 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// `metadata.name`이 없거나 비어있음
    #[error("{kind} resource has no metadata.name")]
    MissingName {
        /// 리소스 종류
        kind: ResourceKind,
    },

    /// 지원하지 않는 리소스 종류
    #[error("resource kind '{kind}' is not supported")]
    UnsupportedKind {
        /// 리소스 종류
        kind: ResourceKind,
    },

    /// 인식은 하지만 감사할 수 없는 리소스
    #[error("{resource} is not an auditable workload")]
    NotAuditable {
        /// 리소스 표시 이름 (Kind/namespace/name)
        resource: String,
    },

    /// 매니페스트 파일 로딩 실패
    #[error("manifest load error: {path}: {reason}")]
    ManifestLoad {
        /// 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 매니페스트 파싱 실패
    #[error("manifest parse error: {source_name}: {reason}")]
    ManifestParse {
        /// 입력 이름 (파일 경로 등)
        source_name: String,
        /// 실패 사유
        reason: String,
    },
}

impl AuditError {
    /// 경고 등급인지 여부
    ///
    /// 경고 등급은 리소스를 건너뛰기만 하고, 나머지는 에러로 기록됩니다.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NotAuditable { .. })
    }
}

impl From<AuditError> for IronauditError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::NotAuditable { .. } => {
                IronauditError::Audit(ResourceError::Skipped(err.to_string()))
            }
            AuditError::MissingName { .. } | AuditError::UnsupportedKind { .. } => {
                IronauditError::Audit(ResourceError::Identity(err.to_string()))
            }
            AuditError::ManifestLoad { path, reason } => {
                IronauditError::Manifest(ManifestError::Load { path, reason })
            }
            AuditError::ManifestParse {
                source_name,
                reason,
            } => IronauditError::Manifest(ManifestError::Parse {
                source_name,
                reason,
            }),
        }
    }
}

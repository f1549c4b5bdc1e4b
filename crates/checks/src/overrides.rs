//! 운영자 예외(override) 라벨 해석
//!
//! 예외 라벨은 규칙별로 예약된 키이며, 리소스에 존재하면 해당 규칙의 경고를
//! "허용됨"으로 낮춰 보고합니다. 라벨 값은 예외 사유로 그대로 기록됩니다.
//! 예외는 리소스 단위로 적용되어 리소스의 모든 컨테이너에 영향을 줍니다.

use std::fmt;

use ironaudit_core::finding::{AuditResult, RuleId};
use ironaudit_core::types::Resource;

/// 사유가 비어있을 때 보고서에 표시되는 값
pub const UNSPECIFIED_REASON: &str = "Unspecified";

/// 규칙별 예외 라벨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideLabel {
    /// `/var/run/docker.sock` 마운트 허용
    AllowMountDockerSock,
}

impl OverrideLabel {
    /// 리소스 라벨/어노테이션에서 조회할 키
    pub fn key(&self) -> &'static str {
        match self {
            Self::AllowMountDockerSock => "allow-mount-docker-sock",
        }
    }

    /// 예외가 적용되었을 때 보고되는 규칙
    pub fn allowed_rule(&self) -> RuleId {
        match self {
            Self::AllowMountDockerSock => RuleId::DockerSockMountAllowed,
        }
    }

    /// 리소스에서 예외 사유를 조회합니다.
    ///
    /// 라벨이 없으면 `None`, 있으면 값을 그대로 담은 사유를 반환합니다.
    pub fn lookup(&self, resource: &Resource) -> Option<OverrideReason> {
        resource
            .label_or_annotation(self.key())
            .map(|value| OverrideReason(value.to_owned()))
    }
}

impl fmt::Display for OverrideLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 운영자가 기록한 예외 사유 (빈 문자열도 유효)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideReason(String);

impl OverrideReason {
    /// 라벨 값 원문
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 보고서용 사유. 빈 값은 [`UNSPECIFIED_REASON`]으로 표시합니다.
    pub fn formatted(&self) -> &str {
        if self.0.is_empty() {
            UNSPECIFIED_REASON
        } else {
            &self.0
        }
    }
}

/// 진행 중인 결과의 리소스에 대해 예외 라벨을 조회합니다.
///
/// `result`는 로그 문맥으로만 사용되며 변경되지 않습니다.
pub fn override_reason(
    result: &AuditResult,
    resource: &Resource,
    label: OverrideLabel,
) -> Option<OverrideReason> {
    let reason = label.lookup(resource)?;
    tracing::debug!(
        resource = %result.resource,
        label = label.key(),
        reason = reason.formatted(),
        "override label present"
    );
    Some(reason)
}

//! 감사 결과 모델 — 모든 검사가 공유하는 occurrence/result 타입
//!
//! 검사 하나가 리소스 하나를 감사하면 [`AuditResult`]가 하나 만들어지고,
//! 컨테이너별로 발견된 문제는 [`Occurrence`]로 순서대로 쌓입니다.
//! 비어있는 결과는 보고하지 않습니다 ("no news" = 통과).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ResourceKind;

/// occurrence 메타데이터 (키 순서가 고정되어 출력이 재현 가능)
pub type Metadata = BTreeMap<String, String>;

/// 규칙 식별자
///
/// 검사 계열 전체가 공유하는 닫힌 열거형입니다.
/// 새 검사는 임의 문자열 대신 이 열거형에 변형을 추가합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleId {
    /// Docker 소켓이 마운트됨
    DockerSockMounted,
    /// 운영자 예외로 허용된 Docker 소켓 마운트
    DockerSockMountAllowed,
}

impl RuleId {
    /// 보고서에 표시되는 식별자 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DockerSockMounted => "DockerSockMounted",
            Self::DockerSockMountAllowed => "DockerSockMountAllowed",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// occurrence 심각도 종류
///
/// `Ord` 구현으로 비교가 가능합니다 (`Info < Warn < Error`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OccurrenceKind {
    /// 정보성
    Info,
    /// 경고
    Warn,
    /// 에러
    Error,
}

impl fmt::Display for OccurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 단일 발견 사항
///
/// 탐지된 조건 하나당 정확히 한 번 생성되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// 컨테이너 이름
    pub container: String,
    /// 규칙 식별자
    pub id: RuleId,
    /// 심각도 종류
    pub kind: OccurrenceKind,
    /// 사람이 읽는 메시지
    pub message: String,
    /// 추가 정보 (예: 예외 사유)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl Occurrence {
    /// 메타데이터 없는 occurrence를 생성합니다.
    pub fn new(
        container: impl Into<String>,
        id: RuleId,
        kind: OccurrenceKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            container: container.into(),
            id,
            kind,
            message: message.into(),
            metadata: Metadata::new(),
        }
    }

    /// 메타데이터 항목을 추가합니다.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} container={}: {}",
            self.kind, self.id, self.container, self.message
        )
    }
}

/// 감사된 리소스의 식별 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentity {
    /// 리소스 종류
    pub kind: ResourceKind,
    /// 리소스 이름
    pub name: String,
    /// 네임스페이스 (지정되지 않았으면 `None`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace.as_deref() {
            Some(ns) => write!(f, "{}/{}/{}", self.kind, ns, self.name),
            None => write!(f, "{}/{}", self.kind, self.name),
        }
    }
}

/// 리소스 하나에 대한 감사 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    /// 리소스 식별 정보
    pub resource: ResourceIdentity,
    /// 발견 사항 (컨테이너 선언 순서, 그 다음 마운트 순서)
    pub occurrences: Vec<Occurrence>,
}

impl AuditResult {
    /// 빈 결과를 생성합니다.
    pub fn new(resource: ResourceIdentity) -> Self {
        Self {
            resource,
            occurrences: Vec::new(),
        }
    }

    /// occurrence를 추가합니다.
    pub fn push(&mut self, occurrence: Occurrence) {
        self.occurrences.push(occurrence);
    }

    /// 보고할 내용이 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// 가장 높은 심각도
    pub fn max_kind(&self) -> Option<OccurrenceKind> {
        self.occurrences.iter().map(|o| o.kind).max()
    }

    /// 특정 심각도의 occurrence 수
    pub fn count_kind(&self, kind: OccurrenceKind) -> usize {
        self.occurrences.iter().filter(|o| o.kind == kind).count()
    }
}

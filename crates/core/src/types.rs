//! 리소스 모델 — 감사 대상 워크로드 명세
//!
//! 매니페스트 로더가 만든 [`Resource`]는 감사 코어 안에서 읽기 전용으로만 사용됩니다.
//! 필드 이름은 Kubernetes 매니페스트의 camelCase 키와 그대로 대응합니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// 리소스 종류
///
/// 알 수 없는 종류는 [`ResourceKind::Other`]로 보존되어
/// 감사 단계에서 "지원하지 않는 종류" 에러로 처리됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    /// 파드
    Pod,
    /// 디플로이먼트
    Deployment,
    /// 데몬셋
    DaemonSet,
    /// 스테이트풀셋
    StatefulSet,
    /// 레플리카셋
    ReplicaSet,
    /// 레플리케이션 컨트롤러
    ReplicationController,
    /// 잡
    Job,
    /// 크론잡
    CronJob,
    /// 네임스페이스 (워크로드 아님)
    Namespace,
    /// 서비스 (워크로드 아님)
    Service,
    /// 컨피그맵 (워크로드 아님)
    ConfigMap,
    /// 시크릿 (워크로드 아님)
    Secret,
    /// 서비스 어카운트 (워크로드 아님)
    ServiceAccount,
    /// 네트워크 정책 (워크로드 아님)
    NetworkPolicy,
    /// 인식하지 못한 종류 (원본 문자열 보존)
    Other(String),
}

impl ResourceKind {
    /// 매니페스트의 `kind` 문자열에서 종류를 결정합니다.
    ///
    /// 대소문자를 구분합니다 (Kubernetes 규칙과 동일).
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "Pod" => Self::Pod,
            "Deployment" => Self::Deployment,
            "DaemonSet" => Self::DaemonSet,
            "StatefulSet" => Self::StatefulSet,
            "ReplicaSet" => Self::ReplicaSet,
            "ReplicationController" => Self::ReplicationController,
            "Job" => Self::Job,
            "CronJob" => Self::CronJob,
            "Namespace" => Self::Namespace,
            "Service" => Self::Service,
            "ConfigMap" => Self::ConfigMap,
            "Secret" => Self::Secret,
            "ServiceAccount" => Self::ServiceAccount,
            "NetworkPolicy" => Self::NetworkPolicy,
            other => Self::Other(other.to_owned()),
        }
    }

    /// 매니페스트 표기 그대로의 종류 이름
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pod => "Pod",
            Self::Deployment => "Deployment",
            Self::DaemonSet => "DaemonSet",
            Self::StatefulSet => "StatefulSet",
            Self::ReplicaSet => "ReplicaSet",
            Self::ReplicationController => "ReplicationController",
            Self::Job => "Job",
            Self::CronJob => "CronJob",
            Self::Namespace => "Namespace",
            Self::Service => "Service",
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
            Self::ServiceAccount => "ServiceAccount",
            Self::NetworkPolicy => "NetworkPolicy",
            Self::Other(kind) => kind,
        }
    }

    /// 컨테이너를 담는 워크로드 종류인지 여부
    pub fn is_workload(&self) -> bool {
        matches!(
            self,
            Self::Pod
                | Self::Deployment
                | Self::DaemonSet
                | Self::StatefulSet
                | Self::ReplicaSet
                | Self::ReplicationController
                | Self::Job
                | Self::CronJob
        )
    }

    /// 인식은 하지만 컨테이너가 없어 감사 대상이 아닌 종류인지 여부
    pub fn is_non_workload(&self) -> bool {
        matches!(
            self,
            Self::Namespace
                | Self::Service
                | Self::ConfigMap
                | Self::Secret
                | Self::ServiceAccount
                | Self::NetworkPolicy
        )
    }
}

impl From<String> for ResourceKind {
    fn from(kind: String) -> Self {
        Self::from_kind(&kind)
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 리소스 메타데이터
///
/// `labels`/`annotations`가 매니페스트에 없거나 `null`이면 빈 맵으로 취급합니다.
/// 따옴표 없는 값(`true`, `3`)은 문자열로 읽고, 중첩 값은 에러입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// 리소스 이름 (없으면 식별 불가)
    #[serde(default)]
    pub name: Option<String>,
    /// 네임스페이스
    #[serde(default)]
    pub namespace: Option<String>,
    /// 라벨
    #[serde(default, deserialize_with = "scalar_map")]
    pub labels: BTreeMap<String, String>,
    /// 어노테이션
    #[serde(default, deserialize_with = "scalar_map")]
    pub annotations: BTreeMap<String, String>,
}

/// 스칼라 값만 허용하는 문자열 맵 디코더
fn scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, ScalarText>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, ScalarText(value))| (key, value))
        .collect())
}

/// 문자열로 표현된 스칼라 값
struct ScalarText(String);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarTextVisitor)
    }
}

struct ScalarTextVisitor;

impl Visitor<'_> for ScalarTextVisitor {
    type Value = ScalarText;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar label or annotation value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ScalarText(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_string()))
    }

    // `key:` (값 없음)은 빈 사유로 취급
    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ScalarText(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ScalarText(String::new()))
    }
}

/// 볼륨 마운트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    /// 볼륨 이름
    #[serde(default)]
    pub name: String,
    /// 컨테이너 내부 마운트 경로
    pub mount_path: String,
    /// 읽기 전용 여부
    #[serde(default)]
    pub read_only: bool,
}

impl VolumeMount {
    /// 경로만으로 마운트를 생성합니다.
    pub fn new(mount_path: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            mount_path: mount_path.into(),
            read_only: false,
        }
    }
}

/// 컨테이너 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// 컨테이너 이름 (리소스 내에서 유일)
    pub name: String,
    /// 이미지
    #[serde(default)]
    pub image: Option<String>,
    /// 볼륨 마운트 목록 (선언 순서 유지)
    #[serde(default)]
    pub volume_mounts: Vec<VolumeMount>,
}

impl Container {
    /// 마운트가 없는 컨테이너를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
            volume_mounts: Vec::new(),
        }
    }

    /// 마운트를 추가한 컨테이너를 반환합니다.
    pub fn with_mount(mut self, mount_path: impl Into<String>) -> Self {
        self.volume_mounts.push(VolumeMount::new(mount_path));
        self
    }
}

/// 감사 대상 리소스
///
/// 워크로드 컨트롤러(Deployment 등)의 경우 `containers`는 파드 템플릿의 컨테이너이고,
/// `metadata`의 라벨/어노테이션에는 파드 템플릿 메타데이터가 병합되어 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// API 버전 (예: apps/v1)
    #[serde(default)]
    pub api_version: String,
    /// 리소스 종류
    pub kind: ResourceKind,
    /// 메타데이터
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// 컨테이너 목록 (선언 순서 유지)
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl Resource {
    /// 이름이 지정된 빈 리소스를 생성합니다.
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            api_version: String::new(),
            kind,
            metadata: ObjectMeta {
                name: Some(name.into()),
                ..ObjectMeta::default()
            },
            containers: Vec::new(),
        }
    }

    /// 네임스페이스를 지정합니다.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata.namespace = Some(namespace.into());
        self
    }

    /// 라벨을 추가합니다.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    /// 어노테이션을 추가합니다.
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }

    /// 컨테이너를 추가합니다.
    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    /// 라벨, 어노테이션 순서로 키를 조회합니다.
    pub fn label_or_annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .labels
            .get(key)
            .or_else(|| self.metadata.annotations.get(key))
            .map(String::as_str)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.metadata.name.as_deref().unwrap_or("<unnamed>");
        match self.metadata.namespace.as_deref() {
            Some(ns) => write!(f, "{}/{}/{}", self.kind, ns, name),
            None => write!(f, "{}/{}", self.kind, name),
        }
    }
}

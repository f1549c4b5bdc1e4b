//! 매니페스트 로더 -- Kubernetes YAML 매니페스트를 [`Resource`]로 변환합니다.
//!
//! 하나의 파일에 `---`로 구분된 여러 문서를 담을 수 있습니다.
//! `kind: List`(또는 `PodList` 등 `*List`) 문서는 `items`를 펼쳐서 처리합니다.
//! 워크로드 컨트롤러는 파드 템플릿의 컨테이너를 사용하며,
//! 파드 템플릿의 라벨/어노테이션이 객체 메타데이터 위에 병합됩니다.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use ironaudit_core::config::DEFAULT_MAX_MANIFEST_BYTES;
use ironaudit_core::types::{Container, ObjectMeta, Resource, ResourceKind};

use crate::error::AuditError;

/// `List` 안에 중첩될 수 있는 최대 깊이
const MAX_LIST_DEPTH: usize = 8;

/// 문서 최상위 구조
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObject {
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: Option<Value>,
    #[serde(default)]
    items: Vec<Value>,
}

/// 파드 템플릿 (`spec.template`)
#[derive(Debug, Default, Deserialize)]
struct PodTemplate {
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    spec: PodSpec,
}

/// 파드 스펙 중 감사에 필요한 부분
#[derive(Debug, Default, Deserialize)]
struct PodSpec {
    #[serde(default)]
    containers: Vec<Container>,
}

/// 매니페스트 로더
pub struct ManifestLoader {
    max_file_size: u64,
}

impl ManifestLoader {
    /// 파일 크기 제한을 지정하여 로더를 생성합니다.
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// 파일 하나에서 모든 리소스를 로드합니다.
    ///
    /// # Errors
    /// - 파일 메타데이터/내용을 읽을 수 없는 경우
    /// - 파일 크기가 제한을 초과하는 경우
    /// - YAML 파싱에 실패한 경우 (파일 전체가 실패)
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<Vec<Resource>, AuditError> {
        let path = path.as_ref();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| AuditError::ManifestLoad {
                path: path.display().to_string(),
                reason: format!("failed to read file metadata: {e}"),
            })?;

        if metadata.len() > self.max_file_size {
            return Err(AuditError::ManifestLoad {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {})",
                    metadata.len(),
                    self.max_file_size
                ),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AuditError::ManifestLoad {
                    path: path.display().to_string(),
                    reason: format!("failed to read file: {e}"),
                })?;

        let resources = parse_manifest(&content, &path.display().to_string())?;

        tracing::info!(
            path = %path.display(),
            count = resources.len(),
            "loaded manifest"
        );

        Ok(resources)
    }
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MANIFEST_BYTES)
    }
}

/// YAML 문자열에서 리소스를 파싱합니다.
///
/// 빈 문서는 건너뜁니다. 리소스 순서는 문서 순서를 그대로 따릅니다.
pub fn parse_manifest(yaml: &str, source: &str) -> Result<Vec<Resource>, AuditError> {
    let mut resources = Vec::new();

    for document in serde_yaml::Deserializer::from_str(yaml) {
        let value = Value::deserialize(document).map_err(|e| parse_error(source, e))?;
        if value.is_null() {
            continue;
        }
        collect_resources(value, source, 0, &mut resources)?;
    }

    Ok(resources)
}

fn collect_resources(
    value: Value,
    source: &str,
    depth: usize,
    out: &mut Vec<Resource>,
) -> Result<(), AuditError> {
    if depth > MAX_LIST_DEPTH {
        return Err(AuditError::ManifestParse {
            source_name: source.to_owned(),
            reason: format!("lists nested deeper than {MAX_LIST_DEPTH} levels"),
        });
    }

    let raw: RawObject = serde_yaml::from_value(value).map_err(|e| parse_error(source, e))?;

    let kind = raw.kind.ok_or_else(|| AuditError::ManifestParse {
        source_name: source.to_owned(),
        reason: "document has no kind".to_owned(),
    })?;

    if kind.ends_with("List") {
        for item in raw.items {
            collect_resources(item, source, depth + 1, out)?;
        }
        return Ok(());
    }

    let kind = ResourceKind::from_kind(&kind);
    let mut metadata = raw.metadata;

    let template = if kind == ResourceKind::Pod {
        let spec = match raw.spec {
            Some(spec) => {
                serde_yaml::from_value::<PodSpec>(spec).map_err(|e| parse_error(source, e))?
            }
            None => PodSpec::default(),
        };
        Some(PodTemplate {
            metadata: ObjectMeta::default(),
            spec,
        })
    } else {
        match pod_template(&kind, raw.spec.as_ref()) {
            Some(value) => Some(
                serde_yaml::from_value::<PodTemplate>(value.clone())
                    .map_err(|e| parse_error(source, e))?,
            ),
            None => None,
        }
    };

    let containers = match template {
        Some(template) => {
            metadata.labels.extend(template.metadata.labels);
            metadata.annotations.extend(template.metadata.annotations);
            template.spec.containers
        }
        None => Vec::new(),
    };

    out.push(Resource {
        api_version: raw.api_version,
        kind,
        metadata,
        containers,
    });
    Ok(())
}

/// 종류별 파드 템플릿 위치를 찾습니다.
fn pod_template<'a>(kind: &ResourceKind, spec: Option<&'a Value>) -> Option<&'a Value> {
    let spec = spec?;
    match kind {
        ResourceKind::Deployment
        | ResourceKind::DaemonSet
        | ResourceKind::StatefulSet
        | ResourceKind::ReplicaSet
        | ResourceKind::ReplicationController
        | ResourceKind::Job => spec.get("template"),
        ResourceKind::CronJob => spec
            .get("jobTemplate")
            .and_then(|job| job.get("spec"))
            .and_then(|job_spec| job_spec.get("template")),
        _ => None,
    }
}

fn parse_error(source: &str, e: serde_yaml::Error) -> AuditError {
    AuditError::ManifestParse {
        source_name: source.to_owned(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOYMENT: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: prod
  labels:
    app: web
spec:
  replicas: 2
  template:
    metadata:
      labels:
        app: web
        allow-mount-docker-sock: "ci pipeline"
    spec:
      containers:
        - name: app
          image: nginx:1.27
          volumeMounts:
            - name: data
              mountPath: /data
            - name: docker
              mountPath: /var/run/docker.sock
"#;

    #[test]
    fn parses_deployment_template() {
        let resources = parse_manifest(DEPLOYMENT, "test").unwrap();
        assert_eq!(resources.len(), 1);
        let r = &resources[0];
        assert_eq!(r.kind, ResourceKind::Deployment);
        assert_eq!(r.api_version, "apps/v1");
        assert_eq!(r.metadata.name.as_deref(), Some("web"));
        assert_eq!(r.metadata.namespace.as_deref(), Some("prod"));
        assert_eq!(r.containers.len(), 1);
        assert_eq!(r.containers[0].volume_mounts.len(), 2);
        assert_eq!(
            r.metadata.labels.get("allow-mount-docker-sock").map(String::as_str),
            Some("ci pipeline")
        );
    }

    #[test]
    fn parses_pod_spec_directly() {
        let yaml = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: app
      volumeMounts:
        - mountPath: /var/run/docker.sock
    - name: sidecar
"#;
        let resources = parse_manifest(yaml, "test").unwrap();
        assert_eq!(resources[0].containers.len(), 2);
        assert!(resources[0].containers[1].volume_mounts.is_empty());
    }

    #[test]
    fn parses_cronjob_job_template() {
        let yaml = r#"
apiVersion: batch/v1
kind: CronJob
metadata:
  name: nightly
spec:
  schedule: "0 0 * * *"
  jobTemplate:
    spec:
      template:
        spec:
          containers:
            - name: backup
              volumeMounts:
                - mountPath: /var/run/docker.sock
"#;
        let resources = parse_manifest(yaml, "test").unwrap();
        assert_eq!(resources[0].kind, ResourceKind::CronJob);
        assert_eq!(resources[0].containers[0].name, "backup");
    }

    #[test]
    fn multi_document_preserves_order_and_skips_empty() {
        let yaml = format!("---\n{DEPLOYMENT}\n---\n---\napiVersion: v1\nkind: Service\nmetadata:\n  name: web\n");
        let resources = parse_manifest(&yaml, "test").unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].kind, ResourceKind::Deployment);
        assert_eq!(resources[1].kind, ResourceKind::Service);
        assert!(resources[1].containers.is_empty());
    }

    #[test]
    fn list_items_are_flattened() {
        let yaml = r#"
apiVersion: v1
kind: List
items:
  - apiVersion: v1
    kind: Pod
    metadata:
      name: a
  - apiVersion: v1
    kind: Pod
    metadata:
      name: b
"#;
        let resources = parse_manifest(yaml, "test").unwrap();
        let names: Vec<_> = resources
            .iter()
            .map(|r| r.metadata.name.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn template_labels_override_object_labels() {
        let yaml = r#"
kind: DaemonSet
metadata:
  name: agent
  labels:
    tier: object
spec:
  template:
    metadata:
      labels:
        tier: template
    spec:
      containers: []
"#;
        let resources = parse_manifest(yaml, "test").unwrap();
        assert_eq!(
            resources[0].metadata.labels.get("tier").map(String::as_str),
            Some("template")
        );
    }

    #[test]
    fn unknown_kind_is_kept_for_audit_to_reject() {
        let yaml = "kind: Widget\nmetadata:\n  name: w\n";
        let resources = parse_manifest(yaml, "test").unwrap();
        assert_eq!(resources[0].kind, ResourceKind::Other("Widget".to_owned()));
    }

    #[test]
    fn missing_kind_is_parse_error() {
        let err = parse_manifest("metadata:\n  name: x\n", "a.yaml").unwrap_err();
        assert!(matches!(err, AuditError::ManifestParse { .. }));
        assert!(err.to_string().contains("a.yaml"));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = parse_manifest("kind: [unclosed\n", "bad.yaml").unwrap_err();
        assert!(matches!(err, AuditError::ManifestParse { .. }));
    }

    #[test]
    fn empty_input_yields_no_resources() {
        assert!(parse_manifest("", "empty").unwrap().is_empty());
    }
}

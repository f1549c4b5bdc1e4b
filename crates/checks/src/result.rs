//! 결과 생성 — 리소스 식별 정보에 묶인 빈 [`AuditResult`]를 만듭니다.

use ironaudit_core::finding::{AuditResult, ResourceIdentity};
use ironaudit_core::types::Resource;

use crate::error::AuditError;

/// 리소스에 대한 빈 결과를 생성합니다.
///
/// # Errors
/// - [`AuditError::UnsupportedKind`]: 알 수 없는 리소스 종류
/// - [`AuditError::NotAuditable`]: 워크로드가 아닌 리소스 (경고 등급)
/// - [`AuditError::MissingName`]: `metadata.name`이 없거나 비어있음
///
/// 어느 경우든 호출자는 해당 리소스의 감사를 중단해야 합니다.
pub fn new_result_from_resource(resource: &Resource) -> Result<AuditResult, AuditError> {
    if resource.kind.is_non_workload() {
        return Err(AuditError::NotAuditable {
            resource: resource.to_string(),
        });
    }

    if !resource.kind.is_workload() {
        return Err(AuditError::UnsupportedKind {
            kind: resource.kind.clone(),
        });
    }

    let name = match resource.metadata.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => {
            return Err(AuditError::MissingName {
                kind: resource.kind.clone(),
            });
        }
    };

    Ok(AuditResult::new(ResourceIdentity {
        kind: resource.kind.clone(),
        name,
        namespace: resource.metadata.namespace.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use ironaudit_core::types::ResourceKind;

    use super::*;

    #[test]
    fn workload_gets_empty_result() {
        let resource = Resource::new(ResourceKind::Deployment, "web").with_namespace("prod");
        let result = new_result_from_resource(&resource).expect("deployment is auditable");
        assert!(result.is_empty());
        assert_eq!(result.resource.name, "web");
        assert_eq!(result.resource.namespace.as_deref(), Some("prod"));
        assert_eq!(result.resource.kind, ResourceKind::Deployment);
    }

    #[test]
    fn missing_name_is_error() {
        let mut resource = Resource::new(ResourceKind::Pod, "x");
        resource.metadata.name = None;
        let err = new_result_from_resource(&resource).unwrap_err();
        assert!(matches!(err, AuditError::MissingName { .. }));
        assert!(!err.is_warning());
    }

    #[test]
    fn empty_name_is_error() {
        let resource = Resource::new(ResourceKind::Pod, "");
        assert!(matches!(
            new_result_from_resource(&resource),
            Err(AuditError::MissingName { .. })
        ));
    }

    #[test]
    fn unknown_kind_is_error() {
        let resource = Resource::new(ResourceKind::Other("Widget".to_owned()), "w");
        let err = new_result_from_resource(&resource).unwrap_err();
        assert!(matches!(err, AuditError::UnsupportedKind { .. }));
        assert!(!err.is_warning());
    }

    #[test]
    fn non_workload_is_warning() {
        let resource = Resource::new(ResourceKind::Service, "frontend");
        let err = new_result_from_resource(&resource).unwrap_err();
        assert!(err.is_warning());
        assert!(err.to_string().contains("Service/frontend"));
    }
}

//! 검사 trait 및 공통 감사 루프
//!
//! 모든 컨테이너 검사는 같은 흐름을 따릅니다:
//! 결과 생성 → 컨테이너별 평가 (선언 순서) → 빈 결과 폐기.
//! [`audit_containers`]가 이 흐름을 구현하고, 개별 검사는 컨테이너 평가만 제공합니다.

use ironaudit_core::finding::AuditResult;
use ironaudit_core::types::{Container, Resource};

use crate::error::AuditError;
use crate::result::new_result_from_resource;

/// 컨테이너 단위 검사
///
/// 구현체는 상태가 없어야 하며, 서로 다른 리소스를 병렬로 감사해도 안전해야 합니다.
pub trait Check: Send + Sync {
    /// 검사 이름 (CLI 서브커맨드 이름과 동일)
    fn name(&self) -> &'static str;

    /// 컨테이너 하나를 평가하여 발견 사항을 `result`에 추가합니다.
    fn check_container(&self, container: &Container, resource: &Resource, result: &mut AuditResult);

    /// 리소스 하나를 감사합니다.
    ///
    /// 발견 사항이 없으면 빈 벡터를 반환합니다.
    fn audit(&self, resource: &Resource) -> Result<Vec<AuditResult>, AuditError> {
        audit_containers(self.name(), resource, |container, result| {
            self.check_container(container, resource, result)
        })
    }
}

/// 리소스의 모든 컨테이너에 `check`를 적용합니다.
///
/// 컨테이너가 없으면 결과를 만들지 않고 바로 빈 벡터를 반환합니다.
/// 결과 생성 실패는 로그를 남긴 뒤 그대로 반환하여 호출자가 다음 리소스로 넘어갈지 결정하게 합니다.
pub fn audit_containers<F>(
    check_name: &str,
    resource: &Resource,
    mut check: F,
) -> Result<Vec<AuditResult>, AuditError>
where
    F: FnMut(&Container, &mut AuditResult),
{
    if resource.containers.is_empty() {
        tracing::trace!(check = check_name, resource = %resource, "no containers");
        return Ok(Vec::new());
    }

    let mut result = match new_result_from_resource(resource) {
        Ok(result) => result,
        Err(e) => {
            if e.is_warning() {
                tracing::warn!(check = check_name, resource = %resource, error = %e, "skipping resource");
            } else {
                tracing::error!(check = check_name, resource = %resource, error = %e, "cannot audit resource");
            }
            return Err(e);
        }
    };

    for container in &resource.containers {
        check(container, &mut result);
    }

    tracing::debug!(
        check = check_name,
        resource = %result.resource,
        containers = resource.containers.len(),
        occurrences = result.occurrences.len(),
        "audited resource"
    );

    if result.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![result])
    }
}

//! Docker 소켓 마운트 검사
//!
//! 컨테이너가 호스트의 `/var/run/docker.sock`을 마운트하면 컨테이너 안에서
//! 호스트 Docker 데몬을 제어할 수 있습니다. 마운트 하나당 WARN occurrence 하나를 남기며,
//! 리소스에 `allow-mount-docker-sock` 라벨이 있으면 "허용됨"으로 보고합니다.

use ironaudit_core::finding::{AuditResult, Occurrence, OccurrenceKind, RuleId};
use ironaudit_core::types::{Container, Resource};

use crate::check::Check;
use crate::error::AuditError;
use crate::overrides::{OverrideLabel, override_reason};

/// Docker 소켓 경로 (정확히 일치할 때만 탐지)
pub const DOCKER_SOCK_PATH: &str = "/var/run/docker.sock";

/// 예외 사유가 기록되는 메타데이터 키
pub const REASON_METADATA_KEY: &str = "Reason";

/// `mountds` 검사
#[derive(Debug, Clone, Copy, Default)]
pub struct MountDockerSock;

impl Check for MountDockerSock {
    fn name(&self) -> &'static str {
        "mountds"
    }

    fn check_container(&self, container: &Container, resource: &Resource, result: &mut AuditResult) {
        check_mount_docker_sock(container, resource, result);
    }
}

/// 컨테이너 하나를 평가합니다.
///
/// 일치하는 마운트마다 occurrence를 하나씩 추가하며 중복 마운트도 각각 보고합니다.
pub fn check_mount_docker_sock(container: &Container, resource: &Resource, result: &mut AuditResult) {
    let reason = override_reason(result, resource, OverrideLabel::AllowMountDockerSock);

    for _ in container
        .volume_mounts
        .iter()
        .filter(|mount| mount.mount_path == DOCKER_SOCK_PATH)
    {
        let occurrence = match &reason {
            Some(reason) => Occurrence::new(
                &container.name,
                OverrideLabel::AllowMountDockerSock.allowed_rule(),
                OccurrenceKind::Warn,
                format!("Allowed mounting {DOCKER_SOCK_PATH}."),
            )
            .with_metadata(REASON_METADATA_KEY, reason.formatted()),
            None => Occurrence::new(
                &container.name,
                RuleId::DockerSockMounted,
                OccurrenceKind::Warn,
                format!("{DOCKER_SOCK_PATH} is being mounted, please avoid this practice."),
            ),
        };

        tracing::debug!(
            resource = %result.resource,
            container = %container.name,
            rule = %occurrence.id,
            "docker socket mount found"
        );
        result.push(occurrence);
    }
}

/// 리소스 하나에 대해 `mountds` 검사를 실행합니다.
///
/// CLI가 리소스마다 한 번씩 호출하는 진입점입니다.
pub fn audit_mount_docker_sock(resource: &Resource) -> Result<Vec<AuditResult>, AuditError> {
    MountDockerSock.audit(resource)
}

#[cfg(test)]
mod tests {
    use ironaudit_core::types::ResourceKind;

    use super::*;
    use crate::result::new_result_from_resource;

    fn evaluate(container: &Container, resource: &Resource) -> AuditResult {
        let mut result = new_result_from_resource(resource).expect("pod is auditable");
        check_mount_docker_sock(container, resource, &mut result);
        result
    }

    #[test]
    fn no_mounts_produces_nothing() {
        let resource = Resource::new(ResourceKind::Pod, "web");
        let result = evaluate(&Container::new("app"), &resource);
        assert!(result.is_empty());
    }

    #[test]
    fn unrelated_mounts_produce_nothing() {
        let resource = Resource::new(ResourceKind::Pod, "web");
        let container = Container::new("app")
            .with_mount("/data")
            .with_mount("/var/run")
            .with_mount("/var/run/docker.sock/")
            .with_mount("/VAR/RUN/DOCKER.SOCK")
            .with_mount("/host/var/run/docker.sock");
        assert!(evaluate(&container, &resource).is_empty());
    }

    #[test]
    fn mount_without_override_is_flagged() {
        let resource = Resource::new(ResourceKind::Pod, "web");
        let container = Container::new("app").with_mount(DOCKER_SOCK_PATH);
        let result = evaluate(&container, &resource);

        assert_eq!(result.occurrences.len(), 1);
        let occ = &result.occurrences[0];
        assert_eq!(occ.id, RuleId::DockerSockMounted);
        assert_eq!(occ.kind, OccurrenceKind::Warn);
        assert_eq!(occ.container, "app");
        assert_eq!(
            occ.message,
            "/var/run/docker.sock is being mounted, please avoid this practice."
        );
        assert!(occ.metadata.is_empty());
    }

    #[test]
    fn mount_with_override_is_allowed_with_reason() {
        let resource = Resource::new(ResourceKind::Pod, "web")
            .with_label("allow-mount-docker-sock", "ci pipeline");
        let container = Container::new("app").with_mount(DOCKER_SOCK_PATH);
        let result = evaluate(&container, &resource);

        assert_eq!(result.occurrences.len(), 1);
        let occ = &result.occurrences[0];
        assert_eq!(occ.id, RuleId::DockerSockMountAllowed);
        assert_eq!(occ.kind, OccurrenceKind::Warn);
        assert_eq!(occ.message, "Allowed mounting /var/run/docker.sock.");
        assert_eq!(
            occ.metadata.get(REASON_METADATA_KEY).map(String::as_str),
            Some("ci pipeline")
        );
        assert_eq!(occ.metadata.len(), 1);
    }

    #[test]
    fn empty_override_reason_uses_placeholder() {
        let resource =
            Resource::new(ResourceKind::Pod, "web").with_label("allow-mount-docker-sock", "");
        let container = Container::new("app").with_mount(DOCKER_SOCK_PATH);
        let result = evaluate(&container, &resource);

        assert_eq!(
            result.occurrences[0]
                .metadata
                .get(REASON_METADATA_KEY)
                .map(String::as_str),
            Some("Unspecified")
        );
    }

    #[test]
    fn duplicate_mounts_are_each_reported() {
        let resource = Resource::new(ResourceKind::Pod, "web")
            .with_label("allow-mount-docker-sock", "agent");
        let container = Container::new("app")
            .with_mount(DOCKER_SOCK_PATH)
            .with_mount("/data")
            .with_mount(DOCKER_SOCK_PATH)
            .with_mount(DOCKER_SOCK_PATH);
        let result = evaluate(&container, &resource);

        assert_eq!(result.occurrences.len(), 3);
        assert!(
            result
                .occurrences
                .iter()
                .all(|o| o.id == RuleId::DockerSockMountAllowed)
        );
    }

    #[test]
    fn override_applies_to_every_container() {
        let resource = Resource::new(ResourceKind::Deployment, "web")
            .with_label("allow-mount-docker-sock", "shared")
            .with_container(Container::new("a").with_mount(DOCKER_SOCK_PATH))
            .with_container(Container::new("b").with_mount(DOCKER_SOCK_PATH));

        let results = audit_mount_docker_sock(&resource).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].occurrences.len(), 2);
        assert!(
            results[0]
                .occurrences
                .iter()
                .all(|o| o.id == RuleId::DockerSockMountAllowed)
        );
    }

    #[test]
    fn clean_resource_is_not_reported() {
        let resource = Resource::new(ResourceKind::Pod, "web")
            .with_container(Container::new("app").with_mount("/data"));
        assert!(audit_mount_docker_sock(&resource).unwrap().is_empty());
    }

    #[test]
    fn check_name_matches_subcommand() {
        assert_eq!(MountDockerSock.name(), "mountds");
    }
}

//! proptest 기반 속성 테스트 -- 임의의 컨테이너/마운트 조합에 대한 불변식 검증

use proptest::prelude::*;

use ironaudit_checks::{DOCKER_SOCK_PATH, audit_mount_docker_sock, check_mount_docker_sock};
use ironaudit_checks::new_result_from_resource;
use ironaudit_core::finding::{OccurrenceKind, RuleId};
use ironaudit_core::types::{Container, Resource, ResourceKind};

const OVERRIDE_KEY: &str = "allow-mount-docker-sock";

/// Docker 소켓 경로와 절대 같지 않은 마운트 경로
fn other_path() -> impl Strategy<Value = String> {
    "/[a-z]{1,8}(/[a-z.]{1,8}){0,3}".prop_filter("must differ from the socket path", |p| {
        p != DOCKER_SOCK_PATH
    })
}

/// 소켓 경로가 섞인 마운트 목록
fn mounts() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            3 => other_path(),
            1 => Just(DOCKER_SOCK_PATH.to_owned()),
        ],
        0..8,
    )
}

fn container_with(name: &str, paths: &[String]) -> Container {
    paths
        .iter()
        .fold(Container::new(name), |c, p| c.with_mount(p.clone()))
}

proptest! {
    #[test]
    fn no_matching_mount_means_no_occurrence(paths in prop::collection::vec(other_path(), 0..8)) {
        let resource = Resource::new(ResourceKind::Pod, "web");
        let mut result = new_result_from_resource(&resource).unwrap();
        check_mount_docker_sock(&container_with("app", &paths), &resource, &mut result);
        prop_assert!(result.is_empty());
    }

    #[test]
    fn one_occurrence_per_matching_mount(
        paths in mounts(),
        reason in prop::option::of("[a-z ]{0,12}"),
    ) {
        let mut resource = Resource::new(ResourceKind::Pod, "web");
        if let Some(reason) = &reason {
            resource = resource.with_label(OVERRIDE_KEY, reason.clone());
        }
        let mut result = new_result_from_resource(&resource).unwrap();
        check_mount_docker_sock(&container_with("app", &paths), &resource, &mut result);

        let expected = paths.iter().filter(|p| *p == DOCKER_SOCK_PATH).count();
        prop_assert_eq!(result.occurrences.len(), expected);

        for occ in &result.occurrences {
            prop_assert_eq!(occ.kind, OccurrenceKind::Warn);
            prop_assert_eq!(occ.container.as_str(), "app");
            match &reason {
                Some(reason) => {
                    prop_assert_eq!(occ.id, RuleId::DockerSockMountAllowed);
                    let shown = if reason.is_empty() { "Unspecified" } else { reason.as_str() };
                    prop_assert_eq!(occ.metadata.get("Reason").map(String::as_str), Some(shown));
                }
                None => {
                    prop_assert_eq!(occ.id, RuleId::DockerSockMounted);
                    prop_assert!(occ.metadata.is_empty());
                }
            }
        }
    }

    #[test]
    fn audit_order_follows_container_then_mount_order(containers in prop::collection::vec(mounts(), 0..6)) {
        let resource = containers.iter().enumerate().fold(
            Resource::new(ResourceKind::Deployment, "web"),
            |r, (i, paths)| r.with_container(container_with(&format!("c{i}"), paths)),
        );

        let results = audit_mount_docker_sock(&resource).unwrap();
        let expected: Vec<String> = containers
            .iter()
            .enumerate()
            .flat_map(|(i, paths)| {
                paths
                    .iter()
                    .filter(|p| *p == DOCKER_SOCK_PATH)
                    .map(move |_| format!("c{i}"))
            })
            .collect();

        if expected.is_empty() {
            prop_assert!(results.is_empty());
        } else {
            prop_assert_eq!(results.len(), 1);
            let actual: Vec<String> = results[0]
                .occurrences
                .iter()
                .map(|o| o.container.clone())
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }
}

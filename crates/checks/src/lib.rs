#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error type (`AuditError`)
//! - [`overrides`]: Operator override labels (`OverrideLabel`, `OverrideReason`)
//! - [`result`]: Result construction (`new_result_from_resource`)
//! - [`check`]: The `Check` trait and the shared per-container audit loop
//! - [`mount_docker_sock`]: The `mountds` check (`MountDockerSock`)
//! - [`manifest`]: Kubernetes YAML manifest loading (`ManifestLoader`)
//!
//! # Architecture
//!
//! ```text
//! Resource --> Check::audit()
//!                  |
//!             new_result_from_resource()  (AuditError -> caller)
//!                  |
//!             per container: check_container() --> override_reason()
//!                  |
//!             Vec<AuditResult> (empty results dropped)
//! ```

pub mod check;
pub mod error;
pub mod manifest;
pub mod mount_docker_sock;
pub mod overrides;
pub mod result;

// --- Public API Re-exports ---

// Check
pub use check::{Check, audit_containers};

// Error
pub use error::AuditError;

// Overrides
pub use overrides::{OverrideLabel, OverrideReason, UNSPECIFIED_REASON, override_reason};

// Result
pub use result::new_result_from_resource;

// mountds
pub use mount_docker_sock::{
    DOCKER_SOCK_PATH, MountDockerSock, audit_mount_docker_sock, check_mount_docker_sock,
};

// Manifest
pub use manifest::{ManifestLoader, parse_manifest};

#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod finding;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, IronauditError, ManifestError, ResourceError};

// 설정
pub use config::IronauditConfig;

// 감사 결과
pub use finding::{AuditResult, Metadata, Occurrence, OccurrenceKind, ResourceIdentity, RuleId};

// 리소스 모델
pub use types::{Container, ObjectMeta, Resource, ResourceKind, VolumeMount};

//! `ironaudit mountds` command handler

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use ironaudit_checks::{AuditError, ManifestLoader, audit_mount_docker_sock};
use ironaudit_core::config::IronauditConfig;
use ironaudit_core::finding::{AuditResult, OccurrenceKind};
use ironaudit_core::types::Resource;

use crate::cli::MountdsArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `mountds` command.
///
/// Every manifest is loaded and every resource audited even when some of
/// them fail; failures are collected into the report.
///
/// # Errors
///
/// * `CliError::Command` if any manifest failed to load or any resource audit errored
/// * `CliError::Findings` if occurrences were reported and `fail_on_findings` is set
pub async fn execute(
    args: MountdsArgs,
    config: &IronauditConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let loader = ManifestLoader::new(config.audit.max_manifest_bytes);

    let mut files = Vec::with_capacity(args.manifests.len());
    for path in args.manifests {
        let loaded = loader.load_file(&path).await;
        files.push((path, loaded));
    }

    let report = build_report(files);

    writer.render(&report)?;

    finish(&report, config.audit.fail_on_findings)
}

/// Audit every loaded resource and assemble the report.
///
/// Performs no I/O.
fn build_report(files: Vec<(PathBuf, Result<Vec<Resource>, AuditError>)>) -> MountdsReport {
    let mut report = MountdsReport::default();

    for (path, loaded) in files {
        report.files_scanned += 1;

        let resources = match loaded {
            Ok(resources) => resources,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load manifest");
                report.load_errors.push(ErrorEntry {
                    source: path.display().to_string(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        for resource in &resources {
            report.resources_scanned += 1;

            // Kinds without a pod template have no containers to audit
            if !resource.kind.is_workload() && resource.containers.is_empty() {
                debug!(resource = %resource, "not a workload, skipping");
                report.skipped.push(resource.to_string());
                continue;
            }

            match audit_mount_docker_sock(resource) {
                Ok(results) => report.results.extend(results),
                Err(e) if e.is_warning() => report.skipped.push(resource.to_string()),
                Err(e) => report.audit_errors.push(ErrorEntry {
                    source: resource.to_string(),
                    message: e.to_string(),
                }),
            }
        }
    }

    report.summary = Summary::from_results(&report.results);

    info!(
        files = report.files_scanned,
        resources = report.resources_scanned,
        results = report.results.len(),
        occurrences = report.summary.total,
        "mountds audit complete"
    );

    report
}

/// Map the finished report to the command outcome.
fn finish(report: &MountdsReport, fail_on_findings: bool) -> Result<(), CliError> {
    if !report.load_errors.is_empty() || !report.audit_errors.is_empty() {
        return Err(CliError::Command(format!(
            "{} manifest(s) failed to load, {} resource(s) failed to audit",
            report.load_errors.len(),
            report.audit_errors.len()
        )));
    }

    if fail_on_findings && report.summary.total > 0 {
        return Err(CliError::Findings(report.summary.total));
    }

    Ok(())
}

/// `mountds` audit report.
#[derive(Debug, Default, Serialize)]
pub struct MountdsReport {
    /// Number of manifest files given on the command line
    pub files_scanned: usize,
    /// Number of resources read from the manifests
    pub resources_scanned: usize,
    /// Non-empty audit results, in manifest order
    pub results: Vec<AuditResult>,
    /// Resources that are not auditable workloads
    pub skipped: Vec<String>,
    /// Manifest files that could not be loaded
    pub load_errors: Vec<ErrorEntry>,
    /// Resources whose audit failed
    pub audit_errors: Vec<ErrorEntry>,
    /// Occurrence counts by kind
    pub summary: Summary,
}

/// A failure attributed to a file or resource.
#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    pub source: String,
    pub message: String,
}

/// Occurrence counts.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub error: usize,
    pub warn: usize,
    pub info: usize,
}

impl Summary {
    fn from_results(results: &[AuditResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.error += result.count_kind(OccurrenceKind::Error);
            summary.warn += result.count_kind(OccurrenceKind::Warn);
            summary.info += result.count_kind(OccurrenceKind::Info);
        }
        summary.total = summary.error + summary.warn + summary.info;
        summary
    }
}

impl Render for MountdsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "{}", "Docker socket mount audit".bold())?;
        writeln!(w, "Files scanned: {}", self.files_scanned)?;
        writeln!(w, "Resources scanned: {}", self.resources_scanned)?;
        writeln!(w)?;

        if self.results.is_empty() {
            writeln!(w, "{}", "No docker socket mounts found.".green())?;
        }

        for result in &self.results {
            writeln!(w, "{}", result.resource.to_string().bold())?;
            for occ in &result.occurrences {
                let kind = occ.kind.to_string();
                let kind = match occ.kind {
                    OccurrenceKind::Error => kind.red().bold(),
                    OccurrenceKind::Warn => kind.yellow(),
                    OccurrenceKind::Info => kind.dimmed(),
                };
                writeln!(
                    w,
                    "  [{}] {:<24} container={} {}",
                    kind, occ.id, occ.container, occ.message
                )?;
                for (key, value) in &occ.metadata {
                    writeln!(w, "      {}: {}", key, value)?;
                }
            }
        }

        if !self.skipped.is_empty() {
            writeln!(w)?;
            writeln!(w, "Skipped (not a workload): {}", self.skipped.len())?;
            for name in &self.skipped {
                writeln!(w, "  {}", name.dimmed())?;
            }
        }

        for entry in self.load_errors.iter().chain(&self.audit_errors) {
            writeln!(w, "{} {}: {}", "Error:".red().bold(), entry.source, entry.message)?;
        }

        writeln!(w)?;
        writeln!(
            w,
            "Summary: {} total ({} error, {} warn, {} info)",
            self.summary.total, self.summary.error, self.summary.warn, self.summary.info
        )?;

        Ok(())
    }
}

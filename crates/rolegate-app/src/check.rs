//! The `check` and `compile` use cases: load the catalogue, compile policies,
//! validate, and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use rolegate_settings::{Overrides, ResolvedConfig};
use rolegate_types::{
    CatalogEnvelope, ComplianceStatus, ReportEnvelope, RoleCompileErrorRecord, SCHEMA_CATALOG_V1,
    SCHEMA_REPORT_V1, ToolMeta,
};
use time::OffsetDateTime;

/// Pipeline stage, advanced as the run proceeds. Reports name the stage a
/// failure happened in, so the operator knows which input to fix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Loading,
    Compiling,
    Validating,
    Reported,
    Failed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Loading => "loading",
            Stage::Compiling => "compiling",
            Stage::Validating => "validating",
            Stage::Reported => "reported",
            Stage::Failed => "failed",
        }
    }
}

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Role specification file.
    pub catalog_path: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: rolegate_types::RolegateReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
    /// Terminal pipeline stage (always `Reported` on the Ok path).
    pub stage: Stage,
}

/// Run the full pipeline: parse config, load the catalogue, compile every
/// role, validate, produce a report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        rolegate_settings::RolegateConfigV1::default()
    } else {
        rolegate_settings::parse_config_toml(input.config_text)
            .with_context(|| format!("parse config ({} stage)", Stage::Idle.as_str()))?
    };
    let resolved = rolegate_settings::resolve_config(cfg, input.overrides.clone())
        .with_context(|| format!("resolve config ({} stage)", Stage::Idle.as_str()))?;

    let catalog = rolegate_catalog::load_catalog(input.catalog_path)
        .with_context(|| format!("load role specification ({} stage)", Stage::Loading.as_str()))?;

    let outcome = rolegate_domain::compile_catalog(&catalog);

    let domain_report =
        rolegate_domain::validate(&catalog, &outcome.policies, &outcome.errors, &resolved.effective);

    let finished_at = OffsetDateTime::now_utc();
    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at,
        status: domain_report.status,
        results: domain_report.results,
        policies: outcome.policies,
        data: domain_report.data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
        stage: Stage::Reported,
    })
}

/// Input for the validate use case: previously compiled policies plus the
/// catalogue they came from (the checks need role metadata).
#[derive(Clone, Debug)]
pub struct ValidateInput<'a> {
    pub catalog_path: &'a Utf8Path,
    /// Compiled catalogue JSON, as emitted by `run_compile`.
    pub policies_text: &'a str,
    pub config_text: &'a str,
    pub overrides: Overrides,
}

/// Validate an already-compiled policy set against its catalogue.
///
/// A partial compile artifact (one with recorded compile errors) is rejected;
/// fix the roles and re-run `compile` first.
pub fn run_validate(input: ValidateInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let cfg = if input.config_text.trim().is_empty() {
        rolegate_settings::RolegateConfigV1::default()
    } else {
        rolegate_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = rolegate_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let catalog = rolegate_catalog::load_catalog(input.catalog_path)
        .with_context(|| format!("load role specification ({} stage)", Stage::Loading.as_str()))?;

    let doc: CatalogEnvelope =
        serde_json::from_str(input.policies_text).context("parse compiled catalogue")?;
    if doc.schema != SCHEMA_CATALOG_V1 {
        anyhow::bail!(
            "unsupported catalogue schema '{}' (expected '{SCHEMA_CATALOG_V1}')",
            doc.schema
        );
    }
    if !doc.compile_errors.is_empty() {
        anyhow::bail!(
            "compiled catalogue is partial ({} roles failed to compile); \
             fix them and re-run `compile`",
            doc.compile_errors.len()
        );
    }

    let domain_report =
        rolegate_domain::validate(&catalog, &doc.policies, &[], &resolved.effective);

    let finished_at = OffsetDateTime::now_utc();
    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at,
        status: domain_report.status,
        results: domain_report.results,
        policies: doc.policies,
        data: domain_report.data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
        stage: Stage::Reported,
    })
}

/// Run compilation only and stop before validation.
pub fn run_compile(catalog_path: &Utf8Path) -> anyhow::Result<CatalogEnvelope> {
    let catalog = rolegate_catalog::load_catalog(catalog_path).context("load role specification")?;
    let outcome = rolegate_domain::compile_catalog(&catalog);

    Ok(CatalogEnvelope {
        schema: SCHEMA_CATALOG_V1.to_string(),
        tool: tool_meta(),
        generated_at: OffsetDateTime::now_utc(),
        policies: outcome.policies,
        compile_errors: outcome
            .errors
            .iter()
            .map(|e| RoleCompileErrorRecord {
                role: e.role().to_string(),
                code: match e {
                    rolegate_domain::CompileError::OverlyBroadGrant { .. } => {
                        rolegate_types::ids::CODE_OVERLY_BROAD_GRANT.to_string()
                    }
                    rolegate_domain::CompileError::StatementLimitExceeded { .. } => {
                        rolegate_types::ids::CODE_STATEMENT_LIMIT_EXCEEDED.to_string()
                    }
                },
                message: e.to_string(),
            })
            .collect(),
    })
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "rolegate".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Map status to exit code: 0 = compliant, 2 = non-compliant.
/// Runtime errors exit 1 (handled by the CLI).
pub fn status_exit_code(status: ComplianceStatus) -> i32 {
    match status {
        ComplianceStatus::Compliant => 0,
        ComplianceStatus::NonCompliant => 2,
    }
}

use rolegate_types::{
    ComplianceStatus, ReportEnvelope, RolegateData, Severity, ValidationResult,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl From<Severity> for RenderableSeverity {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Low => RenderableSeverity::Low,
            Severity::Medium => RenderableSeverity::Medium,
            Severity::High => RenderableSeverity::High,
            Severity::Critical => RenderableSeverity::Critical,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableStatus {
    Compliant,
    NonCompliant,
}

impl From<ComplianceStatus> for RenderableStatus {
    fn from(s: ComplianceStatus) -> Self {
        match s {
            ComplianceStatus::Compliant => RenderableStatus::Compliant,
            ComplianceStatus::NonCompliant => RenderableStatus::NonCompliant,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableResult {
    pub severity: RenderableSeverity,
    pub rule_id: String,
    pub code: String,
    pub passed: bool,
    pub message: String,
    pub role: Option<String>,
    pub statement: Option<u32>,
}

impl From<&ValidationResult> for RenderableResult {
    fn from(r: &ValidationResult) -> Self {
        Self {
            severity: r.severity.into(),
            rule_id: r.rule_id.clone(),
            code: r.code.clone(),
            passed: r.passed,
            message: r.message.clone(),
            role: r.role.clone(),
            statement: r.statement,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub roles_total: u32,
    pub roles_compiled: u32,
    pub statements_total: u32,
    pub results_emitted: u32,
    pub results_total: u32,
    pub truncated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub status: RenderableStatus,
    pub results: Vec<RenderableResult>,
    pub data: RenderableData,
}

impl RenderableReport {
    /// Project a report envelope down to the fields the renderers use.
    pub fn from_envelope(envelope: &ReportEnvelope<RolegateData>) -> Self {
        Self {
            status: envelope.status.into(),
            results: envelope.results.iter().map(RenderableResult::from).collect(),
            data: RenderableData {
                roles_total: envelope.data.roles_total,
                roles_compiled: envelope.data.roles_compiled,
                statements_total: envelope.data.statements_total,
                results_emitted: envelope.data.results_emitted,
                results_total: envelope.data.results_total,
                truncated_reason: envelope.data.truncated_reason.clone(),
            },
        }
    }
}

use rolegate_types::{ComplianceStatus, RolegateData, SeverityCounts, ValidationResult};

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub status: ComplianceStatus,
    pub results: Vec<ValidationResult>,
    pub data: RolegateData,
    pub counts: SeverityCounts,
}

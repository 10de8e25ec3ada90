use crate::{RenderableReport, RenderableSeverity, RenderableStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Rolegate report\n\n");
    let status = match report.status {
        RenderableStatus::Compliant => "COMPLIANT",
        RenderableStatus::NonCompliant => "NON-COMPLIANT",
    };
    out.push_str(&format!(
        "- Status: **{}**\n- Roles: {} compiled / {} total\n- Statements: {}\n- Results: {} (emitted) / {} (total)\n\n",
        status,
        report.data.roles_compiled,
        report.data.roles_total,
        report.data.statements_total,
        report.data.results_emitted,
        report.data.results_total
    ));

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    let violations: Vec<_> = report.results.iter().filter(|r| !r.passed).collect();
    if violations.is_empty() {
        out.push_str("No violations.\n");
        return out;
    }

    out.push_str("## Violations\n\n");

    for result in violations {
        let sev = match result.severity {
            RenderableSeverity::Low => "LOW",
            RenderableSeverity::Medium => "MEDIUM",
            RenderableSeverity::High => "HIGH",
            RenderableSeverity::Critical => "CRITICAL",
        };

        match (&result.role, result.statement) {
            (Some(role), Some(idx)) => out.push_str(&format!(
                "- [{}] `{}` / `{}` - {} (`{}` statement {})\n",
                sev, result.rule_id, result.code, result.message, role, idx
            )),
            (Some(role), None) => out.push_str(&format!(
                "- [{}] `{}` / `{}` - {} (`{}`)\n",
                sev, result.rule_id, result.code, result.message, role
            )),
            _ => out.push_str(&format!(
                "- [{}] `{}` / `{}` - {}\n",
                sev, result.rule_id, result.code, result.message
            )),
        }
    }

    out
}

//! The `explain` use case: human-readable guidance for rule IDs and codes.

use rolegate_types::explain::{Explanation, all_codes, all_rule_ids, lookup_explanation};

/// Output of an explain lookup.
#[derive(Debug)]
pub enum ExplainOutput {
    Found {
        identifier: String,
        explanation: Explanation,
    },
    NotFound {
        identifier: String,
    },
}

/// Look up an explanation for a rule ID or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match lookup_explanation(identifier) {
        Some(explanation) => ExplainOutput::Found {
            identifier: identifier.to_string(),
            explanation,
        },
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
        },
    }
}

/// Format a found explanation for terminal output.
pub fn format_explanation(identifier: &str, explanation: &Explanation) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", identifier, explanation.title));
    out.push('\n');
    out.push_str(explanation.description);
    out.push('\n');
    out.push('\n');
    out.push_str("Remediation:\n");
    out.push_str(explanation.remediation);
    out.push('\n');
    out
}

/// Format the not-found message, listing everything that can be explained.
pub fn format_not_found(identifier: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("No explanation found for '{identifier}'.\n\n"));
    out.push_str("Known rule IDs:\n");
    for rule_id in all_rule_ids() {
        out.push_str(&format!("  {rule_id}\n"));
    }
    out.push_str("\nKnown codes:\n");
    for code in all_codes() {
        out.push_str(&format!("  {code}\n"));
    }
    out
}

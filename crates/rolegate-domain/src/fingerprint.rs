use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a validation result.
///
/// Identity fields:
/// - rule_id
/// - code
/// - role name
/// - statement index (if any)
pub fn fingerprint_for_violation(
    rule_id: &str,
    code: &str,
    role: &str,
    statement: Option<u32>,
) -> String {
    let mut canonical = format!("{rule_id}|{code}|{role}");
    if let Some(idx) = statement {
        canonical.push_str(&format!("|{idx}"));
    }

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

use sha2::{Digest, Sha256};

const MAX_STEM_LEN: usize = 60;

/// Filesystem-safe, deterministic export stem:
/// `{sanitized_company_name}--{short_hash(company_id)}-tenure-analysis`.
pub fn export_stem(company_name: &str, company_id: &str) -> String {
    format!(
        "{}--{}-tenure-analysis",
        sanitize_name(company_name),
        short_hash(company_id)
    )
}

fn sanitize_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        return "company".to_string();
    }
    if out.len() > MAX_STEM_LEN {
        let mut cut = MAX_STEM_LEN;
        while !out.is_char_boundary(cut) {
            cut -= 1;
        }
        out.truncate(cut);
        out.truncate(out.trim_end_matches('-').len());
    }
    out
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().take(4).map(|byte| format!("{byte:02x}")).collect()
}

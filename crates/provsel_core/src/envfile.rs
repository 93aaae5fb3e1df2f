use crate::scan::Candidate;

/// Quotes a value for safe reuse in a POSIX shell. Values made only of
/// unambiguous characters pass through bare; everything else is wrapped in
/// single quotes, with embedded single quotes spliced out.
pub fn sh_quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }
    let unambiguous = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if unambiguous {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', "'\"'\"'"))
}

/// Renders the selected candidate as the shell-sourceable file the signing
/// pipeline consumes.
pub fn render_env_file(candidate: &Candidate) -> String {
    format!(
        "export NAME={}\nexport UUID={}\nexport TEAM={}\nexport BUNDLE_ID={}\n",
        sh_quote(&candidate.name),
        sh_quote(&candidate.uuid),
        sh_quote(&candidate.team),
        sh_quote(&candidate.bundle_id),
    )
}

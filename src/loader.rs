use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::error::ScanError;
use crate::stats::EmailSet;

fn read_lines(path: &Path) -> Result<String, ScanError> {
    fs::read_to_string(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads previously recorded addresses, lowercased to match extracted
/// candidates. A missing file is an empty set.
pub fn read_existing_emails(path: &Path) -> Result<EmailSet, ScanError> {
    let start_time = Instant::now();

    if !path.exists() {
        info!(action = "skip", component = "email_loading", file_path = ?path, "No existing email file, starting empty");
        return Ok(EmailSet::new());
    }

    let content = read_lines(path)?;
    let emails: EmailSet = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect();

    info!(
        action = "loaded",
        component = "email_loading",
        email_count = emails.len(),
        file_path = ?path,
        duration_ms = start_time.elapsed().as_millis(),
        "Loaded existing emails"
    );
    Ok(emails)
}

/// Loads the domains to scan in file order. Duplicates are kept.
pub fn read_domains(path: &Path) -> Result<Vec<String>, ScanError> {
    let content = read_lines(path)?;
    let domains: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    info!(action = "loaded", component = "domain_loading", domain_count = domains.len(), file_path = ?path, "Loaded domains");
    Ok(domains)
}

use url::Url;

pub fn has_valid_tld(domain: &str) -> bool {
    if domain.is_empty() || domain.len() < 3 || !domain.contains('.') {
        return false;
    }

    if let Some(last_dot) = domain.rfind('.') {
        if last_dot == domain.len() - 1 {
            return false;
        }
        let tld = &domain[last_dot + 1..];
        tld.len() >= 2
            && tld
                .chars()
                .all(|c| c.is_ascii_lowercase() && c.is_ascii_alphabetic())
    } else {
        false
    }
}

/// Rejects empty labels (`a..com`, `.a.com`) and labels with edge hyphens.
pub fn has_valid_labels(domain: &str) -> bool {
    domain
        .split('.')
        .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}

/// Builds the root page URL for a bare hostname.
pub fn root_url(scheme: &str, domain: &str) -> Result<Url, String> {
    let domain = domain.trim().trim_end_matches('/');
    if domain.is_empty() || domain.contains('/') || domain.contains("://") {
        return Err("expected a bare hostname".to_string());
    }

    let url = Url::parse(&format!("{}://{}/", scheme, domain)).map_err(|e| e.to_string())?;
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(url)
}

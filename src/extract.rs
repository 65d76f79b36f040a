use regex::Regex;
use std::collections::HashSet;

use crate::domain::{has_valid_labels, has_valid_tld};

const EMAIL_PATTERN: &str = r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}";

// Asset names like `logo@2x.png` match the address grammar.
const ASSET_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"];

#[derive(Debug, Clone)]
pub struct EmailExtractor {
    email_regex: Regex,
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailExtractor {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(EMAIL_PATTERN).expect("email pattern compiles"),
        }
    }

    /// Returns lowercased addresses in order of first appearance.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut emails = Vec::new();

        for found in self.email_regex.find_iter(text) {
            let email = found.as_str().to_lowercase();
            if !is_plausible(&email) {
                continue;
            }
            if seen.insert(email.clone()) {
                emails.push(email);
            }
        }
        emails
    }
}

fn is_plausible(email: &str) -> bool {
    if ASSET_EXTENSIONS.iter().any(|ext| email.ends_with(ext)) {
        return false;
    }
    match email.rsplit_once('@') {
        Some((_, host)) => has_valid_tld(host) && has_valid_labels(host),
        None => false,
    }
}
